//! Fixtures shared by the client's unit tests.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub const ALICE: &str = "0xabcdefabcdefabcdefabcdefabcdefabcdef0001";
pub const BOB: &str = "0x2222222222222222222222222222222222222222";
pub const CONTRACT: &str = "0x94fa2f8CDBe1Ea95F11B5c872b4A448D8033e2E6";

/// The first request seen by [`serve_json`].
#[derive(Debug)]
pub struct CapturedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CapturedRequest {
    /// `METHOD /path?query`
    pub fn request_line(&self) -> String {
        format!("{} {}", self.method, self.uri)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Serve `body` with `status` for every request on an ephemeral port.
/// Returns the base URL and a receiver for the first request.
pub async fn serve_json(status: u16, body: Value) -> (String, oneshot::Receiver<CapturedRequest>) {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let status = StatusCode::from_u16(status).unwrap();

    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, payload: Bytes| {
            let tx = tx.clone();
            let body = body.clone();
            async move {
                if let Some(tx) = tx.lock().unwrap().take() {
                    let _ = tx.send(CapturedRequest {
                        method,
                        uri,
                        headers,
                        body: payload,
                    });
                }
                (status, Json(body))
            }
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), rx)
}

/// ABI exposing the three complaint functions.
pub fn complaint_abi() -> Value {
    json!([
        {
            "type": "function",
            "name": "raiseComplaint",
            "inputs": [
                {"name": "image", "type": "string"},
                {"name": "text", "type": "string"},
                {"name": "blockName", "type": "string"},
                {"name": "floorNo", "type": "uint256"},
                {"name": "roomNo", "type": "string"},
                {"name": "category", "type": "string"}
            ],
            "outputs": [],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "submitReview",
            "inputs": [
                {"name": "id", "type": "uint256"},
                {"name": "satisfied", "type": "bool"},
                {"name": "feedback", "type": "string"}
            ],
            "outputs": [],
            "stateMutability": "nonpayable"
        },
        {
            "type": "function",
            "name": "getAllComplaints",
            "inputs": [],
            "outputs": [{"name": "", "type": "tuple[]"}],
            "stateMutability": "view"
        }
    ])
}

/// Contract tuple in `getAllComplaints()` layout.
pub fn tuple(id: u64, owner: &str, text: &str, status: u64) -> Value {
    json!([id.to_string(), owner, "", text, "A", "1", "101", "Water", status])
}
