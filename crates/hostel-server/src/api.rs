use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::Redirect,
    routing::{get, put},
    Json, Router,
};
use hostel_shared::records::{
    AdminFeedbackUpdate, Announcement, ComplaintImageRecord, NewAnnouncement, NewComplaintImage,
};
use hostel_shared::{Address, InterfaceDescriptor};
use hostel_store::Database;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::ServerError;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    /// `None` when the ABI file could not be read at startup.
    pub abi: Option<Arc<InterfaceDescriptor>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    fn db(&self) -> Result<MutexGuard<'_, Database>, ServerError> {
        self.db
            .lock()
            .map_err(|_| ServerError::Internal("database lock poisoned".into()))
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);

    // base64 inflates the image by 4/3; leave room for the JSON envelope
    let body_limit = state.config.max_image_size / 3 * 4 + 64 * 1024;

    Router::new()
        .route("/health", get(health_check))
        .route("/api/contract/abi", get(contract_abi))
        .route("/auth/google", get(google_auth))
        .route(
            "/api/complaints/images",
            get(list_complaint_images).post(create_complaint_image),
        )
        .route(
            "/api/complaints/images/:complaint_id",
            get(get_complaint_image),
        )
        .route(
            "/api/complaints/images/:complaint_id/feedback",
            put(set_admin_feedback),
        )
        .route(
            "/api/announcements",
            get(list_announcements).post(create_announcement),
        )
        .route("/api/announcements/:id", get(get_announcement))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct AbiResponse {
    abi: serde_json::Value,
}

#[derive(Deserialize)]
struct ImageQuery {
    student: Option<String>,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn contract_abi(State(state): State<AppState>) -> Result<Json<AbiResponse>, ServerError> {
    let abi = state
        .abi
        .as_ref()
        .ok_or_else(|| ServerError::Unavailable("contract ABI not loaded".into()))?;
    Ok(Json(AbiResponse {
        abi: abi.to_value(),
    }))
}

async fn google_auth(State(state): State<AppState>) -> Result<Redirect, ServerError> {
    let url = state
        .config
        .oauth_authorize_url
        .as_deref()
        .ok_or_else(|| ServerError::Unavailable("Google sign-in is not configured".into()))?;
    Ok(Redirect::temporary(url))
}

async fn create_complaint_image(
    State(state): State<AppState>,
    Json(new): Json<NewComplaintImage>,
) -> Result<(StatusCode, Json<ComplaintImageRecord>), ServerError> {
    if new.complaint_id.trim().is_empty() {
        return Err(ServerError::BadRequest("complaintId is required".into()));
    }
    if !new.image.is_image() {
        return Err(ServerError::BadRequest(format!(
            "unsupported content type '{}'",
            new.image.content_type
        )));
    }
    let size = new.image.data.len();
    if size > state.config.max_image_size {
        return Err(ServerError::ImageTooLarge {
            size,
            max: state.config.max_image_size,
        });
    }

    let record = ComplaintImageRecord::from(new);
    state.db()?.insert_complaint_image(&record)?;

    info!(
        complaint_id = %record.complaint_id,
        student = %record.student_address.short(),
        size,
        "Complaint image stored"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// One student's records, or every record for a caller holding the admin
/// token.
async fn list_complaint_images(
    headers: HeaderMap,
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Json<Vec<ComplaintImageRecord>>, ServerError> {
    if query.student.is_none() {
        verify_admin_token(&headers, &state.config)?;
    }

    let student = query
        .student
        .as_deref()
        .map(Address::parse)
        .transpose()
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;

    let records = state.db()?.list_complaint_images(student.as_ref())?;
    Ok(Json(records))
}

async fn get_complaint_image(
    State(state): State<AppState>,
    Path(complaint_id): Path<String>,
) -> Result<Json<ComplaintImageRecord>, ServerError> {
    let record = state.db()?.get_complaint_image(&complaint_id)?;
    Ok(Json(record))
}

async fn set_admin_feedback(
    headers: HeaderMap,
    State(state): State<AppState>,
    Path(complaint_id): Path<String>,
    Json(update): Json<AdminFeedbackUpdate>,
) -> Result<Json<ComplaintImageRecord>, ServerError> {
    verify_admin_token(&headers, &state.config)?;

    let db = state.db()?;
    if !db.set_admin_feedback(&complaint_id, &update.admin_feedback)? {
        return Err(ServerError::NotFound(format!("complaint image {complaint_id}")));
    }
    let record = db.get_complaint_image(&complaint_id)?;

    info!(complaint_id = %complaint_id, "Admin feedback updated");
    Ok(Json(record))
}

async fn create_announcement(
    headers: HeaderMap,
    State(state): State<AppState>,
    Json(new): Json<NewAnnouncement>,
) -> Result<(StatusCode, Json<Announcement>), ServerError> {
    verify_admin_token(&headers, &state.config)?;

    if new.title.trim().is_empty() {
        return Err(ServerError::BadRequest("title is required".into()));
    }

    let announcement = Announcement::create(new);
    state.db()?.insert_announcement(&announcement)?;

    info!(id = %announcement.id, "Announcement posted");
    Ok((StatusCode::CREATED, Json(announcement)))
}

async fn list_announcements(
    State(state): State<AppState>,
) -> Result<Json<Vec<Announcement>>, ServerError> {
    Ok(Json(state.db()?.list_announcements()?))
}

async fn get_announcement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Announcement>, ServerError> {
    Ok(Json(state.db()?.get_announcement(id)?))
}

fn verify_admin_token(headers: &HeaderMap, config: &ServerConfig) -> Result<(), ServerError> {
    let Some(ref expected) = config.admin_token else {
        return Err(ServerError::Forbidden(
            "Admin API is disabled (no ADMIN_TOKEN configured)".into(),
        ));
    };

    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or(auth);

    use subtle::ConstantTimeEq;
    let token_bytes = token.as_bytes();
    let expected_bytes = expected.as_bytes();
    if token_bytes.len() != expected_bytes.len()
        || token_bytes.ct_eq(expected_bytes).unwrap_u8() != 1
    {
        return Err(ServerError::Forbidden("Invalid admin token".into()));
    }

    Ok(())
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const STUDENT: &str = "0xabcdefabcdefabcdefabcdefabcdefabcdef0001";

    fn abi_json() -> Value {
        json!([{
            "type": "function",
            "name": "getAllComplaints",
            "inputs": [],
            "outputs": [{
                "name": "",
                "type": "tuple[]",
                "internalType": "struct HostelComplaintSystem.Complaint[]",
                "components": [
                    {"name": "id", "type": "uint256", "internalType": "uint256"},
                    {"name": "floorNo", "type": "uint256", "internalType": "uint256"}
                ]
            }],
            "stateMutability": "view"
        }])
    }

    fn test_app() -> Router {
        let abi = InterfaceDescriptor::from_value(abi_json()).unwrap();

        let config = ServerConfig {
            admin_token: Some("s3cret".into()),
            oauth_authorize_url: Some("https://accounts.example/o/oauth2/auth".into()),
            max_image_size: 16,
            ..Default::default()
        };

        build_router(AppState {
            db: Arc::new(Mutex::new(Database::open_in_memory().unwrap())),
            abi: Some(Arc::new(abi)),
            config: Arc::new(config),
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn image_body(complaint_id: &str, data: &[u8], content_type: &str) -> Value {
        json!({
            "complaintId": complaint_id,
            "studentAddress": STUDENT,
            "image": { "data": STANDARD.encode(data), "contentType": content_type },
        })
    }

    #[tokio::test]
    async fn test_health_and_abi() {
        let app = test_app();
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, body) = send(&app, get("/api/contract/abi")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["abi"], abi_json());
        assert_eq!(body["abi"][0]["outputs"][0]["components"][1]["name"], "floorNo");
    }

    #[tokio::test]
    async fn test_google_auth_redirects() {
        let app = test_app();
        let response = app.oneshot(get("/auth/google")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://accounts.example/o/oauth2/auth"
        );
    }

    #[tokio::test]
    async fn test_image_lifecycle() {
        let app = test_app();

        let (status, body) = send(
            &app,
            json_request("POST", "/api/complaints/images", image_body("7", b"png", "image/png"), None),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["adminFeedback"], "");

        let (status, _) = send(
            &app,
            json_request("POST", "/api/complaints/images", image_body("7", b"png", "image/png"), None),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            get(&format!("/api/complaints/images?student={}", STUDENT.to_uppercase().replacen("0X", "0x", 1))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(
            &app,
            json_request(
                "PUT",
                "/api/complaints/images/7/feedback",
                json!({ "adminFeedback": "Plumber booked" }),
                Some("s3cret"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["adminFeedback"], "Plumber booked");

        let (status, body) = send(&app, get("/api/complaints/images/7")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["adminFeedback"], "Plumber booked");

        let (status, body) = send(&app, get("/api/complaints/images/8")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_image_validation() {
        let app = test_app();

        let (status, _) = send(
            &app,
            json_request("POST", "/api/complaints/images", image_body("1", b"hi", "text/plain"), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/complaints/images",
                image_body("1", &[0u8; 17], "image/png"),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

        let (status, _) = send(&app, get("/api/complaints/images?student=nope")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_listing_every_image_needs_admin_token() {
        let app = test_app();
        let (status, _) = send(
            &app,
            json_request("POST", "/api/complaints/images", image_body("3", b"png", "image/png"), None),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, get("/api/complaints/images")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["error"].is_string());

        let mut request = get("/api/complaints/images");
        request
            .headers_mut()
            .insert(header::AUTHORIZATION, "Bearer wrong!".parse().unwrap());
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let mut request = get("/api/complaints/images");
        request
            .headers_mut()
            .insert(header::AUTHORIZATION, "Bearer s3cret".parse().unwrap());
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["complaintId"], "3");
    }

    #[tokio::test]
    async fn test_admin_endpoints_require_token() {
        let app = test_app();
        let body = json!({ "title": "Water outage", "body": "2-4pm", "authorId": "a1" });

        let (status, _) = send(&app, json_request("POST", "/api/announcements", body.clone(), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            json_request("POST", "/api/announcements", body.clone(), Some("wrong!")),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &app,
            json_request(
                "PUT",
                "/api/complaints/images/1/feedback",
                json!({ "adminFeedback": "x" }),
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_announcements() {
        let app = test_app();
        let (status, created) = send(
            &app,
            json_request(
                "POST",
                "/api/announcements",
                json!({ "title": "Water outage", "body": "2-4pm", "authorId": "a1" }),
                Some("s3cret"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, list) = send(&app, get("/api/announcements")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list[0]["title"], "Water outage");

        let (status, one) = send(&app, get(&format!("/api/announcements/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(one["authorId"], "a1");

        let (status, _) = send(
            &app,
            get(&format!("/api/announcements/{}", Uuid::new_v4())),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_oauth_and_abi_are_unavailable() {
        let app = build_router(AppState {
            db: Arc::new(Mutex::new(Database::open_in_memory().unwrap())),
            abi: None,
            config: Arc::new(ServerConfig::default()),
        });
        let (status, _) = send(&app, get("/auth/google")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let (status, _) = send(&app, get("/api/contract/abi")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
