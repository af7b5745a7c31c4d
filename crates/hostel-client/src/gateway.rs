//! Typed access to the complaint contract.
//!
//! The gateway fetches the contract's interface descriptor from the backend
//! once, binds it to the configured address and then forwards the three
//! complaint operations through the wallet. Until it is bound every
//! operation fails with [`ClientError::GatewayNotReady`].

use std::sync::Arc;

use hostel_shared::constants::{FN_GET_ALL_COMPLAINTS, FN_RAISE_COMPLAINT, FN_SUBMIT_REVIEW};
use hostel_shared::{Address, Complaint, ContractCapabilities, InterfaceDescriptor};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::ClientError;
use crate::forms::{RaiseComplaint, Review};
use crate::wallet::{TxReceipt, WalletProvider};

pub struct ContractGateway {
    http: reqwest::Client,
    abi_url: String,
    address: Address,
    wallet: Option<Arc<dyn WalletProvider>>,
    descriptor: Option<InterfaceDescriptor>,
}

impl ContractGateway {
    pub fn new(
        abi_url: impl Into<String>,
        address: Address,
        wallet: Option<Arc<dyn WalletProvider>>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            abi_url: abi_url.into(),
            address,
            wallet,
            descriptor: None,
        }
    }

    /// Fetch and bind the interface descriptor. Failures are logged and leave
    /// the gateway unbound; returns whether it is bound afterwards.
    pub async fn load_interface(&mut self) -> bool {
        if self.wallet.is_none() {
            warn!("no wallet provider, contract interface not loaded");
            return false;
        }

        match self.fetch_descriptor().await {
            Ok(descriptor) => {
                info!(
                    address = %self.address,
                    functions = descriptor.functions().count(),
                    "contract interface loaded"
                );
                self.bind(descriptor);
                true
            }
            Err(e) => {
                error!(url = %self.abi_url, error = %e, "failed to load contract interface");
                self.is_ready()
            }
        }
    }

    async fn fetch_descriptor(&self) -> Result<InterfaceDescriptor, ClientError> {
        let resp = self.http.get(&self.abi_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Backend {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        let body: Value = resp.json().await?;
        Ok(InterfaceDescriptor::from_value(body)?)
    }

    pub fn bind(&mut self, descriptor: InterfaceDescriptor) {
        self.descriptor = Some(descriptor);
    }

    pub fn is_ready(&self) -> bool {
        self.wallet.is_some() && self.descriptor.is_some()
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Operations the bound contract exposes; all false while unbound.
    pub fn capabilities(&self) -> ContractCapabilities {
        self.descriptor
            .as_ref()
            .map(InterfaceDescriptor::capabilities)
            .unwrap_or_default()
    }

    /// Check the call against the bound descriptor and hand back the wallet
    /// that will carry it.
    fn prepare(&self, function: &str, args: &[Value]) -> Result<&dyn WalletProvider, ClientError> {
        let wallet = self.wallet.as_deref().ok_or(ClientError::NoWalletProvider)?;
        let descriptor = self.descriptor.as_ref().ok_or(ClientError::GatewayNotReady)?;

        let entry = descriptor
            .function(function)
            .ok_or_else(|| ClientError::UnsupportedOperation {
                function: function.to_string(),
                reason: "not in the contract interface".to_string(),
            })?;

        if entry.inputs.len() != args.len() {
            return Err(ClientError::UnsupportedOperation {
                function: function.to_string(),
                reason: format!(
                    "expects {} arguments, got {}",
                    entry.inputs.len(),
                    args.len()
                ),
            });
        }

        Ok(wallet)
    }

    pub async fn submit_complaint(
        &self,
        from: &Address,
        complaint: &RaiseComplaint,
    ) -> Result<TxReceipt, ClientError> {
        let args = complaint.to_args();
        let wallet = self.prepare(FN_RAISE_COMPLAINT, &args)?;

        let receipt = wallet
            .send(from, &self.address, FN_RAISE_COMPLAINT, args)
            .await?;
        info!(from = %from.short(), tx = %receipt.transaction_hash, "complaint raised");
        Ok(receipt)
    }

    pub async fn submit_review(&self, from: &Address, review: &Review) -> Result<TxReceipt, ClientError> {
        let args = review.to_args();
        let wallet = self.prepare(FN_SUBMIT_REVIEW, &args)?;

        let receipt = wallet
            .send(from, &self.address, FN_SUBMIT_REVIEW, args)
            .await?;
        info!(
            id = review.complaint_id(),
            satisfied = review.satisfied(),
            tx = %receipt.transaction_hash,
            "review submitted"
        );
        Ok(receipt)
    }

    /// Every complaint on the contract. Tuples that cannot be decoded are
    /// logged and left out so they never hide anyone else's complaints.
    pub async fn get_all_complaints(&self) -> Result<Vec<Complaint>, ClientError> {
        let wallet = self.prepare(FN_GET_ALL_COMPLAINTS, &[])?;

        let raw = wallet
            .call(&self.address, FN_GET_ALL_COMPLAINTS, Vec::new())
            .await?;
        let set = Complaint::decode_all(&raw)?;
        for (index, e) in &set.rejected {
            warn!(index, error = %e, "skipping undecodable complaint");
        }
        debug!(
            count = set.complaints.len(),
            skipped = set.rejected.len(),
            "complaints fetched"
        );
        Ok(set.complaints)
    }
}
