use hostel_shared::{Address, Complaint, ComplaintId};
use tracing::{error, info, warn};

use crate::error::ClientError;
use crate::events::{Notice, MSG_REVIEW_SUBMITTED};
use crate::forms::Review;
use crate::state::AppState;
use crate::view::{derive_visible, ComplaintQuery};

/// The student dashboard: the last fetched complaint set plus the current
/// search and sort settings.
#[derive(Debug, Default)]
pub struct DashboardView {
    pub complaints: Vec<Complaint>,
    pub query: ComplaintQuery,
}

impl DashboardView {
    /// Re-read every complaint from the contract.
    pub async fn refresh(&mut self, state: &AppState) -> Result<usize, ClientError> {
        self.complaints = state.gateway.get_all_complaints().await?;
        Ok(self.complaints.len())
    }

    pub fn visible(&self, account: Option<&Address>) -> Vec<Complaint> {
        derive_visible(&self.complaints, account, &self.query)
    }

    /// Validate and submit a review, then re-fetch so the list shows
    /// whatever state the contract moved the complaint into.
    pub async fn review(
        &mut self,
        state: &AppState,
        complaint_id: ComplaintId,
        satisfied: bool,
        feedback: Option<&str>,
    ) -> Notice {
        let result = async {
            let review = Review::new(complaint_id, satisfied, feedback)?;
            let from = state.require_account()?;
            state.gateway.submit_review(&from, &review).await?;
            Ok::<_, ClientError>(())
        }
        .await;

        if let Err(e) = result {
            if e.is_validation() {
                warn!(id = complaint_id, error = %e, "review rejected");
            } else {
                error!(id = complaint_id, error = %e, "error submitting review");
            }
            return Notice::from_error(&e);
        }

        match self.refresh(state).await {
            Ok(count) => info!(count, "complaints reloaded after review"),
            Err(e) => warn!(error = %e, "could not reload complaints after review"),
        }
        Notice::success(MSG_REVIEW_SUBMITTED)
    }
}
