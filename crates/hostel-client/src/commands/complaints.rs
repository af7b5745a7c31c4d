use tracing::{error, warn};

use crate::error::ClientError;
use crate::events::{Notice, MSG_COMPLAINT_SUBMITTED};
use crate::forms::ComplaintForm;
use crate::state::AppState;

/// The add-complaint view: a form that survives failed submissions.
#[derive(Debug, Default)]
pub struct AddComplaintView {
    pub form: ComplaintForm,
}

impl AddComplaintView {
    /// Check the preconditions in order (account, contract, input), then
    /// raise the complaint. The form is cleared only once the write succeeds.
    pub async fn submit(&mut self, state: &AppState) -> Notice {
        match self.try_submit(state).await {
            Ok(()) => {
                self.form.clear();
                Notice::success(MSG_COMPLAINT_SUBMITTED)
            }
            Err(e) => {
                if e.is_validation() {
                    warn!(error = %e, "complaint form rejected");
                } else {
                    error!(error = %e, "error submitting complaint");
                }
                Notice::from_error(&e)
            }
        }
    }

    async fn try_submit(&self, state: &AppState) -> Result<(), ClientError> {
        let from = state.require_account()?;
        if !state.gateway.is_ready() {
            return Err(ClientError::GatewayNotReady);
        }
        let complaint = self.form.validate()?;
        state.gateway.submit_complaint(&from, &complaint).await?;
        Ok(())
    }
}
