// Create Current Account screen
//
// A 2xx response moves the view to success. Any other status leaves it idle
// with no message; the rejection is kept only for the status bar. A
// transport failure is an explicit error the user can retry from.

use tracing::{debug, info, warn};

use crate::api::{BankApi, CreationResponse};
use crate::error::ClientError;
use crate::models::AccountCreationRequest;
use crate::request::{RequestState, RequestTracker, Ticket};

pub const SUCCESS_MESSAGE: &str = "Account Created Successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateAccountField {
    CustomerId,
    InitialCredit,
}

impl CreateAccountField {
    pub const ALL: [CreateAccountField; 2] =
        [CreateAccountField::CustomerId, CreateAccountField::InitialCredit];

    pub fn label(&self) -> &'static str {
        match self {
            CreateAccountField::CustomerId => "Customer ID",
            CreateAccountField::InitialCredit => "Initial Credit",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            CreateAccountField::CustomerId => "customerId",
            CreateAccountField::InitialCredit => "initialCredit",
        }
    }
}

#[derive(Debug, Default)]
pub struct CreateAccountView {
    customer_id: String,
    initial_credit: String,
    state: RequestState<CreationResponse>,
    tracker: RequestTracker,
    last_rejection: Option<CreationResponse>,
}

impl CreateAccountView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(&mut self, field: CreateAccountField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CreateAccountField::CustomerId => self.customer_id = value,
            CreateAccountField::InitialCredit => self.initial_credit = value,
        }
    }

    pub fn value(&self, field: CreateAccountField) -> &str {
        match field {
            CreateAccountField::CustomerId => &self.customer_id,
            CreateAccountField::InitialCredit => &self.initial_credit,
        }
    }

    pub fn state(&self) -> &RequestState<CreationResponse> {
        &self.state
    }

    pub fn is_success(&self) -> bool {
        matches!(self.state, RequestState::Success(_))
    }

    pub fn is_submitting(&self) -> bool {
        self.tracker.in_flight()
    }

    /// Last non-2xx answer, cleared by the next success
    pub fn last_rejection(&self) -> Option<&CreationResponse> {
        self.last_rejection.as_ref()
    }

    /// Builds the request for the current form values. Returns `None` while a
    /// previous submission is still in flight.
    pub fn submit(&mut self) -> Option<(Ticket, AccountCreationRequest)> {
        if self.tracker.in_flight() {
            debug!("account creation already in flight, ignoring submit");
            return None;
        }

        let request = AccountCreationRequest::new(&self.customer_id, &self.initial_credit);
        let ticket = self.tracker.issue();
        self.state = RequestState::Loading;

        info!(
            customer_id = %request.customer_id,
            initial_credit = %request.initial_credit,
            "submitting current account"
        );
        Some((ticket, request))
    }

    /// Applies a response. Returns false if the ticket was stale.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<CreationResponse, ClientError>,
    ) -> bool {
        if !self.tracker.settle(ticket) {
            return false;
        }

        self.state = match result {
            Ok(response) if response.ok => {
                info!(status = response.status, "current account created");
                self.last_rejection = None;
                RequestState::Success(response)
            }
            Ok(response) => {
                warn!(status = response.status, "current account not created");
                self.last_rejection = Some(response);
                RequestState::Idle
            }
            Err(e) => {
                warn!(error = %e, "current account request failed");
                RequestState::Error(e.to_string())
            }
        };
        true
    }

    pub async fn submit_with(&mut self, api: &dyn BankApi) -> bool {
        let Some((ticket, request)) = self.submit() else {
            return false;
        };
        let result = api.create_current_account(&request).await;
        self.complete(ticket, result)
    }

    /// Clears the form and drops any in-flight request.
    pub fn reset(&mut self) {
        self.tracker.invalidate();
        self.customer_id.clear();
        self.initial_credit.clear();
        self.state = RequestState::Idle;
        self.last_rejection = None;
    }

    pub fn render_lines(&self) -> Vec<String> {
        match &self.state {
            RequestState::Idle => vec![],
            RequestState::Loading => vec!["Creating account...".to_string()],
            RequestState::Success(_) => vec![SUCCESS_MESSAGE.to_string()],
            RequestState::Error(message) => vec![
                format!("Error: {}", message),
                "Press Enter to retry".to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{FakeBankApi, Reply};

    fn filled(customer_id: &str, initial_credit: &str) -> CreateAccountView {
        let mut view = CreateAccountView::new();
        view.on_change(CreateAccountField::CustomerId, customer_id);
        view.on_change(CreateAccountField::InitialCredit, initial_credit);
        view
    }

    #[test]
    fn test_initial_state() {
        let view = CreateAccountView::new();
        assert_eq!(view.value(CreateAccountField::CustomerId), "");
        assert_eq!(view.value(CreateAccountField::InitialCredit), "");
        assert!(!view.is_success());
        assert!(view.state().is_idle());
        assert!(view.render_lines().is_empty());
    }

    #[tokio::test]
    async fn test_ok_response_shows_success() {
        let api = FakeBankApi::replying(vec![Reply::Created(201)]);
        let mut view = filled("42", "100");

        assert!(view.submit_with(&api).await);

        assert!(view.is_success());
        assert_eq!(view.render_lines(), vec![SUCCESS_MESSAGE.to_string()]);

        let sent = api.creations.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], AccountCreationRequest::new("42", "100"));
    }

    #[tokio::test]
    async fn test_rejected_response_stays_idle() {
        let api = FakeBankApi::replying(vec![Reply::Created(400)]);
        let mut view = filled("42", "0");

        assert!(view.submit_with(&api).await);

        assert!(view.state().is_idle());
        assert!(!view.is_success());
        assert!(view.render_lines().is_empty());
        assert_eq!(view.last_rejection().map(|r| r.status), Some(400));
    }

    #[tokio::test]
    async fn test_rejection_after_success_clears_message() {
        let api = FakeBankApi::replying(vec![Reply::Created(201), Reply::Created(400)]);
        let mut view = filled("42", "100");

        view.submit_with(&api).await;
        assert!(view.is_success());

        // The message describes the latest submission only
        view.submit_with(&api).await;
        assert!(view.state().is_idle());
        assert!(view.render_lines().is_empty());
        assert_eq!(view.last_rejection().map(|r| r.status), Some(400));
    }

    #[tokio::test]
    async fn test_failure_is_retryable() {
        let api = FakeBankApi::replying(vec![
            Reply::Status(503, Some("maintenance".to_string())),
            Reply::Created(201),
        ]);
        let mut view = filled("42", "100");

        view.submit_with(&api).await;
        assert!(view.state().error().unwrap().contains("503"));
        assert!(view.render_lines()[0].starts_with("Error: "));

        view.submit_with(&api).await;
        assert!(view.is_success());
        assert_eq!(api.creations.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_no_resubmit_while_in_flight() {
        let mut view = filled("42", "100");

        let first = view.submit();
        assert!(first.is_some());
        assert!(view.is_submitting());
        assert!(view.state().is_loading());
        assert_eq!(view.render_lines(), vec!["Creating account...".to_string()]);

        assert!(view.submit().is_none());
    }

    #[test]
    fn test_request_uses_values_at_submit_time() {
        let mut view = filled("42", "100");
        let (ticket, request) = view.submit().unwrap();

        view.on_change(CreateAccountField::InitialCredit, "999");
        assert_eq!(request.initial_credit, "100");

        let ok = CreationResponse {
            status: 201,
            ok: true,
            message: None,
        };
        assert!(view.complete(ticket, Ok(ok)));
        assert_eq!(view.value(CreateAccountField::InitialCredit), "999");
    }

    #[test]
    fn test_reset_discards_in_flight_response() {
        let mut view = filled("42", "100");
        let (ticket, _) = view.submit().unwrap();

        view.reset();

        let ok = CreationResponse {
            status: 201,
            ok: true,
            message: None,
        };
        assert!(!view.complete(ticket, Ok(ok)));
        assert!(view.state().is_idle());
        assert_eq!(view.value(CreateAccountField::CustomerId), "");
    }
}
