// Get Customer by ID screen
//
// Starts idle: nothing is shown until a lookup has been submitted. Every
// lookup ends in success or error, never a lingering loading state.

use tracing::{debug, info, warn};

use crate::api::BankApi;
use crate::error::ClientError;
use crate::models::{Account, Customer, Timestamp};
use crate::request::{RequestState, RequestTracker, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupField {
    CustomerId,
}

impl LookupField {
    pub const ALL: [LookupField; 1] = [LookupField::CustomerId];

    pub fn label(&self) -> &'static str {
        "Customer ID"
    }

    pub fn placeholder(&self) -> &'static str {
        "customerId"
    }
}

#[derive(Debug, Default)]
pub struct CustomerLookupView {
    customer_id: String,
    state: RequestState<Customer>,
    tracker: RequestTracker,
}

impl CustomerLookupView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_change(&mut self, field: LookupField, value: impl Into<String>) {
        match field {
            LookupField::CustomerId => self.customer_id = value.into(),
        }
    }

    pub fn value(&self, field: LookupField) -> &str {
        match field {
            LookupField::CustomerId => &self.customer_id,
        }
    }

    pub fn state(&self) -> &RequestState<Customer> {
        &self.state
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.state.value()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Drops the previous result and returns the id to look up, or `None`
    /// while a lookup is already in flight.
    pub fn submit(&mut self) -> Option<(Ticket, String)> {
        if self.tracker.in_flight() {
            debug!("customer lookup already in flight, ignoring submit");
            return None;
        }

        let ticket = self.tracker.issue();
        self.state = RequestState::Loading;

        info!(customer_id = %self.customer_id, "looking up customer");
        Some((ticket, self.customer_id.clone()))
    }

    /// Applies a response. Returns false if the ticket was stale.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Customer, ClientError>) -> bool {
        if !self.tracker.settle(ticket) {
            return false;
        }

        self.state = match result {
            Ok(customer) => {
                info!(
                    customer_id = %customer.id,
                    accounts = customer.accounts.len(),
                    "customer loaded"
                );
                RequestState::Success(customer)
            }
            Err(e) => {
                warn!(error = %e, "customer lookup failed");
                RequestState::Error(e.to_string())
            }
        };
        true
    }

    pub async fn submit_with(&mut self, api: &dyn BankApi) -> bool {
        let Some((ticket, id)) = self.submit() else {
            return false;
        };
        let result = api.get_customer_by_id(&id).await;
        self.complete(ticket, result)
    }

    /// Clears the form and result and drops any in-flight lookup.
    pub fn reset(&mut self) {
        self.tracker.invalidate();
        self.customer_id.clear();
        self.state = RequestState::Idle;
    }

    pub fn render_lines(&self) -> Vec<String> {
        match &self.state {
            RequestState::Idle => vec![],
            RequestState::Loading => vec!["Loading customer...".to_string()],
            RequestState::Error(message) => vec![
                format!("Error: {}", message),
                "Press Enter to retry".to_string(),
            ],
            RequestState::Success(customer) => render_customer(customer),
        }
    }
}

fn render_customer(customer: &Customer) -> Vec<String> {
    let mut lines = vec![
        format!("Customer ID: {}", customer.id),
        format!("First Name: {}", customer.first_name),
        format!("Last Name: {}", customer.surname),
        "Accounts:".to_string(),
    ];

    for account in &customer.accounts {
        render_account(account, &mut lines);
    }

    lines
}

fn render_account(account: &Account, lines: &mut Vec<String>) {
    lines.push(format!("  ID: {}", account.id));
    lines.push(format!("  Type: {}", account.account_type));
    lines.push(format!("  Balance: {}", account.balance));
    lines.push(format!("  Date Created: {}", display_date(&account.date_created)));
    lines.push(format!("  Date Updated: {}", display_date(&account.date_updated)));
    lines.push("  Transactions:".to_string());

    for tx in &account.transactions {
        lines.push(format!("    Amount: {}", tx.amount));
        lines.push(format!("    Type: {}", tx.transaction_type));
    }
}

fn display_date(ts: &Option<Timestamp>) -> String {
    ts.as_ref().map(|t| t.to_string()).unwrap_or_default()
}
