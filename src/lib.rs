// Banking Client - Core Library
// Exposes the API client, view state, and routing for the TUI binary and tests

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod request;
pub mod router;
pub mod views;

// Re-export commonly used types
pub use api::{BankApi, CreationResponse, HttpBankApi};
pub use config::{ClientConfig, DEFAULT_API_URL};
pub use error::ClientError;
pub use models::{
    Account, AccountCreationRequest, AccountType, ApiErrorBody, Customer, Timestamp,
    Transaction, TransactionType,
};
pub use request::{RequestState, RequestTracker, Ticket};
pub use router::{Route, Shell};
pub use views::{
    CreateAccountField, CreateAccountView, CustomerLookupView, LookupField, SUCCESS_MESSAGE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
