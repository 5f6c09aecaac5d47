// Screen state for the two forms
//
// Views own their form fields and request lifecycle. They never touch the
// network themselves: `submit` hands back the request to send, `complete`
// applies the response. `submit_with` does both against an injected BankApi.

pub mod create_account;
pub mod customer_lookup;

pub use create_account::{CreateAccountField, CreateAccountView, SUCCESS_MESSAGE};
pub use customer_lookup::{CustomerLookupView, LookupField};
