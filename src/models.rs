// 🏦 Banking API records - Customer, Account, Transaction
//
// These are display-only projections of server state. The client decodes
// them from the backend's JSON and never mutates them; the only data the
// client owns is the AccountCreationRequest it builds per submission.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Current account (the only type this client can open)
    Current,

    /// Savings account
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Current => "CURRENT",
            AccountType::Savings => "SAVINGS",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "CREDIT",
            TransactionType::Debit => "DEBIT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TIMESTAMP
// ============================================================================

/// Server timestamp as received.
///
/// The backend serializes zoned date-times either as RFC 3339 strings
/// (optionally suffixed with a `[Zone/Id]`) or as fractional epoch seconds.
/// Both forms are accepted; unparseable strings are kept verbatim for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamp {
    raw: String,
    parsed: Option<DateTime<FixedOffset>>,
}

impl Timestamp {
    pub fn parse(raw: &str) -> Self {
        // "2021-03-01T10:00:00Z[UTC]" -> "2021-03-01T10:00:00Z"
        let without_zone_id = match raw.find('[') {
            Some(idx) if raw.ends_with(']') => &raw[..idx],
            _ => raw,
        };

        Self {
            raw: raw.to_string(),
            parsed: DateTime::parse_from_rfc3339(without_zone_id).ok(),
        }
    }

    pub fn from_epoch_seconds(seconds: f64) -> Self {
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * 1_000_000_000.0).round().min(999_999_999.0) as u32;

        let parsed = if whole.is_finite() {
            Utc.timestamp_opt(whole as i64, nanos)
                .single()
                .map(|dt| dt.fixed_offset())
        } else {
            None
        };

        Self {
            raw: seconds.to_string(),
            parsed,
        }
    }

    /// Raw form exactly as the server sent it
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        self.parsed.as_ref()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parsed {
            Some(dt) => f.write_str(&dt.to_rfc3339()),
            None => f.write_str(&self.raw),
        }
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawTimestamp {
            Text(String),
            Seconds(f64),
        }

        Ok(match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(text) => Timestamp::parse(&text),
            RawTimestamp::Seconds(seconds) => Timestamp::from_epoch_seconds(seconds),
        })
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

// ============================================================================
// SERVER RECORDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    pub amount: f64,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    #[serde(default, deserialize_with = "deserialize_optional_id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_transacted: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    #[serde(rename = "type")]
    pub account_type: AccountType,

    pub balance: f64,

    #[serde(default, deserialize_with = "deserialize_optional_id")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<Timestamp>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<Timestamp>,

    /// Ledger entries in the order the server returned them
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    pub first_name: String,

    pub surname: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Accounts in the order the server returned them
    #[serde(default, deserialize_with = "null_as_empty")]
    pub accounts: Vec<Account>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<Timestamp>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<Timestamp>,
}

// ============================================================================
// REQUESTS & ERROR BODIES
// ============================================================================

/// Body of `POST /account/current`. Built fresh for every submission.
///
/// Both fields are sent as the strings the user typed; validation belongs to
/// the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCreationRequest {
    pub customer_id: String,
    pub initial_credit: String,
}

impl AccountCreationRequest {
    pub fn new(customer_id: impl Into<String>, initial_credit: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            initial_credit: initial_credit.into(),
        }
    }
}

/// Error body the backend returns for rejected requests
/// (`{timestamp, status, message, errors}`, or Spring's default
/// `{timestamp, status, error, message, path}`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status: Option<u16>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<String>,
}

impl ApiErrorBody {
    /// Best-effort decode of an error response body
    pub fn from_bytes(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    /// Single human-readable line, most specific information first
    pub fn summary(&self) -> Option<String> {
        if !self.errors.is_empty() {
            return Some(self.errors.join("; "));
        }

        self.message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| self.error.clone())
    }
}

// ============================================================================
// SERDE HELPERS
// ============================================================================

/// Identifiers arrive as JSON integers from the backend but as strings from
/// some fixtures and proxies; both are held as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(text) => text,
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
