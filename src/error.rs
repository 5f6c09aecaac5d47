use thiserror::Error;

/// Everything that can go wrong between the views and the banking API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured base URL cannot be used to build request URLs
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A path segment the URL parser would collapse, such as `.` or `..`
    #[error("'{segment}' cannot be sent as a path segment")]
    InvalidSegment { segment: String },

    /// Network unreachable, DNS failure, timeout, or the body could not be read
    #[error("could not reach the banking API: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success HTTP status
    #[error("banking API returned status {status}{}", describe(.message))]
    Status { status: u16, message: Option<String> },

    /// The backend answered 2xx but the body is not the expected shape
    #[error("could not decode {what} from the banking API response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    /// HTTP status, when the backend produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn describe(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {}", m),
        None => String::new(),
    }
}
