// Banking API client - the two calls the screens make
//
// GET  {base}/customer/{id}     -> Customer
// POST {base}/account/current   -> status only

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{ClientConfig, DEFAULT_TIMEOUT_SECS};
use crate::error::ClientError;
use crate::models::{AccountCreationRequest, ApiErrorBody, Customer};

/// Outcome of an account creation call. The response body is not decoded
/// into an account; only the status decides success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationResponse {
    pub status: u16,
    pub ok: bool,
    /// Backend explanation for a rejected request, when it sent one
    pub message: Option<String>,
}

/// Seam between the views and the network, so views can run against a fake.
#[async_trait]
pub trait BankApi: Send + Sync {
    async fn get_customer_by_id(&self, id: &str) -> Result<Customer, ClientError>;

    async fn create_current_account(
        &self,
        request: &AccountCreationRequest,
    ) -> Result<CreationResponse, ClientError>;
}

#[derive(Clone)]
pub struct HttpBankApi {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpBankApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(
            Client::new(),
            base_url,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), &config.api_url, config.timeout())
    }

    pub fn with_client(http: Client, base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: base_url.to_string(),
                reason: "expected an http(s) base URL".to_string(),
            });
        }

        Ok(Self {
            http,
            base_url: parsed,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    /// Dot segments are refused: `Url` drops them, even percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(ClientError::InvalidSegment {
                segment: dot.to_string(),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "cannot append path segments".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

#[async_trait]
impl BankApi for HttpBankApi {
    async fn get_customer_by_id(&self, id: &str) -> Result<Customer, ClientError> {
        let url = self.endpoint(&["customer", id])?;
        debug!(%url, "GET customer");

        let response = self
            .http
            .get(url)
            .headers(Self::json_headers())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                warn!(customer_id = id, error = %e, "customer lookup did not reach the API");
                ClientError::Transport(e)
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(ClientError::Transport)?;

        if !status.is_success() {
            let message = ApiErrorBody::from_bytes(&body).and_then(|b| b.summary());
            warn!(customer_id = id, status = status.as_u16(), "customer lookup rejected");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice::<Customer>(&body).map_err(|source| {
            warn!(customer_id = id, error = %source, "customer body did not decode");
            ClientError::Decode {
                what: "customer",
                source,
            }
        })
    }

    async fn create_current_account(
        &self,
        request: &AccountCreationRequest,
    ) -> Result<CreationResponse, ClientError> {
        let url = self.endpoint(&["account", "current"])?;
        debug!(%url, customer_id = %request.customer_id, "POST current account");

        let response = self
            .http
            .post(url)
            .headers(Self::json_headers())
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(customer_id = %request.customer_id, error = %e, "account creation did not reach the API");
                ClientError::Transport(e)
            })?;

        let status = response.status();
        let ok = status.is_success();

        let message = if ok {
            None
        } else {
            // Body is only read for an explanation; a failed read is not an error here
            let body = response.bytes().await.unwrap_or_default();
            warn!(customer_id = %request.customer_id, status = status.as_u16(), "account creation rejected");
            ApiErrorBody::from_bytes(&body).and_then(|b| b.summary())
        };

        Ok(CreationResponse {
            status: status.as_u16(),
            ok,
            message,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unusable_base_urls() {
        assert!(matches!(
            HttpBankApi::new("not a url"),
            Err(ClientError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpBankApi::new("mailto:bank@example.com"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let api = HttpBankApi::new("http://localhost:8080/api/bank/v1").unwrap();
        let url = api.endpoint(&["customer", "7"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/bank/v1/customer/7");

        // Trailing slash on the base does not double up
        let api = HttpBankApi::new("http://localhost:8080/api/bank/v1/").unwrap();
        let url = api.endpoint(&["account", "current"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/bank/v1/account/current");
    }

    #[test]
    fn test_customer_id_is_a_single_segment() {
        let api = HttpBankApi::new("http://localhost:8080/api/bank/v1").unwrap();
        let url = api.endpoint(&["customer", "1/../admin"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/bank/v1/customer/1%2F..%2Fadmin"
        );
    }

    #[test]
    fn test_dot_customer_ids_are_refused() {
        let api = HttpBankApi::new("http://localhost:8080/api/bank/v1").unwrap();

        for id in ["..", "."] {
            match api.endpoint(&["customer", id]) {
                Err(ClientError::InvalidSegment { segment }) => assert_eq!(segment, id),
                other => panic!("expected {:?} to be refused, got {:?}", id, other),
            }
        }

        // Dots inside a longer id are ordinary characters
        let url = api.endpoint(&["customer", "..."]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/bank/v1/customer/...");
    }

    #[test]
    fn test_from_config_uses_configured_url() {
        let config = ClientConfig::default().with_api_url("https://bank.example.com/api/bank/v1");
        let api = HttpBankApi::from_config(&config).unwrap();
        assert_eq!(api.base_url().host_str(), Some("bank.example.com"));
        assert_eq!(api.timeout, config.timeout());
    }
}
