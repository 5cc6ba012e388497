//! Typed wrappers over the upstream dashboard API.
//!
//! Only `account-totals`/`since-inception-values` feed the equity chart
//! and carry a modeled response shape; the remaining panels consume
//! their payloads as-is, so those endpoints pass `serde_json::Value`
//! through untouched.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// All errors generated in `arena-client`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error calling upstream: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned non-success status {status} for {endpoint}")]
    Status {
        endpoint: String,
        status: StatusCode,
    },
}

/// Response envelope for the equity snapshot endpoints.
///
/// Records stay as raw JSON objects: the ingestor resolves field-name
/// drift via its configured candidate lists, so decoding to a fixed
/// struct here would undo that flexibility.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountTotalsResponse {
    #[serde(rename = "accountTotals", default)]
    pub account_totals: Vec<Value>,
}

/// HTTP client for the upstream API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Full equity history, or the increment past `last_hourly_marker`
    /// when a cursor is supplied.
    pub async fn account_totals(
        &self,
        last_hourly_marker: Option<u64>,
    ) -> Result<AccountTotalsResponse, ClientError> {
        let mut url = self.endpoint("account-totals");
        if let Some(marker) = last_hourly_marker {
            url.query_pairs_mut()
                .append_pair("lastHourlyMarker", &marker.to_string());
        }
        self.get_json(url).await
    }

    /// Alternate equity history endpoint, same envelope shape.
    pub async fn since_inception_values(&self) -> Result<AccountTotalsResponse, ClientError> {
        self.get_json(self.endpoint("since-inception-values")).await
    }

    pub async fn crypto_prices(&self) -> Result<Value, ClientError> {
        self.get_json(self.endpoint("crypto-prices")).await
    }

    pub async fn positions(&self, limit: u32) -> Result<Value, ClientError> {
        let mut url = self.endpoint("positions");
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }

    pub async fn trades(&self) -> Result<Value, ClientError> {
        self.get_json(self.endpoint("trades")).await
    }

    pub async fn leaderboard(&self) -> Result<Value, ClientError> {
        self.get_json(self.endpoint("leaderboard")).await
    }

    pub async fn analytics(&self) -> Result<Value, ClientError> {
        self.get_json(self.endpoint("analytics")).await
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .expect("base URL validated as non-opaque at construction");
            segments.pop_if_empty().push(path);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let endpoint = url.to_string();
        debug!(%endpoint, "fetching upstream endpoint");

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status {
                endpoint,
                status: response.status(),
            });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ApiClient {
        ApiClient::new(Url::parse("http://127.0.0.1:8080/api").unwrap())
    }

    #[test]
    fn test_endpoint_joins_base_path() {
        assert_eq!(
            client().endpoint("account-totals").as_str(),
            "http://127.0.0.1:8080/api/account-totals"
        );
        // Trailing slash on the base collapses rather than doubling.
        let slashed = ApiClient::new(Url::parse("http://127.0.0.1:8080/api/").unwrap());
        assert_eq!(
            slashed.endpoint("trades").as_str(),
            "http://127.0.0.1:8080/api/trades"
        );
    }

    #[test]
    fn test_account_totals_envelope_decodes() {
        let response: AccountTotalsResponse = serde_json::from_value(json!({
            "accountTotals": [
                {"model_id": "a", "timestamp": 1_730_000_000, "dollar_equity": 10123.5},
                {"model_id": "b", "timestamp": 1_730_000_000, "equity": 9876.0}
            ]
        }))
        .unwrap();
        assert_eq!(response.account_totals.len(), 2);
    }

    #[test]
    fn test_missing_account_totals_key_decodes_empty() {
        let response: AccountTotalsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.account_totals.is_empty());
    }
}
