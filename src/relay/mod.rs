//! Asynchronous bridge between the chat session and the page
//! automation service. A relay makes exactly one delivery attempt per
//! invocation and never raises: every failure mode (no reachable
//! target, no acknowledgement, page-side error) resolves to a
//! [`RelayResponse::Failure`] with a descriptive string.
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

/// Outcome of a single relay round trip. `Success` carries the
/// payload the page automation service returned, which may itself
/// describe a page-level failure as `{"success": false, "error": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayResponse {
    Success(Value),
    Failure(String),
}

#[async_trait]
pub trait Relay: Send + Sync {
    /// Deliver a named page automation action with its parameters and
    /// wait for the outcome. `params` must be a JSON object.
    async fn send(&self, action: &str, params: Value) -> RelayResponse;
}

/// Relay that reaches the page automation service over HTTP. The
/// service owns the page; this client only delivers `{action, ...}`
/// requests and reports outcomes. The 10 second deadline is the only
/// hard deadline anywhere in the system.
pub struct HttpRelay {
    api_base_url: String,
}

impl HttpRelay {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches("/").to_string(),
        }
    }
}

impl Default for HttpRelay {
    fn default() -> Self {
        Self::new("http://127.0.0.1:8787")
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn send(&self, action: &str, params: Value) -> RelayResponse {
        let mut body = if params.is_object() {
            params
        } else {
            json!({})
        };
        body["action"] = json!(action);

        let url = format!("{}/api/page", self.api_base_url);
        let response = reqwest::Client::new()
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(10))
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => return RelayResponse::Failure(format!("Page service unreachable: {}", e)),
        };

        if !response.status().is_success() {
            return RelayResponse::Failure(format!(
                "Page service returned status {}",
                response.status()
            ));
        }

        match response.json::<Value>().await {
            Ok(payload) => RelayResponse::Success(payload),
            Err(e) => RelayResponse::Failure(format!("No response from page service: {}", e)),
        }
    }
}
