//! HTTP client for the Qikink commerce API.
//!
//! Wraps `reqwest` with Qikink-specific error handling: a token exchange
//! with tolerant response-field resolution and a catalog fetch with
//! tolerant envelope resolution. No retries and no token caching — every
//! sync invocation re-authenticates.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use qsync_core::QikinkSettings;

use crate::error::QikinkError;
use crate::types::TokenResponse;

/// Client for the Qikink commerce API.
///
/// Holds the HTTP client and the endpoint/credential settings. Cheap to
/// clone; construct once at startup and share via application state.
#[derive(Debug, Clone)]
pub struct QikinkClient {
    client: Client,
    settings: QikinkSettings,
}

impl QikinkClient {
    /// Creates a new client from the configured Qikink settings.
    ///
    /// # Errors
    ///
    /// Returns [`QikinkError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(settings: QikinkSettings) -> Result<Self, QikinkError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent("qsync/0.1 (catalog-sync)")
            .build()?;
        Ok(Self { client, settings })
    }

    /// Exchanges the configured client id/secret for an access token.
    ///
    /// POSTs `{"ClientId": .., "client_secret": ..}` to the token URL and
    /// accepts the token from `access_token`, `token`, or `data.token`,
    /// in that order.
    ///
    /// # Errors
    ///
    /// - [`QikinkError::Auth`] if credentials are not configured or no
    ///   token field is present in the response.
    /// - [`QikinkError::Http`] on network failure or non-2xx status.
    /// - [`QikinkError::Decode`] if the body is not valid JSON.
    pub async fn fetch_token(&self) -> Result<String, QikinkError> {
        let (Some(client_id), Some(client_secret)) =
            (&self.settings.client_id, &self.settings.client_secret)
        else {
            return Err(QikinkError::Auth(
                "QIK_CLIENT_ID / QIK_CLIENT_SECRET are not configured".to_string(),
            ));
        };

        let response = self
            .client
            .post(&self.settings.token_url)
            .timeout(Duration::from_secs(self.settings.token_timeout_secs))
            .json(&serde_json::json!({
                "ClientId": client_id,
                "client_secret": client_secret,
            }))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| QikinkError::Decode {
                context: self.settings.token_url.clone(),
                source: e,
            })?;

        token.resolve().ok_or_else(|| {
            QikinkError::Auth(
                "token endpoint response carried no access_token, token, or data.token field"
                    .to_string(),
            )
        })
    }

    /// Fetches the product catalog using a previously obtained token.
    ///
    /// The token is sent in an `Accesstoken` header, bare, with no
    /// `Bearer` prefix — that is what the Qikink API expects — alongside
    /// the `ClientId` header. Accepts the item list from a bare array
    /// body, a `data` field, or a `products` field. Only the first
    /// response is consumed; no pagination.
    ///
    /// # Errors
    ///
    /// - [`QikinkError::Http`] on network failure or non-2xx status.
    /// - [`QikinkError::Decode`] if the body is not valid JSON.
    /// - [`QikinkError::Shape`] if the resolved value is not an array.
    pub async fn fetch_products(&self, token: &str) -> Result<Vec<Value>, QikinkError> {
        // Credentials are validated by fetch_token; the catalog call only
        // echoes the id back.
        let client_id = self.settings.client_id.as_deref().unwrap_or_default();

        let response = self
            .client
            .get(&self.settings.products_url)
            .timeout(Duration::from_secs(self.settings.products_timeout_secs))
            .header("ClientId", client_id)
            .header("Accesstoken", token)
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let envelope: Value = serde_json::from_str(&body).map_err(|e| QikinkError::Decode {
            context: self.settings.products_url.clone(),
            source: e,
        })?;

        let items = extract_items(envelope)?;
        tracing::debug!(count = items.len(), "fetched qikink catalog page");
        Ok(items)
    }
}

/// Resolves the product list out of a catalog response body.
///
/// Accepted shapes, in order: bare array, `{"data": [...]}` (skipped when
/// `data` is null), `{"products": [...]}`.
fn extract_items(envelope: Value) -> Result<Vec<Value>, QikinkError> {
    let candidate = match envelope {
        Value::Array(items) => return Ok(items),
        Value::Object(mut map) => map
            .remove("data")
            .filter(|v| !v.is_null())
            .or_else(|| map.remove("products")),
        other => {
            return Err(QikinkError::Shape(format!(
                "expected an array of products, got {}",
                json_type_name(&other)
            )))
        }
    };

    match candidate {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(QikinkError::Shape(format!(
            "expected an array of products, got {}",
            json_type_name(&other)
        ))),
        None => Err(QikinkError::Shape(
            "response object carried neither a data nor a products array".to_string(),
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
