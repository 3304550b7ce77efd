//! Qikink API response types.
//!
//! Qikink deployments are not consistent about where the token and the
//! product list live in the response body, so these types model every
//! observed location and resolve them in a fixed priority order.

use serde::Deserialize;

/// Token endpoint response.
///
/// The token has been observed at top-level `access_token`, top-level
/// `token`, and nested `data.token`; all three are optional here and
/// [`TokenResponse::resolve`] applies them in that order.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub data: Option<TokenData>,
}

/// Nested `data` object of a token response.
#[derive(Debug, Deserialize)]
pub struct TokenData {
    #[serde(default)]
    pub token: Option<String>,
}

impl TokenResponse {
    /// Returns the first non-empty token among the accepted locations.
    #[must_use]
    pub fn resolve(self) -> Option<String> {
        self.access_token
            .or(self.token)
            .or_else(|| self.data.and_then(|d| d.token))
            .filter(|t| !t.is_empty())
    }
}
