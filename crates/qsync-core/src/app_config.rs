use std::net::SocketAddr;

/// Process-wide configuration, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub qikink: QikinkSettings,
}

/// Connection settings for the Qikink commerce API.
///
/// `client_id`/`client_secret` are optional at startup: the service boots
/// without them and the sync route fails with an authentication error
/// until they are provided.
#[derive(Clone)]
pub struct QikinkSettings {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_url: String,
    pub products_url: String,
    pub token_timeout_secs: u64,
    pub products_timeout_secs: u64,
}

impl std::fmt::Debug for QikinkSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QikinkSettings")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("token_url", &self.token_url)
            .field("products_url", &self.products_url)
            .field("token_timeout_secs", &self.token_timeout_secs)
            .field("products_timeout_secs", &self.products_timeout_secs)
            .finish()
    }
}
