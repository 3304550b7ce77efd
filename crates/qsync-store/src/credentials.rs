//! Store credential resolution.
//!
//! The credential bundle comes from `QSYNC_SERVICE_ACCOUNT` as inline
//! JSON or base64-encoded JSON; an invalid inline value is a hard error
//! (the process must not start). Absent the variable, ambient discovery
//! falls back to `MONGODB_URI` / `QSYNC_DATABASE` with local defaults.

use base64::Engine as _;
use serde::Deserialize;

use crate::StoreError;

const DEFAULT_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "qikink";

/// Connection credential bundle for the document store.
///
/// The URI may embed a password; the bundle is never logged and its
/// `Debug` impl redacts it.
#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("uri", &"[redacted]")
            .field("database", &self.database)
            .finish()
    }
}

/// Resolves store credentials from the process environment.
///
/// # Errors
///
/// Returns [`StoreError::Credential`] if `QSYNC_SERVICE_ACCOUNT` is set
/// but is neither valid JSON nor valid base64-encoded JSON.
pub fn resolve_credentials_from_env() -> Result<ServiceAccount, StoreError> {
    resolve_credentials(|key| std::env::var(key))
}

/// Resolves store credentials using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a pure
/// `HashMap` lookup.
///
/// # Errors
///
/// Returns [`StoreError::Credential`] if the inline value cannot be
/// decoded.
pub fn resolve_credentials<F>(lookup: F) -> Result<ServiceAccount, StoreError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    if let Ok(inline) = lookup("QSYNC_SERVICE_ACCOUNT") {
        return parse_service_account(&inline);
    }

    Ok(ServiceAccount {
        uri: lookup("MONGODB_URI").unwrap_or_else(|_| DEFAULT_URI.to_string()),
        database: lookup("QSYNC_DATABASE").unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
    })
}

/// Parses an inline credential value: JSON first, then base64-encoded JSON.
fn parse_service_account(raw: &str) -> Result<ServiceAccount, StoreError> {
    let raw = raw.trim();

    if let Ok(account) = serde_json::from_str::<ServiceAccount>(raw) {
        return Ok(account);
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(raw)
        .map_err(|_| {
            StoreError::Credential(
                "QSYNC_SERVICE_ACCOUNT is neither valid JSON nor valid base64".to_string(),
            )
        })?;
    let decoded = String::from_utf8(decoded).map_err(|_| {
        StoreError::Credential("base64 payload in QSYNC_SERVICE_ACCOUNT is not UTF-8".to_string())
    })?;

    serde_json::from_str(&decoded).map_err(|_| {
        StoreError::Credential(
            "base64 payload in QSYNC_SERVICE_ACCOUNT is not valid credential JSON".to_string(),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn resolves_inline_json() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert(
            "QSYNC_SERVICE_ACCOUNT",
            r#"{"uri": "mongodb://db.internal:27017", "database": "shop"}"#,
        );
        let account = resolve_credentials(lookup_from_map(&map)).expect("inline JSON");
        assert_eq!(account.uri, "mongodb://db.internal:27017");
        assert_eq!(account.database, "shop");
    }

    #[test]
    fn resolves_base64_encoded_json() {
        // {"uri": "mongodb://db.internal:27017", "database": "shop"}
        let encoded = "eyJ1cmkiOiAibW9uZ29kYjovL2RiLmludGVybmFsOjI3MDE3IiwgImRhdGFiYXNlIjogInNob3AifQ==";
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("QSYNC_SERVICE_ACCOUNT", encoded);
        let account = resolve_credentials(lookup_from_map(&map)).expect("base64 JSON");
        assert_eq!(account.uri, "mongodb://db.internal:27017");
        assert_eq!(account.database, "shop");
    }

    #[test]
    fn inline_json_defaults_the_database_name() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("QSYNC_SERVICE_ACCOUNT", r#"{"uri": "mongodb://h:27017"}"#);
        let account = resolve_credentials(lookup_from_map(&map)).expect("inline JSON");
        assert_eq!(account.database, "qikink");
    }

    #[test]
    fn garbage_inline_value_is_a_hard_error() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("QSYNC_SERVICE_ACCOUNT", "not json, not base64!!!");
        let result = resolve_credentials(lookup_from_map(&map));
        assert!(
            matches!(result, Err(StoreError::Credential(_))),
            "got: {result:?}"
        );
    }

    #[test]
    fn base64_of_non_json_is_a_hard_error() {
        // base64 of "hello world"
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("QSYNC_SERVICE_ACCOUNT", "aGVsbG8gd29ybGQ=");
        let result = resolve_credentials(lookup_from_map(&map));
        assert!(
            matches!(result, Err(StoreError::Credential(_))),
            "got: {result:?}"
        );
    }

    #[test]
    fn ambient_fallback_uses_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let account = resolve_credentials(lookup_from_map(&map)).expect("ambient");
        assert_eq!(account.uri, "mongodb://localhost:27017");
        assert_eq!(account.database, "qikink");
    }

    #[test]
    fn ambient_fallback_honors_mongodb_uri_and_database() {
        let mut map: HashMap<&str, &str> = HashMap::new();
        map.insert("MONGODB_URI", "mongodb://db.prod:27017");
        map.insert("QSYNC_DATABASE", "catalog");
        let account = resolve_credentials(lookup_from_map(&map)).expect("ambient");
        assert_eq!(account.uri, "mongodb://db.prod:27017");
        assert_eq!(account.database, "catalog");
    }

    #[test]
    fn debug_output_redacts_the_uri() {
        let account = ServiceAccount {
            uri: "mongodb://user:hunter2@db:27017".to_string(),
            database: "shop".to_string(),
        };
        let rendered = format!("{account:?}");
        assert!(!rendered.contains("hunter2"), "uri leaked: {rendered}");
    }
}
