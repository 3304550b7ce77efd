mod credentials;
mod runs;
mod sanitize;
mod store;

pub use credentials::{resolve_credentials, resolve_credentials_from_env, ServiceAccount};
pub use runs::SyncRunRecord;
pub use sanitize::sanitize_partition;
pub use store::ProductStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid service account: {0}")]
    Credential(String),
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
    #[error("bson encode error: {0}")]
    Bson(#[from] bson::ser::Error),
}
