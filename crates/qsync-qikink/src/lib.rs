mod client;
mod error;
mod normalize;
mod types;

pub use client::QikinkClient;
pub use error::QikinkError;
pub use normalize::map_product;
pub use types::{TokenData, TokenResponse};
