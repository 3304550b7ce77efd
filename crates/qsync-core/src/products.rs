use serde::{Deserialize, Serialize};

/// A catalog record normalized for persistence.
///
/// Produced by the mapper from an untyped upstream record; every field has
/// a safe default, so mapping is total. `product_type` doubles as the
/// partition key and `product_id` as the document key. `raw` carries the
/// verbatim upstream record for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedProduct {
    pub product_id: String,
    pub name: String,
    pub design: String,
    pub sku: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub price: f64,
    pub image: String,
    pub raw: serde_json::Value,
}
