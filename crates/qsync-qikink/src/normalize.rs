//! Normalization of raw Qikink catalog records into [`MappedProduct`]s.
//!
//! Upstream records are schema-free; each mapped attribute is resolved
//! through a fixed priority list of known source keys, first non-empty
//! match wins. Mapping is total — every attribute has a safe default.

use chrono::{DateTime, Utc};
use serde_json::Value;

use qsync_core::MappedProduct;

/// Source keys tried, in order, for each mapped attribute.
const ID_KEYS: &[&str] = &["id", "product_id", "productId", "sku"];
const NAME_KEYS: &[&str] = &["name", "product_name", "title", "Product"];
const DESIGN_KEYS: &[&str] = &["design", "design_name", "design_code"];
const SKU_KEYS: &[&str] = &["sku", "product_sku", "sku_code"];
const TYPE_KEYS: &[&str] = &["type", "product_type", "category"];
const PRICE_KEYS: &[&str] = &[
    "price",
    "Product Price (Starts from)",
    "price_start",
    "price_from",
];
const IMAGE_KEYS: &[&str] = &["image", "image_url", "mockup_url"];

const DEFAULT_TYPE: &str = "uncategorized";

/// Maps one upstream catalog record into a [`MappedProduct`].
///
/// `now` is the fallback of last resort for the product id: a record with
/// none of the known id keys gets `now` as epoch milliseconds. That id is
/// neither stable nor unique — two id-less records mapped in the same
/// millisecond collide and overwrite each other downstream.
#[must_use]
pub fn map_product(record: &Value, now: DateTime<Utc>) -> MappedProduct {
    let product_id =
        first_text(record, ID_KEYS).unwrap_or_else(|| now.timestamp_millis().to_string());

    let image = record
        .get("images")
        .and_then(Value::as_array)
        .and_then(|images| images.first())
        .and_then(text_value)
        .or_else(|| first_text(record, IMAGE_KEYS))
        .unwrap_or_default();

    MappedProduct {
        product_id,
        name: first_text(record, NAME_KEYS).unwrap_or_default(),
        design: first_text(record, DESIGN_KEYS).unwrap_or_default(),
        sku: first_text(record, SKU_KEYS).unwrap_or_default(),
        product_type: first_text(record, TYPE_KEYS).unwrap_or_else(|| DEFAULT_TYPE.to_string()),
        price: mapped_price(record),
        image,
        raw: record.clone(),
    }
}

/// First non-empty textual value among `keys`. Numbers are coerced to
/// their string form (upstream ids are sometimes numeric).
fn first_text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text_value(record.get(*key)?))
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric coercion of the first present price key. Absent, non-numeric,
/// or negative values yield 0 — never an error.
fn mapped_price(record: &Value) -> f64 {
    let Some(value) = PRICE_KEYS.iter().find_map(|key| record.get(*key)) else {
        return 0.0;
    };

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(price) if price.is_finite() => price.max(0.0),
        _ => 0.0,
    }
}
