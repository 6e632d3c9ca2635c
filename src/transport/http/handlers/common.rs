use crate::domain::Product;
use crate::transport::http::error::ApiError;
use axum::http::header::{ETAG, IF_MATCH, LOCATION};
use axum::http::{HeaderMap, HeaderValue};

/// Misspelled header name accepted for compatibility with older clients.
pub const LEGACY_IF_MATCH: &str = "if-math";

/// Path of a single product resource.
pub fn product_location(id: i32) -> String {
    format!("/products/{}", id)
}

/// Formats `value` as a strong entity tag: `"<value>"`.
pub fn quoted_etag(value: i32) -> String {
    format!("\"{}\"", value)
}

/// Returns the id of a product that came back from the repository.
///
/// A stored product always has one; if not, the location header cannot be built.
pub fn persisted_id(product: &Product) -> Result<i32, ApiError> {
    product.id.ok_or_else(|| {
        ApiError::Internal(anyhow::anyhow!(
            "repository returned a product without an id"
        ))
    })
}

/// Builds the `ETag` + `Location` pair sent with single-product responses.
pub fn entity_headers(etag: i32, id: i32) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ETAG,
        HeaderValue::from_str(&quoted_etag(etag)).map_err(|e| ApiError::Internal(e.into()))?,
    );
    headers.insert(
        LOCATION,
        HeaderValue::from_str(&product_location(id)).map_err(|e| ApiError::Internal(e.into()))?,
    );
    Ok(headers)
}

/// Reads the comparison token from `If-Match` (or the legacy `If-Math`).
///
/// Accepts `1`, `"1"` and `W/"1"`.
pub fn comparison_token(headers: &HeaderMap) -> Result<i32, ApiError> {
    let raw = headers
        .get(IF_MATCH)
        .or_else(|| headers.get(LEGACY_IF_MATCH))
        .ok_or(ApiError::MissingToken)?
        .to_str()
        .map_err(|_| ApiError::MissingToken)?
        .trim();
    let raw = raw.strip_prefix("W/").unwrap_or(raw);
    let raw = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    raw.trim().parse::<i32>().map_err(|_| ApiError::MissingToken)
}
