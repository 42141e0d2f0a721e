//! JSON normalization.

use crate::error::{ParseError, ParseResult};
use crate::types::TreeValue;

/// Decode a complete UTF-8 JSON document into a [`TreeValue`] tree.
///
/// The decoder does all the work; this function's job is boundary error
/// capture. Any decode failure (malformed syntax, truncated input, empty
/// input) becomes an `Err` carrying the decoder's diagnostic and a preview of
/// the raw input. No partial results are ever returned.
pub fn normalize_json(input: &str) -> ParseResult<TreeValue> {
    serde_json::from_str(input)
        .map_err(|e| ParseError::with_preview(format!("Failed to parse JSON: {e}"), input))
}
