//! Normalized value shapes shared by all four normalizers.
//!
//! A successful normalization is either tree-shaped ([`TreeValue`], produced
//! by JSON and XML) or table-shaped (`Vec<`[`Record`]`>`, produced by CSV and
//! spreadsheets). The two shapes never mix within one result; [`ParsedData`]
//! makes the distinction an explicit variant so renderers dispatch on a tag
//! instead of inspecting structure at runtime.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Tree-shaped normalized value.
///
/// Untagged, so it serializes to and deserializes from plain JSON: `null`,
/// booleans, numbers, strings, arrays, and objects map directly onto the
/// variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeValue {
    /// Missing/explicit-null value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer or floating point number.
    Number(serde_json::Number),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence of values.
    Sequence(Vec<TreeValue>),
    /// Key-to-value mapping (object).
    Mapping(BTreeMap<String, TreeValue>),
}

impl TreeValue {
    /// Returns the mapping entries if this value is a [`TreeValue::Mapping`].
    pub fn as_mapping(&self) -> Option<&BTreeMap<String, TreeValue>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the items if this value is a [`TreeValue::Sequence`].
    pub fn as_sequence(&self) -> Option<&[TreeValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for TreeValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// A single flat row: header name to cell text.
///
/// Later duplicate headers overwrite earlier ones; cells absent on a short
/// row are the empty string.
pub type Record = BTreeMap<String, String>;

/// Result shape of a successful normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedData {
    /// Recursive object/array/scalar tree (JSON, XML).
    Tree(TreeValue),
    /// Flat row set keyed by header (CSV, spreadsheets).
    Table(Vec<Record>),
}

/// What the upload boundary places under `parsedData`: the normalized value
/// or the error object. Both travel in a success (HTTP 200) envelope; only
/// boundary-level rejections map to error statuses.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPayload {
    /// Successful normalization.
    Data(ParsedData),
    /// Normalization failure, rendered as an error panel.
    Error(ParseError),
}

impl From<Result<ParsedData, ParseError>> for ParsedPayload {
    fn from(result: Result<ParsedData, ParseError>) -> Self {
        match result {
            Ok(data) => Self::Data(data),
            Err(err) => Self::Error(err),
        }
    }
}

impl Serialize for ParsedPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Data(data) => data.serialize(serializer),
            Self::Error(err) => {
                // Wire shape consumed by the renderer:
                // { "error": true, "message": ..., "originalData": ... }
                let fields = if err.original_data_preview.is_some() { 3 } else { 2 };
                let mut map = serializer.serialize_map(Some(fields))?;
                map.serialize_entry("error", &true)?;
                map.serialize_entry("message", &err.message)?;
                if let Some(preview) = &err.original_data_preview {
                    map.serialize_entry("originalData", preview)?;
                }
                map.end()
            }
        }
    }
}

/// Response envelope produced by the upload boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadResponse {
    /// Normalized data or error descriptor for the uploaded file.
    #[serde(rename = "parsedData")]
    pub parsed_data: ParsedPayload,
}
