//! Upload dispatch: detect the format from the file name, run the matching
//! normalizer over the raw bytes, and build the boundary envelope.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::error::ParseError;
use crate::types::{ParsedData, ParsedPayload, UploadResponse};

use super::observability::{NormalizeContext, NormalizeObserver, NormalizeSeverity, NormalizeStats};
use super::{csv, json, xml};

/// Supported upload formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `.json` documents, normalized to a tree.
    Json,
    /// `.xml` documents, normalized to a tree.
    Xml,
    /// `.csv` text, normalized to a row set.
    Csv,
    /// `.xlsx` / `.xls` workbooks, normalized to a row set.
    Excel,
}

impl FileKind {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Detect the format from a file name's last `.`-suffix.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Whether this format consumes text (lossy UTF-8) rather than raw bytes.
    pub fn is_text(self) -> bool {
        !matches!(self, Self::Excel)
    }
}

/// Boundary-level rejection, reported before any normalizer runs.
///
/// Distinct from [`ParseError`]: dispatch failures map to an HTTP 4xx at the
/// boundary, while normalization failures travel inside a 200 envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// File extension missing or not one of `json|xml|csv|xlsx|xls`.
    #[error("Unsupported file format. Please upload JSON, XML, CSV, or Excel files.")]
    UnsupportedExtension,
}

/// Documented UI-side upload limit, used as the default defensive cap.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Options controlling upload normalization.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct NormalizeOptions {
    /// Inputs larger than this are rejected before any format work, to bound
    /// memory and time on pathological uploads.
    pub max_input_bytes: usize,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn NormalizeObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: NormalizeSeverity,
}

impl fmt::Debug for NormalizeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizeOptions")
            .field("max_input_bytes", &self.max_input_bytes)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            observer: None,
            alert_at_or_above: NormalizeSeverity::Critical,
        }
    }
}

/// Normalize one uploaded file.
///
/// Detects the format from `file_name`, decodes text formats from `bytes`
/// with lossy UTF-8, and runs the matching normalizer. The outer `Err` is a
/// boundary rejection (unsupported extension); the inner value is the
/// normalizer's own success-or-error result, which the boundary returns
/// inside a 200 envelope either way.
///
/// When an observer is configured, this reports `on_success` with row stats,
/// `on_failure` with a computed severity, and `on_alert` when that severity
/// meets `options.alert_at_or_above`.
///
/// # Examples
///
/// ```
/// use file_normalizer::normalize::{normalize_upload, NormalizeOptions};
/// use file_normalizer::types::ParsedData;
///
/// let csv = b"name,val\na,\"1,2\"\n";
/// let outcome = normalize_upload("data.csv", csv, &NormalizeOptions::default())
///     .expect("csv is a supported extension");
/// let rows = match outcome.expect("well-formed csv") {
///     ParsedData::Table(rows) => rows,
///     ParsedData::Tree(_) => unreachable!("csv is table-shaped"),
/// };
/// assert_eq!(rows[0]["val"], "1,2");
/// ```
pub fn normalize_upload(
    file_name: &str,
    bytes: &[u8],
    options: &NormalizeOptions,
) -> Result<Result<ParsedData, ParseError>, DispatchError> {
    let kind = FileKind::from_file_name(file_name).ok_or(DispatchError::UnsupportedExtension)?;

    let (result, severity) = if bytes.len() > options.max_input_bytes {
        let err = ParseError::bare(format!(
            "Input of {} bytes exceeds the {} byte limit",
            bytes.len(),
            options.max_input_bytes
        ));
        (Err(err), NormalizeSeverity::Critical)
    } else {
        (normalize_bytes(kind, bytes), NormalizeSeverity::Error)
    };

    if let Some(obs) = options.observer.as_ref() {
        let ctx = NormalizeContext {
            file_name: file_name.to_string(),
            kind,
        };
        match &result {
            Ok(data) => obs.on_success(&ctx, NormalizeStats::for_data(data)),
            Err(err) => {
                obs.on_failure(&ctx, severity, err);
                if severity >= options.alert_at_or_above {
                    obs.on_alert(&ctx, severity, err);
                }
            }
        }
    }

    Ok(result)
}

/// Run the format-specific normalizer over raw bytes.
///
/// Text formats are decoded with lossy UTF-8 first; workbooks get the bytes
/// as-is.
pub fn normalize_bytes(kind: FileKind, bytes: &[u8]) -> Result<ParsedData, ParseError> {
    match kind {
        FileKind::Json => {
            json::normalize_json(&String::from_utf8_lossy(bytes)).map(ParsedData::Tree)
        }
        FileKind::Xml => xml::normalize_xml(&String::from_utf8_lossy(bytes)).map(ParsedData::Tree),
        FileKind::Csv => csv::normalize_csv(&String::from_utf8_lossy(bytes)).map(ParsedData::Table),
        FileKind::Excel => normalize_excel_dispatch(bytes),
    }
}

fn normalize_excel_dispatch(bytes: &[u8]) -> Result<ParsedData, ParseError> {
    // Avoid unused warnings when the feature is off.
    let _ = bytes;

    #[cfg(feature = "excel")]
    {
        super::excel::normalize_excel(bytes).map(ParsedData::Table)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(ParseError::bare(
            "Excel normalization not enabled (enable cargo feature 'excel')",
        ))
    }
}

/// Build the boundary's `{ parsedData: ... }` envelope for one upload.
///
/// Boundary rejections are folded into the same error object shape the
/// normalizers use; the HTTP status distinction stays the server's concern.
pub fn upload_response(
    file_name: &str,
    bytes: &[u8],
    options: &NormalizeOptions,
) -> UploadResponse {
    let parsed_data = match normalize_upload(file_name, bytes, options) {
        Ok(Ok(data)) => ParsedPayload::Data(data),
        Ok(Err(err)) => ParsedPayload::Error(err),
        Err(dispatch) => ParsedPayload::Error(ParseError::bare(dispatch.to_string())),
    };
    UploadResponse { parsed_data }
}
