//! Upload normalization entrypoints and the four format normalizers.
//!
//! Most callers should use [`normalize_upload`] (from [`unified`]) which:
//!
//! - detects the format from the uploaded file name (`json|xml|csv|xlsx|xls`)
//! - decodes text formats from the raw bytes (lossy UTF-8)
//! - runs the matching normalizer and optionally reports the outcome to a
//!   [`NormalizeObserver`]
//!
//! Format-specific functions are also available under:
//! - [`json`] and [`xml`] (tree-shaped output)
//! - [`csv`] and [`excel`] (table-shaped output)
//!
//! The four normalizers share no code, only the contract: a pure function
//! over a fully-buffered input that returns the normalized value or a
//! [`crate::error::ParseError`], and never panics on malformed input.

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod observability;
pub mod unified;
pub mod xml;

pub use observability::{
    CompositeObserver, FileObserver, NormalizeContext, NormalizeObserver, NormalizeSeverity,
    NormalizeStats, StdErrObserver,
};
pub use unified::{
    normalize_bytes, normalize_upload, upload_response, DispatchError, FileKind, NormalizeOptions,
    DEFAULT_MAX_INPUT_BYTES,
};
