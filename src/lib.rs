//! `file-normalizer` turns a user-supplied data file (JSON, XML, CSV, or an
//! Excel workbook) into a single normalized in-memory value suitable for
//! generic display: either a tree of objects/arrays/scalars
//! ([`types::TreeValue`]) or a flat row set of header-keyed records
//! ([`types::Record`]).
//!
//! The primary entrypoint is [`normalize::normalize_upload`], which detects
//! the format from the file extension and dispatches the raw bytes to one of
//! four independent normalizers:
//!
//! - **JSON**: a full decode via serde_json; this normalizer only adds
//!   boundary error capture.
//! - **XML**: an event-walk decode into JSON's shape, with attributes merged
//!   under `@_` keys, scalar type coercion, and a fixed forced-array policy
//!   for two known record-bearing tags.
//! - **CSV**: a hand-rolled quote-aware tokenizer producing one record per
//!   data line.
//! - **Excel**: first-sheet-only workbook flattening into records.
//!
//! Every normalizer returns a [`Result`]; malformed input of any kind,
//! including truncated or binary garbage, comes back as an
//! [`error::ParseError`] carrying a truncated preview of the raw text (for
//! text formats). Nothing panics past a normalizer boundary.
//!
//! ## Quick example
//!
//! ```
//! use file_normalizer::normalize::{normalize_upload, NormalizeOptions};
//! use file_normalizer::types::ParsedData;
//!
//! let outcome = normalize_upload(
//!     "people.csv",
//!     b"name,val\na,\"1,2\"\nb,3\n",
//!     &NormalizeOptions::default(),
//! )
//! .expect("supported extension");
//!
//! let rows = match outcome.expect("well-formed csv") {
//!     ParsedData::Table(rows) => rows,
//!     ParsedData::Tree(_) => unreachable!(),
//! };
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0]["val"], "1,2");
//! ```
//!
//! ## Modules
//!
//! - [`normalize`]: unified dispatch plus the four format normalizers
//! - [`types`]: normalized value shapes and the boundary envelope
//! - [`error`]: the shared error model and preview helper

pub mod error;
pub mod normalize;
pub mod types;

pub use error::{ParseError, ParseResult};
