use thiserror::Error;

/// Convenience result type for normalization operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum number of characters of raw input echoed back in an error preview.
pub const PREVIEW_CHAR_LIMIT: usize = 200;

/// Error value produced by the four normalizers.
///
/// A normalizer never panics on malformed input; every failure, including
/// decoder faults, is folded into this shape so the boundary can hand it to
/// the renderer inside a success envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable diagnostic, prefixed with the format that failed.
    pub message: String,
    /// Truncated prefix of the raw input for text formats; `None` for binary
    /// (spreadsheet) input, which has no useful text prefix.
    pub original_data_preview: Option<String>,
}

impl ParseError {
    /// Error with a preview computed from raw text input.
    pub fn with_preview(message: impl Into<String>, input: &str) -> Self {
        Self {
            message: message.into(),
            original_data_preview: Some(preview(input)),
        }
    }

    /// Error carrying the raw input verbatim, untruncated.
    ///
    /// The empty-CSV cases keep the whole original rather than a truncated
    /// preview.
    pub fn with_raw(message: impl Into<String>, input: &str) -> Self {
        Self {
            message: message.into(),
            original_data_preview: Some(input.to_string()),
        }
    }

    /// Error with no preview.
    pub fn bare(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            original_data_preview: None,
        }
    }
}

/// First [`PREVIEW_CHAR_LIMIT`] characters of `input`, with a trailing `...`
/// marker when the input is longer.
pub fn preview(input: &str) -> String {
    match input.char_indices().nth(PREVIEW_CHAR_LIMIT) {
        Some((byte_idx, _)) => format!("{}...", &input[..byte_idx]),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{preview, PREVIEW_CHAR_LIMIT};

    #[test]
    fn preview_keeps_short_input_verbatim() {
        assert_eq!(preview("hello"), "hello");
        assert_eq!(preview(""), "");
    }

    #[test]
    fn preview_at_exact_limit_has_no_marker() {
        let input = "x".repeat(PREVIEW_CHAR_LIMIT);
        assert_eq!(preview(&input), input);
    }

    #[test]
    fn preview_truncates_past_limit() {
        let input = "x".repeat(PREVIEW_CHAR_LIMIT + 50);
        let p = preview(&input);
        assert_eq!(p.chars().count(), PREVIEW_CHAR_LIMIT + 3);
        assert!(p.ends_with("..."));
        assert!(p.starts_with(&input[..PREVIEW_CHAR_LIMIT]));
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let input = "é".repeat(PREVIEW_CHAR_LIMIT + 1);
        let p = preview(&input);
        assert_eq!(p.chars().count(), PREVIEW_CHAR_LIMIT + 3);
        assert!(p.ends_with("..."));
    }
}
