//! CSV normalization.
//!
//! Hand-rolled tokenizer for one dialect: comma-separated fields with
//! `"`-quoted values, where a backslash-escaped quote (`\"`) does not toggle
//! quote state. Embedded commas are only valid inside quotes.
//!
//! The header row is split on bare commas (quote-insensitive) while data rows
//! are tokenized quote-aware. The asymmetry is observable behavior and is
//! kept as-is; see the crate docs for the open question around it.

use crate::error::{ParseError, ParseResult};
use crate::types::Record;

/// Tokenize CSV text into one header-keyed [`Record`] per data line.
///
/// Rules:
///
/// - Blank (whitespace-only) lines are dropped everywhere, including before
///   the header scan, so a blank line cannot stand in for an empty row.
/// - The first surviving line supplies the headers.
/// - Fields beyond the header count are dropped; headers beyond the field
///   count map to the empty string.
/// - Rows come back in source order.
pub fn normalize_csv(input: &str) -> ParseResult<Vec<Record>> {
    if input.trim().is_empty() {
        return Err(ParseError::with_raw("Empty CSV file", input));
    }

    let lines: Vec<&str> = input.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return Err(ParseError::with_raw("No data found in CSV file", input));
    }

    // Header split deliberately ignores quoting.
    let headers: Vec<String> = lines[0].split(',').map(clean_field).collect();

    let mut rows = Vec::with_capacity(lines.len().saturating_sub(1));
    for line in &lines[1..] {
        let fields = tokenize_row(line.trim());
        let mut record = Record::new();
        for (idx, header) in headers.iter().enumerate() {
            let value = fields.get(idx).cloned().unwrap_or_default();
            record.insert(header.clone(), value);
        }
        rows.push(record);
    }

    Ok(rows)
}

/// Quote-aware field splitter for data rows.
///
/// A single boolean tracks quote state: a `"` not preceded by a literal `\`
/// toggles it (and is dropped from the field), a `,` outside quotes ends the
/// current field, and every other character is appended. The final field is
/// flushed after the loop; no trailing delimiter is required.
fn tokenize_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut prev: Option<char> = None;

    for ch in line.chars() {
        if ch == '"' && prev != Some('\\') {
            in_quote = !in_quote;
        } else if ch == ',' && !in_quote {
            fields.push(clean_field(&current));
            current.clear();
        } else {
            current.push(ch);
        }
        prev = Some(ch);
    }
    fields.push(clean_field(&current));

    fields
}

/// Trim a raw field and strip one surrounding quote layer if present.
///
/// Any mix of `"` and `'` at the two ends counts as a layer, matching the
/// header/data cleanup the consumers rely on.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2
        && matches!(bytes[0], b'"' | b'\'')
        && matches!(bytes[bytes.len() - 1], b'"' | b'\'')
    {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}
