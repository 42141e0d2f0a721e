#![cfg(feature = "excel")]

//! Spreadsheet normalization.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::{ParseError, ParseResult};
use crate::types::Record;

/// Decode a binary workbook and flatten its first sheet into header-keyed
/// rows.
///
/// The sheet at index 0 is selected unconditionally (multi-sheet handling is
/// out of scope); a workbook with zero sheets is an error. The first row of
/// the used range supplies the keys. Every cell is stringified; cells absent
/// from short rows become the empty string. Failures carry no input preview.
pub fn normalize_excel(bytes: &[u8]) -> ParseResult<Vec<Record>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ParseError::bare(format!("Failed to parse Excel file: {e}")))?;

    let first_sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ParseError::bare("Failed to parse Excel file: workbook has no sheets"))?;

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| ParseError::bare(format!("Failed to parse Excel file: {e}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_to_string).collect(),
        // A sheet with no used range normalizes to zero records.
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in rows {
        let mut record = Record::new();
        for (idx, header) in headers.iter().enumerate() {
            let value = row.get(idx).map(cell_to_string).unwrap_or_default();
            record.insert(header.clone(), value);
        }
        records.push(record);
    }

    Ok(records)
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // Whole floats render without a trailing ".0" so integer-looking
            // cells stay integer-looking.
            if f.fract() == 0.0 && f.abs() < 1e15 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
    }
}
