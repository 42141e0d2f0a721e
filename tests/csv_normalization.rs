use file_normalizer::normalize::csv::normalize_csv;
use file_normalizer::types::Record;

fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn normalize_csv_happy_path() {
    let rows = normalize_csv("name,score\nAda,98.5\nGrace,87.25\n").unwrap();
    assert_eq!(
        rows,
        vec![
            record(&[("name", "Ada"), ("score", "98.5")]),
            record(&[("name", "Grace"), ("score", "87.25")]),
        ]
    );
}

#[test]
fn quoted_fields_keep_embedded_commas() {
    let rows = normalize_csv("name,val\na,\"1,2\"\nb,3").unwrap();
    assert_eq!(
        rows,
        vec![
            record(&[("name", "a"), ("val", "1,2")]),
            record(&[("name", "b"), ("val", "3")]),
        ]
    );
}

#[test]
fn short_rows_pad_missing_cells_with_empty_string() {
    let rows = normalize_csv("a,b,c\n1,2\n").unwrap();
    assert_eq!(rows, vec![record(&[("a", "1"), ("b", "2"), ("c", "")])]);
}

#[test]
fn extra_fields_beyond_headers_are_dropped() {
    let rows = normalize_csv("a,b\n1,2,3,4\n").unwrap();
    assert_eq!(rows, vec![record(&[("a", "1"), ("b", "2")])]);
}

#[test]
fn empty_input_is_rejected_with_raw_preview() {
    let err = normalize_csv("").unwrap_err();
    assert_eq!(err.message, "Empty CSV file");
    assert_eq!(err.original_data_preview.as_deref(), Some(""));

    let err = normalize_csv("   \n\t\n").unwrap_err();
    assert_eq!(err.message, "Empty CSV file");
    assert_eq!(err.original_data_preview.as_deref(), Some("   \n\t\n"));
}

#[test]
fn blank_lines_are_skipped_everywhere() {
    // Blank lines before the header, between rows, and at the end all vanish,
    // so a blank line cannot stand in for an intentional empty row.
    let rows = normalize_csv("\n\nname,val\n\na,1\n\n\nb,2\n\n").unwrap();
    assert_eq!(
        rows,
        vec![
            record(&[("name", "a"), ("val", "1")]),
            record(&[("name", "b"), ("val", "2")]),
        ]
    );
}

#[test]
fn duplicate_headers_overwrite_earlier_columns() {
    let rows = normalize_csv("a,a\n1,2\n").unwrap();
    assert_eq!(rows, vec![record(&[("a", "2")])]);
}

#[test]
fn headers_are_trimmed_and_unwrapped_of_one_quote_layer() {
    let rows = normalize_csv("\"name\" , 'val'\nx,y\n").unwrap();
    assert_eq!(rows, vec![record(&[("name", "x"), ("val", "y")])]);
}

#[test]
fn header_split_ignores_quoting_while_data_rows_honor_it() {
    // The header row is split on bare commas even inside quotes, so a quoted
    // header containing a comma becomes two mangled headers. Data rows are
    // quote-aware. Observable behavior, kept as-is.
    let rows = normalize_csv("\"a,b\",c\n\"1,2\",3\n").unwrap();
    assert_eq!(
        rows,
        vec![record(&[("\"a", "1,2"), ("b\"", "3"), ("c", "")])]
    );
}

#[test]
fn backslash_escaped_quotes_do_not_toggle_quote_state() {
    let rows = normalize_csv("msg,tag\n\"he said \\\"hi\\\", ok\",x\n").unwrap();
    assert_eq!(
        rows,
        vec![record(&[("msg", "he said \\\"hi\\\", ok"), ("tag", "x")])]
    );
}

#[test]
fn crlf_line_endings_are_handled() {
    let rows = normalize_csv("a,b\r\n1,2\r\n").unwrap();
    assert_eq!(rows, vec![record(&[("a", "1"), ("b", "2")])]);
}

#[test]
fn rows_come_back_in_source_order() {
    let rows = normalize_csv("n\n3\n1\n2\n").unwrap();
    let values: Vec<&str> = rows.iter().map(|r| r["n"].as_str()).collect();
    assert_eq!(values, vec!["3", "1", "2"]);
}
