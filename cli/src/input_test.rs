use super::*;

#[test]
fn csv_with_header_is_parsed() {
    let rows = parse_rows("question,expected_answer\nWhat is 2+2?,4\nCapital of France?,Paris\n")
        .expect("valid csv");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].question, "What is 2+2?");
    assert_eq!(rows[1].expected_answer, "Paris");
}

#[test]
fn csv_without_header_keeps_first_row() {
    let rows = parse_rows("What is 2+2?,4\n").expect("valid csv");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].expected_answer, "4");
}

#[test]
fn quoted_fields_keep_commas_and_escaped_quotes() {
    let rows = parse_rows("\"List a, b, c\",\"She said \"\"yes\"\"\"\n").expect("valid csv");
    assert_eq!(rows[0].question, "List a, b, c");
    assert_eq!(rows[0].expected_answer, "She said \"yes\"");
}

#[test]
fn single_column_record_is_rejected_with_line_number() {
    let err = parse_rows("question,expected_answer\nonly one column\n").unwrap_err();
    match err {
        InputError::InvalidRecord { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn jsonl_is_sniffed_from_the_first_line() {
    let text = "{\"question\":\"Q1\",\"expected_answer\":\"A1\"}\n\n{\"question\":\"Q2\",\"expected_answer\":\"A2\"}\n";
    let rows = parse_rows(text).expect("valid jsonl");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].question, "Q2");
}

#[test]
fn malformed_jsonl_reports_line_number() {
    let err = parse_rows("{\"question\":\"Q1\",\"expected_answer\":\"A1\"}\nnot json\n").unwrap_err();
    match err {
        InputError::InvalidRecord { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_input_is_rejected() {
    assert!(matches!(parse_rows("  \n\n"), Err(InputError::Empty)));
}
