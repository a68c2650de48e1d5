use super::*;

#[test]
fn header_row_is_skipped() {
    let rows = parse_rows("question,expected_answer\nWhat is 2+2?,4\n").expect("valid csv");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].question, "What is 2+2?");
    assert_eq!(rows[0].expected_answer, "4");
}

#[test]
fn header_variants_are_recognized() {
    for header in ["Question,Expected Answer", "QUESTION,expected_answer"] {
        let rows = parse_rows(&format!("{header}\nQ,A\n")).expect("valid csv");
        assert_eq!(rows.len(), 1, "header `{header}` should be skipped");
    }
}

#[test]
fn headerless_input_keeps_the_first_row() {
    let rows = parse_rows("Capital of France?,Paris\n").expect("valid csv");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].expected_answer, "Paris");
}

#[test]
fn quoted_fields_keep_commas_and_escaped_quotes() {
    let rows = parse_rows("\"List a, b, c\",\"She said \"\"yes\"\"\"\n").expect("valid csv");
    assert_eq!(rows[0].question, "List a, b, c");
    assert_eq!(rows[0].expected_answer, "She said \"yes\"");
}

#[test]
fn blank_lines_are_ignored() {
    let rows = parse_rows("question,expected_answer\n\nQ1,A1\n\nQ2,A2\n").expect("valid csv");
    assert_eq!(rows.len(), 2);
}

#[test]
fn single_column_record_reports_its_line() {
    let err = parse_rows("question,expected_answer\nonly one column\n").unwrap_err();
    match err {
        CsvError::InvalidRecord { line, .. } => assert_eq!(line, 2),
        CsvError::Empty => panic!("expected a record error"),
    }
}

#[test]
fn header_only_input_is_empty() {
    assert!(matches!(parse_rows("question,expected_answer\n"), Err(CsvError::Empty)));
}
