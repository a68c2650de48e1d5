//! CSV parsing for question/expected-answer rows.
//!
//! DESIGN
//! ======
//! The server's upload endpoint and the CLI's local file loader accept the
//! same two-column dialect, so the parser lives here and both map
//! [`CsvError`] into their own error types. Double-quoted fields with `""`
//! escapes are honored; embedded newlines are not supported, which covers
//! what spreadsheet exports produce for two-column data.

#[cfg(test)]
#[path = "csv_test.rs"]
mod tests;

use crate::DatasetRow;

#[derive(Debug, thiserror::Error)]
pub enum CsvError {
    #[error("invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
    #[error("input contains no rows")]
    Empty,
}

/// Parse CSV text into dataset rows.
///
/// A `question,expected_answer` header row is recognized and skipped; blank
/// lines are ignored.
///
/// # Errors
///
/// Returns [`CsvError::InvalidRecord`] for records without two fields and
/// [`CsvError::Empty`] when no data rows remain.
pub fn parse_rows(text: &str) -> Result<Vec<DatasetRow>, CsvError> {
    let mut rows = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_record(line);
        if idx == 0 && is_header(&fields) {
            continue;
        }
        if fields.len() < 2 {
            return Err(CsvError::InvalidRecord {
                line: idx + 1,
                reason: "expected two columns: question, expected_answer".to_owned(),
            });
        }
        rows.push(DatasetRow {
            question: fields[0].trim().to_owned(),
            expected_answer: fields[1].trim().to_owned(),
        });
    }

    if rows.is_empty() {
        return Err(CsvError::Empty);
    }
    Ok(rows)
}

fn is_header(fields: &[String]) -> bool {
    fields.len() >= 2
        && fields[0].trim().eq_ignore_ascii_case("question")
        && fields[1].trim().to_lowercase().replace(' ', "_") == "expected_answer"
}

/// Split one record into fields, honoring double-quoted fields with `""`
/// escapes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
