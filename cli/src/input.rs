//! Local dataset loading for streamed runs.
//!
//! DESIGN
//! ======
//! The `run` command can evaluate rows straight from a local file without
//! uploading a dataset first. Two formats are accepted: two-column CSV
//! (`question,expected_answer`, header optional) and JSONL with one
//! `{"question", "expected_answer"}` object per line. The format is sniffed
//! from the first non-empty line so no flag is needed.

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;

use shared::DatasetRow;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
    #[error("input contains no rows")]
    Empty,
}

/// Load dataset rows from a CSV or JSONL file. `-` reads stdin.
pub fn load_rows(path: &str) -> Result<Vec<DatasetRow>, InputError> {
    let text = if path == "-" {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    }
    .map_err(|source| InputError::Read { path: path.to_owned(), source })?;

    parse_rows(&text)
}

/// Parse dataset rows from text, sniffing CSV versus JSONL.
pub fn parse_rows(text: &str) -> Result<Vec<DatasetRow>, InputError> {
    let first = text.lines().map(str::trim).find(|line| !line.is_empty());
    match first {
        Some(line) if line.starts_with('{') => parse_jsonl(text),
        Some(_) => parse_csv(text),
        None => Err(InputError::Empty),
    }
}

fn parse_jsonl(text: &str) -> Result<Vec<DatasetRow>, InputError> {
    let mut rows = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let row = serde_json::from_str::<DatasetRow>(trimmed).map_err(|error| {
            InputError::InvalidRecord { line: idx + 1, reason: error.to_string() }
        })?;
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(rows)
}

fn parse_csv(text: &str) -> Result<Vec<DatasetRow>, InputError> {
    shared::csv::parse_rows(text).map_err(|err| match err {
        shared::csv::CsvError::InvalidRecord { line, reason } => {
            InputError::InvalidRecord { line, reason }
        }
        shared::csv::CsvError::Empty => InputError::Empty,
    })
}
