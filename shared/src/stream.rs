//! NDJSON evaluation-stream protocol: event model and chunk-to-line splitter.
//!
//! DESIGN
//! ======
//! The evaluation endpoint responds with one JSON object per line. Readers
//! receive arbitrary byte chunks, so [`LineSplitter`] buffers the trailing
//! partial line across pushes and yields only complete lines. Event decoding
//! is separate so consumers can decide how to treat unparseable lines (the
//! dashboard skips them; it never aborts the stream).

#[cfg(test)]
#[path = "stream_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use crate::RowResult;

/// Error returned by [`decode_event`].
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The line is not a JSON object of a known event `type`.
    #[error("failed to decode stream event: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One event on the evaluation progress stream, discriminated by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EvalEvent {
    /// First event: announces the row count for the run.
    Start { total_rows: u32 },
    /// A row finished on both models.
    RowComplete {
        /// 1-based row number within the submitted dataset.
        row_number: u32,
        total_rows: u32,
        /// Completion percentage after this row, 0-100.
        progress: u32,
        result: RowResult,
    },
    /// A row failed; the run continues with the next row.
    RowError { row_number: u32, error: String },
    /// Terminal success: every row was processed.
    Complete { total_rows: u32 },
    /// Terminal failure: the run as a whole could not proceed.
    Error { error: String },
}

impl EvalEvent {
    /// True for `complete` and `error`, after which no events follow.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete { .. } | Self::Error { .. })
    }
}

/// Encode an event as one NDJSON line, including the trailing newline.
///
/// # Panics
///
/// Never panics in practice; serializing these plain structs is infallible.
#[must_use]
pub fn encode_event(event: &EvalEvent) -> String {
    let mut line = serde_json::to_string(event).unwrap_or_default();
    line.push('\n');
    line
}

/// Decode one stream line into an event.
///
/// # Errors
///
/// Returns [`StreamError::Decode`] when the line is not a known event.
pub fn decode_event(line: &str) -> Result<EvalEvent, StreamError> {
    Ok(serde_json::from_str(line)?)
}

/// Splits an incoming byte stream into complete newline-terminated lines.
///
/// Bytes are decoded as UTF-8 lossily per chunk; a partial line at the end of
/// a chunk is retained and completed by later pushes.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buffer: String,
}

impl LineSplitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes; returns the complete lines it closed off.
    ///
    /// Empty lines are dropped. Carriage returns before the newline are
    /// trimmed so `\r\n` streams behave like `\n` streams.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim_end_matches(['\n', '\r']);
            if !line.is_empty() {
                lines.push(line.to_owned());
            }
        }
        lines
    }

    /// Consume the splitter, returning any unterminated trailing line.
    #[must_use]
    pub fn finish(self) -> Option<String> {
        let trailing = self.buffer.trim();
        if trailing.is_empty() {
            None
        } else {
            Some(trailing.to_owned())
        }
    }
}
