//! Live evaluation-run state, fed one stream event at a time.
//!
//! DESIGN
//! ======
//! Rows are keyed by row number, so a replayed or duplicated event overwrites
//! its own slot instead of appending, and progress only ever moves forward.
//! Unparseable stream lines are counted but otherwise ignored; a flaky line
//! never aborts a run that the server is still driving.

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;

use std::collections::BTreeMap;

use shared::RowResult;
use shared::stream::EvalEvent;

/// Lifecycle of the streamed run as seen by the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunPhase {
    #[default]
    Idle,
    Streaming,
    Complete,
    Failed,
    Cancelled,
}

/// Outcome of one dataset row.
#[derive(Clone, Debug, PartialEq)]
pub enum RowOutcome {
    Done(RowResult),
    Failed(String),
}

/// Accumulated state of one streamed evaluation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunState {
    pub phase: RunPhase,
    pub total_rows: u32,
    /// Completion percentage, 0-100, monotonically non-decreasing.
    pub progress: u32,
    /// Row outcomes keyed by 1-based row number.
    pub rows: BTreeMap<u32, RowOutcome>,
    /// Terminal error message, for `phase == Failed`.
    pub error: Option<String>,
    /// Stream lines that did not decode as events.
    pub skipped_lines: u32,
}

impl RunState {
    /// Reset to a fresh streaming run.
    pub fn start_streaming(&mut self) {
        *self = Self { phase: RunPhase::Streaming, ..Self::default() };
    }

    /// Fold one decoded event into the state.
    pub fn apply(&mut self, event: EvalEvent) {
        match event {
            EvalEvent::Start { total_rows } => {
                self.total_rows = total_rows;
            }
            EvalEvent::RowComplete { row_number, total_rows, progress, result } => {
                self.total_rows = self.total_rows.max(total_rows);
                self.progress = self.progress.max(progress.min(100));
                self.rows.insert(row_number, RowOutcome::Done(result));
            }
            EvalEvent::RowError { row_number, error } => {
                self.rows.insert(row_number, RowOutcome::Failed(error));
                self.bump_progress_for_row_count();
            }
            EvalEvent::Complete { total_rows } => {
                self.total_rows = self.total_rows.max(total_rows);
                self.progress = 100;
                self.phase = RunPhase::Complete;
            }
            EvalEvent::Error { error } => {
                self.error = Some(error);
                self.phase = RunPhase::Failed;
            }
        }
    }

    /// Note a stream line that did not decode.
    pub fn skip_line(&mut self) {
        self.skipped_lines += 1;
    }

    /// Mark the run cancelled by the user. Terminal phases stay as they are.
    pub fn cancelled(&mut self) {
        if self.phase == RunPhase::Streaming {
            self.phase = RunPhase::Cancelled;
        }
    }

    /// Rows that finished on both models.
    #[must_use]
    pub fn completed_rows(&self) -> u32 {
        let n = self.rows.values().filter(|o| matches!(o, RowOutcome::Done(_))).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    /// Rows that failed on both models.
    #[must_use]
    pub fn failed_rows(&self) -> u32 {
        let n = self.rows.values().filter(|o| matches!(o, RowOutcome::Failed(_))).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    /// Running token total across both sides of every finished row.
    #[must_use]
    pub fn total_tokens(&self) -> i64 {
        self.results().map(|r| r.model_a_tokens + r.model_b_tokens).sum()
    }

    /// Running cost total across both sides of every finished row.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.results().map(|r| r.model_a_cost + r.model_b_cost).sum()
    }

    /// Win counts as `(side_a, side_b)`, judged by the stored winner field.
    #[must_use]
    pub fn win_counts(&self, model_a: &str) -> (u32, u32) {
        let mut wins_a = 0;
        let mut wins_b = 0;
        for result in self.results() {
            if result.winner == model_a {
                wins_a += 1;
            } else {
                wins_b += 1;
            }
        }
        (wins_a, wins_b)
    }

    /// Finished row results in row order, for persistence after completion.
    #[must_use]
    pub fn collected_results(&self) -> Vec<RowResult> {
        self.results().cloned().collect()
    }

    /// True once no further events can arrive.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, RunPhase::Complete | RunPhase::Failed | RunPhase::Cancelled)
    }

    fn results(&self) -> impl Iterator<Item = &RowResult> {
        self.rows.values().filter_map(|o| match o {
            RowOutcome::Done(result) => Some(result),
            RowOutcome::Failed(_) => None,
        })
    }

    // Row errors carry no progress field; derive it from rows seen so the
    // bar still advances through a stretch of failing rows.
    fn bump_progress_for_row_count(&mut self) {
        if self.total_rows > 0 {
            let n = u32::try_from(self.rows.len()).unwrap_or(u32::MAX);
            let derived = (n.min(self.total_rows) * 100) / self.total_rows;
            self.progress = self.progress.max(derived);
        }
    }
}
