//! Per-run statistics

use crate::host::TimerHandle;
use crate::utils::{rounded_mean_ms, MinExt};

/// Mutable statistics of the assessment.
///
/// Run fields (`stage`, `strikes`, `stage_times_ms`, `timer_start_ms` and
/// the pending stimulus) are reset on every restart. The averages survive
/// restarts for the lifetime of the assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentSession {
    /// Current stage, starting at 1
    pub stage: u32,
    /// Premature responses in the current run
    pub strikes: u32,
    /// Reaction time of every completed stage, in stage order
    pub stage_times_ms: Vec<f64>,
    /// Stimulus onset, meaningful only while awaiting a response
    pub timer_start_ms: f64,
    /// Rounded average of the most recent completed run
    pub last_average_ms: Option<u64>,
    /// Lowest run average seen so far
    pub best_average_ms: Option<u64>,
    /// Stimulus timer, present only while awaiting the stimulus
    pub pending_stimulus: Option<TimerHandle>,
}

impl AssessmentSession {
    pub fn new() -> Self {
        Self {
            stage: 1,
            strikes: 0,
            stage_times_ms: Vec::new(),
            timer_start_ms: 0.0,
            last_average_ms: None,
            best_average_ms: None,
            pending_stimulus: None,
        }
    }

    /// Reset the run fields in place, keeping the averages.
    ///
    /// The caller is responsible for cancelling `pending_stimulus` with its
    /// scheduler before calling this.
    pub fn reset_run(&mut self) {
        self.stage = 1;
        self.strikes = 0;
        self.stage_times_ms.clear();
        self.timer_start_ms = 0.0;
        self.pending_stimulus = None;
    }

    /// Compute the run average and fold it into the best average.
    ///
    /// Does nothing when no stage has been recorded.
    pub fn compute_results(&mut self) -> Option<u64> {
        let average = rounded_mean_ms(&self.stage_times_ms)?;
        self.last_average_ms = Some(average);
        self.best_average_ms.update_min(average);
        Some(average)
    }
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}
