//! Reaction-time assessment
//!
//! A run is `total_stages` stimulus/response trials. Each stage waits a random
//! delay on a warning color, then flips to the stimulus color and times the
//! response. Responding before the stimulus is a strike; too many strikes
//! fail the run.

mod machine;
mod session;
mod state;

pub use machine::ReactionAssessment;
pub use session::AssessmentSession;
pub use state::AssessmentState;

use crate::display::DisplayError;
use thiserror::Error;

/// Errors raised by the assessment
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    /// A required display region could not be resolved at construction
    #[error("required display region \"{0}\" was not found")]
    MissingRegion(String),
    /// A configuration value is out of range
    #[error("invalid assessment configuration: {0}")]
    InvalidConfig(String),
    /// A setting that shapes the run was changed while a run is active
    #[error("cannot change {0} while a run is in progress")]
    RunInProgress(&'static str),
    /// A transition failed while updating the display
    #[error("display update failed: {0}")]
    Display(#[from] DisplayError),
}

impl AssessmentError {
    /// Whether this error is a configuration problem rather than a runtime
    /// handler fault
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingRegion(_) | Self::InvalidConfig(_))
    }
}
