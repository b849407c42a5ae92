//! Assessment states

/// Where the assessment is in its interaction loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssessmentState {
    /// Idle, waiting for the user to begin a run
    #[default]
    AwaitingStart,
    /// Warning color shown; the stimulus timer is pending
    AwaitingStimulus,
    /// Stimulus shown; the response is being timed
    AwaitingResponse,
    /// Showing the time of the stage just completed
    DisplayingStage,
    /// Showing a premature response that did not end the run
    DisplayingStrike,
    /// Showing the strike that ended the run
    DisplayingFailure,
    /// Showing the run average
    DisplayingResults,
}

impl AssessmentState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingStart => "Start",
            Self::AwaitingStimulus => "Wait",
            Self::AwaitingResponse => "React",
            Self::DisplayingStage => "Stage",
            Self::DisplayingStrike => "Strike",
            Self::DisplayingFailure => "Failed",
            Self::DisplayingResults => "Results",
        }
    }

    pub fn all() -> &'static [AssessmentState] {
        &[
            Self::AwaitingStart,
            Self::AwaitingStimulus,
            Self::AwaitingResponse,
            Self::DisplayingStage,
            Self::DisplayingStrike,
            Self::DisplayingFailure,
            Self::DisplayingResults,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_awaiting_start() {
        assert_eq!(AssessmentState::default(), AssessmentState::AwaitingStart);
    }

    #[test]
    fn state_names_are_unique() {
        let names: std::collections::HashSet<_> =
            AssessmentState::all().iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), AssessmentState::all().len());
    }
}
