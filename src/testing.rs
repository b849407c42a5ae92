//! Shared fixtures for driving the assessment and monitor without a terminal
//!
//! Everything here runs on a [`ManualClock`], so tests decide exactly when
//! stimuli fire and how long a response takes.

use crate::assessment::{AssessmentState, ReactionAssessment};
use crate::config::{AssessmentConfig, MonitorConfig};
use crate::display::{DisplayError, DisplaySurface, HexColor, RegionHandle, ScreenSurface};
use crate::host::{FrameLoop, ManualClock, TimerQueue};
use crate::monitor::RefreshRateMonitor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Assessment wired to a manual clock and an in-memory surface
pub type ManualAssessment<D = ScreenSurface> =
    ReactionAssessment<ManualClock, TimerQueue<ManualClock>, D, StdRng>;

/// Monitor wired to a manual clock and an in-memory surface
pub type ManualMonitor = RefreshRateMonitor<ManualClock, FrameLoop, ScreenSurface>;

/// A surface exposing every region named by `config`
pub fn surface_for(config: &AssessmentConfig) -> ScreenSurface {
    ScreenSurface::with_regions(config.regions.all())
}

/// Build an assessment at t = 0 with a seeded RNG.
///
/// Panics if `config` is invalid.
pub fn manual_assessment(config: AssessmentConfig, seed: u64) -> (ManualAssessment, ManualClock) {
    let clock = ManualClock::new(0.0);
    let surface = surface_for(&config);
    let assessment = ReactionAssessment::new(
        config,
        clock.clone(),
        TimerQueue::new(clock.clone()),
        surface,
        StdRng::seed_from_u64(seed),
    )
    .expect("valid assessment config");
    (assessment, clock)
}

/// Build a monitor at t = 0 with the default configuration
pub fn manual_monitor() -> (ManualMonitor, ManualClock) {
    let config = MonitorConfig::default();
    let clock = ManualClock::new(0.0);
    let surface = ScreenSurface::with_regions([config.region.clone()]);
    let monitor = RefreshRateMonitor::new(config, clock.clone(), FrameLoop::new(), surface)
        .expect("valid monitor config");
    (monitor, clock)
}

/// Deliver every due stimulus timer. Returns how many were delivered.
pub fn fire_due<D, R>(
    assessment: &mut ReactionAssessment<ManualClock, TimerQueue<ManualClock>, D, R>,
) -> usize
where
    D: DisplaySurface,
    R: Rng,
{
    let due = assessment.scheduler_mut().poll_due();
    let count = due.len();
    for handle in due {
        assessment.on_stimulus_due(handle);
    }
    count
}

/// Run one stage to completion with the given reaction time.
///
/// Starts or continues the run if needed, lets the stimulus fire, then
/// responds `reaction_ms` later.
pub fn complete_stage<D, R>(
    assessment: &mut ReactionAssessment<ManualClock, TimerQueue<ManualClock>, D, R>,
    clock: &ManualClock,
    reaction_ms: f64,
) where
    D: DisplaySurface,
    R: Rng,
{
    if assessment.state() != AssessmentState::AwaitingStimulus {
        assessment.handle_activation();
    }
    let (_, max_delay_ms) = assessment.delay_range_ms();
    clock.advance(max_delay_ms);
    fire_due(assessment);
    assert_eq!(assessment.state(), AssessmentState::AwaitingResponse);

    clock.advance(reaction_ms);
    assessment.handle_activation();
}

/// Run a whole assessment with one reaction time per stage
pub fn complete_run<D, R>(
    assessment: &mut ReactionAssessment<ManualClock, TimerQueue<ManualClock>, D, R>,
    clock: &ManualClock,
    reaction_times_ms: &[f64],
) where
    D: DisplaySurface,
    R: Rng,
{
    for &reaction_ms in reaction_times_ms {
        complete_stage(assessment, clock, reaction_ms);
    }
}

/// Surface wrapper whose writes can be switched to fail
#[derive(Debug, Clone)]
pub struct FlakySurface {
    inner: ScreenSurface,
    failing: bool,
    last_error: Option<DisplayError>,
}

impl FlakySurface {
    pub fn new(inner: ScreenSurface) -> Self {
        Self {
            inner,
            failing: false,
            last_error: None,
        }
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub fn inner(&self) -> &ScreenSurface {
        &self.inner
    }

    /// The most recent error handed out
    pub fn last_error(&self) -> Option<&DisplayError> {
        self.last_error.as_ref()
    }

    fn check(&mut self) -> Result<(), DisplayError> {
        if self.failing {
            let err = DisplayError::Unavailable("surface detached".to_string());
            self.last_error = Some(err.clone());
            return Err(err);
        }
        Ok(())
    }
}

impl DisplaySurface for FlakySurface {
    fn resolve_region(&mut self, id: &str) -> Option<RegionHandle> {
        self.inner.resolve_region(id)
    }

    fn set_background(&mut self, color: HexColor) -> Result<(), DisplayError> {
        self.check()?;
        self.inner.set_background(color)
    }

    fn set_text_color(&mut self, color: HexColor) -> Result<(), DisplayError> {
        self.check()?;
        self.inner.set_text_color(color)
    }

    fn set_body(&mut self, text: &str) -> Result<(), DisplayError> {
        self.check()?;
        self.inner.set_body(text)
    }

    fn set_region_text(&mut self, region: RegionHandle, text: &str) -> Result<(), DisplayError> {
        self.check()?;
        self.inner.set_region_text(region, text)
    }
}
