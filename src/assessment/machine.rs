//! The assessment state machine

use super::{AssessmentError, AssessmentSession, AssessmentState};
use crate::config::{self, AssessmentConfig};
use crate::display::{DisplaySurface, RegionHandle};
use crate::host::{Clock, DelayScheduler, InputSignal, TimerHandle};
use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Resolved display regions written by the assessment
#[derive(Debug, Clone, Copy)]
struct AssessmentRegions {
    stage: RegionHandle,
    strikes: RegionHandle,
    last_average: RegionHandle,
    best_average: RegionHandle,
}

/// Reaction-time assessment driven by activations and a stimulus timer.
///
/// Collaborators are injected: `C` supplies time, `S` schedules the stimulus
/// delay, `D` is painted on every transition and `R` draws the delays.
///
/// The host calls [`handle_activation`](Self::handle_activation) (or
/// [`handle_input`](Self::handle_input)) for user input and
/// [`on_stimulus_due`](Self::on_stimulus_due) whenever the scheduler reports
/// a due timer.
pub struct ReactionAssessment<C, S, D, R = StdRng>
where
    C: Clock,
    S: DelayScheduler,
    D: DisplaySurface,
    R: Rng,
{
    config: AssessmentConfig,
    clock: C,
    scheduler: S,
    display: D,
    rng: R,
    regions: AssessmentRegions,
    state: AssessmentState,
    session: AssessmentSession,
}

impl<C, S, D> ReactionAssessment<C, S, D, StdRng>
where
    C: Clock,
    S: DelayScheduler,
    D: DisplaySurface,
{
    /// Build an assessment whose delays are drawn from an OS-seeded RNG
    pub fn with_entropy(
        config: AssessmentConfig,
        clock: C,
        scheduler: S,
        display: D,
    ) -> Result<Self, AssessmentError> {
        Self::new(config, clock, scheduler, display, StdRng::from_entropy())
    }
}

impl<C, S, D, R> ReactionAssessment<C, S, D, R>
where
    C: Clock,
    S: DelayScheduler,
    D: DisplaySurface,
    R: Rng,
{
    /// Validate the configuration, resolve every display region and paint
    /// the start screen.
    ///
    /// Nothing is painted unless all regions resolve.
    pub fn new(
        config: AssessmentConfig,
        clock: C,
        scheduler: S,
        mut display: D,
        rng: R,
    ) -> Result<Self, AssessmentError> {
        config.validate()?;

        let mut resolve = |id: &str| {
            display
                .resolve_region(id)
                .ok_or_else(|| AssessmentError::MissingRegion(id.to_string()))
        };
        let regions = AssessmentRegions {
            stage: resolve(&config.regions.stage)?,
            strikes: resolve(&config.regions.strikes)?,
            last_average: resolve(&config.regions.last_average)?,
            best_average: resolve(&config.regions.best_average)?,
        };

        let mut assessment = Self {
            config,
            clock,
            scheduler,
            display,
            rng,
            regions,
            state: AssessmentState::AwaitingStart,
            session: AssessmentSession::new(),
        };

        assessment.render_start()?;
        assessment
            .display
            .set_region_text(regions.last_average, "LAST ─ ...")?;
        assessment
            .display
            .set_region_text(regions.best_average, "BEST ─ ...")?;

        Ok(assessment)
    }

    /// Feed a raw input signal. Returns whether it counted as an activation.
    pub fn handle_input(&mut self, signal: &InputSignal) -> bool {
        if !signal.is_activation() {
            return false;
        }
        self.handle_activation();
        true
    }

    /// Advance the state machine for one activation and return the new state.
    ///
    /// A transition that fails is logged and the assessment falls back to
    /// [`AssessmentState::AwaitingStart`] with a fresh run.
    pub fn handle_activation(&mut self) -> AssessmentState {
        let from = self.state;
        let result = match from {
            AssessmentState::AwaitingStart => self.begin_stimulus_wait(),
            AssessmentState::AwaitingStimulus => self.register_strike(),
            AssessmentState::AwaitingResponse => self.register_response(),
            AssessmentState::DisplayingStage | AssessmentState::DisplayingStrike => {
                self.begin_stimulus_wait()
            }
            AssessmentState::DisplayingFailure | AssessmentState::DisplayingResults => {
                self.restart()
            }
        };

        if let Err(err) = result {
            self.recover(from, err);
        }
        debug!("activation: {:?} -> {:?}", from, self.state);
        self.state
    }

    /// Deliver a due stimulus timer.
    ///
    /// Only the currently pending handle is honored; anything else is stale
    /// and ignored. Returns whether the stimulus was presented.
    pub fn on_stimulus_due(&mut self, handle: TimerHandle) -> bool {
        if self.state != AssessmentState::AwaitingStimulus
            || self.session.pending_stimulus != Some(handle)
        {
            warn!("ignoring stale stimulus timer {:?} in {:?}", handle, self.state);
            return false;
        }

        self.session.pending_stimulus = None;
        self.state = AssessmentState::AwaitingResponse;
        match self.present_stimulus() {
            Ok(()) => true,
            Err(err) => {
                self.recover(AssessmentState::AwaitingStimulus, err);
                false
            }
        }
    }

    pub fn state(&self) -> AssessmentState {
        self.state
    }

    pub fn session(&self) -> &AssessmentSession {
        &self.session
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Scheduler access for the host loop, which polls it for due timers
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn total_stages(&self) -> u32 {
        self.config.total_stages
    }

    /// Change the number of stages. Only allowed before a run starts.
    pub fn set_total_stages(&mut self, total_stages: u32) -> Result<(), AssessmentError> {
        config::validate_stages(total_stages)?;
        self.ensure_idle("total_stages")?;
        self.config.total_stages = total_stages;
        Ok(())
    }

    pub fn strikes_limit(&self) -> u32 {
        self.config.strikes_limit
    }

    /// Change the strike limit. Only allowed before a run starts.
    pub fn set_strikes_limit(&mut self, strikes_limit: u32) -> Result<(), AssessmentError> {
        config::validate_strikes_limit(strikes_limit)?;
        self.ensure_idle("strikes_limit")?;
        self.config.strikes_limit = strikes_limit;
        Ok(())
    }

    /// Stimulus delay bounds as `(min, max)` in milliseconds
    pub fn delay_range_ms(&self) -> (f64, f64) {
        (self.config.min_delay_ms, self.config.max_delay_ms)
    }

    /// Change the stimulus delay bounds. Takes effect from the next wait.
    pub fn set_delay_range_ms(&mut self, min_ms: f64, max_ms: f64) -> Result<(), AssessmentError> {
        config::validate_delay_range(min_ms, max_ms)?;
        self.config.min_delay_ms = min_ms;
        self.config.max_delay_ms = max_ms;
        Ok(())
    }

    fn ensure_idle(&self, setting: &'static str) -> Result<(), AssessmentError> {
        if self.state != AssessmentState::AwaitingStart {
            return Err(AssessmentError::RunInProgress(setting));
        }
        Ok(())
    }

    fn begin_stimulus_wait(&mut self) -> Result<(), AssessmentError> {
        self.cancel_pending_stimulus();
        self.state = AssessmentState::AwaitingStimulus;

        self.paint("...")?;
        let stage_text = format!(
            "STAGE ─ {} / {}",
            self.session.stage, self.config.total_stages
        );
        self.display.set_region_text(self.regions.stage, &stage_text)?;

        let delay_ms = self.draw_delay_ms();
        let handle = self.scheduler.schedule(delay_ms);
        self.session.pending_stimulus = Some(handle);
        debug!(
            "stage {}: stimulus in {:.0} ms ({:?})",
            self.session.stage, delay_ms, handle
        );
        Ok(())
    }

    fn present_stimulus(&mut self) -> Result<(), AssessmentError> {
        self.paint("Click!")?;
        self.session.timer_start_ms = self.clock.now_ms();
        Ok(())
    }

    fn register_strike(&mut self) -> Result<(), AssessmentError> {
        self.cancel_pending_stimulus();
        self.session.strikes += 1;

        let limit = self.config.strikes_limit;
        let strikes = self.session.strikes.min(limit);
        let strikes_text = format!("STRIKES ─ {} / {}", strikes, limit);

        if self.session.strikes >= limit {
            self.state = AssessmentState::DisplayingFailure;
            self.session.reset_run();
            info!("run failed after {} strikes", strikes);

            self.paint(&format!(
                "Strike {} / {}\n\nClick to Restart",
                strikes, limit
            ))?;
            self.display.set_region_text(self.regions.strikes, &strikes_text)?;
            self.display
                .set_region_text(self.regions.last_average, "LAST ─ ...")?;
        } else {
            self.state = AssessmentState::DisplayingStrike;
            debug!("strike {} / {}", strikes, limit);

            self.paint(&format!("Strike {} / {}", strikes, limit))?;
            self.display.set_region_text(self.regions.strikes, &strikes_text)?;
        }
        Ok(())
    }

    fn register_response(&mut self) -> Result<(), AssessmentError> {
        let reaction_ms = (self.clock.now_ms() - self.session.timer_start_ms).max(0.0);
        self.session.stage_times_ms.push(reaction_ms);
        debug!("stage {}: {:.1} ms", self.session.stage, reaction_ms);

        if self.session.stage < self.config.total_stages {
            self.state = AssessmentState::DisplayingStage;
            self.session.stage += 1;

            self.paint(&format!(
                "{} ms\n\nClick to Continue",
                reaction_ms.round() as u64
            ))?;
        } else {
            self.session.compute_results();
            self.state = AssessmentState::DisplayingResults;
            info!(
                "run complete: average {:?} ms, best {:?} ms",
                self.session.last_average_ms, self.session.best_average_ms
            );

            let last = average_text(self.session.last_average_ms);
            let best = average_text(self.session.best_average_ms);
            self.paint(&format!("Average ─ {}\n\nClick to Restart", last))?;
            self.display
                .set_region_text(self.regions.last_average, &format!("LAST ─ {}", last))?;
            self.display
                .set_region_text(self.regions.best_average, &format!("BEST ─ {}", best))?;
        }
        Ok(())
    }

    fn restart(&mut self) -> Result<(), AssessmentError> {
        self.cancel_pending_stimulus();
        self.session.reset_run();
        self.state = AssessmentState::AwaitingStart;
        self.render_start()
    }

    fn render_start(&mut self) -> Result<(), AssessmentError> {
        self.paint("Click to Start")?;
        self.display.set_region_text(self.regions.stage, "STAGE ─ ...")?;
        self.display
            .set_region_text(self.regions.strikes, "STRIKES ─ ...")?;
        Ok(())
    }

    fn recover(&mut self, during: AssessmentState, err: AssessmentError) {
        error!("assessment handler failed in {:?}: {}", during, err);
        if let Err(err) = self.restart() {
            error!("could not repaint start screen after handler fault: {}", err);
        }
    }

    fn paint(&mut self, body: &str) -> Result<(), AssessmentError> {
        let style = self.config.colors.style_for(self.state);
        self.display.paint(style, body)?;
        Ok(())
    }

    fn cancel_pending_stimulus(&mut self) {
        if let Some(handle) = self.session.pending_stimulus.take() {
            self.scheduler.cancel(handle);
            debug!("cancelled stimulus timer {:?}", handle);
        }
    }

    fn draw_delay_ms(&mut self) -> f64 {
        let (min, max) = self.delay_range_ms();
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }
}

fn average_text(average_ms: Option<u64>) -> String {
    match average_ms {
        Some(ms) => format!("{} ms", ms),
        None => "...".to_string(),
    }
}
