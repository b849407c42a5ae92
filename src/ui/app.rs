//! Main application state and logic

use crate::assessment::{AssessmentError, AssessmentState, ReactionAssessment};
use crate::config::Config;
use crate::display::ScreenSurface;
use crate::host::{Clock, FrameLoop, InputSignal, MonotonicClock, TimerQueue};
use crate::monitor::{MonitorError, RefreshRateMonitor};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Assessment,
    Help,
}

impl AppView {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Assessment => "Assessment",
            Self::Help => "Help",
        }
    }

    pub fn all() -> &'static [AppView] {
        &[Self::Assessment, Self::Help]
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Assessment => 0,
            Self::Help => 1,
        }
    }
}

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Quitting,
}

/// Failure to wire up the application
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
    #[error(transparent)]
    Monitor(#[from] MonitorError),
}

pub type AppAssessment<C> = ReactionAssessment<C, TimerQueue<C>, ScreenSurface>;
pub type AppMonitor<C> = RefreshRateMonitor<C, FrameLoop, ScreenSurface>;

/// Main application
pub struct App<C: Clock + Clone = MonotonicClock> {
    /// Current view
    pub view: AppView,
    /// Application state
    pub state: AppState,
    /// Configuration
    pub config: Config,
    /// The reaction assessment and its surface
    pub assessment: AppAssessment<C>,
    /// Refresh rate monitor and its surface
    pub monitor: AppMonitor<C>,
    /// Application start time
    pub start_time: Instant,
    /// Activations fed to the assessment
    pub total_activations: u64,
    /// Last status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl App<MonotonicClock> {
    pub fn new(config: Config) -> Result<Self, AppError> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<C: Clock + Clone> App<C> {
    /// Build the application on an explicit clock and start the monitor
    pub fn with_clock(config: Config, clock: C) -> Result<Self, AppError> {
        let assessment_surface = ScreenSurface::with_regions(config.assessment.regions.all());
        let assessment = ReactionAssessment::with_entropy(
            config.assessment.clone(),
            clock.clone(),
            TimerQueue::new(clock.clone()),
            assessment_surface,
        )?;

        let monitor_surface = ScreenSurface::with_regions([config.monitor.region.clone()]);
        let mut monitor =
            RefreshRateMonitor::new(config.monitor.clone(), clock, FrameLoop::new(), monitor_surface)?;
        monitor.start();

        Ok(Self {
            view: AppView::Assessment,
            state: AppState::Running,
            config,
            assessment,
            monitor,
            start_time: Instant::now(),
            total_activations: 0,
            status_message: None,
            status_time: None,
        })
    }

    /// Route an input signal to the assessment.
    ///
    /// Input is ignored while the help view is open.
    pub fn process_input(&mut self, signal: &InputSignal) {
        if self.state != AppState::Running || self.view != AppView::Assessment {
            return;
        }

        if !self.assessment.handle_input(signal) {
            return;
        }
        self.total_activations += 1;

        match self.assessment.state() {
            AssessmentState::DisplayingResults => {
                if let Some(avg) = self.assessment.session().last_average_ms {
                    self.set_status(format!("Run complete: {} ms average", avg));
                }
            }
            AssessmentState::DisplayingFailure => {
                self.set_status("Too many early responses".to_string());
            }
            _ => {}
        }
    }

    /// Dispatch one terminal event.
    ///
    /// Only key presses count, and pointer-downs only inside `panel_area`.
    pub fn handle_event(&mut self, event: &Event, panel_area: Rect) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
                KeyCode::Char('q') | KeyCode::Esc => self.quit(),
                KeyCode::Tab | KeyCode::Char('?') => self.toggle_help(),
                code => self.process_input(&InputSignal::KeyDown(code.into())),
            },
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(button) = mouse.kind {
                    if panel_area.contains(Position::new(mouse.column, mouse.row)) {
                        self.process_input(&InputSignal::PointerDown(button.into()));
                    }
                }
            }
            _ => {}
        }
    }

    /// Deliver due stimulus timers. Returns how many fired.
    pub fn tick(&mut self) -> usize {
        let due = self.assessment.scheduler_mut().poll_due();
        let fired = due.len();
        for handle in due {
            self.assessment.on_stimulus_due(handle);
        }
        fired
    }

    /// Deliver the frame callbacks requested before the frame just drawn
    pub fn frame_rendered(&mut self) {
        let frames = self.monitor.frames_mut().take_pending();
        for handle in frames {
            self.monitor.on_frame(handle);
        }
    }

    /// How long the host may block waiting for input.
    ///
    /// Never longer than `tick_rate`, and never past the next stimulus
    /// deadline.
    pub fn next_wakeup(&self, tick_rate: Duration) -> Duration {
        match self.assessment.scheduler().next_deadline_in() {
            Some(deadline) => deadline.min(tick_rate),
            None => tick_rate,
        }
    }

    pub fn toggle_help(&mut self) {
        self.view = match self.view {
            AppView::Assessment => AppView::Help,
            AppView::Help => AppView::Assessment,
        };
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.monitor.stop();
        self.state = AppState::Quitting;
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_time = Some(Instant::now());
    }

    /// Get status message if still valid (within 3 seconds)
    pub fn get_status(&self) -> Option<&str> {
        match (&self.status_message, self.status_time) {
            (Some(msg), Some(time)) if time.elapsed().as_secs() < 3 => Some(msg),
            _ => None,
        }
    }

    /// Text of a region on the assessment or monitor surface
    pub fn region_text(&self, id: &str) -> &str {
        self.assessment
            .display()
            .region_text(id)
            .or_else(|| self.monitor.display().region_text(id))
            .unwrap_or("")
    }

    /// Get elapsed time formatted
    pub fn elapsed_formatted(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{:02}:{:02}", mins, secs)
    }
}
