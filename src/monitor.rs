//! Display refresh rate monitor
//!
//! Counts per-frame callbacks over a fixed sampling window and reports the
//! count as an integer rate once per window. The reported value lags the true
//! rate by up to one window.

use crate::config::MonitorConfig;
use crate::display::{DisplaySurface, RegionHandle};
use crate::host::{Clock, FrameHandle, FrameScheduler};
use log::{debug, info, warn};
use thiserror::Error;

/// Errors raised while constructing a monitor
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonitorError {
    #[error("required display region \"{0}\" was not found")]
    MissingRegion(String),
    #[error("invalid monitor configuration: {0}")]
    InvalidConfig(String),
}

/// Frame counting state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonitorSample {
    /// Start of the current sampling window
    pub last_sample_time_ms: f64,
    /// Frames seen in the current window
    pub frame_count_since_sample: u32,
    /// Rate reported at the end of the last window
    pub current_rate_hz: u32,
}

/// Samples a recurring frame callback and reports frames per window
pub struct RefreshRateMonitor<C, F, D>
where
    C: Clock,
    F: FrameScheduler,
    D: DisplaySurface,
{
    config: MonitorConfig,
    clock: C,
    frames: F,
    display: D,
    region: RegionHandle,
    sample: MonitorSample,
    pending: Option<FrameHandle>,
}

impl<C, F, D> RefreshRateMonitor<C, F, D>
where
    C: Clock,
    F: FrameScheduler,
    D: DisplaySurface,
{
    /// Resolve the rate region. The monitor starts stopped.
    pub fn new(config: MonitorConfig, clock: C, frames: F, mut display: D) -> Result<Self, MonitorError> {
        if !config.update_interval_ms.is_finite() || config.update_interval_ms <= 0.0 {
            return Err(MonitorError::InvalidConfig(format!(
                "update_interval_ms must be positive, got {}",
                config.update_interval_ms
            )));
        }
        let region = display
            .resolve_region(&config.region)
            .ok_or_else(|| MonitorError::MissingRegion(config.region.clone()))?;

        let sample = MonitorSample {
            last_sample_time_ms: clock.now_ms(),
            ..MonitorSample::default()
        };

        Ok(Self {
            config,
            clock,
            frames,
            display,
            region,
            sample,
            pending: None,
        })
    }

    /// Begin sampling. Does nothing if already running.
    pub fn start(&mut self) {
        if self.pending.is_some() {
            return;
        }
        self.sample.last_sample_time_ms = self.clock.now_ms();
        self.sample.frame_count_since_sample = 0;
        self.pending = Some(self.frames.request_frame());
        info!("refresh rate monitor started");
    }

    /// Stop sampling. Does nothing if not running.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.frames.cancel_frame(handle);
            info!("refresh rate monitor stopped");
        }
    }

    /// Per-frame callback.
    ///
    /// Ignored unless `handle` is the outstanding frame request. Returns
    /// whether the frame was counted.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        if self.pending != Some(handle) {
            debug!("ignoring frame {:?}, monitor not waiting for it", handle);
            return false;
        }
        self.pending = None;

        self.sample.frame_count_since_sample += 1;
        let now = self.clock.now_ms();
        if now - self.sample.last_sample_time_ms >= self.config.update_interval_ms {
            self.sample.current_rate_hz = self.sample.frame_count_since_sample;
            self.sample.frame_count_since_sample = 0;
            self.sample.last_sample_time_ms = now;
            self.publish();
        }

        self.pending = Some(self.frames.request_frame());
        true
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn current_rate_hz(&self) -> u32 {
        self.sample.current_rate_hz
    }

    pub fn sample(&self) -> &MonitorSample {
        &self.sample
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Frame scheduler access for the host loop
    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    fn publish(&mut self) {
        let text = format!("{} Hz", self.sample.current_rate_hz);
        debug!("refresh rate {}", text);
        if let Err(err) = self.display.set_region_text(self.region, &text) {
            warn!("failed to update refresh rate display: {}", err);
        }
    }
}
