//! Configuration management for Reaction TestKit
//!
//! Configuration is read once at startup from a platform-specific TOML file.
//! Every section falls back to its defaults, so a partial file only needs the
//! values it overrides.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/reaction-testkit/config.toml` |
//! | macOS | `~/Library/Application Support/reaction-testkit/config.toml` |
//! | Windows | `%APPDATA%\reaction-testkit\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use reaction_testkit::Config;
//!
//! // Load existing config or use defaults
//! let mut config = Config::load().unwrap_or_default();
//!
//! // Modify settings
//! config.assessment.total_stages = 10;
//!
//! // Save to disk
//! config.save().expect("Failed to save config");
//! ```

use crate::assessment::{AssessmentError, AssessmentState};
use crate::display::{DisplayStyle, HexColor};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration file operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("reaction-testkit");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Reaction assessment settings
    #[serde(default)]
    pub assessment: AssessmentConfig,
    /// Refresh rate monitor settings
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// UI settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Reaction assessment configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssessmentConfig {
    /// Stages (trials) per run
    pub total_stages: u32,
    /// Premature responses allowed before the run fails
    pub strikes_limit: u32,
    /// Shortest stimulus delay in milliseconds
    pub min_delay_ms: f64,
    /// Longest stimulus delay in milliseconds (exclusive)
    pub max_delay_ms: f64,
    /// Colors used by each state
    pub colors: StylePalette,
    /// Identifiers of the display regions the assessment writes to
    pub regions: RegionIds,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            total_stages: 5,
            strikes_limit: 3,
            min_delay_ms: 1000.0,
            max_delay_ms: 5000.0,
            colors: StylePalette::default(),
            regions: RegionIds::default(),
        }
    }
}

impl AssessmentConfig {
    /// Check the numeric settings.
    pub fn validate(&self) -> Result<(), AssessmentError> {
        validate_stages(self.total_stages)?;
        validate_strikes_limit(self.strikes_limit)?;
        validate_delay_range(self.min_delay_ms, self.max_delay_ms)
    }
}

pub(crate) fn validate_stages(total_stages: u32) -> Result<(), AssessmentError> {
    if total_stages == 0 {
        return Err(AssessmentError::InvalidConfig(
            "total_stages must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_strikes_limit(strikes_limit: u32) -> Result<(), AssessmentError> {
    if strikes_limit == 0 {
        return Err(AssessmentError::InvalidConfig(
            "strikes_limit must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_delay_range(min_ms: f64, max_ms: f64) -> Result<(), AssessmentError> {
    if !min_ms.is_finite() || !max_ms.is_finite() || min_ms < 0.0 {
        return Err(AssessmentError::InvalidConfig(format!(
            "delay range {}..{} ms must be finite and non-negative",
            min_ms, max_ms
        )));
    }
    if min_ms > max_ms {
        return Err(AssessmentError::InvalidConfig(format!(
            "min_delay_ms ({}) exceeds max_delay_ms ({})",
            min_ms, max_ms
        )));
    }
    Ok(())
}

const DEFAULT_BACKGROUND: HexColor = HexColor::rgb(0x7F, 0x7F, 0xFF);

/// Background/text colors for every assessment state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StylePalette {
    pub awaiting_start: DisplayStyle,
    pub awaiting_stimulus: DisplayStyle,
    pub awaiting_response: DisplayStyle,
    pub displaying_stage: DisplayStyle,
    pub displaying_strike: DisplayStyle,
    pub displaying_failure: DisplayStyle,
    pub displaying_results: DisplayStyle,
}

impl Default for StylePalette {
    fn default() -> Self {
        let idle = DisplayStyle::new(DEFAULT_BACKGROUND, HexColor::BLACK);
        Self {
            awaiting_start: idle,
            awaiting_stimulus: DisplayStyle::new(HexColor::rgb(0xFF, 0x00, 0x00), HexColor::BLACK),
            awaiting_response: DisplayStyle::new(HexColor::rgb(0x00, 0xFF, 0x00), HexColor::BLACK),
            displaying_stage: idle,
            displaying_strike: DisplayStyle::new(HexColor::rgb(0xFF, 0x7F, 0x00), HexColor::BLACK),
            displaying_failure: DisplayStyle::new(HexColor::rgb(0xBF, 0x1F, 0x1F), HexColor::BLACK),
            displaying_results: idle,
        }
    }
}

impl StylePalette {
    /// Style painted while `state` is on screen
    pub fn style_for(&self, state: AssessmentState) -> DisplayStyle {
        match state {
            AssessmentState::AwaitingStart => self.awaiting_start,
            AssessmentState::AwaitingStimulus => self.awaiting_stimulus,
            AssessmentState::AwaitingResponse => self.awaiting_response,
            AssessmentState::DisplayingStage => self.displaying_stage,
            AssessmentState::DisplayingStrike => self.displaying_strike,
            AssessmentState::DisplayingFailure => self.displaying_failure,
            AssessmentState::DisplayingResults => self.displaying_results,
        }
    }
}

/// Display region identifiers used by the assessment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegionIds {
    pub stage: String,
    pub strikes: String,
    pub last_average: String,
    pub best_average: String,
}

impl Default for RegionIds {
    fn default() -> Self {
        Self {
            stage: "assessment-stage".to_string(),
            strikes: "assessment-strikes".to_string(),
            last_average: "assessment-last-average".to_string(),
            best_average: "assessment-best-average".to_string(),
        }
    }
}

impl RegionIds {
    pub fn all(&self) -> [&str; 4] {
        [
            &self.stage,
            &self.strikes,
            &self.last_average,
            &self.best_average,
        ]
    }
}

/// Refresh rate monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Sampling window in milliseconds
    pub update_interval_ms: f64,
    /// Identifier of the region showing the rate
    pub region: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 1000.0,
            region: "assessment-refresh-rate".to_string(),
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Target redraw rate (in Hz)
    pub refresh_rate_hz: u32,
    /// Color theme (dark/light)
    pub theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_hz: 60,
            theme: Theme::Dark,
        }
    }
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get UI redraw interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.ui.refresh_rate_hz.max(1) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path() -> PathBuf {
        env::temp_dir().join(format!("reaction-testkit-test-{}.toml", std::process::id()))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.assessment.total_stages, 5);
        assert_eq!(config.assessment.strikes_limit, 3);
        assert_eq!(config.assessment.min_delay_ms, 1000.0);
        assert_eq!(config.assessment.max_delay_ms, 5000.0);
        assert_eq!(config.monitor.update_interval_ms, 1000.0);
        assert_eq!(config.monitor.region, "assessment-refresh-rate");
        assert_eq!(config.ui.refresh_rate_hz, 60);
        assert_eq!(config.ui.theme, Theme::Dark);
    }

    #[test]
    fn default_palette_matches_states() {
        let palette = StylePalette::default();
        assert_eq!(
            palette.style_for(AssessmentState::AwaitingStimulus).background.to_string(),
            "#FF0000"
        );
        assert_eq!(
            palette.style_for(AssessmentState::AwaitingResponse).background.to_string(),
            "#00FF00"
        );
        assert_eq!(
            palette.style_for(AssessmentState::DisplayingResults),
            palette.style_for(AssessmentState::AwaitingStart)
        );
    }

    #[test]
    fn config_refresh_interval() {
        let config = Config::default();
        // 60 Hz = 16666 microseconds per frame
        assert_eq!(config.refresh_interval().as_micros(), 16666);
    }

    #[test]
    fn config_refresh_interval_zero_hz_does_not_divide_by_zero() {
        let mut config = Config::default();
        config.ui.refresh_rate_hz = 0;
        assert_eq!(config.refresh_interval().as_micros(), 1_000_000);
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path();

        let mut config = Config::default();
        config.assessment.total_stages = 8;
        config.assessment.colors.awaiting_response.background = HexColor::rgb(0x12, 0x34, 0x56);
        config.ui.theme = Theme::Light;

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");

        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_is_io_error() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let toml_str = r##"
[assessment]
total_stages = 2
max_delay_ms = 2500.0

[assessment.colors.displaying_strike]
background = "#112233"
text = "#FFFFFF"

[assessment.regions]
stage = "stage-box"
"##;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.assessment.total_stages, 2);
        assert_eq!(config.assessment.strikes_limit, 3);
        assert_eq!(config.assessment.min_delay_ms, 1000.0);
        assert_eq!(config.assessment.max_delay_ms, 2500.0);
        assert_eq!(
            config.assessment.colors.displaying_strike.background,
            HexColor::rgb(0x11, 0x22, 0x33)
        );
        assert_eq!(
            config.assessment.colors.awaiting_stimulus,
            StylePalette::default().awaiting_stimulus
        );
        assert_eq!(config.assessment.regions.stage, "stage-box");
        assert_eq!(config.assessment.regions.strikes, "assessment-strikes");
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn invalid_color_fails_to_parse() {
        let toml_str = r##"
[assessment.colors.awaiting_start]
background = "blue"
text = "#000000"
"##;
        let result: Result<Config, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn config_serializes_colors_as_hex() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("[assessment]"));
        assert!(toml_str.contains("[monitor]"));
        assert!(toml_str.contains("[ui]"));
        assert!(toml_str.contains("total_stages = 5"));
        assert!(toml_str.contains("background = \"#7F7FFF\""));
    }

    #[test]
    fn validate_accepts_defaults_and_equal_bounds() {
        assert!(AssessmentConfig::default().validate().is_ok());

        let config = AssessmentConfig {
            min_delay_ms: 2000.0,
            max_delay_ms: 2000.0,
            ..AssessmentConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let cases = [
            AssessmentConfig {
                total_stages: 0,
                ..AssessmentConfig::default()
            },
            AssessmentConfig {
                strikes_limit: 0,
                ..AssessmentConfig::default()
            },
            AssessmentConfig {
                min_delay_ms: 6000.0,
                ..AssessmentConfig::default()
            },
            AssessmentConfig {
                min_delay_ms: -1.0,
                ..AssessmentConfig::default()
            },
            AssessmentConfig {
                max_delay_ms: f64::INFINITY,
                ..AssessmentConfig::default()
            },
        ];
        for config in cases {
            assert!(matches!(
                config.validate(),
                Err(AssessmentError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "Could not determine config directory");

        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }
}
