//! Theme color definitions for the UI
//!
//! Provides dark and light palettes for the chrome around the assessment
//! panel. The panel itself is painted in the assessment's own colors.

use crate::config::Theme;
use crate::display::HexColor;
use ratatui::style::Color;

/// Complete color palette for the UI chrome
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    /// Main background
    pub bg: Color,
    /// Primary foreground text
    pub fg: Color,
    /// Dimmed/secondary text and borders
    pub dim: Color,
    /// Accent color (headings, active tab)
    pub accent: Color,
    /// Status bar background
    pub bar_bg: Color,
    /// Status messages
    pub message: Color,
}

impl ThemeColors {
    /// Create a color palette for the given theme variant
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(22, 22, 30),
            fg: Color::Rgb(200, 200, 210),
            dim: Color::Rgb(90, 90, 110),
            accent: Color::Rgb(80, 200, 220),
            bar_bg: Color::Rgb(40, 40, 50),
            message: Color::Rgb(240, 180, 80),
        }
    }

    /// Light theme - high contrast for bright terminals
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(245, 245, 248),
            fg: Color::Rgb(30, 30, 40),
            dim: Color::Rgb(130, 130, 150),
            accent: Color::Rgb(0, 130, 160),
            bar_bg: Color::Rgb(220, 220, 228),
            message: Color::Rgb(180, 120, 0),
        }
    }
}

impl From<HexColor> for Color {
    fn from(color: HexColor) -> Self {
        Color::Rgb(color.r, color.g, color.b)
    }
}
