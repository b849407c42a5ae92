//! Display surface abstraction
//!
//! The assessment paints a single surface: a background, a text color, a
//! body text, and a handful of labeled sub-regions (stage, strikes, averages,
//! refresh rate) resolved by identifier when a component is constructed.

mod color;
mod screen;

pub use color::{ColorParseError, DisplayStyle, HexColor};
pub use screen::ScreenSurface;

use thiserror::Error;

/// Handle to a resolved sub-region of a display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionHandle(pub(crate) usize);

/// Failure while writing to a display surface
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DisplayError {
    /// The handle does not belong to this surface
    #[error("unknown display region {0:?}")]
    UnknownRegion(RegionHandle),
    /// The surface cannot be written right now
    #[error("display surface unavailable: {0}")]
    Unavailable(String),
}

/// A surface the assessment and monitor render into
pub trait DisplaySurface {
    /// Look up a labeled sub-region by identifier
    fn resolve_region(&mut self, id: &str) -> Option<RegionHandle>;

    fn set_background(&mut self, color: HexColor) -> Result<(), DisplayError>;

    fn set_text_color(&mut self, color: HexColor) -> Result<(), DisplayError>;

    /// Replace the main body text
    fn set_body(&mut self, text: &str) -> Result<(), DisplayError>;

    fn set_region_text(&mut self, region: RegionHandle, text: &str) -> Result<(), DisplayError>;

    /// Apply a background/text color pair and body text in one go
    fn paint(&mut self, style: DisplayStyle, body: &str) -> Result<(), DisplayError> {
        self.set_background(style.background)?;
        self.set_text_color(style.text)?;
        self.set_body(body)
    }
}
