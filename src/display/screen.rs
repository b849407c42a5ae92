//! In-memory display surface rendered by the terminal UI

use super::{DisplayError, DisplaySurface, HexColor, RegionHandle};

/// Labeled text region on a [`ScreenSurface`]
#[derive(Debug, Clone, PartialEq, Eq)]
struct Region {
    id: String,
    text: String,
}

/// A display surface held in memory.
///
/// The surface exposes a fixed set of named regions chosen at creation; any
/// other identifier fails to resolve. The TUI widgets read the surface back
/// out each frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenSurface {
    background: HexColor,
    text_color: HexColor,
    body: String,
    regions: Vec<Region>,
}

impl ScreenSurface {
    /// Create a surface exposing the given region identifiers
    pub fn with_regions<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            background: HexColor::BLACK,
            text_color: HexColor::rgb(0xFF, 0xFF, 0xFF),
            body: String::new(),
            regions: ids
                .into_iter()
                .map(|id| Region {
                    id: id.into(),
                    text: String::new(),
                })
                .collect(),
        }
    }

    pub fn background(&self) -> HexColor {
        self.background
    }

    pub fn text_color(&self) -> HexColor {
        self.text_color
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Current text of a region, by identifier
    pub fn region_text(&self, id: &str) -> Option<&str> {
        self.regions
            .iter()
            .find(|region| region.id == id)
            .map(|region| region.text.as_str())
    }
}

impl DisplaySurface for ScreenSurface {
    fn resolve_region(&mut self, id: &str) -> Option<RegionHandle> {
        self.regions
            .iter()
            .position(|region| region.id == id)
            .map(RegionHandle)
    }

    fn set_background(&mut self, color: HexColor) -> Result<(), DisplayError> {
        self.background = color;
        Ok(())
    }

    fn set_text_color(&mut self, color: HexColor) -> Result<(), DisplayError> {
        self.text_color = color;
        Ok(())
    }

    fn set_body(&mut self, text: &str) -> Result<(), DisplayError> {
        self.body.clear();
        self.body.push_str(text);
        Ok(())
    }

    fn set_region_text(&mut self, region: RegionHandle, text: &str) -> Result<(), DisplayError> {
        let slot = self
            .regions
            .get_mut(region.0)
            .ok_or(DisplayError::UnknownRegion(region))?;
        slot.text.clear();
        slot.text.push_str(text);
        Ok(())
    }
}
