//! Terminal User Interface components

mod app;
pub mod theme;
mod widgets;

pub use app::{App, AppAssessment, AppError, AppMonitor, AppState, AppView};
pub use theme::ThemeColors;
pub use widgets::*;
