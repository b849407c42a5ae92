//! Reaction TestKit - Terminal reaction-time assessment
//!
//! Runs a multi-stage reaction-time test: wait for the stimulus, respond as
//! fast as possible, and get the mean over all stages. Early responses count
//! as strikes. A refresh rate monitor reports how often the screen redraws.

pub mod assessment;
pub mod config;
pub mod display;
pub mod host;
pub mod monitor;
#[doc(hidden)]
pub mod testing;
pub mod ui;
pub mod utils;

pub use config::Config;
