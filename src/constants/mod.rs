//! Simulation constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! Constants are split into submodules by domain for easier navigation.

mod bots;
mod map;
mod navigation;
mod time;

pub use bots::*;
pub use map::*;
pub use navigation::*;
pub use time::*;
