//! UI layer for desktop GUI: app shell, tag groups, result and error panels, and theme.

pub mod app;
pub mod theme;

pub use app::{MeditationApp, StartupConfig};
