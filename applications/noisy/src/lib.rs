//! Noisy - terminal ambient sound mixer
//!
//! Wires the platform-agnostic mixer to desktop playback handles and a
//! line-oriented terminal front end.

pub mod app;
pub mod commands;
pub mod config;
pub mod render;

pub use app::{App, Flow};
pub use config::AppConfig;
