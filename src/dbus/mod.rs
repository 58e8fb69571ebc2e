//! Session-Bus Integration
//!
//! Proxies for the display configuration service on the session bus.

pub mod display_config;

pub use display_config::{find_luminance, DisplayConfig, LuminanceEntry};
