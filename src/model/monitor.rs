//! Physical Monitors and Modes
//!
//! `Monitor` and `MonitorMode` are built once from a parsed state snapshot
//! and stay read-only afterwards, except for the mode/color-mode selection
//! recorded on a monitor while a configuration is being built.

use std::fmt;

use crate::model::enums::ColorMode;
use crate::model::properties::{Properties, PropertyValue};

/// A width × height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One mode supported by a monitor.
#[derive(Debug, Clone)]
pub struct MonitorMode {
    /// Mode name, unique within its monitor
    pub name: String,
    /// Mode resolution
    pub resolution: Dimension,
    /// Refresh rate in Hz
    pub refresh_rate: f64,
    /// Scale the server prefers for this mode
    pub preferred_scale: f64,
    /// Supported scales, in server-reported order
    pub supported_scales: Vec<f64>,
    /// Translated mode properties (may carry is-current / is-preferred)
    pub properties: Properties,
}

impl MonitorMode {
    /// Whether this is the monitor's active mode
    pub fn is_current(&self) -> bool {
        self.properties.contains_key("is-current")
    }

    /// Whether this is the monitor's preferred mode
    pub fn is_preferred(&self) -> bool {
        self.properties.contains_key("is-preferred")
    }
}

/// A physical monitor, keyed by its connector.
#[derive(Debug, Clone)]
pub struct Monitor {
    /// Stable hardware output identifier, primary key
    pub connector: String,
    /// Vendor string, if reported
    pub vendor: Option<String>,
    /// Product string, if reported
    pub product: Option<String>,
    /// Serial string, if reported
    pub serial: Option<String>,
    /// Supported modes, in server-reported order
    pub modes: Vec<MonitorMode>,
    /// Translated monitor properties
    pub properties: Properties,
    /// Index of the active mode, if any
    pub current_mode: Option<usize>,
    /// Index of the preferred mode, if any
    pub preferred_mode: Option<usize>,
    /// Currently active color mode, if reported
    pub color_mode: Option<ColorMode>,
    /// Color modes the monitor supports
    pub supported_color_modes: Vec<ColorMode>,
    /// Mode selected while building a configuration
    pub selected_mode: Option<usize>,
    /// Color mode selected while building a configuration
    pub selected_color_mode: Option<ColorMode>,
}

impl Monitor {
    /// Human-readable name from the property map, if reported
    pub fn display_name(&self) -> Option<&str> {
        match self.properties.get("display-name") {
            Some(PropertyValue::Str(name)) => Some(name),
            _ => None,
        }
    }

    /// Look up a mode index by name
    pub fn mode_index(&self, name: &str) -> Option<usize> {
        self.modes.iter().position(|mode| mode.name == name)
    }

    /// The monitor's active mode
    pub fn current(&self) -> Option<&MonitorMode> {
        self.current_mode.map(|index| &self.modes[index])
    }

    /// The monitor's preferred mode
    pub fn preferred(&self) -> Option<&MonitorMode> {
        self.preferred_mode.map(|index| &self.modes[index])
    }

    /// The mode this monitor is configured to use: the selection made while
    /// building, falling back to the active mode
    pub fn configured_mode(&self) -> Option<&MonitorMode> {
        self.selected_mode
            .or(self.current_mode)
            .map(|index| &self.modes[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(name: &str, width: i32, height: i32) -> MonitorMode {
        MonitorMode {
            name: name.to_string(),
            resolution: Dimension { width, height },
            refresh_rate: 60.0,
            preferred_scale: 1.0,
            supported_scales: vec![1.0],
            properties: Properties::new(),
        }
    }

    fn monitor() -> Monitor {
        Monitor {
            connector: "DP-1".to_string(),
            vendor: Some("DEL".to_string()),
            product: None,
            serial: None,
            modes: vec![mode("3840x2160@60", 3840, 2160), mode("1920x1080@60", 1920, 1080)],
            properties: Properties::new(),
            current_mode: Some(0),
            preferred_mode: Some(0),
            color_mode: None,
            supported_color_modes: vec![],
            selected_mode: None,
            selected_color_mode: None,
        }
    }

    #[test]
    fn test_mode_index_lookup() {
        let monitor = monitor();
        assert_eq!(monitor.mode_index("1920x1080@60"), Some(1));
        assert_eq!(monitor.mode_index("640x480@60"), None);
    }

    #[test]
    fn test_configured_mode_prefers_selection() {
        let mut monitor = monitor();
        assert_eq!(monitor.configured_mode().unwrap().name, "3840x2160@60");

        monitor.selected_mode = Some(1);
        assert_eq!(monitor.configured_mode().unwrap().name, "1920x1080@60");
    }

    #[test]
    fn test_dimension_display() {
        let dimension = Dimension {
            width: 2560,
            height: 1440,
        };
        assert_eq!(dimension.to_string(), "2560x1440");
    }
}
