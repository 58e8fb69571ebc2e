//! Wire Schema
//!
//! Typed mirrors of the fixed tuple schema exchanged with
//! org.gnome.Mutter.DisplayConfig, plus the serializer that turns a
//! resolved [`Config`] into an `ApplyMonitorsConfig` request body.
//!
//! GetCurrentState reply:
//! `(ua((ssss)a(siiddada{sv})a{sv})a(iiduba(ssss)a{sv})a{sv})`
//!
//! ApplyMonitorsConfig request:
//! `(uua(iiduba(ssa{sv}))a{sv})`

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use zbus::zvariant::{OwnedValue, SerializeDict, Type};

use crate::configure::Config;
use crate::error::ConfigError;
use crate::model::ApplyMethod;
use crate::state::MonitorsState;

// =============================================================================
// GetCurrentState reply
// =============================================================================

/// Deserialized body of a GetCurrentState reply.
pub type StateReply = (
    u32,
    Vec<MonitorDescriptor>,
    Vec<LogicalMonitorDescriptor>,
    HashMap<String, OwnedValue>,
);

/// `(connector, vendor, product, serial)` identifier tuple.
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
pub struct MonitorId(pub String, pub String, pub String, pub String);

/// One monitor in a GetCurrentState reply. Not `Clone`: the raw property
/// values hold file descriptors in the general case and only support
/// fallible duplication.
#[derive(Debug, Type, Deserialize)]
pub struct MonitorDescriptor {
    /// Identifier tuple
    pub id: MonitorId,
    /// Supported modes
    pub modes: Vec<ModeDescriptor>,
    /// Raw property map
    pub properties: HashMap<String, OwnedValue>,
}

/// One mode in a monitor descriptor.
#[derive(Debug, Type, Deserialize)]
pub struct ModeDescriptor {
    /// Mode name
    pub name: String,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
    /// Refresh rate in Hz
    pub refresh_rate: f64,
    /// Server-preferred scale
    pub preferred_scale: f64,
    /// Supported scales
    pub supported_scales: Vec<f64>,
    /// Raw property map
    pub properties: HashMap<String, OwnedValue>,
}

/// One logical monitor in a GetCurrentState reply.
#[derive(Debug, Type, Deserialize)]
pub struct LogicalMonitorDescriptor {
    /// X position
    pub x: i32,
    /// Y position
    pub y: i32,
    /// Scale
    pub scale: f64,
    /// Transform wire code
    pub transform: u32,
    /// Primary flag
    pub primary: bool,
    /// Member monitors as identifier tuples
    pub monitors: Vec<MonitorId>,
    /// Raw property map
    pub properties: HashMap<String, OwnedValue>,
}

// =============================================================================
// ApplyMonitorsConfig request
// =============================================================================

/// Per-monitor options in an apply request; `color-mode` is present only
/// when one was explicitly selected.
#[derive(Debug, Clone, Default, Type, SerializeDict)]
#[zvariant(signature = "a{sv}")]
pub struct ApplyMonitorOptions {
    /// Selected color mode wire code
    #[zvariant(rename = "color-mode")]
    pub color_mode: Option<u32>,
}

/// `(connector, mode, options)` tuple in an apply request.
#[derive(Debug, Clone, Type, Serialize)]
pub struct ApplyMonitor {
    /// Connector of the monitor
    pub connector: String,
    /// Name of the mode to set
    pub mode: String,
    /// Per-monitor options
    pub options: ApplyMonitorOptions,
}

/// One logical monitor tuple in an apply request.
#[derive(Debug, Clone, Type, Serialize)]
pub struct ApplyLogicalMonitor {
    /// X position
    pub x: i32,
    /// Y position
    pub y: i32,
    /// Scale
    pub scale: f64,
    /// Transform wire code
    pub transform: u32,
    /// Primary flag
    pub primary: bool,
    /// Member monitors
    pub monitors: Vec<ApplyMonitor>,
}

/// Top-level apply request properties; each key is emitted only when
/// applicable.
#[derive(Debug, Clone, Default, Type, SerializeDict)]
#[zvariant(signature = "a{sv}")]
pub struct ApplyProperties {
    /// Layout mode wire code, only when the server supports changing it
    #[zvariant(rename = "layout-mode")]
    pub layout_mode: Option<u32>,
    /// Monitors offered for exclusive lease, only when non-empty
    #[zvariant(rename = "monitors-for-lease")]
    pub monitors_for_lease: Option<Vec<MonitorId>>,
}

/// Complete ApplyMonitorsConfig request body.
#[derive(Debug, Clone, Type, Serialize)]
pub struct ApplyRequest {
    /// State serial the configuration was built against
    pub serial: u32,
    /// Apply method wire code
    pub method: u32,
    /// Logical monitor tuples, in input order
    pub logical_monitors: Vec<ApplyLogicalMonitor>,
    /// Top-level properties
    pub properties: ApplyProperties,
}

// =============================================================================
// Serializer
// =============================================================================

/// Serialize a resolved configuration into the exact request tuples the
/// service expects. Logical monitors keep their input order.
pub fn apply_request(
    state: &MonitorsState,
    config: &Config,
    method: ApplyMethod,
) -> Result<ApplyRequest, ConfigError> {
    let mut logical_monitors = Vec::with_capacity(config.logical_monitors.len());
    for logical_monitor in &config.logical_monitors {
        let mut monitors = Vec::with_capacity(logical_monitor.monitors.len());
        for connector in &logical_monitor.monitors {
            let monitor = state.monitor(connector).ok_or_else(|| {
                ConfigError::UnknownMonitor(connector.clone())
            })?;
            let mode = monitor.configured_mode().ok_or_else(|| {
                ConfigError::ProtocolMismatch(format!(
                    "monitor {connector} has neither a selected nor a current mode"
                ))
            })?;
            monitors.push(ApplyMonitor {
                connector: connector.clone(),
                mode: mode.name.clone(),
                options: ApplyMonitorOptions {
                    color_mode: monitor.selected_color_mode.map(|mode| mode.to_wire()),
                },
            });
        }
        logical_monitors.push(ApplyLogicalMonitor {
            x: logical_monitor.position.x,
            y: logical_monitor.position.y,
            scale: logical_monitor.scale,
            transform: logical_monitor.transform.to_wire(),
            primary: logical_monitor.is_primary,
            monitors,
        });
    }

    let mut monitors_for_lease = Vec::with_capacity(config.monitors_for_lease.len());
    for connector in &config.monitors_for_lease {
        let monitor = state
            .monitor(connector)
            .ok_or_else(|| ConfigError::UnknownMonitor(connector.clone()))?;
        monitors_for_lease.push(MonitorId(
            monitor.connector.clone(),
            monitor.vendor.clone().unwrap_or_default(),
            monitor.product.clone().unwrap_or_default(),
            monitor.serial.clone().unwrap_or_default(),
        ));
    }

    let properties = ApplyProperties {
        layout_mode: state
            .supports_changing_layout_mode
            .then(|| config.layout_mode.to_wire()),
        monitors_for_lease: (!monitors_for_lease.is_empty()).then_some(monitors_for_lease),
    };

    Ok(ApplyRequest {
        serial: config.serial,
        method: method.to_wire(),
        logical_monitors,
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configure::Config;
    use crate::model::{LayoutMode, Transform};
    use crate::state::tests::{reply_with, test_monitor, test_state};

    #[test]
    fn test_apply_request_preserves_input_order() {
        let mut state = test_state(&["DP-1", "DP-2", "HDMI-1"]);
        state.supports_changing_layout_mode = true;
        for connector in ["DP-2", "HDMI-1", "DP-1"] {
            state.monitor_mut(connector).unwrap().selected_mode = Some(0);
        }

        let config = Config {
            serial: state.serial,
            layout_mode: LayoutMode::Logical,
            logical_monitors: ["DP-2", "HDMI-1", "DP-1"]
                .iter()
                .enumerate()
                .map(|(index, connector)| crate::model::LogicalMonitor {
                    position: crate::model::Position {
                        x: index as i32 * 1920,
                        y: 0,
                    },
                    scale: 1.0,
                    transform: Transform::Normal,
                    is_primary: index == 0,
                    monitors: vec![connector.to_string()],
                    properties: Default::default(),
                })
                .collect(),
            monitors_for_lease: vec![],
        };

        let request = apply_request(&state, &config, ApplyMethod::Temporary).unwrap();
        assert_eq!(request.serial, state.serial);
        assert_eq!(request.method, 1);

        let connectors: Vec<&str> = request
            .logical_monitors
            .iter()
            .map(|lm| lm.monitors[0].connector.as_str())
            .collect();
        assert_eq!(connectors, ["DP-2", "HDMI-1", "DP-1"]);
        assert_eq!(request.properties.layout_mode, Some(1));
        assert_eq!(request.properties.monitors_for_lease, None);
    }

    #[test]
    fn test_color_mode_emitted_only_when_selected() {
        let mut state = test_state(&["DP-1"]);
        {
            let monitor = state.monitor_mut("DP-1").unwrap();
            monitor.selected_mode = Some(0);
            monitor.selected_color_mode = None;
        }

        let config = Config {
            serial: state.serial,
            layout_mode: LayoutMode::Logical,
            logical_monitors: vec![crate::model::LogicalMonitor {
                position: crate::model::Position { x: 0, y: 0 },
                scale: 1.0,
                transform: Transform::Normal,
                is_primary: true,
                monitors: vec!["DP-1".to_string()],
                properties: Default::default(),
            }],
            monitors_for_lease: vec![],
        };

        let request = apply_request(&state, &config, ApplyMethod::Verify).unwrap();
        assert_eq!(request.logical_monitors[0].monitors[0].options.color_mode, None);

        state.monitor_mut("DP-1").unwrap().selected_color_mode =
            Some(crate::model::ColorMode::Bt2100);
        let request = apply_request(&state, &config, ApplyMethod::Verify).unwrap();
        assert_eq!(
            request.logical_monitors[0].monitors[0].options.color_mode,
            Some(1)
        );
    }

    #[test]
    fn test_layout_mode_omitted_when_unsupported() {
        let state = crate::state::MonitorsState::from_reply(reply_with(
            vec![test_monitor("DP-1")],
            vec![],
            false,
        ))
        .unwrap();

        let config = Config {
            serial: state.serial,
            layout_mode: LayoutMode::Logical,
            logical_monitors: vec![],
            monitors_for_lease: vec![],
        };

        let request = apply_request(&state, &config, ApplyMethod::Temporary).unwrap();
        assert_eq!(request.properties.layout_mode, None);
    }

    #[test]
    fn test_monitors_for_lease_tuples() {
        let mut state = test_state(&["DP-1", "DP-2"]);
        state.monitor_mut("DP-1").unwrap().selected_mode = Some(0);

        let config = Config {
            serial: state.serial,
            layout_mode: LayoutMode::Logical,
            logical_monitors: vec![crate::model::LogicalMonitor {
                position: crate::model::Position { x: 0, y: 0 },
                scale: 1.0,
                transform: Transform::Normal,
                is_primary: true,
                monitors: vec!["DP-1".to_string()],
                properties: Default::default(),
            }],
            monitors_for_lease: vec!["DP-2".to_string()],
        };

        let request = apply_request(&state, &config, ApplyMethod::Temporary).unwrap();
        let lease = request.properties.monitors_for_lease.unwrap();
        assert_eq!(lease.len(), 1);
        assert_eq!(lease[0].0, "DP-2");
    }
}
