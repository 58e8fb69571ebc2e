//! State Snapshot Parsing
//!
//! Decodes a GetCurrentState reply into the domain model. The snapshot is
//! fetched exactly once per invocation and treated as an immutable
//! point-in-time view; everything downstream (builder, resolver,
//! serializer) is deterministic given this one value.

use tracing::debug;

use crate::error::ConfigError;
use crate::model::{
    translate_properties, ColorMode, Dimension, LayoutMode, LogicalMonitor, Monitor, MonitorMode,
    Position, Properties, PropertyValue, Transform,
};
use crate::wire::{LogicalMonitorDescriptor, ModeDescriptor, MonitorDescriptor, StateReply};

/// Parsed point-in-time view of the display server's state.
#[derive(Debug, Clone)]
pub struct MonitorsState {
    /// Server serial guarding against stale-state application
    pub serial: u32,
    /// Known monitors, in server-reported order
    pub monitors: Vec<Monitor>,
    /// The existing logical-monitor layout
    pub logical_monitors: Vec<LogicalMonitor>,
    /// Translated top-level properties
    pub properties: Properties,
    /// Active layout mode (defaults to logical when unreported)
    pub layout_mode: LayoutMode,
    /// Whether the server accepts layout-mode changes
    pub supports_changing_layout_mode: bool,
}

impl MonitorsState {
    /// Build the domain state from a decoded GetCurrentState reply.
    pub fn from_reply(reply: StateReply) -> Result<Self, ConfigError> {
        let (serial, monitor_descriptors, logical_descriptors, raw_properties) = reply;

        let properties = translate_properties(&raw_properties)?;
        let layout_mode = match properties.get("layout-mode") {
            Some(PropertyValue::LayoutMode(mode)) => *mode,
            _ => LayoutMode::Logical,
        };
        let supports_changing_layout_mode = matches!(
            properties.get("supports-changing-layout-mode"),
            Some(PropertyValue::Bool(true))
        );

        let mut monitors = Vec::with_capacity(monitor_descriptors.len());
        for descriptor in monitor_descriptors {
            monitors.push(parse_monitor(descriptor)?);
        }

        let mut logical_monitors = Vec::with_capacity(logical_descriptors.len());
        for descriptor in logical_descriptors {
            logical_monitors.push(parse_logical_monitor(descriptor, &monitors)?);
        }

        debug!(
            serial,
            monitors = monitors.len(),
            logical_monitors = logical_monitors.len(),
            %layout_mode,
            "parsed current state"
        );

        Ok(Self {
            serial,
            monitors,
            logical_monitors,
            properties,
            layout_mode,
            supports_changing_layout_mode,
        })
    }

    /// Look up a monitor by connector.
    pub fn monitor(&self, connector: &str) -> Option<&Monitor> {
        self.monitors
            .iter()
            .find(|monitor| monitor.connector == connector)
    }

    /// Look up a monitor by connector, mutably.
    pub fn monitor_mut(&mut self, connector: &str) -> Option<&mut Monitor> {
        self.monitors
            .iter_mut()
            .find(|monitor| monitor.connector == connector)
    }
}

fn parse_mode(descriptor: ModeDescriptor) -> Result<MonitorMode, ConfigError> {
    let properties = translate_properties(&descriptor.properties)?;
    Ok(MonitorMode {
        name: descriptor.name,
        resolution: Dimension {
            width: descriptor.width,
            height: descriptor.height,
        },
        refresh_rate: descriptor.refresh_rate,
        preferred_scale: descriptor.preferred_scale,
        supported_scales: descriptor.supported_scales,
        properties,
    })
}

fn parse_monitor(descriptor: MonitorDescriptor) -> Result<Monitor, ConfigError> {
    let connector = descriptor.id.0;
    let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };

    let mut modes = Vec::with_capacity(descriptor.modes.len());
    for mode_descriptor in descriptor.modes {
        modes.push(parse_mode(mode_descriptor)?);
    }
    let current_mode = modes.iter().position(MonitorMode::is_current);
    let preferred_mode = modes.iter().position(MonitorMode::is_preferred);

    let properties = translate_properties(&descriptor.properties)?;
    let color_mode = match properties.get("color-mode") {
        Some(PropertyValue::ColorMode(mode)) => Some(*mode),
        _ => None,
    };
    let supported_color_modes = match properties.get("supported-color-modes") {
        Some(PropertyValue::List(items)) => items
            .iter()
            .filter_map(|item| match item {
                PropertyValue::ColorMode(mode) => Some(*mode),
                _ => None,
            })
            .collect(),
        _ => Vec::<ColorMode>::new(),
    };

    Ok(Monitor {
        connector,
        vendor: non_empty(descriptor.id.1),
        product: non_empty(descriptor.id.2),
        serial: non_empty(descriptor.id.3),
        modes,
        properties,
        current_mode,
        preferred_mode,
        color_mode,
        supported_color_modes,
        selected_mode: None,
        selected_color_mode: None,
    })
}

fn parse_logical_monitor(
    descriptor: LogicalMonitorDescriptor,
    monitors: &[Monitor],
) -> Result<LogicalMonitor, ConfigError> {
    let transform = Transform::from_wire(descriptor.transform)?;
    let properties = translate_properties(&descriptor.properties)?;

    let mut members = Vec::with_capacity(descriptor.monitors.len());
    for id in descriptor.monitors {
        let connector = id.0;
        if !monitors.iter().any(|monitor| monitor.connector == connector) {
            return Err(ConfigError::ProtocolMismatch(format!(
                "logical monitor references unknown connector {connector}"
            )));
        }
        members.push(connector);
    }

    Ok(LogicalMonitor {
        position: Position {
            x: descriptor.x,
            y: descriptor.y,
        },
        scale: descriptor.scale,
        transform,
        is_primary: descriptor.primary,
        monitors: members,
        properties,
    })
}
