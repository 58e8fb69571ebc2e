//! Configuration Building
//!
//! Turns a fully-formed, immutable request (what the caller asked for) into
//! a validated [`Config`] (what will be applied). Mode and color-mode
//! selections are recorded on the state snapshot's monitors, which stay the
//! single source of truth the serializer reads from.

use std::collections::HashSet;

use tracing::debug;

use crate::error::ConfigError;
use crate::layout::{
    closest_scale, resolve_positions, HorizontalPlacement, PendingLogicalMonitor,
    VerticalPlacement,
};
use crate::model::{ColorMode, LayoutMode, LogicalMonitor, Transform};
use crate::state::MonitorsState;

/// One monitor inside a requested logical-monitor group.
#[derive(Debug, Clone, Default)]
pub struct MonitorSpec {
    /// Connector of the monitor
    pub connector: String,
    /// Mode name; the monitor's preferred mode when unset
    pub mode: Option<String>,
    /// Color mode to select, if any
    pub color_mode: Option<ColorMode>,
}

/// A placement instruction attached to a logical-monitor group, in the
/// order the caller gave them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Absolute X coordinate
    X(i32),
    /// Absolute Y coordinate
    Y(i32),
    /// Right of the logical monitor containing this connector
    RightOf(String),
    /// Left of the logical monitor containing this connector
    LeftOf(String),
    /// Above the logical monitor containing this connector
    Above(String),
    /// Below the logical monitor containing this connector
    Below(String),
}

/// One requested logical monitor.
#[derive(Debug, Clone, Default)]
pub struct LogicalMonitorSpec {
    /// Member monitors, non-empty
    pub monitors: Vec<MonitorSpec>,
    /// Requested scale; the first mode's preferred scale when unset
    pub scale: Option<f64>,
    /// Viewport transform; normal when unset
    pub transform: Option<Transform>,
    /// Whether this is the primary logical monitor
    pub is_primary: bool,
    /// Placement instructions, at most one per axis
    pub placements: Vec<Placement>,
}

/// A complete configuration request.
#[derive(Debug, Clone, Default)]
pub struct ConfigRequest {
    /// Layout mode to switch to; the snapshot's current mode when unset
    pub layout_mode: Option<LayoutMode>,
    /// Requested logical monitors, in declaration order
    pub logical_monitors: Vec<LogicalMonitorSpec>,
    /// Connectors to offer for exclusive lease
    pub monitors_for_lease: Vec<String>,
}

/// A validated, fully positioned configuration, ready to serialize.
#[derive(Debug, Clone)]
pub struct Config {
    /// State serial the configuration was built against
    pub serial: u32,
    /// Layout mode the positions were computed under
    pub layout_mode: LayoutMode,
    /// Resolved logical monitors, in request order
    pub logical_monitors: Vec<LogicalMonitor>,
    /// Connectors offered for exclusive lease
    pub monitors_for_lease: Vec<String>,
}

impl Config {
    /// Snapshot the currently applied layout as a configuration.
    pub fn from_state(state: &MonitorsState) -> Self {
        Self {
            serial: state.serial,
            layout_mode: state.layout_mode,
            logical_monitors: state.logical_monitors.clone(),
            monitors_for_lease: Vec::new(),
        }
    }
}

/// Build and validate a configuration against a state snapshot.
///
/// Mode and color-mode selections are written back onto `state`'s monitors;
/// the returned [`Config`] references them by connector.
pub fn build_config(
    state: &mut MonitorsState,
    request: &ConfigRequest,
) -> Result<Config, ConfigError> {
    let layout_mode = match request.layout_mode {
        Some(layout_mode) => {
            if !state.supports_changing_layout_mode {
                return Err(ConfigError::UnsupportedOperation(
                    "Configuring layout mode not supported by the server".to_string(),
                ));
            }
            layout_mode
        }
        None => state.layout_mode,
    };

    let mut assigned: HashSet<String> = HashSet::new();
    let mut pending = Vec::with_capacity(request.logical_monitors.len());
    for spec in &request.logical_monitors {
        pending.push(build_logical_monitor(state, spec, &mut assigned)?);
    }

    let mut monitors_for_lease = Vec::with_capacity(request.monitors_for_lease.len());
    for connector in &request.monitors_for_lease {
        if state.monitor(connector).is_none() {
            return Err(ConfigError::UnknownMonitor(connector.clone()));
        }
        monitors_for_lease.push(connector.clone());
    }

    let logical_monitors = resolve_positions(pending, layout_mode)?;

    debug!(
        serial = state.serial,
        logical_monitors = logical_monitors.len(),
        %layout_mode,
        "built configuration"
    );

    Ok(Config {
        serial: state.serial,
        layout_mode,
        logical_monitors,
        monitors_for_lease,
    })
}

fn build_logical_monitor(
    state: &mut MonitorsState,
    spec: &LogicalMonitorSpec,
    assigned: &mut HashSet<String>,
) -> Result<PendingLogicalMonitor, ConfigError> {
    if spec.monitors.is_empty() {
        return Err(ConfigError::EmptyLogicalMonitor);
    }
    let (horizontal, vertical) = split_placements(&spec.placements)?;

    let mut scale = spec.scale;
    let mut common_resolution = None;
    let mut connectors = Vec::with_capacity(spec.monitors.len());

    for monitor_spec in &spec.monitors {
        let connector = &monitor_spec.connector;
        if !assigned.insert(connector.clone()) {
            return Err(ConfigError::MonitorAlreadyAssigned(connector.clone()));
        }
        let monitor = state
            .monitor_mut(connector)
            .ok_or_else(|| ConfigError::UnknownMonitor(connector.clone()))?;

        let mode_index = match &monitor_spec.mode {
            Some(name) => monitor
                .mode_index(name)
                .ok_or_else(|| ConfigError::UnknownMode {
                    connector: connector.clone(),
                    mode: name.clone(),
                })?,
            None => monitor
                .preferred_mode
                .ok_or_else(|| ConfigError::UnknownMode {
                    connector: connector.clone(),
                    mode: "preferred".to_string(),
                })?,
        };
        let mode = &monitor.modes[mode_index];

        match common_resolution {
            None => {
                common_resolution = Some(mode.resolution);
                scale = Some(match scale {
                    Some(requested) => closest_scale(mode, requested)?,
                    None => mode.preferred_scale,
                });
            }
            Some(expected) if mode.resolution != expected => {
                return Err(ConfigError::ResolutionMismatch {
                    connector: connector.clone(),
                    got: mode.resolution.to_string(),
                    expected: expected.to_string(),
                });
            }
            Some(_) => {}
        }

        monitor.selected_mode = Some(mode_index);
        monitor.selected_color_mode = monitor_spec.color_mode;
        connectors.push(connector.clone());
    }

    // non-empty group, so both were set on the first iteration
    let (Some(mode_resolution), Some(scale)) = (common_resolution, scale) else {
        return Err(ConfigError::EmptyLogicalMonitor);
    };

    Ok(PendingLogicalMonitor {
        monitors: connectors,
        mode_resolution,
        scale,
        transform: spec.transform.unwrap_or(Transform::Normal),
        is_primary: spec.is_primary,
        horizontal,
        vertical,
    })
}

fn split_placements(
    placements: &[Placement],
) -> Result<(Option<HorizontalPlacement>, Option<VerticalPlacement>), ConfigError> {
    let mut horizontal = None;
    let mut vertical = None;
    for placement in placements {
        match placement {
            Placement::X(x) => {
                set_axis(&mut horizontal, HorizontalPlacement::X(*x), "horizontal")?;
            }
            Placement::RightOf(connector) => set_axis(
                &mut horizontal,
                HorizontalPlacement::RightOf(connector.clone()),
                "horizontal",
            )?,
            Placement::LeftOf(connector) => set_axis(
                &mut horizontal,
                HorizontalPlacement::LeftOf(connector.clone()),
                "horizontal",
            )?,
            Placement::Y(y) => {
                set_axis(&mut vertical, VerticalPlacement::Y(*y), "vertical")?;
            }
            Placement::Below(connector) => set_axis(
                &mut vertical,
                VerticalPlacement::Below(connector.clone()),
                "vertical",
            )?,
            Placement::Above(connector) => set_axis(
                &mut vertical,
                VerticalPlacement::Above(connector.clone()),
                "vertical",
            )?,
        }
    }
    Ok((horizontal, vertical))
}

fn set_axis<T>(slot: &mut Option<T>, value: T, axis: &'static str) -> Result<(), ConfigError> {
    if slot.is_some() {
        return Err(ConfigError::ConflictingPlacement { axis });
    }
    *slot = Some(value);
    Ok(())
}
