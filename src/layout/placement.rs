//! Placement Resolution
//!
//! Turns per-logical-monitor placement instructions into concrete
//! positions. Each logical monitor carries at most one horizontal and one
//! vertical instruction; instructions are resolved in declaration order, so
//! a relative instruction may only anchor on a logical monitor declared
//! earlier. After all positions are known, axes with no absolute
//! instruction anywhere are shifted so the layout's top-left edge sits at
//! the origin, making purely-relative layouts translation-invariant.

use std::collections::HashMap;

use tracing::debug;

use crate::error::ConfigError;
use crate::model::{
    layout_size, Dimension, LayoutMode, LogicalMonitor, Position, Properties, Transform,
};

/// Horizontal placement instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HorizontalPlacement {
    /// Absolute X coordinate
    X(i32),
    /// Flush right of the logical monitor containing this connector
    RightOf(String),
    /// Flush left of the logical monitor containing this connector
    LeftOf(String),
}

/// Vertical placement instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerticalPlacement {
    /// Absolute Y coordinate
    Y(i32),
    /// Flush below the logical monitor containing this connector
    Below(String),
    /// Flush above the logical monitor containing this connector
    Above(String),
}

/// A logical monitor whose placement has not been resolved yet.
///
/// Everything except the position is already final; the resolver consumes
/// these and produces fully positioned [`LogicalMonitor`] values.
#[derive(Debug, Clone)]
pub struct PendingLogicalMonitor {
    /// Connectors of the member monitors, non-empty
    pub monitors: Vec<String>,
    /// The group's common mode resolution
    pub mode_resolution: Dimension,
    /// Scale applied to the group
    pub scale: f64,
    /// Viewport transform applied to the group
    pub transform: Transform,
    /// Whether this is the primary logical monitor
    pub is_primary: bool,
    /// Horizontal placement instruction, if any
    pub horizontal: Option<HorizontalPlacement>,
    /// Vertical placement instruction, if any
    pub vertical: Option<VerticalPlacement>,
}

impl PendingLogicalMonitor {
    fn size(&self, layout_mode: LayoutMode) -> Dimension {
        layout_size(self.mode_resolution, self.transform, self.scale, layout_mode)
    }

    fn referenced_connectors(&self) -> impl Iterator<Item = &str> {
        let horizontal = match &self.horizontal {
            Some(HorizontalPlacement::RightOf(connector))
            | Some(HorizontalPlacement::LeftOf(connector)) => Some(connector.as_str()),
            _ => None,
        };
        let vertical = match &self.vertical {
            Some(VerticalPlacement::Below(connector))
            | Some(VerticalPlacement::Above(connector)) => Some(connector.as_str()),
            _ => None,
        };
        horizontal.into_iter().chain(vertical)
    }
}

/// How one axis of a logical monitor got its coordinate. Only absolute
/// instructions pin the layout in place; axes resolved relatively or by
/// defaulting are normalized afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisResolution {
    Unresolved,
    Absolute,
    Relative,
}

#[derive(Debug, Clone)]
struct ResolvedSlot {
    position: Position,
    size: Dimension,
    x_resolution: AxisResolution,
    y_resolution: AxisResolution,
}

/// Resolve positions for all pending logical monitors, in declaration
/// order, and normalize axes with no absolute instruction.
pub fn resolve_positions(
    pending: Vec<PendingLogicalMonitor>,
    layout_mode: LayoutMode,
) -> Result<Vec<LogicalMonitor>, ConfigError> {
    let mut slots = {
        let mut groups: HashMap<&str, usize> = HashMap::new();
        for (index, monitor) in pending.iter().enumerate() {
            for connector in &monitor.monitors {
                groups.entry(connector).or_insert(index);
            }
        }

        let mut resolved: Vec<Option<ResolvedSlot>> = vec![None; pending.len()];
        for (index, monitor) in pending.iter().enumerate() {
            let own_size = monitor.size(layout_mode);
            let inherit_y = monitor.vertical.is_none();

            let (x, y, x_resolution) = match &monitor.horizontal {
                Some(HorizontalPlacement::X(x)) => {
                    (*x, inherit_y.then_some(0), AxisResolution::Absolute)
                }
                Some(HorizontalPlacement::RightOf(connector)) => {
                    let slot = anchor(&pending, &groups, &resolved, index, connector)?;
                    (
                        slot.position.x + slot.size.width,
                        inherit_y.then_some(slot.position.y),
                        AxisResolution::Relative,
                    )
                }
                Some(HorizontalPlacement::LeftOf(connector)) => {
                    let slot = anchor(&pending, &groups, &resolved, index, connector)?;
                    (
                        slot.position.x - own_size.width,
                        inherit_y.then_some(slot.position.y),
                        AxisResolution::Relative,
                    )
                }
                None => (0, Some(0), AxisResolution::Unresolved),
            };

            let inherit_x = monitor.horizontal.is_none();
            let (x, y, y_resolution) = match &monitor.vertical {
                Some(VerticalPlacement::Y(y)) => {
                    (if inherit_x { 0 } else { x }, *y, AxisResolution::Absolute)
                }
                Some(VerticalPlacement::Below(connector)) => {
                    let slot = anchor(&pending, &groups, &resolved, index, connector)?;
                    (
                        if inherit_x { slot.position.x } else { x },
                        slot.position.y + slot.size.height,
                        AxisResolution::Relative,
                    )
                }
                Some(VerticalPlacement::Above(connector)) => {
                    let slot = anchor(&pending, &groups, &resolved, index, connector)?;
                    (
                        if inherit_x { slot.position.x } else { x },
                        slot.position.y - own_size.height,
                        AxisResolution::Relative,
                    )
                }
                None => (x, y.unwrap_or(0), AxisResolution::Unresolved),
            };

            resolved[index] = Some(ResolvedSlot {
                position: Position { x, y },
                size: own_size,
                x_resolution,
                y_resolution,
            });
        }

        resolved.into_iter().flatten().collect::<Vec<_>>()
    };

    normalize_axis(
        &mut slots,
        |slot| slot.x_resolution,
        |slot| &mut slot.position.x,
    );
    normalize_axis(
        &mut slots,
        |slot| slot.y_resolution,
        |slot| &mut slot.position.y,
    );

    debug!(
        logical_monitors = slots.len(),
        %layout_mode,
        "resolved logical monitor positions"
    );

    Ok(pending
        .into_iter()
        .zip(slots)
        .map(|(monitor, slot)| LogicalMonitor {
            position: slot.position,
            scale: monitor.scale,
            transform: monitor.transform,
            is_primary: monitor.is_primary,
            monitors: monitor.monitors,
            properties: Properties::new(),
        })
        .collect())
}

/// Shift one axis so its minimum coordinate is 0, unless any logical
/// monitor pinned that axis with an absolute instruction.
fn normalize_axis(
    slots: &mut [ResolvedSlot],
    resolution: impl Fn(&ResolvedSlot) -> AxisResolution,
    coordinate: impl Fn(&mut ResolvedSlot) -> &mut i32,
) {
    if slots
        .iter()
        .any(|slot| resolution(slot) == AxisResolution::Absolute)
    {
        return;
    }
    let Some(minimum) = slots
        .iter_mut()
        .map(|slot| *coordinate(slot))
        .min()
    else {
        return;
    };
    if minimum == 0 {
        return;
    }
    for slot in slots {
        *coordinate(slot) -= minimum;
    }
}

/// Look up the already-resolved logical monitor containing `connector`.
///
/// An unresolved target is either a forward reference or part of a
/// reference cycle; the two are distinguished by walking the reference
/// graph from the target back towards the monitor being placed.
fn anchor<'a>(
    pending: &[PendingLogicalMonitor],
    groups: &HashMap<&str, usize>,
    resolved: &'a [Option<ResolvedSlot>],
    current: usize,
    connector: &str,
) -> Result<&'a ResolvedSlot, ConfigError> {
    let target = *groups
        .get(connector)
        .ok_or_else(|| ConfigError::UnknownMonitor(connector.to_string()))?;
    match &resolved[target] {
        Some(slot) => Ok(slot),
        None if references_reach(pending, groups, target, current) => {
            Err(ConfigError::CyclicPlacement(connector.to_string()))
        }
        None => Err(ConfigError::UnresolvedPlacementReference(
            connector.to_string(),
        )),
    }
}

fn references_reach(
    pending: &[PendingLogicalMonitor],
    groups: &HashMap<&str, usize>,
    start: usize,
    goal: usize,
) -> bool {
    let mut visited = vec![false; pending.len()];
    let mut stack = vec![start];
    while let Some(index) = stack.pop() {
        if index == goal {
            return true;
        }
        if visited[index] {
            continue;
        }
        visited[index] = true;
        for connector in pending[index].referenced_connectors() {
            if let Some(&next) = groups.get(connector) {
                stack.push(next);
            }
        }
    }
    false
}
