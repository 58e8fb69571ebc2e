//! Logical Monitors
//!
//! A logical monitor groups one or more physical monitors into a single
//! placement slot in the workspace layout. Instances come either from the
//! state snapshot (the existing layout) or from the placement resolver (a
//! freshly built configuration); in both cases the position is fully
//! resolved.

use crate::model::enums::{LayoutMode, Transform};
use crate::model::monitor::Dimension;
use crate::model::properties::Properties;

/// A resolved position in the workspace layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

/// A group of monitors occupying one placement slot.
///
/// Member monitors are referenced by connector; the monitor data itself is
/// owned by the state snapshot, which stays the single source of truth for
/// mode and color-mode selections.
#[derive(Debug, Clone)]
pub struct LogicalMonitor {
    /// Resolved position
    pub position: Position,
    /// Scale applied to the group
    pub scale: f64,
    /// Viewport transform applied to the group
    pub transform: Transform,
    /// Whether this is the primary logical monitor
    pub is_primary: bool,
    /// Connectors of the member monitors, non-empty
    pub monitors: Vec<String>,
    /// Translated properties (snapshot-reported layouts only)
    pub properties: Properties,
}

/// Apply a transform to a size: the 90/270 family swaps width and height,
/// everything else is the identity.
pub fn transform_size(size: Dimension, transform: Transform) -> Dimension {
    if transform.swaps_dimensions() {
        Dimension {
            width: size.height,
            height: size.width,
        }
    } else {
        size
    }
}

/// Divide a size by a scale, rounding to the nearest integer.
pub fn scale_size(size: Dimension, scale: f64) -> Dimension {
    Dimension {
        width: (size.width as f64 / scale).round() as i32,
        height: (size.height as f64 / scale).round() as i32,
    }
}

/// Size of a logical monitor as placed in the layout: the (common) mode
/// resolution, transformed, and scale-divided under logical layout mode.
pub fn layout_size(
    mode_resolution: Dimension,
    transform: Transform,
    scale: f64,
    layout_mode: LayoutMode,
) -> Dimension {
    let size = transform_size(mode_resolution, transform);
    match layout_mode {
        LayoutMode::Logical | LayoutMode::GlobalUiLogical => scale_size(size, scale),
        LayoutMode::Physical => size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FHD: Dimension = Dimension {
        width: 1920,
        height: 1080,
    };

    // =========================================================================
    // transform_size
    // =========================================================================

    #[test]
    fn test_transform_size_identity_family() {
        for transform in [
            Transform::Normal,
            Transform::Rotate180,
            Transform::Flipped,
            Transform::Flipped180,
        ] {
            assert_eq!(transform_size(FHD, transform), FHD);
        }
    }

    #[test]
    fn test_transform_size_swapping_family() {
        let portrait = Dimension {
            width: 1080,
            height: 1920,
        };
        for transform in [
            Transform::Rotate90,
            Transform::Rotate270,
            Transform::Flipped90,
            Transform::Flipped270,
        ] {
            assert_eq!(transform_size(FHD, transform), portrait);
        }
    }

    #[test]
    fn test_four_quarter_rotations_return_original() {
        let mut size = FHD;
        for _ in 0..4 {
            size = transform_size(size, Transform::Rotate90);
        }
        assert_eq!(size, FHD);
    }

    // =========================================================================
    // scale_size / layout_size
    // =========================================================================

    #[test]
    fn test_scale_size_rounds_to_nearest() {
        let scaled = scale_size(FHD, 1.5);
        assert_eq!(scaled, Dimension { width: 1280, height: 720 });

        let scaled = scale_size(Dimension { width: 2560, height: 1440 }, 1.75);
        // 2560 / 1.75 = 1462.86, 1440 / 1.75 = 822.86
        assert_eq!(scaled, Dimension { width: 1463, height: 823 });
    }

    #[test]
    fn test_layout_size_logical_vs_physical() {
        let logical = layout_size(FHD, Transform::Normal, 2.0, LayoutMode::Logical);
        assert_eq!(logical, Dimension { width: 960, height: 540 });

        let physical = layout_size(FHD, Transform::Normal, 2.0, LayoutMode::Physical);
        assert_eq!(physical, FHD);
    }

    #[test]
    fn test_layout_size_transformed_and_scaled() {
        let size = layout_size(FHD, Transform::Rotate90, 1.5, LayoutMode::Logical);
        assert_eq!(size, Dimension { width: 720, height: 1280 });
    }
}
