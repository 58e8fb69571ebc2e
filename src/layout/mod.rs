//! Layout Resolution
//!
//! Geometric resolution of a requested layout: matching requested scales
//! against mode-supported ones, and turning absolute or relative placement
//! instructions into concrete positions.

pub mod placement;
pub mod scale;

pub use placement::{
    resolve_positions, HorizontalPlacement, PendingLogicalMonitor, VerticalPlacement,
};
pub use scale::{closest_scale, SCALE_TOLERANCE};
