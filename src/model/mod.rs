//! Domain Model
//!
//! Typed entities for the display configuration engine: monitors and their
//! modes, logical monitors, wire enums, and translated property maps.

pub mod enums;
pub mod logical;
pub mod monitor;
pub mod properties;

pub use enums::{ApplyMethod, ColorMode, LayoutMode, Transform};
pub use logical::{layout_size, scale_size, transform_size, LogicalMonitor, Position};
pub use monitor::{Dimension, Monitor, MonitorMode};
pub use properties::{translate_properties, Properties, PropertyValue};
