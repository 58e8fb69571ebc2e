//! Wire Enum Tables
//!
//! Each enum exchanged with the display service carries an explicit,
//! exhaustively-checked bidirectional table: variant ↔ wire integer ↔
//! display string. Lookups go through the table in both directions so a
//! missing entry is caught by the table tests rather than at call sites.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Rotation and/or flip applied to a monitor's output before layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// No rotation or flip
    Normal,
    /// 90° counter-clockwise
    Rotate90,
    /// 180°
    Rotate180,
    /// 270° counter-clockwise
    Rotate270,
    /// Horizontal flip
    Flipped,
    /// Flip then 90°
    Flipped90,
    /// Flip then 270°
    Flipped270,
    /// Flip then 180°
    Flipped180,
}

impl Transform {
    const TABLE: [(Transform, u32, &'static str); 8] = [
        (Transform::Normal, 0, "normal"),
        (Transform::Rotate90, 1, "90"),
        (Transform::Rotate180, 2, "180"),
        (Transform::Rotate270, 3, "270"),
        (Transform::Flipped, 4, "flipped"),
        (Transform::Flipped90, 5, "flipped-90"),
        (Transform::Flipped270, 6, "flipped-270"),
        (Transform::Flipped180, 7, "flipped-180"),
    ];

    /// All variants, in wire-code order
    pub const ALL: [Transform; 8] = [
        Transform::Normal,
        Transform::Rotate90,
        Transform::Rotate180,
        Transform::Rotate270,
        Transform::Flipped,
        Transform::Flipped90,
        Transform::Flipped270,
        Transform::Flipped180,
    ];

    /// Decode a wire integer
    pub fn from_wire(code: u32) -> Result<Self, ConfigError> {
        Self::TABLE
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(t, _, _)| *t)
            .ok_or(ConfigError::UnknownEnumValue {
                what: "transform",
                value: code,
            })
    }

    /// Encode to the wire integer
    pub fn to_wire(self) -> u32 {
        Self::TABLE
            .iter()
            .find(|(t, _, _)| *t == self)
            .map(|(_, c, _)| *c)
            .unwrap_or_default()
    }

    /// Display string, as accepted by `--transform`
    pub fn name(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(t, _, _)| *t == self)
            .map(|(_, _, n)| *n)
            .unwrap_or_default()
    }

    /// Whether this transform swaps width and height
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Transform::Rotate90
                | Transform::Rotate270
                | Transform::Flipped90
                | Transform::Flipped270
        )
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::TABLE
            .iter()
            .find(|(_, _, n)| *n == s)
            .map(|(t, _, _)| *t)
            .ok_or_else(|| format!("invalid transform {s:?}"))
    }
}

/// Whether logical monitor sizes are scale-adjusted or raw pixel sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Sizes divided by the logical monitor's scale
    Logical,
    /// Raw pixel sizes
    Physical,
    /// Reserved variant reported by newer servers
    GlobalUiLogical,
}

impl LayoutMode {
    const TABLE: [(LayoutMode, u32, &'static str); 3] = [
        (LayoutMode::Logical, 1, "logical"),
        (LayoutMode::Physical, 2, "physical"),
        (LayoutMode::GlobalUiLogical, 3, "global-ui-logical"),
    ];

    /// All variants, in wire-code order
    pub const ALL: [LayoutMode; 3] = [
        LayoutMode::Logical,
        LayoutMode::Physical,
        LayoutMode::GlobalUiLogical,
    ];

    /// Decode a wire integer
    pub fn from_wire(code: u32) -> Result<Self, ConfigError> {
        Self::TABLE
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(m, _, _)| *m)
            .ok_or(ConfigError::UnknownEnumValue {
                what: "layout-mode",
                value: code,
            })
    }

    /// Encode to the wire integer
    pub fn to_wire(self) -> u32 {
        Self::TABLE
            .iter()
            .find(|(m, _, _)| *m == self)
            .map(|(_, c, _)| *c)
            .unwrap_or_default()
    }

    /// Display string, as accepted by `--layout-mode`
    pub fn name(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(m, _, _)| *m == self)
            .map(|(_, _, n)| *n)
            .unwrap_or_default()
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::TABLE
            .iter()
            .find(|(_, _, n)| *n == s)
            .map(|(m, _, _)| *m)
            .ok_or_else(|| format!("invalid layout mode {s:?}"))
    }
}

/// Color pipeline selected for a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// SDR default
    Default,
    /// BT.2100 (HDR)
    Bt2100,
}

impl ColorMode {
    const TABLE: [(ColorMode, u32, &'static str); 2] = [
        (ColorMode::Default, 0, "default"),
        (ColorMode::Bt2100, 1, "bt2100"),
    ];

    /// All variants, in wire-code order
    pub const ALL: [ColorMode; 2] = [ColorMode::Default, ColorMode::Bt2100];

    /// Decode a wire integer
    pub fn from_wire(code: u32) -> Result<Self, ConfigError> {
        Self::TABLE
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(m, _, _)| *m)
            .ok_or(ConfigError::UnknownEnumValue {
                what: "color-mode",
                value: code,
            })
    }

    /// Encode to the wire integer
    pub fn to_wire(self) -> u32 {
        Self::TABLE
            .iter()
            .find(|(m, _, _)| *m == self)
            .map(|(_, c, _)| *c)
            .unwrap_or_default()
    }

    /// Display string, as accepted by `--color-mode`
    pub fn name(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(m, _, _)| *m == self)
            .map(|(_, _, n)| *n)
            .unwrap_or_default()
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::TABLE
            .iter()
            .find(|(_, _, n)| *n == s)
            .map(|(m, _, _)| *m)
            .ok_or_else(|| format!("invalid color mode {s:?}"))
    }
}

/// How a configuration is applied by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMethod {
    /// Validate only, change nothing
    Verify,
    /// Apply until the session ends
    Temporary,
    /// Apply and persist
    Persistent,
}

impl ApplyMethod {
    /// Encode to the wire integer
    pub fn to_wire(self) -> u32 {
        match self {
            ApplyMethod::Verify => 0,
            ApplyMethod::Temporary => 1,
            ApplyMethod::Persistent => 2,
        }
    }
}
