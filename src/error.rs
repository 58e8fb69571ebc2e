//! Configuration Error Taxonomy
//!
//! Every failure while decoding a state snapshot, building a configuration,
//! or talking to the display service maps onto exactly one of these
//! variants. All of them are fatal to the current invocation; nothing in
//! this tool retries.

use thiserror::Error;

/// Errors produced while parsing, validating, or applying a display
/// configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The service reply did not match the expected wire schema
    #[error("Protocol mismatch: {0}")]
    ProtocolMismatch(String),

    /// An integer-coded enum property carried an unrecognized value
    #[error("Unknown {what} value {value}")]
    UnknownEnumValue {
        /// Which enum the value was decoded for (e.g. "transform")
        what: &'static str,
        /// The offending wire integer
        value: u32,
    },

    /// A connector did not match any monitor in the state snapshot
    #[error("Monitor {0} not found")]
    UnknownMonitor(String),

    /// A mode name did not match any mode of the given monitor
    #[error("No mode {mode} available for {connector}")]
    UnknownMode {
        /// The monitor the mode was looked up on
        connector: String,
        /// The requested mode name
        mode: String,
    },

    /// Monitors grouped into one logical monitor have differing resolutions
    #[error("Different monitor resolutions within the same logical monitor ({connector} is {got}, expected {expected})")]
    ResolutionMismatch {
        /// The monitor whose mode broke the group resolution
        connector: String,
        /// Resolution of the offending mode
        got: String,
        /// Resolution established by the first monitor in the group
        expected: String,
    },

    /// More than one placement instruction was given for the same axis
    #[error("Multiple {axis} placement instructions used")]
    ConflictingPlacement {
        /// "horizontal" or "vertical"
        axis: &'static str,
    },

    /// A relative placement referenced a monitor with no resolved position
    #[error("Logical monitor position configured before {0}")]
    UnresolvedPlacementReference(String),

    /// Relative placements form a reference cycle
    #[error("Cyclic placement involving {0}")]
    CyclicPlacement(String),

    /// The requested scale is not within tolerance of any supported scale
    #[error("Scale {scale} not supported by mode {mode}")]
    UnsupportedScale {
        /// The requested scale
        scale: f64,
        /// The mode whose supported scales were searched
        mode: String,
    },

    /// The service does not support the requested operation
    #[error("{0}")]
    UnsupportedOperation(String),

    /// A `--logical-monitor` group contained no monitors
    #[error("Logical monitor empty")]
    EmptyLogicalMonitor,

    /// One monitor was placed in more than one logical monitor
    #[error("Monitor {0} assigned to more than one logical monitor")]
    MonitorAlreadyAssigned(String),

    /// The remote call itself failed; message has its D-Bus prefix stripped
    #[error("{0}")]
    RemoteCallFailure(String),
}
