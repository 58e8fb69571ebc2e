//! # displayctl
//!
//! Display configuration tool for GNOME - inspects and reconfigures the
//! monitor layout through `org.gnome.Mutter.DisplayConfig` on the session
//! bus.
//!
//! # Architecture
//!
//! ```text
//! displayctl
//!   ├─> CLI (clap routing + explicit group parsers)
//!   ├─> DisplayConfig proxy (zbus, session bus)
//!   ├─> State parser (wire snapshot → domain model)
//!   ├─> Config builder (request specs → validated Config)
//!   │     ├─> Scale matcher (tolerance-snapped supported scales)
//!   │     └─> Placement resolver (absolute/relative → positions)
//!   ├─> Config serializer (Config → ApplyMonitorsConfig tuples)
//!   └─> Tree renderer (show / set --verbose output)
//! ```
//!
//! The state snapshot is fetched once per invocation; everything downstream
//! is deterministic given that snapshot, and the serial captured with it is
//! the one submitted at apply time.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Command-line argument types and group parsers
pub mod cli;
/// Request specs and the config builder
pub mod configure;
/// Session-bus proxies
pub mod dbus;
/// Error taxonomy
pub mod error;
/// Scale matching and placement resolution
pub mod layout;
/// Domain model
pub mod model;
/// Tree rendering for `show` and config echoes
pub mod show;
/// State snapshot parsing
pub mod state;
/// Wire schema and the config serializer
pub mod wire;
