//! Display Configuration Proxy
//!
//! Wraps the org.gnome.Mutter.DisplayConfig interface: fetching the current
//! state, applying configurations, and the per-monitor luminance
//! preferences. Calls are awaited with no local timeout; a one-shot tool
//! has nothing sensible to do on timeout except what the bus itself does.

use std::collections::HashMap;

use tracing::debug;
use zbus::zvariant::OwnedValue;

use crate::error::ConfigError;
use crate::model::ColorMode;
use crate::state::MonitorsState;
use crate::wire::{ApplyRequest, StateReply};

const BUS_NAME: &str = "org.gnome.Mutter.DisplayConfig";
const OBJECT_PATH: &str = "/org/gnome/Mutter/DisplayConfig";
const INTERFACE: &str = "org.gnome.Mutter.DisplayConfig";

/// One entry of the service's `Luminance` property.
#[derive(Debug, Clone, PartialEq)]
pub struct LuminanceEntry {
    /// Connector the preference applies to
    pub connector: String,
    /// Color mode the preference applies to
    pub color_mode: ColorMode,
    /// Output luminance in percent
    pub luminance: f64,
    /// Whether the value is the unconfigured default
    pub is_unset: bool,
}

/// Find the luminance entry for a connector and color mode.
pub fn find_luminance<'a>(
    entries: &'a [LuminanceEntry],
    connector: &str,
    color_mode: ColorMode,
) -> Option<&'a LuminanceEntry> {
    entries
        .iter()
        .find(|entry| entry.connector == connector && entry.color_mode == color_mode)
}

/// Proxy for the display configuration interface.
pub struct DisplayConfig<'a> {
    proxy: zbus::Proxy<'a>,
}

impl<'a> DisplayConfig<'a> {
    /// Create a proxy on an existing session-bus connection.
    pub async fn new(connection: &zbus::Connection) -> Result<DisplayConfig<'a>, ConfigError> {
        let proxy = zbus::ProxyBuilder::new(connection)
            .interface(INTERFACE)
            .and_then(|builder| builder.path(OBJECT_PATH))
            .and_then(|builder| builder.destination(BUS_NAME))
            .map_err(remote_failure)?
            .build()
            .await
            .map_err(remote_failure)?;

        Ok(DisplayConfig { proxy })
    }

    /// Fetch and parse the current monitor state.
    pub async fn current_state(&self) -> Result<MonitorsState, ConfigError> {
        let reply = self
            .proxy
            .call_method("GetCurrentState", &())
            .await
            .map_err(remote_failure)?;
        let state: StateReply = reply
            .body()
            .deserialize()
            .map_err(|error| ConfigError::ProtocolMismatch(error.to_string()))?;

        MonitorsState::from_reply(state)
    }

    /// Submit an ApplyMonitorsConfig request.
    pub async fn apply(&self, request: &ApplyRequest) -> Result<(), ConfigError> {
        debug!(
            serial = request.serial,
            method = request.method,
            logical_monitors = request.logical_monitors.len(),
            "applying configuration"
        );
        self.proxy
            .call_method(
                "ApplyMonitorsConfig",
                &(
                    request.serial,
                    request.method,
                    &request.logical_monitors,
                    &request.properties,
                ),
            )
            .await
            .map_err(remote_failure)?;
        Ok(())
    }

    /// Read the cached `Luminance` property.
    pub async fn luminance(&self) -> Result<Vec<LuminanceEntry>, ConfigError> {
        let value: OwnedValue = self
            .proxy
            .get_property("Luminance")
            .await
            .map_err(|error| remote_failure(error.into()))?;
        parse_luminance_entries(&value)
    }

    /// Set the luminance preference for one connector and color mode.
    pub async fn set_luminance(
        &self,
        connector: &str,
        color_mode: ColorMode,
        luminance: f64,
    ) -> Result<(), ConfigError> {
        self.proxy
            .call_method("SetLuminance", &(connector, color_mode.to_wire(), luminance))
            .await
            .map_err(remote_failure)?;
        Ok(())
    }

    /// Reset the luminance preference for one connector and color mode.
    pub async fn reset_luminance(
        &self,
        connector: &str,
        color_mode: ColorMode,
    ) -> Result<(), ConfigError> {
        self.proxy
            .call_method("ResetLuminance", &(connector, color_mode.to_wire()))
            .await
            .map_err(remote_failure)?;
        Ok(())
    }
}

fn parse_luminance_entries(value: &OwnedValue) -> Result<Vec<LuminanceEntry>, ConfigError> {
    let array = value
        .downcast_ref::<&zbus::zvariant::Array>()
        .map_err(|_| ConfigError::ProtocolMismatch("Luminance is not an array".to_string()))?;

    let mut entries = Vec::with_capacity(array.len());
    for element in array.iter() {
        let owned = element.try_to_owned().map_err(|error| {
            ConfigError::ProtocolMismatch(format!("Luminance entry: {error}"))
        })?;
        let dict: HashMap<String, OwnedValue> = HashMap::try_from(owned).map_err(|_| {
            ConfigError::ProtocolMismatch("Luminance entry is not a dictionary".to_string())
        })?;

        let connector = dict
            .get("connector")
            .and_then(|v| v.downcast_ref::<&str>().ok())
            .ok_or_else(|| luminance_key_error("connector"))?
            .to_owned();
        let color_mode = dict
            .get("color-mode")
            .and_then(|v| v.downcast_ref::<u32>().ok())
            .ok_or_else(|| luminance_key_error("color-mode"))?;
        let luminance = dict
            .get("luminance")
            .and_then(|v| v.downcast_ref::<f64>().ok())
            .ok_or_else(|| luminance_key_error("luminance"))?;
        let is_unset = dict
            .get("is-unset")
            .and_then(|v| v.downcast_ref::<bool>().ok())
            .ok_or_else(|| luminance_key_error("is-unset"))?;

        entries.push(LuminanceEntry {
            connector,
            color_mode: ColorMode::from_wire(color_mode)?,
            luminance,
            is_unset,
        });
    }
    Ok(entries)
}

fn luminance_key_error(key: &str) -> ConfigError {
    ConfigError::ProtocolMismatch(format!("Luminance entry is missing {key}"))
}

/// Map a transport failure to the caller-facing error, stripping the
/// remote error-name prefix some buses prepend to the message.
fn remote_failure(error: zbus::Error) -> ConfigError {
    let message = match &error {
        zbus::Error::MethodError(name, detail, _) => match detail {
            Some(detail) => detail.clone(),
            None => name.to_string(),
        },
        _ => error.to_string(),
    };
    ConfigError::RemoteCallFailure(strip_error_prefix(&message).to_string())
}

fn strip_error_prefix(message: &str) -> &str {
    match message.split_once(": ") {
        Some((prefix, rest)) if prefix.starts_with("org.") && !prefix.contains(' ') => rest,
        _ => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zbus::zvariant::{Array, Signature, Value};

    fn entry_array(dicts: Vec<HashMap<String, Value<'_>>>) -> OwnedValue {
        let mut array = Array::new(Signature::try_from("a{sv}").unwrap());
        for dict in dicts {
            array.append(Value::from(dict)).unwrap();
        }
        OwnedValue::try_from(Value::Array(array)).unwrap()
    }

    fn luminance_value(entries: Vec<(&str, u32, f64, bool)>) -> OwnedValue {
        entry_array(
            entries
                .into_iter()
                .map(|(connector, color_mode, luminance, is_unset)| {
                    HashMap::from([
                        ("connector".to_string(), Value::from(connector)),
                        ("color-mode".to_string(), Value::from(color_mode)),
                        ("luminance".to_string(), Value::from(luminance)),
                        ("is-unset".to_string(), Value::from(is_unset)),
                    ])
                })
                .collect(),
        )
    }

    #[test]
    fn test_parse_luminance_entries() {
        let value = luminance_value(vec![
            ("DP-1", 0, 100.0, true),
            ("DP-1", 1, 80.0, false),
        ]);
        let entries = parse_luminance_entries(&value).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[1],
            LuminanceEntry {
                connector: "DP-1".to_string(),
                color_mode: ColorMode::Bt2100,
                luminance: 80.0,
                is_unset: false,
            }
        );

        let found = find_luminance(&entries, "DP-1", ColorMode::Default).unwrap();
        assert_eq!(found.luminance, 100.0);
        assert!(find_luminance(&entries, "DP-2", ColorMode::Default).is_none());
    }

    #[test]
    fn test_missing_key_is_rejected() {
        let value = entry_array(vec![HashMap::from([(
            "connector".to_string(),
            Value::from("DP-1"),
        )])]);
        assert!(matches!(
            parse_luminance_entries(&value),
            Err(ConfigError::ProtocolMismatch(_))
        ));
    }

    #[test]
    fn test_error_prefix_stripping() {
        assert_eq!(
            strip_error_prefix("org.freedesktop.DBus.Error.Failed: Monitor config incomplete"),
            "Monitor config incomplete"
        );
        assert_eq!(
            strip_error_prefix("Connection refused"),
            "Connection refused"
        );
        assert_eq!(
            strip_error_prefix("something: with a colon"),
            "something: with a colon"
        );
    }
}
