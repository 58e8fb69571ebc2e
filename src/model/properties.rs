//! Snapshot Property Translation
//!
//! The display service reports free-form `a{sv}` property maps on monitors,
//! modes, logical monitors, and the state itself. A handful of keys carry
//! integer-coded enums; those are translated into domain enums here so the
//! rest of the tool never sees raw wire integers.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

use zbus::zvariant::{Array, OwnedValue};

use crate::error::ConfigError;
use crate::model::enums::{ColorMode, LayoutMode};

/// A translated property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Plain string
    Str(String),
    /// Boolean, displayed as yes/no
    Bool(bool),
    /// Signed integer (i16/i32/i64 on the wire)
    Int(i64),
    /// Unsigned integer (u8/u16/u32/u64 on the wire)
    UInt(u64),
    /// Double
    Double(f64),
    /// Translated layout mode
    LayoutMode(LayoutMode),
    /// Translated color mode
    ColorMode(ColorMode),
    /// List of values (e.g. supported color modes)
    List(Vec<PropertyValue>),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Str(s) => f.write_str(s),
            PropertyValue::Bool(b) => f.write_str(if *b { "yes" } else { "no" }),
            PropertyValue::Int(i) => write!(f, "{i}"),
            PropertyValue::UInt(u) => write!(f, "{u}"),
            PropertyValue::Double(d) => write!(f, "{d}"),
            PropertyValue::LayoutMode(m) => write!(f, "{m}"),
            PropertyValue::ColorMode(m) => write!(f, "{m}"),
            PropertyValue::List(items) => {
                let elements: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", elements.join(", "))
            }
        }
    }
}

/// Ordered property map; BTreeMap keeps `show -p` output stable.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Translate a raw property map, converting integer-coded enum properties
/// into domain enums. Unrecognized enum integers fail with
/// [`ConfigError::UnknownEnumValue`].
pub fn translate_properties(
    raw: &HashMap<String, OwnedValue>,
) -> Result<Properties, ConfigError> {
    let mut properties = Properties::new();
    for (key, value) in raw {
        properties.insert(key.clone(), translate_property(key, value)?);
    }
    Ok(properties)
}

fn translate_property(name: &str, value: &OwnedValue) -> Result<PropertyValue, ConfigError> {
    match name {
        "layout-mode" => {
            let code = enum_code(name, value)?;
            Ok(PropertyValue::LayoutMode(LayoutMode::from_wire(code)?))
        }
        "color-mode" => {
            let code = enum_code(name, value)?;
            Ok(PropertyValue::ColorMode(ColorMode::from_wire(code)?))
        }
        "supported-color-modes" => {
            let array = value.downcast_ref::<&Array>().map_err(|_| {
                ConfigError::ProtocolMismatch(format!(
                    "property {name} is not an array"
                ))
            })?;
            let mut modes = Vec::with_capacity(array.len());
            for element in array.iter() {
                let code = element.downcast_ref::<u32>().map_err(|_| {
                    ConfigError::ProtocolMismatch(format!(
                        "property {name} element is not a u32"
                    ))
                })?;
                modes.push(PropertyValue::ColorMode(ColorMode::from_wire(code)?));
            }
            Ok(PropertyValue::List(modes))
        }
        _ => Ok(plain_value(value)),
    }
}

fn enum_code(name: &str, value: &OwnedValue) -> Result<u32, ConfigError> {
    value.downcast_ref::<u32>().map_err(|_| {
        ConfigError::ProtocolMismatch(format!("property {name} is not a u32"))
    })
}

fn plain_value(value: &OwnedValue) -> PropertyValue {
    if let Ok(s) = value.downcast_ref::<&str>() {
        return PropertyValue::Str(s.to_owned());
    }
    if let Ok(b) = value.downcast_ref::<bool>() {
        return PropertyValue::Bool(b);
    }
    if let Ok(i) = value.downcast_ref::<i64>() {
        return PropertyValue::Int(i);
    }
    if let Ok(i) = value.downcast_ref::<i32>() {
        return PropertyValue::Int(i as i64);
    }
    if let Ok(i) = value.downcast_ref::<i16>() {
        return PropertyValue::Int(i as i64);
    }
    if let Ok(u) = value.downcast_ref::<u64>() {
        return PropertyValue::UInt(u);
    }
    if let Ok(u) = value.downcast_ref::<u32>() {
        return PropertyValue::UInt(u as u64);
    }
    if let Ok(u) = value.downcast_ref::<u16>() {
        return PropertyValue::UInt(u as u64);
    }
    if let Ok(u) = value.downcast_ref::<u8>() {
        return PropertyValue::UInt(u as u64);
    }
    if let Ok(d) = value.downcast_ref::<f64>() {
        return PropertyValue::Double(d);
    }
    if let Ok(array) = value.downcast_ref::<&Array>() {
        let items = array
            .iter()
            .map(|element| {
                // Nested containers beyond one level do not occur in practice
                if let Ok(s) = element.downcast_ref::<&str>() {
                    PropertyValue::Str(s.to_owned())
                } else if let Ok(u) = element.downcast_ref::<u32>() {
                    PropertyValue::UInt(u as u64)
                } else if let Ok(i) = element.downcast_ref::<i32>() {
                    PropertyValue::Int(i as i64)
                } else if let Ok(d) = element.downcast_ref::<f64>() {
                    PropertyValue::Double(d)
                } else {
                    PropertyValue::Str(format!("{element:?}"))
                }
            })
            .collect();
        return PropertyValue::List(items);
    }
    tracing::debug!(
        "untranslatable property value with signature {:?}",
        value.value_signature()
    );
    PropertyValue::Str(format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zbus::zvariant::Value;

    fn owned(value: Value<'_>) -> OwnedValue {
        OwnedValue::try_from(value).unwrap()
    }

    #[test]
    fn test_translate_layout_mode() {
        let mut raw = HashMap::new();
        raw.insert("layout-mode".to_string(), owned(Value::from(2u32)));

        let properties = translate_properties(&raw).unwrap();
        assert_eq!(
            properties.get("layout-mode"),
            Some(&PropertyValue::LayoutMode(LayoutMode::Physical))
        );
    }

    #[test]
    fn test_translate_supported_color_modes() {
        let mut raw = HashMap::new();
        raw.insert(
            "supported-color-modes".to_string(),
            owned(Value::from(vec![0u32, 1u32])),
        );

        let properties = translate_properties(&raw).unwrap();
        assert_eq!(
            properties.get("supported-color-modes"),
            Some(&PropertyValue::List(vec![
                PropertyValue::ColorMode(ColorMode::Default),
                PropertyValue::ColorMode(ColorMode::Bt2100),
            ]))
        );
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let mut raw = HashMap::new();
        raw.insert("color-mode".to_string(), owned(Value::from(9u32)));

        assert!(matches!(
            translate_properties(&raw),
            Err(ConfigError::UnknownEnumValue {
                what: "color-mode",
                value: 9
            })
        ));
    }

    #[test]
    fn test_plain_values_pass_through() {
        let mut raw = HashMap::new();
        raw.insert("display-name".to_string(), owned(Value::from("Dell U2720Q")));
        raw.insert("is-builtin".to_string(), owned(Value::from(false)));
        raw.insert("min-refresh-rate".to_string(), owned(Value::from(30i32)));

        let properties = translate_properties(&raw).unwrap();
        assert_eq!(
            properties.get("display-name"),
            Some(&PropertyValue::Str("Dell U2720Q".to_string()))
        );
        assert_eq!(
            properties.get("is-builtin"),
            Some(&PropertyValue::Bool(false))
        );
        assert_eq!(
            properties.get("min-refresh-rate"),
            Some(&PropertyValue::Int(30))
        );
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(PropertyValue::Bool(true).to_string(), "yes");
        assert_eq!(PropertyValue::Bool(false).to_string(), "no");
        assert_eq!(
            PropertyValue::List(vec![
                PropertyValue::ColorMode(ColorMode::Default),
                PropertyValue::ColorMode(ColorMode::Bt2100),
            ])
            .to_string(),
            "[default, bt2100]"
        );
        assert_eq!(
            PropertyValue::LayoutMode(LayoutMode::Logical).to_string(),
            "logical"
        );
    }
}
