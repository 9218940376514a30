//! Serde helpers for amount fields
//!
//! Amounts are kept as opaque decimal strings. Clients send them either as
//! JSON strings (`"12000.50"`) or as bare numbers (`12000.5`); both are
//! accepted and normalised to a string.

use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use serde_json::Value;

fn value_to_decimal<E: serde::de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(E::custom(format!(
            "expected a decimal string or number, found {}",
            other
        ))),
    }
}

pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_decimal::<D::Error>(value)?
        .ok_or_else(|| D::Error::custom("amount must not be null"))
}

pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(v) => value_to_decimal(v),
    }
}
