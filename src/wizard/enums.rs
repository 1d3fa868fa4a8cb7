//! Key-or-value lookup shared by the option enums.
//!
//! Markup attributes and config files may name an enum member either by its
//! key (`"async"`) or by its numeric value (`2`). Both forms resolve through
//! the same table so the two spellings can never disagree.

use serde::Deserialize;

use crate::error::StepsError;

/// An enum whose members are addressable by key or by position.
pub trait KeyedEnum: Sized + Copy + PartialEq + 'static {
    /// Members in value order: the position of an entry is its numeric value.
    const ENTRIES: &'static [(&'static str, Self)];

    fn from_key(key: &str) -> Result<Self, StepsError> {
        Self::ENTRIES
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, member)| *member)
            .ok_or_else(|| StepsError::InvalidEnumKey(key.to_string()))
    }

    fn from_value(value: i64) -> Result<Self, StepsError> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ENTRIES.get(i))
            .map(|(_, member)| *member)
            .ok_or_else(|| StepsError::InvalidEnumValue(value.to_string()))
    }

    /// Resolve a raw attribute string.
    ///
    /// Blank or non-numeric strings are keys; anything numeric is a value
    /// (truncated toward zero, like an integer parse of the leading digits).
    fn from_attr(raw: &str) -> Result<Self, StepsError> {
        if raw.trim().is_empty() {
            return Self::from_key(raw);
        }
        match raw.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Self::from_value(number.trunc() as i64),
            _ => Self::from_key(raw),
        }
    }

    fn key(self) -> &'static str {
        Self::ENTRIES
            .iter()
            .find(|(_, member)| *member == self)
            .map(|(k, _)| *k)
            .unwrap_or("")
    }

    fn value(self) -> i64 {
        Self::ENTRIES
            .iter()
            .position(|(_, member)| *member == self)
            .map(|i| i as i64)
            .unwrap_or(-1)
    }
}

/// Serde representation accepting either spelling.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnumRepr {
    Value(i64),
    Key(String),
}

impl EnumRepr {
    pub fn resolve<E: KeyedEnum>(self) -> Result<E, StepsError> {
        match self {
            EnumRepr::Value(value) => E::from_value(value),
            EnumRepr::Key(key) => E::from_attr(&key),
        }
    }
}
