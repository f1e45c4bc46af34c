//! Typed values for the per-instance data bag.

use serde::{Deserialize, Serialize};

/// A value stored under a key in an instance's data bag.
///
/// Persisted values come back as text, so every accessor also accepts a
/// parseable `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl DataValue {
    /// Best-effort typing of a persisted string.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return DataValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return DataValue::Bool(false);
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return DataValue::Integer(value);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => DataValue::Number(value),
            _ => DataValue::Text(raw.to_string()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(value) => Some(*value),
            DataValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(value) => Some(*value),
            DataValue::Integer(value) => Some(*value as f64),
            DataValue::Text(text) => text.trim().parse().ok(),
            DataValue::Bool(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Integer(value) => Some(*value),
            DataValue::Number(value) if value.fract() == 0.0 => Some(*value as i64),
            DataValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// String form used by the persistence boundary.
    pub fn to_persisted(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataValue::Bool(value) => write!(f, "{value}"),
            DataValue::Integer(value) => write!(f, "{value}"),
            DataValue::Number(value) => write!(f, "{value}"),
            DataValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Integer(value)
    }
}

impl From<u64> for DataValue {
    fn from(value: u64) -> Self {
        DataValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Number(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_persisted_strings() {
        assert_eq!(DataValue::parse("true"), DataValue::Bool(true));
        assert_eq!(DataValue::parse("FALSE"), DataValue::Bool(false));
        assert_eq!(DataValue::parse("1712000000000"), DataValue::Integer(1_712_000_000_000));
        assert_eq!(DataValue::parse("42.5"), DataValue::Number(42.5));
        assert_eq!(DataValue::parse("moonlit"), DataValue::Text("moonlit".into()));
        assert_eq!(DataValue::parse("NaN"), DataValue::Text("NaN".into()));
    }

    #[test]
    fn test_lenient_accessors() {
        assert_eq!(DataValue::Text("12.5".into()).as_f64(), Some(12.5));
        assert_eq!(DataValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(DataValue::Number(4.0).as_i64(), Some(4));
        assert_eq!(DataValue::Number(4.5).as_i64(), None);
        assert_eq!(DataValue::Text("true".into()).as_bool(), Some(true));
        assert_eq!(DataValue::Bool(true).as_f64(), None);
    }

    #[test]
    fn test_persisted_form_reparses() {
        for value in [
            DataValue::Bool(true),
            DataValue::Integer(-7),
            DataValue::Number(55.25),
        ] {
            assert_eq!(DataValue::parse(&value.to_persisted()), value);
        }
    }
}
