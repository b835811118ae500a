//! Indicator-of-compromise records
//!
//! An IOC is a typed value flagged as suspicious. Its value is not checked
//! when the record is built; call [`crate::utils::validate_ioc`] on demand.

use serde::{Deserialize, Serialize};

/// Kind of value an indicator carries
///
/// Unrecognised type names are kept in `Unknown` so that records from other
/// feeds still deserialize; they never validate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IocType {
    Ip,
    Domain,
    Hash,
    Url,
    Email,
    Unknown(String),
}

impl IocType {
    pub fn as_str(&self) -> &str {
        match self {
            IocType::Ip => "ip",
            IocType::Domain => "domain",
            IocType::Hash => "hash",
            IocType::Url => "url",
            IocType::Email => "email",
            IocType::Unknown(other) => other,
        }
    }
}

impl From<String> for IocType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ip" => IocType::Ip,
            "domain" => IocType::Domain,
            "hash" => IocType::Hash,
            "url" => IocType::Url,
            "email" => IocType::Email,
            _ => IocType::Unknown(value),
        }
    }
}

impl From<&str> for IocType {
    fn from(value: &str) -> Self {
        IocType::from(value.to_string())
    }
}

impl From<IocType> for String {
    fn from(value: IocType) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for IocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single indicator of compromise as reported by a feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorOfCompromise {
    /// What kind of value this is
    #[serde(rename = "type")]
    pub ioc_type: IocType,

    /// The raw indicator value
    pub value: String,

    /// Feed confidence, usually 0-100
    pub confidence: f64,

    /// Name of the reporting feed
    pub source: String,
}

impl IndicatorOfCompromise {
    pub fn new<T, V, S>(ioc_type: T, value: V, confidence: f64, source: S) -> Self
    where
        T: Into<IocType>,
        V: Into<String>,
        S: Into<String>,
    {
        Self {
            ioc_type: ioc_type.into(),
            value: value.into(),
            confidence,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types_round_trip_through_strings() {
        for name in ["ip", "domain", "hash", "url", "email"] {
            let ioc_type = IocType::from(name);
            assert!(!matches!(ioc_type, IocType::Unknown(_)));
            assert_eq!(String::from(ioc_type), name);
        }
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let ioc_type = IocType::from("bogus");
        assert_eq!(ioc_type, IocType::Unknown("bogus".to_string()));
        assert_eq!(ioc_type.to_string(), "bogus");
    }

    #[test]
    fn test_deserialize_feed_record() {
        let json = r#"{"type":"bogus","value":"x","confidence":50,"source":"feed"}"#;
        let ioc: IndicatorOfCompromise = serde_json::from_str(json).unwrap();
        assert_eq!(ioc.ioc_type, IocType::Unknown("bogus".to_string()));
        assert_eq!(ioc.value, "x");

        let out = serde_json::to_value(&ioc).unwrap();
        assert_eq!(out["type"], "bogus");
    }
}
