use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag recording which migration steps a stored document has gone through.
///
/// Two conventions exist in stored data: release tags such as `"4.0"` and
/// plain integer step counters. Both only need equality to drive the
/// migration chain, so they share one type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaMarker {
    Step(i64),
    Release(String),
}

impl SchemaMarker {
    pub fn release(tag: impl Into<String>) -> Self {
        SchemaMarker::Release(tag.into())
    }

    /// 序列化为存储列使用的 JSON 文本
    pub fn to_column(&self) -> String {
        match self {
            SchemaMarker::Step(n) => n.to_string(),
            SchemaMarker::Release(tag) => serde_json::Value::String(tag.clone()).to_string(),
        }
    }

    pub fn from_column(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl FromStr for SchemaMarker {
    type Err = std::convert::Infallible;

    /// Digit-only input is a step counter, anything else a release tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = s.parse::<i64>() {
                return Ok(SchemaMarker::Step(n));
            }
        }
        Ok(SchemaMarker::Release(s.to_string()))
    }
}

impl fmt::Display for SchemaMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaMarker::Step(n) => write!(f, "{}", n),
            SchemaMarker::Release(tag) => write!(f, "{}", tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_picks_convention() {
        assert_eq!("4.0".parse::<SchemaMarker>().unwrap(), SchemaMarker::release("4.0"));
        assert_eq!("12".parse::<SchemaMarker>().unwrap(), SchemaMarker::Step(12));
        assert_eq!(" v3 ".parse::<SchemaMarker>().unwrap(), SchemaMarker::release("v3"));
    }

    #[test]
    fn test_column_encoding_keeps_type() {
        let tag = SchemaMarker::release("4.0");
        assert_eq!(tag.to_column(), "\"4.0\"");
        assert_eq!(SchemaMarker::from_column(&tag.to_column()).unwrap(), tag);

        let step = SchemaMarker::Step(7);
        assert_eq!(step.to_column(), "7");
        assert_eq!(SchemaMarker::from_column("7").unwrap(), step);
    }
}
