//! Attribute values

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AttributeValue {
    Bare(String),
    Quoted(String),
    /// Numeric literal, kept as written
    Number(String),
    Array(Vec<AttributeValue>),
}

impl AttributeValue {
    /// Text of a scalar value; `None` for arrays
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Bare(text)
            | AttributeValue::Quoted(text)
            | AttributeValue::Number(text) => Some(text),
            AttributeValue::Array(_) => None,
        }
    }
}

/// Plain rendering without quoting, for messages and logs
impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bare(text)
            | AttributeValue::Quoted(text)
            | AttributeValue::Number(text) => f.write_str(text),
            AttributeValue::Array(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested() {
        let value = AttributeValue::Array(vec![
            AttributeValue::Bare("a".into()),
            AttributeValue::Array(vec![AttributeValue::Number("1".into())]),
        ]);
        assert_eq!(value.to_string(), "[a, [1]]");
        assert!(value.as_text().is_none());
    }
}
