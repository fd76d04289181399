//! Script literal values and their VKScript syntax.
//!
//! Bindings are emitted as `var name=<literal>;`. The literal syntax is
//! JavaScript-like:
//!
//! - `null`, `true`, `false`
//! - integers as decimal digits, floats with a fractional part or exponent
//! - strings double-quoted, JSON escaping
//! - lists as `[a,b]`, objects as `{"key":value}` in insertion order
//!
//! Non-finite floats have no literal form and are rejected.

use std::fmt::Write;

/// A value that can be written as a VKScript literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ScriptValue>),
    /// Key order is preserved in the emitted literal.
    Object(Vec<(String, ScriptValue)>),
}

/// Error returned when a value has no literal form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiteralError {
    #[error("non-finite float {0}")]
    NonFinite(f64),
}

impl ScriptValue {
    /// Render this value as VKScript literal text.
    pub fn to_literal(&self) -> Result<String, LiteralError> {
        let mut out = String::new();
        self.write_literal(&mut out)?;
        Ok(out)
    }

    fn write_literal(&self, out: &mut String) -> Result<(), LiteralError> {
        match self {
            ScriptValue::Null => out.push_str("null"),
            ScriptValue::Bool(b) => write!(out, "{}", b).unwrap(),
            ScriptValue::Int(n) => write!(out, "{}", n).unwrap(),
            ScriptValue::Float(f) => {
                if !f.is_finite() {
                    return Err(LiteralError::NonFinite(*f));
                }
                // Debug keeps the fractional part: 5.0 stays "5.0", not "5"
                write!(out, "{:?}", f).unwrap();
            }
            ScriptValue::String(s) => out.push_str(&quote(s)),
            ScriptValue::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_literal(out)?;
                }
                out.push(']');
            }
            ScriptValue::Object(pairs) => {
                out.push('{');
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(&quote(key));
                    out.push(':');
                    value.write_literal(out)?;
                }
                out.push('}');
            }
        }
        Ok(())
    }
}

/// Quote a string as a VKScript string literal.
pub fn quote(s: &str) -> String {
    // Serializing a str cannot fail; JSON string syntax is valid VKScript.
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

impl From<bool> for ScriptValue {
    fn from(b: bool) -> Self {
        ScriptValue::Bool(b)
    }
}

impl From<i64> for ScriptValue {
    fn from(n: i64) -> Self {
        ScriptValue::Int(n)
    }
}

impl From<i32> for ScriptValue {
    fn from(n: i32) -> Self {
        ScriptValue::Int(n.into())
    }
}

impl From<u32> for ScriptValue {
    fn from(n: u32) -> Self {
        ScriptValue::Int(n.into())
    }
}

impl From<f64> for ScriptValue {
    fn from(f: f64) -> Self {
        ScriptValue::Float(f)
    }
}

impl From<&str> for ScriptValue {
    fn from(s: &str) -> Self {
        ScriptValue::String(s.to_string())
    }
}

impl From<String> for ScriptValue {
    fn from(s: String) -> Self {
        ScriptValue::String(s)
    }
}

impl<T: Into<ScriptValue>> From<Option<T>> for ScriptValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ScriptValue::Null, Into::into)
    }
}

impl<T: Into<ScriptValue>> From<Vec<T>> for ScriptValue {
    fn from(items: Vec<T>) -> Self {
        ScriptValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for ScriptValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => ScriptValue::Null,
            Value::Bool(b) => ScriptValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ScriptValue::Int(i),
                None => ScriptValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ScriptValue::String(s),
            Value::Array(items) => {
                ScriptValue::List(items.into_iter().map(ScriptValue::from).collect())
            }
            Value::Object(map) => ScriptValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, ScriptValue::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(ScriptValue::Null.to_literal().unwrap(), "null");
        assert_eq!(ScriptValue::from(true).to_literal().unwrap(), "true");
        assert_eq!(ScriptValue::from(5).to_literal().unwrap(), "5");
        assert_eq!(ScriptValue::from(-12i64).to_literal().unwrap(), "-12");
        assert_eq!(ScriptValue::from(1.5).to_literal().unwrap(), "1.5");
        assert_eq!(ScriptValue::from(5.0).to_literal().unwrap(), "5.0");
    }

    #[test]
    fn test_string_escaping() {
        let value = ScriptValue::from("say \"hi\"\n\\ok");
        assert_eq!(value.to_literal().unwrap(), r#""say \"hi\"\n\\ok""#);
        assert_eq!(ScriptValue::from("привет").to_literal().unwrap(), "\"привет\"");
    }

    #[test]
    fn test_compound() {
        let list = ScriptValue::List(vec![ScriptValue::from(1), ScriptValue::from("x")]);
        assert_eq!(list.to_literal().unwrap(), r#"[1,"x"]"#);

        let object = ScriptValue::Object(vec![
            ("b".to_string(), ScriptValue::from(1)),
            ("a".to_string(), ScriptValue::List(vec![])),
        ]);
        assert_eq!(object.to_literal().unwrap(), r#"{"b":1,"a":[]}"#);
    }

    #[test]
    fn test_option_and_vec() {
        assert_eq!(ScriptValue::from(None::<i64>), ScriptValue::Null);
        assert_eq!(
            ScriptValue::from(vec![1, 2]).to_literal().unwrap(),
            "[1,2]"
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(matches!(
            ScriptValue::from(f64::NAN).to_literal(),
            Err(LiteralError::NonFinite(_))
        ));
        let nested = ScriptValue::List(vec![ScriptValue::from(f64::INFINITY)]);
        assert!(nested.to_literal().is_err());
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({"ids": [1, 2], "name": "x", "ratio": 0.5, "none": null});
        let literal = ScriptValue::from(json).to_literal().unwrap();
        assert!(literal.contains(r#""ids":[1,2]"#));
        assert!(literal.contains(r#""name":"x""#));
        assert!(literal.contains(r#""ratio":0.5"#));
        assert!(literal.contains(r#""none":null"#));
    }
}
