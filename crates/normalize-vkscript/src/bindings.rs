//! Caller-supplied parameter values.

use crate::error::ScriptifyError;
use crate::value::ScriptValue;

/// Ordered set of `name -> value` bindings.
///
/// Names are unique. Inserting a name that is already bound replaces its
/// value but keeps its original position, so the emitted prologue follows
/// first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    entries: Vec<(String, ScriptValue)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ScriptValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind `name`, returning the previous value if it was already bound.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ScriptValue>,
    ) -> Option<ScriptValue> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ScriptValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScriptValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Emit one `var <name>=<literal>;` declaration per binding, in order.
    ///
    /// Names are checked here rather than on insert, so a bad name fails the
    /// translation that would have emitted it.
    pub fn prologue(&self) -> Result<String, ScriptifyError> {
        let mut out = String::new();
        for (name, value) in &self.entries {
            if !is_identifier(name) {
                return Err(ScriptifyError::InvalidBindingName { name: name.clone() });
            }
            let literal =
                value
                    .to_literal()
                    .map_err(|err| ScriptifyError::UnrepresentableValue {
                        name: name.clone(),
                        reason: err.to_string(),
                    })?;
            out.push_str("var ");
            out.push_str(name);
            out.push('=');
            out.push_str(&literal);
            out.push(';');
        }
        Ok(out)
    }

    /// Build bindings from a JSON object, keeping the object's key order.
    pub fn from_json(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().collect()
    }
}

const RESERVED: &[&str] = &[
    "break", "case", "continue", "default", "delete", "do", "else", "false", "for",
    "function", "if", "in", "new", "null", "return", "switch", "this", "true", "typeof",
    "var", "void", "while",
];

/// `[A-Za-z_][A-Za-z0-9_]*`, minus VKScript keywords.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED.contains(&name)
}

impl<K, V> FromIterator<(K, V)> for Bindings
where
    K: Into<String>,
    V: Into<ScriptValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        for (name, value) in iter {
            bindings.insert(name, value);
        }
        bindings
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Bindings
where
    K: Into<String>,
    V: Into<ScriptValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
