//! Function source lookup inside Python module text.

use crate::error::ScriptifyError;
use crate::parse::{class_definition, function_definition, named_children, parse_python};
use crate::traits::SourceProvider;
use std::path::Path;
use tree_sitter::Node;

/// A Python module whose functions can be looked up by qualified name.
///
/// `"handler"` finds a top-level function, `"Bot.handler"` a method of a
/// top-level class. The returned text spans the whole definition including
/// decorators, with the common indentation removed.
#[derive(Debug, Clone)]
pub struct ModuleSource {
    source: String,
}

impl ModuleSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }

    pub fn text(&self) -> &str {
        &self.source
    }

    fn unavailable(function: &str, reason: impl Into<String>) -> ScriptifyError {
        ScriptifyError::SourceUnavailable {
            function: function.to_string(),
            reason: reason.into(),
        }
    }

    fn name_of<'a>(&'a self, node: Node<'_>) -> &'a str {
        node.child_by_field_name("name")
            .and_then(|n| n.utf8_text(self.source.as_bytes()).ok())
            .unwrap_or("")
    }

    /// Whether `scope` binds `name` to something other than a `def`,
    /// e.g. `handler = lambda peer_id: ...`.
    fn assigns_name(&self, scope: Node<'_>, name: &str) -> bool {
        named_children(scope).into_iter().any(|stmt| {
            stmt.kind() == "expression_statement"
                && named_children(stmt).into_iter().any(|expr| {
                    expr.kind() == "assignment"
                        && expr
                            .child_by_field_name("left")
                            .and_then(|left| left.utf8_text(self.source.as_bytes()).ok())
                            == Some(name)
                })
        })
    }

    fn lines_of(&self, node: Node<'_>) -> String {
        let start = node.start_position().row;
        let end = node.end_position().row;
        let lines: Vec<&str> = self
            .source
            .lines()
            .skip(start)
            .take(end - start + 1)
            .collect();
        dedent(&lines)
    }
}

impl SourceProvider for ModuleSource {
    fn source_of(&self, function: &str) -> Result<String, ScriptifyError> {
        let tree = parse_python(&self.source)
            .map_err(|err| Self::unavailable(function, err.to_string()))?;

        let path: Vec<&str> = function.split('.').collect();
        let Some((name, classes)) = path.split_last() else {
            return Err(Self::unavailable(function, "empty name"));
        };

        let mut scope = tree.root_node();
        for class in classes {
            let body = named_children(scope)
                .into_iter()
                .filter_map(class_definition)
                .find(|def| self.name_of(*def) == *class)
                .and_then(|def| def.child_by_field_name("body"))
                .ok_or_else(|| Self::unavailable(function, format!("no class `{}`", class)))?;
            scope = body;
        }

        let found = named_children(scope).into_iter().find(|item| {
            function_definition(*item).is_some_and(|def| self.name_of(def) == *name)
        });

        match found {
            Some(item) => {
                let text = self.lines_of(item);
                tracing::debug!(function, bytes = text.len(), "found function source");
                Ok(text)
            }
            None if self.assigns_name(scope, name) => Err(Self::unavailable(
                function,
                "not a plain named function definition",
            )),
            None => Err(Self::unavailable(function, "no such function")),
        }
    }
}

/// Strip the indentation shared by every non-blank line.
fn dedent(lines: &[&str]) -> String {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    let mut out = String::new();
    for line in lines {
        if line.trim().is_empty() {
            out.push('\n');
        } else {
            out.push_str(&line[indent..]);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODULE: &str = r#"
import vkbottle

def top(self, peer_id):
    return peer_id

class Bot:
    @staticmethod
    def greet(ctx, name):
        message = "hi " + name
        return message

handler = lambda ctx, x: x
"#;

    #[test]
    fn test_top_level_function() {
        let module = ModuleSource::new(MODULE);
        assert_eq!(
            module.source_of("top").unwrap(),
            "def top(self, peer_id):\n    return peer_id\n"
        );
    }

    #[test]
    fn test_method_with_decorator_is_dedented() {
        let module = ModuleSource::new(MODULE);
        let source = module.source_of("Bot.greet").unwrap();
        assert!(source.starts_with("@staticmethod\ndef greet(ctx, name):\n"));
        assert!(source.contains("\n    return message\n"));
    }

    #[test]
    fn test_unknown_function() {
        let module = ModuleSource::new(MODULE);
        match module.source_of("missing") {
            Err(ScriptifyError::SourceUnavailable { function, reason }) => {
                assert_eq!(function, "missing");
                assert_eq!(reason, "no such function");
            }
            other => panic!("expected SourceUnavailable, got {:?}", other),
        }
        assert!(module.source_of("Nope.greet").is_err());
    }

    #[test]
    fn test_lambda_is_not_a_plain_function() {
        let module = ModuleSource::new(MODULE);
        match module.source_of("handler") {
            Err(ScriptifyError::SourceUnavailable { reason, .. }) => {
                assert!(reason.contains("not a plain"));
            }
            other => panic!("expected SourceUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_broken_module() {
        let module = ModuleSource::new("def broken(:\n");
        assert!(matches!(
            module.source_of("broken"),
            Err(ScriptifyError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("handlers.py");
        std::fs::write(&path, MODULE).unwrap();

        let module = ModuleSource::from_file(&path).unwrap();
        assert_eq!(module.text(), MODULE);
        assert_eq!(
            module.source_of("top").unwrap(),
            "def top(self, peer_id):\n    return peer_id\n"
        );
        assert!(ModuleSource::from_file(&dir.path().join("absent.py")).is_err());
    }

    #[test]
    fn test_dedent() {
        assert_eq!(dedent(&["    a", "", "      b"]), "a\n\n  b\n");
    }
}
