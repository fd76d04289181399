//! Tree-sitter Python parsing.

use crate::error::ScriptifyError;
use tree_sitter::{Node, Parser, Tree};

/// Parse Python source into a tree-sitter tree.
///
/// Sources containing syntax errors are rejected.
pub fn parse_python(source: &str) -> Result<Tree, ScriptifyError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_python::language().into())
        .map_err(|err| ScriptifyError::Parse(err.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ScriptifyError::Parse("failed to parse".into()))?;

    if tree.root_node().has_error() {
        return Err(ScriptifyError::Parse("syntax error in source".into()));
    }

    Ok(tree)
}

/// Named children of `node`, skipping comments and other extras.
pub fn named_children<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// The function definition behind `node`, looking through decorators.
pub fn function_definition(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "function_definition" => Some(node),
        "decorated_definition" => node
            .child_by_field_name("definition")
            .filter(|def| def.kind() == "function_definition"),
        _ => None,
    }
}

/// The class definition behind `node`, looking through decorators.
pub fn class_definition(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "class_definition" => Some(node),
        "decorated_definition" => node
            .child_by_field_name("definition")
            .filter(|def| def.kind() == "class_definition"),
        _ => None,
    }
}

/// Positional parameter names of a `function_definition`, in order.
///
/// Collection stops at `*`, `*args` or `**kwargs`: whatever follows them is
/// keyword-only and cannot be bound positionally.
pub fn positional_params(source: &str, function: Node<'_>) -> Vec<String> {
    let Some(params) = function.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let text = |node: Node<'_>| {
        node.utf8_text(source.as_bytes())
            .unwrap_or("")
            .to_string()
    };

    let mut names = Vec::new();
    for child in named_children(params) {
        match child.kind() {
            "identifier" => names.push(text(child)),
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = child.child_by_field_name("name") {
                    names.push(text(name));
                }
            }
            "typed_parameter" => {
                // The name is the first child; there is no field for it
                match child.child(0) {
                    Some(name) if name.kind() == "identifier" => names.push(text(name)),
                    // `*args: int` and `**kw: str` end the positional list
                    Some(splat)
                        if matches!(
                            splat.kind(),
                            "list_splat_pattern" | "dictionary_splat_pattern"
                        ) =>
                    {
                        break;
                    }
                    _ => {}
                }
            }
            "positional_separator" => {}
            "list_splat_pattern" | "dictionary_splat_pattern" | "keyword_separator" => break,
            _ => {}
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_of(source: &str) -> Vec<String> {
        let tree = parse_python(source).unwrap();
        let root = tree.root_node();
        let def = named_children(root)
            .into_iter()
            .find_map(function_definition)
            .expect("function definition");
        positional_params(source, def)
    }

    #[test]
    fn test_syntax_error_rejected() {
        assert!(matches!(
            parse_python("def f(:\n    pass"),
            Err(ScriptifyError::Parse(_))
        ));
    }

    #[test]
    fn test_plain_params() {
        assert_eq!(params_of("def f(self, a, b):\n    pass"), vec!["self", "a", "b"]);
    }

    #[test]
    fn test_typed_and_default_params() {
        assert_eq!(
            params_of("def f(self, a: int, b=2, c: str = 'x'):\n    pass"),
            vec!["self", "a", "b", "c"]
        );
    }

    #[test]
    fn test_keyword_only_params_excluded() {
        assert_eq!(params_of("def f(self, a, *, b):\n    pass"), vec!["self", "a"]);
        assert_eq!(
            params_of("def f(self, a, *args, **kwargs):\n    pass"),
            vec!["self", "a"]
        );
        assert_eq!(
            params_of("def f(self, *args: int, b):\n    pass"),
            vec!["self"]
        );
        assert_eq!(
            params_of("def f(self, a: int, **kwargs: str):\n    pass"),
            vec!["self", "a"]
        );
    }

    #[test]
    fn test_decorated_function() {
        assert_eq!(params_of("@dec\ndef f(ctx, x):\n    pass"), vec!["ctx", "x"]);
    }
}
