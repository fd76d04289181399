//! Statement handlers.

use super::expressions::{binary_op, translate_bare};
use crate::error::ScriptifyError;
use crate::registry::Translator;
use tree_sitter::Node;

pub fn expression_statement(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    // `a, b` as a statement is an implicit tuple with several children
    match t.named_children(node).as_slice() {
        [expr] => Ok(format!("{};", translate_bare(t, *expr)?)),
        _ => Err(ScriptifyError::unsupported("implicit tuple statement")),
    }
}

/// `x = v` declares (`var x=v`); subscript and attribute targets assign in
/// place. The enclosing expression statement adds the terminator.
pub fn assignment(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let left = t.field(node, "left")?;
    let right = node.child_by_field_name("right");

    if let Some(right) = right
        && matches!(right.kind(), "assignment" | "augmented_assignment")
    {
        return Err(ScriptifyError::unsupported("chained assignment"));
    }

    match (left.kind(), right) {
        ("identifier", Some(right)) => Ok(format!("var {}={}", t.text(left), translate_bare(t, right)?)),
        // Annotation only: `x: int`
        ("identifier", None) => Ok(format!("var {}", t.text(left))),
        ("subscript" | "attribute", Some(right)) => {
            Ok(format!("{}={}", t.translate(left)?, translate_bare(t, right)?))
        }
        (kind, _) => Err(ScriptifyError::unsupported(kind)),
    }
}

/// `x += v` becomes `x=x+v`.
pub fn augmented_assignment(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let left = t.field(node, "left")?;
    let right = t.field(node, "right")?;
    let op_node = t.field(node, "operator")?;

    if !matches!(left.kind(), "identifier" | "subscript" | "attribute") {
        return Err(ScriptifyError::unsupported(left.kind()));
    }

    let op = op_node.kind().trim_end_matches('=');
    let target = t.translate(left)?;
    let value = binary_op(op, &target, &t.translate(right)?)?;
    Ok(format!("{}={}", target, value))
}

pub fn return_statement(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    match t.named_children(node).first() {
        Some(expr) => Ok(format!("return {};", translate_bare(t, *expr)?)),
        None => Ok("return;".to_string()),
    }
}

pub fn if_statement(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let mut out = if_block(t, node)?;

    let mut cursor = node.walk();
    let alternatives: Vec<Node<'_>> = node
        .children_by_field_name("alternative", &mut cursor)
        .collect();

    for alt in alternatives {
        match alt.kind() {
            "elif_clause" => {
                out.push_str("else ");
                out.push_str(&if_block(t, alt)?);
            }
            "else_clause" => {
                let body = t.field(alt, "body")?;
                out.push_str("else{");
                out.push_str(&t.translate_block(body)?);
                out.push('}');
            }
            kind => return Err(ScriptifyError::unsupported(kind)),
        }
    }

    Ok(out)
}

pub fn while_statement(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    if let Some(alt) = node.child_by_field_name("alternative") {
        // while ... else has no VKScript counterpart
        return Err(ScriptifyError::unsupported(alt.kind()));
    }

    let condition = t.field(node, "condition")?;
    let body = t.field(node, "body")?;
    Ok(format!(
        "while({}){{{}}}",
        translate_bare(t, condition)?,
        t.translate_block(body)?
    ))
}

pub fn pass_statement(_t: &Translator<'_>, _node: Node<'_>) -> Result<String, ScriptifyError> {
    Ok(String::new())
}

/// `if(condition){consequence}` for `if_statement` and `elif_clause`.
fn if_block(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let condition = t.field(node, "condition")?;
    let consequence = t.field(node, "consequence")?;
    Ok(format!(
        "if({}){{{}}}",
        translate_bare(t, condition)?,
        t.translate_block(consequence)?
    ))
}
