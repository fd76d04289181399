//! Expression handlers.

use crate::error::ScriptifyError;
use crate::registry::Translator;
use tree_sitter::Node;

pub fn identifier(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    Ok(t.text(node).to_string())
}

/// Integers lose their underscores; hex, octal and binary become decimal.
pub fn integer(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let text = t.text(node).replace('_', "");
    if text.ends_with(['j', 'J']) {
        return Err(ScriptifyError::unsupported("imaginary literal"));
    }

    let lower = text.to_ascii_lowercase();
    let radix = match lower.get(..2) {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return Ok(text),
    };
    u64::from_str_radix(&lower[2..], radix)
        .map(|n| n.to_string())
        .map_err(|err| ScriptifyError::Parse(format!("integer literal {}: {}", text, err)))
}

pub fn float(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let text = t.text(node).replace('_', "");
    if text.ends_with(['j', 'J']) {
        return Err(ScriptifyError::unsupported("imaginary literal"));
    }
    Ok(text)
}

/// `True`, `False` and `None`.
pub fn keyword_literal(_t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    match node.kind() {
        "true" => Ok("true".to_string()),
        "false" => Ok("false".to_string()),
        "none" => Ok("null".to_string()),
        kind => Err(ScriptifyError::unsupported(kind)),
    }
}

pub fn binary_operator(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let left = t.field(node, "left")?;
    let right = t.field(node, "right")?;
    let op = t.field(node, "operator")?;
    let expr = binary_op(op.kind(), &t.translate(left)?, &t.translate(right)?)?;
    Ok(format!("({})", expr))
}

/// Combine two translated operands with a Python arithmetic or bitwise
/// operator. The result is not parenthesized.
pub fn binary_op(op: &str, left: &str, right: &str) -> Result<String, ScriptifyError> {
    match op {
        "+" | "-" | "*" | "/" | "%" | "&" | "|" | "^" | "<<" | ">>" => {
            Ok(join_op(left, op, right))
        }
        // VKScript has no floor division
        "//" => Ok(format!("parseInt({})", join_op(left, "/", right))),
        _ => Err(ScriptifyError::operator(op)),
    }
}

/// `a - -b` must not collapse into the `--` token.
fn join_op(left: &str, op: &str, right: &str) -> String {
    let clash = matches!(
        (op.chars().last(), right.chars().next()),
        (Some('-'), Some('-')) | (Some('+'), Some('+'))
    );
    if clash {
        format!("{}{} {}", left, op, right)
    } else {
        format!("{}{}{}", left, op, right)
    }
}

/// Chained comparisons `a < b < c` become `((a<b)&&(b<c))`.
pub fn comparison_operator(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let operands = t
        .named_children(node)
        .into_iter()
        .map(|operand| t.translate(operand))
        .collect::<Result<Vec<_>, _>>()?;

    let mut cursor = node.walk();
    let operators: Vec<&str> = node
        .children_by_field_name("operators", &mut cursor)
        .map(|op| op.kind())
        .collect();

    if operands.len() != operators.len() + 1 {
        return Err(ScriptifyError::Parse(
            "comparison_operator operand count mismatch".into(),
        ));
    }

    let mut comparisons = Vec::with_capacity(operators.len());
    for (i, op) in operators.iter().enumerate() {
        let script_op = match *op {
            "<" | "<=" | ">" | ">=" | "==" | "!=" => *op,
            "<>" | "is not" => "!=",
            "is" => "==",
            other => return Err(ScriptifyError::operator(other)),
        };
        comparisons.push(format!("{}{}{}", operands[i], script_op, operands[i + 1]));
    }

    if comparisons.len() == 1 {
        Ok(format!("({})", comparisons[0]))
    } else {
        let joined: Vec<String> = comparisons.iter().map(|c| format!("({})", c)).collect();
        Ok(format!("({})", joined.join("&&")))
    }
}

pub fn boolean_operator(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let left = t.field(node, "left")?;
    let right = t.field(node, "right")?;
    let op = t.field(node, "operator")?;
    let script_op = match op.kind() {
        "and" => "&&",
        "or" => "||",
        other => return Err(ScriptifyError::operator(other)),
    };
    Ok(format!(
        "({}{}{})",
        t.translate(left)?,
        script_op,
        t.translate(right)?
    ))
}

pub fn not_operator(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let argument = t.field(node, "argument")?;
    Ok(format!("!{}", t.translate(argument)?))
}

pub fn unary_operator(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let op = t.field(node, "operator")?;
    let argument = t.translate(t.field(node, "argument")?)?;
    match op.kind() {
        "+" => Ok(argument),
        op @ ("-" | "~") => {
            if argument.starts_with(['-', '+']) {
                Ok(format!("{}({})", op, argument))
            } else {
                Ok(format!("{}{}", op, argument))
            }
        }
        other => Err(ScriptifyError::operator(other)),
    }
}

pub fn parenthesized_expression(
    t: &Translator<'_>,
    node: Node<'_>,
) -> Result<String, ScriptifyError> {
    match t.named_children(node).as_slice() {
        [inner] => Ok(format!("({})", translate_bare(t, *inner)?)),
        _ => Err(ScriptifyError::Parse(
            "parenthesized_expression needs one inner expression".into(),
        )),
    }
}

/// Lists and tuples both become arrays.
pub fn sequence(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let items = t
        .named_children(node)
        .into_iter()
        .map(|item| translate_bare(t, item))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("[{}]", items.join(",")))
}

pub fn dictionary(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let mut pairs = Vec::new();
    for child in t.named_children(node) {
        if child.kind() != "pair" {
            // `**other` and anything else has no object-literal form
            return Err(ScriptifyError::unsupported(child.kind()));
        }
        let key = translate_bare(t, t.field(child, "key")?)?;
        let value = translate_bare(t, t.field(child, "value")?)?;
        pairs.push(format!("{}:{}", key, value));
    }
    Ok(format!("{{{}}}", pairs.join(",")))
}

pub fn subscript(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let value = t.field(node, "value")?;

    let mut cursor = node.walk();
    let indices: Vec<Node<'_>> = node
        .children_by_field_name("subscript", &mut cursor)
        .collect();

    match indices.as_slice() {
        [index] => Ok(format!(
            "{}[{}]",
            t.translate(value)?,
            translate_bare(t, *index)?
        )),
        _ => Err(ScriptifyError::unsupported("multi-index subscript")),
    }
}

pub fn attribute(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let object = t.field(node, "object")?;
    let attribute = t.field(node, "attribute")?;
    Ok(format!("{}.{}", t.translate(object)?, t.text(attribute)))
}

/// Translate `node` and drop one enclosing pair of parentheses, for
/// positions where grouping is already unambiguous (statement operands,
/// conditions, list items, call arguments).
pub fn translate_bare(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let text = t.translate(node)?;
    Ok(strip_outer_parens(&text).to_string())
}

/// `(a+b)` becomes `a+b`; `(a)+(b)` is left alone. Parentheses inside
/// string literals are ignored.
pub fn strip_outer_parens(text: &str) -> &str {
    if !(text.starts_with('(') && text.ends_with(')')) {
        return text;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let last = text.len() - 1;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && i != last {
                    return text;
                }
            }
            _ => {}
        }
    }

    &text[1..last]
}
