//! String literal handlers.
//!
//! Python escapes are decoded and the text re-quoted with VKScript
//! escaping, so `'it\'s'` and `"it's"` emit the same literal. f-string
//! interpolations turn into `+` concatenation.

use crate::error::ScriptifyError;
use crate::registry::Translator;
use crate::value::quote;
use tree_sitter::Node;

enum Piece {
    Text(String),
    Expr(String),
}

pub fn string(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let mut pieces = Vec::new();
    collect_pieces(t, node, &mut pieces)?;
    Ok(join_pieces(pieces))
}

/// Adjacent literals (`"a" "b"`) are merged into one string.
pub fn concatenated_string(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let mut pieces = Vec::new();
    for part in t.named_children(node) {
        if part.kind() != "string" {
            return Err(ScriptifyError::unsupported(part.kind()));
        }
        collect_pieces(t, part, &mut pieces)?;
    }
    Ok(join_pieces(pieces))
}

fn collect_pieces(
    t: &Translator<'_>,
    node: Node<'_>,
    pieces: &mut Vec<Piece>,
) -> Result<(), ScriptifyError> {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();

    let prefix = children
        .iter()
        .find(|c| c.kind() == "string_start")
        .map(|start| {
            t.text(*start)
                .trim_end_matches(['"', '\''])
                .to_ascii_lowercase()
        })
        .unwrap_or_default();
    let raw = prefix.contains('r');
    let formatted = prefix.contains('f');

    for child in children {
        match child.kind() {
            "string_start" | "string_end" => {}
            "string_content" | "escape_sequence" => {
                let text = t.text(child);
                let mut decoded = if raw {
                    text.to_string()
                } else {
                    decode_escapes(text)?
                };
                if formatted {
                    decoded = decoded.replace("{{", "{").replace("}}", "}");
                }
                push_text(pieces, decoded);
            }
            "interpolation" => {
                let mut cursor = child.walk();
                if child.children(&mut cursor).any(|c| c.kind() == "=") {
                    return Err(ScriptifyError::unsupported("self-documenting interpolation"));
                }
                let mut inner = t.named_children(child).into_iter();
                let expr = inner.next().ok_or_else(|| {
                    ScriptifyError::Parse("interpolation missing expression".into())
                })?;
                // `!r` conversions and `:>10` format specs have no VKScript form
                if let Some(extra) = inner.next() {
                    return Err(ScriptifyError::unsupported(extra.kind()));
                }
                pieces.push(Piece::Expr(t.translate(expr)?));
            }
            kind if child.is_named() => return Err(ScriptifyError::unsupported(kind)),
            _ => {}
        }
    }

    Ok(())
}

fn push_text(pieces: &mut Vec<Piece>, text: String) {
    if let Some(Piece::Text(last)) = pieces.last_mut() {
        last.push_str(&text);
    } else {
        pieces.push(Piece::Text(text));
    }
}

/// `"a"+x+"b"`. Unless one of the first two operands is text, the chain
/// starts from `""` so `+` concatenates instead of adding: `""+x+y`.
fn join_pieces(pieces: Vec<Piece>) -> String {
    match pieces.as_slice() {
        [] => quote(""),
        [Piece::Text(text)] => quote(text),
        _ => {
            let mut parts: Vec<String> = Vec::with_capacity(pieces.len() + 1);
            if let [Piece::Expr(_)] | [Piece::Expr(_), Piece::Expr(_), ..] = pieces.as_slice() {
                parts.push(quote(""));
            }
            parts.extend(pieces.iter().map(|piece| match piece {
                Piece::Text(text) => quote(text),
                Piece::Expr(expr) => expr.clone(),
            }));
            format!("({})", parts.join("+"))
        }
    }
}

/// Decode Python backslash escapes. Unknown escapes keep their backslash,
/// as Python does. `\N{NAME}` needs the Unicode name table and is rejected.
fn decode_escapes(text: &str) -> Result<String, ScriptifyError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            'x' => push_code(&mut out, &mut chars, 2, 16, "\\x"),
            'u' => push_code(&mut out, &mut chars, 4, 16, "\\u"),
            'U' => push_code(&mut out, &mut chars, 8, 16, "\\U"),
            'N' => return Err(ScriptifyError::unsupported("named unicode escape")),
            '0'..='7' => {
                let mut digits = String::from(next);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(d @ '0'..='7') => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                let code = u32::from_str_radix(&digits, 8).unwrap_or(0);
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

/// Read exactly `len` digits and push the character they encode; on bad
/// input the escape is kept verbatim.
fn push_code(
    out: &mut String,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    len: usize,
    radix: u32,
    escape: &str,
) {
    let mut digits = String::new();
    while digits.len() < len {
        match chars.peek() {
            Some(d) if d.is_digit(radix) => {
                digits.push(*d);
                chars.next();
            }
            _ => break,
        }
    }
    let decoded = (digits.len() == len)
        .then(|| u32::from_str_radix(&digits, radix).ok())
        .flatten()
        .and_then(char::from_u32);
    match decoded {
        Some(c) => out.push(c),
        None => {
            out.push_str(escape);
            out.push_str(&digits);
        }
    }
}
