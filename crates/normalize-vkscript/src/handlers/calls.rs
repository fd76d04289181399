//! Call handler: VK API methods, Python builtins and plain calls.

use super::expressions::{strip_outer_parens, translate_bare};
use crate::error::ScriptifyError;
use crate::registry::Translator;
use crate::value::quote;
use tree_sitter::Node;

/// Translated arguments of one call.
struct Arguments {
    positional: Vec<String>,
    /// Positional arguments with their own grouping kept, for postfix use.
    grouped: Vec<String>,
    keyword: Vec<(String, String)>,
}

impl Arguments {
    fn read(t: &Translator<'_>, node: Node<'_>) -> Result<Self, ScriptifyError> {
        // `f(x for x in xs)` has a generator in place of an argument list
        if node.kind() != "argument_list" {
            return Err(ScriptifyError::unsupported(node.kind()));
        }

        let mut positional = Vec::new();
        let mut grouped = Vec::new();
        let mut keyword = Vec::new();
        for arg in t.named_children(node) {
            match arg.kind() {
                "keyword_argument" => {
                    let name = t.field(arg, "name")?;
                    let value = t.field(arg, "value")?;
                    keyword.push((t.text(name).to_string(), translate_bare(t, value)?));
                }
                // `*args` and `**kwargs` have no static shape
                "list_splat" | "dictionary_splat" => {
                    return Err(ScriptifyError::unsupported(arg.kind()));
                }
                _ => {
                    let text = t.translate(arg)?;
                    positional.push(strip_outer_parens(&text).to_string());
                    grouped.push(text);
                }
            }
        }

        Ok(Self {
            positional,
            grouped,
            keyword,
        })
    }

    fn positional_only(&self, call: &str) -> Result<&[String], ScriptifyError> {
        if self.keyword.is_empty() {
            Ok(&self.positional)
        } else {
            Err(ScriptifyError::unsupported(format!(
                "keyword arguments to {}",
                call
            )))
        }
    }

    fn single(&self, call: &str) -> Result<&str, ScriptifyError> {
        self.positional_only(call)?;
        match self.positional.as_slice() {
            [arg] => Ok(arg),
            _ => Err(Self::not_unary(call)),
        }
    }

    /// Like [`Arguments::single`], but keeps the argument's parentheses so
    /// a postfix member access applies to the whole expression.
    fn single_grouped(&self, call: &str) -> Result<&str, ScriptifyError> {
        self.positional_only(call)?;
        match self.grouped.as_slice() {
            [arg] => Ok(arg),
            _ => Err(Self::not_unary(call)),
        }
    }

    fn not_unary(call: &str) -> ScriptifyError {
        ScriptifyError::unsupported(format!("{} with other than one argument", call))
    }
}

pub fn call(t: &Translator<'_>, node: Node<'_>) -> Result<String, ScriptifyError> {
    let function = t.field(node, "function")?;
    let args = Arguments::read(t, t.field(node, "arguments")?)?;

    if is_api_method(t, function) {
        return api_call(t, function, &args);
    }

    match function.kind() {
        "identifier" => builtin_call(t.text(function), &args),
        "attribute" => method_call(t, function, &args),
        _ => {
            let callee = t.translate(function)?;
            Ok(format!("{}({})", callee, args.positional_only("calls")?.join(",")))
        }
    }
}

/// `API.section.method` with the configured root name.
fn is_api_method(t: &Translator<'_>, function: Node<'_>) -> bool {
    let mut node = function;
    let mut depth = 0;
    while node.kind() == "attribute" {
        match node.child_by_field_name("object") {
            Some(object) => node = object,
            None => return false,
        }
        depth += 1;
    }
    depth > 0 && node.kind() == "identifier" && t.text(node) == t.config().api_object
}

/// Keyword arguments become the request object:
/// `API.users.get(user_ids=1)` → `API.users.get({"user_ids":1})`.
fn api_call(
    t: &Translator<'_>,
    function: Node<'_>,
    args: &Arguments,
) -> Result<String, ScriptifyError> {
    let method = t.translate(function)?;
    let params = match (args.positional.as_slice(), args.keyword.is_empty()) {
        ([], _) => {
            let fields: Vec<String> = args
                .keyword
                .iter()
                .map(|(name, value)| format!("{}:{}", quote(name), value))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        // A prepared request object
        ([object], true) => object.clone(),
        _ => {
            return Err(ScriptifyError::unsupported(format!(
                "positional arguments to {}",
                method
            )));
        }
    };
    Ok(format!("{}({})", method, params))
}

fn builtin_call(name: &str, args: &Arguments) -> Result<String, ScriptifyError> {
    match name {
        "len" => Ok(format!("{}.length", args.single_grouped("len")?)),
        "int" => Ok(format!("parseInt({})", args.single("int")?)),
        "float" => Ok(format!("parseDouble({})", args.single("float")?)),
        _ => Ok(format!("{}({})", name, args.positional_only(name)?.join(","))),
    }
}

fn method_call(
    t: &Translator<'_>,
    function: Node<'_>,
    args: &Arguments,
) -> Result<String, ScriptifyError> {
    let object = t.translate(t.field(function, "object")?)?;
    let method = match t.text(t.field(function, "attribute")?) {
        "append" => "push",
        other => other,
    };
    Ok(format!(
        "{}.{}({})",
        object,
        method,
        args.positional_only(method)?.join(",")
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::body;
    use crate::error::ScriptifyError;

    #[test]
    fn test_api_call_keywords_become_object() {
        assert_eq!(
            body("return API.users.get(user_ids=ids, fields=\"city\")").unwrap(),
            "return API.users.get({\"user_ids\":ids,\"fields\":\"city\"});"
        );
    }

    #[test]
    fn test_api_call_without_arguments() {
        assert_eq!(
            body("API.account.getInfo()").unwrap(),
            "API.account.getInfo({});"
        );
    }

    #[test]
    fn test_api_call_with_request_object() {
        assert_eq!(
            body("API.messages.send(params)").unwrap(),
            "API.messages.send(params);"
        );
        assert!(matches!(
            body("API.messages.send(params, peer_id=1)"),
            Err(ScriptifyError::UnsupportedConstruct { .. })
        ));
    }

    #[test]
    fn test_builtins() {
        assert_eq!(body("return len(items)").unwrap(), "return items.length;");
        assert_eq!(body("return len(a + b)").unwrap(), "return (a+b).length;");
        assert_eq!(body("return len((items))").unwrap(), "return (items).length;");
        assert_eq!(body("return int(text)").unwrap(), "return parseInt(text);");
        assert_eq!(
            body("return float(text)").unwrap(),
            "return parseDouble(text);"
        );
        assert!(matches!(
            body("return len(a, b)"),
            Err(ScriptifyError::UnsupportedConstruct { .. })
        ));
    }

    #[test]
    fn test_method_calls() {
        assert_eq!(body("items.append(x + 1)").unwrap(), "items.push(x+1);");
        assert_eq!(body("return text.split(\",\")").unwrap(), "return text.split(\",\");");
    }

    #[test]
    fn test_plain_call_rejects_keywords() {
        assert_eq!(body("return f(1, 2)").unwrap(), "return f(1,2);");
        assert!(matches!(
            body("return f(1, key=2)"),
            Err(ScriptifyError::UnsupportedConstruct { .. })
        ));
        assert_eq!(
            body("return f(*args)"),
            Err(ScriptifyError::UnsupportedConstruct {
                kind: "list_splat".into()
            })
        );
    }
}
