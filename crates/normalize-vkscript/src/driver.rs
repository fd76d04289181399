//! The translation pipeline: acquire, parse, validate, emit.
//!
//! ```text
//! SourceProvider ──> parse ──> validate params ──> prologue ──> body ──> String
//! ```
//!
//! The pipeline is strictly linear. The first failing stage aborts the call
//! and no partial script is returned.

use crate::bindings::Bindings;
use crate::config::ScriptifyConfig;
use crate::error::ScriptifyError;
use crate::parse::{function_definition, named_children, parse_python, positional_params};
use crate::registry::{self, HandlerRegistry, Translator};
use crate::traits::SourceProvider;

/// Translates Python functions into VKScript with a handler registry.
pub struct Converter<'r, P> {
    registry: &'r HandlerRegistry,
    provider: P,
    config: ScriptifyConfig,
}

impl<P: SourceProvider> Converter<'static, P> {
    /// A converter over the process-wide registry.
    pub fn new(provider: P) -> Self {
        Self::with_registry(registry::global(), provider)
    }
}

impl<'r, P> Converter<'r, P> {
    /// A converter over a caller-owned registry.
    pub fn with_registry(registry: &'r HandlerRegistry, provider: P) -> Self {
        Self {
            registry,
            provider,
            config: ScriptifyConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ScriptifyConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ScriptifyConfig {
        &self.config
    }

    /// Translate the single function definition in `source`.
    pub fn scriptify_source(
        &self,
        source: &str,
        bindings: &Bindings,
    ) -> Result<String, ScriptifyError> {
        let tree = parse_python(source)?;
        let function = named_children(tree.root_node())
            .into_iter()
            .next()
            .and_then(function_definition)
            .ok_or_else(|| {
                ScriptifyError::Parse("source is not a function definition".into())
            })?;

        let params = positional_params(source, function);
        let required = params.iter().skip(self.config.reserved_params);
        for parameter in required.clone() {
            if !bindings.contains(parameter) {
                return Err(ScriptifyError::MissingBinding {
                    parameter: parameter.clone(),
                });
            }
        }
        tracing::debug!(
            params = ?required.collect::<Vec<_>>(),
            bindings = bindings.len(),
            "validated parameters"
        );

        let mut script = bindings.prologue()?;

        let body = function
            .child_by_field_name("body")
            .ok_or_else(|| ScriptifyError::Parse("function_definition missing body".into()))?;
        let translator = Translator::new(self.registry, source, &self.config);
        for stmt in named_children(body) {
            script.push_str(&translator.translate(stmt)?);
        }

        tracing::debug!(bytes = script.len(), "emitted script");
        Ok(script)
    }
}

impl<P: SourceProvider> Converter<'_, P> {
    /// Translate `function`, resolving its source through the provider.
    pub fn scriptify(&self, function: &str, bindings: &Bindings) -> Result<String, ScriptifyError> {
        let source = self.provider.source_of(function)?;
        tracing::debug!(function, bytes = source.len(), "acquired source");
        self.scriptify_source(&source, bindings)
    }
}

/// Translate the function definition in `source` with the process-wide
/// registry and default settings.
pub fn scriptify_source(source: &str, bindings: &Bindings) -> Result<String, ScriptifyError> {
    Converter::with_registry(registry::global(), ())
        .scriptify_source(source, bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::from_fn;

    fn minimal_registry() -> HandlerRegistry {
        let registry = HandlerRegistry::new();
        registry.register("return_statement", |t, node| {
            let expr = t.named_children(node)[0];
            Ok(format!("return {};", t.translate(expr)?))
        });
        registry.register("identifier", |t, node| Ok(t.text(node).to_string()));
        registry
    }

    #[test]
    fn test_prologue_then_body() {
        let registry = minimal_registry();
        let converter = Converter::with_registry(&registry, ());
        let script = converter
            .scriptify_source("def f(self, x):\n    return x\n", &Bindings::new().with("x", 5))
            .unwrap();
        assert_eq!(script, "var x=5;return x;");
    }

    #[test]
    fn test_extra_bindings_still_emitted() {
        let registry = minimal_registry();
        let converter = Converter::with_registry(&registry, ());
        let bindings = Bindings::new().with("unused", "u").with("x", 1);
        let script = converter
            .scriptify_source("def f(self, x):\n    return x\n", &bindings)
            .unwrap();
        assert_eq!(script, "var unused=\"u\";var x=1;return x;");
    }

    #[test]
    fn test_missing_binding_named() {
        let registry = minimal_registry();
        let converter = Converter::with_registry(&registry, ());
        let result = converter.scriptify_source(
            "def f(self, x, y):\n    return x\n",
            &Bindings::new().with("x", 1),
        );
        assert_eq!(
            result,
            Err(ScriptifyError::MissingBinding {
                parameter: "y".into()
            })
        );
    }

    #[test]
    fn test_first_parameter_is_reserved() {
        let registry = minimal_registry();
        let converter = Converter::with_registry(&registry, ());
        let script = converter
            .scriptify_source("def f(self):\n    return self\n", &Bindings::new())
            .unwrap();
        assert_eq!(script, "return self;");
    }

    #[test]
    fn test_reserved_params_configurable() {
        let registry = minimal_registry();
        let config = ScriptifyConfig {
            reserved_params: 0,
            ..ScriptifyConfig::default()
        };
        let converter = Converter::with_registry(&registry, ()).with_config(config);
        let result = converter.scriptify_source("def f(x):\n    return x\n", &Bindings::new());
        assert!(matches!(result, Err(ScriptifyError::MissingBinding { .. })));
    }

    #[test]
    fn test_not_a_function() {
        let registry = minimal_registry();
        let converter = Converter::with_registry(&registry, ());
        for source in ["x = 1\n", "", "class A:\n    pass\n"] {
            assert!(matches!(
                converter.scriptify_source(source, &Bindings::new()),
                Err(ScriptifyError::Parse(_))
            ));
        }
    }

    #[test]
    fn test_unsupported_statement_fails_whole_call() {
        let registry = minimal_registry();
        let converter = Converter::with_registry(&registry, ());
        let source = "def f(self, x):\n    return x\n    for i in x:\n        pass\n";
        assert_eq!(
            converter.scriptify_source(source, &Bindings::new().with("x", 1)),
            Err(ScriptifyError::UnsupportedConstruct {
                kind: "for_statement".into()
            })
        );
    }

    #[test]
    fn test_unrepresentable_binding() {
        let registry = minimal_registry();
        let converter = Converter::with_registry(&registry, ());
        let result = converter.scriptify_source(
            "def f(self, x):\n    return x\n",
            &Bindings::new().with("x", f64::NAN),
        );
        assert!(matches!(
            result,
            Err(ScriptifyError::UnrepresentableValue { .. })
        ));
    }

    #[test]
    fn test_invalid_binding_name() {
        let registry = minimal_registry();
        let converter = Converter::with_registry(&registry, ());
        let result = converter.scriptify_source(
            "def f(self):\n    return self\n",
            &Bindings::new().with("a b;x", 1),
        );
        assert_eq!(
            result,
            Err(ScriptifyError::InvalidBindingName {
                name: "a b;x".into()
            })
        );
    }

    #[test]
    fn test_typed_star_args_end_required_params() {
        let registry = minimal_registry();
        let converter = Converter::with_registry(&registry, ());
        let script = converter
            .scriptify_source(
                "def f(self, *args: int, b):\n    return self\n",
                &Bindings::new(),
            )
            .unwrap();
        assert_eq!(script, "return self;");
    }

    #[test]
    fn test_source_unavailable() {
        let registry = minimal_registry();
        let converter = Converter::with_registry(&registry, from_fn(|_| None));
        assert!(matches!(
            converter.scriptify("missing", &Bindings::new()),
            Err(ScriptifyError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_provider_source_translated() {
        let registry = minimal_registry();
        let provider = from_fn(|name: &str| {
            (name == "echo").then(|| "def echo(ctx, value):\n    return value\n".to_string())
        });
        let converter = Converter::with_registry(&registry, provider);
        let script = converter
            .scriptify("echo", &Bindings::new().with("value", "hi"))
            .unwrap();
        assert_eq!(script, "var value=\"hi\";return value;");
    }
}
