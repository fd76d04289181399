//! Registry mapping syntax node kinds to VKScript handlers.
//!
//! Lookup is by exact tree-sitter kind only. A kind without a handler is
//! an [`ScriptifyError::UnsupportedConstruct`]; there is no fallback to a
//! similar kind.

use crate::config::ScriptifyConfig;
use crate::error::ScriptifyError;
use crate::parse;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tree_sitter::Node;

/// Converts one syntax node (and its children, via [`Translator::translate`])
/// into a VKScript fragment.
pub type Handler =
    Arc<dyn Fn(&Translator<'_>, Node<'_>) -> Result<String, ScriptifyError> + Send + Sync>;

/// Kind-to-handler mapping. At most one handler per kind; the last
/// registration wins.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: RwLock<HashMap<String, Handler>>,
}

impl HandlerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in VKScript handlers.
    #[cfg(feature = "builtin-handlers")]
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        crate::handlers::register_defaults(&registry);
        registry
    }

    /// Associate `handler` with `kind`, replacing any previous handler.
    pub fn register<F>(&self, kind: impl Into<String>, handler: F)
    where
        F: Fn(&Translator<'_>, Node<'_>) -> Result<String, ScriptifyError>
            + Send
            + Sync
            + 'static,
    {
        let kind = kind.into();
        tracing::trace!(kind = %kind, "registering handler");
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, Arc::new(handler));
    }

    /// The handler for exactly `kind`.
    ///
    /// The returned handle is cloned out of the map, so no lock is held
    /// while it runs.
    pub fn lookup(&self, kind: &str) -> Result<Handler, ScriptifyError> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind)
            .cloned()
            .ok_or_else(|| ScriptifyError::unsupported(kind))
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(kind)
    }

    /// All registered kinds, sorted.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        kinds.sort();
        kinds
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

/// Process-wide registry.
static GLOBAL: OnceLock<HandlerRegistry> = OnceLock::new();

/// The process-wide registry, with built-in handlers installed on first use.
pub fn global() -> &'static HandlerRegistry {
    GLOBAL.get_or_init(|| {
        #[cfg(feature = "builtin-handlers")]
        {
            HandlerRegistry::with_defaults()
        }
        #[cfg(not(feature = "builtin-handlers"))]
        {
            HandlerRegistry::new()
        }
    })
}

/// Register a handler on the process-wide registry.
pub fn register<F>(kind: impl Into<String>, handler: F)
where
    F: Fn(&Translator<'_>, Node<'_>) -> Result<String, ScriptifyError> + Send + Sync + 'static,
{
    global().register(kind, handler);
}

/// Per-call translation context handed to every handler.
pub struct Translator<'a> {
    registry: &'a HandlerRegistry,
    source: &'a str,
    config: &'a ScriptifyConfig,
}

impl<'a> Translator<'a> {
    pub fn new(registry: &'a HandlerRegistry, source: &'a str, config: &'a ScriptifyConfig) -> Self {
        Self {
            registry,
            source,
            config,
        }
    }

    pub fn config(&self) -> &ScriptifyConfig {
        self.config
    }

    pub fn registry(&self) -> &HandlerRegistry {
        self.registry
    }

    /// Look up the handler for `node`'s kind and run it.
    pub fn translate(&self, node: Node<'_>) -> Result<String, ScriptifyError> {
        let handler = self.registry.lookup(node.kind())?;
        tracing::trace!(kind = node.kind(), row = node.start_position().row, "translating node");
        handler(self, node)
    }

    /// Source text covered by `node`.
    pub fn text(&self, node: Node<'_>) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Required field of `node`; a missing field means a malformed tree.
    pub fn field<'tree>(&self, node: Node<'tree>, name: &str) -> Result<Node<'tree>, ScriptifyError> {
        node.child_by_field_name(name)
            .ok_or_else(|| ScriptifyError::Parse(format!("{} missing {}", node.kind(), name)))
    }

    /// Named children of `node`, comments excluded.
    pub fn named_children<'tree>(&self, node: Node<'tree>) -> Vec<Node<'tree>> {
        parse::named_children(node)
    }

    /// Translate every statement of a block and concatenate the fragments.
    pub fn translate_block(&self, node: Node<'_>) -> Result<String, ScriptifyError> {
        let mut out = String::new();
        for stmt in self.named_children(node) {
            out.push_str(&self.translate(stmt)?);
        }
        Ok(out)
    }
}
