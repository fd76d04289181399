//! Translate Python functions into VKScript.
//!
//! `normalize-vkscript` takes the source of an ordinary Python function,
//! parses it with tree-sitter and re-emits every statement as VKScript, the
//! JavaScript-like dialect run by the VK API `execute` method.
//!
//! # Architecture
//!
//! ```text
//! SourceProvider        HandlerRegistry              Output
//! ──────────────    ──────────────────────    ─────────────────────
//! ModuleSource  ─┐   "return_statement" ─┐
//! closures      ─┼─> Converter ──────────┼──> var x=5;return x;
//! (custom)      ─┘   "identifier"       ─┘
//! ```
//!
//! Each tree-sitter node kind maps to exactly one handler. Supporting a new
//! Python construct means registering one more handler; the driver never
//! changes. Kinds without a handler fail loudly with
//! [`ScriptifyError::UnsupportedConstruct`].
//!
//! # Example
//!
//! ```ignore
//! use normalize_vkscript::{Bindings, Converter, ModuleSource};
//!
//! let module = ModuleSource::new(
//!     "def get_name(self, user_id):\n    return API.users.get(user_ids=user_id)[0].first_name\n",
//! );
//! let script = Converter::new(module)
//!     .scriptify("get_name", &Bindings::new().with("user_id", 1))?;
//! // => var user_id=1;return API.users.get({"user_ids":user_id})[0].first_name;
//! ```
//!
//! The first parameter is reserved for `self` (or any context object) and
//! never needs a binding; every other positional parameter does.

pub mod bindings;
pub mod config;
pub mod driver;
pub mod error;
pub mod parse;
pub mod registry;
pub mod source;
pub mod traits;
pub mod value;

#[cfg(feature = "builtin-handlers")]
pub mod handlers;

// Re-exports: pipeline
pub use driver::{Converter, scriptify_source};

// Re-exports: data
pub use bindings::Bindings;
pub use config::ScriptifyConfig;
pub use error::ScriptifyError;
pub use value::{LiteralError, ScriptValue};

// Re-exports: registry
pub use registry::{Handler, HandlerRegistry, Translator, global, register};

// Re-exports: sources
pub use source::ModuleSource;
pub use traits::{FnSource, SourceProvider, from_fn};

// Handlers receive tree-sitter nodes
pub use tree_sitter::Node;
