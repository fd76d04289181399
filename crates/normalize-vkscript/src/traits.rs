//! Traits for source acquisition.

use crate::error::ScriptifyError;

/// Supplies the literal source text of a function, the way
/// `inspect.getsource` would.
///
/// Implementations return the text of a single function definition,
/// decorators included. Functions that have no retrievable source fail with
/// [`ScriptifyError::SourceUnavailable`].
pub trait SourceProvider {
    fn source_of(&self, function: &str) -> Result<String, ScriptifyError>;
}

impl<P: SourceProvider + ?Sized> SourceProvider for &P {
    fn source_of(&self, function: &str) -> Result<String, ScriptifyError> {
        (**self).source_of(function)
    }
}

/// Provider backed by a closure; `None` means the source is unavailable.
pub struct FnSource<F>(F);

/// Wrap a closure as a [`SourceProvider`].
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    FnSource(f)
}

impl<F> SourceProvider for FnSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn source_of(&self, function: &str) -> Result<String, ScriptifyError> {
        (self.0)(function).ok_or_else(|| ScriptifyError::SourceUnavailable {
            function: function.to_string(),
            reason: "provider has no source for it".into(),
        })
    }
}
