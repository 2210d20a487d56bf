use miette::NamedSource;
use std::sync::Arc;

/// The text being evaluated, kept for error reporting.
///
/// Trees built by hand have no text behind them; they use
/// [`SourceContext::fallback`], which still gives diagnostics a name.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Source read from a file or handed over by an embedder.
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Placeholder used when no real source text exists.
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("; {}", context),
        }
    }

    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("expression tree built in memory")
    }
}
