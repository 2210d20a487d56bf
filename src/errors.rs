//! Error handling for the sexpr runtime.
//!
//! Every failure is a [`SexprError`]: an [`ErrorKind`] saying what went wrong,
//! optional source information saying where, and diagnostic data for `miette`.
//! Constructing an error never ends the process; that decision belongs to the
//! outermost driver (see `cli::run`).

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

use crate::ast::Span;
use crate::runtime::source::SourceContext;

// ============================================================================
// ERROR KINDS
// ============================================================================

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Runtime errors - raised while evaluating
    #[error("unbound function '{name}'")]
    UnboundFunction { name: String },

    #[error("cannot call {found}: head of a form must resolve to a function")]
    NotCallable { found: String },

    #[error("'{function}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("'{function}' expects {expected}, got {found}")]
    TypeMismatch {
        function: String,
        expected: String,
        found: String,
    },

    #[error("'{function}' cannot take an element of an empty list")]
    EmptyList { function: String },

    #[error("recursion limit of {limit} exceeded")]
    RecursionLimit { limit: usize },

    // Syntax errors - raised by the reader
    #[error("syntax error: {message}")]
    Syntax { message: String },

    #[error("invalid {literal_type} literal '{value}'")]
    InvalidLiteral { literal_type: String, value: String },
}

/// Coarse grouping of error kinds, mostly useful in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Syntax,
    Runtime,
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Syntax { .. } | Self::InvalidLiteral { .. } => ErrorCategory::Syntax,

            Self::UnboundFunction { .. }
            | Self::NotCallable { .. }
            | Self::ArityMismatch { .. }
            | Self::TypeMismatch { .. }
            | Self::EmptyList { .. }
            | Self::RecursionLimit { .. } => ErrorCategory::Runtime,
        }
    }

    /// Suffix used to build diagnostic codes such as `sexpr::eval::arity_mismatch`.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnboundFunction { .. } => "unbound_function",
            Self::NotCallable { .. } => "not_callable",
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::EmptyList { .. } => "empty_list",
            Self::RecursionLimit { .. } => "recursion_limit",
            Self::Syntax { .. } => "syntax",
            Self::InvalidLiteral { .. } => "invalid_literal",
        }
    }

    fn phase(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Syntax => "parse",
            ErrorCategory::Runtime => "eval",
        }
    }

    fn primary_label(&self) -> &'static str {
        match self {
            Self::UnboundFunction { .. } => "no function with this name",
            Self::NotCallable { .. } => "not a function",
            Self::ArityMismatch { .. } => "wrong number of arguments",
            Self::TypeMismatch { .. } => "type mismatch",
            Self::EmptyList { .. } => "empty list",
            Self::RecursionLimit { .. } => "recursion limit exceeded here",
            Self::Syntax { .. } => "here",
            Self::InvalidLiteral { .. } => "invalid literal",
        }
    }

    fn default_help(&self) -> Option<String> {
        match self {
            Self::UnboundFunction { name } => Some(format!(
                "define it first, e.g. (define {name} <value>), or check the spelling"
            )),
            Self::RecursionLimit { .. } => {
                Some("raise the limit with --max-depth if the recursion is intended".into())
            }
            _ => None,
        }
    }
}

// ============================================================================
// THE ERROR TYPE
// ============================================================================

/// Where an error happened.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

/// Diagnostic enhancement data.
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

/// The single error type of the crate.
#[derive(Debug, Clone)]
pub struct SexprError {
    pub kind: ErrorKind,
    pub source_info: Option<SourceInfo>,
    pub diagnostic_info: DiagnosticInfo,
}

impl SexprError {
    /// An error with no location yet. The evaluator attaches one on the way out.
    pub fn new(kind: ErrorKind) -> Self {
        let diagnostic_info = DiagnosticInfo {
            help: kind.default_help(),
            error_code: format!("sexpr::{}::{}", kind.phase(), kind.code_suffix()),
        };
        Self {
            kind,
            source_info: None,
            diagnostic_info,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Attaches a source location unless a more precise one is already set.
    pub fn located(mut self, source: &SourceContext, span: Span) -> Self {
        if self.source_info.is_none() {
            self.source_info = Some(SourceInfo {
                source: source.to_named_source(),
                primary_span: to_source_span(span),
            });
        }
        self
    }

    pub fn span(&self) -> Option<SourceSpan> {
        self.source_info.as_ref().map(|info| info.primary_span)
    }
}

impl From<ErrorKind> for SexprError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl std::error::Error for SexprError {}

impl fmt::Display for SexprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.category() {
            ErrorCategory::Syntax => write!(f, "Parse error: {}", self.kind),
            ErrorCategory::Runtime => write!(f, "Runtime error: {}", self.kind),
        }
    }
}

impl Diagnostic for SexprError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let info = self.source_info.as_ref()?;
        let label = LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            info.primary_span,
        );
        Some(Box::new(std::iter::once(label)))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_info
            .as_ref()
            .map(|info| &*info.source as &dyn miette::SourceCode)
    }
}

// ============================================================================
// CONTEXT-AWARE CONSTRUCTION
// ============================================================================

/// Context-aware error creation. Contexts that know the source being
/// evaluated implement `source()` and get located errors for free.
pub trait ErrorReporting {
    fn source(&self) -> &SourceContext;

    fn report(&self, kind: ErrorKind, span: Span) -> SexprError {
        SexprError::new(kind).located(self.source(), span)
    }

    fn not_callable(&self, found: &str, span: Span) -> SexprError {
        self.report(
            ErrorKind::NotCallable {
                found: found.to_string(),
            },
            span,
        )
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Converts an AST span to a miette span.
pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

/// Prints an error with full miette diagnostics to stderr.
pub fn print_error(error: SexprError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
