pub mod ansi;
pub mod json;
pub mod registry;

use std::path::Path;

use crate::ast::Span;
use crate::codegen::RenderError;
use crate::config::ConfigError;
use crate::lexer::LexError;
use crate::parser::{ParseError, SyntaxError};
use crate::resolve::GenerateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub suggestion: Option<String>,
    /// Text the spans point into.
    pub source: Option<String>,
    /// File the source text came from.
    pub path: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
            suggestion: None,
            source: None,
            path: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic { severity: Severity::Warning, ..Diagnostic::error(message) }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_span(mut self, span: Span, label: impl Into<String>) -> Self {
        self.labels.push(Label { span, message: label.into(), is_primary: true });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.display().to_string());
        self
    }
}

// ---- From impls for error types ----

impl From<&LexError> for Diagnostic {
    fn from(e: &LexError) -> Self {
        let span = Span {
            start: e.position,
            end: e.position + e.snippet.len().max(1),
        };
        Diagnostic::error(format!("unexpected character '{}'", e.snippet))
            .with_code("GGT-L001")
            .with_span(span, "here")
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(e: &ParseError) -> Self {
        Diagnostic::error(&e.message).with_code(e.code).with_span(e.span, "here")
    }
}

impl From<&ConfigError> for Diagnostic {
    fn from(e: &ConfigError) -> Self {
        let d = Diagnostic::error(e.to_string()).with_code(e.code());
        match e {
            ConfigError::MissingInput => d.with_suggestion("pass a file: ggt service.go"),
            ConfigError::OutputExtension(_) => d.with_suggestion("test files must end in _test.go"),
            _ => d,
        }
    }
}

impl From<&RenderError> for Diagnostic {
    fn from(e: &RenderError) -> Self {
        let d = Diagnostic::error(e.to_string()).with_code(e.code());
        match e {
            RenderError::Format { .. } => {
                d.with_note("the test file was written but is not valid Go as generated")
            }
            _ => d,
        }
    }
}

/// Diagnostics for a generation failure. A parse failure yields one
/// diagnostic per parse error, each carrying the file's text for snippets.
pub fn from_generate_error(e: &GenerateError) -> Vec<Diagnostic> {
    match e {
        GenerateError::Syntax { path, text, source: SyntaxError::Lex(lex) } => {
            vec![Diagnostic::from(lex).with_path(path).with_source(text.clone())]
        }
        GenerateError::Syntax { path, text, source: SyntaxError::Parse(errors) } => errors
            .iter()
            .map(|pe| Diagnostic::from(pe).with_path(path).with_source(text.clone()))
            .collect(),
        GenerateError::UnresolvedStructs { tests } => {
            let mut d = Diagnostic::error("could not find receiver structs")
                .with_code(e.code())
                .with_suggestion("only struct receivers are supported; use --run to skip other methods");
            for test in tests {
                d = d.with_note(format!("no struct definition for {test}"));
            }
            vec![d]
        }
        GenerateError::DuplicateTestName { .. } => vec![
            Diagnostic::error(e.to_string())
                .with_code(e.code())
                .with_suggestion("narrow the selection with --run"),
        ],
        GenerateError::Read { path, .. } | GenerateError::ListPackage { dir: path, .. } => {
            vec![Diagnostic::error(e.to_string()).with_code(e.code()).with_path(path)]
        }
    }
}
