use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// A scan failure with source location information.
///
/// The only structural failure the scanner knows about is an opening `{`
/// whose matching `}` never arrives before end of input.
#[derive(Debug, Clone)]
pub struct ScanError {
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
    pub severity: Severity,
    pub notes: Vec<String>,
}

impl ScanError {
    pub(crate) fn error(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        ScanError {
            message: message.into(),
            span,
            file_id,
            severity: Severity::Error,
            notes: Vec::new(),
        }
    }

    /// A block opened at `span` whose closing brace was never found.
    pub fn unbalanced(span: Range<usize>, open_depth: usize, file_id: usize) -> Self {
        ScanError::error("unbalanced block: opening `{` is never closed", span, file_id)
            .with_note(format!(
                "reached end of input with {} unclosed brace(s)",
                open_depth
            ))
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(self.severity)
            .with_message(&self.message)
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ScanError {}
