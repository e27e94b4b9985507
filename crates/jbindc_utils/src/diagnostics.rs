use std::cell::RefCell;

use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// A single message tied to the class or member that caused it.
///
/// Unlike compiler diagnostics there is no source text to point into; the
/// anchor is the qualified element path (`com.example.Foo.getName`).
#[derive(Clone)]
pub struct Diagnostic {
    severity: DiagnosticSeverity,
    element: Option<String>,
    message: String,
}

impl Diagnostic {
    pub fn new(severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            element: None,
            message: message.into(),
        }
    }

    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, message)
    }

    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn severity(&self) -> DiagnosticSeverity {
        self.severity
    }

    pub fn element(&self) -> Option<&str> {
        self.element.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Collects diagnostics for the duration of one run.
///
/// Every diagnostic is printed as it arrives and retained so the driver can
/// decide the completion status after emission finished.
#[derive(Default)]
pub struct Reporter {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        emit_diagnostic(&diagnostic);
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    pub fn error(&self, element: impl Into<String>, message: impl Into<String>) {
        self.report(Diagnostic::error(message).with_element(element));
    }

    pub fn warning(&self, element: impl Into<String>, message: impl Into<String>) {
        self.report(Diagnostic::warning(message).with_element(element));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.severity() == DiagnosticSeverity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity() == DiagnosticSeverity::Error)
            .count()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}

pub fn emit_diagnostic(diagnostic: &Diagnostic) {
    let tag = match diagnostic.severity() {
        DiagnosticSeverity::Error => "error:".red().bold(),
        DiagnosticSeverity::Warning => "warning:".yellow().bold(),
    };

    match diagnostic.element() {
        Some(element) => eprintln!("{} {}: {}", tag, element.bold(), diagnostic.message()),
        None => eprintln!("{} {}", tag, diagnostic.message()),
    }
}
