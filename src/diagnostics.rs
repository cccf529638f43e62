//! Diagnostics produced by the validator layers.
//!
//! Every check — catalog-based arity matching and the pattern/autofix
//! engine alike — reports through `ValidationIssue`. There is no fatal
//! error path: malformed input always degrades to a list of issues.

use serde::{Deserialize, Serialize};

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// One diagnostic finding for a command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
    /// 1-based line index within a batch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// The offending raw command text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Human-readable remediation hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// A concrete repaired command string, when a deterministic fix exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_command: Option<String>,
}

impl ValidationIssue {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        ValidationIssue {
            severity,
            message: message.into(),
            line: None,
            command: None,
            suggestion: None,
            fixed_command: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_fix(mut self, fixed: impl Into<String>) -> Self {
        self.fixed_command = Some(fixed.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
