//! User-facing diagnostic messages.
//!
//! Every fatal error is shown with its cause and, where there is one, a
//! suggested fix. Compiler output attached to a diagnostic is reproduced
//! byte-for-byte (after lossy UTF-8 decoding) below the message.

use std::fmt;
use std::path::PathBuf;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(&self, color: bool) -> &'static str {
        match (self, color) {
            (Severity::Error, true) => "\x1b[1;31merror\x1b[0m",
            (Severity::Warning, true) => "\x1b[1;33mwarning\x1b[0m",
            (Severity::Error, false) => "error",
            (Severity::Warning, false) => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(false))
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related file (option file, compiler path)
    pub location: Option<PathBuf>,
    /// Captured compiler output, shown verbatim
    pub output: Option<String>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
            output: None,
        }
    }

    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Attach compiler output. Empty output is ignored.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        let output = output.into();
        if !output.is_empty() {
            self.output = Some(output);
        }
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = format!("{}: {}\n", self.severity.label(color), self.message);

        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        for ctx in &self.context {
            output.push_str(&format!("  = {}\n", ctx));
        }

        if let Some(ref captured) = self.output {
            output.push('\n');
            output.push_str(captured);
            if !captured.ends_with('\n') {
                output.push('\n');
            }
        }

        match self.suggestions.as_slice() {
            [] => {}
            [only] => output.push_str(&format!("{}: {}\n", help(color), only)),
            many => {
                output.push_str(&format!("{}: consider:\n", help(color)));
                for (i, suggestion) in many.iter().enumerate() {
                    output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
                }
            }
        }

        output
    }
}

fn help(color: bool) -> &'static str {
    if color {
        "\x1b[1;32mhelp\x1b[0m"
    } else {
        "help"
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("could not run compiler `cl.exe`")
            .with_context("failed to spawn `cl.exe`")
            .with_location("cl.exe")
            .with_suggestion("Check that the compiler path exists")
            .with_suggestion("Run from a developer command prompt");

        let output = diag.format(false);
        assert!(output.starts_with("error: could not run compiler"));
        assert!(output.contains("  --> cl.exe"));
        assert!(output.contains("  = failed to spawn"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("2. Run from a developer command prompt"));
    }

    #[test]
    fn test_output_is_verbatim() {
        let captured = "main.c:1:5: error: expected ';'\n    int x\n        ^\n";
        let output = Diagnostic::error("compilation failed for main.c")
            .with_output(captured)
            .format(false);

        assert!(output.contains(captured));
    }

    #[test]
    fn test_single_suggestion_inline() {
        let output = Diagnostic::warning("option file kept")
            .with_suggestion("Delete it when done")
            .format(false);
        assert_eq!(output, "warning: option file kept\nhelp: Delete it when done\n");
    }
}
