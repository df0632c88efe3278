//! Diagnostic formatting for runtime errors
//!
//! Renders a `RuntimeError` with color and, when the source text is
//! available, an excerpt of the offending line with a caret under the
//! error column.

use colored::Colorize;

use super::{RuntimeError, SourcePosition};

/// Diagnostic information for displaying a runtime error with context.
pub struct Diagnostic {
    error: RuntimeError,
    source: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic from an error.
    pub fn new(error: RuntimeError) -> Self {
        Self { error, source: None }
    }

    /// Create a diagnostic with source code context.
    pub fn with_source(error: RuntimeError, source: &str) -> Self {
        Self {
            error,
            source: Some(source.to_string()),
        }
    }

    /// Format the diagnostic with color, context and the stack trace.
    pub fn format(&self) -> String {
        let mut output = String::new();

        let kind = format!("Error[{}]", self.error.kind).red().bold();
        output.push_str(&format!("{}: {}\n", kind, self.error.message));
        output.push_str(&format!("  {} {}\n", "-->".blue().bold(), self.error.position));

        if let Some(ref source) = self.source {
            output.push_str(&self.format_source_context(source, self.error.position));
        }

        output.push_str(&format!("{}\n", "Stack trace:".bold()));
        for frame in &self.error.stack {
            output.push_str(&format!("  {}\n", frame));
        }
        output.push_str("  at <repl>(0 args) @ 1:1\n");

        output
    }

    /// Format the source line around the error with a caret indicator.
    fn format_source_context(&self, source: &str, position: SourcePosition) -> String {
        let mut output = String::new();
        let lines: Vec<&str> = source.lines().collect();
        let line = position.line as usize;

        if line == 0 || line > lines.len() {
            return output;
        }

        let line_idx = line - 1;
        let line_num_width = line.to_string().len();

        if line_idx > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:width$}", line_idx, width = line_num_width).blue(),
                lines[line_idx - 1]
            ));
        }

        output.push_str(&format!(
            "  {} {}\n",
            format!("{:width$}", line, width = line_num_width).blue().bold(),
            lines[line_idx]
        ));

        let indicator_padding = " ".repeat(line_num_width + 2 + position.column.max(1) as usize - 1);
        output.push_str(&format!("{}{}\n", indicator_padding, "^".red().bold()));

        if line_idx + 1 < lines.len() {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:width$}", line_idx + 2, width = line_num_width).blue(),
                lines[line_idx + 1]
            ));
        }

        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}
