//! Error handling and diagnostics for the Monkey interpreter
//!
//! Two independent error channels exist: parse errors (plain strings
//! accumulated by the parser) and structured runtime errors produced by the
//! evaluator. This module defines the runtime side: source positions, error
//! kinds, stack frames and the `RuntimeError` type with its two rendering
//! forms.

use std::fmt;

pub mod diagnostic;

pub use diagnostic::Diagnostic;

/// Result type alias for evaluation.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Source position of a token or error, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    /// Position for synthesized tokens that have no place in the source.
    pub const UNKNOWN: SourcePosition = SourcePosition { line: 0, column: 0 };

    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The closed set of runtime error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    TypeMismatch,
    UnsupportedOperation,
    DivisionByZero,
    UnknownIdentifier,
    NotCallable,
    InvalidIndex,
    InvalidHashKey,
    InvalidArgument,
    InvalidControlFlow,
}

impl RuntimeErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::UnknownIdentifier => "UNKNOWN_IDENTIFIER",
            Self::NotCallable => "NOT_CALLABLE",
            Self::InvalidIndex => "INVALID_INDEX",
            Self::InvalidHashKey => "INVALID_HASH_KEY",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::InvalidControlFlow => "INVALID_CONTROL_FLOW",
        }
    }
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One diagnostic record per function call, captured for stack traces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub function_name: String,
    pub call_site: SourcePosition,
    pub argument_count: usize,
}

impl StackFrame {
    pub fn new(
        function_name: impl Into<String>,
        call_site: SourcePosition,
        argument_count: usize,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            call_site,
            argument_count,
        }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at {}({} args) @ {}",
            self.function_name, self.argument_count, self.call_site
        )
    }
}

/// A structured runtime error. Aborts the evaluation that raised it; never
/// caught or retried inside the evaluator.
///
/// `stack` holds the call frames captured at the point of failure, innermost
/// call first, so `format_multiline` lists the oldest call last.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub message: String,
    pub position: SourcePosition,
    pub stack: Vec<StackFrame>,
}

impl RuntimeError {
    pub fn new(
        kind: RuntimeErrorKind,
        message: impl Into<String>,
        position: SourcePosition,
        stack: Vec<StackFrame>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
            stack,
        }
    }

    /// `Error[KIND] at LINE:COL: MESSAGE`
    pub fn format_single_line(&self) -> String {
        format!("Error[{}] at {}: {}", self.kind, self.position, self.message)
    }

    /// Single-line form plus a stack trace section. A synthetic `<repl>`
    /// root frame is always appended so the trace never reads empty.
    pub fn format_multiline(&self) -> String {
        let mut out = self.format_single_line();
        out.push_str("\nStack trace:\n");
        for frame in &self.stack {
            out.push_str("  ");
            out.push_str(&frame.to_string());
            out.push('\n');
        }
        out.push_str("  at <repl>(0 args) @ 1:1");
        out
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_single_line())
    }
}

impl std::error::Error for RuntimeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_position_display() {
        assert_eq!(SourcePosition::new(10, 5).to_string(), "10:5");
        assert_eq!(SourcePosition::UNKNOWN.to_string(), "0:0");
    }

    #[test]
    fn test_stack_frame_display() {
        let frame = StackFrame::new("add", SourcePosition::new(3, 14), 2);
        assert_eq!(frame.to_string(), "at add(2 args) @ 3:14");
    }

    #[test]
    fn test_format_single_line() {
        let err = RuntimeError::new(
            RuntimeErrorKind::TypeMismatch,
            "Operation + not supported for types INTEGER and BOOLEAN",
            SourcePosition::new(1, 3),
            vec![],
        );
        assert_eq!(
            err.format_single_line(),
            "Error[TYPE_MISMATCH] at 1:3: Operation + not supported for types INTEGER and BOOLEAN"
        );
    }

    #[test]
    fn test_format_multiline_appends_sentinel_root() {
        let err = RuntimeError::new(
            RuntimeErrorKind::DivisionByZero,
            "Cannot divide by 0!",
            SourcePosition::new(2, 8),
            vec![
                StackFrame::new("inner", SourcePosition::new(2, 5), 1),
                StackFrame::new("outer", SourcePosition::new(4, 1), 0),
            ],
        );
        let rendered = err.format_multiline();
        assert!(rendered.starts_with("Error[DIVISION_BY_ZERO] at 2:8: Cannot divide by 0!"));
        assert!(rendered.contains("Stack trace:"));
        assert!(rendered.contains("  at inner(1 args) @ 2:5"));
        assert!(rendered.ends_with("  at <repl>(0 args) @ 1:1"));
        // innermost call listed before its caller
        let inner_idx = rendered.find("at inner").unwrap();
        let outer_idx = rendered.find("at outer").unwrap();
        assert!(inner_idx < outer_idx);
    }

    #[test]
    fn test_format_multiline_without_frames() {
        let err = RuntimeError::new(
            RuntimeErrorKind::UnknownIdentifier,
            "Identifier not found: foo",
            SourcePosition::new(1, 1),
            vec![],
        );
        assert!(err
            .format_multiline()
            .ends_with("Stack trace:\n  at <repl>(0 args) @ 1:1"));
    }
}
