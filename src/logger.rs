use std::fmt::Debug;

use codemap::SpanLoc;

/// A hook for diagnostic output.
///
/// The parser emits at most one kind of warning (see the `&&` rule); later
/// compilation phases share the same trait.
pub trait Logger: Debug {
    /// Report a warning attached to a source location.
    fn warn(&self, location: SpanLoc, message: &str);
}

/// Writes warnings to standard error.
#[derive(Debug)]
pub struct StdLogger;

impl Logger for StdLogger {
    fn warn(&self, location: SpanLoc, message: &str) {
        eprintln!(
            "Warning: {}\n    ./{}:{}:{}",
            message,
            location.file.name(),
            location.begin.line + 1,
            location.begin.column + 1
        );
    }
}

/// Discards all warnings.
#[derive(Debug)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn warn(&self, _location: SpanLoc, _message: &str) {}
}
