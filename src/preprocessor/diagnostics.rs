//! Positional diagnostics emitted while an error propagates

use std::fmt;
use std::path::PathBuf;

use log::Level;

/// One reported problem, tied to a file and optionally to a line of it
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Level,
    pub message: String,
    pub path: PathBuf,
    /// 1-based line number and the raw text of that line
    pub line: Option<(usize, String)>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.line {
            Some((number, text)) => write!(
                f,
                "{}:{}: {}\n    {}",
                self.path.display(),
                number,
                self.message,
                text
            ),
            None => write!(f, "{}: {}", self.path.display(), self.message),
        }
    }
}

/// Receiver of diagnostics
///
/// An error crossing N import levels is reported N + 1 times, innermost first.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: &Diagnostic) {
        log::log!(diagnostic.severity, "{}", diagnostic);
    }
}

/// Collects diagnostics for later inspection
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: &Diagnostic) {
        self.push(diagnostic.clone());
    }
}
