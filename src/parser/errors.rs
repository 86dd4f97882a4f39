//! Parse and validation diagnostics.
//!
//! The loader surfaces only the first error-severity diagnostic of a file,
//! cleaned up for presentation: first character capitalized, the generic
//! bison-style "Syntax error, unexpected …" collapsed to "Syntax error",
//! and the `file:line` location appended.

/// How bad a diagnostic is. Only `Error` diagnostics abort a load; the
/// loader picks the first of them and ignores everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The file is unusable: a parse failure or a broken structural rule.
    Error,
    /// Suspicious but loadable; never surfaced as a load failure.
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

/// A single parser or validator diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub message: String,
    pub severity: Severity,
    /// 1-based source line, when known.
    pub line: Option<u32>,
}

impl ParseDiagnostic {
    pub fn error(message: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            line,
        }
    }

    pub fn warning(message: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            line,
        }
    }
}

/// The 1-based line number of a byte offset in `source`.
pub fn line_at(source: &str, offset: usize) -> u32 {
    let end = offset.min(source.len());
    source[..end].bytes().filter(|b| *b == b'\n').count() as u32 + 1
}

/// Select and format the first error-severity diagnostic, or `None` when
/// the list contains no errors.
pub fn first_error(diagnostics: &[ParseDiagnostic], file: &str) -> Option<String> {
    let diag = diagnostics.iter().find(|d| d.severity.is_error())?;

    let mut message = diag.message.clone();
    if let Some(first) = message.chars().next() {
        let upper: String = first.to_uppercase().collect();
        message.replace_range(..first.len_utf8(), &upper);
    }
    // the bison-style message is not really useful, replace it
    if message.starts_with("Syntax error, unexpected") {
        message = "Syntax error".to_string();
    }
    match diag.line {
        Some(line) => Some(format!("{message}, at {file}:{line}")),
        None => Some(format!("{message}, at {file}")),
    }
}
