//! Non-fatal parse diagnostics.
//!
//! The decoders recover from malformed lines locally. Each recovery is
//! described by a [`Diagnostic`] and handed to a [`DiagnosticSink`]; the
//! default [`TracingSink`] forwards them as `tracing` events.

use core::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::scan::ScanError;

/// How loudly a diagnostic should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something in the header was not understood.
    Warning,
    /// A body line was skipped or partially decoded.
    Note,
}

/// Why a body line was discarded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("bad position: {0}")]
    Position(ScanError),

    #[error("bad normal: {0}")]
    Normal(ScanError),

    #[error("bad face vertex count: {0}")]
    FaceArity(ScanError),

    #[error("face has {0} vertices, only triangles are supported")]
    NotTriangle(u32),

    #[error("bad vertex index: {0}")]
    Index(ScanError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("unknown line in PLY header: {0}")]
    UnknownHeaderLine(String),

    #[error("ignoring element '{0}'")]
    UnknownElement(String),

    #[error("malformed element line '{text}': {error}")]
    MalformedElement { text: String, error: ScanError },

    #[error("malformed property line '{text}': {error}")]
    MalformedProperty { text: String, error: ScanError },

    #[error("property declared outside of any element: {0}")]
    PropertyOutsideElement(String),

    #[error("binary PLY is not supported, body will be read as ASCII: {0}")]
    BinaryFormat(String),

    #[error("skipped vertex line: {0}")]
    SkippedVertex(SkipReason),

    #[error("skipped face line: {0}")]
    SkippedFace(SkipReason),

    #[error("colour is neither float nor 8-bit integer, keeping opaque white")]
    UndecodableColour,

    #[error("{element} data ended after {parsed} of {declared} declared records")]
    TruncatedBody {
        element: &'static str,
        declared: usize,
        parsed: usize,
    },
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::UnknownHeaderLine(_)
            | DiagnosticKind::UnknownElement(_)
            | DiagnosticKind::MalformedElement { .. }
            | DiagnosticKind::MalformedProperty { .. }
            | DiagnosticKind::PropertyOutsideElement(_)
            | DiagnosticKind::BinaryFormat(_)
            | DiagnosticKind::TruncatedBody { .. } => Severity::Warning,
            DiagnosticKind::SkippedVertex(_)
            | DiagnosticKind::SkippedFace(_)
            | DiagnosticKind::UndecodableColour => Severity::Note,
        }
    }
}

/// A diagnostic tied to a 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(line: usize, kind: DiagnosticKind) -> Self {
        Self { line, kind }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

/// Receiver for diagnostics produced while parsing.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }
}

/// Emits warnings with `warn!` and notes with `debug!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Warning => warn!(line = diagnostic.line, "{}", diagnostic.kind),
            Severity::Note => debug!(line = diagnostic.line, "{}", diagnostic.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_line_and_text() {
        let diagnostic = Diagnostic::new(
            4,
            DiagnosticKind::UnknownHeaderLine("bogus stuff".to_string()),
        );
        assert_eq!(
            diagnostic.to_string(),
            "line 4: unknown line in PLY header: bogus stuff"
        );
        assert_eq!(diagnostic.severity(), Severity::Warning);
    }

    #[test]
    fn test_forwarding_through_mut_ref() {
        fn report_quad<S: DiagnosticSink>(mut sink: S) {
            sink.report(Diagnostic::new(
                9,
                DiagnosticKind::SkippedFace(SkipReason::NotTriangle(4)),
            ));
        }

        let mut collected: Vec<Diagnostic> = Vec::new();
        report_quad(&mut collected);
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].severity(), Severity::Note);
        assert_eq!(
            collected[0].to_string(),
            "line 9: skipped face line: face has 4 vertices, only triangles are supported"
        );
    }
}
