//! Diagnostic sink.

use kestrel_common::{Diagnostic, DiagnosticKind};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Collects diagnostics in report order.
///
/// A second report of the same kind at the same position of the same file is
/// dropped, so a lookup that is retried after a failure does not duplicate
/// its error.
#[derive(Debug, Default)]
pub struct Log {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<(String, u32, DiagnosticKind)>,
}

impl Log {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. Returns `false` if it was a duplicate.
    pub fn report(&mut self, file: &str, pos: u32, kind: DiagnosticKind, args: Vec<String>) -> bool {
        if !self.seen.insert((file.to_string(), pos, kind)) {
            return false;
        }
        let diagnostic = Diagnostic::new(file, pos, kind, args);
        debug!(
            file,
            pos,
            code = kind.code(),
            message = %diagnostic.render(),
            "diagnostic"
        );
        self.diagnostics.push(diagnostic);
        true
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Move the collected diagnostics out. Deduplication state is kept.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
