//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! Features:
//! - Error limits to prevent overwhelming output
//! - Deduplication of identical diagnostics at the same location
//! - Follow-on error filtering (diagnostics that mention a poisoned type)

use rustc_hash::FxHashSet;

use crate::Diagnostic;

/// Marker the type printer uses for the poison type. A diagnostic that
/// mentions it is a consequence of an earlier error.
const POISON_MARKER: &str = "<error>";

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors kept (0 = unlimited).
    pub error_limit: usize,
    /// Drop diagnostics that only restate an earlier error.
    pub filter_follow_on: bool,
    /// Drop diagnostics identical in code, message and location.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 20,
            filter_follow_on: true,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// Create a config with no limits (for testing).
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            filter_follow_on: false,
            deduplicate: false,
        }
    }
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// ```text
/// let mut queue = DiagnosticQueue::with_config(config);
/// for error in errors { queue.add(error.to_diagnostic(&interner)); }
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<Diagnostic>,
    error_count: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::with_config(DiagnosticConfig::default())
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            seen: FxHashSet::default(),
            error_count: 0,
            config,
        }
    }

    /// Add a diagnostic. Returns `false` if it was filtered out.
    pub fn add(&mut self, diagnostic: Diagnostic) -> bool {
        if self.limit_reached() && diagnostic.is_error() {
            return false;
        }
        if self.config.filter_follow_on && diagnostic.message.contains(POISON_MARKER) {
            return false;
        }
        if self.config.deduplicate && !self.seen.insert(diagnostic.clone()) {
            return false;
        }
        if diagnostic.is_error() {
            self.error_count += 1;
        }
        self.diagnostics.push(diagnostic);
        true
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Take all diagnostics, sorted by primary location.
    ///
    /// Sorting is stable, so diagnostics at the same location keep the order
    /// they were reported in. Diagnostics without a location sort last.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut diagnostics = std::mem::take(&mut self.diagnostics);
        diagnostics.sort_by_key(|d| (d.primary_location().is_none(), d.primary_location()));
        self.seen.clear();
        self.error_count = 0;
        diagnostics
    }
}
