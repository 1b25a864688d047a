//! Common types and utilities for the kestrel class completer.
//!
//! This crate provides foundational types used across all kestrel crates:
//! - String interning (`Atom`, `Interner`)
//! - Diagnostic kinds, categories and message templates
//! - Completion limits and thresholds

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Diagnostic kinds and message templates
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticKind, format_message};

// Centralized limits and thresholds
pub mod limits;

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod interner_tests;

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
