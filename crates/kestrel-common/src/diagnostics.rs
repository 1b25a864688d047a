//! Diagnostic types and message lookup for the class completer.
//!
//! The completer never formats messages: it emits a [`Diagnostic`] holding a
//! position, a [`DiagnosticKind`] and raw arguments. Message templates live
//! in `data.rs` for consumers that want to render them.

use serde::Serialize;

mod data;
pub use data::DIAGNOSTIC_MESSAGES;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
}

/// Every diagnostic the completer can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    CannotFindSymbol,
    PackageDoesNotExist,
    StaticImportOnlyClassesAndInterfaces,
    AmbiguousImport,
    ImportClashesWithClass,
    UnresolvedImport,
    PackageClashesWithClass,
    ClassClashesWithPackage,
    CyclicInheritance,
    ObjectCannotExtend,
    RepeatedInterface,
    NoInterfaceExpectedHere,
    InterfaceExpectedHere,
    CannotInheritFromFinal,
    AlreadyDefined,
    DuplicateClass,
    CannotAccess,
    NotAnAnnotationType,
    AmbiguousReference,
    DeprecatedImport,
}

impl DiagnosticKind {
    /// Numeric code of this kind.
    #[must_use]
    pub fn code(self) -> u32 {
        self.message().code
    }

    /// Category of this kind.
    #[must_use]
    pub fn category(self) -> DiagnosticCategory {
        self.message().category
    }

    /// Message template with `{0}`, `{1}`, ... placeholders.
    #[must_use]
    pub fn template(self) -> &'static str {
        self.message().message
    }

    fn message(self) -> &'static DiagnosticMessage {
        // The table is indexed by discriminant; `data.rs` keeps them aligned.
        &DIAGNOSTIC_MESSAGES[self as usize]
    }
}

/// A diagnostic emitted while completing classes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// File name of the compilation unit the position belongs to.
    pub file: String,
    /// Byte offset of the offending declaration or clause.
    pub pos: u32,
    pub kind: DiagnosticKind,
    pub category: DiagnosticCategory,
    /// Raw message arguments, in template order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with the category implied by `kind`.
    #[must_use]
    pub fn new(file: impl Into<String>, pos: u32, kind: DiagnosticKind, args: Vec<String>) -> Self {
        Self {
            file: file.into(),
            pos,
            kind,
            category: kind.category(),
            args,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// Render the message template with this diagnostic's arguments.
    #[must_use]
    pub fn render(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        format_message(self.kind.template(), &args)
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub kind: DiagnosticKind,
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}
