use super::{DiagnosticCategory, DiagnosticKind, DiagnosticMessage};

use DiagnosticCategory::{Error, Warning};

const fn msg(
    kind: DiagnosticKind,
    code: u32,
    category: DiagnosticCategory,
    message: &'static str,
) -> DiagnosticMessage {
    DiagnosticMessage {
        kind,
        code,
        category,
        message,
    }
}

/// Message table, in `DiagnosticKind` discriminant order.
pub static DIAGNOSTIC_MESSAGES: [DiagnosticMessage; 20] = [
    msg(DiagnosticKind::CannotFindSymbol, 1001, Error, "cannot find symbol: {0}"),
    msg(DiagnosticKind::PackageDoesNotExist, 1002, Error, "package {0} does not exist"),
    msg(
        DiagnosticKind::StaticImportOnlyClassesAndInterfaces,
        1003,
        Error,
        "static import only from classes and interfaces",
    ),
    msg(
        DiagnosticKind::AmbiguousImport,
        1004,
        Error,
        "a type with the same simple name {0} is already defined by the single-type-import of {1}",
    ),
    msg(
        DiagnosticKind::ImportClashesWithClass,
        1005,
        Error,
        "{0} is already defined in this compilation unit",
    ),
    msg(DiagnosticKind::UnresolvedImport, 1006, Error, "cannot find symbol: static {0} in {1}"),
    msg(
        DiagnosticKind::PackageClashesWithClass,
        1007,
        Error,
        "package {0} clashes with class of same name",
    ),
    msg(
        DiagnosticKind::ClassClashesWithPackage,
        1008,
        Error,
        "{0} {1} clashes with package of same name",
    ),
    msg(DiagnosticKind::CyclicInheritance, 1009, Error, "cyclic inheritance involving {0}"),
    msg(
        DiagnosticKind::ObjectCannotExtend,
        1010,
        Error,
        "{0} cannot have a supertype or superinterfaces",
    ),
    msg(DiagnosticKind::RepeatedInterface, 1011, Error, "repeated interface {0}"),
    msg(DiagnosticKind::NoInterfaceExpectedHere, 1012, Error, "no interface expected here"),
    msg(DiagnosticKind::InterfaceExpectedHere, 1013, Error, "interface expected here"),
    msg(DiagnosticKind::CannotInheritFromFinal, 1014, Error, "cannot inherit from final {0}"),
    msg(DiagnosticKind::AlreadyDefined, 1015, Error, "{0} {1} is already defined in {2}"),
    msg(DiagnosticKind::DuplicateClass, 1016, Error, "duplicate class: {0}"),
    msg(DiagnosticKind::CannotAccess, 1017, Error, "cannot access {0}: {1}"),
    msg(DiagnosticKind::NotAnAnnotationType, 1018, Error, "{0} is not an annotation type"),
    msg(
        DiagnosticKind::AmbiguousReference,
        1019,
        Error,
        "reference to {0} is ambiguous: both {1} and {2} match",
    ),
    msg(DiagnosticKind::DeprecatedImport, 2001, Warning, "{0} in {1} has been deprecated"),
];
