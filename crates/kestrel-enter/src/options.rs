//! Switches that change what the completer reports.

use serde::{Deserialize, Serialize};

/// Options of one compilation session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnterOptions {
    /// Report classes whose name is also a package, and packages whose name
    /// is also a class.
    pub check_clash: bool,
    /// Warn when a named import refers to a deprecated type.
    pub allow_deprecation_on_import: bool,
    /// Record which completion triggered which.
    pub track_dependencies: bool,
    /// Package imported on demand by every compilation unit.
    pub prelude_package: String,
    /// Master switch for deprecation warnings.
    pub lint_deprecation: bool,
}

impl Default for EnterOptions {
    fn default() -> Self {
        Self {
            check_clash: true,
            allow_deprecation_on_import: false,
            track_dependencies: false,
            prelude_package: "java.lang".to_string(),
            lint_deprecation: true,
        }
    }
}

impl EnterOptions {
    pub(crate) fn warn_deprecated_imports(&self) -> bool {
        self.allow_deprecation_on_import && self.lint_deprecation
    }
}
