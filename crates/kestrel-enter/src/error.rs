//! Error types of the completer.
//!
//! Almost every problem a user can cause is a diagnostic, not an `Err`. The
//! two exceptions are [`FatalError`], which aborts the compilation, and
//! [`CompletionFailure`], which unwinds to the nearest phase body and is
//! reported there.

use kestrel_symbols::{ScopeError, SymbolId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FatalError {
    /// The prelude package has no classes at all.
    #[error("fatal: package {package} does not exist")]
    MissingPrelude { package: String },
    #[error("internal error: {0}")]
    Scope(#[from] ScopeError),
}

/// A class could not be loaded while something else was being completed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot access {class}: {reason}")]
pub struct CompletionFailure {
    pub sym: SymbolId,
    pub class: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnterError {
    #[error(transparent)]
    Fatal(#[from] FatalError),
    #[error(transparent)]
    Failure(#[from] CompletionFailure),
}

impl From<ScopeError> for EnterError {
    fn from(err: ScopeError) -> Self {
        EnterError::Fatal(FatalError::Scope(err))
    }
}

pub type EnterResult<T> = Result<T, EnterError>;
