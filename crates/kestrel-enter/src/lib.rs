//! Lazy class completion for the kestrel front end.
//!
//! A [`CompilationSession`] owns the symbol table, the declaration forest and
//! every piece of per-compilation state. Class symbols are created eagerly by
//! class enter; everything else happens the first time a class is completed:
//!
//! - [`Phase::Imports`]: the unit's import scopes are filled
//! - [`Phase::Hierarchy`]: supertype and interfaces, type arguments erased
//! - [`Phase::Header`]: type-parameter bounds, full supertypes, annotations
//! - [`Phase::Members`]: default constructor, enum members, declared members
//!
//! Completion is re-entrant. Completing one class may complete others, and a
//! class that is already being completed further up the stack is simply
//! skipped. Unresolved base types are replaced by placeholder classes so a
//! single missing name yields a single diagnostic.

pub mod options;
pub use options::EnterOptions;

pub mod error;
pub use error::{CompletionFailure, EnterError, FatalError};

pub mod log;
pub use log::Log;

pub mod env;
pub use env::{Env, EnvId, EnvKind};

pub mod recursion;
pub use recursion::{CompletionGuard, CompletionMode, GuardResult};

pub mod dependencies;
pub use dependencies::{CompletionCause, DependencyEdge, DependencyRecorder};

pub mod annotate;
pub use annotate::{AnnotateQueue, PendingAnnotations};

pub mod session;
pub use session::CompilationSession;

pub mod scheduler;
pub use scheduler::Phase;

pub mod default_ctor;
pub use default_ctor::{AnonymousContext, DefaultConstructor, SuperCall};

mod class_enter;
mod header;
mod hierarchy;
mod imports;
mod members;
mod resolve;
mod synthesizer;

#[cfg(test)]
#[path = "../tests/test_utils.rs"]
mod test_utils;

#[cfg(test)]
#[path = "../tests/scheduler_tests.rs"]
mod scheduler_tests;

#[cfg(test)]
#[path = "../tests/imports_tests.rs"]
mod imports_tests;

#[cfg(test)]
#[path = "../tests/hierarchy_tests.rs"]
mod hierarchy_tests;

#[cfg(test)]
#[path = "../tests/header_tests.rs"]
mod header_tests;

#[cfg(test)]
#[path = "../tests/members_tests.rs"]
mod members_tests;

#[cfg(test)]
#[path = "../tests/synthesizer_tests.rs"]
mod synthesizer_tests;

#[cfg(test)]
#[path = "../tests/recursion_tests.rs"]
mod recursion_tests;
