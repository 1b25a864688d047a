//! kestrel: lazy class completion for a Java-like front end.
//!
//! The work happens in the member crates; this crate re-exports them and
//! adds what a driver needs around a [`CompilationSession`]: options read
//! from `kestrel.json` and tracing setup.
//!
//! ```no_run
//! use kestrel::{CompilationSession, SourceForest, Symtab};
//!
//! let options = kestrel::config::load_enter_options("kestrel.json".as_ref())?;
//! let mut session = CompilationSession::new(Symtab::with_prelude(), SourceForest::new(), options);
//! session.complete_all()?;
//! for diagnostic in session.diagnostics() {
//!     eprintln!("{}", diagnostic.render());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod tracing_config;

pub use kestrel_common as common;
pub use kestrel_enter as enter;
pub use kestrel_symbols as symbols;
pub use kestrel_tree as tree;

pub use kestrel_common::{Diagnostic, DiagnosticCategory, DiagnosticKind};
pub use kestrel_enter::{CompilationSession, EnterOptions, FatalError, Phase};
pub use kestrel_symbols::{Flags, SymbolId, Symtab, Type};
pub use kestrel_tree::{ClassDecl, CompilationUnit, SourceForest};
