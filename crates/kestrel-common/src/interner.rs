//! String Interner for identifier deduplication.
//!
//! Names are interned into a pool owned by the symbol table and passed around
//! as u32 indices (Atoms). Comparing two names becomes an integer comparison,
//! which matters for scope lookups that run on every resolution step.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `Interner::resolve(atom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    /// Check if this is the empty/none atom.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Names every session needs; pre-interning them keeps their atoms small and
/// stable across sessions.
const COMMON_STRINGS: &[&str] = &[
    "java",
    "lang",
    "annotation",
    "Object",
    "Enum",
    "String",
    "Deprecated",
    "Annotation",
    "<init>",
    "this",
    "super",
    "values",
    "valueOf",
    "name",
    "ordinal",
    "T",
    "E",
    "*",
];

/// String interner that deduplicates strings and returns Atom handles.
///
/// # Example
/// ```
/// use kestrel_common::interner::Interner;
/// let mut interner = Interner::new();
/// let a1 = interner.intern("Object");
/// let a2 = interner.intern("Object");
/// assert_eq!(a1, a2); // Same atom for same string
/// assert_eq!(interner.resolve(a1), "Object");
/// ```
#[derive(Debug, Default)]
pub struct Interner {
    /// Map from string to atom index
    map: FxHashMap<Arc<str>, Atom>,
    /// Vector of all interned strings (index 0 is empty string)
    strings: Vec<Arc<str>>,
}

impl Interner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut interner = Interner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
        };
        // Index 0 is reserved for empty/none
        let empty: Arc<str> = Arc::from("");
        interner.strings.push(empty.clone());
        interner.map.insert(empty, Atom::NONE);
        interner.intern_common();
        interner
    }

    /// Intern a string, returning its Atom handle.
    /// If the string was already interned, returns the existing Atom.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.map.get(s) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let owned: Arc<str> = Arc::from(s);
        self.strings.push(owned.clone());
        self.map.insert(owned, atom);
        atom
    }

    /// Look up a string without interning it.
    #[inline]
    pub fn get(&self, s: &str) -> Option<Atom> {
        self.map.get(s).copied()
    }

    /// Resolve an Atom back to its string value.
    /// Returns empty string if atom is out of bounds (safety for error recovery).
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.strings
            .get(atom.0 as usize)
            .map(|s| s.as_ref())
            .unwrap_or("")
    }

    /// Intern `prefix.name`, or just `name` when the prefix is empty.
    ///
    /// Used to build fully qualified names of packages and classes.
    pub fn qualify(&mut self, prefix: Atom, name: Atom) -> Atom {
        if prefix.is_none() {
            return name;
        }
        let joined = format!("{}.{}", self.resolve(prefix), self.resolve(name));
        self.intern(&joined)
    }

    /// Get the number of interned strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the interner is empty (only has the empty string).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }

    fn intern_common(&mut self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }
}
