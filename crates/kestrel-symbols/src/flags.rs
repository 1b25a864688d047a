//! Symbol flags and lookup kind filters.

use bitflags::bitflags;
use kestrel_tree::Modifiers;
use serde::Serialize;

bitflags! {
    /// Flags carried by every symbol.
    ///
    /// The low bits mirror [`Modifiers`]; the rest are set by the completer.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct Flags: u64 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        const NATIVE = 1 << 6;
        const SYNCHRONIZED = 1 << 7;
        const TRANSIENT = 1 << 8;
        const VOLATILE = 1 << 9;
        const STRICTFP = 1 << 10;
        const DEFAULT = 1 << 11;

        const INTERFACE = 1 << 16;
        const ENUM = 1 << 17;
        const ANNOTATION = 1 << 18;
        const SYNTHETIC = 1 << 19;
        const DEPRECATED = 1 << 20;
        /// Non-public top-level class in a file named after another class.
        const AUXILIARY = 1 << 21;
        /// Synthesized stand-in for a type that failed to resolve.
        const PLACEHOLDER = 1 << 22;
        /// Completion has started; annotations and bodies are not attributed yet.
        const UNATTRIBUTED = 1 << 23;
        /// Completion failed; queries see a degenerate symbol.
        const ERRONEOUS = 1 << 24;
        const VARARGS = 1 << 25;
        const GENERATED_CONSTRUCTOR = 1 << 26;
        const ANONYMOUS_CONSTRUCTOR = 1 << 27;
        /// Implicitly declared but required by the language (`valueOf`'s `name`).
        const MANDATED = 1 << 28;
        /// Package has at least one member or was declared by a source file.
        const EXISTS = 1 << 29;
        const ANONYMOUS = 1 << 30;
        const LOCAL = 1 << 31;

        const ACCESS = Self::PUBLIC.bits() | Self::PROTECTED.bits() | Self::PRIVATE.bits();
    }
}

impl Flags {
    /// Flags implied by source modifiers.
    #[must_use]
    pub fn from_modifiers(modifiers: Modifiers) -> Flags {
        Flags::from_bits_truncate(u64::from(modifiers.bits()))
    }

    #[must_use]
    pub fn access(self) -> Flags {
        self & Flags::ACCESS
    }
}

bitflags! {
    /// Which symbol kinds a scope lookup may return.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct KindFilter: u8 {
        /// Classes and type variables.
        const TYPE = 1 << 0;
        const VARIABLE = 1 << 1;
        const METHOD = 1 << 2;
        const PACKAGE = 1 << 3;

        const ALL = Self::TYPE.bits() | Self::VARIABLE.bits() | Self::METHOD.bits() | Self::PACKAGE.bits();
    }
}
