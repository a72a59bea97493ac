//! Reader and writer option flags (§6 "Environment configuration", §10.3
//! "Configuration"), exposed as builder-pattern structs rather than a
//! bare bitset so call sites read as `ReaderOptions::new().lax(true)`.

use crate::format::Format;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReaderFlags(u16);

impl ReaderFlags {
    pub const NONE: Self = Self(0);
    /// Tolerate invalid input; skip bad statements.
    pub const LAX: Self = Self(1 << 0);
    /// Accept `?x` / `$x` as nodes.
    pub const VARIABLES: Self = Self(1 << 1);
    /// Pass through `_:…` labels verbatim instead of remapping.
    pub const GENERATED: Self = Self(1 << 2);
    /// Omit the per-document blank-node prefix.
    pub const GLOBAL: Self = Self(1 << 3);
    /// Emit relative IRIs unresolved.
    pub const RELATIVE: Self = Self(1 << 4);
    /// Emit CURIEs unexpanded.
    pub const PREFIXED: Self = Self(1 << 5);
    /// Percent-decode unreserved octets in IRIs.
    pub const DECODED: Self = Self(1 << 6);
    /// Zero-pad generated blank serials.
    pub const ORDERED: Self = Self(1 << 7);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for ReaderFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Reader configuration: target syntax, a bounded recursion stack depth,
/// a blank-node document prefix, and the flags above.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    pub(crate) format: Format,
    pub(crate) flags: ReaderFlags,
    pub(crate) stack_limit: usize,
    pub(crate) blank_prefix: Option<String>,
}

impl ReaderOptions {
    #[must_use]
    pub fn new(format: Format) -> Self {
        Self {
            format,
            flags: ReaderFlags::NONE,
            stack_limit: 256,
            blank_prefix: None,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ReaderFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn lax(mut self, lax: bool) -> Self {
        self.flags = if lax {
            self.flags.union(ReaderFlags::LAX)
        } else {
            Self::clear(self.flags, ReaderFlags::LAX)
        };
        self
    }

    #[must_use]
    pub fn with_stack_limit(mut self, limit: usize) -> Self {
        self.stack_limit = limit;
        self
    }

    #[must_use]
    pub fn with_blank_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.blank_prefix = Some(prefix.into());
        self
    }

    fn clear(flags: ReaderFlags, bit: ReaderFlags) -> ReaderFlags {
        ReaderFlags(flags.0 & !bit.0)
    }

    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    #[must_use]
    pub fn flags(&self) -> ReaderFlags {
        self.flags
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriterFlags(u8);

impl WriterFlags {
    pub const NONE: Self = Self(0);
    pub const ASCII: Self = Self(1 << 0);
    pub const BULK_FLUSH: Self = Self(1 << 1);
    pub const LAX: Self = Self(1 << 2);
    pub const TERSE: Self = Self(1 << 3);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for WriterFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

#[derive(Debug, Clone)]
pub struct WriterOptions {
    pub(crate) format: Format,
    pub(crate) flags: WriterFlags,
}

impl WriterOptions {
    #[must_use]
    pub fn new(format: Format) -> Self {
        Self {
            format,
            flags: WriterFlags::NONE,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: WriterFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn format(&self) -> Format {
        self.format
    }

    #[must_use]
    pub fn flags(&self) -> WriterFlags {
        self.flags
    }
}
