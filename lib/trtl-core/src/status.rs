//! The status-code band model used throughout the reader, writer and model.
//!
//! This mirrors the numeric codes a C-flavoured sibling of this library
//! would expose over FFI, but here it is a plain Rust enum: library code
//! matches on [`Status::band`] rather than comparing raw integers, while the
//! numeric discriminant stays available to anything downstream that does
//! need the wire value (a future CLI or FFI layer outside this core).

use std::fmt;

/// The coarse band a [`Status`] falls into.
///
/// Used by callers that only care whether something can be retried or
/// recovered from, not the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// The operation completed normally.
    Success,
    /// The operation did not complete but nothing is broken (EOF, a pattern
    /// that matched nothing, a short non-blocking read).
    NonFatal,
    /// The operation failed and the caller-visible state did not advance.
    Fatal,
}

/// A status code, numbered to match the spec's stable wire values.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// 0: the operation completed normally.
    Success,
    /// 1: generic non-fatal failure (a match or lookup found nothing).
    Failure,
    /// 2: a non-blocking byte source had no data ready.
    NoData,
    /// 3: a growable-buffer sink ran out of space.
    NoSpace,
    /// 8: an error outside the rest of this table.
    UnknownError,
    /// 9: allocation failed. Always fatal, never recovered in LAX mode.
    BadAlloc,
    /// 10: a byte source reported a read error.
    BadRead,
    /// 11: a byte sink reported a write error.
    BadWrite,
    /// 12: a byte stream was used after being closed, or similar misuse.
    BadStream,
    /// 13: the reader's bounded recursion stack overflowed. Always fatal.
    BadStack,
    /// 14: an API was called in a state that does not allow it.
    BadCall,
    /// 15: an invalid argument was passed (e.g. a malformed pattern).
    BadArg,
    /// 16: an event was delivered to a sink that cannot accept it.
    BadEvent,
    /// 17: a cursor was used after the model it iterates was mutated.
    BadCursor,
    /// 18: an index ordering was requested that the model does not carry.
    BadIndex,
    /// 32: the input did not match the expected grammar.
    BadSyntax,
    /// 33: a blank-node label did not match the label grammar.
    BadLabel,
    /// 34: a CURIE used an undeclared prefix.
    BadCurie,
    /// 35: a literal's text was invalid for its position (e.g. unescaped
    /// newline in a short literal).
    BadText,
    /// 36: a URI reference failed to parse or resolve.
    BadUri,
    /// 37: the data violated a grammar-external constraint.
    BadData,
    /// 38: a literal's lexical form was invalid for its datatype.
    BadLiteral,
    /// 39: a pattern query used an impossible combination of node kinds.
    BadPattern,
}

impl Status {
    /// The coarse recovery band this status belongs to.
    #[must_use]
    pub const fn band(self) -> Band {
        match self {
            Self::Success => Band::Success,
            Self::Failure | Self::NoData | Self::NoSpace => Band::NonFatal,
            _ => Band::Fatal,
        }
    }

    /// `true` for [`Status::Success`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self.band(), Band::Success)
    }

    /// The more severe of `self` and `other`, by band (`Fatal` >
    /// `NonFatal` > `Success`); ties keep `self`. Used by the `tee`
    /// transformer, which must "propagate the worse of the two returned
    /// statuses" (§4.5).
    #[must_use]
    pub const fn worse(self, other: Self) -> Self {
        let (a, b) = (band_severity(self.band()), band_severity(other.band()));
        if b > a {
            other
        } else {
            self
        }
    }

    /// The stable numeric discriminant from the spec's status table.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::NoData => 2,
            Self::NoSpace => 3,
            Self::UnknownError => 8,
            Self::BadAlloc => 9,
            Self::BadRead => 10,
            Self::BadWrite => 11,
            Self::BadStream => 12,
            Self::BadStack => 13,
            Self::BadCall => 14,
            Self::BadArg => 15,
            Self::BadEvent => 16,
            Self::BadCursor => 17,
            Self::BadIndex => 18,
            Self::BadSyntax => 32,
            Self::BadLabel => 33,
            Self::BadCurie => 34,
            Self::BadText => 35,
            Self::BadUri => 36,
            Self::BadData => 37,
            Self::BadLiteral => 38,
            Self::BadPattern => 39,
        }
    }

    /// Whether LAX-mode reading recovers from this status by skipping the
    /// current statement rather than aborting (§7 "Local recovery").
    #[must_use]
    pub const fn is_lax_recoverable(self) -> bool {
        matches!(
            self,
            Self::BadSyntax | Self::BadLiteral | Self::BadText | Self::BadCurie | Self::BadUri
        )
    }
}

const fn band_severity(band: Band) -> u8 {
    match band {
        Band::Success => 0,
        Band::NonFatal => 1,
        Band::Fatal => 2,
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::NoData => "no data",
            Self::NoSpace => "no space",
            Self::UnknownError => "unknown error",
            Self::BadAlloc => "allocation failed",
            Self::BadRead => "read error",
            Self::BadWrite => "write error",
            Self::BadStream => "stream error",
            Self::BadStack => "stack overflow",
            Self::BadCall => "invalid call",
            Self::BadArg => "invalid argument",
            Self::BadEvent => "invalid event",
            Self::BadCursor => "invalid cursor",
            Self::BadIndex => "invalid index",
            Self::BadSyntax => "invalid syntax",
            Self::BadLabel => "invalid label",
            Self::BadCurie => "invalid CURIE",
            Self::BadText => "invalid text",
            Self::BadUri => "invalid URI",
            Self::BadData => "invalid data",
            Self::BadLiteral => "invalid literal",
            Self::BadPattern => "invalid pattern",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_spec_table() {
        assert_eq!(Status::Success.code(), 0);
        assert_eq!(Status::BadAlloc.code(), 9);
        assert_eq!(Status::BadSyntax.code(), 32);
        assert_eq!(Status::BadPattern.code(), 39);
    }

    #[test]
    fn lax_recoverable_set_matches_spec() {
        assert!(Status::BadSyntax.is_lax_recoverable());
        assert!(Status::BadLiteral.is_lax_recoverable());
        assert!(Status::BadText.is_lax_recoverable());
        assert!(Status::BadCurie.is_lax_recoverable());
        assert!(Status::BadUri.is_lax_recoverable());
        assert!(!Status::BadStack.is_lax_recoverable());
        assert!(!Status::BadAlloc.is_lax_recoverable());
    }
}
