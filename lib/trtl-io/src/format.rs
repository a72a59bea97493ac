//! The four syntaxes this crate reads and writes (§6 "Syntaxes
//! accepted/emitted"), grounded on the teacher's `RdfFormat` enum.

use std::fmt;

/// One of the Turtle-family syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Turtle,
    TriG,
    NTriples,
    NQuads,
}

impl Format {
    /// The format's IANA media type.
    #[must_use]
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::Turtle => "text/turtle",
            Self::TriG => "application/trig",
            Self::NTriples => "application/n-triples",
            Self::NQuads => "application/n-quads",
        }
    }

    /// The format's conventional file extension, without a leading dot.
    #[must_use]
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::Turtle => "ttl",
            Self::TriG => "trig",
            Self::NTriples => "nt",
            Self::NQuads => "nq",
        }
    }

    /// `true` for the two syntaxes that carry a graph component.
    #[must_use]
    pub const fn supports_datasets(self) -> bool {
        matches!(self, Self::TriG | Self::NQuads)
    }

    /// `true` for the two line-oriented syntaxes with no directives,
    /// abbreviation, or collection/anonymous-node sugar.
    #[must_use]
    pub const fn is_line_based(self) -> bool {
        matches!(self, Self::NTriples | Self::NQuads)
    }

    #[must_use]
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let base = media_type.split(';').next().unwrap_or(media_type).trim();
        match base {
            "text/turtle" => Some(Self::Turtle),
            "application/trig" => Some(Self::TriG),
            "application/n-triples" => Some(Self::NTriples),
            "application/n-quads" => Some(Self::NQuads),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "ttl" => Some(Self::Turtle),
            "trig" => Some(Self::TriG),
            "nt" => Some(Self::NTriples),
            "nq" => Some(Self::NQuads),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Turtle => "Turtle",
            Self::TriG => "TriG",
            Self::NTriples => "N-Triples",
            Self::NQuads => "N-Quads",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_media_type() {
        for format in [Format::Turtle, Format::TriG, Format::NTriples, Format::NQuads] {
            assert_eq!(Format::from_media_type(format.media_type()), Some(format));
        }
    }

    #[test]
    fn only_quad_syntaxes_support_datasets() {
        assert!(!Format::Turtle.supports_datasets());
        assert!(Format::TriG.supports_datasets());
        assert!(!Format::NTriples.supports_datasets());
        assert!(Format::NQuads.supports_datasets());
    }
}
