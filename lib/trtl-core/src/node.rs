//! RDF nodes: the atomic value type shared by every statement field.
//!
//! A [`Node`] is a reference-counted handle onto an immutable body: a kind
//! tag, a UTF-8 string, a bitset of content flags, and — for literals only —
//! an optional meta pointer to either a datatype [`Node`] (itself an IRI) or
//! a language tag. Cloning a `Node` is cheap (an `Rc` bump); the interning
//! done by [`crate::interning::NodeStore`] is what turns structural equality
//! into pointer equality in the common case, per the data model's own
//! description of how equality "may" be optimised.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::str::FromStr;

use trtl_uri::UriView;

/// XSD datatype IRIs recognised by the canonical-form constructors and by
/// the `canon` transformer sink.
pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const HEX_BINARY: &str = "http://www.w3.org/2001/XMLSchema#hexBinary";
    pub const BASE64_BINARY: &str = "http://www.w3.org/2001/XMLSchema#base64Binary";
}

/// The closed set of node kinds (§3 "Node").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum NodeKind {
    Iri,
    Literal,
    Blank,
    Curie,
    Variable,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Iri => "IRI",
            Self::Literal => "literal",
            Self::Blank => "blank node",
            Self::Curie => "CURIE",
            Self::Variable => "variable",
        })
    }
}

/// String-content flags carried on every node (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeFlags(u8);

impl NodeFlags {
    pub const NONE: Self = Self(0);
    pub const HAS_NEWLINE: Self = Self(1 << 0);
    pub const HAS_QUOTE: Self = Self(1 << 1);
    pub const IS_LONG: Self = Self(1 << 2);
    pub const HAS_DATATYPE: Self = Self(1 << 3);
    pub const HAS_LANGUAGE: Self = Self(1 << 4);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Flags derived purely from scanning `text`: newline and quote
    /// presence, and whether it must be written triple-quoted.
    #[must_use]
    pub fn scan(text: &str) -> Self {
        let mut flags = Self::NONE;
        if text.contains('\n') || text.contains('\r') {
            flags = flags.union(Self::HAS_NEWLINE).union(Self::IS_LONG);
        }
        if text.contains('"') {
            flags = flags.union(Self::HAS_QUOTE);
        }
        flags
    }
}

impl std::ops::BitOr for NodeFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A literal's optional meta-node: a datatype IRI, or a language tag.
/// Never both (§8 "Flag exclusivity").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Meta {
    Datatype(Node),
    Language(Box<str>),
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct NodeData {
    kind: NodeKind,
    body: Box<str>,
    flags: NodeFlags,
    meta: Option<Meta>,
}

/// An RDF node: IRI, literal, blank node, CURIE, or variable.
///
/// `Node` is a cheap-to-clone handle (an [`Rc`]) over an immutable body.
/// Equality and ordering are structural first, with a pointer-identity fast
/// path that makes comparisons between interned nodes effectively O(1).
#[derive(Debug, Clone)]
pub struct Node(Rc<NodeData>);

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

/// Error produced when building a [`Node`] from invalid input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    #[error("blank node label {0:?} is not valid")]
    InvalidBlankLabel(String),
    #[error("a literal cannot carry both a language tag and a datatype")]
    ConflictingMeta,
    #[error("language tag {0:?} is not well-formed")]
    InvalidLanguageTag(String),
    #[error("{0:?} is not a valid decimal literal")]
    InvalidDecimal(String),
    #[error("{0:?} is not a valid integer literal")]
    InvalidInteger(String),
    #[error("{0:?} is not a valid double literal")]
    InvalidDouble(String),
    #[error("a CURIE requires a non-empty prefix")]
    EmptyPrefix,
}

impl NodeError {
    /// The status band this error belongs to, for callers that only care
    /// about fatal-vs-recoverable (§7).
    #[must_use]
    pub const fn status(&self) -> crate::Status {
        match self {
            Self::InvalidBlankLabel(_) => crate::Status::BadLabel,
            Self::ConflictingMeta | Self::EmptyPrefix => crate::Status::BadArg,
            Self::InvalidLanguageTag(_) => crate::Status::BadText,
            Self::InvalidDecimal(_) | Self::InvalidInteger(_) | Self::InvalidDouble(_) => {
                crate::Status::BadLiteral
            }
        }
    }
}

/// The meta attached to a literal being constructed.
#[derive(Debug, Clone, Copy)]
pub enum LiteralMeta<'a> {
    Datatype(&'a str),
    Language(&'a str),
}

/// The tagged argument union that every [`Node`] construction routes
/// through (§4.2 "Construction variants").
#[derive(Debug, Clone, Copy)]
pub enum NodeArgs<'a> {
    /// A bare token of the given kind: used for blank-node labels,
    /// variables, and already-resolved IRI strings.
    Token(NodeKind, &'a str),
    /// An IRI built from an already-parsed [`UriView`].
    ParsedUri(&'a UriView<'a>),
    /// A `file://` URI built from an OS path and hostname.
    FileUri { path: &'a str, host: &'a str },
    /// A CURIE: `prefix:local`, kept unexpanded.
    PrefixedName { prefix: &'a str, local: &'a str },
    /// An IRI built by concatenating a namespace IRI and a local suffix.
    JoinedUri { prefix: &'a str, suffix: &'a str },
    /// A literal with an explicit lexical form and optional meta.
    Literal {
        text: &'a str,
        meta: Option<LiteralMeta<'a>>,
    },
    /// `xsd:boolean` canonical form.
    Boolean(bool),
    /// `xsd:decimal` canonical form, parsed from its lexical form.
    Decimal(&'a str),
    /// `xsd:integer` canonical form.
    Integer(i64),
    /// `xsd:double` canonical form, shortest round-trip with capital `E`.
    Double(f64),
    /// `xsd:hexBinary` canonical form.
    Hex(&'a [u8]),
    /// `xsd:base64Binary` canonical form.
    Base64(&'a [u8]),
}

impl Node {
    /// The single constructor every node is built through (§4.2 `new`).
    pub fn new(args: NodeArgs<'_>) -> Result<Self, NodeError> {
        match args {
            NodeArgs::Token(kind, text) => Ok(Self::from_parts(kind, text.into(), NodeFlags::scan(text), None)),
            NodeArgs::ParsedUri(view) => {
                let s = trtl_uri::to_string(view);
                Ok(Self::from_parts(NodeKind::Iri, s.into(), NodeFlags::NONE, None))
            }
            NodeArgs::FileUri { path, host } => {
                let s = trtl_uri::to_file_uri_string(path, host);
                Ok(Self::from_parts(NodeKind::Iri, s.into(), NodeFlags::NONE, None))
            }
            NodeArgs::PrefixedName { prefix, local } => {
                if prefix.is_empty() {
                    return Err(NodeError::EmptyPrefix);
                }
                let body = format!("{prefix}:{local}");
                Ok(Self::from_parts(NodeKind::Curie, body.into(), NodeFlags::NONE, None))
            }
            NodeArgs::JoinedUri { prefix, suffix } => {
                let body = format!("{prefix}{suffix}");
                Ok(Self::from_parts(NodeKind::Iri, body.into(), NodeFlags::NONE, None))
            }
            NodeArgs::Literal { text, meta } => Self::literal(text, meta),
            NodeArgs::Boolean(b) => {
                let text = oxsdatatypes::Boolean::from(b).to_string();
                Self::typed_literal(text, xsd::BOOLEAN)
            }
            NodeArgs::Decimal(lexical) => {
                let d = oxsdatatypes::Decimal::from_str(lexical)
                    .map_err(|_| NodeError::InvalidDecimal(lexical.to_owned()))?;
                Self::typed_literal(d.to_string(), xsd::DECIMAL)
            }
            NodeArgs::Integer(i) => Self::typed_literal(i.to_string(), xsd::INTEGER),
            NodeArgs::Double(d) => {
                let d = oxsdatatypes::Double::from(d);
                Self::typed_literal(d.to_string(), xsd::DOUBLE)
            }
            NodeArgs::Hex(bytes) => Self::typed_literal(hex::encode_upper(bytes), xsd::HEX_BINARY),
            NodeArgs::Base64(bytes) => {
                use base64::Engine;
                Self::typed_literal(base64::engine::general_purpose::STANDARD.encode(bytes), xsd::BASE64_BINARY)
            }
        }
    }

    fn typed_literal(text: String, datatype_iri: &str) -> Result<Self, NodeError> {
        Self::literal(&text, Some(LiteralMeta::Datatype(datatype_iri)))
    }

    fn literal(text: &str, meta: Option<LiteralMeta<'_>>) -> Result<Self, NodeError> {
        let mut flags = NodeFlags::scan(text);
        let meta = match meta {
            None => None,
            Some(LiteralMeta::Datatype(iri)) => {
                flags = flags.union(NodeFlags::HAS_DATATYPE);
                Some(Meta::Datatype(Self::from_parts(
                    NodeKind::Iri,
                    iri.into(),
                    NodeFlags::NONE,
                    None,
                )))
            }
            Some(LiteralMeta::Language(tag)) => {
                oxilangtag::LanguageTag::parse(tag.to_owned())
                    .map_err(|_| NodeError::InvalidLanguageTag(tag.to_owned()))?;
                flags = flags.union(NodeFlags::HAS_LANGUAGE);
                Some(Meta::Language(tag.into()))
            }
        };
        Ok(Self::from_parts(NodeKind::Literal, text.into(), flags, meta))
    }

    fn from_parts(kind: NodeKind, body: Box<str>, flags: NodeFlags, meta: Option<Meta>) -> Self {
        Self(Rc::new(NodeData { kind, body, flags, meta }))
    }

    /// The node's kind tag.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.0.kind
    }

    /// The node's immutable string body.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0.body
    }

    /// The node's content flags.
    #[must_use]
    pub fn flags(&self) -> NodeFlags {
        self.0.flags
    }

    /// For a literal with a datatype, the datatype IRI node.
    #[must_use]
    pub fn datatype(&self) -> Option<&Node> {
        match &self.0.meta {
            Some(Meta::Datatype(dt)) => Some(dt),
            _ => None,
        }
    }

    /// For a literal with a language tag, the tag text.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        match &self.0.meta {
            Some(Meta::Language(tag)) => Some(tag),
            _ => None,
        }
    }

    /// Total order over nodes: kind, then string body, then meta (§4.2
    /// `compare`). Equivalent to [`Ord::cmp`]; kept under the spec's own
    /// name as a free function for callers translating from the C API.
    #[must_use]
    pub fn compare(a: &Self, b: &Self) -> Ordering {
        a.cmp(b)
    }

    /// Structural equality; two distinct nodes with identical content are
    /// equal (§4.2 `equals`).
    #[must_use]
    pub fn equals(a: &Self, b: &Self) -> bool {
        a == b
    }

    /// The number of outstanding handles to this node's data, including
    /// `self` and any copy interned in a [`crate::interning::NodeStore`].
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl fmt::Display for Node {
    /// Canonical N-Triples-compatible rendering (§11 supplemented feature).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            NodeKind::Iri => write!(f, "<{}>", self.value()),
            NodeKind::Blank => write!(f, "_:{}", self.value()),
            NodeKind::Variable => write!(f, "?{}", self.value()),
            NodeKind::Curie => f.write_str(self.value()),
            NodeKind::Literal => {
                write!(f, "\"{}\"", escape_quoted(self.value()))?;
                if let Some(lang) = self.language() {
                    write!(f, "@{lang}")
                } else if let Some(dt) = self.datatype() {
                    write!(f, "^^<{}>", dt.value())
                } else {
                    Ok(())
                }
            }
        }
    }
}

fn escape_quoted(s: &str) -> Cow<'_, str> {
    if !s.contains(['"', '\\', '\n', '\r']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 2);
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Parses the canonical `Display` rendering of a [`Node`] back into one
/// (§11 supplemented feature, mirroring the teacher's `FromStr` impls on
/// `NamedNode`/`Literal`). Only IRIs, blank nodes and simple/typed/
/// language-tagged literals are accepted; CURIEs and variables are not
/// round-trippable this way since their surface syntax is ambiguous
/// without an environment.
impl FromStr for Node {
    type Err = NodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(iri) = s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
            return Node::new(NodeArgs::Token(NodeKind::Iri, iri));
        }
        if let Some(label) = s.strip_prefix("_:") {
            return Node::new(NodeArgs::Token(NodeKind::Blank, label));
        }
        if let Some(name) = s.strip_prefix('?') {
            return Node::new(NodeArgs::Token(NodeKind::Variable, name));
        }
        if let Some(rest) = s.strip_prefix('"') {
            let (text, rest) = rest
                .rsplit_once('"')
                .ok_or_else(|| NodeError::InvalidBlankLabel(s.to_owned()))?;
            let text = unescape_quoted(text);
            if let Some(lang) = rest.strip_prefix('@') {
                return Node::new(NodeArgs::Literal {
                    text: &text,
                    meta: Some(LiteralMeta::Language(lang)),
                });
            }
            if let Some(iri) = rest.strip_prefix("^^<").and_then(|r| r.strip_suffix('>')) {
                return Node::new(NodeArgs::Literal {
                    text: &text,
                    meta: Some(LiteralMeta::Datatype(iri)),
                });
            }
            return Node::new(NodeArgs::Literal { text: &text, meta: None });
        }
        Err(NodeError::InvalidBlankLabel(s.to_owned()))
    }
}

fn unescape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_canonical_form_has_dot() {
        let n = Node::new(NodeArgs::Decimal("1")).unwrap();
        assert!(n.value().contains('.'));
    }

    #[test]
    fn integer_no_leading_zeros() {
        let n = Node::new(NodeArgs::Integer(0)).unwrap();
        assert_eq!(n.value(), "0");
        let n = Node::new(NodeArgs::Integer(42)).unwrap();
        assert_eq!(n.value(), "42");
    }

    #[test]
    fn boolean_is_true_false() {
        assert_eq!(Node::new(NodeArgs::Boolean(true)).unwrap().value(), "true");
        assert_eq!(Node::new(NodeArgs::Boolean(false)).unwrap().value(), "false");
    }

    #[test]
    fn literal_cannot_carry_both_language_and_datatype() {
        // The tagged-union constructor only ever carries one `LiteralMeta`
        // variant at a time, so the exclusivity in §8 holds structurally.
        let n = Node::new(NodeArgs::Literal {
            text: "hi",
            meta: Some(LiteralMeta::Language("en")),
        })
        .unwrap();
        assert!(n.language().is_some());
        assert!(n.datatype().is_none());
    }

    #[test]
    fn language_comparison_is_case_sensitive_by_default() {
        let a = Node::new(NodeArgs::Literal {
            text: "l",
            meta: Some(LiteralMeta::Language("en")),
        })
        .unwrap();
        let b = Node::new(NodeArgs::Literal {
            text: "l",
            meta: Some(LiteralMeta::Language("EN")),
        })
        .unwrap();
        assert_ne!(a, b);
        assert!(a.language().unwrap().eq_ignore_ascii_case(b.language().unwrap()));
    }

    #[test]
    fn equal_nodes_compare_equal_even_unintered() {
        let a = Node::new(NodeArgs::Token(NodeKind::Iri, "http://example.org/")).unwrap();
        let b = Node::new(NodeArgs::Token(NodeKind::Iri, "http://example.org/")).unwrap();
        assert!(!Rc::ptr_eq(&a.0, &b.0));
        assert_eq!(a, b);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let n = Node::new(NodeArgs::Token(NodeKind::Iri, "http://example.org/s")).unwrap();
        let s = n.to_string();
        assert_eq!(s, "<http://example.org/s>");
        assert_eq!(s.parse::<Node>().unwrap(), n);
    }

    #[test]
    fn compare_orders_by_kind_then_body() {
        let a = Node::new(NodeArgs::Token(NodeKind::Blank, "a")).unwrap();
        let b = Node::new(NodeArgs::Token(NodeKind::Iri, "z")).unwrap();
        assert_eq!(Node::compare(&a, &b), NodeKind::Blank.cmp(&NodeKind::Iri));
    }
}
