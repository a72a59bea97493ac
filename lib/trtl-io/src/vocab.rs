//! The handful of `rdf:`/`xsd:` IRIs the reader and writer both need to
//! recognise structurally (collection desugaring, `a` abbreviation,
//! inline-numeric detection) without pulling in a full vocabulary crate.

use trtl_core::node::{NodeArgs, NodeKind};
use trtl_core::Node;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

pub fn rdf_first() -> Node {
    Node::new(NodeArgs::Token(NodeKind::Iri, &format!("{RDF_NS}first"))).expect("static IRI")
}

pub fn rdf_rest() -> Node {
    Node::new(NodeArgs::Token(NodeKind::Iri, &format!("{RDF_NS}rest"))).expect("static IRI")
}

pub fn rdf_nil() -> Node {
    Node::new(NodeArgs::Token(NodeKind::Iri, &format!("{RDF_NS}nil"))).expect("static IRI")
}

pub fn rdf_type() -> Node {
    Node::new(NodeArgs::Token(NodeKind::Iri, &format!("{RDF_NS}type"))).expect("static IRI")
}
