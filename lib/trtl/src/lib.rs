//! `trtl`: a lightweight library for reading, writing, querying and
//! in-memory indexing of RDF data in the Turtle family of syntaxes
//! (Turtle, TriG, N-Triples, N-Quads).
//!
//! This crate is the facade over three lower-level crates, re-exported
//! here as a single public API the way the teacher's top-level `oxigraph`
//! crate re-exports `oxrdf`/`oxttl`/`oxrdfio`:
//!
//!   - [`trtl_uri`] — RFC 3986 URI parsing, resolution, relativisation and
//!     file-URI encoding (re-exported as [`uri`]).
//!   - [`trtl_core`] — RDF nodes and their interning store, the lexical
//!     environment, the event/sink pipeline and its transformer sinks,
//!     and the multi-indexed in-memory model (re-exported at the crate
//!     root).
//!   - [`trtl_io`] — the byte-oriented streaming [`Reader`], the
//!     pretty-printing [`Writer`], and [`write_range`] for driving a
//!     writer straight from a model [`Cursor`] (re-exported at the crate
//!     root).
//!
//! # Example
//!
//! Parse a small Turtle document into a [`Model`] and re-emit it as
//! N-Triples:
//!
//! ```
//! use trtl::{Format, Model, ModelFlags, Reader, ReaderOptions, StatementOrder, Writer, WriterOptions};
//!
//! let doc = "@prefix eg: <http://example.org/> .\neg:s eg:p eg:o, eg:o2 .\n";
//! let mut reader = Reader::new(doc.as_bytes(), ReaderOptions::new(Format::Turtle), "doc.ttl");
//! let mut model = Model::new(StatementOrder::Spo, ModelFlags::NONE);
//! {
//!     let mut inserter = trtl::Inserter::new(&mut model, None);
//!     reader.read_document(&mut inserter).unwrap();
//! }
//! assert_eq!(model.size(), 2);
//!
//! let mut out = Vec::new();
//! let mut writer = Writer::new(&mut out, WriterOptions::new(Format::NTriples));
//! trtl::write_range(model.find(trtl::Pattern::default()), &mut writer);
//! drop(writer);
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.contains("<http://example.org/s> <http://example.org/p> <http://example.org/o> .\n"));
//! ```

pub use trtl_core::{
    model, Caret, Canon, Cursor, CursorMode, Environment, Event, Filter, Inserter, Model, ModelFlags, Node,
    NodeArgs, NodeError, NodeFlags, NodeKind, NodeStore, Pattern, RelativeIriPolicy, Sink, Statement,
    StatementFlags, StatementOrder, Status, Tee,
};
pub use trtl_io::{
    BlankNodeGenerator, ByteSource, Format, Reader, ReaderError, ReaderFlags, ReaderOptions, Writer, WriterError,
    WriterFlags, WriterOptions, write_range,
};

/// RFC 3986 URI parsing, resolution and relativisation.
///
/// Re-exported under its own name, rather than flattened into the crate
/// root, because [`uri::UriView`] and its helpers are a distinct, lower
/// layer most callers reach for only when they need to resolve or
/// relativise a reference themselves (the [`Reader`]/[`Writer`] already
/// do so internally).
pub use trtl_uri as uri;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_turtle_through_a_model_to_ntriples() {
        let doc = "@prefix eg: <http://example.org/> .\n_:a eg:p ( 1 2 ) .\n";
        let mut reader = Reader::new(doc.as_bytes(), ReaderOptions::new(Format::Turtle), "doc.ttl");
        let mut model = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        {
            let mut inserter = Inserter::new(&mut model, None);
            reader.read_document(&mut inserter).unwrap();
        }
        // Two cons cells (first/rest each) plus the rdf:nil terminator's
        // rest link and the outer eg:p statement: five statements, per
        // spec.md §8 scenario 3.
        assert_eq!(model.size(), 5);

        let mut out = Vec::new();
        let mut writer = Writer::new(&mut out, WriterOptions::new(Format::NTriples));
        write_range(model.find(Pattern::default()), &mut writer);
        drop(writer);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn filters_and_tees_compose_as_sinks() {
        let doc = "<http://x/s> <http://x/p> <http://x/o1> .\n<http://x/s> <http://x/p2> <http://x/o2> .\n";
        let mut reader = Reader::new(doc.as_bytes(), ReaderOptions::new(Format::NTriples), "doc.nt");
        let mut kept = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        let mut all = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        {
            let p = Node::new(NodeArgs::Token(NodeKind::Iri, "http://x/p")).unwrap();
            let pattern = Pattern::new(None, Some(p), None, None);
            let all_inserter = Inserter::new(&mut all, None);
            let kept_inserter = Inserter::new(&mut kept, None);
            let filter = Filter::new(kept_inserter, pattern, true);
            let mut tee = Tee::new(all_inserter, filter);
            reader.read_document(&mut tee).unwrap();
        }
        assert_eq!(all.size(), 2);
        assert_eq!(kept.size(), 1);
    }
}
