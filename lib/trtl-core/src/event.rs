//! The event union and the polymorphic sink abstraction (§4.5).
//!
//! A [`Sink`] is the sole coupling between producers (reader, range
//! writer) and consumers (writer, model inserter, transformer sinks); every
//! component in this crate composes by wrapping another `Sink`.

use crate::node::Node;
use crate::statement::Statement;
use crate::Status;

/// Statement event flags (§6). Bit positions are part of the external
/// contract — on-wire formats of tools built on top of this core may
/// depend on them — so they are fixed `const`s rather than a derived
/// enum discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct StatementFlags(u16);

impl StatementFlags {
    pub const NONE: Self = Self(0);
    pub const EMPTY_S: Self = Self(1);
    pub const EMPTY_O: Self = Self(2);
    pub const EMPTY_G: Self = Self(4);
    pub const ANON_S: Self = Self(8);
    pub const ANON_O: Self = Self(16);
    pub const LIST_S: Self = Self(32);
    pub const LIST_O: Self = Self(64);
    pub const TERSE_S: Self = Self(128);
    pub const TERSE_O: Self = Self(256);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }
}

impl std::ops::BitOr for StatementFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// The tagged union of event shapes a reader, transformer, or model range
/// can emit (§4.5).
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Event {
    /// A new base URI was declared.
    Base { uri: Node },
    /// A new prefix binding was declared.
    Prefix { name: Node, uri: Node },
    /// A statement was produced, with pretty-printing hints.
    Statement {
        statement: Statement,
        flags: StatementFlags,
    },
    /// The anonymous node `node` has closed (all its triples have been
    /// emitted); the writer uses this to close brackets.
    End { node: Node },
}

/// A consumer of events.
///
/// This models the spec's "handle + event-handler function + optional
/// destructor" as a trait with one required method and a `finish` hook
/// that stands in for the destructor-time flush every writer needs.
/// Implementors are free to hold arbitrary state (a transformer wraps
/// another `Sink`; the model's inserter holds a `&mut Model`).
pub trait Sink {
    /// Handles one event, returning the resulting status.
    fn handle(&mut self, event: &Event) -> Status;

    /// Called once the producer has no more events (document end, or
    /// sink destruction in the spec's terms). The default does nothing;
    /// writers override it to flush and close any open contexts.
    fn finish(&mut self) -> Status {
        Status::Success
    }

    /// Convenience: build and forward a [`Event::Base`].
    fn base(&mut self, uri: Node) -> Status {
        self.handle(&Event::Base { uri })
    }

    /// Convenience: build and forward a [`Event::Prefix`].
    fn prefix(&mut self, name: Node, uri: Node) -> Status {
        self.handle(&Event::Prefix { name, uri })
    }

    /// Convenience: build and forward a [`Event::Statement`].
    fn statement(&mut self, statement: Statement, flags: StatementFlags) -> Status {
        self.handle(&Event::Statement { statement, flags })
    }

    /// Convenience: build and forward a [`Event::End`].
    fn end(&mut self, node: Node) -> Status {
        self.handle(&Event::End { node })
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn handle(&mut self, event: &Event) -> Status {
        (**self).handle(event)
    }

    fn finish(&mut self) -> Status {
        (**self).finish()
    }
}

/// A sink that records every event it receives, useful for tests and as
/// the simplest possible producer/consumer example.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub events: Vec<Event>,
}

impl Sink for CollectSink {
    fn handle(&mut self, event: &Event) -> Status {
        self.events.push(event.clone());
        Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeArgs, NodeKind};

    fn iri(s: &str) -> Node {
        Node::new(NodeArgs::Token(NodeKind::Iri, s)).unwrap()
    }

    #[test]
    fn collect_sink_records_events_in_order() {
        let mut sink = CollectSink::default();
        sink.base(iri("http://example.org/"));
        sink.prefix(iri("eg"), iri("http://example.org/"));
        assert_eq!(sink.events.len(), 2);
        assert!(matches!(sink.events[0], Event::Base { .. }));
        assert!(matches!(sink.events[1], Event::Prefix { .. }));
    }

    #[test]
    fn flags_combine_with_bitor() {
        let flags = StatementFlags::ANON_S | StatementFlags::LIST_O;
        assert!(flags.contains(StatementFlags::ANON_S));
        assert!(flags.contains(StatementFlags::LIST_O));
        assert!(!flags.contains(StatementFlags::TERSE_S));
        assert_eq!(flags.bits(), 8 + 64);
    }
}
