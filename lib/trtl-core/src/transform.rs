//! Transformer sinks: composable stream filters that sit between readers,
//! the model, and writers (§4.5 "Transformer sinks").

use tracing::warn;

use crate::event::{Event, Sink, StatementFlags};
use crate::model::{Model, Pattern};
use crate::node::{xsd, LiteralMeta, Node, NodeArgs};
use crate::statement::Statement;
use crate::Status;

/// Forwards every event to `first`, then to `second`, propagating the
/// worse of the two returned statuses (§4.5 `tee`).
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: Sink, B: Sink> Tee<A, B> {
    #[must_use]
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Sink, B: Sink> Sink for Tee<A, B> {
    fn handle(&mut self, event: &Event) -> Status {
        let a = self.first.handle(event);
        let b = self.second.handle(event);
        a.worse(b)
    }

    fn finish(&mut self) -> Status {
        let a = self.first.finish();
        let b = self.second.finish();
        a.worse(b)
    }
}

/// Forwards only statements matching (or, when `inclusive` is `false`, not
/// matching) a pattern; all other event kinds pass through except `End`,
/// which is dropped (§4.5 `filter`).
pub struct Filter<S> {
    target: S,
    pattern: Pattern,
    inclusive: bool,
}

impl<S: Sink> Filter<S> {
    #[must_use]
    pub fn new(target: S, pattern: Pattern, inclusive: bool) -> Self {
        Self {
            target,
            pattern,
            inclusive,
        }
    }
}

impl<S: Sink> Sink for Filter<S> {
    fn handle(&mut self, event: &Event) -> Status {
        match event {
            Event::Statement { statement, .. } => {
                if self.pattern.matches(statement) == self.inclusive {
                    self.target.handle(event)
                } else {
                    Status::Success
                }
            }
            Event::End { .. } => Status::Success,
            _ => self.target.handle(event),
        }
    }

    fn finish(&mut self) -> Status {
        self.target.finish()
    }
}

/// Recognised canonicalisable XSD datatypes, in the order the
/// canonicalisation table is consulted.
fn canonicalise_literal(text: &str, datatype_iri: &str, lax: bool) -> Result<Option<Node>, ()> {
    let args = match datatype_iri {
        xsd::BOOLEAN => text.parse::<bool>().map(NodeArgs::Boolean).map_err(|_| ()),
        xsd::INTEGER => text.trim().parse::<i64>().map(NodeArgs::Integer).map_err(|_| ()),
        xsd::DECIMAL => Ok(NodeArgs::Decimal(text)),
        xsd::DOUBLE | xsd::FLOAT => text.parse::<f64>().map(NodeArgs::Double).map_err(|_| ()),
        _ => return Ok(None),
    };
    match args {
        Ok(args) => Node::new(args).map(Some).map_err(|_| ()),
        Err(()) if lax => Ok(None),
        Err(()) => Err(()),
    }
}

/// For every statement whose object is a literal with a recognised XSD
/// numeric or boolean datatype, replaces the object with its canonical
/// form before forwarding; unknown datatypes pass through unchanged
/// (§4.5 `canon`).
pub struct Canon<S> {
    target: S,
    lax: bool,
}

impl<S: Sink> Canon<S> {
    #[must_use]
    pub fn new(target: S, lax: bool) -> Self {
        Self { target, lax }
    }
}

impl<S: Sink> Sink for Canon<S> {
    fn handle(&mut self, event: &Event) -> Status {
        let Event::Statement { statement, flags } = event else {
            return self.target.handle(event);
        };
        let Some(datatype) = statement.object().datatype() else {
            return self.target.handle(event);
        };
        match canonicalise_literal(statement.object().value(), datatype.value(), self.lax) {
            Ok(Some(canonical)) => {
                let replaced = Statement::new(
                    statement.subject().clone(),
                    statement.predicate().clone(),
                    canonical,
                    statement.graph().cloned(),
                );
                self.target.handle(&Event::Statement {
                    statement: replaced,
                    flags: *flags,
                })
            }
            Ok(None) => self.target.handle(event),
            Err(()) => Status::BadText,
        }
    }

    fn finish(&mut self) -> Status {
        self.target.finish()
    }
}

/// How [`Inserter`] treats relative IRIs and unexpanded CURIEs reaching it
/// as statement fields (§9 "Open questions": the 1.x inserter accepted and
/// stored them verbatim; only `STRICT_ABSOLUTE` recovers the stricter
/// pre-1.0 behaviour that rejected them outright).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelativeIriPolicy {
    #[default]
    AcceptVerbatim,
    StrictAbsolute,
}

/// Interns each statement's four nodes into a model's node store (if it
/// keeps one) and adds them to `model` (§4.5 `inserter`).
pub struct Inserter<'m> {
    model: &'m mut Model,
    default_graph: Option<Node>,
    policy: RelativeIriPolicy,
}

impl<'m> Inserter<'m> {
    #[must_use]
    pub fn new(model: &'m mut Model, default_graph: Option<Node>) -> Self {
        Self {
            model,
            default_graph,
            policy: RelativeIriPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: RelativeIriPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn rejects(&self, node: &Node) -> bool {
        if self.policy != RelativeIriPolicy::StrictAbsolute {
            return false;
        }
        use crate::node::NodeKind;
        match node.kind() {
            NodeKind::Iri => !trtl_uri::has_scheme(node.value()),
            NodeKind::Curie => true,
            _ => false,
        }
    }
}

impl Sink for Inserter<'_> {
    fn handle(&mut self, event: &Event) -> Status {
        let Event::Statement { statement, .. } = event else {
            return Status::Success;
        };
        for node in [statement.subject(), statement.predicate(), statement.object()] {
            if self.rejects(node) {
                return Status::BadArg;
            }
        }
        if let Some(g) = statement.graph() {
            if self.rejects(g) {
                return Status::BadArg;
            }
        }
        let graph = statement.graph().cloned().or_else(|| self.default_graph.clone());
        self.model.insert(
            statement.subject().clone(),
            statement.predicate().clone(),
            statement.object().clone(),
            graph,
        );
        Status::Success
    }
}

/// Emits a `tracing::warn!` for a LAX-recovered statement skip (§10.2).
pub fn log_lax_recovery(line: usize, column: usize, status: Status) {
    warn!(line, column, %status, "skipped statement after recoverable parse error");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CollectSink;
    use crate::model::{ModelFlags, StatementOrder};
    use crate::node::NodeKind;

    fn iri(s: &str) -> Node {
        Node::new(NodeArgs::Token(NodeKind::Iri, s)).unwrap()
    }

    fn stmt(s: &str, p: &str, o: &str) -> Statement {
        Statement::new(iri(s), iri(p), iri(o), None)
    }

    #[test]
    fn tee_forwards_to_both_targets() {
        let mut a = CollectSink::default();
        let mut b = CollectSink::default();
        {
            let mut tee = Tee::new(&mut a, &mut b);
            tee.statement(stmt("s", "p", "o"), StatementFlags::NONE);
        }
        assert_eq!(a.events.len(), 1);
        assert_eq!(b.events.len(), 1);
    }

    #[test]
    fn filter_drops_non_matching_statements_when_inclusive() {
        let mut target = CollectSink::default();
        let pattern = Pattern::new(Some(iri("s")), None, None, None);
        {
            let mut filter = Filter::new(&mut target, pattern, true);
            filter.statement(stmt("s", "p", "o"), StatementFlags::NONE);
            filter.statement(stmt("other", "p", "o"), StatementFlags::NONE);
        }
        assert_eq!(target.events.len(), 1);
    }

    #[test]
    fn canon_rewrites_recognised_numeric_datatype() {
        let mut target = CollectSink::default();
        let literal = Node::new(NodeArgs::Literal {
            text: "1",
            meta: Some(LiteralMeta::Datatype(xsd::DECIMAL)),
        })
        .unwrap();
        let statement = Statement::new(iri("s"), iri("p"), literal, None);
        {
            let mut canon = Canon::new(&mut target, false);
            canon.statement(statement, StatementFlags::NONE);
        }
        let Event::Statement { statement, .. } = &target.events[0] else {
            panic!("expected a statement event");
        };
        assert_eq!(statement.object().value(), "1.0");
    }

    #[test]
    fn canon_drops_invalid_literal_unless_lax() {
        let mut target = CollectSink::default();
        let literal = Node::new(NodeArgs::Literal {
            text: "not-a-number",
            meta: Some(LiteralMeta::Datatype(xsd::INTEGER)),
        })
        .unwrap();
        let statement = Statement::new(iri("s"), iri("p"), literal, None);
        let mut canon = Canon::new(&mut target, false);
        let status = canon.statement(statement, StatementFlags::NONE);
        assert_eq!(status, Status::BadText);
        assert!(target.events.is_empty());
    }

    #[test]
    fn inserter_adds_statements_to_model() {
        let mut model = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        {
            let mut inserter = Inserter::new(&mut model, None);
            inserter.statement(stmt("s", "p", "o"), StatementFlags::NONE);
        }
        assert_eq!(model.size(), 1);
    }

    #[test]
    fn inserter_rejects_relative_iri_under_strict_absolute() {
        let mut model = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        let mut inserter =
            Inserter::new(&mut model, None).with_policy(RelativeIriPolicy::StrictAbsolute);
        let relative = Node::new(NodeArgs::Token(NodeKind::Iri, "relative/path")).unwrap();
        let status = inserter.statement(
            Statement::new(relative, iri("p"), iri("o"), None),
            StatementFlags::NONE,
        );
        assert_eq!(status, Status::BadArg);
        assert_eq!(model.size(), 0);
    }
}
