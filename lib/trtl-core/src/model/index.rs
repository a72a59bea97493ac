//! A single balanced ordered index over statements (§3 "Model", §4.8).
//!
//! Backed by [`BTreeSet`]: "any balanced ordered tree with parametric
//! comparison suffices; the contract is ordered iteration, lower-bound
//! seek, and O(log n) insert/erase/lookup" (§9), and `BTreeSet` already
//! provides exactly that contract. Parametric comparison is supplied by
//! wrapping each stored statement in [`Keyed`], whose `Ord` impl delegates
//! to the index's own [`StatementOrder`].

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::model::order::StatementOrder;
use crate::node::{Node, NodeArgs, NodeKind};
use crate::statement::Statement;

/// A statement wrapped for storage in one particular [`StatementOrder`]'s
/// tree. Two `Keyed`s compare equal exactly when their statements agree on
/// every field that ordering's key touches (graph is only part of the key
/// for `G`-prefixed orderings, matching invariant (iii) in §3).
#[derive(Clone)]
struct Keyed {
    order: StatementOrder,
    statement: Rc<Statement>,
}

impl PartialEq for Keyed {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Keyed {}

impl PartialOrd for Keyed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Keyed {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order.compare(&self.statement, &other.statement)
    }
}

/// One of a model's (up to 12) indices: an ordered tree of statement
/// handles, sorted by [`StatementOrder`].
pub struct Index {
    order: StatementOrder,
    tree: BTreeSet<Keyed>,
}

impl Index {
    #[must_use]
    pub fn new(order: StatementOrder) -> Self {
        Self {
            order,
            tree: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn order(&self) -> StatementOrder {
        self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Inserts `statement`. Returns `false` without modifying the index if
    /// a field-wise-equal statement (under this index's key) is already
    /// present — duplicate suppression (§3 invariant iii).
    pub fn insert(&mut self, statement: Rc<Statement>) -> bool {
        self.tree.insert(Keyed {
            order: self.order,
            statement,
        })
    }

    /// Removes the entry equal to `statement`, if any.
    pub fn remove(&mut self, statement: &Statement) -> bool {
        // `BTreeSet::remove` only needs a `Borrow<Keyed>`-compatible probe;
        // we build a throwaway `Keyed` sharing the target's order so the
        // comparison lands on the same key.
        let probe = Keyed {
            order: self.order,
            statement: Rc::new(statement.clone()),
        };
        self.tree.remove(&probe)
    }

    /// Whether any statement in this index matches `statement`'s key.
    #[must_use]
    pub fn contains(&self, statement: &Statement) -> bool {
        let probe = Keyed {
            order: self.order,
            statement: Rc::new(statement.clone()),
        };
        self.tree.contains(&probe)
    }

    /// Ordered iteration over every statement in this index.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Statement>> {
        self.tree.iter().map(|k| &k.statement)
    }

    /// The global minimum node under `Node`'s total order: kind `Iri`
    /// (the smallest [`NodeKind`] variant) with an empty body. Used to
    /// build lower-bound probe statements for range seeks: any real node
    /// compares greater than or equal to this one.
    fn min_node() -> Node {
        Node::new(NodeArgs::Token(NodeKind::Iri, "")).expect("empty token is always valid")
    }

    /// Seeks to the first statement whose key is greater than or equal to
    /// a probe built from `pattern`'s constrained leading fields (with
    /// [`Self::min_node`] filling in any trailing wildcard), then yields
    /// statements in order for as long as they still satisfy `pattern`.
    ///
    /// This gives the spec's "contiguous range scan" behaviour for the
    /// exact-match case and a "prefix scan plus filtering" behaviour
    /// whenever `pattern` only constrains a leading subset of this
    /// ordering's fields; callers needing the latter pass a `filter` that
    /// re-checks non-leading fields.
    pub fn range_from<'a>(
        &'a self,
        lower_bound: &Statement,
    ) -> impl Iterator<Item = &'a Rc<Statement>> {
        let probe = Keyed {
            order: self.order,
            statement: Rc::new(lower_bound.clone()),
        };
        self.tree.range(probe..).map(|k| &k.statement)
    }

    /// Builds a lower-bound probe statement: `s`/`p`/`o`/`g` where given,
    /// [`Self::min_node`] elsewhere.
    #[must_use]
    pub fn lower_bound_probe(
        s: Option<&Node>,
        p: Option<&Node>,
        o: Option<&Node>,
        g: Option<&Node>,
    ) -> Statement {
        let min = Self::min_node();
        Statement::new(
            s.cloned().unwrap_or_else(|| min.clone()),
            p.cloned().unwrap_or_else(|| min.clone()),
            o.cloned().unwrap_or_else(|| min.clone()),
            Some(g.cloned().unwrap_or(min)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeArgs;

    fn iri(s: &str) -> Node {
        Node::new(NodeArgs::Token(NodeKind::Iri, s)).unwrap()
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut idx = Index::new(StatementOrder::Spo);
        let st = Rc::new(Statement::new(iri("s"), iri("p"), iri("o"), None));
        assert!(idx.insert(st.clone()));
        assert!(!idx.insert(st));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn iteration_is_ordered_by_key() {
        let mut idx = Index::new(StatementOrder::Spo);
        idx.insert(Rc::new(Statement::new(iri("b"), iri("p"), iri("o"), None)));
        idx.insert(Rc::new(Statement::new(iri("a"), iri("p"), iri("o"), None)));
        let subjects: Vec<_> = idx.iter().map(|s| s.subject().value().to_owned()).collect();
        assert_eq!(subjects, vec!["a", "b"]);
    }

    #[test]
    fn range_from_seeks_to_matching_prefix() {
        let mut idx = Index::new(StatementOrder::Spo);
        idx.insert(Rc::new(Statement::new(iri("a"), iri("p"), iri("o"), None)));
        idx.insert(Rc::new(Statement::new(iri("b"), iri("p1"), iri("o"), None)));
        idx.insert(Rc::new(Statement::new(iri("b"), iri("p2"), iri("o"), None)));
        let lower = Index::lower_bound_probe(Some(&iri("b")), None, None, None);
        let found: Vec<_> = idx
            .range_from(&lower)
            .take_while(|s| s.subject() == &iri("b"))
            .map(|s| s.predicate().value().to_owned())
            .collect();
        assert_eq!(found, vec!["p1", "p2"]);
    }
}
