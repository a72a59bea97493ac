//! The 12 statement-order permutations a model can index by (§3 "Model",
//! §6 "Statement-order enum").

use std::cmp::Ordering;

use crate::node::Node;
use crate::statement::Statement;

/// One of the 12 field-permutation orderings a [`super::Index`] can use as
/// its comparison key. Discriminants match the spec's stable numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatementOrder {
    Spo = 0,
    Sop = 1,
    Ops = 2,
    Osp = 3,
    Pso = 4,
    Pos = 5,
    Gspo = 6,
    Gsop = 7,
    Gops = 8,
    Gosp = 9,
    Gpso = 10,
    Gpos = 11,
}

impl StatementOrder {
    /// All six triple orderings (no graph component in the key).
    pub const TRIPLE_ORDERS: [Self; 6] = [
        Self::Spo,
        Self::Sop,
        Self::Ops,
        Self::Osp,
        Self::Pso,
        Self::Pos,
    ];

    /// All six graph-prefixed quad orderings.
    pub const QUAD_ORDERS: [Self; 6] = [
        Self::Gspo,
        Self::Gsop,
        Self::Gops,
        Self::Gosp,
        Self::Gpso,
        Self::Gpos,
    ];

    /// True for the six `G`-prefixed orderings, which key on the graph
    /// component first.
    #[must_use]
    pub const fn is_graph_prefixed(self) -> bool {
        matches!(
            self,
            Self::Gspo | Self::Gsop | Self::Gops | Self::Gosp | Self::Gpso | Self::Gpos
        )
    }

    /// The triple ordering this quad ordering shares its S/P/O permutation
    /// with (used to find the non-graph-prefixed counterpart).
    #[must_use]
    pub const fn without_graph_prefix(self) -> Self {
        match self {
            Self::Gspo => Self::Spo,
            Self::Gsop => Self::Sop,
            Self::Gops => Self::Ops,
            Self::Gosp => Self::Osp,
            Self::Gpso => Self::Pso,
            Self::Gpos => Self::Pos,
            other => other,
        }
    }

    /// The `G`-prefixed counterpart of a triple ordering.
    #[must_use]
    pub const fn with_graph_prefix(self) -> Self {
        match self {
            Self::Spo => Self::Gspo,
            Self::Sop => Self::Gsop,
            Self::Ops => Self::Gops,
            Self::Osp => Self::Gosp,
            Self::Pso => Self::Gpso,
            Self::Pos => Self::Gpos,
            other => other,
        }
    }

    /// The field permutation this ordering applies, as a key tuple used
    /// to compare two statements.
    #[must_use]
    pub fn key<'s>(self, statement: &'s Statement) -> OrderKey<'s> {
        let (s, p, o) = (statement.subject(), statement.predicate(), statement.object());
        let g = statement.graph();
        let fields: [&'s Node; 3] = match self.without_graph_prefix() {
            Self::Spo => [s, p, o],
            Self::Sop => [s, o, p],
            Self::Ops => [o, p, s],
            Self::Osp => [o, s, p],
            Self::Pso => [p, s, o],
            Self::Pos => [p, o, s],
            _ => unreachable!("without_graph_prefix only returns triple orders"),
        };
        OrderKey {
            graph: if self.is_graph_prefixed() { g } else { None },
            fields,
        }
    }

    /// Compares two statements under this ordering.
    #[must_use]
    pub fn compare(self, a: &Statement, b: &Statement) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }
}

/// The comparable projection of a statement under one [`StatementOrder`].
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderKey<'s> {
    graph: Option<&'s Node>,
    fields: [&'s Node; 3],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeArgs, NodeKind};

    fn iri(s: &str) -> Node {
        Node::new(NodeArgs::Token(NodeKind::Iri, s)).unwrap()
    }

    #[test]
    fn spo_and_pos_agree_on_equality() {
        let a = Statement::new(iri("s"), iri("p"), iri("o"), None);
        let b = Statement::new(iri("s"), iri("p"), iri("o"), None);
        assert_eq!(StatementOrder::Spo.compare(&a, &b), Ordering::Equal);
        assert_eq!(StatementOrder::Pos.compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn graph_prefixed_order_keys_on_graph_first() {
        let a = Statement::new(iri("s"), iri("p"), iri("o"), Some(iri("g1")));
        let b = Statement::new(iri("s"), iri("p"), iri("o"), Some(iri("g2")));
        assert_ne!(StatementOrder::Gspo.compare(&a, &b), Ordering::Equal);
        assert_eq!(StatementOrder::Spo.compare(&a, &b), Ordering::Equal);
    }
}
