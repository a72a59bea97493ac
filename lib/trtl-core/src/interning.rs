//! Interning store for [`Node`]s (§4.2 "Node store").
//!
//! Backed by a plain `HashSet` keyed on structural content rather than a
//! hand-rolled open-addressed table: `Node` already wraps an `Rc`, so
//! "bump the refcount and return the existing handle" is just `Rc::clone`,
//! and "free when the last reference drops" is exactly what `Rc`'s own
//! drop glue does — no explicit `deref`/refcount bookkeeping is needed on
//! top of it. `size()` additionally prunes entries that only the store
//! itself is still holding (strong count of 1), which is the closest
//! analogue to the spec's "number of distinct live nodes".

use std::collections::HashSet;

use crate::node::{Node, NodeArgs, NodeError};

/// A deduplicating store of interned [`Node`]s.
///
/// Interning turns structural equality between repeated nodes (the same
/// IRI appearing as both a subject and an object, for instance) into
/// `Rc::ptr_eq` equality, matching the data model's "O(1) equality by
/// identity" goal.
#[derive(Debug, Default)]
pub struct NodeStore {
    interned: HashSet<Node>,
}

impl NodeStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// If a structurally equal node is already interned, returns a cheap
    /// clone of it (bumping its `Rc` strong count); otherwise moves `node`
    /// into the store. Amortised O(1) (§4.2 `intern`).
    pub fn intern(&mut self, node: Node) -> Node {
        if let Some(existing) = self.interned.get(&node) {
            return existing.clone();
        }
        self.interned.insert(node.clone());
        node
    }

    /// Builds a node from `args` and interns it in one step (§4.2 `get`).
    pub fn get(&mut self, args: NodeArgs<'_>) -> Result<Node, NodeError> {
        Node::new(args).map(|n| self.intern(n))
    }

    /// The number of distinct nodes currently held only by this store or
    /// also referenced elsewhere. Dead entries — interned nodes with no
    /// other outstanding reference — are dropped first (§4.2 `size`).
    pub fn size(&mut self) -> usize {
        self.gc();
        self.interned.len()
    }

    /// Drops interned entries whose only reference is the store's own.
    fn gc(&mut self) {
        self.interned.retain(|n| n.strong_count() > 1);
    }

    /// Whether the store currently has no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interned.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    #[test]
    fn interning_deduplicates_equal_nodes() {
        let mut store = NodeStore::new();
        let a = store
            .get(NodeArgs::Token(NodeKind::Iri, "http://example.org/"))
            .unwrap();
        let b = store
            .get(NodeArgs::Token(NodeKind::Iri, "http://example.org/"))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(store.size(), 1);
        // store + a + b all keep the same underlying allocation alive.
        assert_eq!(a.strong_count(), 3);
    }

    #[test]
    fn size_counts_only_live_nodes() {
        let mut store = NodeStore::new();
        {
            let _n = store
                .get(NodeArgs::Token(NodeKind::Blank, "b0"))
                .unwrap();
            assert_eq!(store.size(), 1);
        }
        assert_eq!(store.size(), 0);
    }
}
