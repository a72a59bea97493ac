//! The indexed in-memory model: a multi-indexed statement store (§3
//! "Model", §4.8).

mod cursor;
mod index;
mod order;
mod selection;

pub use cursor::{Cursor, CursorMode, Pattern};
pub use index::Index;
pub use order::StatementOrder;

use std::collections::HashMap;
use std::rc::Rc;

use crate::node::Node;
use crate::statement::{Caret, Statement};
use crate::Status;

/// Model-level configuration flags, set at construction and fixed for the
/// model's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ModelFlags(u8);

impl ModelFlags {
    pub const NONE: Self = Self(0);
    /// Statements carry a graph component; quad orderings are meaningful.
    pub const WITH_GRAPHS: Self = Self(1 << 0);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOr for ModelFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// A multi-indexed in-memory store of [`Statement`]s.
///
/// The [`StatementOrder`] a model is constructed with is its *default
/// index*, which owns the canonical `Rc<Statement>` handles; every other
/// index added with [`Model::add_index`] holds clones of the same `Rc`s
/// (§3 invariant ii). Any mutation bumps [`Model::version`], which every
/// outstanding [`Cursor`] is checked against before use (invariant iv).
pub struct Model {
    default_order: StatementOrder,
    flags: ModelFlags,
    indices: HashMap<StatementOrder, Index>,
    version: u64,
}

impl Model {
    /// Creates an empty model with the given default index ordering and
    /// flags (§4.8 `new`).
    #[must_use]
    pub fn new(default_order: StatementOrder, flags: ModelFlags) -> Self {
        let mut indices = HashMap::new();
        indices.insert(default_order, Index::new(default_order));
        Self {
            default_order,
            flags,
            indices,
            version: 0,
        }
    }

    #[must_use]
    pub fn default_order(&self) -> StatementOrder {
        self.default_order
    }

    #[must_use]
    pub fn flags(&self) -> ModelFlags {
        self.flags
    }

    /// The model's current version; bumped by every structural mutation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of distinct statements stored (§4.8 `size`).
    #[must_use]
    pub fn size(&self) -> usize {
        self.indices[&self.default_order].len()
    }

    #[must_use]
    pub fn empty(&self) -> bool {
        self.size() == 0
    }

    /// Adds a secondary index in the given ordering, populating it from
    /// the default index's current contents (§4.8 `add_index`).
    pub fn add_index(&mut self, order: StatementOrder) -> Status {
        if self.indices.contains_key(&order) {
            return Status::Success;
        }
        let mut index = Index::new(order);
        for statement in self.indices[&self.default_order].iter() {
            index.insert(statement.clone());
        }
        self.indices.insert(order, index);
        Status::Success
    }

    /// Drops a secondary index. Dropping the default index is refused.
    pub fn drop_index(&mut self, order: StatementOrder) -> Status {
        if order == self.default_order {
            return Status::BadArg;
        }
        self.indices.remove(&order);
        Status::Success
    }

    /// `true` iff this model carries an index in `order`.
    #[must_use]
    pub fn has_index(&self, order: StatementOrder) -> bool {
        self.indices.contains_key(&order)
    }

    /// Inserts `(s, p, o, g)` (§4.8 `add`/`insert`/`add_internal`).
    ///
    /// If the default index already holds a field-wise-equal statement,
    /// this is a no-op — duplicate suppression happens at the default
    /// index, matching "if the default index rejects as duplicate, the
    /// whole operation is a no-op".
    pub fn insert(&mut self, subject: Node, predicate: Node, object: Node, graph: Option<Node>) -> bool {
        self.insert_with_caret(subject, predicate, object, graph, None)
    }

    pub fn insert_with_caret(
        &mut self,
        subject: Node,
        predicate: Node,
        object: Node,
        graph: Option<Node>,
        caret: Option<Caret>,
    ) -> bool {
        let mut statement = Statement::new(subject, predicate, object, graph);
        if let Some(caret) = caret {
            statement = statement.with_caret(caret);
        }
        let rc = Rc::new(statement);
        let accepted = self
            .indices
            .get_mut(&self.default_order)
            .expect("default index always present")
            .insert(rc.clone());
        if !accepted {
            return false;
        }
        for (order, index) in &mut self.indices {
            if *order != self.default_order {
                index.insert(rc.clone());
            }
        }
        self.version += 1;
        true
    }

    /// Copies every statement from `cursor` into this model (§4.8
    /// `insert_all`).
    pub fn insert_all(&mut self, cursor: Cursor) {
        for statement in cursor.into_iter_unchecked() {
            self.insert(
                statement.subject().clone(),
                statement.predicate().clone(),
                statement.object().clone(),
                statement.graph().cloned(),
            );
        }
    }

    /// Removes every statement matching `pattern` (§4.8 `erase`/
    /// `erase_all`). Bumps the version exactly once, even if multiple
    /// statements are removed.
    pub fn erase(&mut self, pattern: &Pattern) -> usize {
        let doomed: Vec<Rc<Statement>> = self.find_internal(pattern).matches;
        if doomed.is_empty() {
            return 0;
        }
        for index in self.indices.values_mut() {
            for statement in &doomed {
                index.remove(statement);
            }
        }
        self.version += 1;
        doomed.len()
    }

    /// Removes every statement in the model.
    pub fn clear(&mut self) {
        if self.empty() {
            return;
        }
        for index in self.indices.values_mut() {
            *index = Index::new(index.order());
        }
        self.version += 1;
    }

    /// Runs the index-selection algorithm and builds a [`Cursor`] over
    /// every statement matching `pattern` (§4.8 `find`).
    #[must_use]
    pub fn find(&self, pattern: Pattern) -> Cursor {
        let selected = self.find_internal(&pattern);
        Cursor::new(selected.order, selected.mode, self.version, selected.matches)
    }

    fn find_internal(&self, pattern: &Pattern) -> selection::Selected {
        selection::select(self, pattern)
    }

    /// One-wildcard convenience lookup returning the first match, if any
    /// (§4.8 `get`).
    #[must_use]
    pub fn get(&self, pattern: Pattern) -> Option<Rc<Statement>> {
        self.find_internal(&pattern).matches.into_iter().next()
    }

    /// `true` iff some statement matches `pattern` (§4.8 `ask`).
    #[must_use]
    pub fn ask(&self, pattern: &Pattern) -> bool {
        !self.find_internal(pattern).matches.is_empty()
    }

    /// Number of statements matching `pattern` (§4.8 `count`). Independent
    /// of which index `find` would select for the same pattern (§8
    /// "Pattern/index equivalence").
    #[must_use]
    pub fn count(&self, pattern: &Pattern) -> usize {
        self.find_internal(pattern).matches.len()
    }

    /// Iterates the default index in its native order (§4.8 `begin`/`end`
    /// collapsed into a standard iterator).
    pub fn iter(&self) -> impl Iterator<Item = &Rc<Statement>> {
        self.indices[&self.default_order].iter()
    }

    /// Iterates a specific index's ordering, if the model carries it
    /// (§4.8 `begin_ordered`).
    pub fn iter_ordered(&self, order: StatementOrder) -> Option<impl Iterator<Item = &Rc<Statement>>> {
        self.indices.get(&order).map(Index::iter)
    }

    /// Structural equality: same size and pairwise-equal default-index
    /// iteration order (§4.8 `equals`). This is *not* graph-isomorphism:
    /// blank node identifiers must match exactly, by design (§11).
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        self.size() == other.size() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<I> FromIterator<I> for Model
where
    I: Into<(Node, Node, Node, Option<Node>)>,
{
    /// Builds a default-flags, SPO-ordered model from an iterator of
    /// `(subject, predicate, object, graph)` tuples (§11 supplemented
    /// `Dataset`-style convenience constructor).
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut model = Self::new(StatementOrder::Spo, ModelFlags::NONE);
        for item in iter {
            let (s, p, o, g) = item.into();
            if g.is_some() {
                model.flags = model.flags.union(ModelFlags::WITH_GRAPHS);
            }
            model.insert(s, p, o, g);
        }
        model
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
    fn insert_rejects_duplicates_as_no_op() {
        let mut m = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        assert!(m.insert(iri("s"), iri("p"), iri("o"), None));
        assert!(!m.insert(iri("s"), iri("p"), iri("o"), None));
        assert_eq!(m.size(), 1);
    }

    #[test]
    fn secondary_index_stays_in_sync_with_default() {
        let mut m = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        m.insert(iri("s"), iri("p"), iri("o"), None);
        m.add_index(StatementOrder::Pos);
        m.insert(iri("s2"), iri("p2"), iri("o2"), None);
        assert_eq!(m.indices[&StatementOrder::Pos].len(), m.size());
    }

    #[test]
    fn find_by_subject_returns_matching_statements_in_spo_order() {
        let mut m = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        m.insert(iri("s"), iri("p1"), iri("o1"), None);
        m.insert(iri("s"), iri("p2"), iri("o2"), None);
        m.insert(iri("other"), iri("p3"), iri("o3"), None);
        let cursor = m.find(Pattern::new(Some(iri("s")), None, None, None));
        assert_eq!(cursor.len(), 2);
    }

    #[test]
    fn erase_removes_from_every_index_and_bumps_version() {
        let mut m = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        m.insert(iri("s"), iri("p"), iri("o"), None);
        m.add_index(StatementOrder::Pos);
        let v0 = m.version();
        let removed = m.erase(&Pattern::new(Some(iri("s")), None, None, None));
        assert_eq!(removed, 1);
        assert_eq!(m.size(), 0);
        assert_eq!(m.indices[&StatementOrder::Pos].len(), 0);
        assert!(m.version() > v0);
    }

    #[test]
    fn cursor_is_invalidated_by_mutation() {
        let mut m = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        m.insert(iri("s"), iri("p"), iri("o"), None);
        let cursor = m.find(Pattern::default());
        m.insert(iri("s2"), iri("p2"), iri("o2"), None);
        assert_eq!(cursor.current(m.version()), Err(Status::BadCursor));
    }

    #[test]
    fn equals_compares_by_default_index_iteration() {
        let mut a = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        let mut b = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        a.insert(iri("s"), iri("p"), iri("o"), None);
        b.insert(iri("s"), iri("p"), iri("o"), None);
        assert!(a.equals(&b));
    }
}
