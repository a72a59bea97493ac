//! The index-selection algorithm for `find`/`count`/`ask` (§4.8 "Index
//! selection for queries").

use std::rc::Rc;

use crate::node::Node;
use crate::statement::Statement;

use super::cursor::{CursorMode, Pattern};
use super::index::Index;
use super::order::StatementOrder;
use super::Model;

pub(super) struct Selected {
    pub order: StatementOrder,
    pub mode: CursorMode,
    pub matches: Vec<Rc<Statement>>,
}

/// The three S/P/O fields an ordering touches, tagged by which original
/// pattern field each position represents, ignoring the graph component.
fn field_identities(order: StatementOrder) -> [FieldId; 3] {
    use FieldId::{Object, Predicate, Subject};
    match order.without_graph_prefix() {
        StatementOrder::Spo => [Subject, Predicate, Object],
        StatementOrder::Sop => [Subject, Object, Predicate],
        StatementOrder::Ops => [Object, Predicate, Subject],
        StatementOrder::Osp => [Object, Subject, Predicate],
        StatementOrder::Pso => [Predicate, Subject, Object],
        StatementOrder::Pos => [Predicate, Object, Subject],
        _ => unreachable!("without_graph_prefix only returns triple orders"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldId {
    Subject,
    Predicate,
    Object,
}

impl FieldId {
    fn is_bound(self, pattern: &Pattern) -> bool {
        match self {
            Self::Subject => pattern.subject.is_some(),
            Self::Predicate => pattern.predicate.is_some(),
            Self::Object => pattern.object.is_some(),
        }
    }

    fn value<'p>(self, pattern: &'p Pattern) -> Option<&'p Node> {
        match self {
            Self::Subject => pattern.subject.as_ref(),
            Self::Predicate => pattern.predicate.as_ref(),
            Self::Object => pattern.object.as_ref(),
        }
    }
}

/// Length of the leading run of `field_identities(order)` whose fields are
/// all bound in `pattern`.
fn bound_prefix_len(order: StatementOrder, pattern: &Pattern) -> usize {
    field_identities(order)
        .iter()
        .take_while(|f| f.is_bound(pattern))
        .count()
}

pub(super) fn select(model: &Model, pattern: &Pattern) -> Selected {
    let bound_count = usize::from(pattern.subject.is_some())
        + usize::from(pattern.predicate.is_some())
        + usize::from(pattern.object.is_some());

    if bound_count == 0 {
        return scan_all(model, pattern);
    }

    // Step 2: an "ideal" ordering has its leading `bound_count` fields
    // exactly the pattern's bound set, so the whole match is a single
    // contiguous range with no post-filtering needed.
    if let Some(order) = StatementOrder::TRIPLE_ORDERS
        .into_iter()
        .find(|&o| bound_prefix_len(o, pattern) == bound_count && model.has_index(o))
    {
        return range_scan(model, pattern, order, CursorMode::Range, false);
    }

    // Step 3: a "filter-range" ordering has at least its first field bound,
    // giving a prefix scan that still needs filtering for the rest.
    if let Some(order) = StatementOrder::TRIPLE_ORDERS
        .into_iter()
        .find(|&o| bound_prefix_len(o, pattern) >= 1 && model.has_index(o))
    {
        return range_scan(model, pattern, order, CursorMode::FilterRange, true);
    }

    // Step 4: fall back to checking every statement in the default index.
    scan_all(model, pattern)
}

fn range_scan(
    model: &Model,
    pattern: &Pattern,
    mut order: StatementOrder,
    mut mode: CursorMode,
    mut needs_filter: bool,
) -> Selected {
    // Step 5: prefer the graph-prefixed form when the pattern constrains
    // the graph and the model carries that index.
    if pattern.graph.is_some() && model.has_index(order.with_graph_prefix()) {
        order = order.with_graph_prefix();
        mode = CursorMode::FilterRange;
        needs_filter = true;
    }

    let fields = field_identities(order);
    let bound_len = bound_prefix_len(order, pattern);
    let (s, p, o) = probe_fields(fields, bound_len, pattern);
    let lower = Index::lower_bound_probe(s, p, o, pattern.graph.as_ref());

    let index = &model.indices[&order];
    let matches: Vec<Rc<Statement>> = index
        .range_from(&lower)
        .take_while(|statement| prefix_still_matches(order, pattern, statement, bound_len))
        .filter(|statement| !needs_filter || pattern.matches(statement))
        .cloned()
        .collect();

    Selected { order, mode, matches }
}

/// Maps the leading `bound_len` identities of `fields` back onto literal
/// subject/predicate/object probe values: `Index::lower_bound_probe` (and
/// the `Keyed`/`StatementOrder::key` machinery it feeds) always reads a
/// statement's *actual* subject/predicate/object fields and applies the
/// order's permutation itself, so the probe must carry each bound value in
/// the field it was logically bound to, not in positional order.
fn probe_fields<'p>(
    fields: [FieldId; 3],
    bound_len: usize,
    pattern: &'p Pattern,
) -> (Option<&'p Node>, Option<&'p Node>, Option<&'p Node>) {
    let mut s = None;
    let mut p = None;
    let mut o = None;
    for field in &fields[..bound_len] {
        match field {
            FieldId::Subject => s = field.value(pattern),
            FieldId::Predicate => p = field.value(pattern),
            FieldId::Object => o = field.value(pattern),
        }
    }
    (s, p, o)
}

/// Whether `statement`'s leading `prefix_len` key fields (under `order`)
/// still agree with `pattern`'s bound fields at those same positions —
/// the condition that keeps a range scan inside its contiguous block.
fn prefix_still_matches(
    order: StatementOrder,
    pattern: &Pattern,
    statement: &Statement,
    prefix_len: usize,
) -> bool {
    if order.is_graph_prefixed() {
        if let Some(g) = &pattern.graph {
            if statement.graph() != Some(g) {
                return false;
            }
        }
    }
    let fields = field_identities(order);
    let bound_len = prefix_len.min(3);
    for field in &fields[..bound_len] {
        if !field.is_bound(pattern) {
            continue;
        }
        let expected = field.value(pattern).expect("checked bound above");
        let actual = match field {
            FieldId::Subject => statement.subject(),
            FieldId::Predicate => statement.predicate(),
            FieldId::Object => statement.object(),
        };
        if actual != expected {
            return false;
        }
    }
    true
}

fn scan_all(model: &Model, pattern: &Pattern) -> Selected {
    let order = model.default_order();
    let matches = model.indices[&order]
        .iter()
        .filter(|statement| pattern.matches(statement))
        .cloned()
        .collect();
    Selected {
        order,
        mode: if pattern.subject.is_none()
            && pattern.predicate.is_none()
            && pattern.object.is_none()
            && pattern.graph.is_none()
        {
            CursorMode::All
        } else {
            CursorMode::FilterAll
        },
        matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelFlags;
    use crate::node::{NodeArgs, NodeKind};

    fn iri(s: &str) -> Node {
        Node::new(NodeArgs::Token(NodeKind::Iri, s)).unwrap()
    }

    #[test]
    fn subject_only_pattern_selects_an_ideal_order() {
        let mut m = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        m.insert(iri("s"), iri("p1"), iri("o1"), None);
        m.insert(iri("s"), iri("p2"), iri("o2"), None);
        m.insert(iri("other"), iri("p3"), iri("o3"), None);
        let selected = select(&m, &Pattern::new(Some(iri("s")), None, None, None));
        assert_eq!(selected.mode, CursorMode::Range);
        assert_eq!(selected.matches.len(), 2);
    }

    #[test]
    fn subject_and_object_without_matching_index_falls_back_to_filter_range_or_all() {
        let mut m = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        m.insert(iri("s"), iri("p1"), iri("o1"), None);
        m.insert(iri("s"), iri("p2"), iri("o1"), None);
        let selected = select(&m, &Pattern::new(Some(iri("s")), None, Some(iri("o1")), None));
        assert_eq!(selected.matches.len(), 2);
    }

    #[test]
    fn empty_pattern_selects_all_mode() {
        let mut m = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        m.insert(iri("s"), iri("p"), iri("o"), None);
        let selected = select(&m, &Pattern::default());
        assert_eq!(selected.mode, CursorMode::All);
        assert_eq!(selected.matches.len(), 1);
    }
}
