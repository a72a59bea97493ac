//! Driving a [`Sink`] directly from a model [`Cursor`], replicating the
//! same `ANON_S`/`ANON_O`/`LIST_S`/`LIST_O` abbreviation hints the reader
//! derives from bracket/collection syntax, computed up front from the
//! whole range instead of inferred token-by-token (§4.9).
//!
//! A cursor's matches are already materialised (see
//! [`trtl_core::model::Cursor::into_iter_unchecked`]), so unlike
//! [`crate::writer::Writer`] — which has to cope with the reader handing
//! it a blank node's contents before the statement that references it —
//! this can classify every blank node first and then drive the sink in
//! one pass, expanding list/anon sub-structure inline as it goes.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use trtl_core::event::{Sink, StatementFlags};
use trtl_core::model::Cursor;
use trtl_core::node::NodeKind;
use trtl_core::statement::Statement;
use trtl_core::{Node, Status};

use crate::vocab::{rdf_first, rdf_nil, rdf_rest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlankRole {
    /// Blank, carries `rdf:first`/`rdf:rest`, referenced exactly once.
    ListHead,
    /// Blank, referenced exactly once (and not a list head).
    AnonObject,
    /// Blank, never referenced, but itself a subject somewhere.
    AnonSubject,
    /// Everything else: named nodes, and blank nodes referenced more
    /// than once or not classifiable as one of the above.
    Plain,
}

struct Classification {
    role: HashMap<Node, BlankRole>,
    by_subject: HashMap<Node, Vec<Rc<Statement>>>,
}

impl Classification {
    fn role_of(&self, node: &Node) -> BlankRole {
        if node.kind() != NodeKind::Blank {
            return BlankRole::Plain;
        }
        self.role.get(node).copied().unwrap_or(BlankRole::Plain)
    }
}

fn classify(statements: &[Rc<Statement>]) -> Classification {
    let mut subject_count: HashMap<Node, usize> = HashMap::new();
    let mut object_count: HashMap<Node, usize> = HashMap::new();
    let mut has_first: HashSet<Node> = HashSet::new();
    let mut has_rest: HashSet<Node> = HashSet::new();
    let mut by_subject: HashMap<Node, Vec<Rc<Statement>>> = HashMap::new();

    for statement in statements {
        let subject = statement.subject();
        if subject.kind() == NodeKind::Blank {
            *subject_count.entry(subject.clone()).or_insert(0) += 1;
            if statement.predicate() == &rdf_first() {
                has_first.insert(subject.clone());
            }
            if statement.predicate() == &rdf_rest() {
                has_rest.insert(subject.clone());
            }
            by_subject.entry(subject.clone()).or_default().push(Rc::clone(statement));
        }
        let object = statement.object();
        if object.kind() == NodeKind::Blank {
            *object_count.entry(object.clone()).or_insert(0) += 1;
        }
    }

    let blanks: HashSet<Node> = subject_count.keys().chain(object_count.keys()).cloned().collect();
    let mut role = HashMap::with_capacity(blanks.len());
    for blank in blanks {
        let inbound = object_count.get(&blank).copied().unwrap_or(0);
        let r = if has_first.contains(&blank) && has_rest.contains(&blank) && inbound == 1 {
            BlankRole::ListHead
        } else if inbound == 1 {
            BlankRole::AnonObject
        } else if inbound == 0 && subject_count.contains_key(&blank) {
            BlankRole::AnonSubject
        } else {
            BlankRole::Plain
        };
        role.insert(blank, r);
    }

    Classification { role, by_subject }
}

/// Drives every statement a cursor matches into `sink` as [`Event`]s,
/// with list/anon/subject abbreviation flags computed from the range as
/// a whole (§4.9).
///
/// [`Event`]: trtl_core::event::Event
pub fn write_range<S: Sink>(cursor: Cursor, sink: &mut S) -> Status {
    let statements: Vec<Rc<Statement>> = cursor.into_iter_unchecked().collect();
    let classification = classify(&statements);
    let mut emitted_objects: HashSet<Node> = HashSet::new();
    let mut handled_anon_subjects: HashSet<Node> = HashSet::new();

    for statement in &statements {
        let subject = statement.subject();
        match classification.role_of(subject) {
            BlankRole::ListHead | BlankRole::AnonObject => continue,
            BlankRole::AnonSubject => {
                if !handled_anon_subjects.insert(subject.clone()) {
                    continue;
                }
                let status = emit_anon_subject_group(sink, &classification, &mut emitted_objects, subject);
                if !status.is_success() {
                    return status;
                }
            }
            BlankRole::Plain => {
                let status = emit_top_level(sink, &classification, &mut emitted_objects, statement, StatementFlags::NONE);
                if !status.is_success() {
                    return status;
                }
            }
        }
    }
    Status::Success
}

/// Emits every statement sharing an anonymous subject as one contiguous
/// block: all but the last are sent with no subject flag (the byte
/// writer buffers them as the bracket's contents) and the last carries
/// `ANON_S` (triggering the bracket to render, with this statement's own
/// predicate/object following it as Turtle's `[ ... ] p o .` form).
fn emit_anon_subject_group<S: Sink>(
    sink: &mut S,
    classification: &Classification,
    emitted_objects: &mut HashSet<Node>,
    subject: &Node,
) -> Status {
    let Some(group) = classification.by_subject.get(subject) else {
        return Status::Success;
    };
    let last = group.len().saturating_sub(1);
    for (i, statement) in group.iter().enumerate() {
        let subject_flags = if i == last { StatementFlags::ANON_S } else { StatementFlags::NONE };
        let status = emit_top_level(sink, classification, emitted_objects, statement, subject_flags);
        if !status.is_success() {
            return status;
        }
    }
    Status::Success
}

fn emit_top_level<S: Sink>(
    sink: &mut S,
    classification: &Classification,
    emitted_objects: &mut HashSet<Node>,
    statement: &Rc<Statement>,
    mut flags: StatementFlags,
) -> Status {
    if statement.subject() == &rdf_nil() {
        flags = flags.union(StatementFlags::LIST_S);
    }
    let object_flags = match prepare_object(sink, classification, emitted_objects, statement.object()) {
        Ok(flags) => flags,
        Err(status) => return status,
    };
    flags = flags.union(object_flags);
    if statement.graph().is_none() {
        flags = flags.union(StatementFlags::EMPTY_G);
    }
    sink.statement((**statement).clone(), flags)
}

/// Computes the flags an object position needs and, if it is a list head
/// or a unique anonymous object, drives its sub-structure (and, for anon
/// objects, its closing `End`) before returning.
fn prepare_object<S: Sink>(
    sink: &mut S,
    classification: &Classification,
    emitted_objects: &mut HashSet<Node>,
    object: &Node,
) -> Result<StatementFlags, Status> {
    if object == &rdf_nil() {
        return Ok(StatementFlags::LIST_O);
    }
    match classification.role_of(object) {
        BlankRole::AnonObject => {
            if emitted_objects.contains(object) {
                // Shouldn't happen (inbound count is exactly one by
                // construction) but a repeat reference degrades to a
                // plain label rather than re-driving already-closed
                // content.
                return Ok(StatementFlags::NONE);
            }
            emitted_objects.insert(object.clone());
            let has_content = drive_anon_content(sink, classification, emitted_objects, object)?;
            let end_status = sink.end(object.clone());
            if !end_status.is_success() {
                return Err(end_status);
            }
            Ok(if has_content { StatementFlags::ANON_O } else { StatementFlags::EMPTY_O })
        }
        BlankRole::ListHead => {
            if !emitted_objects.contains(object) {
                drive_list_content(sink, classification, emitted_objects, object)?;
            }
            Ok(StatementFlags::LIST_O)
        }
        _ => Ok(StatementFlags::NONE),
    }
}

/// Emits an anonymous node's own property list (always subject-plain, as
/// the reader produces it from bracket content), recursing for any
/// further-nested list/anon objects. Returns whether it had any
/// properties at all (an empty bracket gets `EMPTY_O` instead of
/// `ANON_O` at the call site).
fn drive_anon_content<S: Sink>(
    sink: &mut S,
    classification: &Classification,
    emitted_objects: &mut HashSet<Node>,
    node: &Node,
) -> Result<bool, Status> {
    let Some(inner) = classification.by_subject.get(node) else {
        return Ok(false);
    };
    for inner_statement in inner {
        let object_flags = prepare_object(sink, classification, emitted_objects, inner_statement.object())?;
        let mut flags = object_flags;
        if inner_statement.graph().is_none() {
            flags = flags.union(StatementFlags::EMPTY_G);
        }
        let status = sink.statement((**inner_statement).clone(), flags);
        if !status.is_success() {
            return Err(status);
        }
    }
    Ok(!inner.is_empty())
}

/// Walks a cons-cell chain from `head`, emitting each cell's
/// `rdf:first`/`rdf:rest` statements with no flags (matching how the
/// reader emits them), recursing into any item that is itself a nested
/// anon node or list before the cell that names it.
fn drive_list_content<S: Sink>(
    sink: &mut S,
    classification: &Classification,
    emitted_objects: &mut HashSet<Node>,
    head: &Node,
) -> Result<(), Status> {
    let mut current = head.clone();
    loop {
        if !emitted_objects.insert(current.clone()) {
            return Ok(());
        }
        let Some(cell) = classification.by_subject.get(&current) else {
            return Ok(());
        };
        let first_statement = cell.iter().find(|s| s.predicate() == &rdf_first());
        let rest_statement = cell.iter().find(|s| s.predicate() == &rdf_rest());

        if let Some(first_statement) = first_statement {
            prepare_object(sink, classification, emitted_objects, first_statement.object())?;
            let status = sink.statement((**first_statement).clone(), StatementFlags::NONE);
            if !status.is_success() {
                return Err(status);
            }
        }

        let Some(rest_statement) = rest_statement else {
            return Ok(());
        };
        let next = rest_statement.object().clone();
        let status = sink.statement((**rest_statement).clone(), StatementFlags::NONE);
        if !status.is_success() {
            return Err(status);
        }
        if next == rdf_nil() {
            return Ok(());
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trtl_core::event::{CollectSink, Event};
    use trtl_core::model::{Model, ModelFlags, Pattern};
    use trtl_core::node::NodeArgs;
    use trtl_core::StatementOrder;

    fn iri(s: &str) -> Node {
        Node::new(NodeArgs::Token(NodeKind::Iri, s)).unwrap()
    }

    fn blank(s: &str) -> Node {
        Node::new(NodeArgs::Token(NodeKind::Blank, s)).unwrap()
    }

    fn run(model: &Model) -> Vec<Event> {
        let cursor = model.find(Pattern::default());
        let mut sink = CollectSink::default();
        let status = write_range(cursor, &mut sink);
        assert!(status.is_success());
        sink.events
    }

    #[test]
    fn plain_triple_gets_no_flags() {
        let mut model = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        model.insert(iri("http://x/s"), iri("http://x/p"), iri("http://x/o"), None);
        let events = run(&model);
        assert_eq!(events.len(), 1);
        let Event::Statement { flags, .. } = &events[0] else { panic!("expected a statement event") };
        assert_eq!(flags.bits(), StatementFlags::EMPTY_G.bits());
    }

    #[test]
    fn unique_blank_object_gets_anon_o_and_closes() {
        let mut model = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        let b = blank("b0");
        model.insert(iri("http://x/s"), iri("http://x/p"), b.clone(), None);
        model.insert(b.clone(), iri("http://x/inner"), iri("http://x/v"), None);
        let events = run(&model);
        assert_eq!(events.len(), 3);
        let flagged = events.iter().find_map(|e| match e {
            Event::Statement { statement, flags } if statement.object() == &b => Some(*flags),
            _ => None,
        });
        assert!(flagged.unwrap().contains(StatementFlags::ANON_O));
        assert!(events.iter().any(|e| matches!(e, Event::End { node } if node == &b)));
    }

    #[test]
    fn empty_blank_object_gets_empty_o_and_no_inner_statement() {
        let mut model = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        let b = blank("b1");
        model.insert(iri("http://x/s"), iri("http://x/p"), b, None);
        let events = run(&model);
        assert_eq!(events.len(), 1);
        let Event::Statement { flags, .. } = &events[0] else { panic!("expected a statement event") };
        assert!(flags.contains(StatementFlags::EMPTY_O));
    }

    #[test]
    fn list_head_expands_with_list_o_and_no_end() {
        let mut model = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        let head = blank("c0");
        let tail = blank("c1");
        let one = Node::new(NodeArgs::Integer(1)).unwrap();
        let two = Node::new(NodeArgs::Integer(2)).unwrap();
        model.insert(iri("http://x/s"), iri("http://x/p"), head.clone(), None);
        model.insert(head.clone(), rdf_first(), one, None);
        model.insert(head.clone(), rdf_rest(), tail.clone(), None);
        model.insert(tail.clone(), rdf_first(), two, None);
        model.insert(tail, rdf_rest(), rdf_nil(), None);
        let events = run(&model);
        // s-p-head, head-first-1, head-rest-tail, tail-first-2, tail-rest-nil
        assert_eq!(events.len(), 5);
        assert!(!events.iter().any(|e| matches!(e, Event::End { .. })));
        let head_flags = events.iter().find_map(|e| match e {
            Event::Statement { statement, flags } if statement.object() == &head => Some(*flags),
            _ => None,
        });
        assert!(head_flags.unwrap().contains(StatementFlags::LIST_O));
    }

    #[test]
    fn anonymous_subject_with_no_inbound_reference_gets_anon_s_on_last_only() {
        let mut model = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        let b = blank("b2");
        model.insert(b.clone(), iri("http://x/a"), iri("http://x/v"), None);
        model.insert(b, iri("http://x/q"), iri("http://x/r"), None);
        let events = run(&model);
        assert_eq!(events.len(), 2);
        let flags: Vec<StatementFlags> = events
            .iter()
            .map(|e| match e {
                Event::Statement { flags, .. } => *flags,
                _ => panic!("expected a statement event"),
            })
            .collect();
        assert!(!flags[0].contains(StatementFlags::ANON_S));
        assert!(flags[1].contains(StatementFlags::ANON_S));
    }

    #[test]
    fn blank_referenced_twice_as_object_is_plain() {
        let mut model = Model::new(StatementOrder::Spo, ModelFlags::NONE);
        let b = blank("shared");
        model.insert(iri("http://x/s1"), iri("http://x/p"), b.clone(), None);
        model.insert(iri("http://x/s2"), iri("http://x/p"), b, None);
        let events = run(&model);
        for event in &events {
            if let Event::Statement { flags, .. } = event {
                assert!(!flags.contains(StatementFlags::ANON_O));
            }
        }
    }
}
