//! Cursors: a position in one index plus a pattern, with version-counter
//! based invalidation (§3 "Cursor").

use std::rc::Rc;

use crate::node::Node;
use crate::statement::Statement;
use crate::Status;

use super::order::StatementOrder;

/// How a cursor's underlying scan was chosen (§4.8 "Index selection").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// Every statement in the index matches the pattern; no filtering
    /// needed (empty pattern).
    All,
    /// The pattern became a contiguous range scan with no per-item
    /// filtering (an "ideal" ordering existed).
    Range,
    /// The pattern became a prefix scan plus per-item filtering.
    FilterRange,
    /// No ordering let the pattern become a range scan; every statement
    /// in the default index is checked.
    FilterAll,
}

/// A 4-field pattern, each position possibly a wildcard (`None`).
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    pub subject: Option<Node>,
    pub predicate: Option<Node>,
    pub object: Option<Node>,
    pub graph: Option<Node>,
}

impl Pattern {
    #[must_use]
    pub fn new(
        subject: Option<Node>,
        predicate: Option<Node>,
        object: Option<Node>,
        graph: Option<Node>,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph,
        }
    }

    /// Whether `statement` matches every non-wildcard field.
    #[must_use]
    pub fn matches(&self, statement: &Statement) -> bool {
        self.subject.as_ref().is_none_or(|n| n == statement.subject())
            && self.predicate.as_ref().is_none_or(|n| n == statement.predicate())
            && self.object.as_ref().is_none_or(|n| n == statement.object())
            && self
                .graph
                .as_ref()
                .is_none_or(|n| Some(n) == statement.graph())
    }

    /// The 3-bit signature from the presence of (s, p, o); `g` is handled
    /// separately by the index-selection algorithm (§4.8 step 1).
    #[must_use]
    pub fn spo_signature(&self) -> u8 {
        (u8::from(self.subject.is_some()) << 2)
            | (u8::from(self.predicate.is_some()) << 1)
            | u8::from(self.object.is_some())
    }
}

/// A snapshot of the statements matching a pattern at cursor-creation
/// time, plus the model version then in force.
///
/// Rather than holding a live borrowed range into the model's tree (which
/// would make the borrow checker itself forbid any mutation for the
/// cursor's whole lifetime, defeating the point of testing invalidation),
/// the cursor materialises its matching statement handles up front — cheap
/// `Rc` clones, not statement copies — and every access re-checks the
/// model's current version against the one captured at creation (§3
/// "Cursor", invariant iv).
pub struct Cursor {
    order: StatementOrder,
    mode: CursorMode,
    version_at_creation: u64,
    matches: Vec<Rc<Statement>>,
    position: usize,
}

impl Cursor {
    pub(crate) fn new(
        order: StatementOrder,
        mode: CursorMode,
        version_at_creation: u64,
        matches: Vec<Rc<Statement>>,
    ) -> Self {
        Self {
            order,
            mode,
            version_at_creation,
            matches,
            position: 0,
        }
    }

    #[must_use]
    pub fn order(&self) -> StatementOrder {
        self.order
    }

    #[must_use]
    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    /// Number of statements this cursor will yield in total.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Checks the cursor against the model's current version. Must be
    /// called (directly or via [`Self::next`]/[`Self::current`]) before
    /// every use.
    fn check(&self, current_version: u64) -> Result<(), Status> {
        if current_version == self.version_at_creation {
            Ok(())
        } else {
            Err(Status::BadCursor)
        }
    }

    /// The statement the cursor currently points at, or `None` at "end".
    pub fn current(&self, current_version: u64) -> Result<Option<&Statement>, Status> {
        self.check(current_version)?;
        Ok(self.matches.get(self.position).map(AsRef::as_ref))
    }

    /// Advances to the next statement. Returns `false` once the cursor has
    /// reached "end".
    pub fn advance(&mut self, current_version: u64) -> Result<bool, Status> {
        self.check(current_version)?;
        if self.position >= self.matches.len() {
            return Ok(false);
        }
        self.position += 1;
        Ok(self.position < self.matches.len())
    }

    /// Consumes the cursor, yielding an iterator over its remaining
    /// matches without further version checks — for callers (like the
    /// range writer) that have already validated the version once and
    /// want to drive the whole remainder in one pass.
    pub fn into_iter_unchecked(self) -> impl Iterator<Item = Rc<Statement>> {
        self.matches.into_iter().skip(self.position)
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
    fn pattern_signature_bits() {
        let p = Pattern::new(Some(iri("s")), None, Some(iri("o")), None);
        assert_eq!(p.spo_signature(), 0b101);
    }

    #[test]
    fn cursor_reports_bad_cursor_after_version_change() {
        let st = Rc::new(Statement::new(iri("s"), iri("p"), iri("o"), None));
        let cursor = Cursor::new(StatementOrder::Spo, CursorMode::All, 1, vec![st]);
        assert!(cursor.current(1).is_ok());
        assert_eq!(cursor.current(2), Err(Status::BadCursor));
    }
}
