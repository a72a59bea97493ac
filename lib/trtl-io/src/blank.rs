//! Blank-node identifier generation (§4.6 "Blank-node identifier
//! generation", §6 "Blank-node label grammar").
//!
//! Generated labels have the form `{docprefix}b{serial}` or, when the
//! input's own explicit labels already start with a lowercase `b`,
//! `{docprefix}B{serial}` instead — keeping the generated and explicit
//! namespaces disjoint so the two can never collide by construction.

use std::collections::HashSet;

/// Per-document blank-node label allocator and clash detector.
pub struct BlankNodeGenerator {
    docprefix: String,
    next_serial: u64,
    ordered: bool,
    use_capital: bool,
    seen_explicit: HashSet<String>,
}

impl BlankNodeGenerator {
    /// `docprefix` is `None` under the `GLOBAL` reader flag (generated
    /// labels are then bare `b{serial}`, suitable for merging output from
    /// multiple documents only when the caller guarantees no collisions).
    #[must_use]
    pub fn new(docprefix: Option<&str>, ordered: bool) -> Self {
        Self {
            docprefix: docprefix.unwrap_or_default().to_owned(),
            next_serial: 0,
            ordered,
            use_capital: false,
            seen_explicit: HashSet::new(),
        }
    }

    /// Records an explicit (author-supplied) blank label seen in the
    /// input, switching the generator's own serial letter to `B` if the
    /// label would otherwise collide with the `b`-prefixed generated
    /// namespace.
    pub fn observe_explicit(&mut self, label: &str) {
        if !self.use_capital && label.starts_with(|c: char| c == 'b') {
            self.use_capital = true;
        }
        self.seen_explicit.insert(label.to_owned());
    }

    /// `true` if `label` was already seen as an explicit label in this
    /// document (used to detect clashes against the generator's own
    /// scheme before it is too late to remap).
    #[must_use]
    pub fn clashes(&self, label: &str) -> bool {
        self.seen_explicit.contains(label)
    }

    /// Allocates a fresh, never-before-returned label.
    pub fn fresh(&mut self) -> String {
        loop {
            let serial = self.next_serial;
            self.next_serial += 1;
            let letter = if self.use_capital { 'B' } else { 'b' };
            let label = if self.ordered {
                format!("{}{letter}{serial:08}", self.docprefix)
            } else {
                format!("{}{letter}{serial}", self.docprefix)
            };
            if !self.seen_explicit.contains(&label) {
                return label;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_labels_are_disjoint_from_explicit_b_labels() {
        let mut gen = BlankNodeGenerator::new(Some("doc1"), false);
        gen.observe_explicit("b0");
        let label = gen.fresh();
        assert!(label.starts_with("doc1B"));
    }

    #[test]
    fn ordered_pads_serials_to_fixed_width() {
        let mut gen = BlankNodeGenerator::new(None, true);
        assert_eq!(gen.fresh(), "b00000000");
        assert_eq!(gen.fresh(), "b00000001");
    }

    #[test]
    fn global_flag_omits_docprefix() {
        let mut gen = BlankNodeGenerator::new(None, false);
        assert_eq!(gen.fresh(), "b0");
    }
}
