//! The lexical environment: base URI plus prefix map (§3 "Environment",
//! §4.3).

use crate::event::{Event, Sink};
use crate::node::{Node, NodeArgs, NodeKind};
use crate::Status;

/// A base URI and an ordered prefix-to-URI map.
///
/// Prefix lookup is by exact name match; the map is kept in insertion
/// order (so `describe` replays `@prefix` declarations in the order a
/// document defined them) rather than sorted, matching the spec's
/// "O(n) is acceptable; namespace maps are small" note.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    base: Option<String>,
    prefixes: Vec<(String, String)>,
}

impl Environment {
    /// A new environment with the given base (possibly empty).
    #[must_use]
    pub fn new(base: impl Into<Option<String>>) -> Self {
        Self {
            base: base.into().filter(|b| !b.is_empty()),
            prefixes: Vec::new(),
        }
    }

    /// Sets the base URI, canonicalising it (parse + re-serialise) first.
    pub fn set_base(&mut self, uri: &str) {
        if uri.is_empty() {
            self.base = None;
            return;
        }
        let view = trtl_uri::parse(uri);
        self.base = Some(trtl_uri::to_string(&view));
    }

    /// The current base URI, if any.
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Declares or replaces a prefix binding.
    pub fn set_prefix(&mut self, name: &str, uri: &str) {
        if let Some(entry) = self.prefixes.iter_mut().find(|(n, _)| n == name) {
            entry.1 = uri.to_owned();
        } else {
            self.prefixes.push((name.to_owned(), uri.to_owned()));
        }
    }

    /// Looks up a previously declared prefix's namespace URI.
    #[must_use]
    pub fn get_prefix(&self, name: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, uri)| uri.as_str())
    }

    /// Expands a CURIE `prefix:local` against the current prefix map,
    /// returning the namespace URI and the local suffix.
    pub fn expand(&self, prefix: &str, local: &str) -> Result<(String, String), Status> {
        let ns = self.get_prefix(prefix).ok_or(Status::BadCurie)?;
        Ok((ns.to_owned(), local.to_owned()))
    }

    /// Resolves a (possibly relative) IRI reference against the base.
    /// Returns the reference unchanged if no base is set and it is
    /// already absolute; fails with [`Status::BadUri`] for a relative
    /// reference with no base to resolve against.
    pub fn resolve(&self, reference: &str) -> Result<String, Status> {
        if trtl_uri::has_scheme(reference) {
            return Ok(reference.to_owned());
        }
        let base = self.base.as_deref().ok_or(Status::BadUri)?;
        let view = trtl_uri::resolve(reference, base);
        Ok(trtl_uri::to_string(&view))
    }

    /// Finds the longest-matching namespace for `absolute_uri` among the
    /// declared prefixes and returns `(prefix, local suffix)`.
    #[must_use]
    pub fn qualify<'a>(&'a self, absolute_uri: &'a str) -> Option<(&'a str, &'a str)> {
        self.prefixes
            .iter()
            .filter(|(_, ns)| absolute_uri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len())
            .map(|(name, ns)| (name.as_str(), &absolute_uri[ns.len()..]))
    }

    /// Calls `f` once per declared prefix, in declaration order.
    pub fn foreach(&self, mut f: impl FnMut(&str, &str)) {
        for (name, uri) in &self.prefixes {
            f(name, uri);
        }
    }

    /// Emits [`Event::Base`] (if a base is set) followed by one
    /// [`Event::Prefix`] per declared prefix, in declaration order.
    pub fn describe(&self, sink: &mut dyn Sink) -> Status {
        if let Some(base) = &self.base {
            let Ok(node) = Node::new(NodeArgs::Token(NodeKind::Iri, base)) else {
                return Status::BadUri;
            };
            let status = sink.handle(&Event::Base { uri: node });
            if !status.is_success() {
                return status;
            }
        }
        for (name, uri) in &self.prefixes {
            let Ok(name_node) = Node::new(NodeArgs::Token(NodeKind::Curie, name)) else {
                return Status::BadArg;
            };
            let Ok(uri_node) = Node::new(NodeArgs::Token(NodeKind::Iri, uri)) else {
                return Status::BadUri;
            };
            let status = sink.handle(&Event::Prefix {
                name: name_node,
                uri: uri_node,
            });
            if !status.is_success() {
                return status;
            }
        }
        Status::Success
    }

    /// A deep copy of this environment (§4.3 `copy`).
    #[must_use]
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Structural equality of base and prefix set (§4.3 `equals`). Order
    /// of declaration does not matter for equality even though it does
    /// for `describe`/`foreach`.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        if self.base != other.base {
            return false;
        }
        if self.prefixes.len() != other.prefixes.len() {
            return false;
        }
        self.prefixes
            .iter()
            .all(|(n, u)| other.get_prefix(n) == Some(u.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_prefix_replaces_existing_name() {
        let mut env = Environment::default();
        env.set_prefix("eg", "http://example.org/");
        env.set_prefix("eg", "http://example.com/");
        assert_eq!(env.get_prefix("eg"), Some("http://example.com/"));
    }

    #[test]
    fn qualify_picks_longest_matching_namespace() {
        let mut env = Environment::default();
        env.set_prefix("eg", "http://example.org/");
        env.set_prefix("egs", "http://example.org/sub/");
        let (prefix, local) = env.qualify("http://example.org/sub/x").unwrap();
        assert_eq!(prefix, "egs");
        assert_eq!(local, "x");
    }

    #[test]
    fn resolve_relative_against_base() {
        let mut env = Environment::default();
        env.set_base("http://example.org/a/b");
        assert_eq!(
            env.resolve("c").unwrap(),
            "http://example.org/a/c"
        );
        assert_eq!(
            env.resolve("http://other.org/").unwrap(),
            "http://other.org/"
        );
    }

    #[test]
    fn resolve_relative_without_base_fails() {
        let env = Environment::default();
        assert_eq!(env.resolve("foo"), Err(Status::BadUri));
    }

    #[test]
    fn equals_ignores_declaration_order() {
        let mut a = Environment::default();
        a.set_prefix("x", "http://x/");
        a.set_prefix("y", "http://y/");
        let mut b = Environment::default();
        b.set_prefix("y", "http://y/");
        b.set_prefix("x", "http://x/");
        assert!(a.equals(&b));
    }
}
