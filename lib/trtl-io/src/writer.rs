//! The pretty-printing Turtle/TriG/N-Triples/N-Quads writer (§4.7).
//!
//! N-Triples and N-Quads are line-based: every statement is written in
//! full, one line at a time, with no abbreviation whatsoever — the
//! [`Sink`] implementation below short-circuits straight to
//! [`Node`]'s own `Display` for those two formats and never touches the
//! buffering described below.
//!
//! Turtle and TriG abbreviate. The tricky part is that the reader emits
//! the *contents* of an anonymous node or collection before the
//! statement that references it (so the writer learns "this blank is a
//! bracketed object" only after already having seen its property list).
//! Rather than a live stack of open brackets, this writer defers:
//! every statement whose subject is a blank node is buffered in
//! [`Writer::pending`] (or, for `rdf:first`/`rdf:rest` links, in
//! [`Writer::pending_cons`]) until either a later statement references
//! that blank through its `ANON_S`/`ANON_O`/`LIST_S`/`LIST_O` flags (in
//! which case it is rendered inline as `[ ... ]` or `( ... )`) or the
//! graph/document ends with it unreferenced (in which case it is
//! flushed as an ordinary `_:label` statement). This also falls out of
//! nested brackets for free: resolving an outer bracket recursively
//! resolves any still-pending inner one, since inner content is always
//! buffered first.

use std::collections::HashMap;
use std::io::Write;

use trtl_core::event::{Event, Sink, StatementFlags};
use trtl_core::node::NodeKind;
use trtl_core::{Environment, Node, Statement, Status};

use crate::format::Format;
use crate::options::{WriterFlags, WriterOptions};
use crate::vocab::{rdf_first, rdf_nil, rdf_rest, rdf_type};

/// An object position whose final text is either an ordinary node (to be
/// written through the usual prefix/relative abbreviation) or a string
/// already rendered by resolving a nested bracket or list.
#[derive(Debug, Clone)]
enum NodeOrInline {
    Plain(Node),
    Rendered(String),
}

#[derive(Debug, Clone, Default)]
struct ConsCell {
    first: Option<NodeOrInline>,
    rest: Option<Node>,
}

/// Writes an event stream as Turtle, TriG, N-Triples, or N-Quads text.
pub struct Writer<W: Write> {
    sink: W,
    options: WriterOptions,
    env: Environment,
    current_graph: Option<Node>,
    graph_open: bool,
    root_subject: Option<Node>,
    root_predicate: Option<Node>,
    wrote_any: bool,
    pending: HashMap<Node, Vec<(Node, NodeOrInline)>>,
    pending_cons: HashMap<Node, ConsCell>,
    last_status: Status,
}

impl<W: Write> Writer<W> {
    #[must_use]
    pub fn new(sink: W, options: WriterOptions) -> Self {
        Self {
            sink,
            options,
            env: Environment::default(),
            current_graph: None,
            graph_open: false,
            root_subject: None,
            root_predicate: None,
            wrote_any: false,
            pending: HashMap::new(),
            pending_cons: HashMap::new(),
            last_status: Status::Success,
        }
    }

    #[must_use]
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// The worst [`Status`] seen across every event handled so far.
    #[must_use]
    pub fn status(&self) -> Status {
        self.last_status
    }

    /// Consumes the writer, returning the underlying byte sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write_raw(&mut self, text: &str) -> Status {
        if self.sink.write_all(text.as_bytes()).is_err() {
            return Status::BadWrite;
        }
        if !self.options.flags().contains(WriterFlags::BULK_FLUSH) && self.sink.flush().is_err() {
            return Status::BadWrite;
        }
        Status::Success
    }

    fn note(&mut self, status: Status) {
        self.last_status = self.last_status.worse(status);
    }

    // ---- N-Triples / N-Quads: no abbreviation, no buffering at all ----

    fn write_line_based(&mut self, statement: &Statement) -> Status {
        let mut line = String::new();
        line.push_str(&statement.subject().to_string());
        line.push(' ');
        line.push_str(&statement.predicate().to_string());
        line.push(' ');
        line.push_str(&self.render_literal_or_plain(statement.object()));
        if let Some(graph) = statement.graph() {
            line.push(' ');
            line.push_str(&graph.to_string());
        }
        line.push_str(" .\n");
        self.write_raw(&line)
    }

    fn render_literal_or_plain(&self, node: &Node) -> String {
        if self.options.flags().contains(WriterFlags::ASCII) {
            ascii_escape(&node.to_string())
        } else {
            node.to_string()
        }
    }

    // ---- Turtle / TriG pretty printing ----

    fn handle_pretty_statement(&mut self, statement: &Statement, flags: StatementFlags) -> Status {
        if self.options.format().supports_datasets() {
            let status = self.sync_graph(statement.graph());
            if !status.is_success() {
                return status;
            }
        }

        let subject = statement.subject().clone();
        let predicate = statement.predicate().clone();

        let subject_is_bracketed = flags.contains(StatementFlags::ANON_S) || flags.contains(StatementFlags::LIST_S);
        if subject.kind() == NodeKind::Blank && !subject_is_bracketed {
            if predicate == rdf_first() {
                let object = self.resolve_inline(statement.object());
                self.pending_cons.entry(subject).or_default().first = Some(object);
                return Status::Success;
            }
            if predicate == rdf_rest() {
                let rest = statement.object().clone();
                self.pending_cons.entry(subject).or_default().rest = Some(rest);
                return Status::Success;
            }
            let object = self.resolve_inline(statement.object());
            self.pending.entry(subject).or_default().push((predicate, object));
            return Status::Success;
        }

        let subject_repr = if flags.contains(StatementFlags::LIST_S) {
            self.render_list(&subject)
        } else if flags.contains(StatementFlags::ANON_S) {
            self.render_bracket(&subject)
        } else {
            NodeOrInline::Plain(subject)
        };

        let object_repr = if flags.contains(StatementFlags::LIST_O) {
            self.render_list(statement.object())
        } else if flags.contains(StatementFlags::ANON_O) {
            self.render_bracket(statement.object())
        } else {
            self.resolve_inline(statement.object())
        };

        self.write_root_triple(subject.clone(), subject_repr, predicate, object_repr)
    }

    /// Resolves a node that might be the head of an already-buffered
    /// bracket or list into its final text, or passes it through
    /// unresolved if it is an ordinary node.
    fn resolve_inline(&mut self, node: &Node) -> NodeOrInline {
        if node.kind() == NodeKind::Blank {
            if self.pending.contains_key(node) {
                return self.render_bracket(node);
            }
            if self.pending_cons.contains_key(node) {
                return self.render_list(node);
            }
        }
        NodeOrInline::Plain(node.clone())
    }

    fn render_bracket(&mut self, node: &Node) -> NodeOrInline {
        // A second `ANON_S`/`ANON_O`-flagged statement for the same blank
        // subject (additional predicates appended after its brackets
        // already closed) finds nothing left to consume here and falls
        // back to a plain label; such documents are rare enough that this
        // library renders them as a separate statement rather than
        // reopening the bracket.
        let Some(pairs) = self.pending.remove(node) else {
            return NodeOrInline::Plain(node.clone());
        };
        if pairs.is_empty() {
            return NodeOrInline::Rendered("[]".to_owned());
        }
        let mut out = String::from("[ ");
        for (i, (predicate, object)) in pairs.into_iter().enumerate() {
            if i > 0 {
                out.push_str(" ; ");
            }
            self.push_predicate(&mut out, &predicate);
            out.push(' ');
            self.push_inline(&mut out, &object);
        }
        out.push_str(" ]");
        NodeOrInline::Rendered(out)
    }

    fn render_list(&mut self, head: &Node) -> NodeOrInline {
        if *head == rdf_nil() {
            return NodeOrInline::Rendered("()".to_owned());
        }
        let mut out = String::from("(");
        let mut current = head.clone();
        while let Some(cell) = self.pending_cons.remove(&current) {
            if let Some(item) = cell.first {
                out.push(' ');
                self.push_inline(&mut out, &item);
            }
            match cell.rest {
                Some(rest) if rest == rdf_nil() => break,
                Some(rest) => current = rest,
                None => break,
            }
        }
        out.push_str(" )");
        NodeOrInline::Rendered(out)
    }

    fn push_inline(&self, out: &mut String, repr: &NodeOrInline) {
        match repr {
            NodeOrInline::Plain(node) => self.push_node(out, node),
            NodeOrInline::Rendered(text) => out.push_str(text),
        }
    }

    fn push_predicate(&self, out: &mut String, predicate: &Node) {
        if *predicate == rdf_type() {
            out.push('a');
        } else {
            self.push_node(out, predicate);
        }
    }

    fn push_node(&self, out: &mut String, node: &Node) {
        match node.kind() {
            NodeKind::Iri => self.push_iri(out, node),
            NodeKind::Literal => self.push_literal(out, node),
            _ => out.push_str(&node.to_string()),
        }
    }

    fn push_iri(&self, out: &mut String, node: &Node) {
        let value = node.value();
        if let Some((prefix, local)) = self.env.qualify(value) {
            if let Some(escaped) = escape_local_name(local) {
                out.push_str(prefix);
                out.push(':');
                out.push_str(&escaped);
                return;
            }
        }
        if let Some(base) = self.env.base() {
            if trtl_uri::is_within(value, base) {
                let relative = trtl_uri::relativise(value, base);
                out.push('<');
                out.push_str(&trtl_uri::to_string(&relative));
                out.push('>');
                return;
            }
        }
        out.push('<');
        out.push_str(value);
        out.push('>');
    }

    fn push_literal(&self, out: &mut String, node: &Node) {
        use trtl_core::node::xsd;
        let value = node.value();
        let inline = match node.datatype().map(Node::value) {
            Some(dt) if dt == xsd::BOOLEAN => is_turtle_boolean(value),
            Some(dt) if dt == xsd::INTEGER => is_turtle_integer(value),
            Some(dt) if dt == xsd::DECIMAL => is_turtle_decimal(value),
            Some(dt) if dt == xsd::DOUBLE => is_turtle_double(value),
            _ => false,
        };
        if inline {
            out.push_str(value);
            return;
        }
        let text = self.render_literal_or_plain(node);
        out.push_str(&text);
    }

    /// `subject_key` is the real node identity behind `subject`, even when
    /// `subject` itself is a `Rendered` bracket/list with no `Node` to
    /// compare against — tracking it separately lets a second statement
    /// that shares the same (already-bracketed) subject continue with
    /// `;` instead of re-rendering an empty bracket.
    fn write_root_triple(
        &mut self,
        subject_key: Node,
        subject: NodeOrInline,
        predicate: Node,
        object: NodeOrInline,
    ) -> Status {
        let same_subject = self.root_subject.as_ref() == Some(&subject_key);
        let mut out = String::new();
        if same_subject {
            if self.root_predicate.as_ref() == Some(&predicate) {
                out.push_str(" ,\n    ");
                self.push_inline(&mut out, &object);
            } else {
                out.push_str(" ;\n  ");
                self.push_predicate(&mut out, &predicate);
                out.push(' ');
                self.push_inline(&mut out, &object);
                self.root_predicate = Some(predicate);
            }
        } else {
            if self.wrote_any && self.root_subject.is_some() {
                out.push_str(" .\n");
            }
            self.push_inline(&mut out, &subject);
            out.push(' ');
            self.push_predicate(&mut out, &predicate);
            out.push(' ');
            self.push_inline(&mut out, &object);
            self.root_subject = Some(subject_key);
            self.root_predicate = Some(predicate);
        }
        self.wrote_any = true;
        self.write_raw(&out)
    }

    fn close_root_statement(&mut self) -> Status {
        if self.root_subject.is_some() || self.root_predicate.is_some() {
            self.root_subject = None;
            self.root_predicate = None;
            return self.write_raw(" .\n");
        }
        Status::Success
    }

    fn sync_graph(&mut self, graph: Option<&Node>) -> Status {
        if graph == self.current_graph.as_ref() {
            return Status::Success;
        }
        let mut status = self.close_root_statement();
        if !status.is_success() {
            return status;
        }
        status = self.flush_pending();
        if !status.is_success() {
            return status;
        }
        if self.graph_open {
            status = self.write_raw("}\n");
            self.graph_open = false;
            if !status.is_success() {
                return status;
            }
        }
        self.current_graph = graph.cloned();
        if let Some(g) = graph {
            let mut out = String::new();
            self.push_node(&mut out, g);
            out.push_str(" {\n");
            self.graph_open = true;
            return self.write_raw(&out);
        }
        Status::Success
    }

    /// Writes out any still-buffered blank subjects that nothing ever
    /// referenced as a bracket or list, as ordinary `_:label` statements.
    fn flush_pending(&mut self) -> Status {
        let leftovers: Vec<_> = self.pending.drain().collect();
        let mut status = Status::Success;
        for (subject, pairs) in leftovers {
            let mut out = String::new();
            out.push_str(&subject.to_string());
            for (i, (predicate, object)) in pairs.into_iter().enumerate() {
                out.push(' ');
                if i > 0 {
                    out.push_str(" ;\n  ");
                }
                self.push_predicate(&mut out, &predicate);
                out.push(' ');
                self.push_inline(&mut out, &object);
            }
            out.push_str(" .\n");
            status = status.worse(self.write_raw(&out));
        }
        let leftover_cells: Vec<_> = self.pending_cons.keys().cloned().collect();
        for cell in leftover_cells {
            if !self.pending_cons.contains_key(&cell) {
                continue;
            }
            let rendered = self.render_list(&cell);
            let mut out = String::new();
            self.push_inline(&mut out, &rendered);
            out.push_str(" .\n");
            status = status.worse(self.write_raw(&out));
        }
        status
    }
}

impl<W: Write> Sink for Writer<W> {
    fn handle(&mut self, event: &Event) -> Status {
        let status = match event {
            Event::Base { uri } => {
                let status = self.close_root_statement();
                if !status.is_success() {
                    return status;
                }
                self.env.set_base(uri.value());
                let text = format!("@base <{}> .\n", uri.value());
                self.write_raw(&text)
            }
            Event::Prefix { name, uri } => {
                let status = self.close_root_statement();
                if !status.is_success() {
                    return status;
                }
                self.env.set_prefix(name.value(), uri.value());
                let text = format!("@prefix {}: <{}> .\n", name.value(), uri.value());
                self.write_raw(&text)
            }
            Event::Statement { statement, flags } => {
                if self.options.format().is_line_based() {
                    self.write_line_based(statement)
                } else {
                    self.handle_pretty_statement(statement, *flags)
                }
            }
            Event::End { node } => {
                // Brackets are resolved lazily by `resolve_inline`/
                // `render_bracket` when referenced; an `End` that
                // arrives for a node already rendered (or never
                // buffered) is a no-op.
                let _ = node;
                Status::Success
            }
        };
        self.note(status);
        status
    }

    fn finish(&mut self) -> Status {
        let mut status = self.close_root_statement();
        if !status.is_success() {
            return status;
        }
        status = self.flush_pending();
        if !status.is_success() {
            return status;
        }
        if self.graph_open {
            status = self.write_raw("}\n");
            self.graph_open = false;
        }
        if self.sink.flush().is_err() {
            status = status.worse(Status::BadWrite);
        }
        status
    }
}

impl<W: Write> Drop for Writer<W> {
    fn drop(&mut self) {
        let _ = self.finish();
    }
}

fn is_turtle_boolean(value: &str) -> bool {
    matches!(value, "true" | "false")
}

fn is_turtle_integer(value: &str) -> bool {
    let mut value = value.as_bytes();
    if let Some(v) = value.strip_prefix(b"+").or_else(|| value.strip_prefix(b"-")) {
        value = v;
    }
    !value.is_empty() && value.iter().all(u8::is_ascii_digit)
}

fn is_turtle_decimal(value: &str) -> bool {
    let mut value = value.as_bytes();
    if let Some(v) = value.strip_prefix(b"+").or_else(|| value.strip_prefix(b"-")) {
        value = v;
    }
    while value.first().is_some_and(u8::is_ascii_digit) {
        value = &value[1..];
    }
    let Some(value) = value.strip_prefix(b".") else {
        return false;
    };
    !value.is_empty() && value.iter().all(u8::is_ascii_digit)
}

fn is_turtle_double(value: &str) -> bool {
    let mut value = value.as_bytes();
    if let Some(v) = value.strip_prefix(b"+").or_else(|| value.strip_prefix(b"-")) {
        value = v;
    }
    let mut with_before = false;
    while value.first().is_some_and(u8::is_ascii_digit) {
        value = &value[1..];
        with_before = true;
    }
    let mut with_after = false;
    if let Some(v) = value.strip_prefix(b".") {
        value = v;
        while value.first().is_some_and(u8::is_ascii_digit) {
            value = &value[1..];
            with_after = true;
        }
    }
    let Some(value) = value.strip_prefix(b"e").or_else(|| value.strip_prefix(b"E")) else {
        return false;
    };
    let value = value.strip_prefix(b"+").or_else(|| value.strip_prefix(b"-")).unwrap_or(value);
    (with_before || with_after) && !value.is_empty() && value.iter().all(u8::is_ascii_digit)
}

/// A conservative, ASCII-only `PN_LOCAL` escaper: accepts alphanumerics,
/// `_`/`-`/`.`, and the punctuation Turtle allows `\`-escaped, falling
/// back to `None` (and so to the absolute-IRI form) for anything
/// outside that set rather than chasing the full Unicode `PN_CHARS`
/// grammar.
fn escape_local_name(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' || c == ':' {
            out.push(c);
        } else if matches!(
            c,
            '~' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '=' | '/' | '?' | '#' | '@' | '%'
        ) {
            out.push('\\');
            out.push(c);
        } else {
            return None;
        }
    }
    Some(out)
}

/// Rewrites every non-ASCII character in `text` as a `\uXXXX`/`\UXXXXXXXX`
/// escape, for [`WriterFlags::ASCII`] output.
fn ascii_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let cp = c as u32;
            if cp <= 0xFFFF {
                out.push_str(&format!("\\u{cp:04X}"));
            } else {
                out.push_str(&format!("\\U{cp:08X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use trtl_core::node::{NodeArgs, NodeKind};
    use trtl_core::Statement;

    fn iri(s: &str) -> Node {
        Node::new(NodeArgs::Token(NodeKind::Iri, s)).unwrap()
    }

    fn blank(s: &str) -> Node {
        Node::new(NodeArgs::Token(NodeKind::Blank, s)).unwrap()
    }

    #[test]
    fn writes_simple_ntriples_line() {
        let mut w = Writer::new(Vec::new(), WriterOptions::new(Format::NTriples));
        w.handle(&Event::Statement {
            statement: Statement::new(iri("http://x/s"), iri("http://x/p"), iri("http://x/o"), None),
            flags: StatementFlags::NONE,
        });
        w.finish();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(out, "<http://x/s> <http://x/p> <http://x/o> .\n");
    }

    #[test]
    fn turtle_abbreviates_repeated_subject_with_semicolon() {
        let mut w = Writer::new(Vec::new(), WriterOptions::new(Format::Turtle));
        let s = iri("http://x/s");
        w.handle(&Event::Statement {
            statement: Statement::new(s.clone(), iri("http://x/p1"), iri("http://x/o1"), None),
            flags: StatementFlags::NONE,
        });
        w.handle(&Event::Statement {
            statement: Statement::new(s, iri("http://x/p2"), iri("http://x/o2"), None),
            flags: StatementFlags::NONE,
        });
        w.finish();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.contains(" ;\n"));
        assert!(out.trim_end().ends_with('.'));
    }

    #[test]
    fn rdf_type_predicate_abbreviates_to_a() {
        let mut w = Writer::new(Vec::new(), WriterOptions::new(Format::Turtle));
        w.handle(&Event::Statement {
            statement: Statement::new(iri("http://x/s"), rdf_type(), iri("http://x/T"), None),
            flags: StatementFlags::NONE,
        });
        w.finish();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.contains(" a <http://x/T>"));
    }

    #[test]
    fn anonymous_object_renders_as_bracket() {
        let mut w = Writer::new(Vec::new(), WriterOptions::new(Format::Turtle));
        let b = blank("b0");
        w.handle(&Event::Statement {
            statement: Statement::new(b.clone(), iri("http://x/inner"), iri("http://x/v"), None),
            flags: StatementFlags::NONE,
        });
        w.handle(&Event::Statement {
            statement: Statement::new(iri("http://x/s"), iri("http://x/p"), b.clone(), None),
            flags: StatementFlags::ANON_O,
        });
        w.handle(&Event::End { node: b });
        w.finish();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.contains("[ <http://x/inner> <http://x/v> ]"));
    }

    #[test]
    fn collection_object_renders_as_parens() {
        let mut w = Writer::new(Vec::new(), WriterOptions::new(Format::Turtle));
        let cell0 = blank("c0");
        let cell1 = blank("c1");
        let one = Node::new(NodeArgs::Integer(1)).unwrap();
        let two = Node::new(NodeArgs::Integer(2)).unwrap();
        w.handle(&Event::Statement {
            statement: Statement::new(cell0.clone(), rdf_first(), one, None),
            flags: StatementFlags::NONE,
        });
        w.handle(&Event::Statement {
            statement: Statement::new(cell0.clone(), rdf_rest(), cell1.clone(), None),
            flags: StatementFlags::NONE,
        });
        w.handle(&Event::Statement {
            statement: Statement::new(cell1.clone(), rdf_first(), two, None),
            flags: StatementFlags::NONE,
        });
        w.handle(&Event::Statement {
            statement: Statement::new(cell1, rdf_rest(), rdf_nil(), None),
            flags: StatementFlags::NONE,
        });
        w.handle(&Event::Statement {
            statement: Statement::new(iri("http://x/s"), iri("http://x/p"), cell0, None),
            flags: StatementFlags::LIST_O,
        });
        w.finish();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.contains("( 1 2 )"));
    }

    #[test]
    fn anonymous_subject_with_two_trailing_predicates_stays_one_bracket() {
        let mut w = Writer::new(Vec::new(), WriterOptions::new(Format::Turtle));
        let b = blank("b1");
        w.handle(&Event::Statement {
            statement: Statement::new(b.clone(), iri("http://x/a"), iri("http://x/v"), None),
            flags: StatementFlags::NONE,
        });
        w.handle(&Event::Statement {
            statement: Statement::new(b.clone(), iri("http://x/q"), iri("http://x/r"), None),
            flags: StatementFlags::ANON_S,
        });
        w.handle(&Event::Statement {
            statement: Statement::new(b, iri("http://x/s"), iri("http://x/t"), None),
            flags: StatementFlags::ANON_S,
        });
        w.finish();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.contains("[ <http://x/a> <http://x/v> ]"));
        assert_eq!(out.matches('[').count(), 1, "second ANON_S statement must continue, not reopen, the bracket");
    }

    #[test]
    fn unreferenced_blank_subject_flushes_with_label() {
        let mut w = Writer::new(Vec::new(), WriterOptions::new(Format::Turtle));
        w.handle(&Event::Statement {
            statement: Statement::new(blank("b9"), iri("http://x/p"), iri("http://x/o"), None),
            flags: StatementFlags::NONE,
        });
        w.finish();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.contains("_:b9"));
    }

    #[test]
    fn prefix_declared_iri_abbreviates() {
        let mut w = Writer::new(Vec::new(), WriterOptions::new(Format::Turtle));
        w.handle(&Event::Prefix {
            name: Node::new(NodeArgs::Token(NodeKind::Curie, "eg")).unwrap(),
            uri: iri("http://example.org/"),
        });
        w.handle(&Event::Statement {
            statement: Statement::new(
                iri("http://example.org/s"),
                iri("http://example.org/p"),
                iri("http://example.org/o"),
                None,
            ),
            flags: StatementFlags::NONE,
        });
        w.finish();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.contains("eg:s eg:p eg:o"));
    }

    #[test]
    fn ascii_flag_escapes_non_ascii_literal() {
        let opts = WriterOptions::new(Format::NTriples).with_flags(WriterFlags::ASCII);
        let mut w = Writer::new(Vec::new(), opts);
        let lit = Node::new(NodeArgs::Literal {
            text: "caf\u{e9}",
            meta: None,
        })
        .unwrap();
        w.handle(&Event::Statement {
            statement: Statement::new(iri("http://x/s"), iri("http://x/p"), lit, None),
            flags: StatementFlags::NONE,
        });
        w.finish();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.contains("\\u00E9"));
    }
}
