//! The streaming reader: a hand-written recursive-descent parser for the
//! union of Turtle, TriG, N-Triples and N-Quads (§4.6).
//!
//! N-Triples and N-Quads are syntactic subsets of Turtle/TriG, so rather
//! than a second grammar this drives the same parsing functions for every
//! [`Format`] and leans on the caller's choice of format only to pick the
//! right default graph handling and to reject directives/abbreviation
//! sugar the line-oriented formats don't define. A short read from the
//! underlying source simply blocks inside `std::io::Read::read` the way
//! any synchronous reader does; the `NO_DATA`/short-read resumption
//! described for non-blocking sources is therefore the caller's own
//! concern when they hand in a non-blocking `Read` impl, not something
//! this parser schedules around itself.

use std::io::Read;

use trtl_core::event::{Sink, StatementFlags};
use trtl_core::node::{LiteralMeta, NodeArgs, NodeKind};
use trtl_core::{Caret, Environment, Node, Status};

use crate::blank::BlankNodeGenerator;
use crate::error::ReaderError;
use crate::format::Format;
use crate::options::{ReaderFlags, ReaderOptions};
use crate::source::ByteSource;
use crate::vocab::{rdf_first, rdf_nil, rdf_rest, rdf_type};

/// Streaming reader over a byte source.
pub struct Reader<R> {
    source: ByteSource<R>,
    options: ReaderOptions,
    env: Environment,
    blanks: BlankNodeGenerator,
    document: String,
    depth: usize,
    graph: Option<Node>,
    done: bool,
}

type PResult<T> = Result<T, ReaderError>;

impl<R: Read> Reader<R> {
    #[must_use]
    pub fn new(source: R, options: ReaderOptions, document: impl Into<String>) -> Self {
        let ordered = options.flags().contains(ReaderFlags::ORDERED);
        let global = options.flags().contains(ReaderFlags::GLOBAL);
        let prefix = if global {
            None
        } else {
            Some(options.blank_prefix.clone().unwrap_or_default())
        };
        Self {
            source: ByteSource::new(source),
            options,
            env: Environment::default(),
            blanks: BlankNodeGenerator::new(prefix.as_deref(), ordered),
            document: document.into(),
            depth: 0,
            graph: None,
            done: false,
        }
    }

    fn err(&mut self, status: Status, message: impl Into<String>) -> ReaderError {
        let (line, column) = self.source.position();
        ReaderError::new(status, line, column, message)
    }

    fn io(&mut self, status: Status) -> ReaderError {
        self.err(status, "I/O error")
    }

    fn peek(&mut self) -> PResult<Option<u8>> {
        self.source.peek().map_err(|s| self.io(s))
    }

    fn peek2(&mut self) -> PResult<Option<u8>> {
        self.source.peek2().map_err(|s| self.io(s))
    }

    fn advance(&mut self) -> PResult<Option<u8>> {
        self.source.advance().map_err(|s| self.io(s))
    }

    fn caret(&mut self) -> Caret {
        let (line, column) = self.source.position();
        Caret::new(self.document.clone(), line, column)
    }

    /// Skips whitespace and `#`-to-end-of-line comments.
    fn skip_trivia(&mut self) -> PResult<()> {
        loop {
            match self.peek()? {
                Some(b) if b.is_ascii_whitespace() => {
                    self.advance()?;
                }
                Some(b'#') => {
                    self.source.skip_until_byte(b'\n').map_err(|s| self.io(s))?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn expect(&mut self, b: u8, what: &str) -> PResult<()> {
        if self.source.eat(b).map_err(|s| self.io(s))? {
            Ok(())
        } else {
            Err(self.err(Status::BadSyntax, format!("expected {what}")))
        }
    }

    fn lax(&self) -> bool {
        self.options.flags().contains(ReaderFlags::LAX)
    }

    /// Drives the reader to end of input.
    pub fn read_document(&mut self, sink: &mut dyn Sink) -> Result<(), ReaderError> {
        while self.read_chunk(sink)? {}
        Ok(())
    }

    /// Reads exactly one top-level form: a directive, a `GRAPH`/bare graph
    /// block (TriG), or a subject-triples group ending with `.`. Returns
    /// `Ok(false)` once the input is exhausted.
    pub fn read_chunk(&mut self, sink: &mut dyn Sink) -> Result<bool, ReaderError> {
        loop {
            self.skip_trivia()?;
            let Some(b) = self.peek()? else {
                self.done = true;
                return Ok(false);
            };
            let result = match b {
                b'@' => self.parse_at_directive(sink),
                _ if self.looks_like_keyword(b"BASE") => self.parse_sparql_base(sink),
                _ if self.looks_like_keyword(b"PREFIX") => self.parse_sparql_prefix(sink),
                _ if self.looks_like_keyword(b"GRAPH") => self.parse_graph_block(sink, true),
                b'{' => self.parse_graph_block(sink, false),
                _ => self.parse_subject_triples(sink),
            };
            match result {
                Ok(()) => return Ok(true),
                Err(e) if self.lax() && e.status.is_lax_recoverable() => {
                    trtl_core::transform::log_lax_recovery(e.line, e.column, e.status);
                    self.resynchronise()?;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn resynchronise(&mut self) -> PResult<()> {
        if self.options.format().is_line_based() {
            self.source.skip_until_byte(b'\n').map_err(|s| self.io(s))
        } else {
            self.source.skip_until_byte(b'.').map_err(|s| self.io(s))
        }
    }

    /// Case-insensitive, whole-word keyword lookahead that never consumes
    /// input: every byte of `keyword` must match, and the byte right after
    /// it must not be a prefixed-name continuation character, so `bar:s`,
    /// `geo:x` and `based:x` fall through to `parse_subject_triples`
    /// instead of being misrouted into a `BASE`/`PREFIX`/`GRAPH` directive
    /// parse. Mirrors how `parse_verb` disambiguates the `a` keyword from
    /// a prefixed name starting with `a`.
    fn looks_like_keyword(&mut self, keyword: &[u8]) -> bool {
        for (i, &expected) in keyword.iter().enumerate() {
            let Ok(Some(b)) = self.source.peek_at(i) else {
                return false;
            };
            if b.to_ascii_uppercase() != expected {
                return false;
            }
        }
        let next = self.source.peek_at(keyword.len()).ok().flatten();
        !self.is_pname_continuation(next)
    }

    fn parse_at_directive(&mut self, sink: &mut dyn Sink) -> PResult<()> {
        self.advance()?;
        if self.eat_word("base")? {
            self.skip_trivia()?;
            let iri = self.parse_iriref_raw()?;
            self.set_base(sink, &iri)?;
            self.skip_trivia()?;
            self.expect(b'.', "'.' after @base")?;
            Ok(())
        } else if self.eat_word("prefix")? {
            self.skip_trivia()?;
            let name = self.parse_prefix_name()?;
            self.skip_trivia()?;
            self.expect(b':', "':' after prefix name")?;
            self.skip_trivia()?;
            let iri = self.parse_iriref_raw()?;
            self.set_prefix(sink, &name, &iri)?;
            self.skip_trivia()?;
            self.expect(b'.', "'.' after @prefix")?;
            Ok(())
        } else {
            Err(self.err(Status::BadSyntax, "unknown '@' directive"))
        }
    }

    fn parse_sparql_base(&mut self, sink: &mut dyn Sink) -> PResult<()> {
        self.expect_word_ci("base")?;
        self.skip_trivia()?;
        let iri = self.parse_iriref_raw()?;
        self.set_base(sink, &iri)
    }

    fn parse_sparql_prefix(&mut self, sink: &mut dyn Sink) -> PResult<()> {
        self.expect_word_ci("prefix")?;
        self.skip_trivia()?;
        let name = self.parse_prefix_name()?;
        self.skip_trivia()?;
        self.expect(b':', "':' after prefix name")?;
        self.skip_trivia()?;
        let iri = self.parse_iriref_raw()?;
        self.set_prefix(sink, &name, &iri)
    }

    fn set_base(&mut self, sink: &mut dyn Sink, iri: &str) -> PResult<()> {
        let resolved = self.env.resolve(iri).map_err(|s| self.err(s, "could not resolve base IRI"))?;
        self.env.set_base(&resolved);
        let node = self.node(NodeArgs::Token(NodeKind::Iri, &resolved))?;
        let status = sink.base(node);
        self.check(status)
    }

    fn set_prefix(&mut self, sink: &mut dyn Sink, name: &str, iri: &str) -> PResult<()> {
        let resolved = self.env.resolve(iri).map_err(|s| self.err(s, "could not resolve prefix IRI"))?;
        self.env.set_prefix(name, &resolved);
        let name_node = self.node(NodeArgs::Token(NodeKind::Curie, name))?;
        let uri_node = self.node(NodeArgs::Token(NodeKind::Iri, &resolved))?;
        let status = sink.prefix(name_node, uri_node);
        self.check(status)
    }

    fn check(&mut self, status: Status) -> PResult<()> {
        if status.is_success() {
            Ok(())
        } else {
            Err(self.err(status, "sink rejected event"))
        }
    }

    fn node(&mut self, args: NodeArgs<'_>) -> PResult<Node> {
        Node::new(args).map_err(|e| self.err(e.status(), e.to_string()))
    }

    /// Consumes a bare word (already positioned right after `@`),
    /// returning whether it matched exactly.
    fn eat_word(&mut self, word: &str) -> PResult<bool> {
        for expected in word.bytes() {
            if self.peek()? != Some(expected) {
                return Ok(false);
            }
            self.advance()?;
        }
        Ok(true)
    }

    fn expect_word_ci(&mut self, word: &str) -> PResult<()> {
        for expected in word.bytes() {
            match self.advance()? {
                Some(b) if b.to_ascii_lowercase() == expected => {}
                _ => return Err(self.err(Status::BadSyntax, format!("expected keyword {word:?}"))),
            }
        }
        Ok(())
    }

    fn parse_graph_block(&mut self, sink: &mut dyn Sink, has_keyword: bool) -> PResult<()> {
        if has_keyword {
            self.expect_word_ci("graph")?;
            self.skip_trivia()?;
        }
        let graph = if self.peek()? == Some(b'{') {
            None
        } else {
            Some(self.parse_subject_node(sink)?.0)
        };
        self.skip_trivia()?;
        self.expect(b'{', "'{' to open graph block")?;
        let previous = self.graph.clone();
        self.graph = graph;
        self.enter()?;
        let result = self.parse_graph_block_body(sink);
        self.leave();
        self.graph = previous;
        result
    }

    fn parse_graph_block_body(&mut self, sink: &mut dyn Sink) -> PResult<()> {
        loop {
            self.skip_trivia()?;
            if self.source.eat(b'}').map_err(|s| self.io(s))? {
                return Ok(());
            }
            self.parse_subject_triples(sink)?;
        }
    }

    fn parse_subject_triples(&mut self, sink: &mut dyn Sink) -> PResult<()> {
        let (subject, subject_kind) = self.parse_subject_node(sink)?;
        self.skip_trivia()?;
        if matches!(subject_kind, SubjectKind::Collection | SubjectKind::Anon) && self.peek()? == Some(b'.') {
            self.advance()?;
            return Ok(());
        }
        self.parse_predicate_object_list(sink, &subject, subject_kind)?;
        self.skip_trivia()?;
        self.expect(b'.', "'.' to terminate statement")?;
        Ok(())
    }

    fn parse_subject_node(&mut self, sink: &mut dyn Sink) -> PResult<(Node, SubjectKind)> {
        self.skip_trivia()?;
        match self.peek()? {
            Some(b'(') => Ok((self.parse_collection(sink)?, SubjectKind::Collection)),
            Some(b'[') => {
                let (node, empty) = self.parse_anon(sink)?;
                Ok((
                    node,
                    if empty {
                        SubjectKind::EmptyAnon
                    } else {
                        SubjectKind::Anon
                    },
                ))
            }
            _ => Ok((self.parse_term(sink, TermPosition::Subject)?, SubjectKind::Plain)),
        }
    }

    fn parse_predicate_object_list(
        &mut self,
        sink: &mut dyn Sink,
        subject: &Node,
        subject_kind: SubjectKind,
    ) -> PResult<()> {
        loop {
            self.skip_trivia()?;
            let predicate = self.parse_verb(sink)?;
            self.parse_object_list(sink, subject, subject_kind, &predicate)?;
            self.skip_trivia()?;
            if self.source.eat(b';').map_err(|s| self.io(s))? {
                self.skip_trivia()?;
                if matches!(self.peek()?, Some(b'.') | Some(b']') | None) {
                    return Ok(());
                }
                continue;
            }
            return Ok(());
        }
    }

    fn parse_verb(&mut self, sink: &mut dyn Sink) -> PResult<Node> {
        if self.peek()? == Some(b'a') && !self.is_pname_continuation(self.peek2()?) {
            self.advance()?;
            return Ok(rdf_type());
        }
        self.parse_term(sink, TermPosition::Predicate)
    }

    fn is_pname_continuation(&self, b: Option<u8>) -> bool {
        matches!(b, Some(c) if c.is_ascii_alphanumeric() || c == b'_' || c == b'-' || c == b':' || c == b'.')
    }

    fn parse_object_list(
        &mut self,
        sink: &mut dyn Sink,
        subject: &Node,
        subject_kind: SubjectKind,
        predicate: &Node,
    ) -> PResult<()> {
        loop {
            self.skip_trivia()?;
            let (object, object_kind) = self.parse_object_node(sink)?;
            let graph = match self.parse_inline_graph_term(sink)? {
                Some(graph) => Some(graph),
                None => self.graph.clone(),
            };
            let flags = self.statement_flags(subject_kind, &object_kind, graph.is_none());
            let statement = trtl_core::Statement::new(subject.clone(), predicate.clone(), object, graph)
                .with_caret(self.caret());
            let status = sink.statement(statement, flags);
            self.check(status)?;
            if let ObjectKind::Anon { node, empty: false } = object_kind {
                let end_status = sink.end(node);
                self.check(end_status)?;
            }
            self.skip_trivia()?;
            if self.source.eat(b',').map_err(|s| self.io(s))? {
                continue;
            }
            return Ok(());
        }
    }

    /// Parses the optional trailing graph term N-Quads (and a bare TriG
    /// statement outside any `GRAPH`/`{ }` block) carries between the
    /// object and the terminating `.`. Invisible inside an explicit graph
    /// block (`self.graph` already set) and inside nested collections or
    /// anonymous-node property lists (`self.depth > 0`), where no format
    /// defines a graph term.
    fn parse_inline_graph_term(&mut self, sink: &mut dyn Sink) -> PResult<Option<Node>> {
        if self.depth != 0 || self.graph.is_some() || !self.options.format().supports_datasets() {
            return Ok(None);
        }
        self.skip_trivia()?;
        match self.peek()? {
            Some(b'.' | b',' | b';') | None => Ok(None),
            _ => Ok(Some(self.parse_term(sink, TermPosition::Graph)?)),
        }
    }

    fn statement_flags(&self, subject_kind: SubjectKind, object_kind: &ObjectKind, empty_graph: bool) -> StatementFlags {
        let mut flags = StatementFlags::NONE;
        flags = match subject_kind {
            SubjectKind::Collection => flags.union(StatementFlags::LIST_S),
            SubjectKind::Anon => flags.union(StatementFlags::ANON_S),
            SubjectKind::EmptyAnon => flags.union(StatementFlags::EMPTY_S),
            SubjectKind::Plain => flags,
        };
        flags = match object_kind {
            ObjectKind::Collection => flags.union(StatementFlags::LIST_O),
            ObjectKind::Anon { empty: false, .. } => flags.union(StatementFlags::ANON_O),
            ObjectKind::Anon { empty: true, .. } => flags.union(StatementFlags::EMPTY_O),
            ObjectKind::Plain => flags,
        };
        if empty_graph {
            flags = flags.union(StatementFlags::EMPTY_G);
        }
        flags
    }

    fn parse_object_node(&mut self, sink: &mut dyn Sink) -> PResult<(Node, ObjectKind)> {
        self.skip_trivia()?;
        match self.peek()? {
            Some(b'(') => {
                let node = self.parse_collection(sink)?;
                Ok((node, ObjectKind::Collection))
            }
            Some(b'[') => {
                let (node, empty) = self.parse_anon(sink)?;
                Ok((node.clone(), ObjectKind::Anon { node, empty }))
            }
            _ => Ok((self.parse_term(sink, TermPosition::Object)?, ObjectKind::Plain)),
        }
    }

    fn parse_collection(&mut self, sink: &mut dyn Sink) -> PResult<Node> {
        self.enter()?;
        self.advance()?; // '('
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.source.eat(b')').map_err(|s| self.io(s))? {
                break;
            }
            let (object, object_kind) = self.parse_object_node(sink)?;
            if let ObjectKind::Anon { node, empty: false } = &object_kind {
                let status = sink.end(node.clone());
                self.check(status)?;
            }
            items.push(object);
        }
        self.leave();
        if items.is_empty() {
            return Ok(rdf_nil());
        }
        let cells: Vec<Node> = (0..items.len())
            .map(|_| self.node(NodeArgs::Token(NodeKind::Blank, &self.blanks_fresh())))
            .collect::<PResult<_>>()?;
        for (i, (cell, item)) in cells.iter().zip(items.into_iter()).enumerate() {
            let rest = cells.get(i + 1).cloned().unwrap_or_else(rdf_nil);
            let first_stmt = trtl_core::Statement::new(cell.clone(), rdf_first(), item, self.graph.clone());
            self.check(sink.statement(first_stmt, StatementFlags::NONE))?;
            let rest_stmt = trtl_core::Statement::new(cell.clone(), rdf_rest(), rest, self.graph.clone());
            self.check(sink.statement(rest_stmt, StatementFlags::NONE))?;
        }
        Ok(cells[0].clone())
    }

    fn blanks_fresh(&mut self) -> String {
        self.blanks.fresh()
    }

    fn parse_anon(&mut self, sink: &mut dyn Sink) -> PResult<(Node, bool)> {
        self.enter()?;
        self.advance()?; // '['
        let label = self.blanks_fresh();
        let node = self.node(NodeArgs::Token(NodeKind::Blank, &label))?;
        self.skip_trivia()?;
        if self.source.eat(b']').map_err(|s| self.io(s))? {
            self.leave();
            return Ok((node, true));
        }
        self.parse_predicate_object_list(sink, &node, SubjectKind::Plain)?;
        self.skip_trivia()?;
        self.expect(b']', "']' to close anonymous node")?;
        self.leave();
        Ok((node, false))
    }

    fn enter(&mut self) -> PResult<()> {
        self.depth += 1;
        if self.depth > self.options.stack_limit {
            return Err(self.err(Status::BadStack, "nesting too deep"));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_term(&mut self, sink: &mut dyn Sink, position: TermPosition) -> PResult<Node> {
        self.skip_trivia()?;
        match self.peek()? {
            Some(b'<') => {
                let iri = self.parse_iriref_raw()?;
                let resolved = if self.options.flags().contains(ReaderFlags::RELATIVE) {
                    iri
                } else {
                    self.env.resolve(&iri).map_err(|s| self.err(s, "could not resolve IRI"))?
                };
                self.node(NodeArgs::Token(NodeKind::Iri, &resolved))
            }
            Some(b'_') => {
                self.advance()?;
                self.expect(b':', "':' in blank node label")?;
                let label = self.parse_plain_name()?;
                self.blanks.observe_explicit(&label);
                self.node(NodeArgs::Token(NodeKind::Blank, &label))
            }
            Some(b'?' | b'$') if self.options.flags().contains(ReaderFlags::VARIABLES) => {
                self.advance()?;
                let name = self.parse_plain_name()?;
                self.node(NodeArgs::Token(NodeKind::Variable, &name))
            }
            Some(b'"' | b'\'') => self.parse_literal(sink),
            Some(b) if b.is_ascii_digit() || b == b'+' || b == b'-' => self.parse_numeric(),
            Some(b'.') if matches!(self.peek2()?, Some(d) if d.is_ascii_digit()) => self.parse_numeric(),
            Some(b't') if self.looks_like_word("true") => {
                self.expect_word_ci("true")?;
                self.node(NodeArgs::Boolean(true))
            }
            Some(b'f') if self.looks_like_word("false") => {
                self.expect_word_ci("false")?;
                self.node(NodeArgs::Boolean(false))
            }
            Some(b) if b.is_ascii_alphabetic() || b == b':' => self.parse_prefixed_name_term(sink, position),
            _ => Err(self.err(Status::BadSyntax, "expected a term")),
        }
    }

    /// Non-consuming lookahead for the `true`/`false` boolean keywords:
    /// matches only when the whole word is present and not followed by a
    /// prefixed-name continuation character, so `foaf:`, `time:x`, `t:x`
    /// and `foo:bar` fall through to ordinary prefixed-name parsing
    /// instead of being forced into `expect_word_ci`.
    fn looks_like_word(&mut self, word: &str) -> bool {
        let bytes = word.as_bytes();
        for (i, &expected) in bytes.iter().enumerate() {
            if self.source.peek_at(i).ok().flatten() != Some(expected) {
                return false;
            }
        }
        let next = self.source.peek_at(bytes.len()).ok().flatten();
        !self.is_pname_continuation(next)
    }

    fn parse_prefixed_name_term(&mut self, _sink: &mut dyn Sink, _position: TermPosition) -> PResult<Node> {
        let prefix = self.parse_pname_prefix()?;
        self.expect(b':', "':' in prefixed name")?;
        let local = self.parse_pname_local()?;
        if self.options.flags().contains(ReaderFlags::PREFIXED) {
            return self.node(NodeArgs::PrefixedName {
                prefix: &prefix,
                local: &local,
            });
        }
        let (ns, suffix) = self
            .env
            .expand(&prefix, &local)
            .map_err(|s| self.err(s, format!("undeclared prefix {prefix:?}")))?;
        self.node(NodeArgs::JoinedUri {
            prefix: &ns,
            suffix: &suffix,
        })
    }

    fn parse_pname_prefix(&mut self) -> PResult<String> {
        let mut out = String::new();
        while let Some(b) = self.peek()? {
            if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b > 0x7f {
                out.push(b as char);
                self.advance()?;
            } else {
                break;
            }
        }
        Ok(out)
    }

    fn parse_pname_local(&mut self) -> PResult<String> {
        let mut out = String::new();
        while let Some(b) = self.peek()? {
            if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'%') || b > 0x7f {
                out.push(b as char);
                self.advance()?;
            } else {
                break;
            }
        }
        while out.ends_with('.') {
            // trailing '.' belongs to the terminating '.', not the name
            out.pop();
        }
        Ok(out)
    }

    fn parse_prefix_name(&mut self) -> PResult<String> {
        self.parse_pname_prefix()
    }

    fn parse_plain_name(&mut self) -> PResult<String> {
        let mut out = String::new();
        while let Some(b) = self.peek()? {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b > 0x7f {
                out.push(b as char);
                self.advance()?;
            } else {
                break;
            }
        }
        if out.is_empty() {
            return Err(self.err(Status::BadLabel, "expected a name"));
        }
        Ok(out)
    }

    fn parse_iriref_raw(&mut self) -> PResult<String> {
        self.expect(b'<', "'<' to open IRI reference")?;
        let mut out = String::new();
        loop {
            match self.advance()? {
                None => return Err(self.err(Status::BadUri, "unterminated IRI reference")),
                Some(b'>') => break,
                Some(b'\\') => out.push(self.read_unicode_escape()?),
                Some(b) if b < 0x20 || matches!(b, b'<' | b'"' | b'{' | b'}' | b'|' | b'^' | b'`') => {
                    return Err(self.err(Status::BadUri, "illegal character in IRI reference"))
                }
                Some(b) => self.push_byte(&mut out, b)?,
            }
        }
        Ok(out)
    }

    /// Appends one source byte to `out`, pulling in UTF-8 continuation
    /// bytes as needed so the buffer stays valid UTF-8.
    fn push_byte(&mut self, out: &mut String, first: u8) -> PResult<()> {
        if first < 0x80 {
            out.push(first as char);
            return Ok(());
        }
        let extra = if first >= 0xf0 {
            3
        } else if first >= 0xe0 {
            2
        } else {
            1
        };
        let mut buf = vec![first];
        for _ in 0..extra {
            match self.advance()? {
                Some(b) => buf.push(b),
                None => return Err(self.err(Status::BadSyntax, "truncated UTF-8 sequence")),
            }
        }
        let s = std::str::from_utf8(&buf).map_err(|_| self.err(Status::BadSyntax, "invalid UTF-8 sequence"))?;
        out.push_str(s);
        Ok(())
    }

    fn read_unicode_escape(&mut self) -> PResult<char> {
        match self.advance()? {
            Some(b't') => Ok('\t'),
            Some(b'b') => Ok('\u{8}'),
            Some(b'n') => Ok('\n'),
            Some(b'r') => Ok('\r'),
            Some(b'f') => Ok('\u{c}'),
            Some(b'"') => Ok('"'),
            Some(b'\'') => Ok('\''),
            Some(b'\\') => Ok('\\'),
            Some(b'u') => self.read_hex_escape(4),
            Some(b'U') => self.read_hex_escape(8),
            _ => Err(self.err(Status::BadSyntax, "invalid escape sequence")),
        }
    }

    fn read_hex_escape(&mut self, digits: usize) -> PResult<char> {
        let mut value = 0u32;
        for _ in 0..digits {
            let b = self.advance()?.ok_or_else(|| self.err(Status::BadSyntax, "truncated \\u escape"))?;
            let digit = (b as char)
                .to_digit(16)
                .ok_or_else(|| self.err(Status::BadSyntax, "invalid hex digit in \\u escape"))?;
            value = value * 16 + digit;
        }
        char::from_u32(value).ok_or_else(|| self.err(Status::BadText, "escape is not a valid Unicode scalar value"))
    }

    fn parse_literal(&mut self, _sink: &mut dyn Sink) -> PResult<Node> {
        let quote = self.advance()?.expect("peeked");
        let long = self.peek()? == Some(quote) && self.peek2()? == Some(quote);
        if long {
            self.advance()?;
            self.advance()?;
        }
        let mut text = String::new();
        loop {
            match self.advance()? {
                None => return Err(self.err(Status::BadText, "unterminated string literal")),
                Some(b) if b == quote => {
                    if !long {
                        break;
                    }
                    if self.peek()? == Some(quote) && self.peek2()? == Some(quote) {
                        self.advance()?;
                        self.advance()?;
                        break;
                    }
                    text.push(quote as char);
                }
                Some(b'\\') => text.push(self.read_unicode_escape()?),
                Some(b'\n' | b'\r') if !long => {
                    return Err(self.err(Status::BadText, "unescaped newline in short literal"));
                }
                Some(b) => self.push_byte(&mut text, b)?,
            }
        }
        self.parse_literal_suffix(&text)
    }

    fn parse_literal_suffix(&mut self, text: &str) -> PResult<Node> {
        if self.peek()? == Some(b'@') {
            self.advance()?;
            let tag = self.parse_plain_name_with_dashes()?;
            return self.node(NodeArgs::Literal {
                text,
                meta: Some(LiteralMeta::Language(&tag)),
            });
        }
        if self.peek()? == Some(b'^') && self.peek2()? == Some(b'^') {
            self.advance()?;
            self.advance()?;
            let datatype = self.parse_term(&mut trtl_core::event::CollectSink::default(), TermPosition::Object)?;
            return self.node(NodeArgs::Literal {
                text,
                meta: Some(LiteralMeta::Datatype(datatype.value())),
            });
        }
        self.node(NodeArgs::Literal { text, meta: None })
    }

    fn parse_plain_name_with_dashes(&mut self) -> PResult<String> {
        let mut out = self.parse_plain_name()?;
        while self.peek()? == Some(b'-') {
            out.push('-');
            self.advance()?;
            out.push_str(&self.parse_plain_name()?);
        }
        Ok(out)
    }

    fn parse_numeric(&mut self) -> PResult<Node> {
        let mut text = String::new();
        if matches!(self.peek()?, Some(b'+' | b'-')) {
            text.push(self.advance()?.expect("peeked") as char);
        }
        while let Some(b) = self.peek()? {
            if b.is_ascii_digit() {
                text.push(b as char);
                self.advance()?;
            } else {
                break;
            }
        }
        let mut is_decimal = false;
        if self.peek()? == Some(b'.') && matches!(self.peek2()?, Some(d) if d.is_ascii_digit()) {
            is_decimal = true;
            text.push('.');
            self.advance()?;
            while let Some(b) = self.peek()? {
                if b.is_ascii_digit() {
                    text.push(b as char);
                    self.advance()?;
                } else {
                    break;
                }
            }
        }
        let mut is_double = false;
        if matches!(self.peek()?, Some(b'e' | b'E')) {
            is_double = true;
            text.push(self.advance()?.expect("peeked") as char);
            if matches!(self.peek()?, Some(b'+' | b'-')) {
                text.push(self.advance()?.expect("peeked") as char);
            }
            while let Some(b) = self.peek()? {
                if b.is_ascii_digit() {
                    text.push(b as char);
                    self.advance()?;
                } else {
                    break;
                }
            }
        }
        if is_double {
            let value: f64 = text.parse().map_err(|_| self.err(Status::BadLiteral, "invalid double literal"))?;
            self.node(NodeArgs::Double(value))
        } else if is_decimal {
            self.node(NodeArgs::Decimal(&text))
        } else {
            let value: i64 = text.parse().map_err(|_| self.err(Status::BadLiteral, "invalid integer literal"))?;
            self.node(NodeArgs::Integer(value))
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum TermPosition {
    Subject,
    Predicate,
    Object,
    Graph,
}

#[derive(Debug, Clone, Copy)]
enum SubjectKind {
    Plain,
    Collection,
    Anon,
    EmptyAnon,
}

#[derive(Debug, Clone)]
enum ObjectKind {
    Plain,
    Collection,
    Anon { node: Node, empty: bool },
}

#[cfg(test)]
mod tests {
    use super::*;
    use trtl_core::event::CollectSink;
    use trtl_core::Event;

    fn read_all(input: &str, format: Format) -> Vec<Event> {
        let mut sink = CollectSink::default();
        let mut reader = Reader::new(input.as_bytes(), ReaderOptions::new(format), "test");
        reader.read_document(&mut sink).unwrap();
        sink.events
    }

    #[test]
    fn parses_prefix_and_simple_triple() {
        let events = read_all(
            "@prefix eg: <http://example.org/> . eg:s eg:p eg:o .",
            Format::Turtle,
        );
        assert_eq!(events.len(), 2);
        let Event::Statement { statement, flags } = &events[1] else {
            panic!("expected a statement event");
        };
        assert_eq!(statement.subject().value(), "http://example.org/s");
        assert_eq!(flags.bits(), StatementFlags::EMPTY_G.bits());
    }

    #[test]
    fn parses_collection_into_cons_cells() {
        let events = read_all("<http://x/s> <http://x/p> ( 1 2 ) .", Format::Turtle);
        // two cons cells * 2 statements each + one outer statement = 5
        assert_eq!(events.len(), 5);
        let Event::Statement { flags, .. } = &events[0] else {
            panic!();
        };
        assert!(flags.contains(StatementFlags::LIST_O));
    }

    #[test]
    fn parses_anon_object_with_end_event() {
        let events = read_all("<http://x/s> <http://x/p> [ <http://x/q> <http://x/r> ] .", Format::Turtle);
        assert!(matches!(events.last(), Some(Event::End { .. })));
    }

    #[test]
    fn language_tagged_literal_round_trips() {
        let events = read_all(r#"<http://x/s> <http://x/p> "hi"@en ."#, Format::Turtle);
        let Event::Statement { statement, .. } = &events[0] else {
            panic!();
        };
        assert_eq!(statement.object().language(), Some("en"));
    }

    #[test]
    fn lax_mode_skips_bad_curie_and_resynchronises() {
        let mut sink = CollectSink::default();
        let options = ReaderOptions::new(Format::Turtle).lax(true);
        let mut reader = Reader::new(
            "bad:s bad:p bad:o . <http://x/s> <http://x/p> <http://x/o> .".as_bytes(),
            options,
            "test",
        );
        reader.read_document(&mut sink).unwrap();
        assert_eq!(sink.events.len(), 1);
    }

    #[test]
    fn prefixed_names_starting_with_keyword_letters_are_not_misrouted() {
        let events = read_all(
            "@prefix foaf: <http://xmlns.com/foaf/0.1/> . \
             @prefix geo: <http://www.w3.org/2003/01/geo/wgs84_pos#> . \
             foaf:alice foaf:name geo:lat .",
            Format::Turtle,
        );
        let Event::Statement { statement, .. } = events.last().unwrap() else {
            panic!("expected a statement event");
        };
        assert_eq!(statement.subject().value(), "http://xmlns.com/foaf/0.1/alice");
        assert_eq!(statement.predicate().value(), "http://xmlns.com/foaf/0.1/name");
        assert_eq!(statement.object().value(), "http://www.w3.org/2003/01/geo/wgs84_pos#lat");
    }

    #[test]
    fn boolean_literal_and_prefixed_name_starting_with_t_are_distinguished() {
        let events = read_all(
            "@prefix t: <http://example.org/t#> . <http://x/s> <http://x/p> true, t:x .",
            Format::Turtle,
        );
        let statements: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Statement { statement, .. } => Some(statement),
                _ => None,
            })
            .collect();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].object().value(), "true");
        assert_eq!(statements[1].object().value(), "http://example.org/t#x");
    }

    #[test]
    fn sparql_base_keyword_is_not_confused_with_a_b_prefixed_subject() {
        let events = read_all(
            "@prefix bar: <http://example.org/bar#> . bar:s bar:p bar:o .",
            Format::Turtle,
        );
        let Event::Statement { statement, .. } = events.last().unwrap() else {
            panic!("expected a statement event");
        };
        assert_eq!(statement.subject().value(), "http://example.org/bar#s");
    }

    #[test]
    fn nquads_line_carries_an_explicit_graph_term() {
        let events = read_all(
            "<http://x/s> <http://x/p> <http://x/o> <http://x/g> .\n",
            Format::NQuads,
        );
        assert_eq!(events.len(), 1);
        let Event::Statement { statement, flags } = &events[0] else {
            panic!("expected a statement event");
        };
        assert_eq!(statement.graph().map(Node::value), Some("http://x/g"));
        assert!(!flags.contains(StatementFlags::EMPTY_G));
    }

    #[test]
    fn nquads_line_without_a_graph_term_uses_the_default_graph() {
        let events = read_all("<http://x/s> <http://x/p> <http://x/o> .\n", Format::NQuads);
        let Event::Statement { statement, flags } = &events[0] else {
            panic!("expected a statement event");
        };
        assert_eq!(statement.graph(), None);
        assert!(flags.contains(StatementFlags::EMPTY_G));
    }
}
