//! A byte-oriented input source with 1-based line / 0-based column
//! tracking (§4.4 "Byte source & sink", §3 "Reader state").
//!
//! The spec describes a pull-style `read(buf, n)` callback with an
//! internal page buffer; the idiomatic Rust shape for that is simply
//! `std::io::Read` plus our own position bookkeeping layered on top, so
//! that is what this wraps rather than reintroducing a parallel callback
//! interface.

use std::io::{self, Read};

use trtl_core::Status;

/// Buffered, position-tracking wrapper over any [`Read`].
pub struct ByteSource<R> {
    inner: R,
    buf: Vec<u8>,
    pos: usize,
    filled: usize,
    eof: bool,
    line: usize,
    column: usize,
}

const PAGE_SIZE: usize = 8192;

impl<R: Read> ByteSource<R> {
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: vec![0; PAGE_SIZE],
            pos: 0,
            filled: 0,
            eof: false,
            line: 1,
            column: 0,
        }
    }

    /// Current 1-based line / 0-based column, as recorded after the last
    /// consumed byte.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn refill(&mut self) -> Result<(), Status> {
        if self.pos < self.filled || self.eof {
            return Ok(());
        }
        let n = self.inner.read(&mut self.buf).map_err(|_| Status::BadRead)?;
        self.pos = 0;
        self.filled = n;
        if n == 0 {
            self.eof = true;
        }
        Ok(())
    }

    /// Looks at the next byte without consuming it.
    pub fn peek(&mut self) -> Result<Option<u8>, Status> {
        self.refill()?;
        Ok(self.buf[self.pos..self.filled].first().copied())
    }

    /// Looks one byte past [`Self::peek`], without consuming either.
    pub fn peek2(&mut self) -> Result<Option<u8>, Status> {
        self.peek_at(1)
    }

    /// Looks `offset` bytes past the current position, without consuming
    /// anything (`offset = 0` is [`Self::peek`]). Used for fixed-width
    /// keyword lookahead (`BASE`, `PREFIX`, `GRAPH`, `true`, `false`) that
    /// must not commit to a parse path on a partial match.
    pub fn peek_at(&mut self, offset: usize) -> Result<Option<u8>, Status> {
        loop {
            self.refill()?;
            if self.pos + offset < self.filled {
                return Ok(Some(self.buf[self.pos + offset]));
            }
            if self.eof {
                return Ok(None);
            }
            // The lookahead byte lives past what's currently buffered;
            // compact the pending bytes to the front and pull in more
            // without losing what's already been peeked.
            let pending = self.filled - self.pos;
            self.buf.copy_within(self.pos..self.filled, 0);
            self.pos = 0;
            self.filled = pending;
            let n = self.inner.read(&mut self.buf[self.filled..]).map_err(|_| Status::BadRead)?;
            if n == 0 {
                self.eof = true;
                return Ok(None);
            }
            self.filled += n;
        }
    }

    /// Consumes and returns the next byte, advancing line/column.
    pub fn advance(&mut self) -> Result<Option<u8>, Status> {
        let Some(b) = self.peek()? else {
            return Ok(None);
        };
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Ok(Some(b))
    }

    /// Consumes `b` if it is the next byte; returns whether it matched.
    pub fn eat(&mut self, b: u8) -> Result<bool, Status> {
        if self.peek()? == Some(b) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Skips bytes until (and including) the next `target`, or EOF. Used
    /// by LAX-mode resynchronisation (§4.6 "Failure handling").
    pub fn skip_until_byte(&mut self, target: u8) -> Result<(), Status> {
        while let Some(b) = self.advance()? {
            if b == target {
                return Ok(());
            }
        }
        Ok(())
    }

    /// True once the source has reached end-of-input.
    pub fn at_eof(&mut self) -> Result<bool, Status> {
        Ok(self.peek()?.is_none())
    }
}

impl<'a> ByteSource<io::Cursor<&'a [u8]>> {
    /// A source backed directly by an in-memory string, for tests and
    /// callers with the whole document already in hand.
    #[must_use]
    pub fn from_str(s: &'a str) -> Self {
        Self::new(io::Cursor::new(s.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_line_and_column() {
        let mut src = ByteSource::from_str("ab\ncd");
        assert_eq!(src.position(), (1, 0));
        src.advance().unwrap();
        assert_eq!(src.position(), (1, 1));
        src.advance().unwrap();
        src.advance().unwrap();
        assert_eq!(src.position(), (2, 0));
    }

    #[test]
    fn peek_does_not_consume() {
        let mut src = ByteSource::from_str("xy");
        assert_eq!(src.peek().unwrap(), Some(b'x'));
        assert_eq!(src.peek().unwrap(), Some(b'x'));
        assert_eq!(src.advance().unwrap(), Some(b'x'));
        assert_eq!(src.advance().unwrap(), Some(b'y'));
        assert_eq!(src.advance().unwrap(), None);
    }

    #[test]
    fn peek_at_looks_ahead_without_consuming() {
        let mut src = ByteSource::from_str("PREFIX");
        assert_eq!(src.peek_at(0).unwrap(), Some(b'P'));
        assert_eq!(src.peek_at(5).unwrap(), Some(b'X'));
        assert_eq!(src.peek_at(6).unwrap(), None);
        assert_eq!(src.advance().unwrap(), Some(b'P'));
    }

    #[test]
    fn skip_until_byte_resynchronises() {
        let mut src = ByteSource::from_str("garbage\ngood");
        src.skip_until_byte(b'\n').unwrap();
        let mut rest = Vec::new();
        while let Some(b) = src.advance().unwrap() {
            rest.push(b);
        }
        assert_eq!(rest, b"good");
    }
}
