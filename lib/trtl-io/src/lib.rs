//! Byte-level I/O for `trtl`: a streaming reader and pretty writer for the
//! Turtle family of RDF syntaxes (Turtle, TriG, N-Triples, N-Quads).
//!
//! [`Reader`] turns bytes into [`trtl_core::Event`]s; [`Writer`] turns
//! events back into bytes. [`write_range`] does the same from a model
//! cursor directly, skipping the byte round-trip. All three are
//! configured through the [`options`] builder types and report failures
//! through [`error`]'s narrow error structs, carrying the shared
//! [`trtl_core::Status`] codes. [`blank`] generates collision-free
//! blank-node labels and [`source`] is the buffered byte cursor the
//! reader pulls from.

mod blank;
mod error;
mod format;
mod options;
mod range;
mod reader;
mod source;
mod vocab;
mod writer;

pub use blank::BlankNodeGenerator;
pub use error::{ReaderError, WriterError};
pub use format::Format;
pub use options::{ReaderFlags, ReaderOptions, WriterFlags, WriterOptions};
pub use range::write_range;
pub use reader::Reader;
pub use source::ByteSource;
pub use writer::Writer;
