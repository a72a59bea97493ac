//! Node store, lexical environment, event/sink pipeline, and indexed
//! in-memory model for `trtl` — a lightweight library for reading,
//! writing, querying, and indexing RDF data in the Turtle family of
//! syntaxes.
//!
//! This crate provides everything below the byte level: [`node`] (the
//! atomic RDF value and its interning store), [`environment`] (base URI +
//! prefix map), [`event`] (the event union and [`event::Sink`] trait that
//! couples readers, writers, the model, and [`transform`]'s transformer
//! sinks together), and [`model`] (the multi-indexed statement store).
//! Byte-level I/O and the Turtle/TriG/N-Triples/N-Quads grammar live in
//! the sibling `trtl-io` crate.

pub mod environment;
pub mod event;
pub mod interning;
pub mod model;
pub mod node;
pub mod statement;
mod status;
pub mod transform;

pub use environment::Environment;
pub use event::{Event, Sink, StatementFlags};
pub use interning::NodeStore;
pub use model::{Cursor, CursorMode, Model, ModelFlags, Pattern, StatementOrder};
pub use node::{Node, NodeArgs, NodeError, NodeFlags, NodeKind};
pub use statement::{Caret, Statement};
pub use status::{Band, Status};
pub use transform::{Canon, Filter, Inserter, RelativeIriPolicy, Tee};
