//! Reads a small Turtle document into a [`Model`], tolerating one
//! malformed statement in LAX mode, then re-emits the model as TriG.
//!
//! The `tracing_subscriber` line below is what a binary embedding this
//! library installs to see the `tracing::warn!` this crate's reader
//! emits for every LAX-recovered statement (§10.2); the library itself
//! never installs a subscriber.
//!
//! Run with: cargo run -p trtl --example read_and_reemit

use trtl::{Format, Inserter, Model, ModelFlags, Pattern, Reader, ReaderOptions, StatementOrder, Writer, WriterOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let doc = "\
        @prefix eg: <http://example.org/> .\n\
        eg:alice eg:knows eg:bob, eg:carol .\n\
        this is not valid turtle .\n\
        eg:bob eg:name \"Bob\" .\n";

    let mut reader = Reader::new(doc.as_bytes(), ReaderOptions::new(Format::Turtle).lax(true), "doc.ttl");
    let mut model = Model::new(StatementOrder::Spo, ModelFlags::NONE);
    {
        let mut inserter = Inserter::new(&mut model, None);
        reader.read_document(&mut inserter)?;
    }
    println!("read {} statements (one bad line skipped under LAX)", model.size());

    let mut out = Vec::new();
    let mut writer = Writer::new(&mut out, WriterOptions::new(Format::TriG));
    trtl::write_range(model.find(Pattern::default()), &mut writer);
    drop(writer);
    print!("{}", String::from_utf8(out)?);
    Ok(())
}
