#![deny(unused_must_use)]
#![forbid(unsafe_code)]
//! Streaming decoders for BXML, a binary encoding of XML-like event streams.
//!
//! A byte-level reader exposes the stream through the [`EventCursor`] trait. On top of it,
//! element [`Decoder`]s consume whole `START_ELEMENT .. END_ELEMENT` spans and delegate their
//! content to [`ValueDecoder`]s, which rebuild typed values (scalars, chunked strings, packed
//! or string-encoded primitive arrays, dates) from runs of `VALUE_*` events.
//!
//! ```
//! use bxml::{Decoder, EventStream, PrimitiveListDecoder};
//!
//! let mut stream = EventStream::builder()
//!     .start("posList")
//!     .doubles([1.0, 2.0])
//!     .string("3 4")
//!     .end("posList")
//!     .build()?;
//!
//! let coords = PrimitiveListDecoder::<f64>::new("posList").decode(&mut stream)?;
//! assert_eq!(coords, Some(vec![1.0, 2.0, 3.0, 4.0]));
//! # Ok::<(), bxml::err::DecodeError>(())
//! ```

pub mod cursor;
pub mod decoder;
pub mod err;
pub mod event;
pub mod event_stream;
pub mod name;
pub mod settings;
pub mod value;

pub use cursor::{EventCursor, go_to_end};
pub use decoder::choice::{BoxedDecoder, ChoiceDecoder};
pub use decoder::date::{DateDecoder, DateValueDecoder};
pub use decoder::generic::GenericValueDecoder;
pub use decoder::primitive::{PrimitiveDecoder, PrimitiveValueDecoder, read_value};
pub use decoder::primitive_list::{
    ArrayBuilder, PrimitiveListDecoder, PrimitiveListValueDecoder, decode_packed_array,
};
pub use decoder::primitives::PrimitivesValueDecoder;
pub use decoder::sequence::{Property, SequenceDecoder};
pub use decoder::simple::SimpleDecoder;
pub use decoder::string::{StringDecoder, StringValueDecoder};
pub use decoder::{Decoder, TargetSet, ValueDecoder};
pub use err::{DecodeError, DecodeResult};
pub use event::{Event, EventKind};
pub use event_stream::{EventStream, EventStreamBuilder};
pub use name::ElementName;
pub use settings::DecoderSettings;
pub use value::{ArrayElement, ArrayKind, Primitive, PrimitiveArray, Structured, TargetType, Value};

#[cfg(test)]
use std::sync::Once;

#[cfg(test)]
static LOGGER_INIT: Once = Once::new();

// Rust runs the tests concurrently, so unless we synchronize logging access
// it will crash when attempting to run `cargo test` with some logging facilities.
#[cfg(test)]
pub fn ensure_env_logger_initialized() {
    use std::io::Write;

    LOGGER_INIT.call_once(|| {
        let mut builder = env_logger::Builder::from_default_env();
        builder
            .format(|buf, record| writeln!(buf, "[{}] - {}", record.level(), record.args()))
            .init();
    });
}
