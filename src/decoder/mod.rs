//! Element and value decoders.
//!
//! Two layers cooperate here:
//! - a [`ValueDecoder`] turns a run of consecutive `VALUE_*` events into one logical value and
//!   leaves the cursor at the first event that is not part of it;
//! - a [`Decoder`] consumes a whole `START_ELEMENT .. END_ELEMENT` span for the element names
//!   it targets, delegating the content to a value decoder (or to nested decoders).
//!
//! Both are stateless apart from their construction-time configuration, so a single instance
//! may be shared between threads as long as each call gets its own cursor.

pub mod choice;
pub mod date;
pub mod generic;
pub mod primitive;
pub mod primitive_list;
pub mod primitives;
pub mod sequence;
pub mod simple;
pub mod string;

use crate::cursor::EventCursor;
use crate::err::{DecodeError, DecodeResult};
use crate::event::EventKind;
use crate::name::ElementName;

use hashbrown::HashSet;

/// Set of element names a [`Decoder`] declares it can handle.
pub type TargetSet = HashSet<ElementName>;

/// Decodes a run of value events into one logical value.
pub trait ValueDecoder {
    type Output;

    /// Pure predicate, never touches the cursor.
    fn can_handle(&self, kind: EventKind) -> bool;

    /// Must be called with the cursor at a value event this decoder can handle.
    fn decode(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Option<Self::Output>>;
}

/// Decodes a full element span, from its `START_ELEMENT` up to (and positioned at) its
/// `END_ELEMENT`.
pub trait Decoder {
    type Output;

    fn decode(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Option<Self::Output>>;

    /// Pure predicate, never touches the cursor.
    fn can_handle(&self, name: &ElementName) -> bool;

    fn targets(&self) -> TargetSet;
}

/// Decoder adapter produced by [`DecoderExt::map`].
#[derive(Debug, Clone)]
pub struct Map<D, F> {
    decoder: D,
    f: F,
}

impl<D, F, U> Decoder for Map<D, F>
where
    D: Decoder,
    F: Fn(D::Output) -> U,
{
    type Output = U;

    fn decode(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Option<U>> {
        Ok(self.decoder.decode(cursor)?.map(&self.f))
    }

    fn can_handle(&self, name: &ElementName) -> bool {
        self.decoder.can_handle(name)
    }

    fn targets(&self) -> TargetSet {
        self.decoder.targets()
    }
}

pub trait DecoderExt: Decoder + Sized {
    /// Converts the decoded payload, e.g. to register a typed decoder in a
    /// `ChoiceDecoder<Value>`.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: Fn(Self::Output) -> U,
    {
        Map { decoder: self, f }
    }
}

impl<D: Decoder> DecoderExt for D {}

/// Fails with `UnsupportedValueKind` unless `decoder` accepts the current event.
pub(crate) fn ensure_can_handle<V: ValueDecoder + ?Sized>(
    decoder: &V,
    decoder_name: &'static str,
    cursor: &dyn EventCursor,
) -> DecodeResult<()> {
    let kind = cursor.event_kind();
    if decoder.can_handle(kind) {
        Ok(())
    } else {
        Err(DecodeError::UnsupportedValueKind {
            decoder: decoder_name,
            kind,
            position: cursor.position(),
        })
    }
}
