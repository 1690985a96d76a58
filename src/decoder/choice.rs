use crate::cursor::EventCursor;
use crate::decoder::{Decoder, TargetSet};
use crate::err::{DecodeError, DecodeResult};
use crate::event::EventKind;
use crate::name::ElementName;

use log::trace;
use std::fmt;

pub type BoxedDecoder<T> = Box<dyn Decoder<Output = T> + Send + Sync>;

/// Ordered list of candidate decoders.
///
/// The first option whose `can_handle` accepts the current element decodes it. Once an option
/// is picked its errors propagate; the remaining options are never tried.
pub struct ChoiceDecoder<T> {
    options: Vec<BoxedDecoder<T>>,
}

impl<T> Default for ChoiceDecoder<T> {
    fn default() -> Self {
        ChoiceDecoder {
            options: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for ChoiceDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChoiceDecoder")
            .field("options", &self.options.len())
            .finish()
    }
}

impl<T> ChoiceDecoder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: Vec<BoxedDecoder<T>>) -> Self {
        ChoiceDecoder { options }
    }

    /// Appends an option; it is tried after every option added before it.
    pub fn with_option<D>(mut self, decoder: D) -> Self
    where
        D: Decoder<Output = T> + Send + Sync + 'static,
    {
        self.options.push(Box::new(decoder));
        self
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    fn option_for(&self, name: &ElementName) -> Option<&BoxedDecoder<T>> {
        self.options.iter().find(|option| option.can_handle(name))
    }
}

impl<T> Decoder for ChoiceDecoder<T> {
    type Output = T;

    fn decode(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Option<T>> {
        cursor.require(EventKind::StartElement, None, None)?;
        let name = cursor.element_name()?;

        let option = self
            .option_for(name)
            .ok_or_else(|| DecodeError::NoMatchingDecoder {
                name: name.clone(),
                position: cursor.position(),
            })?;

        trace!("Offset {}: choice picked a decoder for `{}`", cursor.position(), name);
        option.decode(cursor)
    }

    fn can_handle(&self, name: &ElementName) -> bool {
        self.option_for(name).is_some()
    }

    fn targets(&self) -> TargetSet {
        self.options
            .iter()
            .flat_map(|option| option.targets())
            .collect()
    }
}
