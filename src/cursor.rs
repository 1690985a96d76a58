use crate::err::{DecodeError, DecodeResult};
use crate::event::EventKind;
use crate::name::ElementName;

use log::{trace, warn};

/// Pull-style access to a BXML event stream.
///
/// This is the boundary to the byte-level reader: implementations own the stream position and
/// any buffering. Scalar accessors take the index of the packed value inside the current event
/// (`0..value_count()`), and never move the cursor.
pub trait EventCursor {
    /// Kind of the event the cursor is positioned at.
    fn event_kind(&self) -> EventKind;

    /// Name of the current element. Only valid at `StartElement`/`EndElement`.
    fn element_name(&self) -> DecodeResult<&ElementName>;

    /// Number of scalars packed in the current value event.
    fn value_count(&self) -> DecodeResult<usize>;

    fn bool_value(&self, index: usize) -> DecodeResult<bool>;
    fn int_value(&self, index: usize) -> DecodeResult<i32>;
    fn long_value(&self, index: usize) -> DecodeResult<i64>;
    fn float_value(&self, index: usize) -> DecodeResult<f32>;
    fn double_value(&self, index: usize) -> DecodeResult<f64>;
    fn byte_value(&self, index: usize) -> DecodeResult<i8>;

    /// Text payload of a `ValueString`/`ValueCdata` event.
    fn string_value(&self) -> DecodeResult<&str>;

    /// Moves to the next event and returns its kind.
    fn advance(&mut self) -> DecodeResult<EventKind>;

    /// Opaque position, used for error reporting.
    fn position(&self) -> u64;

    fn is_value(&self) -> bool {
        self.event_kind().is_value()
    }

    /// Fails unless the current event is `kind` and, for element events, its name matches
    /// `namespace`/`local_name` (`None` matches anything).
    fn require(
        &self,
        kind: EventKind,
        namespace: Option<&str>,
        local_name: Option<&str>,
    ) -> DecodeResult<()> {
        let found = self.event_kind();
        if found != kind {
            return Err(DecodeError::UnexpectedEvent {
                expected: kind,
                found,
                position: self.position(),
            });
        }

        if namespace.is_none() && local_name.is_none() {
            return Ok(());
        }

        let name = self.element_name()?;
        if !name.matches(namespace, local_name) {
            let expected = match namespace {
                Some(ns) => format!("{{{}}}{}", ns, local_name.unwrap_or("*")),
                None => local_name.unwrap_or("*").to_string(),
            };
            return Err(DecodeError::ElementMismatch {
                kind,
                expected,
                found: name.clone(),
                position: self.position(),
            });
        }

        Ok(())
    }
}

/// Skips forward to the `EndElement` closing the current element level.
///
/// Nested elements are skipped as a whole, so the cursor stops at the first `EndElement` that
/// is not balanced by a `StartElement` seen during the sweep. Discarded events are logged.
pub fn go_to_end(cursor: &mut dyn EventCursor, name: &ElementName) -> DecodeResult<()> {
    let mut depth = 0_usize;
    let mut skipped = 0_usize;

    loop {
        match cursor.event_kind() {
            EventKind::EndElement if depth == 0 => break,
            EventKind::EndElement => depth -= 1,
            EventKind::StartElement => depth += 1,
            _ => {}
        }
        skipped += 1;
        cursor.advance()?;
    }

    if skipped > 0 {
        warn!(
            "Offset {}: discarded {} unexpected event(s) inside `{}`",
            cursor.position(),
            skipped,
            name
        );
    } else {
        trace!("Offset {}: nothing to skip inside `{}`", cursor.position(), name);
    }

    Ok(())
}
