use crate::cursor::EventCursor;
use crate::decoder::simple::SimpleDecoder;
use crate::decoder::string::StringValueDecoder;
use crate::decoder::{ValueDecoder, ensure_can_handle};
use crate::err::{DecodeError, DecodeResult};
use crate::event::EventKind;
use crate::name::ElementName;
use crate::settings::DecoderSettings;

use jiff::civil::DateTime;
use jiff::fmt::strtime;
use jiff::{Timestamp, tz::Offset};
use log::trace;

/// Decodes a (possibly chunked) string and parses it as a timestamp.
///
/// Without an explicit format the text must be an RFC 3339 timestamp, or a civil date-time
/// which is then taken as UTC. Parse failures are fatal.
#[derive(Debug, Clone, Default)]
pub struct DateValueDecoder {
    format: Option<String>,
    strings: StringValueDecoder,
}

impl DateValueDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: impl Into<String>) -> Self {
        DateValueDecoder {
            format: Some(format.into()),
            strings: StringValueDecoder,
        }
    }

    pub fn parse(&self, text: &str) -> Result<Timestamp, jiff::Error> {
        let text = text.trim();
        match &self.format {
            Some(format) => {
                let tm = strtime::parse(format, text)?;
                if tm.offset().is_some() {
                    tm.to_timestamp()
                } else {
                    Offset::UTC.to_timestamp(tm.to_datetime()?)
                }
            }
            None => text.parse::<Timestamp>().or_else(|err| {
                text.parse::<DateTime>()
                    .and_then(|dt| Offset::UTC.to_timestamp(dt))
                    .map_err(|_| err)
            }),
        }
    }
}

impl ValueDecoder for DateValueDecoder {
    type Output = Timestamp;

    fn can_handle(&self, kind: EventKind) -> bool {
        self.strings.can_handle(kind)
    }

    fn decode(&self, cursor: &mut dyn EventCursor) -> DecodeResult<Option<Timestamp>> {
        ensure_can_handle(self, "DateValueDecoder", cursor)?;

        let position = cursor.position();
        let Some(text) = self.strings.decode(cursor)? else {
            return Ok(None);
        };

        let timestamp = self
            .parse(&text)
            .map_err(|source| DecodeError::DateParse {
                text: text.clone(),
                position,
                source,
            })?;

        trace!("Offset {}: parsed date `{}` as {}", position, text, timestamp);
        Ok(Some(timestamp))
    }
}

/// Element decoder for a date.
pub type DateDecoder = SimpleDecoder<DateValueDecoder>;

impl DateDecoder {
    pub fn new(name: impl Into<ElementName>) -> Self {
        Self::with_settings(name, &DecoderSettings::default())
    }

    pub fn with_settings(name: impl Into<ElementName>, settings: &DecoderSettings) -> Self {
        let value_decoder = match settings.get_date_format() {
            Some(format) => DateValueDecoder::with_format(format),
            None => DateValueDecoder::new(),
        };
        SimpleDecoder::with_value_decoder(name, value_decoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use crate::event_stream::EventStream;
    use pretty_assertions::assert_eq;

    fn date_element(text: &str) -> EventStream {
        EventStream::builder()
            .start("when")
            .string(text)
            .end("when")
            .build()
            .unwrap()
    }

    #[test]
    fn test_rfc3339_timestamp() {
        let mut stream = date_element("2011-03-22T10:30:00Z");

        let ts = DateDecoder::new("when").decode(&mut stream).unwrap().unwrap();
        assert_eq!(ts, "2011-03-22T10:30:00Z".parse::<Timestamp>().unwrap());
        assert!(stream.is_last());
    }

    #[test]
    fn test_civil_datetime_is_utc() {
        let mut stream = date_element("2011-03-22T10:30:00.5");

        let ts = DateDecoder::new("when").decode(&mut stream).unwrap().unwrap();
        assert_eq!(ts, "2011-03-22T10:30:00.5Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn test_chunked_date() {
        let mut stream = EventStream::builder()
            .start("when")
            .string("2020-01-01T")
            .string("00:00:00+01:00")
            .end("when")
            .build()
            .unwrap();

        let ts = DateDecoder::new("when").decode(&mut stream).unwrap().unwrap();
        assert_eq!(ts, "2019-12-31T23:00:00Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn test_custom_format() {
        let settings = DecoderSettings::new().date_format("%d/%m/%Y %H:%M:%S");
        let mut stream = date_element("22/03/2011 10:30:00");

        let ts = DateDecoder::with_settings("when", &settings)
            .decode(&mut stream)
            .unwrap()
            .unwrap();
        assert_eq!(ts, "2011-03-22T10:30:00Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn test_parse_failure_is_fatal() {
        let mut stream = date_element("not a date");

        let err = DateDecoder::new("when").decode(&mut stream).unwrap_err();
        match err {
            DecodeError::DateParse { text, position, .. } => {
                assert_eq!(text, "not a date");
                assert_eq!(position, 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_date_is_none() {
        let mut stream = EventStream::builder()
            .start("when")
            .end("when")
            .build()
            .unwrap();

        assert_eq!(DateDecoder::new("when").decode(&mut stream).unwrap(), None);
    }
}
