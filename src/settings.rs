/// Construction-time configuration shared by the concrete decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderSettings {
    skip_unexpected_content: bool,
    date_format: Option<String>,
}

impl Default for DecoderSettings {
    fn default() -> Self {
        DecoderSettings {
            skip_unexpected_content: true,
            date_format: None,
        }
    }
}

impl DecoderSettings {
    pub fn new() -> Self {
        DecoderSettings::default()
    }

    /// When set (the default), primitive and primitive-list decoders skip any events left
    /// between their value and the closing tag instead of failing.
    pub fn skip_unexpected_content(mut self, skip: bool) -> Self {
        self.skip_unexpected_content = skip;
        self
    }

    /// `strftime`-style format used by date decoders. Without one, dates are parsed as RFC 3339
    /// timestamps, or as civil date-times in UTC.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    pub fn should_skip_unexpected_content(&self) -> bool {
        self.skip_unexpected_content
    }

    pub fn get_date_format(&self) -> Option<&str> {
        self.date_format.as_deref()
    }
}
