mod format;

use std::fmt;

use crate::{DynamicMessage, Value};

/// Internal options controlling the debug/display rendering of a [`DynamicMessage`] or [`Value`].
///
/// This drives the `Debug`/`Display` impls only; it is not a parser, is not part of the wire or
/// JSON codecs, and gives no round-trip guarantee.
#[derive(Debug, Clone)]
pub(crate) struct FormatOptions {
    pretty: bool,
    skip_unknown_fields: bool,
    expand_any: bool,
}

impl FormatOptions {
    pub(crate) fn new() -> Self {
        FormatOptions::default()
    }

    pub(crate) fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            pretty: false,
            skip_unknown_fields: true,
            expand_any: true,
        }
    }
}

impl fmt::Display for DynamicMessage {
    /// Formats this message in a protobuf-text-format-like rendering, for human inspection.
    ///
    /// Use [`DynamicMessage::encode`] or [`DynamicMessage::serialize_with_options`] for the
    /// supported wire/JSON encodings. The alternate specifier (`{:#}`) pretty-prints with
    /// indentation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format::Writer::new(FormatOptions::new().pretty(f.alternate()), f).fmt_message(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format::Writer::new(FormatOptions::new().pretty(f.alternate()), f).fmt_value(self, None)
    }
}
