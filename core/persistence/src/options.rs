//! FILENAME: core/persistence/src/options.rs
//! PURPOSE: Codec configuration.
//! CONTEXT: Every option has a default, and every struct deserializes with
//! missing fields filled from those defaults, so a config file only needs to
//! name what it changes.

use serde::{Deserialize, Serialize};

use crate::PersistenceError;

/// How Null (or absent) cells are written to delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullRendering {
    /// An empty field.
    #[default]
    Empty,
    /// The literal text `null`.
    Literal,
}

impl NullRendering {
    pub fn text(self) -> &'static str {
        match self {
            NullRendering::Empty => "",
            NullRendering::Literal => "null",
        }
    }
}

/// What to do with a delimited-text record whose field count differs from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Drop the record, log it and count it in the import report.
    #[default]
    Skip,
    /// Abort the import with `MalformedRecord`.
    Fail,
}

/// A field separator: a single ASCII byte that is not a line break.
///
/// Config documents carry it as a one-character string (`";"`), and the
/// conversion rejects anything the delimited-text reader cannot split on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct Delimiter(u8);

impl Delimiter {
    pub const COMMA: Delimiter = Delimiter(b',');

    pub fn as_byte(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(self.0)
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::COMMA
    }
}

impl TryFrom<char> for Delimiter {
    type Error = PersistenceError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        if c.is_ascii() && c != '\n' && c != '\r' {
            Ok(Delimiter(c as u8))
        } else {
            Err(PersistenceError::InvalidDelimiter(c))
        }
    }
}

impl From<Delimiter> for char {
    fn from(d: Delimiter) -> char {
        d.as_char()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Field separator. Quoting is not supported, so values must not contain it.
    pub delimiter: Delimiter,
    pub null_rendering: NullRendering,
    pub on_malformed: MalformedPolicy,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: Delimiter::COMMA,
            null_rendering: NullRendering::Empty,
            on_malformed: MalformedPolicy::Skip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Spaces per indentation level in pretty-printed output.
    pub indent: usize,
}

impl Default for JsonOptions {
    fn default() -> Self {
        JsonOptions { indent: 4 }
    }
}

/// Options for both codecs, as loaded from a config document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeOptions {
    pub csv: CsvOptions,
    pub json: JsonOptions,
}
