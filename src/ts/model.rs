//! In-memory model of a Qt Linguist TS document.
//!
//! The model keeps every element lupdate and Linguist write, so a parsed
//! document can be written back without losing translator data.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A whole `.ts` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsDocument {
    /// `version` attribute of `<TS>` (usually `2.1`).
    pub version: Option<String>,
    /// Target language, e.g. `ko` or `pt_BR`.
    pub language: Option<String>,
    /// Language of the source strings, usually absent (English).
    pub source_language: Option<String>,
    /// Catalogs named in `<dependencies>`.
    pub dependencies: Vec<String>,
    pub contexts: Vec<Context>,
    /// `extra-*` elements directly under `<TS>`.
    pub extras: Vec<Extra>,
}

impl TsDocument {
    /// Creates an empty TS 2.1 document for `language`.
    #[must_use]
    pub fn new(language: Option<String>) -> Self {
        Self { version: Some("2.1".to_string()), language, ..Self::default() }
    }

    /// Iterates over every message together with the name of its context.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts
            .iter()
            .flat_map(|context| context.messages.iter().map(|m| (context.name.as_str(), m)))
    }

    /// Finds a context by name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|context| context.name == name)
    }
}

/// A `<context>` block, usually named after the originating C++ class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub name: String,
    pub comment: Option<String>,
    pub messages: Vec<Message>,
}

impl Context {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), comment: None, messages: Vec::new() }
    }
}

/// One translatable unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub id: Option<String>,
    /// `numerus="yes"`: the translation holds plural forms.
    pub numerus: bool,
    pub locations: Vec<Location>,
    pub source: String,
    /// Previous source text, left behind by a merge.
    pub old_source: Option<String>,
    /// Disambiguation comment. Part of the lookup key.
    pub comment: Option<String>,
    pub old_comment: Option<String>,
    /// Developer comment for translators. Not part of the lookup key.
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
    pub translation: Option<Translation>,
    pub extras: Vec<Extra>,
}

impl Message {
    /// Disambiguation comment, with a missing comment read as empty.
    #[must_use]
    pub fn disambiguation(&self) -> &str {
        self.comment.as_deref().unwrap_or_default()
    }

    /// Status of the translation. A message without `<translation>` is unfinished.
    #[must_use]
    pub fn status(&self) -> TranslationStatus {
        self.translation.as_ref().map_or(TranslationStatus::Unfinished, |t| t.status)
    }
}

/// `<location filename=".." line=".."/>`.
///
/// `line` stays a string because lupdate may write relative lines (`+3`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub filename: Option<String>,
    pub line: Option<String>,
}

/// An `extra-*` element, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extra {
    pub name: String,
    pub content: String,
}

/// The `<translation>` element of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    pub status: TranslationStatus,
    pub body: TranslationBody,
}

impl Translation {
    /// A finished, non-plural translation.
    #[must_use]
    pub fn finished(text: impl Into<String>) -> Self {
        Self { status: TranslationStatus::Finished, body: TranslationBody::Text(text.into()) }
    }

    /// Text shown for a non-plural message.
    ///
    /// Length variants are ordered by falling display length; the first one
    /// is the default rendering.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            TranslationBody::Text(text) => Some(text),
            TranslationBody::LengthVariants(variants) => variants.first().map(String::as_str),
            TranslationBody::NumerusForms(_) => None,
        }
    }

    /// Plural forms, when the body holds `<numerusform>` children.
    #[must_use]
    pub fn numerus_forms(&self) -> Option<&[NumerusForm]> {
        match &self.body {
            TranslationBody::NumerusForms(forms) => Some(forms),
            _ => None,
        }
    }
}

/// Content of a `<translation>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationBody {
    Text(String),
    /// `variants="yes"` with `<lengthvariant>` children.
    LengthVariants(Vec<String>),
    NumerusForms(Vec<NumerusForm>),
}

impl Default for TranslationBody {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// One `<numerusform>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumerusForm {
    Text(String),
    /// `variants="yes"` with `<lengthvariant>` children.
    LengthVariants(Vec<String>),
}

impl NumerusForm {
    /// Text shown for this form: the first length variant when there are several.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::LengthVariants(variants) => variants.first().map_or("", String::as_str),
        }
    }
}

impl From<&str> for NumerusForm {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for NumerusForm {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// Translation state as written in the `type` attribute.
///
/// No attribute means finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslationStatus {
    #[default]
    Finished,
    Unfinished,
    /// The source string disappeared from the code; kept for translators.
    Vanished,
    /// Like `Vanished`, written by older lupdate versions.
    Obsolete,
}

impl TranslationStatus {
    /// Value of the `type` attribute, `None` for finished.
    #[must_use]
    pub const fn attribute(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Vanished => Some("vanished"),
            Self::Obsolete => Some("obsolete"),
        }
    }

    /// Whether the source string is gone from the application.
    #[must_use]
    pub const fn is_retired(self) -> bool {
        matches!(self, Self::Vanished | Self::Obsolete)
    }

    /// Whether a message in this state takes part in runtime lookup.
    #[must_use]
    pub const fn is_active(self, include_unfinished: bool) -> bool {
        match self {
            Self::Finished => true,
            Self::Unfinished => include_unfinished,
            Self::Vanished | Self::Obsolete => false,
        }
    }
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.attribute().unwrap_or("finished"))
    }
}

impl FromStr for TranslationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "finished" => Ok(Self::Finished),
            "unfinished" => Ok(Self::Unfinished),
            "vanished" => Ok(Self::Vanished),
            "obsolete" => Ok(Self::Obsolete),
            other => Err(other.to_string()),
        }
    }
}
