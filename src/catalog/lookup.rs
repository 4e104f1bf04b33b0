//! A loaded TS catalog and its runtime lookup.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use crate::input::detect_language_from_path;
use crate::plural::{
    PluralRule,
    substitute_count,
};
use crate::ts::{
    Message,
    NumerusForm,
    ParseError,
    TsDocument,
    parse_document,
};

/// Position of a message in the document: (context index, message index).
type MessageRef = (usize, usize);

/// Messages by context, then by source text. The comment is compared over
/// the few candidates sharing a source.
type MessageIndex = HashMap<String, HashMap<String, Vec<MessageRef>>>;

/// A parsed translation catalog for one language.
///
/// Lookups borrow from the catalog and never allocate, except for plural
/// lookups which substitute the count.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// File the catalog was loaded from, if any.
    path: Option<PathBuf>,
    /// Parsed document, kept whole for checks and re-serialization.
    document: TsDocument,
    /// Language from `<TS language>`, or detected from the file name.
    language: Option<String>,
    /// Numerus rule of `language`, English style when unknown.
    plural_rule: PluralRule,
    /// Lookup index into `document`.
    index: MessageIndex,
    /// Serve `type="unfinished"` translations as well.
    include_unfinished: bool,
}

impl Catalog {
    /// Read and parse a catalog file.
    ///
    /// # Errors
    /// Returns `ParseError` when the file cannot be read or is not a valid TS document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::parse_from(&text, path)
    }

    /// Parse catalog text that was read from `path`.
    ///
    /// The language falls back to the file name when the document has none.
    ///
    /// # Errors
    /// Returns `ParseError` when the text is not a valid TS document.
    pub fn parse_from(text: &str, path: &Path) -> Result<Self, ParseError> {
        let mut document = parse_document(text)?;
        if document.language.as_deref().is_none_or(str::is_empty) {
            document.language = detect_language_from_path(path);
            tracing::debug!(
                path = %path.display(),
                language = ?document.language,
                "No language attribute, detected from path"
            );
        }

        let mut catalog = Self::from_document(document);
        catalog.path = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Parse catalog text.
    ///
    /// # Errors
    /// Returns `ParseError` when the text is not a valid TS document.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        parse_document(text).map(Self::from_document)
    }

    /// Build the lookup index over a document.
    ///
    /// When a key occurs more than once, the first message wins. Vanished
    /// and obsolete messages only hold a key until a live message claims it.
    #[must_use]
    pub fn from_document(document: TsDocument) -> Self {
        let language = document.language.clone().filter(|language| !language.is_empty());
        let plural_rule = language.as_deref().map_or(PluralRule::EnglishStyle, PluralRule::for_language);

        let mut index = MessageIndex::new();
        for (context_index, context) in document.contexts.iter().enumerate() {
            let sources = index.entry(context.name.clone()).or_default();
            for (message_index, message) in context.messages.iter().enumerate() {
                let candidates = sources.entry(message.source.clone()).or_default();
                let retired = message.status().is_retired();
                let existing = candidates.iter().enumerate().find_map(|(slot, &position)| {
                    let other = message_at(&document, position)?;
                    (other.disambiguation() == message.disambiguation())
                        .then_some((slot, other.status().is_retired()))
                });

                match existing {
                    None => candidates.push((context_index, message_index)),
                    Some((slot, true)) if !retired => {
                        if let Some(position) = candidates.get_mut(slot) {
                            *position = (context_index, message_index);
                        }
                    }
                    Some((_, existing_retired)) => {
                        if !retired && !existing_retired {
                            tracing::warn!(
                                context = %context.name,
                                source = %message.source,
                                comment = message.disambiguation(),
                                "Duplicate message, keeping the first one"
                            );
                        }
                        continue;
                    }
                }

                if message.numerus
                    && let Some(forms) = message.translation.as_ref().and_then(|t| t.numerus_forms())
                    && forms.len() != plural_rule.form_count()
                {
                    tracing::warn!(
                        context = %context.name,
                        source = %message.source,
                        expected = plural_rule.form_count(),
                        found = forms.len(),
                        "Numerus form count does not match the language"
                    );
                }
            }
        }

        Self { path: None, document, language, plural_rule, index, include_unfinished: false }
    }

    /// Also serve `type="unfinished"` translations. Vanished and obsolete
    /// messages stay hidden.
    #[must_use]
    pub const fn with_unfinished(mut self, include_unfinished: bool) -> Self {
        self.include_unfinished = include_unfinished;
        self
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    #[must_use]
    pub const fn plural_rule(&self) -> PluralRule {
        self.plural_rule
    }

    #[must_use]
    pub const fn document(&self) -> &TsDocument {
        &self.document
    }

    /// Consume the catalog, returning the parsed document.
    #[must_use]
    pub fn into_document(self) -> TsDocument {
        self.document
    }

    /// The message indexed for a key, whatever its status.
    ///
    /// No comment and an empty comment are the same key.
    #[must_use]
    pub fn message(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        let comment = comment.unwrap_or_default();
        self.index
            .get(context)?
            .get(source)?
            .iter()
            .filter_map(|&position| message_at(&self.document, position))
            .find(|message| message.disambiguation() == comment)
    }

    /// The active message for a key, retrying with the empty comment.
    fn active_message(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&Message> {
        let found = self
            .message(context, source, comment)
            .filter(|message| message.status().is_active(self.include_unfinished));
        if found.is_some() || comment.is_none_or(str::is_empty) {
            return found;
        }

        self.message(context, source, None)
            .filter(|message| message.status().is_active(self.include_unfinished))
    }

    /// Translation of `source` in `context`.
    ///
    /// `None` when the message is missing, not finished, or translated to
    /// the empty string. A comment that matches nothing falls back to the
    /// message without comment.
    ///
    /// # Examples
    /// ```
    /// use ts_catalog::catalog::Catalog;
    ///
    /// let catalog = Catalog::parse(
    ///     r#"<TS version="2.1" language="ko"><context><name>UIMessageCenter</name>
    /// <message><source>Cancel</source><translation>취소</translation></message>
    /// </context></TS>"#,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(catalog.lookup("UIMessageCenter", "Cancel", None), Some("취소"));
    /// assert_eq!(catalog.lookup("UIMessageCenter", "OK", None), None);
    /// ```
    #[must_use]
    pub fn lookup(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&str> {
        let message = self.active_message(context, source, comment)?;
        message.translation.as_ref()?.text().filter(|text| !text.is_empty())
    }

    /// Plural translation of `source` for the count `n`, with `%n` replaced.
    ///
    /// A message stored without numerus forms uses its plain text.
    #[must_use]
    pub fn lookup_plural(
        &self,
        context: &str,
        source: &str,
        n: i64,
        comment: Option<&str>,
    ) -> Option<String> {
        let message = self.active_message(context, source, comment)?;
        let translation = message.translation.as_ref()?;

        let text = match translation.numerus_forms() {
            Some(forms) => self.select_form(forms, n, context, source)?,
            None => translation.text()?,
        };
        if text.is_empty() {
            return None;
        }

        Some(substitute_count(text, n))
    }

    /// Form for `n`, or the last one when the catalog has fewer forms than the rule.
    fn select_form<'a>(
        &self,
        forms: &'a [NumerusForm],
        n: i64,
        context: &str,
        source: &str,
    ) -> Option<&'a str> {
        let index = self.plural_rule.form_index(n);
        if let Some(form) = forms.get(index) {
            return Some(form.text());
        }

        tracing::warn!(
            context,
            source,
            n,
            index,
            available = forms.len(),
            "Missing numerus form, using the last one"
        );
        forms.last().map(NumerusForm::text)
    }

    /// Like [`Catalog::lookup`], returning `source` on a miss.
    #[must_use]
    pub fn translate<'a>(&'a self, context: &str, source: &'a str, comment: Option<&str>) -> &'a str {
        self.lookup(context, source, comment).unwrap_or(source)
    }

    /// Like [`Catalog::lookup_plural`], returning `source` with `%n` replaced on a miss.
    #[must_use]
    pub fn translate_plural(
        &self,
        context: &str,
        source: &str,
        n: i64,
        comment: Option<&str>,
    ) -> String {
        self.lookup_plural(context, source, n, comment)
            .unwrap_or_else(|| substitute_count(source, n))
    }
}

/// The message at `position`, if it exists.
fn message_at(document: &TsDocument, (context, message): MessageRef) -> Option<&Message> {
    document.contexts.get(context)?.messages.get(message)
}
