//! Catalog quality checks and statistics.

use std::collections::{
    BTreeSet,
    HashSet,
};
use std::fmt;

use serde::Serialize;

use super::Catalog;
use crate::config::DiagnosticsConfig;
use crate::ts::{
    Message,
    NumerusForm,
    TranslationStatus,
};
use crate::types::MessageKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.pad("info"),
            Self::Warning => f.pad("warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// A numerus message with a different form count than the language's rule.
    NumerusFormCount { expected: usize, found: usize },
    Unfinished,
    /// The key already appeared earlier in the catalog; only the first is served.
    DuplicateMessage,
    /// `%1`..`%99` placeholders differ between source and translation.
    PlaceholderMismatch { missing: Vec<u8>, unexpected: Vec<u8> },
}

impl DiagnosticKind {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::Unfinished => Severity::Info,
            Self::NumerusFormCount { .. }
            | Self::DuplicateMessage
            | Self::PlaceholderMismatch { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumerusFormCount { expected, found } => {
                write!(f, "expected {expected} numerus form(s), found {found}")
            }
            Self::Unfinished => write!(f, "translation is unfinished"),
            Self::DuplicateMessage => write!(f, "duplicate message"),
            Self::PlaceholderMismatch { missing, unexpected } => {
                write!(f, "placeholder mismatch")?;
                if !missing.is_empty() {
                    write!(f, ", missing {}", format_placeholders(missing))?;
                }
                if !unexpected.is_empty() {
                    write!(f, ", unexpected {}", format_placeholders(unexpected))?;
                }
                Ok(())
            }
        }
    }
}

/// `%1 %2` style list.
fn format_placeholders(numbers: &[u8]) -> String {
    numbers.iter().map(|n| format!("%{n}")).collect::<Vec<_>>().join(" ")
}

/// A finding about one message of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub key: MessageKey,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Diagnostic for `message` in `context`, with the kind's severity.
    fn new(context: &str, message: &Message, kind: DiagnosticKind) -> Self {
        Self {
            severity: kind.severity(),
            key: MessageKey::new(context, message.source.as_str(), message.disambiguation()),
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.key, self.kind)
    }
}

/// Check every message that is not vanished or obsolete.
///
/// Diagnostics come in document order.
#[must_use]
pub fn check_catalog(catalog: &Catalog, config: &DiagnosticsConfig) -> Vec<Diagnostic> {
    let rule = catalog.plural_rule();
    let mut diagnostics = Vec::new();
    let mut seen = HashSet::new();

    for (context, message) in catalog.document().messages() {
        let status = message.status();
        if status.is_retired() {
            continue;
        }

        if !seen.insert((context, message.source.as_str(), message.disambiguation())) {
            diagnostics.push(Diagnostic::new(context, message, DiagnosticKind::DuplicateMessage));
        }

        if config.unfinished && status == TranslationStatus::Unfinished {
            diagnostics.push(Diagnostic::new(context, message, DiagnosticKind::Unfinished));
        }

        let Some(translation) = &message.translation else {
            continue;
        };

        if config.numerus_mismatch
            && message.numerus
            && let Some(forms) = translation.numerus_forms()
            && forms.len() != rule.form_count()
        {
            diagnostics.push(Diagnostic::new(
                context,
                message,
                DiagnosticKind::NumerusFormCount { expected: rule.form_count(), found: forms.len() },
            ));
        }

        if config.placeholders && status == TranslationStatus::Finished {
            let expected = placeholders(&message.source);
            let texts: Vec<&str> = translation
                .numerus_forms()
                .map_or_else(|| translation.text().into_iter().collect(), |forms| {
                    forms.iter().map(NumerusForm::text).collect()
                });

            for text in texts.into_iter().filter(|text| !text.is_empty()) {
                let found = placeholders(text);
                if found != expected {
                    diagnostics.push(Diagnostic::new(
                        context,
                        message,
                        DiagnosticKind::PlaceholderMismatch {
                            missing: expected.difference(&found).copied().collect(),
                            unexpected: found.difference(&expected).copied().collect(),
                        },
                    ));
                    break;
                }
            }
        }
    }

    diagnostics
}

/// Numbers of the `%1`..`%99` (and `%L1`..) placeholders in `text`.
fn placeholders(text: &str) -> BTreeSet<u8> {
    let mut found = BTreeSet::new();
    let mut rest = text;
    while let Some(position) = rest.find('%') {
        rest = rest.get(position + 1..).unwrap_or_default();
        let digits_start = usize::from(rest.starts_with('L'));
        let digits: String = rest
            .get(digits_start..)
            .unwrap_or_default()
            .chars()
            .take_while(char::is_ascii_digit)
            .take(2)
            .collect();
        if let Ok(number) = digits.parse::<u8>()
            && number >= 1
        {
            found.insert(number);
        }
    }
    found
}

/// Message counts of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub language: Option<String>,
    pub contexts: usize,
    pub messages: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub vanished: usize,
    pub obsolete: usize,
    pub numerus: usize,
}

impl CatalogStats {
    #[must_use]
    pub fn collect(catalog: &Catalog) -> Self {
        let document = catalog.document();
        let mut stats = Self {
            language: catalog.language().map(ToString::to_string),
            contexts: document.contexts.len(),
            ..Self::default()
        };

        for (_, message) in document.messages() {
            stats.messages += 1;
            if message.numerus {
                stats.numerus += 1;
            }
            match message.status() {
                TranslationStatus::Finished => stats.finished += 1,
                TranslationStatus::Unfinished => stats.unfinished += 1,
                TranslationStatus::Vanished => stats.vanished += 1,
                TranslationStatus::Obsolete => stats.obsolete += 1,
            }
        }

        stats
    }
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "language:   {}", self.language.as_deref().unwrap_or("unknown"))?;
        writeln!(f, "contexts:   {}", self.contexts)?;
        writeln!(f, "messages:   {}", self.messages)?;
        writeln!(f, "finished:   {}", self.finished)?;
        writeln!(f, "unfinished: {}", self.unfinished)?;
        writeln!(f, "vanished:   {}", self.vanished)?;
        writeln!(f, "obsolete:   {}", self.obsolete)?;
        write!(f, "numerus:    {}", self.numerus)
    }
}
