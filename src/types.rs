//! Core types used throughout the project.

use std::fmt;

use serde::Serialize;

/// Identity of a message: context, source text and disambiguation comment.
///
/// An absent comment and an empty comment are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MessageKey {
    pub context: String,
    pub source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

impl MessageKey {
    #[must_use]
    pub fn new(
        context: impl Into<String>,
        source: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self { context: context.into(), source: source.into(), comment: comment.into() }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{:?}", self.context, self.source)?;
        if !self.comment.is_empty() {
            write!(f, " ({})", self.comment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(MessageKey::new("UIMessageCenter", "Cancel", ""), "UIMessageCenter::\"Cancel\"")]
    #[case(
        MessageKey::new("UIIndicatorsPool", "Connected", "cable (Network tooltip)"),
        "UIIndicatorsPool::\"Connected\" (cable (Network tooltip))"
    )]
    fn test_display(#[case] key: MessageKey, #[case] expected: &str) {
        assert_eq!(key.to_string(), expected);
    }

    #[rstest]
    fn test_serialize_skips_empty_comment() {
        let key = MessageKey::new("UIMessageCenter", "Cancel", "");

        let json = serde_json::to_string(&key).unwrap_or_default();

        assert_eq!(json, r#"{"context":"UIMessageCenter","source":"Cancel"}"#);
    }
}
