//! Qt numerus (plural form) rules.
//!
//! Each rule family maps a count to the index of a `<numerusform>`. The
//! families and their languages follow Qt Linguist's numerus table, so a
//! catalog produced by lupdate for a language has exactly
//! [`PluralRule::form_count`] forms per numerus message.

use serde::Serialize;

/// Plural rule family of a target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PluralRule {
    /// One form for every count (Korean, Japanese, Chinese, Turkish...).
    Universal,
    /// `n == 1`, other.
    EnglishStyle,
    /// `n <= 1`, other.
    FrenchStyle,
    /// `n == 1`, `2..=4`, other.
    SlovakStyle,
    /// `n % 10 == 1 && n % 100 != 11`, `n % 10 in 2..=4 && n % 100 not in 10..=19`, other.
    RussianStyle,
    /// `n == 1`, `n % 10 in 2..=4 && n % 100 not in 10..=19`, other.
    Polish,
    /// `n % 10 == 1 && n % 100 != 11`, `n % 10 != 0 && n % 100 not in 10..=19`, other.
    Lithuanian,
    /// `n % 10 == 1 && n % 100 != 11`, `n != 0`, other.
    Latvian,
    /// `n == 1`, `n == 0 || n % 100 in 1..=19`, other.
    Romanian,
    /// `n == 1`, `n == 2`, other.
    Irish,
    /// `n % 100 == 1`, `n % 100 == 2`, `n % 100 in 3..=4`, other.
    Slovenian,
    /// `0`, `1`, `2`, `n % 100 in 3..=10`, `n % 100 >= 11`, other.
    Arabic,
}

/// Primary language subtags per rule family.
const LANGUAGE_RULES: &[(PluralRule, &[&str])] = &[
    (
        PluralRule::Universal,
        &[
            "bi", "bo", "dz", "fa", "fj", "gn", "hu", "id", "ja", "jv", "ko", "ms", "my", "na",
            "su", "th", "tr", "tt", "vi", "yo", "za", "zh",
        ],
    ),
    (
        PluralRule::EnglishStyle,
        &[
            "af", "az", "bg", "bn", "ca", "da", "de", "el", "en", "eo", "es", "et", "eu", "fi",
            "fo", "fy", "gl", "gu", "ha", "he", "hi", "it", "ka", "kk", "km", "ku", "ky", "lb",
            "ml", "mn", "mr", "nb", "ne", "nl", "nn", "no", "or", "pa", "ps", "pt", "sq", "sv",
            "sw", "ta", "te", "tk", "ur", "uz",
        ],
    ),
    (PluralRule::FrenchStyle, &["am", "br", "fil", "fr", "hy", "oc", "ti", "tl", "wa"]),
    (PluralRule::SlovakStyle, &["cs", "sk"]),
    (PluralRule::RussianStyle, &["be", "bs", "hr", "ru", "sh", "sr", "uk"]),
    (PluralRule::Polish, &["pl"]),
    (PluralRule::Lithuanian, &["lt"]),
    (PluralRule::Latvian, &["lv"]),
    (PluralRule::Romanian, &["mo", "ro"]),
    (PluralRule::Irish, &["ga", "se"]),
    (PluralRule::Slovenian, &["sl"]),
    (PluralRule::Arabic, &["ar"]),
];

/// Split a language code (`ko`, `ko_KR`, `pt-BR`) into lowercase language
/// and uppercase region.
#[must_use]
pub fn split_language_code(code: &str) -> (String, Option<String>) {
    let mut parts = code.split(['_', '-']);
    let language = parts.next().unwrap_or_default().to_lowercase();
    let region = parts.find(|part| part.len() == 2 || part.len() == 3).map(str::to_uppercase);
    (language, region)
}

impl PluralRule {
    /// Rule for a TS `language` attribute value.
    ///
    /// Unknown languages fall back to [`PluralRule::EnglishStyle`].
    #[must_use]
    pub fn for_language(code: &str) -> Self {
        let (language, region) = split_language_code(code);

        // Brazilian Portuguese treats 0 like 1.
        if language == "pt" && region.as_deref() == Some("BR") {
            return Self::FrenchStyle;
        }

        LANGUAGE_RULES
            .iter()
            .find(|(_, languages)| languages.contains(&language.as_str()))
            .map_or_else(
                || {
                    tracing::debug!(language = code, "No numerus rule for language, using English");
                    Self::EnglishStyle
                },
                |(rule, _)| *rule,
            )
    }

    /// Number of `<numerusform>` entries a catalog for this rule holds.
    #[must_use]
    pub const fn form_count(self) -> usize {
        match self {
            Self::Universal => 1,
            Self::EnglishStyle | Self::FrenchStyle => 2,
            Self::SlovakStyle
            | Self::RussianStyle
            | Self::Polish
            | Self::Lithuanian
            | Self::Latvian
            | Self::Romanian
            | Self::Irish => 3,
            Self::Slovenian => 4,
            Self::Arabic => 6,
        }
    }

    /// Index of the form used for `n`. Negative counts use `|n|`.
    #[must_use]
    pub fn form_index(self, n: i64) -> usize {
        let n = n.unsigned_abs();
        let mod10 = n % 10;
        let mod100 = n % 100;
        let teen = (10..=19).contains(&mod100);
        match self {
            Self::Universal => 0,
            Self::EnglishStyle => {
                if n == 1 {
                    0
                } else {
                    1
                }
            }
            Self::FrenchStyle => {
                if n <= 1 {
                    0
                } else {
                    1
                }
            }
            Self::SlovakStyle => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::RussianStyle => {
                if mod10 == 1 && mod100 != 11 {
                    0
                } else if (2..=4).contains(&mod10) && !teen {
                    1
                } else {
                    2
                }
            }
            Self::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&mod10) && !teen {
                    1
                } else {
                    2
                }
            }
            Self::Lithuanian => {
                if mod10 == 1 && mod100 != 11 {
                    0
                } else if mod10 != 0 && !teen {
                    1
                } else {
                    2
                }
            }
            Self::Latvian => {
                if mod10 == 1 && mod100 != 11 {
                    0
                } else if n != 0 {
                    1
                } else {
                    2
                }
            }
            Self::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || (1..=19).contains(&mod100) {
                    1
                } else {
                    2
                }
            }
            Self::Irish => match n {
                1 => 0,
                2 => 1,
                _ => 2,
            },
            Self::Slovenian => match mod100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
            Self::Arabic => match n {
                0 => 0,
                1 => 1,
                2 => 2,
                _ if (3..=10).contains(&mod100) => 3,
                _ if mod100 >= 11 => 4,
                _ => 5,
            },
        }
    }
}

/// Replace the count placeholders `%n` and `%Ln` with `n`.
///
/// `%Ln` would be locale-formatted by Qt; it is written as a plain number.
///
/// # Examples
/// ```
/// use ts_catalog::plural::substitute_count;
///
/// assert_eq!(substitute_count("암호 %n개", 5), "암호 5개");
/// assert_eq!(substitute_count("%Ln개 중 %1", 3), "3개 중 %1");
/// ```
#[must_use]
pub fn substitute_count(text: &str, n: i64) -> String {
    let count = n.to_string();
    text.replace("%Ln", &count).replace("%n", &count)
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ko", PluralRule::Universal)]
    #[case("ko_KR", PluralRule::Universal)]
    #[case("ja", PluralRule::Universal)]
    #[case("fa_IR", PluralRule::Universal)]
    #[case("hu_HU", PluralRule::Universal)]
    #[case("id_ID", PluralRule::Universal)]
    #[case("tr", PluralRule::Universal)]
    #[case("bg_BG", PluralRule::EnglishStyle)]
    #[case("ca_VA", PluralRule::EnglishStyle)]
    #[case("it_IT", PluralRule::EnglishStyle)]
    #[case("ka_GE", PluralRule::EnglishStyle)]
    #[case("pt", PluralRule::EnglishStyle)]
    #[case("pt_BR", PluralRule::FrenchStyle)]
    #[case("pt-br", PluralRule::FrenchStyle)]
    #[case("fr", PluralRule::FrenchStyle)]
    #[case("hr_HR", PluralRule::RussianStyle)]
    #[case("sk_SK", PluralRule::SlovakStyle)]
    #[case("lt_LT", PluralRule::Lithuanian)]
    #[case("sl_SI", PluralRule::Slovenian)]
    #[case("ar", PluralRule::Arabic)]
    #[case("xx", PluralRule::EnglishStyle)]
    #[case("", PluralRule::EnglishStyle)]
    fn test_for_language(#[case] code: &str, #[case] expected: PluralRule) {
        assert_that!(PluralRule::for_language(code), eq(expected));
    }

    /// Form counts of the numerus messages shipped in VirtualBox's qt_*.ts files.
    #[rstest]
    #[case("ar", 6)]
    #[case("bg_BG", 2)]
    #[case("ca", 2)]
    #[case("fa_IR", 1)]
    #[case("hr_HR", 3)]
    #[case("hu_HU", 1)]
    #[case("id_ID", 1)]
    #[case("it_IT", 2)]
    #[case("ka_GE", 2)]
    #[case("ko", 1)]
    #[case("lt_LT", 3)]
    #[case("pt_BR", 2)]
    #[case("sk_SK", 3)]
    #[case("sl_SI", 4)]
    #[case("tr", 1)]
    fn test_form_count_matches_catalogs(#[case] code: &str, #[case] expected: usize) {
        assert_that!(PluralRule::for_language(code).form_count(), eq(expected));
    }

    #[rstest]
    fn test_universal_always_first_form(#[values(0, 1, 2, 5, 11, 100, -3, i64::MAX, i64::MIN)] n: i64) {
        assert_that!(PluralRule::Universal.form_index(n), eq(0));
    }

    #[rstest]
    #[case::english(PluralRule::EnglishStyle, &[(0, 1), (1, 0), (2, 1), (-1, 0)])]
    #[case::french(PluralRule::FrenchStyle, &[(0, 0), (1, 0), (2, 1)])]
    #[case::slovak(PluralRule::SlovakStyle, &[(1, 0), (3, 1), (4, 1), (5, 2), (0, 2)])]
    #[case::russian(PluralRule::RussianStyle, &[(1, 0), (21, 0), (11, 2), (2, 1), (22, 1), (12, 2), (5, 2)])]
    #[case::polish(PluralRule::Polish, &[(1, 0), (21, 2), (2, 1), (22, 1), (12, 2)])]
    #[case::lithuanian(PluralRule::Lithuanian, &[(1, 0), (21, 0), (11, 2), (2, 1), (10, 2), (15, 2)])]
    #[case::latvian(PluralRule::Latvian, &[(1, 0), (11, 1), (2, 1), (0, 2)])]
    #[case::romanian(PluralRule::Romanian, &[(1, 0), (0, 1), (19, 1), (20, 2), (101, 1)])]
    #[case::irish(PluralRule::Irish, &[(1, 0), (2, 1), (3, 2)])]
    #[case::slovenian(PluralRule::Slovenian, &[(1, 0), (101, 0), (2, 1), (3, 2), (4, 2), (5, 3)])]
    #[case::arabic(PluralRule::Arabic, &[(0, 0), (1, 1), (2, 2), (3, 3), (110, 3), (11, 4), (99, 4), (100, 5), (102, 5)])]
    #[googletest::test]
    fn test_form_index(#[case] rule: PluralRule, #[case] expectations: &[(i64, usize)]) {
        for &(n, expected) in expectations {
            expect_that!(rule.form_index(n), eq(expected), "n = {n}");
        }
    }

    #[rstest]
    fn test_form_index_within_form_count(
        #[values(
            PluralRule::Universal,
            PluralRule::EnglishStyle,
            PluralRule::FrenchStyle,
            PluralRule::SlovakStyle,
            PluralRule::RussianStyle,
            PluralRule::Polish,
            PluralRule::Lithuanian,
            PluralRule::Latvian,
            PluralRule::Romanian,
            PluralRule::Irish,
            PluralRule::Slovenian,
            PluralRule::Arabic
        )]
        rule: PluralRule,
    ) {
        for n in 0..250 {
            assert!(rule.form_index(n) < rule.form_count(), "{rule:?} n = {n}");
        }
    }

    #[rstest]
    #[case("ko_KR", "ko", Some("KR"))]
    #[case("pt-br", "pt", Some("BR"))]
    #[case("sr_Latn_RS", "sr", Some("RS"))]
    #[case("KO", "ko", None)]
    fn test_split_language_code(
        #[case] code: &str,
        #[case] language: &str,
        #[case] region: Option<&str>,
    ) {
        let (actual_language, actual_region) = split_language_code(code);

        assert_eq!(actual_language, language);
        assert_eq!(actual_region.as_deref(), region);
    }

    #[rstest]
    #[case("비밀번호 %n개를 입력하십시오.", 5, "비밀번호 5개를 입력하십시오.")]
    #[case("%Ln items, %n shown", 2, "2 items, 2 shown")]
    #[case("%1 of %n", 1, "%1 of 1")]
    #[case("no count", 7, "no count")]
    #[case("%n", -4, "-4")]
    fn test_substitute_count(#[case] text: &str, #[case] n: i64, #[case] expected: &str) {
        assert_eq!(substitute_count(text, n), expected);
    }
}
