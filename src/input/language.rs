//! Catalog language detection from file paths

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// ISO 639 primary language subtags accepted in catalog file names.
static LANGUAGE_CODES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "af", "am", "ar", "az", "be", "bg", "bn", "bo", "br", "bs", "ca", "cs", "cy", "da", "de",
        "dv", "dz", "el", "en", "eo", "es", "et", "eu", "fa", "fi", "fil", "fj", "fo", "fr", "fy",
        "ga", "gl", "gn", "gu", "ha", "he", "hi", "hr", "hu", "hy", "id", "is", "it", "ja", "jv",
        "ka", "kk", "km", "kn", "ko", "kok", "ku", "ky", "lb", "lo", "lt", "lv", "mi", "mk", "ml",
        "mn", "mo", "mr", "ms", "mt", "my", "na", "nb", "ne", "nl", "nn", "no", "oc", "or", "pa",
        "pl", "ps", "pt", "ro", "ru", "sa", "se", "sh", "si", "sk", "sl", "sq", "sr", "su", "sv",
        "sw", "ta", "te", "th", "ti", "tk", "tl", "tn", "tr", "tt", "uk", "ur", "uz", "vi", "wa",
        "xh", "yo", "za", "zh", "zu",
    ]
    .into_iter()
    .collect()
});

/// Normalize a language code to lupdate's spelling (`ko_KR`, `pt_BR`, `sr_Latn_RS`).
///
/// The primary subtag is lowercased, a four-letter script subtag is
/// title-cased and everything else is uppercased.
#[must_use]
pub fn normalize_language_code(code: &str) -> String {
    code.split(['_', '-'])
        .enumerate()
        .map(|(index, part)| {
            if index == 0 {
                part.to_lowercase()
            } else if part.len() == 4 {
                let mut chars = part.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
                })
            } else {
                part.to_uppercase()
            }
        })
        .collect::<Vec<_>>()
        .join("_")
}

/// Returns true if `code` looks like `ll`, `ll_RR`, `ll_419` or `ll_Ssss_RR` with a known `ll`.
fn is_language_code(code: &str) -> bool {
    let mut parts = code.split(['_', '-']);
    let Some(primary) = parts.next() else {
        return false;
    };
    if !LANGUAGE_CODES.contains(primary.to_lowercase().as_str()) {
        return false;
    }
    parts.all(|part| match part.len() {
        2 | 4 => part.chars().all(|c| c.is_ascii_alphabetic()),
        3 => part.chars().all(|c| c.is_ascii_digit()),
        _ => false,
    })
}

/// Language code at the end of an underscore-separated file stem
/// (`VirtualBox_pt_BR` → `pt_BR`, `qt_ko` → `ko`).
fn language_suffix(stem: &str) -> Option<&str> {
    if is_language_code(stem) {
        return Some(stem);
    }

    // Longest suffix first so `app_pt_BR` yields `pt_BR` rather than `BR`.
    stem.match_indices('_')
        .map(|(index, _)| stem.get(index + 1..).unwrap_or_default())
        .find(|suffix| is_language_code(suffix))
}

/// Detect the catalog language from its file path.
///
/// The file stem is checked first (`nls/VirtualBox_ko.ts` → `ko`), then the
/// directories from the innermost outwards (`translations/ko_KR/app.ts` →
/// `ko_KR`). The result is normalized with [`normalize_language_code`].
#[must_use]
pub fn detect_language_from_path(file_path: &Path) -> Option<String> {
    let stem = file_path.file_stem().and_then(|stem| stem.to_str());
    if let Some(language) = stem.and_then(language_suffix) {
        return Some(normalize_language_code(language));
    }

    file_path
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .rev()
        .filter_map(|component| component.as_os_str().to_str())
        .find(|component| is_language_code(component))
        .map(normalize_language_code)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ko", "ko")]
    #[case("ko-kr", "ko_KR")]
    #[case("KO_KR", "ko_KR")]
    #[case("pt_BR", "pt_BR")]
    #[case("sr-latn-rs", "sr_Latn_RS")]
    fn test_normalize_language_code(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(normalize_language_code(code), expected);
    }

    #[rstest]
    // Language suffix in the file name
    #[case("src/VBox/Frontends/VirtualBox/nls/VirtualBox_ko.ts", Some("ko"))]
    #[case("nls/qt_ko.ts", Some("ko"))]
    #[case("nls/VirtualBox_pt_BR.ts", Some("pt_BR"))]
    #[case("nls/qt_fa_IR.ts", Some("fa_IR"))]
    #[case("nls/ko.ts", Some("ko"))]
    #[case("nls/ko-KR.ts", Some("ko_KR"))]
    // Language directory
    #[case("translations/ko/app.ts", Some("ko"))]
    #[case("translations/ko_KR/app.ts", Some("ko_KR"))]
    // The file name wins over the directory
    #[case("translations/de/app_ko.ts", Some("ko"))]
    // Nothing that looks like a language
    #[case("nls/VirtualBox.ts", None)]
    #[case("translations/app.ts", None)]
    #[case("nls/VirtualBox_xx.ts", None)]
    fn test_detect_language_from_path(#[case] path: &str, #[case] expected: Option<&str>) {
        let result = detect_language_from_path(Path::new(path));
        assert_eq!(result.as_deref(), expected);
    }
}
