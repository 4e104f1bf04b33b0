//! VirtualBox の韓国語カタログを使った結合テスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use std::path::{
    Path,
    PathBuf,
};

use googletest::prelude::*;
use rstest::*;
use ts_catalog::catalog::{
    CatalogStats,
    check_catalog,
};
use ts_catalog::config::{
    CatalogSettings,
    DiagnosticsConfig,
};
use ts_catalog::plural::PluralRule;
use ts_catalog::ts::{
    TranslationStatus,
    parse_document,
    write_document,
};
use ts_catalog::{
    Catalog,
    CatalogSet,
};

const PASSWORD_PROMPT: &str =
    "This virtual machine is password protected. Please enter the %n encryption password(s) below.";

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/virtualbox_ko.ts")
}

#[fixture]
fn korean() -> Catalog {
    Catalog::load(fixture_path()).unwrap()
}

#[rstest]
#[googletest::test]
fn test_load_korean_catalog(korean: Catalog) {
    expect_that!(korean.language(), some(eq("ko")));
    expect_that!(korean.plural_rule(), eq(PluralRule::Universal));
    expect_that!(korean.document().contexts.len(), eq(7));
}

#[rstest]
#[googletest::test]
fn test_lookup_cancel(korean: Catalog) {
    expect_that!(korean.lookup("UIMessageCenter", "Cancel", None), some(eq("취소")));
}

#[rstest]
#[googletest::test]
fn test_lookup_keeps_markup(korean: Catalog) {
    expect_that!(
        korean.lookup(
            "QFileDialog",
            "<b>The name \"%1\" cannot be used.</b><p>Try using another name, with fewer characters or no punctuation marks.",
            None
        ),
        some(eq(
            "<b>\"%1\" 이름을 사용할 수 없습니다.</b><p>다른 이름을 사용하거나, 글자 수를 줄이거나, 구두점을 사용하지 마십시오."
        ))
    );
}

#[rstest]
#[case("cable (Network tooltip)", "연결됨")]
#[case("session (Recording tooltip)", "연결된 세션")]
#[googletest::test]
fn test_lookup_by_comment(korean: Catalog, #[case] comment: &str, #[case] expected: &str) {
    expect_that!(korean.lookup("UIIndicatorsPool", "Connected", Some(comment)), some(eq(expected)));
}

#[rstest]
#[googletest::test]
fn test_lookup_without_matching_comment_misses(korean: Catalog) {
    expect_that!(korean.lookup("UIIndicatorsPool", "Connected", None), none());
    expect_that!(korean.translate("UIIndicatorsPool", "Connected", None), eq("Connected"));
}

#[rstest]
#[googletest::test]
fn test_unfinished_with_text_is_miss(korean: Catalog) {
    let message = korean.message("UIDetails", "Nested VT-x/AMD-V", Some("details (system)")).unwrap();

    expect_that!(message.status(), eq(TranslationStatus::Unfinished));
    expect_that!(message.translation.as_ref().and_then(|t| t.text()), some(eq("중첩된 VT-x/AMD-V")));
    expect_that!(korean.lookup("UIDetails", "Nested VT-x/AMD-V", Some("details (system)")), none());
    expect_that!(
        korean.lookup("UIDetails", "Base Memory", Some("details (system)")),
        some(eq("기본 메모리"))
    );
}

#[rstest]
#[case("Boot Order")]
#[case("Acceleration")]
#[googletest::test]
fn test_retired_messages_miss(korean: Catalog, #[case] source: &str) {
    let unfinished_included = korean.with_unfinished(true);

    expect_that!(unfinished_included.lookup("UIDetails", source, Some("details (system)")), none());
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(5)]
#[case(1000)]
#[googletest::test]
fn test_lookup_plural_single_korean_form(korean: Catalog, #[case] n: i64) {
    let expected = format!("이 가상 머신은 암호로 보호되어 있습니다. 아래에 {n}개의 암호화 암호를 입력하십시오.");

    expect_that!(
        korean.lookup_plural("UIAddDiskEncryptionPasswordDialog", PASSWORD_PROMPT, n, None),
        some(eq(expected.as_str()))
    );
}

#[rstest]
fn test_every_numerus_message_has_one_form(korean: Catalog) {
    let counts: Vec<usize> = korean
        .document()
        .messages()
        .filter(|(_, message)| message.numerus)
        .filter_map(|(_, message)| message.translation.as_ref()?.numerus_forms().map(<[_]>::len))
        .collect();

    assert_eq!(counts, vec![1, 1]);
}

#[rstest]
fn test_round_trip_is_byte_identical() {
    let text = std::fs::read_to_string(fixture_path()).unwrap();

    let document = parse_document(&text).unwrap();
    let written = write_document(&document);

    assert_eq!(written, text);
    assert_eq!(parse_document(&written).unwrap(), document);
}

#[rstest]
#[googletest::test]
fn test_check_korean_catalog(korean: Catalog) {
    let config = DiagnosticsConfig { unfinished: true, ..DiagnosticsConfig::default() };

    let diagnostics = check_catalog(&korean, &config);

    // Scroll Left and Nested VT-x/AMD-V
    expect_that!(diagnostics, len(eq(2)));
}

#[rstest]
#[googletest::test]
fn test_stats_korean_catalog(korean: Catalog) {
    let stats = CatalogStats::collect(&korean);

    expect_that!(stats.messages, eq(17));
    expect_that!(stats.finished, eq(13));
    expect_that!(stats.unfinished, eq(2));
    expect_that!(stats.vanished, eq(1));
    expect_that!(stats.obsolete, eq(1));
    expect_that!(stats.numerus, eq(2));
}

#[googletest::test]
#[tokio::test]
async fn test_catalog_set_fallback() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let nls = temp_dir.path().join("src/VBox/Frontends/VirtualBox/nls");
    std::fs::create_dir_all(&nls).unwrap();
    std::fs::copy(fixture_path(), nls.join("VirtualBox_ko.ts")).unwrap();
    std::fs::write(
        nls.join("VirtualBox_en.ts"),
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="en">
<context>
    <name>UIMessageCenter</name>
    <message>
        <source>Close</source>
        <translation>Close</translation>
    </message>
</context>
</TS>
"#,
    )
    .unwrap();
    let settings =
        CatalogSettings { primary_languages: Some(vec!["en".to_string()]), ..CatalogSettings::default() };

    let set = CatalogSet::load_workspace(temp_dir.path(), &settings).await.unwrap();
    let translator = set.translator("ko_KR");

    expect_that!(set.languages(), elements_are![eq(&"en"), eq(&"ko")]);
    expect_that!(translator.lookup("UIMessageCenter", "Cancel", None), some(eq("취소")));
    expect_that!(translator.lookup("UIMessageCenter", "Close", None), some(eq("Close")));
    expect_that!(
        translator.translate_plural("UIAddDiskEncryptionPasswordDialog", PASSWORD_PROMPT, 2, None),
        contains_substring("아래에 2개의")
    );
}
