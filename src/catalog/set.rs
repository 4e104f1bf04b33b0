//! Catalogs of a workspace, one or more per language.

use std::path::{
    Path,
    PathBuf,
};

use futures::StreamExt;
use ignore::WalkBuilder;

use super::Catalog;
use crate::config::{
    CatalogSettings,
    FileMatcher,
    MatcherError,
};
use crate::input::normalize_language_code;
use crate::plural::{
    split_language_code,
    substitute_count,
};
use crate::ts::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Matcher(#[from] MatcherError),

    #[error("Failed to load {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Catalog loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Every catalog found in a workspace, ordered by path.
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    /// Loaded catalogs, sorted by path.
    catalogs: Vec<Catalog>,
    /// Fallback languages tried after the requested one.
    primary_languages: Vec<String>,
}

impl CatalogSet {
    /// Wrap already loaded catalogs.
    #[must_use]
    pub fn from_catalogs(catalogs: Vec<Catalog>) -> Self {
        Self { catalogs, primary_languages: Vec::new() }
    }

    /// Fallback languages tried after the requested one, in order.
    #[must_use]
    pub fn with_primary_languages(mut self, primary_languages: Vec<String>) -> Self {
        self.primary_languages = primary_languages;
        self
    }

    /// Find and load every catalog under `workspace_root`.
    ///
    /// Files are read and parsed concurrently, at most
    /// `loading.numThreads` at a time. Files that fail to load are logged
    /// and skipped.
    ///
    /// # Errors
    /// Returns `LoadError::Matcher` when the configured patterns are invalid.
    pub async fn load_workspace(
        workspace_root: &Path,
        settings: &CatalogSettings,
    ) -> Result<Self, LoadError> {
        tracing::debug!(workspace_root = %workspace_root.display(), "Loading catalogs");
        let matcher = FileMatcher::new(workspace_root.to_path_buf(), settings)?;
        let files = find_catalog_files(&matcher);
        let concurrency = settings.loading.concurrency();
        tracing::debug!(files = files.len(), concurrency, "Found catalog files");

        let include_unfinished = settings.include_unfinished;
        let mut catalogs: Vec<Catalog> = futures::stream::iter(files)
            .map(load_catalog)
            .buffer_unordered(concurrency)
            .filter_map(|result| async move {
                match result {
                    Ok(catalog) => Some(catalog.with_unfinished(include_unfinished)),
                    Err(e) => {
                        tracing::warn!("Skipping catalog: {e}");
                        None
                    }
                }
            })
            .collect()
            .await;
        catalogs.sort_by(|a, b| a.path().cmp(&b.path()));

        Ok(Self {
            catalogs,
            primary_languages: settings.primary_languages.clone().unwrap_or_default(),
        })
    }

    #[must_use]
    pub fn catalogs(&self) -> &[Catalog] {
        &self.catalogs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Distinct catalog languages, sorted.
    #[must_use]
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.catalogs.iter().filter_map(Catalog::language).collect();
        languages.sort_unstable();
        languages.dedup();
        languages
    }

    /// Translator for `language`.
    ///
    /// Catalogs are searched in this order: the exact language, its primary
    /// subtag (`ko_KR` → `ko`), other regions of the same language, then the
    /// configured primary languages.
    #[must_use]
    pub fn translator(&self, language: &str) -> Translator<'_> {
        let requested = normalize_language_code(language);
        let (primary, _) = split_language_code(language);

        let mut chain: Vec<&Catalog> = Vec::new();
        let mut push_matching = |matches: &dyn Fn(&str) -> bool| {
            for catalog in &self.catalogs {
                let Some(catalog_language) = catalog.language() else {
                    continue;
                };
                if matches(catalog_language) && !chain.iter().any(|c| std::ptr::eq(*c, catalog)) {
                    chain.push(catalog);
                }
            }
        };

        push_matching(&|code| normalize_language_code(code) == requested);
        push_matching(&|code| normalize_language_code(code) == primary);
        push_matching(&|code| split_language_code(code).0 == primary);
        for fallback in &self.primary_languages {
            let fallback = normalize_language_code(fallback);
            push_matching(&|code| normalize_language_code(code) == fallback);
        }

        if chain.is_empty() {
            tracing::debug!(language, "No catalog for language");
        }
        Translator { catalogs: chain }
    }
}

/// Catalog files under the matcher's workspace root, honoring `.gitignore`.
fn find_catalog_files(matcher: &FileMatcher) -> Vec<PathBuf> {
    let mut found_files = Vec::new();
    for result in WalkBuilder::new(matcher.workspace_root())
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if matcher.is_catalog_file(entry.path()) {
            found_files.push(entry.into_path());
        }
    }

    found_files
}

/// Read a catalog file, parsing it on the blocking pool.
async fn load_catalog(path: PathBuf) -> Result<Catalog, LoadError> {
    let read = tokio::fs::read_to_string(&path).await;
    let text = match read {
        Ok(text) => text,
        Err(e) => return Err(LoadError::Parse { path, source: e.into() }),
    };

    tracing::debug!(path = %path.display(), "Parsing catalog");
    tokio::task::spawn_blocking(move || {
        Catalog::parse_from(&text, &path).map_err(|source| LoadError::Parse { path, source })
    })
    .await?
}

/// Lookups over a chain of catalogs; the first hit wins.
#[derive(Debug, Clone)]
pub struct Translator<'a> {
    /// Search order.
    catalogs: Vec<&'a Catalog>,
}

impl<'a> Translator<'a> {
    /// Catalogs searched, in order.
    #[must_use]
    pub fn catalogs(&self) -> &[&'a Catalog] {
        &self.catalogs
    }

    #[must_use]
    pub fn lookup(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&'a str> {
        self.catalogs.iter().copied().find_map(|catalog| catalog.lookup(context, source, comment))
    }

    #[must_use]
    pub fn lookup_plural(
        &self,
        context: &str,
        source: &str,
        n: i64,
        comment: Option<&str>,
    ) -> Option<String> {
        self.catalogs
            .iter()
            .copied()
            .find_map(|catalog| catalog.lookup_plural(context, source, n, comment))
    }

    #[must_use]
    pub fn translate<'s>(&self, context: &str, source: &'s str, comment: Option<&str>) -> &'s str
    where
        'a: 's,
    {
        self.lookup(context, source, comment).unwrap_or(source)
    }

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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::LoadingConfig;
    use crate::test_utils::{
        catalog_text,
        single_message,
        write_catalog,
    };

    fn catalog(language: &str, source: &str, translation: &str) -> Catalog {
        Catalog::parse(&catalog_text(language, &single_message("Dialog", source, translation)))
            .unwrap()
    }

    #[googletest::test]
    #[tokio::test]
    async fn test_load_workspace_finds_catalogs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_catalog(
            root,
            "src/nls/VirtualBox_ko.ts",
            &catalog_text("ko", &single_message("UIMessageCenter", "Cancel", "취소")),
        );
        write_catalog(
            root,
            "src/nls/VirtualBox_ar.ts",
            &catalog_text("ar", &single_message("UIMessageCenter", "Cancel", "إلغاء")),
        );
        write_catalog(root, "src/nls/broken_ko.ts", "<TS><context></TS>");
        write_catalog(root, "src/app/main.ts", "export const x = 1;");
        write_catalog(
            root,
            "target/nls/VirtualBox_de.ts",
            &catalog_text("de", &single_message("UIMessageCenter", "Cancel", "Abbrechen")),
        );

        let settings = CatalogSettings {
            loading: LoadingConfig { num_threads: Some(2) },
            ..CatalogSettings::default()
        };
        let set = CatalogSet::load_workspace(root, &settings).await.unwrap();

        assert_that!(set.len(), eq(2));
        assert_that!(set.languages(), elements_are![eq(&"ar"), eq(&"ko")]);
        expect_that!(
            set.translator("ko").lookup("UIMessageCenter", "Cancel", None),
            some(eq("취소"))
        );
        expect_that!(
            set.translator("ar").lookup("UIMessageCenter", "Cancel", None),
            some(eq("إلغاء"))
        );
    }

    #[googletest::test]
    #[tokio::test]
    async fn test_load_workspace_applies_include_unfinished() {
        let temp_dir = TempDir::new().unwrap();
        write_catalog(
            temp_dir.path(),
            "nls/app_ko.ts",
            &catalog_text(
                "ko",
                r#"<context>
    <name>Dialog</name>
    <message>
        <source>Pending</source>
        <translation type="unfinished">보류 중</translation>
    </message>
</context>
"#,
            ),
        );

        let settings = CatalogSettings { include_unfinished: true, ..CatalogSettings::default() };
        let set = CatalogSet::load_workspace(temp_dir.path(), &settings).await.unwrap();

        expect_that!(set.translator("ko").lookup("Dialog", "Pending", None), some(eq("보류 중")));
    }

    #[googletest::test]
    #[tokio::test]
    async fn test_load_workspace_empty() {
        let temp_dir = TempDir::new().unwrap();

        let set = CatalogSet::load_workspace(temp_dir.path(), &CatalogSettings::default())
            .await
            .unwrap();

        expect_that!(set.is_empty(), eq(true));
        expect_that!(set.translator("ko").translate("Dialog", "Cancel", None), eq("Cancel"));
    }

    #[tokio::test]
    async fn test_load_workspace_invalid_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let settings =
            CatalogSettings { exclude_patterns: vec!["[".to_string()], ..CatalogSettings::default() };

        let result = CatalogSet::load_workspace(temp_dir.path(), &settings).await;

        assert!(matches!(result, Err(LoadError::Matcher(_))));
    }

    #[rstest]
    #[googletest::test]
    fn test_translator_fallback_chain() {
        let set = CatalogSet::from_catalogs(vec![
            catalog("en", "Close", "Close"),
            catalog("ko", "Cancel", "취소"),
            catalog("ko_KR", "OK", "확인"),
            catalog("pt_BR", "Cancel", "Cancelar"),
        ])
        .with_primary_languages(vec!["en".to_string()]);

        let translator = set.translator("ko-KR");

        expect_that!(translator.catalogs().len(), eq(3));
        expect_that!(translator.lookup("Dialog", "OK", None), some(eq("확인")));
        expect_that!(translator.lookup("Dialog", "Cancel", None), some(eq("취소")));
        expect_that!(translator.lookup("Dialog", "Close", None), some(eq("Close")));
        expect_that!(translator.lookup("Dialog", "Help", None), none());
        expect_that!(translator.translate("Dialog", "Help", None), eq("Help"));
    }

    #[rstest]
    #[googletest::test]
    fn test_translator_other_region() {
        let set = CatalogSet::from_catalogs(vec![catalog("pt_BR", "Cancel", "Cancelar")]);

        expect_that!(set.translator("pt").lookup("Dialog", "Cancel", None), some(eq("Cancelar")));
        expect_that!(set.translator("ko").lookup("Dialog", "Cancel", None), none());
    }

    #[rstest]
    #[googletest::test]
    fn test_translator_plural() {
        let set = CatalogSet::from_catalogs(vec![
            Catalog::parse(&catalog_text(
                "ar",
                r#"<context>
    <name>Dialog</name>
    <message numerus="yes">
        <source>%n file(s)</source>
        <translation>
            <numerusform>لا ملفات</numerusform>
            <numerusform>ملف واحد</numerusform>
            <numerusform>ملفان</numerusform>
            <numerusform>%n ملفات</numerusform>
            <numerusform>%n ملفًا</numerusform>
            <numerusform>%n ملف</numerusform>
        </translation>
    </message>
</context>
"#,
            ))
            .unwrap(),
        ]);
        let translator = set.translator("ar");

        expect_that!(translator.lookup_plural("Dialog", "%n file(s)", 0, None), some(eq("لا ملفات")));
        expect_that!(translator.lookup_plural("Dialog", "%n file(s)", 3, None), some(eq("3 ملفات")));
        expect_that!(translator.lookup_plural("Dialog", "%n file(s)", 11, None), some(eq("11 ملفًا")));
        expect_that!(translator.lookup_plural("Dialog", "%n file(s)", 100, None), some(eq("100 ملف")));
        expect_that!(
            set.translator("ko").translate_plural("Dialog", "%n file(s)", 2, None),
            eq("2 file(s)")
        );
    }
}
