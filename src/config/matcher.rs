//! File pattern matcher for catalog files.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::CatalogSettings;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid catalog file pattern '{pattern}': {source}")]
    InvalidCatalogPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Matches files against configured glob patterns.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    workspace_root: PathBuf,
    catalog_set: GlobSet,
    exclude_set: GlobSet,
}

impl FileMatcher {
    /// Creates a new matcher from settings.
    pub fn new(workspace_root: PathBuf, settings: &CatalogSettings) -> Result<Self, MatcherError> {
        let catalog_set = Self::build_glob_set(
            std::slice::from_ref(&settings.catalog_files.file_pattern),
            |pattern, source| MatcherError::InvalidCatalogPattern { pattern, source },
        )?;

        let exclude_set = Self::build_glob_set(&settings.exclude_patterns, |pattern, source| {
            MatcherError::InvalidExcludePattern { pattern, source }
        })?;

        Ok(Self { workspace_root, catalog_set, exclude_set })
    }

    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
    where
        F: Fn(String, globset::Error) -> MatcherError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Returns true if the path matches `catalogFiles.filePattern` but not `excludePatterns`.
    ///
    /// The path must be absolute and under the workspace root.
    #[must_use]
    pub fn is_catalog_file(&self, absolute_path: &Path) -> bool {
        let Some(relative_path) = absolute_path.strip_prefix(&self.workspace_root).ok() else {
            return false;
        };

        self.is_catalog_file_relative(relative_path)
    }

    /// Returns true if the path matches `catalogFiles.filePattern` but not `excludePatterns`.
    ///
    /// The path must be relative to the workspace root.
    #[must_use]
    pub fn is_catalog_file_relative(&self, relative_path: &Path) -> bool {
        self.catalog_set.is_match(relative_path) && !self.exclude_set.is_match(relative_path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::config::CatalogFilesConfig;

    fn matcher(settings: &CatalogSettings) -> FileMatcher {
        FileMatcher::new(PathBuf::from("/workspace"), settings).unwrap()
    }

    #[rstest]
    #[case("src/VBox/Frontends/VirtualBox/nls/VirtualBox_ko.ts", true)]
    #[case("nls/qt_ko.ts", true)]
    #[case("app/translations/ko/main.ts", true)]
    #[case("src/components/button.ts", false)]
    #[case("target/nls/VirtualBox_ko.ts", false)]
    #[case("nls/VirtualBox_ko.qm", false)]
    fn test_is_catalog_file_relative(#[case] path: &str, #[case] expected: bool) {
        let matcher = matcher(&CatalogSettings::default());

        assert_that!(matcher.is_catalog_file_relative(Path::new(path)), eq(expected));
    }

    #[rstest]
    #[case("/workspace/nls/qt_ko.ts", true)]
    #[case("/elsewhere/nls/qt_ko.ts", false)]
    fn test_is_catalog_file_absolute(#[case] path: &str, #[case] expected: bool) {
        let matcher = matcher(&CatalogSettings::default());

        assert_that!(matcher.is_catalog_file(Path::new(path)), eq(expected));
    }

    #[rstest]
    fn test_custom_pattern() {
        let settings = CatalogSettings {
            catalog_files: CatalogFilesConfig { file_pattern: "lang/*.ts".to_string() },
            exclude_patterns: vec!["lang/qt_*.ts".to_string()],
            ..CatalogSettings::default()
        };
        let matcher = matcher(&settings);

        assert_that!(matcher.is_catalog_file_relative(Path::new("lang/app_ko.ts")), eq(true));
        assert_that!(matcher.is_catalog_file_relative(Path::new("lang/qt_ko.ts")), eq(false));
        assert_that!(matcher.workspace_root(), eq(Path::new("/workspace")));
    }

    #[rstest]
    fn test_invalid_pattern_is_reported() {
        let settings = CatalogSettings {
            catalog_files: CatalogFilesConfig { file_pattern: "nls/[*.ts".to_string() },
            ..CatalogSettings::default()
        };

        let result = FileMatcher::new(PathBuf::from("/workspace"), &settings);

        assert!(matches!(result, Err(MatcherError::InvalidCatalogPattern { .. })));
    }
}
