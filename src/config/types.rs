use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "excludePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogSettings {
    pub catalog_files: CatalogFilesConfig,

    pub exclude_patterns: Vec<String>,

    /// Serve `type="unfinished"` translations like lrelease without `-nounfinished`.
    /// Vanished and obsolete entries are never served.
    pub include_unfinished: bool,

    /// Fallback language priority when the requested language has no catalog.
    pub primary_languages: Option<Vec<String>>,

    pub loading: LoadingConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadingConfig {
    /// Catalog files read and parsed concurrently.
    /// Default: 80% of CPU cores (minimum 1).
    pub num_threads: Option<usize>,
}

impl LoadingConfig {
    /// Effective concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.num_threads.unwrap_or_else(|| (num_cpus::get() * 4 / 5).max(1))
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct DiagnosticsConfig {
    /// Report numerus messages whose form count differs from the plural rule.
    pub numerus_mismatch: bool,
    /// Report every unfinished message.
    pub unfinished: bool,
    /// Report `%1`..`%99` placeholders that differ between source and translation.
    pub placeholders: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { numerus_mismatch: true, unfinished: false, placeholders: true }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogFilesConfig {
    pub file_pattern: String,
}

impl CatalogSettings {
    /// # Errors
    /// - Empty or invalid glob pattern
    /// - Zero loading threads
    /// - Empty language code
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.catalog_files.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "catalogFiles.filePattern",
                "The pattern cannot be empty. Example: \"**/nls/*.ts\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.catalog_files.file_pattern) {
            errors.push(ValidationError::new(
                "catalogFiles.filePattern",
                format!("Invalid glob pattern '{}': {e}", self.catalog_files.file_pattern),
            ));
        }

        for (index, pattern) in self.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if self.loading.num_threads == Some(0) {
            errors.push(ValidationError::new(
                "loading.numThreads",
                "At least one thread is required. Remove this field to use the default",
            ));
        }

        if let Some(languages) = &self.primary_languages {
            for (index, language) in languages.iter().enumerate() {
                if language.trim().is_empty() {
                    errors.push(ValidationError::new(
                        format!("primaryLanguages[{index}]"),
                        "The language code cannot be empty. Example: \"ko\"",
                    ));
                }
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for CatalogFilesConfig {
    fn default() -> Self {
        Self { file_pattern: "**/{nls,translations,i18n,locales}/**/*.ts".to_string() }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            catalog_files: CatalogFilesConfig::default(),
            exclude_patterns: vec!["target/**".to_string(), "node_modules/**".to_string()],
            include_unfinished: false,
            primary_languages: None,
            loading: LoadingConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}
