//! Catalog file inputs

pub mod language;

pub use language::{
    detect_language_from_path,
    normalize_language_code,
};
