//! Translation catalogs: loading, lookup and checks.

pub mod check;
mod lookup;
pub mod set;

pub use check::{
    CatalogStats,
    Diagnostic,
    DiagnosticKind,
    Severity,
    check_catalog,
};
pub use lookup::Catalog;
pub use set::{
    CatalogSet,
    LoadError,
    Translator,
};
