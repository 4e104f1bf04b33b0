//! ts-catalog
//!
//! Qt Linguist TS (`.ts`) 翻訳カタログの読み込み、参照、複数形の選択、検査

pub mod catalog;
pub mod cli;
pub mod config;
pub mod input;
pub mod plural;
pub mod ts;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use catalog::{
    Catalog,
    CatalogSet,
    Translator,
};
