//! Qt Linguist TS (`.ts`) file format: model, reader and writer.

mod error;
mod model;
mod reader;
mod writer;

pub use error::ParseError;
pub use model::{
    Context,
    Extra,
    Location,
    Message,
    NumerusForm,
    Translation,
    TranslationBody,
    TranslationStatus,
    TsDocument,
};
pub use reader::parse_document;
pub use writer::write_document;
