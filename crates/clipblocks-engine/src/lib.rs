pub mod ast;
pub mod classify;
pub mod convert;
pub mod error;
pub mod format;
pub mod parsing;
pub mod print;

// Re-export key types for easier usage
pub use ast::{AstNode, NodeKind, TableFormat};
pub use classify::{Classifier, ClassifierOptions, ContentClassification, ContentKind, classify};
pub use convert::{Conversion, ConvertOptions, Converter, convert};
pub use error::OptionsError;
pub use format::{
    DestinationLimits, FormatOptions, FormattedBlock, FormattedDocument, Formatter, ValidationResult,
    validate,
};
pub use parsing::{inline::from_markup, parse};
pub use print::{PrintOptions, Printer, print};
