//! # Inline Parsing
//!
//! Cursor-based parsing of a block's raw text into [`RichTextSpan`]s.
//!
//! ## Modules
//!
//! - **`types`**: `RichTextSpan`, the flat formatted run shared with the formatter
//! - **`kinds`**: Inline constructs with owned delimiters
//! - **`cursor`**: Bounded byte `Cursor`
//! - **`parser`**: `from_markup()` entry point with `try_*` helpers
//! - **`markup`**: `to_markup()`, the inverse used by the pretty printer
//!
//! ## Raw Zones
//!
//! Code spans and inline equations suppress all other parsing inside them:
//! `` `**x**` `` is code containing literal asterisks.

pub mod cursor;
pub mod kinds;
pub mod markup;
pub mod parser;
pub mod types;

pub use markup::to_markup;
pub use parser::from_markup;
pub use types::{RichTextSpan, plain_text};
