//! Line-level constructs, each owning its delimiter knowledge.

mod block_quote;
mod callout;
mod code_fence;
mod divider;
mod equation;
mod heading;
mod list_marker;
mod media_line;
mod table_row;
mod toggle;

pub use block_quote::BlockQuote;
pub use callout::{Admonition, Aside};
pub use code_fence::{CodeFence, FenceKind, FenceSig};
pub use divider::Divider;
pub use equation::Equation;
pub use heading::Heading;
pub use list_marker::ListMarker;
pub use media_line::MediaLine;
pub use table_row::TableRow;
pub use toggle::ToggleMarker;
