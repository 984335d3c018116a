//! Test helpers for the block parser.
//!
//! [`normalize`] turns a node tree into a plain [`Snap`] that `insta` can
//! store as YAML. [`invariants`] panics on the first structural rule a tree breaks:
//! leaf kinds owning children, spans that do not rebuild `content`, heading
//! levels outside 1..=3.

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
