#![forbid(unsafe_code)]

//! `brandkit-text` measures text from font metrics so SVG layouts (underline rules, clipped
//! multi-color runs, centering) can be placed exactly without rendering first.
//!
//! Fonts are loaded explicitly ([`FontFile::load`] or a caller-owned [`FontCache`]) and passed to
//! each measurement; there is no global font state.

pub mod error;
pub mod font;
pub mod locate;
pub mod measure;

pub use error::{FontError, GlyphNotFound};
pub use font::{FontCache, FontFile, FontMetrics};
pub use locate::FontLocator;
pub use measure::{
    GlyphPosition, TextMeasurer, TextStyle, advance_after_prefix, glyph_positions,
    measure_ink_width,
};
