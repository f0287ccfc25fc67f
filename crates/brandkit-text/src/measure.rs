//! Ink width and advance offsets for single-line text.
//!
//! Two questions are answered from the same per-glyph advances:
//!
//! - [`measure_ink_width`]: how wide is the visible text? Letter-spacing only applies *between*
//!   characters, so the gap after the last character is not counted.
//! - [`advance_after_prefix`]: where does the next run start? Every consumed character contributes
//!   its trailing gap, including the last one.
//!
//! Kerning is ignored: layouts are tuned against plain advance sums.

use crate::error::GlyphNotFound;
use crate::font::FontMetrics;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f64,
    /// Extra inter-character gap as a fraction of `font_size`.
    pub letter_spacing_em: f64,
}

impl TextStyle {
    pub fn new(font_size: f64, letter_spacing_em: f64) -> Self {
        Self {
            font_size,
            letter_spacing_em,
        }
    }

    pub fn letter_spacing_px(&self) -> f64 {
        self.letter_spacing_em * self.font_size
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            letter_spacing_em: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlyphPosition {
    pub ch: char,
    /// Pen x where the glyph starts, relative to the start of the run.
    pub x: f64,
    /// Pixel advance, excluding letter-spacing.
    pub advance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrailingGap {
    Exclude,
    Include,
}

fn pixel_advances(
    text: &str,
    metrics: &FontMetrics,
    style: &TextStyle,
) -> Result<Vec<f64>, GlyphNotFound> {
    text.chars()
        .map(|ch| metrics.advance_px(ch, style.font_size))
        .collect()
}

fn sum_advances(advances: &[f64], spacing_px: f64, trailing: TrailingGap) -> f64 {
    match trailing {
        TrailingGap::Exclude => {
            let gaps = advances.len().saturating_sub(1);
            advances.iter().sum::<f64>() + gaps as f64 * spacing_px
        }
        TrailingGap::Include => advances
            .iter()
            .fold(0.0, |total, adv| total + adv + spacing_px),
    }
}

fn measure(
    text: &str,
    metrics: &FontMetrics,
    style: &TextStyle,
    trailing: TrailingGap,
) -> Result<f64, GlyphNotFound> {
    let advances = pixel_advances(text, metrics, style)?;
    Ok(sum_advances(&advances, style.letter_spacing_px(), trailing))
}

/// Visual extent of `text` in pixels: advances plus `n - 1` letter-spacing gaps.
pub fn measure_ink_width(
    text: &str,
    metrics: &FontMetrics,
    style: &TextStyle,
) -> Result<f64, GlyphNotFound> {
    measure(text, metrics, style, TrailingGap::Exclude)
}

/// Pen offset after `text`: advances plus one letter-spacing gap per character.
///
/// This is the x at which a differently styled run placed right after `text` begins.
pub fn advance_after_prefix(
    text: &str,
    metrics: &FontMetrics,
    style: &TextStyle,
) -> Result<f64, GlyphNotFound> {
    measure(text, metrics, style, TrailingGap::Include)
}

pub fn glyph_positions(
    text: &str,
    metrics: &FontMetrics,
    style: &TextStyle,
) -> Result<Vec<GlyphPosition>, GlyphNotFound> {
    let spacing_px = style.letter_spacing_px();
    let advances = pixel_advances(text, metrics, style)?;

    let mut x = 0.0;
    Ok(text
        .chars()
        .zip(advances)
        .map(|(ch, advance)| {
            let pos = GlyphPosition { ch, x, advance };
            x += advance + spacing_px;
            pos
        })
        .collect())
}

/// A font-backed measurer.
///
/// SVG builders take `&dyn TextMeasurer` so layouts can be checked against synthetic metrics.
pub trait TextMeasurer {
    fn ink_width(&self, text: &str, style: &TextStyle) -> Result<f64, GlyphNotFound>;
    fn advance_after(&self, text: &str, style: &TextStyle) -> Result<f64, GlyphNotFound>;
}

impl TextMeasurer for FontMetrics {
    fn ink_width(&self, text: &str, style: &TextStyle) -> Result<f64, GlyphNotFound> {
        measure_ink_width(text, self, style)
    }

    fn advance_after(&self, text: &str, style: &TextStyle) -> Result<f64, GlyphNotFound> {
        advance_after_prefix(text, self, style)
    }
}

impl TextMeasurer for crate::font::FontFile {
    fn ink_width(&self, text: &str, style: &TextStyle) -> Result<f64, GlyphNotFound> {
        measure_ink_width(text, &self.metrics, style)
    }

    fn advance_after(&self, text: &str, style: &TextStyle) -> Result<f64, GlyphNotFound> {
        advance_after_prefix(text, &self.metrics, style)
    }
}
