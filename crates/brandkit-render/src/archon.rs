//! Archon wordmark and icon mark.

use crate::Result;
use crate::config::ArchonConfig;
use crate::svg::{FontFace, close_svg, escape_xml_text, fmt_num, fmt_px, open_svg};
use brandkit_text::{TextMeasurer, TextStyle};
use std::fmt::Write as _;

pub const FONT_FAMILY: &str = "Bebas Neue";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordmarkVariant {
    /// Off-white text, for dark backgrounds.
    Dark,
    Blue,
}

impl WordmarkVariant {
    pub const ALL: [Self; 2] = [Self::Dark, Self::Blue];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Blue => "blue",
        }
    }

    pub fn text_color(self, config: &ArchonConfig) -> &str {
        match self {
            Self::Dark => &config.white,
            Self::Blue => &config.blue,
        }
    }
}

pub fn wordmark_style(config: &ArchonConfig) -> TextStyle {
    TextStyle::new(config.font_size, config.letter_spacing_em)
}

/// Ink width of the wordmark text; the underline rule spans exactly this.
pub fn measure_wordmark(config: &ArchonConfig, measurer: &dyn TextMeasurer) -> Result<f64> {
    let width = measurer.ink_width(&config.text, &wordmark_style(config))?;
    tracing::info!(
        text = %config.text,
        font_size = config.font_size,
        letter_spacing_em = config.letter_spacing_em,
        width = %fmt_px(width),
        "measured wordmark"
    );
    Ok(width)
}

pub fn wordmark_svg(
    config: &ArchonConfig,
    variant: WordmarkVariant,
    font_data: &[u8],
    text_width: f64,
) -> String {
    let face = FontFace {
        family: FONT_FAMILY,
        style: "normal",
        weight: "400",
        data: font_data,
        fallback_url: config.font_fallback_url.as_deref(),
    };
    let x = fmt_num(config.x_start);
    let x_rule_end = config.x_start + text_width;

    let mut out = String::new();
    open_svg(&mut out, config.canvas_width, config.canvas_height);
    out.push_str("  <defs>\n");
    let _ = writeln!(&mut out, "    <style>{}</style>", face.to_css());
    out.push_str("  </defs>\n");
    let _ = writeln!(
        &mut out,
        r#"  <text x="{x}" y="{}" text-anchor="start""#,
        fmt_num(config.y_baseline)
    );
    let _ = writeln!(&mut out, r#"        font-family="'{FONT_FAMILY}', sans-serif""#);
    let _ = writeln!(
        &mut out,
        r#"        font-size="{}" letter-spacing="{}em""#,
        fmt_num(config.font_size),
        fmt_num(config.letter_spacing_em)
    );
    let _ = writeln!(
        &mut out,
        r#"        fill="{}">{}</text>"#,
        variant.text_color(config),
        escape_xml_text(&config.text)
    );
    let _ = writeln!(
        &mut out,
        r#"  <line x1="{x}" y1="{y}" x2="{}" y2="{y}" stroke="{}" stroke-width="{}"/>"#,
        fmt_px(x_rule_end),
        config.blue,
        config.rule_width,
        y = fmt_num(config.y_rule),
    );
    close_svg(&mut out);
    out
}

/// Two L-shaped corner brackets on the top-left/bottom-right diagonal with a center node.
///
/// Drawn on a 64px grid: 14px arms, 8px corner inset, r=3.5 dot. Still a distinct diagonal at
/// 16px.
pub fn icon_svg(config: &ArchonConfig) -> String {
    let stroke = &config.blue;
    let mut out = String::new();
    open_svg(&mut out, 64, 64);
    for points in ["8,22 8,8 22,8", "42,56 56,56 56,42"] {
        let _ = writeln!(&mut out, r#"  <polyline points="{points}""#);
        let _ = writeln!(
            &mut out,
            r#"            fill="none" stroke="{stroke}" stroke-width="2""#
        );
        let _ = writeln!(
            &mut out,
            r#"            stroke-linecap="square" stroke-linejoin="miter"/>"#
        );
    }
    let _ = writeln!(&mut out, r#"  <circle cx="32" cy="32" r="3.5" fill="{stroke}"/>"#);
    close_svg(&mut out);
    out
}
