//! CustodyZero social card (1200×630 by default).
//!
//! Layout is computed first ([`SocialCardLayout::compute`]) from font metrics alone, then written
//! as SVG. The two-tone wordmark is one `<text>` drawn twice under complementary clip rects that
//! meet at the pen position after the prefix.

use crate::Result;
use crate::config::SocialCardConfig;
use crate::fonts::BrandFonts;
use crate::svg::{FontFace, close_svg, escape_xml_text, fmt_num, fmt_px, open_svg};
use brandkit_text::{TextMeasurer, TextStyle};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SocialCardLayout {
    /// Left edge of the centered wordmark.
    pub wordmark_x: f64,
    pub wordmark_width: f64,
    /// Where the suffix run (amber) starts.
    pub split_x: f64,
    pub rule_y: f64,
    pub rule_x1: f64,
    pub rule_x2: f64,
    pub tagline_x: f64,
    pub url_x: f64,
    pub glow_cx: f64,
    pub glow_cy: f64,
    pub glow_r: f64,
}

impl SocialCardLayout {
    pub fn compute(
        config: &SocialCardConfig,
        wordmark: &dyn TextMeasurer,
        tagline: &dyn TextMeasurer,
        url: &dyn TextMeasurer,
    ) -> Result<Self> {
        let w = f64::from(config.width);
        let h = f64::from(config.height);

        let wm_style = TextStyle::new(
            config.wordmark_font_size,
            config.wordmark_letter_spacing_em,
        );
        let wordmark_width = wordmark.ink_width(&config.wordmark_text, &wm_style)?;
        let wordmark_x = (w - wordmark_width) / 2.0;
        let split_x = wordmark_x + wordmark.advance_after(&config.wordmark_prefix, &wm_style)?;

        // Tagline and URL are centered on their unspaced ink width.
        let tagline_width = tagline.ink_width(
            &config.tagline_text,
            &TextStyle::new(config.tagline_font_size, 0.0),
        )?;
        let url_width = url.ink_width(&config.url_text, &TextStyle::new(config.url_font_size, 0.0))?;

        let layout = Self {
            wordmark_x,
            wordmark_width,
            split_x,
            rule_y: config.wordmark_baseline + config.rule_offset_y,
            rule_x1: wordmark_x,
            rule_x2: wordmark_x + wordmark_width,
            tagline_x: (w - tagline_width) / 2.0,
            url_x: (w - url_width) / 2.0,
            glow_cx: w * config.glow_cx_frac,
            glow_cy: h * config.glow_cy_frac,
            glow_r: w * config.glow_r_frac,
        };
        tracing::debug!(?layout, "computed social card layout");
        Ok(layout)
    }
}

/// Horizontal and vertical grid lines every `step` px, edges included when they fall on the grid.
pub fn grid_path(width: u32, height: u32, step: u32) -> String {
    let step = step.max(1) as usize;
    let vertical = (0..=width)
        .step_by(step)
        .map(|x| format!("M {x} 0 L {x} {height}"));
    let horizontal = (0..=height)
        .step_by(step)
        .map(|y| format!("M 0 {y} L {width} {y}"));
    vertical.chain(horizontal).collect::<Vec<_>>().join(" ")
}

/// The `<style>` payload: one `@font-face` per brand typeface.
pub fn font_faces_css(fonts: &BrandFonts) -> String {
    [
        FontFace {
            family: "Bebas Neue",
            style: "normal",
            weight: "400",
            data: &fonts.bebas_neue.data,
            fallback_url: None,
        },
        FontFace {
            family: "Fraunces",
            style: "italic",
            weight: "300",
            data: &fonts.fraunces_light_italic.data,
            fallback_url: None,
        },
        FontFace {
            family: "DM Mono",
            style: "normal",
            weight: "400",
            data: &fonts.dm_mono.data,
            fallback_url: None,
        },
    ]
    .iter()
    .map(FontFace::to_css)
    .collect::<Vec<_>>()
    .join("\n")
}

pub fn social_card_svg(
    config: &SocialCardConfig,
    layout: &SocialCardLayout,
    font_css: &str,
) -> String {
    let (w, h) = (config.width, config.height);
    let amber = &config.amber;
    let wordmark = escape_xml_text(&config.wordmark_text);

    let mut out = String::new();
    open_svg(&mut out, w, h);
    out.push_str("  <defs>\n");
    let _ = writeln!(&mut out, "    <style>{font_css}</style>");
    out.push('\n');

    out.push_str("    <!-- Amber radial glow -->\n");
    let (cx, cy, r) = (layout.glow_cx, layout.glow_cy, layout.glow_r);
    let _ = writeln!(
        &mut out,
        r#"    <radialGradient id="amberGlow" cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}""#
    );
    let _ = writeln!(
        &mut out,
        r#"                    fx="{cx:.1}" fy="{cy:.1}" gradientUnits="userSpaceOnUse">"#
    );
    for (offset, opacity) in [("0%", "0.08"), ("60%", "0.03"), ("100%", "0")] {
        let _ = writeln!(
            &mut out,
            r#"      <stop offset="{offset}" stop-color="{amber}" stop-opacity="{opacity}"/>"#
        );
    }
    out.push_str("    </radialGradient>\n\n");

    let split = fmt_px(layout.split_x);
    out.push_str("    <!-- Prefix clip: everything left of the split -->\n");
    let _ = writeln!(
        &mut out,
        r#"    <clipPath id="clipWhite"><rect x="0" y="0" width="{split}" height="{h}"/></clipPath>"#
    );
    out.push_str("    <!-- Suffix clip: the split onwards -->\n");
    let _ = writeln!(
        &mut out,
        r#"    <clipPath id="clipAmber"><rect x="{split}" y="0" width="{w}" height="{h}"/></clipPath>"#
    );
    out.push_str("  </defs>\n\n");

    let _ = writeln!(
        &mut out,
        r#"  <rect width="{w}" height="{h}" fill="{}"/>"#,
        config.background
    );
    let _ = writeln!(
        &mut out,
        r#"  <path d="{}" fill="none" stroke="{}" stroke-width="1" opacity="{}"/>"#,
        grid_path(w, h, config.grid_step),
        config.grid_color,
        fmt_num(config.grid_opacity)
    );
    let _ = writeln!(
        &mut out,
        r#"  <rect width="{w}" height="{h}" fill="url(#amberGlow)"/>"#
    );

    let wm_x = fmt_px(layout.wordmark_x);
    for (fill, clip) in [(&config.white, "clipWhite"), (amber, "clipAmber")] {
        let _ = writeln!(
            &mut out,
            r#"  <text x="{wm_x}" y="{}" font-family="'Bebas Neue', sans-serif""#,
            fmt_num(config.wordmark_baseline)
        );
        let _ = writeln!(
            &mut out,
            r#"        font-size="{}" letter-spacing="{}em""#,
            fmt_num(config.wordmark_font_size),
            fmt_num(config.wordmark_letter_spacing_em)
        );
        let _ = writeln!(
            &mut out,
            r#"        fill="{fill}" clip-path="url(#{clip})">{wordmark}</text>"#
        );
    }

    let _ = writeln!(
        &mut out,
        r#"  <line x1="{}" y1="{y}" x2="{}" y2="{y}" stroke="{amber}" stroke-width="{}"/>"#,
        fmt_px(layout.rule_x1),
        fmt_px(layout.rule_x2),
        config.rule_width,
        y = fmt_num(layout.rule_y),
    );

    let _ = writeln!(
        &mut out,
        r#"  <text x="{}" y="{}" font-family="'Fraunces', Georgia, serif""#,
        fmt_px(layout.tagline_x),
        fmt_num(config.tagline_baseline)
    );
    let _ = writeln!(
        &mut out,
        r#"        font-style="italic" font-weight="300" font-size="{}" fill="{}""#,
        fmt_num(config.tagline_font_size),
        config.text_secondary
    );
    let _ = writeln!(
        &mut out,
        r#"        letter-spacing="{}em">{}</text>"#,
        fmt_num(config.tagline_letter_spacing_em),
        escape_xml_text(&config.tagline_text)
    );

    let _ = writeln!(
        &mut out,
        r#"  <text x="{}" y="{}" font-family="'DM Mono', 'Courier New', monospace""#,
        fmt_px(layout.url_x),
        fmt_num(config.url_baseline)
    );
    let _ = writeln!(
        &mut out,
        r#"        font-size="{}" fill="{}" letter-spacing="{}em">{}</text>"#,
        fmt_num(config.url_font_size),
        config.text_muted,
        fmt_num(config.url_letter_spacing_em),
        escape_xml_text(&config.url_text)
    );
    close_svg(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandkit_text::FontMetrics;

    /// Every printable ASCII character advances `advance` units on a 1000-unit em.
    fn fixed_width(advance: u16) -> FontMetrics {
        let cmap = (' '..='~').map(|ch| (ch, 1u16));
        FontMetrics::from_tables(cmap, vec![0, advance], 1000).unwrap()
    }

    #[test]
    fn wordmark_is_centered_and_split_after_the_prefix() {
        let config = SocialCardConfig::default();
        let m = fixed_width(400);
        let layout = SocialCardLayout::compute(&config, &m, &m, &m).unwrap();

        // 11 glyphs of 44px + 10 gaps of 16.5px
        let width = 11.0 * 44.0 + 10.0 * 16.5;
        assert!((layout.wordmark_width - width).abs() < 1e-9);
        assert!((layout.wordmark_x - (1200.0 - width) / 2.0).abs() < 1e-9);
        // "CUSTODY": 7 glyphs, each followed by its gap
        let split = layout.wordmark_x + 7.0 * (44.0 + 16.5);
        assert!((layout.split_x - split).abs() < 1e-9);
        assert_eq!(layout.rule_x1, layout.wordmark_x);
        assert!((layout.rule_x2 - layout.wordmark_x - width).abs() < 1e-9);
        assert_eq!(layout.rule_y, 331.0);
    }

    #[test]
    fn tagline_and_url_center_without_letter_spacing() {
        let config = SocialCardConfig::default();
        let wm = fixed_width(400);
        let tagline = fixed_width(500);
        let url = fixed_width(600);
        let layout = SocialCardLayout::compute(&config, &wm, &tagline, &url).unwrap();

        let tl_width = 24.0 * 13.0;
        assert!((layout.tagline_x - (1200.0 - tl_width) / 2.0).abs() < 1e-9);
        let url_width = 15.0 * 7.8;
        assert!((layout.url_x - (1200.0 - url_width) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn glyph_missing_from_url_font_fails_layout() {
        let config = SocialCardConfig {
            url_text: "custodyzero.com\u{2192}".to_string(),
            ..Default::default()
        };
        let m = fixed_width(400);
        let err = SocialCardLayout::compute(&config, &m, &m, &m).unwrap_err();
        assert!(err.to_string().contains("U+2192"), "{err}");
    }

    #[test]
    fn grid_includes_aligned_edges_only() {
        let d = grid_path(160, 100, 80);
        assert_eq!(
            d,
            "M 0 0 L 0 100 M 80 0 L 80 100 M 160 0 L 160 100 M 0 0 L 160 0 M 0 80 L 160 80"
        );
    }

    #[test]
    fn clip_rects_meet_at_the_split() {
        let config = SocialCardConfig::default();
        let m = fixed_width(400);
        let layout = SocialCardLayout::compute(&config, &m, &m, &m).unwrap();
        let svg = social_card_svg(&config, &layout, "");
        let doc = roxmltree::Document::parse(&svg).unwrap();

        let clip_rect = |id: &str| {
            doc.descendants()
                .find(|n| n.has_tag_name("clipPath") && n.attribute("id") == Some(id))
                .and_then(|n| n.children().find(|c| c.has_tag_name("rect")))
                .expect("clip rect")
        };
        let split = fmt_px(layout.split_x);
        assert_eq!(clip_rect("clipWhite").attribute("width"), Some(split.as_str()));
        assert_eq!(clip_rect("clipAmber").attribute("x"), Some(split.as_str()));

        let texts = doc
            .descendants()
            .filter(|n| n.has_tag_name("text"))
            .collect::<Vec<_>>();
        assert_eq!(texts.len(), 4);
        assert_eq!(texts[0].text(), Some("CUSTODYZERO"));
        assert_eq!(texts[0].attribute("clip-path"), Some("url(#clipWhite)"));
        assert_eq!(texts[1].attribute("fill"), Some("#D4880A"));
        assert_eq!(texts[2].text(), Some("The capability is yours."));
        assert_eq!(texts[3].text(), Some("custodyzero.com"));

        assert_eq!(texts[0].attribute("y"), Some("305.0"));
        assert_eq!(texts[0].attribute("letter-spacing"), Some("0.15em"));
        assert_eq!(texts[2].attribute("letter-spacing"), Some("0.01em"));
        let rule = doc
            .descendants()
            .find(|n| n.has_tag_name("line"))
            .expect("rule");
        assert_eq!(rule.attribute("y1"), Some("331.0"));
        assert_eq!(rule.attribute("stroke-width"), Some("2"));
    }
}
