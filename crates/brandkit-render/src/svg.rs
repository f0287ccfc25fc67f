//! Small SVG writing helpers shared by the asset templates.

use base64::Engine as _;
use std::fmt::Write as _;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// An `@font-face` rule embedding the font bytes as a base64 data URI.
#[derive(Debug, Clone)]
pub struct FontFace<'a> {
    pub family: &'a str,
    pub style: &'a str,
    pub weight: &'a str,
    pub data: &'a [u8],
    /// Optional second `src` entry (WOFF2) for viewers that reject the embedded TrueType data.
    pub fallback_url: Option<&'a str>,
}

impl FontFace<'_> {
    pub fn to_css(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(self.data);
        let mut out = String::with_capacity(b64.len() + 256);
        let _ = writeln!(&mut out, "@font-face {{");
        let _ = writeln!(&mut out, "  font-family: '{}';", self.family);
        let _ = writeln!(&mut out, "  font-style: {};", self.style);
        let _ = writeln!(&mut out, "  font-weight: {};", self.weight);
        match self.fallback_url {
            Some(url) => {
                let _ = writeln!(
                    &mut out,
                    "  src: url(\"data:font/truetype;base64,{b64}\") format(\"truetype\"),"
                );
                let _ = writeln!(&mut out, "       url('{url}') format('woff2');");
            }
            None => {
                let _ = writeln!(
                    &mut out,
                    "  src: url(\"data:font/truetype;base64,{b64}\") format(\"truetype\");"
                );
            }
        }
        out.push('}');
        out
    }
}

/// Opens the root `<svg>` element with matching `viewBox` and intrinsic size.
pub fn open_svg(out: &mut String, width: u32, height: u32) {
    let _ = writeln!(
        out,
        r#"<svg xmlns="{SVG_NS}" viewBox="0 0 {width} {height}" width="{width}" height="{height}">"#
    );
}

pub fn close_svg(out: &mut String) {
    out.push_str("</svg>\n");
}

/// Formats with two decimals, the precision used for measured coordinates.
pub fn fmt_px(v: f64) -> String {
    format!("{v:.2}")
}

/// Formats a configured value as written in the layout tables, keeping the fraction: `3.0`, `0.12`.
pub fn fmt_num(v: f64) -> String {
    format!("{v:?}")
}

pub fn escape_xml_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_face_embeds_base64_and_fallback() {
        let face = FontFace {
            family: "Bebas Neue",
            style: "normal",
            weight: "400",
            data: b"abc",
            fallback_url: Some("https://example.com/bebas.woff2"),
        };
        let css = face.to_css();
        assert!(css.starts_with("@font-face {\n  font-family: 'Bebas Neue';"));
        assert!(css.contains("data:font/truetype;base64,YWJj"));
        assert!(css.contains("url('https://example.com/bebas.woff2') format('woff2');"));
        assert!(css.ends_with('}'));
    }

    #[test]
    fn font_face_without_fallback_terminates_src() {
        let face = FontFace {
            family: "DM Mono",
            style: "normal",
            weight: "400",
            data: b"",
            fallback_url: None,
        };
        assert!(
            face.to_css()
                .contains("src: url(\"data:font/truetype;base64,\") format(\"truetype\");")
        );
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_xml_text("a<b & c>"), "a&lt;b &amp; c&gt;");
    }

    #[test]
    fn fmt_num_keeps_a_fraction() {
        assert_eq!(fmt_num(3.0), "3.0");
        assert_eq!(fmt_num(66.0), "66.0");
        assert_eq!(fmt_num(0.12), "0.12");
        assert_eq!(fmt_num(0.30), "0.3");
    }

    #[test]
    fn fmt_px_uses_two_decimals() {
        assert_eq!(fmt_px(3.0), "3.00");
        assert_eq!(fmt_px(287.456), "287.46");
    }
}
