//! Brand layout configuration.
//!
//! Defaults reproduce the house layouts. A JSON document (or `--set a.b=value` overrides) is
//! deep-merged over the defaults before deserializing, so partial configs only name what they
//! change.

use crate::{Error, Result, grain};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    pub fonts: FontFiles,
    pub archon: ArchonConfig,
    pub social: SocialCardConfig,
    pub rasterize: RasterizeConfig,
}

/// Font file names, resolved through a `FontLocator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontFiles {
    pub bebas_neue: String,
    pub fraunces_light_italic: String,
    pub dm_mono: String,
}

impl Default for FontFiles {
    fn default() -> Self {
        Self {
            bebas_neue: "BebasNeue-Regular.ttf".to_string(),
            fraunces_light_italic: "Fraunces-LightItalic.ttf".to_string(),
            dm_mono: "DMMono-Regular.ttf".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchonConfig {
    pub text: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub font_size: f64,
    pub letter_spacing_em: f64,
    pub x_start: f64,
    /// Leaves ~4px of top clearspace for the cap height at 72px.
    pub y_baseline: f64,
    pub y_rule: f64,
    pub rule_width: f64,
    pub blue: String,
    pub white: String,
    /// Fallback `src` for the embedded `@font-face`.
    pub font_fallback_url: Option<String>,
    pub wordmark_scales: Vec<u32>,
    pub icon_png_sizes: Vec<u32>,
    pub ico_sizes: Vec<u32>,
}

impl Default for ArchonConfig {
    fn default() -> Self {
        Self {
            text: "ARCHON".to_string(),
            canvas_width: 400,
            canvas_height: 72,
            font_size: 72.0,
            letter_spacing_em: 0.12,
            x_start: 3.0,
            y_baseline: 66.0,
            y_rule: 69.0,
            rule_width: 1.0,
            blue: "#4FC3F7".to_string(),
            white: "#F2F2EC".to_string(),
            font_fallback_url: Some(
                "https://fonts.gstatic.com/s/bebasneue/v16/JTUSjIg69CK48gW7PXoo9WlhyyTh89Y.woff2"
                    .to_string(),
            ),
            wordmark_scales: vec![2, 3],
            icon_png_sizes: vec![128, 192],
            ico_sizes: vec![16, 32, 48],
        }
    }
}

impl ArchonConfig {
    /// Wordmark canvas size at `scale`, or `None` when it does not fit in `u32`.
    pub fn scaled_canvas(&self, scale: u32) -> Option<(u32, u32)> {
        Some((
            self.canvas_width.checked_mul(scale)?,
            self.canvas_height.checked_mul(scale)?,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialCardConfig {
    pub width: u32,
    pub height: u32,

    pub wordmark_text: String,
    /// Leading part of `wordmark_text` drawn in `white`; the rest is drawn in `amber`.
    pub wordmark_prefix: String,
    pub wordmark_font_size: f64,
    pub wordmark_letter_spacing_em: f64,
    pub wordmark_baseline: f64,

    /// Distance from the wordmark baseline to the rule.
    pub rule_offset_y: f64,
    pub rule_width: f64,

    pub tagline_text: String,
    pub tagline_font_size: f64,
    pub tagline_baseline: f64,
    pub tagline_letter_spacing_em: f64,

    pub url_text: String,
    pub url_font_size: f64,
    pub url_baseline: f64,
    pub url_letter_spacing_em: f64,

    pub glow_cx_frac: f64,
    pub glow_cy_frac: f64,
    pub glow_r_frac: f64,

    pub grid_step: u32,
    pub grid_color: String,
    pub grid_opacity: f64,

    pub grain_opacity: f64,
    pub grain_seed: u64,

    pub background: String,
    pub white: String,
    pub amber: String,
    pub text_secondary: String,
    pub text_muted: String,
}

impl Default for SocialCardConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 630,
            wordmark_text: "CUSTODYZERO".to_string(),
            wordmark_prefix: "CUSTODY".to_string(),
            wordmark_font_size: 110.0,
            wordmark_letter_spacing_em: 0.15,
            wordmark_baseline: 305.0,
            rule_offset_y: 26.0,
            rule_width: 2.0,
            tagline_text: "The capability is yours.".to_string(),
            tagline_font_size: 26.0,
            tagline_baseline: 385.0,
            tagline_letter_spacing_em: 0.01,
            url_text: "custodyzero.com".to_string(),
            url_font_size: 13.0,
            url_baseline: 420.0,
            url_letter_spacing_em: 0.05,
            glow_cx_frac: 0.5,
            glow_cy_frac: 0.46,
            glow_r_frac: 0.45,
            grid_step: 80,
            grid_color: "#242424".to_string(),
            grid_opacity: 0.30,
            grain_opacity: grain::DEFAULT_OPACITY,
            grain_seed: grain::DEFAULT_SEED,
            background: "#0A0A0A".to_string(),
            white: "#F2F2EC".to_string(),
            amber: "#D4880A".to_string(),
            text_secondary: "#C8C8C0".to_string(),
            text_muted: "#444444".to_string(),
        }
    }
}

/// One SVG rasterized to one PNG at an exact pixel size. Paths are relative to the output root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterJob {
    pub svg: PathBuf,
    pub out: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcoJob {
    pub svg: PathBuf,
    pub out: PathBuf,
    pub sizes: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizeConfig {
    pub png: Vec<RasterJob>,
    pub ico: Vec<IcoJob>,
}

impl Default for RasterizeConfig {
    fn default() -> Self {
        let wordmark = Path::new("brand/custodyzero/wordmark");
        let icon = Path::new("brand/custodyzero/icon");
        let job = |svg: &str, out: &str, width, height| RasterJob {
            svg: wordmark.join(svg),
            out: wordmark.join(out),
            width,
            height,
        };
        Self {
            png: vec![
                job(
                    "custodyzero-wordmark-dark.svg",
                    "custodyzero-wordmark-dark@2x.png",
                    960,
                    160,
                ),
                job(
                    "custodyzero-wordmark-dark.svg",
                    "custodyzero-wordmark-dark@3x.png",
                    1440,
                    240,
                ),
                job("custodyzero-cz-dark.svg", "custodyzero-cz-dark@2x.png", 308, 160),
                job("custodyzero-cz-dark.svg", "custodyzero-cz-dark@3x.png", 462, 240),
            ],
            ico: vec![IcoJob {
                svg: icon.join("custodyzero-icon-dark.svg"),
                out: icon.join("custodyzero-icon-dark.ico"),
                sizes: vec![16, 32, 48],
            }],
        }
    }
}

impl BrandConfig {
    /// Deep-merges `overrides` over the defaults.
    pub fn from_overrides(overrides: &Value) -> Result<Self> {
        let mut base = serde_json::to_value(Self::default())?;
        deep_merge_value(&mut base, overrides);
        let config: Self = serde_json::from_value(base)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(json)?;
        Self::from_overrides(&overrides)
    }

    /// Reads the optional JSON file at `path`, applies dotted `overrides` on top of it, then
    /// merges the result over the defaults.
    pub fn load(path: Option<&Path>, overrides: &[(&str, Value)]) -> Result<Self> {
        let mut root = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                serde_json::from_str(&text)?
            }
            None => Value::Object(Map::new()),
        };
        for (key, value) in overrides {
            set_dotted_value(&mut root, key, value.clone());
        }
        Self::from_overrides(&root)
    }

    pub fn validate(&self) -> Result<()> {
        let social = &self.social;
        if !social.wordmark_text.starts_with(&social.wordmark_prefix) {
            return Err(config_error(format!(
                "social.wordmark_prefix {:?} is not a prefix of social.wordmark_text {:?}",
                social.wordmark_prefix, social.wordmark_text
            )));
        }
        if social.width == 0 || social.height == 0 {
            return Err(config_error("social card size must be non-zero"));
        }
        if social.grid_step == 0 {
            return Err(config_error("social.grid_step must be non-zero"));
        }
        if !(0.0..=1.0).contains(&social.grain_opacity) {
            return Err(config_error("social.grain_opacity must be within 0..=1"));
        }

        let archon = &self.archon;
        if archon.text.is_empty() {
            return Err(config_error("archon.text must not be empty"));
        }
        if archon.canvas_width == 0 || archon.canvas_height == 0 {
            return Err(config_error("archon canvas size must be non-zero"));
        }
        if archon.wordmark_scales.contains(&0) {
            return Err(config_error("archon.wordmark_scales must be non-zero"));
        }
        if let Some(scale) = archon
            .wordmark_scales
            .iter()
            .find(|&&scale| archon.scaled_canvas(scale).is_none())
        {
            return Err(config_error(format!(
                "archon.wordmark_scales entry {scale} overflows the canvas size"
            )));
        }

        for (name, size, spacing) in [
            ("archon", archon.font_size, archon.letter_spacing_em),
            (
                "social wordmark",
                social.wordmark_font_size,
                social.wordmark_letter_spacing_em,
            ),
            ("social tagline", social.tagline_font_size, 0.0),
            ("social url", social.url_font_size, 0.0),
        ] {
            if !(size.is_finite() && size > 0.0) {
                return Err(config_error(format!("{name} font size must be positive")));
            }
            if !(spacing.is_finite() && spacing >= 0.0) {
                return Err(config_error(format!(
                    "{name} letter-spacing must be non-negative"
                )));
            }
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> Error {
    Error::Config {
        message: message.into(),
    }
}

pub fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

/// Sets `dotted_path` (e.g. `social.grain_seed`) inside `root`, creating objects as needed.
pub fn set_dotted_value(root: &mut Value, dotted_path: &str, value: Value) {
    if !root.is_object() {
        *root = Value::Object(Map::new());
    }

    let Value::Object(root_map) = root else {
        return;
    };
    let mut cur: &mut Map<String, Value> = root_map;
    let mut segments = dotted_path.split('.').peekable();
    while let Some(seg) = segments.next() {
        if segments.peek().is_none() {
            cur.insert(seg.to_string(), value);
            return;
        }
        let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Some(next) = slot.as_object_mut() else {
            return;
        };
        cur = next;
    }
}

/// Parses a `key=value` override. The value is read as JSON when it parses, otherwise as a
/// string (so `--set social.url_text=example.com` needs no quoting).
pub fn parse_override(raw: &str) -> Option<(&str, Value)> {
    let (key, value) = raw.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_overrides_yield_defaults() {
        let config = BrandConfig::from_json_str("{}").unwrap();
        assert_eq!(config, BrandConfig::default());
    }

    #[test]
    fn partial_overrides_keep_sibling_defaults() {
        let config = BrandConfig::from_json_str(
            r#"{ "archon": { "font_size": 80 }, "social": { "grain_seed": 7 } }"#,
        )
        .unwrap();
        assert_eq!(config.archon.font_size, 80.0);
        assert_eq!(config.archon.letter_spacing_em, 0.12);
        assert_eq!(config.social.grain_seed, 7);
        assert_eq!(config.social.wordmark_text, "CUSTODYZERO");
    }

    #[test]
    fn prefix_must_lead_the_wordmark() {
        let err = BrandConfig::from_json_str(r#"{ "social": { "wordmark_prefix": "ZERO" } }"#)
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }), "{err}");
    }

    #[test]
    fn negative_letter_spacing_is_rejected() {
        let err = BrandConfig::from_json_str(r#"{ "archon": { "letter_spacing_em": -0.1 } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("letter-spacing"), "{err}");
    }

    #[test]
    fn load_applies_overrides_over_the_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("brand.json");
        std::fs::write(&path, r#"{ "social": { "grain_seed": 7, "url_text": "a.example" } }"#)
            .expect("write");

        let config = BrandConfig::load(Some(&path), &[("social.grain_seed", json!(9))]).unwrap();
        assert_eq!(config.social.grain_seed, 9);
        assert_eq!(config.social.url_text, "a.example");
        assert_eq!(config.archon, ArchonConfig::default());
    }

    #[test]
    fn load_reports_the_missing_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("missing.json");
        let err = BrandConfig::load(Some(&path), &[]).unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "{err}");
        assert!(err.to_string().contains("missing.json"), "{err}");
    }

    #[test]
    fn oversized_wordmark_scale_is_rejected() {
        let err = BrandConfig::from_json_str(
            r#"{ "archon": { "wordmark_scales": [2, 4294967295] } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("4294967295"), "{err}");
        assert_eq!(ArchonConfig::default().scaled_canvas(3), Some((1200, 216)));
    }

    #[test]
    fn dotted_overrides_create_nested_objects() {
        let mut root = json!({});
        set_dotted_value(&mut root, "social.url_text", json!("example.com"));
        set_dotted_value(&mut root, "archon.font_size", json!(64));
        assert_eq!(
            root,
            json!({ "social": { "url_text": "example.com" }, "archon": { "font_size": 64 } })
        );
    }

    #[test]
    fn parse_override_falls_back_to_strings() {
        assert_eq!(
            parse_override("social.grain_seed=9"),
            Some(("social.grain_seed", json!(9)))
        );
        assert_eq!(
            parse_override("social.url_text=example.com"),
            Some(("social.url_text", json!("example.com")))
        );
        assert_eq!(parse_override("novalue"), None);
        assert_eq!(parse_override("=1"), None);
    }
}
