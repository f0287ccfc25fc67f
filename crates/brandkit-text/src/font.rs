//! Font metric tables and loading.
//!
//! [`FontMetrics`] holds the three tables text measurement needs: a character to glyph id map,
//! per-glyph horizontal advances in design units, and the font's units-per-em. Values are built
//! once and never mutated.

use crate::error::{FontError, GlyphNotFound};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ttf_parser::PlatformId;

#[derive(Debug, Clone)]
pub struct FontMetrics {
    cmap: FxHashMap<char, u16>,
    advances: Vec<u16>,
    units_per_em: u16,
}

impl FontMetrics {
    /// Builds metrics from explicit tables.
    ///
    /// `advances[gid]` is the advance of glyph `gid` in design units. Every glyph referenced by
    /// `cmap` must have an advance entry.
    pub fn from_tables(
        cmap: impl IntoIterator<Item = (char, u16)>,
        advances: Vec<u16>,
        units_per_em: u16,
    ) -> Result<Self, FontError> {
        if units_per_em == 0 {
            return Err(FontError::InvalidTables {
                message: "units-per-em must be non-zero".to_string(),
            });
        }

        let cmap: FxHashMap<char, u16> = cmap.into_iter().collect();
        if let Some((ch, gid)) = cmap
            .iter()
            .find(|(_, gid)| usize::from(**gid) >= advances.len())
        {
            return Err(FontError::InvalidTables {
                message: format!(
                    "glyph {gid} (mapped from U+{:04X}) has no advance width",
                    *ch as u32
                ),
            });
        }

        Ok(Self {
            cmap,
            advances,
            units_per_em,
        })
    }

    /// Parses a TrueType/OpenType font (face index 0).
    ///
    /// The character map comes from the best Unicode `cmap` subtable: full-repertoire subtables
    /// are preferred over BMP-only ones.
    pub fn from_font_data(data: &[u8], path: &Path) -> Result<Self, FontError> {
        let parse_error = |message: String| FontError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let face = ttf_parser::Face::parse(data, 0).map_err(|e| parse_error(e.to_string()))?;
        let Some(cmap_table) = face.tables().cmap else {
            return Err(parse_error("font has no cmap table".to_string()));
        };

        let Some(subtable) = cmap_table
            .subtables
            .into_iter()
            .filter(|s| s.is_unicode())
            .min_by_key(|s| cmap_subtable_rank(s.platform_id, s.encoding_id))
        else {
            return Err(parse_error("font has no Unicode cmap subtable".to_string()));
        };

        let mut cmap = FxHashMap::default();
        subtable.codepoints(|cp| {
            let Some(ch) = char::from_u32(cp) else {
                return;
            };
            if let Some(gid) = subtable.glyph_index(cp) {
                cmap.entry(ch).or_insert(gid.0);
            }
        });

        let advances = (0..face.number_of_glyphs())
            .map(|gid| {
                face.glyph_hor_advance(ttf_parser::GlyphId(gid))
                    .unwrap_or(0)
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            path = %path.display(),
            glyphs = advances.len(),
            mapped_chars = cmap.len(),
            units_per_em = face.units_per_em(),
            "parsed font metrics"
        );

        Self::from_tables(cmap, advances, face.units_per_em())
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.cmap.get(&ch).copied()
    }

    /// Advance of `ch` in design units.
    pub fn advance_units(&self, ch: char) -> Result<u16, GlyphNotFound> {
        let gid = self.glyph_id(ch).ok_or(GlyphNotFound::new(ch))?;
        // `from_tables` guarantees every mapped glyph has an advance.
        Ok(self.advances[usize::from(gid)])
    }

    /// Advance of `ch` in pixels at `font_size_px`.
    pub fn advance_px(&self, ch: char, font_size_px: f64) -> Result<f64, GlyphNotFound> {
        let units = self.advance_units(ch)?;
        Ok(f64::from(units) / f64::from(self.units_per_em) * font_size_px)
    }
}

// fontTools' `getBestCmap` order: (3,10), (0,6), (0,4), (3,1), (0,3), (0,2), (0,1), (0,0).
fn cmap_subtable_rank(platform: PlatformId, encoding: u16) -> u8 {
    match (platform, encoding) {
        (PlatformId::Windows, 10) => 0,
        (PlatformId::Unicode, 6) => 1,
        (PlatformId::Unicode, 4) => 2,
        (PlatformId::Windows, 1) => 3,
        (PlatformId::Unicode, 3) => 4,
        (PlatformId::Unicode, 2) => 5,
        (PlatformId::Unicode, 1) => 6,
        (PlatformId::Unicode, 0) => 7,
        _ => 8,
    }
}

/// A font loaded from disk: its bytes (for embedding and rasterizer registration) and metrics.
#[derive(Debug, Clone)]
pub struct FontFile {
    pub path: PathBuf,
    pub data: Arc<[u8]>,
    pub metrics: FontMetrics,
}

impl FontFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let metrics = FontMetrics::from_font_data(&data, path)?;
        Ok(Self {
            path: path.to_path_buf(),
            data: Arc::from(data),
            metrics,
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Caller-owned font cache keyed by path.
///
/// Each path is read and parsed at most once per cache.
#[derive(Debug, Default)]
pub struct FontCache {
    entries: FxHashMap<PathBuf, Arc<FontFile>>,
}

impl FontCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: impl AsRef<Path>) -> Result<Arc<FontFile>, FontError> {
        let path = path.as_ref();
        if let Some(font) = self.entries.get(path) {
            return Ok(Arc::clone(font));
        }

        tracing::info!(path = %path.display(), "loading font");
        let font = Arc::new(FontFile::load(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&font));
        Ok(font)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
