use crate::config::FontFiles;
use crate::{Error, Result};
use brandkit_text::{FontCache, FontFile, FontLocator};
use std::sync::Arc;

/// Resolves a configured font file name and loads it through `cache`.
pub fn load_font(
    locator: &FontLocator,
    cache: &mut FontCache,
    file_name: &str,
) -> Result<Arc<FontFile>> {
    let path = locator.locate(file_name)?;
    Ok(cache.get_or_load(path)?)
}

/// The three brand typefaces used by the social card.
#[derive(Debug, Clone)]
pub struct BrandFonts {
    pub bebas_neue: Arc<FontFile>,
    pub fraunces_light_italic: Arc<FontFile>,
    pub dm_mono: Arc<FontFile>,
}

impl BrandFonts {
    pub fn load(files: &FontFiles, locator: &FontLocator, cache: &mut FontCache) -> Result<Self> {
        Ok(Self {
            bebas_neue: load_font(locator, cache, &files.bebas_neue)?,
            fraunces_light_italic: load_font(locator, cache, &files.fraunces_light_italic)?,
            dm_mono: load_font(locator, cache, &files.dm_mono)?,
        })
    }

    /// Font bytes for registering with the rasterizer's font database.
    pub fn font_data(&self) -> Vec<Arc<[u8]>> {
        [&self.bebas_neue, &self.fraunces_light_italic, &self.dm_mono]
            .into_iter()
            .map(|f| Arc::clone(&f.data))
            .collect()
    }
}

/// Status of every configured font, for diagnostics.
pub fn font_report(files: &FontFiles, locator: &FontLocator) -> Vec<(String, Result<String>)> {
    [&files.bebas_neue, &files.fraunces_light_italic, &files.dm_mono]
        .into_iter()
        .map(|name| {
            let resolved = locator
                .locate(name)
                .map(|p| p.display().to_string())
                .map_err(Error::from);
            (name.clone(), resolved)
        })
        .collect()
}
