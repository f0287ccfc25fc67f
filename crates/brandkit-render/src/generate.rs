//! Asset generation runs: compose SVGs, rasterize, and write the `brand/` tree.
//!
//! A run is not transactional; a failure part-way leaves the files written so far.

use crate::archon::{self, WordmarkVariant};
use crate::config::{ArchonConfig, RasterizeConfig, SocialCardConfig};
use crate::fonts::BrandFonts;
use crate::raster::{self, RasterOptions};
use crate::social::{self, SocialCardLayout};
use crate::{Error, Result, grain};
use brandkit_text::FontFile;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const ARCHON_WORDMARK_DIR: &str = "brand/archon/wordmark";
pub const ARCHON_ICON_DIR: &str = "brand/archon/icon";
pub const SOCIAL_DIR: &str = "brand/custodyzero/social";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenAsset {
    /// Path relative to the output root.
    pub path: PathBuf,
    pub detail: Option<String>,
}

/// Writes files below an output root, creating parent directories on demand.
#[derive(Debug)]
pub struct AssetWriter {
    root: PathBuf,
    written: Vec<WrittenAsset>,
}

impl AssetWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: Vec::new(),
        }
    }

    fn resolve(&self, rel: &Path) -> PathBuf {
        self.root.join(rel)
    }

    pub fn read_to_string(&self, rel: &Path) -> Result<String> {
        let path = self.resolve(rel);
        std::fs::read_to_string(&path).map_err(|source| Error::Io { path, source })
    }

    pub fn write(
        &mut self,
        rel: impl AsRef<Path>,
        bytes: impl AsRef<[u8]>,
        detail: Option<String>,
    ) -> Result<()> {
        let rel = rel.as_ref();
        let path = self.resolve(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, bytes).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;

        match detail.as_deref() {
            Some(d) => tracing::info!(path = %rel.display(), detail = d, "wrote asset"),
            None => tracing::info!(path = %rel.display(), "wrote asset"),
        }
        self.written.push(WrittenAsset {
            path: rel.to_path_buf(),
            detail,
        });
        Ok(())
    }

    pub fn written(&self) -> &[WrittenAsset] {
        &self.written
    }
}

fn size_detail(width: u32, height: u32) -> Option<String> {
    Some(format!("{width}x{height}"))
}

fn write_png(
    writer: &mut AssetWriter,
    rel: PathBuf,
    svg: &str,
    width: u32,
    height: u32,
    options: &RasterOptions,
) -> Result<()> {
    let png = raster::svg_to_png(svg, width, height, options)?;
    writer.write(rel, png, size_detail(width, height))
}

fn write_ico(
    writer: &mut AssetWriter,
    rel: PathBuf,
    svg: &str,
    sizes: &[u32],
    options: &RasterOptions,
) -> Result<()> {
    let ico = raster::svg_to_ico(svg, sizes, options)?;
    writer.write(rel, ico, Some(format!("ICO frames: {sizes:?}")))
}

/// Archon wordmarks (dark + blue, SVG and scaled PNGs) and icon (SVG, PNGs, ICO).
pub fn generate_archon(
    config: &ArchonConfig,
    font: &FontFile,
    writer: &mut AssetWriter,
) -> Result<()> {
    let text_width = archon::measure_wordmark(config, font)?;
    let options = RasterOptions::with_fonts(vec![font.data.clone()]);
    let wordmark_dir = Path::new(ARCHON_WORDMARK_DIR);

    for variant in WordmarkVariant::ALL {
        let svg = archon::wordmark_svg(config, variant, &font.data, text_width);
        let stem = format!("archon-wordmark-{}", variant.name());
        writer.write(wordmark_dir.join(format!("{stem}.svg")), &svg, None)?;

        for &scale in &config.wordmark_scales {
            let Some((width, height)) = config.scaled_canvas(scale) else {
                return Err(Error::Config {
                    message: format!(
                        "archon.wordmark_scales entry {scale} overflows the canvas size"
                    ),
                });
            };
            write_png(
                writer,
                wordmark_dir.join(format!("{stem}@{scale}x.png")),
                &svg,
                width,
                height,
                &options,
            )?;
        }
    }

    let icon_dir = Path::new(ARCHON_ICON_DIR);
    let icon = archon::icon_svg(config);
    writer.write(icon_dir.join("archon-icon-dark.svg"), &icon, None)?;
    for &size in &config.icon_png_sizes {
        // The icon is drawn on a 64px grid.
        let scale = size / 64;
        let name = if scale >= 1 && size % 64 == 0 {
            format!("archon-icon-dark@{scale}x.png")
        } else {
            format!("archon-icon-dark-{size}.png")
        };
        write_png(writer, icon_dir.join(name), &icon, size, size, &options)?;
    }
    write_ico(
        writer,
        icon_dir.join("archon-icon-dark.ico"),
        &icon,
        &config.ico_sizes,
        &options,
    )?;
    Ok(())
}

/// Composes the social card SVG from the brand fonts.
pub fn compose_social_card(
    config: &SocialCardConfig,
    fonts: &BrandFonts,
) -> Result<(SocialCardLayout, String)> {
    let layout = SocialCardLayout::compute(
        config,
        &*fonts.bebas_neue,
        &*fonts.fraunces_light_italic,
        &*fonts.dm_mono,
    )?;
    let svg = social::social_card_svg(config, &layout, &social::font_faces_css(fonts));
    Ok((layout, svg))
}

/// Social card: reference SVG plus the grained PNG.
pub fn generate_social(
    config: &SocialCardConfig,
    fonts: &BrandFonts,
    writer: &mut AssetWriter,
) -> Result<()> {
    let (_, svg) = compose_social_card(config, fonts)?;
    let dir = Path::new(SOCIAL_DIR);
    writer.write(dir.join("custodyzero-social-card.svg"), &svg, None)?;

    let options = RasterOptions::with_fonts(fonts.font_data());
    let pixmap = raster::svg_to_pixmap(&svg, config.width, config.height, &options)?;
    tracing::info!(
        opacity = config.grain_opacity,
        seed = config.grain_seed,
        "adding grain overlay"
    );
    let grained = grain::add_grain(
        &raster::pixmap_to_rgba(&pixmap),
        config.grain_opacity,
        config.grain_seed,
    );
    let png = raster::encode_rgb_png(&grained)?;
    writer.write(
        dir.join("custodyzero-social-card.png"),
        png,
        size_detail(config.width, config.height),
    )
}

/// Rasterizes existing SVGs listed in `config`; paths are relative to the writer's root.
pub fn rasterize(
    config: &RasterizeConfig,
    options: &RasterOptions,
    writer: &mut AssetWriter,
) -> Result<()> {
    for job in &config.png {
        let svg = writer.read_to_string(&job.svg)?;
        write_png(
            writer,
            job.out.clone(),
            &svg,
            job.width,
            job.height,
            options,
        )?;
    }
    for job in &config.ico {
        let svg = writer.read_to_string(&job.svg)?;
        write_ico(writer, job.out.clone(), &svg, &job.sizes, options)?;
    }
    Ok(())
}
