#![forbid(unsafe_code)]

//! Brand asset rendering: SVG templates whose text geometry comes from `brandkit-text`, plus
//! rasterization to PNG/ICO and the social card grain overlay.

pub mod archon;
pub mod config;
pub mod fonts;
pub mod generate;
pub mod grain;
pub mod raster;
pub mod social;
pub mod svg;

pub use config::{ArchonConfig, BrandConfig, FontFiles, RasterizeConfig, SocialCardConfig};
pub use fonts::BrandFonts;
pub use generate::{AssetWriter, WrittenAsset};
pub use raster::{RasterError, RasterOptions};

use brandkit_text::{FontError, GlyphNotFound};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    GlyphNotFound(#[from] GlyphNotFound),
    #[error(transparent)]
    Font(#[from] FontError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("invalid brand config: {message}")]
    Config { message: String },
    #[error("brand config JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
