//! SVG rasterization to PNG and multi-frame ICO.
//!
//! `usvg` does not load `@font-face` data URIs, so brand fonts are registered with its font
//! database directly from their bytes.

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to parse SVG: {message}")]
    SvgParse { message: String },
    #[error("failed to allocate {width}x{height} pixmap for raster rendering")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("failed to encode PNG: {message}")]
    PngEncode { message: String },
    #[error("invalid raster size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("ICO frame size {size} is outside 1..=256")]
    IcoFrameSize { size: u32 },
    #[error("ICO needs between 1 and 65535 frames, got {count}")]
    IcoFrameCount { count: usize },
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Optional solid fill painted before the SVG (CSS hex or `white`/`black`/`transparent`).
    pub background: Option<String>,
    /// Raw font files registered with the rasterizer.
    pub fonts: Vec<Arc<[u8]>>,
    pub load_system_fonts: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            background: None,
            fonts: Vec::new(),
            load_system_fonts: true,
        }
    }
}

impl RasterOptions {
    pub fn with_fonts(fonts: Vec<Arc<[u8]>>) -> Self {
        Self {
            fonts,
            ..Default::default()
        }
    }
}

fn parse_tree(svg: &str, options: &RasterOptions) -> Result<usvg::Tree> {
    let mut opt = usvg::Options::default();
    if options.load_system_fonts {
        opt.fontdb_mut().load_system_fonts();
    }
    for data in &options.fonts {
        opt.fontdb_mut().load_font_data(data.to_vec());
    }

    usvg::Tree::from_str(svg, &opt).map_err(|e| RasterError::SvgParse {
        message: e.to_string(),
    })
}

/// Renders `svg` scaled to exactly `width`×`height` pixels.
pub fn svg_to_pixmap(
    svg: &str,
    width: u32,
    height: u32,
    options: &RasterOptions,
) -> Result<tiny_skia::Pixmap> {
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidSize { width, height });
    }

    let tree = parse_tree(svg, options)?;
    let size = tree.size();
    let sx = width as f32 / size.width();
    let sy = height as f32 / size.height();

    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(RasterError::PixmapAlloc { width, height })?;

    if let Some(bg) = options.background.as_deref() {
        if let Some(color) = parse_tiny_skia_color(bg) {
            pixmap.fill(color);
        }
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

pub fn svg_to_png(svg: &str, width: u32, height: u32, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, width, height, options)?;
    pixmap.encode_png().map_err(|e| RasterError::PngEncode {
        message: e.to_string(),
    })
}

/// Straight-alpha RGBA copy of a (premultiplied) pixmap.
pub fn pixmap_to_rgba(pixmap: &tiny_skia::Pixmap) -> image::RgbaImage {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .unwrap_or_else(|| image::RgbaImage::new(pixmap.width(), pixmap.height()))
}

pub fn encode_rgb_png(img: &image::RgbImage) -> Result<Vec<u8>> {
    use image::ImageEncoder as _;

    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| RasterError::PngEncode {
            message: e.to_string(),
        })?;
    Ok(out)
}

/// Renders one PNG frame per size (each rendered separately, not resampled) and packs them into
/// a PNG-embedded ICO.
pub fn svg_to_ico(svg: &str, sizes: &[u32], options: &RasterOptions) -> Result<Vec<u8>> {
    let frames = sizes
        .iter()
        .map(|&size| Ok((size, svg_to_png(svg, size, size, options)?)))
        .collect::<Result<Vec<_>>>()?;
    pack_ico(&frames)
}

const ICO_HEADER_LEN: usize = 6;
const ICO_DIR_ENTRY_LEN: usize = 16;

/// Packs square PNG frames into an ICO container.
///
/// Layout: `reserved=0, type=1, count` (u16 LE each), then one 16-byte directory entry per frame
/// (`w, h, colors=0, reserved=0` as bytes with 256 stored as 0; `planes=1, bpp=32` as u16;
/// `size, offset` as u32), then the PNG payloads in order.
pub fn pack_ico(frames: &[(u32, Vec<u8>)]) -> Result<Vec<u8>> {
    let count = u16::try_from(frames.len())
        .ok()
        .filter(|c| *c > 0)
        .ok_or(RasterError::IcoFrameCount {
            count: frames.len(),
        })?;

    let payload_len = frames.iter().map(|(_, png)| png.len()).sum::<usize>();
    let mut out = Vec::with_capacity(
        ICO_HEADER_LEN + frames.len() * ICO_DIR_ENTRY_LEN + payload_len,
    );
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());

    let mut offset = ICO_HEADER_LEN + frames.len() * ICO_DIR_ENTRY_LEN;
    for (size, png) in frames {
        let dim = match *size {
            1..=255 => *size as u8,
            256 => 0,
            other => return Err(RasterError::IcoFrameSize { size: other }),
        };
        out.push(dim);
        out.push(dim);
        out.push(0);
        out.push(0);
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&32u16.to_le_bytes());
        out.extend_from_slice(&(png.len() as u32).to_le_bytes());
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += png.len();
    }
    for (_, png) in frames {
        out.extend_from_slice(png);
    }
    Ok(out)
}

fn parse_tiny_skia_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    fn hex2(b: &[u8]) -> Option<u8> {
        let hi = (*b.first()? as char).to_digit(16)? as u8;
        let lo = (*b.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }
    fn hex1(c: u8) -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some((v << 4) | v)
    }

    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => Some(tiny_skia::Color::from_rgba8(
            hex1(bytes[0])?,
            hex1(bytes[1])?,
            hex1(bytes[2])?,
            255,
        )),
        6 => Some(tiny_skia::Color::from_rgba8(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            255,
        )),
        8 => Some(tiny_skia::Color::from_rgba8(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            hex2(&bytes[6..8])?,
        )),
        _ => None,
    }
}
