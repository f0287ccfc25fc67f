use std::path::PathBuf;

/// A character has no entry in the font's character-to-glyph table.
///
/// There is no fallback glyph: the measurement aborts and the caller sees the offending character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("glyph not found for character '{ch}' (U+{code_point:04X})")]
pub struct GlyphNotFound {
    pub ch: char,
    pub code_point: u32,
}

impl GlyphNotFound {
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            code_point: ch as u32,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse font {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid font tables: {message}")]
    InvalidTables { message: String },

    #[error("font {name} not found (searched: {})", display_dirs(.searched))]
    NotFound { name: String, searched: Vec<PathBuf> },
}

fn display_dirs(dirs: &[PathBuf]) -> String {
    if dirs.is_empty() {
        return "<no font directories>".to_string();
    }
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
