use crate::error::FontError;
use std::path::{Path, PathBuf};

/// Ordered list of directories searched for installed font files.
#[derive(Debug, Clone, Default)]
pub struct FontLocator {
    dirs: Vec<PathBuf>,
}

impl FontLocator {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// The per-user font directory (`~/Library/Fonts` on macOS, `~/.local/share/fonts` on Linux)
    /// followed by the system-wide locations.
    pub fn system() -> Self {
        let mut dirs = Vec::new();
        if let Some(dir) = dirs::font_dir() {
            dirs.push(dir);
        }
        if cfg!(target_os = "macos") {
            dirs.push(PathBuf::from("/Library/Fonts"));
        } else if cfg!(unix) {
            dirs.push(PathBuf::from("/usr/local/share/fonts"));
            dirs.push(PathBuf::from("/usr/share/fonts"));
        }
        Self { dirs }
    }

    /// Searches `dir` before every other directory.
    pub fn with_preferred_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dirs.insert(0, dir.into());
        self
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Resolves a font file name (e.g. `BebasNeue-Regular.ttf`).
    ///
    /// Each directory is checked directly, then one level of subdirectories (fontconfig trees
    /// group files per family).
    pub fn locate(&self, file_name: &str) -> Result<PathBuf, FontError> {
        for dir in &self.dirs {
            if let Some(found) = find_in_dir(dir, file_name) {
                tracing::debug!(font = file_name, path = %found.display(), "resolved font");
                return Ok(found);
            }
        }
        Err(FontError::NotFound {
            name: file_name.to_string(),
            searched: self.dirs.clone(),
        })
    }
}

fn find_in_dir(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let direct = dir.join(file_name);
    if direct.is_file() {
        return Some(direct);
    }

    let entries = std::fs::read_dir(dir).ok()?;
    let mut subdirs = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect::<Vec<_>>();
    // Directory iteration order is platform dependent.
    subdirs.sort();
    subdirs
        .into_iter()
        .map(|d| d.join(file_name))
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_prefers_earlier_directories() {
        let a = tempfile::tempdir().expect("tempdir");
        let b = tempfile::tempdir().expect("tempdir");
        std::fs::write(a.path().join("Brand.ttf"), b"a").expect("write");
        std::fs::write(b.path().join("Brand.ttf"), b"b").expect("write");

        let locator = FontLocator::new(vec![b.path().to_path_buf()]).with_preferred_dir(a.path());
        assert_eq!(locator.locate("Brand.ttf").unwrap(), a.path().join("Brand.ttf"));
    }

    #[test]
    fn locate_searches_one_level_of_subdirectories() {
        let root = tempfile::tempdir().expect("tempdir");
        let family = root.path().join("bebas");
        std::fs::create_dir(&family).expect("mkdir");
        std::fs::write(family.join("BebasNeue-Regular.ttf"), b"x").expect("write");

        let locator = FontLocator::new(vec![root.path().to_path_buf()]);
        assert_eq!(
            locator.locate("BebasNeue-Regular.ttf").unwrap(),
            family.join("BebasNeue-Regular.ttf")
        );
    }

    #[test]
    fn locate_lists_searched_directories_on_failure() {
        let root = tempfile::tempdir().expect("tempdir");
        let locator = FontLocator::new(vec![root.path().to_path_buf()]);
        let err = locator.locate("Nope.ttf").unwrap_err();
        match err {
            FontError::NotFound { name, searched } => {
                assert_eq!(name, "Nope.ttf");
                assert_eq!(searched, vec![root.path().to_path_buf()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
