// Gradient swatch assets on disk
use crate::application::imaging_ports::SwatchCatalog;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DirectorySwatchCatalog {
    dir: PathBuf,
}

impl DirectorySwatchCatalog {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn is_valid_color_name(color: &str) -> bool {
        !color.is_empty()
            && color
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}

impl SwatchCatalog for DirectorySwatchCatalog {
    fn lookup(&self, color: &str) -> Option<PathBuf> {
        // Never let a colour name walk out of the swatch directory
        if !Self::is_valid_color_name(color) {
            return None;
        }

        let path = self.dir.join(format!("skaala_{}.png", color));
        path.is_file().then_some(path)
    }
}
