use std::path::Path;

use ab_glyph::FontArc;

use crate::error::{Error, Result};

/// Places where a sans-serif TrueType font usually lives.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Load a TrueType/OpenType font from disk.
pub fn load_font(path: &Path) -> Result<FontArc> {
    let data = std::fs::read(path)
        .map_err(|e| Error::Config(format!("failed to read font {}: {}", path.display(), e)))?;
    FontArc::try_from_vec(data)
        .map_err(|e| Error::Config(format!("invalid font {}: {}", path.display(), e)))
}

/// First loadable font from [`SYSTEM_FONT_CANDIDATES`].
pub fn find_system_font() -> Option<FontArc> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(Path::new)
        .filter(|path| path.exists())
        .find_map(|path| match load_font(path) {
            Ok(font) => {
                tracing::debug!(font = %path.display(), "using system font for labels");
                Some(font)
            }
            Err(e) => {
                tracing::debug!(error = %e, "skipping unusable font");
                None
            }
        })
}
