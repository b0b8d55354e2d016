//! Font lookup for overlay text

use ab_glyph::FontVec;
use fontdb::{Database, Family, Query, ID};
use std::path::Path;
use std::sync::Arc;

use crate::error::OverlayError;

pub type OverlayFont = Arc<FontVec>;

/// Tried after the generic sans-serif family when no family is configured
const FALLBACK_FAMILIES: &[&str] = &["DejaVu Sans", "Noto Sans", "Liberation Sans", "Arial"];

/// Load a TrueType/OpenType font file
pub fn load_font(path: &Path) -> Result<OverlayFont, OverlayError> {
    let data = std::fs::read(path)
        .map_err(|e| OverlayError::FontError(format!("{}: {}", path.display(), e)))?;
    let font = FontVec::try_from_vec(data)
        .map_err(|e| OverlayError::FontError(format!("{}: {}", path.display(), e)))?;
    Ok(Arc::new(font))
}

/// Use `path` when given, otherwise look `family` (or sans-serif) up among
/// the installed system fonts. `Ok(None)` means no usable font is installed
/// and text will not be drawn.
pub fn resolve_font(
    path: Option<&Path>,
    family: Option<&str>,
) -> Result<Option<OverlayFont>, OverlayError> {
    if let Some(path) = path {
        tracing::info!("Loading overlay font from {}", path.display());
        return load_font(path).map(Some);
    }

    let mut db = Database::new();
    db.load_system_fonts();
    tracing::debug!("Found {} system font faces", db.len());

    if let Some(family) = family {
        return font_from_family(&db, family).map(Some);
    }

    let font = default_font(&db);
    if font.is_none() {
        tracing::warn!("No overlay font found; text labels will not be drawn (use --font)");
    }
    Ok(font)
}

/// Load the face that best matches `family`, which may be a generic name
pub fn font_from_family(db: &Database, family: &str) -> Result<OverlayFont, OverlayError> {
    let id = query_family(db, family)
        .ok_or_else(|| OverlayError::FontError(format!("font family not found: {}", family)))?;
    let font = font_from_face(db, id)?;
    tracing::info!("Using overlay font family {}", family);
    Ok(font)
}

/// sans-serif, then the fallback families, then any installed face
fn default_font(db: &Database) -> Option<OverlayFont> {
    let candidates = std::iter::once("sans-serif").chain(FALLBACK_FAMILIES.iter().copied());
    for family in candidates {
        match font_from_family(db, family) {
            Ok(font) => return Some(font),
            Err(e) => tracing::debug!("{}", e),
        }
    }

    db.faces().find_map(|face| match font_from_face(db, face.id) {
        Ok(font) => {
            let name = face.families.first().map(|(name, _)| name.as_str());
            tracing::info!("Using overlay font family {}", name.unwrap_or("(unnamed)"));
            Some(font)
        }
        Err(e) => {
            tracing::debug!("Skipping font face: {}", e);
            None
        }
    })
}

fn query_family(db: &Database, family: &str) -> Option<ID> {
    let families = [match family.to_ascii_lowercase().as_str() {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        _ => Family::Name(family),
    }];
    db.query(&Query {
        families: &families,
        ..Query::default()
    })
}

fn font_from_face(db: &Database, id: ID) -> Result<OverlayFont, OverlayError> {
    let font = db
        .with_face_data(id, |data, index| FontVec::try_from_vec_and_index(data.to_vec(), index))
        .ok_or_else(|| OverlayError::FontError("font data unavailable".to_string()))?
        .map_err(|e| OverlayError::FontError(e.to_string()))?;
    Ok(Arc::new(font))
}

#[cfg(test)]
pub(crate) fn fixture_path(filename: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

#[cfg(test)]
pub(crate) fn fixture_font() -> OverlayFont {
    load_font(&fixture_path("DejaVuSans.ttf")).unwrap()
}
