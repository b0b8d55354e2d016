use image::{ImageFormat, RgbaImage};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::OverlayError;

/// Write `image` as PNG, replacing `path` only once the file is complete
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OverlayError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp_file = tempfile::Builder::new()
        .prefix(".overlay")
        .suffix(".png")
        .tempfile_in(dir)
        .map_err(|e| OverlayError::OutputError(format!("Failed to create temp file: {}", e)))?;

    {
        let mut writer = BufWriter::new(temp_file.as_file());
        image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(|e| OverlayError::OutputError(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| OverlayError::OutputError(e.to_string()))?;
    }

    temp_file
        .persist(path)
        .map_err(|e| OverlayError::OutputError(format!("{}: {}", path.display(), e)))?;

    tracing::info!("Wrote overlay to {}", path.display());
    Ok(())
}
