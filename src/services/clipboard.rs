use pixel_grid::Grid;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::rendering::{render_png, ExportError, ExportSize};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Failed to render image: {0}")]
    Export(#[from] ExportError),

    #[error("Clipboard write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Destination for copied PNG images
pub trait ClipboardWriter: Send + Sync {
    fn write_png(&self, png: &[u8], size: ExportSize) -> Result<(), ClipboardError>;
}

/// Render the grid at a preset size with a transparent background and
/// hand it to the clipboard.
pub fn copy_grid(
    writer: &dyn ClipboardWriter,
    grid: &Grid,
    size: ExportSize,
) -> Result<(), ClipboardError> {
    let png = render_png(grid, size)?;
    writer.write_png(&png, size)?;
    tracing::info!(size = size.pixels(), bytes = png.len(), "Image copied");
    Ok(())
}

/// Clipboard that writes each copy to a file.
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ClipboardWriter for FileClipboard {
    fn write_png(&self, png: &[u8], _size: ExportSize) -> Result<(), ClipboardError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                return Err(ClipboardError::Unavailable(format!(
                    "{} is not a directory",
                    parent.display()
                )));
            }
        }
        std::fs::write(&self.path, png)?;
        Ok(())
    }
}
