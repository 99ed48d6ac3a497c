pub mod export;

pub use export::{
    data_uri, download_filename, encode_png, render_pixmap, render_png, render_preview_png,
    thumbnail_data_uri, ExportError, ExportSize, PREVIEW_SIZES, PRESET_SIZES,
};
