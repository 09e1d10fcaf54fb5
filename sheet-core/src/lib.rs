use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use serde::{Deserialize, Serialize};

pub mod document;
pub mod geometry;
pub mod layout;
pub mod metrics;
pub mod naming;
pub mod preview;

pub use document::{DocumentPlan, PagePlan, TextRun, encode_pdf, plan_document, write_document};
pub use geometry::{COLS, LABELS_PER_PAGE, ROWS, SheetGeometry};
pub use layout::{Instance, Placed, Slot, flatten, page_instances, place, slot_for, total_instances, total_pages};
pub use naming::OutputNaming;
pub use preview::{Pager, PreviewFrame, build_preview, rasterize_png};

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no labels to print")]
    NothingToPrint,
    #[error("SVG parse error: {0}")]
    Svg(String),
    #[error("pixmap alloc failed ({0}x{1})")]
    PixmapAlloc(u32, u32),
    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),
}

/// Font sizes of the three text lines of a label. Shared by the preview and
/// the printed document.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontSizes {
    pub room: f64,
    pub part: f64,
    pub dims: f64,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            room: 16.0,
            part: 13.0,
            dims: 16.0,
        }
    }
}

fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// RGBA -> PNG bytes, deterministic for the same input
pub fn encode_rgba_to_png_bytes(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        enc.set_filter(FilterType::NoFilter);
        enc.set_compression(Compression::Default);
        let mut writer = enc.write_header()?;
        writer.write_image_data(rgba)?;
    }
    Ok(buf)
}
