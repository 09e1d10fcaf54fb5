//! On-screen preview: one page of the sheet drawn as SVG, top-left origin.

use std::sync::{Arc, OnceLock};

use label_core::Record;
use serde::Serialize;
use tracing::debug;

use crate::geometry::{COLS, ROWS};
use crate::layout::{page_instances, total_instances, total_pages};
use crate::{FontSizes, SheetError, encode_rgba_to_png_bytes, svg_escape};

pub const PREVIEW_WIDTH: u32 = 480;
pub const PREVIEW_HEIGHT: u32 = 680;
const INSET_X: f64 = 8.0;
const INSET_Y: f64 = 15.0;
/// Vertical offsets of the room and dimension lines from the cell center.
const LINE_OFFSET: f64 = 20.0;

/// Page cursor for the preview. Navigation never leaves `0..total_pages`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pager {
    current: usize,
}

impl Pager {
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn next(&mut self, total_pages: usize) -> bool {
        if self.current + 1 < total_pages {
            self.current += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Pulls the cursor back after the sheet lost pages.
    pub fn clamp(&mut self, total_pages: usize) {
        self.current = self.current.min(total_pages.saturating_sub(1));
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct PreviewFrame {
    pub svg: String,
    pub width: u32,
    pub height: u32,
    pub page: usize,
    pub total_pages: usize,
    pub labels_on_page: usize,
}

impl PreviewFrame {
    pub fn caption(&self) -> String {
        format!("Page {} / {}", self.page + 1, self.total_pages)
    }
}

/// Redraws `page` from scratch. A page past the end renders an empty grid.
pub fn build_preview(records: &[Record], page: usize, sizes: &FontSizes) -> PreviewFrame {
    let w = f64::from(PREVIEW_WIDTH);
    let h = f64::from(PREVIEW_HEIGHT);
    let col_w = (w - 2.0 * INSET_X) / COLS as f64;
    let row_h = (h - 2.0 * INSET_Y) / ROWS as f64;

    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    s.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"Helvetica, Arial, sans-serif\">\n"
    ));
    s.push_str("<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");

    for i in 0..=COLS {
        let x = INSET_X + i as f64 * col_w;
        s.push_str(&format!(
            "<path d=\"M {:.2} {:.2} L {:.2} {:.2}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
            x,
            INSET_Y,
            x,
            h - INSET_Y
        ));
    }
    for j in 0..=ROWS {
        let y = INSET_Y + j as f64 * row_h;
        s.push_str(&format!(
            "<path d=\"M {:.2} {:.2} L {:.2} {:.2}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
            INSET_X,
            y,
            w - INSET_X,
            y
        ));
    }

    let placed = page_instances(records, page);
    for p in &placed {
        let cx = INSET_X + p.slot.col as f64 * col_w + col_w / 2.0;
        let cy = INSET_Y + p.slot.row_from_top() as f64 * row_h + row_h / 2.0;
        let rec = p.instance.record;
        push_text(&mut s, cx, cy - LINE_OFFSET, sizes.room, true, rec.room());
        push_text(&mut s, cx, cy, sizes.part, true, rec.part());
        push_text(&mut s, cx, cy + LINE_OFFSET, sizes.dims, false, &rec.dimensions());
    }
    s.push_str("</svg>\n");

    let frame = PreviewFrame {
        svg: s,
        width: PREVIEW_WIDTH,
        height: PREVIEW_HEIGHT,
        page,
        total_pages: total_pages(total_instances(records)),
        labels_on_page: placed.len(),
    };
    debug!(page, total_pages = frame.total_pages, labels = frame.labels_on_page, "preview rebuilt");
    frame
}

fn push_text(s: &mut String, x: f64, y: f64, size: f64, bold: bool, text: &str) {
    let weight = if bold { " font-weight=\"bold\"" } else { "" };
    s.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" fill=\"#000\" font-size=\"{}\"{}>{}</text>\n",
        x,
        y,
        size,
        weight,
        svg_escape(text)
    ));
}

fn font_database() -> Arc<usvg::fontdb::Database> {
    static DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        debug!(faces = db.len(), "loaded system fonts for preview");
        Arc::new(db)
    })
    .clone()
}

/// Renders a frame to PNG bytes.
pub fn rasterize_png(frame: &PreviewFrame) -> Result<Vec<u8>, SheetError> {
    let mut opt = usvg::Options::default();
    opt.fontdb = font_database();
    let tree =
        usvg::Tree::from_str(&frame.svg, &opt).map_err(|e| SheetError::Svg(e.to_string()))?;
    let mut pixmap = tiny_skia::Pixmap::new(frame.width, frame.height)
        .ok_or(SheetError::PixmapAlloc(frame.width, frame.height))?;
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pm);
    Ok(encode_rgba_to_png_bytes(
        frame.width,
        frame.height,
        pixmap.data(),
    )?)
}
