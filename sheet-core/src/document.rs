//! Printable document: every page of the sheet as an A4 PDF.
//!
//! Layout happens in [`plan_document`], in PDF user space (origin at the
//! bottom-left corner); [`encode_pdf`] only serializes the plan.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use label_core::Record;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use tracing::{info, warn};

use crate::geometry::{LABELS_PER_PAGE, SheetGeometry};
use crate::layout::place;
use crate::metrics::{Face, win_ansi};
use crate::naming::OutputNaming;
use crate::{FontSizes, SheetError};

/// Baseline offsets of the three lines from the cell center, top to bottom.
const ROOM_DY: f64 = 15.0;
const PART_DY: f64 = -5.0;
const DIMS_DY: f64 = -25.0;

#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub face: Face,
    pub size: f64,
    /// Left end of the baseline.
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PagePlan {
    pub runs: Vec<TextRun>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DocumentPlan {
    pub geometry: SheetGeometry,
    pub pages: Vec<PagePlan>,
}

impl DocumentPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

fn centered(face: Face, size: f64, cx: f64, y: f64, text: &str) -> TextRun {
    TextRun {
        face,
        size,
        x: cx - face.text_width(text, size) / 2.0,
        y,
        text: text.to_string(),
    }
}

/// Walks the flattened instances in order, starting a new page whenever the
/// global index is a nonzero multiple of [`LABELS_PER_PAGE`].
pub fn plan_document(records: &[Record], sizes: &FontSizes) -> DocumentPlan {
    let geometry = SheetGeometry::a4();
    let mut pages: Vec<PagePlan> = Vec::new();
    let mut current = PagePlan::default();
    for p in place(records) {
        if p.slot.index > 0 && p.slot.index % LABELS_PER_PAGE == 0 {
            pages.push(std::mem::take(&mut current));
        }
        let (cx, cy) = geometry.cell_center(p.slot.col, p.slot.row_from_bottom());
        let rec = p.instance.record;
        current
            .runs
            .push(centered(Face::HelveticaBold, sizes.room, cx, cy + ROOM_DY, rec.room()));
        current
            .runs
            .push(centered(Face::HelveticaBold, sizes.part, cx, cy + PART_DY, rec.part()));
        current.runs.push(centered(
            Face::Helvetica,
            sizes.dims,
            cx,
            cy + DIMS_DY,
            &rec.dimensions(),
        ));
    }
    pages.push(current);
    DocumentPlan { geometry, pages }
}

pub fn encode_pdf(plan: &DocumentPlan) -> Vec<u8> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let tree_id = alloc.bump();
    let regular_id = alloc.bump();
    let bold_id = alloc.bump();
    let page_ids: Vec<(Ref, Ref)> = plan
        .pages
        .iter()
        .map(|_| (alloc.bump(), alloc.bump()))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page, _)| *page))
        .count(page_ids.len() as i32);

    for (face, id) in [(Face::Helvetica, regular_id), (Face::HelveticaBold, bold_id)] {
        pdf.type1_font(id)
            .base_font(Name(face.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let g = &plan.geometry;
    for (page_plan, (page_id, content_id)) in plan.pages.iter().zip(page_ids.iter().copied()) {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, g.page_width as f32, g.page_height as f32));
        page.parent(tree_id);
        page.contents(content_id);
        page.resources()
            .fonts()
            .pair(Name(Face::Helvetica.resource()), regular_id)
            .pair(Name(Face::HelveticaBold.resource()), bold_id);
        page.finish();

        let mut content = Content::new();
        for run in &page_plan.runs {
            content.begin_text();
            content.set_font(Name(run.face.resource()), run.size as f32);
            content.next_line(run.x as f32, run.y as f32);
            content.show(Str(&win_ansi(&run.text)));
            content.end_text();
        }
        pdf.stream(content_id, &content.finish());
    }
    pdf.finish()
}

/// Runs `fill` on a freshly allocated file. On failure the partial file is
/// removed so its name goes back to the pool.
fn fill_or_discard<F>(path: &Path, mut file: File, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    if let Err(e) = fill(&mut file) {
        drop(file);
        if let Err(rm) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %rm, "could not remove partial sheet");
        }
        return Err(e);
    }
    Ok(())
}

/// Renders every page and writes it to the next free name in `dir`.
/// Returns the absolute path of the new file.
pub fn write_document(
    dir: &Path,
    naming: &OutputNaming,
    records: &[Record],
    sizes: &FontSizes,
) -> Result<PathBuf, SheetError> {
    if records.iter().all(|r| r.quantity() == 0) {
        return Err(SheetError::NothingToPrint);
    }
    let plan = plan_document(records, sizes);
    let bytes = encode_pdf(&plan);
    let (path, file) = naming.allocate(dir)?;
    fill_or_discard(&path, file, |f| {
        f.write_all(&bytes)?;
        f.sync_all()
    })?;
    let path = std::path::absolute(&path)?;
    info!(path = %path.display(), pages = plan.page_count(), bytes = bytes.len(), "label sheet written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{COLS, ROWS};
    use label_core::LabelFields;

    fn rec(id: u64, room: &str, quantity: u32) -> Record {
        Record {
            id,
            fields: LabelFields::new(room, "Porta toalha", "0300", "0500", quantity),
        }
    }

    #[test]
    fn page_breaks_on_multiples_of_eighteen() {
        let plan = plan_document(&[rec(0, "A", 20)], &FontSizes::default());
        assert_eq!(plan.page_count(), 2);
        assert_eq!(plan.pages[0].runs.len(), 18 * 3);
        assert_eq!(plan.pages[1].runs.len(), 2 * 3);

        let exact = plan_document(&[rec(0, "A", 18)], &FontSizes::default());
        assert_eq!(exact.page_count(), 1);
    }

    #[test]
    fn first_instance_sits_in_the_top_left_cell() {
        let plan = plan_document(&[rec(0, "Sala", 1)], &FontSizes::default());
        let g = plan.geometry;
        let (cx, cy) = g.cell_center(0, ROWS - 1);
        let room = &plan.pages[0].runs[0];
        assert_eq!(room.face, Face::HelveticaBold);
        assert!((room.y - (cy + 15.0)).abs() < 1e-9);
        let width = Face::HelveticaBold.text_width("Sala", 16.0);
        assert!((room.x + width / 2.0 - cx).abs() < 1e-9);
        assert!(room.y > g.page_height / 2.0);

        let dims = &plan.pages[0].runs[2];
        assert_eq!(dims.face, Face::Helvetica);
        assert_eq!(dims.text, "0300 x 0500");
        assert!((dims.y - (cy - 25.0)).abs() < 1e-9);
    }

    #[test]
    fn last_slot_of_a_page_is_bottom_right() {
        let plan = plan_document(&[rec(0, "A", 18)], &FontSizes::default());
        let (cx, cy) = plan.geometry.cell_center(COLS - 1, 0);
        let part = &plan.pages[0].runs[17 * 3 + 1];
        assert!((part.y - (cy - 5.0)).abs() < 1e-9);
        assert!(part.x > cx - plan.geometry.cell_width / 2.0);
    }

    #[test]
    fn encodes_a_pdf_with_text() {
        let plan = plan_document(&[rec(0, "Banheiro", 2)], &FontSizes::default());
        let bytes = encode_pdf(&plan);
        assert!(bytes.starts_with(b"%PDF-"));
        let hay = String::from_utf8_lossy(&bytes);
        assert!(hay.contains("Helvetica-Bold"));
        assert!(hay.contains("(Banheiro)"));
    }

    #[test]
    fn refuses_empty_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_document(dir.path(), &OutputNaming::default(), &[rec(0, "A", 0)], &FontSizes::default())
            .unwrap_err();
        assert!(matches!(err, SheetError::NothingToPrint));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failed_write_removes_the_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let naming = OutputNaming::default();
        let (path, file) = naming.allocate(dir.path()).unwrap();
        let err = fill_or_discard(&path, file, |f| {
            f.write_all(b"%PDF-1.7 trunc")?;
            Err(io::Error::other("disk full"))
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(!path.exists());
        assert_eq!(naming.next_free(dir.path()), dir.path().join("etiquetas001.pdf"));
    }
}
