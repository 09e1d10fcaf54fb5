//! Fixed sheet geometry. Lengths are PDF points unless the name says `_mm`.

pub const COLS: usize = 3;
pub const ROWS: usize = 6;
pub const LABELS_PER_PAGE: usize = COLS * ROWS;

pub const PT_PER_MM: f64 = 72.0 / 25.4;

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

pub const MARGIN_LEFT_MM: f64 = 6.0;
pub const MARGIN_RIGHT_MM: f64 = 6.0;
pub const MARGIN_TOP_MM: f64 = 10.0;
pub const MARGIN_BOTTOM_MM: f64 = 10.0;

pub fn mm(v: f64) -> f64 {
    v * PT_PER_MM
}

/// A4 sheet with its margins removed and the remainder cut into `COLS x ROWS`
/// equal cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margin_left: f64,
    pub margin_bottom: f64,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl SheetGeometry {
    pub const fn a4() -> Self {
        let page_width = PAGE_WIDTH_MM * PT_PER_MM;
        let page_height = PAGE_HEIGHT_MM * PT_PER_MM;
        let content_w = page_width - (MARGIN_LEFT_MM + MARGIN_RIGHT_MM) * PT_PER_MM;
        let content_h = page_height - (MARGIN_TOP_MM + MARGIN_BOTTOM_MM) * PT_PER_MM;
        Self {
            page_width,
            page_height,
            margin_left: MARGIN_LEFT_MM * PT_PER_MM,
            margin_bottom: MARGIN_BOTTOM_MM * PT_PER_MM,
            cell_width: content_w / COLS as f64,
            cell_height: content_h / ROWS as f64,
        }
    }

    /// Bottom-left corner of a cell, with `row_from_bottom == 0` being the
    /// lowest row on the sheet.
    pub fn cell_origin(&self, col: usize, row_from_bottom: usize) -> (f64, f64) {
        (
            self.margin_left + col as f64 * self.cell_width,
            self.margin_bottom + row_from_bottom as f64 * self.cell_height,
        )
    }

    pub fn cell_center(&self, col: usize, row_from_bottom: usize) -> (f64, f64) {
        let (x, y) = self.cell_origin(col, row_from_bottom);
        (x + self.cell_width / 2.0, y + self.cell_height / 2.0)
    }
}

impl Default for SheetGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn a4_in_points() {
        let g = SheetGeometry::a4();
        assert!(close(g.page_width, 595.275_590_551_181_2));
        assert!(close(g.page_height, 841.889_763_779_527_7));
    }

    #[test]
    fn cells_fill_content_area() {
        let g = SheetGeometry::a4();
        let (x0, y0) = g.cell_origin(0, 0);
        let (x_end, y_end) = g.cell_origin(COLS, ROWS);
        assert!(close(x0, mm(MARGIN_LEFT_MM)));
        assert!(close(y0, mm(MARGIN_BOTTOM_MM)));
        assert!(close(x_end, g.page_width - mm(MARGIN_RIGHT_MM)));
        assert!(close(y_end, g.page_height - mm(MARGIN_TOP_MM)));
    }
}
