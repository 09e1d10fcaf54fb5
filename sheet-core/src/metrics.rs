//! Advance widths of the two base-14 faces the document uses, in 1/1000 em,
//! so text can be centered without embedding a font.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    Helvetica,
    HelveticaBold,
}

impl Face {
    pub fn base_font(self) -> &'static [u8] {
        match self {
            Face::Helvetica => b"Helvetica",
            Face::HelveticaBold => b"Helvetica-Bold",
        }
    }

    /// Resource name used inside page content streams.
    pub fn resource(self) -> &'static [u8] {
        match self {
            Face::Helvetica => b"F1",
            Face::HelveticaBold => b"F2",
        }
    }

    fn table(self) -> &'static [u16; 95] {
        match self {
            Face::Helvetica => &HELVETICA,
            Face::HelveticaBold => &HELVETICA_BOLD,
        }
    }

    pub fn char_width(self, c: char) -> u16 {
        let base = fold_accent(c);
        match base as u32 {
            0x20..=0x7e => self.table()[base as usize - 0x20],
            _ => 556,
        }
    }

    pub fn text_width(self, text: &str, size: f64) -> f64 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        f64::from(units) * size / 1000.0
    }
}

/// Bytes for a WinAnsi-encoded string. Latin-1 maps straight through;
/// anything else becomes `?`.
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u8,
            _ => b'?',
        })
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
