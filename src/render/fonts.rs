//! Standard-14 Helvetica family: resource names, glyph widths and WinAnsi
//! text encoding. Widths are the AFM advance widths in 1/1000 em.

use pdf_writer::Name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Regular,
    Bold,
    Italic,
}

impl Font {
    /// Name of the font in the page resource dictionary.
    pub fn resource_name(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"F1"),
            Font::Bold => Name(b"F2"),
            Font::Italic => Name(b"F3"),
        }
    }

    pub fn base_font(self) -> Name<'static> {
        match self {
            Font::Regular => Name(b"Helvetica"),
            Font::Bold => Name(b"Helvetica-Bold"),
            Font::Italic => Name(b"Helvetica-Oblique"),
        }
    }

    /// Advance width of one WinAnsi code in 1/1000 em.
    fn glyph_width(self, code: u8) -> u16 {
        let table = match self {
            Font::Regular | Font::Italic => &HELVETICA,
            Font::Bold => &HELVETICA_BOLD,
        };
        match code {
            0x20..=0x7E => table[(code - 0x20) as usize],
            _ => latin1_width(self, code),
        }
    }

    /// Width of `text` at `size` points, in points.
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = encode_winansi(text)
            .into_iter()
            .map(|c| self.glyph_width(c) as u32)
            .sum();
        units as f32 * size / 1000.0
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

fn latin1_width(font: Font, code: u8) -> u16 {
    let bold = font == Font::Bold;
    match code {
        0xC5 => if bold { 722 } else { 667 }, // Å
        0xC6 => 1000,                         // Æ
        0xD8 => 778,                          // Ø
        0xE6 => 889,                          // æ
        0xF8 => 611,                          // ø
        0xE5 | 0xE4 | 0xE9 | 0xE8 => 556,     // å ä é è
        0xF6 | 0xFC => if bold { 611 } else { 556 }, // ö ü
        0x96 => 556,                          // en dash
        0x97 => 1000,                         // em dash
        0x80 => 556,                          // €
        0xA0 => 278,
        _ => 556,
    }
}

/// Encode text as WinAnsi bytes; characters outside the code page become `?`.
pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}
