//! Page layout of an invoice as plain drawing instructions.
//!
//! Positions are worked out in millimetres from the top-left corner of an A4
//! page and stored in PDF points from the bottom-left, ready for the writer.
//! Header and footer are ordinary drawing steps applied to every page.

use crate::config::Config;
use crate::models::invoice::{InvoiceData, format_amount};
use crate::render::fonts::Font;
use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;

pub const PAGE_W_MM: f32 = 210.0;
pub const PAGE_H_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const CONTENT_W_MM: f32 = PAGE_W_MM - 2.0 * MARGIN_MM;
/// Inner padding between a cell edge and its text.
const CELL_PAD_MM: f32 = 1.0;
const PT_PER_MM: f32 = 72.0 / 25.4;

const HEADER_TOP_MM: f32 = 10.0;
const BODY_TOP_MM: f32 = 35.0;
/// Footer block starts 110 mm above the bottom edge; body stays above it.
const FOOTER_TOP_MM: f32 = PAGE_H_MM - 110.0;
const FOOTER_LINE_H_MM: f32 = 10.0;
const RULE_Y_MM: f32 = PAGE_H_MM - 30.0;
const CONTACT_Y_MM: f32 = PAGE_H_MM - 25.0;

const TABLE_COLS_MM: [f32; 4] = [60.0, 40.0, 40.0, 50.0];
const TABLE_HEADER_GRAY: f32 = 200.0 / 255.0;
const LINE_ITEM_LABEL: &str = "Rope Access";

pub fn mm(v: f32) -> f32 {
    v * PT_PER_MM
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One drawing instruction in PDF user space (points, origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        gray: f32,
    },
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Text of every text instruction, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// A text box in mm, like a table cell: optional fill and border, text
    /// aligned inside and vertically centred.
    fn cell(&mut self, x: f32, top: f32, w: f32, h: f32, text: &str, style: CellStyle) {
        let bottom = PAGE_H_MM - top - h;

        if let Some(gray) = style.fill {
            self.ops.push(DrawOp::FillRect {
                x: mm(x),
                y: mm(bottom),
                w: mm(w),
                h: mm(h),
                gray,
            });
        }
        if style.border {
            self.ops.push(DrawOp::StrokeRect {
                x: mm(x),
                y: mm(bottom),
                w: mm(w),
                h: mm(h),
            });
        }
        if text.is_empty() {
            return;
        }

        let text_w = style.font.text_width(text, style.size) / PT_PER_MM;
        let tx = match style.align {
            Align::Left => x + CELL_PAD_MM,
            Align::Center => x + (w - text_w) / 2.0,
            Align::Right => x + w - CELL_PAD_MM - text_w,
        };
        // baseline: middle of the cell, shifted down by ~0.3 em
        let font_mm = style.size / PT_PER_MM;
        let baseline = top + h / 2.0 + 0.3 * font_mm;

        self.ops.push(DrawOp::Text {
            x: mm(tx),
            y: mm(PAGE_H_MM - baseline),
            font: style.font,
            size: style.size,
            text: text.to_string(),
        });
    }

    fn hline(&mut self, x1: f32, x2: f32, y: f32, width_mm: f32) {
        self.ops.push(DrawOp::Line {
            x1: mm(x1),
            y1: mm(PAGE_H_MM - y),
            x2: mm(x2),
            y2: mm(PAGE_H_MM - y),
            width: mm(width_mm),
        });
    }
}

#[derive(Debug, Clone, Copy)]
struct CellStyle {
    font: Font,
    size: f32,
    align: Align,
    border: bool,
    fill: Option<f32>,
}

impl CellStyle {
    fn text(font: Font, size: f32, align: Align) -> Self {
        Self {
            font,
            size,
            align,
            border: false,
            fill: None,
        }
    }

    fn boxed(mut self, fill: Option<f32>) -> Self {
        self.border = true;
        self.fill = fill;
        self
    }
}

/// One cell of a body row; `x` is relative to the left margin.
#[derive(Debug, Clone)]
struct Cell {
    x: f32,
    w: f32,
    text: String,
    style: CellStyle,
}

/// A horizontal band of the body. Rows never split across pages.
#[derive(Debug, Clone)]
struct Row {
    height: f32,
    cells: Vec<Cell>,
}

impl Row {
    fn gap(height: f32) -> Self {
        Self {
            height,
            cells: Vec::new(),
        }
    }

    fn single(height: f32, text: String, style: CellStyle) -> Self {
        Self {
            height,
            cells: vec![Cell {
                x: 0.0,
                w: CONTENT_W_MM,
                text,
                style,
            }],
        }
    }
}

/// Lay out the complete invoice: header and footer on every page, body rows
/// flowing onto further pages when they would reach the footer.
pub fn compose(invoice: &InvoiceData, config: &Config) -> Vec<Page> {
    let rows = body_rows(invoice);
    let mut pages = Vec::new();
    let mut page = start_page(invoice, config);
    let mut y = BODY_TOP_MM;

    for row in rows {
        if y + row.height > FOOTER_TOP_MM && y > BODY_TOP_MM {
            pages.push(std::mem::take(&mut page));
            page = start_page(invoice, config);
            y = BODY_TOP_MM;
            log::debug!("invoice {}: body continues on page {}", invoice.invoice_number, pages.len() + 1);
        }
        for cell in &row.cells {
            page.cell(MARGIN_MM + cell.x, y, cell.w, row.height, &cell.text, cell.style);
        }
        y += row.height;
    }

    pages.push(page);
    pages
}

fn start_page(invoice: &InvoiceData, config: &Config) -> Page {
    let mut page = Page::default();
    draw_header(&mut page, config);
    draw_footer(&mut page, invoice, config);
    page
}

fn draw_header(page: &mut Page, config: &Config) {
    let company = &config.company_info;
    let client = &config.client_info;
    let mut y = HEADER_TOP_MM;

    page.cell(
        MARGIN_MM,
        y,
        CONTENT_W_MM,
        10.0,
        &company.company_name,
        CellStyle::text(Font::Bold, 20.0, Align::Right),
    );
    y += 10.0;

    page.cell(
        MARGIN_MM,
        y,
        CONTENT_W_MM,
        5.0,
        &client.name,
        CellStyle::text(Font::Bold, 14.0, Align::Left),
    );
    y += 5.0;

    for line in [&client.address, &client.cvr] {
        page.cell(
            MARGIN_MM,
            y,
            CONTENT_W_MM,
            5.0,
            line,
            CellStyle::text(Font::Regular, 10.0, Align::Left),
        );
        y += 5.0;
    }
}

/// Payment terms shown at the bottom of every page.
pub fn payment_terms(invoice: &InvoiceData, config: &Config) -> Vec<String> {
    let bank = &config.bank_details;
    vec![
        format!(
            "Betalingsbetingelser: Netto 15 dage - Forfaldsdato: {}",
            invoice.due_date
        ),
        "Beløbet indbetales på bankkonto:".to_string(),
        format!(
            "{} / {} / {}",
            bank.bank_name, bank.reg_num, bank.account_number
        ),
        "Fakturanr. angives ved bankoverførsel.".to_string(),
        "Ved betaling efter forfald tilskrives der renter på 0,93%, pr. måned, samt et gebyr på 100,00 DKK."
            .to_string(),
    ]
}

/// Contact line centred under the footer rule.
pub fn contact_line(config: &Config) -> String {
    let c = &config.company_info;
    format!(
        "{} / {} / {} / {}",
        c.company_name, c.address, c.phone, c.email
    )
}

fn draw_footer(page: &mut Page, invoice: &InvoiceData, config: &Config) {
    let style = CellStyle::text(Font::Italic, 9.0, Align::Left);
    let mut y = FOOTER_TOP_MM;

    for paragraph in payment_terms(invoice, config) {
        for line in wrap_to_width(&paragraph, style.font, style.size, CONTENT_W_MM) {
            page.cell(MARGIN_MM, y, CONTENT_W_MM, FOOTER_LINE_H_MM, &line, style);
            y += FOOTER_LINE_H_MM;
        }
    }

    page.hline(MARGIN_MM, PAGE_W_MM - MARGIN_MM, RULE_Y_MM, 0.5);

    page.cell(
        MARGIN_MM,
        CONTACT_Y_MM,
        CONTENT_W_MM,
        10.0,
        &contact_line(config),
        CellStyle::text(Font::Italic, 9.0, Align::Center),
    );
}

fn body_rows(invoice: &InvoiceData) -> Vec<Row> {
    let mut rows = Vec::new();
    let regular = CellStyle::text(Font::Regular, 10.0, Align::Left);

    // Dato: <date>                                   Fakturanr. <n>
    let label = "Dato: ";
    let label_w = Font::Regular.text_width(label, 10.0) / PT_PER_MM + 2.0 * CELL_PAD_MM;
    rows.push(Row {
        height: 10.0,
        cells: vec![
            Cell {
                x: 0.0,
                w: label_w,
                text: label.to_string(),
                style: regular,
            },
            Cell {
                x: label_w,
                w: CONTENT_W_MM - label_w,
                text: invoice.date.clone(),
                style: CellStyle::text(Font::Bold, 10.0, Align::Left),
            },
            Cell {
                x: 0.0,
                w: CONTENT_W_MM,
                text: format!("Fakturanr. {}", invoice.invoice_number),
                style: CellStyle::text(Font::Regular, 10.0, Align::Right),
            },
        ],
    });

    for line in wrap_to_width(&invoice.summary_line(), Font::Regular, 10.0, CONTENT_W_MM) {
        rows.push(Row::single(10.0, line, regular));
    }
    rows.push(Row::gap(10.0));

    rows.push(table_row(
        ["Beskrivelse", "Antal", "Enhedspris", "Pris"].map(String::from),
        Some(TABLE_HEADER_GRAY),
    ));

    let totals = invoice.totals();
    rows.push(table_row(
        [
            LINE_ITEM_LABEL.to_string(),
            format!("{} timer", format_amount(invoice.hours_worked)),
            format_amount(invoice.hourly_rate),
            format_amount(totals.subtotal),
        ],
        None,
    ));

    let right = CellStyle::text(Font::Regular, 10.0, Align::Right);
    rows.push(Row::single(
        10.0,
        format!("Subtotal: {} DKK", format_amount(totals.subtotal)),
        right,
    ));
    rows.push(Row::single(
        10.0,
        format!("Moms (25,00%): {} DKK", format_amount(totals.tax)),
        right,
    ));
    rows.push(Row::single(
        10.0,
        format!("Total: {} DKK", format_amount(totals.total)),
        CellStyle::text(Font::Bold, 10.0, Align::Right),
    ));

    rows
}

/// Bordered 4-column table row; the first column is left-aligned.
fn table_row(texts: [String; 4], fill: Option<f32>) -> Row {
    let mut x = 0.0;
    let cells = texts
        .into_iter()
        .zip(TABLE_COLS_MM)
        .enumerate()
        .map(|(i, (text, w))| {
            let align = if i == 0 { Align::Left } else { Align::Center };
            let cell = Cell {
                x,
                w,
                text,
                style: CellStyle::text(Font::Regular, 10.0, align).boxed(fill),
            };
            x += w;
            cell
        })
        .collect();
    Row {
        height: 10.0,
        cells,
    }
}

/// A word measured in millimetres for the first-fit wrapper.
#[derive(Debug)]
struct MeasuredWord<'a> {
    word: &'a str,
    width: f64,
    space: f64,
}

impl Fragment for MeasuredWord<'_> {
    fn width(&self) -> f64 {
        self.width
    }

    fn whitespace_width(&self) -> f64 {
        self.space
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Break `text` on spaces so each line fits in a cell `width_mm` wide.
pub fn wrap_to_width(text: &str, font: Font, size: f32, width_mm: f32) -> Vec<String> {
    let space = (font.text_width(" ", size) / PT_PER_MM) as f64;
    let words: Vec<MeasuredWord> = text
        .split(' ')
        .map(|w| MeasuredWord {
            word: w,
            width: (font.text_width(w, size) / PT_PER_MM) as f64,
            space,
        })
        .collect();

    let usable = (width_mm - 2.0 * CELL_PAD_MM) as f64;
    wrap_first_fit(&words, &[usable])
        .into_iter()
        .map(|line| {
            line.iter()
                .map(|w| w.word)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
