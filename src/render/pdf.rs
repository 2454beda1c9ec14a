use crate::render::fonts::{Font, encode_winansi};
use crate::render::layout::{DrawOp, PAGE_H_MM, PAGE_W_MM, Page, mm};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str, TextStr};

/// Serialises laid-out pages into a PDF document.
pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    info_id: Ref,
    page_refs: Vec<Ref>,

    page_w: f32,
    page_h: f32,

    next_id: i32,
    font_ids: [(Font, Ref); 3],
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let info_id = Ref::new(3);
        let font_ids = [
            (Font::Regular, Ref::new(4)),
            (Font::Bold, Ref::new(5)),
            (Font::Italic, Ref::new(6)),
        ];
        let next_id = 7;

        for (font, id) in font_ids {
            pdf.type1_font(id)
                .base_font(font.base_font())
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        Self {
            pdf,
            catalog_id,
            pages_id,
            info_id,
            page_refs: Vec::new(),

            page_w: mm(PAGE_W_MM),
            page_h: mm(PAGE_H_MM),

            next_id,
            font_ids,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    /// Append one page and its content stream.
    pub fn add_page(&mut self, page: &Page) {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();
        self.page_refs.push(page_id);

        {
            let mut writer = self.pdf.page(page_id);
            writer
                .parent(self.pages_id)
                .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
                .contents(content_id);

            let mut resources = writer.resources();
            let mut fonts = resources.fonts();
            for (font, id) in self.font_ids {
                fonts.pair(font.resource_name(), id);
            }
        }

        let mut content = Content::new();
        for op in &page.ops {
            draw_op(&mut content, op);
        }
        self.pdf.stream(content_id, &content.finish());
    }

    /// Finish the document and return its bytes.
    pub fn finish(mut self, title: &str) -> Vec<u8> {
        self.pdf
            .document_info(self.info_id)
            .title(TextStr(title))
            .producer(TextStr(concat!(
                env!("CARGO_PKG_NAME"),
                " ",
                env!("CARGO_PKG_VERSION")
            )));

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        {
            let mut pages = self.pdf.pages(self.pages_id);
            pages.count(self.page_refs.len() as i32);
            pages.kids(self.page_refs.iter().copied());
        }

        self.pdf.finish()
    }
}

fn draw_op(content: &mut Content, op: &DrawOp) {
    match op {
        DrawOp::Text {
            x,
            y,
            font,
            size,
            text,
        } => {
            content.begin_text();
            content.set_font(font.resource_name(), *size);
            content.set_text_matrix([1.0, 0.0, 0.0, 1.0, *x, *y]);
            content.show(Str(&encode_winansi(text)));
            content.end_text();
        }
        DrawOp::FillRect { x, y, w, h, gray } => {
            content.save_state();
            content.set_fill_rgb(*gray, *gray, *gray);
            content.rect(*x, *y, *w, *h);
            content.fill_nonzero();
            content.restore_state();
        }
        DrawOp::StrokeRect { x, y, w, h } => {
            content.save_state();
            content.set_line_width(0.57);
            content.rect(*x, *y, *w, *h);
            content.stroke();
            content.restore_state();
        }
        DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
        } => {
            content.save_state();
            content.set_line_width(*width);
            content.move_to(*x1, *y1);
            content.line_to(*x2, *y2);
            content.stroke();
            content.restore_state();
        }
    }
}

/// Write every page of an invoice layout into a PDF.
pub fn write_pdf(pages: &[Page], title: &str) -> Vec<u8> {
    let mut pdf = PdfManager::new();
    for page in pages {
        pdf.add_page(page);
    }
    pdf.finish(title)
}
