// src/render/mod.rs

pub mod fonts;
pub mod layout;
mod pdf;

pub use layout::{DrawOp, Page, compose};
pub use pdf::{PdfManager, write_pdf};

use crate::config::Config;
use crate::errors::AppResult;
use crate::models::invoice::InvoiceData;
use crate::models::record::SheetRow;

/// Render an invoice for already validated data.
pub fn render(invoice: &InvoiceData, config: &Config) -> Vec<u8> {
    let pages = compose(invoice, config);
    write_pdf(&pages, &format!("Faktura {}", invoice.invoice_number))
}

/// Validate a sheet row and render its invoice.
///
/// A missing or non-numeric field fails here, before any file is touched.
pub fn render_row(row: &SheetRow, config: &Config) -> AppResult<(InvoiceData, Vec<u8>)> {
    let invoice = InvoiceData::from_row(row)?;
    let bytes = render(&invoice, config);
    Ok((invoice, bytes))
}
