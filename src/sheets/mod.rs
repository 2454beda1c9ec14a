// src/sheets/mod.rs

pub mod auth;
pub mod google;
pub mod memory;

pub use auth::{Session, authenticate};
pub use google::{GoogleWorksheet, open_worksheet};
pub use memory::{CellUpdate, MemoryWorksheet};

use crate::errors::AppResult;
use crate::models::record::SheetRow;

/// A worksheet (one tab of a spreadsheet) the run reads from and writes to.
pub trait Worksheet {
    /// Tab title.
    fn title(&self) -> &str;

    /// All data rows in sheet order, each tagged with its sheet row number.
    fn read_all_records(&self) -> AppResult<Vec<SheetRow>>;

    /// Overwrite one cell. `row` and `col` are 1-based sheet positions.
    fn update_cell(&mut self, row: u32, col: u32, value: &str) -> AppResult<()>;
}

/// Column letters for a 1-based column index (1 → A, 27 → AA).
pub fn column_letters(mut col: u32) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Sheet title quoted for A1 notation, with embedded quotes doubled.
pub fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// A1 reference of a single cell, e.g. `'Uge 18'!B3`.
pub fn a1_cell(title: &str, row: u32, col: u32) -> String {
    format!("{}!{}{}", quote_title(title), column_letters(col), row)
}
