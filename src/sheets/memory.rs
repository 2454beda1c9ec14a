//! In-memory [`Worksheet`]: a header plus rows, recording every cell update.

use crate::errors::{AppError, AppResult};
use crate::models::record::{SheetRow, records_from_grid};
use crate::sheets::Worksheet;

/// One recorded `update_cell` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub row: u32,
    pub col: u32,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryWorksheet {
    title: String,
    grid: Vec<Vec<String>>,
    updates: Vec<CellUpdate>,
    failing_rows: Vec<u32>,
}

impl MemoryWorksheet {
    pub fn new(title: &str, header: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            grid: vec![header.iter().map(|s| s.to_string()).collect()],
            ..Default::default()
        }
    }

    pub fn with_row(mut self, cells: &[&str]) -> Self {
        self.push_row(cells);
        self
    }

    pub fn push_row(&mut self, cells: &[&str]) {
        self.grid.push(cells.iter().map(|s| s.to_string()).collect());
    }

    /// Make every `update_cell` targeting `row` fail.
    pub fn fail_updates_on_row(&mut self, row: u32) {
        self.failing_rows.push(row);
    }

    pub fn updates(&self) -> &[CellUpdate] {
        &self.updates
    }

    /// Current text of a cell (1-based), blank when outside the grid.
    pub fn cell(&self, row: u32, col: u32) -> &str {
        let (Some(r), Some(c)) = (row.checked_sub(1), col.checked_sub(1)) else {
            return "";
        };
        self.grid
            .get(r as usize)
            .and_then(|line| line.get(c as usize))
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl Worksheet for MemoryWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn read_all_records(&self) -> AppResult<Vec<SheetRow>> {
        records_from_grid(&self.grid)
    }

    fn update_cell(&mut self, row: u32, col: u32, value: &str) -> AppResult<()> {
        if row == 0 || col == 0 {
            return Err(AppError::Api {
                status: 400,
                message: format!("invalid cell position ({row}, {col})"),
            });
        }
        if self.failing_rows.contains(&row) {
            return Err(AppError::Api {
                status: 503,
                message: format!("update of row {row} rejected"),
            });
        }

        let (r, c) = (row as usize - 1, col as usize - 1);
        if self.grid.len() <= r {
            self.grid.resize(r + 1, Vec::new());
        }
        let line = &mut self.grid[r];
        if line.len() <= c {
            line.resize(c + 1, String::new());
        }
        line[c] = value.to_string();

        self.updates.push(CellUpdate {
            row,
            col,
            value: value.to_string(),
        });
        Ok(())
    }
}
