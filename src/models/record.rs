//! Billing records as read from the worksheet.

use crate::errors::{AppError, AppResult};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Column names of the billing worksheet.
pub mod columns {
    pub const SENT: &str = "Sent";
    pub const INVOICE_NUMBER: &str = "Invoice Number";
    pub const DATE: &str = "Date";
    pub const DUE_DATE: &str = "Due Date";
    pub const WEEK: &str = "Week";
    pub const PLACE: &str = "Place";
    pub const DESCRIPTION: &str = "Description";
    pub const CASE_NUMBER: &str = "Case Number";
    pub const HOURS_WORKED: &str = "Hours Worked";
    pub const HOURLY_RATE: &str = "Hourly Rate";
}

/// First sheet row holding data (row 1 is the header).
pub const FIRST_DATA_ROW: u32 = 2;

/// One cell value, after numeric-looking text has been converted.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Interpret the displayed text of a cell.
    ///
    /// Blank → `Empty`, integer text → `Int`, other finite numbers → `Float`,
    /// anything else is kept verbatim as `Text`.
    pub fn from_display(raw: &str) -> Self {
        if raw.is_empty() {
            return CellValue::Empty;
        }
        let t = raw.trim();
        if let Ok(i) = t.parse::<i64>() {
            return CellValue::Int(i);
        }
        if let Ok(f) = t.parse::<f64>()
            && f.is_finite()
        {
            return CellValue::Float(f);
        }
        CellValue::Text(raw.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numeric view of the cell; `None` for text and blanks.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Empty | CellValue::Text(_) => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(i) => write!(f, "{i}"),
            // whole floats keep one decimal: 10.0 stays "10.0"
            CellValue::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{x:.1}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// One data row: column name → value, in header order.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingRecord {
    fields: Vec<(String, CellValue)>,
}

impl BillingRecord {
    pub fn new(fields: Vec<(String, CellValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    /// 1-based column position of `column` in the header.
    pub fn column_index(&self, column: &str) -> Option<u32> {
        self.fields
            .iter()
            .position(|(name, _)| name == column)
            .map(|i| i as u32 + 1)
    }
}

/// A record together with the sheet row it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    /// 1-based sheet row number (the header is row 1).
    pub row: u32,
    pub record: BillingRecord,
}

impl SheetRow {
    /// Required field. Only an absent column fails with `FieldMissing`; a
    /// blank cell is returned as `CellValue::Empty`.
    pub fn require(&self, column: &str) -> AppResult<&CellValue> {
        self.record
            .get(column)
            .ok_or_else(|| AppError::FieldMissing {
                field: column.to_string(),
                row: self.row,
            })
    }

    /// Required numeric field; a blank cell fails with `InvalidField`.
    pub fn require_number(&self, column: &str) -> AppResult<f64> {
        let v = self.require(column)?;
        v.as_f64().ok_or_else(|| AppError::InvalidField {
            field: column.to_string(),
            row: self.row,
            value: v.to_string(),
        })
    }

    /// Parsed sent-status flag of this row.
    pub fn sent_status(&self) -> AppResult<SentStatus> {
        let raw = self
            .record
            .get(columns::SENT)
            .map(|v| v.to_string())
            .unwrap_or_default();
        raw.parse().map_err(|_| AppError::InvalidSentStatus {
            row: self.row,
            value: raw,
        })
    }
}

/// Build records from a raw value grid whose first row is the header.
///
/// Short rows are padded with blanks; the n-th data row (0-based) is tagged
/// with sheet row `n + 2`.
pub fn records_from_grid(grid: &[Vec<String>]) -> AppResult<Vec<SheetRow>> {
    let Some((header, data)) = grid.split_first() else {
        return Ok(Vec::new());
    };

    let mut seen = HashSet::new();
    for name in header.iter().filter(|h| !h.is_empty()) {
        if !seen.insert(name.as_str()) {
            return Err(AppError::Worksheet(format!(
                "header is not unique: '{name}' appears more than once"
            )));
        }
    }

    let rows = data
        .iter()
        .enumerate()
        .map(|(idx, cells)| {
            let fields = header
                .iter()
                .enumerate()
                .map(|(col, name)| {
                    let raw = cells.get(col).map(String::as_str).unwrap_or("");
                    (name.clone(), CellValue::from_display(raw))
                })
                .collect();
            SheetRow {
                row: idx as u32 + FIRST_DATA_ROW,
                record: BillingRecord::new(fields),
            }
        })
        .collect();

    Ok(rows)
}

/// Two-state sent flag. Only the exact strings `Y` and `N` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentStatus {
    Sent,
    Unsent,
}

impl SentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentStatus::Sent => "Y",
            SentStatus::Unsent => "N",
        }
    }
}

impl FromStr for SentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Y" => Ok(SentStatus::Sent),
            "N" => Ok(SentStatus::Unsent),
            other => Err(format!("unrecognized sent-status '{other}'")),
        }
    }
}

impl fmt::Display for SentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
