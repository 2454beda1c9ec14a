use crate::errors::AppResult;
use crate::models::record::{SheetRow, columns};

/// Fixed VAT rate (25%).
pub const TAX_RATE: f64 = 0.25;

/// The validated content of one invoice, extracted from a sheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceData {
    pub invoice_number: String,
    pub date: String,
    pub due_date: String,
    pub week: String,
    pub place: String,
    pub description: String,
    pub case_number: String,
    pub hours_worked: f64,
    pub hourly_rate: f64,
}

impl InvoiceData {
    /// Collect every field the invoice needs. The first absent column fails;
    /// blank text cells become empty strings.
    pub fn from_row(row: &SheetRow) -> AppResult<Self> {
        let text = |col: &str| -> AppResult<String> { Ok(row.require(col)?.to_string()) };

        Ok(Self {
            invoice_number: text(columns::INVOICE_NUMBER)?,
            date: text(columns::DATE)?,
            due_date: text(columns::DUE_DATE)?,
            week: text(columns::WEEK)?,
            place: text(columns::PLACE)?,
            description: text(columns::DESCRIPTION)?,
            case_number: text(columns::CASE_NUMBER)?,
            hours_worked: row.require_number(columns::HOURS_WORKED)?,
            hourly_rate: row.require_number(columns::HOURLY_RATE)?,
        })
    }

    /// Output file name: `Faktura-<Invoice Number>.pdf`.
    pub fn file_name(&self) -> String {
        invoice_file_name(&self.invoice_number)
    }

    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::compute(self.hours_worked, self.hourly_rate)
    }

    /// One-line work summary printed under the date line.
    pub fn summary_line(&self) -> String {
        format!(
            "Week {} - {} - {} - Rope Access - Case Number: {}",
            self.week, self.place, self.description, self.case_number
        )
    }
}

pub fn invoice_file_name(invoice_number: &str) -> String {
    format!("Faktura-{invoice_number}.pdf")
}

/// Subtotal, tax and grand total of the single line item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl InvoiceTotals {
    pub fn compute(hours: f64, rate: f64) -> Self {
        let subtotal = hours * rate;
        let tax = subtotal * TAX_RATE;
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Two-decimal amount as printed on the invoice, e.g. `4500.00`.
pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::record::records_from_grid;

    const HEADER: [&str; 10] = [
            "Sent",
            "Invoice Number",
            "Date",
            "Due Date",
            "Week",
            "Place",
            "Description",
            "Case Number",
            "Hours Worked",
            "Hourly Rate",
        ];

    fn row_with(header: &[&str], values: &[&str]) -> SheetRow {
        let grid = vec![
            header.iter().map(|s| s.to_string()).collect(),
            values.iter().map(|s| s.to_string()).collect(),
        ];
        records_from_grid(&grid).unwrap().remove(0)
    }

    fn row(values: &[&str]) -> SheetRow {
        row_with(&HEADER, values)
    }

    #[test]
    fn totals_ten_hours_at_450() {
        let t = InvoiceTotals::compute(10.0, 450.0);
        assert_eq!(format_amount(t.subtotal), "4500.00");
        assert_eq!(format_amount(t.tax), "1125.00");
        assert_eq!(format_amount(t.total), "5625.00");
    }

    #[test]
    fn totals_three_and_a_half_hours_at_600() {
        let t = InvoiceTotals::compute(3.5, 600.0);
        assert_eq!(format_amount(t.subtotal), "2100.00");
        assert_eq!(format_amount(t.tax), "525.00");
        assert_eq!(format_amount(t.total), "2625.00");
    }

    #[test]
    fn negative_values_pass_through() {
        let t = InvoiceTotals::compute(-2.0, 100.0);
        assert_eq!(format_amount(t.total), "-250.00");
    }

    #[test]
    fn extracts_fields_from_row() {
        let r = row(&[
            "N", "1042", "01-05-2024", "16-05-2024", "18", "Aarhus", "Facade", "C-77", "7.5", "450",
        ]);
        let inv = InvoiceData::from_row(&r).unwrap();
        assert_eq!(inv.invoice_number, "1042");
        assert_eq!(inv.file_name(), "Faktura-1042.pdf");
        assert_eq!(inv.hours_worked, 7.5);
        assert_eq!(inv.hourly_rate, 450.0);
        assert_eq!(
            inv.summary_line(),
            "Week 18 - Aarhus - Facade - Rope Access - Case Number: C-77"
        );
    }

    #[test]
    fn absent_column_fails() {
        let header: Vec<&str> = HEADER.iter().copied().filter(|h| *h != "Due Date").collect();
        let r = row_with(
            &header,
            &["N", "1042", "01-05-2024", "18", "Aarhus", "Facade", "C-77", "7.5", "450"],
        );
        let err = InvoiceData::from_row(&r).unwrap_err();
        assert!(matches!(err, AppError::FieldMissing { ref field, row: 2 } if field == "Due Date"));
    }

    #[test]
    fn blank_text_fields_are_kept_empty() {
        let r = row(&[
            "N", "1042", "01-05-2024", "", "18", "", "Facade", "", "7.5", "450",
        ]);
        let inv = InvoiceData::from_row(&r).unwrap();
        assert_eq!(inv.due_date, "");
        assert_eq!(
            inv.summary_line(),
            "Week 18 -  - Facade - Rope Access - Case Number: "
        );
    }

    #[test]
    fn blank_rate_is_invalid() {
        let r = row(&[
            "N", "1042", "01-05-2024", "16-05-2024", "18", "Aarhus", "Facade", "C-77", "7.5", "",
        ]);
        assert!(matches!(
            InvoiceData::from_row(&r),
            Err(AppError::InvalidField { ref field, .. }) if field == "Hourly Rate"
        ));
    }

    #[test]
    fn non_numeric_hours_fail() {
        let r = row(&[
            "N", "1042", "01-05-2024", "16-05-2024", "18", "Aarhus", "Facade", "C-77", "lots", "450",
        ]);
        assert!(matches!(
            InvoiceData::from_row(&r),
            Err(AppError::InvalidField { .. })
        ));
    }
}
