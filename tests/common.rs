#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use sheet_invoicer::config::{Config, ConfigFormat};
use sheet_invoicer::sheets::MemoryWorksheet;
use std::fs;
use std::path::{Path, PathBuf};

pub const HEADER: [&str; 10] = [
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

pub fn invoicer() -> Command {
    cargo_bin_cmd!("sheet-invoicer")
}

/// Configuration document pointing at `key_file` and `invoice_dir`.
pub fn config_json(key_file: &Path, invoice_dir: &Path) -> serde_json::Value {
    serde_json::json!({
        "google_sheets": {
            "scope": ["https://spreadsheets.google.com/feeds", "https://www.googleapis.com/auth/drive"],
            "key_file": key_file.to_string_lossy(),
        },
        "google_sheet": { "file": "Timesheet", "work_sheet": "2024" },
        "company_info": {
            "company_name": "Højde ApS",
            "adress": "Havnegade 1, 1058 København K",
            "phone": "+45 12 34 56 78",
            "email": "faktura@hojde.dk"
        },
        "client_info": { "name": "Kunde A/S", "adress": "Vej 2, 8000 Aarhus C", "CVR": "CVR 12345678" },
        "bank_detial": { "bank_name": "Danske Bank", "reg_num": "1234", "account_number": "0012345678" },
        "invoice_directory": invoice_dir.to_string_lossy(),
    })
}

/// Write a config file into `dir` and return its path.
pub fn write_config(dir: &Path, value: &serde_json::Value) -> PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, serde_json::to_string_pretty(value).expect("serialize config"))
        .expect("write config");
    path
}

pub fn config_for(invoice_dir: &Path) -> Config {
    let value = config_json(Path::new("service_account.json"), invoice_dir);
    Config::parse(&value.to_string(), ConfigFormat::Json).expect("parse config")
}

/// One billing row with the given sent flag, invoice number, hours and rate.
pub fn row(sent: &str, number: &str, hours: &str, rate: &str) -> Vec<String> {
    [
        sent,
        number,
        "01-05-2024",
        "16-05-2024",
        "18",
        "Aarhus",
        "Facade",
        "C-77",
        hours,
        rate,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn worksheet(rows: &[Vec<String>]) -> MemoryWorksheet {
    let mut ws = MemoryWorksheet::new("2024", &HEADER);
    for r in rows {
        let cells: Vec<&str> = r.iter().map(String::as_str).collect();
        ws.push_row(&cells);
    }
    ws
}
