//! Typed configuration loaded once per run.
//!
//! Key names (including `adress`, `bank_detial` and `CVR`) are part of the
//! contract with existing configuration files and are kept as they are.

use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Conventional configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub google_sheets: GoogleSheetsAccess,
    pub google_sheet: SheetTarget,
    pub company_info: CompanyInfo,
    pub client_info: ClientInfo,
    #[serde(rename = "bank_detial")]
    pub bank_details: BankDetails,
    pub invoice_directory: String,
}

/// Credentials and OAuth scopes for the spreadsheet service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleSheetsAccess {
    pub scope: Scopes,
    pub key_file: String,
}

/// A single scope string or a list of scopes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scopes {
    One(String),
    Many(Vec<String>),
}

impl Scopes {
    pub fn as_vec(&self) -> Vec<String> {
        match self {
            Scopes::One(s) => vec![s.clone()],
            Scopes::Many(v) => v.clone(),
        }
    }
}

/// Spreadsheet title and worksheet (tab) title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetTarget {
    pub file: String,
    pub work_sheet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub company_name: String,
    #[serde(rename = "adress")]
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(rename = "adress")]
    pub address: String,
    #[serde(rename = "CVR")]
    pub cvr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankDetails {
    pub bank_name: String,
    pub reg_num: String,
    pub account_number: String,
}

/// Supported configuration file syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// `.yaml`/`.yml` → YAML, everything else → JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Json,
        }
    }
}

impl Config {
    /// Load and parse the configuration file.
    ///
    /// Every section and key is required: a missing one fails here, before
    /// anything talks to the spreadsheet service.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| AppError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let cfg = Self::parse(&content, ConfigFormat::from_path(path))?;
        log::debug!("configuration loaded from {}", path.display());
        Ok(cfg)
    }

    /// Parse configuration text in the given syntax.
    pub fn parse(content: &str, format: ConfigFormat) -> AppResult<Self> {
        match format {
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| AppError::Config(e.to_string()))
            }
            ConfigFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
            }
        }
    }

    /// Render the configuration as YAML (used by `config --print`).
    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Service-account key file, with `~/` expanded.
    pub fn key_file_path(&self) -> PathBuf {
        expand_tilde(&self.google_sheets.key_file)
    }

    /// Output directory for generated invoices, with `~/` expanded.
    pub fn invoice_dir(&self) -> PathBuf {
        expand_tilde(&self.invoice_directory)
    }

    /// Check that the paths referenced by the configuration exist.
    pub fn check_paths(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let key = self.key_file_path();
        if !key.is_file() {
            problems.push(format!("key_file not found: {}", key.display()));
        }

        let dir = self.invoice_dir();
        if !dir.is_dir() {
            problems.push(format!("invoice_directory not found: {}", dir.display()));
        }

        problems
    }
}
