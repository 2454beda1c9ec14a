//! Google Sheets v4 / Drive v3 implementation of [`Worksheet`].

use crate::errors::{AppError, AppResult};
use crate::models::record::{SheetRow, records_from_grid};
use crate::sheets::auth::Session;
use crate::sheets::{Worksheet, a1_cell, quote_title};
use reqwest::Url;
use reqwest::blocking::Response;
use serde::Deserialize;
use serde_json::{Value, json};

const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// One tab of a Google spreadsheet.
#[derive(Debug, Clone)]
pub struct GoogleWorksheet {
    session: Session,
    spreadsheet_id: String,
    sheet_id: i64,
    title: String,
}

impl GoogleWorksheet {
    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn sheet_id(&self) -> i64 {
        self.sheet_id
    }

    fn values_url(&self, range: &str) -> AppResult<Url> {
        endpoint(SHEETS_URL, &[self.spreadsheet_id.as_str(), "values", range])
    }
}

/// Open `worksheet_name` inside the spreadsheet titled `file_name`.
pub fn open_worksheet(
    session: &Session,
    file_name: &str,
    worksheet_name: &str,
) -> AppResult<GoogleWorksheet> {
    let spreadsheet_id = find_spreadsheet(session, file_name)?;

    let url = endpoint(SHEETS_URL, &[spreadsheet_id.as_str()])?;
    let resp = session
        .http()
        .get(url)
        .bearer_auth(session.access_token())
        .query(&[("fields", "sheets.properties(sheetId,title)")])
        .send()?;
    let meta: SpreadsheetMeta = check(resp, &format!("spreadsheet '{file_name}'"))?.json()?;

    let props = meta
        .sheets
        .into_iter()
        .map(|s| s.properties)
        .find(|p| p.title == worksheet_name)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "worksheet '{worksheet_name}' in spreadsheet '{file_name}'"
            ))
        })?;

    log::debug!(
        "opened worksheet '{}' (sheetId {}) of spreadsheet {}",
        props.title,
        props.sheet_id,
        spreadsheet_id
    );

    Ok(GoogleWorksheet {
        session: session.clone(),
        spreadsheet_id,
        sheet_id: props.sheet_id,
        title: props.title,
    })
}

fn find_spreadsheet(session: &Session, file_name: &str) -> AppResult<String> {
    let query = drive_query(file_name);
    let resp = session
        .http()
        .get(DRIVE_FILES_URL)
        .bearer_auth(session.access_token())
        .query(&[
            ("q", query.as_str()),
            ("fields", "files(id,name)"),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ])
        .send()?;
    let list: DriveFileList = check(resp, &format!("spreadsheet '{file_name}'"))?.json()?;

    let file = list
        .files
        .into_iter()
        .find(|f| f.name == file_name)
        .ok_or_else(|| AppError::NotFound(format!("spreadsheet '{file_name}'")))?;

    log::debug!("spreadsheet '{}' has id {}", file.name, file.id);
    Ok(file.id)
}

/// Drive search expression matching a spreadsheet by exact title.
fn drive_query(file_name: &str) -> String {
    let escaped = file_name.replace('\\', "\\\\").replace('\'', "\\'");
    format!("name = '{escaped}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false")
}

impl Worksheet for GoogleWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn read_all_records(&self) -> AppResult<Vec<SheetRow>> {
        let url = self.values_url(&quote_title(&self.title))?;
        let resp = self
            .session
            .http()
            .get(url)
            .bearer_auth(self.session.access_token())
            .query(&[
                ("valueRenderOption", "FORMATTED_VALUE"),
                ("majorDimension", "ROWS"),
            ])
            .send()?;
        let range: ValueRange = check(resp, &format!("worksheet '{}'", self.title))?.json()?;

        let grid: Vec<Vec<String>> = range
            .values
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        let rows = records_from_grid(&grid)?;
        log::debug!("read {} record(s) from '{}'", rows.len(), self.title);
        Ok(rows)
    }

    fn update_cell(&mut self, row: u32, col: u32, value: &str) -> AppResult<()> {
        let range = a1_cell(&self.title, row, col);
        let url = self.values_url(&range)?;
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [[value]],
        });

        let resp = self
            .session
            .http()
            .put(url)
            .bearer_auth(self.session.access_token())
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body)
            .send()?;
        check(resp, &format!("cell {range}"))?;

        log::debug!("updated {range} = {value}");
        Ok(())
    }
}

/// Base URL plus percent-encoded path segments.
fn endpoint(base: &str, segments: &[&str]) -> AppResult<Url> {
    let mut url = Url::parse(base).map_err(|e| AppError::Url(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Url(format!("{base} cannot take path segments")))?
        .extend(segments);
    Ok(url)
}

/// Text of a cell as delivered by the values endpoint.
fn cell_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        other => other.to_string(),
    }
}

/// Pass successful responses through, map failures onto the error taxonomy.
fn check(resp: Response, what: &str) -> AppResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(status_error(status.as_u16(), &body, what))
}

fn status_error(status: u16, body: &str, what: &str) -> AppError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        401 => AppError::Auth(format!("{what}: {message}")),
        403 => AppError::Permission(format!("{what}: {message}")),
        404 => AppError::NotFound(format!("{what}: {message}")),
        _ => AppError::Api { status, message },
    }
}
