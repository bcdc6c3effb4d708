//! Google Sheets REST client.
//!
//! Talks to the Sheets v4 API with `reqwest`. Every call is attempted
//! once; failures are returned to the caller as-is.

use super::auth::{ServiceAccountKey, TokenProvider};
use super::{Connection, DataSource, SheetError};
use crate::config::SheetConfig;
use crate::models::Table;
use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

const API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Response of `spreadsheets.values.get`.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Body of `spreadsheets.values.update`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueUpdate<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: [Vec<String>; 1],
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

/// Client bound to one worksheet of one spreadsheet.
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    auth: TokenProvider,
    spreadsheet_id: String,
    worksheet: String,
}

impl GoogleSheetsClient {
    /// Create a client. No network call is made here.
    pub fn new(config: &SheetConfig, key: ServiceAccountKey) -> Result<Self, SheetError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("ceria-skm/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| SheetError::Http {
                url: API_BASE.to_string(),
                source,
            })?;

        let auth = TokenProvider::new(key, http.clone())?;

        info!(
            "Sheets client ready for spreadsheet {} / worksheet '{}'",
            config.spreadsheet_id, config.worksheet
        );

        Ok(Self {
            http,
            auth,
            spreadsheet_id: config.spreadsheet_id.clone(),
            worksheet: config.worksheet.clone(),
        })
    }

    /// Resolve credentials and build a client, keeping any failure for
    /// later reporting.
    pub fn connect(config: &SheetConfig, inline_credentials: Option<&str>) -> Connection<Self> {
        match ServiceAccountKey::resolve(inline_credentials, config.credentials_file.as_deref())
            .and_then(|key| Self::new(config, key))
        {
            Ok(client) => Connection::ready(client),
            Err(e) => {
                warn!("Google Sheets client not initialized: {}", e);
                Connection::failed(e)
            }
        }
    }

    /// Worksheet name quoted for use in an A1 range.
    fn quoted_worksheet(&self) -> String {
        quote_sheet_name(&self.worksheet)
    }

    /// Build an endpoint URL below the spreadsheet resource.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SheetError> {
        let mut url = Url::parse(API_BASE).map_err(|e| SheetError::Malformed(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SheetError::Malformed(format!("cannot extend {}", API_BASE)))?
            .extend(segments);
        Ok(url)
    }

    /// Send an authorized request and decode the JSON response.
    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<T, SheetError> {
        let token = self.auth.access_token().await?;
        let url_str = url.to_string();
        debug!("{} {}", method, url_str);

        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|source| SheetError::Http {
            url: url_str.clone(),
            source,
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::Api { status, body });
        }

        response.json().await.map_err(|source| SheetError::Http {
            url: url_str,
            source,
        })
    }

    /// Numeric id of the configured worksheet, needed for row deletion.
    async fn sheet_id(&self) -> Result<i64, SheetError> {
        let mut url = self.endpoint(&[&self.spreadsheet_id])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties(sheetId,title)");

        let meta: SpreadsheetMeta = self.send(Method::GET, url, None).await?;
        find_sheet_id(&meta, &self.worksheet)
            .ok_or_else(|| SheetError::WorksheetNotFound(self.worksheet.clone()))
    }
}

impl DataSource for GoogleSheetsClient {
    async fn fetch_all(&self) -> Result<Table, SheetError> {
        let range = self.quoted_worksheet();
        let mut url = self.endpoint(&[&self.spreadsheet_id, "values", &range])?;
        url.query_pairs_mut().append_pair("majorDimension", "ROWS");

        let values: ValueRange = self.send(Method::GET, url, None).await?;
        debug!("Fetched {} rows (header included)", values.values.len());

        Ok(Table::from_values(values.values))
    }

    async fn update_row(&self, range: &str, values: Vec<String>) -> Result<(), SheetError> {
        let full_range = format!("{}!{}", self.quoted_worksheet(), range);
        let mut url = self.endpoint(&[&self.spreadsheet_id, "values", &full_range])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        let body = ValueUpdate {
            range: &full_range,
            major_dimension: "ROWS",
            values: [values],
        };
        let body = serde_json::to_value(&body).map_err(|e| SheetError::Malformed(e.to_string()))?;

        let _: Value = self.send(Method::PUT, url, Some(body)).await?;
        info!("Updated range {}", full_range);
        Ok(())
    }

    async fn delete_row(&self, sheet_row: usize) -> Result<(), SheetError> {
        if sheet_row == 0 {
            return Err(SheetError::Malformed("sheet rows are 1-based".to_string()));
        }

        let sheet_id = self.sheet_id().await?;
        let batch = format!("{}:batchUpdate", self.spreadsheet_id);
        let url = self.endpoint(&[&batch])?;

        let _: Value = self
            .send(Method::POST, url, Some(delete_row_request(sheet_id, sheet_row)))
            .await?;
        info!("Deleted sheet row {}", sheet_row);
        Ok(())
    }
}

/// Quote a worksheet title for A1 notation (`'It''s'`).
fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

fn find_sheet_id(meta: &SpreadsheetMeta, worksheet: &str) -> Option<i64> {
    meta.sheets
        .iter()
        .find(|s| s.properties.title == worksheet)
        .map(|s| s.properties.sheet_id)
}

/// `batchUpdate` body deleting one 1-based sheet row.
fn delete_row_request(sheet_id: i64, sheet_row: usize) -> Value {
    json!({
        "requests": [{
            "deleteDimension": {
                "range": {
                    "sheetId": sheet_id,
                    "dimension": "ROWS",
                    "startIndex": sheet_row - 1,
                    "endIndex": sheet_row,
                }
            }
        }]
    })
}
