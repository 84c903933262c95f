// Google Sheets v4 REST backend (values.get / values.update).

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::TransportError;
use crate::query::Grid;

use super::{CellRef, SpreadsheetClient};

pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Client for one spreadsheet, authenticated with a bearer token the caller
/// obtained elsewhere.
#[derive(Debug, Clone)]
pub struct GoogleSheetsClient {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl GoogleSheetsClient {
    pub fn new(
        spreadsheet_id: &str,
        access_token: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            access_token: access_token.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    fn values_url(&self, range: &str) -> Result<Url, TransportError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| TransportError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| TransportError::Url(self.base_url.clone()))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .push("values")
            .push(range);
        Ok(url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Quote a worksheet name for A1 ranges: `My Sheet` -> `'My Sheet'`.
pub fn quote_sheet(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl SpreadsheetClient for GoogleSheetsClient {
    async fn fetch_grid(&self, table: &str) -> Result<Grid, TransportError> {
        let url = self.values_url(&quote_sheet(table))?;
        tracing::debug!(table, "fetching worksheet");

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let range: ValueRange = Self::check(response).await?.json().await?;

        let rows = range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        Ok(Grid::new(rows))
    }

    async fn write_cell(
        &self,
        table: &str,
        cell: CellRef,
        value: &str,
    ) -> Result<(), TransportError> {
        let range = format!("{}!{}", quote_sheet(table), cell);
        let mut url = self.values_url(&range)?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");
        tracing::debug!(table, %cell, "writing cell");

        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [[value]],
        });
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleSheetsClient {
        GoogleSheetsClient::new("sheet123", "token", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_quote_sheet() {
        assert_eq!(quote_sheet("Standings"), "'Standings'");
        assert_eq!(quote_sheet("Bob's Stats"), "'Bob''s Stats'");
    }

    #[test]
    fn test_values_url_encodes_range() {
        let url = client().values_url("'Top Scorers'!B7").unwrap();
        assert!(url
            .as_str()
            .starts_with("https://sheets.googleapis.com/v4/spreadsheets/sheet123/values/"));
        assert!(url.as_str().contains("Top%20Scorers"));
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn test_custom_base_url() {
        let url = client()
            .with_base_url("http://localhost:8080/v4/spreadsheets/")
            .values_url("'Players'")
            .unwrap();
        assert!(url
            .as_str()
            .starts_with("http://localhost:8080/v4/spreadsheets/sheet123/values/"));
    }

    #[test]
    fn test_value_range_without_values() {
        let range: ValueRange =
            serde_json::from_str(r#"{"range": "Sheet1!A1:Z1000", "majorDimension": "ROWS"}"#)
                .unwrap();
        assert!(range.values.is_empty());
    }

    #[test]
    fn test_cell_text_stringifies_numbers() {
        assert_eq!(cell_text(json!("Lions")), "Lions");
        assert_eq!(cell_text(json!(7)), "7");
        assert_eq!(cell_text(Value::Null), "");
    }
}
