use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::domain::entity_table::{EntityTable, TableError};

const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("No service account credentials configured")]
    MissingCredentials,
    #[error("Failed to read credentials file: {0}")]
    CredentialsFile(#[from] std::io::Error),
    #[error("Invalid credentials file: {0}")]
    CredentialsFormat(#[from] serde_json::Error),
    #[error("Failed to sign token request: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("Sheets request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Not a spreadsheet url: {0}")]
    InvalidUrl(String),
    #[error("Spreadsheet has no worksheets")]
    NoWorksheet,
    #[error(transparent)]
    Table(#[from] TableError),
}

/// The spreadsheet the entities come from and the results go back to.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Reads the first worksheet, the first row being the header.
    async fn fetch_records(&self, sheet_url: &str) -> Result<EntityTable, SheetError>;

    /// Appends one row after the last row of the first worksheet.
    async fn append_row(&self, sheet_url: &str, row: &[String]) -> Result<(), SheetError>;
}

#[derive(Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    token_uri: String,
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Worksheet>,
}

#[derive(Deserialize)]
struct Worksheet {
    properties: WorksheetProperties,
}

#[derive(Deserialize)]
struct WorksheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

pub struct GoogleSheetsClient {
    client: Client,
    credentials_path: Option<String>,
    base_url: String,
}

impl GoogleSheetsClient {
    pub fn new(credentials_path: Option<String>, base_url: String) -> Self {
        GoogleSheetsClient {
            client: Client::new(),
            credentials_path,
            base_url,
        }
    }

    /// Exchanges a signed service account assertion for an access token.
    /// Credentials are read on every call, nothing is cached.
    async fn access_token(&self) -> Result<String, SheetError> {
        let path = self
            .credentials_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or(SheetError::MissingCredentials)?;
        let key: ServiceAccountKey = serde_json::from_str(&tokio::fs::read_to_string(path).await?)?;

        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: &key.client_email,
            scope: SPREADSHEETS_SCOPE,
            aud: &key.token_uri,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        let assertion = jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &EncodingKey::from_rsa_pem(key.private_key.as_bytes())?,
        )?;

        let token = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<TokenResponse>()
            .await?;

        Ok(token.access_token)
    }

    fn spreadsheet_url(&self, spreadsheet_id: &str, segments: &[&str]) -> Result<Url, SheetError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|_| SheetError::InvalidUrl(self.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| SheetError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    async fn first_worksheet_range(
        &self,
        token: &str,
        spreadsheet_id: &str,
    ) -> Result<String, SheetError> {
        let mut url = self.spreadsheet_url(spreadsheet_id, &[])?;
        url.query_pairs_mut().append_pair("fields", "sheets.properties.title");

        let spreadsheet = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?
            .json::<Spreadsheet>()
            .await?;

        let worksheet = spreadsheet
            .sheets
            .into_iter()
            .next()
            .ok_or(SheetError::NoWorksheet)?;

        Ok(worksheet_range(&worksheet.properties.title))
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsClient {
    async fn fetch_records(&self, sheet_url: &str) -> Result<EntityTable, SheetError> {
        let spreadsheet_id = spreadsheet_id_from_url(sheet_url)?;
        let token = self.access_token().await?;
        let range = self.first_worksheet_range(&token, &spreadsheet_id).await?;

        let url = self.spreadsheet_url(&spreadsheet_id, &["values", range.as_str()])?;
        let value_range = self
            .client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await?
            .error_for_status()?
            .json::<ValueRange>()
            .await?;

        log::info!(
            "Read {} rows from spreadsheet {}",
            value_range.values.len(),
            spreadsheet_id
        );

        let mut rows = value_range
            .values
            .into_iter()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());
        let columns = rows.next().unwrap_or_default();

        Ok(EntityTable::from_records(columns, rows.collect())?)
    }

    async fn append_row(&self, sheet_url: &str, row: &[String]) -> Result<(), SheetError> {
        let spreadsheet_id = spreadsheet_id_from_url(sheet_url)?;
        let token = self.access_token().await?;
        let range = self.first_worksheet_range(&token, &spreadsheet_id).await?;

        let append_range = format!("{}:append", range);
        let mut url = self.spreadsheet_url(&spreadsheet_id, &["values", append_range.as_str()])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        self.client
            .post(url)
            .bearer_auth(&token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?
            .error_for_status()?;

        log::info!("Appended a row to spreadsheet {}", spreadsheet_id);
        Ok(())
    }
}

/// `https://docs.google.com/spreadsheets/d/<id>/edit#gid=0` -> `<id>`
pub fn spreadsheet_id_from_url(sheet_url: &str) -> Result<String, SheetError> {
    let invalid = || SheetError::InvalidUrl(sheet_url.to_string());
    let url = Url::parse(sheet_url.trim()).map_err(|_| invalid())?;

    let segments: Vec<&str> = url.path_segments().ok_or_else(invalid)?.collect();
    segments
        .windows(2)
        .find(|pair| pair[0] == "d" && !pair[1].is_empty())
        .map(|pair| pair[1].to_string())
        .ok_or_else(invalid)
}

/// A1 range covering a whole worksheet.
fn worksheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
