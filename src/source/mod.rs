//! Spreadsheet API source
//!
//! Fetches the contacts and leads sheets as JSON arrays and decodes them into
//! `Record`s tagged with their kind. Everything downstream works on the
//! resulting plain vectors.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::models::{Record, RecordKind};

const USER_AGENT: &str = concat!("leadpulse/", env!("CARGO_PKG_VERSION"));

/// Errors raised while fetching records
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid record payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Contacts and leads fetched together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub contacts: Vec<Record>,
    pub leads: Vec<Record>,
}

impl RecordSet {
    pub fn new(contacts: Vec<Record>, leads: Vec<Record>) -> Self {
        Self { contacts, leads }
    }

    pub fn records(&self, kind: RecordKind) -> &[Record] {
        match kind {
            RecordKind::Contact => &self.contacts,
            RecordKind::Lead => &self.leads,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty() && self.leads.is_empty()
    }
}

/// Decode a JSON array of rows, tagging each with `kind`
pub fn decode_records(body: &str, kind: RecordKind) -> Result<Vec<Record>, SourceError> {
    let rows: Vec<Record> = serde_json::from_str(body)?;
    Ok(rows.into_iter().map(|row| row.with_kind(kind)).collect())
}

/// Client for the contacts and leads sheets
pub struct SpreadsheetClient {
    client: Client,
    contacts_url: String,
    leads_url: String,
}

impl SpreadsheetClient {
    pub fn new(
        contacts_url: impl Into<String>,
        leads_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            contacts_url: contacts_url.into(),
            leads_url: leads_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Self::new(
            config.contacts_url.clone(),
            config.leads_url.clone(),
            Duration::from_secs(config.request_timeout_secs.max(1)),
        )
    }

    pub async fn fetch_contacts(&self) -> Result<Vec<Record>, SourceError> {
        self.fetch(&self.contacts_url, RecordKind::Contact).await
    }

    pub async fn fetch_leads(&self) -> Result<Vec<Record>, SourceError> {
        self.fetch(&self.leads_url, RecordKind::Lead).await
    }

    /// Fetch both sheets concurrently; fails if either request fails
    pub async fn fetch_all(&self) -> Result<RecordSet, SourceError> {
        let (contacts, leads) = futures::try_join!(self.fetch_contacts(), self.fetch_leads())?;
        info!(
            "Fetched {} contacts and {} leads",
            contacts.len(),
            leads.len()
        );
        Ok(RecordSet::new(contacts, leads))
    }

    async fn fetch(&self, url: &str, kind: RecordKind) -> Result<Vec<Record>, SourceError> {
        debug!("Fetching {:?} records from {}", kind, url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        decode_records(&body, kind)
    }
}
