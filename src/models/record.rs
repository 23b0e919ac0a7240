//! Contact and lead record types
//!
//! Records arrive as flat JSON objects from the spreadsheet API. Every cell
//! is optional and may come back as a string, a number or null, so each field
//! is decoded leniently into `Option<String>`.

use serde::{Deserialize, Deserializer, Serialize};

/// Which spreadsheet resource a record came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    #[default]
    Contact,
    Lead,
}

/// A single contact or lead row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    /// Registration date (ISO-8601)
    #[serde(deserialize_with = "lenient_string")]
    pub dataregisto: Option<String>,
    /// Lead contact date (ISO-8601), leads only
    #[serde(deserialize_with = "lenient_string")]
    pub datacontactolead: Option<String>,
    /// Contact origin
    #[serde(deserialize_with = "lenient_string")]
    pub origemcontacto: Option<String>,
    /// County
    #[serde(deserialize_with = "lenient_string")]
    pub concelho: Option<String>,
    /// Requested service
    #[serde(deserialize_with = "lenient_string")]
    pub servico: Option<String>,
    /// Lead pipeline state
    #[serde(deserialize_with = "lenient_string")]
    pub estadodalead: Option<String>,
    /// Lead conversion status
    #[serde(deserialize_with = "lenient_string")]
    pub conversao: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub arquivado: Option<String>,
    /// Assigned by the source, never read from the payload
    #[serde(skip_deserializing)]
    pub kind: RecordKind,
}

impl Record {
    /// Create an empty record of the given kind
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Tag the record with the resource it was fetched from
    pub fn with_kind(mut self, kind: RecordKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_lead(&self) -> bool {
        self.kind == RecordKind::Lead
    }
}

/// Which date field drives interval membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Registration date only
    Registration,
    /// Lead contact date, falling back to the registration date
    LeadContact,
}

impl TimestampPolicy {
    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Contact => TimestampPolicy::Registration,
            RecordKind::Lead => TimestampPolicy::LeadContact,
        }
    }

    /// Raw timestamp string selected for a record, if any
    pub fn select<'a>(&self, record: &'a Record) -> Option<&'a str> {
        let registration = non_blank(record.dataregisto.as_deref());
        match self {
            TimestampPolicy::Registration => registration,
            TimestampPolicy::LeadContact => {
                non_blank(record.datacontactolead.as_deref()).or(registration)
            }
        }
    }
}

/// Categorical attribute used for breakdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    Origin,
    County,
    Service,
    LeadStatus,
    Conversion,
    Status,
}

impl CategoryField {
    pub fn value<'a>(&self, record: &'a Record) -> Option<&'a str> {
        let raw = match self {
            CategoryField::Origin => record.origemcontacto.as_deref(),
            CategoryField::County => record.concelho.as_deref(),
            CategoryField::Service => record.servico.as_deref(),
            CategoryField::LeadStatus => record.estadodalead.as_deref(),
            CategoryField::Conversion => record.conversao.as_deref(),
            CategoryField::Status => record.status.as_deref(),
        };
        non_blank(raw)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CategoryField::Origin => "origin",
            CategoryField::County => "county",
            CategoryField::Service => "service",
            CategoryField::LeadStatus => "lead_status",
            CategoryField::Conversion => "conversion",
            CategoryField::Status => "status",
        }
    }
}

impl From<&str> for CategoryField {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "county" | "concelho" => CategoryField::County,
            "service" | "servico" => CategoryField::Service,
            "lead_status" | "estadodalead" => CategoryField::LeadStatus,
            "conversion" | "conversao" => CategoryField::Conversion,
            "status" => CategoryField::Status,
            _ => CategoryField::Origin,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accept strings, numbers and booleans; map null to `None`
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
