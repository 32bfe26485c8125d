use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::engine::Report;

/// Where the analyzed text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    Text,
    Pdf,
}

impl InputSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputSource::Text => "text",
            InputSource::Pdf => "pdf",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(InputSource::Text),
            "pdf" => Some(InputSource::Pdf),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub id: Uuid,
    pub source: String,
    pub report: Json<Report>,
    pub created_at: DateTime<Utc>,
}

/// A persisted report as returned to API callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: Uuid,
    pub source: InputSource,
    pub report: Report,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for StoredReport {
    type Error = anyhow::Error;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let source = InputSource::parse(&row.source)
            .ok_or_else(|| anyhow::anyhow!("Unknown report source '{}'", row.source))?;
        Ok(StoredReport {
            id: row.id,
            source,
            report: row.report.0,
            created_at: row.created_at,
        })
    }
}
