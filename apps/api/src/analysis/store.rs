//! Report persistence. Reports are written once, after they are fully assembled,
//! and never updated.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::analysis::engine::Report;
use crate::errors::AppError;
use crate::models::report::{InputSource, ReportRow, StoredReport};

/// Carried in `AppState` as `Arc<dyn ReportStore>`.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn save(&self, source: InputSource, report: &Report) -> Result<StoredReport, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<StoredReport>, AppError>;
}

pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn save(&self, source: InputSource, report: &Report) -> Result<StoredReport, AppError> {
        let row: ReportRow = sqlx::query_as(
            r#"
            INSERT INTO reports (id, source, report)
            VALUES ($1, $2, $3)
            RETURNING id, source, report, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(source.as_str())
        .bind(Json(report))
        .fetch_one(&self.pool)
        .await?;

        StoredReport::try_from(row).map_err(AppError::Internal)
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredReport>, AppError> {
        let row: Option<ReportRow> = sqlx::query_as(
            "SELECT id, source, report, created_at FROM reports WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(StoredReport::try_from)
            .transpose()
            .map_err(AppError::Internal)
    }
}

/// Process-local store used when no database is configured.
#[derive(Default)]
pub struct MemoryReportStore {
    reports: RwLock<HashMap<Uuid, StoredReport>>,
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn save(&self, source: InputSource, report: &Report) -> Result<StoredReport, AppError> {
        let stored = StoredReport {
            id: Uuid::new_v4(),
            source,
            report: report.clone(),
            created_at: Utc::now(),
        };
        self.reports.write().await.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoredReport>, AppError> {
        Ok(self.reports.read().await.get(&id).cloned())
    }
}
