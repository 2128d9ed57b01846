//! Dual-backend survey response store
//!
//! Every accepted submission is written to the SQLite table and appended to
//! the CSV backstop. The two writes are deliberately independent: no
//! transaction spans them, a relational failure does not block the CSV
//! append, and a crash between the two can leave them divergent. The CSV
//! file is the record of truth for compliance, so a submission counts as
//! committed once at least one backend has it.

use chrono::Utc;
use csat_common::csv;
use csat_common::model::{NewSurveyResponse, SurveyResponse};
use csat_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use tracing::{info, warn};

mod sink;
pub use sink::CsvSink;

/// Read ordering for `list`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Insertion order (storage order; used for exports)
    Insertion,
    /// Most recent first (admin browsing)
    NewestFirst,
}

/// Outcome of a dual-write create
#[derive(Debug)]
pub struct CreateOutcome {
    pub response: SurveyResponse,
    pub db_committed: bool,
    pub csv_committed: bool,
}

/// Survey response store over SQLite plus the CSV sink
#[derive(Debug)]
pub struct Store {
    db: SqlitePool,
    csv: CsvSink,
}

impl Store {
    pub fn new(db: SqlitePool, csv: CsvSink) -> Self {
        Self { db, csv }
    }

    /// Whether the relational backend currently answers queries
    pub async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.db)
            .await
            .is_ok()
    }

    /// Create exactly one record from a validated submission
    ///
    /// The timestamp is stamped once, here, and used for both backends.
    /// The relational insert is attempted first; its failure is downgraded
    /// to a logged warning and the CSV append is attempted regardless.
    /// Only the case where both backends fail is an error. No deduplication:
    /// identical payloads always create distinct records.
    pub async fn create(&self, new: &NewSurveyResponse) -> Result<CreateOutcome> {
        let created_at = Utc::now();

        let db_result = self.insert(new, &created_at.to_rfc3339()).await;
        let id = match &db_result {
            Ok(id) => *id,
            Err(e) => {
                warn!("Relational insert failed, relying on CSV backstop: {}", e);
                0
            }
        };

        let response = SurveyResponse {
            id,
            name: new.name.clone(),
            company: new.company.clone(),
            overall_experience: new.overall_experience,
            service_quality: new.service_quality,
            timeliness: new.timeliness,
            communication: new.communication,
            professionalism: new.professionalism,
            issue_resolution: new.issue_resolution,
            ease_of_access: new.ease_of_access,
            value_added: new.value_added,
            efficiency: new.efficiency,
            suggestions: new.suggestions.clone(),
            created_at,
        };

        // Attempted even when the insert failed: the CSV file is the
        // durability backstop
        let csv_result = self.csv.append(&response).await;
        if let Err(e) = &csv_result {
            warn!("CSV append failed: {}", e);
        }

        match (db_result.is_ok(), csv_result.is_ok()) {
            (false, false) => Err(Error::Internal(
                "Submission lost: both storage backends failed".to_string(),
            )),
            (db_committed, csv_committed) => Ok(CreateOutcome {
                response,
                db_committed,
                csv_committed,
            }),
        }
    }

    async fn insert(
        &self,
        new: &NewSurveyResponse,
        created_at: &str,
    ) -> std::result::Result<i64, sqlx::Error> {
        let row = sqlx::query(
            "INSERT INTO survey_responses (
                name, company,
                overall_experience, service_quality, timeliness, communication,
                professionalism, issue_resolution, ease_of_access, value_added,
                efficiency, suggestions, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id",
        )
        .bind(&new.name)
        .bind(&new.company)
        .bind(new.overall_experience)
        .bind(new.service_quality)
        .bind(new.timeliness)
        .bind(new.communication)
        .bind(new.professionalism)
        .bind(new.issue_resolution)
        .bind(new.ease_of_access)
        .bind(new.value_added)
        .bind(new.efficiency)
        .bind(&new.suggestions)
        .bind(created_at)
        .fetch_one(&self.db)
        .await?;
        row.try_get(0)
    }

    /// Every response, in the requested order
    pub async fn list(&self, order: ListOrder) -> Result<Vec<SurveyResponse>> {
        let sql = match order {
            ListOrder::Insertion => {
                "SELECT * FROM survey_responses ORDER BY id ASC"
            }
            ListOrder::NewestFirst => {
                "SELECT * FROM survey_responses ORDER BY created_at DESC, id DESC"
            }
        };

        let rows = sqlx::query(sql).fetch_all(&self.db).await?;
        rows.iter().map(row_to_response).collect()
    }

    /// Irreversibly remove every response from both backends
    ///
    /// The table delete is a single statement, so it is all-or-nothing; the
    /// CSV snapshot is reset to a header-only file afterwards. Returns the
    /// number of table rows removed.
    pub async fn delete_all(&self) -> Result<u64> {
        let deleted = sqlx::query("DELETE FROM survey_responses")
            .execute(&self.db)
            .await?
            .rows_affected();

        self.csv.reset().await?;
        info!("Bulk delete removed {} response(s)", deleted);
        Ok(deleted)
    }

    /// Regenerate the full CSV document from the authoritative table
    ///
    /// Falls back to the last on-disk snapshot only when the table read
    /// fails.
    pub async fn export_csv(&self) -> Result<String> {
        match self.list(ListOrder::Insertion).await {
            Ok(responses) => Ok(csv::encode(&responses)),
            Err(e) => {
                warn!("Table read failed, serving on-disk CSV snapshot: {}", e);
                self.csv.read_raw().await
            }
        }
    }
}

/// Map a table row to the shared model
fn row_to_response(row: &sqlx::sqlite::SqliteRow) -> Result<SurveyResponse> {
    let created_at_raw: String = row.try_get("created_at")?;
    let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_raw)
        .map_err(|e| Error::Internal(format!("Bad created_at '{}': {}", created_at_raw, e)))?
        .with_timezone(&Utc);

    Ok(SurveyResponse {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        company: row.try_get("company")?,
        overall_experience: row.try_get("overall_experience")?,
        service_quality: row.try_get("service_quality")?,
        timeliness: row.try_get("timeliness")?,
        communication: row.try_get("communication")?,
        professionalism: row.try_get("professionalism")?,
        issue_resolution: row.try_get("issue_resolution")?,
        ease_of_access: row.try_get("ease_of_access")?,
        value_added: row.try_get("value_added")?,
        efficiency: row.try_get("efficiency")?,
        suggestions: row.try_get("suggestions")?,
        created_at,
    })
}
