//! PostgreSQL implementation of CaseSnapshotReader.
//!
//! Assembles a snapshot from the request row plus its audit log, latest
//! opinion version, open clarifications, pending document requests and
//! reviews. Every value is read leniently; bad historical data degrades to
//! defaults instead of failing the read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{CaseId, LawyerId, Timestamp, UserId};
use crate::domain::lifecycle::{
    AuditEvent, CaseSnapshot, LawyerRef, OpinionVersion, Priority, PublicStatus, RawStatus,
    SlaPause, Visibility,
};
use crate::ports::{CaseSnapshotReader, SnapshotReadError};

const REQUEST_COLUMNS: &str = r#"
    r.id, r.request_number, r.title, r.status, r.visibility, r.public_status,
    r.priority, r.created_at, r.updated_at, r.sla_deadline, r.sla_paused_at,
    r.completed_at, r.assigned_lawyer_id, p.full_name AS lawyer_name
"#;

/// PostgreSQL implementation of CaseSnapshotReader.
#[derive(Clone)]
pub struct PostgresCaseSnapshotReader {
    pool: PgPool,
}

impl PostgresCaseSnapshotReader {
    /// Creates a new PostgresCaseSnapshotReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads the related rows that complete a snapshot.
    async fn hydrate(&self, mut snapshot: CaseSnapshot) -> Result<CaseSnapshot, SnapshotReadError> {
        let id = *snapshot.id.as_uuid();

        let audit_rows = sqlx::query(
            r#"
            SELECT action, details, created_at
            FROM audit_logs
            WHERE request_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        snapshot.audit_events = audit_rows
            .iter()
            .map(|row| {
                let created_at: DateTime<Utc> = row.get("created_at");
                let details: Option<JsonValue> = row.get("details");
                let mut event = AuditEvent::new(row.get::<String, _>("action"), created_at.into());
                event.details = details;
                event
            })
            .collect();

        let opinion_row = sqlx::query(
            r#"
            SELECT ov.is_draft, COALESCE(ov.submitted_at, ov.created_at) AS submitted_at
            FROM opinion_versions ov
            JOIN legal_opinions lo ON lo.id = ov.opinion_id
            WHERE lo.request_id = $1
            ORDER BY ov.version_number DESC
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = opinion_row {
            let is_draft: bool = row.get("is_draft");
            let submitted_at: Option<DateTime<Utc>> = row.get("submitted_at");
            let submitted_at = submitted_at.map(Timestamp::from_datetime);
            snapshot.latest_opinion_version = Some(OpinionVersion {
                is_draft,
                submitted_at: if is_draft { None } else { submitted_at },
            });
            if !is_draft {
                snapshot.opinion_submitted_at = submitted_at;
            }
        }

        let counts = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM clarifications
                  WHERE request_id = $1 AND NOT is_resolved) AS open_clarifications,
                (SELECT COUNT(*) FROM document_requests
                  WHERE request_id = $1 AND status = 'pending') AS pending_documents,
                EXISTS (SELECT 1 FROM lawyer_reviews WHERE request_id = $1) AS rated
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let open_clarifications: i64 = counts.get("open_clarifications");
        let pending_documents: i64 = counts.get("pending_documents");
        snapshot = snapshot
            .with_pending_clarifications(to_count(open_clarifications))
            .with_pending_document_requests(to_count(pending_documents))
            .rated(counts.get("rated"));

        Ok(snapshot)
    }
}

#[async_trait]
impl CaseSnapshotReader for PostgresCaseSnapshotReader {
    async fn get_snapshot(&self, id: &CaseId) -> Result<CaseSnapshot, SnapshotReadError> {
        let query = format!(
            r#"
            SELECT {}
            FROM legal_requests r
            LEFT JOIN profiles p ON p.id = r.assigned_lawyer_id
            WHERE r.id = $1
            "#,
            REQUEST_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(case_id = %id, "Failed to fetch case: {}", e);
                SnapshotReadError::from(e)
            })?
            .ok_or(SnapshotReadError::NotFound(*id))?;

        self.hydrate(row_to_snapshot(&row)).await
    }

    async fn list_for_client(
        &self,
        client_id: &UserId,
    ) -> Result<Vec<CaseSnapshot>, SnapshotReadError> {
        let client_uuid = Uuid::parse_str(client_id.as_str())
            .map_err(|e| SnapshotReadError::InvalidData(format!("client id: {}", e)))?;

        let query = format!(
            r#"
            SELECT {}
            FROM legal_requests r
            LEFT JOIN profiles p ON p.id = r.assigned_lawyer_id
            WHERE r.client_id = $1
            ORDER BY r.updated_at DESC
            "#,
            REQUEST_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(client_uuid)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(client_id = %client_id, "Failed to list cases: {}", e);
                SnapshotReadError::from(e)
            })?;

        let mut snapshots = Vec::with_capacity(rows.len());
        for row in &rows {
            snapshots.push(self.hydrate(row_to_snapshot(row)).await?);
        }
        Ok(snapshots)
    }
}

fn row_to_snapshot(row: &PgRow) -> CaseSnapshot {
    let id: Uuid = row.get("id");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: Option<DateTime<Utc>> = row.get("updated_at");
    let status: Option<String> = row.get("status");

    let mut snapshot = CaseSnapshot::new(
        CaseId::from_uuid(id),
        row.get::<Option<String>, _>("request_number").unwrap_or_default(),
        RawStatus::parse(status.as_deref().unwrap_or_default()),
        created_at.into(),
    );

    snapshot.title = row.get("title");
    snapshot.updated_at = updated_at.map(Timestamp::from_datetime).unwrap_or(snapshot.created_at);
    snapshot.visibility = row
        .get::<Option<String>, _>("visibility")
        .map(Visibility::from)
        .unwrap_or_default();
    snapshot.public_status = row
        .get::<Option<String>, _>("public_status")
        .map(PublicStatus::from);
    snapshot.priority = row
        .get::<Option<String>, _>("priority")
        .map(Priority::from)
        .unwrap_or_default();
    snapshot.sla_deadline = opt_timestamp(row, "sla_deadline");
    snapshot.completed_at = opt_timestamp(row, "completed_at");

    if let Some(paused_at) = opt_timestamp(row, "sla_paused_at") {
        snapshot.sla_pause = Some(SlaPause {
            paused_at: Some(paused_at),
            accumulated_secs: 0,
        });
    }

    let lawyer_id: Option<Uuid> = row.get("assigned_lawyer_id");
    snapshot.lawyer = lawyer_id.map(|lid| LawyerRef {
        id: LawyerId::from_uuid(lid),
        name: row
            .get::<Option<String>, _>("lawyer_name")
            .unwrap_or_default(),
    });

    snapshot
}

fn opt_timestamp(row: &PgRow, column: &str) -> Option<Timestamp> {
    row.get::<Option<DateTime<Utc>>, _>(column)
        .map(Timestamp::from_datetime)
}

fn to_count(n: i64) -> u32 {
    u32::try_from(n.max(0)).unwrap_or(u32::MAX)
}
