//! Audit trail for registry mutations.
//!
//! Records who did what to which record. Recording is best-effort: a failed
//! audit write must never fail the request that triggered it, so `record`
//! logs the failure and returns normally.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{instrument, warn};

/// A stored audit event.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditEvent {
    pub id: i64,
    pub action: String,
    pub user_id: Option<String>,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub detail: Option<String>,
    pub created_at: String,
}

/// Writes audit events for registry mutations.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    pool: SqlitePool,
}

impl AuditRecorder {
    /// Create a new audit recorder.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an audit event. Failures are logged, not propagated.
    #[instrument(skip(self, detail))]
    pub async fn record(
        &self,
        action: &str,
        user_id: Option<&str>,
        entity_type: &str,
        entity_id: Option<&str>,
        detail: Option<&str>,
    ) {
        if let Err(e) = self
            .insert(action, user_id, entity_type, entity_id, detail)
            .await
        {
            warn!(action, entity_type, "Failed to record audit event: {e:#}");
        }
    }

    async fn insert(
        &self,
        action: &str,
        user_id: Option<&str>,
        entity_type: &str,
        entity_id: Option<&str>,
        detail: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_events (action, user_id, entity_type, entity_id, detail)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(action)
        .bind(user_id)
        .bind(entity_type)
        .bind(entity_id)
        .bind(detail)
        .execute(&self.pool)
        .await
        .context("Failed to insert audit event")?;

        Ok(())
    }

    /// List recent audit events, newest first.
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: i64) -> Result<Vec<AuditEvent>> {
        let events = sqlx::query_as::<_, AuditEvent>(
            r#"
            SELECT id, action, user_id, entity_type, entity_id, detail, created_at
            FROM audit_events
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list audit events")?;

        Ok(events)
    }
}
