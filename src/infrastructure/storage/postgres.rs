//! PostgreSQL audit store with connection pooling

use async_trait::async_trait;
use serde_json::json;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use crate::domain::{
    AuditRepository, AutomationOutcome, AutomationRequest, DomainError, StoredStats,
    WorkflowRecord, WorkflowStatus,
};

/// PostgreSQL audit store configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/flowsynth".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// PostgreSQL implementation of AuditRepository.
///
/// `record_success` writes the workflow record and its outcome in one
/// transaction so a record never exists without its outcome.
#[derive(Debug, Clone)]
pub struct PostgresAuditStore {
    pool: PgPool,
}

impl PostgresAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to PostgreSQL and ensure the audit tables exist
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(std::time::Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        let store = Self::new(pool);
        store.ensure_tables().await?;
        Ok(store)
    }

    async fn ensure_tables(&self) -> Result<(), DomainError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS automation_requests (
                id UUID PRIMARY KEY,
                owner_id TEXT NOT NULL,
                text TEXT NOT NULL,
                model TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS workflow_records (
                id UUID PRIMARY KEY,
                platform_id TEXT NOT NULL,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                request_id UUID NOT NULL REFERENCES automation_requests(id),
                graph JSONB NOT NULL,
                status TEXT NOT NULL,
                execution_count BIGINT NOT NULL DEFAULT 0,
                deleted BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL,
                UNIQUE (owner_id, platform_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS automation_outcomes (
                id UUID PRIMARY KEY,
                request_id UUID NOT NULL REFERENCES automation_requests(id),
                workflow_record_id UUID REFERENCES workflow_records(id),
                success BOOLEAN NOT NULL,
                error TEXT,
                duration_ms BIGINT NOT NULL,
                requirement JSONB,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE INDEX IF NOT EXISTS idx_workflow_records_owner
                ON workflow_records (owner_id) WHERE NOT deleted
            "#,
            r#"
            CREATE INDEX IF NOT EXISTS idx_automation_outcomes_request
                ON automation_outcomes (request_id, created_at)
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to ensure audit tables: {}", e))
                })?;
        }

        Ok(())
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditStore {
    async fn create_request(&self, request: &AutomationRequest) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO automation_requests (id, owner_id, text, model, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(request.id())
        .bind(request.owner_id())
        .bind(request.text())
        .bind(request.model())
        .bind(request.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create request: {}", e)))?;

        Ok(())
    }

    async fn record_success(
        &self,
        record: &WorkflowRecord,
        outcome: &AutomationOutcome,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO workflow_records
                (id, platform_id, owner_id, name, description, request_id,
                 graph, status, execution_count, deleted, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id())
        .bind(record.platform_id())
        .bind(record.owner_id())
        .bind(record.name())
        .bind(record.description())
        .bind(record.request_id())
        .bind(record.graph())
        .bind(record.status().as_str())
        .bind(record.execution_count())
        .bind(record.is_deleted())
        .bind(record.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to insert workflow record: {}", e)))?;

        insert_outcome(&mut tx, outcome).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit success: {}", e)))?;

        Ok(())
    }

    async fn record_failure(&self, outcome: &AutomationOutcome) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        insert_outcome(&mut tx, outcome).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit failure: {}", e)))?;

        Ok(())
    }

    async fn list_workflows(&self, owner_id: &str) -> Result<Vec<WorkflowRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, platform_id, owner_id, name, description, request_id,
                   graph, status, execution_count, deleted, created_at
            FROM workflow_records
            WHERE owner_id = $1 AND NOT deleted
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list workflows: {}", e)))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(row_to_record(&row)?);
        }

        Ok(records)
    }

    async fn get_workflow(&self, id: Uuid) -> Result<Option<WorkflowRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, platform_id, owner_id, name, description, request_id,
                   graph, status, execution_count, deleted, created_at
            FROM workflow_records
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get workflow: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn set_status(&self, id: Uuid, status: WorkflowStatus) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE workflow_records SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to set status: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Workflow record '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE workflow_records SET deleted = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to soft-delete workflow: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Workflow record '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn set_execution_count(&self, platform_id: &str, count: i64) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE workflow_records SET execution_count = $2
            WHERE platform_id = $1 AND NOT deleted
            "#,
        )
        .bind(platform_id)
        .bind(count)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to set execution count: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "No live workflow record for platform id '{}'",
                platform_id
            )));
        }

        Ok(())
    }

    async fn outcomes_for_request(
        &self,
        request_id: Uuid,
    ) -> Result<Vec<AutomationOutcome>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, request_id, workflow_record_id, success, error,
                   duration_ms, requirement, created_at
            FROM automation_outcomes
            WHERE request_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list outcomes: {}", e)))?;

        let mut outcomes = Vec::with_capacity(rows.len());
        for row in rows {
            outcomes.push(row_to_outcome(&row)?);
        }

        Ok(outcomes)
    }

    async fn stats(&self) -> Result<StoredStats, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'active') AS active,
                   COALESCE(SUM(GREATEST(execution_count, 0)), 0) AS executions
            FROM workflow_records
            WHERE NOT deleted
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to compute stats: {}", e)))?;

        let total: i64 = row.get("total");
        let active: i64 = row.get("active");
        let executions: i64 = row.get("executions");

        Ok(StoredStats {
            total_workflows: total as u64,
            active_workflows: active as u64,
            total_executions: executions as u64,
        })
    }
}

async fn insert_outcome(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    outcome: &AutomationOutcome,
) -> Result<(), DomainError> {
    let requirement = match outcome.requirement() {
        Some(requirement) => Some(serde_json::to_value(requirement).map_err(|e| {
            DomainError::storage(format!("Failed to serialize requirement: {}", e))
        })?),
        None => None,
    };

    sqlx::query(
        r#"
        INSERT INTO automation_outcomes
            (id, request_id, workflow_record_id, success, error,
             duration_ms, requirement, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(outcome.id())
    .bind(outcome.request_id())
    .bind(outcome.workflow_record_id())
    .bind(outcome.is_success())
    .bind(outcome.error())
    .bind(outcome.duration_ms() as i64)
    .bind(requirement)
    .bind(outcome.created_at())
    .execute(&mut **tx)
    .await
    .map_err(|e| DomainError::storage(format!("Failed to insert outcome: {}", e)))?;

    Ok(())
}

fn row_to_record(row: &PgRow) -> Result<WorkflowRecord, DomainError> {
    let status_str: String = row.get("status");
    let status = WorkflowStatus::parse(&status_str).ok_or_else(|| {
        DomainError::storage(format!("Invalid workflow status in database: {}", status_str))
    })?;

    Ok(WorkflowRecord::from_parts(
        row.get("id"),
        row.get("platform_id"),
        row.get("owner_id"),
        row.get("name"),
        row.get("description"),
        row.get("request_id"),
        row.get("graph"),
        status,
        row.get("execution_count"),
        row.get("deleted"),
        row.get("created_at"),
    ))
}

fn row_to_outcome(row: &PgRow) -> Result<AutomationOutcome, DomainError> {
    let id: Uuid = row.get("id");
    let request_id: Uuid = row.get("request_id");
    let workflow_record_id: Option<Uuid> = row.get("workflow_record_id");
    let success: bool = row.get("success");
    let error: Option<String> = row.get("error");
    let duration_ms: i64 = row.get("duration_ms");
    let requirement: Option<serde_json::Value> = row.get("requirement");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");

    // Outcomes have no public reconstruction constructor; rebuild via the
    // serde representation the same way they were stored.
    let value = json!({
        "id": id,
        "request_id": request_id,
        "workflow_record_id": workflow_record_id,
        "success": success,
        "error": error,
        "duration_ms": duration_ms.max(0),
        "requirement": requirement,
        "created_at": created_at,
    });

    serde_json::from_value(value)
        .map_err(|e| DomainError::storage(format!("Failed to deserialize outcome: {}", e)))
}
