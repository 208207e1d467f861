//! Schema migrations and the check that follows them.
//!
//! After the embedded migrations run, the live schema is compared against
//! the columns the repositories bind and the `job_status` labels the worker
//! writes. Anything missing is a database error.

use std::collections::HashSet;

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::{debug, info};

use userbase_core::error::{AppError, ErrorKind};
use userbase_entity::job::JobStatus;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Columns each repository reads or writes.
pub const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "users",
        &[
            "id",
            "name",
            "email",
            "password",
            "created_at",
            "updated_at",
            "is_active",
            "is_super_user",
            "verified",
            "verification_code",
            "password_reset_token",
            "password_reset_at",
        ],
    ),
    (
        "items",
        &["id", "title", "description", "owner_id", "created_at", "updated_at"],
    ),
    (
        "jobs",
        &[
            "id",
            "job_type",
            "queue",
            "payload",
            "error_message",
            "status",
            "attempts",
            "max_attempts",
            "scheduled_at",
            "started_at",
            "completed_at",
            "worker_id",
            "created_at",
            "updated_at",
        ],
    ),
];

/// Run all pending migrations, then check the resulting schema.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(
        known = MIGRATOR.iter().count(),
        "Running database migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    verify_schema(pool).await?;
    info!("Database schema is up to date");
    Ok(())
}

/// Compare the live schema with [`REQUIRED_COLUMNS`] and [`JobStatus::ALL`].
pub async fn verify_schema(pool: &PgPool) -> Result<(), AppError> {
    let tables: Vec<&str> = REQUIRED_COLUMNS.iter().map(|(table, _)| *table).collect();

    let present: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name::text, column_name::text FROM information_schema.columns \
         WHERE table_schema = current_schema() AND table_name = ANY($1)",
    )
    .bind(tables.as_slice())
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read schema", e))?;

    let labels: Vec<String> = sqlx::query_scalar(
        "SELECT e.enumlabel::text FROM pg_enum e \
         JOIN pg_type t ON t.oid = e.enumtypid WHERE t.typname = 'job_status'",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read job_status", e))?;

    let mut missing = missing_columns(&present);
    missing.extend(
        missing_job_statuses(&labels)
            .into_iter()
            .map(|label| format!("job_status '{label}'")),
    );

    if !missing.is_empty() {
        return Err(AppError::new(
            ErrorKind::Database,
            format!("Schema check failed, missing: {}", missing.join(", ")),
        ));
    }

    debug!(columns = present.len(), "Schema check passed");
    Ok(())
}

/// `table.column` for every required column absent from `present`.
pub fn missing_columns(present: &[(String, String)]) -> Vec<String> {
    let present: HashSet<(&str, &str)> = present
        .iter()
        .map(|(table, column)| (table.as_str(), column.as_str()))
        .collect();

    REQUIRED_COLUMNS
        .iter()
        .flat_map(|(table, columns)| columns.iter().map(move |column| (*table, *column)))
        .filter(|pair| !present.contains(pair))
        .map(|(table, column)| format!("{table}.{column}"))
        .collect()
}

/// Statuses the worker can write that the `job_status` enum lacks.
pub fn missing_job_statuses(labels: &[String]) -> Vec<&'static str> {
    JobStatus::ALL
        .iter()
        .map(JobStatus::as_str)
        .filter(|status| !labels.iter().any(|label| label == status))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_schema() -> Vec<(String, String)> {
        REQUIRED_COLUMNS
            .iter()
            .flat_map(|(table, columns)| {
                columns
                    .iter()
                    .map(move |column| (table.to_string(), column.to_string()))
            })
            .collect()
    }

    #[test]
    fn test_complete_schema_has_nothing_missing() {
        let mut present = full_schema();
        present.push(("users".to_string(), "legacy_flag".to_string()));
        assert!(missing_columns(&present).is_empty());
    }

    #[test]
    fn test_dropped_columns_are_reported() {
        let present: Vec<_> = full_schema()
            .into_iter()
            .filter(|(table, column)| {
                !(table == "users" && column == "password_reset_at")
                    && !(table == "jobs" && column == "worker_id")
            })
            .collect();

        assert_eq!(
            missing_columns(&present),
            vec!["users.password_reset_at", "jobs.worker_id"]
        );
    }

    #[test]
    fn test_missing_table_reports_every_column() {
        let present: Vec<_> = full_schema()
            .into_iter()
            .filter(|(table, _)| table != "items")
            .collect();

        let missing = missing_columns(&present);
        assert_eq!(missing.len(), 6);
        assert!(missing.iter().all(|c| c.starts_with("items.")));
    }

    #[test]
    fn test_job_status_labels() {
        let all: Vec<String> = ["pending", "running", "completed", "failed"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(missing_job_statuses(&all).is_empty());

        assert_eq!(missing_job_statuses(&all[..2]), vec!["completed", "failed"]);
    }
}
