//! Database schema.
//!
//! Every statement is idempotent, so [`apply_schema`] can run at each server
//! start and from `boreal migrate`. Child tables reference `datasets` with
//! `ON DELETE CASCADE`; `date_infos.dataset_id` is unique, giving each dataset
//! at most one date row.

use boreal_core::error::AppError;
use sqlx::PgPool;

/// Schema statements, in dependency order.
/// Each statement must be executed separately due to sqlx limitations.
pub const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS datasets (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        seq BIGINT GENERATED ALWAYS AS IDENTITY,
        name VARCHAR(500) NOT NULL,
        identifier VARCHAR(255) NOT NULL DEFAULT 'UNKNOWN',
        url TEXT NOT NULL DEFAULT '',
        description TEXT,
        keywords TEXT,
        subjects TEXT,
        authors TEXT,
        imported_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_datasets_seq ON datasets(seq)",
    "CREATE INDEX IF NOT EXISTS idx_datasets_name ON datasets(name)",
    r#"CREATE TABLE IF NOT EXISTS contacts (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        dataset_id UUID NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
        position INTEGER NOT NULL DEFAULT 0,
        name VARCHAR(255) NOT NULL,
        affiliation VARCHAR(500)
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_contacts_dataset ON contacts(dataset_id)",
    r#"CREATE TABLE IF NOT EXISTS publications (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        dataset_id UUID NOT NULL REFERENCES datasets(id) ON DELETE CASCADE,
        position INTEGER NOT NULL DEFAULT 0,
        citation TEXT NOT NULL,
        url TEXT
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_publications_dataset ON publications(dataset_id)",
    r#"CREATE TABLE IF NOT EXISTS date_infos (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        dataset_id UUID NOT NULL UNIQUE REFERENCES datasets(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        published_at TIMESTAMPTZ NOT NULL
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_date_infos_published ON date_infos(published_at)",
    r#"CREATE TABLE IF NOT EXISTS harvest_configs (
        id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        source_url TEXT NOT NULL,
        frequency VARCHAR(100) NOT NULL,
        filters TEXT,
        active BOOLEAN NOT NULL DEFAULT TRUE
    )"#,
];

/// Applies [`SCHEMA`] to the database.
pub async fn apply_schema(pool: &PgPool) -> Result<(), AppError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(AppError::DatabaseError)?;
    }
    tracing::info!(statements = SCHEMA.len(), "Database schema applied");
    Ok(())
}
