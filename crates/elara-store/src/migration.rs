//! Database schema migrations for SQLite.
//!
//! We use a simple versioned migration system. Each migration is a SQL
//! string that transforms the schema from version N to N+1.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: Initial schema.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Resource forest: the permissioned surface of each project
        CREATE TABLE resources (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            parent_id TEXT,                   -- weak back-reference, nullable for roots
            key TEXT NOT NULL,                -- short segment name
            path TEXT NOT NULL,               -- unique human-readable key within the project
            kind TEXT,
            meta TEXT,                        -- JSON blob from the backend row

            UNIQUE(project_id, path)
        );

        -- Permission grants attached to resources
        CREATE TABLE grants (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            resource_id TEXT NOT NULL,
            principal_type TEXT NOT NULL,     -- user | empresa | tipo | nivel
            principal_id TEXT NOT NULL,
            perm TEXT NOT NULL,               -- view | edit | admin
            effect TEXT NOT NULL DEFAULT 'allow'
        );

        -- Payment requests (solicitudes de pago)
        CREATE TABLE payment_requests (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            folio TEXT,
            vobo_desarrollador INTEGER NOT NULL DEFAULT 0,
            vobo_finanzas INTEGER NOT NULL DEFAULT 0,
            monto_pagado REAL NOT NULL DEFAULT 0,
            total REAL NOT NULL,
            estatus_pago TEXT,                -- cached payment sub-status
            estado TEXT,                      -- cached discrete state
            updated_at INTEGER NOT NULL
        );

        -- Indexes for common queries
        CREATE INDEX idx_resources_project ON resources(project_id);
        CREATE INDEX idx_grants_project ON grants(project_id);
        CREATE INDEX idx_grants_resource ON grants(resource_id);
        CREATE INDEX idx_requests_project ON payment_requests(project_id);
        "#,
    )?;

    Ok(())
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
