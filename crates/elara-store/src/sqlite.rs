//! SQLite implementation of the Store trait.
//!
//! This is the primary storage backend for Elara's local mirror. It uses
//! rusqlite with bundled SQLite, wrapped in async via
//! `tokio::task::spawn_blocking`.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use elara_core::{
    Effect, Grant, GrantId, Perm, Principal, ProjectId, RequestId, ResourceId, ResourceNode,
};
use elara_pagos::{Estado, EstadoPago, PaymentRequest};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{Store, UpsertOutcome};

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use `spawn_blocking`
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation against the connection.
    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Background(e.to_string()))?
    }
}

// Raw row shapes: fetched as primitives inside the rusqlite closure and
// decoded into domain types afterwards, so parse failures surface as
// InvalidData instead of being swallowed.

type ResourceRow = (
    String,         // id
    String,         // project_id
    Option<String>, // parent_id
    String,         // key
    String,         // path
    Option<String>, // kind
    Option<String>, // meta JSON
);

type GrantRow = (
    String, // id
    String, // project_id
    String, // resource_id
    String, // principal_type
    String, // principal_id
    String, // perm
    String, // effect
);

type RequestRow = (
    String,         // id
    String,         // project_id
    Option<String>, // folio
    bool,           // vobo_desarrollador
    bool,           // vobo_finanzas
    f64,            // monto_pagado
    f64,            // total
    Option<String>, // estatus_pago
    Option<String>, // estado
);

fn resource_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ResourceRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn grant_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<GrantRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn request_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RequestRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ))
}

fn decode_resource(row: ResourceRow) -> Result<ResourceNode> {
    let (id, project_id, parent_id, key, path, kind, meta) = row;
    Ok(ResourceNode {
        id: ResourceId::new(id),
        project_id: ProjectId::new(project_id),
        parent_id: parent_id.map(ResourceId::new),
        key,
        path,
        kind,
        meta: meta.as_deref().map(serde_json::from_str).transpose()?,
    })
}

fn decode_grant(row: GrantRow) -> Result<Grant> {
    let (id, project_id, resource_id, principal_type, principal_id, perm, effect) = row;
    Ok(Grant {
        id: GrantId::new(id),
        project_id: ProjectId::new(project_id),
        resource_id: ResourceId::new(resource_id),
        principal: Principal::from_parts(&principal_type, &principal_id)?,
        perm: Perm::parse(&perm)?,
        effect: Effect::parse(&effect)?,
    })
}

fn decode_request(row: RequestRow) -> Result<PaymentRequest> {
    let (id, project_id, folio, vobo_d, vobo_f, monto_pagado, total, estatus_pago, estado) = row;
    Ok(PaymentRequest {
        id: RequestId::new(id),
        project_id: ProjectId::new(project_id),
        folio,
        vobo_desarrollador: vobo_d,
        vobo_finanzas: vobo_f,
        monto_pagado,
        total,
        estatus_pago: estatus_pago.as_deref().map(EstadoPago::parse).transpose()?,
        estado: estado.as_deref().map(Estado::parse).transpose()?,
    })
}

const RESOURCE_COLS: &str = "id, project_id, parent_id, key, path, kind, meta";
const GRANT_COLS: &str = "id, project_id, resource_id, principal_type, principal_id, perm, effect";
const REQUEST_COLS: &str = "id, project_id, folio, vobo_desarrollador, vobo_finanzas, \
                            monto_pagado, total, estatus_pago, estado";

#[async_trait]
impl Store for SqliteStore {
    async fn upsert_resource(&self, node: &ResourceNode) -> Result<UpsertOutcome> {
        let node = node.clone();
        self.blocking(move |conn| {
            // The (project, path) slot must be free or held by this id.
            let occupant: Option<String> = conn
                .query_row(
                    "SELECT id FROM resources WHERE project_id = ?1 AND path = ?2",
                    params![node.project_id.as_str(), node.path],
                    |row| row.get(0),
                )
                .optional()?;

            if let Some(occupant) = occupant {
                if occupant != node.id.as_str() {
                    return Err(StoreError::DuplicatePath(node.path.clone()));
                }
            }

            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM resources WHERE id = ?1)",
                params![node.id.as_str()],
                |row| row.get(0),
            )?;

            let meta_json = node
                .meta
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;

            conn.execute(
                "INSERT INTO resources (id, project_id, parent_id, key, path, kind, meta)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    project_id = excluded.project_id,
                    parent_id = excluded.parent_id,
                    key = excluded.key,
                    path = excluded.path,
                    kind = excluded.kind,
                    meta = excluded.meta",
                params![
                    node.id.as_str(),
                    node.project_id.as_str(),
                    node.parent_id.as_ref().map(|p| p.as_str()),
                    node.key,
                    node.path,
                    node.kind,
                    meta_json,
                ],
            )?;

            debug!(resource = %node.id, path = %node.path, "resource upserted");
            Ok(if exists {
                UpsertOutcome::Updated
            } else {
                UpsertOutcome::Created
            })
        })
        .await
    }

    async fn get_resource(&self, id: &ResourceId) -> Result<Option<ResourceNode>> {
        let id = id.clone();
        self.blocking(move |conn| {
            conn.query_row(
                &format!("SELECT {RESOURCE_COLS} FROM resources WHERE id = ?1"),
                params![id.as_str()],
                resource_row,
            )
            .optional()?
            .map(decode_resource)
            .transpose()
        })
        .await
    }

    async fn get_resource_by_path(
        &self,
        project_id: &ProjectId,
        path: &str,
    ) -> Result<Option<ResourceNode>> {
        let project_id = project_id.clone();
        let path = path.to_string();
        self.blocking(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {RESOURCE_COLS} FROM resources WHERE project_id = ?1 AND path = ?2"
                ),
                params![project_id.as_str(), path],
                resource_row,
            )
            .optional()?
            .map(decode_resource)
            .transpose()
        })
        .await
    }

    async fn list_resources(&self, project_id: &ProjectId) -> Result<Vec<ResourceNode>> {
        let project_id = project_id.clone();
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RESOURCE_COLS} FROM resources WHERE project_id = ?1 ORDER BY path"
            ))?;
            let rows = stmt
                .query_map(params![project_id.as_str()], resource_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.into_iter().map(decode_resource).collect()
        })
        .await
    }

    async fn delete_resource(&self, id: &ResourceId) -> Result<()> {
        let id = id.clone();
        self.blocking(move |conn| {
            conn.execute("DELETE FROM resources WHERE id = ?1", params![id.as_str()])?;
            Ok(())
        })
        .await
    }

    async fn upsert_grant(&self, grant: &Grant) -> Result<UpsertOutcome> {
        let grant = grant.clone();
        self.blocking(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM grants WHERE id = ?1)",
                params![grant.id.as_str()],
                |row| row.get(0),
            )?;

            conn.execute(
                "INSERT INTO grants (id, project_id, resource_id, principal_type,
                                     principal_id, perm, effect)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    project_id = excluded.project_id,
                    resource_id = excluded.resource_id,
                    principal_type = excluded.principal_type,
                    principal_id = excluded.principal_id,
                    perm = excluded.perm,
                    effect = excluded.effect",
                params![
                    grant.id.as_str(),
                    grant.project_id.as_str(),
                    grant.resource_id.as_str(),
                    grant.principal.kind_str(),
                    grant.principal.id_str(),
                    grant.perm.as_str(),
                    grant.effect.as_str(),
                ],
            )?;

            debug!(grant = %grant.id, resource = %grant.resource_id, "grant upserted");
            Ok(if exists {
                UpsertOutcome::Updated
            } else {
                UpsertOutcome::Created
            })
        })
        .await
    }

    async fn get_grant(&self, id: &GrantId) -> Result<Option<Grant>> {
        let id = id.clone();
        self.blocking(move |conn| {
            conn.query_row(
                &format!("SELECT {GRANT_COLS} FROM grants WHERE id = ?1"),
                params![id.as_str()],
                grant_row,
            )
            .optional()?
            .map(decode_grant)
            .transpose()
        })
        .await
    }

    async fn list_grants(&self, project_id: &ProjectId) -> Result<Vec<Grant>> {
        let project_id = project_id.clone();
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {GRANT_COLS} FROM grants WHERE project_id = ?1 ORDER BY id"
            ))?;
            let rows = stmt
                .query_map(params![project_id.as_str()], grant_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.into_iter().map(decode_grant).collect()
        })
        .await
    }

    async fn list_grants_for_resource(&self, resource_id: &ResourceId) -> Result<Vec<Grant>> {
        let resource_id = resource_id.clone();
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {GRANT_COLS} FROM grants WHERE resource_id = ?1 ORDER BY id"
            ))?;
            let rows = stmt
                .query_map(params![resource_id.as_str()], grant_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.into_iter().map(decode_grant).collect()
        })
        .await
    }

    async fn delete_grant(&self, id: &GrantId) -> Result<()> {
        let id = id.clone();
        self.blocking(move |conn| {
            conn.execute("DELETE FROM grants WHERE id = ?1", params![id.as_str()])?;
            Ok(())
        })
        .await
    }

    async fn upsert_request(&self, request: &PaymentRequest) -> Result<UpsertOutcome> {
        let request = request.clone();
        self.blocking(move |conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM payment_requests WHERE id = ?1)",
                params![request.id.as_str()],
                |row| row.get(0),
            )?;

            conn.execute(
                "INSERT INTO payment_requests (id, project_id, folio, vobo_desarrollador,
                                               vobo_finanzas, monto_pagado, total,
                                               estatus_pago, estado, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(id) DO UPDATE SET
                    project_id = excluded.project_id,
                    folio = excluded.folio,
                    vobo_desarrollador = excluded.vobo_desarrollador,
                    vobo_finanzas = excluded.vobo_finanzas,
                    monto_pagado = excluded.monto_pagado,
                    total = excluded.total,
                    estatus_pago = excluded.estatus_pago,
                    estado = excluded.estado,
                    updated_at = excluded.updated_at",
                params![
                    request.id.as_str(),
                    request.project_id.as_str(),
                    request.folio,
                    request.vobo_desarrollador,
                    request.vobo_finanzas,
                    request.monto_pagado,
                    request.total,
                    request.estatus_pago.map(|e| e.as_str()),
                    request.estado.map(|e| e.as_str()),
                    now_millis(),
                ],
            )?;

            debug!(request = %request.id, "payment request upserted");
            Ok(if exists {
                UpsertOutcome::Updated
            } else {
                UpsertOutcome::Created
            })
        })
        .await
    }

    async fn get_request(&self, id: &RequestId) -> Result<Option<PaymentRequest>> {
        let id = id.clone();
        self.blocking(move |conn| {
            conn.query_row(
                &format!("SELECT {REQUEST_COLS} FROM payment_requests WHERE id = ?1"),
                params![id.as_str()],
                request_row,
            )
            .optional()?
            .map(decode_request)
            .transpose()
        })
        .await
    }

    async fn list_requests(&self, project_id: &ProjectId) -> Result<Vec<PaymentRequest>> {
        let project_id = project_id.clone();
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {REQUEST_COLS} FROM payment_requests WHERE project_id = ?1 ORDER BY id"
            ))?;
            let rows = stmt
                .query_map(params![project_id.as_str()], request_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows.into_iter().map(decode_request).collect()
        })
        .await
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
