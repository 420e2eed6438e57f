// Entity store - isolates all database side effects behind typed records.

pub mod cascade;
pub mod record;
pub mod relations;

pub use record::Record;

use rusqlite::types::{Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection};
use thiserror::Error;

use crate::db::models;
use crate::state::DbPool;
use crate::store::relations::RelationGraph;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-key clash; `constraint` is `table.column`.
    #[error("{message}")]
    Conflict { constraint: String, message: String },

    #[error("missing reference: {0}")]
    MissingReference(String),

    #[error("still referenced: {0}")]
    InUse(String),

    #[error("invalid username: {0}")]
    InvalidUsername(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("credential hashing failed: {0}")]
    Credential(#[from] bcrypt::BcryptError),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),
}

#[derive(Debug, Clone, Copy)]
enum WriteOp {
    Insert,
    Update,
    Delete,
}

fn map_write_err(op: WriteOp, err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(code, ref message) = err {
        let detail = message.as_deref().unwrap_or("constraint failed");
        match code.extended_code {
            rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                // SQLite reports "UNIQUE constraint failed: users.email"
                let constraint = detail.rsplit(": ").next().unwrap_or(detail).to_string();
                let message = format!("duplicate value for {}", constraint);
                return StoreError::Conflict { constraint, message };
            }
            rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return match op {
                    WriteOp::Delete => StoreError::InUse(detail.to_string()),
                    WriteOp::Insert | WriteOp::Update => {
                        StoreError::MissingReference(detail.to_string())
                    }
                };
            }
            _ => {}
        }
    }
    StoreError::Sql(err)
}

/// Root write + cascade run as one unit of work; the connection is released
/// on every exit path.
fn with_txn<R>(
    conn: &Connection,
    f: impl FnOnce() -> Result<R, StoreError>,
) -> Result<R, StoreError> {
    conn.execute("BEGIN IMMEDIATE", [])?;
    match f() {
        Ok(value) => {
            conn.execute("COMMIT", [])?;
            Ok(value)
        }
        Err(err) => {
            let _ = conn.execute("ROLLBACK", []);
            Err(err)
        }
    }
}

fn select_sql<T: Record>() -> String {
    let mut columns = vec!["id", "is_active", "created_at", "updated_at"];
    columns.extend_from_slice(T::COLUMNS);
    format!("SELECT {} FROM {}", columns.join(", "), T::TABLE)
}

/// Read filters shared by the listing facade and the admin surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListQuery {
    pub is_active: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Clone)]
pub struct EntityStore {
    pool: DbPool,
    graph: &'static RelationGraph,
}

impl EntityStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            graph: relations::graph(),
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn graph(&self) -> &'static RelationGraph {
        self.graph
    }

    /// Inserts a new row. Unique clashes map to `Conflict`, dangling foreign
    /// keys to `MissingReference`.
    pub fn create<T: Record>(&self, entity: &T) -> Result<(), StoreError> {
        let conn = self.pool.get()?;

        let mut columns = vec!["id", "is_active", "created_at", "updated_at"];
        columns.extend_from_slice(T::COLUMNS);
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            T::TABLE,
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut values: Vec<Value> = vec![
            entity.id().to_string().into(),
            entity.is_active().into(),
            entity.created_at().to_string().into(),
            entity.updated_at().to_string().into(),
        ];
        values.extend(entity.values());

        with_txn(&conn, || {
            conn.execute(&sql, params_from_iter(values.iter()))
                .map_err(|e| map_write_err(WriteOp::Insert, e))?;
            // A save counts as setting the flag, so new rows propagate too.
            cascade::propagate(&conn, self.graph, T::TABLE, entity.id(), entity.is_active())?;
            Ok(())
        })
    }

    /// Full-row update. Refreshes `updated_at`; when the stored active flag
    /// differs from the written one, the cascade engine propagates the new
    /// value to direct dependents inside the same transaction.
    pub fn update<T: Record>(&self, entity: &mut T) -> Result<(), StoreError> {
        let conn = self.pool.get()?;

        entity.touch(&models::now());

        let mut assignments = vec!["is_active = ?1".to_string(), "updated_at = ?2".to_string()];
        for (i, column) in T::COLUMNS.iter().enumerate() {
            assignments.push(format!("{} = ?{}", column, i + 3));
        }
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            T::TABLE,
            assignments.join(", "),
            T::COLUMNS.len() + 3
        );

        let mut values: Vec<Value> = vec![
            entity.is_active().into(),
            entity.updated_at().to_string().into(),
        ];
        values.extend(entity.values());
        values.push(entity.id().to_string().into());

        with_txn(&conn, || {
            let stored_active = match conn.query_row(
                &format!("SELECT is_active FROM {} WHERE id = ?1", T::TABLE),
                params![entity.id()],
                |row| row.get::<_, bool>(0),
            ) {
                Ok(active) => active,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Err(StoreError::NotFound(format!(
                        "{} {}",
                        T::TABLE,
                        entity.id()
                    )))
                }
                Err(e) => return Err(e.into()),
            };

            conn.execute(&sql, params_from_iter(values.iter()))
                .map_err(|e| map_write_err(WriteOp::Update, e))?;

            if stored_active != entity.is_active() {
                cascade::propagate(&conn, self.graph, T::TABLE, entity.id(), entity.is_active())?;
            }
            Ok(())
        })
    }

    pub fn get<T: Record>(&self, id: &str) -> Result<Option<T>, StoreError> {
        let conn = self.pool.get()?;
        let sql = format!("{} WHERE id = ?1", select_sql::<T>());
        match conn.query_row(&sql, params![id], |row| T::from_row(row)) {
            Ok(entity) => Ok(Some(entity)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn list<T: Record>(&self, query: &ListQuery) -> Result<Vec<T>, StoreError> {
        let conn = self.pool.get()?;
        let mut sql = select_sql::<T>();
        let mut values: Vec<Value> = Vec::new();
        if let Some(active) = query.is_active {
            sql.push_str(" WHERE is_active = ?");
            values.push(active.into());
        }
        sql.push_str(" ORDER BY created_at, id");
        if query.limit.is_some() || query.offset.is_some() {
            sql.push_str(" LIMIT ? OFFSET ?");
            values.push(query.limit.map(i64::from).unwrap_or(-1).into());
            values.push(i64::from(query.offset.unwrap_or(0)).into());
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| T::from_row(row))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Flips the active flag and always runs the cascade. Idempotent when
    /// the value is already set.
    pub fn set_active<T: Record>(&self, id: &str, active: bool) -> Result<(), StoreError> {
        self.set_active_in(T::TABLE, id, active)
    }

    /// Table-level variant used by the admin surface.
    pub fn set_active_in(&self, table: &str, id: &str, active: bool) -> Result<(), StoreError> {
        if !self.graph.is_known(table) {
            return Err(StoreError::NotFound(format!("no such entity {}", table)));
        }
        let conn = self.pool.get()?;
        with_txn(&conn, || {
            let written = conn
                .execute(
                    &format!(
                        "UPDATE {} SET is_active = ?1, updated_at = ?2 WHERE id = ?3",
                        table
                    ),
                    params![active, models::now(), id],
                )
                .map_err(|e| map_write_err(WriteOp::Update, e))?;
            if written == 0 {
                return Err(StoreError::NotFound(format!("{} {}", table, id)));
            }
            cascade::propagate(&conn, self.graph, table, id, active)?;
            Ok(())
        })
    }

    /// Operator-level hard delete with a restrict policy: rejected with
    /// `InUse` while any dependent exists. The administrative surface never
    /// calls this; deactivation is the exposed removal path.
    pub fn delete<T: Record>(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.pool.get()?;
        with_txn(&conn, || {
            let dependents = self.graph.related_of(&conn, T::TABLE, id)?;
            if !dependents.is_empty() {
                return Err(StoreError::InUse(format!(
                    "{} {} has {} dependent rows",
                    T::TABLE,
                    id,
                    dependents.len()
                )));
            }
            let removed = conn
                .execute(
                    &format!("DELETE FROM {} WHERE id = ?1", T::TABLE),
                    params![id],
                )
                .map_err(|e| map_write_err(WriteOp::Delete, e))?;
            if removed == 0 {
                return Err(StoreError::NotFound(format!("{} {}", T::TABLE, id)));
            }
            Ok(())
        })
    }

    /// Untyped listing for the admin surface. The table name is validated
    /// against the relation graph before any SQL is built from it.
    pub fn list_rows(
        &self,
        table: &str,
        query: &ListQuery,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        if !self.graph.is_known(table) {
            return Err(StoreError::NotFound(format!("no such entity {}", table)));
        }
        let conn = self.pool.get()?;
        let mut sql = format!("SELECT * FROM {}", table);
        let mut values: Vec<Value> = Vec::new();
        if let Some(active) = query.is_active {
            sql.push_str(" WHERE is_active = ?");
            values.push(active.into());
        }
        sql.push_str(" ORDER BY created_at, id");
        if query.limit.is_some() || query.offset.is_some() {
            sql.push_str(" LIMIT ? OFFSET ?");
            values.push(query.limit.map(i64::from).unwrap_or(-1).into());
            values.push(i64::from(query.offset.unwrap_or(0)).into());
        }

        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
            row_to_json(row, &columns)
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get_row(&self, table: &str, id: &str) -> Result<Option<serde_json::Value>, StoreError> {
        if !self.graph.is_known(table) {
            return Err(StoreError::NotFound(format!("no such entity {}", table)));
        }
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("SELECT * FROM {} WHERE id = ?1", table))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        match stmt.query_row(params![id], |row| row_to_json(row, &columns)) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn row_to_json(row: &rusqlite::Row<'_>, columns: &[String]) -> rusqlite::Result<serde_json::Value> {
    let mut object = serde_json::Map::new();
    for (i, name) in columns.iter().enumerate() {
        let value = match row.get_ref(i)? {
            ValueRef::Null => serde_json::Value::Null,
            // Flag columns read back as booleans
            ValueRef::Integer(n) if name.starts_with("is_") => serde_json::Value::Bool(n != 0),
            ValueRef::Integer(n) => serde_json::Value::from(n),
            ValueRef::Real(f) => serde_json::Value::from(f),
            ValueRef::Text(t) => serde_json::Value::from(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(_) => serde_json::Value::Null,
        };
        object.insert(name.clone(), value);
    }
    Ok(serde_json::Value::Object(object))
}
