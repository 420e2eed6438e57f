// Soft-delete propagation. When a save flips a row's is_active flag, every
// dependent resolved through the relation graph gets the same flag. The
// dependents are written with plain UPDATEs that do not re-enter this
// module, so propagation is exactly one level deep, never transitive.
// Callers run this inside the same transaction as the root write; the first
// failing dependent update aborts the whole unit of work.

use rusqlite::{params, Connection};

use crate::db::models;
use crate::store::relations::RelationGraph;
use crate::store::StoreError;

/// Sets `is_active = active` on every direct dependent of `(table, id)`.
/// Returns the number of rows written. Re-running with the same value is a
/// harmless rewrite; dependent order is unspecified since all updates assign
/// the same value.
pub fn propagate(
    conn: &Connection,
    graph: &RelationGraph,
    table: &str,
    id: &str,
    active: bool,
) -> Result<usize, StoreError> {
    let dependents = graph.related_of(conn, table, id)?;
    if dependents.is_empty() {
        return Ok(0);
    }

    let ts = models::now();
    let mut written = 0;
    for dep in &dependents {
        written += conn.execute(
            &format!(
                "UPDATE {} SET is_active = ?1, updated_at = ?2 WHERE id = ?3",
                dep.table
            ),
            params![active, ts, dep.id],
        )?;
    }

    tracing::debug!(
        table,
        id,
        active,
        written,
        "cascaded active flag to dependents"
    );
    Ok(written)
}
