// ABOUTME: Shared keyset range query for session-scoped, time-ordered tables
// ABOUTME: Builds the (created_at, id) predicate and ordering from a RangeQuery

use pagewise_core::RangeQuery;
use sqlx::{sqlite::SqliteRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::StorageError;

/// Build the SELECT for one page probe.
///
/// Only `table`, `columns` and the direction's fixed fragments are
/// interpolated; every value is bound.
pub(crate) fn keyset_sql(table: &'static str, columns: &'static str, query: &RangeQuery) -> String {
    let op = query.direction.comparison_operator();
    let dir = query.direction.sort_keyword();

    let mut sql = format!("SELECT {columns} FROM {table} WHERE session_id = ?");
    if query.after.is_some() {
        sql.push_str(&format!(
            " AND (created_at {op} ? OR (created_at = ? AND id {op} ?))"
        ));
    }
    sql.push_str(&format!(" ORDER BY created_at {dir}, id {dir} LIMIT ?"));
    sql
}

/// Run a keyset probe against `table`, scoped to one session
pub(crate) async fn fetch_keyset(
    pool: &SqlitePool,
    table: &'static str,
    columns: &'static str,
    session_id: Uuid,
    query: &RangeQuery,
) -> Result<Vec<SqliteRow>, StorageError> {
    let sql = keyset_sql(table, columns, query);
    let fetch = i64::try_from(query.fetch).unwrap_or(i64::MAX);

    debug!(
        table,
        session_id = %session_id,
        direction = ?query.direction,
        fetch,
        "Running keyset range query"
    );

    let mut q = sqlx::query(&sql).bind(session_id.to_string());
    if let Some(after) = &query.after {
        q = q
            .bind(after.nanos())
            .bind(after.nanos())
            .bind(after.id().to_string());
    }

    let rows = q.bind(fetch).fetch_all(pool).await?;
    Ok(rows)
}

/// Parse a canonical UUID column
pub(crate) fn parse_id(column: &str, raw: &str) -> Result<Uuid, StorageError> {
    Uuid::try_parse(raw).map_err(|e| StorageError::Corrupt(format!("{column} {raw:?}: {e}")))
}
