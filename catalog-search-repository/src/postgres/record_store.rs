//! PostgreSQL implementation of the record store.
//!
//! Reads data docs (with their ordered cells), tables (with schema, columns and
//! description) and users using runtime-checked queries.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use catalog_search_shared::{DataCell, DataCellType, DataDoc, DataSchema, DataTable, User};

use crate::errors::RecordStoreError;
use crate::interfaces::RecordStore;

#[derive(FromRow)]
struct DataDocRow {
    id: i64,
    environment_id: i64,
    owner_uid: i64,
    created_at: DateTime<Utc>,
    title: Option<String>,
    archived: bool,
}

impl DataDocRow {
    fn into_doc(self, cells: Vec<DataCell>) -> DataDoc {
        DataDoc {
            id: self.id,
            environment_id: self.environment_id,
            owner_uid: self.owner_uid,
            created_at: self.created_at,
            title: self.title.unwrap_or_default(),
            archived: self.archived,
            cells,
        }
    }
}

#[derive(FromRow)]
struct DataCellRow {
    data_doc_id: i64,
    id: i64,
    cell_type: String,
    context: Option<String>,
    meta: Option<serde_json::Value>,
}

impl DataCellRow {
    fn into_cell(self) -> DataCell {
        DataCell {
            id: self.id,
            cell_type: DataCellType::from(self.cell_type),
            context: self.context.unwrap_or_default(),
            meta: self.meta.unwrap_or(serde_json::Value::Null),
        }
    }
}

#[derive(FromRow)]
struct DataTableRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
    golden: bool,
    schema_id: i64,
    schema_name: String,
    metastore_id: i64,
    description: Option<String>,
}

impl DataTableRow {
    fn into_table(self, columns: Vec<String>) -> DataTable {
        DataTable {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
            golden: self.golden,
            schema: DataSchema {
                id: self.schema_id,
                name: self.schema_name,
                metastore_id: self.metastore_id,
            },
            columns,
            description: self.description,
        }
    }
}

#[derive(FromRow)]
struct ColumnRow {
    table_id: i64,
    name: String,
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: Option<String>,
    fullname: Option<String>,
    deleted: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            fullname: row.fullname,
            deleted: row.deleted,
        }
    }
}

/// PostgreSQL-backed record store.
pub struct PostgresRecordStore {
    /// PostgreSQL connection pool
    pool: PgPool,
}

impl PostgresRecordStore {
    /// Creates a record store on top of an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self, RecordStoreError> {
        let pool = PgPool::connect(url).await?;
        Ok(Self { pool })
    }

    async fn attach_cells(&self, rows: Vec<DataDocRow>) -> Result<Vec<DataDoc>, RecordStoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let cell_rows = sqlx::query_as::<_, DataCellRow>(
            "SELECT ddc.data_doc_id, c.id, c.cell_type, c.context, c.meta \
             FROM data_doc_data_cell ddc \
             JOIN data_cell c ON c.id = ddc.data_cell_id \
             WHERE ddc.data_doc_id = ANY($1) \
             ORDER BY ddc.data_doc_id, ddc.cell_order, ddc.id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut cells: HashMap<i64, Vec<DataCell>> = HashMap::new();
        for row in cell_rows {
            let doc_id = row.data_doc_id;
            cells.entry(doc_id).or_default().push(row.into_cell());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let doc_cells = cells.remove(&row.id).unwrap_or_default();
                row.into_doc(doc_cells)
            })
            .collect())
    }

    async fn attach_columns(
        &self,
        rows: Vec<DataTableRow>,
    ) -> Result<Vec<DataTable>, RecordStoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let column_rows = sqlx::query_as::<_, ColumnRow>(
            "SELECT table_id, name FROM data_table_column \
             WHERE table_id = ANY($1) \
             ORDER BY table_id, id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut columns: HashMap<i64, Vec<String>> = HashMap::new();
        for row in column_rows {
            columns.entry(row.table_id).or_default().push(row.name);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let table_columns = columns.remove(&row.id).unwrap_or_default();
                row.into_table(table_columns)
            })
            .collect())
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn get_data_docs(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DataDoc>, RecordStoreError> {
        let rows = sqlx::query_as::<_, DataDocRow>(
            "SELECT id, environment_id, owner_uid, created_at, title, archived \
             FROM data_doc WHERE archived = FALSE \
             ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        self.attach_cells(rows).await
    }

    async fn get_data_doc_by_id(&self, id: i64) -> Result<Option<DataDoc>, RecordStoreError> {
        let row = sqlx::query_as::<_, DataDocRow>(
            "SELECT id, environment_id, owner_uid, created_at, title, archived \
             FROM data_doc WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.attach_cells(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn get_tables(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DataTable>, RecordStoreError> {
        let rows = sqlx::query_as::<_, DataTableRow>(
            "SELECT t.id, t.name, t.created_at, t.golden, \
                    s.id AS schema_id, s.name AS schema_name, s.metastore_id, i.description \
             FROM data_table t \
             JOIN data_schema s ON s.id = t.schema_id \
             LEFT JOIN data_table_information i ON i.data_table_id = t.id \
             ORDER BY t.id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        self.attach_columns(rows).await
    }

    async fn get_table_by_id(&self, id: i64) -> Result<Option<DataTable>, RecordStoreError> {
        let row = sqlx::query_as::<_, DataTableRow>(
            "SELECT t.id, t.name, t.created_at, t.golden, \
                    s.id AS schema_id, s.name AS schema_name, s.metastore_id, i.description \
             FROM data_table t \
             JOIN data_schema s ON s.id = t.schema_id \
             LEFT JOIN data_table_information i ON i.data_table_id = t.id \
             WHERE t.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.attach_columns(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn get_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, RecordStoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, fullname, deleted FROM \"user\" \
             WHERE deleted = FALSE \
             ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, RecordStoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, fullname, deleted FROM \"user\" WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cell_row(cell_type: &str) -> DataCellRow {
        DataCellRow {
            data_doc_id: 1,
            id: 7,
            cell_type: cell_type.to_string(),
            context: None,
            meta: Some(json!({"title": "Report"})),
        }
    }

    #[test]
    fn test_known_cell_type_row() {
        let cell = cell_row("query").into_cell();
        assert_eq!(cell.cell_type, DataCellType::Query);
        assert_eq!(cell.context, "");
        assert_eq!(cell.meta["title"], "Report");
    }

    #[test]
    fn test_unknown_cell_type_row_still_decodes() {
        let cell = cell_row("python").into_cell();
        assert_eq!(cell.id, 7);
        assert_eq!(cell.cell_type, DataCellType::Other("python".to_string()));
    }
}
