//! Integration tests for the PostgreSQL record store.
//!
//! These tests require a real PostgreSQL database (`DATABASE_URL`) and use SQLx test
//! macros for isolation and cleanup. They are ignored by default.
//!
//! Run with: `cargo test --test postgres_record_store -- --ignored`

use catalog_search_repository::{PostgresRecordStore, RecordStore};
use catalog_search_shared::DataCellType;

async fn seed(pool: &sqlx::PgPool) {
    sqlx::query(
        "INSERT INTO data_doc (id, environment_id, owner_uid, title, archived) VALUES \
         (1, 1, 10, 'Revenue', FALSE), \
         (2, 1, 10, 'Old', TRUE), \
         (3, 2, 11, NULL, FALSE)",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO data_cell (id, cell_type, context, meta) VALUES \
         (1, 'query', 'SELECT 1', '{\"title\": \"One\"}'), \
         (2, 'text', 'notes', NULL)",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO data_doc_data_cell (data_doc_id, data_cell_id, cell_order) VALUES \
         (1, 2, 1), (1, 1, 0)",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO data_schema (id, name, metastore_id) VALUES (1, 'core', 5)")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO data_table (id, name, schema_id, golden) VALUES (1, 'user_events', 1, TRUE)")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO data_table_column (name, table_id) VALUES ('event_id', 1), ('created_at', 1)")
        .execute(pool)
        .await
        .unwrap();

    sqlx::query(
        "INSERT INTO \"user\" (id, username, fullname, deleted) VALUES \
         (1, 'jsmith', 'John Smith', FALSE), (2, 'gone', NULL, TRUE)",
    )
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_data_docs_page_skips_archived(pool: sqlx::PgPool) {
    seed(&pool).await;
    let store = PostgresRecordStore::new(pool);

    let docs = store.get_data_docs(10, 0).await.unwrap();
    let ids: Vec<i64> = docs.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 3]);

    // Cells come back in cell order.
    assert_eq!(docs[0].cells.len(), 2);
    assert_eq!(docs[0].cells[0].cell_type, DataCellType::Query);
    assert_eq!(docs[0].cells[0].meta["title"], "One");
    assert_eq!(docs[0].cells[1].cell_type, DataCellType::Text);
    assert!(docs[1].title.is_empty());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_data_doc_by_id_returns_archived(pool: sqlx::PgPool) {
    seed(&pool).await;
    let store = PostgresRecordStore::new(pool);

    let doc = store.get_data_doc_by_id(2).await.unwrap().unwrap();
    assert!(doc.archived);
    assert!(store.get_data_doc_by_id(99).await.unwrap().is_none());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_tables_with_columns(pool: sqlx::PgPool) {
    seed(&pool).await;
    let store = PostgresRecordStore::new(pool);

    let table = store.get_table_by_id(1).await.unwrap().unwrap();
    assert_eq!(table.schema.name, "core");
    assert_eq!(table.schema.metastore_id, 5);
    assert_eq!(table.columns, vec!["event_id", "created_at"]);
    assert!(table.description.is_none());

    let page = store.get_tables(10, 0).await.unwrap();
    assert_eq!(page.len(), 1);
    assert!(store.get_tables(10, 1).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_users_page_skips_deleted(pool: sqlx::PgPool) {
    seed(&pool).await;
    let store = PostgresRecordStore::new(pool);

    let users = store.get_users(10, 0).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username.as_deref(), Some("jsmith"));

    let deleted = store.get_user_by_id(2).await.unwrap().unwrap();
    assert!(deleted.deleted);
}
