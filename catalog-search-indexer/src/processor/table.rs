//! Table projection.

use async_trait::async_trait;

use catalog_search_repository::{RecordStore, RecordStoreError};
use catalog_search_shared::{
    Completion, DataTable, IndexKind, TableCompletionContext, TableDocument,
};

use super::text::{escape_html, flatten_rich_text};
use super::Indexable;

/// Completion weight given to every table.
const TABLE_COMPLETION_WEIGHT: i64 = 0;

/// Words of an underscore separated identifier.
fn identifier_words(identifier: &str) -> impl Iterator<Item = &str> {
    identifier.split('_').filter(|word| !word.is_empty())
}

/// Project a table into its search document.
pub fn project_table(table: &DataTable) -> TableDocument {
    let schema_name = &table.schema.name;
    let metastore_id = table.schema.metastore_id;

    let full_name = identifier_words(schema_name)
        .chain(identifier_words(&table.name))
        .collect::<Vec<_>>()
        .join(" ");

    let columns = table
        .columns
        .iter()
        .map(|column| identifier_words(column).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(" ");

    let description = table
        .description
        .as_deref()
        .map(|description| escape_html(&flatten_rich_text(description)))
        .unwrap_or_default();

    TableDocument {
        id: table.id,
        metastore_id,
        schema: schema_name.clone(),
        name: table.name.clone(),
        full_name,
        completion_name: Completion {
            input: vec![
                format!("{}.{}", schema_name, table.name),
                table.name.clone(),
            ],
            weight: Some(TABLE_COMPLETION_WEIGHT),
            contexts: Some(TableCompletionContext { metastore_id }),
        },
        description,
        created_at: table.created_at.timestamp(),
        columns,
        golden: table.golden,
    }
}

#[async_trait]
impl Indexable for DataTable {
    type Document = TableDocument;

    fn kind() -> IndexKind {
        IndexKind::Tables
    }

    fn id(&self) -> i64 {
        self.id
    }

    // Tables have no soft-delete flag.
    fn is_live(&self) -> bool {
        true
    }

    fn project(&self) -> TableDocument {
        project_table(self)
    }

    async fn fetch_page(
        store: &dyn RecordStore,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, RecordStoreError> {
        store.get_tables(limit, offset).await
    }

    async fn fetch_by_id(
        store: &dyn RecordStore,
        id: i64,
    ) -> Result<Option<Self>, RecordStoreError> {
        store.get_table_by_id(id).await
    }
}
