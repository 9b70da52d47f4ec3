//! Data doc projection.

use async_trait::async_trait;
use serde_json::Value;

use catalog_search_repository::{RecordStore, RecordStoreError};
use catalog_search_shared::{DataCell, DataCellType, DataDoc, DataDocDocument, IndexKind};

use super::text::{escape_html, flatten_rich_text};
use super::Indexable;

/// Text standing in for cells whose content cannot be searched.
pub const UNPARSABLE_CELL_PLACEHOLDER: &str = "[... additional unparsable content ...]";

/// Render one cell as plain text.
fn cell_to_text(cell: &DataCell) -> String {
    match cell.cell_type {
        DataCellType::Text => flatten_rich_text(&cell.context),
        DataCellType::Query => {
            let title = cell
                .meta
                .get("title")
                .and_then(Value::as_str)
                .filter(|title| !title.is_empty());
            match title {
                Some(title) => format!("{}\n{}", title, cell.context),
                None => cell.context.clone(),
            }
        }
        DataCellType::Chart | DataCellType::Other(_) => UNPARSABLE_CELL_PLACEHOLDER.to_string(),
    }
}

/// Project a data doc into its search document.
///
/// Cells are rendered one per line and the joined text is HTML escaped.
pub fn project_data_doc(doc: &DataDoc) -> DataDocDocument {
    let cells = doc
        .cells
        .iter()
        .map(cell_to_text)
        .collect::<Vec<_>>()
        .join("\n");

    DataDocDocument {
        id: doc.id,
        environment_id: doc.environment_id,
        owner_uid: doc.owner_uid,
        created_at: doc.created_at.timestamp(),
        cells: escape_html(&cells),
        title: doc.title.clone(),
    }
}

#[async_trait]
impl Indexable for DataDoc {
    type Document = DataDocDocument;

    fn kind() -> IndexKind {
        IndexKind::DataDocs
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn is_live(&self) -> bool {
        !self.archived
    }

    fn project(&self) -> DataDocDocument {
        project_data_doc(self)
    }

    async fn fetch_page(
        store: &dyn RecordStore,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, RecordStoreError> {
        store.get_data_docs(limit, offset).await
    }

    async fn fetch_by_id(
        store: &dyn RecordStore,
        id: i64,
    ) -> Result<Option<Self>, RecordStoreError> {
        store.get_data_doc_by_id(id).await
    }
}
