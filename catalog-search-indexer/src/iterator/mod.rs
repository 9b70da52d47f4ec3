//! Record iterator for the catalog search indexer.
//!
//! Pages through the record store in fixed-size batches and hands records out one
//! at a time.

use std::marker::PhantomData;

use futures::stream::{self, Stream, TryStreamExt};
use tracing::info;

use catalog_search_repository::{RecordStore, RecordStoreError};

use crate::processor::Indexable;

/// Default number of records fetched per page.
pub const DEFAULT_BATCH_SIZE: i64 = 5000;

/// Pager over all records of one kind.
///
/// Starts at offset 0 and advances by the batch size. A page shorter than the batch
/// size is the last one; no further query is issued after it.
pub struct RecordPager<'a, R> {
    store: &'a dyn RecordStore,
    batch_size: i64,
    offset: i64,
    exhausted: bool,
    _record: PhantomData<fn() -> R>,
}

impl<'a, R: Indexable> RecordPager<'a, R> {
    /// Create a pager with the given batch size (at least 1).
    pub fn new(store: &'a dyn RecordStore, batch_size: i64) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
            offset: 0,
            exhausted: false,
            _record: PhantomData,
        }
    }

    /// Offset of the next page to fetch.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Fetch the next page, or `None` once every record has been returned.
    pub async fn next_page(&mut self) -> Result<Option<Vec<R>>, RecordStoreError> {
        if self.exhausted {
            return Ok(None);
        }

        let page = R::fetch_page(self.store, self.batch_size, self.offset).await?;
        info!(
            kind = %R::kind(),
            count = page.len(),
            offset = self.offset,
            "Fetched record page"
        );

        if (page.len() as i64) < self.batch_size {
            self.exhausted = true;
        }
        self.offset += self.batch_size;

        if page.is_empty() {
            Ok(None)
        } else {
            Ok(Some(page))
        }
    }
}

/// Stream every record of kind `R`, one at a time, paging underneath.
pub fn record_stream<'a, R: Indexable>(
    store: &'a dyn RecordStore,
    batch_size: i64,
) -> impl Stream<Item = Result<R, RecordStoreError>> + Send + 'a {
    stream::try_unfold(RecordPager::<R>::new(store, batch_size), |mut pager| async move {
        let page = pager.next_page().await?;
        Ok::<_, RecordStoreError>(page.map(|page| (page, pager)))
    })
    .map_ok(|page| stream::iter(page.into_iter().map(Ok::<R, RecordStoreError>)))
    .try_flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_search_shared::{DataDoc, DataTable, User};
    use futures::StreamExt;
    use std::sync::Mutex;

    /// Store serving `total` users and recording every page request.
    struct PagedUsers {
        total: i64,
        requests: Mutex<Vec<(i64, i64)>>,
    }

    impl PagedUsers {
        fn new(total: i64) -> Self {
            Self {
                total,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RecordStore for PagedUsers {
        async fn get_data_docs(&self, _: i64, _: i64) -> Result<Vec<DataDoc>, RecordStoreError> {
            Ok(vec![])
        }
        async fn get_data_doc_by_id(&self, _: i64) -> Result<Option<DataDoc>, RecordStoreError> {
            Ok(None)
        }
        async fn get_tables(&self, _: i64, _: i64) -> Result<Vec<DataTable>, RecordStoreError> {
            Ok(vec![])
        }
        async fn get_table_by_id(&self, _: i64) -> Result<Option<DataTable>, RecordStoreError> {
            Ok(None)
        }
        async fn get_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, RecordStoreError> {
            self.requests.lock().unwrap().push((limit, offset));
            let end = (offset + limit).min(self.total);
            Ok((offset..end)
                .map(|id| User {
                    id,
                    username: Some(format!("user{}", id)),
                    fullname: None,
                    deleted: false,
                })
                .collect())
        }
        async fn get_user_by_id(&self, _: i64) -> Result<Option<User>, RecordStoreError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_short_page_ends_iteration() {
        let store = PagedUsers::new(5);
        let mut pager = RecordPager::<User>::new(&store, 2);

        assert_eq!(pager.next_page().await.unwrap().unwrap().len(), 2);
        assert_eq!(pager.next_page().await.unwrap().unwrap().len(), 2);
        assert_eq!(pager.next_page().await.unwrap().unwrap().len(), 1);
        assert!(pager.next_page().await.unwrap().is_none());

        assert_eq!(
            *store.requests.lock().unwrap(),
            vec![(2, 0), (2, 2), (2, 4)]
        );
    }

    #[tokio::test]
    async fn test_full_last_page_needs_one_more_query() {
        let store = PagedUsers::new(4);
        let mut pager = RecordPager::<User>::new(&store, 2);

        while pager.next_page().await.unwrap().is_some() {}

        assert_eq!(
            *store.requests.lock().unwrap(),
            vec![(2, 0), (2, 2), (2, 4)]
        );
        assert_eq!(pager.offset(), 6);
    }

    #[tokio::test]
    async fn test_stream_yields_every_record_in_order() {
        let store = PagedUsers::new(7);
        let ids: Vec<i64> = record_stream::<User>(&store, 3)
            .map(|user| user.unwrap().id)
            .collect()
            .await;

        assert_eq!(ids, (0..7).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = PagedUsers::new(0);
        let users: Vec<User> = record_stream::<User>(&store, DEFAULT_BATCH_SIZE)
            .try_collect()
            .await
            .unwrap();

        assert!(users.is_empty());
        assert_eq!(store.requests.lock().unwrap().len(), 1);
    }
}
