//! User projection.

use async_trait::async_trait;

use catalog_search_repository::{RecordStore, RecordStoreError};
use catalog_search_shared::{Completion, IndexKind, User, UserDocument};

use super::names::tokenize_names;
use super::Indexable;

/// Project a user into its search document.
pub fn project_user(user: &User) -> UserDocument {
    let username = user.username.clone().unwrap_or_default();
    let fullname = user.fullname.clone().unwrap_or_default();
    let suggest = Completion::from_input(tokenize_names(&[&username, &fullname]));

    UserDocument {
        id: user.id,
        username,
        fullname,
        suggest,
    }
}

#[async_trait]
impl Indexable for User {
    type Document = UserDocument;

    fn kind() -> IndexKind {
        IndexKind::Users
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn is_live(&self) -> bool {
        !self.deleted
    }

    fn project(&self) -> UserDocument {
        project_user(self)
    }

    async fn fetch_page(
        store: &dyn RecordStore,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, RecordStoreError> {
        store.get_users(limit, offset).await
    }

    async fn fetch_by_id(
        store: &dyn RecordStore,
        id: i64,
    ) -> Result<Option<Self>, RecordStoreError> {
        store.get_user_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_user() {
        let user = User {
            id: 5,
            username: Some("jsmith2".to_string()),
            fullname: Some("John Smith 123".to_string()),
            deleted: false,
        };

        let doc = project_user(&user);
        assert_eq!(doc.id, 5);
        assert_eq!(doc.username, "jsmith2");
        assert_eq!(doc.fullname, "John Smith 123");
        assert_eq!(
            doc.suggest.input,
            vec!["jsmith", "john smith", "john", "smith"]
        );
        assert!(doc.suggest.weight.is_none());
    }

    #[test]
    fn test_project_user_without_names() {
        let user = User {
            id: 6,
            username: None,
            fullname: None,
            deleted: true,
        };

        let doc = project_user(&user);
        assert_eq!(doc.username, "");
        assert_eq!(doc.fullname, "");
        assert!(doc.suggest.input.is_empty());
        assert!(!user.is_live());
    }
}
