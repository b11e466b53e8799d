//! Single and batch object deletion, object metadata

use super::delete_keys;
use crate::error::{Error, Result};
use crate::path::{RemotePath, split_list};
use crate::session::Session;
use crate::traits::ObjectInfo;

/// Delete one key from the active bucket
pub async fn delete_file(session: &Session, key: &str) -> Result<()> {
    let bucket = session.require_bucket()?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::Validation("Object key cannot be empty".into()));
    }
    tracing::debug!(bucket, key, "delete object");
    session.store().delete_object(&RemotePath::new(bucket, key)).await
}

/// Delete a comma-separated list of keys with batch delete requests
///
/// Returns the number of keys the backend confirmed.
pub async fn delete_files(session: &Session, keys: &str) -> Result<usize> {
    let bucket = session.require_bucket()?;
    let keys = split_list(keys);
    if keys.is_empty() {
        return Err(Error::Validation("No file keys given".into()));
    }
    delete_keys(session.store(), bucket, keys).await
}

/// Size, modification time and content type of an object
pub async fn object_info(session: &Session, bucket: &str, key: &str) -> Result<ObjectInfo> {
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::Validation("Object key cannot be empty".into()));
    }
    tracing::debug!(bucket, key, "head object");
    session.store().head_object(&RemotePath::new(bucket, key)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::traits::ObjectStore as _;

    async fn setup(keys: &[&str]) -> (MemoryStore, Session) {
        let store = MemoryStore::new("us-east-1");
        store.create_bucket("demo").await.unwrap();
        for key in keys {
            store
                .put_object(
                    &RemotePath::new("demo", *key),
                    b"data".to_vec(),
                    Some("text/plain".into()),
                )
                .await
                .unwrap();
        }
        let mut session = Session::new(Box::new(store.clone()));
        session.select_bucket("demo");
        (store, session)
    }

    #[tokio::test]
    async fn test_delete_file() {
        let (store, session) = setup(&["a.txt", "b.txt"]).await;
        delete_file(&session, " a.txt ").await.unwrap();
        assert_eq!(store.keys("demo"), vec!["b.txt"]);
    }

    #[tokio::test]
    async fn test_delete_files_batch() {
        let (store, session) = setup(&["a.txt", "b.txt", "c.txt"]).await;
        let deleted = delete_files(&session, "a.txt, c.txt").await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.keys("demo"), vec!["b.txt"]);
    }

    #[tokio::test]
    async fn test_delete_files_rejects_empty_list() {
        let (_store, session) = setup(&[]).await;
        assert!(matches!(delete_files(&session, ",,").await, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_object_info() {
        let (_store, session) = setup(&["a.txt"]).await;
        let info = object_info(&session, "demo", "a.txt").await.unwrap();
        assert_eq!(info.size_bytes, Some(4));
        assert_eq!(info.content_type.as_deref(), Some("text/plain"));
        assert!(info.last_modified.is_some());

        let err = object_info(&session, "demo", "missing").await.unwrap_err();
        assert_eq!(err.code(), Some("NoSuchKey"));
    }
}
