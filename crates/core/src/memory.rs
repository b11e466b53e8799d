//! In-memory object store
//!
//! A process-local `ObjectStore` that reproduces the backend's error codes.
//! It backs the test suites and lets the shell run without a network.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;

use crate::acl::CannedAcl;
use crate::error::{Error, Result};
use crate::path::RemotePath;
use crate::traits::{DeleteResult, ListOptions, ListResult, ObjectInfo, ObjectStore};

const DEFAULT_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: Option<String>,
    last_modified: Timestamp,
}

#[derive(Debug)]
struct Bucket {
    region: String,
    created: Timestamp,
    objects: BTreeMap<String, StoredObject>,
    policy: Option<String>,
    acl: CannedAcl,
}

/// Shared in-memory bucket namespace
///
/// Clones share state, so a store obtained through `reconnect` sees the
/// same buckets.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    region: String,
    page_size: usize,
    buckets: Arc<Mutex<BTreeMap<String, Bucket>>>,
}

impl MemoryStore {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            page_size: DEFAULT_PAGE_SIZE,
            buckets: Arc::default(),
        }
    }

    /// Limit list pages to `size` keys to exercise pagination
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Canned ACL currently applied to a bucket
    pub fn bucket_acl(&self, bucket: &str) -> Option<CannedAcl> {
        self.lock().get(bucket).map(|b| b.acl)
    }

    /// Keys currently stored in a bucket
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.lock()
            .get(bucket)
            .map(|b| b.objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Stored bytes of one object
    pub fn contents(&self, path: &RemotePath) -> Result<Vec<u8>> {
        self.with_bucket(&path.bucket, |state| {
            state
                .objects
                .get(&path.key)
                .map(|object| object.data.clone())
                .ok_or_else(|| no_such_key(path))
        })
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Bucket>> {
        // A poisoned lock only means another test thread panicked mid-call.
        self.buckets.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn with_bucket<T>(&self, bucket: &str, f: impl FnOnce(&mut Bucket) -> Result<T>) -> Result<T> {
        let mut buckets = self.lock();
        let state = buckets.get_mut(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        f(state)
    }
}

fn no_such_bucket(bucket: &str) -> Error {
    Error::service(
        "NoSuchBucket",
        format!("The specified bucket does not exist: {bucket}"),
    )
}

fn no_such_key(path: &RemotePath) -> Error {
    Error::service(
        "NoSuchKey",
        format!("The specified key does not exist: {path}"),
    )
}

fn describe(key: &str, object: &StoredObject) -> ObjectInfo {
    let mut info = ObjectInfo::file(key, object.data.len() as i64);
    info.last_modified = Some(object.last_modified);
    info.content_type = object.content_type.clone();
    info
}

#[async_trait]
impl ObjectStore for MemoryStore {
    fn region(&self) -> String {
        self.region.clone()
    }

    async fn reconnect(&self, region: &str) -> Result<Box<dyn ObjectStore>> {
        Ok(Box::new(Self {
            region: region.to_string(),
            ..self.clone()
        }))
    }

    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>> {
        Ok(self
            .lock()
            .iter()
            .map(|(name, state)| {
                let mut info = ObjectInfo::bucket(name);
                info.last_modified = Some(state.created);
                info
            })
            .collect())
    }

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListResult> {
        let page_size = options
            .max_keys
            .map(|n| n.max(1) as usize)
            .unwrap_or(self.page_size)
            .min(self.page_size);
        let prefix = options.prefix.unwrap_or_default();
        let after = options.continuation_token;

        self.with_bucket(bucket, |state| {
            let mut matching = state
                .objects
                .iter()
                .filter(|(key, _)| key.starts_with(&prefix))
                .filter(|(key, _)| {
                    after
                        .as_ref()
                        .is_none_or(|token| key.as_str() > token.as_str())
                });

            let items: Vec<ObjectInfo> = matching
                .by_ref()
                .take(page_size)
                .map(|(key, object)| describe(key, object))
                .collect();
            let truncated = matching.next().is_some();
            let continuation_token = if truncated {
                items.last().map(|info| info.key.clone())
            } else {
                None
            };

            Ok(ListResult {
                items,
                truncated,
                continuation_token,
            })
        })
    }

    async fn head_object(&self, path: &RemotePath) -> Result<ObjectInfo> {
        self.with_bucket(&path.bucket, |state| {
            state
                .objects
                .get(&path.key)
                .map(|object| describe(&path.key, object))
                .ok_or_else(|| no_such_key(path))
        })
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut buckets = self.lock();
        if buckets.contains_key(bucket) {
            return Err(Error::service(
                "BucketAlreadyExists",
                format!("The requested bucket name is not available: {bucket}"),
            ));
        }
        buckets.insert(
            bucket.to_string(),
            Bucket {
                region: self.region.clone(),
                created: Timestamp::now(),
                objects: BTreeMap::new(),
                policy: None,
                acl: CannedAcl::Private,
            },
        );
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        let mut buckets = self.lock();
        match buckets.get(bucket) {
            None => Err(no_such_bucket(bucket)),
            Some(state) if !state.objects.is_empty() => Err(Error::service(
                "BucketNotEmpty",
                format!("The bucket you tried to delete is not empty: {bucket}"),
            )),
            Some(_) => {
                buckets.remove(bucket);
                Ok(())
            }
        }
    }

    async fn bucket_location(&self, bucket: &str) -> Result<Option<String>> {
        self.with_bucket(bucket, |state| {
            Ok((state.region != "us-east-1").then(|| state.region.clone()))
        })
    }

    async fn download_to(&self, path: &RemotePath, local: &Path) -> Result<u64> {
        let data = self.contents(path)?;
        tokio::fs::write(local, &data).await?;
        Ok(data.len() as u64)
    }

    async fn put_object(
        &self,
        path: &RemotePath,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        self.with_bucket(&path.bucket, |state| {
            let object = StoredObject {
                data,
                content_type,
                last_modified: Timestamp::now(),
            };
            let info = describe(&path.key, &object);
            state.objects.insert(path.key.clone(), object);
            Ok(info)
        })
    }

    async fn upload_from(
        &self,
        path: &RemotePath,
        local: &Path,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        let data = tokio::fs::read(local).await?;
        self.put_object(path, data, content_type).await
    }

    async fn delete_object(&self, path: &RemotePath) -> Result<()> {
        // Deleting an absent key succeeds, as it does on S3.
        self.with_bucket(&path.bucket, |state| {
            state.objects.remove(&path.key);
            Ok(())
        })
    }

    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<DeleteResult> {
        self.with_bucket(bucket, |state| {
            for key in &keys {
                state.objects.remove(key);
            }
            Ok(DeleteResult {
                deleted: keys,
                failed: Vec::new(),
            })
        })
    }

    async fn copy_object(&self, src: &RemotePath, dst: &RemotePath) -> Result<()> {
        let mut buckets = self.lock();
        let object = buckets
            .get(&src.bucket)
            .ok_or_else(|| no_such_bucket(&src.bucket))?
            .objects
            .get(&src.key)
            .cloned()
            .ok_or_else(|| no_such_key(src))?;
        let target = buckets
            .get_mut(&dst.bucket)
            .ok_or_else(|| no_such_bucket(&dst.bucket))?;
        target.objects.insert(
            dst.key.clone(),
            StoredObject {
                last_modified: Timestamp::now(),
                ..object
            },
        );
        Ok(())
    }

    async fn get_bucket_policy(&self, bucket: &str) -> Result<String> {
        self.with_bucket(bucket, |state| {
            state.policy.clone().ok_or_else(|| {
                Error::service("NoSuchBucketPolicy", "The bucket policy does not exist")
            })
        })
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()> {
        self.with_bucket(bucket, |state| {
            state.policy = Some(policy.to_string());
            Ok(())
        })
    }

    async fn delete_bucket_policy(&self, bucket: &str) -> Result<()> {
        self.with_bucket(bucket, |state| {
            state.policy = None;
            Ok(())
        })
    }

    async fn put_bucket_acl(&self, bucket: &str, acl: CannedAcl) -> Result<()> {
        self.with_bucket(bucket, |state| {
            state.acl = acl;
            Ok(())
        })
    }

    async fn presign_get(&self, path: &RemotePath, expires_in: Duration) -> Result<String> {
        self.head_object(path).await?;
        Ok(format!(
            "memory://{}/{}?expires={}",
            path.bucket,
            path.key,
            expires_in.as_secs()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_delete_bucket_codes() {
        let store = MemoryStore::new("us-east-1");

        store.create_bucket("demo").await.unwrap();
        let err = store.create_bucket("demo").await.unwrap_err();
        assert_eq!(err.code(), Some("BucketAlreadyExists"));

        store.delete_bucket("demo").await.unwrap();
        let err = store.delete_bucket("demo").await.unwrap_err();
        assert_eq!(err.code(), Some("NoSuchBucket"));
    }

    #[tokio::test]
    async fn test_delete_non_empty_bucket_fails() {
        let store = MemoryStore::new("us-east-1");
        store.create_bucket("demo").await.unwrap();
        store
            .put_object(&RemotePath::new("demo", "a.txt"), b"a".to_vec(), None)
            .await
            .unwrap();

        let err = store.delete_bucket("demo").await.unwrap_err();
        assert_eq!(err.code(), Some("BucketNotEmpty"));
    }

    #[tokio::test]
    async fn test_list_objects_paginates() {
        let store = MemoryStore::new("us-east-1").with_page_size(2);
        store.create_bucket("demo").await.unwrap();
        for key in ["a", "b", "c"] {
            store
                .put_object(&RemotePath::new("demo", key), Vec::new(), None)
                .await
                .unwrap();
        }

        let first = store.list_objects("demo", ListOptions::default()).await.unwrap();
        assert_eq!(first.items.len(), 2);
        assert!(first.truncated);

        let second = store
            .list_objects(
                "demo",
                ListOptions {
                    continuation_token: first.continuation_token,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert_eq!(second.items[0].key, "c");
        assert!(!second.truncated);
    }

    #[tokio::test]
    async fn test_reconnect_shares_state() {
        let store = MemoryStore::new("us-east-1");
        store.create_bucket("demo").await.unwrap();

        let moved = store.reconnect("eu-west-2").await.unwrap();
        assert_eq!(moved.region(), "eu-west-2");
        assert_eq!(moved.list_buckets().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bucket_location_follows_creating_region() {
        let store = MemoryStore::new("eu-west-2");
        store.create_bucket("demo").await.unwrap();
        assert_eq!(
            store.bucket_location("demo").await.unwrap().as_deref(),
            Some("eu-west-2")
        );
    }
}
