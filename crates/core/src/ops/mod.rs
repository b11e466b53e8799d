//! Operation functions
//!
//! Each operation performs one storage task against the session's backend
//! and returns a structured result for the caller to present. Nothing here
//! prints.
//!
//! Batch operations follow a continue-on-error policy: every item is
//! attempted and its own result is recorded in a [`BatchReport`].

mod bucket;
mod folder;
mod object;
mod relocate;
mod security;
mod transfer;

pub use bucket::{
    BucketInfo, BucketListing, bucket_info, create_bucket, delete_bucket, list_buckets_and_objects,
};
pub use folder::{create_folder, delete_folder};
pub use object::{delete_file, delete_files, object_info};
pub use relocate::{FolderMove, MoveOutcome, move_files, move_folders, rename_file, rename_folders};
pub use security::{
    MAX_PRESIGN_MINUTES, PresignedUrl, delete_bucket_policy, get_bucket_policy, presigned_url,
    set_bucket_acl, set_bucket_policy,
};
pub use transfer::{download_file, download_files, upload_file, upload_files};

use crate::error::{Error, Result};
use crate::traits::{ListOptions, ObjectInfo, ObjectStore};

/// Most keys the backend accepts in one delete request
pub const DELETE_BATCH_SIZE: usize = 1000;

/// Result of one item in a batch operation
#[derive(Debug)]
pub struct BatchItem<T> {
    /// What the item was: a local path, a key, or `key -> path`
    pub target: String,
    pub result: Result<T>,
}

/// Per-item results of a batch operation, in input order
#[derive(Debug)]
pub struct BatchReport<T> {
    pub items: Vec<BatchItem<T>>,
}

impl<T> BatchReport<T> {
    fn new() -> Self {
        Self { items: Vec::new() }
    }

    fn push(&mut self, target: impl Into<String>, result: Result<T>) {
        self.items.push(BatchItem {
            target: target.into(),
            result,
        });
    }

    /// Items that completed
    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &T)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().ok().map(|v| (item.target.as_str(), v)))
    }

    /// Items that failed, with their errors
    pub fn failed(&self) -> impl Iterator<Item = (&str, &Error)> {
        self.items
            .iter()
            .filter_map(|item| item.result.as_ref().err().map(|e| (item.target.as_str(), e)))
    }

    pub fn success_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn is_complete(&self) -> bool {
        self.failure_count() == 0
    }
}

/// List every object under `prefix`, following continuation tokens
pub(crate) async fn list_all(
    store: &dyn ObjectStore,
    bucket: &str,
    prefix: Option<String>,
) -> Result<Vec<ObjectInfo>> {
    let mut items = Vec::new();
    let mut continuation_token: Option<String> = None;

    loop {
        let options = ListOptions {
            max_keys: Some(1000),
            prefix: prefix.clone(),
            continuation_token: continuation_token.clone(),
        };
        let page = store.list_objects(bucket, options).await?;
        items.extend(page.items);

        match page.continuation_token {
            Some(token) if page.truncated => continuation_token = Some(token),
            _ => break,
        }
    }

    Ok(items)
}

/// Delete `keys` in batches the backend accepts
///
/// Returns the number of keys confirmed deleted. Keys the backend refused
/// turn the whole call into a service error naming them.
pub(crate) async fn delete_keys(
    store: &dyn ObjectStore,
    bucket: &str,
    keys: Vec<String>,
) -> Result<usize> {
    let mut deleted = 0;
    let mut refused = Vec::new();

    for chunk in keys.chunks(DELETE_BATCH_SIZE) {
        tracing::debug!(bucket, count = chunk.len(), "delete objects");
        let result = store.delete_objects(bucket, chunk.to_vec()).await?;
        deleted += result.deleted.len();
        refused.extend(result.failed);
    }

    if refused.is_empty() {
        return Ok(deleted);
    }

    tracing::warn!(bucket, ?refused, "backend refused to delete some objects");
    let listing = refused
        .iter()
        .map(|(key, reason)| format!("{key} ({reason})"))
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::service(
        "PartialDelete",
        format!("{deleted} deleted, {} refused: {listing}", refused.len()),
    ))
}
