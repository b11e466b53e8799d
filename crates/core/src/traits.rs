//! ObjectStore trait definition
//!
//! This trait defines the interface for the storage backend.
//! It keeps the operations decoupled from the S3 SDK so they can run
//! against the in-memory store or a mock in tests.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;

use crate::acl::CannedAcl;
use crate::error::Result;
use crate::path::RemotePath;

/// Metadata for an object or bucket
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    /// Object key or bucket name
    pub key: String,

    /// Size in bytes (None for buckets)
    pub size_bytes: Option<i64>,

    /// Human-readable size
    pub size_human: Option<String>,

    /// Last modified timestamp (creation date for buckets)
    pub last_modified: Option<Timestamp>,

    /// ETag (usually MD5 for single-part uploads)
    pub etag: Option<String>,

    /// Content type
    pub content_type: Option<String>,

    /// Whether this is a folder marker or bucket
    pub is_dir: bool,
}

impl ObjectInfo {
    /// Create a new ObjectInfo for a file
    pub fn file(key: impl Into<String>, size: i64) -> Self {
        let key = key.into();
        let is_dir = key.ends_with('/');
        Self {
            key,
            size_bytes: Some(size),
            size_human: Some(humansize::format_size(size.max(0) as u64, humansize::BINARY)),
            last_modified: None,
            etag: None,
            content_type: None,
            is_dir,
        }
    }

    /// Create a new ObjectInfo for a bucket
    pub fn bucket(name: impl Into<String>) -> Self {
        Self {
            key: name.into(),
            size_bytes: None,
            size_human: None,
            last_modified: None,
            etag: None,
            content_type: None,
            is_dir: true,
        }
    }
}

/// Result of a list operation
#[derive(Debug, Clone, Default)]
pub struct ListResult {
    /// Listed objects
    pub items: Vec<ObjectInfo>,

    /// Whether the result is truncated (more items available)
    pub truncated: bool,

    /// Continuation token for pagination
    pub continuation_token: Option<String>,
}

/// Options for list operations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    /// Maximum number of keys to return per request
    pub max_keys: Option<i32>,

    /// Prefix to filter by
    pub prefix: Option<String>,

    /// Continuation token for pagination
    pub continuation_token: Option<String>,
}

/// Outcome of a batch delete request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteResult {
    /// Keys the backend confirmed as deleted
    pub deleted: Vec<String>,

    /// Keys the backend refused, with its error message
    pub failed: Vec<(String, String)>,
}

/// Trait for the object storage backend
///
/// Every method is one request/response round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Region this client signs requests for
    fn region(&self) -> String;

    /// Build a client with the same credentials for another region
    async fn reconnect(&self, region: &str) -> Result<Box<dyn ObjectStore>>;

    /// List buckets
    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>>;

    /// List one page of objects in a bucket
    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListResult>;

    /// Get object metadata
    async fn head_object(&self, path: &RemotePath) -> Result<ObjectInfo>;

    /// Create a bucket
    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Delete an empty bucket
    async fn delete_bucket(&self, bucket: &str) -> Result<()>;

    /// Location constraint of a bucket (`None` for the default region)
    async fn bucket_location(&self, bucket: &str) -> Result<Option<String>>;

    /// Write an object into a local file, returning the bytes written
    ///
    /// The file is only created once the backend has answered.
    async fn download_to(&self, path: &RemotePath, local: &Path) -> Result<u64>;

    /// Store bytes at a key
    async fn put_object(
        &self,
        path: &RemotePath,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo>;

    /// Stream a local file to a key
    async fn upload_from(
        &self,
        path: &RemotePath,
        local: &Path,
        content_type: Option<String>,
    ) -> Result<ObjectInfo>;

    /// Delete a single key
    async fn delete_object(&self, path: &RemotePath) -> Result<()>;

    /// Delete up to 1000 keys in one request
    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<DeleteResult>;

    /// Server-side copy
    async fn copy_object(&self, src: &RemotePath, dst: &RemotePath) -> Result<()>;

    /// Get the bucket policy document
    async fn get_bucket_policy(&self, bucket: &str) -> Result<String>;

    /// Replace the bucket policy document
    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()>;

    /// Remove the bucket policy
    async fn delete_bucket_policy(&self, bucket: &str) -> Result<()>;

    /// Apply a canned ACL to a bucket
    async fn put_bucket_acl(&self, bucket: &str, acl: CannedAcl) -> Result<()>;

    /// Time-limited GET URL for an object
    async fn presign_get(&self, path: &RemotePath, expires_in: Duration) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_and_marker_entries() {
        let report = ObjectInfo::file("docs/report.pdf", 2048);
        assert_eq!(report.size_bytes, Some(2048));
        assert!(report.size_human.is_some());
        assert!(!report.is_dir);

        let marker = ObjectInfo::file("docs/", 0);
        assert!(marker.is_dir);
    }

    #[test]
    fn test_bucket_entry_has_no_size() {
        let demo = ObjectInfo::bucket("demo");
        assert_eq!(demo.key, "demo");
        assert!(demo.is_dir);
        assert_eq!(demo.size_bytes, None);
        assert_eq!(demo.size_human, None);
    }
}
