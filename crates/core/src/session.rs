//! Session context
//!
//! The state an interactive session carries between commands: the backend
//! client, its region and the active bucket. It is passed explicitly to
//! every operation.

use crate::error::{Error, Result};
use crate::traits::ObjectStore;

/// Live state of one interactive session
pub struct Session {
    store: Box<dyn ObjectStore>,
    region: String,
    bucket: Option<String>,
}

impl Session {
    /// Start a session on `store` with no active bucket
    pub fn new(store: Box<dyn ObjectStore>) -> Self {
        let region = store.region();
        Self {
            store,
            region,
            bucket: None,
        }
    }

    /// Backend client
    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Active bucket, if one was chosen
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// Active bucket, or a validation error when none is chosen
    pub fn require_bucket(&self) -> Result<&str> {
        self.bucket().ok_or_else(|| {
            Error::Validation("No bucket selected. Create or switch to a bucket first.".into())
        })
    }

    /// Make `bucket` the active bucket
    pub fn select_bucket(&mut self, bucket: impl Into<String>) {
        let bucket = bucket.into();
        tracing::debug!(%bucket, "active bucket changed");
        self.bucket = Some(bucket);
    }

    /// Forget the active bucket if it is `bucket`
    pub fn forget_bucket(&mut self, bucket: &str) {
        if self.bucket.as_deref() == Some(bucket) {
            self.bucket = None;
        }
    }

    /// Reconnect the backend in `region`, keeping credentials and bucket
    pub async fn set_region(&mut self, region: &str) -> Result<()> {
        let region = region.trim();
        if region.is_empty() {
            return Err(Error::Validation("Region cannot be empty".into()));
        }
        let store = self.store.reconnect(region).await?;
        tracing::debug!(from = %self.region, to = %region, "region changed");
        self.store = store;
        self.region = region.to_string();
        Ok(())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}
