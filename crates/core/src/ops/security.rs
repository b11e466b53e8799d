//! Bucket policy, canned ACLs and pre-signed URLs

use std::time::Duration;

use crate::acl::CannedAcl;
use crate::error::{Error, Result};
use crate::path::RemotePath;
use crate::session::Session;

/// Longest pre-signed URL lifetime SigV4 allows: 7 days
pub const MAX_PRESIGN_MINUTES: u64 = 7 * 24 * 60;

/// A generated pre-signed URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    pub url: String,
    pub expires_in: Duration,
}

/// Replace a bucket's policy document
///
/// The document is passed through as-is; only emptiness is checked here.
pub async fn set_bucket_policy(session: &Session, bucket: &str, policy: &str) -> Result<()> {
    let policy = policy.trim();
    if policy.is_empty() {
        return Err(Error::Validation("Policy document cannot be empty".into()));
    }
    tracing::debug!(bucket, "put bucket policy");
    session.store().put_bucket_policy(bucket, policy).await
}

/// Fetch a bucket's policy document
pub async fn get_bucket_policy(session: &Session, bucket: &str) -> Result<String> {
    tracing::debug!(bucket, "get bucket policy");
    session.store().get_bucket_policy(bucket).await
}

pub async fn delete_bucket_policy(session: &Session, bucket: &str) -> Result<()> {
    tracing::debug!(bucket, "delete bucket policy");
    session.store().delete_bucket_policy(bucket).await
}

/// Apply a canned ACL; unknown values are rejected before any request
pub async fn set_bucket_acl(session: &Session, bucket: &str, acl: &str) -> Result<CannedAcl> {
    let acl: CannedAcl = acl.trim().parse()?;
    tracing::debug!(bucket, %acl, "put bucket acl");
    session.store().put_bucket_acl(bucket, acl).await?;
    Ok(acl)
}

/// Time-limited GET URL for a key in the active bucket
pub async fn presigned_url(session: &Session, key: &str, minutes: u64) -> Result<PresignedUrl> {
    let bucket = session.require_bucket()?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::Validation("Object key cannot be empty".into()));
    }
    if minutes == 0 || minutes > MAX_PRESIGN_MINUTES {
        return Err(Error::Validation(format!(
            "Duration must be between 1 and {MAX_PRESIGN_MINUTES} minutes"
        )));
    }

    let expires_in = Duration::from_secs(minutes * 60);
    tracing::debug!(bucket, key, secs = expires_in.as_secs(), "presign get object");
    let url = session
        .store()
        .presign_get(&RemotePath::new(bucket, key), expires_in)
        .await?;
    Ok(PresignedUrl { url, expires_in })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::traits::{MockObjectStore, ObjectStore as _};

    async fn setup() -> (MemoryStore, Session) {
        let store = MemoryStore::new("us-east-1");
        store.create_bucket("demo").await.unwrap();
        let mut session = Session::new(Box::new(store.clone()));
        session.select_bucket("demo");
        (store, session)
    }

    fn unreachable_backend() -> Session {
        // Only region() is expected; any request panics the test.
        let mut mock = MockObjectStore::new();
        mock.expect_region().return_const("us-east-1".to_string());
        let mut session = Session::new(Box::new(mock));
        session.select_bucket("demo");
        session
    }

    #[tokio::test]
    async fn test_policy_lifecycle() {
        let (_store, session) = setup().await;
        let policy = r#"{"Version":"2012-10-17","Statement":[]}"#;

        set_bucket_policy(&session, "demo", policy).await.unwrap();
        assert_eq!(get_bucket_policy(&session, "demo").await.unwrap(), policy);

        delete_bucket_policy(&session, "demo").await.unwrap();
        let err = get_bucket_policy(&session, "demo").await.unwrap_err();
        assert_eq!(err.code(), Some("NoSuchBucketPolicy"));
    }

    #[tokio::test]
    async fn test_empty_policy_rejected_locally() {
        let session = unreachable_backend();
        let err = set_bucket_policy(&session, "demo", "   ").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_set_bucket_acl() {
        let (store, session) = setup().await;
        let acl = set_bucket_acl(&session, "demo", "public-read").await.unwrap();
        assert_eq!(acl, CannedAcl::PublicRead);
        assert_eq!(store.bucket_acl("demo"), Some(CannedAcl::PublicRead));
    }

    #[tokio::test]
    async fn test_invalid_acl_rejected_without_backend_call() {
        let session = unreachable_backend();
        let err = set_bucket_acl(&session, "demo", "everyone-write").await.unwrap_err();
        assert!(matches!(err, Error::InvalidAcl(ref v) if v == "everyone-write"));
    }

    #[tokio::test]
    async fn test_acl_passes_parsed_value_to_backend() {
        let mut mock = MockObjectStore::new();
        mock.expect_region().return_const("us-east-1".to_string());
        mock.expect_put_bucket_acl()
            .withf(|bucket, acl| {
                bucket.to_string() == "demo" && acl.as_str() == "log-delivery-write"
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let session = Session::new(Box::new(mock));

        set_bucket_acl(&session, "demo", "log-delivery-write").await.unwrap();
    }

    #[tokio::test]
    async fn test_presigned_url_converts_minutes() {
        let (store, session) = setup().await;
        store
            .put_object(&RemotePath::new("demo", "a.txt"), b"a".to_vec(), None)
            .await
            .unwrap();

        let url = presigned_url(&session, "a.txt", 15).await.unwrap();
        assert_eq!(url.expires_in, Duration::from_secs(900));
        assert!(url.url.contains("expires=900"));
    }

    #[tokio::test]
    async fn test_presigned_url_duration_bounds() {
        let session = unreachable_backend();
        assert!(matches!(presigned_url(&session, "a.txt", 0).await, Err(Error::Validation(_))));
        assert!(matches!(
            presigned_url(&session, "a.txt", MAX_PRESIGN_MINUTES + 1).await,
            Err(Error::Validation(_))
        ));
    }
}
