//! Bucket lifecycle, location and listing

use jiff::Timestamp;

use super::list_all;
use crate::error::Result;
use crate::path::validate_bucket_name;
use crate::session::Session;
use crate::traits::ObjectInfo;

/// Location of a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketInfo {
    pub name: String,
    pub location: String,
}

/// One bucket and its objects, as listed
#[derive(Debug)]
pub struct BucketListing {
    pub name: String,
    pub created: Option<Timestamp>,
    /// Listing this bucket can fail on its own without aborting the others
    pub objects: Result<Vec<ObjectInfo>>,
}

/// Create a bucket in the session's region
pub async fn create_bucket(session: &Session, name: &str) -> Result<()> {
    validate_bucket_name(name)?;
    tracing::debug!(bucket = name, region = session.region(), "create bucket");
    session.store().create_bucket(name).await
}

/// Delete an empty bucket; clears it as the active bucket
pub async fn delete_bucket(session: &mut Session, name: &str) -> Result<()> {
    tracing::debug!(bucket = name, "delete bucket");
    session.store().delete_bucket(name).await?;
    session.forget_bucket(name);
    Ok(())
}

/// Where a bucket lives
pub async fn bucket_info(session: &Session, name: &str) -> Result<BucketInfo> {
    tracing::debug!(bucket = name, "get bucket location");
    let location = session
        .store()
        .bucket_location(name)
        .await?
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| "us-east-1".to_string());
    Ok(BucketInfo {
        name: name.to_string(),
        location,
    })
}

/// Every bucket with every object in it
pub async fn list_buckets_and_objects(session: &Session) -> Result<Vec<BucketListing>> {
    let store = session.store();
    let buckets = store.list_buckets().await?;

    let mut listings = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        tracing::debug!(bucket = %bucket.key, "list objects");
        let objects = list_all(store, &bucket.key, None).await;
        if let Err(e) = &objects {
            tracing::warn!(bucket = %bucket.key, error = %e, "listing bucket failed");
        }
        listings.push(BucketListing {
            name: bucket.key,
            created: bucket.last_modified,
            objects,
        });
    }
    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::memory::MemoryStore;
    use crate::path::RemotePath;
    use crate::traits::{MockObjectStore, ObjectStore as _};

    fn session(store: &MemoryStore) -> Session {
        Session::new(Box::new(store.clone()))
    }

    #[tokio::test]
    async fn test_create_then_create_again_fails() {
        let store = MemoryStore::new("us-east-1");
        let session = session(&store);

        create_bucket(&session, "demo").await.unwrap();
        let err = create_bucket(&session, "demo").await.unwrap_err();
        assert_eq!(err.code(), Some("BucketAlreadyExists"));
    }

    #[tokio::test]
    async fn test_delete_then_delete_again_fails() {
        let store = MemoryStore::new("us-east-1");
        let mut session = session(&store);
        create_bucket(&session, "demo").await.unwrap();
        session.select_bucket("demo");

        delete_bucket(&mut session, "demo").await.unwrap();
        assert!(store.list_buckets().await.unwrap().is_empty());
        assert!(session.bucket().is_none());

        let err = delete_bucket(&mut session, "demo").await.unwrap_err();
        assert_eq!(err.code(), Some("NoSuchBucket"));
    }

    #[tokio::test]
    async fn test_invalid_bucket_name_never_reaches_backend() {
        // No expectations: any backend call panics.
        let mut mock = MockObjectStore::new();
        mock.expect_region().return_const("us-east-1".to_string());
        let session = Session::new(Box::new(mock));

        let err = create_bucket(&session, "Not_Valid").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_bucket_info_defaults_to_us_east_1() {
        let store = MemoryStore::new("us-east-1");
        let session = session(&store);
        create_bucket(&session, "demo").await.unwrap();

        let info = bucket_info(&session, "demo").await.unwrap();
        assert_eq!(info.location, "us-east-1");

        let err = bucket_info(&session, "missing").await.unwrap_err();
        assert_eq!(err.code(), Some("NoSuchBucket"));
    }

    #[tokio::test]
    async fn test_list_buckets_and_objects_nests_objects() {
        let store = MemoryStore::new("us-east-1");
        let session = session(&store);
        create_bucket(&session, "alpha").await.unwrap();
        create_bucket(&session, "beta").await.unwrap();
        store
            .put_object(&RemotePath::new("alpha", "a.txt"), b"a".to_vec(), None)
            .await
            .unwrap();

        let listings = list_buckets_and_objects(&session).await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].name, "alpha");
        let alpha = listings[0].objects.as_ref().unwrap();
        assert_eq!(alpha.len(), 1);
        assert_eq!(alpha[0].key, "a.txt");
        assert!(listings[1].objects.as_ref().unwrap().is_empty());
    }
}
