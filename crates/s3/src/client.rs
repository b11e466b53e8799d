//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from s3i-core.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketCannedAcl, BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier,
};
use aws_smithy_types::DateTime;
use tokio::io::AsyncWriteExt;

use s3i_core::{
    CannedAcl, DeleteResult, Error, ListOptions, ListResult, ObjectInfo, ObjectStore, Profile,
    RemotePath, Result,
};

/// Region S3 treats as the default; buckets there carry no location constraint
const DEFAULT_REGION: &str = "us-east-1";

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    profile: Profile,
}

impl S3Client {
    /// Create a new S3 client from a connection profile
    pub async fn new(profile: Profile) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(profile.region.clone()));

        // Without static credentials the SDK's default provider chain applies
        if let Some(creds) = &profile.credentials {
            let credentials = aws_credential_types::Credentials::new(
                creds.access_key.clone(),
                creds.secret_key.clone(),
                None, // session token
                None, // expiry
                "s3interact-static-credentials",
            );
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint) = &profile.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(profile.force_path_style)
            .build();

        tracing::debug!(
            region = %profile.region,
            endpoint = profile.endpoint.as_deref().unwrap_or("default"),
            static_credentials = profile.credentials.is_some(),
            "S3 client created"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            profile,
        })
    }
}

/// Convert an SDK failure into a core error, keeping the service error code
fn map_sdk_error<E>(err: SdkError<E, HttpResponse>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    if let Some(code) = err.code() {
        let message = err.message().unwrap_or(code).to_string();
        return Error::service(code, message);
    }

    // HEAD responses carry no body, so no code; fall back to the status.
    let detail = DisplayErrorContext(&err).to_string();
    match err.raw_response().map(|r| r.status().as_u16()) {
        Some(404) => Error::service("NotFound", detail),
        Some(403) => Error::service("AccessDenied", detail),
        _ => Error::Network(detail),
    }
}

fn to_timestamp(dt: &DateTime) -> Option<jiff::Timestamp> {
    jiff::Timestamp::new(dt.secs(), dt.subsec_nanos() as i32).ok()
}

fn trim_etag(etag: &str) -> String {
    etag.trim_matches('"').to_string()
}

#[async_trait]
impl ObjectStore for S3Client {
    fn region(&self) -> String {
        self.profile.region.clone()
    }

    async fn reconnect(&self, region: &str) -> Result<Box<dyn ObjectStore>> {
        let client = S3Client::new(self.profile.in_region(region)?).await?;
        Ok(Box::new(client))
    }

    async fn list_buckets(&self) -> Result<Vec<ObjectInfo>> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(map_sdk_error)?;

        let buckets = response
            .buckets()
            .iter()
            .map(|b| {
                let mut info = ObjectInfo::bucket(b.name().unwrap_or_default());
                info.last_modified = b.creation_date().and_then(to_timestamp);
                info
            })
            .collect();

        Ok(buckets)
    }

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListResult> {
        let mut request = self.inner.list_objects_v2().bucket(bucket);

        if let Some(prefix) = options.prefix {
            request = request.prefix(prefix);
        }

        if let Some(max) = options.max_keys {
            request = request.max_keys(max);
        }

        if let Some(token) = options.continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(map_sdk_error)?;

        let items = response
            .contents()
            .iter()
            .map(|object| {
                let mut info =
                    ObjectInfo::file(object.key().unwrap_or_default(), object.size().unwrap_or(0));
                info.last_modified = object.last_modified().and_then(to_timestamp);
                info.etag = object.e_tag().map(trim_etag);
                info
            })
            .collect();

        Ok(ListResult {
            items,
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(|s| s.to_string()),
        })
    }

    async fn head_object(&self, path: &RemotePath) -> Result<ObjectInfo> {
        let response = self
            .inner
            .head_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let mut info = ObjectInfo::file(&path.key, response.content_length().unwrap_or(0));
        info.last_modified = response.last_modified().and_then(to_timestamp);
        info.etag = response.e_tag().map(trim_etag);
        info.content_type = response.content_type().map(|ct| ct.to_string());

        Ok(info)
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        let mut request = self.inner.create_bucket().bucket(bucket);

        if self.profile.region != DEFAULT_REGION {
            let configuration = CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(self.profile.region.as_str()))
                .build();
            request = request.create_bucket_configuration(configuration);
        }

        request.send().await.map_err(map_sdk_error)?;
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.inner
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }

    async fn bucket_location(&self, bucket: &str) -> Result<Option<String>> {
        let response = self
            .inner
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(response
            .location_constraint()
            .map(|l| l.as_str().to_string())
            .filter(|l| !l.is_empty()))
    }

    async fn download_to(&self, path: &RemotePath, local: &Path) -> Result<u64> {
        let response = self
            .inner
            .get_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let mut body = response.body;
        let mut file = tokio::fs::File::create(local).await?;
        let mut written = 0u64;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| Error::Network(e.to_string()))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    async fn put_object(
        &self,
        path: &RemotePath,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        let size = data.len() as i64;

        let response = self
            .inner
            .put_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .body(ByteStream::from(data))
            .set_content_type(content_type.clone())
            .send()
            .await
            .map_err(map_sdk_error)?;

        let mut info = ObjectInfo::file(&path.key, size);
        info.etag = response.e_tag().map(trim_etag);
        info.content_type = content_type;
        info.last_modified = Some(jiff::Timestamp::now());

        Ok(info)
    }

    async fn upload_from(
        &self,
        path: &RemotePath,
        local: &Path,
        content_type: Option<String>,
    ) -> Result<ObjectInfo> {
        let size = tokio::fs::metadata(local).await?.len() as i64;
        let body = ByteStream::from_path(local)
            .await
            .map_err(|e| Error::Io(std::io::Error::other(e)))?;

        let response = self
            .inner
            .put_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .body(body)
            .set_content_type(content_type.clone())
            .send()
            .await
            .map_err(map_sdk_error)?;

        let mut info = ObjectInfo::file(&path.key, size);
        info.etag = response.e_tag().map(trim_etag);
        info.content_type = content_type;
        info.last_modified = Some(jiff::Timestamp::now());

        Ok(info)
    }

    async fn delete_object(&self, path: &RemotePath) -> Result<()> {
        self.inner
            .delete_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }

    async fn delete_objects(&self, bucket: &str, keys: Vec<String>) -> Result<DeleteResult> {
        if keys.is_empty() {
            return Ok(DeleteResult::default());
        }

        let objects = keys
            .iter()
            .map(|k| ObjectIdentifier::builder().key(k).build())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::General(e.to_string()))?;

        let delete = Delete::builder()
            .set_objects(Some(objects))
            .build()
            .map_err(|e| Error::General(e.to_string()))?;

        let response = self
            .inner
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let deleted = response
            .deleted()
            .iter()
            .filter_map(|d| d.key().map(|k| k.to_string()))
            .collect();

        let failed: Vec<(String, String)> = response
            .errors()
            .iter()
            .map(|e| {
                let key = e.key().unwrap_or_default().to_string();
                let reason = e.code().or(e.message()).unwrap_or("unknown error").to_string();
                (key, reason)
            })
            .collect();

        if !failed.is_empty() {
            tracing::warn!("Failed to delete some objects: {:?}", failed);
        }

        Ok(DeleteResult { deleted, failed })
    }

    async fn copy_object(&self, src: &RemotePath, dst: &RemotePath) -> Result<()> {
        self.inner
            .copy_object()
            .copy_source(src.copy_source())
            .bucket(&dst.bucket)
            .key(&dst.key)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }

    async fn get_bucket_policy(&self, bucket: &str) -> Result<String> {
        let response = self
            .inner
            .get_bucket_policy()
            .bucket(bucket)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(response.policy().unwrap_or_default().to_string())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()> {
        self.inner
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }

    async fn delete_bucket_policy(&self, bucket: &str) -> Result<()> {
        self.inner
            .delete_bucket_policy()
            .bucket(bucket)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }

    async fn put_bucket_acl(&self, bucket: &str, acl: CannedAcl) -> Result<()> {
        self.inner
            .put_bucket_acl()
            .bucket(bucket)
            .acl(BucketCannedAcl::from(acl.as_str()))
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }

    async fn presign_get(&self, path: &RemotePath, expires_in: Duration) -> Result<String> {
        let config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| Error::Validation(format!("invalid presign duration: {e}")))?;

        let request = self
            .inner
            .get_object()
            .bucket(&path.bucket)
            .key(&path.key)
            .presigned(config)
            .await
            .map_err(map_sdk_error)?;

        Ok(request.uri().to_string())
    }
}
