//! Menu actions for bucket policy, canned ACLs and pre-signed URLs

use std::io::Write;

use s3i_core::ops;
use tokio::io::AsyncBufRead;

use super::shell::{Flow, Shell};

/// Pretty-print a policy document when it is valid JSON
fn pretty_policy(policy: &str) -> String {
    serde_json::from_str::<serde_json::Value>(policy)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| policy.to_string())
}

impl<R: AsyncBufRead + Unpin, W: Write> Shell<R, W> {
    pub(super) async fn set_bucket_policy(&mut self) -> Flow {
        let Some(bucket) = self.ask_bucket().await? else {
            return Ok(());
        };
        let policy = self.ask("Enter policy JSON: ").await?;

        match ops::set_bucket_policy(&self.session, &bucket, &policy).await {
            Ok(()) => self.out.success(&format!("Bucket policy set on '{bucket}'")),
            Err(e) => self.report("Error setting bucket policy", &e),
        }
        Ok(())
    }

    pub(super) async fn get_bucket_policy(&mut self) -> Flow {
        let Some(bucket) = self.ask_bucket().await? else {
            return Ok(());
        };

        match ops::get_bucket_policy(&self.session, &bucket).await {
            Ok(policy) => self.out.println(&pretty_policy(&policy)),
            Err(e) if e.code() == Some("NoSuchBucketPolicy") => {
                self.out.println(&format!("Bucket '{bucket}' has no policy"));
            }
            Err(e) => self.report("Error getting bucket policy", &e),
        }
        Ok(())
    }

    pub(super) async fn delete_bucket_policy(&mut self) -> Flow {
        let Some(bucket) = self.ask_bucket().await? else {
            return Ok(());
        };

        match ops::delete_bucket_policy(&self.session, &bucket).await {
            Ok(()) => self.out.success(&format!("Bucket policy deleted from '{bucket}'")),
            Err(e) => self.report("Error deleting bucket policy", &e),
        }
        Ok(())
    }

    pub(super) async fn set_bucket_acl(&mut self) -> Flow {
        let Some(bucket) = self.ask_bucket().await? else {
            return Ok(());
        };
        let acl = self.ask("Enter ACL (e.g., private, public-read): ").await?;

        match ops::set_bucket_acl(&self.session, &bucket, &acl).await {
            Ok(acl) => self.out.success(&format!("Bucket ACL of '{bucket}' set to {acl}")),
            Err(e) => self.report("Error setting bucket ACL", &e),
        }
        Ok(())
    }

    pub(super) async fn presigned_url(&mut self) -> Flow {
        let key = self.ask("Enter object name: ").await?;
        let minutes = self.ask("Enter pre-signed URL duration in minutes: ").await?;
        let minutes: u64 = match minutes.parse() {
            Ok(m) => m,
            Err(e) => {
                self.out.error(&format!("Error parsing duration '{minutes}': {e}"));
                return Ok(());
            }
        };

        match ops::presigned_url(&self.session, &key, minutes).await {
            Ok(presigned) => {
                self.out.success(&format!(
                    "Pre-signed URL for '{key}' (valid for {minutes} minutes):"
                ));
                self.out.println(&presigned.url);
            }
            Err(e) => self.report("Error generating pre-signed URL", &e),
        }
        Ok(())
    }
}
