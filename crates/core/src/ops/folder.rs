//! Folder emulation with zero-byte marker objects

use super::{delete_keys, list_all};
use crate::error::{Error, Result};
use crate::path::{RemotePath, folder_prefix};
use crate::session::Session;

fn check_folder_name(folder: &str) -> Result<&str> {
    let folder = folder.trim().trim_end_matches('/');
    if folder.is_empty() {
        return Err(Error::Validation("Folder name cannot be empty".into()));
    }
    Ok(folder)
}

/// Create `folder/` in the active bucket; returns the marker key
pub async fn create_folder(session: &Session, folder: &str) -> Result<String> {
    let bucket = session.require_bucket()?;
    let marker = RemotePath::folder(bucket, check_folder_name(folder)?);
    tracing::debug!(bucket, key = %marker.key, "put folder marker");
    session.store().put_object(&marker, Vec::new(), None).await?;
    Ok(marker.key)
}

/// Delete every object under `folder/`, then the marker itself
///
/// Returns how many objects were removed, the marker included when it was
/// listed.
pub async fn delete_folder(session: &Session, folder: &str) -> Result<usize> {
    let bucket = session.require_bucket()?;
    let folder = check_folder_name(folder)?;
    let store = session.store();
    let prefix = folder_prefix(folder);

    tracing::debug!(bucket, %prefix, "list folder contents");
    let keys: Vec<String> = list_all(store, bucket, Some(prefix.clone()))
        .await?
        .into_iter()
        .map(|info| info.key)
        .collect();

    let deleted = if keys.is_empty() {
        0
    } else {
        delete_keys(store, bucket, keys).await?
    };

    // Marker goes last, whether or not the listing returned it.
    store.delete_object(&RemotePath::new(bucket, prefix)).await?;
    Ok(deleted)
}
