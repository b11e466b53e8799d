//! Move and rename as copy-then-delete
//!
//! The backend has no rename. Each key is copied to its new name and the
//! source is deleted afterwards. There is no rollback: a failed copy leaves
//! the source untouched, a failed delete leaves both copies in place. The
//! outcome of every key is reported so the caller can retry the cleanup.

use super::list_all;
use crate::error::{Error, Result};
use crate::path::{RemotePath, folder_prefix, join_key, rebase_key, split_list};
use crate::session::Session;
use crate::traits::ObjectStore;

/// What happened to one key
#[derive(Debug)]
pub enum MoveOutcome {
    /// Copied and source deleted
    Moved { from: String, to: String },
    /// Copy failed; nothing changed
    CopyFailed { from: String, to: String, error: Error },
    /// Copy succeeded but the source is still present
    DeleteFailed { from: String, to: String, error: Error },
}

impl MoveOutcome {
    pub fn source(&self) -> &str {
        match self {
            MoveOutcome::Moved { from, .. }
            | MoveOutcome::CopyFailed { from, .. }
            | MoveOutcome::DeleteFailed { from, .. } => from,
        }
    }

    pub fn destination(&self) -> &str {
        match self {
            MoveOutcome::Moved { to, .. }
            | MoveOutcome::CopyFailed { to, .. }
            | MoveOutcome::DeleteFailed { to, .. } => to,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            MoveOutcome::Moved { .. } => None,
            MoveOutcome::CopyFailed { error, .. } | MoveOutcome::DeleteFailed { error, .. } => {
                Some(error)
            }
        }
    }
}

/// Result of moving one folder
#[derive(Debug)]
pub struct FolderMove {
    pub source: String,
    pub destination: String,
    /// Err when the folder could not be listed; nothing was moved then
    pub result: Result<Vec<MoveOutcome>>,
}

impl FolderMove {
    pub fn is_complete(&self) -> bool {
        self.result
            .as_ref()
            .is_ok_and(|outcomes| outcomes.iter().all(MoveOutcome::is_complete))
    }
}

async fn move_key(store: &dyn ObjectStore, bucket: &str, from: String, to: String) -> MoveOutcome {
    let src = RemotePath::new(bucket, from.as_str());
    let dst = RemotePath::new(bucket, to.as_str());

    tracing::debug!(bucket, %from, %to, "copy object");
    if let Err(error) = store.copy_object(&src, &dst).await {
        tracing::warn!(bucket, %from, error = %error, "copy failed");
        return MoveOutcome::CopyFailed { from, to, error };
    }

    tracing::debug!(bucket, key = %from, "delete source object");
    if let Err(error) = store.delete_object(&src).await {
        tracing::warn!(bucket, %from, %to, error = %error, "copied but source not deleted");
        return MoveOutcome::DeleteFailed { from, to, error };
    }

    MoveOutcome::Moved { from, to }
}

fn clean_folder(folder: &str) -> &str {
    folder.trim().trim_matches('/')
}

/// Move the listed files from one folder to another
///
/// `keys` is comma-separated and relative to `source_folder`. An empty
/// folder name means the bucket root.
pub async fn move_files(
    session: &Session,
    source_folder: &str,
    destination_folder: &str,
    keys: &str,
) -> Result<Vec<MoveOutcome>> {
    let bucket = session.require_bucket()?;
    let source_folder = clean_folder(source_folder);
    let destination_folder = clean_folder(destination_folder);
    if source_folder == destination_folder {
        return Err(Error::Validation(
            "Source and destination folders are the same".into(),
        ));
    }
    let names = split_list(keys);
    if names.is_empty() {
        return Err(Error::Validation("No file keys given".into()));
    }

    let mut outcomes = Vec::with_capacity(names.len());
    for name in names {
        let from = join_key(source_folder, &name);
        let to = join_key(destination_folder, &name);
        outcomes.push(move_key(session.store(), bucket, from, to).await);
    }
    Ok(outcomes)
}

/// Give one object a new key
pub async fn rename_file(
    session: &Session,
    original_key: &str,
    new_key: &str,
) -> Result<MoveOutcome> {
    let bucket = session.require_bucket()?;
    let (from, to) = (original_key.trim(), new_key.trim());
    if from.is_empty() || to.is_empty() {
        return Err(Error::Validation("Object keys cannot be empty".into()));
    }
    if from == to {
        return Err(Error::Validation("New key is the same as the original".into()));
    }
    Ok(move_key(session.store(), bucket, from.to_string(), to.to_string()).await)
}

/// Move each source folder to the destination at the same position
///
/// Both lists are comma-separated and must have the same length. Every key
/// under `source/` is rebased under `destination/`, the marker included.
pub async fn move_folders(
    session: &Session,
    sources: &str,
    destinations: &str,
) -> Result<Vec<FolderMove>> {
    let bucket = session.require_bucket()?;
    let pairs = pair_folders(sources, destinations)?;
    let store = session.store();

    let mut moves = Vec::with_capacity(pairs.len());
    for (source, destination) in pairs {
        let result = move_folder(store, bucket, &source, &destination).await;
        if let Err(e) = &result {
            tracing::warn!(bucket, %source, error = %e, "listing folder failed");
        }
        moves.push(FolderMove {
            source,
            destination,
            result,
        });
    }
    Ok(moves)
}

/// Rename folders; same semantics as [`move_folders`]
pub async fn rename_folders(
    session: &Session,
    originals: &str,
    new_names: &str,
) -> Result<Vec<FolderMove>> {
    move_folders(session, originals, new_names).await
}

async fn move_folder(
    store: &dyn ObjectStore,
    bucket: &str,
    source: &str,
    destination: &str,
) -> Result<Vec<MoveOutcome>> {
    let objects = list_all(store, bucket, Some(folder_prefix(source))).await?;

    let mut outcomes = Vec::with_capacity(objects.len());
    for object in objects {
        let Some(to) = rebase_key(&object.key, source, destination) else {
            continue;
        };
        outcomes.push(move_key(store, bucket, object.key, to).await);
    }
    Ok(outcomes)
}

fn pair_folders(sources: &str, destinations: &str) -> Result<Vec<(String, String)>> {
    let sources: Vec<String> = sources.split(',').map(|s| clean_folder(s).to_string()).collect();
    let destinations: Vec<String> = destinations
        .split(',')
        .map(|s| clean_folder(s).to_string())
        .collect();

    if sources.len() != destinations.len() {
        return Err(Error::Validation(format!(
            "The number of source folders ({}) must match the number of destination folders ({})",
            sources.len(),
            destinations.len()
        )));
    }

    let pairs: Vec<(String, String)> = sources.into_iter().zip(destinations).collect();
    for (source, destination) in &pairs {
        if source.is_empty() || destination.is_empty() {
            return Err(Error::Validation("Folder names cannot be empty".into()));
        }
        if source == destination {
            return Err(Error::Validation(format!(
                "Folder '{source}' cannot be moved onto itself"
            )));
        }
    }
    Ok(pairs)
}
