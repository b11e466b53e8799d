//! Upload and download between the local filesystem and the active bucket

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::BatchReport;
use crate::error::{Error, Result};
use crate::path::{RemotePath, parse_download_pairs, split_list};
use crate::session::Session;
use crate::traits::ObjectInfo;

/// Upload one local file
///
/// The object key is `key` when given, otherwise the file name.
pub async fn upload_file(session: &Session, local: &Path, key: Option<&str>) -> Result<ObjectInfo> {
    let bucket = session.require_bucket()?;
    let key = match key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(k) => k.to_string(),
        None => default_key(local)?,
    };

    let content_type = mime_guess::from_path(local)
        .first()
        .map(|m| m.essence_str().to_string());

    let target = RemotePath::new(bucket, key);
    tracing::debug!(bucket, key = %target.key, path = %local.display(), "put object");
    session.store().upload_from(&target, local, content_type).await
}

/// Upload every file in a comma-separated list
///
/// Entries may be glob patterns. A missing file or a pattern that matches
/// nothing fails that entry only; the rest are still uploaded. A file whose
/// name was already uploaded earlier in the batch fails instead of
/// overwriting that object.
pub async fn upload_files(session: &Session, paths: &str) -> Result<BatchReport<ObjectInfo>> {
    session.require_bucket()?;
    let entries = split_list(paths);
    if entries.is_empty() {
        return Err(Error::Validation("No file paths given".into()));
    }

    let mut report = BatchReport::new();
    let mut uploaded = HashSet::new();
    for entry in entries {
        let files = match expand(&entry) {
            Ok(files) => files,
            Err(e) => {
                report.push(entry, Err(e));
                continue;
            }
        };
        for file in files {
            let result = match default_key(&file) {
                Ok(key) if uploaded.contains(&key) => Err(Error::Validation(format!(
                    "'{}' would overwrite '{key}' uploaded earlier in this batch",
                    file.display()
                ))),
                Ok(key) => {
                    let result = upload_file(session, &file, Some(&key)).await;
                    if result.is_ok() {
                        uploaded.insert(key);
                    }
                    result
                }
                Err(e) => Err(e),
            };
            if let Err(e) = &result {
                tracing::warn!(path = %file.display(), error = %e, "upload failed");
            }
            report.push(file.display().to_string(), result);
        }
    }
    Ok(report)
}

/// Download one object to `destination`, returning the bytes written
///
/// When `destination` is an existing directory the key's last segment is
/// used as the file name. Missing parent directories are created.
pub async fn download_file(session: &Session, key: &str, destination: &Path) -> Result<u64> {
    let bucket = session.require_bucket()?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::Validation("Object key cannot be empty".into()));
    }

    let source = RemotePath::new(bucket, key);
    let target = if destination.is_dir() {
        destination.join(key.rsplit('/').next().unwrap_or(key))
    } else {
        destination.to_path_buf()
    };
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    tracing::debug!(bucket, key, path = %target.display(), "get object");
    session.store().download_to(&source, &target).await
}

/// Download every `key:path` pair in order
pub async fn download_files(session: &Session, pairs: &str) -> Result<BatchReport<u64>> {
    session.require_bucket()?;
    let pairs = parse_download_pairs(pairs)?;

    let mut report = BatchReport::new();
    for (key, path) in pairs {
        let result = download_file(session, &key, &path).await;
        if let Err(e) = &result {
            tracing::warn!(%key, path = %path.display(), error = %e, "download failed");
        }
        report.push(format!("{key} -> {}", path.display()), result);
    }
    Ok(report)
}

fn default_key(local: &Path) -> Result<String> {
    local
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::Validation(format!("'{}' does not name a file", local.display()))
        })
}

fn is_pattern(entry: &str) -> bool {
    entry.contains(['*', '?', '['])
}

/// Resolve one list entry to the files it names
fn expand(entry: &str) -> Result<Vec<PathBuf>> {
    if !is_pattern(entry) {
        return Ok(vec![PathBuf::from(entry)]);
    }

    let matches = glob::glob(entry)
        .map_err(|e| Error::Validation(format!("Invalid pattern '{entry}': {e}")))?;
    let mut files = Vec::new();
    for path in matches {
        let path = path.map_err(|e| Error::Io(e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(Error::Validation(format!("No files match '{entry}'")));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::traits::ObjectStore as _;
    use tempfile::TempDir;

    async fn setup() -> (MemoryStore, Session) {
        let store = MemoryStore::new("us-east-1");
        store.create_bucket("demo").await.unwrap();
        let mut session = Session::new(Box::new(store.clone()));
        session.select_bucket("demo");
        (store, session)
    }

    #[tokio::test]
    async fn test_upload_file_uses_file_name_and_guesses_type() {
        let (store, session) = setup().await;
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("report.json");
        std::fs::write(&file, b"{}").unwrap();

        let info = upload_file(&session, &file, None).await.unwrap();
        assert_eq!(info.key, "report.json");
        assert_eq!(info.size_bytes, Some(2));

        let head = store.head_object(&RemotePath::new("demo", "report.json")).await.unwrap();
        assert_eq!(head.content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_upload_file_with_explicit_key() {
        let (store, session) = setup().await;
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"hello").unwrap();

        upload_file(&session, &file, Some("docs/a.txt")).await.unwrap();
        assert_eq!(store.keys("demo"), vec!["docs/a.txt"]);
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let (_store, session) = setup().await;
        let err = upload_file(&session, Path::new("/definitely/not/here.txt"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_upload_files_continues_past_missing_file() {
        let (store, session) = setup().await;
        let dir = TempDir::new().unwrap();
        let mut list = Vec::new();
        for name in ["one.txt", "two.txt", "three.txt"] {
            let path = dir.path().join(name);
            std::fs::write(&path, name).unwrap();
            list.push(path.display().to_string());
        }
        list.insert(1, dir.path().join("missing.txt").display().to_string());

        let report = upload_files(&session, &list.join(", ")).await.unwrap();
        assert_eq!(report.items.len(), 4);
        assert_eq!(report.success_count(), 3);
        assert_eq!(report.failure_count(), 1);
        assert!(report.failed().next().unwrap().0.ends_with("missing.txt"));
        assert_eq!(store.keys("demo"), vec!["one.txt", "three.txt", "two.txt"]);
    }

    #[tokio::test]
    async fn test_upload_files_expands_globs() {
        let (store, session) = setup().await;
        let dir = TempDir::new().unwrap();
        for name in ["a.log", "b.log", "c.txt"] {
            std::fs::write(dir.path().join(name), name).unwrap();
        }
        let pattern = format!("{}/*.log", dir.path().display());
        let nothing = format!("{}/*.csv", dir.path().display());

        let report = upload_files(&session, &format!("{pattern},{nothing}")).await.unwrap();
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(store.keys("demo"), vec!["a.log", "b.log"]);
    }

    #[tokio::test]
    async fn test_upload_files_refuses_to_overwrite_same_name() {
        let (store, session) = setup().await;
        let dir = TempDir::new().unwrap();
        let mut list = Vec::new();
        for (folder, body) in [("docs", "DOCS"), ("img", "IMG")] {
            std::fs::create_dir(dir.path().join(folder)).unwrap();
            let path = dir.path().join(folder).join("a.txt");
            std::fs::write(&path, body).unwrap();
            list.push(path.display().to_string());
        }

        let report = upload_files(&session, &list.join(",")).await.unwrap();
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failure_count(), 1);
        let (failed, err) = report.failed().next().unwrap();
        assert!(failed.contains("img"));
        assert!(matches!(err, Error::Validation(_)));

        assert_eq!(store.keys("demo"), vec!["a.txt"]);
        let data = store.contents(&RemotePath::new("demo", "a.txt")).unwrap();
        assert_eq!(data, b"DOCS");
    }

    #[tokio::test]
    async fn test_upload_files_rejects_empty_list() {
        let (_store, session) = setup().await;
        assert!(matches!(upload_files(&session, " , ").await, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_download_file_creates_parents() {
        let (store, session) = setup().await;
        store
            .put_object(&RemotePath::new("demo", "docs/a.txt"), b"hello".to_vec(), None)
            .await
            .unwrap();
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("nested/out/a.txt");

        let written = download_file(&session, "docs/a.txt", &dest).await.unwrap();
        assert_eq!(written, 5);
        assert_eq!(std::fs::read(&dest).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_download_into_directory_uses_key_name() {
        let (store, session) = setup().await;
        store
            .put_object(&RemotePath::new("demo", "docs/a.txt"), b"hello".to_vec(), None)
            .await
            .unwrap();
        let dir = TempDir::new().unwrap();

        download_file(&session, "docs/a.txt", dir.path()).await.unwrap();
        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_download_missing_key_leaves_no_file() {
        let (_store, session) = setup().await;
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("x.txt");

        let err = download_file(&session, "x.txt", &dest).await.unwrap_err();
        assert_eq!(err.code(), Some("NoSuchKey"));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_files_reports_each_pair() {
        let (store, session) = setup().await;
        store
            .put_object(&RemotePath::new("demo", "a.txt"), b"a".to_vec(), None)
            .await
            .unwrap();
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");

        let report = download_files(
            &session,
            &format!("a.txt:{},b.txt:{}", a.display(), b.display()),
        )
        .await
        .unwrap();
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failure_count(), 1);
        assert!(a.exists());
        assert!(!b.exists());
    }

    #[tokio::test]
    async fn test_download_files_rejects_malformed_input_up_front() {
        let (_store, session) = setup().await;
        let err = download_files(&session, "a.txt").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
