//! Object keys, folder markers and operator list parsing
//!
//! Folders do not exist in the object store. A folder is emulated by a
//! zero-byte object whose key ends in `/`, and "folder contents" are the
//! objects whose keys start with that prefix.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Key separator used for folder emulation
pub const SEPARATOR: char = '/';

/// A location inside the object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    /// Bucket name
    pub bucket: String,
    /// Object key (empty for bucket root)
    pub key: String,
    /// Whether the key denotes a folder marker or prefix
    pub is_dir: bool,
}

impl RemotePath {
    /// Create a new RemotePath
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        let key = key.into();
        let is_dir = key.ends_with(SEPARATOR) || key.is_empty();
        Self {
            bucket: bucket.into(),
            key,
            is_dir,
        }
    }

    /// Path of the folder marker object for `folder` in `bucket`
    pub fn folder(bucket: impl Into<String>, folder: &str) -> Self {
        Self::new(bucket, folder_prefix(folder))
    }

    /// `bucket/key` with each key segment percent-encoded, as the
    /// copy-object source header expects
    pub fn copy_source(&self) -> String {
        let key = self
            .key
            .split(SEPARATOR)
            .map(urlencoding::encode)
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{key}", self.bucket)
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.key.is_empty() {
            write!(f, "{}", self.bucket)
        } else {
            write!(f, "{}/{}", self.bucket, self.key)
        }
    }
}

/// Prefix (and marker key) for a folder name: `photos` -> `photos/`
pub fn folder_prefix(folder: &str) -> String {
    format!("{}{SEPARATOR}", folder.trim_end_matches(SEPARATOR))
}

/// Join a folder and an entry name: `("a", "b.txt")` -> `a/b.txt`
pub fn join_key(folder: &str, name: &str) -> String {
    let folder = folder.trim_end_matches(SEPARATOR);
    let name = name.trim_start_matches(SEPARATOR);
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{folder}{SEPARATOR}{name}")
    }
}

/// Move `key` from under `source/` to under `destination/`
///
/// Only the leading prefix is rewritten. Returns `None` when the key does
/// not live under `source/`.
pub fn rebase_key(key: &str, source: &str, destination: &str) -> Option<String> {
    let rest = key.strip_prefix(&folder_prefix(source))?;
    Some(format!("{}{rest}", folder_prefix(destination)))
}

/// Split a comma-separated operator list, trimming entries and dropping blanks
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `key:path,key:path` into ordered pairs
///
/// The first `:` in each pair separates the key from the destination path.
pub fn parse_download_pairs(input: &str) -> Result<Vec<(String, PathBuf)>> {
    let mut pairs = Vec::new();
    for entry in split_list(input) {
        let (key, path) = entry
            .split_once(':')
            .map(|(k, p)| (k.trim(), p.trim()))
            .filter(|(k, p)| !k.is_empty() && !p.is_empty())
            .ok_or_else(|| {
                Error::Validation(format!("expected key:path, got '{entry}'"))
            })?;
        pairs.push((key.to_string(), PathBuf::from(path)));
    }
    if pairs.is_empty() {
        return Err(Error::Validation("no key:path pairs given".into()));
    }
    Ok(pairs)
}

/// Check a bucket name against the backend's naming rules
pub fn validate_bucket_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Validation("Bucket name cannot be empty".into()));
    }
    if name.len() < 3 || name.len() > 63 {
        return Err(Error::Validation(
            "Bucket name must be between 3 and 63 characters".into(),
        ));
    }
    let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.';
    if !name.chars().all(allowed) {
        return Err(Error::Validation(format!(
            "Bucket name '{name}' may only contain lowercase letters, digits, '.' and '-'"
        )));
    }
    let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    if !edge_ok(name.chars().next()) || !edge_ok(name.chars().last()) {
        return Err(Error::Validation(format!(
            "Bucket name '{name}' must start and end with a letter or digit"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_path_dir_detection() {
        assert!(RemotePath::new("bucket", "photos/").is_dir);
        assert!(RemotePath::new("bucket", "").is_dir);
        assert!(!RemotePath::new("bucket", "photos/cat.png").is_dir);
    }

    #[test]
    fn test_folder_marker() {
        let marker = RemotePath::folder("bucket", "photos");
        assert_eq!(marker.key, "photos/");
        assert!(marker.is_dir);
        assert_eq!(folder_prefix("photos/"), "photos/");
    }

    #[test]
    fn test_display_and_copy_source() {
        let path = RemotePath::new("bucket", "a/b.txt");
        assert_eq!(path.to_string(), "bucket/a/b.txt");
        assert_eq!(path.copy_source(), "bucket/a/b.txt");
        assert_eq!(RemotePath::new("bucket", "").to_string(), "bucket");
    }

    #[test]
    fn test_copy_source_encodes_key_segments() {
        let path = RemotePath::new("bucket", "dir one/100% a?b#c+d.txt");
        assert_eq!(
            path.copy_source(),
            "bucket/dir%20one/100%25%20a%3Fb%23c%2Bd.txt"
        );
        assert_eq!(
            RemotePath::new("bucket", "caf\u{e9}.txt").copy_source(),
            "bucket/caf%C3%A9.txt"
        );
    }

    #[test]
    fn test_join_key() {
        assert_eq!(join_key("docs", "a.txt"), "docs/a.txt");
        assert_eq!(join_key("docs/", "/a.txt"), "docs/a.txt");
        assert_eq!(join_key("", "a.txt"), "a.txt");
    }

    #[test]
    fn test_rebase_key_only_rewrites_leading_prefix() {
        assert_eq!(
            rebase_key("logs/2024/logs.txt", "logs", "archive"),
            Some("archive/2024/logs.txt".to_string())
        );
        assert_eq!(rebase_key("logs/", "logs", "archive"), Some("archive/".to_string()));
        assert_eq!(rebase_key("logsx/a.txt", "logs", "archive"), None);
        assert_eq!(rebase_key("other/logs/a.txt", "logs", "archive"), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a.txt, b.txt ,,c.txt "), vec!["a.txt", "b.txt", "c.txt"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_parse_download_pairs_keeps_order() {
        let pairs = parse_download_pairs("b.txt:/tmp/b, a.txt:/tmp/a").unwrap();
        assert_eq!(pairs[0], ("b.txt".to_string(), PathBuf::from("/tmp/b")));
        assert_eq!(pairs[1], ("a.txt".to_string(), PathBuf::from("/tmp/a")));
    }

    #[test]
    fn test_parse_download_pairs_splits_on_first_colon() {
        let pairs = parse_download_pairs("report.pdf:C:\\out\\report.pdf").unwrap();
        assert_eq!(pairs[0].1, PathBuf::from("C:\\out\\report.pdf"));
    }

    #[test]
    fn test_parse_download_pairs_rejects_malformed() {
        assert!(parse_download_pairs("a.txt:/tmp/a,b.txt").is_err());
        assert!(parse_download_pairs(":/tmp/a").is_err());
        assert!(parse_download_pairs("").is_err());
    }

    #[test]
    fn test_validate_bucket_name() {
        assert!(validate_bucket_name("demo").is_ok());
        assert!(validate_bucket_name("s3interact-demo.logs").is_ok());
        assert!(validate_bucket_name("ab").is_err());
        assert!(validate_bucket_name("").is_err());
        assert!(validate_bucket_name("Demo").is_err());
        assert!(validate_bucket_name("-demo").is_err());
        assert!(validate_bucket_name("demo_bucket").is_err());
        assert!(validate_bucket_name(&"a".repeat(64)).is_err());
    }
}
