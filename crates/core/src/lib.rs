//! s3i-core: Core library for the s3interact object storage client
//!
//! This crate provides everything that does not depend on a specific SDK:
//! - Configuration and connection profiles
//! - Object keys and folder-marker helpers
//! - The ObjectStore trait and an in-memory implementation
//! - The Session context and the operation functions run from the menu

pub mod acl;
pub mod config;
pub mod error;
pub mod memory;
pub mod ops;
pub mod path;
pub mod profile;
pub mod session;
pub mod traits;

pub use acl::CannedAcl;
pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use path::RemotePath;
pub use profile::{Credentials, Profile};
pub use session::Session;
pub use traits::{DeleteResult, ListOptions, ListResult, ObjectInfo, ObjectStore};
