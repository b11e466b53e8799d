//! Connection profile
//!
//! Everything needed to build a backend client: credentials entered at
//! startup, the region, and the optional endpoint override. Profiles live
//! only in memory for the lifetime of the process.

use crate::config::Config;
use crate::error::{Error, Result};

/// Static access key pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Connection details for one backend client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Static credentials; `None` defers to the SDK's default chain
    pub credentials: Option<Credentials>,

    /// Region
    pub region: String,

    /// Custom S3-compatible endpoint URL
    pub endpoint: Option<String>,

    /// Use path-style bucket addressing
    pub force_path_style: bool,
}

impl Profile {
    /// Create a profile for `region` with default credentials and endpoint
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            credentials: None,
            region: region.into(),
            endpoint: None,
            force_path_style: false,
        }
    }

    /// Seed a profile from the connection section of the config
    pub fn from_config(config: &Config) -> Self {
        Self {
            credentials: None,
            region: config.defaults.region.clone(),
            endpoint: config.connection.endpoint.clone(),
            force_path_style: config.connection.force_path_style,
        }
    }

    /// Use a static key pair. Blank keys fall back to the default chain.
    pub fn with_credentials(mut self, access_key: &str, secret_key: &str) -> Self {
        let access_key = access_key.trim();
        self.credentials = if access_key.is_empty() {
            None
        } else {
            Some(Credentials {
                access_key: access_key.to_string(),
                secret_key: secret_key.trim().to_string(),
            })
        };
        self
    }

    /// Point the profile at a custom endpoint
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self> {
        url::Url::parse(endpoint)?;
        self.endpoint = Some(endpoint.to_string());
        Ok(self)
    }

    /// Copy of this profile in another region
    pub fn in_region(&self, region: &str) -> Result<Self> {
        let region = region.trim();
        if region.is_empty() {
            return Err(Error::Validation("Region cannot be empty".into()));
        }
        Ok(Self {
            region: region.to_string(),
            ..self.clone()
        })
    }
}
