//! Upload settings read from the environment

use std::fmt;

use textshot_core::error::{Result, UploadError};

pub const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const BUCKET_VAR: &str = "AWS_BUCKET_NAME";
pub const REGION_VAR: &str = "AWS_REGION";
/// Optional, for S3-compatible stores
pub const ENDPOINT_VAR: &str = "AWS_ENDPOINT_URL";

/// Variables that must all be present before an upload is attempted
pub const REQUIRED_VARS: [&str; 4] = [ACCESS_KEY_VAR, SECRET_KEY_VAR, BUCKET_VAR, REGION_VAR];

/// Credentials and destination for the upload
#[derive(Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
}

impl UploadConfig {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`
    ///
    /// Unset and empty variables count as missing; every missing required
    /// name is reported in one error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let values: Vec<Option<String>> = REQUIRED_VARS.iter().map(|&name| get(name)).collect();
        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(UploadError::MissingEnv(missing).into());
        }

        let mut values = values.into_iter().flatten();
        let mut next = || values.next().unwrap_or_default();
        Ok(Self {
            access_key_id: next(),
            secret_access_key: next(),
            bucket: next(),
            region: next(),
            endpoint: get(ENDPOINT_VAR),
        })
    }
}

// Keeps the secret out of logs
impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}
