//! Upload stage for textshot
//!
//! Pushes the written image to an object store bucket under its base file
//! name. Configuration comes from the environment and is checked before
//! anything else happens, so a missing variable costs no rendering work
//! and no network traffic.

mod config;
mod s3;

pub use config::{
    UploadConfig, ACCESS_KEY_VAR, BUCKET_VAR, ENDPOINT_VAR, REGION_VAR, REQUIRED_VARS,
    SECRET_KEY_VAR,
};
pub use s3::S3Store;

use std::fs;
use std::path::Path;

use textshot_core::error::{Result, UploadError};

/// A bucket that accepts whole objects in one request
pub trait ObjectStore {
    /// Bucket the objects land in
    fn bucket(&self) -> &str;

    /// Stores `body` under `key`, replacing any existing object
    fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;
}

/// Uploads the file at `path` under its base name and returns that key
pub fn upload_file(store: &dyn ObjectStore, path: &Path, content_type: &str) -> Result<String> {
    let key = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| UploadError::ReadFailed {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        })?;

    let body = fs::read(path).map_err(|source| UploadError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;

    store.put_object(&key, body, content_type)?;
    log::info!("Image uploaded to bucket {} as {}", store.bucket(), key);
    Ok(key)
}
