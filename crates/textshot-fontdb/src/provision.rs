// this_file: crates/textshot-fontdb/src/provision.rs

//! Download-once font cache.
//!
//! The font lives at a fixed cache path. When the file is missing it is
//! fetched from a fixed URL, validated, and written next to its final
//! location before being renamed into place. The cache is never refreshed;
//! delete the file to force a new download.

use std::fs;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use textshot_core::error::{FontLoadError, Result};
use textshot_core::traits::FontRef as _;

use crate::Font;

/// Where the default monospace font is downloaded from
pub const DEFAULT_FONT_URL: &str = "https://github.com/chrissimpkins/codeface/raw/master/fonts/liberation-mono/LiberationMono-Regular.ttf";

/// File name of the cached default font inside the temp directory
pub const DEFAULT_FONT_FILE: &str = "LiberationMono-Regular.ttf";

/// Maximum font download size (50MB) to prevent resource exhaustion.
pub const MAX_FONT_SIZE: u64 = 50 * 1024 * 1024;

/// Where to fetch the font from and where to keep it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSource {
    pub url: String,
    pub cache_path: PathBuf,
}

impl Default for FontSource {
    fn default() -> Self {
        Self {
            url: DEFAULT_FONT_URL.to_string(),
            cache_path: std::env::temp_dir().join(DEFAULT_FONT_FILE),
        }
    }
}

/// Fetches font bytes over the network
pub trait FontFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Blocking HTTP fetcher backed by `ureq`
pub struct UreqFetcher {
    agent: ureq::Agent,
}

impl UreqFetcher {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for UreqFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FontFetcher for UreqFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let failed = |reason: String| FontLoadError::DownloadFailed {
            url: url.to_string(),
            reason,
        };

        let response = self.agent.get(url).call().map_err(|err| match err {
            ureq::Error::Status(code, _) => failed(format!("HTTP status {code}")),
            ureq::Error::Transport(transport) => failed(transport.to_string()),
        })?;

        // into_string() caps at 10MiB, so read through a bounded reader
        let mut reader = response.into_reader().take(MAX_FONT_SIZE + 1);
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|err| failed(err.to_string()))?;

        if bytes.len() as u64 > MAX_FONT_SIZE {
            return Err(failed(format!("size limit of {MAX_FONT_SIZE} bytes exceeded")).into());
        }

        log::debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }
}

/// Makes sure the font is on disk, then loads it
pub struct FontProvisioner<F = UreqFetcher> {
    source: FontSource,
    fetcher: F,
}

impl FontProvisioner<UreqFetcher> {
    /// Provisioner that downloads with `ureq` when the cache is cold
    pub fn new(source: FontSource) -> Self {
        Self::with_fetcher(source, UreqFetcher::new())
    }
}

impl<F: FontFetcher> FontProvisioner<F> {
    pub fn with_fetcher(source: FontSource, fetcher: F) -> Self {
        Self { source, fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Downloads the font if the cache file is missing
    ///
    /// Returns `true` when a download happened.
    pub fn ensure_cached(&self) -> Result<bool> {
        if self.is_cached()? {
            return Ok(false);
        }
        self.download()?;
        Ok(true)
    }

    /// Loads the cached font, downloading it first when the cache is cold
    ///
    /// A fresh download is parsed once and handed back as is.
    pub fn provision(&self) -> Result<Font> {
        if self.is_cached()? {
            Font::from_file(&self.source.cache_path)
        } else {
            self.download()
        }
    }

    fn is_cached(&self) -> Result<bool> {
        let path = &self.source.cache_path;
        match fs::metadata(path) {
            Ok(_) => {
                log::debug!("Using cached font {}", path.display());
                Ok(true)
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(FontLoadError::CacheRead {
                path: path.display().to_string(),
                source,
            }
            .into()),
        }
    }

    fn download(&self) -> Result<Font> {
        let path = &self.source.cache_path;
        log::info!("Font file not found, downloading...");
        let bytes = self.fetcher.fetch(&self.source.url)?;

        // Never cache something that isn't a font
        let font = Font::from_data(bytes)?;

        write_cache(path, font.data())?;
        log::debug!("Cached font at {}", path.display());
        Ok(font)
    }
}

fn write_cache(path: &Path, bytes: &[u8]) -> Result<()> {
    let cache_err = |source| FontLoadError::CacheWrite {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(cache_err)?;
    }

    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    let written = fs::write(&partial, bytes).and_then(|()| fs::rename(&partial, path));
    if let Err(err) = written {
        // Nothing half-written stays behind in the cache directory
        let _ = fs::remove_file(&partial);
        return Err(cache_err(err).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_lives_in_temp_dir() {
        let source = FontSource::default();
        assert_eq!(source.url, DEFAULT_FONT_URL);
        assert_eq!(source.cache_path.parent(), Some(std::env::temp_dir().as_path()));
        assert!(source.cache_path.ends_with("LiberationMono-Regular.ttf"));
    }

    #[test]
    fn test_write_cache_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("font.ttf");

        write_cache(&path, b"bytes").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"bytes");
        assert!(!dir.path().join("nested/deeper/font.ttf.part").exists());
    }

    #[test]
    fn test_failed_rename_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory can't be replaced by a file
        let path = dir.path().join("font.ttf");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        let err = write_cache(&path, b"bytes").unwrap_err();

        assert!(err.to_string().contains("Failed to write font cache"));
        assert!(!dir.path().join("font.ttf.part").exists());
        assert!(path.join("keep").exists());
    }
}
