//! Where the image ends up
//!
//! A file is named either explicitly or with a short random hex string,
//! placed in an explicit directory or the current one, and given the
//! exporter's extension.

use std::fs;
use std::path::{Path, PathBuf};

use rand::{rngs::OsRng, RngCore};
use textshot_core::error::{ExportError, Result};

/// Length of generated file names, in hex characters
pub const RANDOM_NAME_LEN: usize = 5;

/// Supplies base names when none was given
pub trait NameSource {
    fn next_name(&mut self) -> String;
}

/// Lowercase hex names drawn from the operating system's CSPRNG
#[derive(Debug, Clone, Copy)]
pub struct OsRngNames {
    len: usize,
}

impl OsRngNames {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Default for OsRngNames {
    fn default() -> Self {
        Self::new(RANDOM_NAME_LEN)
    }
}

impl NameSource for OsRngNames {
    fn next_name(&mut self) -> String {
        let mut bytes = vec![0u8; self.len.div_ceil(2)];
        OsRng.fill_bytes(&mut bytes);
        let mut name = hex::encode(bytes);
        name.truncate(self.len);
        name
    }
}

/// Hands out the same name every time
#[derive(Debug, Clone)]
pub struct FixedName(pub String);

impl NameSource for FixedName {
    fn next_name(&mut self) -> String {
        self.0.clone()
    }
}

/// Output directory and base name, either of which may be left open
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTarget {
    pub dir: Option<PathBuf>,
    pub name: Option<String>,
}

impl OutputTarget {
    /// Treats empty strings as "not given", the way the flags default
    pub fn new(dir: Option<PathBuf>, name: Option<String>) -> Self {
        Self {
            dir: dir.filter(|d| !d.as_os_str().is_empty()),
            name: name.filter(|n| !n.is_empty()),
        }
    }

    /// Final path: `<dir or .>/<name>.<extension>`
    ///
    /// The extension is always appended, even when the name already has one.
    pub fn resolve(&self, names: &mut dyn NameSource, extension: &str) -> PathBuf {
        let stem = match &self.name {
            Some(name) => name.clone(),
            None => names.next_name(),
        };
        let dir = self.dir.clone().unwrap_or_else(|| PathBuf::from("."));
        dir.join(format!("{stem}.{extension}"))
    }
}

/// Creates or truncates `path` and writes the encoded image to it
pub fn write_png(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| ExportError::WriteFailed {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("Image saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use textshot_core::TextshotError;

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn test_explicit_name_gets_extension() {
        let target = OutputTarget::new(None, Some("foo".into()));
        let path = target.resolve(&mut FixedName("unused".into()), "png");
        assert_eq!(path, Path::new(".").join("foo.png"));
    }

    #[test]
    fn test_extension_is_appended_not_replaced() {
        let target = OutputTarget::new(None, Some("shot.png".into()));
        let path = target.resolve(&mut OsRngNames::default(), "png");
        assert_eq!(path.file_name().unwrap(), "shot.png.png");
    }

    #[test]
    fn test_explicit_dir_is_used() {
        let target = OutputTarget::new(Some("/srv/shots".into()), Some("a".into()));
        let path = target.resolve(&mut OsRngNames::default(), "png");
        assert_eq!(path, PathBuf::from("/srv/shots/a.png"));
    }

    #[test]
    fn test_empty_strings_mean_defaults() {
        let target = OutputTarget::new(Some(PathBuf::new()), Some(String::new()));
        assert_eq!(target, OutputTarget::default());

        let path = target.resolve(&mut FixedName("abcde".into()), "png");
        assert_eq!(path, Path::new(".").join("abcde.png"));
    }

    #[test]
    fn test_random_name_is_five_lowercase_hex_chars() {
        let mut names = OsRngNames::default();
        for _ in 0..32 {
            let name = names.next_name();
            assert_eq!(name.len(), 5, "{name}");
            assert!(is_lower_hex(&name), "{name}");
        }
    }

    #[test]
    fn test_random_names_differ() {
        let mut names = OsRngNames::default();
        let target = OutputTarget::default();
        // 20 bits each; a collision here is a one-in-a-million event
        let first = target.resolve(&mut names, "png");
        let second = target.resolve(&mut names, "png");
        assert_ne!(first, second);
    }

    #[test]
    fn test_custom_name_length() {
        assert_eq!(OsRngNames::new(8).next_name().len(), 8);
        assert_eq!(OsRngNames::new(1).next_name().len(), 1);
    }

    #[test]
    fn test_write_png_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        fs::write(&path, vec![7u8; 1000]).unwrap();

        write_png(&path, b"short").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"short");
    }

    #[test]
    fn test_write_png_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");

        let err = write_png(&path, b"data").unwrap_err();
        assert!(matches!(
            err,
            TextshotError::ExportFailed(ExportError::WriteFailed { .. })
        ));
        assert!(err.to_string().contains("out.png"));
    }
}
