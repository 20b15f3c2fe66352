//! On-disk media store for notice attachments and images.
//!
//! References handed out by `store`/`create` are bare file names (uuid plus
//! a sanitised original name) and are the only thing persisted in content
//! rows. Removal is best-effort: a failed unlink is logged and swallowed so
//! it can never abort the record deletion that triggered it.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::warn;
use uuid::Uuid;

#[derive(Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(MediaStore { root })
    }

    /// Creates a fresh file for streaming writes and returns its reference
    /// together with the open handle.
    pub fn create(&self, original_name: &str) -> io::Result<(String, File)> {
        let file_ref = format!("{}_{}", Uuid::new_v4(), sanitize(original_name));
        let file = File::create(self.root.join(&file_ref))?;
        Ok((file_ref, file))
    }

    /// Stores a complete byte buffer under a new reference.
    pub fn store(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        let (file_ref, mut file) = self.create(original_name)?;
        file.write_all(bytes)?;
        Ok(file_ref)
    }

    /// Best-effort removal. Returns whether the file is gone afterwards.
    pub fn remove(&self, file_ref: &str) -> bool {
        let path = match self.resolve(file_ref) {
            Some(p) => p,
            None => return false,
        };
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => {
                warn!("could not remove stored file {}: {}", file_ref, e);
                false
            }
        }
    }

    pub fn read(&self, file_ref: &str) -> io::Result<Vec<u8>> {
        let path = self
            .resolve(file_ref)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "bad file reference"))?;
        fs::read(path)
    }

    /// Rejects references that try to escape the media root.
    fn resolve(&self, file_ref: &str) -> Option<PathBuf> {
        if file_ref.is_empty() || file_ref.contains(['/', '\\']) || file_ref.contains("..") {
            return None;
        }
        Some(self.root.join(file_ref))
    }
}

/// Consecutive dots are collapsed so a sanitized name can never contain
/// `..`, which `resolve` rejects.
fn sanitize(name: &str) -> String {
    let mut cleaned = String::new();
    for c in Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .chars()
    {
        let c = if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' };
        if c == '.' && cleaned.ends_with('.') {
            continue;
        }
        cleaned.push(c);
    }
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
