use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::vault::store::{FileHandle, Vault, VaultError};

/// Write file contents atomically: write to a temp file in the same
/// directory, then rename over the target.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// A vault rooted at a directory on disk.
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsVault { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn abs(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl Vault for FsVault {
    fn find_file(&self, path: &str) -> Option<FileHandle> {
        self.abs(path)
            .is_file()
            .then(|| FileHandle::new(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.abs(path).exists()
    }

    fn read(&self, file: &FileHandle) -> Result<String, VaultError> {
        fs::read_to_string(self.abs(&file.path)).map_err(|e| VaultError::ReadError {
            path: file.path.clone(),
            source: e,
        })
    }

    fn write(&self, file: &FileHandle, content: &str) -> Result<(), VaultError> {
        atomic_write(&self.abs(&file.path), content.as_bytes()).map_err(|e| {
            VaultError::WriteError {
                path: file.path.clone(),
                source: e,
            }
        })
    }

    fn create(&self, path: &str, content: &str) -> Result<FileHandle, VaultError> {
        let abs = self.abs(path);
        // No implicit parent creation: callers are expected to create_folder
        // first, and a missing parent must surface as a creation error.
        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        let mut file = options.open(&abs).map_err(|e| VaultError::CreateError {
            path: path.to_string(),
            source: e,
        })?;
        file.write_all(content.as_bytes())
            .map_err(|e| VaultError::CreateError {
                path: path.to_string(),
                source: e,
            })?;
        Ok(FileHandle::new(path.to_string()))
    }

    fn create_folder(&self, path: &str) -> Result<(), VaultError> {
        fs::create_dir_all(self.abs(path)).map_err(|e| VaultError::CreateError {
            path: path.to_string(),
            source: e,
        })
    }
}
