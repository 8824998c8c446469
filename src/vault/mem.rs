use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;

use crate::vault::store::{FileHandle, Vault, VaultError};

/// An in-memory vault. Backs the test suites and dry runs; the read-only
/// variant rejects every mutation, which is how creation-failure paths are
/// exercised.
#[derive(Default)]
pub struct MemVault {
    files: RefCell<BTreeMap<String, String>>,
    folders: RefCell<BTreeSet<String>>,
    read_only: bool,
}

impl MemVault {
    pub fn new() -> Self {
        MemVault::default()
    }

    /// A vault that refuses create/write/create_folder.
    pub fn read_only() -> Self {
        MemVault {
            read_only: true,
            ..MemVault::default()
        }
    }

    /// Seed a file, creating parent folders implicitly.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .borrow_mut()
            .insert(path.to_string(), content.to_string());
        if let Some(idx) = path.rfind('/') {
            self.folders.borrow_mut().insert(path[..idx].to_string());
        }
        self
    }

    /// Current content of a file, if present.
    pub fn content(&self, path: &str) -> Option<String> {
        self.files.borrow().get(path).cloned()
    }

    pub fn has_folder(&self, path: &str) -> bool {
        self.folders.borrow().contains(path)
    }
}

impl Vault for MemVault {
    fn find_file(&self, path: &str) -> Option<FileHandle> {
        self.files
            .borrow()
            .contains_key(path)
            .then(|| FileHandle::new(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path) || self.folders.borrow().contains(path)
    }

    fn read(&self, file: &FileHandle) -> Result<String, VaultError> {
        self.files
            .borrow()
            .get(&file.path)
            .cloned()
            .ok_or_else(|| VaultError::ReadError {
                path: file.path.clone(),
                source: io::Error::from(io::ErrorKind::NotFound),
            })
    }

    fn write(&self, file: &FileHandle, content: &str) -> Result<(), VaultError> {
        if self.read_only {
            return Err(VaultError::ReadOnly);
        }
        self.files
            .borrow_mut()
            .insert(file.path.clone(), content.to_string());
        Ok(())
    }

    fn create(&self, path: &str, content: &str) -> Result<FileHandle, VaultError> {
        if self.read_only {
            return Err(VaultError::ReadOnly);
        }
        if self.files.borrow().contains_key(path) {
            return Err(VaultError::CreateError {
                path: path.to_string(),
                source: io::Error::from(io::ErrorKind::AlreadyExists),
            });
        }
        if let Some(idx) = path.rfind('/') {
            let parent = &path[..idx];
            if !self.folders.borrow().contains(parent) {
                return Err(VaultError::CreateError {
                    path: path.to_string(),
                    source: io::Error::from(io::ErrorKind::NotFound),
                });
            }
        }
        self.files
            .borrow_mut()
            .insert(path.to_string(), content.to_string());
        Ok(FileHandle::new(path.to_string()))
    }

    fn create_folder(&self, path: &str) -> Result<(), VaultError> {
        if self.read_only {
            return Err(VaultError::ReadOnly);
        }
        self.folders.borrow_mut().insert(path.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_file_is_found() {
        let vault = MemVault::new().with_file("a/b.md", "text");
        assert!(vault.find_file("a/b.md").is_some());
        assert!(vault.exists("a"));
        let file = vault.find_file("a/b.md").unwrap();
        assert_eq!(vault.read(&file).unwrap(), "text");
    }

    #[test]
    fn test_create_needs_folder() {
        let vault = MemVault::new();
        assert!(vault.create("dir/f.md", "x").is_err());
        vault.create_folder("dir").unwrap();
        assert!(vault.create("dir/f.md", "x").is_ok());
        assert_eq!(vault.content("dir/f.md").as_deref(), Some("x"));
    }

    #[test]
    fn test_top_level_create_needs_no_folder() {
        let vault = MemVault::new();
        assert!(vault.create("f.md", "x").is_ok());
    }

    #[test]
    fn test_read_only_rejects_mutation() {
        let vault = MemVault::read_only();
        assert!(vault.create_folder("d").is_err());
        assert!(vault.create("f.md", "x").is_err());
        let vault = MemVault::read_only().with_file("f.md", "x");
        let file = vault.find_file("f.md").unwrap();
        assert!(vault.write(&file, "y").is_err());
    }
}
