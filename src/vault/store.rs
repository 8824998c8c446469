/// Handle to a note inside a vault. Paths are vault-relative with `/`
/// separators, matching how task origins are recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: String,
}

impl FileHandle {
    pub fn new(path: impl Into<String>) -> Self {
        FileHandle { path: path.into() }
    }
}

/// Error type for vault operations
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: String,
        source: std::io::Error,
    },
    #[error("could not create {path}: {source}")]
    CreateError {
        path: String,
        source: std::io::Error,
    },
    #[error("vault is read-only")]
    ReadOnly,
}

/// The document-store surface the on-completion engine needs.
///
/// Everything the executors do against a vault goes through this trait, so
/// they run unchanged over the filesystem, the in-memory store, or whatever
/// a host embeds them in.
pub trait Vault {
    /// Look up a note by path. None when no note exists there.
    fn find_file(&self, path: &str) -> Option<FileHandle>;

    /// Whether any entry — note or folder — exists at the path.
    fn exists(&self, path: &str) -> bool;

    /// Full text of a note.
    fn read(&self, file: &FileHandle) -> Result<String, VaultError>;

    /// Replace a note's text.
    fn write(&self, file: &FileHandle, content: &str) -> Result<(), VaultError>;

    /// Create a note with the given text. Fails when the parent folder does
    /// not exist; `create_folder` it first.
    fn create(&self, path: &str, content: &str) -> Result<FileHandle, VaultError>;

    /// Create a folder (and any missing ancestors).
    fn create_folder(&self, path: &str) -> Result<(), VaultError>;
}
