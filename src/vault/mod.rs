pub mod canvas;
pub mod fs_vault;
pub mod mem;
pub mod store;

pub use canvas::{CanvasError, CanvasTaskUpdater, JsonCanvasUpdater};
pub use fs_vault::FsVault;
pub use mem::MemVault;
pub use store::{FileHandle, Vault, VaultError};
