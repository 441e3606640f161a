use std::path::{Path, PathBuf};

use crate::domain::DomainError;

/// Remembers the directory of the last input file the user opened.
pub trait DirectoryMemory: Send + Sync {
    /// The remembered directory if it still exists, otherwise the working directory.
    fn last_dir(&self) -> PathBuf;

    /// Remember the parent directory of `file`.
    fn remember(&self, file: &Path) -> Result<(), DomainError>;
}
