use std::fs::{self, OpenOptions};

use crate::confine::ConfinedPath;
use crate::errors::{AppError, AppResult};

/// What currently sits at a confined path. Computed fresh on every call;
/// the filesystem may change between UI steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Absent,
    RegularFile,
    DirectoryConflict,
}

impl Classification {
    pub fn exists(self) -> bool {
        !matches!(self, Classification::Absent)
    }

    pub fn kind(self) -> &'static str {
        match self {
            Classification::Absent => "none",
            Classification::RegularFile => "file",
            Classification::DirectoryConflict => "dir",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// Classify a confined path with a single symlink-following stat. Anything
/// that is neither a regular file nor a directory (missing, unreadable,
/// special) reports as absent.
pub fn probe(path: &ConfinedPath) -> Classification {
    match fs::metadata(path.as_path()) {
        Ok(meta) if meta.is_file() => Classification::RegularFile,
        Ok(meta) if meta.is_dir() => Classification::DirectoryConflict,
        _ => Classification::Absent,
    }
}

/// Create the target as a new empty file, making parent directories as
/// needed. Exclusive-create semantics: losing a concurrent race surfaces as
/// an IO error instead of truncating the winner.
pub fn create_empty(path: &ConfinedPath) -> AppResult<CreateOutcome> {
    match fs::metadata(path.as_path()) {
        Ok(meta) if meta.is_dir() => Err(AppError::DirectoryConflict),
        Ok(_) => Ok(CreateOutcome::AlreadyExists),
        Err(_) => {
            if let Some(parent) = path.as_path().parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::Io(format!("failed to create parent directories: {e}"))
                })?;
            }
            OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path.as_path())
                .map_err(|e| AppError::Io(format!("failed to create file: {e}")))?;
            Ok(CreateOutcome::Created)
        }
    }
}

/// Replace the file's contents with exactly the supplied bytes. The target
/// must already exist as a regular file; no newline translation happens.
pub fn write_contents(path: &ConfinedPath, content: &str) -> AppResult<()> {
    match fs::metadata(path.as_path()) {
        Ok(meta) if meta.is_file() => fs::write(path.as_path(), content.as_bytes())
            .map_err(|e| AppError::Io(format!("failed to write file: {e}"))),
        _ => Err(AppError::NotAFile),
    }
}
