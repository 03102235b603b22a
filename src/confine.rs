use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use crate::errors::{AppError, AppResult};

/// The fixed directory every operation is confined to. Resolved once at
/// startup and injected wherever validation happens, never read back from
/// ambient process state.
#[derive(Debug, Clone)]
pub struct BaseRoot {
    dir: PathBuf,
}

/// An absolute path proven to lie inside the base root. The only constructor
/// lives in this module, so filesystem operations cannot be handed anything
/// unchecked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfinedPath(PathBuf);

impl ConfinedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ConfinedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

/// Successful confirmation: the normalized relative form (echoed back to the
/// client) plus the confined absolute path.
#[derive(Debug)]
pub struct Confirmed {
    pub relative: PathBuf,
    pub confined: ConfinedPath,
}

impl BaseRoot {
    /// Resolve the configured directory to its stable absolute form: through
    /// `dunce::canonicalize` when it exists, lexically against the current
    /// directory when it does not. A missing root is a startup warning, not
    /// an error.
    pub fn resolve(configured: &Path) -> io::Result<Self> {
        let dir = if configured.exists() {
            dunce::canonicalize(configured)?
        } else {
            collapse(&std::env::current_dir()?.join(configured))
        };
        Ok(Self { dir })
    }

    pub fn as_path(&self) -> &Path {
        &self.dir
    }

    /// Validate a raw, untrusted relative path. Each rejection is distinct:
    /// empty input, NUL bytes, absolute forms, drive designators, and `..`
    /// escapes are all refused before any filesystem access happens.
    pub fn confirm(&self, raw: &str) -> AppResult<Confirmed> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "." {
            return Err(AppError::EmptyPath);
        }
        if trimmed.contains('\0') {
            return Err(AppError::InvalidCharacter);
        }
        let unified = unify_separators(trimmed);
        let relative = collapse(Path::new(&unified));
        if relative.as_os_str().is_empty() {
            // the input collapsed to nothing, e.g. "a/.."
            return Err(AppError::EmptyPath);
        }
        if relative.has_root() {
            return Err(AppError::AbsolutePathNotAllowed);
        }
        if has_drive_designator(&relative.to_string_lossy()) {
            return Err(AppError::DriveLetterNotAllowed);
        }
        let candidate = collapse(&self.dir.join(&relative));
        if !candidate.starts_with(&self.dir) {
            return Err(AppError::PathEscape);
        }
        Ok(Confirmed {
            relative,
            confined: ConfinedPath(candidate),
        })
    }

    /// Re-check a path the client echoed back. The client only ever holds
    /// strings this server produced, but it is an untrusted boundary: the
    /// containment check runs again on every call, and a non-absolute echo
    /// is refused outright instead of being resolved against ambient state.
    pub fn require_within(&self, echoed: &str) -> AppResult<ConfinedPath> {
        let path = Path::new(echoed);
        if !path.has_root() {
            return Err(AppError::OutsideRoot);
        }
        let candidate = collapse(path);
        if !candidate.starts_with(&self.dir) {
            return Err(AppError::OutsideRoot);
        }
        Ok(ConfinedPath(candidate))
    }
}

fn unify_separators(raw: &str) -> String {
    raw.chars()
        .map(|c| if c == '/' || c == '\\' { MAIN_SEPARATOR } else { c })
        .collect()
}

/// Lexical `normpath`: collapses `.` and `..` without touching the
/// filesystem. Leading `..` segments of a relative path are preserved so the
/// containment check can reject them; `..` at an absolute root clamps.
fn collapse(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(name) => out.push(name),
        }
    }
    out
}

/// `[A-Za-z]:` at the start of a path. Checked textually on every platform
/// so the rule reads the same on filesystems without drive letters.
fn has_drive_designator(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
