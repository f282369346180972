use std::path::{Component, Path, PathBuf};

use super::errors::{Error, ErrorKind, Result};

/// Data-only type for safe path handling: a project root plus a normalized
/// relative component. Every step path resolves through here before any
/// filesystem call, so a plan can never write outside its root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafePath {
    root: PathBuf,
    rel: PathBuf,
}

impl SafePath {
    /// Creates a new `SafePath` from a root and candidate path.
    ///
    /// The root must be absolute. Relative candidates are taken as relative to
    /// the root; absolute candidates must already live under it. `.` segments
    /// are normalized away and `..` is rejected outright.
    pub fn from_rooted(root: &Path, candidate: &Path) -> Result<Self> {
        if !root.is_absolute() {
            return Err(Error {
                kind: ErrorKind::InvalidPath,
                msg: "root must be absolute".into(),
            });
        }
        let effective = if candidate.is_absolute() {
            match candidate.strip_prefix(root) {
                Ok(p) => p.to_path_buf(),
                Err(_) => {
                    return Err(Error {
                        kind: ErrorKind::Policy,
                        msg: "path escapes root".into(),
                    })
                }
            }
        } else {
            candidate.to_path_buf()
        };

        let mut rel = PathBuf::new();
        for seg in effective.components() {
            match seg {
                Component::CurDir => {}
                Component::Normal(p) => rel.push(p),
                Component::ParentDir => {
                    return Err(Error {
                        kind: ErrorKind::Policy,
                        msg: "dotdot".into(),
                    });
                }
                _ => {
                    return Err(Error {
                        kind: ErrorKind::InvalidPath,
                        msg: "unsupported component".into(),
                    });
                }
            }
        }
        Ok(SafePath {
            root: root.to_path_buf(),
            rel,
        })
    }

    /// Full path: root joined with the relative component.
    #[must_use]
    pub fn as_path(&self) -> PathBuf {
        self.root.join(&self.rel)
    }

    /// The relative component only; stable across roots, used for IDs and
    /// report rows.
    #[must_use]
    pub fn rel(&self) -> &Path {
        &self.rel
    }
}
