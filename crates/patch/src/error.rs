#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

/// Stage of the read-modify-write cycle that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchStep {
    Read,
    Parse,
    Write,
}

impl PatchStep {
    pub fn as_str(self) -> &'static str {
        match self {
            PatchStep::Read => "read",
            PatchStep::Parse => "parse",
            PatchStep::Write => "write",
        }
    }
}

#[derive(Debug)]
pub enum PatchError {
    FileNotFound {
        path: PathBuf,
    },
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    MalformedJson {
        path: PathBuf,
        source: serde_json::Error,
    },
    NotAnObject {
        path: PathBuf,
        found: &'static str,
    },
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
    Unwritable {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PatchError {
    pub fn path(&self) -> &Path {
        match self {
            Self::FileNotFound { path }
            | Self::Unreadable { path, .. }
            | Self::MalformedJson { path, .. }
            | Self::NotAnObject { path, .. }
            | Self::Encode { path, .. }
            | Self::Unwritable { path, .. } => path,
        }
    }

    pub fn step(&self) -> PatchStep {
        match self {
            Self::FileNotFound { .. } | Self::Unreadable { .. } => PatchStep::Read,
            Self::MalformedJson { .. } | Self::NotAnObject { .. } => PatchStep::Parse,
            Self::Encode { .. } | Self::Unwritable { .. } => PatchStep::Write,
        }
    }

    pub(crate) fn from_read(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Unreadable {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

impl std::fmt::Display for PatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let step = self.step().as_str();
        let path = self.path().display();
        match self {
            Self::FileNotFound { .. } => write!(f, "{step} failed for {path}: file not found"),
            Self::Unreadable { source, .. } => write!(f, "{step} failed for {path}: {source}"),
            Self::MalformedJson { source, .. } => {
                write!(f, "{step} failed for {path}: malformed json: {source}")
            }
            Self::NotAnObject { found, .. } => {
                write!(
                    f,
                    "{step} failed for {path}: expected a json object, found {found}"
                )
            }
            Self::Encode { source, .. } => {
                write!(f, "{step} failed for {path}: encode: {source}")
            }
            Self::Unwritable { source, .. } => write!(f, "{step} failed for {path}: {source}"),
        }
    }
}

impl std::error::Error for PatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unreadable { source, .. } | Self::Unwritable { source, .. } => Some(source),
            Self::MalformedJson { source, .. } | Self::Encode { source, .. } => Some(source),
            Self::FileNotFound { .. } | Self::NotAnObject { .. } => None,
        }
    }
}

#[derive(Debug)]
pub enum ManifestError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    Empty {
        path: PathBuf,
    },
    InvalidEntry {
        path: PathBuf,
        index: usize,
        message: String,
    },
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "target manifest {}: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "target manifest {}: {source}", path.display())
            }
            Self::Empty { path } => {
                write!(f, "target manifest {}: no targets listed", path.display())
            }
            Self::InvalidEntry {
                path,
                index,
                message,
            } => write!(
                f,
                "target manifest {}: targets[{index}]: {message}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Empty { .. } | Self::InvalidEntry { .. } => None,
        }
    }
}
