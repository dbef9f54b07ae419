use std::fmt;
use std::path::{Path, PathBuf};

/// Failure to load a mesh or texture from disk.
#[derive(Debug)]
pub enum ParseError {
    /// The file does not exist.
    Missing(PathBuf),
    /// The file exists but could not be decoded.
    Malformed { path: PathBuf, reason: String },
}

impl ParseError {
    pub fn malformed(path: &Path, reason: impl fmt::Display) -> Self {
        ParseError::Malformed {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ParseError::Missing(path) => path,
            ParseError::Malformed { path, .. } => path,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Missing(path) => write!(f, "File not found: {}", path.display()),
            ParseError::Malformed { path, reason } => {
                write!(f, "Failed to parse '{}': {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for ParseError {}
