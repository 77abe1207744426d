use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which stage of a directory read failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Open,
    Read,
    Stat,
    Close,
}

/**
 An error from reading a single directory.

 Every variant carries the path involved and the underlying OS error. For
 [`DirError::Stat`] the path is the directory joined with the entry name,
 for the others it is the directory itself.

 None of these are retried internally; any retry policy is left to callers.
*/
#[derive(Error, Debug)]
pub enum DirError {
    /// The directory could not be opened (missing, not a directory, denied...)
    #[error("cannot open directory {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The batch read primitive failed mid-stream
    #[error("cannot read directory entries from {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The metadata fallback for an untyped entry failed
    #[error("cannot stat {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Closing the directory failed after every read had succeeded
    #[error("cannot close directory {}: {source}", .path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DirError {
    pub(crate) fn open(path: &Path, source: io::Error) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn stat(path: PathBuf, source: io::Error) -> Self {
        Self::Stat { path, source }
    }

    pub(crate) fn close(path: &Path, source: io::Error) -> Self {
        Self::Close {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The path this error occurred at.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. }
            | Self::Read { path, .. }
            | Self::Stat { path, .. }
            | Self::Close { path, .. } => path,
        }
    }

    /// The underlying OS error.
    #[must_use]
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::Open { source, .. }
            | Self::Read { source, .. }
            | Self::Stat { source, .. }
            | Self::Close { source, .. } => source,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Open { .. } => ErrorKind::Open,
            Self::Read { .. } => ErrorKind::Read,
            Self::Stat { .. } => ErrorKind::Stat,
            Self::Close { .. } => ErrorKind::Close,
        }
    }

    /// The raw `errno` value, if the error came from the OS.
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        self.io_error().raw_os_error()
    }

    /// True when the directory (or, for stat errors, the entry) no longer exists.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.raw_os_error() == Some(libc::ENOENT)
    }

    /// Unwraps into the underlying OS error, dropping the path.
    #[must_use]
    pub fn into_io_error(self) -> io::Error {
        match self {
            Self::Open { source, .. }
            | Self::Read { source, .. }
            | Self::Stat { source, .. }
            | Self::Close { source, .. } => source,
        }
    }
}

impl From<DirError> for io::Error {
    fn from(error: DirError) -> Self {
        let kind = error.io_error().kind();
        Self::new(kind, error)
    }
}

/// Generic result type for directory reads
pub type Result<T> = core::result::Result<T, DirError>;
