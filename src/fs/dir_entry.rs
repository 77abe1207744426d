use crate::fs::FileType;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

/**
 One entry of a directory listing: its name and node type.

 The name is the bare file name, no path prefix and no NUL terminator. It
 is owned, copied out of the scratch buffer before the next batch read.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirEntry {
    name: Box<OsStr>,
    file_type: FileType,
}

impl DirEntry {
    #[inline]
    pub(crate) fn new(name: &[u8], file_type: FileType) -> Self {
        Self {
            name: OsStr::from_bytes(name).into(),
            file_type,
        }
    }

    #[inline]
    #[must_use]
    pub fn file_name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.name.as_bytes()
    }

    #[inline]
    #[must_use]
    pub const fn file_type(&self) -> FileType {
        self.file_type
    }

    /// Cost free check for directories
    #[inline]
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.file_type.is_dir()
    }

    #[inline]
    #[must_use]
    pub const fn is_regular_file(&self) -> bool {
        self.file_type.is_regular_file()
    }

    /// True for the link itself, never for what it points at
    #[inline]
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        self.file_type.is_symlink()
    }

    /// The name as a lossy UTF-8 string
    #[inline]
    #[must_use]
    pub fn to_string_lossy(&self) -> std::borrow::Cow<'_, str> {
        self.name.to_string_lossy()
    }

    /// Full path of the entry given the directory it was read from
    #[must_use]
    pub fn path_in(&self, parent: &Path) -> PathBuf {
        parent.join(&*self.name)
    }

    #[must_use]
    pub fn into_file_name(self) -> OsString {
        self.name.into_os_string()
    }
}
