#![allow(clippy::inline_always)]
use crate::fs::TypeTags;
use libc::{S_IFBLK, S_IFCHR, S_IFDIR, S_IFIFO, S_IFLNK, S_IFMT, S_IFREG, S_IFSOCK, mode_t};

/// Represents the type of a file in the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileType {
    BlockDevice,
    CharDevice,
    Directory,
    /// Named pipe
    Fifo,
    Symlink,
    RegularFile,
    Socket,
    /// Only produced when a stat reports a node type outside the table above
    Unknown,
}

impl FileType {
    /**
     Maps an inline `d_type` tag through the platform's tag table.

     Returns `None` for `DT_UNKNOWN`, `DT_WHT` and anything else the table
     does not name; callers then fall back to a metadata query.
    */
    #[must_use]
    #[inline(always)]
    pub const fn from_tag(d_type: u8, tags: &TypeTags) -> Option<Self> {
        // match arms can't bind struct fields, hence the if chain
        if d_type == tags.regular {
            Some(Self::RegularFile)
        } else if d_type == tags.directory {
            Some(Self::Directory)
        } else if d_type == tags.symlink {
            Some(Self::Symlink)
        } else if d_type == tags.block_device {
            Some(Self::BlockDevice)
        } else if d_type == tags.char_device {
            Some(Self::CharDevice)
        } else if d_type == tags.fifo {
            Some(Self::Fifo)
        } else if d_type == tags.socket {
            Some(Self::Socket)
        } else {
            None
        }
    }

    /// Node type from `st_mode`. Permission, setuid/setgid and sticky bits are masked off.
    #[must_use]
    #[inline(always)]
    pub const fn from_mode(mode: mode_t) -> Self {
        match mode & S_IFMT {
            S_IFREG => Self::RegularFile,
            S_IFDIR => Self::Directory,
            S_IFBLK => Self::BlockDevice,
            S_IFCHR => Self::CharDevice,
            S_IFIFO => Self::Fifo,
            S_IFLNK => Self::Symlink,
            S_IFSOCK => Self::Socket,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    #[inline]
    pub const fn is_dir(&self) -> bool {
        matches!(*self, Self::Directory)
    }

    #[must_use]
    #[inline]
    pub const fn is_regular_file(&self) -> bool {
        matches!(*self, Self::RegularFile)
    }

    #[must_use]
    #[inline]
    pub const fn is_symlink(&self) -> bool {
        matches!(*self, Self::Symlink)
    }

    #[must_use]
    #[inline]
    pub const fn is_block_device(&self) -> bool {
        matches!(*self, Self::BlockDevice)
    }

    #[must_use]
    #[inline]
    pub const fn is_char_device(&self) -> bool {
        matches!(*self, Self::CharDevice)
    }

    #[must_use]
    #[inline]
    pub const fn is_fifo(&self) -> bool {
        matches!(*self, Self::Fifo)
    }

    #[must_use]
    #[inline]
    pub const fn is_socket(&self) -> bool {
        matches!(*self, Self::Socket)
    }

    #[must_use]
    #[inline]
    pub const fn is_unknown(&self) -> bool {
        matches!(*self, Self::Unknown)
    }
}

impl core::fmt::Display for FileType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BlockDevice => write!(f, "Block device"),
            Self::CharDevice => write!(f, "Character device"),
            Self::Directory => write!(f, "Directory"),
            Self::Fifo => write!(f, "FIFO"),
            Self::Symlink => write!(f, "Symlink"),
            Self::RegularFile => write!(f, "Regular file"),
            Self::Socket => write!(f, "Socket"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl From<std::fs::FileType> for FileType {
    fn from(file_type: std::fs::FileType) -> Self {
        use std::os::unix::fs::FileTypeExt as _;
        match file_type {
            ft if ft.is_dir() => Self::Directory,
            ft if ft.is_file() => Self::RegularFile,
            ft if ft.is_symlink() => Self::Symlink,
            ft if ft.is_block_device() => Self::BlockDevice,
            ft if ft.is_char_device() => Self::CharDevice,
            ft if ft.is_fifo() => Self::Fifo,
            ft if ft.is_socket() => Self::Socket,
            _ => Self::Unknown,
        }
    }
}
