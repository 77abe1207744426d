use crate::fs::{DEFAULT_BUFFER_SIZE, DirEntry, DirentSource, FileDes, ScratchBuffer};
use crate::{DirError, Result, reader};
use std::ffi::OsString;
use std::path::Path;
use tracing::debug;

/**
 Whether the metadata fallback follows a symlink to report its target's type.

 Only consulted for entries whose inline type tag is missing or unknown.
 With [`LinkPolicy::NoFollow`] a symlink is reported as
 [`crate::FileType::Symlink`], which matches what entries with an inline tag
 report.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkPolicy {
    /// `lstat` semantics (`AT_SYMLINK_NOFOLLOW`)
    #[default]
    NoFollow,
    /// `stat` semantics, a dangling link then fails the read
    Follow,
}

/**
 Settings for reading a directory.

 # Examples
 ```no_run
 use rawdir::{LinkPolicy, ReadOptions};

 let entries = ReadOptions::new()
     .buffer_size(64 * 1024)
     .link_policy(LinkPolicy::Follow)
     .read_entries("/usr/bin")?;
 for entry in &entries {
     println!("{} {}", entry.file_type(), entry.to_string_lossy());
 }
 # Ok::<(), rawdir::DirError>(())
 ```
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    pub(crate) buffer_size: usize,
    pub(crate) links: LinkPolicy,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            links: LinkPolicy::NoFollow,
        }
    }

    /// Scratch buffer capacity for [`Self::read_entries`], raised to
    /// [`crate::fs::MIN_BUFFER_SIZE`] if smaller
    #[must_use]
    pub const fn buffer_size(mut self, bytes: usize) -> Self {
        self.buffer_size = bytes;
        self
    }

    #[must_use]
    pub const fn link_policy(mut self, links: LinkPolicy) -> Self {
        self.links = links;
        self
    }

    /**
     Lists `path`, resolving every entry's type.

     Allocates a fresh scratch buffer for the call.

     # Errors
     [`DirError::Open`] if the directory can't be opened, [`DirError::Read`]
     if a batch read fails, [`DirError::Stat`] if an untyped entry can't be
     stat'ed and [`DirError::Close`] if only the final close fails. No partial
     listing is ever returned.
    */
    pub fn read_entries<P: AsRef<Path>>(&self, path: P) -> Result<Vec<DirEntry>> {
        let mut buf = ScratchBuffer::with_capacity(self.buffer_size);
        self.read_entries_in(path, &mut buf)
    }

    /**
     Same as [`Self::read_entries`] but with a caller owned buffer, for
     walkers reading many directories one after another.

     # Errors
     See [`Self::read_entries`].
    */
    pub fn read_entries_in<P: AsRef<Path>>(
        &self,
        path: P,
        buf: &mut ScratchBuffer,
    ) -> Result<Vec<DirEntry>> {
        let path = path.as_ref();
        let handle = FileDes::open_dir(path).map_err(|e| DirError::open(path, e))?;
        debug!(path = %path.display(), "opened directory");
        self.read_from(handle, path, buf)
    }

    /**
     Drains an already opened `source`, treating `path` as its location.

     `path` is only used for error reporting. The source is closed before
     returning, whatever the outcome.

     # Errors
     See [`Self::read_entries`], minus [`DirError::Open`].
    */
    pub fn read_from<S: DirentSource>(
        &self,
        source: S,
        path: &Path,
        buf: &mut ScratchBuffer,
    ) -> Result<Vec<DirEntry>> {
        reader::collect_entries(source, path, buf, self.links)
    }

    /**
     Just the names from [`Self::read_entries`], in the same order.

     # Errors
     See [`Self::read_entries`].
    */
    pub fn read_names<P: AsRef<Path>>(&self, path: P) -> Result<Vec<OsString>> {
        Ok(self
            .read_entries(path)?
            .into_iter()
            .map(DirEntry::into_file_name)
            .collect())
    }
}
