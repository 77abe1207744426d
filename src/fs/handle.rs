use crate::config::LinkPolicy;
use crate::fs::DirentLayout;
use core::mem::{ManuallyDrop, MaybeUninit};
use libc::mode_t;
use std::ffi::CString;
use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/**
 Something that hands out raw directory records in batches.

 [`FileDes`] is the real implementation. Traversal layers can plug in their
 own (for instance an already opened descriptor obtained with `openat`) and
 tests use it to inject failures.
*/
pub trait DirentSource {
    /// Shape of the records `read_batch` writes
    fn layout(&self) -> DirentLayout {
        DirentLayout::NATIVE
    }

    /// Fills `buf` from the start, returning the number of valid bytes; 0 means done.
    fn read_batch(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// `st_mode` of the entry called `name` in this directory.
    fn stat_mode(&self, name: &[u8], links: LinkPolicy) -> io::Result<mode_t>;

    /// Releases the source, reporting any error the OS gives back
    fn close(self) -> io::Result<()>
    where
        Self: Sized;
}

/// An owned directory file descriptor, closed on drop
#[derive(Debug)]
#[repr(transparent)]
pub struct FileDes(pub(crate) i32);

impl FileDes {
    /**
     Opens `path` for reading directory entries.

     The descriptor is opened with:
     - `O_CLOEXEC`: Close the file descriptor on exec
     - `O_DIRECTORY`: Fail if not a directory
     - `O_NONBLOCK`: Don't hang on FIFOs or dodgy mounts

     # Errors
     Fails if the path doesn't exist, isn't a directory, can't be read, or
     contains an interior NUL byte.
    */
    pub fn open_dir(path: &Path) -> io::Result<Self> {
        const FLAGS: i32 = libc::O_RDONLY | libc::O_CLOEXEC | libc::O_DIRECTORY | libc::O_NONBLOCK;

        let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "path contains an interior NUL byte")
        })?;
        // SAFETY: the pointer is null terminated and lives for the call
        let fd = unsafe { libc::open(c_path.as_ptr(), FLAGS) };

        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self(fd))
    }

    /// Checks if the file descriptor is currently open
    #[cfg(test)]
    #[must_use]
    pub(crate) fn is_open(&self) -> bool {
        // F_GETFD fails with EBADF on a closed descriptor
        // SAFETY: Always safe
        unsafe { libc::fcntl(self.0, libc::F_GETFD) != -1 }
    }

    /**
     Closes the descriptor, surfacing the result of `close(2)`.

     Dropping a `FileDes` also closes it but has to swallow the error.
    */
    pub fn close(self) -> io::Result<()> {
        let this = ManuallyDrop::new(self);
        // SAFETY: we own the descriptor and Drop will not run for it
        if unsafe { libc::close(this.0) } == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

impl AsRawFd for FileDes {
    #[inline]
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

impl Drop for FileDes {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: only closing HERE, close() bypasses this via ManuallyDrop
        unsafe { libc::close(self.0) };
    }
}

impl DirentSource for FileDes {
    #[inline]
    fn read_batch(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        crate::util::read_dirents(self.0, buf)
    }

    fn stat_mode(&self, name: &[u8], links: LinkPolicy) -> io::Result<mode_t> {
        let c_name = CString::new(name)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "name contains a NUL byte"))?;
        let flags = match links {
            LinkPolicy::NoFollow => libc::AT_SYMLINK_NOFOLLOW,
            LinkPolicy::Follow => 0,
        };

        let mut stat_buf = MaybeUninit::<libc::stat>::uninit();
        // SAFETY: the name is null terminated, stat_buf is valid for writes
        let res = unsafe { libc::fstatat(self.0, c_name.as_ptr(), stat_buf.as_mut_ptr(), flags) };
        if res != 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: fstatat returned 0 so the struct has been filled in
        Ok(unsafe { stat_buf.assume_init() }.st_mode)
    }

    fn close(self) -> io::Result<()> {
        Self::close(self)
    }
}
