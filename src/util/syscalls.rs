/*!
 Wrappers for the batch directory read primitive of each platform.

 - Linux/Android: the raw `getdents64` syscall
 - OpenBSD/illumos/Solaris: libc `getdents`
 - NetBSD: libc `__getdents30`
 - macOS: libc `__getdirentries64`
 - FreeBSD: libc `getdirentries` (the 64 bit inode ABI)

 Every `batch_read` has the same contract.

 # Safety
 - `fd` must be an open directory descriptor
 - `buffer_ptr` must be valid for writes of `buffer_size` bytes

 # Returns
 - Positive: number of bytes written
 - 0: end of directory
 - Negative: error, check errno
*/
use core::ffi::{c_char, c_int};
use std::io;

#[inline]
#[cfg(any(target_os = "linux", target_os = "android"))]
unsafe fn batch_read(fd: c_int, buffer_ptr: *mut c_char, buffer_size: usize) -> isize {
    // SAFETY: upheld by the caller. c_long is isize on every Linux target
    unsafe { libc::syscall(libc::SYS_getdents64, fd, buffer_ptr, buffer_size) as isize }
}

#[inline]
#[cfg(any(
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "illumos",
    target_os = "solaris"
))]
unsafe fn batch_read(fd: c_int, buffer_ptr: *mut c_char, buffer_size: usize) -> isize {
    // No stable syscall numbers here, link against libc instead
    unsafe extern "C" {
        #[cfg_attr(target_os = "netbsd", link_name = "__getdents30")]
        #[cfg_attr(not(target_os = "netbsd"), link_name = "getdents")]
        fn sys_getdents(fd: c_int, dirp: *mut c_char, count: usize) -> c_int;
    }
    // SAFETY: upheld by the caller
    unsafe { sys_getdents(fd, buffer_ptr, buffer_size) as isize }
}

#[inline]
#[cfg(any(target_os = "macos", target_os = "freebsd"))]
unsafe fn batch_read(fd: c_int, buffer_ptr: *mut c_char, buffer_size: usize) -> isize {
    unsafe extern "C" {
        #[cfg_attr(target_os = "macos", link_name = "__getdirentries64")]
        #[cfg_attr(target_os = "freebsd", link_name = "getdirentries")]
        fn sys_getdirentries(
            fd: c_int,
            buf: *mut c_char,
            nbytes: libc::size_t,
            basep: *mut libc::off_t,
        ) -> libc::ssize_t;
    }
    // The seek position is an output we have no use for
    let mut basep: libc::off_t = 0;
    // SAFETY: upheld by the caller, basep is a live local
    unsafe { sys_getdirentries(fd, buffer_ptr, buffer_size, &raw mut basep) }
}

/// Fills `buf` with raw directory records, returning how many bytes are valid (0 at the end).
#[inline]
pub(crate) fn read_dirents(fd: c_int, buf: &mut [u8]) -> io::Result<usize> {
    // SAFETY: buf is valid for writes of buf.len() bytes for the whole call
    let read = unsafe { batch_read(fd, buf.as_mut_ptr().cast(), buf.len()) };
    usize::try_from(read).map_err(|_| io::Error::last_os_error())
}
