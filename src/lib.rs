/*!
 Lists a single directory with raw batch reads (`getdents64`,
 `getdirentries`, ...) instead of one `readdir` call per entry.

 Each batch lands in a reused scratch buffer, the packed records are decoded
 with bounds-checked field reads driven by a per-platform layout table, and
 every entry's node type comes from the record's inline type tag. Entries
 without a usable tag get a single `fstatat` against the open directory.

 Recursion, filtering and sorting are left to the caller; this crate only
 produces the typed entries of one directory, in the order the OS returned
 them. `.` and `..` are never included.

 # Examples
 ```
 let dir = tempfile::tempdir()?;
 std::fs::write(dir.path().join("a"), b"")?;
 std::fs::create_dir(dir.path().join("b"))?;

 let mut entries = rawdir::read_entries(dir.path())?;
 entries.sort_by(|x, y| x.file_name().cmp(y.file_name()));

 assert_eq!(entries[0].file_name(), "a");
 assert_eq!(entries[0].file_type(), rawdir::FileType::RegularFile);
 assert!(entries[1].is_dir());
 # Ok::<(), Box<dyn std::error::Error>>(())
 ```
*/

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd",
    target_os = "illumos",
    target_os = "solaris"
)))]
compile_error!("rawdir has no directory record layout for this target");

#[macro_use]
mod macros;

mod config;
mod error;
pub mod fs;
mod reader;
mod util;

pub use config::{LinkPolicy, ReadOptions};
pub use error::{DirError, ErrorKind, Result};
pub use fs::{DirEntry, FileType};

use std::ffi::OsString;
use std::path::Path;

/**
 Lists the entries of the directory at `path` with their types resolved.

 Uses the default [`ReadOptions`].

 # Errors
 Any failure to open, read, stat an untyped entry, or close aborts the
 whole call; see [`ReadOptions::read_entries`].
*/
pub fn read_entries<P: AsRef<Path>>(path: P) -> Result<Vec<DirEntry>> {
    ReadOptions::new().read_entries(path)
}

/**
 Lists only the names of the directory at `path`, in the same order
 [`read_entries`] returns them.

 # Errors
 Same as [`read_entries`].
*/
pub fn read_names<P: AsRef<Path>>(path: P) -> Result<Vec<OsString>> {
    ReadOptions::new().read_names(path)
}
