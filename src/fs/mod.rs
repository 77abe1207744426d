mod buffer;
mod dir_entry;
mod file_type;
mod handle;
mod layout;
pub(crate) mod records;

pub use buffer::ScratchBuffer;
pub use dir_entry::DirEntry;
pub use file_type::FileType;
pub use handle::{DirentSource, FileDes};
pub use layout::{DirentLayout, Field, TypeTags};
pub use records::{RawRecord, Records};

const_from_env!(
    /// Default scratch buffer capacity, override at build time with `RAWDIR_BUFFER_SIZE`
    DEFAULT_BUFFER_SIZE: usize = "RAWDIR_BUFFER_SIZE", 16 * 1024
);

/// Smallest buffer handed to the OS; a single maximal record (1024 byte name
/// on macOS plus header) has to fit or the batch read fails with `EINVAL`.
pub const MIN_BUFFER_SIZE: usize = 4096;

const_assert!(
    DEFAULT_BUFFER_SIZE >= MIN_BUFFER_SIZE,
    "RAWDIR_BUFFER_SIZE is below the minimum buffer size"
);
const_assert!(DirentLayout::NATIVE.header_len() + DirentLayout::NATIVE.name_capacity <= MIN_BUFFER_SIZE);
