/*!
 Per-platform description of the raw directory record returned by the batch
 read primitive.

 The decoder never casts buffer memory to `libc::dirent64`/`libc::dirent`.
 Instead each platform supplies a [`DirentLayout`]: where the identifier,
 record length, type tag and name live inside a record, and how wide they
 are. Fields are then read with bounds checks out of the byte span.

 Record shapes (offsets in bytes):

 | platform          | ino    | reclen | type | name | name capacity |
 |-------------------|--------|--------|------|------|---------------|
 | Linux/Android     | 0 (8)  | 16 (2) | 18   | 19   | 256           |
 | macOS (ino64)     | 0 (8)  | 16 (2) | 20   | 21   | 1024          |
 | FreeBSD 12+       | 0 (8)  | 16 (2) | 18   | 24   | 256           |
 | OpenBSD           | 0 (8)  | 16 (2) | 18   | 24   | 256           |
 | NetBSD            | 0 (8)  | 8 (2)  | 12   | 13   | 512           |
 | illumos/Solaris   | 0 (8)  | 16 (2) | none | 18   | 256 (`MAXNAMELEN`) |
*/

/// Position and width of a native-endian unsigned integer inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    pub offset: usize,
    pub width: usize,
}

impl Field {
    #[must_use]
    pub const fn new(offset: usize, width: usize) -> Self {
        Self { offset, width }
    }

    /// One past the last byte of the field
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    /**
     Reads the field out of `record`.

     Returns `None` when the field does not fit inside `record` or when the
     declared width is not 1, 2, 4 or 8 bytes.
    */
    #[inline]
    #[must_use]
    pub fn read(&self, record: &[u8]) -> Option<u64> {
        let bytes = record.get(self.offset..self.end())?;
        match self.width {
            1 => bytes.first().copied().map(u64::from),
            2 => bytes.try_into().ok().map(u16::from_ne_bytes).map(u64::from),
            4 => bytes.try_into().ok().map(u32::from_ne_bytes).map(u64::from),
            8 => bytes.try_into().ok().map(u64::from_ne_bytes),
            _ => None,
        }
    }
}

/// Values of the inline `d_type` tag for each node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTags {
    pub fifo: u8,
    pub char_device: u8,
    pub directory: u8,
    pub block_device: u8,
    pub regular: u8,
    pub symlink: u8,
    pub socket: u8,
}

impl TypeTags {
    /// The `DT_*` numbering shared by every BSD-derived `dirent`, Linux included.
    /// `DT_UNKNOWN` (0) and `DT_WHT` (14) are deliberately absent.
    pub const BSD: Self = Self {
        fifo: 1,
        char_device: 2,
        directory: 4,
        block_device: 6,
        regular: 8,
        symlink: 10,
        socket: 12,
    };
}

/// Shape of one raw directory record on a given platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirentLayout {
    /// Inode/file number; zero marks a deleted slot
    pub ino: Field,
    /// Total record length, the distance to the next record
    pub reclen: Field,
    /// Offset of the one byte type tag, `None` where the record has no tag
    pub d_type: Option<usize>,
    /// Offset of the first name byte
    pub name: usize,
    /// Fixed width of the name array, the name may fill it without a NUL
    pub name_capacity: usize,
    pub tags: TypeTags,
}

impl DirentLayout {
    pub const LINUX: Self = Self {
        ino: Field::new(0, 8),
        reclen: Field::new(16, 2),
        d_type: Some(18),
        name: 19,
        name_capacity: 256,
        tags: TypeTags::BSD,
    };

    pub const MACOS: Self = Self {
        ino: Field::new(0, 8),
        reclen: Field::new(16, 2),
        d_type: Some(20),
        name: 21,
        name_capacity: 1024,
        tags: TypeTags::BSD,
    };

    /// FreeBSD 12 onwards and OpenBSD share this shape
    pub const FREEBSD: Self = Self {
        ino: Field::new(0, 8),
        reclen: Field::new(16, 2),
        d_type: Some(18),
        name: 24,
        name_capacity: 256,
        tags: TypeTags::BSD,
    };

    pub const NETBSD: Self = Self {
        ino: Field::new(0, 8),
        reclen: Field::new(8, 2),
        d_type: Some(12),
        name: 13,
        name_capacity: 512,
        tags: TypeTags::BSD,
    };

    /// No inline tag at all, every entry goes through the stat fallback
    pub const SOLARIS: Self = Self {
        ino: Field::new(0, 8),
        reclen: Field::new(16, 2),
        d_type: None,
        name: 18,
        name_capacity: 256,
        tags: TypeTags::BSD,
    };

    #[cfg(any(target_os = "linux", target_os = "android"))]
    pub const NATIVE: Self = Self::LINUX;

    #[cfg(target_os = "macos")]
    pub const NATIVE: Self = Self::MACOS;

    #[cfg(any(target_os = "freebsd", target_os = "openbsd"))]
    pub const NATIVE: Self = Self::FREEBSD;

    #[cfg(target_os = "netbsd")]
    pub const NATIVE: Self = Self::NETBSD;

    #[cfg(any(target_os = "illumos", target_os = "solaris"))]
    pub const NATIVE: Self = Self::SOLARIS;

    /// Bytes every record has before its name starts
    #[must_use]
    pub const fn header_len(&self) -> usize {
        self.name
    }

    #[must_use]
    pub const fn has_inline_type(&self) -> bool {
        self.d_type.is_some()
    }
}

// Keep the hand written tables honest where libc exposes the real structs.
#[cfg(any(target_os = "linux", target_os = "android"))]
mod checks {
    use super::DirentLayout;
    use core::mem::offset_of;
    use libc::dirent64;

    const_assert!(offset_of!(dirent64, d_ino) == DirentLayout::LINUX.ino.offset);
    const_assert!(offset_of!(dirent64, d_reclen) == DirentLayout::LINUX.reclen.offset);
    const_assert!(offset_of!(dirent64, d_name) == DirentLayout::LINUX.name);
}

#[cfg(target_os = "macos")]
mod checks {
    use super::DirentLayout;
    use core::mem::offset_of;
    use libc::dirent;

    const_assert!(offset_of!(dirent, d_reclen) == DirentLayout::MACOS.reclen.offset);
    const_assert!(offset_of!(dirent, d_type) == 20);
    const_assert!(offset_of!(dirent, d_name) == DirentLayout::MACOS.name);
}

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "freebsd",
    target_os = "openbsd",
    target_os = "netbsd"
))]
const_assert!(
    libc::DT_FIFO == TypeTags::BSD.fifo
        && libc::DT_CHR == TypeTags::BSD.char_device
        && libc::DT_DIR == TypeTags::BSD.directory
        && libc::DT_BLK == TypeTags::BSD.block_device
        && libc::DT_REG == TypeTags::BSD.regular
        && libc::DT_LNK == TypeTags::BSD.symlink
        && libc::DT_SOCK == TypeTags::BSD.socket,
    "libc DT_* values differ from the BSD numbering"
);
