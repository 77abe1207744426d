use crate::fs::DirentLayout;
use tracing::{trace, warn};

/**
 One raw directory record, borrowed straight out of the scratch buffer.

 Nothing is copied: `name` points into the span the OS filled, so a
 `RawRecord` cannot outlive the batch that produced it.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord<'buf> {
    ino: u64,
    reclen: usize,
    d_type: Option<u8>,
    name: &'buf [u8],
}

impl<'buf> RawRecord<'buf> {
    /// Inode (file number) of the entry
    #[inline]
    #[must_use]
    pub const fn ino(&self) -> u64 {
        self.ino
    }

    /// The record's self declared length, padding included
    #[inline]
    #[must_use]
    pub const fn reclen(&self) -> usize {
        self.reclen
    }

    /// Raw inline type tag, `None` on platforms whose records carry none
    #[inline]
    #[must_use]
    pub const fn d_type(&self) -> Option<u8> {
        self.d_type
    }

    /// Name bytes without the NUL terminator
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'buf [u8] {
        self.name
    }

    /// A zero inode marks a slot whose file was removed but not yet compacted
    #[inline]
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.ino != 0
    }

    #[inline]
    #[must_use]
    pub fn is_dot_or_dot_dot(&self) -> bool {
        matches!(self.name, b"." | b"..")
    }
}

/**
 Walks a span of raw records, yielding the live ones.

 The cursor advances by each record's declared length. Records with a zero
 inode and the `.`/`..` entries are skipped. Every field is read at the
 offsets given by the [`DirentLayout`] with bounds checks. A record that
 can't be decoded (zero length, shorter than its header, running past the
 end of the span, or with an unreadable inode field) ends the walk, and
 [`Records::truncated_at`] then reports the offset it stopped at so callers
 can refuse the batch instead of returning a short listing.

 # Examples
 ```
 use rawdir::fs::{DirentLayout, Records};

 // one Linux `dirent64` for "a": ino 7, reclen 24, DT_REG
 let mut span = [0u8; 24];
 span[..8].copy_from_slice(&7u64.to_ne_bytes());
 span[16..18].copy_from_slice(&24u16.to_ne_bytes());
 span[18] = 8;
 span[19] = b'a';

 let names: Vec<&[u8]> = Records::new(&span, DirentLayout::LINUX).map(|r| r.name()).collect();
 assert_eq!(names, [b"a"]);
 ```
*/
#[derive(Debug, Clone)]
pub struct Records<'buf> {
    span: &'buf [u8],
    cursor: usize,
    layout: DirentLayout,
    truncated_at: Option<usize>,
}

impl<'buf> Records<'buf> {
    #[must_use]
    pub const fn new(span: &'buf [u8], layout: DirentLayout) -> Self {
        Self {
            span,
            cursor: 0,
            layout,
            truncated_at: None,
        }
    }

    /// Offset of the record that could not be decoded, if the walk stopped early
    #[inline]
    #[must_use]
    pub const fn truncated_at(&self) -> Option<usize> {
        self.truncated_at
    }

    /// Gives up on the rest of the span
    fn abandon(&mut self, remaining: usize, what: &'static str) {
        warn!(
            offset = self.cursor,
            remaining,
            "{what}, abandoning the rest of the batch"
        );
        self.truncated_at = Some(self.cursor);
        self.cursor = self.span.len();
    }

    /// Bytes of the span not yet walked
    #[inline]
    #[must_use]
    pub const fn remaining_bytes(&self) -> usize {
        self.span.len() - self.cursor
    }

    /// Decodes the record under the cursor, dead and dot entries included.
    fn next_raw(&mut self) -> Option<RawRecord<'buf>> {
        let rest = &self.span[self.cursor..];
        if rest.is_empty() {
            return None;
        }

        let reclen = self
            .layout
            .reclen
            .read(rest)
            .and_then(|len| usize::try_from(len).ok())
            .filter(|&len| len >= self.layout.header_len() && len <= rest.len());

        let Some(reclen) = reclen else {
            self.abandon(rest.len(), "malformed directory record length");
            return None;
        };

        let record = &rest[..reclen];
        let Some(ino) = self.layout.ino.read(record) else {
            self.abandon(rest.len(), "unreadable inode field in directory record");
            return None;
        };
        self.cursor += reclen;

        let d_type = self.layout.d_type.and_then(|at| record.get(at).copied());

        // bounded by both the fixed array width and the record itself
        let field = &record[self.layout.name..];
        let field = &field[..field.len().min(self.layout.name_capacity)];
        let name = field
            .iter()
            .position(|&b| b == 0)
            .map_or(field, |nul| &field[..nul]);

        Some(RawRecord {
            ino,
            reclen,
            d_type,
            name,
        })
    }
}

impl<'buf> Iterator for Records<'buf> {
    type Item = RawRecord<'buf>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = self.next_raw()?;
            if !record.is_live() {
                trace!(reclen = record.reclen, "skipping deleted directory record");
                continue;
            }
            if record.is_dot_or_dot_dot() {
                continue;
            }
            return Some(record);
        }
    }
}

impl core::iter::FusedIterator for Records<'_> {}
