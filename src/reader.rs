use crate::config::LinkPolicy;
use crate::fs::{DirEntry, DirentSource, FileType, RawRecord, Records, ScratchBuffer, TypeTags};
use crate::{DirError, Result};
use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use tracing::{debug, trace};

/// Drains `source` and closes it. The first failure wins; a close error only
/// surfaces when everything before it succeeded.
pub(crate) fn collect_entries<S: DirentSource>(
    mut source: S,
    dir: &Path,
    buf: &mut ScratchBuffer,
    links: LinkPolicy,
) -> Result<Vec<DirEntry>> {
    let drained = drain(&mut source, dir, buf, links);
    let closed = source.close();

    match (drained, closed) {
        (Ok(entries), Ok(())) => {
            debug!(path = %dir.display(), entries = entries.len(), "read directory");
            Ok(entries)
        }
        (Ok(_), Err(e)) => Err(DirError::close(dir, e)),
        (Err(e), closed) => {
            if let Err(close_err) = closed {
                debug!(path = %dir.display(), error = %close_err, "close failed after an earlier error");
            }
            Err(e)
        }
    }
}

fn drain<S: DirentSource>(
    source: &mut S,
    dir: &Path,
    buf: &mut ScratchBuffer,
    links: LinkPolicy,
) -> Result<Vec<DirEntry>> {
    let layout = source.layout();
    let mut entries = Vec::new();

    loop {
        let filled = source
            .read_batch(buf.as_mut_slice())
            .map_err(|e| DirError::read(dir, e))?;
        if filled == 0 {
            return Ok(entries);
        }
        if filled > buf.capacity() {
            return Err(DirError::read(
                dir,
                invalid_data(format!(
                    "batch read reported {filled} bytes into a {} byte buffer",
                    buf.capacity()
                )),
            ));
        }
        trace!(bytes = filled, "read directory batch");

        // Every name is copied out here, nothing borrows `buf` past this loop
        let mut records = Records::new(buf.filled(filled), layout);
        for record in records.by_ref() {
            let file_type = resolve_type(&*source, dir, &record, &layout.tags, links)?;
            entries.push(DirEntry::new(record.name(), file_type));
        }
        if let Some(offset) = records.truncated_at() {
            return Err(DirError::read(
                dir,
                invalid_data(format!(
                    "malformed directory record at offset {offset} of a {filled} byte batch"
                )),
            ));
        }
    }
}

fn invalid_data(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Inline tag first, `fstatat` on the entry when the tag is missing or inconclusive.
fn resolve_type<S: DirentSource>(
    source: &S,
    dir: &Path,
    record: &RawRecord<'_>,
    tags: &TypeTags,
    links: LinkPolicy,
) -> Result<FileType> {
    if let Some(file_type) = record.d_type().and_then(|tag| FileType::from_tag(tag, tags)) {
        return Ok(file_type);
    }

    let name = OsStr::from_bytes(record.name());
    debug!(entry = ?name, tag = ?record.d_type(), "no usable inline type, falling back to stat");
    source
        .stat_mode(record.name(), links)
        .map(FileType::from_mode)
        .map_err(|e| DirError::stat(dir.join(name), e))
}
