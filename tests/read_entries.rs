use rawdir::fs::{DirentSource, FileDes, ScratchBuffer};
use rawdir::{ErrorKind, FileType, LinkPolicy, ReadOptions, read_entries, read_names};
use std::cell::Cell;
use std::collections::HashSet;
use std::ffi::{CString, OsString};
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{PermissionsExt, symlink};
use std::path::Path;
use tempfile::TempDir;

/// Wraps a real descriptor and wipes every inline type tag after each batch,
/// as a filesystem that never fills in `d_type` would.
struct EraseTags {
    inner: FileDes,
    stats: Cell<usize>,
}

impl EraseTags {
    fn open(path: &Path) -> Self {
        Self {
            inner: FileDes::open_dir(path).unwrap(),
            stats: Cell::new(0),
        }
    }
}

impl DirentSource for EraseTags {
    fn read_batch(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let filled = self.inner.read_batch(buf)?;
        let layout = self.layout();
        if let Some(at) = layout.d_type {
            let mut cursor = 0;
            while cursor < filled {
                let Some(reclen) = layout.reclen.read(&buf[cursor..filled]) else {
                    break;
                };
                let reclen = usize::try_from(reclen).unwrap();
                if reclen == 0 {
                    break;
                }
                buf[cursor + at] = 0; // DT_UNKNOWN
                cursor += reclen;
            }
        }
        Ok(filled)
    }

    fn stat_mode(&self, name: &[u8], links: LinkPolicy) -> io::Result<libc::mode_t> {
        self.stats.set(self.stats.get() + 1);
        self.inner.stat_mode(name, links)
    }

    fn close(self) -> io::Result<()> {
        self.inner.close()
    }
}

fn mkfifo(path: &Path) {
    let c_path = CString::new(path.as_os_str().as_bytes()).unwrap();
    // SAFETY: valid null terminated path
    let res = unsafe { libc::mkfifo(c_path.as_ptr(), 0o644) };
    assert_eq!(res, 0, "mkfifo failed: {}", io::Error::last_os_error());
}

/// `a` regular file, `b` directory, `c` symlink to `b`
fn scenario_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a"), b"contents").unwrap();
    fs::create_dir(dir.path().join("b")).unwrap();
    symlink("b", dir.path().join("c")).unwrap();
    dir
}

fn sorted_types(entries: &[rawdir::DirEntry]) -> Vec<(OsString, FileType)> {
    let mut pairs: Vec<_> = entries
        .iter()
        .map(|e| (e.file_name().to_os_string(), e.file_type()))
        .collect();
    pairs.sort();
    pairs
}

#[test]
fn regular_dir_and_symlink_scenario() {
    let dir = scenario_dir();
    let entries = read_entries(dir.path()).unwrap();

    assert_eq!(
        sorted_types(&entries),
        vec![
            (OsString::from("a"), FileType::RegularFile),
            (OsString::from("b"), FileType::Directory),
            (OsString::from("c"), FileType::Symlink),
        ]
    );

    let names = read_names(dir.path()).unwrap();
    let projected: Vec<OsString> = entries.into_iter().map(|e| e.into_file_name()).collect();
    assert_eq!(names, projected);
}

#[test]
fn names_match_entries_in_order() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..200 {
        fs::write(dir.path().join(format!("entry_{i}")), b"").unwrap();
    }
    let entries = read_entries(dir.path()).unwrap();
    let names = read_names(dir.path()).unwrap();
    let projected: Vec<_> = entries.iter().map(|e| e.file_name().to_os_string()).collect();
    assert_eq!(names, projected);
}

#[test]
fn every_live_entry_appears_once() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..1500 {
        // long-ish names so the listing needs several 4 KiB batches
        fs::write(dir.path().join(format!("a_reasonably_long_file_name_{i:05}.dat")), b"").unwrap();
    }
    fs::create_dir(dir.path().join("sub")).unwrap();

    let entries = ReadOptions::new().buffer_size(4096).read_entries(dir.path()).unwrap();
    assert_eq!(entries.len(), 1501);

    let distinct: HashSet<_> = entries.iter().map(|e| e.file_name().to_os_string()).collect();
    assert_eq!(distinct.len(), entries.len());
    for entry in &entries {
        assert!(entry.path_in(dir.path()).symlink_metadata().is_ok());
        assert_ne!(entry.as_bytes(), b".");
        assert_ne!(entry.as_bytes(), b"..");
    }
}

#[test]
fn removed_entries_are_gone() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..64 {
        fs::write(dir.path().join(format!("f{i}")), b"").unwrap();
    }
    for i in (0..64).step_by(2) {
        fs::remove_file(dir.path().join(format!("f{i}"))).unwrap();
    }

    let names: HashSet<_> = read_names(dir.path()).unwrap().into_iter().collect();
    assert_eq!(names.len(), 32);
    for i in 0..64 {
        assert_eq!(names.contains(&OsString::from(format!("f{i}"))), i % 2 == 1);
    }
}

#[test]
fn empty_directory_lists_nothing() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_entries(dir.path()).unwrap().is_empty());
    assert!(read_names(dir.path()).unwrap().is_empty());
}

#[test]
fn longest_names_are_kept_whole() {
    let dir = tempfile::tempdir().unwrap();
    let long = "n".repeat(255);
    fs::write(dir.path().join(&long), b"").unwrap();

    let names = read_names(dir.path()).unwrap();
    assert_eq!(names, vec![OsString::from(long)]);
}

#[test]
fn missing_directory_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does_not_exist");

    let err = read_entries(&missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Open);
    assert_eq!(err.path(), missing);
    assert!(err.is_not_found());

    assert_eq!(read_names(&missing).unwrap_err().kind(), ErrorKind::Open);
}

#[test]
fn file_is_an_open_error() {
    let dir = scenario_dir();
    let err = read_entries(dir.path().join("a")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Open);
    assert_eq!(err.raw_os_error(), Some(libc::ENOTDIR));
}

#[test]
fn symlink_to_directory_can_be_listed() {
    let dir = scenario_dir();
    fs::write(dir.path().join("b").join("inner"), b"").unwrap();
    let names = read_names(dir.path().join("c")).unwrap();
    assert_eq!(names, vec![OsString::from("inner")]);
}

#[test]
fn special_files_are_typed() {
    let dir = tempfile::tempdir().unwrap();
    mkfifo(&dir.path().join("pipe"));
    let _listener = std::os::unix::net::UnixListener::bind(dir.path().join("sock")).unwrap();

    let types = sorted_types(&read_entries(dir.path()).unwrap());
    assert_eq!(
        types,
        vec![
            (OsString::from("pipe"), FileType::Fifo),
            (OsString::from("sock"), FileType::Socket),
        ]
    );
}

#[test]
fn fallback_resolves_types_without_inline_tags() {
    let dir = scenario_dir();
    mkfifo(&dir.path().join("pipe"));

    let source = EraseTags::open(dir.path());
    let mut buf = ScratchBuffer::new();
    let entries = ReadOptions::new()
        .read_from(source, dir.path(), &mut buf)
        .unwrap();
    assert_eq!(
        sorted_types(&entries),
        vec![
            (OsString::from("a"), FileType::RegularFile),
            (OsString::from("b"), FileType::Directory),
            (OsString::from("c"), FileType::Symlink),
            (OsString::from("pipe"), FileType::Fifo),
        ]
    );
    assert_eq!(sorted_types(&entries), sorted_types(&read_entries(dir.path()).unwrap()));
}

#[test]
fn fallback_stats_every_untagged_entry() {
    let dir = scenario_dir();
    let mut source = EraseTags::open(dir.path());
    let mut buf = vec![0u8; 4096];

    let mut untagged = 0;
    loop {
        let filled = source.read_batch(&mut buf).unwrap();
        if filled == 0 {
            break;
        }
        for record in rawdir::fs::Records::new(&buf[..filled], source.layout()) {
            assert!(record.d_type().is_none_or(|tag| tag == 0));
            let mode = source.stat_mode(record.name(), LinkPolicy::NoFollow).unwrap();
            assert_ne!(FileType::from_mode(mode), FileType::Unknown);
            untagged += 1;
        }
    }
    assert_eq!(untagged, 3);
    assert_eq!(source.stats.get(), 3);
    source.close().unwrap();
}

#[test]
fn fallback_follow_policy_reports_link_targets() {
    let dir = scenario_dir();
    let mut buf = ScratchBuffer::new();
    let entries = ReadOptions::new()
        .link_policy(LinkPolicy::Follow)
        .read_from(EraseTags::open(dir.path()), dir.path(), &mut buf)
        .unwrap();
    let link = entries.iter().find(|e| e.file_name() == "c").unwrap();
    assert_eq!(link.file_type(), FileType::Directory);

    // with inline tags present the policy is never consulted
    let tagged = ReadOptions::new()
        .link_policy(LinkPolicy::Follow)
        .read_entries(dir.path())
        .unwrap();
    if rawdir::fs::DirentLayout::NATIVE.has_inline_type() {
        let link = tagged.iter().find(|e| e.file_name() == "c").unwrap();
        assert_eq!(link.file_type(), FileType::Symlink);
    }
}

#[test]
fn fallback_failure_is_a_stat_error() {
    let dir = tempfile::tempdir().unwrap();
    symlink("nowhere", dir.path().join("dangling")).unwrap();
    let mut buf = ScratchBuffer::new();

    let err = ReadOptions::new()
        .link_policy(LinkPolicy::Follow)
        .read_from(EraseTags::open(dir.path()), dir.path(), &mut buf)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Stat);
    assert_eq!(err.path(), dir.path().join("dangling"));

    // without following, the dangling link itself is perfectly listable
    let entries = ReadOptions::new()
        .read_from(EraseTags::open(dir.path()), dir.path(), &mut buf)
        .unwrap();
    assert_eq!(entries[0].file_type(), FileType::Symlink);
}

#[test]
fn permission_bits_do_not_change_the_type() {
    let dir = tempfile::tempdir().unwrap();
    let modes = [0o000, 0o444, 0o600, 0o755, 0o4755];
    for mode in modes {
        let path = dir.path().join(format!("m{mode:o}"));
        fs::write(&path, b"").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
    }

    let mut buf = ScratchBuffer::new();
    let tagged = ReadOptions::new().read_entries_in(dir.path(), &mut buf).unwrap();
    let untagged = ReadOptions::new()
        .read_from(EraseTags::open(dir.path()), dir.path(), &mut buf)
        .unwrap();

    assert_eq!(tagged.len(), modes.len());
    assert!(tagged.iter().chain(&untagged).all(|e| e.file_type() == FileType::RegularFile));
}

#[test]
fn one_buffer_serves_many_directories() {
    let first = scenario_dir();
    let second = tempfile::tempdir().unwrap();
    fs::write(second.path().join("only"), b"").unwrap();

    let mut buf = ScratchBuffer::with_capacity(8192);
    let options = ReadOptions::new();
    let a = options.read_entries_in(first.path(), &mut buf).unwrap();
    let b = options.read_entries_in(second.path(), &mut buf).unwrap();
    let again = options.read_entries_in(first.path(), &mut buf).unwrap();

    assert_eq!(a.len(), 3);
    assert_eq!(b.len(), 1);
    assert_eq!(b[0].file_name(), "only");
    assert_eq!(a, again);
}
