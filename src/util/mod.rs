mod syscalls;

pub(crate) use syscalls::read_dirents;
