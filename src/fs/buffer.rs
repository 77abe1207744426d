use crate::fs::{DEFAULT_BUFFER_SIZE, MIN_BUFFER_SIZE};

/**
 The reusable byte buffer handed to the batch read primitive.

 One buffer serves one directory read at a time: the read loop borrows it
 mutably, the OS overwrites it on every call, and the decoder only ever sees
 `&buf[..n]` for the `n` bytes the last call produced. Because records borrow
 from that span, the borrow checker rejects keeping one across a refill;
 names are copied out before the next call.

 Keep one around and pass it to [`crate::ReadOptions::read_entries_in`] to
 read many directories without reallocating.

 # Examples
 ```
 use rawdir::fs::ScratchBuffer;

 let buf = ScratchBuffer::with_capacity(100);
 // Too small to hold one maximal record, so it is rounded up
 assert_eq!(buf.capacity(), rawdir::fs::MIN_BUFFER_SIZE);
 ```
*/
#[derive(Debug, Clone)]
pub struct ScratchBuffer {
    data: Box<[u8]>,
}

impl ScratchBuffer {
    /// A buffer of [`DEFAULT_BUFFER_SIZE`] bytes
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    /// A buffer of `capacity` bytes, raised to [`MIN_BUFFER_SIZE`] if smaller
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity.max(MIN_BUFFER_SIZE)].into_boxed_slice(),
        }
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// The whole buffer, for the OS to write into
    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The first `len` bytes, i.e. what the last batch read produced
    #[inline]
    #[must_use]
    pub fn filled(&self, len: usize) -> &[u8] {
        &self.data[..len.min(self.data.len())]
    }
}

impl Default for ScratchBuffer {
    fn default() -> Self {
        Self::new()
    }
}
