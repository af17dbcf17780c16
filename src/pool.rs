use parking_lot::Mutex;

use crate::entry::KvField;

/// Recycled scratch records backing the hot path.
///
/// Every admitted log call borrows one `Scratch` from the pool, builds
/// its record in it and hands it back. Capacity is preserved across
/// cycles, so after a short warm-up the steady state performs no heap
/// allocation at all.
///
/// # Thread Safety
///
/// `get`/`put` are safe under concurrent access from any number of
/// threads. A `Scratch` that has been lent out is owned exclusively by
/// the borrowing call until it is returned.

/// Starting capacity of the record buffer in bytes.
const INITIAL_BUF: usize = 512;
/// Starting capacity of the key/value argument store in bytes.
const INITIAL_ARGS: usize = 256;
/// Starting capacity of the field descriptor list.
const INITIAL_FIELDS: usize = 10;
/// A scratch whose buffers grew past this many bytes is dropped on
/// return instead of recycled, so one oversized record cannot pin
/// memory indefinitely.
const MAX_RETAINED: usize = 8 * 1024;
/// Upper bound on the free list length.
const MAX_POOLED: usize = 64;

/// One recyclable record workspace: the output buffer, the byte store
/// holding copied keys and string values, and the field descriptors
/// pointing into it.
pub struct Scratch {
    pub(crate) buf: Vec<u8>,
    pub(crate) args: Vec<u8>,
    pub(crate) fields: Vec<KvField>,
}

impl Scratch {
    fn new() -> Box<Self> {
        Box::new(Self {
            buf: Vec::with_capacity(INITIAL_BUF),
            args: Vec::with_capacity(INITIAL_ARGS),
            fields: Vec::with_capacity(INITIAL_FIELDS),
        })
    }

    fn clear(&mut self) {
        self.buf.clear();
        self.args.clear();
        self.fields.clear();
    }
}

/// Concurrent free list of [`Scratch`] records.
///
/// `get` never fails: when the free list is empty a fresh scratch is
/// minted on demand. Correctness never depends on object identity
/// across get/put cycles, and the pool may drop records at any time to
/// bound memory.
pub struct Pool {
    free: Mutex<Vec<Box<Scratch>>>,
}

impl Pool {
    pub fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Borrows a scratch record, minting one when the free list is
    /// empty.
    pub fn get(&self) -> Box<Scratch> {
        if let Some(scratch) = self.free.lock().pop() {
            return scratch;
        }
        Scratch::new()
    }

    /// Returns a scratch record to the free list.
    ///
    /// Contents are truncated (capacity preserved); oversized records
    /// and records beyond the free-list bound are dropped instead.
    pub fn put(&self, mut scratch: Box<Scratch>) {
        if scratch.buf.capacity() > MAX_RETAINED || scratch.args.capacity() > MAX_RETAINED {
            return;
        }
        scratch.clear();
        let mut free = self.free.lock();
        if free.len() < MAX_POOLED {
            free.push(scratch);
        }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}
