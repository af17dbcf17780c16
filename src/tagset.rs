use std::collections::HashMap;

use parking_lot::RwLock;

/// Tag registry mapping names to bits of a 64-bit mask.
///
/// This module provides the tag side of admission filtering: each named
/// tag is assigned one bit of a `u64`, so a record's tag set is a plain
/// bitmask and membership tests compile down to a single AND.
///
/// # Thread Safety
///
/// The registry is guarded by a read/write lock so `get_or_register`
/// can be called through a shared logger reference during setup. The
/// design assumes registration is complete before concurrent logging
/// begins; after that point the registry is only read.

/// A tag value: one bit (or an OR of bits) of a 64-bit mask.
///
/// `TAG_NONE` (0) means "no tag". Tags combine by bitwise OR:
/// `io | net` is the set containing both.
pub type Tag = u64;

/// The empty tag set, also returned by [`TagSet::get_or_register`] when
/// the registry is full.
pub const TAG_NONE: Tag = 0;

/// Maximum number of distinct named tags per registry.
///
/// Bit 63 stays unassigned so that the all-zero value can serve as the
/// "no tag / overflow" sentinel while every named tag keeps a distinct
/// nonzero bit.
pub const MAX_TAGS: usize = 63;

struct Registry {
    by_name: HashMap<&'static str, Tag>,
    /// Names in registration order; index is the bit position.
    names: Vec<&'static str>,
}

/// Registry assigning stable bits to tag names.
///
/// Bits are handed out in registration order, which is observable when
/// tag lists are rendered: earlier-registered names print first.
///
/// # Examples
///
/// ```
/// # use taglog::tagset::TagSet;
/// let tags = TagSet::new();
/// let io = tags.get_or_register("io");
/// let net = tags.get_or_register("net");
///
/// // Registration is idempotent
/// assert_eq!(io, tags.get_or_register("io"));
/// assert_ne!(io, net);
///
/// // Lookup without registering
/// assert_eq!(tags.get("io"), Some(io));
/// assert_eq!(tags.get("disk"), None);
/// ```
pub struct TagSet {
    registry: RwLock<Registry>,
}

impl TagSet {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry {
                by_name: HashMap::new(),
                names: Vec::new(),
            }),
        }
    }

    /// Looks up a name without registering it.
    ///
    /// Lookup is case-sensitive and exact.
    pub fn get(&self, name: &str) -> Option<Tag> {
        self.registry.read().by_name.get(name).copied()
    }

    /// Returns the tag for `name`, assigning the next free bit on first
    /// use.
    ///
    /// Registration is idempotent: the same name always maps to the
    /// same bit. When all [`MAX_TAGS`] bits are taken, new names get
    /// [`TAG_NONE`]; a process is expected to stay well under the
    /// ceiling.
    pub fn get_or_register(&self, name: &'static str) -> Tag {
        // Fast path: name already registered
        if let Some(tag) = self.get(name) {
            return tag;
        }

        let mut registry = self.registry.write();
        // Re-check under the write lock; another thread may have won.
        if let Some(&tag) = registry.by_name.get(name) {
            return tag;
        }
        if registry.names.len() >= MAX_TAGS {
            return TAG_NONE;
        }
        let tag: Tag = 1 << registry.names.len();
        registry.names.push(name);
        registry.by_name.insert(name, tag);
        tag
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.registry.read().names.len()
    }

    /// True when no tags have been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends the names of every bit set in `tags` to `dst`, joined by
    /// `sep` (0 = no separator), each optionally wrapped in double
    /// quotes.
    ///
    /// Names are emitted in registration order. Bits without a
    /// registered name are skipped; `tags == 0` appends nothing.
    pub fn append_names(&self, dst: &mut Vec<u8>, tags: Tag, sep: u8, quote: bool) {
        if tags == 0 {
            return;
        }
        let registry = self.registry.read();
        let mut first = true;
        for (bit, name) in registry.names.iter().enumerate() {
            if tags & (1u64 << bit) == 0 {
                continue;
            }
            if !first && sep != 0 {
                dst.push(sep);
            }
            first = false;
            if quote {
                dst.push(b'"');
            }
            dst.extend_from_slice(name.as_bytes());
            if quote {
                dst.push(b'"');
            }
        }
    }
}

impl Default for TagSet {
    fn default() -> Self {
        Self::new()
    }
}
