use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};

use parking_lot::RwLock;

use crate::level::Level;
use crate::tagset::Tag;

/// Admission predicate: full override of the (level, mask) rule.
pub type Predicate = Box<dyn Fn(Level, Tag) -> bool + Send + Sync>;

/// Admission policy evaluated on every log call.
///
/// A record is admitted iff:
///
/// 1. a predicate is installed and returns true, OR
/// 2. no predicate is installed AND `level >= level_floor` AND
///    (`tag_mask == 0` OR `tag_mask & tags != 0`).
///
/// The fast path is two atomic loads, a compare and a bitwise AND; the
/// predicate slot is probed through a separate flag so the common
/// no-predicate case never touches the lock.
///
/// # Thread Safety
///
/// `set`/`set_predicate` may be called concurrently with `admit`.
/// Stores and loads are atomic at word granularity; a concurrent reader
/// may observe a recent-but-not-latest threshold, which is acceptable
/// for a logging filter.
pub struct Filter {
    /// Minimum admitted level as a raw `u8`; 0 means no floor.
    level_floor: AtomicU8,
    /// Required tag mask; 0 means no tag constraint.
    tag_mask: AtomicU64,
    /// Probed before taking the predicate lock.
    has_predicate: AtomicBool,
    predicate: RwLock<Option<Predicate>>,
}

impl Filter {
    /// Creates a filter that admits everything.
    pub fn new() -> Self {
        Self {
            level_floor: AtomicU8::new(0),
            tag_mask: AtomicU64::new(0),
            has_predicate: AtomicBool::new(false),
            predicate: RwLock::new(None),
        }
    }

    /// Installs the level floor and tag mask.
    ///
    /// `level_floor == None` clears the floor; `tag_mask == 0` clears
    /// the tag constraint.
    pub fn set(&self, level_floor: Option<Level>, tag_mask: Tag) {
        let raw = level_floor.map_or(0, |l| l as u8);
        self.level_floor.store(raw, Ordering::Release);
        self.tag_mask.store(tag_mask, Ordering::Release);
    }

    /// Installs or clears the override predicate.
    ///
    /// While a predicate is installed it replaces the (floor, mask)
    /// rule entirely, so applications can express policies the library
    /// has no API for, such as sampling or fatal-means-abort.
    pub fn set_predicate(&self, predicate: Option<Predicate>) {
        let mut slot = self.predicate.write();
        self.has_predicate.store(predicate.is_some(), Ordering::Release);
        *slot = predicate;
    }

    /// Decides whether a record at `level` with `tags` produces output.
    #[inline]
    pub fn admit(&self, level: Level, tags: Tag) -> bool {
        if self.has_predicate.load(Ordering::Acquire) {
            if let Some(predicate) = self.predicate.read().as_ref() {
                return predicate(level, tags);
            }
            // Flag raced ahead of a clear; fall through to the rule.
        }
        if (level as u8) < self.level_floor.load(Ordering::Relaxed) {
            return false;
        }
        let mask = self.tag_mask.load(Ordering::Relaxed);
        mask == 0 || mask & tags != 0
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::new()
    }
}
