use crate::clock::WallTime;
use crate::level::Level;
use crate::tagset::{Tag, TagSet};

/// Format flags and the formatter operation surface.
///
/// A formatter is a set of append operations on a growable byte
/// buffer: each op takes the record under construction and appends its
/// piece. The entry builder drives the ops in a fixed order; which
/// header ops run at all is governed by the logger's format flags.

/// Bit vector selecting which header fields a record carries.
pub type Flags = u32;

/// Emit the logger's configured prefix before the record body.
pub const PREFIX: Flags = 1 << 0;
/// Emit the calendar date as decimal `YYYYMMDD`.
pub const DATE: Flags = 1 << 1;
/// Emit the day of week (0 = Sunday).
pub const DATE_DAY: Flags = 1 << 2;
/// Emit the time of day as decimal `HHMMSS`.
pub const TIME: Flags = 1 << 3;
/// With [`TIME`]: millisecond precision, `HHMMSS.mmm`.
pub const TIME_MS: Flags = 1 << 4;
/// Emit a Unix-seconds stamp instead of the civil fields.
pub const TIME_UNIX: Flags = 1 << 5;
/// Emit a Unix-milliseconds stamp; wins over every other time flag.
pub const TIME_UNIX_MS: Flags = 1 << 6;
/// Decompose the civil date/time fields in UTC instead of local time.
pub const UTC: Flags = 1 << 7;
/// Emit the record's severity level.
pub const LEVEL: Flags = 1 << 8;
/// Emit the record's tag list.
pub const TAG: Flags = 1 << 9;

/// Every flag that requests some time field; when none of these is set
/// the clock is never sampled.
pub const TIME_ANY: Flags = DATE | DATE_DAY | TIME | TIME_MS | TIME_UNIX | TIME_UNIX_MS;

/// Default flag set for a fresh logger: level and tag list, no time.
pub const DEFAULT_FLAGS: Flags = LEVEL | TAG;

/// Strategy assembling the bytes of one record.
///
/// Implementations append onto the entry's recycled scratch buffer and
/// must not allocate on their own account. The entry builder calls the
/// ops in a fixed order: `start`, `time`, `level`, `tag`, `msg`, one
/// `kv_*` per field, then `finalize`, which also appends the single
/// `\n` record terminator.
///
/// The two stock implementations are [`crate::json::JsonFormatter`]
/// (the default) and [`crate::text::TextFormatter`]; both are small
/// enough that a custom formatter is reasonable to write against the
/// same surface.
pub trait Formatter: Send + Sync {
    /// Opens the record; `prefix` is empty unless the [`PREFIX`] flag
    /// is set.
    fn start(&self, dst: &mut Vec<u8>, prefix: &[u8]);

    /// Appends the time fields selected by `flags`.
    ///
    /// Precedence: [`TIME_UNIX_MS`] alone, else [`TIME_UNIX`] alone,
    /// else the civil fields ([`DATE`], [`DATE_DAY`], [`TIME`] with
    /// optional [`TIME_MS`]) in that order.
    fn time(&self, dst: &mut Vec<u8>, flags: Flags, t: &WallTime);

    /// Appends the severity field.
    fn level(&self, dst: &mut Vec<u8>, level: Level);

    /// Appends the tag list; renders an empty list when `tags == 0`.
    fn tag(&self, dst: &mut Vec<u8>, tagset: &TagSet, tags: Tag);

    /// Appends the message field; appends nothing when `msg` is empty.
    fn msg(&self, dst: &mut Vec<u8>, msg: &[u8]);

    fn kv_int(&self, dst: &mut Vec<u8>, key: &[u8], v: i64);
    fn kv_uint(&self, dst: &mut Vec<u8>, key: &[u8], v: u64);
    fn kv_float(&self, dst: &mut Vec<u8>, key: &[u8], v: f64);
    fn kv_bool(&self, dst: &mut Vec<u8>, key: &[u8], v: bool);
    fn kv_str(&self, dst: &mut Vec<u8>, key: &[u8], v: &[u8]);

    /// Appends an error field; `None` renders as a null value.
    fn kv_error(&self, dst: &mut Vec<u8>, key: &[u8], msg: Option<&[u8]>);

    /// Appends an explicit null value.
    fn kv_null(&self, dst: &mut Vec<u8>, key: &[u8]);

    /// Trims any trailing field separator and closes the record with
    /// its terminator (exactly one `\n`).
    fn finalize(&self, dst: &mut Vec<u8>);
}
