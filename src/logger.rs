use std::io;

use parking_lot::Mutex;

use crate::entry::Entry;
use crate::filter::{Filter, Predicate};
use crate::format::{self, Flags, Formatter};
use crate::json::JsonFormatter;
use crate::level::Level;
use crate::pool::Pool;
use crate::sink::Sink;
use crate::tagset::{Tag, TagSet};

/// Diagnostic hook receiving errors from a failed sink write.
pub type ErrorHook = Box<dyn Fn(&io::Error) + Send + Sync>;

/// The orchestrator: owns the filter, the tag registry, the buffer
/// pool, the formatter, the sink and the format configuration, and
/// produces entry builders.
///
/// A `Logger` is configured once, then shared by reference across
/// threads with no external synchronization. Every surface except
/// construction is infallible by contract: sink I/O errors are
/// swallowed (observable only through [`Logger::set_error_hook`]), and
/// configuration problems are signaled with sentinel values, never
/// panics.
///
/// # Hot path
///
/// ```
/// # use taglog::{Logger, sink::WriterSink};
/// let log = Logger::new(WriterSink::new(Vec::new()));
/// let io = log.new_tag("io");
/// let net = log.new_tag("net");
///
/// log.info(io | net)
///     .str("path", "/var/data")
///     .int("status", 200)
///     .float("ms", 4.2)
///     .write("request ok");
/// ```
///
/// A call below the filter threshold returns a no-op entry, so the
/// chain above costs a few atomic loads and nothing else when
/// rejected.
///
/// # Thread Safety
///
/// Mutating configuration (`set_formatter`, `set_format_flags`,
/// `set_prefix`, `set_sink`) requires `&mut self` and therefore happens
/// before the logger is shared. The filter controls (`set_filter`,
/// `set_predicate`) are atomic and may be flipped at any time from any
/// thread.
pub struct Logger {
    filter: Filter,
    tagset: TagSet,
    pool: Pool,
    formatter: Box<dyn Formatter>,
    sink: Box<dyn Sink>,
    flags: Flags,
    prefix: Vec<u8>,
    error_hook: Option<ErrorHook>,
    /// Taken around the sink write only when the sink is not
    /// line-atomic.
    sink_lock: Mutex<()>,
    sink_line_atomic: bool,
}

impl Logger {
    /// Creates a logger writing JSON records to `sink`.
    ///
    /// Defaults: no filter, [`format::DEFAULT_FLAGS`] (level and tag
    /// headers, no time fields), empty prefix.
    pub fn new(sink: impl Sink + 'static) -> Self {
        let sink_line_atomic = sink.line_atomic();
        Self {
            filter: Filter::new(),
            tagset: TagSet::new(),
            pool: Pool::new(),
            formatter: Box::new(JsonFormatter::new()),
            sink: Box::new(sink),
            flags: format::DEFAULT_FLAGS,
            prefix: Vec::new(),
            error_hook: None,
            sink_lock: Mutex::new(()),
            sink_line_atomic,
        }
    }

    /// Installs the admission threshold: minimum level and required
    /// tag mask. `None`/`0` lift the respective constraint.
    pub fn set_filter(&self, level_floor: Option<Level>, tag_mask: Tag) {
        self.filter.set(level_floor, tag_mask);
    }

    /// Installs a predicate that fully overrides the threshold rule,
    /// or clears it with `None`.
    pub fn set_predicate(&self, predicate: Option<Predicate>) {
        self.filter.set_predicate(predicate);
    }

    /// Replaces the formatter.
    pub fn set_formatter(&mut self, formatter: impl Formatter + 'static) {
        self.formatter = Box::new(formatter);
    }

    /// Replaces the format flag set.
    pub fn set_format_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    /// Sets the prefix emitted before each record when the
    /// [`format::PREFIX`] flag is set.
    pub fn set_prefix(&mut self, prefix: &str) {
        self.prefix.clear();
        self.prefix.extend_from_slice(prefix.as_bytes());
    }

    /// Replaces the sink.
    pub fn set_sink(&mut self, sink: impl Sink + 'static) {
        self.sink_line_atomic = sink.line_atomic();
        self.sink = Box::new(sink);
    }

    /// Installs a diagnostic hook invoked with every swallowed sink
    /// error. Optional; without it sink errors vanish silently, which
    /// is the contract.
    pub fn set_error_hook(&mut self, hook: Option<ErrorHook>) {
        self.error_hook = hook;
    }

    /// Applies a configuration extension that takes and returns the
    /// logger by value, for composable setup helpers.
    ///
    /// ```
    /// # use taglog::{format, Logger, sink::WriterSink};
    /// fn unix_stamps(mut log: Logger) -> Logger {
    ///     log.set_format_flags(format::DEFAULT_FLAGS | format::TIME_UNIX_MS);
    ///     log
    /// }
    ///
    /// let log = Logger::new(WriterSink::new(Vec::new())).with(unix_stamps);
    /// ```
    pub fn with(self, ext: impl FnOnce(Logger) -> Logger) -> Logger {
        ext(self)
    }

    /// Registers a tag name, returning its bit. See
    /// [`TagSet::get_or_register`] for the idempotence and overflow
    /// rules.
    pub fn new_tag(&self, name: &'static str) -> Tag {
        self.tagset.get_or_register(name)
    }

    /// Looks up a previously registered tag.
    pub fn get_tag(&self, name: &str) -> Option<Tag> {
        self.tagset.get(name)
    }

    /// Closes the sink. Records written after this depend on the
    /// sink's behavior; the logger itself keeps working.
    pub fn close(&self) -> io::Result<()> {
        self.sink.close()
    }

    pub fn trace(&self, tags: Tag) -> Entry<'_> {
        self.entry(Level::Trace, tags)
    }

    pub fn debug(&self, tags: Tag) -> Entry<'_> {
        self.entry(Level::Debug, tags)
    }

    pub fn info(&self, tags: Tag) -> Entry<'_> {
        self.entry(Level::Info, tags)
    }

    pub fn warn(&self, tags: Tag) -> Entry<'_> {
        self.entry(Level::Warn, tags)
    }

    pub fn error(&self, tags: Tag) -> Entry<'_> {
        self.entry(Level::Error, tags)
    }

    /// Highest severity. Does not terminate the process; install a
    /// predicate if fatal-means-abort is wanted.
    pub fn fatal(&self, tags: Tag) -> Entry<'_> {
        self.entry(Level::Fatal, tags)
    }

    fn entry(&self, level: Level, tags: Tag) -> Entry<'_> {
        if !self.filter.admit(level, tags) {
            return Entry::disabled(level, tags);
        }
        Entry::live(self, self.pool.get(), level, tags)
    }

    pub(crate) fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    pub(crate) fn format_flags(&self) -> Flags {
        self.flags
    }

    pub(crate) fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    pub(crate) fn tagset(&self) -> &TagSet {
        &self.tagset
    }

    pub(crate) fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Forwards one finished record to the sink, serializing the call
    /// when the sink is not line-atomic, and swallows any I/O error.
    pub(crate) fn emit(&self, level: Level, tags: Tag, record: &[u8], header_len: usize) {
        let result = if self.sink_line_atomic {
            self.sink.write_tagged(level, tags, record, header_len)
        } else {
            let _guard = self.sink_lock.lock();
            self.sink.write_tagged(level, tags, record, header_len)
        };
        if let Err(e) = result {
            if let Some(hook) = &self.error_hook {
                hook(&e);
            }
        }
    }
}
