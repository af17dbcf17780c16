use std::io::Write;

use crate::clock::WallTime;
use crate::format;
use crate::level::Level;
use crate::logger::Logger;
use crate::pool::Scratch;
use crate::tagset::Tag;

/// Byte range into the entry's argument store.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Span {
    pos: u32,
    len: u32,
}

impl Span {
    fn slice<'s>(&self, args: &'s [u8]) -> &'s [u8] {
        &args[self.pos as usize..(self.pos + self.len) as usize]
    }
}

/// Typed value of one key/value field.
///
/// String and error text is copied into the entry's recycled argument
/// store at setter time; the descriptor only carries the span, which
/// keeps the whole record poolable and the hot path allocation-free
/// once buffers are warm.
#[derive(Debug, Clone, Copy)]
pub(crate) enum KvValue {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Str(Span),
    Err(Span),
    Null,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct KvField {
    key: Span,
    value: KvValue,
}

/// A record under construction, returned by the logger's per-level
/// entry points.
///
/// When the call was rejected by the filter the entry is the no-op
/// sentinel: every setter tests for it cheaply and returns `self`
/// unchanged, so call sites chain without branching:
///
/// ```
/// # use taglog::{Logger, sink::WriterSink};
/// let log = Logger::new(WriterSink::new(Vec::new()));
/// let io = log.new_tag("io");
/// log.info(io).str("path", "/tmp/x").int("bytes", 512).write("flushed");
/// ```
///
/// Duplicate keys are permitted and preserved in insertion order;
/// deduplication is the caller's concern. An entry that is dropped
/// without a terminal `write`/`writes` emits nothing and returns its
/// scratch to the pool.
///
/// # Thread Safety
///
/// An entry is a single-owner handle. It must not be shared or
/// published; it lives on one thread from creation to the terminal
/// call.
#[must_use = "an entry emits nothing until write() or writes() is called"]
pub struct Entry<'a> {
    logger: Option<&'a Logger>,
    scratch: Option<Box<Scratch>>,
    level: Level,
    tags: Tag,
}

fn push_bytes(scratch: &mut Scratch, bytes: &[u8]) -> Span {
    let pos = scratch.args.len() as u32;
    scratch.args.extend_from_slice(bytes);
    Span {
        pos,
        len: bytes.len() as u32,
    }
}

impl<'a> Entry<'a> {
    pub(crate) fn live(logger: &'a Logger, scratch: Box<Scratch>, level: Level, tags: Tag) -> Self {
        Self {
            logger: Some(logger),
            scratch: Some(scratch),
            level,
            tags,
        }
    }

    pub(crate) fn disabled(level: Level, tags: Tag) -> Self {
        Self {
            logger: None,
            scratch: None,
            level,
            tags,
        }
    }

    /// True when the filter admitted this call and a record will be
    /// produced.
    pub fn enabled(&self) -> bool {
        self.scratch.is_some()
    }

    fn field(mut self, key: &str, make: impl FnOnce(&mut Scratch) -> KvValue) -> Self {
        if let Some(scratch) = self.scratch.as_mut() {
            let key = push_bytes(scratch, key.as_bytes());
            let value = make(scratch);
            scratch.fields.push(KvField { key, value });
        }
        self
    }

    /// Appends a signed integer field.
    pub fn int(self, key: &str, value: i64) -> Self {
        self.field(key, |_| KvValue::Int(value))
    }

    /// Appends an unsigned integer field.
    pub fn uint(self, key: &str, value: u64) -> Self {
        self.field(key, |_| KvValue::Uint(value))
    }

    /// Appends a float field (rendered with two decimal places).
    pub fn float(self, key: &str, value: f64) -> Self {
        self.field(key, |_| KvValue::Float(value))
    }

    /// Appends a boolean field.
    pub fn bool(self, key: &str, value: bool) -> Self {
        self.field(key, |_| KvValue::Bool(value))
    }

    /// Appends a string field. The value is copied into the entry's
    /// scratch, so the borrow ends when this call returns.
    pub fn str(self, key: &str, value: &str) -> Self {
        self.field(key, |scratch| KvValue::Str(push_bytes(scratch, value.as_bytes())))
    }

    /// Appends an error field under the key `"err"`. `None` renders as
    /// a null value.
    pub fn err(self, error: Option<&dyn std::error::Error>) -> Self {
        self.field("err", |scratch| match error {
            Some(e) => {
                let pos = scratch.args.len() as u32;
                // Writes into the Vec never fail.
                let _ = write!(scratch.args, "{}", e);
                KvValue::Err(Span {
                    pos,
                    len: scratch.args.len() as u32 - pos,
                })
            }
            None => KvValue::Null,
        })
    }

    /// Appends an explicit null field.
    pub fn null(self, key: &str) -> Self {
        self.field(key, |_| KvValue::Null)
    }

    /// Applies a reusable shaping function, e.g. one that attaches a
    /// standard set of request fields, and continues the chain.
    pub fn ext<F>(self, f: F) -> Self
    where
        F: FnOnce(Entry<'a>) -> Entry<'a>,
    {
        f(self)
    }

    /// Finalizes the record with `msg`, hands the bytes to the sink
    /// and recycles the entry. No-op on a filtered-out entry.
    pub fn write(mut self, msg: &str) {
        let logger = match self.logger {
            Some(logger) => logger,
            None => return,
        };
        let mut scratch = match self.scratch.take() {
            Some(scratch) => scratch,
            None => return,
        };
        let header_len = render(logger, &mut scratch, self.level, self.tags, msg.as_bytes());
        logger.emit(self.level, self.tags, &scratch.buf, header_len);
        logger.pool().put(scratch);
    }

    /// Finalizes the record without a message.
    pub fn writes(self) {
        self.write("");
    }
}

impl Drop for Entry<'_> {
    fn drop(&mut self) {
        // Reached only when the entry was abandoned before the
        // terminal call; the scratch still goes back to the pool.
        if let (Some(logger), Some(scratch)) = (self.logger, self.scratch.take()) {
            logger.pool().put(scratch);
        }
    }
}

/// Runs the formatter ops in their fixed order and returns the header
/// boundary (bytes up to and including the tag field) for sinks that
/// route on it.
fn render(logger: &Logger, scratch: &mut Scratch, level: Level, tags: Tag, msg: &[u8]) -> usize {
    let formatter = logger.formatter();
    let flags = logger.format_flags();
    let Scratch { buf, args, fields } = scratch;

    buf.clear();
    let prefix = if flags & format::PREFIX != 0 {
        logger.prefix()
    } else {
        &[][..]
    };
    formatter.start(buf, prefix);
    if flags & format::TIME_ANY != 0 {
        let now = WallTime::now(flags & format::UTC != 0);
        formatter.time(buf, flags, &now);
    }
    if flags & format::LEVEL != 0 {
        formatter.level(buf, level);
    }
    if flags & format::TAG != 0 {
        formatter.tag(buf, logger.tagset(), tags);
    }
    let header_len = buf.len();
    formatter.msg(buf, msg);
    for field in fields.iter() {
        let key = field.key.slice(args);
        match field.value {
            KvValue::Int(v) => formatter.kv_int(buf, key, v),
            KvValue::Uint(v) => formatter.kv_uint(buf, key, v),
            KvValue::Float(v) => formatter.kv_float(buf, key, v),
            KvValue::Bool(v) => formatter.kv_bool(buf, key, v),
            KvValue::Str(span) => formatter.kv_str(buf, key, span.slice(args)),
            KvValue::Err(span) => formatter.kv_error(buf, key, Some(span.slice(args))),
            KvValue::Null => formatter.kv_null(buf, key),
        }
    }
    formatter.finalize(buf);
    header_len
}
