use std::io;

use parking_lot::Mutex;

use crate::level::Level;
use crate::tagset::Tag;

/// Destination for finished records.
///
/// Implementations of this trait determine what happens with a record
/// after it is fully formatted: writing to a file, collecting in
/// memory, routing by severity. The sink is the only fallible edge of
/// the logging pipeline, and the logger swallows its errors; a log call
/// never fails, never blocks beyond the write itself, and is never
/// retried.
///
/// Dispatch is per completed record, one call per record, never per
/// byte.
pub trait Sink: Send + Sync {
    /// Consumes one complete record, terminated with a newline.
    fn write(&self, record: &[u8]) -> io::Result<usize>;

    /// Conditional variant receiving the record's level and tags plus
    /// the header boundary (bytes up to and including the tag field),
    /// for sinks that route by severity or strip headers. The default
    /// forwards to [`Sink::write`].
    fn write_tagged(
        &self,
        _level: Level,
        _tags: Tag,
        record: &[u8],
        _header_len: usize,
    ) -> io::Result<usize> {
        self.write(record)
    }

    /// Releases resources on logger shutdown. The default does
    /// nothing.
    fn close(&self) -> io::Result<()> {
        Ok(())
    }

    /// True when a single `write` call lands atomically at the
    /// destination (a file handle, a line-buffered pipe). When false
    /// the logger serializes writes behind a mutex so records never
    /// interleave.
    fn line_atomic(&self) -> bool {
        true
    }
}

/// Adapter turning any `io::Write` into a sink.
///
/// The writer sits behind a mutex, so a `File`, standard output or a
/// byte vector all work unchanged.
///
/// # Examples
///
/// ```no_run
/// # use taglog::{Logger, sink::WriterSink};
/// # use std::fs::File;
/// let file = File::create("app.log").unwrap();
/// let log = Logger::new(WriterSink::new(file));
/// log.info(0).write("started");
/// ```
pub struct WriterSink<W> {
    inner: Mutex<W>,
}

impl<W: io::Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }
}

impl<W: io::Write + Send> Sink for WriterSink<W> {
    fn write(&self, record: &[u8]) -> io::Result<usize> {
        let mut writer = self.inner.lock();
        writer.write_all(record)?;
        Ok(record.len())
    }

    fn close(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}
