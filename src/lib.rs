//! # taglog
//!
//! An allocation-free structured logging library for high-throughput
//! server processes, where each log call must complete in a small,
//! bounded number of nanoseconds and must not add heap pressure in the
//! steady state.
//!
//! ## Key Features
//!
//! * Zero-allocation hot path: record buffers and field lists are
//!   recycled through a concurrent pool
//! * Leveled, tag-filtered admission decided up front with a handful
//!   of atomic loads, a compare and a bitwise AND
//! * Chainable typed setters (`str`, `int`, `float`, ...) building
//!   key/value records; rejected calls return a no-op entry so the
//!   chain costs nothing
//! * Pluggable formatter (JSON by default, plain text included) and
//!   pluggable sink, each dispatched once per completed record
//! * Safe for concurrent callers; one fully formed record per sink
//!   write
//!
//! ## Main Components
//!
//! * `Logger`: the orchestrator producing entry builders
//! * `Entry`: one record under construction
//! * `TagSet`: registry assigning bits of a 64-bit mask to tag names
//! * `Filter`: the admission policy, swappable at runtime
//! * `Formatter` / `Sink`: the rendering and output seams
//!
//! ## Quick Start
//!
//! ```
//! use taglog::{format, Logger, sink::WriterSink};
//!
//! // Any io::Write works as a destination
//! let mut log = Logger::new(WriterSink::new(std::io::stdout()));
//! log.set_format_flags(format::DEFAULT_FLAGS | format::TIME_UNIX_MS);
//!
//! let io = log.new_tag("io");
//! let net = log.new_tag("net");
//!
//! log.info(io | net)
//!     .int("status", 200)
//!     .float("ms", 4.2)
//!     .write("request ok");
//!
//! // Raise the floor: debug records now cost only the admission check
//! log.set_filter(Some(taglog::Level::Warn), 0);
//! log.debug(io).str("path", "/tmp/x").write("not emitted");
//! ```

pub mod clock;
pub mod convert;
pub mod entry;
pub mod filter;
pub mod format;
pub mod json;
pub mod level;
pub mod logger;
pub mod pool;
pub mod sink;
pub mod tagset;
pub mod text;

pub use entry::Entry;
pub use filter::{Filter, Predicate};
pub use format::{Flags, Formatter};
pub use json::JsonFormatter;
pub use level::Level;
pub use logger::{ErrorHook, Logger};
pub use sink::{Sink, WriterSink};
pub use tagset::{Tag, TagSet, MAX_TAGS, TAG_NONE};
pub use text::TextFormatter;
