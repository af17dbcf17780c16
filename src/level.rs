/// Severity levels for log records.
///
/// Levels are ordered: `Trace < Debug < Info < Warn < Error < Fatal`.
/// The numeric value 0 is reserved as the "no level" sentinel used by
/// the filter to mean "no floor"; it is not representable as a `Level`.
///
/// `Fatal` is the highest severity but does **not** terminate the
/// process. Callers that want fatal-means-abort semantics can install a
/// filter predicate and react there.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace = 1,
    Debug = 2,
    Info = 3,
    Warn = 4,
    Error = 5,
    Fatal = 6,
}

impl Level {
    /// Returns the lowercase long name, e.g. `"info"`.
    ///
    /// Used by the JSON formatter for the `"lv"` field.
    pub fn long_name(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    /// Returns the three-letter short name, e.g. `"INF"`.
    ///
    /// Used by the text formatter.
    pub fn short_name(self) -> &'static str {
        match self {
            Level::Trace => "TRC",
            Level::Debug => "DBG",
            Level::Info => "INF",
            Level::Warn => "WRN",
            Level::Error => "ERR",
            Level::Fatal => "FTL",
        }
    }

    /// Converts a raw value back into a `Level`.
    ///
    /// Returns `None` for 0 (the sentinel) and for anything above
    /// `Fatal`.
    pub fn from_u8(v: u8) -> Option<Level> {
        match v {
            1 => Some(Level::Trace),
            2 => Some(Level::Debug),
            3 => Some(Level::Info),
            4 => Some(Level::Warn),
            5 => Some(Level::Error),
            6 => Some(Level::Fatal),
            _ => None,
        }
    }
}
