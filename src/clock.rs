use chrono::{Datelike, Local, Timelike, Utc};

/// Wall-clock sampling for record timestamps.
///
/// The formatter needs the current time in several pre-split shapes
/// (unix stamps, decimal date, packed time-of-day). Sampling happens at
/// most once per record, and only when the logger's format flags ask
/// for a time field at all.

/// One wall-clock sample, pre-split into the fields the formatters
/// emit.
///
/// # Examples
///
/// ```
/// # use taglog::clock::WallTime;
/// let t = WallTime::now(true);
/// assert!(t.hhmmss <= 235_959);
/// assert!(t.weekday <= 6);
/// assert_eq!(t.unix_ms / 1000, t.unix_s);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct WallTime {
    /// Seconds since the Unix epoch.
    pub unix_s: i64,
    /// Milliseconds since the Unix epoch.
    pub unix_ms: i64,
    /// Calendar date packed as decimal `YYYYMMDD`, e.g. `20260806`.
    pub yyyymmdd: u32,
    /// Day of week, 0 = Sunday.
    pub weekday: u8,
    /// Time of day packed as decimal `HHMMSS`, e.g. `150546`.
    pub hhmmss: u32,
    /// Millisecond within the current second.
    pub millis: u16,
}

impl WallTime {
    /// Samples the system clock once.
    ///
    /// `utc` selects UTC decomposition for the date and time-of-day
    /// fields; otherwise the local time zone applies. The unix stamps
    /// are zone-independent.
    pub fn now(utc: bool) -> Self {
        let instant = Utc::now();
        let unix_s = instant.timestamp();
        let unix_ms = instant.timestamp_millis();
        let millis = instant.timestamp_subsec_millis().min(999) as u16;

        let (yyyymmdd, weekday, hhmmss) = if utc {
            split_civil(&instant)
        } else {
            split_civil(&instant.with_timezone(&Local))
        };

        Self {
            unix_s,
            unix_ms,
            yyyymmdd,
            weekday,
            hhmmss,
            millis,
        }
    }
}

fn split_civil<T: Datelike + Timelike>(t: &T) -> (u32, u8, u32) {
    let date = t.year() as u32 * 10_000 + t.month() * 100 + t.day();
    let weekday = t.weekday().num_days_from_sunday() as u8;
    let time = t.hour() * 10_000 + t.minute() * 100 + t.second();
    (date, weekday, time)
}
