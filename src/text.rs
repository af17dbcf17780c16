use crate::clock::WallTime;
use crate::convert;
use crate::format::{self, Flags, Formatter};
use crate::level::Level;
use crate::tagset::{Tag, TagSet};

/// Plain-text formatter for human consumption.
///
/// ```text
/// INF [io,net] request ok // status=200, ms=4.20
/// ```
///
/// Levels use the short name; the message and all string values are
/// kept to a single line (`\n` becomes `;`, `\r` is dropped); ` // `
/// separates the message from the key=value pairs and is trimmed again
/// when no pairs follow.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }

    fn key(dst: &mut Vec<u8>, key: &[u8]) {
        convert::append_key(dst, key);
        dst.push(b'=');
    }

    fn pair_sep(dst: &mut Vec<u8>) {
        dst.extend_from_slice(b", ");
    }
}

impl Formatter for TextFormatter {
    fn start(&self, dst: &mut Vec<u8>, prefix: &[u8]) {
        dst.extend_from_slice(prefix);
    }

    fn time(&self, dst: &mut Vec<u8>, flags: Flags, t: &WallTime) {
        if flags & format::TIME_UNIX_MS != 0 {
            convert::append_int(dst, t.unix_ms, 0, false, b' ');
            return;
        }
        if flags & format::TIME_UNIX != 0 {
            convert::append_int(dst, t.unix_s, 0, false, b' ');
            return;
        }
        if flags & format::DATE != 0 {
            convert::append_uint(dst, t.yyyymmdd as u64, 8, false, b' ');
        }
        if flags & format::DATE_DAY != 0 {
            convert::append_uint(dst, t.weekday as u64, 0, false, b' ');
        }
        if flags & format::TIME != 0 {
            let hhmmss = t.hhmmss;
            convert::append_uint(dst, (hhmmss / 10_000) as u64, 2, false, b':');
            convert::append_uint(dst, (hhmmss / 100 % 100) as u64, 2, false, b':');
            if flags & format::TIME_MS != 0 {
                convert::append_uint(dst, (hhmmss % 100) as u64, 2, false, b'.');
                convert::append_uint(dst, t.millis as u64, 3, false, b' ');
            } else {
                convert::append_uint(dst, (hhmmss % 100) as u64, 2, false, b' ');
            }
        }
    }

    fn level(&self, dst: &mut Vec<u8>, level: Level) {
        dst.extend_from_slice(level.short_name().as_bytes());
        dst.push(b' ');
    }

    fn tag(&self, dst: &mut Vec<u8>, tagset: &TagSet, tags: Tag) {
        dst.push(b'[');
        tagset.append_names(dst, tags, b',', false);
        dst.extend_from_slice(b"] ");
    }

    fn msg(&self, dst: &mut Vec<u8>, msg: &[u8]) {
        if msg.is_empty() {
            return;
        }
        convert::append_sanitized(dst, msg, convert::SEP_NONE);
        dst.extend_from_slice(b" // ");
    }

    fn kv_int(&self, dst: &mut Vec<u8>, key: &[u8], v: i64) {
        Self::key(dst, key);
        convert::append_int(dst, v, 0, false, convert::SEP_NONE);
        Self::pair_sep(dst);
    }

    fn kv_uint(&self, dst: &mut Vec<u8>, key: &[u8], v: u64) {
        Self::key(dst, key);
        convert::append_uint(dst, v, 0, false, convert::SEP_NONE);
        Self::pair_sep(dst);
    }

    fn kv_float(&self, dst: &mut Vec<u8>, key: &[u8], v: f64) {
        Self::key(dst, key);
        convert::append_float(dst, v, false, convert::SEP_NONE);
        Self::pair_sep(dst);
    }

    fn kv_bool(&self, dst: &mut Vec<u8>, key: &[u8], v: bool) {
        Self::key(dst, key);
        convert::append_bool(dst, v, false, convert::SEP_NONE);
        Self::pair_sep(dst);
    }

    fn kv_str(&self, dst: &mut Vec<u8>, key: &[u8], v: &[u8]) {
        Self::key(dst, key);
        convert::append_sanitized(dst, v, convert::SEP_NONE);
        Self::pair_sep(dst);
    }

    fn kv_error(&self, dst: &mut Vec<u8>, key: &[u8], msg: Option<&[u8]>) {
        Self::key(dst, key);
        match msg {
            Some(m) => convert::append_sanitized(dst, m, convert::SEP_NONE),
            None => dst.extend_from_slice(b"null"),
        }
        Self::pair_sep(dst);
    }

    fn kv_null(&self, dst: &mut Vec<u8>, key: &[u8]) {
        Self::key(dst, key);
        dst.extend_from_slice(b"null");
        Self::pair_sep(dst);
    }

    fn finalize(&self, dst: &mut Vec<u8>) {
        if dst.ends_with(b", ") {
            dst.truncate(dst.len() - 2);
        }
        if dst.ends_with(b" // ") {
            dst.truncate(dst.len() - 4);
        }
        while dst.last() == Some(&b' ') {
            dst.pop();
        }
        dst.push(b'\n');
    }
}
