use crate::clock::WallTime;
use crate::convert;
use crate::format::{self, Flags, Formatter};
use crate::level::Level;
use crate::tagset::{Tag, TagSet};

/// The default formatter: one JSON object per record.
///
/// Field layout (every header field optional, governed by the format
/// flags):
///
/// ```text
/// {"ts":1613876746123,"lv":"info","tag":["io","net"],"msg":"request ok","status":200,"ms":4.20}
/// ```
///
/// A record with no headers, no message and no fields renders as
/// `{}` followed by the newline terminator.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    fn key(dst: &mut Vec<u8>, key: &[u8]) {
        dst.push(b'"');
        convert::append_key(dst, key);
        dst.extend_from_slice(b"\":");
    }
}

impl Formatter for JsonFormatter {
    fn start(&self, dst: &mut Vec<u8>, prefix: &[u8]) {
        dst.extend_from_slice(prefix);
        dst.push(b'{');
    }

    fn time(&self, dst: &mut Vec<u8>, flags: Flags, t: &WallTime) {
        if flags & format::TIME_UNIX_MS != 0 {
            dst.extend_from_slice(b"\"ts\":");
            convert::append_int(dst, t.unix_ms, 0, false, b',');
            return;
        }
        if flags & format::TIME_UNIX != 0 {
            dst.extend_from_slice(b"\"ts\":");
            convert::append_int(dst, t.unix_s, 0, false, b',');
            return;
        }
        if flags & format::DATE != 0 {
            dst.extend_from_slice(b"\"d\":");
            convert::append_uint(dst, t.yyyymmdd as u64, 0, false, b',');
        }
        if flags & format::DATE_DAY != 0 {
            dst.extend_from_slice(b"\"wd\":");
            convert::append_uint(dst, t.weekday as u64, 0, false, b',');
        }
        if flags & format::TIME != 0 {
            dst.extend_from_slice(b"\"t\":");
            if flags & format::TIME_MS != 0 {
                convert::append_uint(dst, t.hhmmss as u64, 0, false, b'.');
                convert::append_uint(dst, t.millis as u64, 3, false, b',');
            } else {
                convert::append_uint(dst, t.hhmmss as u64, 0, false, b',');
            }
        }
    }

    fn level(&self, dst: &mut Vec<u8>, level: Level) {
        dst.extend_from_slice(b"\"lv\":\"");
        dst.extend_from_slice(level.long_name().as_bytes());
        dst.extend_from_slice(b"\",");
    }

    fn tag(&self, dst: &mut Vec<u8>, tagset: &TagSet, tags: Tag) {
        dst.extend_from_slice(b"\"tag\":[");
        tagset.append_names(dst, tags, b',', true);
        dst.extend_from_slice(b"],");
    }

    fn msg(&self, dst: &mut Vec<u8>, msg: &[u8]) {
        if msg.is_empty() {
            return;
        }
        dst.extend_from_slice(b"\"msg\":");
        convert::append_quoted(dst, msg, b',');
    }

    fn kv_int(&self, dst: &mut Vec<u8>, key: &[u8], v: i64) {
        Self::key(dst, key);
        convert::append_int(dst, v, 0, false, b',');
    }

    fn kv_uint(&self, dst: &mut Vec<u8>, key: &[u8], v: u64) {
        Self::key(dst, key);
        convert::append_uint(dst, v, 0, false, b',');
    }

    fn kv_float(&self, dst: &mut Vec<u8>, key: &[u8], v: f64) {
        Self::key(dst, key);
        convert::append_float(dst, v, false, b',');
    }

    fn kv_bool(&self, dst: &mut Vec<u8>, key: &[u8], v: bool) {
        Self::key(dst, key);
        convert::append_bool(dst, v, false, b',');
    }

    fn kv_str(&self, dst: &mut Vec<u8>, key: &[u8], v: &[u8]) {
        Self::key(dst, key);
        convert::append_quoted(dst, v, b',');
    }

    fn kv_error(&self, dst: &mut Vec<u8>, key: &[u8], msg: Option<&[u8]>) {
        Self::key(dst, key);
        match msg {
            Some(m) => convert::append_quoted(dst, m, b','),
            None => dst.extend_from_slice(b"null,"),
        }
    }

    fn kv_null(&self, dst: &mut Vec<u8>, key: &[u8]) {
        Self::key(dst, key);
        dst.extend_from_slice(b"null,");
    }

    fn finalize(&self, dst: &mut Vec<u8>) {
        if dst.last() == Some(&b',') {
            dst.pop();
        }
        dst.extend_from_slice(b"}\n");
    }
}
