use std::io::Write;

/// Append-style serializers for log primitives.
///
/// Every function appends a compact ASCII rendering of one value to a
/// caller-supplied byte buffer. The caller chooses, per call, whether
/// the value is wrapped in double quotes and which single separator
/// byte (if any) trails it. Nothing here allocates beyond the
/// destination buffer itself.

/// Passed as `sep` when no trailing separator byte is wanted.
pub const SEP_NONE: u8 = 0;

/// Digit scratch large enough for a signed 64-bit value plus padding.
const DIGITS: usize = 24;

/// Largest float magnitude the fixed two-decimal path can scale into a
/// `u64` without overflow.
const FLOAT_SCALE_MAX: f64 = (u64::MAX / 100) as f64;

#[inline]
fn push_sep(dst: &mut Vec<u8>, sep: u8) {
    if sep != SEP_NONE {
        dst.push(sep);
    }
}

fn append_digits(dst: &mut Vec<u8>, v: u64, min_width: usize) {
    let mut digits = [0u8; DIGITS];
    let mut pos = DIGITS;
    let mut rest = v;
    loop {
        pos -= 1;
        digits[pos] = b'0' + (rest % 10) as u8;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }
    let min_width = min_width.min(DIGITS);
    while DIGITS - pos < min_width {
        pos -= 1;
        digits[pos] = b'0';
    }
    dst.extend_from_slice(&digits[pos..]);
}

/// Appends an unsigned integer, left-padded with `0` to `min_width`
/// digits.
pub fn append_uint(dst: &mut Vec<u8>, v: u64, min_width: usize, quote: bool, sep: u8) {
    if quote {
        dst.push(b'"');
    }
    append_digits(dst, v, min_width);
    if quote {
        dst.push(b'"');
    }
    push_sep(dst, sep);
}

/// Appends a signed integer. The `-` sign precedes any zero padding.
pub fn append_int(dst: &mut Vec<u8>, v: i64, min_width: usize, quote: bool, sep: u8) {
    if quote {
        dst.push(b'"');
    }
    if v < 0 {
        dst.push(b'-');
    }
    append_digits(dst, v.unsigned_abs(), min_width);
    if quote {
        dst.push(b'"');
    }
    push_sep(dst, sep);
}

/// Appends a float with exactly two decimal places, rounding
/// half-away-from-zero at the stored (binary) precision.
///
/// Negative values keep their `-` even when the integer part is zero,
/// so `-0.42` renders as `-0.42`. Non-finite values and magnitudes too
/// large for the fixed-point path fall back to the shortest
/// round-trip rendering.
pub fn append_float(dst: &mut Vec<u8>, v: f64, quote: bool, sep: u8) {
    if quote {
        dst.push(b'"');
    }
    if v.is_finite() && v.abs() < FLOAT_SCALE_MAX {
        if v < 0.0 {
            dst.push(b'-');
        }
        // f64::round is half-away-from-zero, which is the contract.
        let scaled = (v.abs() * 100.0).round() as u64;
        append_digits(dst, scaled / 100, 0);
        dst.push(b'.');
        append_digits(dst, scaled % 100, 2);
    } else {
        // Writes into the Vec never fail.
        let _ = write!(dst, "{}", v);
    }
    if quote {
        dst.push(b'"');
    }
    push_sep(dst, sep);
}

/// Appends the literal `true` or `false`.
pub fn append_bool(dst: &mut Vec<u8>, v: bool, quote: bool, sep: u8) {
    if quote {
        dst.push(b'"');
    }
    dst.extend_from_slice(if v { b"true" } else { b"false" });
    if quote {
        dst.push(b'"');
    }
    push_sep(dst, sep);
}

/// Appends a field key with every byte outside `[-.0-9A-Za-z_]`
/// dropped.
///
/// Keys are sanitized instead of escaped so the same bytes are valid in
/// both the JSON and the plain-text target without per-byte branching
/// at render time.
pub fn append_key(dst: &mut Vec<u8>, key: &[u8]) {
    for &b in key {
        match b {
            b'-' | b'.' | b'_' | b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z' => dst.push(b),
            _ => {}
        }
    }
}

/// Appends a double-quoted string value with the JSON-safe escape set.
///
/// `"` and `\` are backslash-escaped; `\n`, `\t`, `\r`, backspace and
/// form feed map to their two-character escapes. Every other byte is
/// passed through verbatim, so UTF-8 text costs no extra work.
pub fn append_quoted(dst: &mut Vec<u8>, s: &[u8], sep: u8) {
    dst.push(b'"');
    for &b in s {
        match b {
            b'"' => dst.extend_from_slice(b"\\\""),
            b'\\' => dst.extend_from_slice(b"\\\\"),
            b'\n' => dst.extend_from_slice(b"\\n"),
            b'\t' => dst.extend_from_slice(b"\\t"),
            b'\r' => dst.extend_from_slice(b"\\r"),
            0x08 => dst.extend_from_slice(b"\\b"),
            0x0c => dst.extend_from_slice(b"\\f"),
            _ => dst.push(b),
        }
    }
    dst.push(b'"');
    push_sep(dst, sep);
}

/// Appends an unquoted string value kept to a single line: `\n` becomes
/// `;` and `\r` is elided. Used by the plain-text formatter.
pub fn append_sanitized(dst: &mut Vec<u8>, s: &[u8], sep: u8) {
    for &b in s {
        match b {
            b'\n' => dst.push(b';'),
            b'\r' => {}
            _ => dst.push(b),
        }
    }
    push_sep(dst, sep);
}
