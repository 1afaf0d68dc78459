//! HTTP Range request resolution module
//!
//! Single `bytes=<start>-<end>` ranges for partial downloads. Either bound may
//! be omitted. Unlike RFC 7233, an end past the last byte is rejected rather
//! than clamped.

/// Inclusive byte interval within a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte position
    pub start: u64,
    /// Last byte position (inclusive)
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by the range
    #[inline]
    pub const fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a satisfied range
    pub fn content_range(&self, file_size: u64) -> String {
        format!("bytes {}-{}/{file_size}", self.start, self.end)
    }
}

/// Range header resolution result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeResolution {
    /// Range lies within the file - should return 206
    Satisfiable(ByteRange),
    /// Malformed or out of bounds - should return 416
    NotSatisfiable,
}

/// `Content-Range` value sent with a 416 response
pub fn unsatisfied_content_range(file_size: u64) -> String {
    format!("bytes */{file_size}")
}

/// Resolve a Range header value against a file size
///
/// The value must begin with `bytes=`, then optional digits, `-`, optional
/// digits. Trailing text after the second number is ignored.
///
/// # Examples
/// ```
/// use hap_distribution::http::range::{resolve_range, ByteRange, RangeResolution};
///
/// let result = resolve_range("bytes=0-99", 1000);
/// assert_eq!(result, RangeResolution::Satisfiable(ByteRange { start: 0, end: 99 }));
///
/// // End past the last byte is rejected, not clamped
/// let result = resolve_range("bytes=0-1023", 1000);
/// assert_eq!(result, RangeResolution::NotSatisfiable);
/// ```
pub fn resolve_range(range_header: &str, file_size: u64) -> RangeResolution {
    let Some((start, end)) = parse_bounds(range_header) else {
        return RangeResolution::NotSatisfiable;
    };

    // An empty file has no last byte, nothing can be satisfied
    let Some(last) = file_size.checked_sub(1) else {
        return RangeResolution::NotSatisfiable;
    };

    let start = start.unwrap_or(0);
    let end = end.unwrap_or(last);

    if start > end || end > last {
        return RangeResolution::NotSatisfiable;
    }

    RangeResolution::Satisfiable(ByteRange { start, end })
}

/// Split `bytes=<start>-<end>` into its optional bounds
///
/// Returns `None` if the prefix or separator is missing or a number overflows.
fn parse_bounds(header: &str) -> Option<(Option<u64>, Option<u64>)> {
    let spec = header.strip_prefix("bytes=")?;

    let (start_str, rest) = split_digits(spec);
    let rest = rest.strip_prefix('-')?;
    let (end_str, _trailing) = split_digits(rest);

    Some((parse_bound(start_str)?, parse_bound(end_str)?))
}

/// Split a string into its leading ASCII digits and the remainder
fn split_digits(s: &str) -> (&str, &str) {
    let idx = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(idx)
}

/// Empty digits mean an omitted bound; overflow is a parse failure
fn parse_bound(digits: &str) -> Option<Option<u64>> {
    if digits.is_empty() {
        return Some(None);
    }
    digits.parse::<u64>().ok().map(Some)
}
