// Date formatting helpers shared by the date/timestamp coercions.
//
// Patterns use the source convention (yyyyMMdd, HHmmss). Translation to
// strftime happens once per distinct pattern through a process-wide memo,
// so concurrent first use of the same pattern still yields one instance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use chrono::{NaiveDate, NaiveDateTime};

/// Output pattern used when the caller gives none.
const DEFAULT_OUT_PATTERN: &str = "yyyy年MM月dd日";

static PATTERN_MEMO: OnceLock<Mutex<HashMap<String, Arc<str>>>> = OnceLock::new();

/// Strftime form of a `yyyyMMddHHmmss`-style pattern, built once per
/// distinct pattern string.
pub(crate) fn strftime_pattern(pattern: &str) -> Arc<str> {
    let memo = PATTERN_MEMO.get_or_init(|| Mutex::new(HashMap::new()));
    let mut memo = memo.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(hit) = memo.get(pattern) {
        return Arc::clone(hit);
    }
    let translated: Arc<str> = translate_pattern(pattern).into();
    memo.insert(pattern.to_string(), Arc::clone(&translated));
    translated
}

fn pattern_token(letter: char) -> Option<&'static str> {
    match letter {
        'y' => Some("%Y"),
        'M' => Some("%m"),
        'd' => Some("%d"),
        'H' => Some("%H"),
        'm' => Some("%M"),
        's' => Some("%S"),
        _ => None,
    }
}

fn translate_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(token) = pattern_token(c) {
            // A run of the same letter is one field (yyyy, MM, ...)
            while chars.peek() == Some(&c) {
                chars.next();
            }
            out.push_str(token);
        } else if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
    out
}

/// Reformat a date-like string, inferring the input layout from its digit
/// count after stripping `-`, `:` and whitespace.
///
/// Lenient by design: empty or all-zero input yields `""`, anything that is
/// not purely numeric after stripping passes through unchanged, as does any
/// digit count without a known layout (7, 9, 11, 13, ...). Known counts:
/// 14 → yyyyMMddHHmmss, 12 → yyyyMMddHHmm, 10 → yyyyMMddHH, 8 → yyyyMMdd,
/// 6 → yyyyMM. A 14-digit number that is not actually a compact datetime
/// will misparse or pass through; the digit count is the only signal.
pub fn format_date(input: &str, out_pattern: &str) -> String {
    let stripped: String = input
        .chars()
        .filter(|c| *c != '-' && *c != ':' && !c.is_whitespace())
        .collect();
    if stripped.is_empty() {
        return String::new();
    }
    if !stripped.bytes().all(|b| b.is_ascii_digit()) {
        return stripped;
    }
    if stripped.bytes().all(|b| b == b'0') {
        return String::new();
    }
    let parsed = match parse_compact(&stripped) {
        Some(dt) => dt,
        None => return stripped,
    };
    let pattern = if out_pattern.trim().is_empty() {
        DEFAULT_OUT_PATTERN
    } else {
        out_pattern
    };
    parsed.format(&strftime_pattern(pattern)).to_string()
}

/// Strict companion used by the date and timestamp coercions: the input is
/// normalized through `format_date` with `pattern` as the output layout,
/// then parsed against that same pattern. Unlike `format_date`, failure is
/// an error here.
pub fn parse_date(input: &str, pattern: &str) -> Result<NaiveDateTime, String> {
    if input.is_empty() {
        return Err("empty date string".to_string());
    }
    let normalized = format_date(input, pattern);
    if normalized.is_empty() {
        return Err(format!("'{}' is not a recognizable date", input));
    }
    parse_at_pattern(&normalized, &strftime_pattern(pattern))
        .ok_or_else(|| format!("failed to parse '{}' as {}", input, pattern))
}

fn parse_at_pattern(text: &str, fmt: &str) -> Option<NaiveDateTime> {
    // Compact all-digit forms carry their layout in their length
    if text.bytes().all(|b| b.is_ascii_digit()) {
        if let Some(dt) = parse_compact(text) {
            return Some(dt);
        }
    }
    NaiveDateTime::parse_from_str(text, fmt).ok().or_else(|| {
        NaiveDate::parse_from_str(text, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// Parse a digit-only date by length. Fields missing from shorter forms
/// default to the first day of the month and midnight.
fn parse_compact(digits: &str) -> Option<NaiveDateTime> {
    match digits.len() {
        6 | 8 | 10 | 12 | 14 => {}
        _ => return None,
    }
    let year: i32 = digits[0..4].parse().ok()?;
    let month: u32 = digits[4..6].parse().ok()?;
    let day: u32 = if digits.len() >= 8 {
        digits[6..8].parse().ok()?
    } else {
        1
    };
    let hour: u32 = if digits.len() >= 10 {
        digits[8..10].parse().ok()?
    } else {
        0
    };
    let minute: u32 = if digits.len() >= 12 {
        digits[10..12].parse().ok()?
    } else {
        0
    };
    let second: u32 = if digits.len() >= 14 {
        digits[12..14].parse().ok()?
    } else {
        0
    };
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    #[test]
    fn test_default_output_pattern() {
        assert_eq!(format_date("20230615", ""), "2023年06月15日");
    }

    #[test]
    fn test_separator_stripping_selects_datetime_layout() {
        // "2023-06-15 10:30:00" strips to 14 digits -> yyyyMMddHHmmss
        assert_eq!(format_date("2023-06-15 10:30:00", "yyyyMMdd"), "20230615");
    }

    #[test]
    fn test_non_numeric_passthrough() {
        assert_eq!(format_date("abc", "yyyyMMdd"), "abc");
    }

    #[test]
    fn test_empty_and_zero_input() {
        assert_eq!(format_date("", "yyyyMMdd"), "");
        assert_eq!(format_date("00000000", "yyyyMMdd"), "");
        assert_eq!(format_date("  ", "yyyyMMdd"), "");
    }

    #[test]
    fn test_unknown_digit_counts_pass_through() {
        for input in ["2023061", "202306155", "20230615103", "2023061510301"] {
            assert_eq!(format_date(input, "yyyyMMdd"), input);
        }
    }

    #[test]
    fn test_short_layouts_default_missing_fields() {
        assert_eq!(format_date("202306", "yyyyMMdd"), "20230601");
        assert_eq!(format_date("2023061510", "yyyyMMddHHmmss"), "20230615100000");
        assert_eq!(format_date("202306151030", "HHmmss"), "103000");
    }

    #[test]
    fn test_invalid_calendar_date_passes_through() {
        // Month 13 is rejected by the strict calendar, so the sniffer
        // falls back to returning the stripped digits.
        assert_eq!(format_date("20231301", "yyyyMMdd"), "20231301");
    }

    #[test]
    fn test_parse_date_compact_and_separated() {
        let dt = parse_date("2023-06-15 10:30:00", "yyyyMMddHHmmss").unwrap();
        assert_eq!(dt.to_string(), "2023-06-15 10:30:00");

        let d = parse_date("20230615", "yyyyMMdd").unwrap();
        assert_eq!(d.to_string(), "2023-06-15 00:00:00");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("not-a-date", "yyyyMMdd").is_err());
        assert!(parse_date("", "yyyyMMdd").is_err());
    }

    #[test]
    fn test_pattern_memo_returns_same_instance() {
        let a = strftime_pattern("yyyyMMdd-x");
        let b = strftime_pattern("yyyyMMdd-x");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(&*a, "%Y%m%d-x");
    }

    #[test]
    fn test_pattern_memo_single_instance_under_concurrency() {
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    strftime_pattern("HHmmss-concurrent")
                })
            })
            .collect();
        let instances: Vec<Arc<str>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        // A late-coming "third thread" must observe the same instance
        let witness = strftime_pattern("HHmmss-concurrent");
        for instance in &instances {
            assert!(Arc::ptr_eq(instance, &witness));
        }
    }

    #[test]
    fn test_translate_escapes_percent_and_keeps_literals() {
        assert_eq!(&*strftime_pattern("yyyy年MM月dd日"), "%Y年%m月%d日");
        assert_eq!(&*strftime_pattern("yyyy%MM"), "%Y%%%m");
        // Lowercase m is the minute token, uppercase M the month
        assert_eq!(&*strftime_pattern("HH:mm:ss"), "%H:%M:%S");
    }
}
