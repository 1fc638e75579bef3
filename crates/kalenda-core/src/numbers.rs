use alloc::string::{String, ToString};

/// Numeric collaborator for date fields: symbols, zero-padded integers
/// and locale-digit parsing. The runtime crate supplies a CLDR-driven
/// implementation; `LatinNumbers` covers ASCII digits.
pub trait NumberBackend {
    fn symbol(&self, name: &str) -> String;
    fn format_integer(&self, value: i64, min_width: usize) -> String;
    /// Parses a leading run of locale digits, consuming at most
    /// `max_digits` of them (callers cap at the run length when
    /// adjacent numeric fields imply fixed widths). Returns the value
    /// and the number of bytes consumed, or `None` when no digit leads
    /// `text`.
    fn parse_digits(&self, text: &str, max_digits: usize) -> Option<(i64, usize)>;
}

pub struct LatinNumbers;

impl NumberBackend for LatinNumbers {
    fn symbol(&self, name: &str) -> String {
        match name {
            "timeSeparator" => String::from(":"),
            _ => String::new(),
        }
    }

    fn format_integer(&self, value: i64, min_width: usize) -> String {
        let digits = value.unsigned_abs().to_string();
        let mut out = String::new();
        if value < 0 {
            out.push('-');
        }
        for _ in digits.len()..min_width {
            out.push('0');
        }
        out.push_str(&digits);
        out
    }

    fn parse_digits(&self, text: &str, max_digits: usize) -> Option<(i64, usize)> {
        // 18 digits always fit in an i64.
        let limit = max_digits.min(18);
        let mut value: i64 = 0;
        let mut consumed = 0;
        for chr in text.chars() {
            if consumed >= limit {
                break;
            }
            let Some(digit) = chr.to_digit(10) else {
                break;
            };
            value = value * 10 + digit as i64;
            consumed += 1;
        }
        if consumed == 0 {
            None
        } else {
            Some((value, consumed))
        }
    }
}
