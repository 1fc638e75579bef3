use kalenda_core::{LocaleAccessor, NumberBackend};

use crate::error::{RuntimeError, RuntimeResult};

const LATIN_DIGITS: &str = "0123456789";

/// CLDR-driven number backend: the locale's default numbering system
/// decides the digit shapes, the per-system symbols supply the time
/// separator. Formatting transliterates; parsing maps the shapes back.
#[derive(Debug)]
pub struct CldrNumbers {
    digits: Vec<char>,
    time_separator: String,
}

impl CldrNumbers {
    pub fn for_locale(accessor: &LocaleAccessor<'_>) -> RuntimeResult<Self> {
        let system = accessor
            .read_optional(&["numbers", "defaultNumberingSystem"])
            .and_then(|fragment| fragment.as_text().map(String::from))
            .unwrap_or_else(|| String::from("latn"));
        let symbols = format!("symbols-numberSystem-{system}");
        let time_separator = accessor
            .read_optional(&["numbers", symbols.as_str(), "timeSeparator"])
            .and_then(|fragment| fragment.as_text().map(String::from))
            .unwrap_or_else(|| String::from(":"));
        let shapes = accessor
            .supplemental(&["numberingSystems", system.as_str(), "_digits"])
            .and_then(|fragment| fragment.as_text().map(String::from))
            .unwrap_or_else(|| {
                // Bundles routinely omit the supplemental table for latn.
                String::from(if system == "latn" { LATIN_DIGITS } else { "" })
            });
        let digits: Vec<char> = shapes.chars().collect();
        if digits.len() != 10 {
            return Err(RuntimeError::InvalidDigits(system));
        }
        Ok(Self {
            digits,
            time_separator,
        })
    }

    fn digit_value(&self, chr: char) -> Option<i64> {
        self.digits
            .iter()
            .position(|&digit| digit == chr)
            .map(|index| index as i64)
    }
}

impl NumberBackend for CldrNumbers {
    fn symbol(&self, name: &str) -> String {
        match name {
            "timeSeparator" => self.time_separator.clone(),
            _ => String::new(),
        }
    }

    fn format_integer(&self, value: i64, min_width: usize) -> String {
        let ascii = value.unsigned_abs().to_string();
        let mut out = String::new();
        if value < 0 {
            out.push('-');
        }
        for _ in ascii.len()..min_width {
            out.push(self.digits[0]);
        }
        for chr in ascii.chars() {
            out.push(self.digits[chr as usize - '0' as usize]);
        }
        out
    }

    fn parse_digits(&self, text: &str, max_digits: usize) -> Option<(i64, usize)> {
        let limit = max_digits.min(18);
        let mut value: i64 = 0;
        let mut consumed = 0;
        let mut count = 0;
        for chr in text.chars() {
            if count >= limit {
                break;
            }
            let Some(digit) = self.digit_value(chr) else {
                break;
            };
            value = value * 10 + digit;
            consumed += chr.len_utf8();
            count += 1;
        }
        if count == 0 { None } else { Some((value, consumed)) }
    }
}
