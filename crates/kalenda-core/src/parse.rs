use alloc::string::String;

use crate::error::{CoreError, CoreResult};
use crate::field::{self, FieldKind, NumericField, Token, TokenItem};
use crate::format::{lookup_fragment, pow10, zone_template};
use crate::numbers::NumberBackend;
use crate::properties::PatternProperties;
use crate::value::{DateTimeValue, Granularity};

/// Parses `text` against the resolved pattern onto the epoch default:
/// fields the pattern does not name keep their `DateTimeValue::default()`
/// values. Errors carry the byte offset of the first mismatch.
pub fn parse_date(
    properties: &PatternProperties,
    text: &str,
    numbers: &dyn NumberBackend,
) -> CoreResult<DateTimeValue> {
    parse_date_from(properties, text, numbers, &DateTimeValue::default())
}

/// Like [`parse_date`], but fields coarser than the pattern's finest
/// unit come from `reference` when the pattern does not name them, and
/// finer fields reset to their defaults. Time-only text thus parses
/// onto the reference date, and
/// `parse_date_from(format_date(v), v) == v.truncate(granularity)`.
pub fn parse_date_from(
    properties: &PatternProperties,
    text: &str,
    numbers: &dyn NumberBackend,
    reference: &DateTimeValue,
) -> CoreResult<DateTimeValue> {
    let items = field::tokens(properties.pattern())?;
    let mut state = ParseState::default();
    let mut cursor = 0;
    for (index, item) in items.iter().enumerate() {
        match item {
            TokenItem::Literal(literal) => {
                if !text[cursor..].starts_with(literal.as_str()) {
                    return Err(CoreError::ParseMismatch(cursor));
                }
                cursor += literal.len();
            }
            TokenItem::Field(token) => {
                let max_digits = digit_cap(token, items.get(index + 1));
                cursor =
                    parse_field(token, properties, text, cursor, numbers, max_digits, &mut state)?;
            }
        }
    }
    if cursor != text.len() {
        return Err(CoreError::ParseMismatch(cursor));
    }
    Ok(state.finish(*reference, field::granularity(&items)))
}

/// Fixed width applies when another digit-consuming field follows with
/// no literal between them; the run length then caps consumption so
/// `HHmm` splits `1735` into hours and minutes.
fn digit_cap(token: &Token, next: Option<&TokenItem>) -> usize {
    match next {
        Some(TokenItem::Field(next))
            if consumes_digits(&token.kind) && consumes_digits(&next.kind) =>
        {
            token.run.length
        }
        _ => usize::MAX,
    }
}

fn consumes_digits(kind: &FieldKind) -> bool {
    matches!(
        kind,
        FieldKind::Numeric(_)
            | FieldKind::Month { width: None, .. }
            | FieldKind::Quarter { width: None, .. }
    )
}

/// Accumulates fields as the walk consumes them. Twelve-hour input is
/// normalized to 0..=11 plus a day-period flag and combined at the end.
#[derive(Default)]
struct ParseState {
    era: Option<u8>,
    year: Option<i32>,
    month: Option<u8>,
    day: Option<u8>,
    hour23: Option<u8>,
    hour12: Option<u8>,
    afternoon: Option<bool>,
    minute: Option<u8>,
    second: Option<u8>,
    millisecond: Option<u16>,
    zone_offset_minutes: Option<i32>,
}

impl ParseState {
    /// Starts from the reference truncated to the pattern's granularity
    /// (so unnamed finer fields are defaults, unnamed coarser fields are
    /// the reference's) and overwrites everything that was parsed.
    fn finish(self, reference: DateTimeValue, granularity: Granularity) -> DateTimeValue {
        let mut value = reference.truncate(granularity);
        if let Some(era) = self.era {
            value.era = era;
        }
        if let Some(year) = self.year {
            value.year = year;
        }
        if let Some(month) = self.month {
            value.month = month;
        }
        if let Some(day) = self.day {
            value.day = day;
        }
        value.hour = match (self.hour23, self.hour12) {
            (Some(hour), _) => hour,
            (None, Some(hour)) => hour + if self.afternoon.unwrap_or(false) { 12 } else { 0 },
            (None, None) => value.hour,
        };
        if let Some(minute) = self.minute {
            value.minute = minute;
        }
        if let Some(second) = self.second {
            value.second = second;
        }
        if let Some(millisecond) = self.millisecond {
            value.millisecond = millisecond;
        }
        if let Some(offset) = self.zone_offset_minutes {
            value.zone_offset_minutes = offset;
        }
        value
    }
}

fn parse_field(
    token: &Token,
    properties: &PatternProperties,
    text: &str,
    start: usize,
    numbers: &dyn NumberBackend,
    max_digits: usize,
    state: &mut ParseState,
) -> CoreResult<usize> {
    match &token.kind {
        FieldKind::Era(_) => {
            let (key, consumed) = match_named(properties, &token.kind, &text[start..], start)?;
            state.era = key
                .parse::<u8>()
                .map_err(|_| CoreError::ParseMismatch(start))
                .map(Some)?;
            Ok(start + consumed)
        }
        FieldKind::Month { width: Some(_), .. } => {
            let (key, consumed) = match_named(properties, &token.kind, &text[start..], start)?;
            // Leap keys read `<month>-leap`; the month number leads.
            let number = key.split('-').next().unwrap_or(&key);
            state.month = number
                .parse::<u8>()
                .map_err(|_| CoreError::ParseMismatch(start))
                .map(Some)?;
            Ok(start + consumed)
        }
        FieldKind::Month { width: None, .. } => {
            let value = numeric(text, start, numbers, max_digits, 1, 12)?;
            state.month = Some(value.0 as u8);
            Ok(value.1)
        }
        FieldKind::Quarter { width: Some(_), .. } | FieldKind::Weekday { .. } => {
            // Derived from the date fields; matched and discarded.
            let (_, consumed) = match_named(properties, &token.kind, &text[start..], start)?;
            Ok(start + consumed)
        }
        FieldKind::Quarter { width: None, .. } => {
            let value = numeric(text, start, numbers, max_digits, 1, 4)?;
            Ok(value.1)
        }
        FieldKind::DayPeriod => {
            let (key, consumed) = match_named(properties, &token.kind, &text[start..], start)?;
            state.afternoon = match key.as_str() {
                "am" => Some(false),
                "pm" => Some(true),
                _ => return Err(CoreError::ParseMismatch(start)),
            };
            Ok(start + consumed)
        }
        FieldKind::ZoneOffset { .. } => {
            let (offset, end) = parse_offset(properties, text, start, numbers)?;
            state.zone_offset_minutes = Some(offset);
            Ok(end)
        }
        FieldKind::Numeric(kind) => {
            parse_numeric_field(*kind, token.run.length, text, start, numbers, max_digits, state)
        }
        FieldKind::Unsupported(chr) => Err(CoreError::UnsupportedField(*chr)),
    }
}

fn parse_numeric_field(
    kind: NumericField,
    length: usize,
    text: &str,
    start: usize,
    numbers: &dyn NumberBackend,
    max_digits: usize,
    state: &mut ParseState,
) -> CoreResult<usize> {
    match kind {
        NumericField::Year => {
            let Some((value, consumed)) = numbers.parse_digits(&text[start..], max_digits) else {
                return Err(CoreError::ParseMismatch(start));
            };
            state.year = Some(if length == 2 && consumed == 2 {
                // Two-digit years land in 1950..=2049.
                if value < 50 { 2000 + value as i32 } else { 1900 + value as i32 }
            } else {
                value as i32
            });
            Ok(start + consumed)
        }
        NumericField::Month => {
            let (value, end) = numeric(text, start, numbers, max_digits, 1, 12)?;
            state.month = Some(value as u8);
            Ok(end)
        }
        NumericField::Day => {
            let (value, end) = numeric(text, start, numbers, max_digits, 1, 31)?;
            state.day = Some(value as u8);
            Ok(end)
        }
        NumericField::Hour23 => {
            let (value, end) = numeric(text, start, numbers, max_digits, 0, 23)?;
            state.hour23 = Some(value as u8);
            Ok(end)
        }
        NumericField::Hour24 => {
            let (value, end) = numeric(text, start, numbers, max_digits, 1, 24)?;
            state.hour23 = Some((value % 24) as u8);
            Ok(end)
        }
        NumericField::Hour12 => {
            let (value, end) = numeric(text, start, numbers, max_digits, 1, 12)?;
            state.hour12 = Some((value % 12) as u8);
            Ok(end)
        }
        NumericField::Hour11 => {
            let (value, end) = numeric(text, start, numbers, max_digits, 0, 11)?;
            state.hour12 = Some(value as u8);
            Ok(end)
        }
        NumericField::Minute => {
            let (value, end) = numeric(text, start, numbers, max_digits, 0, 59)?;
            state.minute = Some(value as u8);
            Ok(end)
        }
        NumericField::Second => {
            let (value, end) = numeric(text, start, numbers, max_digits, 0, 59)?;
            state.second = Some(value as u8);
            Ok(end)
        }
        NumericField::SubSecond => {
            let Some((value, consumed)) = numbers.parse_digits(&text[start..], max_digits) else {
                return Err(CoreError::ParseMismatch(start));
            };
            let millisecond = if consumed >= 3 {
                value / pow10(consumed - 3)
            } else {
                value * pow10(3 - consumed)
            };
            state.millisecond = Some((millisecond % 1000) as u16);
            Ok(start + consumed)
        }
        // Derived fields; consumed and discarded.
        NumericField::WeekdayLocal => Ok(numeric(text, start, numbers, max_digits, 1, 7)?.1),
        NumericField::WeekOfYear => Ok(numeric(text, start, numbers, max_digits, 1, 53)?.1),
        NumericField::WeekOfMonth | NumericField::DayOfWeekInMonth => {
            Ok(numeric(text, start, numbers, max_digits, 1, 6)?.1)
        }
        NumericField::DayOfYear => Ok(numeric(text, start, numbers, max_digits, 1, 366)?.1),
        NumericField::Other => Err(CoreError::InvalidInput("numeric field not representable")),
    }
}

fn numeric(
    text: &str,
    start: usize,
    numbers: &dyn NumberBackend,
    max_digits: usize,
    min: i64,
    max: i64,
) -> CoreResult<(i64, usize)> {
    let Some((value, consumed)) = numbers.parse_digits(&text[start..], max_digits) else {
        return Err(CoreError::ParseMismatch(start));
    };
    if value < min || value > max {
        return Err(CoreError::ParseMismatch(start));
    }
    Ok((value, start + consumed))
}

/// Longest textual entry of the field's fragment that prefixes the input.
/// Returns the entry key and the bytes matched.
fn match_named(
    properties: &PatternProperties,
    kind: &FieldKind,
    input: &str,
    start: usize,
) -> CoreResult<(String, usize)> {
    let fragment = lookup_fragment(properties, kind)?;
    let entries = fragment
        .as_map()
        .ok_or(CoreError::InvalidInput("named field fragment is not a map"))?;
    let mut best: Option<(String, usize)> = None;
    for (key, value) in entries {
        let Some(name) = value.as_text() else {
            continue;
        };
        if input.starts_with(name)
            && best.as_ref().is_none_or(|(_, length)| name.len() > *length)
        {
            best = Some((key.clone(), name.len()));
        }
    }
    best.ok_or(CoreError::ParseMismatch(start))
}

/// Parses a GMT-offset rendering produced from the three `timeZoneNames`
/// templates. Accepts both the padded long form and the short form with
/// its minutes dropped.
fn parse_offset(
    properties: &PatternProperties,
    text: &str,
    start: usize,
    numbers: &dyn NumberBackend,
) -> CoreResult<(i32, usize)> {
    let gmt = zone_template(properties, field::GMT_FORMAT_KEY)?;
    let hour_format = zone_template(properties, field::HOUR_FORMAT_KEY)?;
    let (positive, negative) = hour_format
        .split_once(';')
        .ok_or(CoreError::InvalidInput("malformed hourFormat"))?;
    let (prefix, suffix) = gmt
        .split_once("{0}")
        .ok_or(CoreError::InvalidInput("malformed gmtFormat"))?;

    if text[start..].starts_with(prefix) {
        let inner = start + prefix.len();
        for (template, sign) in [(positive, 1i32), (negative, -1i32)] {
            if let Some((minutes, end)) = match_offset_half(template, text, inner, numbers) {
                if text[end..].starts_with(suffix) {
                    return Ok((sign * minutes, end + suffix.len()));
                }
            }
        }
    }

    let zero = zone_template(properties, field::GMT_ZERO_FORMAT_KEY)?;
    if text[start..].starts_with(zero) {
        return Ok((0, start + zero.len()));
    }
    Err(CoreError::ParseMismatch(start))
}

fn match_offset_half(
    template: &str,
    text: &str,
    start: usize,
    numbers: &dyn NumberBackend,
) -> Option<(i32, usize)> {
    let mut cursor = start;
    let mut hours: i64 = 0;
    let mut minutes: i64 = 0;
    let mut pending = String::new();
    let mut chars = template.chars().peekable();
    while let Some(&chr) = chars.peek() {
        if chr == 'H' || chr == 'm' {
            while chars.peek() == Some(&chr) {
                chars.next();
            }
            let literal_end = cursor + pending.len();
            let matched = text[cursor..].starts_with(pending.as_str());
            let digits = matched
                .then(|| numbers.parse_digits(&text[literal_end..], usize::MAX))
                .flatten();
            match digits {
                Some((value, consumed)) => {
                    cursor = literal_end + consumed;
                    if chr == 'H' {
                        hours = value;
                    } else {
                        minutes = value;
                    }
                }
                // Short renderings omit the minutes and their separator.
                None if chr == 'm' => {}
                None => return None,
            }
            pending.clear();
        } else {
            pending.push(chr);
            chars.next();
        }
    }
    if !text[cursor..].starts_with(pending.as_str()) {
        return None;
    }
    cursor += pending.len();
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(((hours * 60 + minutes) as i32, cursor))
}
