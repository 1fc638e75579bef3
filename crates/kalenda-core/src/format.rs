use alloc::format;
use alloc::string::{String, ToString};

use crate::error::{CoreError, CoreResult};
use crate::field::{self, FieldKind, NameWidth, NumericField, Token, TokenItem};
use crate::fragment::Fragment;
use crate::numbers::NumberBackend;
use crate::properties::PatternProperties;
use crate::store::DataPath;
use crate::value::DateTimeValue;

pub(crate) const WEEKDAY_KEYS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Renders a structured value with the fragments a resolver pass put in
/// `properties`. Walks the same field-run sequence the resolver saw.
pub fn format_date(
    properties: &PatternProperties,
    value: &DateTimeValue,
    numbers: &dyn NumberBackend,
) -> CoreResult<String> {
    let items = field::tokens(properties.pattern())?;
    let mut output = String::new();
    for item in &items {
        match item {
            TokenItem::Literal(text) => output.push_str(text),
            TokenItem::Field(token) => {
                format_field(&mut output, token, properties, value, numbers)?;
            }
        }
    }
    Ok(output)
}

fn format_field(
    output: &mut String,
    token: &Token,
    properties: &PatternProperties,
    value: &DateTimeValue,
    numbers: &dyn NumberBackend,
) -> CoreResult<()> {
    match &token.kind {
        FieldKind::Era(_) => {
            let name = named_entry(properties, &token.kind, &value.era.to_string())?;
            output.push_str(&name);
        }
        FieldKind::Quarter { width: Some(_), .. } => {
            let name = named_entry(properties, &token.kind, &value.quarter().to_string())?;
            output.push_str(&name);
        }
        FieldKind::Quarter { width: None, .. } => {
            output.push_str(&numbers.format_integer(value.quarter() as i64, token.run.length));
        }
        FieldKind::Month { width: Some(_), .. } => {
            let name = named_entry(properties, &token.kind, &value.month.to_string())?;
            output.push_str(&name);
        }
        FieldKind::Month { width: None, .. } => {
            output.push_str(&numbers.format_integer(value.month as i64, token.run.length));
        }
        FieldKind::Weekday { .. } => {
            let key = WEEKDAY_KEYS[value.weekday() as usize % 7];
            let name = named_entry(properties, &token.kind, key)?;
            output.push_str(&name);
        }
        FieldKind::DayPeriod => {
            let key = if value.hour < 12 { "am" } else { "pm" };
            let name = named_entry(properties, &token.kind, key)?;
            output.push_str(&name);
        }
        FieldKind::ZoneOffset { long } => {
            let rendered =
                format_offset(properties, value.zone_offset_minutes, *long, numbers)?;
            output.push_str(&rendered);
        }
        FieldKind::Numeric(kind) => {
            let number = numeric_value(*kind, token.run.length, value)?;
            output.push_str(&numbers.format_integer(number, token.run.length));
        }
        FieldKind::Unsupported(chr) => return Err(CoreError::UnsupportedField(*chr)),
    }
    Ok(())
}

/// Fragment for a named field, with the same short-weekday fallback the
/// resolver applied.
pub(crate) fn lookup_fragment<'p>(
    properties: &'p PatternProperties,
    kind: &FieldKind,
) -> CoreResult<&'p Fragment> {
    let key = field::data_key(kind, properties.calendar())
        .ok_or(CoreError::InvalidInput("field carries no named data"))?;
    if let Some(fragment) = properties.get(&key) {
        return Ok(fragment);
    }
    if let FieldKind::Weekday {
        context,
        width: NameWidth::Short,
    } = kind
    {
        let fallback = format!(
            "{}/days/{}/abbreviated",
            properties.calendar(),
            context.segment()
        );
        if let Some(fragment) = properties.get(&fallback) {
            return Ok(fragment);
        }
    }
    Err(CoreError::MissingData(DataPath::new(field::read_path(&key))))
}

fn named_entry(
    properties: &PatternProperties,
    kind: &FieldKind,
    entry: &str,
) -> CoreResult<String> {
    let fragment = lookup_fragment(properties, kind)?;
    fragment
        .get(entry)
        .and_then(Fragment::as_text)
        .map(String::from)
        .ok_or(CoreError::InvalidInput("name entry missing from fragment"))
}

fn numeric_value(kind: NumericField, length: usize, value: &DateTimeValue) -> CoreResult<i64> {
    Ok(match kind {
        NumericField::Year => {
            if length == 2 {
                value.year.rem_euclid(100) as i64
            } else {
                value.year as i64
            }
        }
        NumericField::Month => value.month as i64,
        NumericField::WeekOfYear => ((value.day_of_year() - 1) / 7 + 1) as i64,
        NumericField::WeekOfMonth => ((value.day as i64 - 1) / 7) + 1,
        NumericField::Day => value.day as i64,
        NumericField::DayOfYear => value.day_of_year() as i64,
        NumericField::DayOfWeekInMonth => ((value.day as i64 - 1) / 7) + 1,
        NumericField::WeekdayLocal => value.weekday() as i64 + 1,
        NumericField::Hour12 => ((value.hour as i64 + 11) % 12) + 1,
        NumericField::Hour23 => value.hour as i64,
        NumericField::Hour11 => (value.hour % 12) as i64,
        NumericField::Hour24 => {
            if value.hour == 0 {
                24
            } else {
                value.hour as i64
            }
        }
        NumericField::Minute => value.minute as i64,
        NumericField::Second => value.second as i64,
        NumericField::SubSecond => scale_milliseconds(value.millisecond, length),
        NumericField::Other => {
            return Err(CoreError::InvalidInput("numeric field not representable"));
        }
    })
}

fn scale_milliseconds(milliseconds: u16, length: usize) -> i64 {
    let value = milliseconds as i64;
    if length >= 3 {
        value * pow10(length - 3)
    } else {
        value / pow10(3 - length)
    }
}

pub(crate) fn pow10(exponent: usize) -> i64 {
    let mut result = 1;
    for _ in 0..exponent {
        result *= 10;
    }
    result
}

/// Generic GMT-offset rendering from the three timeZoneNames templates.
/// Long forms keep the hourFormat padding; short forms use unpadded
/// hours and drop zero minutes.
pub(crate) fn format_offset(
    properties: &PatternProperties,
    minutes: i32,
    long: bool,
    numbers: &dyn NumberBackend,
) -> CoreResult<String> {
    let zero = zone_template(properties, field::GMT_ZERO_FORMAT_KEY)?;
    if minutes == 0 {
        return Ok(zero.to_string());
    }
    let gmt = zone_template(properties, field::GMT_FORMAT_KEY)?;
    let hour_format = zone_template(properties, field::HOUR_FORMAT_KEY)?;
    let (positive, negative) = hour_format
        .split_once(';')
        .ok_or(CoreError::InvalidInput("malformed hourFormat"))?;
    let template = if minutes < 0 { negative } else { positive };
    let hours = minutes.unsigned_abs() / 60;
    let remainder = minutes.unsigned_abs() % 60;
    let rendered = render_offset_template(template, hours, remainder, long, numbers);
    Ok(gmt.replace("{0}", &rendered))
}

pub(crate) fn zone_template<'p>(
    properties: &'p PatternProperties,
    key: &str,
) -> CoreResult<&'p str> {
    properties
        .get(key)
        .and_then(Fragment::as_text)
        .ok_or(CoreError::MissingData(DataPath::new(field::read_path(key))))
}

fn render_offset_template(
    template: &str,
    hours: u32,
    minutes: u32,
    long: bool,
    numbers: &dyn NumberBackend,
) -> String {
    let mut out = String::new();
    let mut pending = String::new();
    let mut chars = template.chars().peekable();
    while let Some(&chr) = chars.peek() {
        if chr == 'H' || chr == 'm' {
            let mut run = 0;
            while chars.peek() == Some(&chr) {
                chars.next();
                run += 1;
            }
            if chr == 'm' && !long && minutes == 0 {
                // Short form drops zero minutes and their separator.
                pending.clear();
                continue;
            }
            out.push_str(&pending);
            pending.clear();
            let (value, width) = if chr == 'H' {
                (hours as i64, if long { run } else { 0 })
            } else {
                (minutes as i64, run)
            };
            out.push_str(&numbers.format_integer(value, width));
        } else {
            pending.push(chr);
            chars.next();
        }
    }
    out.push_str(&pending);
    out
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::format_date;
    use crate::error::CoreError;
    use crate::fragment::Fragment;
    use crate::numbers::LatinNumbers;
    use crate::properties::PatternProperties;
    use crate::value::DateTimeValue;

    fn names(pairs: &[(&str, &str)]) -> Fragment {
        let mut map = Fragment::empty_map();
        for (key, value) in pairs {
            map.insert(*key, Fragment::text(*value));
        }
        map
    }

    fn properties_for(pattern: &str) -> PatternProperties {
        let mut properties = PatternProperties::new(pattern, String::from(":"), "gregorian");
        properties.insert("gregorian/eras/eraAbbr", names(&[("0", "BC"), ("1", "AD")]));
        properties.insert(
            "gregorian/months/format/abbreviated",
            names(&[
                ("1", "Jan"),
                ("2", "Feb"),
                ("3", "Mar"),
                ("4", "Apr"),
                ("5", "May"),
                ("6", "Jun"),
                ("7", "Jul"),
                ("8", "Aug"),
                ("9", "Sep"),
                ("10", "Oct"),
                ("11", "Nov"),
                ("12", "Dec"),
            ]),
        );
        properties.insert(
            "gregorian/days/format/abbreviated",
            names(&[
                ("sun", "Sun"),
                ("mon", "Mon"),
                ("tue", "Tue"),
                ("wed", "Wed"),
                ("thu", "Thu"),
                ("fri", "Fri"),
                ("sat", "Sat"),
            ]),
        );
        properties.insert(
            "gregorian/quarters/format/abbreviated",
            names(&[("1", "Q1"), ("2", "Q2"), ("3", "Q3"), ("4", "Q4")]),
        );
        properties.insert(
            "gregorian/dayPeriods/format/wide",
            names(&[("am", "AM"), ("pm", "PM")]),
        );
        properties.insert("timeZoneNames/gmtFormat", Fragment::text("GMT{0}"));
        properties.insert("timeZoneNames/gmtZeroFormat", Fragment::text("GMT"));
        properties.insert("timeZoneNames/hourFormat", Fragment::text("+HH:mm;-HH:mm"));
        properties
    }

    #[test]
    fn formats_the_reference_date_pattern() {
        let properties = properties_for("E, MMM d, y G");
        let value = DateTimeValue::ymd(2010, 9, 15);
        let out = format_date(&properties, &value, &LatinNumbers).expect("format");
        assert_eq!(out, "Wed, Sep 15, 2010 AD");
    }

    #[test]
    fn formats_quarters_and_twelve_hour_time() {
        let properties = properties_for("QQQ y");
        let value = DateTimeValue::ymd(2010, 8, 5);
        let out = format_date(&properties, &value, &LatinNumbers).expect("format");
        assert_eq!(out, "Q3 2010");

        let properties = properties_for("h:mm:ss a");
        let mut value = DateTimeValue::ymd(2010, 9, 15);
        value.hour = 17;
        value.minute = 35;
        value.second = 7;
        let out = format_date(&properties, &value, &LatinNumbers).expect("format");
        assert_eq!(out, "5:35:07 PM");
    }

    #[test]
    fn formats_two_digit_years_and_subseconds() {
        let properties = properties_for("yy");
        let out =
            format_date(&properties, &DateTimeValue::ymd(2010, 1, 1), &LatinNumbers).expect("yy");
        assert_eq!(out, "10");

        let properties = properties_for("ss.SS");
        let mut value = DateTimeValue::default();
        value.second = 7;
        value.millisecond = 250;
        let out = format_date(&properties, &value, &LatinNumbers).expect("subsecond");
        assert_eq!(out, "07.25");
    }

    #[test]
    fn formats_generic_offsets() {
        let mut value = DateTimeValue::default();

        let properties = properties_for("OOOO");
        value.zone_offset_minutes = 330;
        let out = format_date(&properties, &value, &LatinNumbers).expect("long");
        assert_eq!(out, "GMT+05:30");

        value.zone_offset_minutes = -480;
        let out = format_date(&properties, &value, &LatinNumbers).expect("negative");
        assert_eq!(out, "GMT-08:00");

        value.zone_offset_minutes = 0;
        let out = format_date(&properties, &value, &LatinNumbers).expect("zero");
        assert_eq!(out, "GMT");

        let properties = properties_for("O");
        value.zone_offset_minutes = -480;
        let out = format_date(&properties, &value, &LatinNumbers).expect("short");
        assert_eq!(out, "GMT-8");

        value.zone_offset_minutes = 330;
        let out = format_date(&properties, &value, &LatinNumbers).expect("short with minutes");
        assert_eq!(out, "GMT+5:30");
    }

    #[test]
    fn short_z_formats_like_long_o() {
        let mut value = DateTimeValue::default();
        value.zone_offset_minutes = -480;
        let properties = properties_for("Z");
        let out = format_date(&properties, &value, &LatinNumbers).expect("Z");
        assert_eq!(out, "GMT-08:00");
    }

    #[test]
    fn missing_fragment_is_reported_with_its_path() {
        let properties = PatternProperties::new("G", String::from(":"), "gregorian");
        let err = format_date(&properties, &DateTimeValue::default(), &LatinNumbers)
            .expect_err("missing");
        assert!(matches!(err, CoreError::MissingData(_)));
    }
}
