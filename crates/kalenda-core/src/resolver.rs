use alloc::format;
use alloc::string::String;

use crate::error::{CoreError, CoreResult};
use crate::field::{self, FieldKind, NameWidth, TokenItem};
use crate::month_names::augment_month_names;
use crate::numbers::NumberBackend;
use crate::properties::PatternProperties;
use crate::store::LocaleAccessor;

/// Maps a locale to the calendar system its data should come from.
pub trait CalendarResolver {
    fn calendar_for(&self, accessor: &LocaleAccessor<'_>) -> String;
}

/// Honours the `ca` keyword of the `-u-` extension, else gregorian.
pub struct PreferredCalendar;

impl CalendarResolver for PreferredCalendar {
    fn calendar_for(&self, accessor: &LocaleAccessor<'_>) -> String {
        unicode_extension(accessor.locale(), "ca").unwrap_or_else(|| String::from("gregorian"))
    }
}

/// First subtag following `key` inside the `-u-` extension of a locale
/// identifier, e.g. `zh-u-ca-chinese` with key `ca` yields `chinese`.
pub fn unicode_extension(locale: &str, key: &str) -> Option<String> {
    let mut parts = locale.split('-');
    for part in parts.by_ref() {
        if part == "u" {
            break;
        }
    }
    while let Some(part) = parts.next() {
        if part == key {
            return parts.next().map(String::from);
        }
    }
    None
}

/// Resolves a raw pattern into the minimal set of locale fragments it
/// needs. Unsupported fields abort before any data is read; every
/// successful read inside the collector window lands in the properties
/// bag under its normalized key, in pattern scan order.
pub fn resolve(
    pattern: &str,
    accessor: &LocaleAccessor<'_>,
    numbers: &dyn NumberBackend,
    calendars: &dyn CalendarResolver,
) -> CoreResult<PatternProperties> {
    let items = field::tokens(pattern)?;
    for item in &items {
        if let TokenItem::Field(token) = item {
            if let FieldKind::Unsupported(chr) = token.kind {
                return Err(CoreError::UnsupportedField(chr));
            }
        }
    }

    let calendar = calendars.calendar_for(accessor);
    let mut properties =
        PatternProperties::new(pattern, numbers.symbol("timeSeparator"), &calendar);

    let ((), reads) = accessor.with_collector(|accessor| {
        for item in &items {
            if let TokenItem::Field(token) = item {
                query_field(accessor, &token.kind, &calendar)?;
            }
        }
        Ok(())
    })?;
    for read in reads {
        properties.record(read);
    }

    // Leap-month augmentation overwrites the plain month names; the
    // last write for a key wins.
    for item in &items {
        let TokenItem::Field(token) = item else {
            continue;
        };
        let FieldKind::Month {
            context,
            width: Some(width),
        } = token.kind
        else {
            continue;
        };
        let Some(key) = field::data_key(&token.kind, &calendar) else {
            continue;
        };
        let Some(base) = properties.get(&key) else {
            continue;
        };
        let augmented = augment_month_names(base, context, width, &calendar, accessor);
        properties.insert(key, augmented);
    }

    Ok(properties)
}

fn query_field(
    accessor: &LocaleAccessor<'_>,
    kind: &FieldKind,
    calendar: &str,
) -> CoreResult<()> {
    match kind {
        // Locales may omit the short weekday width; abbreviated stands
        // in for it.
        FieldKind::Weekday { context, width } if *width == NameWidth::Short => {
            let short = format!("{calendar}/days/{}/short", context.segment());
            if accessor.read_optional(&field::read_path(&short)).is_none() {
                let abbreviated = format!("{calendar}/days/{}/abbreviated", context.segment());
                accessor.read(&field::read_path(&abbreviated))?;
            }
            Ok(())
        }
        // Numeric month expansions exist only for calendars with leap
        // months; absence is not an error.
        FieldKind::Month { width: None, .. } => {
            if let Some(key) = field::data_key(kind, calendar) {
                accessor.read_optional(&field::read_path(&key));
            }
            Ok(())
        }
        FieldKind::ZoneOffset { .. } => {
            accessor.read(&field::read_path(field::GMT_FORMAT_KEY))?;
            accessor.read(&field::read_path(field::GMT_ZERO_FORMAT_KEY))?;
            accessor.read(&field::read_path(field::HOUR_FORMAT_KEY))?;
            Ok(())
        }
        _ => {
            if let Some(key) = field::data_key(kind, calendar) {
                accessor.read(&field::read_path(&key))?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use super::{PreferredCalendar, resolve, unicode_extension};
    use crate::error::CoreError;
    use crate::fragment::Fragment;
    use crate::numbers::LatinNumbers;
    use crate::store::LocaleData;

    fn names(pairs: &[(&str, &str)]) -> Fragment {
        let mut map = Fragment::empty_map();
        for (key, value) in pairs {
            map.insert(*key, Fragment::text(*value));
        }
        map
    }

    fn gregorian() -> Fragment {
        let mut gregorian = Fragment::empty_map();

        let mut eras = Fragment::empty_map();
        eras.insert("eraAbbr", names(&[("0", "BC"), ("1", "AD")]));
        gregorian.insert("eras", eras);

        let mut months = Fragment::empty_map();
        let mut format = Fragment::empty_map();
        format.insert(
            "abbreviated",
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
        months.insert("format", format);
        gregorian.insert("months", months);

        let mut days = Fragment::empty_map();
        let mut format = Fragment::empty_map();
        format.insert(
            "abbreviated",
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
        days.insert("format", format);
        gregorian.insert("days", days);

        let mut quarters = Fragment::empty_map();
        let mut format = Fragment::empty_map();
        format.insert(
            "abbreviated",
            names(&[("1", "Q1"), ("2", "Q2"), ("3", "Q3"), ("4", "Q4")]),
        );
        quarters.insert("format", format);
        gregorian.insert("quarters", quarters);

        let mut day_periods = Fragment::empty_map();
        let mut format = Fragment::empty_map();
        format.insert("wide", names(&[("am", "AM"), ("pm", "PM")]));
        day_periods.insert("format", format);
        gregorian.insert("dayPeriods", day_periods);

        gregorian
    }

    fn chinese() -> Fragment {
        let mut chinese = Fragment::empty_map();
        let mut months = Fragment::empty_map();
        let mut format = Fragment::empty_map();
        format.insert("abbreviated", names(&[("1", "Mo1"), ("2", "Mo2")]));
        months.insert("format", format);
        chinese.insert("months", months);

        let mut month_patterns = Fragment::empty_map();
        let mut leap = Fragment::empty_map();
        leap.insert("leap", Fragment::text("{0}bis"));
        let mut wide = Fragment::empty_map();
        wide.insert("wide", leap);
        month_patterns.insert("format", wide);
        let mut all = Fragment::empty_map();
        all.insert("leap", Fragment::text("{0}bis"));
        let mut numeric = Fragment::empty_map();
        numeric.insert("all", all);
        month_patterns.insert("numeric", numeric);
        chinese.insert("monthPatterns", month_patterns);
        chinese
    }

    fn store() -> LocaleData {
        let mut calendars = Fragment::empty_map();
        calendars.insert("gregorian", gregorian());

        let mut dates = Fragment::empty_map();
        dates.insert("calendars", calendars);
        dates.insert(
            "timeZoneNames",
            names(&[
                ("gmtFormat", "GMT{0}"),
                ("gmtZeroFormat", "GMT"),
                ("hourFormat", "+HH:mm;-HH:mm"),
            ]),
        );

        let mut en = Fragment::empty_map();
        en.insert("dates", dates);
        let mut main = Fragment::empty_map();
        main.insert("en", en);

        let mut calendars = Fragment::empty_map();
        calendars.insert("chinese", chinese());
        let mut dates = Fragment::empty_map();
        dates.insert("calendars", calendars);
        let mut locale = Fragment::empty_map();
        locale.insert("dates", dates);
        main.insert("en-u-ca-chinese", locale);

        let mut root = Fragment::empty_map();
        root.insert("main", main);
        let mut data = LocaleData::new();
        data.merge(root);
        data
    }

    #[test]
    fn collects_exactly_the_keys_the_pattern_implies() {
        let data = store();
        let accessor = data.accessor("en");
        let properties = resolve("E, MMM d, y G", &accessor, &LatinNumbers, &PreferredCalendar)
            .expect("resolve");

        let keys: Vec<&str> = properties.keys().collect();
        assert_eq!(
            keys,
            [
                "gregorian/days/format/abbreviated",
                "gregorian/eras/eraAbbr",
                "gregorian/months/format/abbreviated",
            ]
        );
        assert_eq!(properties.pattern(), "E, MMM d, y G");
        assert_eq!(properties.time_separator(), ":");
        assert_eq!(properties.calendar(), "gregorian");
    }

    #[test]
    fn numeric_fields_query_nothing() {
        let data = store();
        let accessor = data.accessor("en");
        let properties =
            resolve("y-M-d H:m:s", &accessor, &LatinNumbers, &PreferredCalendar).expect("resolve");
        assert_eq!(properties.keys().count(), 0);
    }

    #[test]
    fn unsupported_fields_fail_before_any_read() {
        let data = store();
        let accessor = data.accessor("en");
        for (pattern, expected) in [("yMdu", 'u'), ("UU", 'U'), ("g", 'g'), ("yv", 'v'), ("V", 'V')]
        {
            let err = resolve(pattern, &accessor, &LatinNumbers, &PreferredCalendar)
                .expect_err("unsupported");
            assert_eq!(err, CoreError::UnsupportedField(expected));
        }
        // The accessor is reusable afterwards: no stale collector.
        let ((), reads) = accessor.with_collector(|_| Ok(())).expect("clean");
        assert!(reads.is_empty());
    }

    #[test]
    fn short_and_long_zone_runs_share_the_same_keys() {
        let data = store();
        let accessor = data.accessor("en");
        let from_z =
            resolve("Z", &accessor, &LatinNumbers, &PreferredCalendar).expect("resolve Z");
        let from_o =
            resolve("OOOO", &accessor, &LatinNumbers, &PreferredCalendar).expect("resolve OOOO");
        let z_keys: Vec<&str> = from_z.keys().collect();
        let o_keys: Vec<&str> = from_o.keys().collect();
        assert_eq!(z_keys, o_keys);
        assert_eq!(
            z_keys,
            [
                "timeZoneNames/gmtFormat",
                "timeZoneNames/gmtZeroFormat",
                "timeZoneNames/hourFormat",
            ]
        );
    }

    #[test]
    fn weekday_short_width_falls_back_to_abbreviated() {
        let data = store();
        let accessor = data.accessor("en");
        let properties = resolve("EEEEEE", &accessor, &LatinNumbers, &PreferredCalendar)
            .expect("resolve");
        let keys: Vec<&str> = properties.keys().collect();
        assert_eq!(keys, ["gregorian/days/format/abbreviated"]);
    }

    #[test]
    fn missing_era_data_names_the_era_path() {
        let mut data = LocaleData::new();
        let mut root = Fragment::empty_map();
        let mut main = Fragment::empty_map();
        main.insert("en", Fragment::empty_map());
        root.insert("main", main);
        data.merge(root);

        let accessor = data.accessor("en");
        let err =
            resolve("G", &accessor, &LatinNumbers, &PreferredCalendar).expect_err("missing era");
        match err {
            CoreError::MissingData(path) => {
                assert_eq!(
                    path.to_string(),
                    "main/en/dates/calendars/gregorian/eras/eraAbbr"
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn month_names_come_back_augmented_with_leap_variants() {
        let data = store();
        let accessor = data.accessor("en-u-ca-chinese");
        let properties = resolve("MMM", &accessor, &LatinNumbers, &PreferredCalendar)
            .expect("resolve");
        assert_eq!(properties.calendar(), "chinese");
        let months = properties
            .get("chinese/months/format/abbreviated")
            .expect("months");
        let entries = months.as_map().expect("map");
        assert_eq!(entries.len(), 4);
        assert_eq!(entries.get("1").and_then(Fragment::as_text), Some("Mo1"));
        assert_eq!(
            entries.get("2-leap").and_then(Fragment::as_text),
            Some("Mo2bis")
        );
    }

    #[test]
    fn numeric_months_query_the_expansion_table_when_present() {
        let data = store();
        let accessor = data.accessor("en-u-ca-chinese");
        let properties =
            resolve("M", &accessor, &LatinNumbers, &PreferredCalendar).expect("resolve");
        let keys: Vec<&str> = properties.keys().collect();
        assert_eq!(keys, ["chinese/monthPatterns/numeric/all"]);

        // Gregorian has no expansion table; the bag stays empty.
        let accessor = data.accessor("en");
        let properties =
            resolve("M/d/y", &accessor, &LatinNumbers, &PreferredCalendar).expect("resolve");
        assert_eq!(properties.keys().count(), 0);
    }

    #[test]
    fn unicode_extension_finds_the_ca_keyword() {
        assert_eq!(
            unicode_extension("zh-u-ca-chinese", "ca").as_deref(),
            Some("chinese")
        );
        assert_eq!(
            unicode_extension("th-TH-u-nu-thai-ca-buddhist", "ca").as_deref(),
            Some("buddhist")
        );
        assert_eq!(unicode_extension("en-GB", "ca"), None);
        let calendar = String::from("gregorian");
        assert_eq!(unicode_extension(&calendar, "ca"), None);
    }
}
