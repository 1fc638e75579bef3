use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::fragment::Fragment;
use crate::store::{CollectedRead, DataPath};

/// Everything a tokenizer/formatter needs for one (pattern, locale)
/// pair: the fixed fields plus every locale fragment the resolver
/// actually consulted, keyed by normalized path. Later writes for a key
/// overwrite earlier ones; leap-month augmentation depends on that.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternProperties {
    pattern: String,
    time_separator: String,
    calendar: String,
    entries: BTreeMap<String, Fragment>,
}

impl PatternProperties {
    pub fn new(pattern: &str, time_separator: String, calendar: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            time_separator,
            calendar: calendar.to_string(),
            entries: BTreeMap::new(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn time_separator(&self) -> &str {
        &self.time_separator
    }

    pub fn calendar(&self) -> &str {
        &self.calendar
    }

    pub fn record(&mut self, read: CollectedRead) {
        self.entries.insert(normalize_key(&read.path), read.fragment);
    }

    pub fn insert(&mut self, key: impl Into<String>, fragment: Fragment) {
        self.entries.insert(key.into(), fragment);
    }

    pub fn get(&self, key: &str) -> Option<&Fragment> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Normalizes a read path into a properties key: everything through the
/// last `dates` segment is dropped and `calendars` segments collapse, so
/// two patterns needing the same logical fragment share a key no matter
/// which locale prefix the read carried.
pub fn normalize_key(path: &DataPath) -> String {
    let segments = path.segments();
    let start = segments
        .iter()
        .rposition(|segment| segment == "dates")
        .map(|index| index + 1)
        .unwrap_or(0);
    let kept: Vec<&str> = segments[start..]
        .iter()
        .filter(|segment| segment.as_str() != "calendars")
        .map(String::as_str)
        .collect();
    kept.join("/")
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use super::{PatternProperties, normalize_key};
    use crate::fragment::Fragment;
    use crate::store::{CollectedRead, DataPath};

    fn path(segments: &[&str]) -> DataPath {
        DataPath::new(segments.iter().map(|s| s.to_string()).collect::<Vec<String>>())
    }

    #[test]
    fn keys_strip_the_locale_prefix_and_collapse_calendars() {
        assert_eq!(
            normalize_key(&path(&[
                "main", "en", "dates", "calendars", "gregorian", "eras", "eraAbbr"
            ])),
            "gregorian/eras/eraAbbr"
        );
        assert_eq!(
            normalize_key(&path(&["main", "en", "dates", "timeZoneNames", "gmtFormat"])),
            "timeZoneNames/gmtFormat"
        );
    }

    #[test]
    fn later_writes_for_a_key_win() {
        let mut properties = PatternProperties::new("MMM", String::from(":"), "gregorian");
        let months = path(&[
            "main", "en", "dates", "calendars", "gregorian", "months", "format", "abbreviated",
        ]);
        properties.record(CollectedRead {
            path: months.clone(),
            fragment: Fragment::text("base"),
        });
        properties.record(CollectedRead {
            path: months,
            fragment: Fragment::text("augmented"),
        });
        assert_eq!(
            properties
                .get("gregorian/months/format/abbreviated")
                .and_then(Fragment::as_text),
            Some("augmented")
        );
        assert_eq!(properties.keys().count(), 1);
    }

    #[test]
    fn fixed_fields_are_exposed() {
        let properties = PatternProperties::new("yMd", String::from("."), "buddhist");
        assert_eq!(properties.pattern(), "yMd");
        assert_eq!(properties.time_separator(), ".");
        assert_eq!(properties.calendar(), "buddhist");
    }
}
