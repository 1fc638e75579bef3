use kalenda_core::{CalendarResolver, Fragment, LocaleAccessor, unicode_extension};

/// Calendar resolution with the full CLDR preference chain: the `-u-ca-`
/// extension wins, then the territory's `calendarPreferenceData` entry,
/// then gregorian.
pub struct LocaleCalendarResolver;

impl CalendarResolver for LocaleCalendarResolver {
    fn calendar_for(&self, accessor: &LocaleAccessor<'_>) -> String {
        if let Some(calendar) = unicode_extension(accessor.locale(), "ca") {
            return calendar;
        }
        if let Some(region) = region_subtag(accessor.locale()) {
            let preference = accessor
                .supplemental(&["calendarPreferenceData", region])
                .as_ref()
                .and_then(Fragment::as_text)
                .and_then(|list| list.split_whitespace().next().map(String::from));
            if let Some(calendar) = preference {
                return calendar;
            }
        }
        String::from("gregorian")
    }
}

/// Region subtag of a locale identifier: two uppercase letters or three
/// digits, before any extension.
fn region_subtag(locale: &str) -> Option<&str> {
    for part in locale.split('-').skip(1) {
        if part.len() == 1 {
            // Extension singletons end the ordinary subtag sequence.
            break;
        }
        let is_region = (part.len() == 2 && part.bytes().all(|b| b.is_ascii_uppercase()))
            || (part.len() == 3 && part.bytes().all(|b| b.is_ascii_digit()));
        if is_region {
            return Some(part);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use kalenda_core::{CalendarResolver, LocaleData};

    use super::{LocaleCalendarResolver, region_subtag};
    use crate::loader::load_json;

    fn store() -> LocaleData {
        let mut data = LocaleData::new();
        load_json(
            &mut data,
            r#"{"supplemental": {"calendarPreferenceData": {
                "TH": "buddhist gregorian",
                "001": "gregorian"
            }}}"#,
        )
        .expect("load");
        data
    }

    #[test]
    fn the_ca_extension_wins() {
        let data = store();
        let calendar = LocaleCalendarResolver.calendar_for(&data.accessor("th-TH-u-ca-gregory"));
        assert_eq!(calendar, "gregory");
    }

    #[test]
    fn territory_preference_applies_without_an_extension() {
        let data = store();
        assert_eq!(
            LocaleCalendarResolver.calendar_for(&data.accessor("th-TH")),
            "buddhist"
        );
        assert_eq!(
            LocaleCalendarResolver.calendar_for(&data.accessor("en-GB")),
            "gregorian"
        );
        assert_eq!(
            LocaleCalendarResolver.calendar_for(&data.accessor("en")),
            "gregorian"
        );
    }

    #[test]
    fn region_subtags_skip_scripts_and_stop_at_extensions() {
        assert_eq!(region_subtag("zh-Hant-TW"), Some("TW"));
        assert_eq!(region_subtag("es-419"), Some("419"));
        assert_eq!(region_subtag("en-u-ca-chinese"), None);
        assert_eq!(region_subtag("en"), None);
    }
}
