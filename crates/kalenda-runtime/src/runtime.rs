use kalenda_core::{
    CalendarResolver, DateTimeValue, LocaleData, PatternProperties, format_date, parse_date,
    parse_date_from, resolve,
};

use crate::calendar::LocaleCalendarResolver;
use crate::error::RuntimeResult;
use crate::numbers::CldrNumbers;
use crate::skeleton::{PatternRequest, resolve_pattern};

/// One resolved (locale, pattern) pair, ready to format and parse. All
/// locale data is read up front; the formatter holds no reference to the
/// store afterwards.
#[derive(Debug)]
pub struct DateFormatter {
    properties: PatternProperties,
    numbers: CldrNumbers,
}

impl DateFormatter {
    pub fn new(
        data: &LocaleData,
        locale: &str,
        request: &PatternRequest,
    ) -> RuntimeResult<Self> {
        let accessor = data.accessor(locale);
        let numbers = CldrNumbers::for_locale(&accessor)?;
        let calendars = LocaleCalendarResolver;
        let calendar = calendars.calendar_for(&accessor);
        let pattern = resolve_pattern(request, &accessor, &calendar)?;
        let properties = resolve(&pattern, &accessor, &numbers, &calendars)?;
        Ok(Self {
            properties,
            numbers,
        })
    }

    pub fn format(&self, value: &DateTimeValue) -> RuntimeResult<String> {
        Ok(format_date(&self.properties, value, &self.numbers)?)
    }

    pub fn parse(&self, text: &str) -> RuntimeResult<DateTimeValue> {
        Ok(parse_date(&self.properties, text, &self.numbers)?)
    }

    /// Parses with unnamed coarser fields taken from `reference`, so
    /// time-only patterns land on the reference date.
    pub fn parse_from(
        &self,
        text: &str,
        reference: &DateTimeValue,
    ) -> RuntimeResult<DateTimeValue> {
        Ok(parse_date_from(&self.properties, text, &self.numbers, reference)?)
    }

    pub fn pattern(&self) -> &str {
        self.properties.pattern()
    }

    pub fn properties(&self) -> &PatternProperties {
        &self.properties
    }
}
