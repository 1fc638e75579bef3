/// Calendar precision of a pattern, ordered coarse to fine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Granularity {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    SubSecond,
}

/// Structured date/time value. A superset of what any one pattern uses;
/// weekday and quarter are derived rather than stored so that parsing
/// never has to reconcile them with the plain date fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateTimeValue {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
    /// Era index into the calendar's era table; 1 is the common era.
    pub era: u8,
    pub zone_offset_minutes: i32,
}

impl Default for DateTimeValue {
    fn default() -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
            era: 1,
            zone_offset_minutes: 0,
        }
    }
}

const MONTH_DAYS: [u16; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

impl DateTimeValue {
    pub fn ymd(year: i32, month: u8, day: u8) -> Self {
        Self {
            year,
            month,
            day,
            ..Self::default()
        }
    }

    /// Day of week, 0 = Sunday. Sakamoto's method over the proleptic
    /// Gregorian calendar.
    pub fn weekday(&self) -> u8 {
        const OFFSETS: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
        let mut year = self.year;
        if self.month < 3 {
            year -= 1;
        }
        let month = self.month.clamp(1, 12) as usize;
        let sum = year + year.div_euclid(4) - year.div_euclid(100)
            + year.div_euclid(400)
            + OFFSETS[month - 1]
            + self.day as i32;
        sum.rem_euclid(7) as u8
    }

    pub fn quarter(&self) -> u8 {
        (self.month.clamp(1, 12) - 1) / 3 + 1
    }

    pub fn day_of_year(&self) -> u16 {
        let month = self.month.clamp(1, 12) as usize;
        let mut days: u16 = MONTH_DAYS[..month - 1].iter().sum();
        if month > 2 && self.is_leap_year() {
            days += 1;
        }
        days + self.day as u16
    }

    pub fn is_leap_year(&self) -> bool {
        let year = self.year;
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Resets every field finer than `granularity` to its default. The
    /// era and zone offset are not calendar units and are kept.
    pub fn truncate(&self, granularity: Granularity) -> Self {
        let mut value = *self;
        if granularity < Granularity::Month {
            value.month = 1;
        }
        if granularity < Granularity::Day {
            value.day = 1;
        }
        if granularity < Granularity::Hour {
            value.hour = 0;
        }
        if granularity < Granularity::Minute {
            value.minute = 0;
        }
        if granularity < Granularity::Second {
            value.second = 0;
        }
        if granularity < Granularity::SubSecond {
            value.millisecond = 0;
        }
        value
    }
}
