use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::CoreResult;
use crate::pattern::{FieldRun, PatternItem, tokenize};
use crate::value::Granularity;

pub const GMT_FORMAT_KEY: &str = "timeZoneNames/gmtFormat";
pub const GMT_ZERO_FORMAT_KEY: &str = "timeZoneNames/gmtZeroFormat";
pub const HOUR_FORMAT_KEY: &str = "timeZoneNames/hourFormat";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameContext {
    Format,
    StandAlone,
}

impl NameContext {
    pub fn segment(self) -> &'static str {
        match self {
            NameContext::Format => "format",
            NameContext::StandAlone => "stand-alone",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameWidth {
    Abbreviated,
    Wide,
    Narrow,
    Short,
}

impl NameWidth {
    pub fn segment(self) -> &'static str {
        match self {
            NameWidth::Abbreviated => "abbreviated",
            NameWidth::Wide => "wide",
            NameWidth::Narrow => "narrow",
            NameWidth::Short => "short",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericField {
    Year,
    Month,
    WeekOfYear,
    WeekOfMonth,
    Day,
    DayOfYear,
    DayOfWeekInMonth,
    WeekdayLocal,
    Hour12,
    Hour23,
    Hour11,
    Hour24,
    Minute,
    Second,
    SubSecond,
    Other,
}

/// Semantic role of one canonicalized field run, shared by the resolver
/// and the formatter/parser so both sides agree on data keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Era(NameWidth),
    Quarter {
        context: NameContext,
        width: Option<NameWidth>,
    },
    Month {
        context: NameContext,
        width: Option<NameWidth>,
    },
    Weekday {
        context: NameContext,
        width: NameWidth,
    },
    DayPeriod,
    ZoneOffset {
        long: bool,
    },
    Numeric(NumericField),
    Unsupported(char),
}

pub fn classify(run: FieldRun) -> FieldKind {
    let FieldRun { chr, length } = run.canonical();
    match chr {
        'G' => FieldKind::Era(match length {
            0..=3 => NameWidth::Abbreviated,
            4 => NameWidth::Wide,
            _ => NameWidth::Narrow,
        }),
        // Extended year, cyclic year, Julian day, named time zones.
        'u' | 'U' | 'g' | 'v' | 'V' => FieldKind::Unsupported(chr),
        'Q' => FieldKind::Quarter {
            context: NameContext::Format,
            width: named_width(length),
        },
        'q' => FieldKind::Quarter {
            context: NameContext::StandAlone,
            width: named_width(length),
        },
        'M' => FieldKind::Month {
            context: NameContext::Format,
            width: named_width(length),
        },
        'L' => FieldKind::Month {
            context: NameContext::StandAlone,
            width: named_width(length),
        },
        'E' => FieldKind::Weekday {
            context: NameContext::Format,
            width: weekday_width(length),
        },
        'e' if length <= 2 => FieldKind::Numeric(NumericField::WeekdayLocal),
        'e' => FieldKind::Weekday {
            context: NameContext::Format,
            width: weekday_width(length),
        },
        'c' if length <= 2 => FieldKind::Numeric(NumericField::WeekdayLocal),
        'c' => FieldKind::Weekday {
            context: NameContext::StandAlone,
            width: weekday_width(length),
        },
        'a' => FieldKind::DayPeriod,
        'z' | 'O' => FieldKind::ZoneOffset { long: length == 4 },
        'y' => FieldKind::Numeric(NumericField::Year),
        'w' => FieldKind::Numeric(NumericField::WeekOfYear),
        'W' => FieldKind::Numeric(NumericField::WeekOfMonth),
        'd' => FieldKind::Numeric(NumericField::Day),
        'D' => FieldKind::Numeric(NumericField::DayOfYear),
        'F' => FieldKind::Numeric(NumericField::DayOfWeekInMonth),
        'h' => FieldKind::Numeric(NumericField::Hour12),
        'H' => FieldKind::Numeric(NumericField::Hour23),
        'K' => FieldKind::Numeric(NumericField::Hour11),
        'k' => FieldKind::Numeric(NumericField::Hour24),
        'm' => FieldKind::Numeric(NumericField::Minute),
        's' => FieldKind::Numeric(NumericField::Second),
        'S' => FieldKind::Numeric(NumericField::SubSecond),
        _ => FieldKind::Numeric(NumericField::Other),
    }
}

fn named_width(length: usize) -> Option<NameWidth> {
    match length {
        3 => Some(NameWidth::Abbreviated),
        4 => Some(NameWidth::Wide),
        5.. => Some(NameWidth::Narrow),
        _ => None,
    }
}

fn weekday_width(length: usize) -> NameWidth {
    match length {
        4 => NameWidth::Wide,
        5 => NameWidth::Narrow,
        6 => NameWidth::Short,
        _ => NameWidth::Abbreviated,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub run: FieldRun,
    pub kind: FieldKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenItem {
    Field(Token),
    Literal(String),
}

/// Tokenizes, canonicalizes and classifies a pattern in one pass.
pub fn tokens(pattern: &str) -> CoreResult<Vec<TokenItem>> {
    let items = tokenize(pattern)?;
    Ok(items
        .into_iter()
        .map(|item| match item {
            PatternItem::Field(run) => TokenItem::Field(Token {
                run: run.canonical(),
                kind: classify(run),
            }),
            PatternItem::Literal(text) => TokenItem::Literal(text),
        })
        .collect())
}

/// Normalized properties key for a classified field, or `None` for the
/// fields that need no named data. Zone offsets use the three fixed
/// `timeZoneNames` keys instead.
pub fn data_key(kind: &FieldKind, calendar: &str) -> Option<String> {
    match kind {
        FieldKind::Era(width) => Some(format!("{calendar}/eras/{}", era_segment(*width))),
        FieldKind::Quarter {
            context,
            width: Some(width),
        } => Some(format!(
            "{calendar}/quarters/{}/{}",
            context.segment(),
            width.segment()
        )),
        FieldKind::Month {
            context,
            width: Some(width),
        } => Some(format!(
            "{calendar}/months/{}/{}",
            context.segment(),
            width.segment()
        )),
        FieldKind::Month { width: None, .. } => {
            Some(format!("{calendar}/monthPatterns/numeric/all"))
        }
        FieldKind::Weekday { context, width } => Some(format!(
            "{calendar}/days/{}/{}",
            context.segment(),
            width.segment()
        )),
        FieldKind::DayPeriod => Some(format!("{calendar}/dayPeriods/format/wide")),
        _ => None,
    }
}

fn era_segment(width: NameWidth) -> &'static str {
    match width {
        NameWidth::Wide => "eraNames",
        NameWidth::Narrow => "eraNarrow",
        NameWidth::Abbreviated | NameWidth::Short => "eraAbbr",
    }
}

/// Store path for a normalized properties key. Calendar-scoped keys live
/// under `dates/calendars`, zone templates directly under `dates`.
pub fn read_path(key: &str) -> Vec<String> {
    let mut path = Vec::new();
    path.push("dates".to_string());
    if !key.starts_with("timeZoneNames") {
        path.push("calendars".to_string());
    }
    path.extend(key.split('/').map(|segment| segment.to_string()));
    path
}

/// Finest calendar unit a pattern sets; everything finer stays at its
/// default after a parse, which is what the round-trip law truncates to.
pub fn granularity(items: &[TokenItem]) -> Granularity {
    let mut finest = Granularity::Year;
    for item in items {
        let TokenItem::Field(token) = item else {
            continue;
        };
        let unit = match token.run.chr {
            'M' | 'L' => Granularity::Month,
            'd' | 'D' | 'F' | 'w' | 'W' | 'E' | 'e' | 'c' => Granularity::Day,
            'h' | 'H' | 'K' | 'k' | 'a' => Granularity::Hour,
            'm' => Granularity::Minute,
            's' => Granularity::Second,
            'S' => Granularity::SubSecond,
            _ => Granularity::Year,
        };
        if unit > finest {
            finest = unit;
        }
    }
    finest
}
