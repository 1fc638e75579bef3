#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod error;
mod field;
mod format;
mod fragment;
mod month_names;
mod numbers;
mod parse;
mod pattern;
mod properties;
mod resolver;
mod store;
mod value;

pub use error::{CoreError, CoreResult};
pub use field::{
    FieldKind, GMT_FORMAT_KEY, GMT_ZERO_FORMAT_KEY, HOUR_FORMAT_KEY, NameContext, NameWidth,
    NumericField, Token, TokenItem, data_key, granularity, read_path, tokens,
};
pub use format::format_date;
pub use fragment::Fragment;
pub use month_names::augment_month_names;
pub use numbers::{LatinNumbers, NumberBackend};
pub use parse::{parse_date, parse_date_from};
pub use pattern::{FieldRun, PatternItem, tokenize};
pub use properties::{PatternProperties, normalize_key};
pub use resolver::{CalendarResolver, PreferredCalendar, resolve, unicode_extension};
pub use store::{CollectedRead, DataPath, LocaleAccessor, LocaleData};
pub use value::{DateTimeValue, Granularity};
