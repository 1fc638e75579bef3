#![forbid(unsafe_code)]

mod calendar;
mod error;
mod loader;
mod numbers;
mod runtime;
mod skeleton;

pub use crate::calendar::LocaleCalendarResolver;
pub use crate::error::{RuntimeError, RuntimeResult};
pub use crate::loader::{fragment_from_json, load_json};
pub use crate::numbers::CldrNumbers;
pub use crate::runtime::DateFormatter;
pub use crate::skeleton::{PatternRequest, PresetWidth, resolve_pattern};
