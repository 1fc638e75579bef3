use std::collections::BTreeMap;

use kalenda_core::{Fragment, LocaleAccessor, PatternItem, tokenize};

use crate::error::{RuntimeError, RuntimeResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresetWidth {
    Full,
    Long,
    Medium,
    Short,
}

impl PresetWidth {
    pub fn as_str(self) -> &'static str {
        match self {
            PresetWidth::Full => "full",
            PresetWidth::Long => "long",
            PresetWidth::Medium => "medium",
            PresetWidth::Short => "short",
        }
    }
}

/// How a caller names the pattern to resolve: verbatim, by skeleton
/// against `availableFormats`, or by preset width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternRequest {
    Raw(String),
    Skeleton(String),
    Date(PresetWidth),
    Time(PresetWidth),
    DateTime(PresetWidth),
}

pub fn resolve_pattern(
    request: &PatternRequest,
    accessor: &LocaleAccessor<'_>,
    calendar: &str,
) -> RuntimeResult<String> {
    match request {
        PatternRequest::Raw(pattern) => Ok(pattern.clone()),
        PatternRequest::Skeleton(skeleton) => skeleton_pattern(skeleton, accessor, calendar),
        PatternRequest::Date(width) => preset(accessor, calendar, "dateFormats", *width),
        PatternRequest::Time(width) => preset(accessor, calendar, "timeFormats", *width),
        PatternRequest::DateTime(width) => {
            let date = preset(accessor, calendar, "dateFormats", *width)?;
            let time = preset(accessor, calendar, "timeFormats", *width)?;
            let template = accessor
                .read_optional(&["dates", "calendars", calendar, "dateTimeFormats", width.as_str()])
                .as_ref()
                .and_then(Fragment::as_text)
                .map(String::from)
                .ok_or_else(|| {
                    RuntimeError::MissingPattern(format!("dateTimeFormats/{}", width.as_str()))
                })?;
            Ok(template.replace("{1}", &date).replace("{0}", &time))
        }
    }
}

fn preset(
    accessor: &LocaleAccessor<'_>,
    calendar: &str,
    table: &str,
    width: PresetWidth,
) -> RuntimeResult<String> {
    accessor
        .read_optional(&["dates", "calendars", calendar, table, width.as_str()])
        .as_ref()
        .and_then(Fragment::as_text)
        .map(String::from)
        .ok_or_else(|| RuntimeError::MissingPattern(format!("{table}/{}", width.as_str())))
}

/// Resolves a skeleton against `availableFormats`: the exact key first,
/// then the first entry naming the same field set, its run lengths
/// adjusted to the request.
fn skeleton_pattern(
    skeleton: &str,
    accessor: &LocaleAccessor<'_>,
    calendar: &str,
) -> RuntimeResult<String> {
    let requested = skeleton_runs(skeleton)?;
    let formats = accessor
        .read_optional(&[
            "dates",
            "calendars",
            calendar,
            "dateTimeFormats",
            "availableFormats",
        ])
        .ok_or_else(|| RuntimeError::MissingPattern(String::from(skeleton)))?;
    if let Some(pattern) = formats.get(skeleton).and_then(Fragment::as_text) {
        return Ok(String::from(pattern));
    }
    let entries = formats
        .as_map()
        .ok_or_else(|| RuntimeError::InvalidData(String::from("availableFormats is not a map")))?;
    for (key, value) in entries {
        let Ok(runs) = skeleton_runs(key) else {
            continue;
        };
        if !runs.keys().eq(requested.keys()) {
            continue;
        }
        if let Some(pattern) = value.as_text() {
            return adjust_lengths(pattern, &requested);
        }
    }
    Err(RuntimeError::MissingPattern(String::from(skeleton)))
}

/// Field letters of a skeleton with their run lengths. Skeletons carry
/// no literals; anything else is malformed.
fn skeleton_runs(skeleton: &str) -> RuntimeResult<BTreeMap<char, usize>> {
    let mut runs = BTreeMap::new();
    for chr in skeleton.chars() {
        if !chr.is_ascii_alphabetic() {
            return Err(RuntimeError::InvalidData(format!(
                "skeleton has a non-field character: {skeleton}"
            )));
        }
        *runs.entry(chr).or_insert(0) += 1;
    }
    Ok(runs)
}

/// Rewrites each field run of `pattern` to the length the skeleton asked
/// for, re-quoting literal text that could read as fields.
fn adjust_lengths(pattern: &str, requested: &BTreeMap<char, usize>) -> RuntimeResult<String> {
    let items = tokenize(pattern).map_err(RuntimeError::Core)?;
    let mut out = String::new();
    for item in items {
        match item {
            PatternItem::Field(run) => {
                let length = requested.get(&run.chr).copied().unwrap_or(run.length);
                for _ in 0..length {
                    out.push(run.chr);
                }
            }
            PatternItem::Literal(text) => quote_literal(&mut out, &text),
        }
    }
    Ok(out)
}

fn quote_literal(out: &mut String, text: &str) {
    let needs_quotes = text.chars().any(|chr| chr.is_ascii_alphabetic() || chr == '\'');
    if !needs_quotes {
        out.push_str(text);
        return;
    }
    out.push('\'');
    for chr in text.chars() {
        if chr == '\'' {
            out.push('\'');
        }
        out.push(chr);
    }
    out.push('\'');
}
