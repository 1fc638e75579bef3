use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::field::{NameContext, NameWidth};
use crate::fragment::Fragment;
use crate::store::LocaleAccessor;

/// Augments a base month-names fragment with the calendar's leap-month
/// variants. Lunisolar calendars publish a `monthPatterns` leap template
/// (for example `{0}bis`); each base month gains a `<key>-leap` entry
/// with the template applied. Calendars without the data, gregorian
/// included, keep their names unchanged.
pub fn augment_month_names(
    base: &Fragment,
    context: NameContext,
    width: NameWidth,
    calendar: &str,
    accessor: &LocaleAccessor<'_>,
) -> Fragment {
    let Some(template) = leap_template(context, width, calendar, accessor) else {
        return base.clone();
    };
    let Some(entries) = base.as_map() else {
        return base.clone();
    };
    let mut augmented = entries.clone();
    for (key, fragment) in entries {
        if let Some(name) = fragment.as_text() {
            augmented.insert(
                format!("{key}-leap"),
                Fragment::text(template.replace("{0}", name)),
            );
        }
    }
    Fragment::Map(augmented)
}

/// UTS 35 fallback for monthPatterns: the requested context/width, then
/// wide, then the format context, then the numeric table.
fn leap_template(
    context: NameContext,
    width: NameWidth,
    calendar: &str,
    accessor: &LocaleAccessor<'_>,
) -> Option<String> {
    let mut candidates: Vec<(&str, &str)> = Vec::new();
    for (ctx, wd) in [
        (context.segment(), width.segment()),
        (context.segment(), NameWidth::Wide.segment()),
        (NameContext::Format.segment(), width.segment()),
        (NameContext::Format.segment(), NameWidth::Wide.segment()),
        ("numeric", "all"),
    ] {
        if !candidates.contains(&(ctx, wd)) {
            candidates.push((ctx, wd));
        }
    }
    for (ctx, wd) in candidates {
        let found = accessor
            .read_optional(&["dates", "calendars", calendar, "monthPatterns", ctx, wd, "leap"]);
        if let Some(fragment) = found {
            return fragment.as_text().map(String::from);
        }
    }
    None
}
