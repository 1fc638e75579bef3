use kalenda_core::{Fragment, LocaleData};
use serde_json::Value;

use crate::error::{RuntimeError, RuntimeResult};

/// Parses a CLDR JSON bundle and merges it into the store. Bundles are
/// cumulative; later loads deep-merge over earlier ones.
pub fn load_json(data: &mut LocaleData, json: &str) -> RuntimeResult<()> {
    let value: Value = serde_json::from_str(json)?;
    data.merge(fragment_from_json(&value)?);
    Ok(())
}

/// Maps JSON onto the dependency-free fragment tree. Scalars become text
/// leaves, arrays become maps keyed by index. CLDR bundles carry no
/// nulls; one is a malformed bundle.
pub fn fragment_from_json(value: &Value) -> RuntimeResult<Fragment> {
    match value {
        Value::String(text) => Ok(Fragment::text(text.as_str())),
        Value::Number(number) => Ok(Fragment::text(number.to_string())),
        Value::Bool(flag) => Ok(Fragment::text(if *flag { "true" } else { "false" })),
        Value::Object(entries) => {
            let mut map = Fragment::empty_map();
            for (key, value) in entries {
                map.insert(key.as_str(), fragment_from_json(value)?);
            }
            Ok(map)
        }
        Value::Array(items) => {
            let mut map = Fragment::empty_map();
            for (index, item) in items.iter().enumerate() {
                map.insert(index.to_string(), fragment_from_json(item)?);
            }
            Ok(map)
        }
        Value::Null => Err(RuntimeError::InvalidData(String::from(
            "null has no locale-data form",
        ))),
    }
}
