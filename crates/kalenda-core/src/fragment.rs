use alloc::collections::BTreeMap;
use alloc::string::String;

/// One subtree of the locale-data repository. CLDR leaves are strings;
/// everything else is a keyed map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    Map(BTreeMap<String, Fragment>),
}

impl Default for Fragment {
    fn default() -> Self {
        Fragment::empty_map()
    }
}

impl Fragment {
    pub fn text(value: impl Into<String>) -> Self {
        Fragment::Text(value.into())
    }

    pub fn empty_map() -> Self {
        Fragment::Map(BTreeMap::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Fragment::Text(value) => Some(value.as_str()),
            Fragment::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Fragment>> {
        match self {
            Fragment::Text(_) => None,
            Fragment::Map(entries) => Some(entries),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Fragment> {
        self.as_map()?.get(key)
    }

    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Fragment> {
        let mut current = self;
        for segment in path {
            current = current.get(segment.as_ref())?;
        }
        Some(current)
    }

    /// Inserts into a map fragment; a no-op on text leaves.
    pub fn insert(&mut self, key: impl Into<String>, value: Fragment) {
        if let Fragment::Map(entries) = self {
            entries.insert(key.into(), value);
        }
    }

    /// Deep merge: maps merge per key, any other pairing replaces self.
    pub fn merge(&mut self, other: Fragment) {
        match (self, other) {
            (Fragment::Map(existing), Fragment::Map(incoming)) => {
                for (key, value) in incoming {
                    match existing.get_mut(&key) {
                        Some(slot) => slot.merge(value),
                        None => {
                            existing.insert(key, value);
                        }
                    }
                }
            }
            (slot, other) => *slot = other,
        }
    }
}
