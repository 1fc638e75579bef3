use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::error::{CoreError, CoreResult};
use crate::fragment::Fragment;

/// Absolute path of a point read, `main/<locale>/…` or `supplemental/…`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct DataPath(Vec<String>);

impl DataPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// In-memory locale-data repository. Callers load fragments incrementally
/// with `merge` before any resolution runs; reads never block.
#[derive(Default)]
pub struct LocaleData {
    root: Fragment,
}

impl LocaleData {
    pub fn new() -> Self {
        Self {
            root: Fragment::empty_map(),
        }
    }

    pub fn merge(&mut self, tree: Fragment) {
        self.root.merge(tree);
    }

    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&Fragment> {
        self.root.get_path(path)
    }

    pub fn accessor(&self, locale: &str) -> LocaleAccessor<'_> {
        LocaleAccessor {
            data: self,
            locale: locale.to_string(),
            collector: RefCell::new(None),
        }
    }
}

/// One successful point read observed while a collector was attached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectedRead {
    pub path: DataPath,
    pub fragment: Fragment,
}

/// Locale-scoped view over a `LocaleData`. Paths passed to `read` are
/// relative to `main/<locale>`. At most one collector may be attached at
/// a time; concurrent resolutions need independent accessors.
pub struct LocaleAccessor<'a> {
    data: &'a LocaleData,
    locale: String,
    collector: RefCell<Option<Vec<CollectedRead>>>,
}

impl LocaleAccessor<'_> {
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn read<S: AsRef<str>>(&self, path: &[S]) -> CoreResult<Fragment> {
        let full = self.locale_path(path);
        self.read_at(full.clone())
            .ok_or(CoreError::MissingData(full))
    }

    /// Like `read`, but absence is an answer rather than an error. Used
    /// for the fragments the dispatch table treats as tolerant.
    pub fn read_optional<S: AsRef<str>>(&self, path: &[S]) -> Option<Fragment> {
        self.read_at(self.locale_path(path))
    }

    pub fn supplemental<S: AsRef<str>>(&self, path: &[S]) -> Option<Fragment> {
        let mut segments = Vec::with_capacity(path.len() + 1);
        segments.push("supplemental".to_string());
        segments.extend(path.iter().map(|s| s.as_ref().to_string()));
        self.read_at(DataPath::new(segments))
    }

    /// Scoped read interception: attaches a collector, runs `f`, detaches
    /// on every exit path, and returns the reads that succeeded inside
    /// the window in the order they happened.
    pub fn with_collector<T, F>(&self, f: F) -> CoreResult<(T, Vec<CollectedRead>)>
    where
        F: FnOnce(&Self) -> CoreResult<T>,
    {
        {
            let mut slot = self.collector.borrow_mut();
            if slot.is_some() {
                return Err(CoreError::InvalidInput("collector already attached"));
            }
            *slot = Some(Vec::new());
        }
        let guard = CollectorGuard { accessor: self };
        let value = f(self)?;
        let reads = self.collector.borrow_mut().take().unwrap_or_default();
        drop(guard);
        Ok((value, reads))
    }

    fn read_at(&self, path: DataPath) -> Option<Fragment> {
        let fragment = self.data.get(path.segments())?.clone();
        if let Some(reads) = self.collector.borrow_mut().as_mut() {
            reads.push(CollectedRead {
                path,
                fragment: fragment.clone(),
            });
        }
        Some(fragment)
    }

    fn locale_path<S: AsRef<str>>(&self, path: &[S]) -> DataPath {
        let mut segments = Vec::with_capacity(path.len() + 2);
        segments.push("main".to_string());
        segments.push(self.locale.clone());
        segments.extend(path.iter().map(|s| s.as_ref().to_string()));
        DataPath::new(segments)
    }
}

struct CollectorGuard<'a, 'd> {
    accessor: &'a LocaleAccessor<'d>,
}

impl Drop for CollectorGuard<'_, '_> {
    fn drop(&mut self) {
        self.accessor.collector.borrow_mut().take();
    }
}
