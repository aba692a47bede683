//! Precomputed field lookup tables for record targets.

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{OnceLock, RwLock},
};

use ahash::RandomState;

/// A path from a record to one of its slots: the leading segments name inline
/// sub-records, the final segment names the field itself.
pub type FieldPath = [&'static str];

/// A precomputed mapping from BSON element names to field paths within a
/// record target.
///
/// Building the index walks the record's declared fields once, merging in the
/// indexes of inline sub-records with their position prefixed; afterwards
/// every element lookup during a decode is a single hash probe. Indexes are
/// memoized per type via [`FieldIndex::of`].
pub struct FieldIndex {
    fields: HashMap<Box<str>, Box<FieldPath>, RandomState>,
    catch_all: Option<Box<FieldPath>>,
}

impl FieldIndex {
    /// Starts building an index.
    pub fn builder() -> FieldIndexBuilder {
        FieldIndexBuilder {
            index: FieldIndex {
                fields: HashMap::default(),
                catch_all: None,
            },
        }
    }

    /// The path for the field decoding element `name`, if the record declares
    /// one.
    pub fn lookup(&self, name: &str) -> Option<&FieldPath> {
        self.fields.get(name).map(|p| &**p)
    }

    /// The path of the catch-all map field absorbing unmatched names, if the
    /// record declares one.
    pub fn catch_all(&self) -> Option<&FieldPath> {
        self.catch_all.as_deref()
    }

    /// Returns the memoized index for `T`, building it with `build` on first
    /// use.
    ///
    /// The table is process-wide and guarded by a readers-writer lock:
    /// lookups run concurrently, insertion is exclusive. Indexes are leaked
    /// into static storage, which is bounded by the number of record types in
    /// the program. If two threads race to build the same index, the first
    /// insertion wins and the loser's copy is discarded (leaked but
    /// unreferenced).
    pub fn of<T: 'static>(build: impl FnOnce() -> FieldIndex) -> &'static FieldIndex {
        static INDEXES: OnceLock<RwLock<HashMap<TypeId, &'static FieldIndex, RandomState>>> =
            OnceLock::new();

        let lock = INDEXES.get_or_init(Default::default);
        if let Some(index) = lock
            .read()
            .expect("field index lock")
            .get(&TypeId::of::<T>())
            .copied()
        {
            return index;
        }

        let built: &'static FieldIndex = Box::leak(Box::new(build()));
        let mut indexes = lock.write().expect("field index lock");
        *indexes.entry(TypeId::of::<T>()).or_insert(built)
    }
}

/// Builder for [`FieldIndex`].
pub struct FieldIndexBuilder {
    index: FieldIndex,
}

impl FieldIndexBuilder {
    /// Declares a directly addressed field: element `name` decodes into the
    /// field reachable by `path` (a single segment for plain fields).
    ///
    /// The first declaration of a name wins; later duplicates (typically from
    /// inline merges) are ignored.
    pub fn field(mut self, name: &str, path: &'static str) -> Self {
        self.index
            .fields
            .entry(name.into())
            .or_insert_with(|| Box::new([path]));
        self
    }

    /// Merges the index of an inline sub-record reachable through the field
    /// segment `prefix`: every name the sub-record resolves becomes
    /// resolvable here with `prefix` prepended to its path.
    pub fn inline(mut self, prefix: &'static str, sub: &FieldIndex) -> Self {
        for (name, path) in &sub.fields {
            self.index
                .fields
                .entry(name.clone())
                .or_insert_with(|| prefixed(prefix, path));
        }
        if self.index.catch_all.is_none() {
            if let Some(path) = &sub.catch_all {
                self.index.catch_all = Some(prefixed(prefix, path));
            }
        }
        self
    }

    /// Declares the catch-all map field absorbing element names no other
    /// field claims.
    pub fn catch_all(mut self, path: &'static str) -> Self {
        if self.index.catch_all.is_none() {
            self.index.catch_all = Some(Box::new([path]));
        }
        self
    }

    /// Finishes the index.
    pub fn build(self) -> FieldIndex {
        self.index
    }
}

fn prefixed(prefix: &'static str, path: &FieldPath) -> Box<FieldPath> {
    let mut full = Vec::with_capacity(path.len() + 1);
    full.push(prefix);
    full.extend_from_slice(path);
    full.into_boxed_slice()
}

#[cfg(test)]
mod test {
    use super::FieldIndex;

    #[test]
    fn lookup_and_catch_all() {
        let sub = FieldIndex::builder().field("inner", "inner").build();
        let index = FieldIndex::builder()
            .field("host", "host")
            .inline("nested", &sub)
            .catch_all("extra")
            .build();

        assert_eq!(index.lookup("host"), Some(&["host"][..]));
        assert_eq!(index.lookup("inner"), Some(&["nested", "inner"][..]));
        assert_eq!(index.lookup("missing"), None);
        assert_eq!(index.catch_all(), Some(&["extra"][..]));
    }

    #[test]
    fn outer_fields_shadow_inline() {
        let sub = FieldIndex::builder().field("host", "host").build();
        let index = FieldIndex::builder()
            .field("host", "host")
            .inline("nested", &sub)
            .build();

        assert_eq!(index.lookup("host"), Some(&["host"][..]));
    }

    #[test]
    fn memoized_per_type() {
        struct Marker;
        let a = FieldIndex::of::<Marker>(|| FieldIndex::builder().field("x", "x").build());
        let b = FieldIndex::of::<Marker>(|| panic!("index must be cached"));
        assert!(std::ptr::eq(a, b));
    }
}
