//! A BSON document represented as an associative map with insertion ordering.

use std::{
    fmt::{self, Debug, Display, Formatter},
    iter::{Extend, FromIterator},
};

use indexmap::IndexMap;

use crate::{
    bson::{Array, Bson},
    datetime::DateTime,
    oid::ObjectId,
    raw::RawElement,
};

/// A BSON document represented as an associative map with insertion ordering.
///
/// This is also the *default document shape*: decoding a document into a
/// polymorphic [`Bson`] target materializes one of these, so key order on the
/// wire is always observable.
#[derive(Clone, PartialEq, Default)]
pub struct Document {
    inner: IndexMap<String, Bson>,
}

impl Display for Document {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.write_str("{")?;

        let mut first = true;
        for (k, v) in self {
            if first {
                first = false;
                fmt.write_str(" ")?;
            } else {
                fmt.write_str(", ")?;
            }

            write!(fmt, "\"{}\": {}", k, v)?;
        }

        write!(fmt, "{}}}", if !first { " " } else { "" })
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Document({:?})", self.inner)
    }
}

impl Document {
    /// Creates a new empty Document.
    pub fn new() -> Document {
        Document {
            inner: IndexMap::new(),
        }
    }

    /// Gets an iterator over the entries of the map.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Bson)> {
        self.inner.iter()
    }

    /// Clears the document, removing all values.
    pub fn clear(&mut self) {
        self.inner.clear()
    }

    /// Returns a reference to the Bson corresponding to the key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&Bson> {
        self.inner.get(key.as_ref())
    }

    /// Gets a mutable reference to the Bson corresponding to the key.
    pub fn get_mut(&mut self, key: impl AsRef<str>) -> Option<&mut Bson> {
        self.inner.get_mut(key.as_ref())
    }

    /// Get a floating point value for this key if it exists and has the
    /// correct type.
    pub fn get_f64(&self, key: impl AsRef<str>) -> Option<f64> {
        self.get(key).and_then(Bson::as_f64)
    }

    /// Get a string slice for this key if it exists and has the correct type.
    pub fn get_str(&self, key: impl AsRef<str>) -> Option<&str> {
        self.get(key).and_then(Bson::as_str)
    }

    /// Get a reference to an array for this key if it exists and has the
    /// correct type.
    pub fn get_array(&self, key: impl AsRef<str>) -> Option<&Array> {
        self.get(key).and_then(Bson::as_array)
    }

    /// Get a reference to a document for this key if it exists and has the
    /// correct type.
    pub fn get_document(&self, key: impl AsRef<str>) -> Option<&Document> {
        self.get(key).and_then(Bson::as_document)
    }

    /// Get a bool value for this key if it exists and has the correct type.
    pub fn get_bool(&self, key: impl AsRef<str>) -> Option<bool> {
        self.get(key).and_then(Bson::as_bool)
    }

    /// Get an i32 value for this key if it exists and has the correct type.
    pub fn get_i32(&self, key: impl AsRef<str>) -> Option<i32> {
        self.get(key).and_then(Bson::as_i32)
    }

    /// Get an i64 value for this key if it exists and has the correct type.
    pub fn get_i64(&self, key: impl AsRef<str>) -> Option<i64> {
        self.get(key).and_then(Bson::as_i64)
    }

    /// Get an ObjectId value for this key if it exists and has the correct
    /// type.
    pub fn get_object_id(&self, key: impl AsRef<str>) -> Option<ObjectId> {
        self.get(key).and_then(Bson::as_object_id)
    }

    /// Get a DateTime value for this key if it exists and has the correct
    /// type.
    pub fn get_datetime(&self, key: impl AsRef<str>) -> Option<DateTime> {
        self.get(key).and_then(Bson::as_datetime)
    }

    /// Returns true if the map contains a value for the specified key.
    pub fn contains_key(&self, key: impl AsRef<str>) -> bool {
        self.inner.contains_key(key.as_ref())
    }

    /// Gets a collection of all keys in the document.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.inner.keys()
    }

    /// Gets a collection of all values in the document.
    pub fn values(&self) -> impl Iterator<Item = &Bson> {
        self.inner.values()
    }

    /// Returns the number of elements in the document.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the document contains no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Sets the value of the entry with the `key` key. If the key already has
    /// a value, it is overwritten in place (the entry keeps its position) and
    /// the old value is returned.
    pub fn insert(&mut self, key: impl Into<String>, val: impl Into<Bson>) -> Option<Bson> {
        self.inner.insert(key.into(), val.into())
    }

    /// Takes the value of the entry out of the document, and returns it.
    /// Preserves the order of the remaining entries.
    pub fn remove(&mut self, key: impl AsRef<str>) -> Option<Bson> {
        self.inner.shift_remove(key.as_ref())
    }
}

impl IntoIterator for Document {
    type Item = (String, Bson);
    type IntoIter = indexmap::map::IntoIter<String, Bson>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Bson);
    type IntoIter = indexmap::map::Iter<'a, String, Bson>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl FromIterator<(String, Bson)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, Bson)>>(iter: T) -> Self {
        Document {
            inner: iter.into_iter().collect(),
        }
    }
}

impl Extend<(String, Bson)> for Document {
    fn extend<T: IntoIterator<Item = (String, Bson)>>(&mut self, iter: T) {
        self.inner.extend(iter)
    }
}

/// A document decoded as a flat sequence of `(name, value)` pairs.
///
/// Unlike [`Document`], this preserves duplicate keys and supports positional
/// access, which makes it the right target when the caller needs to observe
/// the wire exactly as written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entries(pub Vec<(String, Bson)>);

impl Entries {
    /// The value under the first entry named `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Bson> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Entries {
    type Item = (String, Bson);
    type IntoIter = std::vec::IntoIter<(String, Bson)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A document decoded as a flat sequence of `(name, raw element)` pairs.
///
/// The element payloads borrow from the input buffer, so values of this type
/// cannot outlive the bytes handed to the decoder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawEntries<'de>(pub Vec<(String, RawElement<'de>)>);

impl<'de> RawEntries<'de> {
    /// The raw element under the first entry named `key`, if any.
    pub fn get(&self, key: &str) -> Option<&RawElement<'de>> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
