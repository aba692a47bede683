//! Target slots: the shapes a BSON element can decode into.
//!
//! Instead of runtime type inspection, every decodable type describes itself
//! once through [`DecodeTarget::slot`], yielding a [`Slot`]: a sum over the
//! target shapes the decoder knows how to fill. The element decoder branches
//! on the slot kind; containers hand control back through the small
//! [`MapTarget`]/[`SeqTarget`]/[`RecordTarget`]/[`NullableTarget`] traits so
//! that element values are staged inside the container impl and committed
//! only when the nested decode succeeded.

use std::{
    collections::HashMap,
    hash::{BuildHasher, Hash},
    time::Duration,
};

use indexmap::IndexMap;

use crate::{
    binary::{Binary, ByteBuf},
    bson::{Bson, DbPointer, JavaScriptCodeWithScope, Regex, Timestamp},
    datetime::DateTime,
    decimal128::Decimal128,
    document::{Document, Entries, RawEntries},
    error::{Error, ErrorKind, Result},
    oid::ObjectId,
    raw::RawElement,
};

use super::{
    decode_element,
    fields::{FieldIndex, FieldPath},
    DecodeContext,
};

/// A writable target location for a single BSON element.
///
/// The lifetime `'t` borrows the target value; `'de` is the lifetime of the
/// input buffer, which only raw slots capture.
pub enum Slot<'t, 'de> {
    /// 64-bit float target.
    Double(&'t mut f64),
    /// 32-bit float target.
    Float(&'t mut f32),
    /// Signed integer targets.
    Int8(&'t mut i8),
    Int16(&'t mut i16),
    Int32(&'t mut i32),
    Int64(&'t mut i64),
    /// Unsigned integer targets.
    UInt8(&'t mut u8),
    UInt16(&'t mut u16),
    UInt32(&'t mut u32),
    UInt64(&'t mut u64),
    /// Boolean target.
    Boolean(&'t mut bool),
    /// Owned string target.
    String(&'t mut String),
    /// Decimally formatted number target; see [`JsonNumber`].
    JsonNumber(&'t mut JsonNumber),
    /// Naked byte buffer target; see [`ByteBuf`].
    Bytes(&'t mut ByteBuf),
    /// Structured binary target (subtype preserved).
    Binary(&'t mut Binary),
    /// ObjectId target.
    ObjectId(&'t mut ObjectId),
    /// Datetime target.
    DateTime(&'t mut DateTime),
    /// Duration target; Int64 elements are interpreted as milliseconds.
    Duration(&'t mut Duration),
    /// Timestamp target.
    Timestamp(&'t mut Timestamp),
    /// Regular expression target.
    Regex(&'t mut Regex),
    /// Decimal128 target.
    Decimal128(&'t mut Decimal128),
    /// JavaScript code-with-scope target.
    JavaScriptCodeWithScope(&'t mut JavaScriptCodeWithScope),
    /// DBPointer target.
    DbPointer(&'t mut DbPointer),
    /// URL target; string elements are parsed, and a parse failure is fatal.
    Url(&'t mut url::Url),
    /// Polymorphic target: accepts any element as a [`Bson`] value.
    Any(&'t mut Bson),
    /// Mapping target (cleared before population).
    Map(&'t mut dyn MapTarget<'de>),
    /// Sequence target, growable or fixed-length.
    Seq(&'t mut dyn SeqTarget<'de>),
    /// Record target with named fields.
    Record(&'t mut dyn RecordTarget<'de>),
    /// Ordered `(name, value)` pair sequence target.
    Pairs(&'t mut Vec<(String, Bson)>),
    /// Ordered `(name, raw element)` pair sequence target.
    RawPairs(&'t mut Vec<(String, RawElement<'de>)>),
    /// Raw pass-through target: stores the element's kind and payload bytes
    /// without interpretation.
    Raw(&'t mut RawElement<'de>),
    /// Nullable target (the pointer-chain analog): `Null` clears it, any
    /// other element decodes into a fresh inner value committed on success.
    Nullable(&'t mut dyn NullableTarget<'de>),
    /// Hook target: the element's raw bytes are handed to user code.
    Hook(&'t mut dyn SetBson),
}

impl Slot<'_, '_> {
    /// The target's name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Slot::Double(_) => "f64",
            Slot::Float(_) => "f32",
            Slot::Int8(_) => "i8",
            Slot::Int16(_) => "i16",
            Slot::Int32(_) => "i32",
            Slot::Int64(_) => "i64",
            Slot::UInt8(_) => "u8",
            Slot::UInt16(_) => "u16",
            Slot::UInt32(_) => "u32",
            Slot::UInt64(_) => "u64",
            Slot::Boolean(_) => "bool",
            Slot::String(_) => "String",
            Slot::JsonNumber(_) => "JsonNumber",
            Slot::Bytes(_) => "ByteBuf",
            Slot::Binary(_) => "Binary",
            Slot::ObjectId(_) => "ObjectId",
            Slot::DateTime(_) => "DateTime",
            Slot::Duration(_) => "Duration",
            Slot::Timestamp(_) => "Timestamp",
            Slot::Regex(_) => "Regex",
            Slot::Decimal128(_) => "Decimal128",
            Slot::JavaScriptCodeWithScope(_) => "JavaScriptCodeWithScope",
            Slot::DbPointer(_) => "DbPointer",
            Slot::Url(_) => "Url",
            Slot::Any(_) => "Bson",
            Slot::Map(_) => "map",
            Slot::Seq(_) => "sequence",
            Slot::Record(_) => "record",
            Slot::Pairs(_) => "Entries",
            Slot::RawPairs(_) => "RawEntries",
            Slot::Raw(_) => "RawElement",
            Slot::Nullable(_) => "Option",
            Slot::Hook(_) => "hook",
        }
    }
}

/// A type that can serve as a decode target.
///
/// Implementations are provided for the primitive types, the crate's value
/// types, `Vec<T>`, `[T; N]`, `Option<T>`, `Box<T>`, `HashMap<K, V>`,
/// [`IndexMap`], and [`Document`]. Record types get an implementation from
/// the [`impl_record!`](crate::impl_record) macro; hook types implement
/// [`SetBson`] and return [`Slot::Hook`] from their own impl.
pub trait DecodeTarget<'de> {
    /// Exposes this value as a writable slot.
    fn slot(&mut self) -> Slot<'_, 'de>;
}

/// A mapping decode target.
///
/// The document decoder clears the map once on entry, then feeds it one
/// entry per wire element. Implementations stage a fresh value, decode into
/// it, and insert it under the (possibly numerically parsed) key only when
/// the decode succeeded.
pub trait MapTarget<'de> {
    /// Removes all existing entries.
    fn clear(&mut self);

    /// Decodes `elem` into a fresh value and inserts it under `key`.
    fn insert_entry(
        &mut self,
        ctx: &DecodeContext,
        key: &str,
        elem: &RawElement<'de>,
    ) -> Result<()>;
}

/// A sequence decode target, growable (`Vec<T>`) or fixed-length (`[T; N]`).
pub trait SeqTarget<'de> {
    /// Resets the sequence to its empty state.
    fn clear(&mut self);

    /// Decodes `elem` into position `index`. Growable sequences append and
    /// ignore the index; fixed-length sequences fail with
    /// [`ErrorKind::LengthMismatch`] when the index is out of range.
    fn append(&mut self, ctx: &DecodeContext, index: usize, elem: &RawElement<'de>) -> Result<()>;

    /// Called once after the wire array has been walked with the number of
    /// elements delivered. Fixed-length sequences verify the count here.
    fn finish(&mut self, len: usize) -> Result<()> {
        let _ = len;
        Ok(())
    }
}

/// A record decode target with named fields.
///
/// Records carry a precomputed [`FieldIndex`] mapping element names to field
/// paths; the document decoder resets the record, then routes each element
/// through [`RecordTarget::field_slot`]. Unmatched names land in the
/// catch-all map if the index declares one and are skipped otherwise.
pub trait RecordTarget<'de> {
    /// The memoized name-to-field index for this record type.
    fn field_index(&self) -> &'static FieldIndex;

    /// Restores every field to its zero state.
    fn reset(&mut self);

    /// The slot for the field reachable by `path`, as produced by the index.
    fn field_slot(&mut self, path: &FieldPath) -> Option<Slot<'_, 'de>>;
}

/// A nullable decode target, the analog of a pointer chain.
pub trait NullableTarget<'de> {
    /// Clears the target (wire `Null` or `Undefined`).
    fn set_none(&mut self);

    /// Decodes `elem` into a fresh inner value, committing it only on
    /// success; on failure the visible target is unchanged.
    fn decode_some(&mut self, ctx: &DecodeContext, elem: &RawElement<'de>) -> Result<()>;
}

/// What a hook did with the element it was handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    /// The hook consumed the element and populated itself.
    Assigned,
    /// The hook wants the target overwritten with its zero state; the
    /// decoder responds by calling [`SetBson::set_zero`].
    Zero,
}

/// A target type that decodes itself from raw element bytes.
///
/// Returning an error whose kind is [`ErrorKind::UnexpectedType`] marks the
/// element as not-for-this-target, which lenient decoding recovers from by
/// dropping the element; any other error aborts the whole decode. The
/// decoder never invokes a hook concurrently on the same target.
pub trait SetBson {
    /// Consumes one element's kind and payload bytes.
    fn set_bson(&mut self, elem: &RawElement<'_>) -> Result<HookOutcome>;

    /// Restores the zero state, invoked when [`set_bson`](SetBson::set_bson)
    /// returns [`HookOutcome::Zero`].
    fn set_zero(&mut self);
}

/// A map key type: either a string or a numeric type parsed from the
/// element name's decimal representation.
///
/// This trait is deliberately sealed by construction: maps keyed by anything
/// else simply do not satisfy the [`MapTarget`] bounds, so the unsupported
/// key shapes of the wire protocol are unrepresentable rather than a runtime
/// error.
pub trait MapKey: Sized {
    /// Produces a key from a wire element name.
    fn parse_key(key: &str) -> Result<Self>;
}

impl MapKey for String {
    fn parse_key(key: &str) -> Result<Self> {
        Ok(key.to_owned())
    }
}

macro_rules! numeric_map_key {
    ($($ty:ty),*) => {$(
        impl MapKey for $ty {
            fn parse_key(key: &str) -> Result<Self> {
                key.parse().map_err(|e| {
                    Error::from(ErrorKind::InvalidKey {
                        key: key.to_owned(),
                        message: format!("{}", e),
                    })
                })
            }
        }
    )*};
}

numeric_map_key!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

/// A number decoded to its decimal string representation rather than a
/// binary numeric type, for callers that must not lose precision or range.
/// Int32, Int64 and Double elements all decode into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonNumber(pub String);

impl JsonNumber {
    /// The decimal representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! primitive_targets {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl<'de> DecodeTarget<'de> for $ty {
            fn slot(&mut self) -> Slot<'_, 'de> {
                Slot::$variant(self)
            }
        }
    )*};
}

primitive_targets! {
    f64 => Double,
    f32 => Float,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    bool => Boolean,
    String => String,
    JsonNumber => JsonNumber,
    ByteBuf => Bytes,
    Binary => Binary,
    ObjectId => ObjectId,
    DateTime => DateTime,
    Duration => Duration,
    Timestamp => Timestamp,
    Regex => Regex,
    Decimal128 => Decimal128,
    JavaScriptCodeWithScope => JavaScriptCodeWithScope,
    DbPointer => DbPointer,
    url::Url => Url,
    Bson => Any,
}

impl<'de> DecodeTarget<'de> for RawElement<'de> {
    fn slot(&mut self) -> Slot<'_, 'de> {
        Slot::Raw(self)
    }
}

impl<'de> DecodeTarget<'de> for Entries {
    fn slot(&mut self) -> Slot<'_, 'de> {
        Slot::Pairs(&mut self.0)
    }
}

impl<'de> DecodeTarget<'de> for RawEntries<'de> {
    fn slot(&mut self) -> Slot<'_, 'de> {
        Slot::RawPairs(&mut self.0)
    }
}

impl<'de> DecodeTarget<'de> for Document {
    fn slot(&mut self) -> Slot<'_, 'de> {
        Slot::Map(self)
    }
}

impl<'de> MapTarget<'de> for Document {
    fn clear(&mut self) {
        Document::clear(self);
    }

    fn insert_entry(
        &mut self,
        ctx: &DecodeContext,
        key: &str,
        elem: &RawElement<'de>,
    ) -> Result<()> {
        let mut value = Bson::Null;
        decode_element(elem, Slot::Any(&mut value), ctx)?;
        self.insert(key, value);
        Ok(())
    }
}

impl<'de, K, V, S> DecodeTarget<'de> for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: DecodeTarget<'de> + Default,
    S: BuildHasher,
{
    fn slot(&mut self) -> Slot<'_, 'de> {
        Slot::Map(self)
    }
}

impl<'de, K, V, S> MapTarget<'de> for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: DecodeTarget<'de> + Default,
    S: BuildHasher,
{
    fn clear(&mut self) {
        HashMap::clear(self);
    }

    fn insert_entry(
        &mut self,
        ctx: &DecodeContext,
        key: &str,
        elem: &RawElement<'de>,
    ) -> Result<()> {
        let parsed = K::parse_key(key)?;
        let mut value = V::default();
        decode_element(elem, value.slot(), ctx)?;
        self.insert(parsed, value);
        Ok(())
    }
}

impl<'de, K, V, S> DecodeTarget<'de> for IndexMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: DecodeTarget<'de> + Default,
    S: BuildHasher,
{
    fn slot(&mut self) -> Slot<'_, 'de> {
        Slot::Map(self)
    }
}

impl<'de, K, V, S> MapTarget<'de> for IndexMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: DecodeTarget<'de> + Default,
    S: BuildHasher,
{
    fn clear(&mut self) {
        IndexMap::clear(self);
    }

    fn insert_entry(
        &mut self,
        ctx: &DecodeContext,
        key: &str,
        elem: &RawElement<'de>,
    ) -> Result<()> {
        let parsed = K::parse_key(key)?;
        let mut value = V::default();
        decode_element(elem, value.slot(), ctx)?;
        self.insert(parsed, value);
        Ok(())
    }
}

impl<'de, T: DecodeTarget<'de> + Default> DecodeTarget<'de> for Vec<T> {
    fn slot(&mut self) -> Slot<'_, 'de> {
        Slot::Seq(self)
    }
}

impl<'de, T: DecodeTarget<'de> + Default> SeqTarget<'de> for Vec<T> {
    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn append(&mut self, ctx: &DecodeContext, _index: usize, elem: &RawElement<'de>) -> Result<()> {
        let mut value = T::default();
        decode_element(elem, value.slot(), ctx)?;
        self.push(value);
        Ok(())
    }
}

impl<'de, T: DecodeTarget<'de> + Default, const N: usize> DecodeTarget<'de> for [T; N] {
    fn slot(&mut self) -> Slot<'_, 'de> {
        Slot::Seq(self)
    }
}

impl<'de, T: DecodeTarget<'de> + Default, const N: usize> SeqTarget<'de> for [T; N] {
    fn clear(&mut self) {
        for slot in self.iter_mut() {
            *slot = T::default();
        }
    }

    fn append(&mut self, ctx: &DecodeContext, index: usize, elem: &RawElement<'de>) -> Result<()> {
        match self.get_mut(index) {
            Some(target) => decode_element(elem, target.slot(), ctx),
            None => Err(ErrorKind::LengthMismatch {
                expected: N,
                actual: index + 1,
            }
            .into()),
        }
    }

    fn finish(&mut self, len: usize) -> Result<()> {
        if len != N {
            return Err(ErrorKind::LengthMismatch {
                expected: N,
                actual: len,
            }
            .into());
        }
        Ok(())
    }
}

impl<'de, T: DecodeTarget<'de> + Default> DecodeTarget<'de> for Option<T> {
    fn slot(&mut self) -> Slot<'_, 'de> {
        Slot::Nullable(self)
    }
}

impl<'de, T: DecodeTarget<'de> + Default> NullableTarget<'de> for Option<T> {
    fn set_none(&mut self) {
        *self = None;
    }

    fn decode_some(&mut self, ctx: &DecodeContext, elem: &RawElement<'de>) -> Result<()> {
        // decode into a fresh value first; the visible Option changes only
        // once the inner decode succeeded
        let mut value = T::default();
        decode_element(elem, value.slot(), ctx)?;
        *self = Some(value);
        Ok(())
    }
}

impl<'de, T: DecodeTarget<'de>> DecodeTarget<'de> for Box<T> {
    fn slot(&mut self) -> Slot<'_, 'de> {
        (**self).slot()
    }
}
