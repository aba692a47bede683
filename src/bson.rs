//! BSON definition

use std::fmt::{self, Debug, Display};

use crate::{
    binary::Binary,
    datetime::DateTime,
    decimal128::Decimal128,
    document::Document,
    oid::ObjectId,
    spec::ElementType,
};

/// Possible BSON value types.
#[derive(Clone, Default, PartialEq)]
pub enum Bson {
    /// 64-bit binary floating point
    Double(f64),
    /// String
    String(String),
    /// Array
    Array(Array),
    /// Embedded document
    Document(Document),
    /// Boolean value
    Boolean(bool),
    /// Null value
    #[default]
    Null,
    /// Regular expression
    RegularExpression(Regex),
    /// JavaScript code
    JavaScriptCode(String),
    /// JavaScript code with scope
    JavaScriptCodeWithScope(JavaScriptCodeWithScope),
    /// 32-bit signed integer
    Int32(i32),
    /// 64-bit signed integer
    Int64(i64),
    /// Timestamp
    Timestamp(Timestamp),
    /// Binary data
    Binary(Binary),
    /// [ObjectId](http://dochub.mongodb.org/core/objectids)
    ObjectId(ObjectId),
    /// UTC datetime
    DateTime(DateTime),
    /// Symbol (deprecated)
    Symbol(String),
    /// [128-bit decimal floating point](https://github.com/mongodb/specifications/blob/master/source/bson-decimal128/decimal128.md)
    Decimal128(Decimal128),
    /// Undefined value (deprecated)
    Undefined,
    /// Max key
    MaxKey,
    /// Min key
    MinKey,
    /// DBPointer (deprecated)
    DbPointer(DbPointer),
}

/// Alias for `Vec<Bson>`.
pub type Array = Vec<Bson>;

impl Bson {
    /// Get the [`ElementType`] of this value.
    pub fn element_type(&self) -> ElementType {
        match *self {
            Bson::Double(..) => ElementType::Double,
            Bson::String(..) => ElementType::String,
            Bson::Array(..) => ElementType::Array,
            Bson::Document(..) => ElementType::EmbeddedDocument,
            Bson::Boolean(..) => ElementType::Boolean,
            Bson::Null => ElementType::Null,
            Bson::RegularExpression(..) => ElementType::RegularExpression,
            Bson::JavaScriptCode(..) => ElementType::JavaScriptCode,
            Bson::JavaScriptCodeWithScope(..) => ElementType::JavaScriptCodeWithScope,
            Bson::Int32(..) => ElementType::Int32,
            Bson::Int64(..) => ElementType::Int64,
            Bson::Timestamp(..) => ElementType::Timestamp,
            Bson::Binary(..) => ElementType::Binary,
            Bson::ObjectId(..) => ElementType::ObjectId,
            Bson::DateTime(..) => ElementType::DateTime,
            Bson::Symbol(..) => ElementType::Symbol,
            Bson::Decimal128(..) => ElementType::Decimal128,
            Bson::Undefined => ElementType::Undefined,
            Bson::MaxKey => ElementType::MaxKey,
            Bson::MinKey => ElementType::MinKey,
            Bson::DbPointer(..) => ElementType::DbPointer,
        }
    }

    /// If the value is a double, returns it. Returns [`None`] otherwise.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Bson::Double(v) => Some(v),
            _ => None,
        }
    }

    /// If the value is a string, returns it. Returns [`None`] otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Bson::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is an array, returns a reference to it. Returns [`None`] otherwise.
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Bson::Array(v) => Some(v),
            _ => None,
        }
    }

    /// If the value is a document, returns a reference to it. Returns [`None`] otherwise.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Bson::Document(v) => Some(v),
            _ => None,
        }
    }

    /// If the value is a boolean, returns it. Returns [`None`] otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Bson::Boolean(v) => Some(v),
            _ => None,
        }
    }

    /// If the value is an i32, returns it. Returns [`None`] otherwise.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Bson::Int32(v) => Some(v),
            _ => None,
        }
    }

    /// If the value is an i64, returns it. Returns [`None`] otherwise.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Bson::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// If the value is an ObjectId, returns it. Returns [`None`] otherwise.
    pub fn as_object_id(&self) -> Option<ObjectId> {
        match *self {
            Bson::ObjectId(v) => Some(v),
            _ => None,
        }
    }

    /// If the value is a DateTime, returns it. Returns [`None`] otherwise.
    pub fn as_datetime(&self) -> Option<DateTime> {
        match *self {
            Bson::DateTime(v) => Some(v),
            _ => None,
        }
    }

    /// If the value is `Null`, returns `()`. Returns [`None`] otherwise.
    pub fn as_null(&self) -> Option<()> {
        match *self {
            Bson::Null => Some(()),
            _ => None,
        }
    }
}

impl Display for Bson {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bson::Double(f) => write!(fmt, "{}", f),
            Bson::String(s) => write!(fmt, "\"{}\"", s),
            Bson::Array(vec) => {
                fmt.write_str("[")?;

                let mut first = true;
                for bson in vec {
                    if !first {
                        fmt.write_str(", ")?;
                    }
                    write!(fmt, "{}", bson)?;
                    first = false;
                }

                fmt.write_str("]")
            }
            Bson::Document(doc) => write!(fmt, "{}", doc),
            Bson::Boolean(b) => write!(fmt, "{}", b),
            Bson::Null => write!(fmt, "null"),
            Bson::RegularExpression(re) => write!(fmt, "{}", re),
            Bson::JavaScriptCode(code) => write!(fmt, "{}", code),
            Bson::JavaScriptCodeWithScope(code_w_scope) => write!(fmt, "{}", code_w_scope),
            Bson::Int32(i) => write!(fmt, "{}", i),
            Bson::Int64(i) => write!(fmt, "{}", i),
            Bson::Timestamp(ts) => write!(fmt, "{}", ts),
            Bson::Binary(bin) => write!(fmt, "{}", bin),
            Bson::ObjectId(id) => write!(fmt, "ObjectId(\"{}\")", id),
            Bson::DateTime(dt) => write!(fmt, "DateTime(\"{}\")", dt),
            Bson::Symbol(s) => write!(fmt, "Symbol(\"{}\")", s),
            Bson::Decimal128(d) => write!(fmt, "Decimal128({})", d),
            Bson::Undefined => write!(fmt, "undefined"),
            Bson::MaxKey => write!(fmt, "MaxKey"),
            Bson::MinKey => write!(fmt, "MinKey"),
            Bson::DbPointer(p) => write!(fmt, "{:?}", p),
        }
    }
}

impl Debug for Bson {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bson::Double(f) => write!(fmt, "Double({:?})", f),
            Bson::String(s) => write!(fmt, "String({:?})", s),
            Bson::Array(vec) => {
                fmt.write_str("Array(")?;
                Debug::fmt(vec, fmt)?;
                fmt.write_str(")")
            }
            Bson::Document(doc) => Debug::fmt(doc, fmt),
            Bson::Boolean(b) => write!(fmt, "Boolean({:?})", b),
            Bson::Null => write!(fmt, "Null"),
            Bson::RegularExpression(re) => Debug::fmt(re, fmt),
            Bson::JavaScriptCode(code) => write!(fmt, "JavaScriptCode({:?})", code),
            Bson::JavaScriptCodeWithScope(code_w_scope) => Debug::fmt(code_w_scope, fmt),
            Bson::Int32(i) => write!(fmt, "Int32({:?})", i),
            Bson::Int64(i) => write!(fmt, "Int64({:?})", i),
            Bson::Timestamp(t) => Debug::fmt(t, fmt),
            Bson::Binary(b) => Debug::fmt(b, fmt),
            Bson::ObjectId(id) => Debug::fmt(id, fmt),
            Bson::DateTime(dt) => Debug::fmt(dt, fmt),
            Bson::Symbol(s) => write!(fmt, "Symbol({:?})", s),
            Bson::Decimal128(d) => Debug::fmt(d, fmt),
            Bson::Undefined => write!(fmt, "Undefined"),
            Bson::MaxKey => write!(fmt, "MaxKey"),
            Bson::MinKey => write!(fmt, "MinKey"),
            Bson::DbPointer(p) => Debug::fmt(p, fmt),
        }
    }
}

impl From<f32> for Bson {
    fn from(a: f32) -> Bson {
        Bson::Double(a.into())
    }
}

impl From<f64> for Bson {
    fn from(a: f64) -> Bson {
        Bson::Double(a)
    }
}

impl From<&str> for Bson {
    fn from(s: &str) -> Bson {
        Bson::String(s.to_owned())
    }
}

impl From<String> for Bson {
    fn from(a: String) -> Bson {
        Bson::String(a)
    }
}

impl From<bool> for Bson {
    fn from(a: bool) -> Bson {
        Bson::Boolean(a)
    }
}

impl From<i32> for Bson {
    fn from(a: i32) -> Bson {
        Bson::Int32(a)
    }
}

impl From<i64> for Bson {
    fn from(a: i64) -> Bson {
        Bson::Int64(a)
    }
}

impl From<u8> for Bson {
    fn from(a: u8) -> Bson {
        Bson::Int32(a.into())
    }
}

impl From<u16> for Bson {
    fn from(a: u16) -> Bson {
        Bson::Int32(a.into())
    }
}

impl From<u32> for Bson {
    fn from(a: u32) -> Bson {
        Bson::Int64(a.into())
    }
}

impl From<Regex> for Bson {
    fn from(regex: Regex) -> Bson {
        Bson::RegularExpression(regex)
    }
}

impl From<JavaScriptCodeWithScope> for Bson {
    fn from(code_with_scope: JavaScriptCodeWithScope) -> Bson {
        Bson::JavaScriptCodeWithScope(code_with_scope)
    }
}

impl From<Binary> for Bson {
    fn from(binary: Binary) -> Bson {
        Bson::Binary(binary)
    }
}

impl From<Timestamp> for Bson {
    fn from(ts: Timestamp) -> Bson {
        Bson::Timestamp(ts)
    }
}

impl From<ObjectId> for Bson {
    fn from(id: ObjectId) -> Bson {
        Bson::ObjectId(id)
    }
}

impl From<DateTime> for Bson {
    fn from(dt: DateTime) -> Bson {
        Bson::DateTime(dt)
    }
}

impl From<Decimal128> for Bson {
    fn from(d: Decimal128) -> Bson {
        Bson::Decimal128(d)
    }
}

impl From<DbPointer> for Bson {
    fn from(p: DbPointer) -> Bson {
        Bson::DbPointer(p)
    }
}

impl From<Document> for Bson {
    fn from(doc: Document) -> Bson {
        Bson::Document(doc)
    }
}

impl<T: Into<Bson>> From<Vec<T>> for Bson {
    fn from(v: Vec<T>) -> Bson {
        Bson::Array(v.into_iter().map(|val| val.into()).collect())
    }
}

impl<T: Into<Bson>> From<Option<T>> for Bson {
    fn from(a: Option<T>) -> Bson {
        match a {
            None => Bson::Null,
            Some(t) => t.into(),
        }
    }
}

/// Represents a BSON timestamp value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    /// The number of seconds since the Unix epoch.
    pub time: u32,

    /// An incrementing value to order timestamps with the same number of
    /// seconds in the `time` field.
    pub increment: u32,
}

impl Timestamp {
    /// The wire representation: `time` in the upper 32 bits, `increment` in
    /// the lower 32 bits.
    pub(crate) fn to_u64(self) -> u64 {
        ((self.time as u64) << 32) | (self.increment as u64)
    }

    pub(crate) fn from_u64(val: u64) -> Self {
        Timestamp {
            time: (val >> 32) as u32,
            increment: (val & 0xFFFF_FFFF) as u32,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Timestamp({}, {})", self.time, self.increment)
    }
}

/// Represents a BSON regular expression value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Regex {
    /// The regex pattern to match.
    pub pattern: String,

    /// The options for the regex.
    ///
    /// Options are identified by characters, which must be stored in
    /// alphabetical order. Valid options are 'i' for case insensitive
    /// matching, 'm' for multiline matching, 'x' for verbose mode, 'l' to
    /// make \w, \W, etc. locale dependent, 's' for dotall mode ('.' matches
    /// everything), and 'u' to make \w, \W, etc. match unicode.
    pub options: String,
}

impl fmt::Display for Regex {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "/{}/{}", self.pattern, self.options)
    }
}

/// Represents a BSON code with scope value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JavaScriptCodeWithScope {
    /// The JavaScript code.
    pub code: String,

    /// The scope document containing variable bindings.
    pub scope: Document,
}

impl fmt::Display for JavaScriptCodeWithScope {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(&self.code)
    }
}

/// Represents a DBPointer (deprecated).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DbPointer {
    /// The namespace being pointed into.
    pub namespace: String,

    /// The id of the pointed-to document.
    pub id: ObjectId,
}
