//! Constants derived from the [BSON specification](http://bsonspec.org/spec.html).

const ELEMENT_TYPE_DOUBLE: u8 = 0x01;
const ELEMENT_TYPE_STRING: u8 = 0x02;
const ELEMENT_TYPE_EMBEDDED_DOCUMENT: u8 = 0x03;
const ELEMENT_TYPE_ARRAY: u8 = 0x04;
const ELEMENT_TYPE_BINARY: u8 = 0x05;
const ELEMENT_TYPE_UNDEFINED: u8 = 0x06; // Deprecated
const ELEMENT_TYPE_OBJECT_ID: u8 = 0x07;
const ELEMENT_TYPE_BOOLEAN: u8 = 0x08;
const ELEMENT_TYPE_DATETIME: u8 = 0x09;
const ELEMENT_TYPE_NULL: u8 = 0x0A;
const ELEMENT_TYPE_REGULAR_EXPRESSION: u8 = 0x0B;
const ELEMENT_TYPE_DBPOINTER: u8 = 0x0C; // Deprecated
const ELEMENT_TYPE_JAVASCRIPT_CODE: u8 = 0x0D;
const ELEMENT_TYPE_SYMBOL: u8 = 0x0E; // Deprecated
const ELEMENT_TYPE_JAVASCRIPT_CODE_WITH_SCOPE: u8 = 0x0F; // Deprecated
const ELEMENT_TYPE_INT32: u8 = 0x10;
const ELEMENT_TYPE_TIMESTAMP: u8 = 0x11;
const ELEMENT_TYPE_INT64: u8 = 0x12;
const ELEMENT_TYPE_DECIMAL128: u8 = 0x13;
const ELEMENT_TYPE_MIN_KEY: u8 = 0xFF;
const ELEMENT_TYPE_MAX_KEY: u8 = 0x7F;

const BINARY_SUBTYPE_GENERIC: u8 = 0x00;
const BINARY_SUBTYPE_FUNCTION: u8 = 0x01;
const BINARY_SUBTYPE_BINARY_OLD: u8 = 0x02;
const BINARY_SUBTYPE_UUID_OLD: u8 = 0x03;
const BINARY_SUBTYPE_UUID: u8 = 0x04;
const BINARY_SUBTYPE_MD5: u8 = 0x05;

/// All available BSON element types.
///
/// The obsolete ones ([`Undefined`](ElementType::Undefined),
/// [`DbPointer`](ElementType::DbPointer), [`Symbol`](ElementType::Symbol),
/// [`JavaScriptCodeWithScope`](ElementType::JavaScriptCodeWithScope)) are still
/// accepted on the wire for compatibility.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum ElementType {
    /// 64-bit binary floating point
    Double = ELEMENT_TYPE_DOUBLE,
    /// UTF-8 string
    String = ELEMENT_TYPE_STRING,
    /// Embedded document
    EmbeddedDocument = ELEMENT_TYPE_EMBEDDED_DOCUMENT,
    /// Array
    Array = ELEMENT_TYPE_ARRAY,
    /// Binary data
    Binary = ELEMENT_TYPE_BINARY,
    /// Deprecated. Undefined (value)
    Undefined = ELEMENT_TYPE_UNDEFINED,
    /// [ObjectId](http://dochub.mongodb.org/core/objectids)
    ObjectId = ELEMENT_TYPE_OBJECT_ID,
    /// Boolean value
    Boolean = ELEMENT_TYPE_BOOLEAN,
    /// UTC datetime
    DateTime = ELEMENT_TYPE_DATETIME,
    /// Null value
    Null = ELEMENT_TYPE_NULL,
    /// Regular expression
    RegularExpression = ELEMENT_TYPE_REGULAR_EXPRESSION,
    /// Deprecated. DBPointer
    DbPointer = ELEMENT_TYPE_DBPOINTER,
    /// JavaScript code
    JavaScriptCode = ELEMENT_TYPE_JAVASCRIPT_CODE,
    /// Deprecated. Symbol
    Symbol = ELEMENT_TYPE_SYMBOL,
    /// Deprecated. JavaScript code with scope
    JavaScriptCodeWithScope = ELEMENT_TYPE_JAVASCRIPT_CODE_WITH_SCOPE,
    /// 32-bit integer
    Int32 = ELEMENT_TYPE_INT32,
    /// Timestamp (internal MongoDB type)
    Timestamp = ELEMENT_TYPE_TIMESTAMP,
    /// 64-bit integer
    Int64 = ELEMENT_TYPE_INT64,
    /// [128-bit decimal floating point](https://github.com/mongodb/specifications/blob/master/source/bson-decimal128/decimal128.md)
    Decimal128 = ELEMENT_TYPE_DECIMAL128,
    /// Min key
    MinKey = ELEMENT_TYPE_MIN_KEY,
    /// Max key
    MaxKey = ELEMENT_TYPE_MAX_KEY,
}

impl ElementType {
    /// Attempt to convert from the wire tag.
    #[inline]
    pub fn from_u8(tag: u8) -> Option<Self> {
        Some(match tag {
            ELEMENT_TYPE_DOUBLE => ElementType::Double,
            ELEMENT_TYPE_STRING => ElementType::String,
            ELEMENT_TYPE_EMBEDDED_DOCUMENT => ElementType::EmbeddedDocument,
            ELEMENT_TYPE_ARRAY => ElementType::Array,
            ELEMENT_TYPE_BINARY => ElementType::Binary,
            ELEMENT_TYPE_UNDEFINED => ElementType::Undefined,
            ELEMENT_TYPE_OBJECT_ID => ElementType::ObjectId,
            ELEMENT_TYPE_BOOLEAN => ElementType::Boolean,
            ELEMENT_TYPE_DATETIME => ElementType::DateTime,
            ELEMENT_TYPE_NULL => ElementType::Null,
            ELEMENT_TYPE_REGULAR_EXPRESSION => ElementType::RegularExpression,
            ELEMENT_TYPE_DBPOINTER => ElementType::DbPointer,
            ELEMENT_TYPE_JAVASCRIPT_CODE => ElementType::JavaScriptCode,
            ELEMENT_TYPE_SYMBOL => ElementType::Symbol,
            ELEMENT_TYPE_JAVASCRIPT_CODE_WITH_SCOPE => ElementType::JavaScriptCodeWithScope,
            ELEMENT_TYPE_INT32 => ElementType::Int32,
            ELEMENT_TYPE_TIMESTAMP => ElementType::Timestamp,
            ELEMENT_TYPE_INT64 => ElementType::Int64,
            ELEMENT_TYPE_DECIMAL128 => ElementType::Decimal128,
            ELEMENT_TYPE_MIN_KEY => ElementType::MinKey,
            ELEMENT_TYPE_MAX_KEY => ElementType::MaxKey,
            _ => return None,
        })
    }

    /// The wire tag for this element type.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// A human-readable name for this element type, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Double => "Double",
            ElementType::String => "String",
            ElementType::EmbeddedDocument => "Document",
            ElementType::Array => "Array",
            ElementType::Binary => "Binary",
            ElementType::Undefined => "Undefined",
            ElementType::ObjectId => "ObjectId",
            ElementType::Boolean => "Boolean",
            ElementType::DateTime => "DateTime",
            ElementType::Null => "Null",
            ElementType::RegularExpression => "RegularExpression",
            ElementType::DbPointer => "DbPointer",
            ElementType::JavaScriptCode => "JavaScriptCode",
            ElementType::Symbol => "Symbol",
            ElementType::JavaScriptCodeWithScope => "JavaScriptCodeWithScope",
            ElementType::Int32 => "Int32",
            ElementType::Timestamp => "Timestamp",
            ElementType::Int64 => "Int64",
            ElementType::Decimal128 => "Decimal128",
            ElementType::MinKey => "MinKey",
            ElementType::MaxKey => "MaxKey",
        }
    }
}

/// The available binary subtypes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum BinarySubtype {
    Generic,
    Function,
    BinaryOld,
    UuidOld,
    Uuid,
    Md5,
    UserDefined(u8),
}

impl From<BinarySubtype> for u8 {
    #[inline]
    fn from(t: BinarySubtype) -> u8 {
        match t {
            BinarySubtype::Generic => BINARY_SUBTYPE_GENERIC,
            BinarySubtype::Function => BINARY_SUBTYPE_FUNCTION,
            BinarySubtype::BinaryOld => BINARY_SUBTYPE_BINARY_OLD,
            BinarySubtype::UuidOld => BINARY_SUBTYPE_UUID_OLD,
            BinarySubtype::Uuid => BINARY_SUBTYPE_UUID,
            BinarySubtype::Md5 => BINARY_SUBTYPE_MD5,
            BinarySubtype::UserDefined(x) => x,
        }
    }
}

impl From<u8> for BinarySubtype {
    #[inline]
    fn from(t: u8) -> BinarySubtype {
        match t {
            BINARY_SUBTYPE_GENERIC => BinarySubtype::Generic,
            BINARY_SUBTYPE_FUNCTION => BinarySubtype::Function,
            BINARY_SUBTYPE_BINARY_OLD => BinarySubtype::BinaryOld,
            BINARY_SUBTYPE_UUID_OLD => BinarySubtype::UuidOld,
            BINARY_SUBTYPE_UUID => BinarySubtype::Uuid,
            BINARY_SUBTYPE_MD5 => BinarySubtype::Md5,
            _ => BinarySubtype::UserDefined(t),
        }
    }
}
