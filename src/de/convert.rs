//! Scalar element parsing and the kind-to-target conversion rules.

use std::time::Duration;

use crate::{
    binary::Binary,
    bson::{Bson, DbPointer, Regex, Timestamp},
    datetime::DateTime,
    decimal128::Decimal128,
    error::{Error, Result},
    oid::ObjectId,
    raw::{Reader, RawElement},
    spec::{BinarySubtype, ElementType},
};

use super::slot::Slot;

/// A scalar element's natural in-memory value, borrowing strings and bytes
/// from the input buffer.
///
/// Embedded documents, arrays and code-with-scope never reach this type; the
/// element decoder routes them through the document walk instead.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ScalarRef<'de> {
    Double(f64),
    String(&'de str),
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Timestamp(Timestamp),
    DateTime(DateTime),
    ObjectId(ObjectId),
    Regex { pattern: &'de str, options: &'de str },
    DbPointer { namespace: &'de str, id: ObjectId },
    JavaScriptCode(&'de str),
    Symbol(&'de str),
    Decimal128(Decimal128),
    /// Binary with the generic or old subtype: the natural value is the
    /// naked byte run.
    Bytes(&'de [u8]),
    /// Binary with any other subtype: the natural value keeps its structure.
    Binary { subtype: BinarySubtype, bytes: &'de [u8] },
    Null,
    Undefined,
    MinKey,
    MaxKey,
}

/// Parses a scalar element's payload into its natural value.
///
/// The payload slice was produced by the element sizer, so its length is
/// already consistent with the element kind; what remains to check here is
/// the interior structure (UTF-8, the boolean byte, the old binary subtype's
/// redundant length).
pub(crate) fn read_scalar<'de>(elem: &RawElement<'de>) -> Result<ScalarRef<'de>> {
    let mut reader = Reader::new(elem.bytes());
    let value = match elem.element_type() {
        ElementType::Double => ScalarRef::Double(reader.read_f64()?),
        ElementType::String => ScalarRef::String(reader.read_str()?),
        ElementType::Boolean => ScalarRef::Boolean(reader.read_bool()?),
        ElementType::Int32 => ScalarRef::Int32(reader.read_i32()?),
        ElementType::Int64 => ScalarRef::Int64(reader.read_i64()?),
        ElementType::Timestamp => {
            ScalarRef::Timestamp(Timestamp::from_u64(reader.read_i64()? as u64))
        }
        ElementType::DateTime => ScalarRef::DateTime(DateTime::from_millis(reader.read_i64()?)),
        ElementType::ObjectId => ScalarRef::ObjectId(read_oid(&mut reader)?),
        ElementType::RegularExpression => {
            let pattern = reader.read_cstr()?;
            let options = reader.read_cstr()?;
            ScalarRef::Regex { pattern, options }
        }
        ElementType::DbPointer => {
            let namespace = reader.read_str()?;
            let id = read_oid(&mut reader)?;
            ScalarRef::DbPointer { namespace, id }
        }
        ElementType::JavaScriptCode => ScalarRef::JavaScriptCode(reader.read_str()?),
        ElementType::Symbol => ScalarRef::Symbol(reader.read_str()?),
        ElementType::Decimal128 => {
            let bytes = reader.read_bytes(16)?;
            ScalarRef::Decimal128(Decimal128::from_bytes(
                bytes.try_into().expect("decimal128 is sixteen bytes"),
            ))
        }
        ElementType::Binary => read_binary(&mut reader)?,
        ElementType::Null => ScalarRef::Null,
        ElementType::Undefined => ScalarRef::Undefined,
        ElementType::MinKey => ScalarRef::MinKey,
        ElementType::MaxKey => ScalarRef::MaxKey,
        ElementType::EmbeddedDocument
        | ElementType::Array
        | ElementType::JavaScriptCodeWithScope => {
            return Err(Error::malformed_bytes(format!(
                "{} is not a scalar element",
                elem.element_type().name()
            )));
        }
    };

    if !reader.is_at_end() {
        return Err(Error::malformed_bytes(format!(
            "{} element has {} trailing payload bytes",
            elem.element_type().name(),
            elem.len() - reader.pos()
        )));
    }

    Ok(value)
}

fn read_oid(reader: &mut Reader<'_>) -> Result<ObjectId> {
    let bytes = reader.read_bytes(12)?;
    Ok(ObjectId::from_bytes(
        bytes.try_into().expect("ObjectId is twelve bytes"),
    ))
}

fn read_binary<'de>(reader: &mut Reader<'de>) -> Result<ScalarRef<'de>> {
    let len = reader.read_i32()?;
    let len = usize::try_from(len)
        .map_err(|_| Error::malformed_bytes(format!("negative binary length: {}", len)))?;
    let subtype = BinarySubtype::from(reader.read_u8()?);
    let bytes = reader.read_bytes(len)?;

    Ok(match subtype {
        BinarySubtype::Generic => ScalarRef::Bytes(bytes),
        BinarySubtype::BinaryOld => {
            // the old subtype carries a redundant inner length which must
            // equal the declared length minus its own four bytes
            if len < 4 {
                return Err(Error::malformed_bytes(
                    "old binary subtype has no inner declared length",
                ));
            }
            let inner = i32::from_le_bytes(bytes[..4].try_into().expect("i32 is four bytes"));
            if usize::try_from(inner).ok() != Some(len - 4) {
                return Err(Error::malformed_bytes(
                    "old binary subtype has wrong inner declared length",
                ));
            }
            ScalarRef::Bytes(&bytes[4..])
        }
        _ => ScalarRef::Binary { subtype, bytes },
    })
}

impl<'de> ScalarRef<'de> {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            ScalarRef::Double(..) => "Double",
            ScalarRef::String(..) => "String",
            ScalarRef::Boolean(..) => "Boolean",
            ScalarRef::Int32(..) => "Int32",
            ScalarRef::Int64(..) => "Int64",
            ScalarRef::Timestamp(..) => "Timestamp",
            ScalarRef::DateTime(..) => "DateTime",
            ScalarRef::ObjectId(..) => "ObjectId",
            ScalarRef::Regex { .. } => "RegularExpression",
            ScalarRef::DbPointer { .. } => "DbPointer",
            ScalarRef::JavaScriptCode(..) => "JavaScriptCode",
            ScalarRef::Symbol(..) => "Symbol",
            ScalarRef::Decimal128(..) => "Decimal128",
            ScalarRef::Bytes(..) => "Binary",
            ScalarRef::Binary { .. } => "Binary",
            ScalarRef::Null => "Null",
            ScalarRef::Undefined => "Undefined",
            ScalarRef::MinKey => "MinKey",
            ScalarRef::MaxKey => "MaxKey",
        }
    }

    /// The owned polymorphic value, for `Any` targets.
    pub(crate) fn to_bson(self) -> Bson {
        match self {
            ScalarRef::Double(v) => Bson::Double(v),
            ScalarRef::String(s) => Bson::String(s.to_owned()),
            ScalarRef::Boolean(b) => Bson::Boolean(b),
            ScalarRef::Int32(v) => Bson::Int32(v),
            ScalarRef::Int64(v) => Bson::Int64(v),
            ScalarRef::Timestamp(ts) => Bson::Timestamp(ts),
            ScalarRef::DateTime(dt) => Bson::DateTime(dt),
            ScalarRef::ObjectId(id) => Bson::ObjectId(id),
            ScalarRef::Regex { pattern, options } => Bson::RegularExpression(Regex {
                pattern: pattern.to_owned(),
                options: options.to_owned(),
            }),
            ScalarRef::DbPointer { namespace, id } => Bson::DbPointer(DbPointer {
                namespace: namespace.to_owned(),
                id,
            }),
            ScalarRef::JavaScriptCode(code) => Bson::JavaScriptCode(code.to_owned()),
            ScalarRef::Symbol(s) => Bson::Symbol(s.to_owned()),
            ScalarRef::Decimal128(d) => Bson::Decimal128(d),
            ScalarRef::Bytes(bytes) => Bson::Binary(Binary {
                subtype: BinarySubtype::Generic,
                bytes: bytes.to_vec(),
            }),
            ScalarRef::Binary { subtype, bytes } => Bson::Binary(Binary {
                subtype,
                bytes: bytes.to_vec(),
            }),
            ScalarRef::Null => Bson::Null,
            ScalarRef::Undefined => Bson::Undefined,
            ScalarRef::MinKey => Bson::MinKey,
            ScalarRef::MaxKey => Bson::MaxKey,
        }
    }

    /// The value viewed as a signed 64-bit integer, when the kind counts as
    /// an integer source. Timestamps contribute their wire bit pattern.
    fn as_int(&self) -> Option<i64> {
        match *self {
            ScalarRef::Int32(v) => Some(v as i64),
            ScalarRef::Int64(v) => Some(v),
            ScalarRef::Timestamp(ts) => Some(ts.to_u64() as i64),
            _ => None,
        }
    }
}

/// Stores a scalar value into a target slot, converting when the matrix
/// allows it. Any pairing not covered is an `UnexpectedType` error naming
/// the wire kind and the target.
pub(crate) fn assign_scalar<'de>(value: ScalarRef<'de>, slot: Slot<'_, 'de>) -> Result<()> {
    let target = slot.type_name();
    let mismatch = || Error::unexpected_type(value.kind_name(), target);

    // wire null and undefined reset whatever they land on
    if matches!(value, ScalarRef::Null | ScalarRef::Undefined) {
        match slot {
            Slot::Any(any) => *any = value.to_bson(),
            other => zero_slot(other),
        }
        return Ok(());
    }

    match slot {
        Slot::Any(any) => *any = value.to_bson(),

        Slot::Double(out) => *out = float_source(&value).ok_or_else(mismatch)?,
        Slot::Float(out) => *out = float_source(&value).ok_or_else(mismatch)? as f32,

        Slot::Int8(out) => *out = signed_source(&value, target)?,
        Slot::Int16(out) => *out = signed_source(&value, target)?,
        Slot::Int32(out) => *out = signed_source(&value, target)?,
        Slot::Int64(out) => *out = signed_source(&value, target)?,

        Slot::UInt8(out) => *out = unsigned_source(&value, target)?,
        Slot::UInt16(out) => *out = unsigned_source(&value, target)?,
        Slot::UInt32(out) => *out = unsigned_source(&value, target)?,
        Slot::UInt64(out) => *out = unsigned_source(&value, target)?,

        Slot::Boolean(out) => {
            *out = match value {
                ScalarRef::Boolean(b) => b,
                ScalarRef::Double(f) => f != 0.0,
                _ => value.as_int().ok_or_else(mismatch)? != 0,
            }
        }

        Slot::String(out) => match value {
            ScalarRef::String(s) | ScalarRef::Symbol(s) => *out = s.to_owned(),
            ScalarRef::Bytes(bytes) => *out = crate::raw::try_to_str(bytes)?.to_owned(),
            _ => return Err(mismatch()),
        },

        Slot::JsonNumber(out) => match value {
            ScalarRef::String(s) => out.0 = s.to_owned(),
            ScalarRef::Int32(v) => out.0 = v.to_string(),
            ScalarRef::Int64(v) => out.0 = v.to_string(),
            ScalarRef::Double(v) => out.0 = v.to_string(),
            _ => return Err(mismatch()),
        },

        Slot::Bytes(out) => match value {
            ScalarRef::Bytes(bytes) => out.0 = bytes.to_vec(),
            ScalarRef::String(s) | ScalarRef::Symbol(s) => out.0 = s.as_bytes().to_vec(),
            _ => return Err(mismatch()),
        },

        Slot::Binary(out) => match value {
            ScalarRef::Binary { subtype, bytes } => {
                *out = Binary {
                    subtype,
                    bytes: bytes.to_vec(),
                }
            }
            // a naked byte run is wrapped with the default subtype
            ScalarRef::Bytes(bytes) => {
                *out = Binary {
                    subtype: BinarySubtype::Generic,
                    bytes: bytes.to_vec(),
                }
            }
            _ => return Err(mismatch()),
        },

        Slot::ObjectId(out) => match value {
            ScalarRef::ObjectId(id) => *out = id,
            _ => return Err(mismatch()),
        },

        Slot::DateTime(out) => match value {
            ScalarRef::DateTime(dt) => *out = dt,
            _ => return Err(mismatch()),
        },

        Slot::Duration(out) => {
            // a duration on the wire is a count of milliseconds
            let millis = match value {
                ScalarRef::Double(f) => f as i64,
                _ => value.as_int().ok_or_else(mismatch)?,
            };
            let millis = u64::try_from(millis).map_err(|_| {
                Error::invalid_value(format!("negative duration: {} ms", millis))
            })?;
            *out = Duration::from_millis(millis);
        }

        Slot::Timestamp(out) => match value {
            ScalarRef::Timestamp(ts) => *out = ts,
            ScalarRef::Int64(v) => *out = Timestamp::from_u64(v as u64),
            _ => return Err(mismatch()),
        },

        Slot::Regex(out) => match value {
            ScalarRef::Regex { pattern, options } => {
                *out = Regex {
                    pattern: pattern.to_owned(),
                    options: options.to_owned(),
                }
            }
            _ => return Err(mismatch()),
        },

        Slot::Decimal128(out) => match value {
            ScalarRef::Decimal128(d) => *out = d,
            _ => return Err(mismatch()),
        },

        Slot::DbPointer(out) => match value {
            ScalarRef::DbPointer { namespace, id } => {
                *out = DbPointer {
                    namespace: namespace.to_owned(),
                    id,
                }
            }
            _ => return Err(mismatch()),
        },

        Slot::Url(out) => match value {
            ScalarRef::String(s) => {
                // an unparsable URL is caller misuse, not a droppable mismatch
                *out = url::Url::parse(s)
                    .map_err(|e| Error::invalid_value(format!("invalid URL {:?}: {}", s, e)))?;
            }
            _ => return Err(mismatch()),
        },

        Slot::JavaScriptCodeWithScope(out) => match value {
            // code without scope lands in the same target with an empty scope
            ScalarRef::JavaScriptCode(code) => {
                *out = crate::bson::JavaScriptCodeWithScope {
                    code: code.to_owned(),
                    scope: crate::document::Document::new(),
                }
            }
            _ => return Err(mismatch()),
        },

        Slot::Map(..)
        | Slot::Seq(..)
        | Slot::Record(..)
        | Slot::Pairs(..)
        | Slot::RawPairs(..) => return Err(mismatch()),

        // handled before the scalar path in the element decoder
        Slot::Raw(..) | Slot::Nullable(..) | Slot::Hook(..) => unreachable!(),
    }

    Ok(())
}

fn float_source(value: &ScalarRef<'_>) -> Option<f64> {
    match *value {
        ScalarRef::Double(f) => Some(f),
        ScalarRef::Boolean(b) => Some(if b { 1.0 } else { 0.0 }),
        _ => value.as_int().map(|v| v as f64),
    }
}

fn signed_source<T: TryFrom<i64>>(value: &ScalarRef<'_>, target: &'static str) -> Result<T> {
    let wide = match *value {
        ScalarRef::Double(f) => f as i64, // truncation toward zero
        ScalarRef::Boolean(b) => b as i64,
        _ => value
            .as_int()
            .ok_or_else(|| Error::unexpected_type(value.kind_name(), target))?,
    };
    T::try_from(wide).map_err(|_| Error::unexpected_type(value.kind_name(), target))
}

fn unsigned_source<T: TryFrom<u64>>(value: &ScalarRef<'_>, target: &'static str) -> Result<T> {
    let wide: i64 = signed_source(value, target)?;
    let wide = u64::try_from(wide).map_err(|_| Error::unexpected_type(value.kind_name(), target))?;
    T::try_from(wide).map_err(|_| Error::unexpected_type(value.kind_name(), target))
}

/// Restores a slot to its zero state, the effect of a wire `Null` or
/// `Undefined` landing on it.
pub(crate) fn zero_slot(slot: Slot<'_, '_>) {
    match slot {
        Slot::Double(out) => *out = 0.0,
        Slot::Float(out) => *out = 0.0,
        Slot::Int8(out) => *out = 0,
        Slot::Int16(out) => *out = 0,
        Slot::Int32(out) => *out = 0,
        Slot::Int64(out) => *out = 0,
        Slot::UInt8(out) => *out = 0,
        Slot::UInt16(out) => *out = 0,
        Slot::UInt32(out) => *out = 0,
        Slot::UInt64(out) => *out = 0,
        Slot::Boolean(out) => *out = false,
        Slot::String(out) => out.clear(),
        Slot::JsonNumber(out) => out.0.clear(),
        Slot::Bytes(out) => out.0.clear(),
        Slot::Binary(out) => *out = Binary::default(),
        Slot::ObjectId(out) => *out = ObjectId::default(),
        Slot::DateTime(out) => *out = DateTime::default(),
        Slot::Duration(out) => *out = Duration::default(),
        Slot::Timestamp(out) => *out = Timestamp::default(),
        Slot::Regex(out) => *out = Regex::default(),
        Slot::Decimal128(out) => *out = Decimal128::default(),
        Slot::JavaScriptCodeWithScope(out) => *out = Default::default(),
        Slot::DbPointer(_) | Slot::Url(_) => {
            // no meaningful zero state; left unchanged
        }
        Slot::Any(out) => *out = Bson::Null,
        Slot::Map(map) => map.clear(),
        Slot::Seq(seq) => seq.clear(),
        Slot::Record(rec) => rec.reset(),
        Slot::Pairs(out) => out.clear(),
        Slot::RawPairs(out) => out.clear(),
        Slot::Raw(out) => *out = RawElement::default(),
        Slot::Nullable(opt) => opt.set_none(),
        Slot::Hook(hook) => hook.set_zero(),
    }
}
