//! Decoder
//!
//! The entry point is [`from_slice`] (or [`from_slice_with_options`] for
//! strict-mode and trailing-byte control): hand it a byte buffer holding one
//! BSON document and a mutable reference to any [`DecodeTarget`], and the
//! document decoder walks the wire elements, routing each one to the element
//! decoder against the slot the target exposes for it.
//!
//! ```
//! use bsondec::{de::from_slice, Document};
//!
//! let bytes = b"\x16\x00\x00\x00\x02hello\x00\x06\x00\x00\x00world\x00\x00";
//! let mut doc = Document::new();
//! from_slice(bytes, &mut doc)?;
//! assert_eq!(doc.get_str("hello"), Some("world"));
//! # Ok::<(), bsondec::error::Error>(())
//! ```

mod convert;
pub(crate) mod fields;
mod slot;

pub use self::{
    fields::{FieldIndex, FieldIndexBuilder, FieldPath},
    slot::{
        DecodeTarget,
        HookOutcome,
        JsonNumber,
        MapKey,
        MapTarget,
        NullableTarget,
        RecordTarget,
        SeqTarget,
        SetBson,
        Slot,
    },
};

use crate::{
    bson::Bson,
    document::Document,
    error::{Error, ErrorKind, Result},
    raw::{element_size, usize_try_from_i32, RawElement, Reader},
    spec::ElementType,
};

use self::convert::{assign_scalar, read_scalar};

/// Options controlling a decode.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct DecodeOptions {
    /// In strict mode the first element that does not fit its target aborts
    /// the document. In the default lenient mode such elements are dropped
    /// and iteration continues at the next sibling. Structural corruption
    /// aborts in both modes.
    pub strict: bool,

    /// Permit bytes past the declared document length at the top level. The
    /// decoder reads exactly one document either way.
    pub allow_trailing: bool,
}

/// Per-decode state threaded by reference through nested document walks.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext {
    strict: bool,
}

impl DecodeContext {
    /// Whether element/target mismatches abort the document.
    pub fn strict(&self) -> bool {
        self.strict
    }
}

/// Decodes one BSON document from `bytes` into `target`, leniently: elements
/// that do not fit their slot are dropped.
///
/// The target may borrow from `bytes` (raw targets are zero-copy), so the
/// buffer must outlive it.
pub fn from_slice<'de, T: DecodeTarget<'de> + ?Sized>(
    bytes: &'de [u8],
    target: &mut T,
) -> Result<()> {
    from_slice_with_options(bytes, target, DecodeOptions::default())
}

/// Decodes one BSON document from `bytes` into `target` with explicit
/// [`DecodeOptions`].
pub fn from_slice_with_options<'de, T: DecodeTarget<'de> + ?Sized>(
    bytes: &'de [u8],
    target: &mut T,
    options: DecodeOptions,
) -> Result<()> {
    let size = element_size(ElementType::EmbeddedDocument, 0, bytes)?;
    if !options.allow_trailing && size != bytes.len() {
        return Err(Error::malformed_bytes(format!(
            "{} trailing bytes after document",
            bytes.len() - size
        )));
    }

    let elem = RawElement::new(ElementType::EmbeddedDocument, &bytes[..size]);
    let ctx = DecodeContext {
        strict: options.strict,
    };

    match target.slot() {
        slot @ (Slot::Any(..)
        | Slot::Map(..)
        | Slot::Record(..)
        | Slot::Pairs(..)
        | Slot::RawPairs(..)
        | Slot::Raw(..)
        | Slot::Nullable(..)
        | Slot::Hook(..)) => decode_element(&elem, slot, &ctx),
        other => Err(ErrorKind::UnsupportedTarget {
            target: other.type_name(),
        }
        .into()),
    }
}

/// Walks the elements of the document occupying exactly `bytes`, calling
/// `on_element` for each one.
///
/// The cursor is advanced by the element sizer *before* the element is
/// interpreted, so a failed `on_element` cannot desynchronize the walk: in
/// lenient mode an `UnexpectedType` failure simply drops the element and the
/// loop resumes at its sibling. After the terminator the cursor must sit
/// exactly at the end of the document.
fn walk_document<'de>(
    bytes: &'de [u8],
    ctx: &DecodeContext,
    mut on_element: impl FnMut(&'de str, &RawElement<'de>) -> Result<()>,
) -> Result<()> {
    let mut reader = Reader::new(bytes);
    let declared = usize_try_from_i32(reader.read_i32()?)?;
    if declared != bytes.len() {
        return Err(Error::malformed_bytes(format!(
            "document length {} does not match its {} bytes",
            declared,
            bytes.len()
        )));
    }

    loop {
        let tag = reader.read_u8()?;
        if tag == 0 {
            break;
        }
        let kind = ElementType::from_u8(tag)
            .ok_or_else(|| Error::from(ErrorKind::UnknownElementType { tag }))?;
        let key = reader.read_cstr()?;
        let size = element_size(kind, reader.pos(), bytes)?;
        let payload = reader.read_bytes(size)?;
        let elem = RawElement::new(kind, payload);

        match on_element(key, &elem) {
            Ok(()) => {}
            Err(e) if !ctx.strict && e.is_unexpected_type() => {
                // lenient mode: the element is dropped, its bytes were
                // already consumed, continue at the sibling
            }
            Err(e) => return Err(e.with_key(key)),
        }
    }

    if !reader.is_at_end() {
        return Err(Error::malformed_bytes(format!(
            "{} bytes left within document after terminator",
            bytes.len() - reader.pos()
        )));
    }

    Ok(())
}

fn walk_into_map<'de>(
    bytes: &'de [u8],
    ctx: &DecodeContext,
    map: &mut dyn MapTarget<'de>,
) -> Result<()> {
    map.clear();
    walk_document(bytes, ctx, |key, elem| map.insert_entry(ctx, key, elem))
}

fn walk_into_record<'de>(
    bytes: &'de [u8],
    ctx: &DecodeContext,
    record: &mut dyn RecordTarget<'de>,
) -> Result<()> {
    let index = record.field_index();
    record.reset();
    walk_document(bytes, ctx, |key, elem| {
        if let Some(path) = index.lookup(key) {
            match record.field_slot(path) {
                Some(slot) => decode_element(elem, slot, ctx),
                None => Ok(()),
            }
        } else if let Some(path) = index.catch_all() {
            match record.field_slot(path) {
                // the catch-all absorbs unmatched names; it is part of the
                // record's reset state, so it is not cleared per entry
                Some(Slot::Map(map)) => map.insert_entry(ctx, key, elem),
                _ => Ok(()),
            }
        } else {
            // unmatched names in records are skipped in both modes
            Ok(())
        }
    })
}

fn walk_into_seq<'de>(
    bytes: &'de [u8],
    ctx: &DecodeContext,
    seq: &mut dyn SeqTarget<'de>,
) -> Result<()> {
    seq.clear();
    let mut delivered = 0usize;
    walk_document(bytes, ctx, |_key, elem| {
        // array element names are positions by convention; they are ignored,
        // values are delivered in wire order
        seq.append(ctx, delivered, elem)
            .map_err(|e| e.with_index(delivered))?;
        delivered += 1;
        Ok(())
    })?;
    seq.finish(delivered)
}

fn walk_into_pairs<'de>(
    bytes: &'de [u8],
    ctx: &DecodeContext,
    out: &mut Vec<(String, Bson)>,
) -> Result<()> {
    out.clear();
    walk_document(bytes, ctx, |key, elem| {
        let mut value = Bson::Null;
        decode_element(elem, Slot::Any(&mut value), ctx)?;
        out.push((key.to_owned(), value));
        Ok(())
    })
}

fn walk_into_raw_pairs<'de>(
    bytes: &'de [u8],
    ctx: &DecodeContext,
    out: &mut Vec<(String, RawElement<'de>)>,
) -> Result<()> {
    out.clear();
    walk_document(bytes, ctx, |key, elem| {
        out.push((key.to_owned(), *elem));
        Ok(())
    })
}

/// Decodes one element into one slot.
///
/// The rules, in priority order: raw pass-through, hook delegation, nullable
/// indirection, embedded documents, arrays, then scalar decode plus
/// conversion.
pub(crate) fn decode_element<'de>(
    elem: &RawElement<'de>,
    slot: Slot<'_, 'de>,
    ctx: &DecodeContext,
) -> Result<()> {
    let kind = elem.element_type();

    let slot = match slot {
        // raw pass-through: kind and payload stored without interpretation
        Slot::Raw(out) => {
            *out = *elem;
            return Ok(());
        }
        // hook delegation: the element's raw bytes go to user code
        Slot::Hook(hook) => {
            return match hook.set_bson(elem)? {
                HookOutcome::Assigned => Ok(()),
                HookOutcome::Zero => {
                    hook.set_zero();
                    Ok(())
                }
            };
        }
        // nullable indirection: null clears, anything else decodes the
        // inner value and commits on success
        Slot::Nullable(opt) => {
            return match kind {
                ElementType::Null | ElementType::Undefined => {
                    opt.set_none();
                    Ok(())
                }
                _ => opt.decode_some(ctx, elem),
            };
        }
        other => other,
    };

    match kind {
        ElementType::EmbeddedDocument => match slot {
            Slot::Map(map) => walk_into_map(elem.bytes(), ctx, map),
            Slot::Record(record) => walk_into_record(elem.bytes(), ctx, record),
            Slot::Pairs(out) => walk_into_pairs(elem.bytes(), ctx, out),
            Slot::RawPairs(out) => walk_into_raw_pairs(elem.bytes(), ctx, out),
            Slot::Any(any) => {
                // the default document shape: an insertion-ordered map with
                // string keys and polymorphic values
                let mut doc = Document::new();
                walk_into_map(elem.bytes(), ctx, &mut doc)?;
                *any = Bson::Document(doc);
                Ok(())
            }
            _ => {
                // a document aimed at a slot no document fits is read into a
                // throwaway: structural errors still surface, the value is
                // silently discarded
                let mut throwaway = Document::new();
                walk_into_map(elem.bytes(), ctx, &mut throwaway)
            }
        },

        ElementType::Array => match slot {
            Slot::Seq(seq) => walk_into_seq(elem.bytes(), ctx, seq),
            Slot::Any(any) => {
                let mut values: Vec<Bson> = Vec::new();
                walk_into_seq(elem.bytes(), ctx, &mut values)?;
                *any = Bson::Array(values);
                Ok(())
            }
            other => {
                // decoded as a polymorphic sequence first so that structural
                // errors surface, then reported as a mismatch
                let target = other.type_name();
                let mut throwaway: Vec<Bson> = Vec::new();
                walk_into_seq(elem.bytes(), ctx, &mut throwaway)?;
                Err(Error::unexpected_type(kind.name(), target))
            }
        },

        ElementType::JavaScriptCodeWithScope => decode_code_with_scope(elem, slot, ctx),

        _ => assign_scalar(read_scalar(elem)?, slot),
    }
}

fn decode_code_with_scope<'de>(
    elem: &RawElement<'de>,
    slot: Slot<'_, 'de>,
    ctx: &DecodeContext,
) -> Result<()> {
    let bytes = elem.bytes();
    let mut reader = Reader::new(bytes);

    let declared = usize_try_from_i32(reader.read_i32()?)?;
    if declared != bytes.len() {
        return Err(Error::malformed_bytes(format!(
            "code with scope length {} does not match its {} bytes",
            declared,
            bytes.len()
        )));
    }

    let code = reader.read_str()?;

    // the scope document must account for exactly the rest of the payload
    let scope_size = element_size(ElementType::EmbeddedDocument, reader.pos(), bytes)?;
    let scope_bytes = reader.read_bytes(scope_size)?;
    if !reader.is_at_end() {
        return Err(Error::malformed_bytes(
            "code with scope has bytes after its scope document",
        ));
    }

    match slot {
        Slot::JavaScriptCodeWithScope(out) => {
            let mut scope = Document::new();
            walk_into_map(scope_bytes, ctx, &mut scope)?;
            *out = crate::bson::JavaScriptCodeWithScope {
                code: code.to_owned(),
                scope,
            };
            Ok(())
        }
        Slot::Any(any) => {
            let mut scope = Document::new();
            walk_into_map(scope_bytes, ctx, &mut scope)?;
            *any = Bson::JavaScriptCodeWithScope(crate::bson::JavaScriptCodeWithScope {
                code: code.to_owned(),
                scope,
            });
            Ok(())
        }
        other => {
            let target = other.type_name();
            let mut throwaway = Document::new();
            walk_into_map(scope_bytes, ctx, &mut throwaway)?;
            Err(Error::unexpected_type(
                ElementType::JavaScriptCodeWithScope.name(),
                target,
            ))
        }
    }
}
