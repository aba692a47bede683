//! Test-only wire writer. The crate itself has no encoder; tests build their
//! input documents here instead of spelling every byte out by hand.

use crate::{spec::BinarySubtype, Binary, Bson, Document};

/// Encodes `doc` as one BSON document.
pub(crate) fn doc_bytes(doc: &Document) -> Vec<u8> {
    let mut buf = vec![0u8; 4];
    for (key, value) in doc {
        append_element(&mut buf, key, value);
    }
    buf.push(0);
    patch_len(&mut buf);
    buf
}

/// Starts a document with a manually assembled body, for corruption tests
/// that need byte-level control.
pub(crate) fn raw_doc(body: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; 4];
    buf.extend_from_slice(body);
    buf.push(0);
    patch_len(&mut buf);
    buf
}

fn patch_len(buf: &mut [u8]) {
    let len = buf.len() as i32;
    buf[0..4].copy_from_slice(&len.to_le_bytes());
}

fn append_key(buf: &mut Vec<u8>, tag: u8, key: &str) {
    buf.push(tag);
    buf.extend_from_slice(key.as_bytes());
    buf.push(0);
}

fn append_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as i32 + 1).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
}

fn append_cstr(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
}

pub(crate) fn append_element(buf: &mut Vec<u8>, key: &str, value: &Bson) {
    let tag = value.element_type().as_u8();
    match value {
        Bson::Double(v) => {
            append_key(buf, tag, key);
            buf.extend_from_slice(&v.to_le_bytes());
        }
        Bson::String(s) => {
            append_key(buf, tag, key);
            append_str(buf, s);
        }
        Bson::Array(values) => {
            append_key(buf, tag, key);
            let mut inner = vec![0u8; 4];
            for (i, value) in values.iter().enumerate() {
                append_element(&mut inner, &i.to_string(), value);
            }
            inner.push(0);
            patch_len(&mut inner);
            buf.extend_from_slice(&inner);
        }
        Bson::Document(doc) => {
            append_key(buf, tag, key);
            buf.extend_from_slice(&doc_bytes(doc));
        }
        Bson::Boolean(b) => {
            append_key(buf, tag, key);
            buf.push(*b as u8);
        }
        Bson::Null | Bson::Undefined | Bson::MinKey | Bson::MaxKey => {
            append_key(buf, tag, key);
        }
        Bson::RegularExpression(re) => {
            append_key(buf, tag, key);
            append_cstr(buf, &re.pattern);
            append_cstr(buf, &re.options);
        }
        Bson::JavaScriptCode(code) => {
            append_key(buf, tag, key);
            append_str(buf, code);
        }
        Bson::JavaScriptCodeWithScope(cws) => {
            append_key(buf, tag, key);
            let mut inner = Vec::new();
            append_str(&mut inner, &cws.code);
            inner.extend_from_slice(&doc_bytes(&cws.scope));
            buf.extend_from_slice(&(inner.len() as i32 + 4).to_le_bytes());
            buf.extend_from_slice(&inner);
        }
        Bson::Int32(v) => {
            append_key(buf, tag, key);
            buf.extend_from_slice(&v.to_le_bytes());
        }
        Bson::Int64(v) => {
            append_key(buf, tag, key);
            buf.extend_from_slice(&v.to_le_bytes());
        }
        Bson::Timestamp(ts) => {
            append_key(buf, tag, key);
            buf.extend_from_slice(&ts.increment.to_le_bytes());
            buf.extend_from_slice(&ts.time.to_le_bytes());
        }
        Bson::Binary(Binary { subtype, bytes }) => {
            append_key(buf, tag, key);
            match subtype {
                BinarySubtype::BinaryOld => {
                    buf.extend_from_slice(&(bytes.len() as i32 + 4).to_le_bytes());
                    buf.push(u8::from(*subtype));
                    buf.extend_from_slice(&(bytes.len() as i32).to_le_bytes());
                }
                _ => {
                    buf.extend_from_slice(&(bytes.len() as i32).to_le_bytes());
                    buf.push(u8::from(*subtype));
                }
            }
            buf.extend_from_slice(bytes);
        }
        Bson::ObjectId(id) => {
            append_key(buf, tag, key);
            buf.extend_from_slice(&id.bytes());
        }
        Bson::DateTime(dt) => {
            append_key(buf, tag, key);
            buf.extend_from_slice(&dt.timestamp_millis().to_le_bytes());
        }
        Bson::Symbol(s) => {
            append_key(buf, tag, key);
            append_str(buf, s);
        }
        Bson::Decimal128(d) => {
            append_key(buf, tag, key);
            buf.extend_from_slice(&d.bytes());
        }
        Bson::DbPointer(p) => {
            append_key(buf, tag, key);
            append_str(buf, &p.namespace);
            buf.extend_from_slice(&p.id.bytes());
        }
    }
}

#[test]
fn empty_doc_is_five_bytes() {
    assert_eq!(doc_bytes(&Document::new()), b"\x05\x00\x00\x00\x00");
}

#[test]
fn hello_world_matches_reference_bytes() {
    let doc = crate::doc! { "hello": "world" };
    assert_eq!(
        doc_bytes(&doc),
        b"\x16\x00\x00\x00\x02hello\x00\x06\x00\x00\x00world\x00\x00"
    );
}
