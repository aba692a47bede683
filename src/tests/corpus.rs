//! Structural well-formedness checks: malformed documents must fail with
//! `MalformedBytes` (or `UnknownElementType`) regardless of decode mode.

use assert_matches::assert_matches;

use crate::{
    de::{from_slice, from_slice_with_options, DecodeOptions},
    error::ErrorKind,
    tests::writer::{doc_bytes, raw_doc},
    Bson,
    Document,
};

fn decode_doc(bytes: &[u8]) -> crate::error::Result<Document> {
    let mut doc = Document::new();
    from_slice(bytes, &mut doc)?;
    Ok(doc)
}

#[test]
fn minimum_document_is_empty() {
    let doc = decode_doc(b"\x05\x00\x00\x00\x00").unwrap();
    assert!(doc.is_empty());

    let mut any = Bson::Null;
    from_slice(b"\x05\x00\x00\x00\x00", &mut any).unwrap();
    assert_eq!(any, Bson::Document(Document::new()));
}

#[test]
fn empty_input_is_an_error() {
    assert_matches!(
        decode_doc(b"").unwrap_err().kind,
        ErrorKind::MalformedBytes { .. }
    );
}

#[test]
fn truncated_input_is_an_error() {
    let bytes = doc_bytes(&doc! { "a": 1 });
    for len in 1..bytes.len() {
        assert!(decode_doc(&bytes[..len]).is_err(), "prefix of {} bytes", len);
    }
}

#[test]
fn declared_length_too_small_is_an_error() {
    // declared length 4 is below the five-byte minimum
    assert_matches!(
        decode_doc(b"\x04\x00\x00\x00\x00").unwrap_err().kind,
        ErrorKind::MalformedBytes { .. }
    );
}

#[test]
fn declared_length_beyond_buffer_is_an_error() {
    assert_matches!(
        decode_doc(b"\x06\x00\x00\x00\x00").unwrap_err().kind,
        ErrorKind::MalformedBytes { .. }
    );
}

#[test]
fn negative_declared_length_is_an_error() {
    assert_matches!(
        decode_doc(b"\xfb\xff\xff\xff\x00").unwrap_err().kind,
        ErrorKind::MalformedBytes { .. }
    );
}

#[test]
fn missing_terminator_is_an_error() {
    assert_matches!(
        decode_doc(b"\x05\x00\x00\x00\x01").unwrap_err().kind,
        ErrorKind::MalformedBytes { .. }
    );
}

#[test]
fn trailing_bytes_rejected_unless_allowed() {
    let mut bytes = doc_bytes(&doc! { "a": 1 });
    bytes.push(0xFF);

    assert_matches!(
        decode_doc(&bytes).unwrap_err().kind,
        ErrorKind::MalformedBytes { .. }
    );

    let mut doc = Document::new();
    from_slice_with_options(
        &bytes,
        &mut doc,
        DecodeOptions {
            allow_trailing: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(doc, doc! { "a": 1 });
}

#[test]
fn zero_length_string_is_an_error() {
    // string element whose declared length is 0 (must be >= 1 for the NUL)
    let bytes = raw_doc(b"\x02a\x00\x00\x00\x00\x00");
    assert_matches!(
        decode_doc(&bytes).unwrap_err().kind,
        ErrorKind::MalformedBytes { .. }
    );
}

#[test]
fn unterminated_string_is_an_error() {
    // declared length 3, but the last payload byte is not NUL
    let bytes = raw_doc(b"\x02a\x00\x03\x00\x00\x00abc");
    assert_matches!(
        decode_doc(&bytes).unwrap_err().kind,
        ErrorKind::MalformedBytes { .. }
    );
}

#[test]
fn invalid_utf8_string_is_an_error() {
    let bytes = raw_doc(b"\x02a\x00\x03\x00\x00\x00\xc3\x28\x00");
    assert_matches!(
        decode_doc(&bytes).unwrap_err().kind,
        ErrorKind::Utf8Encoding { .. }
    );
}

#[test]
fn bad_boolean_byte_is_an_error() {
    let bytes = raw_doc(b"\x08b\x00\x02");
    assert_matches!(
        decode_doc(&bytes).unwrap_err().kind,
        ErrorKind::MalformedBytes { .. }
    );
}

#[test]
fn unknown_element_kind_is_an_error() {
    let bytes = raw_doc(b"\x42a\x00\x01\x00\x00\x00");
    let err = decode_doc(&bytes).unwrap_err();
    assert_matches!(err.kind, ErrorKind::UnknownElementType { tag: 0x42 });

    // unknown kinds are structural: lenient mode must not skip past them
    let mut doc = Document::new();
    assert!(from_slice(&bytes, &mut doc).is_err());
}

#[test]
fn binary_old_with_inconsistent_inner_length_is_an_error() {
    // outer length 8, subtype 0x02, inner length claims 3 instead of 4
    let bytes = raw_doc(b"\x05bin\x00\x08\x00\x00\x00\x02\x03\x00\x00\x00\xde\xad\xbe\xef");
    assert_matches!(
        decode_doc(&bytes).unwrap_err().kind,
        ErrorKind::MalformedBytes { .. }
    );
}

#[test]
fn nested_corruption_is_fatal_even_in_lenient_mode() {
    // well-formed outer doc, inner doc with a bad boolean byte, decoded
    // into a target that does not even want the inner doc
    let mut inner = raw_doc(b"\x08b\x00\x02");
    let mut body = Vec::new();
    body.push(0x03);
    body.extend_from_slice(b"sub\x00");
    body.append(&mut inner);
    let bytes = raw_doc(&body);

    let mut entries: crate::Entries = Default::default();
    assert!(from_slice(&bytes, &mut entries).is_err());
}

#[test]
fn code_with_scope_must_consume_its_declared_length() {
    // code "x" plus empty scope, but the element's total length claims one
    // byte more than its parts account for
    let mut payload = Vec::new();
    payload.extend_from_slice(&15i32.to_le_bytes());
    payload.extend_from_slice(b"\x02\x00\x00\x00x\x00");
    payload.extend_from_slice(b"\x05\x00\x00\x00\x00");
    // actual: 4 + 6 + 5 = 15; corrupt the declared total to 16
    payload[0] = 16;
    let mut body = vec![0x0F];
    body.extend_from_slice(b"js\x00");
    body.extend_from_slice(&payload);
    // patch the *element*'s inner length back so the sizer accepts it but
    // the parts mismatch: declared 16 vs 15 bytes of content would overrun
    // the document, so the sizer itself must reject it
    let bytes = raw_doc(&body);
    assert!(decode_doc(&bytes).is_err());
}

#[test]
fn document_length_must_match_consumed_bytes() {
    // an inner document whose declared length covers its bytes but whose
    // terminator appears early, leaving slack before the declared end
    let mut inner = raw_doc(b"\x08b\x00\x01");
    inner.push(0x00); // slack after the terminator, itself zero so the
    // envelope checks pass and only the cursor-position check can catch it
    let len = inner.len() as i32;
    inner[0..4].copy_from_slice(&len.to_le_bytes());

    let mut body = vec![0x03];
    body.extend_from_slice(b"sub\x00");
    body.extend_from_slice(&inner);
    let bytes = raw_doc(&body);

    assert_matches!(
        decode_doc(&bytes).unwrap_err().kind,
        ErrorKind::MalformedBytes { .. }
    );
}
