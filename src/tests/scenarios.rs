//! End-to-end decoding scenarios over hand-checked wire bytes.

use std::collections::HashMap;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use crate::{
    de::{from_slice, from_slice_with_options, DecodeOptions},
    doc,
    error::ErrorKind,
    spec::BinarySubtype,
    tests::writer::{doc_bytes, raw_doc},
    Binary,
    Bson,
    ByteBuf,
    DateTime,
    Document,
};

#[test]
fn hello_world_into_mapping() {
    let bytes = b"\x16\x00\x00\x00\x02hello\x00\x06\x00\x00\x00world\x00\x00";

    let mut map: HashMap<String, String> = HashMap::new();
    from_slice(bytes, &mut map).unwrap();
    assert_eq!(map, HashMap::from([("hello".to_owned(), "world".to_owned())]));

    let mut doc = Document::new();
    from_slice(bytes, &mut doc).unwrap();
    assert_eq!(doc, doc! { "hello": "world" });
}

#[derive(Debug, Default, PartialEq)]
struct OnlyA {
    a: i32,
}

impl_record! {
    OnlyA {
        fields: { "a" => a },
    }
}

#[test]
fn two_ints_into_mapping_and_partial_record() {
    let bytes = b"\x13\x00\x00\x00\x10a\x00\x01\x00\x00\x00\x10b\x00\x02\x00\x00\x00\x00";

    let mut map: HashMap<String, i32> = HashMap::new();
    from_slice(bytes, &mut map).unwrap();
    assert_eq!(map, HashMap::from([("a".to_owned(), 1), ("b".to_owned(), 2)]));

    // lenient: `b` has no field and is silently dropped
    let mut record = OnlyA::default();
    from_slice(bytes, &mut record).unwrap();
    assert_eq!(record, OnlyA { a: 1 });

    // strict: unmapped names in records are still skipped, never an error
    let mut record = OnlyA::default();
    from_slice_with_options(
        bytes,
        &mut record,
        DecodeOptions {
            strict: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(record, OnlyA { a: 1 });
}

#[test]
fn zero_datetime_sentinel() {
    let bytes = doc_bytes(&doc! { "when": DateTime::from_millis(-62_135_596_800_000) });

    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();
    assert_eq!(doc.get_datetime("when"), Some(DateTime::ZERO));

    // every other value is plain unix-epoch + millis
    let bytes = doc_bytes(&doc! { "when": DateTime::from_millis(1_609_459_200_000) });
    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();
    assert_eq!(
        doc.get_datetime("when").unwrap().to_time().year(),
        2021
    );
}

#[derive(Debug, Default, PartialEq)]
struct ThreeInts {
    values: [i32; 3],
}

impl_record! {
    ThreeInts {
        fields: { "values" => values },
    }
}

#[derive(Debug, Default, PartialEq)]
struct TwoInts {
    values: [i32; 2],
}

impl_record! {
    TwoInts {
        fields: { "values" => values },
    }
}

#[test]
fn array_into_fixed_length_targets() {
    let bytes = doc_bytes(&doc! { "values": [10, 20, 30] });

    let mut record = ThreeInts::default();
    from_slice(&bytes, &mut record).unwrap();
    assert_eq!(record.values, [10, 20, 30]);

    // a length mismatch is fatal even in lenient mode
    let mut record = TwoInts::default();
    let err = from_slice(&bytes, &mut record).unwrap_err();
    assert_matches!(
        err.kind,
        ErrorKind::LengthMismatch {
            expected: 2,
            actual: 3
        }
    );

    let mut vec: Vec<i32> = Vec::new();
    from_slice(&bytes, &mut vec).unwrap();
    assert_eq!(vec, vec![10, 20, 30]);
}

#[test]
fn array_element_names_are_ignored() {
    // array whose keys are nonsense; values must land in wire order anyway
    let inner = raw_doc(
        b"\x10zz\x00\x0a\x00\x00\x00\x10\x00\x14\x00\x00\x00\x109\x00\x1e\x00\x00\x00",
    );
    let mut body = vec![0x04];
    body.extend_from_slice(b"values\x00");
    body.extend_from_slice(&inner);
    let bytes = raw_doc(&body);

    let mut record = ThreeInts::default();
    from_slice(&bytes, &mut record).unwrap();
    assert_eq!(record.values, [10, 20, 30]);
}

#[derive(Debug, Default, PartialEq)]
struct BinHolder {
    bin: ByteBuf,
}

impl_record! {
    BinHolder {
        fields: { "bin" => bin },
    }
}

#[test]
fn old_binary_subtype_unwraps_to_naked_bytes() {
    // subtype 0x02 carries a redundant inner length before the data
    let bytes =
        raw_doc(b"\x05bin\x00\x08\x00\x00\x00\x02\x04\x00\x00\x00\xde\xad\xbe\xef");

    let mut holder = BinHolder::default();
    from_slice(&bytes, &mut holder).unwrap();
    assert_eq!(holder.bin.as_ref(), &[0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn user_defined_binary_subtype_stays_wrapped() {
    let bytes = raw_doc(b"\x05bin\x00\x04\x00\x00\x00\x80\xde\xad\xbe\xef");

    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();
    assert_eq!(
        doc.get("bin"),
        Some(&Bson::Binary(Binary {
            subtype: BinarySubtype::UserDefined(0x80),
            bytes: vec![0xDE, 0xAD, 0xBE, 0xEF],
        }))
    );

    // wrapped form into a structured binary target as well
    #[derive(Default)]
    struct Wrapped {
        bin: Binary,
    }
    impl_record! {
        Wrapped {
            fields: { "bin" => bin },
        }
    }
    let mut wrapped = Wrapped::default();
    from_slice(&bytes, &mut wrapped).unwrap();
    assert_eq!(wrapped.bin.subtype, BinarySubtype::UserDefined(0x80));
    assert_eq!(wrapped.bin.bytes, vec![0xDE, 0xAD, 0xBE, 0xEF]);

    // a user-defined subtype is not a naked byte run
    let mut holder = BinHolder::default();
    let err = from_slice_with_options(
        &bytes,
        &mut holder,
        DecodeOptions {
            strict: true,
            ..Default::default()
        },
    )
    .unwrap_err();
    assert_matches!(err.kind, ErrorKind::UnexpectedType { .. });
}

#[test]
fn round_trip_through_polymorphic_target() {
    let original = doc! {
        "x": 3.14,
        "y": [1, 2, 3],
        "z": { "w": true },
    };
    let bytes = doc_bytes(&original);

    let mut any = Bson::Null;
    from_slice(&bytes, &mut any).unwrap();

    // the top shape is the default document shape
    assert_eq!(any, bson!({ "x": 3.14, "y": [1, 2, 3], "z": { "w": true } }));
    let decoded = match any {
        Bson::Document(doc) => doc,
        other => panic!("expected document, got {:?}", other),
    };
    assert_eq!(doc_bytes(&decoded), bytes);
}

#[test]
fn nested_anys_share_the_default_document_shape() {
    let bytes = doc_bytes(&doc! { "a": { "b": { "c": 1 } } });

    let mut doc = Document::new();
    from_slice(&bytes, &mut doc).unwrap();

    let b = doc.get_document("a").unwrap().get("b").unwrap();
    assert_matches!(b, Bson::Document(_));
}
