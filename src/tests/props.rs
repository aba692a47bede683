//! Property tests: documents built from canonical natural types survive an
//! encode/decode round trip unchanged.

use proptest::prelude::*;

use crate::{
    de::from_slice,
    spec::BinarySubtype,
    tests::writer::doc_bytes,
    Binary,
    Bson,
    DateTime,
    Document,
    ObjectId,
    Timestamp,
};

fn arbitrary_leaf() -> impl Strategy<Value = Bson> {
    prop_oneof![
        any::<i32>().prop_map(Bson::Int32),
        any::<i64>().prop_map(Bson::Int64),
        any::<f64>().prop_filter("NaN is not equal to itself", |f| !f.is_nan())
            .prop_map(Bson::Double),
        any::<bool>().prop_map(Bson::Boolean),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Bson::String),
        Just(Bson::Null),
        proptest::collection::vec(any::<u8>(), 0..16).prop_map(|bytes| {
            Bson::Binary(Binary {
                subtype: BinarySubtype::Generic,
                bytes,
            })
        }),
        any::<[u8; 12]>().prop_map(|b| Bson::ObjectId(ObjectId::from_bytes(b))),
        any::<i64>().prop_map(|ms| Bson::DateTime(DateTime::from_millis(ms))),
        any::<(u32, u32)>().prop_map(|(time, increment)| {
            Bson::Timestamp(Timestamp { time, increment })
        }),
    ]
}

fn arbitrary_bson() -> impl Strategy<Value = Bson> {
    arbitrary_leaf().prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Bson::Array),
            proptest::collection::vec(("[a-z]{1,8}", inner), 0..6).prop_map(|entries| {
                Bson::Document(entries.into_iter().collect())
            }),
        ]
    })
}

fn arbitrary_doc() -> impl Strategy<Value = Document> {
    proptest::collection::vec(("[a-z]{1,8}", arbitrary_bson()), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #[test]
    fn round_trip_canonical_documents(doc in arbitrary_doc()) {
        let bytes = doc_bytes(&doc);

        let mut decoded = Document::new();
        from_slice(&bytes, &mut decoded).unwrap();
        prop_assert_eq!(&decoded, &doc);

        // re-encoding the decoded document reproduces the wire bytes
        prop_assert_eq!(doc_bytes(&decoded), bytes);
    }

    #[test]
    fn arbitrary_prefixes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut doc = Document::new();
        let _ = from_slice(&bytes, &mut doc);
    }
}
