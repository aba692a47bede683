#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[doc(inline)]
pub use self::{
    binary::{Binary, ByteBuf},
    bson::{Array, Bson, DbPointer, JavaScriptCodeWithScope, Regex, Timestamp},
    datetime::DateTime,
    de::{from_slice, from_slice_with_options, DecodeOptions, JsonNumber},
    decimal128::Decimal128,
    document::{Document, Entries, RawEntries},
    oid::ObjectId,
    raw::RawElement,
};

#[macro_use]
mod macros;
pub mod binary;
mod bson;
pub mod datetime;
pub mod de;
pub mod decimal128;
pub mod document;
pub mod error;
pub mod oid;
pub mod raw;
pub mod spec;

#[cfg(test)]
mod tests;
