//! Module containing functionality related to BSON binary values.

use std::fmt::{self, Display};

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::{
    error::{Error, Result},
    spec::BinarySubtype,
};

/// Represents a BSON binary value.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Binary {
    /// The subtype of the bytes.
    pub subtype: BinarySubtype,

    /// The binary bytes.
    pub bytes: Vec<u8>,
}

impl Default for Binary {
    fn default() -> Self {
        Binary {
            subtype: BinarySubtype::Generic,
            bytes: Vec::new(),
        }
    }
}

impl Display for Binary {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "Binary({:#x}, {})",
            u8::from(self.subtype),
            STANDARD.encode(&self.bytes)
        )
    }
}

impl Binary {
    /// Creates a [`Binary`] from a base64 string and optional [`BinarySubtype`].
    /// If the `subtype` argument is [`None`], the [`Binary`] constructed will
    /// default to [`BinarySubtype::Generic`].
    pub fn from_base64(
        input: impl AsRef<str>,
        subtype: impl Into<Option<BinarySubtype>>,
    ) -> Result<Self> {
        let bytes = STANDARD
            .decode(input.as_ref())
            .map_err(|e| Error::invalid_value(format!("invalid base64: {}", e)))?;
        let subtype = subtype.into().unwrap_or(BinarySubtype::Generic);
        Ok(Binary { subtype, bytes })
    }
}

/// An owned byte buffer that decodes from naked BSON bytes.
///
/// `Vec<u8>` cannot serve as a byte-sequence decode target, because the
/// blanket sequence impl for `Vec<T>` already claims it (and would decode it
/// from a BSON array of integers). Wrapping the buffer in `ByteBuf` selects
/// the byte-oriented conversions instead: generic/old-subtype binary payloads
/// and UTF-8 string bytes land here without interpretation.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct ByteBuf(pub Vec<u8>);

impl ByteBuf {
    /// Consumes the wrapper, returning the underlying bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for ByteBuf {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ByteBuf {
    fn from(bytes: Vec<u8>) -> Self {
        ByteBuf(bytes)
    }
}
