//! [BSON Decimal128](https://github.com/mongodb/specifications/blob/master/source/bson-decimal128/decimal128.md) data type representation

use std::fmt;

/// Struct representing a BSON Decimal128 value.
///
/// This type holds the raw 16-byte little-endian representation and can only
/// be round-tripped from existing documents; no decimal arithmetic is
/// provided.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Decimal128 {
    /// BSON bytes containing the decimal128. Stored for round tripping.
    pub(crate) bytes: [u8; 16],
}

impl Decimal128 {
    /// Constructs a new `Decimal128` from the provided raw byte representation.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self { bytes }
    }

    /// Returns the raw byte representation of this `Decimal128`.
    pub const fn bytes(&self) -> [u8; 16] {
        self.bytes
    }

    /// The value split into its low and high 64-bit halves, little-endian.
    pub fn to_le_parts(&self) -> (u64, u64) {
        let low = u64::from_le_bytes(self.bytes[0..8].try_into().unwrap());
        let high = u64::from_le_bytes(self.bytes[8..16].try_into().unwrap());
        (low, high)
    }

    /// Builds a `Decimal128` from its low and high 64-bit halves.
    pub fn from_le_parts(low: u64, high: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&low.to_le_bytes());
        bytes[8..16].copy_from_slice(&high.to_le_bytes());
        Self { bytes }
    }
}

impl fmt::Debug for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Decimal128(0x{})", hex::encode(self.bytes))
    }
}

impl fmt::Display for Decimal128 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.bytes))
    }
}
