//! Cursor-based access to raw BSON bytes.
//!
//! This module holds the two lowest layers of the decoder: [`Reader`], a
//! bounds-checked cursor over the input buffer, and [`element_size`], the pure
//! function that computes how many payload bytes an element occupies without
//! moving any cursor. Everything above (the element and document decoders in
//! [`crate::de`]) is built on these two.
//!
//! All corruption is reported as [`ErrorKind::MalformedBytes`] through
//! [`Result`] values; nothing in this module panics on malformed input.

use crate::{
    error::{Error, ErrorKind, Result},
    spec::ElementType,
};

/// Minimum number of bytes a BSON document can occupy: a 4-byte length and the
/// trailing NUL.
pub(crate) const MIN_BSON_DOCUMENT_SIZE: usize = 4 + 1;

/// Minimum number of bytes a length-prefixed string can occupy: a 4-byte
/// length and the trailing NUL.
pub(crate) const MIN_BSON_STRING_SIZE: usize = 4 + 1;

/// Minimum number of bytes a code-with-scope payload can occupy: its own
/// 4-byte length, a minimal string, and a minimal document.
pub(crate) const MIN_CODE_WITH_SCOPE_SIZE: usize = 4 + MIN_BSON_STRING_SIZE + MIN_BSON_DOCUMENT_SIZE;

pub(crate) fn checked_add(lhs: usize, rhs: usize) -> Result<usize> {
    lhs.checked_add(rhs)
        .ok_or_else(|| Error::malformed_bytes("attempted to add with overflow"))
}

pub(crate) fn try_to_str(data: &[u8]) -> Result<&str> {
    simdutf8::basic::from_utf8(data).map_err(|_| ErrorKind::Utf8Encoding {}.into())
}

pub(crate) fn usize_try_from_i32(i: i32) -> Result<usize> {
    usize::try_from(i).map_err(|_| Error::malformed_bytes(format!("negative length: {}", i)))
}

/// A bounds-checked cursor over a byte buffer.
///
/// Every read advances the cursor by exactly the bytes consumed; a read that
/// would move past the end of the buffer fails without advancing.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// The current cursor position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// Whether the cursor has consumed the whole buffer.
    pub fn is_at_end(&self) -> bool {
        self.pos == self.buf.len()
    }

    fn overrun(&self, wanted: usize) -> Error {
        Error::malformed_bytes(format!(
            "length exceeds remaining length of buffer: {} vs {}",
            wanted,
            self.buf.len() - self.pos
        ))
    }

    /// Reads `n` bytes, returning a slice borrowing from the buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = checked_add(self.pos, n)?;
        let slice = self
            .buf
            .get(self.pos..end)
            .ok_or_else(|| self.overrun(n))?;
        self.pos = end;
        Ok(slice)
    }

    /// Advances the cursor by `n` bytes without interpreting them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Reads a little-endian two's-complement 32-bit integer.
    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_le_bytes(bytes.try_into().expect("i32 is four bytes")))
    }

    /// Reads a little-endian two's-complement 64-bit integer.
    pub fn read_i64(&mut self) -> Result<i64> {
        let bytes = self.read_bytes(8)?;
        Ok(i64::from_le_bytes(bytes.try_into().expect("i64 is eight bytes")))
    }

    /// Reads a little-endian IEEE-754 double.
    pub fn read_f64(&mut self) -> Result<f64> {
        let bytes = self.read_bytes(8)?;
        Ok(f64::from_le_bytes(bytes.try_into().expect("f64 is eight bytes")))
    }

    /// Reads a boolean byte, which must be stored as 0 or 1.
    pub fn read_bool(&mut self) -> Result<bool> {
        let byte = self.read_u8()?;
        if byte > 1 {
            return Err(Error::malformed_bytes(format!(
                "boolean must be stored as 0 or 1, got {}",
                byte
            )));
        }
        Ok(byte != 0)
    }

    /// Reads bytes up to and including the next NUL, returning everything
    /// before the NUL as a UTF-8 string slice.
    pub fn read_cstr(&mut self) -> Result<&'a str> {
        let remainder = &self.buf[self.pos..];
        let nul = remainder
            .iter()
            .position(|b| *b == 0)
            .ok_or_else(|| Error::malformed_bytes("c-string without null terminator"))?;
        let s = try_to_str(&remainder[..nul])?;
        self.pos += nul + 1;
        Ok(s)
    }

    /// Reads a length-prefixed string: a 4-byte length `L`, then `L - 1`
    /// bytes of UTF-8, then a single NUL (checked).
    pub fn read_str(&mut self) -> Result<&'a str> {
        let len = usize_try_from_i32(self.read_i32()?)?;
        if len < 1 {
            return Err(Error::malformed_bytes(format!(
                "string length must be at least 1, got {}",
                len
            )));
        }
        let bytes = self.read_bytes(len)?;
        if bytes[len - 1] != 0 {
            return Err(Error::malformed_bytes("string not null terminated"));
        }
        try_to_str(&bytes[..len - 1])
    }
}

fn i32_at(buf: &[u8], offset: usize) -> Result<i32> {
    let arr: [u8; 4] = buf
        .get(offset..offset + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| {
            Error::malformed_bytes(format!(
                "expected 4 bytes to read i32 at offset {}, buffer has {}",
                offset,
                buf.len()
            ))
        })?;
    Ok(i32::from_le_bytes(arr))
}

fn len_at(buf: &[u8], offset: usize) -> Result<usize> {
    usize_try_from_i32(i32_at(buf, offset)?)
}

fn cstr_len_at(buf: &[u8], offset: usize) -> Result<usize> {
    let remainder = buf
        .get(offset..)
        .ok_or_else(|| Error::malformed_bytes("c-string beyond end of buffer"))?;
    match remainder.iter().position(|b| *b == 0) {
        Some(nul) => Ok(nul + 1),
        None => Err(Error::malformed_bytes("c-string without null terminator")),
    }
}

/// Computes the size of the sub-document (a length-prefixed, NUL-terminated
/// run) starting at `offset`.
fn document_size_at(buf: &[u8], offset: usize) -> Result<usize> {
    let size = len_at(buf, offset)?;
    if size < MIN_BSON_DOCUMENT_SIZE {
        return Err(Error::malformed_bytes(format!(
            "document too small: {} bytes",
            size
        )));
    }
    let end = checked_add(offset, size)?;
    if end > buf.len() {
        return Err(Error::malformed_bytes(format!(
            "document length {} exceeds remaining buffer length {}",
            size,
            buf.len() - offset
        )));
    }
    if buf[end - 1] != 0 {
        return Err(Error::malformed_bytes("document not null terminated"));
    }
    Ok(size)
}

/// Computes the size of the length-prefixed string starting at `offset`,
/// including the length prefix and the trailing NUL.
fn string_size_at(buf: &[u8], offset: usize) -> Result<usize> {
    let len = len_at(buf, offset)?;
    let size = checked_add(len, 4)?;
    if size < MIN_BSON_STRING_SIZE {
        return Err(Error::malformed_bytes(format!(
            "string length must be at least 1, got {}",
            len
        )));
    }
    let end = checked_add(offset, size)?;
    if end > buf.len() {
        return Err(Error::malformed_bytes(format!(
            "string length {} exceeds remaining buffer length {}",
            size,
            buf.len() - offset
        )));
    }
    if buf[end - 1] != 0 {
        return Err(Error::malformed_bytes("string not null terminated"));
    }
    Ok(size)
}

/// Returns the payload length in bytes of an element of type `kind` whose
/// payload begins at `offset` of `buf`.
///
/// This is a pure function over the buffer: it moves no cursor, and it is
/// used both to parse elements and to skip unwanted ones, so parsing and
/// skipping can never disagree about where the next element starts. All size
/// inconsistencies (declared lengths too small, overruns, missing
/// terminators) are reported as [`ErrorKind::MalformedBytes`].
pub fn element_size(kind: ElementType, offset: usize, buf: &[u8]) -> Result<usize> {
    let size = match kind {
        ElementType::Boolean => 1,
        ElementType::Int32 => 4,
        ElementType::Int64 => 8,
        ElementType::Double => 8,
        ElementType::DateTime => 8,
        ElementType::Timestamp => 8,
        ElementType::ObjectId => 12,
        ElementType::Decimal128 => 16,
        ElementType::Null => 0,
        ElementType::Undefined => 0,
        ElementType::MinKey => 0,
        ElementType::MaxKey => 0,
        ElementType::String => string_size_at(buf, offset)?,
        ElementType::Symbol => string_size_at(buf, offset)?,
        ElementType::JavaScriptCode => string_size_at(buf, offset)?,
        ElementType::EmbeddedDocument => document_size_at(buf, offset)?,
        ElementType::Array => document_size_at(buf, offset)?,
        ElementType::Binary => checked_add(len_at(buf, offset)?, 4 + 1)?,
        ElementType::RegularExpression => {
            let pattern = cstr_len_at(buf, offset)?;
            let options = cstr_len_at(buf, checked_add(offset, pattern)?)?;
            pattern + options
        }
        ElementType::DbPointer => checked_add(string_size_at(buf, offset)?, 12)?,
        ElementType::JavaScriptCodeWithScope => {
            let size = len_at(buf, offset)?;
            if size < MIN_CODE_WITH_SCOPE_SIZE {
                return Err(Error::malformed_bytes(format!(
                    "code with scope length too small: {} bytes",
                    size
                )));
            }
            let end = checked_add(offset, size)?;
            if end > buf.len() {
                return Err(Error::malformed_bytes(format!(
                    "code with scope length {} exceeds remaining buffer length {}",
                    size,
                    buf.len() - offset
                )));
            }
            if buf[end - 1] != 0 {
                return Err(Error::malformed_bytes("code with scope not null terminated"));
            }
            size
        }
    };

    let end = checked_add(offset, size)?;
    if end > buf.len() {
        return Err(Error::malformed_bytes(format!(
            "length exceeds remaining length of buffer: {} vs {}",
            size,
            buf.len() - offset
        )));
    }

    Ok(size)
}

/// A single element's worth of raw BSON: a wire kind and the unparsed payload
/// bytes, borrowed zero-copy from the input buffer.
///
/// For document and array elements the payload slice spans the whole inner
/// document, including its length prefix and trailing NUL, so it can be
/// handed back to [`crate::de::from_slice`] as-is. A `RawElement` remains
/// valid only for the lifetime of the buffer it was decoded from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawElement<'de> {
    kind: ElementType,
    bytes: &'de [u8],
}

impl Default for RawElement<'_> {
    fn default() -> Self {
        RawElement {
            kind: ElementType::Null,
            bytes: &[],
        }
    }
}

impl<'de> RawElement<'de> {
    pub(crate) fn new(kind: ElementType, bytes: &'de [u8]) -> Self {
        Self { kind, bytes }
    }

    /// The element's wire kind.
    pub fn element_type(&self) -> ElementType {
        self.kind
    }

    /// The element's unparsed payload bytes.
    pub fn bytes(&self) -> &'de [u8] {
        self.bytes
    }

    /// The payload length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty (true for `Null`, `Undefined`, `MinKey`
    /// and `MaxKey` elements).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reader_reads_exactly() {
        let buf = b"\x2a\x00\x00\x00hi\x00";
        let mut reader = Reader::new(buf);
        assert_eq!(reader.read_i32().unwrap(), 42);
        assert_eq!(reader.read_cstr().unwrap(), "hi");
        assert!(reader.is_at_end());
    }

    #[test]
    fn reader_rejects_overrun() {
        let mut reader = Reader::new(b"\x01\x02");
        assert!(reader.read_i32().is_err());
        // failed read must not advance
        assert_eq!(reader.pos(), 0);
    }

    #[test]
    fn reader_rejects_bad_bool() {
        assert!(Reader::new(b"\x02").read_bool().is_err());
        assert_eq!(Reader::new(b"\x01").read_bool().unwrap(), true);
        assert_eq!(Reader::new(b"\x00").read_bool().unwrap(), false);
    }

    #[test]
    fn reader_rejects_unterminated_string() {
        // declared length 3, but final byte is not NUL
        let mut reader = Reader::new(b"\x03\x00\x00\x00abc");
        assert!(reader.read_str().is_err());
    }

    #[test]
    fn sizer_fixed_widths() {
        let buf = [0u8; 32];
        assert_eq!(element_size(ElementType::Double, 0, &buf).unwrap(), 8);
        assert_eq!(element_size(ElementType::Boolean, 0, &buf).unwrap(), 1);
        assert_eq!(element_size(ElementType::ObjectId, 0, &buf).unwrap(), 12);
        assert_eq!(element_size(ElementType::Decimal128, 0, &buf).unwrap(), 16);
        assert_eq!(element_size(ElementType::Null, 0, &buf).unwrap(), 0);
        assert_eq!(element_size(ElementType::MinKey, 0, &buf).unwrap(), 0);
    }

    #[test]
    fn sizer_string() {
        // "world": length 6, five bytes, NUL
        let buf = b"\x06\x00\x00\x00world\x00";
        assert_eq!(element_size(ElementType::String, 0, buf).unwrap(), 10);
        // zero length is too small
        assert!(element_size(ElementType::String, 0, b"\x00\x00\x00\x00").is_err());
    }

    #[test]
    fn sizer_regex_scans_two_cstrings() {
        let buf = b"abc\x00i\x00";
        assert_eq!(
            element_size(ElementType::RegularExpression, 0, buf).unwrap(),
            6
        );
        assert!(element_size(ElementType::RegularExpression, 0, b"abc\x00i").is_err());
    }

    #[test]
    fn sizer_rejects_small_document() {
        let buf = b"\x04\x00\x00\x00";
        assert!(element_size(ElementType::EmbeddedDocument, 0, buf).is_err());
    }
}
