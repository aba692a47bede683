//! Contains the error-related types for the `bsondec` crate.

use thiserror::Error;

/// The result type for all methods that can return an error in the `bsondec` crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur while decoding BSON.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,

    /// The document key associated with the error, if any.
    pub key: Option<String>,

    /// The array index associated with the error, if any.
    pub index: Option<usize>,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BSON decode error")?;

        if let Some(key) = self.key.as_deref() {
            write!(f, " at key \"{key}\"")?;
        }
        if let Some(index) = self.index {
            write!(f, " at array index {index}")?;
        }

        write!(f, ". Kind: {}.", self.kind)
    }
}

/// The types of errors that can occur while decoding BSON.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed BSON bytes were encountered. Always fatal for the whole
    /// decode.
    #[error("malformed BSON bytes: {message}")]
    #[non_exhaustive]
    MalformedBytes {
        /// A message describing the corruption.
        message: String,
    },

    /// Invalid UTF-8 bytes were encountered.
    #[error("invalid UTF-8")]
    #[non_exhaustive]
    Utf8Encoding {},

    /// An element carried a tag outside the BSON specification.
    #[error("unknown element type tag {tag:#04x}")]
    #[non_exhaustive]
    UnknownElementType {
        /// The unrecognized tag byte.
        tag: u8,
    },

    /// An element's value cannot be converted into the requested target.
    /// In lenient mode the document decoder drops the element and continues.
    #[error("cannot decode {from} into {to}")]
    #[non_exhaustive]
    UnexpectedType {
        /// The wire element type.
        from: &'static str,
        /// The target the caller asked for.
        to: &'static str,
    },

    /// A fixed-length sequence target did not match the wire array length.
    #[error("sequence length mismatch: expected {expected}, got {actual}")]
    #[non_exhaustive]
    LengthMismatch {
        /// The length the target declares.
        expected: usize,
        /// The number of elements the wire array carried.
        actual: usize,
    },

    /// A map target with a numeric key type received a key that does not
    /// parse as a number.
    #[error("invalid map key {key:?}: {message}")]
    #[non_exhaustive]
    InvalidKey {
        /// The offending element name.
        key: String,
        /// A message describing the parse failure.
        message: String,
    },

    /// A value was structurally fine but semantically unusable for the
    /// target (negative duration, unparsable URL). Fatal regardless of mode.
    #[error("invalid value: {message}")]
    #[non_exhaustive]
    InvalidValue {
        /// A message describing the failure.
        message: String,
    },

    /// A document was handed to a target no document can inhabit.
    #[error("unsupported document target: {target}")]
    #[non_exhaustive]
    UnsupportedTarget {
        /// The name of the rejected target shape.
        target: &'static str,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            key: None,
            index: None,
        }
    }
}

impl Error {
    pub(crate) fn with_key(mut self, key: impl Into<String>) -> Self {
        if self.key.is_none() {
            self.key = Some(key.into());
        }
        self
    }

    pub(crate) fn with_index(mut self, index: usize) -> Self {
        if self.index.is_none() {
            self.index = Some(index);
        }
        self
    }

    pub(crate) fn malformed_bytes(message: impl ToString) -> Self {
        Self::from(ErrorKind::MalformedBytes {
            message: message.to_string(),
        })
    }

    /// Builds a kind/target mismatch error. Hook implementations return this
    /// to mark an element as not-for-this-target, which lenient decoding
    /// recovers from by dropping the element.
    pub fn unexpected_type(from: &'static str, to: &'static str) -> Self {
        Self::from(ErrorKind::UnexpectedType { from, to })
    }

    /// Builds an [`ErrorKind::InvalidValue`] error, fatal regardless of
    /// decode mode. Hook implementations use this for failures that are not
    /// kind/target mismatches.
    pub fn invalid_value(message: impl ToString) -> Self {
        Self::from(ErrorKind::InvalidValue {
            message: message.to_string(),
        })
    }

    /// Whether this error is a kind/target mismatch, the class of error the
    /// lenient document decoder recovers from by dropping the element.
    pub fn is_unexpected_type(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedType { .. })
    }

    /// Whether this error reports malformed input bytes.
    pub fn is_malformed_bytes(&self) -> bool {
        matches!(self.kind, ErrorKind::MalformedBytes { .. })
    }
}
