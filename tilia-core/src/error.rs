//! Error types for Tilia signature operations.

use core::fmt;

/// Result type alias using [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Broad category of an [`Error`].
///
/// Every error is fatal for the call that produced it and is never retried
/// internally: retrying a signature with a stale index could reuse a
/// one-time key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested parameter set cannot be constructed.
    Configuration,
    /// An input has the wrong length or is outside its valid range.
    InvalidArgument,
    /// The operation is not allowed in the current state of the object.
    IllegalState,
    /// A serialized blob could not be decoded.
    Parse,
}

/// Errors that can occur during key generation, signing and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Digest algorithm is not supported.
    UnsupportedDigest,

    /// Winternitz parameter is not 4 or 16.
    UnsupportedWinternitzParameter {
        /// Requested Winternitz parameter.
        w: u32,
    },

    /// Tree height outside the supported range.
    InvalidTreeHeight {
        /// Requested height.
        height: u32,
        /// Smallest accepted height.
        min: u32,
        /// Largest accepted height.
        max: u32,
    },

    /// Multi-tree total height is not a multiple of the layer count.
    HeightNotDivisible {
        /// Total height of the hypertree.
        total_height: u32,
        /// Number of layers.
        layers: u32,
    },

    /// No parameter set is registered under this identifier.
    UnknownOid {
        /// The identifier that was looked up.
        oid: u32,
    },

    /// Input has the wrong byte length.
    InvalidLength {
        /// What was being checked.
        what: &'static str,
        /// Expected length in bytes.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },

    /// WOTS+ chain request runs past the end of the chain.
    ChainOutOfRange {
        /// Starting position in the chain.
        start: u32,
        /// Number of steps requested.
        steps: u32,
        /// Winternitz parameter of the chain.
        w: u32,
    },

    /// Node heights differ where a combine step needs equal heights.
    HeightMismatch {
        /// Height of the left node.
        left: u32,
        /// Height of the right node.
        right: u32,
    },

    /// Every one-time key of this private key has been used.
    KeyExhausted {
        /// Number of signatures the key was able to produce.
        capacity: u64,
    },

    /// A tree-hash instance was updated before initialization or after completion.
    TreeHashNotActive,

    /// An authentication-path node was requested before it was computed.
    AuthPathUnavailable {
        /// Height of the missing node.
        height: u32,
    },

    /// The lock guarding a signing key was poisoned by a panic mid-sign.
    KeyPoisoned,

    /// Serialized data has the wrong length or a malformed field.
    InvalidEncoding {
        /// What was being decoded.
        what: &'static str,
        /// Expected length in bytes.
        expected: usize,
        /// Actual length provided.
        actual: usize,
    },

    /// A decoded index does not fit the tree.
    IndexOutOfRange {
        /// Decoded index.
        index: u64,
        /// Number of leaves, i.e. the first invalid index.
        limit: u64,
    },

    /// Address type word is not OTS, L-tree or hash tree.
    InvalidAddressType {
        /// Decoded type word.
        value: u32,
    },

    /// A decoded private key's root does not match the tree its seeds build.
    RootMismatch,
}

impl Error {
    /// Taxonomy category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedDigest
            | Error::UnsupportedWinternitzParameter { .. }
            | Error::InvalidTreeHeight { .. }
            | Error::HeightNotDivisible { .. }
            | Error::UnknownOid { .. } => ErrorKind::Configuration,
            Error::InvalidLength { .. }
            | Error::ChainOutOfRange { .. }
            | Error::HeightMismatch { .. } => ErrorKind::InvalidArgument,
            Error::KeyExhausted { .. }
            | Error::TreeHashNotActive
            | Error::AuthPathUnavailable { .. }
            | Error::KeyPoisoned => ErrorKind::IllegalState,
            Error::InvalidEncoding { .. }
            | Error::IndexOutOfRange { .. }
            | Error::InvalidAddressType { .. }
            | Error::RootMismatch => ErrorKind::Parse,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedDigest => write!(f, "unsupported digest algorithm"),
            Error::UnsupportedWinternitzParameter { w } => {
                write!(f, "unsupported Winternitz parameter {w}: expected 4 or 16")
            }
            Error::InvalidTreeHeight { height, min, max } => {
                write!(f, "invalid tree height {height}: expected {min}..={max}")
            }
            Error::HeightNotDivisible {
                total_height,
                layers,
            } => {
                write!(
                    f,
                    "total height {total_height} is not divisible by {layers} layers"
                )
            }
            Error::UnknownOid { oid } => write!(f, "unknown parameter set oid {oid:#010x}"),
            Error::InvalidLength {
                what,
                expected,
                actual,
            } => {
                write!(f, "invalid {what} length: expected {expected}, got {actual}")
            }
            Error::ChainOutOfRange { start, steps, w } => {
                write!(
                    f,
                    "chain of {steps} steps from {start} exceeds w - 1 = {}",
                    w - 1
                )
            }
            Error::HeightMismatch { left, right } => {
                write!(f, "cannot combine nodes of height {left} and {right}")
            }
            Error::KeyExhausted { capacity } => {
                write!(f, "private key exhausted after {capacity} signatures")
            }
            Error::TreeHashNotActive => write!(f, "tree hash instance is not active"),
            Error::AuthPathUnavailable { height } => {
                write!(f, "authentication node at height {height} is not available")
            }
            Error::KeyPoisoned => write!(f, "signing key lock poisoned"),
            Error::InvalidEncoding {
                what,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "invalid {what} encoding: expected {expected} bytes, got {actual}"
                )
            }
            Error::IndexOutOfRange { index, limit } => {
                write!(f, "index {index} out of range: limit {limit}")
            }
            Error::InvalidAddressType { value } => write!(f, "invalid address type {value}"),
            Error::RootMismatch => write!(f, "private key root does not match its seeds"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
