//! Fixed-output digests backing the keyed hash functions.
//!
//! XMSS only needs `update`/`finalize` over a digest with a fixed output size
//! n. The SHA-2 members are used directly; the SHAKE members are read to
//! exactly n bytes, which is how RFC 8391 instantiates them.

use sha2::{Digest, Sha256, Sha512};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake128, Shake256,
};
use tilia_core::{Error, Result};

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Digest algorithm selecting the hash primitive and the security parameter n.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// SHA-256, n = 32.
    Sha256,
    /// SHA-512, n = 64.
    Sha512,
    /// SHAKE128 read to 32 bytes, n = 32.
    Shake128,
    /// SHAKE256 read to 64 bytes, n = 64.
    Shake256,
}

impl DigestAlgorithm {
    /// Look up a digest by name ("SHA-256", "sha512", "SHAKE128", ...).
    ///
    /// Matching ignores ASCII case and dashes.
    pub fn from_name(name: &str) -> Result<Self> {
        let mut buf = [0u8; 16];
        let mut len = 0;
        for b in name.bytes().filter(|&b| b != b'-') {
            if len == buf.len() {
                return Err(Error::UnsupportedDigest);
            }
            buf[len] = b.to_ascii_uppercase();
            len += 1;
        }
        match &buf[..len] {
            b"SHA256" => Ok(Self::Sha256),
            b"SHA512" => Ok(Self::Sha512),
            b"SHAKE128" => Ok(Self::Shake128),
            b"SHAKE256" => Ok(Self::Shake256),
            _ => Err(Error::UnsupportedDigest),
        }
    }

    /// Canonical algorithm name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
            Self::Shake128 => "SHAKE128",
            Self::Shake256 => "SHAKE256",
        }
    }

    /// Output size n in bytes.
    #[must_use]
    pub const fn digest_size(self) -> usize {
        match self {
            Self::Sha256 | Self::Shake128 => 32,
            Self::Sha512 | Self::Shake256 => 64,
        }
    }

    /// Hash the concatenation of `parts`.
    ///
    /// Uses the streaming API so no concatenated copy of the (possibly
    /// secret) inputs is made.
    #[must_use]
    pub fn digest(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            Self::Sha256 => {
                let mut hasher = Sha256::new();
                for part in parts {
                    Digest::update(&mut hasher, part);
                }
                hasher.finalize().to_vec()
            }
            Self::Sha512 => {
                let mut hasher = Sha512::new();
                for part in parts {
                    Digest::update(&mut hasher, part);
                }
                hasher.finalize().to_vec()
            }
            Self::Shake128 => {
                let mut hasher = Shake128::default();
                for part in parts {
                    Update::update(&mut hasher, part);
                }
                let mut output = vec![0u8; 32];
                hasher.finalize_xof().read(&mut output);
                output
            }
            Self::Shake256 => {
                let mut hasher = Shake256::default();
                for part in parts {
                    Update::update(&mut hasher, part);
                }
                let mut output = vec![0u8; 64];
                hasher.finalize_xof().read(&mut output);
                output
            }
        }
    }
}

impl core::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
