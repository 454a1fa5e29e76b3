//! RFC 8391 parameter set identifiers.
//!
//! Static lookup tables mapping digest, Winternitz parameter, chain count and
//! tree shape to the 32-bit identifiers registered for XMSS and XMSS-MT. Only
//! w = 16 sets are registered.

use crate::digest::DigestAlgorithm;

/// A registered parameter set identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Oid {
    /// Numeric identifier.
    pub value: u32,
    /// Registered name, e.g. `XMSS-SHA2_10_256`.
    pub name: &'static str,
}

/// One row of the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Entry {
    pub value: u32,
    pub name: &'static str,
    pub digest: DigestAlgorithm,
    pub w: u32,
    pub height: u32,
    pub layers: u32,
}

impl Entry {
    const fn new(value: u32, name: &'static str, digest: DigestAlgorithm, height: u32, layers: u32) -> Self {
        Self {
            value,
            name,
            digest,
            w: 16,
            height,
            layers,
        }
    }

    const fn len(&self) -> usize {
        match self.digest.digest_size() {
            32 => 67,
            _ => 131,
        }
    }

    const fn oid(&self) -> Oid {
        Oid {
            value: self.value,
            name: self.name,
        }
    }
}

use DigestAlgorithm::{Sha256, Sha512, Shake128, Shake256};

const XMSS: [Entry; 12] = [
    Entry::new(0x01, "XMSS-SHA2_10_256", Sha256, 10, 1),
    Entry::new(0x02, "XMSS-SHA2_16_256", Sha256, 16, 1),
    Entry::new(0x03, "XMSS-SHA2_20_256", Sha256, 20, 1),
    Entry::new(0x04, "XMSS-SHA2_10_512", Sha512, 10, 1),
    Entry::new(0x05, "XMSS-SHA2_16_512", Sha512, 16, 1),
    Entry::new(0x06, "XMSS-SHA2_20_512", Sha512, 20, 1),
    Entry::new(0x07, "XMSS-SHAKE_10_256", Shake128, 10, 1),
    Entry::new(0x08, "XMSS-SHAKE_16_256", Shake128, 16, 1),
    Entry::new(0x09, "XMSS-SHAKE_20_256", Shake128, 20, 1),
    Entry::new(0x0a, "XMSS-SHAKE_10_512", Shake256, 10, 1),
    Entry::new(0x0b, "XMSS-SHAKE_16_512", Shake256, 16, 1),
    Entry::new(0x0c, "XMSS-SHAKE_20_512", Shake256, 20, 1),
];

const XMSSMT: [Entry; 32] = [
    Entry::new(0x01, "XMSSMT-SHA2_20/2_256", Sha256, 20, 2),
    Entry::new(0x02, "XMSSMT-SHA2_20/4_256", Sha256, 20, 4),
    Entry::new(0x03, "XMSSMT-SHA2_40/2_256", Sha256, 40, 2),
    Entry::new(0x04, "XMSSMT-SHA2_40/4_256", Sha256, 40, 4),
    Entry::new(0x05, "XMSSMT-SHA2_40/8_256", Sha256, 40, 8),
    Entry::new(0x06, "XMSSMT-SHA2_60/3_256", Sha256, 60, 3),
    Entry::new(0x07, "XMSSMT-SHA2_60/6_256", Sha256, 60, 6),
    Entry::new(0x08, "XMSSMT-SHA2_60/12_256", Sha256, 60, 12),
    Entry::new(0x09, "XMSSMT-SHA2_20/2_512", Sha512, 20, 2),
    Entry::new(0x0a, "XMSSMT-SHA2_20/4_512", Sha512, 20, 4),
    Entry::new(0x0b, "XMSSMT-SHA2_40/2_512", Sha512, 40, 2),
    Entry::new(0x0c, "XMSSMT-SHA2_40/4_512", Sha512, 40, 4),
    Entry::new(0x0d, "XMSSMT-SHA2_40/8_512", Sha512, 40, 8),
    Entry::new(0x0e, "XMSSMT-SHA2_60/3_512", Sha512, 60, 3),
    Entry::new(0x0f, "XMSSMT-SHA2_60/6_512", Sha512, 60, 6),
    Entry::new(0x10, "XMSSMT-SHA2_60/12_512", Sha512, 60, 12),
    Entry::new(0x11, "XMSSMT-SHAKE_20/2_256", Shake128, 20, 2),
    Entry::new(0x12, "XMSSMT-SHAKE_20/4_256", Shake128, 20, 4),
    Entry::new(0x13, "XMSSMT-SHAKE_40/2_256", Shake128, 40, 2),
    Entry::new(0x14, "XMSSMT-SHAKE_40/4_256", Shake128, 40, 4),
    Entry::new(0x15, "XMSSMT-SHAKE_40/8_256", Shake128, 40, 8),
    Entry::new(0x16, "XMSSMT-SHAKE_60/3_256", Shake128, 60, 3),
    Entry::new(0x17, "XMSSMT-SHAKE_60/6_256", Shake128, 60, 6),
    Entry::new(0x18, "XMSSMT-SHAKE_60/12_256", Shake128, 60, 12),
    Entry::new(0x19, "XMSSMT-SHAKE_20/2_512", Shake256, 20, 2),
    Entry::new(0x1a, "XMSSMT-SHAKE_20/4_512", Shake256, 20, 4),
    Entry::new(0x1b, "XMSSMT-SHAKE_40/2_512", Shake256, 40, 2),
    Entry::new(0x1c, "XMSSMT-SHAKE_40/4_512", Shake256, 40, 4),
    Entry::new(0x1d, "XMSSMT-SHAKE_40/8_512", Shake256, 40, 8),
    Entry::new(0x1e, "XMSSMT-SHAKE_60/3_512", Shake256, 60, 3),
    Entry::new(0x1f, "XMSSMT-SHAKE_60/6_512", Shake256, 60, 6),
    Entry::new(0x20, "XMSSMT-SHAKE_60/12_512", Shake256, 60, 12),
];

/// Identifier of the single-tree set (digest, w, len, height), if registered.
#[must_use]
pub fn lookup_xmss(digest: DigestAlgorithm, w: u32, len: usize, height: u32) -> Option<Oid> {
    XMSS.iter()
        .find(|e| e.digest == digest && e.w == w && e.len() == len && e.height == height)
        .map(Entry::oid)
}

/// Identifier of the multi-tree set (digest, w, len, total height, layers),
/// if registered.
#[must_use]
pub fn lookup_xmssmt(
    digest: DigestAlgorithm,
    w: u32,
    len: usize,
    total_height: u32,
    layers: u32,
) -> Option<Oid> {
    XMSSMT
        .iter()
        .find(|e| {
            e.digest == digest
                && e.w == w
                && e.len() == len
                && e.height == total_height
                && e.layers == layers
        })
        .map(Entry::oid)
}

pub(crate) fn xmss_by_value(value: u32) -> Option<Entry> {
    XMSS.iter().copied().find(|e| e.value == value)
}

pub(crate) fn xmssmt_by_value(value: u32) -> Option<Entry> {
    XMSSMT.iter().copied().find(|e| e.value == value)
}
