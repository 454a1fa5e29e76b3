//! XMSS and XMSS-MT parameter sets.
//!
//! Parameters are validated once at construction; everything downstream
//! trusts the derived lengths. Named RFC 8391 parameter sets are reachable
//! through [`XmssParams::from_oid`] and [`XmssMtParams::from_oid`].

use crate::digest::DigestAlgorithm;
use crate::hash::KeyedHash;
use crate::oid::{self, Oid};
use tilia_core::{Error, Result};

/// Smallest supported height of a single tree.
pub const MIN_TREE_HEIGHT: u32 = 2;

/// Largest supported height of a single tree.
///
/// Key generation touches every leaf, so larger trees are rejected.
pub const MAX_TREE_HEIGHT: u32 = 20;

/// Largest supported total height of a multi-tree.
pub const MAX_TOTAL_HEIGHT: u32 = 60;

/// Size of the index field of an XMSS signature.
pub const XMSS_SIGNATURE_INDEX_BYTES: usize = 4;

/// WOTS+ parameters derived from n and w.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WotsParams {
    n: usize,
    w: u32,
    log_w: u32,
    len1: usize,
    len2: usize,
}

impl WotsParams {
    /// Derive WOTS+ parameters for security parameter `n` and Winternitz
    /// parameter `w` (4 or 16).
    pub fn new(n: usize, w: u32) -> Result<Self> {
        let log_w = match w {
            4 => 2,
            16 => 4,
            _ => return Err(Error::UnsupportedWinternitzParameter { w }),
        };
        // ceil(8n / log_w); log_w divides 8 so this is exact.
        let len1 = 8 * n / log_w as usize;
        let max_checksum = len1 as u32 * (w - 1);
        let len2 = (max_checksum.ilog2() / log_w) as usize + 1;
        Ok(Self {
            n,
            w,
            log_w,
            len1,
            len2,
        })
    }

    /// Security parameter n in bytes.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.n
    }

    /// Winternitz parameter w.
    #[must_use]
    pub const fn w(&self) -> u32 {
        self.w
    }

    /// log2(w).
    #[must_use]
    pub const fn log_w(&self) -> u32 {
        self.log_w
    }

    /// Number of message digits.
    #[must_use]
    pub const fn len1(&self) -> usize {
        self.len1
    }

    /// Number of checksum digits.
    #[must_use]
    pub const fn len2(&self) -> usize {
        self.len2
    }

    /// Total number of chains.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len1 + self.len2
    }

    /// Bytes holding the shifted checksum: ceil(len2 * log_w / 8).
    #[must_use]
    pub const fn checksum_bytes(&self) -> usize {
        (self.len2 * self.log_w as usize).div_ceil(8)
    }

    /// Left shift aligning the checksum to a byte boundary.
    #[must_use]
    pub const fn checksum_shift(&self) -> u32 {
        (8 - (self.len2 as u32 * self.log_w) % 8) % 8
    }

    /// Size of a WOTS+ signature or public key in bytes.
    #[must_use]
    pub const fn signature_bytes(&self) -> usize {
        self.len() * self.n
    }
}

fn check_tree_height(height: u32) -> Result<()> {
    if !(MIN_TREE_HEIGHT..=MAX_TREE_HEIGHT).contains(&height) {
        return Err(Error::InvalidTreeHeight {
            height,
            min: MIN_TREE_HEIGHT,
            max: MAX_TREE_HEIGHT,
        });
    }
    Ok(())
}

/// Parameters of a single-tree XMSS instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct XmssParams {
    digest: DigestAlgorithm,
    height: u32,
    wots: WotsParams,
}

impl XmssParams {
    /// Validate and build a parameter set.
    ///
    /// # Errors
    ///
    /// `UnsupportedWinternitzParameter` if `w` is not 4 or 16,
    /// `InvalidTreeHeight` if `height` is outside 2..=20.
    pub fn new(digest: DigestAlgorithm, height: u32, w: u32) -> Result<Self> {
        let wots = WotsParams::new(digest.digest_size(), w)?;
        check_tree_height(height)?;
        Ok(Self {
            digest,
            height,
            wots,
        })
    }

    /// Look up a named RFC 8391 parameter set.
    pub fn from_oid(value: u32) -> Result<Self> {
        let entry = oid::xmss_by_value(value).ok_or(Error::UnknownOid { oid: value })?;
        Self::new(entry.digest, entry.height, entry.w)
    }

    /// RFC 8391 identifier of this parameter set, if it has one.
    #[must_use]
    pub fn oid(&self) -> Option<Oid> {
        oid::lookup_xmss(self.digest, self.wots.w(), self.wots.len(), self.height)
    }

    /// Digest algorithm.
    #[must_use]
    pub const fn digest(&self) -> DigestAlgorithm {
        self.digest
    }

    /// Keyed hash suite over the digest.
    #[must_use]
    pub const fn hash(&self) -> KeyedHash {
        KeyedHash::new(self.digest)
    }

    /// Security parameter n in bytes.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.wots.n()
    }

    /// Tree height.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// WOTS+ parameters.
    #[must_use]
    pub const fn wots(&self) -> &WotsParams {
        &self.wots
    }

    /// Number of leaves, i.e. signatures per key.
    #[must_use]
    pub const fn leaves(&self) -> u64 {
        1u64 << self.height
    }

    /// Size of the private key index field.
    #[must_use]
    pub const fn index_bytes(&self) -> usize {
        (self.height as usize).div_ceil(8)
    }

    /// Serialized public key size: root and public seed.
    #[must_use]
    pub const fn public_key_bytes(&self) -> usize {
        2 * self.n()
    }

    /// Serialized private key size.
    #[must_use]
    pub const fn private_key_bytes(&self) -> usize {
        self.index_bytes() + 4 * self.n()
    }

    /// Serialized signature size.
    #[must_use]
    pub const fn signature_bytes(&self) -> usize {
        XMSS_SIGNATURE_INDEX_BYTES
            + self.n()
            + self.wots.signature_bytes()
            + self.height as usize * self.n()
    }
}

/// Parameters of a multi-tree XMSS-MT instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct XmssMtParams {
    digest: DigestAlgorithm,
    total_height: u32,
    layers: u32,
    wots: WotsParams,
}

impl XmssMtParams {
    /// Validate and build a parameter set.
    ///
    /// # Errors
    ///
    /// `HeightNotDivisible` if `total_height` is not a multiple of `layers`,
    /// `InvalidTreeHeight` if the per-layer height is outside 2..=20 or the
    /// total height exceeds 60, `UnsupportedWinternitzParameter` for a bad `w`.
    pub fn new(digest: DigestAlgorithm, total_height: u32, layers: u32, w: u32) -> Result<Self> {
        let wots = WotsParams::new(digest.digest_size(), w)?;
        if layers == 0 || total_height % layers != 0 {
            return Err(Error::HeightNotDivisible {
                total_height,
                layers,
            });
        }
        if total_height > MAX_TOTAL_HEIGHT {
            return Err(Error::InvalidTreeHeight {
                height: total_height,
                min: MIN_TREE_HEIGHT,
                max: MAX_TOTAL_HEIGHT,
            });
        }
        check_tree_height(total_height / layers)?;
        Ok(Self {
            digest,
            total_height,
            layers,
            wots,
        })
    }

    /// Look up a named RFC 8391 parameter set.
    pub fn from_oid(value: u32) -> Result<Self> {
        let entry = oid::xmssmt_by_value(value).ok_or(Error::UnknownOid { oid: value })?;
        Self::new(entry.digest, entry.height, entry.layers, entry.w)
    }

    /// RFC 8391 identifier of this parameter set, if it has one.
    #[must_use]
    pub fn oid(&self) -> Option<Oid> {
        oid::lookup_xmssmt(
            self.digest,
            self.wots.w(),
            self.wots.len(),
            self.total_height,
            self.layers,
        )
    }

    /// Digest algorithm.
    #[must_use]
    pub const fn digest(&self) -> DigestAlgorithm {
        self.digest
    }

    /// Keyed hash suite over the digest.
    #[must_use]
    pub const fn hash(&self) -> KeyedHash {
        KeyedHash::new(self.digest)
    }

    /// Security parameter n in bytes.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.wots.n()
    }

    /// Height of the whole hypertree.
    #[must_use]
    pub const fn total_height(&self) -> u32 {
        self.total_height
    }

    /// Number of layers d.
    #[must_use]
    pub const fn layers(&self) -> u32 {
        self.layers
    }

    /// Height h of each layer's trees.
    #[must_use]
    pub const fn tree_height(&self) -> u32 {
        self.total_height / self.layers
    }

    /// WOTS+ parameters.
    #[must_use]
    pub const fn wots(&self) -> &WotsParams {
        &self.wots
    }

    /// Number of signatures per key: 2^total_height.
    #[must_use]
    pub const fn capacity(&self) -> u64 {
        1u64 << self.total_height
    }

    /// Size of the index field in keys and signatures.
    #[must_use]
    pub const fn index_bytes(&self) -> usize {
        (self.total_height as usize).div_ceil(8)
    }

    /// Serialized public key size.
    #[must_use]
    pub const fn public_key_bytes(&self) -> usize {
        2 * self.n()
    }

    /// Serialized private key size.
    #[must_use]
    pub const fn private_key_bytes(&self) -> usize {
        self.index_bytes() + 4 * self.n()
    }

    /// Size of one layer's reduced signature: WOTS+ signature and auth path.
    #[must_use]
    pub const fn reduced_signature_bytes(&self) -> usize {
        self.wots.signature_bytes() + self.tree_height() as usize * self.n()
    }

    /// Serialized signature size.
    #[must_use]
    pub const fn signature_bytes(&self) -> usize {
        self.index_bytes() + self.n() + self.layers as usize * self.reduced_signature_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wots_lengths() {
        let p = WotsParams::new(32, 16).unwrap();
        assert_eq!((p.len1(), p.len2(), p.len()), (64, 3, 67));
        assert_eq!(p.checksum_bytes(), 2);
        assert_eq!(p.checksum_shift(), 4);

        let p = WotsParams::new(64, 16).unwrap();
        assert_eq!((p.len1(), p.len2(), p.len()), (128, 3, 131));

        let p = WotsParams::new(32, 4).unwrap();
        assert_eq!((p.len1(), p.len2(), p.len()), (128, 5, 133));
        assert_eq!(p.checksum_bytes(), 2);
        assert_eq!(p.checksum_shift(), 6);
    }

    #[test]
    fn test_unsupported_w() {
        for w in [0, 2, 8, 256] {
            assert_eq!(
                WotsParams::new(32, w),
                Err(Error::UnsupportedWinternitzParameter { w })
            );
        }
    }

    #[test]
    fn test_xmss_sizes() {
        let p = XmssParams::new(DigestAlgorithm::Sha256, 10, 16).unwrap();
        assert_eq!(p.signature_bytes(), 2500);
        assert_eq!(p.public_key_bytes(), 64);
        assert_eq!(p.private_key_bytes(), 2 + 128);
        assert_eq!(p.leaves(), 1024);
    }

    #[test]
    fn test_xmss_height_bounds() {
        assert!(XmssParams::new(DigestAlgorithm::Sha256, 2, 16).is_ok());
        assert!(XmssParams::new(DigestAlgorithm::Sha256, 20, 16).is_ok());
        assert_eq!(
            XmssParams::new(DigestAlgorithm::Sha256, 21, 16),
            Err(Error::InvalidTreeHeight {
                height: 21,
                min: 2,
                max: 20
            })
        );
        assert!(XmssParams::new(DigestAlgorithm::Sha256, 1, 16).is_err());
    }

    #[test]
    fn test_xmssmt_not_divisible() {
        assert_eq!(
            XmssMtParams::new(DigestAlgorithm::Sha256, 5, 3, 16),
            Err(Error::HeightNotDivisible {
                total_height: 5,
                layers: 3
            })
        );
        assert!(XmssMtParams::new(DigestAlgorithm::Sha256, 4, 0, 16).is_err());
    }

    #[test]
    fn test_xmssmt_sizes() {
        let p = XmssMtParams::new(DigestAlgorithm::Sha256, 20, 2, 16).unwrap();
        assert_eq!(p.tree_height(), 10);
        assert_eq!(p.index_bytes(), 3);
        assert_eq!(p.signature_bytes(), 4963);
        assert_eq!(p.capacity(), 1 << 20);
    }

    #[test]
    fn test_xmssmt_height_bounds() {
        assert!(XmssMtParams::new(DigestAlgorithm::Sha256, 60, 12, 16).is_ok());
        assert!(XmssMtParams::new(DigestAlgorithm::Sha256, 66, 6, 16).is_err());
        assert!(XmssMtParams::new(DigestAlgorithm::Sha256, 42, 1, 16).is_err());
        assert!(XmssMtParams::new(DigestAlgorithm::Sha256, 6, 6, 16).is_err());
    }
}
