//! Keyed hash functions for XMSS.
//!
//! RFC 8391 derives four keyed functions from one digest by prefixing the
//! input with a domain separator padded to n bytes:
//!
//! - **F**: chaining function for WOTS+ (`|key| = |in| = n`)
//! - **H**: two-to-one hash for L-trees and the hash tree (`|in| = 2n`)
//! - **H_msg**: message compression (`|key| = 3n`, any input length)
//! - **PRF**: pseudorandom function keyed by a seed over a 32-byte address
//!
//! Each is `Digest(toByte(domain, n) || key || input)`.

use crate::address::{Address, ADDRESS_BYTES};
use crate::digest::DigestAlgorithm;
use crate::utils::{to_byte, xor_into};
use tilia_core::{Error, Result};
use zeroize::Zeroizing;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

const DOMAIN_F: u64 = 0;
const DOMAIN_H: u64 = 1;
const DOMAIN_H_MSG: u64 = 2;
const DOMAIN_PRF: u64 = 3;

/// Largest supported security parameter n.
pub(crate) const MAX_N: usize = 64;

/// The keyed hash suite over one digest algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyedHash {
    digest: DigestAlgorithm,
}

impl KeyedHash {
    /// Build the suite for `digest`.
    #[must_use]
    pub const fn new(digest: DigestAlgorithm) -> Self {
        Self { digest }
    }

    /// Underlying digest algorithm.
    #[must_use]
    pub const fn digest(&self) -> DigestAlgorithm {
        self.digest
    }

    /// Security parameter n in bytes.
    #[must_use]
    pub const fn n(&self) -> usize {
        self.digest.digest_size()
    }

    fn check(&self, what: &'static str, data: &[u8], expected: usize) -> Result<()> {
        if data.len() != expected {
            return Err(Error::InvalidLength {
                what,
                expected,
                actual: data.len(),
            });
        }
        Ok(())
    }

    fn keyed(&self, domain: u64, key: &[u8], input: &[&[u8]]) -> Vec<u8> {
        let n = self.n();
        let mut prefix = [0u8; MAX_N];
        to_byte(domain, &mut prefix[..n]);

        let mut parts: [&[u8]; 4] = [&prefix[..n], key, &[], &[]];
        let count = 2 + input.len();
        parts[2..count].copy_from_slice(input);
        self.digest.digest(&parts[..count])
    }

    /// F: chaining function, `Digest(toByte(0, n) || key || input)`.
    pub fn f(&self, key: &[u8], input: &[u8]) -> Result<Vec<u8>> {
        let n = self.n();
        self.check("F key", key, n)?;
        self.check("F input", input, n)?;
        Ok(self.keyed(DOMAIN_F, key, &[input]))
    }

    /// H: tree hash, `Digest(toByte(1, n) || key || input)`.
    pub fn h(&self, key: &[u8], input: &[u8]) -> Result<Vec<u8>> {
        let n = self.n();
        self.check("H key", key, n)?;
        self.check("H input", input, 2 * n)?;
        Ok(self.keyed(DOMAIN_H, key, &[input]))
    }

    /// H_msg: message hash, `Digest(toByte(2, n) || key || input)`.
    pub fn h_msg(&self, key: &[u8], input: &[u8]) -> Result<Vec<u8>> {
        self.check("H_msg key", key, 3 * self.n())?;
        Ok(self.keyed(DOMAIN_H_MSG, key, &[input]))
    }

    /// PRF: `Digest(toByte(3, n) || key || address)`.
    ///
    /// The output keys secret material, so it is returned zeroizing.
    pub fn prf(&self, key: &[u8], address: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        self.check("PRF key", key, self.n())?;
        self.check("PRF address", address, ADDRESS_BYTES)?;
        Ok(Zeroizing::new(self.keyed(DOMAIN_PRF, key, &[address])))
    }

    /// PRF over an encoded [`Address`].
    pub fn prf_address(&self, key: &[u8], address: &Address) -> Result<Zeroizing<Vec<u8>>> {
        self.prf(key, &address.to_bytes())
    }

    /// Randomized tree hash combining two nodes.
    ///
    /// key, bitmask 0 and bitmask 1 are PRF(public_seed, address) with the
    /// key-and-mask word set to 0, 1 and 2.
    /// Returns `H(key, (left ^ bm0) || (right ^ bm1))`.
    pub fn randomize_hash(
        &self,
        left: &[u8],
        right: &[u8],
        public_seed: &[u8],
        address: &Address,
    ) -> Result<Vec<u8>> {
        let n = self.n();
        self.check("left node", left, n)?;
        self.check("right node", right, n)?;

        let key = self.prf_address(public_seed, &address.with_key_and_mask(0))?;
        let bm0 = self.prf_address(public_seed, &address.with_key_and_mask(1))?;
        let bm1 = self.prf_address(public_seed, &address.with_key_and_mask(2))?;

        let mut input = [0u8; 2 * MAX_N];
        input[..n].copy_from_slice(left);
        input[n..2 * n].copy_from_slice(right);
        xor_into(&mut input[..n], &bm0);
        xor_into(&mut input[n..2 * n], &bm1);
        self.h(&key, &input[..2 * n])
    }

    /// Message digest for leaf `index`:
    /// `H_msg(randomness || root || toByte(index, n), message)`.
    pub fn message_digest(
        &self,
        randomness: &[u8],
        root: &[u8],
        index: u64,
        message: &[u8],
    ) -> Result<Vec<u8>> {
        let n = self.n();
        self.check("randomness", randomness, n)?;
        self.check("root", root, n)?;

        let mut key = [0u8; 3 * MAX_N];
        key[..n].copy_from_slice(randomness);
        key[n..2 * n].copy_from_slice(root);
        to_byte(index, &mut key[2 * n..3 * n]);
        self.h_msg(&key[..3 * n], message)
    }

    /// Per-signature randomness `PRF(secret_key_prf, toByte(index, 32))`.
    pub fn message_randomness(
        &self,
        secret_key_prf: &[u8],
        index: u64,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let mut idx = [0u8; ADDRESS_BYTES];
        to_byte(index, &mut idx);
        self.prf(secret_key_prf, &idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suites() -> [KeyedHash; 4] {
        [
            KeyedHash::new(DigestAlgorithm::Sha256),
            KeyedHash::new(DigestAlgorithm::Sha512),
            KeyedHash::new(DigestAlgorithm::Shake128),
            KeyedHash::new(DigestAlgorithm::Shake256),
        ]
    }

    #[test]
    fn test_prf_vector_sha256() {
        let hash = KeyedHash::new(DigestAlgorithm::Sha256);
        let out = hash.prf(&[0u8; 32], &[0u8; 32]).unwrap();
        assert_eq!(
            hex::encode(&*out),
            "6945a6f13aa83e598cb8d0abebb5cddbd87e576226517f9001c1d36bb320bf80"
        );
    }

    #[test]
    fn test_prf_matches_manual_construction() {
        for hash in suites() {
            let n = hash.n();
            let key = vec![7u8; n];
            let addr = Address::ots(1, 2, 3, 4, 5).to_bytes();

            let mut prefix = vec![0u8; n];
            prefix[n - 1] = 3;
            let expected = hash.digest().digest(&[&prefix, &key, &addr]);
            assert_eq!(*hash.prf(&key, &addr).unwrap(), expected);
        }
    }

    #[test]
    fn test_domains_are_separated() {
        let hash = KeyedHash::new(DigestAlgorithm::Sha256);
        let key = [1u8; 32];
        let input = [2u8; 32];
        let f = hash.f(&key, &input).unwrap();
        let prf = hash.prf(&key, &input).unwrap();
        assert_ne!(f, *prf);
    }

    #[test]
    fn test_length_checks() {
        let hash = KeyedHash::new(DigestAlgorithm::Sha256);
        assert_eq!(
            hash.f(&[0u8; 31], &[0u8; 32]),
            Err(Error::InvalidLength {
                what: "F key",
                expected: 32,
                actual: 31
            })
        );
        assert!(hash.f(&[0u8; 32], &[0u8; 33]).is_err());
        assert!(hash.h(&[0u8; 32], &[0u8; 32]).is_err());
        assert!(hash.h_msg(&[0u8; 64], b"msg").is_err());
        assert!(hash.prf(&[0u8; 32], &[0u8; 31]).is_err());
        assert!(hash.randomize_hash(&[0u8; 32], &[0u8; 16], &[0u8; 32], &Address::hash_tree(0, 0, 0, 0)).is_err());
    }

    #[test]
    fn test_h_msg_accepts_any_length() {
        let hash = KeyedHash::new(DigestAlgorithm::Shake256);
        let key = [0u8; 192];
        assert_eq!(hash.h_msg(&key, b"").unwrap().len(), 64);
        assert_eq!(hash.h_msg(&key, &[0xAB; 1000]).unwrap().len(), 64);
    }

    #[test]
    fn test_randomize_hash_depends_on_order_and_address() {
        let hash = KeyedHash::new(DigestAlgorithm::Sha256);
        let seed = [9u8; 32];
        let a = [1u8; 32];
        let b = [2u8; 32];
        let adrs = Address::hash_tree(0, 0, 0, 0);

        let ab = hash.randomize_hash(&a, &b, &seed, &adrs).unwrap();
        let ba = hash.randomize_hash(&b, &a, &seed, &adrs).unwrap();
        let other = hash
            .randomize_hash(&a, &b, &seed, &Address::hash_tree(0, 0, 0, 1))
            .unwrap();
        assert_ne!(ab, ba);
        assert_ne!(ab, other);
        assert_eq!(ab.len(), 32);
    }

    #[test]
    fn test_message_digest_binds_index() {
        let hash = KeyedHash::new(DigestAlgorithm::Sha512);
        let r = [3u8; 64];
        let root = [4u8; 64];
        let d0 = hash.message_digest(&r, &root, 0, b"hello").unwrap();
        let d1 = hash.message_digest(&r, &root, 1, b"hello").unwrap();
        assert_ne!(d0, d1);
        assert_eq!(d0.len(), 64);
    }
}
