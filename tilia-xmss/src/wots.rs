//! WOTS+ (Winternitz One-Time Signature) implementation.
//!
//! Each XMSS leaf is one WOTS+ key pair. The private key is `len` n-byte
//! elements, the public key is each element pushed to the end of a hash chain
//! of length w - 1, and a signature reveals every chain at the position given
//! by the corresponding base-w digit of the message and its checksum.
//!
//! Key material is derived per leaf: the leaf seed is
//! `PRF(secret_seed, OTS address(layer, tree, leaf))` and chain element `i`
//! is `PRF(leaf_seed, toByte(i, 32))`.

use crate::address::{Address, Subtree, ADDRESS_BYTES};
use crate::hash::{KeyedHash, MAX_N};
use crate::params::WotsParams;
use crate::utils::{base_w, checksum, to_byte, xor_into};
use subtle::ConstantTimeEq;
use tilia_core::{Error, Result};
use zeroize::Zeroizing;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// WOTS+ operations bound to one parameter set and public seed.
#[derive(Clone, Copy, Debug)]
pub struct Wots<'a> {
    params: &'a WotsParams,
    hash: KeyedHash,
    public_seed: &'a [u8],
}

impl<'a> Wots<'a> {
    /// Bind WOTS+ to a parameter set, hash suite and public seed.
    #[must_use]
    pub const fn new(params: &'a WotsParams, hash: KeyedHash, public_seed: &'a [u8]) -> Self {
        Self {
            params,
            hash,
            public_seed,
        }
    }

    /// Parameters in use.
    #[must_use]
    pub const fn params(&self) -> &WotsParams {
        self.params
    }

    /// Iterate the chaining function `steps` times starting at position
    /// `start` of chain `chain_index` of leaf `leaf`.
    ///
    /// For each position j the hash word of the address is set to j, the
    /// key and bitmask are derived with PRF at key-and-mask 0 and 1, and
    /// `X = F(key, X ^ bitmask)`.
    ///
    /// # Errors
    ///
    /// `ChainOutOfRange` if `start + steps > w - 1`.
    pub fn chain(
        &self,
        x: &[u8],
        start: u32,
        steps: u32,
        subtree: Subtree,
        leaf: u32,
        chain_index: u32,
    ) -> Result<Vec<u8>> {
        let w = self.params.w();
        if start.checked_add(steps).map_or(true, |end| end > w - 1) {
            return Err(Error::ChainOutOfRange { start, steps, w });
        }

        let n = self.params.n();
        if x.len() != n {
            return Err(Error::InvalidLength {
                what: "chain input",
                expected: n,
                actual: x.len(),
            });
        }

        let mut value = x.to_vec();
        let mut masked = [0u8; MAX_N];
        for j in start..start + steps {
            let adrs = subtree.ots(leaf, chain_index, j);
            let key = self.hash.prf_address(self.public_seed, &adrs)?;
            let bitmask = self
                .hash
                .prf_address(self.public_seed, &adrs.with_key_and_mask(1))?;

            masked[..n].copy_from_slice(&value);
            xor_into(&mut masked[..n], &bitmask);
            value = self.hash.f(&key, &masked[..n])?;
        }
        Ok(value)
    }

    /// Base-w digits of an n-byte message followed by its checksum digits.
    pub fn message_digits(&self, message: &[u8]) -> Result<Vec<u32>> {
        let p = self.params;
        if message.len() != p.n() {
            return Err(Error::InvalidLength {
                what: "WOTS+ message",
                expected: p.n(),
                actual: message.len(),
            });
        }

        let mut digits = base_w(message, p.log_w(), p.len1());
        let csum = checksum(&digits, p.w()) << p.checksum_shift();

        let mut csum_bytes = [0u8; 4];
        let csum_bytes = &mut csum_bytes[..p.checksum_bytes()];
        to_byte(u64::from(csum), csum_bytes);
        digits.extend(base_w(csum_bytes, p.log_w(), p.len2()));
        Ok(digits)
    }

    /// Expand the private key of one leaf, `len` elements of n bytes.
    pub fn secret_key(
        &self,
        secret_seed: &[u8],
        subtree: Subtree,
        leaf: u32,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let seed = leaf_seed(&self.hash, secret_seed, subtree, leaf)?;
        let n = self.params.n();
        let mut sk = Zeroizing::new(Vec::with_capacity(self.params.signature_bytes()));
        let mut index = [0u8; ADDRESS_BYTES];
        for i in 0..self.params.len() {
            to_byte(i as u64, &mut index);
            let element = self.hash.prf(&seed, &index)?;
            debug_assert_eq!(element.len(), n);
            sk.extend_from_slice(&element);
        }
        Ok(sk)
    }

    /// Compute the public key of one leaf, `len` elements of n bytes.
    pub fn public_key(&self, secret_seed: &[u8], subtree: Subtree, leaf: u32) -> Result<Vec<u8>> {
        let sk = self.secret_key(secret_seed, subtree, leaf)?;
        let n = self.params.n();
        let top = self.params.w() - 1;

        let mut pk = Vec::with_capacity(self.params.signature_bytes());
        for (i, element) in sk.chunks_exact(n).enumerate() {
            pk.extend(self.chain(element, 0, top, subtree, leaf, i as u32)?);
        }
        Ok(pk)
    }

    /// Sign an n-byte message with the key of one leaf.
    pub fn sign(
        &self,
        message: &[u8],
        secret_seed: &[u8],
        subtree: Subtree,
        leaf: u32,
    ) -> Result<Vec<u8>> {
        let digits = self.message_digits(message)?;
        let sk = self.secret_key(secret_seed, subtree, leaf)?;
        let n = self.params.n();

        let mut sig = Vec::with_capacity(self.params.signature_bytes());
        for (i, (element, &d)) in sk.chunks_exact(n).zip(&digits).enumerate() {
            sig.extend(self.chain(element, 0, d, subtree, leaf, i as u32)?);
        }
        Ok(sig)
    }

    /// Recover the public key a signature commits to.
    ///
    /// A valid signature recovers exactly the leaf's public key; anything
    /// else recovers an unrelated value.
    pub fn public_key_from_signature(
        &self,
        signature: &[u8],
        message: &[u8],
        subtree: Subtree,
        leaf: u32,
    ) -> Result<Vec<u8>> {
        let expected = self.params.signature_bytes();
        if signature.len() != expected {
            return Err(Error::InvalidLength {
                what: "WOTS+ signature",
                expected,
                actual: signature.len(),
            });
        }

        let digits = self.message_digits(message)?;
        let n = self.params.n();
        let top = self.params.w() - 1;

        let mut pk = Vec::with_capacity(expected);
        for (i, (element, &d)) in signature.chunks_exact(n).zip(&digits).enumerate() {
            pk.extend(self.chain(element, d, top - d, subtree, leaf, i as u32)?);
        }
        Ok(pk)
    }

    /// Check a signature against a stored public key.
    pub fn verify(
        &self,
        signature: &[u8],
        message: &[u8],
        public_key: &[u8],
        subtree: Subtree,
        leaf: u32,
    ) -> Result<bool> {
        let recovered = self.public_key_from_signature(signature, message, subtree, leaf)?;
        Ok(recovered.ct_eq(public_key).into())
    }
}

/// Per-leaf seed `PRF(secret_seed, OTS address(layer, tree, leaf, 0, 0))`.
pub fn leaf_seed(
    hash: &KeyedHash,
    secret_seed: &[u8],
    subtree: Subtree,
    leaf: u32,
) -> Result<Zeroizing<Vec<u8>>> {
    let adrs: Address = subtree.ots(leaf, 0, 0);
    hash.prf_address(secret_seed, &adrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestAlgorithm;

    const N: usize = 32;

    fn setup(w: u32) -> (WotsParams, KeyedHash) {
        (
            WotsParams::new(N, w).unwrap(),
            KeyedHash::new(DigestAlgorithm::Sha256),
        )
    }

    #[test]
    fn test_chain_zero_steps() {
        let (params, hash) = setup(16);
        let seed = [1u8; N];
        let wots = Wots::new(&params, hash, &seed);
        let x = [7u8; N];
        assert_eq!(wots.chain(&x, 3, 0, Subtree::default(), 0, 0).unwrap(), x.to_vec());
    }

    #[test]
    fn test_chain_composition() {
        let (params, hash) = setup(16);
        let seed = [1u8; N];
        let wots = Wots::new(&params, hash, &seed);
        let x = [0u8; N];
        let st = Subtree::new(0, 0);

        let full = wots.chain(&x, 0, 15, st, 2, 5).unwrap();
        let part = wots.chain(&x, 0, 6, st, 2, 5).unwrap();
        let rest = wots.chain(&part, 6, 9, st, 2, 5).unwrap();
        assert_eq!(full, rest);
    }

    #[test]
    fn test_chain_out_of_range() {
        let (params, hash) = setup(16);
        let seed = [1u8; N];
        let wots = Wots::new(&params, hash, &seed);
        let x = [0u8; N];
        assert_eq!(
            wots.chain(&x, 3, 13, Subtree::default(), 0, 0),
            Err(Error::ChainOutOfRange {
                start: 3,
                steps: 13,
                w: 16
            })
        );
        assert!(wots.chain(&x, u32::MAX, 2, Subtree::default(), 0, 0).is_err());
    }

    #[test]
    fn test_message_digits_all_zero() {
        let (params, hash) = setup(16);
        let seed = [0u8; N];
        let wots = Wots::new(&params, hash, &seed);
        let digits = wots.message_digits(&[0u8; N]).unwrap();
        assert_eq!(digits.len(), 67);
        assert!(digits[..64].iter().all(|&d| d == 0));
        // csum = 64 * 15 = 960 = 0x3C0, shifted by 4 -> 0x3C00 -> digits 3, C, 0
        assert_eq!(&digits[64..], &[3, 12, 0]);
    }

    #[test]
    fn test_message_digits_w4() {
        let (params, hash) = setup(4);
        let seed = [0u8; N];
        let wots = Wots::new(&params, hash, &seed);
        let digits = wots.message_digits(&[0xFFu8; N]).unwrap();
        assert_eq!(digits.len(), 133);
        assert!(digits[..128].iter().all(|&d| d == 3));
        assert!(digits[128..].iter().all(|&d| d == 0));
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        for w in [4, 16] {
            let (params, hash) = setup(w);
            let public_seed = [2u8; N];
            let secret_seed = [3u8; N];
            let wots = Wots::new(&params, hash, &public_seed);
            let st = Subtree::new(1, 9);
            let message = [0x5Au8; N];

            let pk = wots.public_key(&secret_seed, st, 4).unwrap();
            let sig = wots.sign(&message, &secret_seed, st, 4).unwrap();
            assert_eq!(sig.len(), params.signature_bytes());
            assert!(wots.verify(&sig, &message, &pk, st, 4).unwrap());

            let mut other = message;
            other[0] ^= 1;
            assert!(!wots.verify(&sig, &other, &pk, st, 4).unwrap());
            assert!(!wots.verify(&sig, &message, &pk, st, 5).unwrap());
        }
    }

    #[test]
    fn test_keys_depend_on_position() {
        let (params, hash) = setup(16);
        let public_seed = [2u8; N];
        let secret_seed = [3u8; N];
        let wots = Wots::new(&params, hash, &public_seed);

        let a = wots.public_key(&secret_seed, Subtree::new(0, 0), 0).unwrap();
        let b = wots.public_key(&secret_seed, Subtree::new(0, 0), 1).unwrap();
        let c = wots.public_key(&secret_seed, Subtree::new(1, 0), 0).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_wrong_lengths() {
        let (params, hash) = setup(16);
        let seed = [0u8; N];
        let wots = Wots::new(&params, hash, &seed);
        assert!(wots.message_digits(&[0u8; 31]).is_err());
        assert!(wots
            .public_key_from_signature(&[0u8; 10], &[0u8; N], Subtree::default(), 0)
            .is_err());
    }
}
