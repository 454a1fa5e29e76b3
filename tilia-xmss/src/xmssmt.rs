//! XMSS-MT: a hypertree of XMSS trees.
//!
//! d layers of trees of height h form one virtual tree of height d * h. The
//! trees of layer 0 sign message digests; every tree of layer l > 0 signs
//! the roots of the trees below it. The public key is the root of the single
//! tree on layer d - 1.
//!
//! A global index `idx` selects, per layer l, the tree
//! `idx >> ((l + 1) * h)` and the leaf `(idx >> (l * h)) & (2^h - 1)`.
//!
//! The private key keeps a BDS traversal for the current bottom tree and the
//! last reduced signature of every upper layer, which only changes once the
//! layer below moves to its next tree.

use crate::address::Subtree;
use crate::bds::BdsState;
use crate::params::XmssMtParams;
use crate::treehash::TreeHasher;
use crate::utils::{to_byte, to_int};
use crate::xmss::{check_seed, ReducedSignature, SecretSeeds};
use core::fmt;
use rand_core::CryptoRng;
use subtle::ConstantTimeEq;
use tilia_core::{Error, Result, StatefulSigner};
use tracing::{debug, trace, warn};
use zeroize::{Zeroize, Zeroizing};

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Tree and leaf used on `layer` by global index `index`.
///
/// Shifts past 64 bits yield zero, so any height is safe to pass.
pub(crate) fn split_index(index: u64, tree_height: u32, layer: u32) -> (u64, u32) {
    let shr = |by: u32| index.checked_shr(by).unwrap_or(0);
    let mask = 1u64.checked_shl(tree_height).map_or(u64::MAX, |v| v - 1);
    let leaf = shr(layer.saturating_mul(tree_height)) & mask;
    let tree = shr(layer.saturating_add(1).saturating_mul(tree_height));
    (tree, leaf as u32)
}

fn tree_hasher<'a>(
    params: &'a XmssMtParams,
    seeds: &'a SecretSeeds,
    public_seed: &'a [u8],
    layer: u32,
    tree: u64,
) -> TreeHasher<'a> {
    TreeHasher::new(
        params.wots(),
        params.hash(),
        &seeds.secret_seed,
        public_seed,
        Subtree::new(layer, tree),
        params.tree_height(),
    )
}

/// XMSS-MT public key: root of the top tree and public seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmssMtPublicKey {
    params: XmssMtParams,
    root: Vec<u8>,
    public_seed: Vec<u8>,
}

impl XmssMtPublicKey {
    /// Parameter set of the key.
    #[must_use]
    pub fn params(&self) -> &XmssMtParams {
        &self.params
    }

    /// Root of the top tree.
    #[must_use]
    pub fn root(&self) -> &[u8] {
        &self.root
    }

    /// Public seed.
    #[must_use]
    pub fn public_seed(&self) -> &[u8] {
        &self.public_seed
    }

    /// Serialize as `root || public_seed`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.params.public_key_bytes());
        out.extend_from_slice(&self.root);
        out.extend_from_slice(&self.public_seed);
        out
    }

    /// Parse `root || public_seed`.
    pub fn from_bytes(params: &XmssMtParams, bytes: &[u8]) -> Result<Self> {
        let expected = params.public_key_bytes();
        if bytes.len() != expected {
            return Err(Error::InvalidEncoding {
                what: "XMSS-MT public key",
                expected,
                actual: bytes.len(),
            });
        }
        let (root, public_seed) = bytes.split_at(params.n());
        Ok(Self {
            params: *params,
            root: root.to_vec(),
            public_seed: public_seed.to_vec(),
        })
    }

    /// Verify `signature` on `message`.
    ///
    /// The root recovered from each layer is the message of the layer
    /// above; the root recovered from the top layer must equal the public
    /// root. Returns `false` for any invalid or malformed signature.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &XmssMtSignature) -> bool {
        self.verify_inner(message, signature).unwrap_or(false)
    }

    fn verify_inner(&self, message: &[u8], signature: &XmssMtSignature) -> Result<bool> {
        let p = &self.params;
        let h = p.tree_height();
        if signature.params != *p
            || signature.index >= p.capacity()
            || signature.layers.len() != p.layers() as usize
            || signature
                .layers
                .iter()
                .any(|layer| layer.auth_path().len() != h as usize)
        {
            return Ok(false);
        }

        let hash = p.hash();
        let mut node =
            hash.message_digest(&signature.randomness, &self.root, signature.index, message)?;
        for (layer, reduced) in (0u32..).zip(&signature.layers) {
            let (tree, leaf) = split_index(signature.index, h, layer);
            node = reduced.recover_root(
                p.wots(),
                &hash,
                &node,
                &self.public_seed,
                Subtree::new(layer, tree),
                leaf,
            )?;
        }
        Ok(node.ct_eq(&self.root).into())
    }
}

/// XMSS-MT signature: global index, randomness and one reduced signature
/// per layer, bottom first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmssMtSignature {
    params: XmssMtParams,
    index: u64,
    randomness: Vec<u8>,
    layers: Vec<ReducedSignature>,
}

impl XmssMtSignature {
    /// Parameter set the signature was made or parsed with.
    #[must_use]
    pub fn params(&self) -> &XmssMtParams {
        &self.params
    }

    /// Global index used.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Message randomization value r.
    #[must_use]
    pub fn randomness(&self) -> &[u8] {
        &self.randomness
    }

    /// Reduced signatures, bottom layer first.
    #[must_use]
    pub fn layers(&self) -> &[ReducedSignature] {
        &self.layers
    }

    /// Serialize as `index(ceil(H / 8)) || r || reduced signatures`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let ib = self.params.index_bytes();
        let mut out = vec![0u8; ib];
        to_byte(self.index, &mut out);
        out.reserve(self.params.signature_bytes() - ib);
        out.extend_from_slice(&self.randomness);
        for layer in &self.layers {
            layer.write_to(&mut out);
        }
        out
    }

    /// Parse a serialized signature.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` for a wrong length, `IndexOutOfRange` if the index
    /// is not below 2^H.
    pub fn from_bytes(params: &XmssMtParams, bytes: &[u8]) -> Result<Self> {
        let expected = params.signature_bytes();
        if bytes.len() != expected {
            return Err(Error::InvalidEncoding {
                what: "XMSS-MT signature",
                expected,
                actual: bytes.len(),
            });
        }

        let n = params.n();
        let (index, rest) = bytes.split_at(params.index_bytes());
        let index = to_int(index);
        if index >= params.capacity() {
            return Err(Error::IndexOutOfRange {
                index,
                limit: params.capacity(),
            });
        }
        let (randomness, rest) = rest.split_at(n);
        let layers = rest
            .chunks_exact(params.reduced_signature_bytes())
            .map(|chunk| ReducedSignature::read_from(chunk, params.wots().signature_bytes(), n))
            .collect();
        Ok(Self {
            params: *params,
            index,
            randomness: randomness.to_vec(),
            layers,
        })
    }
}

/// Traversal state of the bottom tree currently in use.
struct BottomTree {
    tree: u64,
    root: Vec<u8>,
    bds: BdsState,
}

/// Last signature made on an upper layer.
struct UpperLayer {
    tree: u64,
    leaf: u32,
    root: Vec<u8>,
    reduced: ReducedSignature,
}

/// XMSS-MT private key.
///
/// Not `Clone`, for the same reason as [`crate::XmssPrivateKey`].
pub struct XmssMtPrivateKey {
    params: XmssMtParams,
    index: u64,
    seeds: SecretSeeds,
    public_seed: Vec<u8>,
    root: Vec<u8>,
    bottom: Option<BottomTree>,
    upper: Vec<Option<UpperLayer>>,
}

impl XmssMtPrivateKey {
    /// Generate a key pair with seeds drawn from `rng`.
    pub fn generate(
        params: &XmssMtParams,
        rng: &mut impl CryptoRng,
    ) -> Result<(Self, XmssMtPublicKey)> {
        let n = params.n();
        let seeds = SecretSeeds::generate(n, rng);
        let mut public_seed = vec![0u8; n];
        rng.fill_bytes(&mut public_seed);
        Self::build(params, seeds, public_seed, 0, None)
    }

    /// Deterministic key generation from caller-provided seeds.
    pub fn from_seeds(
        params: &XmssMtParams,
        secret_seed: &[u8],
        secret_prf: &[u8],
        public_seed: &[u8],
    ) -> Result<(Self, XmssMtPublicKey)> {
        let n = params.n();
        check_seed("secret seed", secret_seed, n)?;
        check_seed("secret PRF key", secret_prf, n)?;
        check_seed("public seed", public_seed, n)?;
        Self::build(
            params,
            SecretSeeds::new(secret_seed, secret_prf),
            public_seed.to_vec(),
            0,
            None,
        )
    }

    fn build(
        params: &XmssMtParams,
        seeds: SecretSeeds,
        public_seed: Vec<u8>,
        index: u64,
        expected_root: Option<&[u8]>,
    ) -> Result<(Self, XmssMtPublicKey)> {
        let top = params.layers() - 1;
        let root = tree_hasher(params, &seeds, &public_seed, top, 0)
            .tree_hash(0, params.tree_height())?
            .into_value();

        if let Some(expected) = expected_root {
            if !bool::from(root.ct_eq(expected)) {
                return Err(Error::RootMismatch);
            }
        }

        let pk = XmssMtPublicKey {
            params: *params,
            root: root.clone(),
            public_seed: public_seed.clone(),
        };
        let mut upper = Vec::with_capacity(top as usize);
        upper.resize_with(top as usize, || None);
        let sk = Self {
            params: *params,
            index,
            seeds,
            public_seed,
            root,
            bottom: None,
            upper,
        };
        Ok((sk, pk))
    }

    /// Parameter set of the key.
    #[must_use]
    pub fn params(&self) -> &XmssMtParams {
        &self.params
    }

    /// Next global index to be used.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Number of signatures the key can still produce.
    #[must_use]
    pub fn remaining_signatures(&self) -> u64 {
        self.params.capacity().saturating_sub(self.index)
    }

    /// Matching public key.
    #[must_use]
    pub fn public_key(&self) -> XmssMtPublicKey {
        XmssMtPublicKey {
            params: self.params,
            root: self.root.clone(),
            public_seed: self.public_seed.clone(),
        }
    }

    /// Sign `message` with the next unused global index.
    ///
    /// # Errors
    ///
    /// `KeyExhausted` once all 2^H indices are used.
    pub fn sign(&mut self, message: &[u8]) -> Result<XmssMtSignature> {
        let capacity = self.params.capacity();
        if self.index >= capacity {
            warn!(capacity, "refusing to sign with exhausted XMSS-MT key");
            return Err(Error::KeyExhausted { capacity });
        }
        let index = self.index;
        self.index += 1;
        trace!(index, "XMSS-MT sign");
        if self.index == capacity {
            warn!(capacity, "XMSS-MT key used its last index");
        }

        let hash = self.params.hash();
        let randomness = hash.message_randomness(&self.seeds.secret_prf, index)?;
        let digest = hash.message_digest(&randomness, &self.root, index, message)?;

        let mut layers = Vec::with_capacity(self.params.layers() as usize);
        layers.push(self.sign_bottom(index, &digest)?);
        let mut below_root = self
            .bottom
            .as_ref()
            .map(|bottom| bottom.root.clone())
            .ok_or(Error::AuthPathUnavailable { height: 0 })?;

        for layer in 1..self.params.layers() {
            let (reduced, root) = self.sign_upper(index, layer, &below_root)?;
            layers.push(reduced);
            below_root = root;
        }

        Ok(XmssMtSignature {
            params: self.params,
            index,
            randomness: randomness.to_vec(),
            layers,
        })
    }

    fn sign_bottom(&mut self, index: u64, digest: &[u8]) -> Result<ReducedSignature> {
        let (tree, leaf) = split_index(index, self.params.tree_height(), 0);
        let hasher = tree_hasher(&self.params, &self.seeds, &self.public_seed, 0, tree);

        let bottom = match self.bottom.take() {
            Some(bottom) if bottom.tree == tree => bottom,
            _ => {
                let (bds, root) = BdsState::restore(&hasher, u64::from(leaf))?;
                BottomTree {
                    tree,
                    root: root.into_value(),
                    bds,
                }
            }
        };
        let bottom = self.bottom.insert(bottom);

        let wots_signature = hasher.sign_leaf(digest, leaf)?;
        let auth_path = bottom.bds.auth_path().to_vec();
        bottom.bds.advance(leaf, &hasher)?;
        Ok(ReducedSignature::new(wots_signature, auth_path))
    }

    /// Reduced signature of `below_root` on `layer` and the root of the
    /// signing tree.
    fn sign_upper(
        &mut self,
        index: u64,
        layer: u32,
        below_root: &[u8],
    ) -> Result<(ReducedSignature, Vec<u8>)> {
        let (tree, leaf) = split_index(index, self.params.tree_height(), layer);
        let slot = &mut self.upper[layer as usize - 1];
        if let Some(cached) = slot.as_ref().filter(|c| c.tree == tree && c.leaf == leaf) {
            return Ok((cached.reduced.clone(), cached.root.clone()));
        }

        let hasher = tree_hasher(&self.params, &self.seeds, &self.public_seed, layer, tree);
        let (root, auth_path) = hasher.tree_hash_with_auth_path(leaf)?;
        let wots_signature = hasher.sign_leaf(below_root, leaf)?;
        let entry = UpperLayer {
            tree,
            leaf,
            root: root.into_value(),
            reduced: ReducedSignature::new(wots_signature, auth_path),
        };
        let out = (entry.reduced.clone(), entry.root.clone());
        *slot = Some(entry);
        Ok(out)
    }

    /// Serialize as `index || secret_seed || secret_prf || public_seed || root`
    /// with a `ceil(H / 8)`-byte index.
    ///
    /// # Errors
    ///
    /// `KeyExhausted` for an exhausted key.
    pub fn to_bytes(&self) -> Result<Zeroizing<Vec<u8>>> {
        let capacity = self.params.capacity();
        if self.index >= capacity {
            return Err(Error::KeyExhausted { capacity });
        }
        let ib = self.params.index_bytes();
        let mut out = Zeroizing::new(vec![0u8; self.params.private_key_bytes()]);
        to_byte(self.index, &mut out[..ib]);
        let mut offset = ib;
        for part in [
            &self.seeds.secret_seed,
            &self.seeds.secret_prf,
            &self.public_seed,
            &self.root,
        ] {
            out[offset..offset + part.len()].copy_from_slice(part);
            offset += part.len();
        }
        Ok(out)
    }

    /// Parse a serialized private key.
    ///
    /// The top tree is rebuilt to check the stored root; the per-layer
    /// state is rebuilt lazily on the next sign.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` for a wrong length, `IndexOutOfRange` for an index
    /// not below 2^H, `RootMismatch` if the stored root does not match.
    pub fn from_bytes(params: &XmssMtParams, bytes: &[u8]) -> Result<Self> {
        let expected = params.private_key_bytes();
        if bytes.len() != expected {
            return Err(Error::InvalidEncoding {
                what: "XMSS-MT private key",
                expected,
                actual: bytes.len(),
            });
        }

        let n = params.n();
        let ib = params.index_bytes();
        let index = to_int(&bytes[..ib]);
        if index >= params.capacity() {
            return Err(Error::IndexOutOfRange {
                index,
                limit: params.capacity(),
            });
        }
        let field = |i: usize| &bytes[ib + i * n..ib + (i + 1) * n];
        let seeds = SecretSeeds::new(field(0), field(1));

        let (sk, _) = Self::build(params, seeds, field(2).to_vec(), index, Some(field(3)))?;
        debug!(
            digest = %params.digest(),
            total_height = params.total_height(),
            layers = params.layers(),
            index,
            "restored XMSS-MT private key"
        );
        Ok(sk)
    }
}

impl PartialEq for XmssMtPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
            && self.index == other.index
            && self.seeds == other.seeds
            && self.public_seed == other.public_seed
            && self.root == other.root
    }
}

impl Eq for XmssMtPrivateKey {}

impl fmt::Debug for XmssMtPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmssMtPrivateKey")
            .field("params", &self.params)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl Zeroize for XmssMtPrivateKey {
    fn zeroize(&mut self) {
        self.seeds.zeroize();
        self.index = self.params.capacity();
        self.bottom = None;
        self.upper.iter_mut().for_each(|slot| *slot = None);
    }
}

/// XMSS-MT as a [`StatefulSigner`].
#[derive(Clone, Copy, Debug, Default)]
pub struct XmssMt;

impl StatefulSigner for XmssMt {
    type Params = XmssMtParams;
    type SigningKey = XmssMtPrivateKey;
    type VerificationKey = XmssMtPublicKey;
    type Signature = XmssMtSignature;

    fn keygen(
        params: &Self::Params,
        rng: &mut impl CryptoRng,
    ) -> Result<(Self::SigningKey, Self::VerificationKey)> {
        let keys = XmssMtPrivateKey::generate(params, rng)?;
        debug!(
            digest = %params.digest(),
            total_height = params.total_height(),
            layers = params.layers(),
            w = params.wots().w(),
            "generated XMSS-MT key pair"
        );
        Ok(keys)
    }

    fn sign(sk: &mut Self::SigningKey, message: &[u8]) -> Result<Self::Signature> {
        sk.sign(message)
    }

    fn verify(pk: &Self::VerificationKey, message: &[u8], signature: &Self::Signature) -> bool {
        pk.verify(message, signature)
    }

    fn remaining_signatures(sk: &Self::SigningKey) -> u64 {
        sk.remaining_signatures()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestAlgorithm;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    fn params(total_height: u32, layers: u32) -> XmssMtParams {
        XmssMtParams::new(DigestAlgorithm::Sha256, total_height, layers, 16).unwrap()
    }

    #[test]
    fn test_split_index() {
        // h = 2, idx = 0b11_10_01
        let idx = 0b11_10_01;
        assert_eq!(split_index(idx, 2, 0), (0b11_10, 0b01));
        assert_eq!(split_index(idx, 2, 1), (0b11, 0b10));
        assert_eq!(split_index(idx, 2, 2), (0, 0b11));
        assert_eq!(split_index(u64::MAX, 20, 2), (15, (1 << 20) - 1));
        assert_eq!(split_index(u64::MAX, 20, 3).0, 0);
    }

    #[test]
    fn test_split_index_large_heights() {
        assert_eq!(split_index(u64::MAX, 64, 0), (0, u32::MAX));
        assert_eq!(split_index(u64::MAX, 40, 2), (0, 0));
        assert_eq!(split_index(5, u32::MAX, u32::MAX), (0, 0));
    }

    #[test]
    fn test_two_byte_index_roundtrip() {
        let p = XmssMtParams::new(DigestAlgorithm::Shake128, 10, 5, 4).unwrap();
        assert_eq!(p.index_bytes(), 2);
        let (mut sk, pk) =
            XmssMtPrivateKey::from_seeds(&p, &[1; 32], &[2; 32], &[3; 32]).unwrap();
        for _ in 0..300 {
            sk.sign(b"fill").unwrap();
        }

        let key_bytes = sk.to_bytes().unwrap();
        assert_eq!(&key_bytes[..2], &[0x01, 0x2c]);
        let mut restored = XmssMtPrivateKey::from_bytes(&p, &key_bytes).unwrap();
        assert_eq!(restored.index(), 300);
        assert_eq!(&*restored.to_bytes().unwrap(), &*key_bytes);

        let sig = sk.sign(b"wide").unwrap();
        assert_eq!(restored.sign(b"wide").unwrap(), sig);
        let sig_bytes = sig.to_bytes();
        assert_eq!(sig_bytes.len(), p.signature_bytes());
        assert_eq!(&sig_bytes[..2], &[0x01, 0x2c]);

        let parsed = XmssMtSignature::from_bytes(&p, &sig_bytes).unwrap();
        assert_eq!(parsed, sig);
        assert!(pk.verify(b"wide", &parsed));
    }

    #[test]
    fn test_signature_keeps_its_params() {
        let p = params(4, 2);
        let other = params(6, 2);
        let (mut sk, pk) =
            XmssMtPrivateKey::from_seeds(&p, &[1; 32], &[2; 32], &[3; 32]).unwrap();
        let sig = sk.sign(b"m").unwrap();
        assert_eq!(sig.params(), &p);
        assert_eq!(sig.to_bytes().len(), p.signature_bytes());

        let relabeled = XmssMtSignature {
            params: other,
            ..sig.clone()
        };
        assert!(!pk.verify(b"m", &relabeled));
        assert!(pk.verify(b"m", &sig));
    }

    #[test]
    fn test_rejects_indivisible_height() {
        assert_eq!(
            XmssMtParams::new(DigestAlgorithm::Sha256, 5, 3, 16),
            Err(Error::HeightNotDivisible {
                total_height: 5,
                layers: 3
            })
        );
    }

    #[test]
    fn test_sign_verify_every_index() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let p = params(4, 2);
        let (mut sk, pk) = XmssMt::keygen(&p, &mut rng).unwrap();

        for expected in 0..16u64 {
            let msg = expected.to_be_bytes();
            let sig = XmssMt::sign(&mut sk, &msg).unwrap();
            assert_eq!(sig.index(), expected);
            assert_eq!(sig.layers().len(), 2);
            assert!(XmssMt::verify(&pk, &msg, &sig), "index {expected}");
            assert!(!XmssMt::verify(&pk, b"other", &sig));
        }
        assert_eq!(
            XmssMt::sign(&mut sk, b"x"),
            Err(Error::KeyExhausted { capacity: 16 })
        );
    }

    #[test]
    fn test_three_layers() {
        let p = params(6, 3);
        let (mut sk, pk) =
            XmssMtPrivateKey::from_seeds(&p, &[1; 32], &[2; 32], &[3; 32]).unwrap();
        for _ in 0..5 {
            let sig = sk.sign(b"three layers").unwrap();
            assert!(pk.verify(b"three layers", &sig));
        }
    }

    #[test]
    fn test_single_layer_matches_xmss_root() {
        let mt = params(3, 1);
        let single = crate::params::XmssParams::new(DigestAlgorithm::Sha256, 3, 16).unwrap();
        let (_, mt_pk) = XmssMtPrivateKey::from_seeds(&mt, &[1; 32], &[2; 32], &[3; 32]).unwrap();
        let (_, pk) =
            crate::xmss::XmssPrivateKey::from_seeds(&single, &[1; 32], &[2; 32], &[3; 32]).unwrap();
        assert_eq!(mt_pk.root(), pk.root());
    }

    #[test]
    fn test_signature_roundtrip() {
        let p = params(4, 2);
        let (mut sk, pk) =
            XmssMtPrivateKey::from_seeds(&p, &[4; 32], &[5; 32], &[6; 32]).unwrap();
        for _ in 0..5 {
            sk.sign(b"skip").unwrap();
        }
        let sig = sk.sign(b"payload").unwrap();
        let bytes = sig.to_bytes();
        assert_eq!(bytes.len(), p.signature_bytes());
        assert_eq!(bytes[0], 5);

        let parsed = XmssMtSignature::from_bytes(&p, &bytes).unwrap();
        assert_eq!(parsed, sig);
        assert!(pk.verify(b"payload", &parsed));

        assert!(matches!(
            XmssMtSignature::from_bytes(&p, &bytes[1..]),
            Err(Error::InvalidEncoding { .. })
        ));
        let mut bad = bytes.clone();
        bad[0] = 16;
        assert_eq!(
            XmssMtSignature::from_bytes(&p, &bad),
            Err(Error::IndexOutOfRange {
                index: 16,
                limit: 16
            })
        );
    }

    #[test]
    fn test_private_key_roundtrip_resumes() {
        let p = params(4, 2);
        let (mut sk, pk) =
            XmssMtPrivateKey::from_seeds(&p, &[7; 32], &[8; 32], &[9; 32]).unwrap();
        for _ in 0..6 {
            sk.sign(b"m").unwrap();
        }

        let bytes = sk.to_bytes().unwrap();
        assert_eq!(bytes.len(), 1 + 4 * 32);
        let mut restored = XmssMtPrivateKey::from_bytes(&p, &bytes).unwrap();
        assert_eq!(restored, sk);

        let a = sk.sign(b"next").unwrap();
        let b = restored.sign(b"next").unwrap();
        assert_eq!(a, b);
        assert!(pk.verify(b"next", &b));

        let mut bad_root = bytes.clone();
        let last = bad_root.len() - 1;
        bad_root[last] ^= 1;
        assert_eq!(
            XmssMtPrivateKey::from_bytes(&p, &bad_root),
            Err(Error::RootMismatch)
        );
    }

    #[test]
    fn test_wrong_layer_order_rejected() {
        let p = params(4, 2);
        let (mut sk, pk) =
            XmssMtPrivateKey::from_seeds(&p, &[1; 32], &[2; 32], &[3; 32]).unwrap();
        let sig = sk.sign(b"m").unwrap();
        let swapped = XmssMtSignature {
            params: sig.params,
            index: sig.index,
            randomness: sig.randomness.clone(),
            layers: vec![sig.layers[1].clone(), sig.layers[0].clone()],
        };
        assert!(!pk.verify(b"m", &swapped));

        let truncated = XmssMtSignature {
            layers: vec![sig.layers[0].clone()],
            ..sig
        };
        assert!(!pk.verify(b"m", &truncated));
    }
}
