//! XMSS (eXtended Merkle Signature Scheme), single tree.
//!
//! One tree of 2^h WOTS+ key pairs. The private key owns the index of the
//! next unused leaf and a BDS traversal state; the public key is the tree
//! root and the public seed.
//!
//! Signing reserves the index before any signature material is computed, so
//! a failed or interrupted sign burns the index rather than risking reuse.

use crate::address::Subtree;
use crate::bds::BdsState;
use crate::hash::KeyedHash;
use crate::ltree::ltree;
use crate::params::{WotsParams, XmssParams, XMSS_SIGNATURE_INDEX_BYTES};
use crate::treehash::TreeHasher;
use crate::utils::{to_byte, to_int};
use crate::wots::Wots;
use core::fmt;
use rand_core::CryptoRng;
use subtle::ConstantTimeEq;
use tilia_core::{Error, Result, StatefulSigner};
use tracing::{debug, trace, warn};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Secret seeds of a private key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct SecretSeeds {
    pub(crate) secret_seed: Vec<u8>,
    pub(crate) secret_prf: Vec<u8>,
}

impl SecretSeeds {
    pub(crate) fn new(secret_seed: &[u8], secret_prf: &[u8]) -> Self {
        Self {
            secret_seed: secret_seed.to_vec(),
            secret_prf: secret_prf.to_vec(),
        }
    }

    pub(crate) fn generate(n: usize, rng: &mut impl CryptoRng) -> Self {
        let mut seeds = Self {
            secret_seed: vec![0u8; n],
            secret_prf: vec![0u8; n],
        };
        rng.fill_bytes(&mut seeds.secret_seed);
        rng.fill_bytes(&mut seeds.secret_prf);
        seeds
    }
}

impl PartialEq for SecretSeeds {
    fn eq(&self, other: &Self) -> bool {
        (self.secret_seed.ct_eq(&other.secret_seed) & self.secret_prf.ct_eq(&other.secret_prf))
            .into()
    }
}

impl Eq for SecretSeeds {}

pub(crate) fn check_seed(what: &'static str, seed: &[u8], n: usize) -> Result<()> {
    if seed.len() != n {
        return Err(Error::InvalidLength {
            what,
            expected: n,
            actual: seed.len(),
        });
    }
    Ok(())
}

/// WOTS+ signature and authentication path for one tree.
///
/// The building block of both XMSS and XMSS-MT signatures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReducedSignature {
    wots_signature: Vec<u8>,
    auth_path: Vec<Vec<u8>>,
}

impl ReducedSignature {
    /// Assemble from parts.
    #[must_use]
    pub fn new(wots_signature: Vec<u8>, auth_path: Vec<Vec<u8>>) -> Self {
        Self {
            wots_signature,
            auth_path,
        }
    }

    /// WOTS+ signature, `len` elements of n bytes.
    #[must_use]
    pub fn wots_signature(&self) -> &[u8] {
        &self.wots_signature
    }

    /// Authentication path, bottom first.
    #[must_use]
    pub fn auth_path(&self) -> &[Vec<u8>] {
        &self.auth_path
    }

    /// Recompute the root of the tree at `subtree` that this signature of
    /// `message` by leaf `leaf` commits to.
    pub fn recover_root(
        &self,
        wots_params: &WotsParams,
        hash: &KeyedHash,
        message: &[u8],
        public_seed: &[u8],
        subtree: Subtree,
        leaf: u32,
    ) -> Result<Vec<u8>> {
        let wots = Wots::new(wots_params, *hash, public_seed);
        let pk = wots.public_key_from_signature(&self.wots_signature, message, subtree, leaf)?;
        let leaf_value = ltree(hash, &pk, public_seed, subtree, leaf)?;
        TreeHasher::root_from_auth_path(
            hash,
            leaf_value,
            leaf,
            &self.auth_path,
            public_seed,
            subtree,
        )
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.wots_signature);
        for node in &self.auth_path {
            out.extend_from_slice(node);
        }
    }

    /// Split `bytes` (already length-checked) into WOTS+ signature and
    /// `height` authentication nodes of n bytes.
    pub(crate) fn read_from(bytes: &[u8], wots_bytes: usize, n: usize) -> Self {
        let (wots, auth) = bytes.split_at(wots_bytes);
        Self {
            wots_signature: wots.to_vec(),
            auth_path: auth.chunks_exact(n).map(<[u8]>::to_vec).collect(),
        }
    }
}

/// XMSS public key: root and public seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmssPublicKey {
    params: XmssParams,
    root: Vec<u8>,
    public_seed: Vec<u8>,
}

impl XmssPublicKey {
    /// Parameter set of the key.
    #[must_use]
    pub fn params(&self) -> &XmssParams {
        &self.params
    }

    /// Tree root.
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
    pub fn from_bytes(params: &XmssParams, bytes: &[u8]) -> Result<Self> {
        let expected = params.public_key_bytes();
        if bytes.len() != expected {
            return Err(Error::InvalidEncoding {
                what: "XMSS public key",
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
    /// Returns `false` for any invalid or malformed signature.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &XmssSignature) -> bool {
        self.verify_inner(message, signature).unwrap_or(false)
    }

    fn verify_inner(&self, message: &[u8], signature: &XmssSignature) -> Result<bool> {
        let p = &self.params;
        if u64::from(signature.index) >= p.leaves()
            || signature.reduced.auth_path.len() != p.height() as usize
        {
            return Ok(false);
        }

        let hash = p.hash();
        let digest = hash.message_digest(
            &signature.randomness,
            &self.root,
            u64::from(signature.index),
            message,
        )?;
        let root = signature.reduced.recover_root(
            p.wots(),
            &hash,
            &digest,
            &self.public_seed,
            Subtree::default(),
            signature.index,
        )?;
        Ok(root.ct_eq(&self.root).into())
    }
}

/// XMSS signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmssSignature {
    index: u32,
    randomness: Vec<u8>,
    reduced: ReducedSignature,
}

impl XmssSignature {
    /// Leaf index used.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Message randomization value r.
    #[must_use]
    pub fn randomness(&self) -> &[u8] {
        &self.randomness
    }

    /// WOTS+ signature and authentication path.
    #[must_use]
    pub fn reduced(&self) -> &ReducedSignature {
        &self.reduced
    }

    /// Serialize as `index(4) || r || wots_signature || auth_path`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.index.to_be_bytes());
        out.extend_from_slice(&self.randomness);
        self.reduced.write_to(&mut out);
        out
    }

    /// Parse a serialized signature.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` for a wrong length, `IndexOutOfRange` if the index
    /// does not address a leaf of the tree.
    pub fn from_bytes(params: &XmssParams, bytes: &[u8]) -> Result<Self> {
        let expected = params.signature_bytes();
        if bytes.len() != expected {
            return Err(Error::InvalidEncoding {
                what: "XMSS signature",
                expected,
                actual: bytes.len(),
            });
        }

        let n = params.n();
        let (index, rest) = bytes.split_at(XMSS_SIGNATURE_INDEX_BYTES);
        let index = to_int(index);
        if index >= params.leaves() {
            return Err(Error::IndexOutOfRange {
                index,
                limit: params.leaves(),
            });
        }
        let (randomness, rest) = rest.split_at(n);
        Ok(Self {
            index: index as u32,
            randomness: randomness.to_vec(),
            reduced: ReducedSignature::read_from(rest, params.wots().signature_bytes(), n),
        })
    }
}

/// XMSS private key.
///
/// Not `Clone`: two copies of a private key would hand out the same one-time
/// keys. Share a key between threads with [`tilia_core::LockedSigningKey`].
pub struct XmssPrivateKey {
    params: XmssParams,
    index: u64,
    seeds: SecretSeeds,
    public_seed: Vec<u8>,
    root: Vec<u8>,
    bds: BdsState,
}

impl XmssPrivateKey {
    /// Generate a key pair with seeds drawn from `rng`.
    pub fn generate(
        params: &XmssParams,
        rng: &mut impl CryptoRng,
    ) -> Result<(Self, XmssPublicKey)> {
        let n = params.n();
        let seeds = SecretSeeds::generate(n, rng);
        let mut public_seed = vec![0u8; n];
        rng.fill_bytes(&mut public_seed);
        Self::build(params, seeds, public_seed, 0, None)
    }

    /// Deterministic key generation from caller-provided seeds.
    pub fn from_seeds(
        params: &XmssParams,
        secret_seed: &[u8],
        secret_prf: &[u8],
        public_seed: &[u8],
    ) -> Result<(Self, XmssPublicKey)> {
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
        params: &XmssParams,
        seeds: SecretSeeds,
        public_seed: Vec<u8>,
        index: u64,
        expected_root: Option<&[u8]>,
    ) -> Result<(Self, XmssPublicKey)> {
        let hasher = TreeHasher::new(
            params.wots(),
            params.hash(),
            &seeds.secret_seed,
            &public_seed,
            Subtree::default(),
            params.height(),
        );
        let (bds, root) = BdsState::restore(&hasher, index)?;
        let root = root.into_value();

        if let Some(expected) = expected_root {
            if !bool::from(root.ct_eq(expected)) {
                return Err(Error::RootMismatch);
            }
        }

        let pk = XmssPublicKey {
            params: *params,
            root: root.clone(),
            public_seed: public_seed.clone(),
        };
        let sk = Self {
            params: *params,
            index,
            seeds,
            public_seed,
            root,
            bds,
        };
        Ok((sk, pk))
    }

    /// Parameter set of the key.
    #[must_use]
    pub fn params(&self) -> &XmssParams {
        &self.params
    }

    /// Index of the next leaf to be used.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Number of signatures the key can still produce.
    #[must_use]
    pub fn remaining_signatures(&self) -> u64 {
        self.params.leaves().saturating_sub(self.index)
    }

    /// Matching public key.
    #[must_use]
    pub fn public_key(&self) -> XmssPublicKey {
        XmssPublicKey {
            params: self.params,
            root: self.root.clone(),
            public_seed: self.public_seed.clone(),
        }
    }

    /// Sign `message` with the next unused leaf.
    ///
    /// # Errors
    ///
    /// `KeyExhausted` once all 2^h leaves are used.
    pub fn sign(&mut self, message: &[u8]) -> Result<XmssSignature> {
        let capacity = self.params.leaves();
        if self.index >= capacity {
            warn!(capacity, "refusing to sign with exhausted XMSS key");
            return Err(Error::KeyExhausted { capacity });
        }
        let index = self.index;
        self.index += 1;
        trace!(index, "XMSS sign");
        if self.index == capacity {
            warn!(capacity, "XMSS key used its last index");
        }

        let hash = self.params.hash();
        let randomness = hash.message_randomness(&self.seeds.secret_prf, index)?;
        let digest = hash.message_digest(&randomness, &self.root, index, message)?;

        let hasher = TreeHasher::new(
            self.params.wots(),
            hash,
            &self.seeds.secret_seed,
            &self.public_seed,
            Subtree::default(),
            self.params.height(),
        );
        let leaf = index as u32;
        let wots_signature = hasher.sign_leaf(&digest, leaf)?;
        let auth_path = self.bds.auth_path().to_vec();
        self.bds.advance(leaf, &hasher)?;

        Ok(XmssSignature {
            index: leaf,
            randomness: randomness.to_vec(),
            reduced: ReducedSignature::new(wots_signature, auth_path),
        })
    }

    /// Serialize as `index || secret_seed || secret_prf || public_seed || root`
    /// with a `ceil(h / 8)`-byte index.
    ///
    /// # Errors
    ///
    /// `KeyExhausted` for an exhausted key: its index may not fit the field.
    pub fn to_bytes(&self) -> Result<Zeroizing<Vec<u8>>> {
        let capacity = self.params.leaves();
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

    /// Parse a serialized private key and rebuild its traversal state.
    ///
    /// Rebuilding replays the traversal up to the stored index, which costs
    /// a full tree build plus about `index * h / 2` leaf computations.
    ///
    /// # Errors
    ///
    /// `InvalidEncoding` for a wrong length, `IndexOutOfRange` for an index
    /// past the last leaf, `RootMismatch` if the stored root is not the root
    /// of the tree the seeds generate.
    pub fn from_bytes(params: &XmssParams, bytes: &[u8]) -> Result<Self> {
        let expected = params.private_key_bytes();
        if bytes.len() != expected {
            return Err(Error::InvalidEncoding {
                what: "XMSS private key",
                expected,
                actual: bytes.len(),
            });
        }

        let n = params.n();
        let ib = params.index_bytes();
        let index = to_int(&bytes[..ib]);
        if index >= params.leaves() {
            return Err(Error::IndexOutOfRange {
                index,
                limit: params.leaves(),
            });
        }
        let field = |i: usize| &bytes[ib + i * n..ib + (i + 1) * n];
        let seeds = SecretSeeds::new(field(0), field(1));

        let (sk, _) = Self::build(params, seeds, field(2).to_vec(), index, Some(field(3)))?;
        debug!(
            digest = %params.digest(),
            height = params.height(),
            index,
            "restored XMSS private key"
        );
        Ok(sk)
    }
}

impl PartialEq for XmssPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params
            && self.index == other.index
            && self.seeds == other.seeds
            && self.public_seed == other.public_seed
            && self.root == other.root
    }
}

impl Eq for XmssPrivateKey {}

impl fmt::Debug for XmssPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmssPrivateKey")
            .field("params", &self.params)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl Zeroize for XmssPrivateKey {
    fn zeroize(&mut self) {
        self.seeds.zeroize();
        self.index = self.params.leaves();
    }
}

/// Single-tree XMSS as a [`StatefulSigner`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Xmss;

impl StatefulSigner for Xmss {
    type Params = XmssParams;
    type SigningKey = XmssPrivateKey;
    type VerificationKey = XmssPublicKey;
    type Signature = XmssSignature;

    fn keygen(
        params: &Self::Params,
        rng: &mut impl CryptoRng,
    ) -> Result<(Self::SigningKey, Self::VerificationKey)> {
        let keys = XmssPrivateKey::generate(params, rng)?;
        debug!(
            digest = %params.digest(),
            height = params.height(),
            w = params.wots().w(),
            "generated XMSS key pair"
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
