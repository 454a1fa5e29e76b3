//! ADRS (Address) structure for domain separation in XMSS.
//!
//! Every keyed hash call is tagged with a 32-byte address telling which
//! layer, which tree, which node and which purpose the call serves. The three
//! address kinds share the layer, tree and key-and-mask words and differ in
//! the three words in between.

use tilia_core::{Error, Result};
use zeroize::Zeroize;

/// Encoded size of an address in bytes.
pub const ADDRESS_BYTES: usize = 32;

/// Address type words as encoded at bytes 12-15.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdrsType {
    /// WOTS+ hash address (chain computation and per-leaf seed derivation).
    Ots = 0,
    /// L-tree address (WOTS+ public key compression).
    LTree = 1,
    /// Hash tree node address.
    HashTree = 2,
}

/// Kind-specific payload of an address (bytes 16-27).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroize)]
pub enum AddressKind {
    /// WOTS+ chain step.
    Ots {
        /// Index of the one-time key pair (leaf index).
        ots: u32,
        /// Chain index within the one-time key.
        chain: u32,
        /// Position within the chain.
        hash: u32,
    },
    /// Node inside an L-tree.
    LTree {
        /// Index of the L-tree (leaf index).
        ltree: u32,
        /// Height of the children being combined.
        tree_height: u32,
        /// Index of the resulting node at the next height.
        tree_index: u32,
    },
    /// Node inside the hash tree. Bytes 16-19 are zero padding.
    HashTree {
        /// Height of the children being combined.
        tree_height: u32,
        /// Index of the resulting node at the next height.
        tree_index: u32,
    },
}

/// 32-byte ADRS structure for domain separation.
///
/// Layout (all fields big-endian):
/// - Bytes 0-3: Layer address
/// - Bytes 4-11: Tree address
/// - Bytes 12-15: Type (0 = OTS, 1 = L-tree, 2 = hash tree)
/// - Bytes 16-19: OTS address / L-tree address / padding
/// - Bytes 20-23: Chain address / tree height / tree height
/// - Bytes 24-27: Hash address / tree index / tree index
/// - Bytes 28-31: Key and mask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroize)]
pub struct Address {
    layer: u32,
    tree: u64,
    kind: AddressKind,
    key_and_mask: u32,
}

impl Address {
    /// Create a WOTS+ hash address.
    #[must_use]
    pub const fn ots(layer: u32, tree: u64, ots: u32, chain: u32, hash: u32) -> Self {
        Self {
            layer,
            tree,
            kind: AddressKind::Ots { ots, chain, hash },
            key_and_mask: 0,
        }
    }

    /// Create an L-tree address.
    #[must_use]
    pub const fn ltree(layer: u32, tree: u64, ltree: u32, tree_height: u32, tree_index: u32) -> Self {
        Self {
            layer,
            tree,
            kind: AddressKind::LTree {
                ltree,
                tree_height,
                tree_index,
            },
            key_and_mask: 0,
        }
    }

    /// Create a hash tree node address.
    #[must_use]
    pub const fn hash_tree(layer: u32, tree: u64, tree_height: u32, tree_index: u32) -> Self {
        Self {
            layer,
            tree,
            kind: AddressKind::HashTree {
                tree_height,
                tree_index,
            },
            key_and_mask: 0,
        }
    }

    /// Copy the address with a different key-and-mask word.
    #[must_use]
    pub const fn with_key_and_mask(mut self, key_and_mask: u32) -> Self {
        self.key_and_mask = key_and_mask;
        self
    }

    /// Get the layer address.
    #[must_use]
    pub const fn layer(&self) -> u32 {
        self.layer
    }

    /// Get the tree address.
    #[must_use]
    pub const fn tree(&self) -> u64 {
        self.tree
    }

    /// Get the kind-specific payload.
    #[must_use]
    pub const fn kind(&self) -> AddressKind {
        self.kind
    }

    /// Get the key-and-mask word.
    #[must_use]
    pub const fn key_and_mask(&self) -> u32 {
        self.key_and_mask
    }

    /// Get the address type.
    #[must_use]
    pub const fn adrs_type(&self) -> AdrsType {
        match self.kind {
            AddressKind::Ots { .. } => AdrsType::Ots,
            AddressKind::LTree { .. } => AdrsType::LTree,
            AddressKind::HashTree { .. } => AdrsType::HashTree,
        }
    }

    /// Encode the address into its 32-byte form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; ADDRESS_BYTES] {
        let (w1, w2, w3) = match self.kind {
            AddressKind::Ots { ots, chain, hash } => (ots, chain, hash),
            AddressKind::LTree {
                ltree,
                tree_height,
                tree_index,
            } => (ltree, tree_height, tree_index),
            AddressKind::HashTree {
                tree_height,
                tree_index,
            } => (0, tree_height, tree_index),
        };

        let mut out = [0u8; ADDRESS_BYTES];
        out[0..4].copy_from_slice(&self.layer.to_be_bytes());
        out[4..12].copy_from_slice(&self.tree.to_be_bytes());
        out[12..16].copy_from_slice(&(self.adrs_type() as u32).to_be_bytes());
        out[16..20].copy_from_slice(&w1.to_be_bytes());
        out[20..24].copy_from_slice(&w2.to_be_bytes());
        out[24..28].copy_from_slice(&w3.to_be_bytes());
        out[28..32].copy_from_slice(&self.key_and_mask.to_be_bytes());
        out
    }

    /// Decode an address from its 32-byte form.
    ///
    /// Fails if `bytes` is not exactly 32 bytes long, if the type word is
    /// unknown, or if the padding word of a hash tree address is non-zero.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != ADDRESS_BYTES {
            return Err(Error::InvalidLength {
                what: "address",
                expected: ADDRESS_BYTES,
                actual: bytes.len(),
            });
        }

        let word = |offset: usize| {
            u32::from_be_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };
        let mut tree = [0u8; 8];
        tree.copy_from_slice(&bytes[4..12]);

        let (w1, w2, w3) = (word(16), word(20), word(24));
        let kind = match word(12) {
            0 => AddressKind::Ots {
                ots: w1,
                chain: w2,
                hash: w3,
            },
            1 => AddressKind::LTree {
                ltree: w1,
                tree_height: w2,
                tree_index: w3,
            },
            2 if w1 == 0 => AddressKind::HashTree {
                tree_height: w2,
                tree_index: w3,
            },
            2 => {
                return Err(Error::InvalidEncoding {
                    what: "hash tree address padding",
                    expected: 0,
                    actual: 4,
                })
            }
            value => return Err(Error::InvalidAddressType { value }),
        };

        Ok(Self {
            layer: word(0),
            tree: u64::from_be_bytes(tree),
            kind,
            key_and_mask: word(28),
        })
    }
}

/// One XMSS tree inside a (hyper)tree: the shared part of every address used
/// while working on that tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Subtree {
    /// Layer of the tree (0 = bottom).
    pub layer: u32,
    /// Index of the tree within its layer.
    pub tree: u64,
}

impl Subtree {
    /// Create a subtree locator.
    #[must_use]
    pub const fn new(layer: u32, tree: u64) -> Self {
        Self { layer, tree }
    }

    /// WOTS+ address within this tree.
    #[must_use]
    pub const fn ots(&self, ots: u32, chain: u32, hash: u32) -> Address {
        Address::ots(self.layer, self.tree, ots, chain, hash)
    }

    /// L-tree address within this tree.
    #[must_use]
    pub const fn ltree(&self, ltree: u32, tree_height: u32, tree_index: u32) -> Address {
        Address::ltree(self.layer, self.tree, ltree, tree_height, tree_index)
    }

    /// Hash tree address within this tree.
    #[must_use]
    pub const fn hash_tree(&self, tree_height: u32, tree_index: u32) -> Address {
        Address::hash_tree(self.layer, self.tree, tree_height, tree_index)
    }
}
