//! L-tree compression of a WOTS+ public key into one leaf.

use crate::address::Subtree;
use crate::hash::KeyedHash;
use tilia_core::{Error, Result};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Compress `public_key` (`len` elements of n bytes) into a single n-byte
/// value using the L-tree of leaf `ltree_index`.
///
/// Adjacent pairs are combined with `randomize_hash`; an unpaired trailing
/// element is carried up unchanged. The result is the hash tree leaf, at
/// height 0 of the hash tree.
pub fn ltree(
    hash: &KeyedHash,
    public_key: &[u8],
    public_seed: &[u8],
    subtree: Subtree,
    ltree_index: u32,
) -> Result<Vec<u8>> {
    let n = hash.n();
    if public_key.is_empty() || public_key.len() % n != 0 {
        return Err(Error::InvalidLength {
            what: "WOTS+ public key",
            expected: n * public_key.len().div_ceil(n).max(1),
            actual: public_key.len(),
        });
    }

    let mut nodes = public_key.to_vec();
    let mut len = nodes.len() / n;
    let mut height = 0u32;

    while len > 1 {
        let pairs = len / 2;
        for i in 0..pairs {
            let adrs = subtree.ltree(ltree_index, height, i as u32);
            let parent = hash.randomize_hash(
                &nodes[2 * i * n..(2 * i + 1) * n],
                &nodes[(2 * i + 1) * n..(2 * i + 2) * n],
                public_seed,
                &adrs,
            )?;
            nodes[i * n..(i + 1) * n].copy_from_slice(&parent);
        }
        if len % 2 == 1 {
            nodes.copy_within((len - 1) * n..len * n, pairs * n);
        }
        len = len.div_ceil(2);
        height += 1;
    }

    nodes.truncate(n);
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DigestAlgorithm;

    const N: usize = 32;

    fn hash() -> KeyedHash {
        KeyedHash::new(DigestAlgorithm::Sha256)
    }

    #[test]
    fn test_single_element_is_identity() {
        let pk = [9u8; N];
        let out = ltree(&hash(), &pk, &[0u8; N], Subtree::default(), 0).unwrap();
        assert_eq!(out, pk.to_vec());
    }

    #[test]
    fn test_two_elements() {
        let h = hash();
        let seed = [1u8; N];
        let mut pk = [0u8; 2 * N];
        pk[..N].fill(3);
        pk[N..].fill(4);

        let expected = h
            .randomize_hash(&pk[..N], &pk[N..], &seed, &Subtree::default().ltree(7, 0, 0))
            .unwrap();
        assert_eq!(ltree(&h, &pk, &seed, Subtree::default(), 7).unwrap(), expected);
    }

    #[test]
    fn test_odd_element_carries_forward() {
        let h = hash();
        let seed = [1u8; N];
        let st = Subtree::new(0, 2);
        let mut pk = vec![0u8; 3 * N];
        for (i, chunk) in pk.chunks_mut(N).enumerate() {
            chunk.fill(i as u8 + 1);
        }

        let left = h
            .randomize_hash(&pk[..N], &pk[N..2 * N], &seed, &st.ltree(0, 0, 0))
            .unwrap();
        let expected = h
            .randomize_hash(&left, &pk[2 * N..], &seed, &st.ltree(0, 1, 0))
            .unwrap();
        assert_eq!(ltree(&h, &pk, &seed, st, 0).unwrap(), expected);
    }

    #[test]
    fn test_invalid_length() {
        assert!(ltree(&hash(), &[], &[0u8; N], Subtree::default(), 0).is_err());
        assert!(ltree(&hash(), &[0u8; N + 1], &[0u8; N], Subtree::default(), 0).is_err());
    }
}
