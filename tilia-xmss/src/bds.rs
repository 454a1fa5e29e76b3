//! BDS authentication path traversal.
//!
//! Keeps the authentication path of the next leaf ready so that signing
//! never rebuilds the tree. After leaf s is used, one round derives the path
//! of s + 1 from the current path, a few `keep` nodes and the tails of
//! incremental [`TreeHash`] instances (one per height), then spends a fixed
//! budget of leaf computations on the instance with the lowest pending node.
//! Memory is O(h) nodes plus the shared stack; time per signature is about
//! h/2 leaf computations.

use crate::treehash::{Node, NodeStack, TreeHash, TreeHasher};
use tilia_core::{Error, Result};

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Traversal state of one tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BdsState {
    height: u32,
    auth: Vec<Vec<u8>>,
    keep: Vec<Option<Vec<u8>>>,
    treehash: Vec<TreeHash>,
    stack: NodeStack,
}

impl BdsState {
    /// Build the whole tree once, returning the traversal state for leaf 0
    /// and the root.
    ///
    /// While the tree is built, the authentication path of leaf 0 (the node
    /// with index 1 at each height) and the first future authentication
    /// node per height (index 3) are captured.
    pub fn initialize(hasher: &TreeHasher<'_>) -> Result<(Self, Node)> {
        let height = hasher.height();
        let h = height as usize;
        let mut auth: Vec<Option<Vec<u8>>> = vec![None; h];
        let mut tails: Vec<Option<Node>> = vec![None; h];

        let root = hasher.reduce(0, height, |node, index| {
            let level = node.height() as usize;
            if level >= h {
                return;
            }
            match index {
                1 => auth[level] = Some(node.value().to_vec()),
                3 => tails[level] = Some(node.clone()),
                _ => {}
            }
        })?;

        let auth = auth
            .into_iter()
            .enumerate()
            .map(|(level, node)| node.ok_or(Error::AuthPathUnavailable { height: level as u32 }))
            .collect::<Result<Vec<_>>>()?;
        let treehash = tails
            .into_iter()
            .enumerate()
            .map(|(level, tail)| TreeHash::completed(level as u32, tail))
            .collect();

        let state = Self {
            height,
            auth,
            keep: vec![None; h],
            treehash,
            stack: NodeStack::with_capacity(h + 1),
        };
        Ok((state, root))
    }

    /// Rebuild the state for leaf `index` by replaying every round before it.
    ///
    /// Costs about `index * h / 2` leaf computations on top of the initial
    /// tree build.
    pub fn restore(hasher: &TreeHasher<'_>, index: u64) -> Result<(Self, Node)> {
        let (mut state, root) = Self::initialize(hasher)?;
        let last = (1u64 << state.height) - 1;
        for leaf in 0..index.min(last) {
            state.advance(leaf as u32, hasher)?;
        }
        Ok((state, root))
    }

    /// Tree height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Authentication path of the next leaf to be used, bottom first.
    #[must_use]
    pub fn auth_path(&self) -> &[Vec<u8>] {
        &self.auth
    }

    /// Move from leaf `leaf` to `leaf + 1`.
    ///
    /// Does nothing after the last leaf.
    pub fn advance(&mut self, leaf: u32, hasher: &TreeHasher<'_>) -> Result<()> {
        if u64::from(leaf) >= (1u64 << self.height) - 1 {
            return Ok(());
        }
        self.round(leaf, hasher)?;
        self.update_treehash(self.height.div_ceil(2), hasher)
    }

    fn round(&mut self, leaf: u32, hasher: &TreeHasher<'_>) -> Result<()> {
        let h = self.height;
        // Height of the first left node on the path from `leaf` to the root.
        let tau = (0..h).find(|&i| (leaf >> i) & 1 == 0).unwrap_or(h);
        let t = tau as usize;

        let pending = if tau > 0 {
            let right = self.keep[t - 1]
                .take()
                .ok_or(Error::AuthPathUnavailable { height: tau - 1 })?;
            Some((self.auth[t - 1].clone(), right))
        } else {
            None
        };

        if tau + 1 < h && (leaf >> (tau + 1)) & 1 == 0 {
            self.keep[t] = Some(self.auth[t].clone());
        }

        match pending {
            None => self.auth[0] = hasher.leaf(leaf)?,
            Some((left, right)) => {
                let parent = hasher.combine(
                    &Node::new(tau - 1, left),
                    &Node::new(tau - 1, right),
                    leaf >> tau,
                )?;
                self.auth[t] = parent.into_value();

                for i in 0..t {
                    let tail = self.treehash[i]
                        .take_tail()
                        .ok_or(Error::AuthPathUnavailable { height: i as u32 })?;
                    self.auth[i] = tail.into_value();
                }

                for i in 0..tau {
                    let start = u64::from(leaf) + 1 + 3 * (1u64 << i);
                    if start < 1u64 << h {
                        self.treehash[i as usize].initialize(start as u32);
                    }
                }
            }
        }
        Ok(())
    }

    fn update_treehash(&mut self, budget: u32, hasher: &TreeHasher<'_>) -> Result<()> {
        for _ in 0..budget {
            let mut best: Option<(usize, u32)> = None;
            for (i, th) in self.treehash.iter().enumerate() {
                if let Some(low) = th.lowest_height(&self.stack) {
                    if best.map_or(true, |(_, b)| low < b) {
                        best = Some((i, low));
                    }
                }
            }
            let Some((level, _)) = best else { break };
            self.treehash[level].update(&mut self.stack, hasher)?;
        }
        Ok(())
    }
}
