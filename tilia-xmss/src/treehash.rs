//! Hash tree construction with the stack-based TreeHash algorithm.
//!
//! Leaves are WOTS+ public keys compressed by the L-tree. Nodes are reduced
//! on a [`NodeStack`]: a node is pushed, and while the two topmost nodes have
//! equal height they are popped and combined into their parent. Building a
//! subtree of height t keeps at most t + 1 nodes on the stack.
//!
//! Two flavours are provided: [`TreeHasher::tree_hash`] runs the algorithm to
//! completion in one call, and [`TreeHash`] is an incremental instance that
//! ingests one leaf per [`TreeHash::update`] and shares its stack with
//! sibling instances, as needed by the BDS traversal.

use crate::address::Subtree;
use crate::hash::KeyedHash;
use crate::ltree::ltree;
use crate::params::{WotsParams, MAX_TREE_HEIGHT};
use crate::wots::Wots;
use core::fmt;
use tilia_core::{Error, Result};

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Leaves computed per batch by the full TreeHash.
const LEAF_BATCH: u32 = 64;

fn check_height(height: u32) -> Result<()> {
    if height > MAX_TREE_HEIGHT {
        return Err(Error::InvalidTreeHeight {
            height,
            min: 0,
            max: MAX_TREE_HEIGHT,
        });
    }
    Ok(())
}

/// A tree node: a value and the height it sits at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    height: u32,
    value: Vec<u8>,
}

impl Node {
    /// Wrap a value at `height`.
    #[must_use]
    pub fn new(height: u32, value: Vec<u8>) -> Self {
        Self { height, value }
    }

    /// Height above the leaves (leaves are height 0).
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Node value.
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Take the value out of the node.
    #[must_use]
    pub fn into_value(self) -> Vec<u8> {
        self.value
    }
}

/// Stack of nodes shared by TreeHash runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeStack {
    nodes: Vec<Node>,
}

impl NodeStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stack with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Push a node.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Pop the topmost node.
    pub fn pop(&mut self) -> Option<Node> {
        self.nodes.pop()
    }

    /// Height of the topmost node.
    #[must_use]
    pub fn top_height(&self) -> Option<u32> {
        self.nodes.last().map(Node::height)
    }

    /// Smallest height among the `count` topmost nodes.
    #[must_use]
    pub fn min_height_of_top(&self, count: usize) -> Option<u32> {
        let start = self.nodes.len().saturating_sub(count);
        self.nodes[start..].iter().map(Node::height).min()
    }

    /// Number of nodes on the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

/// Leaf and node computation for one tree of a (hyper)tree.
///
/// Borrows the seeds of the key being worked on; nothing is cached.
#[derive(Clone, Copy)]
pub struct TreeHasher<'a> {
    wots: Wots<'a>,
    hash: KeyedHash,
    secret_seed: &'a [u8],
    public_seed: &'a [u8],
    subtree: Subtree,
    height: u32,
}

impl<'a> TreeHasher<'a> {
    /// Bind to the tree at `subtree` of the given `height`.
    #[must_use]
    pub fn new(
        wots_params: &'a WotsParams,
        hash: KeyedHash,
        secret_seed: &'a [u8],
        public_seed: &'a [u8],
        subtree: Subtree,
        height: u32,
    ) -> Self {
        Self {
            wots: Wots::new(wots_params, hash, public_seed),
            hash,
            secret_seed,
            public_seed,
            subtree,
            height,
        }
    }

    /// Height of the tree.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Location of the tree.
    #[must_use]
    pub fn subtree(&self) -> Subtree {
        self.subtree
    }

    /// WOTS+ bound to this tree's public seed.
    #[must_use]
    pub fn wots(&self) -> &Wots<'a> {
        &self.wots
    }

    /// Leaf `index`: the L-tree of the leaf's WOTS+ public key.
    pub fn leaf(&self, index: u32) -> Result<Vec<u8>> {
        let pk = self.wots.public_key(self.secret_seed, self.subtree, index)?;
        ltree(&self.hash, &pk, self.public_seed, self.subtree, index)
    }

    /// WOTS+ signature of an n-byte `message` with the key of `leaf`.
    pub fn sign_leaf(&self, message: &[u8], leaf: u32) -> Result<Vec<u8>> {
        self.wots.sign(message, self.secret_seed, self.subtree, leaf)
    }

    /// Leaf node at height 0.
    pub fn leaf_node(&self, index: u32) -> Result<Node> {
        Ok(Node::new(0, self.leaf(index)?))
    }

    /// Combine two equal-height siblings into the parent at index
    /// `parent_index` one level up.
    pub fn combine(&self, left: &Node, right: &Node, parent_index: u32) -> Result<Node> {
        if left.height != right.height {
            return Err(Error::HeightMismatch {
                left: left.height,
                right: right.height,
            });
        }
        let adrs = self.subtree.hash_tree(left.height, parent_index);
        let value = self
            .hash
            .randomize_hash(&left.value, &right.value, self.public_seed, &adrs)?;
        Ok(Node::new(left.height + 1, value))
    }

    /// Compute leaves `start..start + count` in order.
    fn leaves(&self, start: u32, count: u32) -> Result<Vec<Vec<u8>>> {
        #[cfg(feature = "parallel")]
        {
            crate::parallel::leaves(self, start, count)
        }
        #[cfg(not(feature = "parallel"))]
        {
            (start..start + count).map(|i| self.leaf(i)).collect()
        }
    }

    /// Run TreeHash over the subtree of height `target_height` whose
    /// leftmost leaf is `start`, reporting every node produced (leaves
    /// included) to `visit` together with its index within its level.
    pub(crate) fn reduce(
        &self,
        start: u32,
        target_height: u32,
        mut visit: impl FnMut(&Node, u32),
    ) -> Result<Node> {
        check_height(target_height)?;
        let count = 1u32 << target_height;
        let end = start.checked_add(count).ok_or(Error::IndexOutOfRange {
            index: u64::from(start) + u64::from(count),
            limit: u64::from(u32::MAX),
        })?;
        let mut stack = NodeStack::with_capacity(target_height as usize + 1);

        let mut batch_start = start;
        while batch_start < end {
            let batch = LEAF_BATCH.min(end - batch_start);
            for (offset, value) in self.leaves(batch_start, batch)?.into_iter().enumerate() {
                let idx = batch_start + offset as u32;
                let mut node = Node::new(0, value);
                visit(&node, idx);

                while stack.top_height() == Some(node.height) {
                    let Some(left) = stack.pop() else { break };
                    node = self.combine(&left, &node, idx >> (node.height + 1))?;
                    visit(&node, idx >> node.height);
                }
                stack.push(node);
            }
            batch_start += batch;
        }

        match (stack.pop(), stack.is_empty()) {
            (Some(root), true) if root.height == target_height => Ok(root),
            _ => Err(Error::HeightMismatch {
                left: target_height,
                right: stack.top_height().unwrap_or(0),
            }),
        }
    }

    /// Root of the subtree of height `target_height` starting at leaf
    /// `start`. `start` must be a multiple of `2^target_height`.
    ///
    /// Heights above [`MAX_TREE_HEIGHT`] are rejected with
    /// `InvalidTreeHeight`.
    pub fn tree_hash(&self, start: u32, target_height: u32) -> Result<Node> {
        self.reduce(start, target_height, |_, _| {})
    }

    /// Root of the whole tree and the authentication path of `leaf`,
    /// computed in the same pass.
    pub fn tree_hash_with_auth_path(&self, leaf: u32) -> Result<(Node, Vec<Vec<u8>>)> {
        check_height(self.height)?;
        let mut auth: Vec<Option<Vec<u8>>> = vec![None; self.height as usize];
        let root = self.reduce(0, self.height, |node, index| {
            let h = node.height;
            if h < self.height && index == (leaf >> h) ^ 1 {
                auth[h as usize] = Some(node.value.clone());
            }
        })?;

        let auth = auth
            .into_iter()
            .enumerate()
            .map(|(h, node)| node.ok_or(Error::AuthPathUnavailable { height: h as u32 }))
            .collect::<Result<Vec<_>>>()?;
        Ok((root, auth))
    }

    /// Recompute a root from a leaf value and its authentication path.
    ///
    /// At each level the bit of `leaf` decides whether the current node is
    /// the left or the right child.
    pub fn root_from_auth_path(
        hash: &KeyedHash,
        leaf_value: Vec<u8>,
        leaf: u32,
        auth_path: &[Vec<u8>],
        public_seed: &[u8],
        subtree: Subtree,
    ) -> Result<Vec<u8>> {
        let mut node = leaf_value;
        for (j, sibling) in auth_path.iter().enumerate() {
            let adrs = subtree.hash_tree(j as u32, leaf >> (j + 1));
            node = if (leaf >> j) & 1 == 0 {
                hash.randomize_hash(&node, sibling, public_seed, &adrs)?
            } else {
                hash.randomize_hash(sibling, &node, public_seed, &adrs)?
            };
        }
        Ok(node)
    }
}

impl fmt::Debug for TreeHasher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeHasher")
            .field("digest", &self.hash.digest())
            .field("subtree", &self.subtree)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Lifecycle of an incremental [`TreeHash`] instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeHashState {
    /// Created, no start leaf assigned.
    Uninitialized,
    /// Start leaf assigned, nothing computed yet.
    Initialized,
    /// At least one leaf ingested, target not reached.
    Active,
    /// Tail node holds the finished subtree root.
    Complete,
}

/// Incremental TreeHash for one subtree of fixed target height.
///
/// The instance owns its target height, the next leaf to ingest and its
/// finished tail node. Intermediate nodes live on a [`NodeStack`] shared
/// with sibling instances and passed in on every update; the instance only
/// counts how many of the topmost entries are its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeHash {
    target_height: u32,
    next_index: u32,
    stack_usage: usize,
    state: TreeHashState,
    tail: Option<Node>,
}

impl TreeHash {
    /// Create an uninitialized instance for subtrees of `target_height`.
    #[must_use]
    pub fn new(target_height: u32) -> Self {
        Self {
            target_height,
            next_index: 0,
            stack_usage: 0,
            state: TreeHashState::Uninitialized,
            tail: None,
        }
    }

    /// Create an instance that is already complete, holding `tail` (if the
    /// subtree exists at all).
    #[must_use]
    pub fn completed(target_height: u32, tail: Option<Node>) -> Self {
        Self {
            target_height,
            next_index: 0,
            stack_usage: 0,
            state: TreeHashState::Complete,
            tail,
        }
    }

    /// Start computing the subtree whose leftmost leaf is `start`.
    ///
    /// Any previous tail is discarded.
    pub fn initialize(&mut self, start: u32) {
        self.next_index = start;
        self.stack_usage = 0;
        self.tail = None;
        self.state = TreeHashState::Initialized;
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> TreeHashState {
        self.state
    }

    /// Target height.
    #[must_use]
    pub fn target_height(&self) -> u32 {
        self.target_height
    }

    /// Next leaf to ingest.
    #[must_use]
    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    /// Finished subtree root, if complete.
    #[must_use]
    pub fn tail(&self) -> Option<&Node> {
        self.tail.as_ref()
    }

    /// Take the finished subtree root.
    pub fn take_tail(&mut self) -> Option<Node> {
        self.tail.take()
    }

    /// Lowest height this instance still has to work on.
    ///
    /// `None` once complete; the target height if nothing of its own is on
    /// the stack; otherwise the lowest of its stack entries.
    #[must_use]
    pub fn lowest_height(&self, stack: &NodeStack) -> Option<u32> {
        match self.state {
            TreeHashState::Uninitialized | TreeHashState::Complete => None,
            _ if self.stack_usage == 0 => Some(self.target_height),
            _ => stack.min_height_of_top(self.stack_usage),
        }
    }

    /// Ingest one leaf and collapse it with this instance's nodes on the
    /// shared stack.
    ///
    /// # Errors
    ///
    /// `TreeHashNotActive` if the instance is uninitialized or complete.
    pub fn update(&mut self, stack: &mut NodeStack, hasher: &TreeHasher<'_>) -> Result<()> {
        if matches!(
            self.state,
            TreeHashState::Uninitialized | TreeHashState::Complete
        ) {
            return Err(Error::TreeHashNotActive);
        }

        let idx = self.next_index;
        let mut node = hasher.leaf_node(idx)?;
        while self.stack_usage > 0 && stack.top_height() == Some(node.height) {
            let Some(left) = stack.pop() else { break };
            self.stack_usage -= 1;
            node = hasher.combine(&left, &node, idx >> (node.height + 1))?;
        }

        if node.height == self.target_height {
            self.tail = Some(node);
            self.state = TreeHashState::Complete;
        } else {
            stack.push(node);
            self.stack_usage += 1;
            self.next_index += 1;
            self.state = TreeHashState::Active;
        }
        Ok(())
    }
}
