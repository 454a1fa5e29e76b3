//! Parallel leaf computation using Rayon.
//!
//! Leaves of a tree are independent: each is a WOTS+ key generation followed
//! by an L-tree. They are computed on the Rayon pool into one buffer; the
//! TreeHash reduction that consumes them stays sequential, so roots and
//! authentication paths are identical to the single-threaded build.

use crate::treehash::TreeHasher;
use rayon::prelude::*;
use std::vec::Vec;
use tilia_core::Result;

/// Compute leaves `start..start + count` of the tree bound to `hasher`, in
/// leaf order.
pub fn leaves(hasher: &TreeHasher<'_>, start: u32, count: u32) -> Result<Vec<Vec<u8>>> {
    let mut out = vec![Vec::new(); count as usize];
    out.par_iter_mut()
        .enumerate()
        .try_for_each(|(offset, slot)| -> Result<()> {
            *slot = hasher.leaf(start + offset as u32)?;
            Ok(())
        })?;
    Ok(out)
}
