//! XMSS and XMSS-MT Implementation
//!
//! This crate provides a pure Rust implementation of the eXtended Merkle
//! Signature Scheme and its multi-tree variant as constructed in RFC 8391.
//! Both are *stateful* hash-based signatures: every signature consumes one
//! one-time key, and the private key records which one is next. Security
//! rests solely on the hash function.
//!
//! # Supported Parameters
//!
//! | Digest | n | Registered heights |
//! |--------|---|--------------------|
//! | SHA-256 | 32 | XMSS 10/16/20, XMSS-MT 20/40/60 |
//! | SHA-512 | 64 | XMSS 10/16/20, XMSS-MT 20/40/60 |
//! | SHAKE128 | 32 | XMSS 10/16/20, XMSS-MT 20/40/60 |
//! | SHAKE256 | 64 | XMSS 10/16/20, XMSS-MT 20/40/60 |
//!
//! Any tree height from 2 to 20 per layer and w in {4, 16} may be used;
//! only the registered w = 16 sets carry an OID.
//!
//! # Architecture
//!
//! - **WOTS+**: Winternitz one-time signatures, one key pair per leaf
//! - **L-tree**: compresses a WOTS+ public key into a leaf
//! - **TreeHash / BDS**: build trees and keep the next authentication path ready
//! - **XMSS / XMSS-MT**: one tree, or a hypertree of trees signing each other's roots
//!
//! # Example
//!
//! ```rust
//! use tilia_xmss::{DigestAlgorithm, StatefulSigner, Xmss, XmssParams};
//!
//! let params = XmssParams::new(DigestAlgorithm::Sha256, 4, 16).unwrap();
//! let mut rng = rand::rng();
//! let (mut sk, pk) = Xmss::keygen(&params, &mut rng).unwrap();
//!
//! let message = b"Hello, post-quantum world!";
//! let signature = Xmss::sign(&mut sk, message).unwrap();
//!
//! assert!(Xmss::verify(&pk, message, &signature));
//! assert_eq!(Xmss::remaining_signatures(&sk), 15);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
// Clippy allowances for cryptographic code patterns
#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::needless_range_loop
)]

// alloc is available in both std and no_std environments
extern crate alloc;

// Primitives
mod address;
mod digest;
mod hash;
/// RFC 8391 parameter set identifiers.
pub mod oid;
/// Parameter sets and derived sizes.
pub mod params;
/// Byte and base-w helpers.
pub mod utils;

// Building blocks
mod bds;
mod ltree;
mod treehash;
mod wots;

// Parallel leaf computation (requires rayon)
#[cfg(feature = "parallel")]
mod parallel;

// Schemes
mod xmss;
mod xmssmt;

// Public exports
pub use address::{Address, AddressKind, AdrsType, Subtree, ADDRESS_BYTES};
pub use bds::BdsState;
pub use digest::DigestAlgorithm;
pub use hash::KeyedHash;
pub use ltree::ltree;
pub use oid::Oid;
pub use params::{WotsParams, XmssMtParams, XmssParams};
pub use treehash::{Node, NodeStack, TreeHash, TreeHashState, TreeHasher};
pub use wots::{leaf_seed, Wots};
pub use xmss::{ReducedSignature, Xmss, XmssPrivateKey, XmssPublicKey, XmssSignature};
pub use xmssmt::{XmssMt, XmssMtPrivateKey, XmssMtPublicKey, XmssMtSignature};

// Re-export core types
pub use tilia_core::{Error, ErrorKind, Result, StatefulSigner};
#[cfg(feature = "std")]
pub use tilia_core::LockedSigningKey;
