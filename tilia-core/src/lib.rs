//! # Tilia Core
//!
//! Core traits and utilities for the Tilia hash-based signature library.
//!
//! This crate provides:
//! - Common error types and the error taxonomy ([`ErrorKind`])
//! - The [`StatefulSigner`] trait for schemes whose private key carries state
//! - [`LockedSigningKey`], a mutex-guarded signing key (requires `std`)
//! - Secure memory handling with zeroize integration

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod traits;

pub use error::{Error, ErrorKind, Result};
#[cfg(feature = "std")]
pub use traits::LockedSigningKey;
pub use traits::StatefulSigner;

/// Re-export zeroize for convenience.
pub use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Re-export subtle for constant-time operations.
pub use subtle;
