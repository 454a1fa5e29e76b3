//! Stateful signature traits.

use crate::Result;
use rand_core::CryptoRng;
use zeroize::Zeroize;

#[cfg(feature = "std")]
use crate::Error;
#[cfg(feature = "std")]
use std::sync::Mutex;

/// Stateful digital signature trait.
///
/// Unlike stateless schemes, every signature consumes one-time key material,
/// so signing needs exclusive access to the signing key. A signing key must
/// never be copied and used from two places: doing so reuses one-time keys and
/// breaks the scheme.
///
/// # Example
///
/// ```ignore
/// use tilia_core::StatefulSigner;
///
/// let (mut sk, pk) = MyScheme::keygen(&params, &mut rng)?;
/// let sig = MyScheme::sign(&mut sk, message)?;
/// assert!(MyScheme::verify(&pk, message, &sig));
/// ```
pub trait StatefulSigner {
    /// Parameter set selecting digest, tree shape and Winternitz parameter.
    type Params;

    /// Signing key (private key, including the signature index).
    type SigningKey: Zeroize;

    /// Verification key (public key).
    type VerificationKey: Clone;

    /// Signature produced by signing.
    type Signature: Clone;

    /// Generate a new key pair.
    ///
    /// # Arguments
    ///
    /// * `params` - Validated parameter set.
    /// * `rng` - A cryptographically secure random number generator.
    ///
    /// # Returns
    ///
    /// A tuple of (signing_key, verification_key).
    fn keygen(
        params: &Self::Params,
        rng: &mut impl CryptoRng,
    ) -> Result<(Self::SigningKey, Self::VerificationKey)>;

    /// Sign a message, consuming one index of the signing key.
    ///
    /// Fails without producing a signature once the key is exhausted.
    fn sign(sk: &mut Self::SigningKey, message: &[u8]) -> Result<Self::Signature>;

    /// Verify a signature.
    ///
    /// Returns `false` for any invalid signature; never errors.
    fn verify(pk: &Self::VerificationKey, message: &[u8], signature: &Self::Signature) -> bool;

    /// Number of signatures the key can still produce.
    fn remaining_signatures(sk: &Self::SigningKey) -> u64;
}

/// A signing key behind a mutex, so several threads can sign with it.
///
/// Each call to [`sign`](Self::sign) is a single-writer critical section: the
/// index is reserved and the signature produced while holding the lock. If a
/// previous signer panicked while holding the lock, every further call fails
/// with [`Error::KeyPoisoned`] rather than risk handing out a used index.
#[cfg(feature = "std")]
pub struct LockedSigningKey<S: StatefulSigner> {
    inner: Mutex<S::SigningKey>,
}

#[cfg(feature = "std")]
impl<S: StatefulSigner> LockedSigningKey<S> {
    /// Wrap a signing key.
    pub fn new(sk: S::SigningKey) -> Self {
        Self {
            inner: Mutex::new(sk),
        }
    }

    /// Sign a message under the lock.
    pub fn sign(&self, message: &[u8]) -> Result<S::Signature> {
        let mut sk = self.inner.lock().map_err(|_| Error::KeyPoisoned)?;
        S::sign(&mut sk, message)
    }

    /// Number of signatures the key can still produce.
    pub fn remaining_signatures(&self) -> Result<u64> {
        let sk = self.inner.lock().map_err(|_| Error::KeyPoisoned)?;
        Ok(S::remaining_signatures(&sk))
    }

    /// Take the signing key back out of the lock.
    pub fn into_inner(self) -> Result<S::SigningKey> {
        self.inner.into_inner().map_err(|_| Error::KeyPoisoned)
    }
}
