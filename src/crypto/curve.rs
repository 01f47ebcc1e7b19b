// SPDX-License-Identifier: CC0-1.0

//! Curve providers.
//!
//! Every [`HDNode`](crate::bip32::HDNode) is bound to one [`Curve`] for its
//! whole life. A curve supplies the HMAC key used to turn a seed into a master
//! node and the scalar and point operations needed by child key derivation.
//!
//! Two Weierstrass curves are supported:
//!
//! * `secp256k1`, backed by the [`secp256k1`] library,
//! * `nist256p1` (a.k.a. secp256r1, P-256), backed by [`p256`].
//!

use core::fmt;

use p256::elliptic_curve::group::ff::PrimeField;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use secp256k1::{PublicKey, Scalar, SecretKey, SECP256K1};

use crate::bip32;

/// Length of a private key (a scalar modulo the curve order).
pub const PRIVATE_KEY_SIZE: usize = 32;
/// Length of a compressed public key.
pub const PUBLIC_KEY_SIZE: usize = 33;

/// Name of the secp256k1 curve.
pub const SECP256K1_NAME: &str = "secp256k1";
/// Name of the NIST P-256 curve.
pub const NIST256P1_NAME: &str = "nist256p1";

/// A curve operation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Scalar is zero or not below the curve order.
    InvalidPrivateKey,
    /// Bytes do not encode a compressed point on the curve.
    InvalidPublicKey,
    /// Tweak is not below the curve order, or tweaking produced zero/infinity.
    InvalidTweak,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;

        match *self {
            InvalidPrivateKey => f.write_str("private key is not a valid scalar for the curve"),
            InvalidPublicKey => f.write_str("public key is not a valid compressed curve point"),
            InvalidTweak => f.write_str("tweak is out of range or produced an invalid key"),
        }
    }
}

impl std::error::Error for Error {}

/// Elliptic curve operations needed for BIP32 key derivation.
///
/// Keys cross this boundary as fixed-size big-endian byte arrays so that the
/// node never depends on a particular curve library's key types.
pub trait Curve: fmt::Debug + Send + Sync {
    /// Canonical name of the curve, as accepted by [`by_name`].
    fn name(&self) -> &'static str;

    /// HMAC-SHA512 key used to derive the master node from a seed.
    fn seed_key(&self) -> &'static [u8];

    /// Checks that `key` is a scalar in `[1, n - 1]`.
    fn validate_private_key(&self, key: &[u8; PRIVATE_KEY_SIZE]) -> Result<(), Error>;

    /// Checks that `key` is a compressed encoding of a point on the curve.
    fn validate_public_key(&self, key: &[u8; PUBLIC_KEY_SIZE]) -> Result<(), Error>;

    /// Computes the compressed public key belonging to `key`.
    fn public_key(&self, key: &[u8; PRIVATE_KEY_SIZE]) -> Result<[u8; PUBLIC_KEY_SIZE], Error>;

    /// Computes `(tweak + key) mod n`.
    ///
    /// Fails if `tweak >= n` or if the sum is zero.
    fn add_private_keys(
        &self,
        key: &[u8; PRIVATE_KEY_SIZE],
        tweak: &[u8; PRIVATE_KEY_SIZE],
    ) -> Result<[u8; PRIVATE_KEY_SIZE], Error>;

    /// Computes `tweak * G + key`.
    ///
    /// Fails if `tweak >= n` or if the result is the point at infinity.
    fn add_public_key_tweak(
        &self,
        key: &[u8; PUBLIC_KEY_SIZE],
        tweak: &[u8; PRIVATE_KEY_SIZE],
    ) -> Result<[u8; PUBLIC_KEY_SIZE], Error>;
}

/// The secp256k1 curve used by Bitcoin and most of its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1;

/// The NIST P-256 curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nist256p1;

/// Shared secp256k1 provider.
pub static SECP256K1_CURVE: Secp256k1 = Secp256k1;
/// Shared nist256p1 provider.
pub static NIST256P1_CURVE: Nist256p1 = Nist256p1;

/// Looks up a curve provider by its name.
pub fn by_name(name: &str) -> Result<&'static dyn Curve, bip32::Error> {
    match name {
        SECP256K1_NAME => Ok(&SECP256K1_CURVE),
        NIST256P1_NAME => Ok(&NIST256P1_CURVE),
        _ => Err(bip32::Error::InvalidCurve(name.to_owned())),
    }
}

impl Curve for Secp256k1 {
    fn name(&self) -> &'static str { SECP256K1_NAME }

    fn seed_key(&self) -> &'static [u8] { b"Bitcoin seed" }

    fn validate_private_key(&self, key: &[u8; PRIVATE_KEY_SIZE]) -> Result<(), Error> {
        SecretKey::from_slice(key).map(|_| ()).map_err(|_| Error::InvalidPrivateKey)
    }

    fn validate_public_key(&self, key: &[u8; PUBLIC_KEY_SIZE]) -> Result<(), Error> {
        PublicKey::from_slice(key).map(|_| ()).map_err(|_| Error::InvalidPublicKey)
    }

    fn public_key(&self, key: &[u8; PRIVATE_KEY_SIZE]) -> Result<[u8; PUBLIC_KEY_SIZE], Error> {
        let secret = SecretKey::from_slice(key).map_err(|_| Error::InvalidPrivateKey)?;
        Ok(PublicKey::from_secret_key(SECP256K1, &secret).serialize())
    }

    fn add_private_keys(
        &self,
        key: &[u8; PRIVATE_KEY_SIZE],
        tweak: &[u8; PRIVATE_KEY_SIZE],
    ) -> Result<[u8; PRIVATE_KEY_SIZE], Error> {
        let secret = SecretKey::from_slice(key).map_err(|_| Error::InvalidPrivateKey)?;
        let tweak = Scalar::from_be_bytes(*tweak).map_err(|_| Error::InvalidTweak)?;
        let tweaked = secret.add_tweak(&tweak).map_err(|_| Error::InvalidTweak)?;
        Ok(tweaked.secret_bytes())
    }

    fn add_public_key_tweak(
        &self,
        key: &[u8; PUBLIC_KEY_SIZE],
        tweak: &[u8; PRIVATE_KEY_SIZE],
    ) -> Result<[u8; PUBLIC_KEY_SIZE], Error> {
        let public = PublicKey::from_slice(key).map_err(|_| Error::InvalidPublicKey)?;
        let tweak = Scalar::from_be_bytes(*tweak).map_err(|_| Error::InvalidTweak)?;
        let tweaked = public.add_exp_tweak(SECP256K1, &tweak).map_err(|_| Error::InvalidTweak)?;
        Ok(tweaked.serialize())
    }
}

impl Nist256p1 {
    fn secret_key(key: &[u8; PRIVATE_KEY_SIZE]) -> Result<p256::SecretKey, Error> {
        p256::SecretKey::from_slice(key).map_err(|_| Error::InvalidPrivateKey)
    }

    fn scalar(bytes: &[u8; PRIVATE_KEY_SIZE]) -> Result<p256::Scalar, Error> {
        Option::from(p256::Scalar::from_repr((*bytes).into())).ok_or(Error::InvalidTweak)
    }

    fn compress(public: &p256::PublicKey) -> Result<[u8; PUBLIC_KEY_SIZE], Error> {
        let point = public.to_encoded_point(true);
        point.as_bytes().try_into().map_err(|_| Error::InvalidPublicKey)
    }
}

impl Curve for Nist256p1 {
    fn name(&self) -> &'static str { NIST256P1_NAME }

    fn seed_key(&self) -> &'static [u8] { b"Nist256p1 seed" }

    fn validate_private_key(&self, key: &[u8; PRIVATE_KEY_SIZE]) -> Result<(), Error> {
        Self::secret_key(key).map(|_| ())
    }

    fn validate_public_key(&self, key: &[u8; PUBLIC_KEY_SIZE]) -> Result<(), Error> {
        if key[0] != 0x02 && key[0] != 0x03 {
            return Err(Error::InvalidPublicKey);
        }
        p256::PublicKey::from_sec1_bytes(key).map(|_| ()).map_err(|_| Error::InvalidPublicKey)
    }

    fn public_key(&self, key: &[u8; PRIVATE_KEY_SIZE]) -> Result<[u8; PUBLIC_KEY_SIZE], Error> {
        Self::compress(&Self::secret_key(key)?.public_key())
    }

    fn add_private_keys(
        &self,
        key: &[u8; PRIVATE_KEY_SIZE],
        tweak: &[u8; PRIVATE_KEY_SIZE],
    ) -> Result<[u8; PRIVATE_KEY_SIZE], Error> {
        let secret = Self::secret_key(key)?;
        let sum = Self::scalar(tweak)? + *secret.to_nonzero_scalar();
        let sum: Option<p256::NonZeroScalar> = p256::NonZeroScalar::new(sum).into();
        let tweaked = p256::SecretKey::from(sum.ok_or(Error::InvalidTweak)?);

        let mut ret = [0u8; PRIVATE_KEY_SIZE];
        ret.copy_from_slice(&tweaked.to_bytes());
        Ok(ret)
    }

    fn add_public_key_tweak(
        &self,
        key: &[u8; PUBLIC_KEY_SIZE],
        tweak: &[u8; PRIVATE_KEY_SIZE],
    ) -> Result<[u8; PUBLIC_KEY_SIZE], Error> {
        self.validate_public_key(key)?;
        let parent = p256::PublicKey::from_sec1_bytes(key).map_err(|_| Error::InvalidPublicKey)?;
        let point = p256::ProjectivePoint::GENERATOR * Self::scalar(tweak)? + parent.to_projective();
        let child = p256::PublicKey::from_affine(point.to_affine()).map_err(|_| Error::InvalidTweak)?;
        Self::compress(&child)
    }
}
