// SPDX-License-Identifier: CC0-1.0

//! BIP32 implementation.
//!
//! Implementation of BIP32 hierarchical deterministic key nodes, as defined
//! at <https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki>.
//!
//! An [`HDNode`] is derived in place: every successful [`HDNode::derive`]
//! replaces the node with its child and caches the fingerprint of the parent
//! it came from, so that the node can later be serialized as an extended key.
//! A failed derivation wipes the node instead of leaving a partially derived
//! key behind.
//!

use core::ops::Index;
use core::str::FromStr;
use core::{fmt, slice};
use std::cell::OnceCell;

use hashes::{sha512, Hash, HashEngine, Hmac, HmacEngine};
use zeroize::Zeroize;

use crate::crypto::curve::{self, Curve, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
use crate::util::address;
use crate::util::base58::{self, Checksum};

/// Bit marking a hardened child index.
pub const HARDENED: u32 = 1 << 31;

/// Maximum number of steps accepted by [`HDNode::derive_path`] and
/// [`DerivationPath`].
pub const MAX_PATH_LEN: usize = 32;

/// Maximum length of a Base58Check encoded extended key.
pub const MAX_SERIALIZED_LEN: usize = 128;

/// Length of the binary extended key payload.
pub const EXTENDED_KEY_LEN: usize = 78;

/// A chain code
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ChainCode([u8; 32]);
impl_array_newtype!(ChainCode, u8, 32);
impl_bytes_newtype!(ChainCode);

/// A fingerprint
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fingerprint([u8; 4]);
impl_array_newtype!(Fingerprint, u8, 4);
impl_bytes_newtype!(Fingerprint);

impl Fingerprint {
    /// Computes the fingerprint of a compressed public key, the first four
    /// bytes of its HASH160.
    pub fn from_public_key(public_key: &[u8; PUBLIC_KEY_SIZE]) -> Fingerprint {
        let id = address::pubkey_hash(public_key);
        Fingerprint([id[0], id[1], id[2], id[3]])
    }

    /// Returns the fingerprint as a big-endian integer.
    pub fn to_u32(self) -> u32 { u32::from_be_bytes(self.0) }
}

impl From<u32> for Fingerprint {
    fn from(fingerprint: u32) -> Self { Fingerprint(fingerprint.to_be_bytes()) }
}

impl From<Fingerprint> for u32 {
    fn from(fingerprint: Fingerprint) -> Self { fingerprint.to_u32() }
}

impl FromStr for Fingerprint {
    type Err = Error;

    fn from_str(inp: &str) -> Result<Fingerprint, Error> {
        if inp.len() != 8 || !inp.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidValue);
        }
        u32::from_str_radix(inp, 16).map(Fingerprint::from).map_err(|_| Error::InvalidValue)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A child number for a derived key
#[derive(Copy, Clone, PartialEq, Eq, Debug, PartialOrd, Ord, Hash)]
pub enum ChildNumber {
    /// Non-hardened key
    Normal {
        /// Key index, within [0, 2^31 - 1]
        index: u32,
    },
    /// Hardened key
    Hardened {
        /// Key index, within [0, 2^31 - 1]
        index: u32,
    },
}

impl ChildNumber {
    /// Create a [`Normal`] from an index, returns an error if the index is not within
    /// [0, 2^31 - 1].
    ///
    /// [`Normal`]: #variant.Normal
    pub fn from_normal_idx(index: u32) -> Result<Self, Error> {
        if index & HARDENED == 0 {
            Ok(ChildNumber::Normal { index })
        } else {
            Err(Error::InvalidChildNumber(index))
        }
    }

    /// Create a [`Hardened`] from an index, returns an error if the index is not within
    /// [0, 2^31 - 1].
    ///
    /// [`Hardened`]: #variant.Hardened
    pub fn from_hardened_idx(index: u32) -> Result<Self, Error> {
        if index & HARDENED == 0 {
            Ok(ChildNumber::Hardened { index })
        } else {
            Err(Error::InvalidChildNumber(index))
        }
    }

    /// Returns `true` if the child number is a [`Normal`] value.
    ///
    /// [`Normal`]: #variant.Normal
    pub fn is_normal(&self) -> bool { !self.is_hardened() }

    /// Returns `true` if the child number is a [`Hardened`] value.
    ///
    /// [`Hardened`]: #variant.Hardened
    pub fn is_hardened(&self) -> bool {
        match self {
            ChildNumber::Hardened { .. } => true,
            ChildNumber::Normal { .. } => false,
        }
    }

    /// Returns the child number that is a single increment from this one.
    pub fn increment(self) -> Result<ChildNumber, Error> {
        match self {
            ChildNumber::Normal { index: idx } => ChildNumber::from_normal_idx(idx + 1),
            ChildNumber::Hardened { index: idx } => ChildNumber::from_hardened_idx(idx + 1),
        }
    }
}

impl Default for ChildNumber {
    fn default() -> Self { ChildNumber::Normal { index: 0 } }
}

impl From<u32> for ChildNumber {
    fn from(number: u32) -> Self {
        if number & HARDENED != 0 {
            ChildNumber::Hardened { index: number ^ HARDENED }
        } else {
            ChildNumber::Normal { index: number }
        }
    }
}

impl From<ChildNumber> for u32 {
    fn from(cnum: ChildNumber) -> Self {
        match cnum {
            ChildNumber::Normal { index } => index,
            ChildNumber::Hardened { index } => index | HARDENED,
        }
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ChildNumber::Hardened { index } => {
                fmt::Display::fmt(&index, f)?;
                let alt = f.alternate();
                f.write_str(if alt { "h" } else { "'" })
            }
            ChildNumber::Normal { index } => fmt::Display::fmt(&index, f),
        }
    }
}

impl FromStr for ChildNumber {
    type Err = Error;

    fn from_str(inp: &str) -> Result<ChildNumber, Error> {
        let is_hardened = inp.chars().last().map_or(false, |l| l == '\'' || l == 'h');
        Ok(if is_hardened {
            ChildNumber::from_hardened_idx(
                inp[0..inp.len() - 1].parse().map_err(|_| Error::InvalidChildNumberFormat)?,
            )?
        } else {
            ChildNumber::from_normal_idx(inp.parse().map_err(|_| Error::InvalidChildNumberFormat)?)?
        })
    }
}

impl AsRef<[ChildNumber]> for ChildNumber {
    fn as_ref(&self) -> &[ChildNumber] { slice::from_ref(self) }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ChildNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <u32 as serde::Deserialize>::deserialize(deserializer).map(ChildNumber::from)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ChildNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&u32::from(*self), serializer)
    }
}

/// A BIP-32 derivation path of at most [`MAX_PATH_LEN`] steps.
#[derive(Clone, PartialEq, Eq, Ord, PartialOrd, Hash, Default)]
pub struct DerivationPath(Vec<ChildNumber>);

impl<I> Index<I> for DerivationPath
where
    Vec<ChildNumber>: Index<I>,
{
    type Output = <Vec<ChildNumber> as Index<I>>::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output { &self.0[index] }
}

impl TryFrom<Vec<ChildNumber>> for DerivationPath {
    type Error = Error;

    fn try_from(numbers: Vec<ChildNumber>) -> Result<Self, Error> {
        if numbers.len() > MAX_PATH_LEN {
            return Err(Error::PathTooLong(numbers.len()));
        }
        Ok(DerivationPath(numbers))
    }
}

impl<'a> TryFrom<&'a [ChildNumber]> for DerivationPath {
    type Error = Error;

    fn try_from(numbers: &'a [ChildNumber]) -> Result<Self, Error> {
        DerivationPath::try_from(numbers.to_vec())
    }
}

impl From<DerivationPath> for Vec<ChildNumber> {
    fn from(path: DerivationPath) -> Self { path.0 }
}

impl<'a> core::iter::IntoIterator for &'a DerivationPath {
    type Item = &'a ChildNumber;
    type IntoIter = slice::Iter<'a, ChildNumber>;
    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

impl AsRef<[ChildNumber]> for DerivationPath {
    fn as_ref(&self) -> &[ChildNumber] { &self.0 }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<DerivationPath, Error> {
        let mut parts = path.split('/');
        // First parts must be `m`.
        if parts.next() != Some("m") {
            return Err(Error::InvalidDerivationPathFormat);
        }

        let ret: Result<Vec<ChildNumber>, Error> = parts.map(str::parse).collect();
        DerivationPath::try_from(ret?)
    }
}

impl DerivationPath {
    /// Returns length of the derivation path
    pub fn len(&self) -> usize { self.0.len() }

    /// Returns `true` if the derivation path is empty
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Returns derivation path for a master key (i.e. empty derivation path)
    pub fn master() -> DerivationPath { DerivationPath(vec![]) }

    /// Returns whether derivation path represents master key (i.e. it's length
    /// is empty). True for `m` path.
    pub fn is_master(&self) -> bool { self.0.is_empty() }

    /// Create a new [DerivationPath] that is a child of this one.
    pub fn child(&self, cn: ChildNumber) -> Result<DerivationPath, Error> {
        let mut path = self.0.clone();
        path.push(cn);
        DerivationPath::try_from(path)
    }

    /// Returns the derivation path as a vector of u32 integers.
    /// Unhardened elements are copied as is.
    /// 0x80000000 is added to the hardened elements.
    ///
    /// ```
    /// use hdnode::bip32::{DerivationPath, HARDENED};
    /// use std::str::FromStr;
    ///
    /// let path = DerivationPath::from_str("m/84'/0'/0'/0/1").unwrap();
    /// assert_eq!(path.to_u32_vec(), vec![84 + HARDENED, HARDENED, HARDENED, 0, 1]);
    /// ```
    pub fn to_u32_vec(&self) -> Vec<u32> { self.into_iter().map(|&el| el.into()).collect() }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("m")?;
        for cn in self.0.iter() {
            f.write_str("/")?;
            fmt::Display::fmt(cn, f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { fmt::Display::fmt(&self, f) }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DerivationPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DerivationPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A BIP32 error
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The seed is empty.
    InvalidSeed,
    /// No curve provider is known under this name.
    InvalidCurve(String),
    /// Child key derivation produced an invalid key.
    DerivationFailed,
    /// A pk->pk derivation was attempted on a hardened key
    CannotDeriveFromHardenedKey,
    /// The node is already at depth 255.
    DepthOverflow,
    /// A derivation path is longer than [`MAX_PATH_LEN`].
    PathTooLong(usize),
    /// The encoded output does not fit its bound, or the node has no key to encode.
    SerializationFailed,
    /// Malformed extended key.
    InvalidValue,
    /// Base58Check checksum mismatch.
    InvalidChecksum,
    /// Unknown version magic
    UnknownVersion(u32),
    /// A child number was provided that was out of range
    InvalidChildNumber(u32),
    /// Invalid childnumber format.
    InvalidChildNumberFormat,
    /// Invalid derivation path format.
    InvalidDerivationPathFormat,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Error::*;

        match *self {
            InvalidSeed => f.write_str("seed must not be empty"),
            InvalidCurve(ref name) => write!(f, "unknown curve '{}'", name),
            DerivationFailed => f.write_str("failed to derive key"),
            CannotDeriveFromHardenedKey =>
                f.write_str("cannot derive hardened key from public key"),
            DepthOverflow => f.write_str("node depth exceeds 255"),
            PathTooLong(len) =>
                write!(f, "derivation path of {} steps exceeds {}", len, MAX_PATH_LEN),
            SerializationFailed => f.write_str("failed to serialize node"),
            InvalidValue => f.write_str("invalid extended key"),
            InvalidChecksum => f.write_str("invalid checksum"),
            UnknownVersion(version) => write!(f, "unknown version magic {:#010x}", version),
            InvalidChildNumber(ref n) =>
                write!(f, "child number {} is invalid (not within [0, 2^31 - 1])", n),
            InvalidChildNumberFormat => f.write_str("invalid child number format"),
            InvalidDerivationPathFormat => f.write_str("invalid derivation path format"),
        }
    }
}

impl std::error::Error for Error {}

impl From<base58::Error> for Error {
    fn from(err: base58::Error) -> Self {
        match err {
            base58::Error::BadChecksum(..) => Error::InvalidChecksum,
            base58::Error::BufferTooSmall => Error::SerializationFailed,
            _ => Error::InvalidValue,
        }
    }
}

/// Key material carried by a node.
#[derive(Clone)]
enum KeyMaterial {
    /// Private key with its lazily computed compressed public key.
    Private { secret: [u8; PRIVATE_KEY_SIZE], public: OnceCell<[u8; PUBLIC_KEY_SIZE]> },
    /// Compressed public key only.
    Public([u8; PUBLIC_KEY_SIZE]),
    /// Wiped after a failed derivation.
    Empty,
}

impl KeyMaterial {
    fn private(secret: [u8; PRIVATE_KEY_SIZE]) -> KeyMaterial {
        KeyMaterial::Private { secret, public: OnceCell::new() }
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        if let KeyMaterial::Private { secret, .. } = self {
            secret.zeroize();
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeyMaterial::Private { .. } => f.write_str("Private([SecretKey])"),
            KeyMaterial::Public(pk) => {
                f.write_str("Public(")?;
                for byte in pk.iter() {
                    write!(f, "{:02x}", byte)?;
                }
                f.write_str(")")
            }
            KeyMaterial::Empty => f.write_str("Empty"),
        }
    }
}

/// Outcome of a single child key derivation, not yet applied to the node.
struct ChildStep {
    parent_fingerprint: Fingerprint,
    key: KeyMaterial,
    chain_code: ChainCode,
}

fn split_hmac(hmac: Hmac<sha512::Hash>) -> ([u8; 32], ChainCode) {
    let mut bytes = hmac.to_byte_array();
    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&bytes[..32]);
    right.copy_from_slice(&bytes[32..]);
    bytes.zeroize();
    (left, ChainCode(right))
}

fn be_u32(bytes: &[u8]) -> u32 { u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) }

/// A node of a BIP32 key tree.
///
/// The node is bound to one [`Curve`] for its whole life. It normally carries
/// a private key; deserializing an extended public key yields a public-only
/// node, which can still derive non-hardened children.
///
/// A node whose derivation failed is wiped: all key material, the chain code,
/// depth, child number and fingerprint are zero. It cannot be revived and
/// every further derivation or encoding fails.
#[derive(Clone)]
pub struct HDNode {
    depth: u8,
    child_number: ChildNumber,
    chain_code: ChainCode,
    key: KeyMaterial,
    parent_fingerprint: Fingerprint,
    curve: &'static dyn Curve,
}

impl HDNode {
    /// Construct a new master node from a seed value.
    ///
    /// `curve_name` selects the curve provider, which also decides the HMAC key
    /// (`"Bitcoin seed"` for secp256k1).
    pub fn from_seed(seed: &[u8], curve_name: &str) -> Result<HDNode, Error> {
        if seed.is_empty() {
            return Err(Error::InvalidSeed);
        }
        let curve = curve::by_name(curve_name)?;

        let mut hmac_engine: HmacEngine<sha512::Hash> = HmacEngine::new(curve.seed_key());
        hmac_engine.input(seed);
        let (mut secret, chain_code) = split_hmac(Hmac::from_engine(hmac_engine));

        let valid = curve.validate_private_key(&secret);
        let key = KeyMaterial::private(secret);
        secret.zeroize();
        valid.map_err(|_| Error::DerivationFailed)?;

        Ok(HDNode {
            depth: 0,
            child_number: ChildNumber::default(),
            chain_code,
            key,
            parent_fingerprint: Fingerprint::default(),
            curve,
        })
    }

    /// Decodes a Base58Check extended key for the secp256k1 curve.
    ///
    /// The version field decides the key kind: `version_private` yields a
    /// private node, `version_public` a public-only one. When both are equal
    /// the payload is read as public.
    pub fn deserialize(
        value: &str,
        version_public: u32,
        version_private: u32,
    ) -> Result<HDNode, Error> {
        HDNode::deserialize_with_curve(&curve::SECP256K1_CURVE, value, version_public, version_private)
    }

    /// Decodes a Base58Check extended key for the given curve.
    pub fn deserialize_with_curve(
        curve: &'static dyn Curve,
        value: &str,
        version_public: u32,
        version_private: u32,
    ) -> Result<HDNode, Error> {
        if value.is_empty() {
            return Err(Error::InvalidValue);
        }
        let mut data = base58::decode_check(value, Checksum::DoubleSha256)?;
        let ret = HDNode::decode(curve, &data, version_public, version_private);
        data.zeroize();
        ret
    }

    /// Decodes the binary extended key payload.
    fn decode(
        curve: &'static dyn Curve,
        data: &[u8],
        version_public: u32,
        version_private: u32,
    ) -> Result<HDNode, Error> {
        if data.len() != EXTENDED_KEY_LEN {
            return Err(Error::InvalidValue);
        }

        let version = be_u32(&data[0..4]);
        let key = if version == version_public {
            let public: [u8; PUBLIC_KEY_SIZE] =
                data[45..78].try_into().map_err(|_| Error::InvalidValue)?;
            curve.validate_public_key(&public).map_err(|_| Error::InvalidValue)?;
            KeyMaterial::Public(public)
        } else if version == version_private {
            if data[45] != 0 {
                return Err(Error::InvalidValue);
            }
            let mut secret: [u8; PRIVATE_KEY_SIZE] =
                data[46..78].try_into().map_err(|_| Error::InvalidValue)?;
            let valid = curve.validate_private_key(&secret);
            let key = KeyMaterial::private(secret);
            secret.zeroize();
            valid.map_err(|_| Error::InvalidValue)?;
            key
        } else {
            return Err(Error::UnknownVersion(version));
        };

        Ok(HDNode {
            depth: data[4],
            parent_fingerprint: Fingerprint::try_from(&data[5..9])
                .map_err(|_| Error::InvalidValue)?,
            child_number: be_u32(&data[9..13]).into(),
            chain_code: ChainCode::try_from(&data[13..45]).map_err(|_| Error::InvalidValue)?,
            key,
            curve,
        })
    }

    /// Derives the child `index` in place.
    ///
    /// Returns the fingerprint of the node as it was before the call, which
    /// is also cached as the new node's [`fingerprint`](HDNode::fingerprint).
    /// A hardened index requires a private node. On error the node is wiped.
    pub fn derive<C: Into<ChildNumber>>(&mut self, index: C) -> Result<Fingerprint, Error> {
        let index = index.into();
        match self.ckd(index) {
            Ok(step) => {
                self.key = step.key;
                self.chain_code = step.chain_code;
                self.depth += 1;
                self.child_number = index;
                self.parent_fingerprint = step.parent_fingerprint;
                Ok(step.parent_fingerprint)
            }
            Err(e) => {
                self.wipe();
                Err(e)
            }
        }
    }

    /// Derives every index of `path` in order.
    ///
    /// Paths longer than [`MAX_PATH_LEN`] are rejected before the node is
    /// touched. An empty path leaves the node as it is. The first failing
    /// step wipes the node.
    ///
    /// Returns the fingerprint of the final node's parent.
    pub fn derive_path<T, P>(&mut self, path: P) -> Result<Fingerprint, Error>
    where
        T: Copy + Into<ChildNumber>,
        P: AsRef<[T]>,
    {
        let path = path.as_ref();
        if path.len() > MAX_PATH_LEN {
            return Err(Error::PathTooLong(path.len()));
        }
        let mut fingerprint = self.parent_fingerprint;
        for &index in path {
            fingerprint = self.derive(index)?;
        }
        Ok(fingerprint)
    }

    /// Child key derivation, without touching `self`.
    fn ckd(&self, i: ChildNumber) -> Result<ChildStep, Error> {
        if self.depth == u8::MAX {
            return Err(Error::DepthOverflow);
        }
        let parent_public = self.compressed_public_key().ok_or(Error::DerivationFailed)?;

        let mut hmac_engine: HmacEngine<sha512::Hash> = HmacEngine::new(&self.chain_code[..]);
        match (&self.key, i) {
            (KeyMaterial::Private { secret, .. }, ChildNumber::Hardened { .. }) => {
                // Hardened key: use only secret data to prevent public derivation
                hmac_engine.input(&[0u8]);
                hmac_engine.input(&secret[..]);
            }
            (_, ChildNumber::Hardened { .. }) => return Err(Error::CannotDeriveFromHardenedKey),
            (_, ChildNumber::Normal { .. }) => hmac_engine.input(&parent_public[..]),
        }
        hmac_engine.input(&u32::from(i).to_be_bytes());
        let (mut tweak, chain_code) = split_hmac(Hmac::from_engine(hmac_engine));

        let key = match &self.key {
            KeyMaterial::Private { secret, .. } =>
                self.curve.add_private_keys(secret, &tweak).map(KeyMaterial::private),
            KeyMaterial::Public(public) =>
                self.curve.add_public_key_tweak(public, &tweak).map(KeyMaterial::Public),
            KeyMaterial::Empty => Err(curve::Error::InvalidPrivateKey),
        };
        tweak.zeroize();

        Ok(ChildStep {
            parent_fingerprint: Fingerprint::from_public_key(&parent_public),
            key: key.map_err(|_| Error::DerivationFailed)?,
            chain_code,
        })
    }

    /// Zeroes all key material and metadata.
    fn wipe(&mut self) {
        self.key = KeyMaterial::Empty;
        self.chain_code.0.zeroize();
        self.depth = 0;
        self.child_number = ChildNumber::default();
        self.parent_fingerprint = Fingerprint::default();
    }

    fn compressed_public_key(&self) -> Option<[u8; PUBLIC_KEY_SIZE]> {
        match &self.key {
            KeyMaterial::Private { secret, public } => {
                if let Some(pk) = public.get() {
                    return Some(*pk);
                }
                let pk = self.curve.public_key(secret).ok()?;
                Some(*public.get_or_init(|| pk))
            }
            KeyMaterial::Public(pk) => Some(*pk),
            KeyMaterial::Empty => None,
        }
    }

    /// Depth in the tree, 0 for a master node.
    pub fn depth(&self) -> u8 { self.depth }

    /// Index of this node within its parent, hardened bit included.
    pub fn child_num(&self) -> u32 { self.child_number.into() }

    /// Index of this node within its parent.
    pub fn child_number(&self) -> ChildNumber { self.child_number }

    /// The chain code.
    pub fn chain_code(&self) -> ChainCode { self.chain_code }

    /// The private key, all zero for public-only and wiped nodes.
    pub fn private_key(&self) -> [u8; PRIVATE_KEY_SIZE] {
        match &self.key {
            KeyMaterial::Private { secret, .. } => *secret,
            _ => [0u8; PRIVATE_KEY_SIZE],
        }
    }

    /// The compressed public key, all zero for a wiped node.
    ///
    /// Computed on first use and cached.
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.compressed_public_key().unwrap_or([0u8; PUBLIC_KEY_SIZE])
    }

    /// Fingerprint of the parent, as cached by the last derivation or read
    /// from an extended key. Zero for a master node.
    pub fn fingerprint(&self) -> Fingerprint { self.parent_fingerprint }

    /// HASH160 of this node's public key, all zero for a wiped node.
    pub fn identifier(&self) -> [u8; 20] {
        self.compressed_public_key().map(|pk| address::pubkey_hash(&pk)).unwrap_or_default()
    }

    /// Fingerprint of this node, the first four bytes of its identifier.
    pub fn own_fingerprint(&self) -> Fingerprint {
        let id = self.identifier();
        Fingerprint([id[0], id[1], id[2], id[3]])
    }

    /// Returns `true` if the node holds no private key.
    pub fn is_public_only(&self) -> bool { !matches!(self.key, KeyMaterial::Private { .. }) }

    /// The curve this node is bound to.
    pub fn curve(&self) -> &'static dyn Curve { self.curve }

    /// Extended key binary encoding according to BIP 32.
    fn encode(&self, use_public: bool, version: u32) -> Result<[u8; EXTENDED_KEY_LEN], Error> {
        let mut ret = [0; EXTENDED_KEY_LEN];
        ret[0..4].copy_from_slice(&version.to_be_bytes());
        ret[4] = self.depth;
        ret[5..9].copy_from_slice(&self.parent_fingerprint[..]);
        ret[9..13].copy_from_slice(&u32::from(self.child_number).to_be_bytes());
        ret[13..45].copy_from_slice(&self.chain_code[..]);
        if use_public {
            let public = self.compressed_public_key().ok_or(Error::SerializationFailed)?;
            ret[45..78].copy_from_slice(&public);
        } else {
            let mut secret = self.private_key();
            ret[45] = 0;
            ret[46..78].copy_from_slice(&secret);
            secret.zeroize();
        }
        Ok(ret)
    }

    /// Serializes the node as a Base58Check extended key.
    ///
    /// `use_public` selects the public key as key material, otherwise the
    /// private key is written behind a zero pad byte.
    pub fn serialize(&self, use_public: bool, version: u32) -> Result<String, Error> {
        let mut data = self.encode(use_public, version)?;
        let ret = base58::encode_check_bounded::<MAX_SERIALIZED_LEN>(&data, Checksum::DoubleSha256);
        data.zeroize();
        ret.map_err(Error::from)
    }

    /// Serializes the node as an extended public key.
    pub fn serialize_public(&self, version: u32) -> Result<String, Error> {
        self.serialize(true, version)
    }

    /// Serializes the node as an extended private key.
    pub fn serialize_private(&self, version: u32) -> Result<String, Error> {
        self.serialize(false, version)
    }

    /// Pay-to-pubkey-hash address of the node's public key.
    pub fn address(&self, version: u32) -> Result<String, Error> {
        let public = self.compressed_public_key().ok_or(Error::SerializationFailed)?;
        address::p2pkh(&public, version)
    }

    /// Decred pay-to-pubkey-hash address of the node's public key.
    pub fn decred_address(&self, version: u32) -> Result<String, Error> {
        let public = self.compressed_public_key().ok_or(Error::SerializationFailed)?;
        address::decred_p2pkh(&public, version)
    }
}

impl Drop for HDNode {
    fn drop(&mut self) { self.chain_code.0.zeroize(); }
}

impl fmt::Debug for HDNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HDNode")
            .field("curve", &self.curve.name())
            .field("depth", &self.depth)
            .field("parent_fingerprint", &self.parent_fingerprint)
            .field("child_number", &self.child_number)
            .field("chain_code", &self.chain_code)
            .field("key", &self.key)
            .finish()
    }
}
