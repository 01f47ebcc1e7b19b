// SPDX-License-Identifier: CC0-1.0

//! Addresses
//!
//! Base58Check pay-to-pubkey-hash addresses computed from a compressed public
//! key. Two encodings are supported:
//!
//! * the Bitcoin one: `version || RIPEMD160(SHA256(pk))` with a
//!   double-SHA256 checksum,
//! * the Decred one: `version || RIPEMD160(BLAKE256(pk))` with a
//!   double-BLAKE256 checksum.
//!
//! The version is written big-endian using as few bytes as it needs, so a
//! Bitcoin `0x00` takes one byte and a Decred `0x073f` takes two.
//!
//! # Example
//!
//! ```rust
//! use hdnode::util::address;
//!
//! let pk = [2u8; 33];
//! let addr = address::p2pkh(&pk, 0x00).unwrap();
//! assert!(addr.starts_with('1'));
//! ```

use blake_hash::{Blake256, Digest};
use hashes::{hash160, ripemd160, Hash};

use crate::bip32::Error;
use crate::crypto::curve::PUBLIC_KEY_SIZE;
use crate::util::base58::{self, Checksum};

/// Maximum length of an encoded address.
pub const MAX_ADDRESS_LEN: usize = 36;

/// Length of a public key hash.
pub const PUBKEY_HASH_LEN: usize = 20;

/// Number of bytes needed to write `version` as an address prefix.
pub fn prefix_len(version: u32) -> usize {
    if version <= 0xff {
        1
    } else if version <= 0xffff {
        2
    } else if version <= 0x00ff_ffff {
        3
    } else {
        4
    }
}

fn write_prefix(version: u32, out: &mut Vec<u8>) {
    let bytes = version.to_be_bytes();
    out.extend_from_slice(&bytes[bytes.len() - prefix_len(version)..]);
}

/// RIPEMD160(SHA256(pk)).
pub fn pubkey_hash(public_key: &[u8; PUBLIC_KEY_SIZE]) -> [u8; PUBKEY_HASH_LEN] {
    hash160::Hash::hash(public_key).to_byte_array()
}

/// RIPEMD160(BLAKE256(pk)), the Decred public key hash.
pub fn decred_pubkey_hash(public_key: &[u8; PUBLIC_KEY_SIZE]) -> [u8; PUBKEY_HASH_LEN] {
    ripemd160::Hash::hash(&Blake256::digest(public_key)).to_byte_array()
}

fn encode(version: u32, hash: &[u8; PUBKEY_HASH_LEN], checksum: Checksum) -> Result<String, Error> {
    let mut payload = Vec::with_capacity(4 + PUBKEY_HASH_LEN);
    write_prefix(version, &mut payload);
    payload.extend_from_slice(hash);
    base58::encode_check_bounded::<MAX_ADDRESS_LEN>(&payload, checksum)
        .map_err(|_| Error::SerializationFailed)
}

/// Encodes a Bitcoin style pay-to-pubkey-hash address.
pub fn p2pkh(public_key: &[u8; PUBLIC_KEY_SIZE], version: u32) -> Result<String, Error> {
    encode(version, &pubkey_hash(public_key), Checksum::DoubleSha256)
}

/// Encodes a Decred pay-to-pubkey-hash address.
pub fn decred_p2pkh(public_key: &[u8; PUBLIC_KEY_SIZE], version: u32) -> Result<String, Error> {
    encode(version, &decred_pubkey_hash(public_key), Checksum::DoubleBlake256)
}
