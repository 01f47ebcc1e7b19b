// SPDX-License-Identifier: CC0-1.0

//! Internal helper functions for unit tests
//!
//!

use crate::bip32::HDNode;

pub fn hex_array<const N: usize>(data: &str) -> [u8; N] {
    let vec = hex::decode(data).unwrap();
    let mut r = [0u8; N];
    r.copy_from_slice(&vec[..]);
    r
}

/// Master node of BIP32 test vector 1.
pub fn vector1_master() -> HDNode {
    let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
    HDNode::from_seed(&seed, "secp256k1").unwrap()
}
