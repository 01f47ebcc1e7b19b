// SPDX-License-Identifier: CC0-1.0

//! # HD Node Library
//!
//! BIP32 hierarchical deterministic key nodes: master key generation from a
//! seed, in-place child key derivation, extended key (`xprv`/`xpub`)
//! serialization and Base58Check address generation.
//!
//! The elliptic curve arithmetic is provided by [`crypto::curve`], which
//! exposes the `secp256k1` and `nist256p1` curves behind a common trait.
//!
//! # Example: deriving a BIP44 account and exporting it
//!
//! ```rust
//! use hdnode::bip32::{HDNode, HARDENED};
//! use hdnode::Network;
//!
//! let seed = [0x5au8; 32];
//! let mut node = HDNode::from_seed(&seed, "secp256k1").unwrap();
//! node.derive_path(&[44 | HARDENED, HARDENED, HARDENED]).unwrap();
//!
//! let network = Network::Bitcoin;
//! let xpub = node.serialize_public(network.xpub_magic()).unwrap();
//! assert!(xpub.starts_with("xpub"));
//! ```
//!

#![crate_name = "hdnode"]
// Coding conventions
#![forbid(unsafe_code)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(missing_docs)]

// Re-exported dependencies.
pub extern crate bitcoin_hashes as hashes;
pub extern crate secp256k1;

#[cfg(target_pointer_width = "16")]
compile_error!("hdnode cannot be used on 16-bit architectures");

#[cfg(test)]
mod test_helpers;
#[macro_use]
mod internal_macros;
pub mod bip32;
pub mod crypto;
pub mod network;
pub mod util;

pub use crate::bip32::{ChainCode, ChildNumber, DerivationPath, Error, Fingerprint, HDNode};
pub use crate::crypto::curve::Curve;
pub use crate::network::Network;
