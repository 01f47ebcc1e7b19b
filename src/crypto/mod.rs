// SPDX-License-Identifier: CC0-1.0

//! Cryptography
//!
//! Elliptic curve functionality used by the HD node: scalar arithmetic modulo
//! the curve order, point tweaking and public key compression.
//!

pub mod curve;
