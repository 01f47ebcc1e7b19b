// SPDX-License-Identifier: CC0-1.0

//! Utility functions
//!
//! Functions needed by all parts of the HD node library: the Base58Check
//! codec and address encoding.
//!

pub mod address;
pub mod base58;
