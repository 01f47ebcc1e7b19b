// SPDX-License-Identifier: CC0-1.0

//! Networks.
//!
//! A [`Network`] bundles the version magics of extended keys and the address
//! version of the chain a node is used with. The node itself only ever sees
//! plain `u32` versions; this module is a convenience for picking them.
//!
//! # Example: serializing a node for a network
//!
//! ```rust
//! use hdnode::{HDNode, Network};
//!
//! let network: Network = "testnet".parse().unwrap();
//! let node = HDNode::from_seed(b"some seed", network.curve_name()).unwrap();
//!
//! let tpub = node.serialize_public(network.xpub_magic()).unwrap();
//! assert!(tpub.starts_with("tpub"));
//! ```

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bip32::{Error, HDNode};
use crate::crypto::curve::SECP256K1_NAME;

/// The chain an HD node is used with.
#[derive(Copy, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[non_exhaustive]
pub enum Network {
    /// Bitcoin mainnet
    Bitcoin,
    /// Bitcoin testnet
    Testnet,
    /// Decred mainnet
    Decred,
    /// Decred testnet
    DecredTestnet,
}

impl Network {
    /// Version magic of extended public keys.
    pub fn xpub_magic(self) -> u32 {
        match self {
            Network::Bitcoin => 0x0488_B21E,
            Network::Testnet => 0x0435_87CF,
            Network::Decred => 0x02FD_A926,
            Network::DecredTestnet => 0x0435_87D1,
        }
    }

    /// Version magic of extended private keys.
    pub fn xprv_magic(self) -> u32 {
        match self {
            Network::Bitcoin => 0x0488_ADE4,
            Network::Testnet => 0x0435_8394,
            Network::Decred => 0x02FD_A4E8,
            Network::DecredTestnet => 0x0435_8397,
        }
    }

    /// Version of pay-to-pubkey-hash addresses.
    pub fn address_type(self) -> u32 {
        match self {
            Network::Bitcoin => 0x00,
            Network::Testnet => 0x6F,
            Network::Decred => 0x073F,
            Network::DecredTestnet => 0x0F21,
        }
    }

    /// Name of the curve keys of this network live on.
    pub fn curve_name(self) -> &'static str { SECP256K1_NAME }

    /// Returns `true` for the Decred networks, whose addresses hash with BLAKE-256.
    pub fn is_decred(self) -> bool { matches!(self, Network::Decred | Network::DecredTestnet) }

    /// Pay-to-pubkey-hash address of `node` on this network.
    pub fn address(self, node: &HDNode) -> Result<String, Error> {
        if self.is_decred() {
            node.decred_address(self.address_type())
        } else {
            node.address(self.address_type())
        }
    }

    /// Decodes an extended key serialized for this network.
    pub fn deserialize(self, value: &str) -> Result<HDNode, Error> {
        HDNode::deserialize(value, self.xpub_magic(), self.xprv_magic())
    }

    /// Converts a `Network` to its command line name.
    pub fn to_core_arg(self) -> &'static str {
        match self {
            Network::Bitcoin => "bitcoin",
            Network::Testnet => "testnet",
            Network::Decred => "decred",
            Network::DecredTestnet => "decred-testnet",
        }
    }

    /// Converts a command line name to its equivalent `Network`.
    pub fn from_core_arg(core_arg: &str) -> Result<Self, ParseNetworkError> {
        use Network::*;

        let network = match core_arg {
            "bitcoin" => Bitcoin,
            "testnet" => Testnet,
            "decred" => Decred,
            "decred-testnet" => DecredTestnet,
            _ => return Err(ParseNetworkError(core_arg.to_owned())),
        };
        Ok(network)
    }
}

/// An error in parsing network string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ParseNetworkError(pub String);

impl fmt::Display for ParseNetworkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "failed to parse {} as network", self.0)
    }
}

impl std::error::Error for ParseNetworkError {}

impl FromStr for Network {
    type Err = ParseNetworkError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> { Network::from_core_arg(s) }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.to_core_arg()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bip32::HARDENED;
    use crate::test_helpers::vector1_master;

    const ALL: [Network; 4] =
        [Network::Bitcoin, Network::Testnet, Network::Decred, Network::DecredTestnet];

    #[test]
    fn string_round_trip() {
        for network in ALL.iter() {
            assert_eq!(network.to_string().parse::<Network>().unwrap(), *network);
            assert_eq!(Network::from_core_arg(network.to_core_arg()).unwrap(), *network);
        }
        assert_eq!("mainnet".parse::<Network>(), Err(ParseNetworkError("mainnet".to_owned())));
        assert_eq!(
            ParseNetworkError("fakenet".to_owned()).to_string(),
            "failed to parse fakenet as network"
        );
    }

    #[test]
    fn extended_key_prefixes() {
        let node = vector1_master();
        let prefixes = [
            (Network::Bitcoin, "xpub", "xprv"),
            (Network::Testnet, "tpub", "tprv"),
            (Network::Decred, "dpub", "dprv"),
            (Network::DecredTestnet, "tpub", "tprv"),
        ];
        for (network, public, private) in prefixes.iter() {
            assert!(node.serialize_public(network.xpub_magic()).unwrap().starts_with(public));
            assert!(node.serialize_private(network.xprv_magic()).unwrap().starts_with(private));
        }
    }

    #[test]
    fn network_round_trip() {
        let mut node = vector1_master();
        node.derive(HARDENED).unwrap();
        for network in ALL.iter() {
            let xprv = node.serialize_private(network.xprv_magic()).unwrap();
            let decoded = network.deserialize(&xprv).unwrap();
            assert_eq!(decoded.private_key(), node.private_key());

            let xpub = node.serialize_public(network.xpub_magic()).unwrap();
            assert!(network.deserialize(&xpub).unwrap().is_public_only());
        }
        let xprv = node.serialize_private(Network::Bitcoin.xprv_magic()).unwrap();
        assert_eq!(
            Network::Decred.deserialize(&xprv).err(),
            Some(Error::UnknownVersion(Network::Bitcoin.xprv_magic()))
        );
    }

    #[test]
    fn addresses() {
        let node = vector1_master();
        assert_eq!(
            Network::Bitcoin.address(&node).unwrap(),
            "15mKKb2eos1hWa6tisdPwwDC1a5J1y9nma"
        );
        assert_eq!(Network::Testnet.address(&node).unwrap(), node.address(0x6f).unwrap());
        assert_eq!(
            Network::Decred.address(&node).unwrap(),
            "Dsi8UNqawkGAdvy9mzv5EgLdZPivNnKMiNi"
        );
        assert_eq!(
            Network::DecredTestnet.address(&node).unwrap(),
            "TsiBhMy6LYKGkHeWbPYEPFMu9VgqwRgkt8T"
        );
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&Network::DecredTestnet).unwrap(), "\"decred-testnet\"");
        let network: Network = serde_json::from_str("\"bitcoin\"").unwrap();
        assert_eq!(network, Network::Bitcoin);
    }
}
