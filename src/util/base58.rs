// SPDX-License-Identifier: CC0-1.0

//! Base58 encoder and decoder.
//!
//! Base58Check with a bounded output buffer. The standard variant uses the
//! first four bytes of double-SHA256 as the checksum; Decred replaces it with
//! double-BLAKE256, which `bs58` does not know, so it is checked here.
//!

use core::{fmt, str};

use blake_hash::{Blake256, Digest};
use hashes::{sha256d, Hash};

/// Length of the checksum appended to the payload.
pub const CHECKSUM_LEN: usize = 4;

/// An error that might occur during base58 encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The encoded string does not fit the output buffer.
    BufferTooSmall,
    /// Checksum was not correct (expected, actual).
    BadChecksum([u8; CHECKSUM_LEN], [u8; CHECKSUM_LEN]),
    /// The input is not valid base58, or too short to carry a checksum.
    Decode(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::BufferTooSmall => f.write_str("encoded base58 string exceeds the output bound"),
            Error::BadChecksum(exp, actual) => write!(
                f,
                "base58ck checksum {:02x?} does not match expected {:02x?}",
                actual, exp
            ),
            Error::Decode(ref msg) => write!(f, "invalid base58: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Checksum algorithm used for Base58Check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checksum {
    /// First four bytes of SHA256(SHA256(payload)).
    DoubleSha256,
    /// First four bytes of BLAKE256(BLAKE256(payload)).
    DoubleBlake256,
}

impl Checksum {
    /// Computes the checksum of `data`.
    pub fn compute(self, data: &[u8]) -> [u8; CHECKSUM_LEN] {
        let mut ret = [0u8; CHECKSUM_LEN];
        match self {
            Checksum::DoubleSha256 => {
                ret.copy_from_slice(&sha256d::Hash::hash(data).to_byte_array()[..CHECKSUM_LEN]);
            }
            Checksum::DoubleBlake256 => {
                let digest = Blake256::digest(&Blake256::digest(data));
                ret.copy_from_slice(&digest[..CHECKSUM_LEN]);
            }
        }
        ret
    }
}

/// Encodes `data` with an appended checksum into a string of at most `MAX`
/// characters.
pub fn encode_check_bounded<const MAX: usize>(
    data: &[u8],
    checksum: Checksum,
) -> Result<String, Error> {
    let mut buffer = [0u8; MAX];
    let written = match checksum {
        Checksum::DoubleSha256 => bs58::encode(data).with_check().onto(&mut buffer[..]),
        Checksum::DoubleBlake256 => {
            let mut payload = Vec::with_capacity(data.len() + CHECKSUM_LEN);
            payload.extend_from_slice(data);
            payload.extend_from_slice(&checksum.compute(data));
            bs58::encode(&payload).onto(&mut buffer[..])
        }
    }
    .map_err(|_| Error::BufferTooSmall)?;

    str::from_utf8(&buffer[..written])
        .map(str::to_owned)
        .map_err(|e| Error::Decode(e.to_string()))
}

/// Decodes a Base58Check string, verifying and stripping the checksum.
pub fn decode_check(data: &str, checksum: Checksum) -> Result<Vec<u8>, Error> {
    match checksum {
        Checksum::DoubleSha256 => bs58::decode(data).with_check(None).into_vec().map_err(|e| match e {
            // bs58 names the computed checksum `checksum` and the encoded one `expected_checksum`
            bs58::decode::Error::InvalidChecksum { checksum, expected_checksum } =>
                Error::BadChecksum(checksum, expected_checksum),
            e => Error::Decode(e.to_string()),
        }),
        Checksum::DoubleBlake256 => {
            let mut ret =
                bs58::decode(data).into_vec().map_err(|e| Error::Decode(e.to_string()))?;
            if ret.len() < CHECKSUM_LEN {
                return Err(Error::Decode(format!(
                    "{} bytes is too short for a checksum",
                    ret.len()
                )));
            }
            let check_start = ret.len() - CHECKSUM_LEN;

            let mut actual = [0u8; CHECKSUM_LEN];
            actual.copy_from_slice(&ret[check_start..]);
            let expected = checksum.compute(&ret[..check_start]);
            if expected != actual {
                return Err(Error::BadChecksum(expected, actual));
            }

            ret.truncate(check_start);
            Ok(ret)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base58_encode_check() {
        // Addresses
        let addr = hex::decode("00f8917303bfa8ef24f292e8fa1419b20460ba064d").unwrap();
        assert_eq!(
            encode_check_bounded::<36>(&addr, Checksum::DoubleSha256).unwrap(),
            "1PfJpZsjreyVrqeoAfabrRwwjQyoSQMmHH"
        );
    }

    #[test]
    fn test_base58_decode_check() {
        assert_eq!(
            decode_check("1PfJpZsjreyVrqeoAfabrRwwjQyoSQMmHH", Checksum::DoubleSha256).unwrap(),
            hex::decode("00f8917303bfa8ef24f292e8fa1419b20460ba064d").unwrap()
        );

        // Checksum error
        assert!(matches!(
            decode_check("1PfJpZsjreyVrqeoAfabrRwwjQyoSQMmHL", Checksum::DoubleSha256),
            Err(Error::BadChecksum(..))
        ));
        // Invalid character
        assert!(matches!(
            decode_check("1PfJpZsjreyVrqeoAfabrRwwjQyoSQMmH0", Checksum::DoubleSha256),
            Err(Error::Decode(_))
        ));
        // Too short to carry a checksum
        assert!(matches!(decode_check("1", Checksum::DoubleSha256), Err(Error::Decode(_))));
        assert!(matches!(decode_check("1", Checksum::DoubleBlake256), Err(Error::Decode(_))));

        // The reported pair is (expected, actual)
        let mut payload = hex::decode("00f8917303bfa8ef24f292e8fa1419b20460ba064d").unwrap();
        let expected = Checksum::DoubleSha256.compute(&payload);
        payload.extend_from_slice(&[0u8; CHECKSUM_LEN]);
        let encoded = bs58::encode(&payload).into_string();
        assert_eq!(
            decode_check(&encoded, Checksum::DoubleSha256),
            Err(Error::BadChecksum(expected, [0u8; CHECKSUM_LEN]))
        );
    }

    #[test]
    fn bounded_output() {
        let data = [0xffu8; 78];
        assert_eq!(encode_check_bounded::<36>(&data, Checksum::DoubleSha256), Err(Error::BufferTooSmall));
        let encoded = encode_check_bounded::<128>(&data, Checksum::DoubleSha256).unwrap();
        assert!(encoded.len() <= 112);
        assert_eq!(decode_check(&encoded, Checksum::DoubleSha256).unwrap(), data.to_vec());
    }

    #[test]
    fn blake256_round_trip() {
        let data = hex::decode("073f2789d58cfa0957d206f025c2af056fc8a77cebb0").unwrap();
        let encoded = encode_check_bounded::<36>(&data, Checksum::DoubleBlake256).unwrap();
        assert!(encoded.starts_with("Ds"));
        assert_eq!(decode_check(&encoded, Checksum::DoubleBlake256).unwrap(), data);
        assert!(matches!(
            decode_check(&encoded, Checksum::DoubleSha256),
            Err(Error::BadChecksum(..))
        ));
    }

    #[test]
    fn blake256_digest() {
        // BLAKE-256 of the empty message
        assert_eq!(
            hex::encode(Blake256::digest(b"")),
            "716f6e863f744b9ac22c97ec7b76ea5f5908bc5b2f67c61510bfc4751384ea7a"
        );
    }
}
