// SPDX-License-Identifier: CC0-1.0

//! Internal macros.
//!
//! Macros meant to be used inside the library only.

/// Implements standard array methods for a given wrapper type.
macro_rules! impl_array_newtype {
    ($thing:ident, $ty:ty, $len:literal) => {
        impl $thing {
            /// Creates the wrapper from a byte array.
            #[inline]
            pub const fn from_bytes(data: [$ty; $len]) -> Self { $thing(data) }

            /// Returns a reference to the underlying bytes.
            #[inline]
            pub fn as_bytes(&self) -> &[$ty; $len] { &self.0 }

            /// Returns a copy of the underlying bytes.
            #[inline]
            pub fn to_bytes(self) -> [$ty; $len] { self.0 }
        }

        impl From<[$ty; $len]> for $thing {
            fn from(data: [$ty; $len]) -> Self { $thing(data) }
        }

        impl From<$thing> for [$ty; $len] {
            fn from(thing: $thing) -> Self { thing.0 }
        }

        impl<'a> core::convert::TryFrom<&'a [$ty]> for $thing {
            type Error = core::array::TryFromSliceError;

            fn try_from(data: &'a [$ty]) -> Result<Self, Self::Error> {
                <[$ty; $len]>::try_from(data).map($thing)
            }
        }

        impl AsRef<[$ty]> for $thing {
            fn as_ref(&self) -> &[$ty] { &self.0 }
        }

        impl core::ops::Deref for $thing {
            type Target = [$ty; $len];

            fn deref(&self) -> &Self::Target { &self.0 }
        }
    };
}

/// Implements hex formatting for a byte array wrapper.
macro_rules! impl_bytes_newtype {
    ($thing:ident) => {
        impl core::fmt::LowerHex for $thing {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                for byte in self.0.iter() {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }

        impl core::fmt::Display for $thing {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                core::fmt::LowerHex::fmt(self, f)
            }
        }

        impl core::fmt::Debug for $thing {
            fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(f, "{}({:x})", stringify!($thing), self)
            }
        }
    };
}
