use core::fmt;
use core::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{EngineError, EngineResult};

/// Width in bytes of an asset address.
pub const ADDRESS_BYTES: usize = 20;

/// Placeholder address standing for the chain's native asset.
pub const NATIVE_PLACEHOLDER: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

/// Whether an asset slot refers to the native asset or a token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Native,
    Token,
}

/// 20-byte asset address. The all-`0xee` value is the native placeholder and
/// the all-zero value marks an unset vault slot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address {
    bytes: [u8; ADDRESS_BYTES],
}

impl Address {
    pub const ZERO: Address = Address {
        bytes: [0u8; ADDRESS_BYTES],
    };

    pub const NATIVE: Address = Address {
        bytes: [0xee; ADDRESS_BYTES],
    };

    pub const fn from_bytes(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self { bytes }
    }

    pub const fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.bytes
    }

    /// Parses `0x` followed by exactly 40 hex digits of either case.
    pub fn parse(text: &str) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidAddress {
            value: text.to_string(),
        };
        let digits = text.trim().strip_prefix("0x").ok_or_else(invalid)?;
        if digits.len() != ADDRESS_BYTES * 2 {
            return Err(invalid());
        }
        let mut bytes = [0u8; ADDRESS_BYTES];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;
        Ok(Self { bytes })
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }

    pub fn kind(&self) -> AssetKind {
        if self.is_native() {
            AssetKind::Native
        } else {
            AssetKind::Token
        }
    }
}

impl FromStr for Address {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            f.write_str(NATIVE_PLACEHOLDER)
        } else {
            write!(f, "0x{}", hex::encode(self.bytes))
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AddressVisitor;

        impl Visitor<'_> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 0x-prefixed 20-byte hex address")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Address, E> {
                Address::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(AddressVisitor)
    }
}
