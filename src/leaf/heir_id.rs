use core::fmt;
use core::str::FromStr;

use num_bigint::BigUint;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{EngineError, EngineResult};

/// Width in bytes of the packed heir identifier (`uint256`).
pub const HEIR_ID_BYTES: usize = 32;

/// Unsigned 256-bit heir identifier stored as big-endian bytes.
///
/// Ordering follows the numeric value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HeirId {
    bytes: [u8; HEIR_ID_BYTES],
}

impl HeirId {
    /// Constructs an identifier from its 32-byte big-endian encoding.
    pub const fn from_be_bytes(bytes: [u8; HEIR_ID_BYTES]) -> Self {
        Self { bytes }
    }

    /// Returns the 32-byte big-endian encoding hashed into the leaf.
    pub const fn to_be_bytes(&self) -> [u8; HEIR_ID_BYTES] {
        self.bytes
    }

    /// Converts an arbitrary-precision value, rejecting anything wider than 256 bits.
    pub fn from_biguint(value: &BigUint) -> EngineResult<Self> {
        if value.bits() > (HEIR_ID_BYTES as u64) * 8 {
            return Err(EngineError::identifier(
                value.to_string(),
                "exceeds 256 bits",
            ));
        }
        let raw = value.to_bytes_be();
        let mut bytes = [0u8; HEIR_ID_BYTES];
        bytes[HEIR_ID_BYTES - raw.len()..].copy_from_slice(&raw);
        Ok(Self { bytes })
    }

    /// Converts a signed value, rejecting negatives.
    pub fn from_i128(value: i128) -> EngineResult<Self> {
        u128::try_from(value)
            .map(Self::from)
            .map_err(|_| EngineError::identifier(value.to_string(), "negative"))
    }

    /// Arbitrary-precision view of the identifier.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.bytes)
    }

    /// Returns the value when it fits in 64 bits.
    pub fn to_u64(&self) -> Option<u64> {
        let (high, low) = self.bytes.split_at(HEIR_ID_BYTES - 8);
        if high.iter().any(|byte| *byte != 0) {
            return None;
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(low);
        Some(u64::from_be_bytes(word))
    }
}

impl From<u64> for HeirId {
    fn from(value: u64) -> Self {
        Self::from(u128::from(value))
    }
}

impl From<u128> for HeirId {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; HEIR_ID_BYTES];
        bytes[HEIR_ID_BYTES - 16..].copy_from_slice(&value.to_be_bytes());
        Self { bytes }
    }
}

impl FromStr for HeirId {
    type Err = EngineError;

    /// Accepts decimal digits or `0x`-prefixed hex. Signs, fractions,
    /// whitespace inside the number and empty input are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(EngineError::identifier(s, "empty"));
        }
        if text.starts_with('-') {
            return Err(EngineError::identifier(s, "negative"));
        }
        let (digits, radix) = match text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
        {
            Some(hex_digits) => (hex_digits, 16),
            None => (text, 10),
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return Err(EngineError::identifier(s, "not an integer"));
        }
        let value = BigUint::parse_bytes(digits.as_bytes(), radix)
            .ok_or_else(|| EngineError::identifier(s, "not an integer"))?;
        Self::from_biguint(&value)
    }
}

impl fmt::Display for HeirId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_u64() {
            Some(small) => write!(f, "{small}"),
            None => write!(f, "{}", self.to_biguint()),
        }
    }
}

impl fmt::Debug for HeirId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HeirId({self})")
    }
}

impl Serialize for HeirId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_u64() {
            Some(small) => serializer.serialize_u64(small),
            None => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for HeirId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HeirIdVisitor;

        impl Visitor<'_> for HeirIdVisitor {
            type Value = HeirId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer below 2^256 (number or string)")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<HeirId, E> {
                Ok(HeirId::from(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<HeirId, E> {
                HeirId::from_i128(i128::from(value)).map_err(E::custom)
            }

            fn visit_u128<E: de::Error>(self, value: u128) -> Result<HeirId, E> {
                Ok(HeirId::from(value))
            }

            fn visit_i128<E: de::Error>(self, value: i128) -> Result<HeirId, E> {
                HeirId::from_i128(value).map_err(E::custom)
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<HeirId, E> {
                // Integral floats below 2^53 are exact; anything else is ambiguous.
                const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
                if value.is_finite() && value.fract() == 0.0 && (0.0..=MAX_EXACT).contains(&value)
                {
                    Ok(HeirId::from(value as u64))
                } else {
                    Err(E::custom(EngineError::identifier(
                        value.to_string(),
                        "not an exact non-negative integer",
                    )))
                }
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<HeirId, E> {
                value.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(HeirIdVisitor)
    }
}
