use core::fmt;

use num_bigint::BigUint;
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

use crate::errors::{EngineError, EngineResult};

/// Parses a non-negative decimal integer of arbitrary size.
pub fn parse_amount(text: &str) -> EngineResult<BigUint> {
    let digits = text.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(EngineError::encoding(
            "amount",
            format!("`{text}` is not a non-negative decimal integer"),
        ));
    }
    BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(|| {
        EngineError::encoding("amount", format!("`{text}` is not a decimal integer"))
    })
}

/// Serde adapter writing amounts as decimal strings so JSON consumers never
/// round them through a float. Plain JSON integers are accepted on input.
pub mod decimal {
    use super::*;

    pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = BigUint;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or decimal string")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<BigUint, E> {
                Ok(BigUint::from(value))
            }

            fn visit_u128<E: de::Error>(self, value: u128) -> Result<BigUint, E> {
                Ok(BigUint::from(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<BigUint, E> {
                u64::try_from(value)
                    .map(BigUint::from)
                    .map_err(|_| E::custom(format!("negative amount {value}")))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<BigUint, E> {
                parse_amount(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
