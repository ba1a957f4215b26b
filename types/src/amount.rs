//! Token amount helpers.
//!
//! Balances and voting weights are raw `u128` units. One whole token is
//! `TOKEN_UNIT` raw units (18 decimals).

/// Raw units per whole token.
pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// Convert whole tokens to raw units, saturating on overflow.
pub fn tokens(whole: u128) -> u128 {
    whole.saturating_mul(TOKEN_UNIT)
}

/// Render a raw amount as whole tokens with up to 4 fractional digits.
pub fn format_tokens(raw: u128) -> String {
    let whole = raw / TOKEN_UNIT;
    let frac = (raw % TOKEN_UNIT) / (TOKEN_UNIT / 10_000);
    if frac == 0 {
        format!("{} BLAN", whole)
    } else {
        let digits = format!("{:04}", frac);
        format!("{}.{} BLAN", whole, digits.trim_end_matches('0'))
    }
}

/// Serde adapter that writes a raw amount as a decimal string.
///
/// TOML integers stop at `i64::MAX`, well below realistic raw amounts.
/// Reading accepts either a string or a plain integer.
pub mod decimal {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        deserializer.deserialize_str(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl<'de> Visitor<'de> for DecimalVisitor {
        type Value = u128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or a decimal string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
            v.trim()
                .replace('_', "")
                .parse()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
            Ok(u128::from(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
            u128::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }
    }
}
