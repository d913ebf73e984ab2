//! Serde helpers for wei amounts
//!
//! Amounts that fit a `u64` are written as JSON numbers, the shape the
//! bundled feed uses. Larger ones fall back to decimal strings so they
//! survive a reader that parses numbers as `u64` or `f64`. Both forms are
//! accepted on the way in.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
    match u64::try_from(*value) {
        Ok(small) => serializer.serialize_u64(small),
        Err(_) => serializer.collect_str(value),
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    deserializer.deserialize_any(AmountVisitor)
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = u128;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
        Ok(u128::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
        u128::try_from(v).map_err(|_| E::custom("negative amount"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u128, E> {
        if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
            Ok(v as u128)
        } else {
            Err(E::custom("amount must be a non-negative integer"))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
        v.trim().parse::<u128>().map_err(E::custom)
    }
}

/// Same encoding for optional fields
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<u128>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(amount) => super::serialize(amount, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u128>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super")] u128);

        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(amount)| amount))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "super")]
        amount: u128,
        #[serde(default, with = "super::option", skip_serializing_if = "Option::is_none")]
        fee: Option<u128>,
    }

    #[test]
    fn test_reads_numbers_and_strings() {
        let from_number: Holder = serde_json::from_str(r#"{"amount": 2500}"#).unwrap();
        let from_string: Holder = serde_json::from_str(r#"{"amount": "2500", "fee": 7}"#).unwrap();
        assert_eq!(from_number.amount, 2500);
        assert_eq!(from_string.amount, 2500);
        assert_eq!(from_string.fee, Some(7));
    }

    #[test]
    fn test_writes_numbers_within_u64() {
        let holder = Holder {
            amount: 80_000_000_000_000,
            fee: Some(u128::from(u64::MAX)),
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, format!(r#"{{"amount":80000000000000,"fee":{}}}"#, u64::MAX));
        assert_eq!(serde_json::from_str::<Holder>(&json).unwrap(), holder);
    }

    #[test]
    fn test_writes_strings_past_u64() {
        let holder = Holder {
            amount: u128::MAX,
            fee: Some(u128::from(u64::MAX) + 1),
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(
            json,
            format!(r#"{{"amount":"{}","fee":"{}"}}"#, u128::MAX, u128::from(u64::MAX) + 1)
        );
        assert_eq!(serde_json::from_str::<Holder>(&json).unwrap(), holder);
    }

    #[test]
    fn test_rejects_negative_and_fractional() {
        assert!(serde_json::from_str::<Holder>(r#"{"amount": -1}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"amount": 1.5}"#).is_err());
        assert!(serde_json::from_str::<Holder>(r#"{"amount": "abc"}"#).is_err());
    }

    #[test]
    fn test_null_optional() {
        let holder: Holder = serde_json::from_str(r#"{"amount": "1", "fee": null}"#).unwrap();
        assert_eq!(holder.fee, None);
    }
}
