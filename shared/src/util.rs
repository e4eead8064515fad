//! Lenient serde helpers
//!
//! The backend serializes decimal columns as strings (`"10.00"`) on some
//! endpoints and as numbers on others. These helpers accept both and reject
//! anything that does not parse.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    Text(String),
}

fn parse_f64<E: de::Error>(raw: NumberOrString) -> Result<f64, E> {
    match raw {
        NumberOrString::Number(n) => n
            .as_f64()
            .ok_or_else(|| E::custom(format!("number out of range: {n}"))),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("expected a number, got {s:?}"))),
    }
}

fn parse_i64<E: de::Error>(raw: NumberOrString) -> Result<i64, E> {
    match raw {
        NumberOrString::Number(n) => n
            .as_i64()
            .ok_or_else(|| E::custom(format!("expected an integer, got {n}"))),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| E::custom(format!("expected an integer, got {s:?}"))),
    }
}

/// `f64` from a number or a numeric string
pub fn de_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    parse_f64(NumberOrString::deserialize(deserializer)?)
}

/// `Option<f64>`; `null` and `""` become `None`
pub fn de_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(raw) => parse_f64(raw).map(Some),
    }
}

/// `i64` from a number or a numeric string
pub fn de_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    parse_i64(NumberOrString::deserialize(deserializer)?)
}

/// `Option<i64>`; `null` and `""` become `None`
pub fn de_opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(raw) => parse_i64(raw).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "de_f64")]
        price: f64,
        #[serde(default, deserialize_with = "de_opt_i64")]
        product_id: Option<i64>,
    }

    #[test]
    fn test_accepts_numbers_and_strings() {
        let a: Row = serde_json::from_str(r#"{"price":"10.50","product_id":"5"}"#).unwrap();
        assert_eq!(a.price, 10.5);
        assert_eq!(a.product_id, Some(5));

        let b: Row = serde_json::from_str(r#"{"price":3,"product_id":null}"#).unwrap();
        assert_eq!(b.price, 3.0);
        assert_eq!(b.product_id, None);

        let c: Row = serde_json::from_str(r#"{"price":1}"#).unwrap();
        assert_eq!(c.product_id, None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Row>(r#"{"price":"ten"}"#).is_err());
        assert!(serde_json::from_str::<Row>(r#"{"price":1,"product_id":"x"}"#).is_err());
    }
}
