//! Serializes a [`BigInt`] as its decimal string, the way the ledger encodes amounts.

use num_bigint::BigInt;
use serde::{Deserialize, Deserializer, Serializer, de::Error};

pub fn serialize<S: Serializer>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigInt, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse::<BigInt>()
        .map_err(|e| D::Error::custom(format!("invalid integer {raw:?}: {e}")))
}
