// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Host record identifiers are large integers that only survive as text, so
/// numeric JSON is accepted and kept as its decimal string.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        loose_string(deserializer).map(Self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Text(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Null(()),
}

pub(crate) fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LooseScalar::deserialize(deserializer)? {
        LooseScalar::Text(value) => value,
        LooseScalar::Int(value) => value.to_string(),
        LooseScalar::Uint(value) => value.to_string(),
        LooseScalar::Float(value) => value.to_string(),
        LooseScalar::Null(()) => String::new(),
    })
}
