// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Account, AccountType, Portal};

/// Host data arrives either as already-decoded JSON or as JSON text, and in
/// both cases either as a bare array or wrapped as `{"value": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub accounts: Payload,
    pub portals: Option<Payload>,
    pub selected_type: Option<AccountType>,
}

impl LoadRequest {
    pub fn new(accounts: impl Into<Payload>) -> Self {
        Self {
            accounts: accounts.into(),
            portals: None,
            selected_type: None,
        }
    }

    pub fn with_portals(mut self, portals: impl Into<Payload>) -> Self {
        self.portals = Some(portals.into());
        self
    }

    pub fn with_selected_type(mut self, selected_type: AccountType) -> Self {
        self.selected_type = Some(selected_type);
        self
    }
}

pub fn decode_accounts(payload: &Payload) -> Vec<Account> {
    decode_records(payload, "accounts")
}

pub fn decode_portals(payload: Option<&Payload>) -> Vec<Portal> {
    match payload {
        Some(payload) => decode_records(payload, "portals"),
        None => {
            tracing::debug!("no portals payload provided");
            Vec::new()
        }
    }
}

fn decode_records<T: DeserializeOwned>(payload: &Payload, label: &str) -> Vec<T> {
    let value = match payload {
        Payload::Text(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!("failed to parse {label} JSON text: {error}");
                return Vec::new();
            }
        },
        Payload::Json(value) => value.clone(),
    };

    let Some(items) = extract_list(value) else {
        tracing::warn!("no valid {label} data format found; using an empty list");
        return Vec::new();
    };

    let total = items.len();
    let records = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<T>(item) {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::debug!("skipping {label} entry {index}: {error}");
                None
            }
        })
        .collect::<Vec<T>>();
    tracing::debug!("decoded {} of {total} {label}", records.len());
    records
}

fn extract_list(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Object(mut envelope) => match envelope.remove("value") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        Value::Array(items) => Some(items),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Partitions<'a> {
    pub individual: Vec<&'a Account>,
    pub group: Vec<&'a Account>,
}

impl<'a> Partitions<'a> {
    pub fn get(&self, kind: AccountType) -> &[&'a Account] {
        match kind {
            AccountType::Individual => &self.individual,
            AccountType::Group => &self.group,
        }
    }
}

/// Records whose `Type` is neither Individual nor Group land in no partition.
pub fn partition_accounts(accounts: &[Account]) -> Partitions<'_> {
    let mut partitions = Partitions::default();
    for account in accounts {
        match account.account_type() {
            Some(AccountType::Individual) => partitions.individual.push(account),
            Some(AccountType::Group) => partitions.group.push(account),
            None => {}
        }
    }
    partitions
}
