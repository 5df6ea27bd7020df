// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::ids::AccountId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Individual,
    Group,
}

impl AccountType {
    pub const ALL: [Self; 2] = [Self::Individual, Self::Group];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "Individual",
            Self::Group => "Group",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Individual" => Some(Self::Individual),
            "Group" => Some(Self::Group),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Group => "group",
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::Individual => Self::Group,
            Self::Group => Self::Individual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Inactive];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Inactive,
            Self::Inactive => Self::All,
        }
    }
}

/// Host encoding of `fActive`: `1` is active, any other value (usually
/// `null`) is inactive, and an absent field is unset. Unset counts as
/// inactive everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveFlag {
    Active,
    Inactive,
    #[default]
    Unset,
}

impl ActiveFlag {
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive | Self::Unset => Self::Active,
        }
    }
}

impl Serialize for ActiveFlag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Active => serializer.serialize_u8(1),
            Self::Inactive | Self::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ActiveFlag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_wire(Some(&Value::deserialize(deserializer)?)))
    }
}

impl ActiveFlag {
    /// Only a numeric `1` is active; any other present value is inactive.
    pub fn from_wire(value: Option<&Value>) -> Self {
        match value {
            None => Self::Unset,
            Some(value) if value.as_f64() == Some(1.0) => Self::Active,
            Some(_) => Self::Inactive,
        }
    }

    fn to_wire(self) -> Option<Value> {
        match self {
            Self::Active => Some(Value::from(1)),
            Self::Inactive => Some(Value::Null),
            Self::Unset => None,
        }
    }
}

const ID_FIELD: &str = "__ID";
const NAME_FIELD: &str = "Name";
const NUMBER_FIELD: &str = "AccountNumber";
const ACTIVE_FIELD: &str = "fActive";
const TYPE_FIELD: &str = "Type";
const ACCOUNT_FIELDS: [&str; 5] = [ID_FIELD, NAME_FIELD, NUMBER_FIELD, ACTIVE_FIELD, TYPE_FIELD];

const PORTAL_NAME_FIELD: &str = "portal";
const PORTAL_NUMBER_FIELD: &str = "number";
const PORTAL_FIELDS: [&str; 2] = [PORTAL_NAME_FIELD, PORTAL_NUMBER_FIELD];

/// Text view of a host scalar. Objects, arrays and `null` have none.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn non_empty_text(value: Option<&Value>) -> Option<String> {
    scalar_text(value).filter(|text| !text.is_empty())
}

fn split_known(fields: &mut Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    let mut received = Map::new();
    for key in known {
        if let Some(value) = fields.remove(*key) {
            received.insert((*key).to_owned(), value);
        }
    }
    received
}

/// Writes the host's own value back when it still decodes to the current
/// field, and the normalized value otherwise. `None` leaves the key out.
fn write_field(
    fields: &mut Map<String, Value>,
    received: &Map<String, Value>,
    key: &str,
    unchanged: bool,
    current: Option<Value>,
) {
    let value = if unchanged {
        received.get(key).cloned()
    } else {
        current
    };
    if let Some(value) = value {
        fields.insert(key.to_owned(), value);
    }
}

/// A host account record. Every object decodes: missing or non-scalar
/// fields fall back to empty text. The known fields are also kept exactly as
/// received so an untouched record is written back unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub account_number: String,
    pub active: ActiveFlag,
    pub kind: Option<String>,
    pub extra: Map<String, Value>,
    pub received: Map<String, Value>,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.active.is_active()
    }

    pub fn account_type(&self) -> Option<AccountType> {
        self.kind.as_deref().and_then(AccountType::parse)
    }

    pub fn from_fields(mut fields: Map<String, Value>) -> Self {
        let received = split_known(&mut fields, &ACCOUNT_FIELDS);
        Self {
            id: AccountId::new(scalar_text(received.get(ID_FIELD)).unwrap_or_default()),
            name: scalar_text(received.get(NAME_FIELD)).unwrap_or_default(),
            account_number: scalar_text(received.get(NUMBER_FIELD)).unwrap_or_default(),
            active: ActiveFlag::from_wire(received.get(ACTIVE_FIELD)),
            kind: scalar_text(received.get(TYPE_FIELD)),
            extra: fields,
            received,
        }
    }

    pub fn to_fields(&self) -> Map<String, Value> {
        let received = &self.received;
        let text = |key: &str| scalar_text(received.get(key)).unwrap_or_default();
        let mut fields = self.extra.clone();
        write_field(
            &mut fields,
            received,
            ID_FIELD,
            text(ID_FIELD) == self.id.as_str(),
            Some(Value::String(self.id.as_str().to_owned())),
        );
        write_field(
            &mut fields,
            received,
            NAME_FIELD,
            text(NAME_FIELD) == self.name,
            Some(Value::String(self.name.clone())),
        );
        write_field(
            &mut fields,
            received,
            NUMBER_FIELD,
            text(NUMBER_FIELD) == self.account_number,
            Some(Value::String(self.account_number.clone())),
        );
        write_field(
            &mut fields,
            received,
            ACTIVE_FIELD,
            ActiveFlag::from_wire(received.get(ACTIVE_FIELD)) == self.active,
            self.active.to_wire(),
        );
        write_field(
            &mut fields,
            received,
            TYPE_FIELD,
            scalar_text(received.get(TYPE_FIELD)) == self.kind,
            self.kind.clone().map(Value::String),
        );
        fields
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_fields().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_fields)
    }
}

/// A host portal record. Empty names and numbers read as missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Portal {
    pub name: Option<String>,
    pub number: Option<String>,
    pub extra: Map<String, Value>,
    pub received: Map<String, Value>,
}

impl Portal {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn from_fields(mut fields: Map<String, Value>) -> Self {
        let received = split_known(&mut fields, &PORTAL_FIELDS);
        Self {
            name: non_empty_text(received.get(PORTAL_NAME_FIELD)),
            number: non_empty_text(received.get(PORTAL_NUMBER_FIELD)),
            extra: fields,
            received,
        }
    }

    pub fn to_fields(&self) -> Map<String, Value> {
        let received = &self.received;
        let mut fields = self.extra.clone();
        write_field(
            &mut fields,
            received,
            PORTAL_NAME_FIELD,
            non_empty_text(received.get(PORTAL_NAME_FIELD)) == self.name,
            self.name.clone().map(Value::String),
        );
        write_field(
            &mut fields,
            received,
            PORTAL_NUMBER_FIELD,
            non_empty_text(received.get(PORTAL_NUMBER_FIELD)) == self.number,
            self.number.clone().map(Value::String),
        );
        fields
    }
}

impl Serialize for Portal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_fields().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Portal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_fields)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_term: String,
    pub status_filter: StatusFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
}

impl Stats {
    pub fn of(accounts: &[Account]) -> Self {
        Self {
            total: accounts.len(),
            active: accounts.iter().filter(|account| account.is_active()).count(),
        }
    }
}
