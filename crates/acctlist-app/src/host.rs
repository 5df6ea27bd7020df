// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::{Account, AccountId, AccountType, ActiveFlag, Portal};

pub const DEFAULT_SCRIPT_NAME: &str = "Manage: Accounts";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandMode {
    Status,
    Delete,
    AddAccount,
}

impl CommandMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Delete => "delete",
            Self::AddAccount => "addAccount",
        }
    }
}

/// A change request for the host, which stays the system of record.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    SetStatus {
        account: Account,
    },
    Delete {
        account: Account,
    },
    AddAccount {
        portal: Portal,
        account_type: AccountType,
    },
}

impl HostCommand {
    pub const fn mode(&self) -> CommandMode {
        match self {
            Self::SetStatus { .. } => CommandMode::Status,
            Self::Delete { .. } => CommandMode::Delete,
            Self::AddAccount { .. } => CommandMode::AddAccount,
        }
    }
}

/// Delivery is fire-and-forget; callers log failures and move on.
pub trait HostPort {
    fn deliver(&mut self, command: &HostCommand) -> Result<()>;
}

impl<H: HostPort + ?Sized> HostPort for Box<H> {
    fn deliver(&mut self, command: &HostCommand) -> Result<()> {
        (**self).deliver(command)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChanged {
    pub account_id: AccountId,
    pub account_number: String,
    pub new_status: ActiveFlag,
    pub account: Account,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDeleted {
    pub account_id: AccountId,
    pub account_number: String,
    pub account: Account,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAdded {
    pub portal: Portal,
    pub account_type: AccountType,
}

/// Advisory notification for a registered callback.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    StatusChanged(StatusChanged),
    AccountDeleted(AccountDeleted),
    AccountAdded(AccountAdded),
}

impl HostEvent {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StatusChanged(_) => "statusChanged",
            Self::AccountDeleted(_) => "accountDeleted",
            Self::AccountAdded(_) => "accountAdded",
        }
    }

    pub fn payload(&self) -> serde_json::Result<Value> {
        match self {
            Self::StatusChanged(event) => serde_json::to_value(event),
            Self::AccountDeleted(event) => serde_json::to_value(event),
            Self::AccountAdded(event) => serde_json::to_value(event),
        }
    }
}
