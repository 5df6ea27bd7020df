// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Account, AccountId, Portal};

pub const EMPTY_ACCOUNTS_TITLE: &str = "No accounts found";
pub const EMPTY_ACCOUNTS_MESSAGE: &str =
    "No accounts match your current filter criteria, or no data has been loaded yet.";
pub const EMPTY_PORTALS_TITLE: &str = "No portals available";
pub const EMPTY_PORTALS_MESSAGE: &str =
    "All portals are already added as accounts or no portals match your search.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    pub id: AccountId,
    pub name: String,
    pub number_label: String,
    pub active: bool,
    pub toggle_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub title: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountListView {
    Empty(Placeholder),
    Rows(Vec<AccountRow>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalRow {
    pub name: String,
    pub number_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalListView {
    Empty(Placeholder),
    Rows(Vec<PortalRow>),
}

pub fn render_accounts(accounts: &[Account]) -> AccountListView {
    if accounts.is_empty() {
        return AccountListView::Empty(Placeholder {
            title: EMPTY_ACCOUNTS_TITLE,
            message: EMPTY_ACCOUNTS_MESSAGE,
        });
    }

    AccountListView::Rows(
        accounts
            .iter()
            .map(|account| {
                let active = account.is_active();
                AccountRow {
                    id: account.id.clone(),
                    name: account.name.clone(),
                    number_label: format!("#{}", account.account_number),
                    active,
                    toggle_label: if active { "Deactivate" } else { "Activate" },
                }
            })
            .collect(),
    )
}

pub fn render_portals(portals: &[Portal]) -> PortalListView {
    if portals.is_empty() {
        return PortalListView::Empty(Placeholder {
            title: EMPTY_PORTALS_TITLE,
            message: EMPTY_PORTALS_MESSAGE,
        });
    }

    PortalListView::Rows(
        portals
            .iter()
            .map(|portal| PortalRow {
                name: portal.display_name().to_owned(),
                number_label: match portal.number.as_deref() {
                    Some(number) => format!("Account #{number}"),
                    None => "No Account Number".to_owned(),
                },
            })
            .collect(),
    )
}
