// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::HashSet;

use crate::{Account, Portal, filter::text_matches};

/// Portals that could still become accounts: named, not already linked by
/// account number, and unique by name (first occurrence wins).
pub fn available_portals(portals: &[Portal], accounts: &[Account]) -> Vec<Portal> {
    let existing_numbers = accounts
        .iter()
        .map(|account| account.account_number.as_str())
        .filter(|number| !number.is_empty())
        .collect::<HashSet<&str>>();

    let mut seen_names = HashSet::new();
    portals
        .iter()
        .filter(|portal| {
            let Some(name) = portal.name.as_deref().filter(|name| !name.is_empty()) else {
                return false;
            };
            if portal
                .number
                .as_deref()
                .is_some_and(|number| existing_numbers.contains(number))
            {
                return false;
            }
            seen_names.insert(name.to_lowercase())
        })
        .cloned()
        .collect()
}

pub fn filter_portals(portals: &[Portal], term: &str) -> Vec<Portal> {
    portals
        .iter()
        .filter(|portal| text_matches(portal.display_name(), portal.number.as_deref(), term))
        .cloned()
        .collect()
}
