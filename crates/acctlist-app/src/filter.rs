// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Account, FilterState, StatusFilter};

/// Name matches ignore case; numbers are compared against the lower-cased
/// term as typed, so digits match exactly.
pub fn text_matches(name: &str, number: Option<&str>, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    name.to_lowercase().contains(&needle)
        || number.is_some_and(|number| number.contains(&needle))
}

pub fn matches_search(account: &Account, term: &str) -> bool {
    text_matches(&account.name, Some(&account.account_number), term)
}

pub fn matches_status(account: &Account, status: StatusFilter) -> bool {
    match status {
        StatusFilter::All => true,
        StatusFilter::Active => account.is_active(),
        StatusFilter::Inactive => !account.is_active(),
    }
}

pub fn filter_accounts<'a, I>(records: I, filter: &FilterState) -> Vec<Account>
where
    I: IntoIterator<Item = &'a Account>,
{
    records
        .into_iter()
        .filter(|account| {
            matches_search(account, &filter.search_term)
                && matches_status(account, filter.status_filter)
        })
        .cloned()
        .collect()
}
