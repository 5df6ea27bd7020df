// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;

use crate::{
    Account, AccountAdded, AccountDeleted, AccountId, AccountType, FilterState, HostCommand,
    HostEvent, LoadRequest, Portal, Stats, StatusChanged, StatusFilter, available_portals,
    decode_accounts, decode_portals, filter_accounts, filter_portals, partition_accounts,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabFilters {
    pub individual: FilterState,
    pub group: FilterState,
}

impl TabFilters {
    pub fn get(&self, kind: AccountType) -> &FilterState {
        match kind {
            AccountType::Individual => &self.individual,
            AccountType::Group => &self.group,
        }
    }

    pub fn get_mut(&mut self, kind: AccountType) -> &mut FilterState {
        match kind {
            AccountType::Individual => &mut self.individual,
            AccountType::Group => &mut self.group,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortalPicker {
    pub open: bool,
    pub search_term: String,
    pub available: Vec<Portal>,
    pub filtered: Vec<Portal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddGuard {
    pub in_flight: bool,
    pub token: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    accounts: Vec<Account>,
    portals: Vec<Portal>,
    active_type: AccountType,
    filters: TabFilters,
    filtered: Vec<Account>,
    picker: PortalPicker,
    add_guard: AddGuard,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            portals: Vec::new(),
            active_type: AccountType::Individual,
            filters: TabFilters::default(),
            filtered: Vec::new(),
            picker: PortalPicker::default(),
            add_guard: AddGuard::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListCommand {
    Load(LoadRequest),
    SetSearch(String),
    SetStatusFilter(StatusFilter),
    ClearSearch,
    SelectType(AccountType),
    ToggleStatus(AccountId),
    Delete(AccountId),
    OpenAddModal,
    CloseAddModal,
    SetPortalSearch(String),
    AddFromPortal(Portal),
    ReleaseAddGuard { token: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    Loaded { accounts: usize, portals: usize },
    TypeSelected(AccountType),
    FilterChanged(FilterState),
    ViewChanged { visible: usize },
    Host(HostCommand),
    Notify(HostEvent),
    AddModalOpened { available: usize },
    AddModalClosed,
    PortalsFiltered { visible: usize },
    AddGuardArmed { token: u64 },
    AddGuardReleased,
    AddIgnored,
}

/// Plain data view of the list, handed to the host on request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot {
    pub accounts: Vec<Account>,
    pub individual_accounts: Vec<Account>,
    pub group_accounts: Vec<Account>,
    pub filtered_accounts: Vec<Account>,
    pub portals: Vec<Portal>,
    pub selected_type: AccountType,
    pub filters: TabFilters,
    pub stats: Stats,
}

impl ListState {
    pub fn with_selection(active_type: AccountType, status_filter: StatusFilter) -> Self {
        let mut state = Self {
            active_type,
            ..Self::default()
        };
        for kind in AccountType::ALL {
            state.filters.get_mut(kind).status_filter = status_filter;
        }
        state
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    pub fn active_type(&self) -> AccountType {
        self.active_type
    }

    pub fn active_filter(&self) -> &FilterState {
        self.filters.get(self.active_type)
    }

    pub fn filters(&self) -> &TabFilters {
        &self.filters
    }

    pub fn filtered(&self) -> &[Account] {
        &self.filtered
    }

    pub fn picker(&self) -> &PortalPicker {
        &self.picker
    }

    pub fn add_guard(&self) -> AddGuard {
        self.add_guard
    }

    pub fn stats(&self) -> Stats {
        Stats::of(&self.accounts)
    }

    pub fn partition_count(&self, kind: AccountType) -> usize {
        partition_accounts(&self.accounts).get(kind).len()
    }

    pub fn find(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| &account.id == id)
    }

    pub fn snapshot(&self) -> ListSnapshot {
        let partitions = partition_accounts(&self.accounts);
        ListSnapshot {
            accounts: self.accounts.clone(),
            individual_accounts: partitions.individual.into_iter().cloned().collect(),
            group_accounts: partitions.group.into_iter().cloned().collect(),
            filtered_accounts: self.filtered.clone(),
            portals: self.portals.clone(),
            selected_type: self.active_type,
            filters: self.filters.clone(),
            stats: self.stats(),
        }
    }

    pub fn dispatch(&mut self, command: ListCommand) -> Vec<ListEvent> {
        match command {
            ListCommand::Load(request) => self.load(request),
            ListCommand::SetSearch(term) => {
                self.filters.get_mut(self.active_type).search_term = term;
                self.filter_changed()
            }
            ListCommand::SetStatusFilter(status) => {
                self.filters.get_mut(self.active_type).status_filter = status;
                self.filter_changed()
            }
            ListCommand::ClearSearch => {
                self.filters.get_mut(self.active_type).search_term.clear();
                self.filter_changed()
            }
            ListCommand::SelectType(kind) => {
                self.active_type = kind;
                vec![
                    ListEvent::TypeSelected(kind),
                    ListEvent::FilterChanged(self.active_filter().clone()),
                    self.refilter(),
                ]
            }
            ListCommand::ToggleStatus(id) => self.toggle_status(&id),
            ListCommand::Delete(id) => self.delete(&id),
            ListCommand::OpenAddModal => {
                self.picker.open = true;
                self.picker.available = available_portals(&self.portals, &self.accounts);
                self.picker.filtered =
                    filter_portals(&self.picker.available, &self.picker.search_term);
                vec![ListEvent::AddModalOpened {
                    available: self.picker.available.len(),
                }]
            }
            ListCommand::CloseAddModal => self.close_add_modal(),
            ListCommand::SetPortalSearch(term) => {
                self.picker.filtered = filter_portals(&self.picker.available, &term);
                self.picker.search_term = term;
                vec![ListEvent::PortalsFiltered {
                    visible: self.picker.filtered.len(),
                }]
            }
            ListCommand::AddFromPortal(portal) => self.add_from_portal(portal),
            ListCommand::ReleaseAddGuard { token } => {
                if self.add_guard.in_flight && self.add_guard.token == token {
                    self.add_guard.in_flight = false;
                    vec![ListEvent::AddGuardReleased]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn load(&mut self, request: LoadRequest) -> Vec<ListEvent> {
        self.accounts = decode_accounts(&request.accounts);
        self.portals = decode_portals(request.portals.as_ref());
        tracing::info!(
            accounts = self.accounts.len(),
            portals = self.portals.len(),
            "loaded host data"
        );

        let mut events = vec![ListEvent::Loaded {
            accounts: self.accounts.len(),
            portals: self.portals.len(),
        }];
        if let Some(kind) = request.selected_type {
            self.active_type = kind;
            events.push(ListEvent::TypeSelected(kind));
        }
        if self.picker.open {
            self.picker.available = available_portals(&self.portals, &self.accounts);
            self.picker.filtered = filter_portals(&self.picker.available, &self.picker.search_term);
        }
        events.push(self.refilter());
        events
    }

    fn filter_changed(&mut self) -> Vec<ListEvent> {
        vec![
            ListEvent::FilterChanged(self.active_filter().clone()),
            self.refilter(),
        ]
    }

    fn refilter(&mut self) -> ListEvent {
        let partitions = partition_accounts(&self.accounts);
        self.filtered = filter_accounts(
            partitions.get(self.active_type).iter().copied(),
            self.filters.get(self.active_type),
        );
        ListEvent::ViewChanged {
            visible: self.filtered.len(),
        }
    }

    fn toggle_status(&mut self, id: &AccountId) -> Vec<ListEvent> {
        let Some(account) = self.accounts.iter_mut().find(|account| &account.id == id) else {
            tracing::debug!(%id, "toggle requested for unknown account");
            return Vec::new();
        };
        account.active = account.active.toggled();
        let updated = account.clone();
        tracing::debug!(%id, active = updated.is_active(), "toggled account status");

        let view = self.refilter();
        vec![
            ListEvent::Host(HostCommand::SetStatus {
                account: updated.clone(),
            }),
            view,
            ListEvent::Notify(HostEvent::StatusChanged(StatusChanged {
                account_id: updated.id.clone(),
                account_number: updated.account_number.clone(),
                new_status: updated.active,
                account: updated,
            })),
        ]
    }

    fn delete(&mut self, id: &AccountId) -> Vec<ListEvent> {
        let Some(index) = self.accounts.iter().position(|account| &account.id == id) else {
            tracing::debug!(%id, "delete requested for unknown account");
            return Vec::new();
        };
        let removed = self.accounts.remove(index);
        tracing::debug!(%id, "removed account locally");

        let view = self.refilter();
        vec![
            ListEvent::Host(HostCommand::Delete {
                account: removed.clone(),
            }),
            view,
            ListEvent::Notify(HostEvent::AccountDeleted(AccountDeleted {
                account_id: removed.id.clone(),
                account_number: removed.account_number.clone(),
                account: removed,
            })),
        ]
    }

    fn add_from_portal(&mut self, portal: Portal) -> Vec<ListEvent> {
        if self.add_guard.in_flight {
            tracing::debug!("add already in flight; ignoring repeat submission");
            return vec![ListEvent::AddIgnored];
        }
        self.add_guard.in_flight = true;
        self.add_guard.token = self.add_guard.token.wrapping_add(1);
        let account_type = self.active_type;

        let mut events = vec![ListEvent::Host(HostCommand::AddAccount {
            portal: portal.clone(),
            account_type,
        })];
        events.extend(self.close_add_modal());
        events.push(ListEvent::AddGuardArmed {
            token: self.add_guard.token,
        });
        events.push(ListEvent::Notify(HostEvent::AccountAdded(AccountAdded {
            portal,
            account_type,
        })));
        events
    }

    fn close_add_modal(&mut self) -> Vec<ListEvent> {
        self.picker.open = false;
        self.picker.search_term.clear();
        self.picker.filtered = self.picker.available.clone();
        vec![ListEvent::AddModalClosed]
    }
}
