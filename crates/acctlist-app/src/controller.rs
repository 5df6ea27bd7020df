// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    AccountType, HostEvent, HostPort, ListCommand, ListEvent, ListSnapshot, ListState,
    LoadRequest, Payload, StatusFilter,
};

pub type EventCallback = Box<dyn FnMut(&HostEvent)>;

/// Owns the list state and routes its side effects: host commands go to the
/// injected port, notifications to the optional callback.
pub struct ListController<H> {
    state: ListState,
    host: H,
    callback: Option<EventCallback>,
}

impl<H: HostPort> ListController<H> {
    pub fn new(host: H) -> Self {
        Self::with_state(ListState::default(), host)
    }

    pub fn with_state(state: ListState, host: H) -> Self {
        Self {
            state,
            host,
            callback: None,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn set_callback(&mut self, callback: impl FnMut(&HostEvent) + 'static) {
        self.callback = Some(Box::new(callback));
    }

    pub fn clear_callback(&mut self) {
        self.callback = None;
    }

    pub fn dispatch(&mut self, command: ListCommand) -> Vec<ListEvent> {
        let events = self.state.dispatch(command);
        for event in &events {
            match event {
                ListEvent::Host(command) => {
                    if let Err(error) = self.host.deliver(command) {
                        tracing::warn!(
                            mode = command.mode().as_str(),
                            "host delivery failed: {error:#}"
                        );
                    }
                }
                ListEvent::Notify(host_event) => match self.callback.as_mut() {
                    Some(callback) => callback(host_event),
                    None => {
                        tracing::debug!(kind = host_event.kind(), "no host callback registered");
                    }
                },
                _ => {}
            }
        }
        events
    }

    pub fn load(
        &mut self,
        accounts: impl Into<Payload>,
        portals: Option<Payload>,
        selected_type: Option<AccountType>,
    ) -> Vec<ListEvent> {
        self.dispatch(ListCommand::Load(LoadRequest {
            accounts: accounts.into(),
            portals,
            selected_type,
        }))
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) -> Vec<ListEvent> {
        self.dispatch(ListCommand::SetStatusFilter(status))
    }

    pub fn clear_search(&mut self) -> Vec<ListEvent> {
        self.dispatch(ListCommand::ClearSearch)
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.state.snapshot()
    }
}
