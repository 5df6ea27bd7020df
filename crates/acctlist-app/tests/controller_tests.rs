// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use acctlist_app::{
    AccountId, AccountType, ActiveFlag, HostCommand, ListCommand, ListController, ListEvent,
    Payload, StatusFilter,
};
use acctlist_testkit::{RecordingHost, demo_payloads, sample_accounts, sample_portals};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn loaded_controller() -> ListController<RecordingHost> {
    let mut controller = ListController::new(RecordingHost::default());
    controller.load(
        sample_accounts(),
        Some(Payload::Json(sample_portals())),
        None,
    );
    controller
}

#[test]
fn json_text_payloads_load_like_native_values() {
    let mut from_text = ListController::new(RecordingHost::default());
    from_text.load(
        sample_accounts().to_string(),
        Some(Payload::from(sample_portals().to_string())),
        Some(AccountType::Group),
    );
    let mut from_value = ListController::new(RecordingHost::default());
    from_value.load(
        sample_accounts(),
        Some(Payload::Json(sample_portals())),
        Some(AccountType::Group),
    );
    assert_eq!(from_text.snapshot(), from_value.snapshot());
    assert_eq!(from_text.state().active_type(), AccountType::Group);
}

#[test]
fn malformed_account_text_does_not_raise() {
    let mut controller = loaded_controller();
    let events = controller.load("{\"value\": [", None, None);
    assert!(events.contains(&ListEvent::Loaded {
        accounts: 0,
        portals: 0
    }));
    assert!(controller.snapshot().accounts.is_empty());
}

#[test]
fn toggle_round_trips_between_one_and_null() {
    let mut controller = ListController::new(RecordingHost::default());
    controller.load(
        json!([{"__ID": "5", "Name": "Five", "AccountNumber": "500", "fActive": 1, "Type": "Individual"}]),
        None,
        None,
    );

    controller.dispatch(ListCommand::ToggleStatus(AccountId::new("5")));
    let encoded = serde_json::to_value(&controller.snapshot().accounts[0]).expect("encode");
    assert_eq!(encoded["__ID"], json!("5"));
    assert!(encoded["fActive"].is_null());

    controller.set_status_filter(StatusFilter::Active);
    assert!(controller.state().filtered().is_empty());
    controller.set_status_filter(StatusFilter::Inactive);
    assert_eq!(controller.state().filtered().len(), 1);

    controller.dispatch(ListCommand::ToggleStatus(AccountId::new("5")));
    let encoded = serde_json::to_value(&controller.snapshot().accounts[0]).expect("encode");
    assert_eq!(encoded["fActive"], json!(1));

    let modes = controller
        .host()
        .commands
        .iter()
        .map(|command| command.mode().as_str())
        .collect::<Vec<_>>();
    assert_eq!(modes, vec!["status", "status"]);
}

#[test]
fn delete_reaches_host_before_record_disappears_from_views() {
    let mut controller = loaded_controller();
    let id = AccountId::new("3137769144754612060658265193570782713700691245404953606869");
    controller.dispatch(ListCommand::Delete(id.clone()));

    let [HostCommand::Delete { account }] = controller.host().commands.as_slice() else {
        panic!("expected a single delete command");
    };
    assert_eq!(account.id, id);
    assert_eq!(account.active, ActiveFlag::Active);

    let snapshot = controller.snapshot();
    assert!(snapshot.accounts.iter().all(|account| account.id != id));
    assert!(snapshot.individual_accounts.iter().all(|account| account.id != id));
    assert!(snapshot.filtered_accounts.iter().all(|account| account.id != id));
    assert_eq!(snapshot.stats.total, 2);
}

#[test]
fn add_from_portal_sends_active_type_and_keeps_local_state() {
    let mut controller = loaded_controller();
    controller.dispatch(ListCommand::SelectType(AccountType::Group));
    controller.dispatch(ListCommand::OpenAddModal);

    let available = controller
        .state()
        .picker()
        .available
        .iter()
        .map(|portal| portal.display_name().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(available, vec!["Harbor Signs", "Summit Press"]);

    let portal = controller.state().picker().filtered[1].clone();
    controller.dispatch(ListCommand::AddFromPortal(portal));

    let [
        HostCommand::AddAccount {
            portal,
            account_type,
        },
    ] = controller.host().commands.as_slice()
    else {
        panic!("expected a single add command");
    };
    assert_eq!(portal.display_name(), "Summit Press");
    assert_eq!(*account_type, AccountType::Group);
    assert_eq!(controller.snapshot().accounts.len(), 3);
    assert!(!controller.state().picker().open);
}

#[test]
fn rapid_repeat_adds_are_dropped_while_guard_is_armed() {
    let added = Rc::new(RefCell::new(0_usize));
    let counter = Rc::clone(&added);

    let mut controller = loaded_controller();
    controller.set_callback(move |event| {
        if event.kind() == "accountAdded" {
            *counter.borrow_mut() += 1;
        }
    });
    controller.dispatch(ListCommand::OpenAddModal);
    let portal = controller.state().picker().filtered[0].clone();

    for _ in 0..5 {
        controller.dispatch(ListCommand::AddFromPortal(portal.clone()));
    }
    assert_eq!(controller.host().commands.len(), 1);
    assert_eq!(*added.borrow(), 1);

    let token = controller.state().add_guard().token;
    controller.dispatch(ListCommand::ReleaseAddGuard { token });
    controller.dispatch(ListCommand::AddFromPortal(portal));
    assert_eq!(controller.host().commands.len(), 2);
    assert_eq!(*added.borrow(), 2);
}

#[test]
fn failing_host_still_applies_optimistic_updates() {
    let mut controller = ListController::new(RecordingHost {
        fail: true,
        ..RecordingHost::default()
    });
    controller.load(sample_accounts(), None, None);
    controller.dispatch(ListCommand::ToggleStatus(AccountId::new(
        "3756860258697808320929480764878445447101283796073656120541",
    )));
    assert_eq!(controller.host().commands.len(), 1);
    assert_eq!(controller.snapshot().stats.active, 1);
}

#[test]
fn generated_demo_data_partitions_cleanly() {
    let (accounts, portals) = demo_payloads(11);
    let mut controller = ListController::new(RecordingHost::default());
    controller.load(accounts, Some(Payload::Json(portals)), None);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.accounts.len(), 40);
    assert_eq!(
        snapshot.individual_accounts.len() + snapshot.group_accounts.len(),
        40
    );

    controller.dispatch(ListCommand::OpenAddModal);
    let picker = controller.state().picker();
    let numbers = snapshot
        .accounts
        .iter()
        .map(|account| account.account_number.as_str())
        .collect::<Vec<_>>();
    assert!(picker.available.iter().all(|portal| {
        portal
            .number
            .as_deref()
            .is_none_or(|number| !numbers.contains(&number))
    }));
}
