// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use acctlist_app::{AccountType, HostCommand, HostPort};
use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::path::PathBuf;

const NAME_PREFIXES: [&str; 14] = [
    "Stage", "Maverick", "Summit", "Harbor", "Cedar", "Bright", "Heritage", "Eagle", "Northview",
    "Apex", "Willow", "Sparks", "Quality", "Lakeview",
];

const NAME_NOUNS: [&str; 12] = [
    "Dental", "Print", "Signs", "Press", "Graphics", "Realty", "Bakery", "Studio", "Clinic",
    "Outfitters", "Builders", "Church",
];

const NAME_SUFFIXES: [&str; 6] = ["Co", "Group", "LLC", "Partners", "Works", "Inc"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn chance(&mut self, percent: usize) -> bool {
        self.int_n(100) < percent
    }
}

/// Generates host-shaped account and portal records. The same seed always
/// yields the same data.
#[derive(Debug, Clone)]
pub struct AccountFaker {
    rng: DeterministicRng,
    next_number: u32,
}

impl AccountFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_number: 10_000,
        }
    }

    fn pick<'a>(&mut self, values: &[&'a str]) -> &'a str {
        values[self.rng.int_n(values.len())]
    }

    fn company_name(&mut self) -> String {
        format!(
            "{} {} {}",
            self.pick(&NAME_PREFIXES),
            self.pick(&NAME_NOUNS),
            self.pick(&NAME_SUFFIXES)
        )
    }

    fn account_number(&mut self) -> String {
        self.next_number += 1 + self.rng.int_n(400) as u32;
        self.next_number.to_string()
    }

    fn record_id(&mut self) -> String {
        (0..4)
            .map(|_| format!("{:015}", self.rng.next_u64() % 1_000_000_000_000_000))
            .collect()
    }

    pub fn account(&mut self) -> Value {
        let kind = if self.rng.chance(60) {
            AccountType::Individual
        } else {
            AccountType::Group
        };
        let number = self.account_number();
        let name = self.company_name();
        let mut record = json!({
            "__ID": self.record_id(),
            "Name": format!("{name} (PrintSmith Account #{number})"),
            "AccountNumber": number,
            "Type": kind.as_str(),
        });
        match self.rng.int_n(10) {
            0..=6 => record["fActive"] = json!(1),
            7 | 8 => record["fActive"] = Value::Null,
            _ => {}
        }
        record
    }

    pub fn accounts(&mut self, count: usize) -> Vec<Value> {
        (0..count).map(|_| self.account()).collect()
    }

    /// Portals for `accounts`: some already linked by number, some repeating
    /// an earlier name in different case, a few unnamed, the rest new.
    pub fn portals(&mut self, accounts: &[Value], count: usize) -> Vec<Value> {
        let mut portals: Vec<Value> = Vec::with_capacity(count);
        for _ in 0..count {
            let roll = self.rng.int_n(10);
            let portal = if roll < 2 && !accounts.is_empty() {
                let linked = &accounts[self.rng.int_n(accounts.len())];
                json!({
                    "portal": self.company_name(),
                    "number": linked["AccountNumber"].clone(),
                })
            } else if roll < 3 && !portals.is_empty() {
                let earlier = portals[self.rng.int_n(portals.len())]["portal"]
                    .as_str()
                    .map(str::to_uppercase);
                json!({ "portal": earlier, "number": self.account_number() })
            } else if roll < 4 {
                json!({ "portal": Value::Null, "number": self.account_number() })
            } else if roll < 6 {
                json!({ "portal": self.company_name() })
            } else {
                json!({ "portal": self.company_name(), "number": self.account_number() })
            };
            portals.push(portal);
        }
        portals
    }
}

/// Three host-shaped records with real-looking 58-digit ids, tagged with
/// account types.
pub fn sample_accounts() -> Value {
    json!({
        "value": [
            {
                "AccountNumber": "13048",
                "fActive": 1,
                "Name": "Stage Right (PrintSmith Account #13048)",
                "__ID": "3137769144754612060658265193570782713700691245404953606869",
                "Type": "Individual"
            },
            {
                "AccountNumber": "12904",
                "fActive": 1,
                "Name": "Maverick Dental (PrintSmith Account #12904)",
                "__ID": "3756860258697808320929480764878445447101283796073656120541",
                "Type": "Individual"
            },
            {
                "AccountNumber": "23091",
                "fActive": null,
                "Name": "Heroes Never Alone (PrintSmith Account #23091)",
                "__ID": "4194128625797891814911180760974403638161317234239138876634",
                "Type": "Group"
            }
        ]
    })
}

pub fn sample_portals() -> Value {
    json!([
        { "portal": "Stage Right", "number": "13048" },
        { "portal": "Harbor Signs", "number": "4410" },
        { "portal": "harbor signs", "number": "4411" },
        { "portal": "Summit Press" },
        { "portal": null, "number": "9001" }
    ])
}

pub fn demo_payloads(seed: u64) -> (Value, Value) {
    let mut faker = AccountFaker::new(seed);
    let accounts = faker.accounts(40);
    let portals = faker.portals(&accounts, 30);
    (json!({ "value": accounts }), Value::Array(portals))
}

pub fn temp_payload_file(name: &str, contents: &str) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join(name);
    std::fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
    Ok((dir, path))
}

/// Host double that records every delivered command and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub commands: Vec<HostCommand>,
    pub fail: bool,
}

impl HostPort for RecordingHost {
    fn deliver(&mut self, command: &HostCommand) -> Result<()> {
        self.commands.push(command.clone());
        if self.fail {
            bail!("recording host configured to fail");
        }
        Ok(())
    }
}
