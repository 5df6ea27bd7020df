// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use acctlist_app::{LoadRequest, Payload};
use acctlist_tui::DataSource;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Where account and portal payloads come from. Files are re-read on every
/// load so a reload picks up whatever the host wrote since.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    Files {
        accounts: PathBuf,
        portals: Option<PathBuf>,
    },
    Demo {
        seed: u64,
    },
}

impl PayloadSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Files { accounts, .. } => accounts.display().to_string(),
            Self::Demo { seed } => format!("demo data (seed {seed})"),
        }
    }
}

fn read_payload(path: &Path) -> Result<Payload> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read payload file {}", path.display()))?;
    Ok(Payload::Text(raw))
}

impl DataSource for PayloadSource {
    fn load(&mut self) -> Result<LoadRequest> {
        match self {
            Self::Files { accounts, portals } => {
                let mut request = LoadRequest::new(read_payload(accounts)?);
                if let Some(portals) = portals {
                    request = request.with_portals(read_payload(portals)?);
                }
                tracing::debug!(accounts = %accounts.display(), "read payload files");
                Ok(request)
            }
            Self::Demo { seed } => {
                let (accounts, portals) = acctlist_testkit::demo_payloads(*seed);
                Ok(LoadRequest::new(accounts).with_portals(portals))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PayloadSource;
    use acctlist_app::{ListCommand, ListState, Payload};
    use acctlist_tui::DataSource;
    use anyhow::Result;
    use std::path::PathBuf;

    #[test]
    fn file_source_reads_text_payloads() -> Result<()> {
        let (_accounts_dir, accounts) = acctlist_testkit::temp_payload_file(
            "accounts.json",
            r#"{"value": [{"__ID": "1", "Name": "Stage Right", "AccountNumber": "13048", "fActive": 1, "Type": "Individual"}]}"#,
        )?;
        let (_portals_dir, portals) = acctlist_testkit::temp_payload_file(
            "portals.json",
            r#"[{"portal": "Harbor Signs", "number": "4410"}]"#,
        )?;

        let mut source = PayloadSource::Files {
            accounts,
            portals: Some(portals),
        };
        let request = source.load()?;
        assert!(matches!(request.accounts, Payload::Text(_)));
        assert!(matches!(request.portals, Some(Payload::Text(_))));

        let mut state = ListState::default();
        state.dispatch(ListCommand::Load(request));
        assert_eq!(state.accounts().len(), 1);
        assert_eq!(state.portals().len(), 1);
        Ok(())
    }

    #[test]
    fn missing_portal_file_is_optional() -> Result<()> {
        let (_dir, accounts) = acctlist_testkit::temp_payload_file("accounts.json", "[]")?;
        let mut source = PayloadSource::Files {
            accounts,
            portals: None,
        };
        assert!(source.load()?.portals.is_none());
        Ok(())
    }

    #[test]
    fn unreadable_account_file_names_the_path() {
        let mut source = PayloadSource::Files {
            accounts: PathBuf::from("/nonexistent/acctlist/accounts.json"),
            portals: None,
        };
        let error = source.load().expect_err("missing file should fail");
        assert!(error.to_string().contains("/nonexistent/acctlist/accounts.json"));
    }

    #[test]
    fn demo_source_is_deterministic() -> Result<()> {
        let mut left = PayloadSource::Demo { seed: 9 };
        let mut right = PayloadSource::Demo { seed: 9 };
        let mut left_state = ListState::default();
        let mut right_state = ListState::default();
        left_state.dispatch(ListCommand::Load(left.load()?));
        right_state.dispatch(ListCommand::Load(right.load()?));
        assert_eq!(left_state.snapshot(), right_state.snapshot());
        assert_eq!(left_state.accounts().len(), 40);
        Ok(())
    }
}
