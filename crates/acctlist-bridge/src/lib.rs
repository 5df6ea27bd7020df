// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use acctlist_app::{HostCommand, HostPort};
use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde::Serialize;
use serde_json::{Map, Value};
use std::process::Command;
use std::time::Duration;
use url::Url;

pub const DEFAULT_URL_SCHEME: &str = "fmp";

/// Serializes a command the way the host script expects it: the record's own
/// fields plus a `mode` tag (and `Type` for additions).
pub fn encode_parameter(command: &HostCommand) -> Result<String> {
    let mut fields = match command {
        HostCommand::SetStatus { account } | HostCommand::Delete { account } => {
            record_fields(account)?
        }
        HostCommand::AddAccount {
            portal,
            account_type,
        } => {
            let mut fields = record_fields(portal)?;
            fields.insert(
                "Type".to_owned(),
                Value::String(account_type.as_str().to_owned()),
            );
            fields
        }
    };
    fields.insert(
        "mode".to_owned(),
        Value::String(command.mode().as_str().to_owned()),
    );
    serde_json::to_string(&Value::Object(fields)).context("encode script parameter")
}

fn record_fields<T: Serialize>(record: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(record).context("encode host record")? {
        Value::Object(fields) => Ok(fields),
        other => bail!("host record must encode as an object, got {other}"),
    }
}

/// Builds `<scheme>://$/<file>?script=<script>&param=<parameter>` with each
/// component percent-encoded.
pub fn fallback_url(scheme: &str, file: &str, script: &str, parameter: &str) -> Result<Url> {
    if scheme.trim().is_empty() {
        bail!("host.url_scheme must not be empty");
    }
    let raw = format!(
        "{scheme}://$/{}?script={}&param={}",
        urlencoding::encode(file),
        urlencoding::encode(script),
        urlencoding::encode(parameter),
    );
    Url::parse(&raw).with_context(|| format!("build script URL for {script:?}"))
}

pub trait ScriptInvoker {
    fn perform_script(&mut self, script: &str, parameter: &str) -> Result<()>;
}

pub trait UrlNavigator {
    fn navigate(&mut self, url: &Url) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct ScriptRequest<'a> {
    script: &'a str,
    parameter: &'a str,
}

/// Direct invocation against a host endpoint that accepts
/// `{"script": ..., "parameter": ...}` as JSON.
#[derive(Debug, Clone)]
pub struct HttpInvoker {
    endpoint: Url,
    timeout: Duration,
    http: HttpClient,
}

impl HttpInvoker {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            bail!("host.endpoint must not be empty");
        }
        let endpoint =
            Url::parse(endpoint).with_context(|| format!("parse host endpoint {endpoint:?}"))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            bail!(
                "host.endpoint {endpoint} must use http or https; leave it unset to use the {DEFAULT_URL_SCHEME}:// fallback"
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            endpoint,
            timeout,
            http,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ScriptInvoker for HttpInvoker {
    fn perform_script(&mut self, script: &str, parameter: &str) -> Result<()> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&ScriptRequest { script, parameter })
            .send()
            .map_err(|error| {
                anyhow!(
                    "cannot reach host at {} ({error}); check [host].endpoint and that the host is running",
                    self.endpoint
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(host_error_response(status, &body));
        }
        Ok(())
    }
}

fn host_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        anyhow!("host rejected script call: {status}")
    } else {
        anyhow!("host rejected script call: {status}: {trimmed}")
    }
}

/// Hands URLs to the desktop's registered scheme handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl UrlNavigator for SystemOpener {
    fn navigate(&mut self, url: &Url) -> Result<()> {
        let mut command = if cfg!(target_os = "macos") {
            Command::new("open")
        } else if cfg!(target_os = "windows") {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]);
            command
        } else {
            Command::new("xdg-open")
        };
        let status = command
            .arg(url.as_str())
            .status()
            .with_context(|| format!("launch URL handler for {}", url.scheme()))?;
        if !status.success() {
            bail!("URL handler for {} exited with {status}", url.scheme());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackTarget {
    pub scheme: String,
    pub file: Option<String>,
}

impl Default for FallbackTarget {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_URL_SCHEME.to_owned(),
            file: None,
        }
    }
}

/// The single adapter between typed host commands and the transport. A
/// configured invoker wins; otherwise the call goes out as a script URL.
pub struct Bridge {
    script_name: String,
    fallback: FallbackTarget,
    invoker: Option<Box<dyn ScriptInvoker>>,
    navigator: Box<dyn UrlNavigator>,
}

impl Bridge {
    pub fn new(
        script_name: impl Into<String>,
        fallback: FallbackTarget,
        navigator: Box<dyn UrlNavigator>,
    ) -> Self {
        Self {
            script_name: script_name.into(),
            fallback,
            invoker: None,
            navigator,
        }
    }

    pub fn with_invoker(mut self, invoker: Box<dyn ScriptInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    pub fn has_invoker(&self) -> bool {
        self.invoker.is_some()
    }

    pub fn call_script(&mut self, parameter: &str) -> Result<()> {
        if let Some(invoker) = self.invoker.as_mut() {
            tracing::debug!(script = %self.script_name, "calling host script directly");
            return invoker
                .perform_script(&self.script_name, parameter)
                .with_context(|| format!("perform script {:?}", self.script_name));
        }

        let file = self.fallback.file.as_deref().unwrap_or(&self.script_name);
        let url = fallback_url(&self.fallback.scheme, file, &self.script_name, parameter)?;
        tracing::debug!(script = %self.script_name, "calling host script via URL scheme");
        self.navigator
            .navigate(&url)
            .with_context(|| format!("open script URL for {:?}", self.script_name))
    }
}

impl HostPort for Bridge {
    fn deliver(&mut self, command: &HostCommand) -> Result<()> {
        let parameter = encode_parameter(command)?;
        self.call_script(&parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::{encode_parameter, fallback_url, host_error_response};
    use acctlist_app::{Account, AccountId, AccountType, ActiveFlag, HostCommand, Portal};
    use reqwest::StatusCode;
    use serde_json::{Map, Value, json};

    fn account(active: ActiveFlag) -> Account {
        let mut extra = Map::new();
        extra.insert("Region".to_owned(), json!("West"));
        Account {
            id: AccountId::new("5"),
            name: "Stage Right".to_owned(),
            account_number: "13048".to_owned(),
            active,
            kind: Some("Individual".to_owned()),
            extra,
            received: Map::new(),
        }
    }

    fn decode(raw: &str) -> Value {
        serde_json::from_str(raw).expect("parameter is JSON")
    }

    #[test]
    fn status_parameter_carries_full_record_and_mode() {
        let raw = encode_parameter(&HostCommand::SetStatus {
            account: account(ActiveFlag::Inactive),
        })
        .expect("encode");
        let parameter = decode(&raw);
        assert_eq!(parameter["mode"], json!("status"));
        assert_eq!(parameter["__ID"], json!("5"));
        assert_eq!(parameter["AccountNumber"], json!("13048"));
        assert!(parameter["fActive"].is_null());
        assert_eq!(parameter["Region"], json!("West"));
    }

    #[test]
    fn delete_parameter_keeps_active_flag() {
        let raw = encode_parameter(&HostCommand::Delete {
            account: account(ActiveFlag::Active),
        })
        .expect("encode");
        let parameter = decode(&raw);
        assert_eq!(parameter["mode"], json!("delete"));
        assert_eq!(parameter["fActive"], json!(1));
    }

    #[test]
    fn delete_sends_odd_record_back_unchanged() {
        let account: Account = serde_json::from_value(json!({
            "__ID": "9", "Name": null, "AccountNumber": "77", "fActive": 0, "Type": ""
        }))
        .expect("decode");
        let raw = encode_parameter(&HostCommand::Delete { account }).expect("encode");
        assert_eq!(
            decode(&raw),
            json!({
                "__ID": "9",
                "Name": null,
                "AccountNumber": "77",
                "fActive": 0,
                "Type": "",
                "mode": "delete"
            })
        );
    }

    #[test]
    fn add_parameter_carries_portal_and_active_type() {
        let raw = encode_parameter(&HostCommand::AddAccount {
            portal: Portal {
                name: Some("Harbor Signs".to_owned()),
                number: Some("4410".to_owned()),
                extra: Map::new(),
                received: Map::new(),
            },
            account_type: AccountType::Group,
        })
        .expect("encode");
        let parameter = decode(&raw);
        assert_eq!(parameter["mode"], json!("addAccount"));
        assert_eq!(parameter["portal"], json!("Harbor Signs"));
        assert_eq!(parameter["number"], json!("4410"));
        assert_eq!(parameter["Type"], json!("Group"));
    }

    #[test]
    fn fallback_url_percent_encodes_components() {
        let url = fallback_url(
            "fmp",
            "Accounts",
            "Manage: Accounts",
            r#"{"mode":"delete"}"#,
        )
        .expect("url");
        let rendered = url.as_str();
        assert!(rendered.starts_with("fmp://$/Accounts?"), "got {rendered}");
        assert!(rendered.contains("script=Manage%3A%20Accounts"), "got {rendered}");
        assert!(
            rendered.contains("param=%7B%22mode%22%3A%22delete%22%7D"),
            "got {rendered}"
        );
    }

    #[test]
    fn fallback_url_rejects_empty_scheme() {
        let error = fallback_url(" ", "f", "s", "{}").expect_err("empty scheme should fail");
        assert!(error.to_string().contains("url_scheme"));
    }

    #[test]
    fn host_error_includes_body_when_present() {
        let error = host_error_response(StatusCode::BAD_REQUEST, " unknown script ");
        assert_eq!(
            error.to_string(),
            "host rejected script call: 400 Bad Request: unknown script"
        );
        let bare = host_error_response(StatusCode::BAD_GATEWAY, "");
        assert_eq!(bare.to_string(), "host rejected script call: 502 Bad Gateway");
    }
}
