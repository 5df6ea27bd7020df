// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use acctlist_app::{AccountType, ListCommand, ListController, ListState};
use acctlist_bridge::{Bridge, HttpInvoker, SystemOpener};
use acctlist_tui::{DataSource, UiOptions};
use anyhow::{Context, Result, anyhow};
use config::Config;
use runtime::PayloadSource;
use std::env;
use std::path::PathBuf;

const DEMO_SEED: u64 = 2026;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `acctlist --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let _log_guard = logging::init(&config)?;

    let mut source = payload_source(&options)?;
    let bridge = build_bridge(&config).with_context(|| {
        format!(
            "invalid [host] config in {}; fix endpoint/timeout values",
            options.config_path.display()
        )
    })?;

    let active_type = match options.account_type {
        Some(kind) => kind,
        None => config.default_type()?,
    };
    let state = ListState::with_selection(active_type, config.default_filter()?);
    let mut controller = ListController::with_state(state, bridge);
    controller.set_callback(|event| match event.payload() {
        Ok(payload) => tracing::info!(kind = event.kind(), %payload, "host event"),
        Err(error) => tracing::warn!(kind = event.kind(), "encode host event: {error}"),
    });

    let request = source
        .load()
        .with_context(|| format!("load payloads from {}", source.describe()))?;
    controller.dispatch(ListCommand::Load(request));

    if options.check_only {
        return Ok(());
    }

    if options.dump {
        let snapshot = serde_json::to_string_pretty(&controller.snapshot())
            .context("encode list snapshot")?;
        println!("{snapshot}");
        return Ok(());
    }

    let ui_options = UiOptions {
        add_guard_delay: config.add_guard_delay()?,
        ..UiOptions::default()
    };
    acctlist_tui::run_app(&mut controller, &mut source, ui_options)
}

fn build_bridge(config: &Config) -> Result<Bridge> {
    let bridge = Bridge::new(
        config.script_name(),
        config.fallback_target(),
        Box::new(SystemOpener),
    );
    match config.endpoint() {
        Some(endpoint) => {
            let invoker = HttpInvoker::new(endpoint, config.host_timeout()?)?;
            tracing::info!(endpoint = %invoker.endpoint(), "calling host scripts over HTTP");
            Ok(bridge.with_invoker(Box::new(invoker)))
        }
        None => Ok(bridge),
    }
}

fn payload_source(options: &CliOptions) -> Result<PayloadSource> {
    if options.demo {
        return Ok(PayloadSource::Demo { seed: DEMO_SEED });
    }
    let accounts = options.accounts_path.clone().ok_or_else(|| {
        anyhow!("no account payload; pass --accounts <path> or run with --demo")
    })?;
    Ok(PayloadSource::Files {
        accounts,
        portals: options.portals_path.clone(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    accounts_path: Option<PathBuf>,
    portals_path: Option<PathBuf>,
    account_type: Option<AccountType>,
    print_config_path: bool,
    demo: bool,
    dump: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        accounts_path: None,
        portals_path: None,
        account_type: None,
        print_config_path: false,
        demo: false,
        dump: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--accounts" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--accounts requires a file path"))?;
                options.accounts_path = Some(PathBuf::from(value.as_ref()));
            }
            "--portals" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--portals requires a file path"))?;
                options.portals_path = Some(PathBuf::from(value.as_ref()));
            }
            "--type" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--type requires Individual or Group"))?;
                let kind = AccountType::parse(value.as_ref()).ok_or_else(|| {
                    anyhow!(
                        "--type {:?} is not one of: Individual, Group",
                        value.as_ref()
                    )
                })?;
                options.account_type = Some(kind);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--dump" => {
                options.dump = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("acctlist");
    println!("  --config <path>          Use a specific config path");
    println!("  --accounts <path>        Account payload (JSON array or {{\"value\": [...]}})");
    println!("  --portals <path>         Portal payload (JSON array or {{\"value\": [...]}})");
    println!("  --type <Individual|Group>  Start on this account type");
    println!("  --demo                   Launch with generated demo data");
    println!("  --dump                   Print the loaded list snapshot as JSON and exit");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config, host settings, and payloads");
    println!("  --help                   Show this help");
}
