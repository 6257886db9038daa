// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use ledgerdesk_app::{AppState, FallbackPolicy, ScreenKind, screens};
use ledgerdesk_tui::ViewRuntime;
use runtime::ApiRuntime;
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

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
            "load config {}; run `ledgerdesk --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    let policy = config.fallback_policy()?;
    let start_screen = config.start_screen()?;

    let mut runtime = if options.offline {
        ApiRuntime::offline()
    } else {
        let client = config.build_client().with_context(|| {
            format!(
                "invalid [api] config in {}; fix base_url/timeout/paths or set LEDGERDESK_API_URL",
                options.config_path.display()
            )
        })?;
        ApiRuntime::new(client)
    };
    if options.check_only {
        return Ok(());
    }

    let _log_guard = init_logging(&config)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api_base_url(),
        offline = options.offline,
        fallback = policy.as_str(),
        "ledgerdesk starting"
    );

    if let Some(screen) = options.dump {
        println!("{}", dump_screen(&mut runtime, screen, policy));
        return Ok(());
    }

    let mut state = AppState::starting_on(start_screen);
    ledgerdesk_tui::run_app(&mut state, &mut runtime, policy)
}

/// Installs a file subscriber; the returned guard flushes on drop.
fn init_logging(config: &Config) -> Result<WorkerGuard> {
    let path = config.log_file()?;
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log file {} has no file name", path.display()))?;
    fs::create_dir_all(&directory)
        .with_context(|| format!("create log directory {}", directory.display()))?;

    let filter = log_filter(config)?;
    let appender = tracing_appender::rolling::never(&directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .context("install log subscriber")?;
    Ok(guard)
}

/// `LEDGERDESK_LOG` overrides `[log].level` unless it is blank.
fn log_filter(config: &Config) -> Result<EnvFilter> {
    match env::var("LEDGERDESK_LOG") {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(&directive)
            .with_context(|| format!("invalid LEDGERDESK_LOG filter {directive:?}")),
        _ => EnvFilter::try_new(config.log_level())
            .with_context(|| format!("invalid log.level {:?}", config.log_level())),
    }
}

fn dump_screen(
    runtime: &mut impl ViewRuntime,
    screen: ScreenKind,
    policy: FallbackPolicy,
) -> String {
    let mut view = screens::open(screen);
    view.apply_outcome(runtime.fetch_screen(screen), policy);
    ledgerdesk_tui::dump_screen_text(view.as_ref())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    offline: bool,
    check_only: bool,
    dump: Option<ScreenKind>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        offline: false,
        check_only: false,
        dump: None,
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
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--offline" => {
                options.offline = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--dump" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--dump requires a screen name"))?;
                let screen = ScreenKind::parse(value.as_ref()).ok_or_else(|| {
                    anyhow!(
                        "unknown screen {:?} for --dump; expected one of: {}",
                        value.as_ref(),
                        ScreenKind::ALL
                            .iter()
                            .map(|screen| screen.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    )
                })?;
                options.dump = Some(screen);
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
    println!("ledgerdesk");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --offline                Never contact the API; show sample data");
    println!("  --check                  Validate config and API client settings");
    println!("  --dump <screen>          Print one screen as text instead of starting the UI");
    println!("  --help                   Show this help");
}
