//! crunchdigest - Main CLI Entry Point

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use crunchdigest::{
    adapters::{FileNavigator, RenderMode, SystemClipboard, TerminalDisplay, TerminalNotifier},
    cli::{Args, Commands, Config, Verbosity},
    doctor::Doctor,
    session::{SessionPorts, SummarySession},
    streaming::HttpSummaryClient,
    telemetry::{TelemetryCollector, TelemetryDisplay},
    SummaryError,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// What a summarize run starts from
enum Target<'a> {
    Url(&'a str),
    Slug(&'a str),
    Resume,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(msg) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), msg);
        std::process::exit(2);
    }

    let mut config = Config::load(args.config.clone())?;
    if let Some(endpoint) = &args.endpoint {
        config.endpoint.base_url = endpoint.clone();
    }
    config.validate()?;

    let verbosity = if args.quiet || args.verbose > 0 {
        args.verbosity()
    } else {
        config.verbosity()
    };
    init_tracing(verbosity);

    if !config.display.color_output {
        colored::control::set_override(false);
    }

    match &args.command {
        Some(Commands::Open { slug }) => run_summary(&args, &config, verbosity, Target::Slug(slug)).await,
        Some(Commands::Resume) => run_summary(&args, &config, verbosity, Target::Resume).await,
        Some(Commands::Share) => share_link(&config, verbosity),
        Some(Commands::Doctor) => run_doctor(&config).await,
        Some(Commands::Config) => show_config(&config),
        None => {
            if let Some(url) = &args.url {
                run_summary(&args, &config, verbosity, Target::Url(url)).await
            } else {
                println!("crunchdigest v{} - TechCrunch summaries", env!("CARGO_PKG_VERSION"));
                println!("\nUsage:");
                println!("  crunchdigest <url>            Summarize an article");
                println!("  crunchdigest open <slug>      Summarize by article path");
                println!("  crunchdigest resume           Summarize the last article again");
                println!("  crunchdigest share            Copy the shareable summary link");
                println!("  crunchdigest doctor           Check endpoint and configuration");
                println!("  crunchdigest config           Show configuration");
                println!("\nExample:");
                println!("  crunchdigest https://techcrunch.com/2023/01/31/google-fi-customer-data-breach");
                println!();
                Ok(())
            }
        }
    }
}

fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_session(config: &Config, verbosity: Verbosity, mode: RenderMode) -> Result<SummarySession> {
    let backend = HttpSummaryClient::with_config(
        &config.endpoint.base_url,
        &config.endpoint.summarize_path,
        config.connect_timeout(),
    )?;

    let ports = SessionPorts::new(
        FileNavigator::new(config.location_file()),
        TerminalNotifier::new(verbosity.show_progress()),
        SystemClipboard::new(),
        TerminalDisplay::new(mode, config.display.show_spinner && verbosity.show_progress()),
    );

    Ok(SummarySession::new(Arc::new(backend), ports, config.session_options()))
}

async fn run_summary(args: &Args, config: &Config, verbosity: Verbosity, target: Target<'_>) -> Result<()> {
    let mode = if args.raw { RenderMode::Raw } else { RenderMode::Bullets };
    let telemetry = TelemetryCollector::new();
    let mut session = build_session(config, verbosity, mode)?.with_telemetry(telemetry.clone());

    let result = match target {
        Target::Url(url) => session.submit(url).await,
        Target::Slug(slug) => {
            let segments: Vec<&str> = slug.trim_matches('/').split('/').collect();
            session.open_slug(&segments).await
        }
        Target::Resume => session.resume().await,
    };

    TelemetryDisplay::new(telemetry, verbosity).display_summary();

    match result {
        Ok(_) => {
            if args.copy {
                if let Err(e) = session.copy_summary() {
                    eprintln!("{} {}", "Warning:".yellow().bold(), e);
                }
            }
            Ok(())
        }
        // Already surfaced through the notifier, or deliberately silent
        Err(SummaryError::InvalidDomain { .. })
        | Err(SummaryError::MalformedSlug(_))
        | Err(SummaryError::RequestFailed { .. })
        | Err(SummaryError::EmptyResponseBody) => std::process::exit(1),
        Err(e) => Err(e.into()),
    }
}

fn share_link(config: &Config, verbosity: Verbosity) -> Result<()> {
    let session = build_session(config, verbosity, RenderMode::Bullets)?;

    match session.copy_share_link() {
        Ok(link) => {
            println!("{}", link);
            Ok(())
        }
        Err(SummaryError::MalformedSlug(_)) => std::process::exit(1),
        Err(e) => {
            // Clipboard unavailable; the link itself is still useful
            eprintln!("{} {}", "Warning:".yellow().bold(), e);
            println!("{}", session.share_link()?);
            Ok(())
        }
    }
}

async fn run_doctor(config: &Config) -> Result<()> {
    let doctor = Doctor::new(config.clone());
    let checks = doctor.run_diagnostics().await;
    Doctor::display_results(&checks);

    if !Doctor::overall_status(&checks) {
        std::process::exit(2);
    }
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    let rendered = toml::to_string_pretty(config)?;
    println!("{}", rendered);
    println!("{} {}", "Location file:".dimmed(), config.location_file().display());
    Ok(())
}
