use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

mod cli;

use cli::Cli;
use cli::commands::{Commands, DisplayArgs, WatchArgs};
use lanescroll::admission::AdmissionScheduler;
use lanescroll::config::Config;
use lanescroll::intake::IntakeQueue;
use lanescroll::render::TerminalStage;
use lanescroll::source::SourceTailer;
use lanescroll::tui::{self, HeadlessRunner, TuiRunner};

/// Stage width used when no terminal is attached.
const HEADLESS_WIDTH: u16 = 120;

fn setup_logging(default_level: &str) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lanescroll")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("lanescroll.log");

    // The terminal belongs to the display, so logs go to a file
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Fold command-line overrides into the loaded config.
fn apply_display_args(config: &mut Config, args: &DisplayArgs) {
    if let Some(lanes) = args.lanes {
        config.lanes.count = lanes;
    }
    if let Some(speed) = args.speed {
        config.scheduler.speed = speed;
    }
}

fn apply_watch_args(config: &mut Config, args: &WatchArgs) {
    if let Some(dir) = &args.log_dir {
        config.source.dir = dir.clone();
    }
    if let Some(pattern) = &args.pattern {
        config.source.pattern = pattern.clone();
    }
    if args.replay_existing {
        config.source.replay_existing = true;
    }
    apply_display_args(config, &args.display);
}

fn print_banner(title: &str, config: &Config, source_line: &str) {
    println!("{}", format!("=== {} ===", title).cyan().bold());
    println!("{} {}", "Source:".green(), source_line);
    println!("{} {} lanes", "Display:".green(), config.lanes.count);
    println!("{}", "Format: Message text only".dimmed());
    println!("\nPress {} to exit\n", "ESC".yellow());
}

async fn run_display(
    scheduler: AdmissionScheduler,
    config: &Config,
    headless: bool,
    exit_when_idle: bool,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    if headless {
        let runner = HeadlessRunner::new(scheduler, HEADLESS_WIDTH).exit_when_idle(exit_when_idle);
        let totals = runner.run(shutdown).await?;
        println!(
            "{} {} received, {} shown",
            "Done:".green(),
            totals.total_received,
            totals.total_retired
        );
        return Ok(());
    }

    let terminal = tui::init_terminal().context("Failed to initialize terminal")?;
    let view = TerminalStage::new(config.lanes.layout());
    let result = match TuiRunner::new(terminal, scheduler, view) {
        Ok(mut runner) => runner.run(shutdown).await,
        Err(e) => Err(e),
    };
    tui::restore_terminal().context("Failed to restore terminal")?;
    result
}

async fn handle_watch_command(args: &WatchArgs, mut config: Config) -> Result<()> {
    apply_watch_args(&mut config, args);
    config.validate().context("Invalid configuration")?;

    print_banner(
        "CSV Chat Display Client",
        &config,
        &config.source.dir.join(&config.source.pattern).display().to_string(),
    );

    let intake = IntakeQueue::new();
    let scheduler = AdmissionScheduler::new(config.lanes.count, intake.clone(), config.scheduler.tick_config());
    let tailer = SourceTailer::new(config.source.tailer_config(), intake);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);
    let tailer_handle = tokio::spawn(tailer.run(shutdown_rx.clone()));
    spawn_ctrl_c(shutdown_tx.clone(), args.display.headless);

    let result = run_display(scheduler, &config, args.display.headless, false, shutdown_rx).await;

    shutdown_tx.send_replace(true);
    if let Err(e) = tailer_handle.await {
        log::warn!("File monitor task ended abnormally: {}", e);
    }
    result
}

async fn handle_demo_command(args: &DisplayArgs, mut config: Config) -> Result<()> {
    apply_display_args(&mut config, args);
    config.validate().context("Invalid configuration")?;

    print_banner("Lane Demo", &config, "built-in messages");

    let intake = IntakeQueue::new();
    lanescroll::demo::load(&intake);
    let scheduler = AdmissionScheduler::new(config.lanes.count, intake, config.scheduler.tick_config());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);
    spawn_ctrl_c(shutdown_tx.clone(), args.headless);

    let result = run_display(scheduler, &config, args.headless, args.headless, shutdown_rx).await;
    shutdown_tx.send_replace(true);
    result
}

/// In headless mode Ctrl-C arrives as a signal rather than a key press.
fn spawn_ctrl_c(shutdown: Arc<watch::Sender<bool>>, headless: bool) {
    if !headless {
        return;
    }
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, shutting down");
            shutdown.send_replace(true);
        }
    });
}

async fn run_application(cli: &Cli, config: Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => handle_watch_command(&WatchArgs::default(), config).await,
        Some(Commands::Watch(args)) => handle_watch_command(args, config).await,
        Some(Commands::Demo(args)) => handle_demo_command(args, config).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging
    let default_level = if cli.is_verbose() {
        "debug".to_string()
    } else {
        config.log_level.clone().unwrap_or_else(|| "info".to_string())
    };
    setup_logging(&default_level).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, config).await.context("Application failed")?;

    Ok(())
}
