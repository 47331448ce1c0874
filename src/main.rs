use chrono::Local;
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

use kondate::calendar::IcsRenderer;
use kondate::config::Config;
use kondate::domain::TargetMonth;
use kondate::runner::{CalendarOutput, MonthReport, MonthlyRun};
use kondate::source;
use kondate::storage::{JsonStateStore, StateStore};

mod cli;

use cli::Cli;
use cli::commands::{Commands, StateCommands, TargetArgs};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kondate")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("kondate.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Generate {
            target,
            output,
            dry_run,
        } => handle_generate_command(target, output.as_ref(), *dry_run, config).await,
        Commands::Preview { target } => handle_generate_command(target, None, true, config).await,
        Commands::State { command } => handle_state_command(command, config),
        Commands::Check => handle_check_command(config),
    }
}

fn resolve_month(target: &TargetArgs) -> Result<TargetMonth> {
    let month = match (target.year, target.month) {
        (Some(year), Some(month)) => TargetMonth::new(year, month)?,
        (None, Some(month)) => {
            // Bare month: the next occurrence of it, counting the current month as past
            let today = Local::now().date_naive();
            let upcoming = TargetMonth::following(today)?;
            let year = if month < upcoming.month() {
                upcoming.year() + 1
            } else {
                upcoming.year()
            };
            TargetMonth::new(year, month)?
        }
        _ => TargetMonth::following(Local::now().date_naive())?,
    };
    Ok(month)
}

async fn handle_generate_command(
    target: &TargetArgs,
    output: Option<&PathBuf>,
    dry_run: bool,
    config: &Config,
) -> Result<()> {
    let scheduler = config.rotation.scheduler().context("Invalid rotation config")?;
    let month = resolve_month(target)?;
    info!("Generating {} (dry run: {})", month, dry_run);

    let store = JsonStateStore::new(&config.storage.state_file);
    let item_source = source::from_config(&config.source, target.items.as_ref())
        .context("Failed to set up item source")?;

    let calendar_output = CalendarOutput {
        renderer: IcsRenderer::from_config(&config.calendar)?,
        dir: output.cloned().unwrap_or_else(|| config.calendar.output_dir.clone()),
    };

    let report = MonthlyRun::new(&store, &scheduler)
        .with_output(calendar_output)
        .dry_run(dry_run)
        .execute(item_source.as_ref(), month)
        .await
        .with_context(|| format!("Failed to generate {}; state left unchanged", month))?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &MonthReport) {
    let schedule = &report.schedule;
    println!("{} {}", "Menu for".green(), schedule.month.to_string().bold());

    if report.is_discontinuous()
        && let Some(prev) = report.previous_month
    {
        println!(
            "{} previous run generated {}, continuing rotation from there",
            "Note:".yellow(),
            prev
        );
    }

    for day in &schedule.days {
        println!(
            "  {} {}  {:<12} {}",
            day.date.format("%Y-%m-%d"),
            day.date.format("%a"),
            day.category.dimmed(),
            day.item_name()
        );
    }

    if schedule.forced_repeats > 0 {
        println!(
            "{} {} day(s) repeat a recent item (category too small)",
            "Warning:".yellow(),
            schedule.forced_repeats
        );
    }

    match &report.calendar_path {
        Some(path) => println!("{} {}", "Calendar:".green(), path.display()),
        None if !report.persisted => println!("{}", "Dry run: nothing written".cyan()),
        None => {}
    }
}

fn handle_state_command(command: &StateCommands, config: &Config) -> Result<()> {
    info!("Handling state command: {:?}", command);
    let store = JsonStateStore::new(&config.storage.state_file);

    match command {
        StateCommands::Show => {
            let state = store.load().context("Failed to load state")?;
            println!("{} {}", "State file:".green(), store.path().display());
            if state.is_first_run() {
                println!("  (empty - next run starts fresh)");
                return Ok(());
            }
            if let Some(month) = state.last_month {
                println!("  Last month: {}", month);
            }
            if let Some(updated) = state.updated_at {
                println!("  Updated:    {}", updated.to_rfc3339());
            }
            println!("  Positions:");
            for (category, position) in &state.positions {
                println!("    {:<16} {}", category, position);
            }
            println!("  Recent (oldest first):");
            for name in &state.recent {
                println!("    {}", name);
            }
        }
        StateCommands::Reset { force } => {
            if !*force {
                println!(
                    "{} would remove {} (pass --force)",
                    "Reset:".yellow(),
                    store.path().display()
                );
                return Ok(());
            }
            if store.reset().context("Failed to reset state")? {
                println!("{} {}", "Removed:".red(), store.path().display());
            } else {
                println!("No state file at {}", store.path().display());
            }
        }
    }
    Ok(())
}

fn handle_check_command(config: &Config) -> Result<()> {
    config.validate()?;
    let rule = config.rotation.rule()?;

    println!("{}", "Configuration OK".green());
    for (index, day) in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"].iter().enumerate() {
        println!("  {} -> {}", day, rule.category_for_index(index)?);
    }
    println!(
        "  Recency: {:?} over {} days",
        config.rotation.recency.policy, config.rotation.recency.window
    );
    for (tag, max) in &config.rotation.weekly_limits {
        println!("  Limit:   {} at most {}x per week", tag, max);
    }
    println!("  State:   {}", config.storage.state_file.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
