//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - generate: schedule a month, write the .ics, save state
//! - preview: schedule a month without writing anything
//! - state: show or reset the persisted rotation state
//! - check: validate the configuration

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Kondate - monthly menu rotation scheduler
#[derive(Parser, Debug)]
#[command(name = "kondate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Schedule a month, write the calendar file and save rotation state
    Generate {
        #[command(flatten)]
        target: TargetArgs,

        /// Output directory for the .ics file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Schedule and print without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the schedule for a month without writing anything
    Preview {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Inspect or reset persisted rotation state
    State {
        #[command(subcommand)]
        command: StateCommands,
    },

    /// Validate the configuration and weekday table
    Check,
}

/// Month and item selection shared by generate/preview
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Year to schedule (defaults to the year of next month)
    #[arg(short, long, requires = "month")]
    pub year: Option<i32>,

    /// Month to schedule, 1-12 (defaults to next month)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Item file to use instead of the configured source
    #[arg(short, long)]
    pub items: Option<PathBuf>,
}

/// State management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum StateCommands {
    /// Show positions and recent items
    Show,

    /// Delete the state file so the next run starts fresh
    Reset {
        /// Actually delete; without it the file that would be removed is only shown
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["kondate"]).is_err());
    }

    #[test]
    fn test_cli_verbose_and_config() {
        let args = ["kondate", "-v", "-c", "/path/to/kondate.yml", "check"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.is_verbose());
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/kondate.yml")));
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::try_parse_from(["kondate", "generate"]).unwrap();
        match cli.command {
            Commands::Generate {
                target,
                output,
                dry_run,
            } => {
                assert!(target.year.is_none());
                assert!(target.month.is_none());
                assert!(output.is_none());
                assert!(!dry_run);
            }
            _ => panic!("Expected generate command"),
        }
    }

    #[test]
    fn test_generate_with_month() {
        let cli = Cli::try_parse_from([
            "kondate", "generate", "-y", "2025", "-m", "12", "--items", "menu.yml", "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate { target, dry_run, .. } => {
                assert_eq!(target.year, Some(2025));
                assert_eq!(target.month, Some(12));
                assert_eq!(target.items, Some(PathBuf::from("menu.yml")));
                assert!(dry_run);
            }
            _ => panic!("Expected generate command"),
        }
    }

    #[test]
    fn test_month_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["kondate", "preview", "-m", "13"]).is_err());
    }

    #[test]
    fn test_year_requires_month() {
        assert!(Cli::try_parse_from(["kondate", "preview", "-y", "2025"]).is_err());
    }

    #[test]
    fn test_state_reset_force() {
        let cli = Cli::try_parse_from(["kondate", "state", "reset", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::State {
                command: StateCommands::Reset { force: true }
            }
        ));
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
