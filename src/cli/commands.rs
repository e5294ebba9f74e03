//! CLI subcommand definitions

use clap::Subcommand;
use daytally::Granularity;

/// Main CLI commands
#[derive(Debug, Clone, Subcommand)]
pub(crate) enum Commands {
    /// Show one row per populated day (default)
    Daily,
    /// Show one row per populated ISO week
    Weekly,
    /// Show one row per populated month
    Monthly,
    /// Show one row per populated year
    Yearly,
    /// Show today's entry
    Today,
    /// Show the all-time summary
    Alltime,
    /// Show every statistic for one period
    Show {
        /// Period key: YYYY-MM-DD, YYYY-Www, YYYY-MM or YYYY
        key: String,
    },
}

/// Normalized command
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Report {
    /// Every populated period of one granularity
    Periods(Granularity),
    Today,
    AllTime,
    Show(String),
}

/// Parse CLI command into a report; no subcommand means daily
pub(crate) fn parse_command(cmd: &Option<Commands>) -> Report {
    match cmd {
        Some(Commands::Daily) | None => Report::Periods(Granularity::Day),
        Some(Commands::Weekly) => Report::Periods(Granularity::Week),
        Some(Commands::Monthly) => Report::Periods(Granularity::Month),
        Some(Commands::Yearly) => Report::Periods(Granularity::Year),
        Some(Commands::Today) => Report::Today,
        Some(Commands::Alltime) => Report::AllTime,
        Some(Commands::Show { key }) => Report::Show(key.clone()),
    }
}
