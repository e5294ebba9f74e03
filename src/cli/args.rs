//! CLI argument definitions
//!
//! Global CLI options and configuration merging logic.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{Config, ConfigColorMode, ConfigSortOrder};

use super::commands::Commands;

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum SortOrder {
    /// Oldest first (default)
    #[default]
    Asc,
    /// Newest first
    Desc,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq)]
pub(crate) enum ColorMode {
    /// Auto-detect based on terminal (default)
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Parser)]
#[command(name = "daytally")]
#[command(about = "Day, week, month and year statistics over a log of daily numbers", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Data file, or directory of *.json files
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) data: Option<PathBuf>,

    /// Filter from date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) since: Option<String>,

    /// Filter until date (YYYYMMDD or YYYY-MM-DD)
    #[arg(short, long, global = true)]
    pub(crate) until: Option<String>,

    /// Replace a day's numbers before reporting (repeatable)
    #[arg(long = "set", global = true, value_name = "DATE=N[,N...]")]
    pub(crate) set: Vec<String>,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub(crate) json: bool,

    /// Sort order for results
    #[arg(short, long, global = true, value_enum, default_value = "asc")]
    pub(crate) order: SortOrder,

    /// Color output mode
    #[arg(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorMode,

    /// Disable colored output (shorthand for --color=never)
    #[arg(long, global = true)]
    pub(crate) no_color: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub(crate) debug: bool,

    /// Compact output (fewer columns)
    #[arg(short = 'c', long, global = true)]
    pub(crate) compact: bool,

    /// Timezone used to resolve "today" (e.g., "Asia/Shanghai", "UTC")
    #[arg(long, global = true, value_name = "TZ")]
    pub(crate) timezone: Option<String>,

    /// Locale for number formatting (e.g., "en", "de", "fr")
    #[arg(long, global = true, value_name = "LOCALE")]
    pub(crate) locale: Option<String>,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        // Boolean flags: config only applies if CLI left them off
        if !self.compact && config.compact {
            self.compact = true;
        }
        if !self.no_color && config.no_color {
            self.no_color = true;
        }
        if !self.debug && config.debug {
            self.debug = true;
        }

        // Enum values: config only overrides the CLI default
        if self.order == SortOrder::Asc && config.order == Some(ConfigSortOrder::Desc) {
            self.order = SortOrder::Desc;
        }
        if self.color == ColorMode::Auto {
            match config.color {
                Some(ConfigColorMode::Always) => self.color = ColorMode::Always,
                Some(ConfigColorMode::Never) => self.color = ColorMode::Never,
                Some(ConfigColorMode::Auto) | None => {}
            }
        }

        if self.data.is_none() {
            self.data = config.data.clone();
        }
        if self.timezone.is_none() {
            self.timezone = config.timezone.clone();
        }
        if self.locale.is_none() {
            self.locale = config.locale.clone();
        }

        self
    }

    pub(crate) fn use_color(&self) -> bool {
        if self.no_color {
            return false;
        }
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("daytally").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["weekly", "--json", "-o", "desc", "--set", "2025-01-01=1,2"]);
        assert!(cli.json);
        assert_eq!(cli.order, SortOrder::Desc);
        assert_eq!(cli.set, vec!["2025-01-01=1,2".to_string()]);
    }

    #[test]
    fn set_is_repeatable() {
        let cli = parse(&["--set", "2025-01-01=1", "--set", "2025-01-02=2"]);
        assert_eq!(cli.set.len(), 2);
    }

    #[test]
    fn config_fills_unset_values() {
        let config: Config = toml::from_str(
            r#"
            data = "/srv/log.json"
            order = "desc"
            color = "never"
            compact = true
            timezone = "UTC"
            "#,
        )
        .unwrap();
        let cli = parse(&[]).with_config(&config);
        assert_eq!(cli.data, Some(PathBuf::from("/srv/log.json")));
        assert_eq!(cli.order, SortOrder::Desc);
        assert_eq!(cli.color, ColorMode::Never);
        assert!(cli.compact);
        assert_eq!(cli.timezone.as_deref(), Some("UTC"));
        assert!(!cli.use_color());
    }

    #[test]
    fn cli_values_win_over_config() {
        let config: Config = toml::from_str(
            r#"
            data = "/srv/log.json"
            color = "never"
            locale = "de"
            "#,
        )
        .unwrap();
        let cli = parse(&["--data", "mine.json", "--color", "always", "--locale", "fr"])
            .with_config(&config);
        assert_eq!(cli.data, Some(PathBuf::from("mine.json")));
        assert_eq!(cli.color, ColorMode::Always);
        assert_eq!(cli.locale.as_deref(), Some("fr"));
    }

    #[test]
    fn no_color_overrides_always() {
        let cli = parse(&["--color", "always", "--no-color"]);
        assert!(!cli.use_color());
    }
}
