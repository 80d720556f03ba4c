//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "jira-port",
    version,
    about = "Port tracker CSV exports to another instance",
    long_about = "Port tracker CSV exports to another instance.\n\n\
                  Rewrites user handles and issue types using mappings built against the\n\
                  source and target instances, then splits the result by issue type."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (default: ./jira-port.toml, then the platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow user identifiers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build or load the mappings and rewrite the configured exports.
    Run(RunArgs),

    /// Print the user identifiers referenced by the configured exports.
    Extract,

    /// Write a copy of a CSV file without its empty columns.
    Prune {
        #[arg(value_name = "CSV")]
        csv: PathBuf,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// Create the user mapping from the source and target instances.
    #[arg(short = 'm', long = "create-user-map")]
    pub create_user_map: bool,

    /// Create the issue type mapping from the source and target instances.
    #[arg(short = 'i', long = "create-issue-type-map")]
    pub create_issue_type_map: bool,

    /// Rewrite the exports with the mappings.
    #[arg(short = 'u', long = "update-csv")]
    pub update_csv: bool,

    /// Split the rewritten output by issue type (default).
    #[arg(long = "split", overrides_with = "no_split")]
    pub split: bool,

    /// Leave the rewritten output as a single file.
    #[arg(long = "no-split", overrides_with = "split")]
    pub no_split: bool,

    /// Remove columns without data before splitting.
    #[arg(long = "prune-empty-columns")]
    pub prune_empty_columns: bool,
}

impl RunArgs {
    pub fn split_enabled(&self) -> bool {
        !self.no_split
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn short_phase_flags_parse() {
        let cli = Cli::parse_from(["jira-port", "run", "-m", "-i", "-u", "--no-split"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.create_user_map && args.create_issue_type_map && args.update_csv);
        assert!(args.no_split);
    }
}
