use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kanflow")]
#[command(about = "Render the parent/child flow chart around a kanban task")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    #[arg(
        long,
        global = true,
        env = "KANFLOW_CONFIG",
        help = "Path to a kanflow.toml (defaults to ./kanflow.toml when present)"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Build and print the flow chart for a focus task")]
    Render {
        #[arg(long, short = 's', help = "JSON snapshot of tasks and relationships")]
        snapshot: PathBuf,
        #[arg(long, short = 'f', help = "Id of the task to focus on")]
        focus: u64,
        #[arg(
            long = "status",
            help = "Only show tasks with this status (repeatable)"
        )]
        status: Vec<String>,
        #[arg(long, help = "Output format", default_value = "tree", value_enum)]
        format: OutputFormat,
    },
    #[command(about = "List the distinct statuses present in a snapshot")]
    Statuses {
        #[arg(long, short = 's', help = "JSON snapshot of tasks and relationships")]
        snapshot: PathBuf,
        #[arg(
            long,
            short = 'f',
            help = "Focus id to pick from a multi-focus snapshot"
        )]
        focus: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented text tree
    Tree,
    /// The positioned chart as JSON
    Json,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::try_parse_from(["kanflow", "statuses", "--snapshot", "tasks.json"]).unwrap();

        assert!(matches!(cli.level, LogLevel::Warn));
        assert_eq!(cli.log_format, TracingFormat::Compact);
        assert!(matches!(
            cli.command,
            Commands::Statuses { focus: None, .. }
        ));
    }

    #[test]
    fn test_cli_log_level_parsing() {
        let cli = Cli::try_parse_from([
            "kanflow", "--level", "debug", "statuses", "-s", "tasks.json",
        ])
        .unwrap();
        assert!(matches!(cli.level, LogLevel::Debug));

        let cli = Cli::try_parse_from(["kanflow", "-l", "error", "statuses", "-s", "tasks.json"])
            .unwrap();
        assert!(matches!(cli.level, LogLevel::Error));
    }

    #[test]
    fn test_render_parses_repeated_statuses() {
        let cli = Cli::try_parse_from([
            "kanflow",
            "render",
            "--snapshot",
            "tasks.json",
            "--focus",
            "42",
            "--status",
            "open",
            "--status",
            "done",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Render {
                focus,
                status,
                format,
                ..
            } => {
                assert_eq!(focus, 42);
                assert_eq!(status, vec!["open", "done"]);
                assert_eq!(format, OutputFormat::Json);
            }
            Commands::Statuses { .. } => panic!("expected render"),
        }
    }

    #[test]
    fn test_render_requires_focus() {
        let result = Cli::try_parse_from(["kanflow", "render", "--snapshot", "tasks.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "kanflow",
            "render",
            "-s",
            "tasks.json",
            "-f",
            "1",
            "--log-format",
            "json",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        assert_eq!(cli.log_format, TracingFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result = Cli::try_parse_from([
            "kanflow", "render", "-s", "a.json", "-f", "1", "--format", "svg",
        ]);
        assert!(result.is_err());
    }
}
