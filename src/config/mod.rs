pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "frame-grid")]
#[command(about = "Locate, lay out and track point-cloud frames of survey blocks")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = "frame-grid.toml")]
    pub config: String,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Write logs as JSON lines")]
    pub json_log: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the naming convention of a frame name
    Classify { name: String },

    /// List sheet rows assigned to the configured operator
    Pending,

    /// Print the frame grid of a block
    Grid {
        #[arg(long)]
        block: String,
    },

    /// Record taken frames of a block and show adjacent frames
    Acquire {
        #[arg(long)]
        block: String,

        #[arg(long, value_delimiter = ',', required = true)]
        taken: Vec<String>,

        /// Where the taken frames were copied to
        #[arg(long)]
        location: Option<String>,
    },

    /// Copy frame files of a block into its next destination folder
    Copy {
        #[arg(long)]
        block: String,

        #[arg(long, value_delimiter = ',', required = true)]
        frames: Vec<String>,
    },

    /// Inspect stored acquisition batches
    Batches {
        #[command(subcommand)]
        action: BatchAction,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum BatchAction {
    List,
    Delete { id: String },
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_acquire_command() {
        let config = CliConfig::try_parse_from([
            "frame-grid",
            "acquire",
            "--block",
            "2701",
            "--taken",
            "N-34-124-C-c-1-1-1-1,N-34-124-C-c-1-1-1-2",
            "-v",
        ])
        .unwrap();

        assert!(config.verbose);
        assert_eq!(config.config, "frame-grid.toml");
        match config.command {
            Command::Acquire { block, taken, location } => {
                assert_eq!(block, "2701");
                assert_eq!(taken.len(), 2);
                assert!(location.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_batch_delete() {
        let config =
            CliConfig::try_parse_from(["frame-grid", "--config", "ops.toml", "batches", "delete", "abc"])
                .unwrap();
        assert_eq!(config.config, "ops.toml");
        assert!(matches!(
            config.command,
            Command::Batches {
                action: BatchAction::Delete { .. }
            }
        ));
    }
}
