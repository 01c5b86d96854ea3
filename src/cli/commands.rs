use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `shellguard` - guarded shell command execution for autonomous agents.
#[derive(Parser, Debug)]
#[command(name = "shellguard")]
#[command(version)]
#[command(about = "Run shell commands behind deny/allow rules and workspace confinement.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.shellguard/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate and execute a command, printing its output
    Run {
        /// Command string passed to the platform shell
        command: String,

        /// Working directory (default: configured dir or current dir)
        #[arg(short = 'C', long)]
        working_dir: Option<String>,

        /// Timeout in seconds
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Confine referenced paths to the working directory
        #[arg(long)]
        restrict: bool,

        /// Allow pattern (repeatable); added to configured patterns
        #[arg(long = "allow", value_name = "PATTERN")]
        allow: Vec<String>,
    },

    /// Report whether a command would be allowed, without running it
    Check {
        command: String,

        #[arg(short = 'C', long)]
        working_dir: Option<String>,

        #[arg(long)]
        restrict: bool,
    },

    /// Print the registered tool specs as JSON
    Schema,
}
