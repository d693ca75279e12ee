//! CLI argument structures

use crate::config::OptionOverrides;
use crate::rules::RuleId;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Prepare a Lumen application for Google App Engine
#[derive(Parser, Debug)]
#[command(name = "gae-setup")]
#[command(about = "gae-setup - Prepare a Lumen application for Google App Engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Patch env files, bootstrap and config files for App Engine
    #[command(name = "configure")]
    Configure(ConfigureArgs),

    /// Apply named rules to a single file
    #[command(name = "process")]
    Process {
        /// File to rewrite
        file: PathBuf,

        /// Rule to apply, in order (e.g. add-queue-config)
        #[arg(short, long = "rule", value_name = "RULE", required = true)]
        rules: Vec<RuleId>,
    },

    /// Put a file back from one of its backups
    #[command(name = "restore")]
    Restore {
        /// File to restore
        file: PathBuf,

        /// Backup to restore from (defaults to <FILE>.bak)
        #[arg(short, long, value_name = "PATH")]
        backup: Option<PathBuf>,

        /// Keep the backup after restoring
        #[arg(long)]
        keep: bool,
    },

    /// List the backups of a file, oldest first
    #[command(name = "backups")]
    Backups {
        /// File whose backups to list
        file: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct ConfigureArgs {
    /// Application directory (defaults to current directory)
    #[arg(short = 'p', long)]
    pub path: Option<PathBuf>,

    /// Options file (defaults to gae-setup.toml in the application directory)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// App Engine application id
    #[arg(long, value_name = "ID")]
    pub app_id: Option<String>,

    /// Generate app.yaml and php.ini
    #[arg(long)]
    pub generate_config: bool,

    /// Skip app.yaml and php.ini even if the options file asks for them
    #[arg(long, conflicts_with = "generate_config")]
    pub no_generate_config: bool,

    /// Cloud Storage bucket (defaults to <APP_ID>.appspot.com)
    #[arg(long, value_name = "BUCKET")]
    pub bucket_id: Option<String>,

    /// Cloud SQL unix socket for production, e.g. /cloudsql/project:instance
    #[arg(long, value_name = "SOCKET")]
    pub db_socket: Option<String>,

    /// Cloud SQL database name
    #[arg(long, value_name = "NAME")]
    pub db_name: Option<String>,

    /// Cloud SQL IPv4 address for local runs
    #[arg(long, value_name = "HOST")]
    pub db_host: Option<String>,

    /// Automatically answer yes to all prompts
    #[arg(short = 'y', long = "yes")]
    pub auto_accept: bool,
}

impl ConfigureArgs {
    /// Options given on the command line, to be laid over the options file
    pub fn options(&self) -> OptionOverrides {
        let generate_config = match (self.generate_config, self.no_generate_config) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        OptionOverrides {
            app_id: self.app_id.clone(),
            generate_config,
            bucket_id: self.bucket_id.clone(),
            db_socket: self.db_socket.clone(),
            db_name: self.db_name.clone(),
            db_host: self.db_host.clone(),
        }
    }
}
