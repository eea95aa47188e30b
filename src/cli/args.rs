use std::path::PathBuf;

use clap::Parser;

use crate::types::SnapshotId;

const CONFIG_FILE: &str = "/etc/snapper-rollback.yaml";

#[derive(Parser, Debug)]
#[command(
    name = "snapper-rollback",
    version,
    about = "Rollback to a snapper snapshot based on snapshot ID"
)]
pub struct Cli {
    /// ID of the snapper snapshot to roll back to
    #[arg(value_name = "SNAPID")]
    pub snap_id: SnapshotId,

    /// Don't actually do anything, just print the actions out
    #[arg(long)]
    pub dry_run: bool,

    /// Configuration file to use
    #[arg(short, long, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
