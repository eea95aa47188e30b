pub mod btrfs;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod lock;
pub mod mount;
pub mod rollback;
pub mod snapshots;
pub mod types;
pub mod util;
