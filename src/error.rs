use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RollbackError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("mount {}: {reason}", .mountpoint.display())]
    Mount { mountpoint: PathBuf, reason: String },
    #[error("descriptor {}: {reason}", .path.display())]
    Descriptor { path: PathBuf, reason: String },
    #[error("missing {}: is {dev} mounted with the option subvolid=5?", .main.display())]
    SubvolumeMissing { main: PathBuf, dev: String },
    #[error("repositioning step {step} failed: {reason}")]
    Repositioning { step: &'static str, reason: String },
    #[error("snapper-rollback is already running")]
    AlreadyRunning,
    #[error("{0}")]
    Message(String),
    #[error("{0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse config: {0}")]
    Parse(String),
    #[error("{0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, RollbackError>;

impl RollbackError {
    pub fn message(msg: impl Into<String>) -> Self {
        RollbackError::Message(msg.into())
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, RollbackError::Io(err) if err.kind() == io::ErrorKind::PermissionDenied)
    }
}
