pub mod rollback;

use tracing::error;

use crate::error::RollbackError;

pub fn exit_for_error(err: &RollbackError) -> ! {
    let code = if err.is_permission_denied() {
        13
    } else {
        match err {
            RollbackError::Config(_) => 2,
            RollbackError::AlreadyRunning => 3,
            RollbackError::Mount { .. } => 4,
            RollbackError::SubvolumeMissing { .. } => 5,
            RollbackError::Descriptor { .. } => 6,
            RollbackError::Repositioning { .. } => 7,
            RollbackError::Message(_) | RollbackError::Io(_) => 1,
        }
    };
    error!("{}", err);
    std::process::exit(code);
}
