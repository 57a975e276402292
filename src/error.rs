//! Errors raised while starting external programs.

use std::io;
use std::path::PathBuf;

/// Failure at the process-launch boundary.
///
/// None of these end the session: the interpreter prints the message with its
/// source chain (`{:#}` through `anyhow`) and reads the next line.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("{0}: command not found")]
    NotFound(String),

    #[error("{program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("open failed: {}", path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("pipe failed")]
    Pipe(#[source] io::Error),

    #[error("wait failed")]
    Wait(#[source] io::Error),
}
