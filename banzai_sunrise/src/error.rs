//! Application errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("cannot open window: {0}")]
    Window(String),

    #[error("cannot read replay file {}: {source}", .path.display())]
    Replay {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} (try --help)")]
    Usage(String),
}
