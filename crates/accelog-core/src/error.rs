use std::path::PathBuf;

/// Failures that end a collection run.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("failed to enumerate serial ports: {0}")]
    Enumerate(#[source] serialport::Error),
    #[error("failed to write session file {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serial read failed: {0}")]
    Read(#[source] std::io::Error),
}

/// Failures while loading a recorded session back from disk.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to read session file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session file {} is empty", path.display())]
    Empty { path: PathBuf },
    #[error("session file {} has no `{column}` column", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
}
