//! Error types.
//!
//! Only the input state tracker and the backend/config boundary can fail.
//! Registry, queue and focus operations are total.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Code;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Unknown keycode {0}")]
    UnknownCode(Code),
    #[error("Unknown scancode {0}")]
    UnknownScancode(i32),
    #[error("Unknown mouse button {0}")]
    UnknownMouseButton(i32),
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl BackendError {
    pub(crate) fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| Self::Io { context, source }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Re-initialization is unsupported")]
    AlreadyInitialized,
}
