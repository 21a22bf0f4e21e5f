use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("read of {len} byte(s) at {offset:#08x} is outside the ROM ({size:#x} bytes)")]
    OutOfRange { offset: usize, len: usize, size: usize },

    #[error("invalid ROM image: {0}")]
    Rom(String),

    #[error("decode error at {address:#08x}: {reason}")]
    Decode { address: u32, reason: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid layout config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExtractError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(address: u32, reason: impl Into<String>) -> Self {
        ExtractError::Decode {
            address,
            reason: reason.into(),
        }
    }
}
