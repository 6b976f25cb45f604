//! Error types for conversion.

use thiserror::Error;

/// Errors that can occur while converting Markdown to RTF.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unpaired low surrogate at UTF-16 offset {position}")]
    UnpairedSurrogate { position: usize },

    #[error("invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
