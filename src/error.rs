// Error type shared by every library module. The binary wraps it in
// `anyhow` for context, the library keeps the kinds distinguishable so
// callers can tell "the server said no" from "the server sent garbage".

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PastebinError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PastebinError {
    /// Bad local setup: missing credential, unusable file name, bad flag.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The request never produced a response.
    #[error("failed to reach the paste service")]
    Transport {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
    /// The list call answered with a status outside the accepted set.
    #[error("request failed with status {status}")]
    Request { status: u16 },
    /// The server accepted the request but the body could not be decoded.
    #[error("could not parse the paste list: {reason}")]
    Parse { reason: String },
    /// Login answered with the API's in-band error text.
    #[error("login rejected: {0}")]
    Authentication(String),
    /// Any other call answered with the API's in-band error text.
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("IO error")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl PastebinError {
    pub fn transport<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PastebinError::Transport {
            source: Box::new(source),
        }
    }
}

impl From<reqwest::Error> for PastebinError {
    fn from(source: reqwest::Error) -> Self {
        PastebinError::transport(source)
    }
}
