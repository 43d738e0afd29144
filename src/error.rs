use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not query terminal attributes: {0}")]
    TerminalQuery(#[source] io::Error),

    #[error("Could not apply terminal attributes: {0}")]
    TerminalApply(#[source] io::Error),

    #[error("Could not detect terminal window size: {0}")]
    ViewportQuery(String),

    #[error("Could not open file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not read input from terminal: {0}")]
    Read(#[source] io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Terminated by signal")]
    Terminated,

    #[error("{0}. Please see --help")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
