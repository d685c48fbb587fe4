use failure::{Context, Fail};
use std::fmt::Display;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error {
    inner: Context<ErrorKind>,
}
#[derive(Debug, Fail)]
pub enum ErrorKind {
    #[fail(display = "{}", _0)]
    IO(#[cause] io::Error),

    #[fail(display = "{}", _0)]
    Json(#[cause] serde_json::Error),

    #[fail(display = "invalid config: {}", _0)]
    InvalidConfig(String),

    #[fail(display = "invalid pattern: {}", _0)]
    InvalidPattern(String),

    // pool driven out of protocol, e.g. started twice
    #[fail(display = "usage error: {}", _0)]
    Usage(String),
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.inner.get_context()
    }

    pub fn usage(msg: String) -> Self {
        Error::from(ErrorKind::Usage(msg))
    }

    pub fn invalid_config(msg: String) -> Self {
        Error::from(ErrorKind::InvalidConfig(msg))
    }

    pub fn invalid_pattern(msg: String) -> Self {
        Error::from(ErrorKind::InvalidPattern(msg))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error {
            inner: Context::new(ErrorKind::IO(err)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            inner: Context::new(ErrorKind::Json(err)),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(err: ErrorKind) -> Self {
        Error {
            inner: Context::new(err),
        }
    }
}
