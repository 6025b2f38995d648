use core::fmt::{self, Display};
use std::io;
use std::path::PathBuf;

/// Central error type.
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Bml(bml::Error),
    /// standard input given more than once as file
    Stdin,
    /// error that occurred while processing a file
    File(PathBuf, Box<Error>),
}

impl Error {
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Self::File(path.into(), Box::new(self))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<bml::Error> for Error {
    fn from(err: bml::Error) -> Self {
        Self::Bml(err)
    }
}

impl From<bml::exp::Error> for Error {
    fn from(err: bml::exp::Error) -> Self {
        Self::Bml(err.into())
    }
}

impl From<bml::read::Error> for Error {
    fn from(err: bml::read::Error) -> Self {
        Self::Bml(err.into())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Io(e) => e.fmt(f),
            Self::Bml(e) => e.fmt(f),
            Self::Stdin => write!(f, "standard input can be read only once"),
            Self::File(path, e) => write!(f, "{}: {}", path.display(), e),
        }
    }
}

impl std::error::Error for Error {}
