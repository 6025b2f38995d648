//! Common error type.

use crate::exp::Error as CompileError;
use crate::read::Error as ReadError;
use bml_parse::Error as ParseError;
use core::fmt::{self, Display};

/// Common error type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Compile(CompileError),
    Read(ReadError),
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        Self::Compile(err)
    }
}

impl From<ReadError> for Error {
    fn from(err: ReadError) -> Self {
        Self::Read(err)
    }
}

/// Errors of the S-expression parser count as syntax errors of rules.
impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Compile(err.into())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Compile(e) => e.fmt(f),
            Self::Read(e) => write!(f, "malformed term: {}", e),
        }
    }
}
