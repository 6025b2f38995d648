use crate::Error;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Contents of a file together with its path.
pub struct PathRead {
    pub path: PathBuf,
    pub read: String,
}

impl PathRead {
    /// Return true if the path designates standard input.
    pub fn is_stdin(path: &Path) -> bool {
        path == Path::new("-")
    }
}

impl TryFrom<&PathBuf> for PathRead {
    type Error = Error;

    /// Read a file, or standard input if the path is "-".
    fn try_from(path: &PathBuf) -> Result<Self, Self::Error> {
        log::info!("Read {}", path.display());
        let read = if Self::is_stdin(path) {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s).map(|_| s)
        } else {
            std::fs::read_to_string(path)
        };
        let read = read.map_err(|e| Error::from(e).in_file(path))?;
        let path = path.clone();
        Ok(Self { path, read })
    }
}
