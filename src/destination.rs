use crate::error::LogError;
use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Where formatted records are written.
pub enum Destination {
    /// The process's standard output, the only destination that may be colored
    Stdout,
    File { path: PathBuf, file: File },
    /// Caller-supplied sink, treated like a file
    Writer(RefCell<Box<dyn Write>>),
    /// A log file that could not be opened; every write is refused
    Invalid { path: PathBuf, reason: String },
}

impl Destination {
    /// Open `path` for truncating write.
    pub fn create(path: &Path) -> Result<Self, LogError> {
        let file = File::create(path).map_err(|source| LogError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Destination::File {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn writer(writer: Box<dyn Write>) -> Self {
        Destination::Writer(RefCell::new(writer))
    }

    pub fn is_stdout(&self) -> bool {
        matches!(self, Destination::Stdout)
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Destination::Invalid { .. })
    }

    /// Run `f` against the underlying stream, flushing afterwards.
    pub fn with_stream<F>(&self, f: F) -> Result<(), LogError>
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        match self {
            Destination::Stdout => {
                let mut out = io::stdout().lock();
                f(&mut out)?;
                out.flush()?;
            }
            Destination::File { file, .. } => {
                let mut out: &File = file;
                f(&mut out)?;
                out.flush()?;
            }
            Destination::Writer(writer) => {
                let mut out = writer.borrow_mut();
                f(&mut **out)?;
                out.flush()?;
            }
            Destination::Invalid { path, reason } => {
                return Err(LogError::InvalidDestination(format!(
                    "{} ({})",
                    path.display(),
                    reason
                )));
            }
        }
        Ok(())
    }

    /// Flush and release the stream. Standard output is flushed but stays open.
    pub fn close(self) -> Result<(), LogError> {
        match self {
            Destination::Stdout => io::stdout().flush()?,
            Destination::File { mut file, .. } => file.flush()?,
            Destination::Writer(writer) => writer.into_inner().flush()?,
            Destination::Invalid { .. } => {}
        }
        Ok(())
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("<stdout>"),
            Destination::File { path, .. } => write!(f, "{}", path.display()),
            Destination::Writer(_) => f.write_str("<writer>"),
            Destination::Invalid { path, .. } => write!(f, "{} (invalid)", path.display()),
        }
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Destination({})", self)
    }
}
