//! Errors reported by directory streams
//!
//! The variants follow the `errno` values a POSIX `opendir`/`readdir`/`closedir` would report.
//! Native failures without a dedicated mapping are collapsed into [`Error::Unsupported`], which
//! keeps the underlying OS error as its source.

use std::io;

use libc::c_int;

/// Result type used throughout this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure of a directory stream operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path was empty or contained an interior NUL.
    #[error("invalid directory path")]
    InvalidArgument,
    /// The search pattern built from the path exceeds the platform limit.
    #[error("directory path is too long")]
    NameTooLong,
    /// The path cannot be represented in the native encoding.
    #[error("directory path is not valid in the native encoding")]
    Encoding,
    /// The directory does not exist.
    #[error("directory not found")]
    NotFound,
    /// Any other native failure.
    #[error("directory stream operation failed")]
    Unsupported(#[source] io::Error),
}

impl Error {
    /// Return the POSIX `errno` value corresponding to this error.
    pub fn errno(&self) -> c_int {
        match self {
            Error::InvalidArgument => libc::EINVAL,
            Error::NameTooLong => libc::ENAMETOOLONG,
            Error::Encoding => libc::EILSEQ,
            Error::NotFound => libc::ENOENT,
            // Win32 error codes are not errno values
            #[cfg(windows)]
            Error::Unsupported(_) => libc::ENOSYS,
            #[cfg(not(windows))]
            Error::Unsupported(err) => err.raw_os_error().unwrap_or(libc::ENOSYS),
        }
    }

    /// Map a native `errno` failure onto the error taxonomy.
    #[cfg(unix)]
    pub(crate) fn from_errno(err: io::Error) -> Error {
        match err.raw_os_error() {
            Some(libc::ENOENT) => Error::NotFound,
            Some(libc::ENAMETOOLONG) => Error::NameTooLong,
            Some(libc::EINVAL) => Error::InvalidArgument,
            Some(libc::EILSEQ) => Error::Encoding,
            _ => Error::Unsupported(err),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        let kind = match err {
            Error::Unsupported(inner) => return inner,
            Error::InvalidArgument | Error::NameTooLong => io::ErrorKind::InvalidInput,
            Error::Encoding => io::ErrorKind::InvalidData,
            Error::NotFound => io::ErrorKind::NotFound,
        };
        io::Error::new(kind, err)
    }
}
