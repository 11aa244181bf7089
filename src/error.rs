use std::error;
use std::fmt;
use std::io;
use std::result;

use charcsv_core::DialectError;

/// A type alias for `Result<T, charcsv::Error>`.
pub type Result<T> = result::Result<T, Error>;

/// An error that can occur when processing CSV data.
///
/// Malformed CSV is never an error: the reader finds a parse for every input.
/// What can fail is the character source or sink underneath a reader or
/// writer, the configuration handed to a builder, or the shape of a value
/// given to [`Writer::serialize`](crate::Writer::serialize).
#[derive(Debug)]
pub enum Error {
    /// An I/O error that occurred while reading or writing CSV data.
    ///
    /// The error is passed through exactly as the source or sink reported
    /// it.
    Io(io::Error),
    /// The delimiter and quote given to a builder are not a valid dialect.
    Dialect(DialectError),
    /// An error that occurred while converting a value to CSV fields.
    Serialize(String),
}

impl Error {
    /// Returns true if this is an I/O error.
    ///
    /// If this is true, the underlying I/O error can be accessed with
    /// `into_io_error`.
    pub fn is_io_error(&self) -> bool {
        match *self {
            Error::Io(_) => true,
            _ => false,
        }
    }

    /// Unwrap the underlying I/O error, if there is one.
    pub fn into_io_error(self) -> Option<io::Error> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<DialectError> for Error {
    fn from(err: DialectError) -> Error {
        Error::Dialect(err)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        match err {
            Error::Io(err) => err,
            err => io::Error::new(io::ErrorKind::Other, err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            Error::Dialect(ref err) => Some(err),
            Error::Serialize(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref err) => err.fmt(f),
            Error::Dialect(ref err) => err.fmt(f),
            Error::Serialize(ref msg) => {
                write!(f, "CSV write error: {}", msg)
            }
        }
    }
}
