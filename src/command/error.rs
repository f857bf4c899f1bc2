use crate::{configuration, container, enumerator};
use std::{fmt, io};

#[derive(Debug)]
pub enum Error {
    IO(io::Error),
    Configuration(configuration::Error),
    Container(container::Error),
    Enumerator(enumerator::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::IO(err) => write!(f, "IO error: {err}"),
            Error::Configuration(err) => {
                write!(f, "Configuration error: ")?;
                write!(f, "{err}")
            }
            Error::Container(err) => {
                write!(f, "Container error: ")?;
                write!(f, "{err}")
            }
            Error::Enumerator(err) => {
                write!(f, "Enumeration error: ")?;
                write!(f, "{err}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IO(err)
    }
}

impl From<configuration::Error> for Error {
    fn from(err: configuration::Error) -> Self {
        Error::Configuration(err)
    }
}

impl From<container::Error> for Error {
    fn from(err: container::Error) -> Self {
        Error::Container(err)
    }
}

impl From<enumerator::Error> for Error {
    fn from(err: enumerator::Error) -> Self {
        Error::Enumerator(err)
    }
}
