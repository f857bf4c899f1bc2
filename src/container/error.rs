use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::SdkError;
use std::fmt::Debug;
use std::{fmt, io};
use tracing::error;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Configuration(String),
    Io(String),
    StorageBackend(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::StorageBackend(e) => write!(f, "Storage backend error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        error!("IO error: {e:?}");
        Error::Io(e.to_string())
    }
}

impl<T> From<SdkError<T, HttpResponse>> for Error
where
    T: Debug,
{
    fn from(e: SdkError<T, HttpResponse>) -> Self {
        error!("SdkError: {e:?}");
        Error::StorageBackend(format!("SdkError: {e:?}"))
    }
}
