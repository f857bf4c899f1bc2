use crate::container;
use std::fmt;
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    InvalidConfiguration(String),
    InvalidContinuationToken(String),
    Listing(container::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidConfiguration(msg) => write!(f, "Invalid configuration: {msg}"),
            Error::InvalidContinuationToken(msg) => write!(f, "Invalid continuation token: {msg}"),
            Error::Listing(err) => write!(f, "Listing error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Listing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<container::Error> for Error {
    fn from(err: container::Error) -> Self {
        debug!("Listing error: {err}");
        Error::Listing(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", Error::InvalidConfiguration("page size".to_string())),
            "Invalid configuration: page size"
        );
        assert_eq!(
            format!("{}", Error::InvalidContinuationToken("bad".to_string())),
            "Invalid continuation token: bad"
        );
        assert_eq!(
            format!(
                "{}",
                Error::Listing(container::Error::StorageBackend("503".to_string()))
            ),
            "Listing error: Storage backend error: 503"
        );
    }

    #[test]
    fn test_listing_error_is_kept_as_source() {
        let inner = container::Error::Io("reset by peer".to_string());
        let err: Error = inner.clone().into();
        assert_eq!(err, Error::Listing(inner));
        assert!(err.source().is_some());
    }
}
