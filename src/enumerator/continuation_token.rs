use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::enumerator::Error;

/// Opaque resume point of an enumeration.
///
/// Holds the container's own segment token, passed back to the container
/// untouched, together with the last name handed out from that segment. The
/// default value points at the start of the key space.
///
/// The string form is URL-safe and stable, so it can be stored and parsed back
/// with [`FromStr`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContinuationToken {
    #[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
    segment: Option<String>,
    #[serde(rename = "a", default, skip_serializing_if = "Option::is_none")]
    after: Option<String>,
}

impl ContinuationToken {
    pub(crate) fn new(segment: Option<String>, after: Option<String>) -> Self {
        Self { segment, after }
    }

    pub fn is_start(&self) -> bool {
        self.segment.is_none() && self.after.is_none()
    }

    pub(crate) fn segment(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    pub(crate) fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json = serde_json::to_vec(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", URL_SAFE_NO_PAD.encode(json))
    }
}

impl FromStr for ContinuationToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let json = URL_SAFE_NO_PAD
            .decode(s.trim())
            .map_err(|e| Error::InvalidContinuationToken(e.to_string()))?;

        serde_json::from_slice(&json).map_err(|e| Error::InvalidContinuationToken(e.to_string()))
    }
}
