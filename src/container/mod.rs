mod config;
mod error;
pub mod fs;
pub mod memory;
pub mod s3;

use async_trait::async_trait;
pub use config::ContainerConfig;
pub use error::Error;

/// Parameters of a single listing round trip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentRequest {
    pub prefix: Option<String>,
    pub continuation_token: Option<String>,
    pub page_size: u16,
}

/// One page of blob names, in ascending order.
///
/// `next_token` is `None` once the container has no names beyond this segment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Segment {
    pub names: Vec<String>,
    pub next_token: Option<String>,
}

impl Segment {
    pub fn is_last(&self) -> bool {
        self.next_token.is_none()
    }
}

/// A remote (or local) container able to answer paginated listing requests.
///
/// Implementations must return names in ascending lexicographic order, at most
/// `page_size` of them, all starting with the requested prefix. The returned
/// token is handed back verbatim on the next request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContainerListing: Send + Sync {
    async fn list_segment(&self, request: SegmentRequest) -> Result<Segment, Error>;
}

/// Pages through an already sorted name sequence using the last returned name
/// as the marker for the next segment.
pub(crate) fn paginate_sorted<'a, I>(names: I, request: &SegmentRequest) -> Segment
where
    I: IntoIterator<Item = &'a String>,
{
    let prefix = request.prefix.as_deref().unwrap_or_default();
    let marker = request.continuation_token.as_deref();

    let mut matching = names
        .into_iter()
        .skip_while(|name| marker.is_some_and(|last| name.as_str() <= last))
        .filter(|name| name.starts_with(prefix));

    let names: Vec<String> = matching
        .by_ref()
        .take(usize::from(request.page_size))
        .cloned()
        .collect();

    let next_token = if matching.next().is_some() {
        names.last().cloned()
    } else {
        None
    };

    Segment { names, next_token }
}
