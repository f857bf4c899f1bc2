//! Lazy, resumable enumeration of a container's blob names.
//!
//! The container answers one segment of names per round trip. The enumerator
//! stitches those segments into a single ascending sequence, applies the
//! client-side `[min, max)` name bounds and hands out one name at a time
//! together with a [`ContinuationToken`] that resumes right after it.

mod continuation_token;
mod error;

use std::collections::VecDeque;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use futures_util::stream::{self, Stream};
use tracing::{debug, instrument};

use crate::container::{ContainerListing, Segment, SegmentRequest};
pub use continuation_token::ContinuationToken;
pub use error::Error;

pub const DEFAULT_PAGE_SIZE: u16 = 5000;

/// A blob name and the token resuming the enumeration right after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobItem {
    pub name: String,
    pub continuation_token: ContinuationToken,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub initial_continuation_token: Option<ContinuationToken>,
    /// Inclusive lower bound.
    pub min_blob_name: Option<String>,
    /// Exclusive upper bound.
    pub max_blob_name: Option<String>,
    pub prefix: Option<String>,
    pub page_size: u16,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            initial_continuation_token: None,
            min_blob_name: None,
            max_blob_name: None,
            prefix: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Immutable description of an enumeration over a container.
///
/// Every call to [`BlobContainerEnumerable::enumerator`] starts an independent
/// cursor at the initial continuation token.
#[derive(Clone)]
pub struct BlobContainerEnumerable {
    container: Arc<dyn ContainerListing>,
    initial_continuation_token: ContinuationToken,
    min_blob_name: Option<String>,
    max_blob_name: Option<String>,
    prefix: Option<String>,
    page_size: u16,
}

impl Debug for BlobContainerEnumerable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobContainerEnumerable")
            .field("initial_continuation_token", &self.initial_continuation_token)
            .field("min_blob_name", &self.min_blob_name)
            .field("max_blob_name", &self.max_blob_name)
            .field("prefix", &self.prefix)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl BlobContainerEnumerable {
    pub fn new(
        container: Arc<dyn ContainerListing>,
        initial_continuation_token: Option<ContinuationToken>,
        min_blob_name: Option<String>,
        max_blob_name: Option<String>,
        prefix: Option<String>,
        page_size: u16,
    ) -> Result<Self, Error> {
        if page_size == 0 {
            return Err(Error::InvalidConfiguration(
                "Page size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            container,
            initial_continuation_token: initial_continuation_token.unwrap_or_default(),
            min_blob_name,
            max_blob_name,
            prefix,
            page_size,
        })
    }

    pub fn with_options(
        container: Arc<dyn ContainerListing>,
        options: Options,
    ) -> Result<Self, Error> {
        Self::new(
            container,
            options.initial_continuation_token,
            options.min_blob_name,
            options.max_blob_name,
            options.prefix,
            options.page_size,
        )
    }

    pub fn enumerator(&self) -> BlobContainerEnumerator {
        BlobContainerEnumerator::new(self.clone())
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<BlobItem, Error>> {
        BlobContainerEnumerator::new(self).into_stream()
    }

    /// Materializes the whole bounded sequence.
    pub async fn to_vec(&self) -> Result<Vec<BlobItem>, Error> {
        self.enumerator().collect().await
    }

    fn is_below_min(&self, name: &str) -> bool {
        self.min_blob_name
            .as_deref()
            .is_some_and(|min| name < min)
    }

    fn is_at_or_above_max(&self, name: &str) -> bool {
        self.max_blob_name
            .as_deref()
            .is_some_and(|max| name >= max)
    }
}

/// Single-pass cursor over a [`BlobContainerEnumerable`].
///
/// Advancing performs at most one listing round trip per exhausted segment.
/// A failed round trip leaves the cursor untouched, so the next call retries
/// the same segment.
pub struct BlobContainerEnumerator {
    enumerable: BlobContainerEnumerable,
    // token that fetched the buffered segment
    segment_token: Option<String>,
    // token for the next fetch
    next_segment_token: Option<String>,
    // names up to and including this one were handed out before resuming
    skip_through: Option<String>,
    buffer: VecDeque<String>,
    finished: bool,
    current: Option<BlobItem>,
}

impl Debug for BlobContainerEnumerator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobContainerEnumerator")
            .field("segment_token", &self.segment_token)
            .field("next_segment_token", &self.next_segment_token)
            .field("buffered", &self.buffer.len())
            .field("finished", &self.finished)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl BlobContainerEnumerator {
    fn new(enumerable: BlobContainerEnumerable) -> Self {
        let initial = &enumerable.initial_continuation_token;
        let segment_token = initial.segment().map(ToString::to_string);
        let skip_through = initial.after().map(ToString::to_string);

        Self {
            segment_token: segment_token.clone(),
            next_segment_token: segment_token,
            skip_through,
            buffer: VecDeque::new(),
            finished: false,
            current: None,
            enumerable,
        }
    }

    /// The most recently yielded item.
    pub fn current(&self) -> Option<&BlobItem> {
        self.current.as_ref()
    }

    /// Token resuming right after the last yielded item, or the initial token
    /// when nothing has been yielded yet.
    pub fn continuation_token(&self) -> ContinuationToken {
        self.current.as_ref().map_or_else(
            || self.enumerable.initial_continuation_token.clone(),
            |item| item.continuation_token.clone(),
        )
    }

    pub fn is_finished(&self) -> bool {
        self.finished && self.buffer.is_empty()
    }

    /// Advances to the next name, fetching segments from the container as
    /// needed. Returns `Ok(None)` once the bounded sequence is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub async fn next(&mut self) -> Result<Option<BlobItem>, Error> {
        loop {
            if let Some(name) = self.buffer.pop_front() {
                let item = BlobItem {
                    continuation_token: ContinuationToken::new(
                        self.segment_token.clone(),
                        Some(name.clone()),
                    ),
                    name,
                };
                self.current = Some(item.clone());
                return Ok(Some(item));
            }

            if self.finished {
                return Ok(None);
            }

            self.fetch_segment().await?;
        }
    }

    /// Advances up to `count` times and returns how many items were consumed.
    pub async fn skip(&mut self, count: usize) -> Result<usize, Error> {
        let mut skipped = 0;
        while skipped < count && self.next().await?.is_some() {
            skipped += 1;
        }
        Ok(skipped)
    }

    /// Drains the remaining items.
    pub async fn collect(mut self) -> Result<Vec<BlobItem>, Error> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<BlobItem, Error>> {
        stream::try_unfold(self, |mut enumerator| async move {
            let item = enumerator.next().await?;
            Ok::<_, Error>(item.map(|item| (item, enumerator)))
        })
    }

    #[instrument(skip(self), fields(prefix = ?self.enumerable.prefix, token = ?self.next_segment_token))]
    async fn fetch_segment(&mut self) -> Result<(), Error> {
        let request = SegmentRequest {
            prefix: self.enumerable.prefix.clone(),
            continuation_token: self.next_segment_token.clone(),
            page_size: self.enumerable.page_size,
        };

        let Segment { names, next_token } = self.enumerable.container.list_segment(request).await?;
        let fetched = names.len();

        self.segment_token = self.next_segment_token.take();
        self.finished = next_token.is_none();
        self.next_segment_token = next_token;

        for name in names {
            if let Some(last) = &self.skip_through {
                if name.as_str() <= last.as_str() {
                    continue;
                }
                self.skip_through = None;
            }

            if self.enumerable.is_below_min(&name) {
                continue;
            }

            if self.enumerable.is_at_or_above_max(&name) {
                debug!("Reached max blob name at '{name}', stopping enumeration");
                self.finished = true;
                break;
            }

            self.buffer.push_back(name);
        }

        debug!(
            "Fetched {fetched} name(s), kept {}, finished: {}",
            self.buffer.len(),
            self.finished
        );
        Ok(())
    }
}
