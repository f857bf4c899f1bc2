use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::container::{paginate_sorted, ContainerListing, Error, Segment, SegmentRequest};

/// In-memory container, mostly useful for tests and local tooling.
#[derive(Clone, Debug, Default)]
pub struct Backend {
    names: Arc<RwLock<BTreeSet<String>>>,
}

impl Backend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(Into::into).collect::<BTreeSet<String>>();
        Self {
            names: Arc::new(RwLock::new(names)),
        }
    }

    pub async fn insert(&self, name: &str) {
        self.names.write().await.insert(name.to_string());
    }

    pub async fn remove(&self, name: &str) -> bool {
        self.names.write().await.remove(name)
    }

    pub async fn len(&self) -> usize {
        self.names.read().await.len()
    }
}

#[async_trait]
impl ContainerListing for Backend {
    #[instrument(skip(self))]
    async fn list_segment(&self, request: SegmentRequest) -> Result<Segment, Error> {
        let names = self.names.read().await;
        let segment = paginate_sorted(names.iter(), &request);
        debug!(
            "Listed {} name(s), next token: {:?}",
            segment.names.len(),
            segment.next_token
        );
        Ok(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_remove() {
        let backend = Backend::new();
        backend.insert("b").await;
        backend.insert("a").await;
        backend.insert("a").await;
        assert_eq!(backend.len().await, 2);

        assert!(backend.remove("a").await);
        assert!(!backend.remove("a").await);
        assert_eq!(backend.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_segment_is_sorted() {
        let backend = Backend::with_names(["c", "a", "b"]);

        let segment = backend
            .list_segment(SegmentRequest {
                page_size: 2,
                ..SegmentRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(segment.names, vec!["a", "b"]);
        assert_eq!(segment.next_token, Some("b".to_string()));

        let segment = backend
            .list_segment(SegmentRequest {
                continuation_token: segment.next_token,
                page_size: 2,
                ..SegmentRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(segment.names, vec!["c"]);
        assert!(segment.is_last());
    }

    #[tokio::test]
    async fn test_list_segment_empty() {
        let backend = Backend::new();
        let segment = backend
            .list_segment(SegmentRequest {
                page_size: 5000,
                ..SegmentRequest::default()
            })
            .await
            .unwrap();
        assert!(segment.names.is_empty());
        assert!(segment.is_last());
    }
}
