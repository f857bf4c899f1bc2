
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;
use tracing::{debug, instrument};

use crate::container::{paginate_sorted, ContainerListing, Error, Segment, SegmentRequest};

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct BackendConfig {
    pub root_dir: String,
}

/// Exposes a local directory tree as a container. Every regular file is a
/// blob whose name is its `/`-separated path relative to the root.
#[derive(Clone)]
pub struct Backend {
    root: PathBuf,
}

impl Debug for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FSBackend").finish()
    }
}

impl Backend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            root: PathBuf::from(&config.root_dir),
        }
    }

    async fn walk(&self) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut read_dir = match fs::read_dir(&dir).await {
                Ok(rd) => rd,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = read_dir.next_entry().await? {
                let file_type = entry.file_type().await?;
                let path = entry.path();
                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    if let Some(name) = self.blob_name(&path) {
                        names.push(name);
                    }
                }
            }
        }

        names.sort_unstable();
        Ok(names)
    }

    fn blob_name(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts = relative
            .components()
            .map(|component| component.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;
        Some(parts.join("/"))
    }
}

#[async_trait]
impl ContainerListing for Backend {
    #[instrument(skip(self))]
    async fn list_segment(&self, request: SegmentRequest) -> Result<Segment, Error> {
        let names = self.walk().await?;
        let segment = paginate_sorted(&names, &request);
        debug!(
            "Listed {} of {} file(s) under '{}', next token: {:?}",
            segment.names.len(),
            names.len(),
            self.root.display(),
            segment.next_token
        );
        Ok(segment)
    }
}
