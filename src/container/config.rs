use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::container::{fs, s3, ContainerListing, Error};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub enum ContainerConfig {
    #[serde(rename = "fs")]
    FS(fs::BackendConfig),
    #[serde(rename = "s3")]
    S3(s3::BackendConfig),
}

impl Default for ContainerConfig {
    fn default() -> Self {
        ContainerConfig::FS(fs::BackendConfig::default())
    }
}

impl ContainerConfig {
    pub fn to_backend(&self) -> Result<Arc<dyn ContainerListing>, Error> {
        match self {
            ContainerConfig::FS(config) => {
                info!("Using filesystem container backend");
                Ok(Arc::new(fs::Backend::new(config)))
            }
            ContainerConfig::S3(config) => {
                info!("Using S3 container backend");
                Ok(Arc::new(s3::Backend::new(config)?))
            }
        }
    }
}
