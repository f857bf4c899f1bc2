use serde::Deserialize;
use std::fs;
use std::path::Path;

mod error;

use crate::container::ContainerConfig;
use crate::enumerator::DEFAULT_PAGE_SIZE;
pub use error::Error;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ListingConfig {
    #[serde(default = "ListingConfig::default_page_size")]
    pub page_size: u16,
}

impl Default for ListingConfig {
    fn default() -> Self {
        ListingConfig {
            page_size: ListingConfig::default_page_size(),
        }
    }
}

impl ListingConfig {
    fn default_page_size() -> u16 {
        DEFAULT_PAGE_SIZE
    }
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let config_str = fs::read_to_string(path)?;
        Self::load_from_str(&config_str)
    }

    pub fn load_from_str(slice: &str) -> Result<Self, Error> {
        let config: Configuration = toml::from_str(slice)?;

        if config.listing.page_size == 0 {
            return Err(Error::InvalidValue(
                "listing.page_size must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{fs as fs_container, s3};

    #[test]
    fn test_load_minimal_config() {
        let config = Configuration::load_from_str("").unwrap();

        assert_eq!(config.container, ContainerConfig::default());
        assert_eq!(config.listing.page_size, 5000);
    }

    #[test]
    fn test_load_fs_container() {
        let config = r#"
        [container.fs]
        root_dir = "/data/blobs"

        [listing]
        page_size = 100
        "#;

        let config = Configuration::load_from_str(config).unwrap();

        assert_eq!(
            config.container,
            ContainerConfig::FS(fs_container::BackendConfig {
                root_dir: "/data/blobs".to_string(),
            })
        );
        assert_eq!(config.listing.page_size, 100);
    }

    #[test]
    fn test_load_s3_container_with_defaults() {
        let config = r#"
        [container.s3]
        bucket = "test-bucket"
        region = "us-east-1"
        endpoint = "http://localhost:9000"
        access_key_id = "test-key"
        secret_key = "test-secret"
        "#;

        let config = Configuration::load_from_str(config).unwrap();

        match config.container {
            ContainerConfig::S3(ref cfg) => {
                assert_eq!(cfg.bucket, "test-bucket");
                assert_eq!(cfg.region, "us-east-1");
                assert_eq!(cfg.endpoint, "http://localhost:9000");
                assert_eq!(cfg.access_key_id, "test-key");
                assert_eq!(cfg.secret_key, "test-secret");
                assert_eq!(cfg.key_prefix, "");
                assert_eq!(cfg.operation_timeout_secs, 30);
                assert_eq!(cfg.max_attempts, 3);
            }
            ContainerConfig::FS(_) => panic!("Expected S3 container"),
        }
        assert_eq!(config.listing, ListingConfig::default());
        assert_ne!(
            config.container,
            ContainerConfig::S3(s3::BackendConfig::default())
        );
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let config = r#"
        [listing]
        page_size = 0
        "#;

        let result = Configuration::load_from_str(config);
        assert!(matches!(result, Err(Error::InvalidValue(_))));
    }

    #[test]
    fn test_rejects_malformed_file() {
        let result = Configuration::load_from_str("[container.fs");
        assert!(matches!(result, Err(Error::ConfigurationFileFormat(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Configuration::load("/nonexistent/blob-enumerator.toml");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
