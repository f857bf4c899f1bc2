
use std::fmt::{Debug, Formatter};
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{timeout::TimeoutConfig, BehaviorVersion, Credentials, Region};
use aws_sdk_s3::{Client as S3Client, Config as S3Config};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::container::{ContainerListing, Error, Segment, SegmentRequest};

/// `ListObjectsV2` never returns more than this many keys per call.
const MAX_KEYS_PER_REQUEST: u16 = 1000;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub access_key_id: String,
    pub secret_key: String,
    pub endpoint: String,
    pub bucket: String,
    pub region: String,
    pub key_prefix: String,
    pub operation_timeout_secs: u64,
    pub max_attempts: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            access_key_id: String::new(),
            secret_key: String::new(),
            endpoint: String::new(),
            bucket: String::new(),
            region: String::new(),
            key_prefix: String::new(),
            operation_timeout_secs: 30,
            max_attempts: 3,
        }
    }
}

#[derive(Clone)]
pub struct Backend {
    s3_client: S3Client,
    bucket: String,
    key_prefix: String,
}

impl Debug for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Backend")
            .field("bucket", &self.bucket)
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl Backend {
    pub fn new(config: &BackendConfig) -> Result<Self, Error> {
        if config.bucket.is_empty() {
            return Err(Error::Configuration("S3 bucket must be set".to_string()));
        }

        if config.max_attempts == 0 {
            return Err(Error::Configuration(
                "S3 max attempts must be at least 1".to_string(),
            ));
        }

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_key,
            None,
            None,
            "custom",
        );

        let timeout = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(config.operation_timeout_secs))
            .build();

        let retry = RetryConfig::standard().with_max_attempts(config.max_attempts);

        let client_config = S3Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .timeout_config(timeout)
            .retry_config(retry)
            .force_path_style(true)
            .build();

        Ok(Self {
            s3_client: S3Client::from_conf(client_config),
            bucket: config.bucket.clone(),
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn full_key(&self, path: &str) -> String {
        if self.key_prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.key_prefix, path)
        }
    }

    fn blob_name(&self, key: String) -> Option<String> {
        if self.key_prefix.is_empty() {
            return Some(key);
        }

        key.strip_prefix(&self.key_prefix)
            .and_then(|name| name.strip_prefix('/'))
            .map(ToString::to_string)
    }
}

#[async_trait]
impl ContainerListing for Backend {
    #[instrument(skip(self))]
    async fn list_segment(&self, request: SegmentRequest) -> Result<Segment, Error> {
        let full_prefix = self.full_key(request.prefix.as_deref().unwrap_or_default());
        let max_keys = request.page_size.min(MAX_KEYS_PER_REQUEST);

        let res = self
            .s3_client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(full_prefix)
            .max_keys(i32::from(max_keys))
            .set_continuation_token(request.continuation_token)
            .send()
            .await?;

        let names = res
            .contents
            .unwrap_or_default()
            .into_iter()
            .filter_map(|object| object.key)
            .filter_map(|key| self.blob_name(key))
            .collect::<Vec<_>>();

        let next_token = if res.is_truncated.unwrap_or(false) {
            res.next_continuation_token
        } else {
            None
        };

        debug!(
            "Listed {} object(s) from bucket '{}', next token: {next_token:?}",
            names.len(),
            self.bucket
        );

        Ok(Segment { names, next_token })
    }
}
