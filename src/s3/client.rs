//! AWS S3 client wrapper

use std::path::Path;

use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::Client;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::s3::store::{ListPage, ObjectStore};
use crate::s3::types::S3Object;

/// Connection settings for [`S3Client`].
///
/// Everything is optional: unset fields fall back to the regular AWS SDK
/// resolution (environment, `~/.aws/config`, instance metadata).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3ClientConfig {
    /// Named profile from `~/.aws/config` / `~/.aws/credentials`
    pub profile_name: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, LocalStack)
    pub endpoint_url: Option<String>,
    /// Address buckets as `endpoint/bucket` instead of `bucket.endpoint`
    pub force_path_style: bool,
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// S3 client wrapper with the read operations the commands need
pub struct S3Client {
    client: Client,
    page_size: Option<i32>,
}

impl S3Client {
    /// Create a client from explicit settings
    pub async fn with_config(config: S3ClientConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(profile) = &config.profile_name {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                None,
                None,
                "bucket-explorer-static",
            ));
        }

        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        tracing::debug!(
            "S3 client ready: profile={:?}, region={:?}, endpoint={:?}",
            config.profile_name,
            sdk_config.region(),
            config.endpoint_url
        );

        Ok(Self {
            client: Client::from_conf(builder.build()),
            page_size: None,
        })
    }

    /// Limit how many keys each listing request returns (server default: 1000)
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// The underlying SDK client, for operations this wrapper does not cover
    pub fn sdk(&self) -> &Client {
        &self.client
    }
}

impl ObjectStore for S3Client {
    async fn list_page(&self, bucket: &str, prefix: &str, token: Option<&str>) -> Result<ListPage> {
        let mut request = self.client.list_objects_v2().bucket(bucket);
        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }
        if let Some(page_size) = self.page_size {
            request = request.max_keys(page_size);
        }
        if let Some(token) = token {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(aws_sdk_s3::Error::from)?;
        let objects: Vec<S3Object> = response.contents().iter().map(S3Object::from).collect();

        let next_token = if response.is_truncated() == Some(true) {
            response.next_continuation_token().map(str::to_string)
        } else {
            None
        };

        tracing::debug!(
            "Listed {} objects in {}/{} (more: {})",
            objects.len(),
            bucket,
            prefix,
            next_token.is_some()
        );
        Ok(ListPage { objects, next_token })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;

        let data = response.body.collect().await?;
        Ok(data.into_bytes())
    }

    async fn download_to_file(&self, bucket: &str, key: &str, path: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;

        let mut file = tokio::fs::File::create(path).await?;
        let mut written = 0_u64;
        while let Some(chunk) = response.body.try_next().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}
