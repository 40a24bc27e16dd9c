//! In-process object store

use std::collections::HashMap;
use std::io;
use std::path::Path;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::s3::store::{ListPage, ObjectStore};
use crate::s3::types::S3Object;

/// Keys per listing page, matching the S3 default
const DEFAULT_PAGE_SIZE: usize = 1000;

/// An [`ObjectStore`] backed by memory.
///
/// Objects are listed in insertion order, not sorted, the same way a real
/// backend is free to order its listings. Continuation tokens are offsets
/// into that order.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    buckets: HashMap<String, Vec<(String, Bytes)>>,
    page_size: usize,
    failing_page: Option<usize>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            failing_page: None,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how many keys each listing page returns
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make the listing request for page `page` (0-based) fail, as a dropped
    /// connection would
    pub fn fail_listing_at_page(&mut self, page: usize) {
        self.failing_page = Some(page);
    }

    /// Create an empty bucket
    pub fn create_bucket(&mut self, bucket: &str) {
        self.buckets.entry(bucket.to_string()).or_default();
    }

    /// Insert or replace an object, creating the bucket if needed.
    /// A replaced object keeps its listing position.
    pub fn put_object(&mut self, bucket: &str, key: &str, data: impl Into<Bytes>) {
        let objects = self.buckets.entry(bucket.to_string()).or_default();
        let data = data.into();
        match objects.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = data,
            None => objects.push((key.to_string(), data)),
        }
    }

    fn bucket(&self, bucket: &str) -> Result<&[(String, Bytes)]> {
        self.buckets
            .get(bucket)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::NoSuchBucket(bucket.to_string()))
    }

    fn lookup(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.bucket(bucket)?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, data)| data.clone())
            .ok_or_else(|| Error::NoSuchKey {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}

impl ObjectStore for MemoryStore {
    async fn list_page(&self, bucket: &str, prefix: &str, token: Option<&str>) -> Result<ListPage> {
        let matching: Vec<&(String, Bytes)> = self
            .bucket(bucket)?
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .collect();

        let start = match token {
            Some(token) => token.parse::<usize>().map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid continuation token `{}`", token),
                )
            })?,
            None => 0,
        };
        if self.failing_page == Some(start / self.page_size) {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                format!("listing of {}/{} interrupted", bucket, prefix),
            )
            .into());
        }

        let end = (start + self.page_size).min(matching.len());
        let objects = matching
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .map(|(key, data)| S3Object::new(key.as_str(), data.len() as u64))
            .collect();
        let next_token = (end < matching.len()).then(|| end.to_string());

        Ok(ListPage { objects, next_token })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.lookup(bucket, key)
    }

    async fn download_to_file(&self, bucket: &str, key: &str, path: &Path) -> Result<u64> {
        let data = self.lookup(bucket, key)?;
        tokio::fs::write(path, &data).await?;
        Ok(data.len() as u64)
    }
}
