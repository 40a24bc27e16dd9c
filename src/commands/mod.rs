//! The `list`, `dump` and `download` commands
//!
//! Each command takes an [`ObjectStore`](crate::s3::ObjectStore), a
//! [`Console`](crate::output::Console) and a [`Location`], processes matching
//! objects one at a time and stops at the first error.

pub mod download;
pub mod dump;
pub mod list;

pub use download::{download, merge_file_name, DownloadOptions, DownloadSummary};
pub use dump::{dump, project, render_record, DumpOptions};
pub use list::{list, ListOptions};

use crate::error::{Error, Result};
use crate::s3::S3Url;

/// Bucket plus key prefix the commands operate on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub bucket: String,
    pub prefix: String,
}

impl Location {
    pub fn new(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Build a location from the `<bucket>` argument and `--prefix`.
    ///
    /// `bucket` may be a plain name or an S3 URL; a URL's key becomes the
    /// prefix, and giving a different non-empty `--prefix` as well is an error.
    pub fn resolve(bucket: &str, prefix: &str) -> Result<Self> {
        let Some(url) = S3Url::parse(bucket) else {
            return Ok(Self::new(bucket, prefix));
        };

        if url.key.is_empty() || url.key == prefix {
            return Ok(Self::new(url.bucket, prefix));
        }
        if !prefix.is_empty() {
            return Err(Error::ConflictingPrefix {
                url: url.to_s3_url(),
                url_prefix: url.key,
                prefix: prefix.to_string(),
            });
        }
        Ok(Self::new(url.bucket, url.key))
    }
}
