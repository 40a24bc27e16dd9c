//! S3 data types

use chrono::{DateTime, Utc};

/// A single entry of a prefix listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Object {
    pub key: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

impl S3Object {
    /// Create an entry that only carries a key and a size
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
        }
    }

    /// Last `/`-separated segment of the key, if it can name a local file.
    ///
    /// `None` for directory placeholders (`logs/`) and for `.` and `..`.
    pub fn file_name(&self) -> Option<&str> {
        match self.key.rsplit('/').next() {
            None | Some("") | Some(".") | Some("..") => None,
            Some(name) => Some(name),
        }
    }

    /// Get a human-readable size string
    pub fn size_string(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;
        const TB: u64 = GB * 1024;

        if self.size >= TB {
            format!("{:.2} TB", self.size as f64 / TB as f64)
        } else if self.size >= GB {
            format!("{:.2} GB", self.size as f64 / GB as f64)
        } else if self.size >= MB {
            format!("{:.2} MB", self.size as f64 / MB as f64)
        } else if self.size >= KB {
            format!("{:.2} KB", self.size as f64 / KB as f64)
        } else {
            format!("{} B", self.size)
        }
    }
}

impl From<&aws_sdk_s3::types::Object> for S3Object {
    fn from(obj: &aws_sdk_s3::types::Object) -> Self {
        Self {
            key: obj.key().unwrap_or_default().to_string(),
            size: obj.size().unwrap_or(0).max(0) as u64,
            last_modified: obj
                .last_modified()
                .and_then(|d| DateTime::from_timestamp(d.secs(), d.subsec_nanos())),
        }
    }
}

/// Bucket and key parsed from an S3 URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Url {
    pub bucket: String,
    pub key: String,
}

impl S3Url {
    /// Parse an S3 URL (supports s3:// and https:// formats)
    ///
    /// Plain bucket names are not URLs and yield `None`.
    pub fn parse(url: &str) -> Option<Self> {
        if let Some(rest) = url.strip_prefix("s3://") {
            let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
            if bucket.is_empty() {
                return None;
            }
            return Some(Self::new(bucket, key));
        }

        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return None;
        }

        let parsed = url::Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        if !host.ends_with(".amazonaws.com") {
            return None;
        }
        let path = parsed.path().trim_start_matches('/');

        // Virtual-hosted style: bucket.s3.region.amazonaws.com/key
        if let Some((bucket, _)) = host.split_once(".s3.") {
            if !bucket.is_empty() && !host.starts_with("s3.") {
                return Some(Self::new(bucket, path));
            }
        }

        // Path style: s3.region.amazonaws.com/bucket/key
        if host.starts_with("s3.") {
            let (bucket, key) = path.split_once('/').unwrap_or((path, ""));
            if !bucket.is_empty() {
                return Some(Self::new(bucket, key));
            }
        }

        None
    }

    fn new(bucket: &str, key: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    /// Convert to s3:// URL format
    pub fn to_s3_url(&self) -> String {
        if self.key.is_empty() {
            format!("s3://{}", self.bucket)
        } else {
            format!("s3://{}/{}", self.bucket, self.key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_strips_directories() {
        assert_eq!(S3Object::new("logs/2022-01-01/a.json", 1).file_name(), Some("a.json"));
        assert_eq!(S3Object::new("a.json", 1).file_name(), Some("a.json"));
        assert_eq!(S3Object::new("logs/.env", 1).file_name(), Some(".env"));
    }

    #[test]
    fn test_file_name_of_folder_or_dot_segment_is_none() {
        assert!(S3Object::new("logs/2022/", 0).file_name().is_none());
        assert!(S3Object::new("logs/.", 0).file_name().is_none());
        assert!(S3Object::new("logs/..", 0).file_name().is_none());
        assert!(S3Object::new("..", 0).file_name().is_none());
    }

    #[test]
    fn test_size_string() {
        assert_eq!(S3Object::new("f", 100).size_string(), "100 B");
        assert_eq!(S3Object::new("f", 1536).size_string(), "1.50 KB");
        assert_eq!(S3Object::new("f", 5 * 1024 * 1024).size_string(), "5.00 MB");
        assert_eq!(S3Object::new("f", 2 * 1024 * 1024 * 1024).size_string(), "2.00 GB");
        assert_eq!(
            S3Object::new("f", 3 * 1024 * 1024 * 1024 * 1024).size_string(),
            "3.00 TB"
        );
    }

    #[test]
    fn test_from_sdk_object() {
        let sdk = aws_sdk_s3::types::Object::builder()
            .key("exports/2024/data.json")
            .size(42)
            .build();

        let obj = S3Object::from(&sdk);
        assert_eq!(obj.key, "exports/2024/data.json");
        assert_eq!(obj.size, 42);
        assert!(obj.last_modified.is_none());
    }

    #[test]
    fn test_s3_url_parse_s3_scheme() {
        let url = S3Url::parse("s3://my-bucket/logs/2022-01-01").unwrap();
        assert_eq!(url.bucket, "my-bucket");
        assert_eq!(url.key, "logs/2022-01-01");
    }

    #[test]
    fn test_s3_url_parse_bucket_only() {
        let url = S3Url::parse("s3://my-bucket").unwrap();
        assert_eq!(url.bucket, "my-bucket");
        assert_eq!(url.key, "");

        let url = S3Url::parse("s3://my-bucket/").unwrap();
        assert_eq!(url.key, "");
    }

    #[test]
    fn test_s3_url_parse_https_virtual_hosted() {
        let url =
            S3Url::parse("https://my-bucket.s3.eu-west-1.amazonaws.com/path/to/file.txt").unwrap();
        assert_eq!(url.bucket, "my-bucket");
        assert_eq!(url.key, "path/to/file.txt");
    }

    #[test]
    fn test_s3_url_parse_https_path_style() {
        let url = S3Url::parse("https://s3.eu-west-1.amazonaws.com/my-bucket/path/to").unwrap();
        assert_eq!(url.bucket, "my-bucket");
        assert_eq!(url.key, "path/to");
    }

    #[test]
    fn test_s3_url_parse_rejects_non_urls() {
        assert!(S3Url::parse("my-bucket").is_none());
        assert!(S3Url::parse("s3://").is_none());
        assert!(S3Url::parse("https://example.com/file.txt").is_none());
        assert!(S3Url::parse("ftp://bucket/key").is_none());
        assert!(S3Url::parse("").is_none());
    }

    #[test]
    fn test_s3_url_round_trip_display() {
        let url = S3Url::parse("s3://test-bucket/folder/file.txt").unwrap();
        assert_eq!(url.to_s3_url(), "s3://test-bucket/folder/file.txt");
        let url = S3Url::parse("s3://test-bucket").unwrap();
        assert_eq!(url.to_s3_url(), "s3://test-bucket");
    }
}
