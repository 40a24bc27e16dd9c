//! Error type shared by the storage layer and the commands
//!
//! Failures coming from the storage client, the filesystem or the decoders are
//! wrapped transparently so the message the user sees is the underlying one.

use std::path::PathBuf;

use aws_sdk_s3::primitives::ByteStreamError;
use thiserror::Error;

/// Errors produced while listing, dumping or downloading objects
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] aws_sdk_s3::Error),

    #[error(transparent)]
    Body(#[from] ByteStreamError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The payload parsed as JSON but the top-level value is not an array
    #[error("expected a JSON array of records in `{key}`")]
    NotAnArray { key: String },

    /// A record selected for key projection is not a JSON object
    #[error("record {index} in `{key}` is not a JSON object")]
    NotARecord { key: String, index: usize },

    #[error("target directory `{}` does not exist (use --new-dir to create it)", .0.display())]
    MissingTarget(PathBuf),

    #[error("bucket `{0}` does not exist")]
    NoSuchBucket(String),

    #[error("object `{key}` does not exist in bucket `{bucket}`")]
    NoSuchKey { bucket: String, key: String },

    #[error("prefix given twice: `{url}` already names prefix `{url_prefix}`, got --prefix `{prefix}`")]
    ConflictingPrefix {
        url: String,
        url_prefix: String,
        prefix: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
