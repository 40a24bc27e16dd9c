//! Bucket Explorer library
//!
//! The pieces behind the `bucket-explorer` binary: CLI definitions, the S3
//! store and its in-memory stand-in, console styling and the three commands.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod profile;
pub mod s3;

pub use error::{Error, Result};
