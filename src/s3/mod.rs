//! S3 access module
//!
//! - [`client::S3Client`] - AWS SDK backed store
//! - [`memory::MemoryStore`] - in-process store used by tests
//! - [`store::ObjectStore`] - the trait both implement, walked with [`store::Listing`]
//! - [`credentials::ProfileManager`] - AWS profile discovery
//! - [`types`] - S3 data types (S3Object, S3Url)

pub mod client;
pub mod credentials;
pub mod memory;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use client::{S3Client, S3ClientConfig};
pub use credentials::{AwsProfile, ProfileManager, ProfileType};
pub use memory::MemoryStore;
pub use store::{ListPage, Listing, ObjectStore};
pub use types::{S3Object, S3Url};
