//! The storage seam the commands are written against

use std::future::Future;
use std::path::Path;

use bytes::Bytes;

use crate::error::Result;
use crate::s3::types::S3Object;

/// One page of a prefix listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub objects: Vec<S3Object>,
    /// Token to request the following page; `None` on the last page
    pub next_token: Option<String>,
}

/// Read access to a bucketed object store.
///
/// Implemented by [`crate::s3::S3Client`] for real buckets and by
/// [`crate::s3::MemoryStore`] for tests.
pub trait ObjectStore {
    /// One page of the objects in `bucket` whose key starts with `prefix`, in
    /// the order the backend returns them. An empty prefix matches everything.
    /// `token` is the `next_token` of the previous page, `None` for the first.
    fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<ListPage>> + Send;

    /// Full payload of one object
    fn get_object(&self, bucket: &str, key: &str) -> impl Future<Output = Result<Bytes>> + Send;

    /// Write one object to `path`, creating or truncating the file.
    /// Returns the number of bytes written.
    fn download_to_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> impl Future<Output = Result<u64>> + Send;
}

/// Lazy walk over a prefix listing, one page per request.
///
/// ```ignore
/// let mut listing = Listing::new(&store, "bucket", "logs/");
/// while let Some(page) = listing.next_page().await {
///     for object in page? {
///         println!("{}", object.key);
///     }
/// }
/// ```
pub struct Listing<'a, S> {
    store: &'a S,
    bucket: &'a str,
    prefix: &'a str,
    token: Option<String>,
    done: bool,
}

impl<'a, S: ObjectStore> Listing<'a, S> {
    pub fn new(store: &'a S, bucket: &'a str, prefix: &'a str) -> Self {
        Self {
            store,
            bucket,
            prefix,
            token: None,
            done: false,
        }
    }

    /// The next page, or `None` once the listing is exhausted.
    /// After an error the listing is over.
    pub async fn next_page(&mut self) -> Option<Result<Vec<S3Object>>> {
        if self.done {
            return None;
        }

        match self
            .store
            .list_page(self.bucket, self.prefix, self.token.as_deref())
            .await
        {
            Ok(page) => {
                self.token = page.next_token;
                self.done = self.token.is_none();
                Some(Ok(page.objects))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
