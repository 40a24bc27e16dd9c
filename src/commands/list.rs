//! `list`: print the keys under a prefix

use std::io::Write;

use crate::commands::Location;
use crate::error::Result;
use crate::output::Console;
use crate::s3::{Listing, ObjectStore, S3Object};

#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Append size and last-modified time to each key
    pub long: bool,
}

/// Print a title and one line per matching key, page by page as the listing
/// arrives. Returns the number of keys.
pub async fn list<S, W>(
    store: &S,
    console: &mut Console<W>,
    location: &Location,
    options: ListOptions,
) -> Result<usize>
where
    S: ObjectStore,
    W: Write,
{
    console.title(&format!("Listing bucket `{}`", location.bucket))?;

    let mut listing = Listing::new(store, &location.bucket, &location.prefix);
    let mut count = 0;
    while let Some(page) = listing.next_page().await {
        for object in page? {
            if options.long {
                console.item(&long_line(&object))?;
            } else {
                console.item(&object.key)?;
            }
            count += 1;
        }
    }

    tracing::info!("Listed {} objects", count);
    Ok(count)
}

fn long_line(object: &S3Object) -> String {
    let modified = object
        .last_modified
        .map(|d| d.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());
    format!("{}\t{}\t{}", object.key, object.size_string(), modified)
}
