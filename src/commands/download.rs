//! `download`: copy objects to a local directory

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::commands::Location;
use crate::error::{Error, Result};
use crate::output::Console;
use crate::s3::{Listing, ObjectStore};

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Directory the files are written to
    pub target: PathBuf,
    /// Create `target` (and its parents) if missing
    pub new_dir: bool,
    /// Fetch whole payloads into memory before writing instead of streaming
    pub raw: bool,
    /// With `raw`, write all payloads into one newline-separated file
    pub merge: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            target: PathBuf::from("."),
            new_dir: false,
            raw: false,
            merge: false,
        }
    }
}

/// What a download produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// One path per downloaded object, in download order (may repeat on
    /// file name collisions)
    pub files: Vec<PathBuf>,
    /// The merge file, in merge mode
    pub merged: Option<PathBuf>,
    pub bytes: u64,
}

/// Name of the merge file: `{bucket}__{prefix}.json` with `/` replaced by `__`
pub fn merge_file_name(bucket: &str, prefix: &str) -> String {
    format!("{}__{}.json", bucket, prefix).replace('/', "__")
}

/// Download every matching object into `options.target`.
///
/// Files are named after the last segment of their key, so keys that only
/// differ by directory overwrite each other; the later one wins.
pub async fn download<S, W>(
    store: &S,
    console: &mut Console<W>,
    location: &Location,
    options: &DownloadOptions,
) -> Result<DownloadSummary>
where
    S: ObjectStore,
    W: Write,
{
    console.title(&format!(
        "Downloading content in bucket `{}` with prefix `{}`",
        location.bucket, location.prefix
    ))?;

    prepare_target(&options.target, options.new_dir).await?;

    if options.merge && !options.raw {
        tracing::warn!("--merge has no effect without --raw; downloading individual files");
    }

    let mut summary = DownloadSummary::default();
    let mut merged: Option<Vec<u8>> = (options.raw && options.merge).then(Vec::new);
    let mut written_by: HashMap<String, String> = HashMap::new();
    let mut count = 0;

    let mut listing = Listing::new(store, &location.bucket, &location.prefix);
    while let Some(page) = listing.next_page().await {
        for object in page? {
            count += 1;

            if let Some(buffer) = merged.as_mut() {
                let data = store.get_object(&location.bucket, &object.key).await?;
                buffer.extend_from_slice(&data);
                buffer.push(b'\n');
                summary.bytes += data.len() as u64;
                tracing::debug!("Merged {} ({} bytes)", object.key, data.len());
                continue;
            }

            let Some(file_name) = object.file_name() else {
                tracing::warn!("Skipping `{}`: key has no usable file name", object.key);
                continue;
            };
            if let Some(previous) = written_by.insert(file_name.to_string(), object.key.clone()) {
                tracing::warn!(
                    "`{}` and `{}` both map to `{}`; the later one overwrites the earlier",
                    previous,
                    object.key,
                    file_name
                );
            }

            let path = options.target.join(file_name);
            let written = if options.raw {
                let data = store.get_object(&location.bucket, &object.key).await?;
                tokio::fs::write(&path, &data).await?;
                data.len() as u64
            } else {
                store
                    .download_to_file(&location.bucket, &object.key, &path)
                    .await?
            };

            console.item(&format!("Downloaded `{}` to `{}`", object.key, path.display()))?;
            summary.bytes += written;
            summary.files.push(path);
        }
    }

    if let Some(buffer) = merged {
        let path = options
            .target
            .join(merge_file_name(&location.bucket, &location.prefix));
        tokio::fs::write(&path, &buffer).await?;
        console.item(&format!(
            "Downloaded `{}/{}` to `{}`",
            location.bucket,
            location.prefix,
            path.display()
        ))?;
        summary.merged = Some(path);
    }

    tracing::info!(
        "Downloaded {} objects ({} bytes) from {}",
        count,
        summary.bytes,
        location.bucket
    );
    Ok(summary)
}

async fn prepare_target(target: &Path, new_dir: bool) -> Result<()> {
    if new_dir {
        tokio::fs::create_dir_all(target).await?;
        return Ok(());
    }

    match tokio::fs::metadata(target).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::MissingTarget(target.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(Error::MissingTarget(target.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}
