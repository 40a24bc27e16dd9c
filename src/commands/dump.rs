//! `dump`: print object payloads, optionally as filtered JSON records

use std::io::{self, Write};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::commands::Location;
use crate::error::{Error, Result};
use crate::output::Console;
use crate::s3::{Listing, ObjectStore, S3Object};

#[derive(Debug, Clone)]
pub struct DumpOptions {
    /// Keys to keep in each record; empty keeps whole records
    pub keys: Vec<String>,
    /// Print payloads verbatim instead of parsing them as JSON
    pub text: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            text: true,
        }
    }
}

/// Print every matching object. Returns the number of objects dumped.
pub async fn dump<S, W>(
    store: &S,
    console: &mut Console<W>,
    location: &Location,
    options: &DumpOptions,
) -> Result<usize>
where
    S: ObjectStore,
    W: Write,
{
    console.title(&format!(
        "Showing content in bucket `{}` with prefix `{}`",
        location.bucket, location.prefix
    ))?;

    let mut listing = Listing::new(store, &location.bucket, &location.prefix);
    let mut count = 0;
    while let Some(page) = listing.next_page().await {
        for object in page? {
            console.item(&object.key)?;
            let payload = store.get_object(&location.bucket, &object.key).await?;
            print_payload(console, &object, payload.to_vec(), options)?;
            count += 1;
        }
    }

    Ok(count)
}

fn print_payload<W: Write>(
    console: &mut Console<W>,
    object: &S3Object,
    payload: Vec<u8>,
    options: &DumpOptions,
) -> Result<()> {
    let content = String::from_utf8(payload)?;

    if options.text {
        console.line(&content)?;
        return Ok(());
    }

    let records = match serde_json::from_str::<Value>(&content)? {
        Value::Array(records) => records,
        _ => {
            return Err(Error::NotAnArray {
                key: object.key.clone(),
            })
        }
    };

    for (index, record) in records.iter().enumerate() {
        let line = if options.keys.is_empty() {
            render_record(record)?
        } else {
            let projected = project(record, &options.keys).ok_or_else(|| Error::NotARecord {
                key: object.key.clone(),
                index,
            })?;
            render_record(&projected)?
        };
        console.line(&line)?;
    }

    Ok(())
}

/// Keep only `keys` of a JSON object, in the order given.
///
/// Keys absent from the record map to `null`. Returns `None` when `record`
/// is not an object.
pub fn project(record: &Value, keys: &[String]) -> Option<Value> {
    let fields = record.as_object()?;
    let projected: Map<String, Value> = keys
        .iter()
        .map(|key| (key.clone(), fields.get(key).cloned().unwrap_or(Value::Null)))
        .collect();
    Some(Value::Object(projected))
}

/// Render a record on one line as `{"a": 1, "b": [1, 2]}`
pub fn render_record(record: &Value) -> Result<String> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    record.serialize(&mut serializer)?;
    Ok(String::from_utf8(out)?)
}

/// Compact JSON with a space after every `,` and `:`
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
