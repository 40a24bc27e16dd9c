//! Integration tests for the S3 store using MinIO via testcontainers
//!
//! These tests require Docker to be running and use the testcontainers crate
//! to spin up a MinIO instance for realistic S3 testing.
//!
//! Run with: cargo test --test s3_integration
//!
//! Note: Tests are conditionally skipped if Docker is not available.

use bucket_explorer::commands::{self, DownloadOptions, DumpOptions, ListOptions, Location};
use bucket_explorer::output::Console;
use bucket_explorer::s3::{Listing, ObjectStore, S3Client, S3ClientConfig, S3Object};
use bucket_explorer::Error;
use std::time::Duration;
use tempfile::TempDir;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::minio::MinIO;

/// MinIO default credentials
const MINIO_ACCESS_KEY: &str = "minioadmin";
const MINIO_SECRET_KEY: &str = "minioadmin";

/// Helper to get MinIO endpoint URL from container
async fn get_minio_endpoint(container: &ContainerAsync<MinIO>) -> String {
    let host = container.get_host().await.expect("Failed to get container host");
    let port = container.get_host_port_ipv4(9000).await.expect("Failed to get MinIO port");
    format!("http://{}:{}", host, port)
}

/// Test helper to check if Docker is available
fn docker_available() -> bool {
    std::process::Command::new("docker")
        .arg("info")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

async fn start_minio() -> (ContainerAsync<MinIO>, S3Client) {
    let container = MinIO::default()
        .with_env_var("MINIO_ROOT_USER", MINIO_ACCESS_KEY)
        .with_env_var("MINIO_ROOT_PASSWORD", MINIO_SECRET_KEY)
        .start()
        .await
        .expect("Failed to start MinIO container");

    let endpoint = get_minio_endpoint(&container).await;

    // Wait for MinIO to be ready
    tokio::time::sleep(Duration::from_secs(2)).await;

    let config = S3ClientConfig {
        endpoint_url: Some(endpoint),
        force_path_style: true,
        region: Some("us-east-1".to_string()),
        access_key_id: Some(MINIO_ACCESS_KEY.to_string()),
        secret_access_key: Some(MINIO_SECRET_KEY.to_string()),
        ..Default::default()
    };
    let client = S3Client::with_config(config)
        .await
        .expect("Failed to create MinIO client");

    (container, client)
}

async fn seed(client: &S3Client, bucket: &str, objects: &[(&str, &[u8])]) {
    client
        .sdk()
        .create_bucket()
        .bucket(bucket)
        .send()
        .await
        .expect("Failed to create bucket");

    for (key, data) in objects {
        client
            .sdk()
            .put_object()
            .bucket(bucket)
            .key(*key)
            .body(data.to_vec().into())
            .send()
            .await
            .expect("Failed to put object");
    }
}

async fn list_all(client: &S3Client, bucket: &str, prefix: &str) -> Result<Vec<S3Object>, Error> {
    let mut listing = Listing::new(client, bucket, prefix);
    let mut objects = Vec::new();
    while let Some(page) = listing.next_page().await {
        objects.extend(page?);
    }
    Ok(objects)
}

#[tokio::test]
async fn test_list_objects_with_prefix() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let (_container, client) = start_minio().await;
    seed(
        &client,
        "files-bucket",
        &[
            ("logs/2022-01-01/a.json", &b"[]"[..]),
            ("logs/2022-01-02/b.json", &b"[]"[..]),
            ("logs-old/c.json", &b"[]"[..]),
            ("root.txt", &b"root file"[..]),
        ],
    )
    .await;

    let all = list_all(&client, "files-bucket", "").await.unwrap();
    assert_eq!(all.len(), 4);

    // no delimiter: nested keys are listed, not folded into folders
    let mut keys: Vec<String> = list_all(&client, "files-bucket", "logs/")
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.key)
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["logs/2022-01-01/a.json", "logs/2022-01-02/b.json"]);

    let logs = list_all(&client, "files-bucket", "logs").await.unwrap();
    assert_eq!(logs.len(), 3);
}

#[tokio::test]
async fn test_listing_follows_pagination() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let (_container, client) = start_minio().await;
    let client = client.with_page_size(10);

    let keys: Vec<String> = (0..25).map(|i| format!("file-{:04}.txt", i)).collect();
    let objects: Vec<(&str, &[u8])> = keys.iter().map(|k| (k.as_str(), &b"x"[..])).collect();
    seed(&client, "pagination-test", &objects).await;

    let mut listing = Listing::new(&client, "pagination-test", "");
    let mut sizes = Vec::new();
    let mut listed = Vec::new();
    while let Some(page) = listing.next_page().await {
        let page = page.unwrap();
        sizes.push(page.len());
        listed.extend(page);
    }
    assert_eq!(sizes, vec![10, 10, 5]);
    assert!(listed.iter().all(|o| o.size == 1));

    let first = client.list_page("pagination-test", "", None).await.unwrap();
    let token = first.next_token.expect("first page should be truncated");
    let second = client
        .list_page("pagination-test", "", Some(&token))
        .await
        .unwrap();
    assert_eq!(second.objects[0].key, "file-0010.txt");
}

#[tokio::test]
async fn test_get_and_stream_object() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let (_container, client) = start_minio().await;

    // 5 MB, big enough to arrive in several chunks
    let large: Vec<u8> = (0..5 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    seed(&client, "data-bucket", &[("big/blob.bin", large.as_slice())]).await;

    let fetched = client.get_object("data-bucket", "big/blob.bin").await.unwrap();
    assert_eq!(fetched.as_ref(), large.as_slice());

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blob.bin");
    let written = client
        .download_to_file("data-bucket", "big/blob.bin", &path)
        .await
        .unwrap();
    assert_eq!(written, large.len() as u64);
    assert_eq!(std::fs::read(&path).unwrap(), large);
}

#[tokio::test]
async fn test_missing_bucket_is_storage_error() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let (_container, client) = start_minio().await;

    let err = list_all(&client, "does-not-exist", "").await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)), "unexpected error: {:?}", err);
}

#[tokio::test]
async fn test_commands_end_to_end() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }

    let (_container, client) = start_minio().await;
    seed(
        &client,
        "events",
        &[
            ("2022/01/a.json", &br#"[{"id":1,"kind":"x","extra":true}]"#[..]),
            ("2022/01/b.json", &br#"[{"id":2}]"#[..]),
        ],
    )
    .await;
    let location = Location::new("events", "2022/01/");

    let mut console = Console::plain(Vec::new());
    let count = commands::list(&client, &mut console, &location, ListOptions::default())
        .await
        .unwrap();
    assert_eq!(count, 2);

    let mut console = Console::plain(Vec::new());
    let options = DumpOptions {
        keys: vec!["id".to_string(), "kind".to_string()],
        text: false,
    };
    commands::dump(&client, &mut console, &location, &options)
        .await
        .unwrap();
    let out = String::from_utf8(console.into_inner()).unwrap();
    assert!(out.contains(r#"{"id": 1, "kind": "x"}"#));
    assert!(out.contains(r#"{"id": 2, "kind": null}"#));

    let dir = TempDir::new().unwrap();
    let mut console = Console::plain(Vec::new());
    let summary = commands::download(
        &client,
        &mut console,
        &location,
        &DownloadOptions {
            target: dir.path().join("out"),
            new_dir: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(summary.files.len(), 2);
    assert_eq!(
        std::fs::read(dir.path().join("out").join("b.json")).unwrap(),
        br#"[{"id":2}]"#
    );

    let mut console = Console::plain(Vec::new());
    let summary = commands::download(
        &client,
        &mut console,
        &location,
        &DownloadOptions {
            target: dir.path().to_path_buf(),
            raw: true,
            merge: true,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let merged = std::fs::read(summary.merged.unwrap()).unwrap();
    assert_eq!(merged.iter().filter(|b| **b == b'\n').count(), 2);
}
