// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the HTTP fetcher using wiremock.
//!
//! Covers:
//! - Streaming bodies through `download()`
//! - HTTP error statuses
//! - Progress reporting through `TerminalProgress`

use std::sync::Mutex;

use futures_util::StreamExt;
use grit::error::UpdateError;
use grit::net::{HttpFetcher, TerminalProgress};
use grit::update::download::{ByteFetcher, ProgressSink, download};
use grit::update::release::Asset;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn asset_at(server: &MockServer, name: &str, size: u64) -> Asset {
    Asset {
        name: name.to_string(),
        size,
        url: format!("{}/assets/{name}", server.uri()),
    }
}

#[tokio::test]
async fn test_fetch_streams_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assets/blob"))
        .and(header("accept", "application/octet-stream"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8; 64]))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new();
    let url = format!("{}/assets/blob", server.uri());
    let response = fetcher.fetch(&url).await.unwrap();

    assert_eq!(response.content_length, Some(64));
    let received: usize = response
        .chunks
        .map(|chunk| chunk.unwrap().len())
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .sum();
    assert_eq!(received, 64);
}

#[tokio::test]
async fn test_fetch_http_errors() {
    for status in [404, 500] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let url = format!("{}/assets/missing", server.uri());
        let Err(err) = HttpFetcher::new().fetch(&url).await else {
            panic!("expected an error for http {status}");
        };

        match err {
            UpdateError::Download { message, .. } => {
                assert_eq!(message, format!("http {status}"));
            }
            other => panic!("expected Download for {status}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_download_to_disk_with_progress() {
    let server = MockServer::start().await;
    let body = vec![3u8; 4096];
    Mock::given(method("GET"))
        .and(path("/assets/grit-linux-amd64.tar.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let asset = asset_at(&server, "grit-linux-amd64.tar.gz", body.len() as u64);
    let seen = Mutex::new(Vec::new());
    let sink = |received: u64, total: u64| seen.lock().unwrap().push((received, total));

    let path = download(&HttpFetcher::new(), &asset, dir.path(), &sink)
        .await
        .unwrap();

    assert_eq!(std::fs::read(path).unwrap(), body);
    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.last(), Some(&(4096, 4096)));
    assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));
}

#[tokio::test]
async fn test_download_http_error_leaves_directory_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let asset = asset_at(&server, "grit-linux-amd64.zip", 10);
    let err = download(&HttpFetcher::new(), &asset, dir.path(), &TerminalProgress::hidden())
        .await
        .unwrap_err();

    assert!(matches!(err, UpdateError::Download { .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_terminal_progress_lifecycle() {
    let progress = TerminalProgress::hidden();
    let asset = Asset {
        name: "grit-linux-amd64.tar.gz".to_string(),
        size: 0,
        url: "https://example.invalid/grit".to_string(),
    };

    // Progress before on_start is ignored.
    progress.on_progress(1, 0);
    progress.on_start(&semver::Version::new(2, 0, 0), &asset);
    progress.on_progress(10, 0);
    progress.on_progress(20, 40);
    progress.on_progress(40, 40);
    progress.on_finish();
}
