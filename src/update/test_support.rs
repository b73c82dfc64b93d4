// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-memory fakes and archive builders for self-update tests.

use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use futures_util::future::BoxFuture;
use futures_util::{FutureExt, StreamExt};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::{ResolveError, UpdateError, UpdateResult};
use crate::update::download::{ByteFetcher, FetchResponse, ProgressSink};
use crate::update::release::{Asset, Release, ReleaseSource};
use crate::update::swap::{SlotFs, StdFs};

pub(crate) fn asset(name: &str, size: u64) -> Asset {
    Asset {
        name: name.to_string(),
        size,
        url: format!("https://downloads.invalid/{name}"),
    }
}

pub(crate) fn release(tag: &str) -> Release {
    Release {
        tag: tag.to_string(),
        pre_release: false,
        draft: false,
        assets: Vec::new(),
    }
}

// --- Release index ---

pub(crate) struct FakeSource {
    releases: Option<Vec<Release>>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub(crate) const fn new(releases: Vec<Release>) -> Self {
        Self {
            releases: Some(releases),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source whose index answers 503.
    pub(crate) const fn failing() -> Self {
        Self {
            releases: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReleaseSource for FakeSource {
    fn releases(&self) -> BoxFuture<'_, UpdateResult<Vec<Release>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self.releases.clone().ok_or_else(|| {
            UpdateError::from(ResolveError::Http {
                status: 503,
                url: "https://api.invalid/releases".to_string(),
            })
        });
        async move { result }.boxed()
    }
}

/// A source that never answers.
pub(crate) struct PendingSource;

impl ReleaseSource for PendingSource {
    fn releases(&self) -> BoxFuture<'_, UpdateResult<Vec<Release>>> {
        futures_util::future::pending::<UpdateResult<Vec<Release>>>().boxed()
    }
}

// --- Byte fetcher ---

pub(crate) struct FakeFetcher {
    chunks: Vec<Bytes>,
    content_length: Option<u64>,
    fail_after: Option<usize>,
    stall: bool,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub(crate) fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks: chunks.into_iter().map(Bytes::from).collect(),
            content_length: None,
            fail_after: None,
            stall: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Serves `body` in a single chunk.
    pub(crate) fn serving(body: Vec<u8>) -> Self {
        Self::new(vec![body])
    }

    pub(crate) const fn with_content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    /// Emits `count` chunks, then a transport error.
    pub(crate) const fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Emits every chunk, then never finishes.
    pub(crate) const fn stalling(mut self) -> Self {
        self.stall = true;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ByteFetcher for FakeFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, UpdateResult<FetchResponse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut items: Vec<UpdateResult<Bytes>> = self.chunks.iter().cloned().map(Ok).collect();
        if let Some(count) = self.fail_after {
            items.truncate(count);
            items.push(Err(UpdateError::download(url, "connection reset")));
        }
        let head = futures_util::stream::iter(items);
        let chunks = if self.stall {
            head.chain(futures_util::stream::pending()).boxed()
        } else {
            head.boxed()
        };

        let response = FetchResponse {
            content_length: self.content_length,
            chunks,
        };
        async move { Ok(response) }.boxed()
    }
}

// --- Progress ---

#[derive(Default)]
pub(crate) struct RecordingSink {
    calls: Mutex<Vec<(u64, u64)>>,
}

impl RecordingSink {
    pub(crate) fn calls(&self) -> Vec<(u64, u64)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ProgressSink for RecordingSink {
    fn on_progress(&self, received: u64, total: u64) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((received, total));
        }
    }
}

// --- Filesystem ---

/// Delegates to [`StdFs`] but fails chosen renames or removals.
#[derive(Default)]
pub(crate) struct FlakyFs {
    fail_renames: Vec<usize>,
    fail_removes: bool,
    renames: AtomicUsize,
}

impl FlakyFs {
    /// Fails the 1-based `nth` rename call.
    pub(crate) fn failing_rename(mut self, nth: usize) -> Self {
        self.fail_renames.push(nth);
        self
    }

    pub(crate) const fn failing_removes(mut self) -> Self {
        self.fail_removes = true;
        self
    }
}

impl SlotFs for FlakyFs {
    fn rename(&self, from: &Path, to: &Path) -> std::io::Result<()> {
        let call = self.renames.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_renames.contains(&call) {
            return Err(std::io::Error::other(format!("injected rename failure #{call}")));
        }
        StdFs.rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        if self.fail_removes {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "injected remove failure",
            ));
        }
        StdFs.remove_file(path)
    }
}

// --- Archives ---

/// `(path, contents, mode)`
pub(crate) type Entry<'a> = (&'a str, &'a [u8], u32);

pub(crate) fn tar_archive(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, contents, mode) in entries {
        let mut header = tar::Header::new_gnu();
        if path.ends_with('/') {
            header.set_entry_type(tar::EntryType::Directory);
            header.set_size(0);
        } else {
            header.set_entry_type(tar::EntryType::Regular);
            header.set_size(contents.len() as u64);
        }
        header.set_mode(*mode);
        builder
            .append_data(&mut header, path, *contents)
            .expect("tar entry should be appended");
    }
    builder.into_inner().expect("tar archive should finish")
}

pub(crate) fn tar_gz_archive(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(&tar_archive(entries))
        .expect("gzip stream should be written");
    encoder.finish().expect("gzip stream should finish")
}

pub(crate) fn zip_archive(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (path, contents, mode) in entries {
        let options = zip::write::SimpleFileOptions::default().unix_permissions(*mode);
        if path.ends_with('/') {
            writer
                .add_directory(*path, options)
                .expect("directory entry should be written");
        } else {
            writer
                .start_file(*path, options)
                .expect("file entry should be started");
            writer
                .write_all(contents)
                .expect("file entry should be written");
        }
    }
    writer
        .finish()
        .expect("zip archive should be finalized")
        .into_inner()
}

// --- Logs ---

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Runs `f` with a thread-local subscriber and returns its WARN+ output.
pub(crate) fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferWriter {
            buffer: Arc::clone(&buffer),
        })
        .with_max_level(Level::WARN)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .finish();

    let value = tracing::subscriber::with_default(subscriber, f);
    let logs = buffer
        .lock()
        .map(|b| String::from_utf8_lossy(&b).into_owned())
        .unwrap_or_default();
    (value, logs)
}
