// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{PartialFileGuard, probe_writable};

#[test]
fn test_guard_removes_file_on_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.bin");
    std::fs::write(&path, b"half").unwrap();

    {
        let guard = PartialFileGuard::new(path.clone());
        assert_eq!(guard.path(), path);
    }

    assert!(!path.exists());
}

#[test]
fn test_guard_keeps_file_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("complete.bin");
    std::fs::write(&path, b"whole").unwrap();

    let mut guard = PartialFileGuard::new(path.clone());
    guard.keep();
    drop(guard);

    assert_eq!(std::fs::read(&path).unwrap(), b"whole");
}

#[test]
fn test_guard_tolerates_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    drop(PartialFileGuard::new(dir.path().join("never-created")));
}

#[test]
fn test_probe_writable_leaves_no_trace() {
    let dir = tempfile::tempdir().unwrap();
    probe_writable(dir.path()).unwrap();
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_probe_writable_fails_for_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    assert!(probe_writable(&dir.path().join("missing")).is_err());
}
