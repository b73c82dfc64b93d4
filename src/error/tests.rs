// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use super::{ConfigError, GritError, GritResult, ResolveError, UpdateError};
use crate::update::Phase;

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        section: "update".to_string(),
        key: "repository".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"missing required config key 'repository' in section '[update]'"
    );
}

#[test]
fn test_release_not_found_suggests_pre_release_only_when_excluded() {
    let excluded = ResolveError::ReleaseNotFound {
        pre_release_excluded: true,
    };
    let included = ResolveError::ReleaseNotFound {
        pre_release_excluded: false,
    };

    insta::assert_snapshot!(excluded.to_string(), @"no published release found, try --pre-release");
    insta::assert_snapshot!(included.to_string(), @"no published release found");
}

#[test]
fn test_fatal_swap_names_backup_path() {
    let err = UpdateError::FatalSwap {
        current: PathBuf::from("/usr/local/bin/grit"),
        backup: PathBuf::from("/usr/local/bin/grit.1.0.0.backup"),
        install_error: std::io::Error::other("disk full"),
        restore_error: std::io::Error::other("read-only filesystem"),
    };

    assert!(err.is_fatal());
    let message = err.to_string();
    assert!(
        message.contains("mv '/usr/local/bin/grit.1.0.0.backup' '/usr/local/bin/grit'"),
        "fatal swap message should carry the manual restore command: {message}"
    );
}

#[test]
fn test_recoverable_errors_are_not_fatal() {
    let errors = [
        UpdateError::Swap {
            current: PathBuf::from("grit"),
            staged: PathBuf::from("grit.2.0.0"),
            source: std::io::Error::other("boom"),
        },
        UpdateError::Cancelled {
            phase: Phase::Downloading,
        },
        UpdateError::Permission {
            dir: PathBuf::from("/opt"),
        },
    ];

    for err in errors {
        assert!(!err.is_fatal(), "{err} should be recoverable");
    }
}

#[test]
fn test_staging_error_kinds() {
    let dir = std::path::Path::new("/opt/grit");

    let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
    assert!(matches!(
        UpdateError::staging(dir, denied),
        UpdateError::Permission { .. }
    ));

    let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
    let err = UpdateError::staging(dir, missing);
    insta::assert_snapshot!(
        err.to_string(),
        @"failed to prepare /opt/grit for the update: no such directory"
    );
}

#[test]
fn test_timed_out_display() {
    let err = UpdateError::TimedOut {
        phase: Phase::Resolving,
        timeout: std::time::Duration::from_secs(30),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"self-update timed out after 30s while resolving the latest release"
    );
}

#[test]
fn test_grit_error_size() {
    // Every variant is a thin Box: pointer + discriminant
    let size = std::mem::size_of::<GritError>();
    assert!(size <= 24, "GritError is {size} bytes, expected <= 24");
}

#[test]
fn test_grit_result_size() {
    let size = std::mem::size_of::<GritResult<()>>();
    assert!(size <= 24, "GritResult<()> is {size} bytes, expected <= 24");
}
