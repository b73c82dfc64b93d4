// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Release, find_latest, select_latest};
use crate::error::{ResolveError, UpdateError};
use crate::update::test_support::{FakeSource, release};

fn draft(tag: &str) -> Release {
    Release {
        draft: true,
        ..release(tag)
    }
}

fn pre(tag: &str) -> Release {
    Release {
        pre_release: true,
        ..release(tag)
    }
}

#[test]
fn test_selects_greatest_version_regardless_of_order() {
    let releases = vec![release("v1.9.0"), release("v1.10.0"), release("v1.2.0")];
    let latest = select_latest(releases, false).unwrap();

    assert_eq!(latest.version.to_string(), "1.10.0");
    assert_eq!(latest.release.tag, "v1.10.0");
}

#[test]
fn test_drafts_are_never_eligible() {
    let releases = vec![draft("v9.0.0"), release("v1.0.0")];
    let latest = select_latest(releases.clone(), true).unwrap();
    assert_eq!(latest.version.to_string(), "1.0.0");
}

#[test]
fn test_pre_releases_require_opt_in() {
    let releases = vec![pre("v2.0.0-rc.1"), release("v1.5.0")];

    let stable = select_latest(releases.clone(), false).unwrap();
    assert_eq!(stable.version.to_string(), "1.5.0");

    let any = select_latest(releases, true).unwrap();
    assert_eq!(any.version.to_string(), "2.0.0-rc.1");
}

#[test]
fn test_final_release_beats_its_own_pre_release() {
    let releases = vec![pre("v2.0.0-rc.2"), release("v2.0.0")];
    let latest = select_latest(releases, true).unwrap();
    assert_eq!(latest.version.to_string(), "2.0.0");
}

#[test]
fn test_only_pre_releases_without_opt_in_is_not_found() {
    let releases = vec![pre("v2.0.0-rc.1"), pre("v2.0.0-beta.3")];
    let err = select_latest(releases, false).unwrap_err();

    assert!(matches!(
        err,
        UpdateError::Resolve(ResolveError::ReleaseNotFound {
            pre_release_excluded: true
        })
    ));
    assert!(err.to_string().contains("--pre-release"));
}

#[test]
fn test_empty_index_is_not_found() {
    let err = select_latest(Vec::new(), true).unwrap_err();
    assert!(matches!(
        err,
        UpdateError::Resolve(ResolveError::ReleaseNotFound {
            pre_release_excluded: false
        })
    ));
}

#[test]
fn test_malformed_eligible_tag_is_reported() {
    let releases = vec![release("v1.0.0"), release("nightly")];
    let err = select_latest(releases, false).unwrap_err();

    match err {
        UpdateError::VersionParse { tag, .. } => assert_eq!(tag, "nightly"),
        other => panic!("expected VersionParse, got {other:?}"),
    }
}

#[test]
fn test_malformed_tag_on_ineligible_release_is_ignored() {
    let releases = vec![draft("nightly"), release("v1.0.0")];
    let latest = select_latest(releases, false).unwrap();
    assert_eq!(latest.version.to_string(), "1.0.0");
}

#[test]
fn test_equal_precedence_keeps_first_listed() {
    let releases = vec![release("v2.0.0+build.2"), release("v2.0.0+build.1")];
    let latest = select_latest(releases, false).unwrap();
    assert_eq!(latest.release.tag, "v2.0.0+build.2");
}

#[tokio::test]
async fn test_find_latest_queries_source() {
    let source = FakeSource::new(vec![release("v0.1.0"), release("v0.3.0")]);
    let latest = find_latest(&source, false).await.unwrap();

    assert_eq!(latest.version.to_string(), "0.3.0");
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_find_latest_propagates_source_errors() {
    let source = FakeSource::failing();
    let err = find_latest(&source, false).await.unwrap_err();
    assert!(matches!(
        err,
        UpdateError::Resolve(ResolveError::Http { status: 503, .. })
    ));
}
