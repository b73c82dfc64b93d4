// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for `grit clone`.
//!
//! Upstream repositories are local bare repositories reached through
//! `file://` source templates, so no network is needed.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use grit::endpoint::{Endpoint, EndpointTemplate, endpoint_to_dir};
use tempfile::TempDir;

fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Publishes `upstream/<slug>` with one commit on branch `main`.
fn publish(upstream: &Path, slug: &str) -> PathBuf {
    let work = upstream.join(".work").join(slug);
    std::fs::create_dir_all(&work).unwrap();
    git(&["init", "--quiet", "--initial-branch=main"], &work);
    git(&["commit", "--allow-empty", "-m", "Initial commit", "--quiet"], &work);

    let bare = upstream.join(slug);
    std::fs::create_dir_all(bare.parent().unwrap()).unwrap();
    git(
        &[
            "clone",
            "--quiet",
            "--bare",
            work.to_str().unwrap(),
            bare.to_str().unwrap(),
        ],
        upstream,
    );
    bare
}

struct Fixture {
    _temp: TempDir,
    upstream: PathBuf,
    root: PathBuf,
    config: PathBuf,
}

/// A clone root plus a config whose only sources are `file://` templates.
fn fixture(sources: &[&str]) -> Fixture {
    let temp = tempfile::tempdir().unwrap();
    let upstream = temp.path().join("upstream");
    let root = temp.path().join("root");
    std::fs::create_dir_all(&upstream).unwrap();

    let mut config = format!("[clone]\nroot = \"{}\"\n\n[clone.sources]\n", root.display());
    for name in sources {
        config.push_str(&format!(
            "{name} = \"file://{}/{name}/{{{{slug}}}}\"\n",
            upstream.display()
        ));
    }
    let config_path = temp.path().join("grit.toml");
    std::fs::write(&config_path, config).unwrap();

    Fixture {
        upstream,
        root,
        config: config_path,
        _temp: temp,
    }
}

fn grit(fixture: &Fixture, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_grit"))
        .arg("--config")
        .arg(&fixture.config)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("failed to run grit")
}

fn printed_dir(output: &Output) -> PathBuf {
    assert!(
        output.status.success(),
        "grit failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    PathBuf::from(String::from_utf8_lossy(&output.stdout).trim())
}

#[test]
fn clone_through_named_source() {
    let fx = fixture(&["local"]);
    publish(&fx.upstream.join("local"), "acme/widget");

    let dir = printed_dir(&grit(&fx, &["clone", "--source", "local", "acme/widget"]));

    assert!(dir.starts_with(&fx.root) && dir.ends_with("local/acme/widget"), "{}", dir.display());
    assert!(dir.join(".git").is_dir());
    assert_eq!(git(&["config", "branch.main.remote"], &dir), "origin");
    assert_eq!(git(&["config", "branch.main.merge"], &dir), "refs/heads/main");
}

#[test]
fn clone_probes_sources() {
    let fx = fixture(&["alpha", "beta"]);
    publish(&fx.upstream.join("beta"), "acme/widget");

    let dir = printed_dir(&grit(&fx, &["clone", "acme/widget"]));

    assert!(dir.ends_with("beta/acme/widget"), "{}", dir.display());
    let origin = git(&["remote", "get-url", "origin"], &dir);
    assert!(origin.ends_with("beta/acme/widget"), "{origin}");
}

#[test]
fn clone_unknown_repository_fails() {
    let fx = fixture(&["alpha"]);

    let output = grit(&fx, &["clone", "acme/missing"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("could not find 'acme/missing'"),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(!fx.root.exists(), "nothing is created when no source matches");
}

#[test]
fn clone_into_explicit_target_twice() {
    let fx = fixture(&["local"]);
    let bare = publish(&fx.upstream.join("local"), "acme/widget");
    let target = fx.root.join("elsewhere");
    let url = format!("file://{}", bare.display());

    let first = printed_dir(&grit(&fx, &["clone", "--target", target.to_str().unwrap(), &url]));
    let second = printed_dir(&grit(&fx, &["clone", "--target", target.to_str().unwrap(), &url]));

    assert_eq!(first, target);
    assert_eq!(second, target, "an existing clone is not an error");
}

#[test]
fn failed_clone_leaves_no_directory() {
    let fx = fixture(&["local"]);
    let target = fx.root.join("broken");
    let url = format!("file://{}/nothing-here", fx.upstream.display());

    let output = grit(&fx, &["clone", "--target", target.to_str().unwrap(), &url]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!target.exists());
}

#[test]
fn endpoint_dir_layout_matches_clone_root() {
    let template = EndpointTemplate::new("https://git.example.com/{{slug}}.git");
    let endpoint = template.resolve("team/project").unwrap();

    assert_eq!(
        endpoint_to_dir(Path::new("/src"), &endpoint.url),
        PathBuf::from("/src/git.example.com/team/project")
    );
    assert_eq!(
        Endpoint::from_url("https://git.example.com/team/project.git").unwrap(),
        endpoint
    );
}
