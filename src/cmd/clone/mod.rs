// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clone command implementation.
//!
//! ```text
//! <slug-or-url>
//!   URL ------------------------------> Endpoint::from_url
//!   slug + --source NAME -------------> sources[NAME].resolve(slug)
//!   slug -----> probe every source ---> 1 hit: use it
//!               (git ls-remote)         n hits: ask on stdin
//!                                       0 hits: error
//!        |
//!        v
//!   --target DIR | --golang | <root>/<host>/<slug>
//!        |
//!        v
//!   clone_repository --> print directory
//! ```

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, anyhow, bail};
use tracing::{debug, info};

use crate::cli::clone::CloneArgs;
use crate::config::Config;
use crate::config::types::CloneConfig;
use crate::endpoint::{Endpoint, endpoint_to_dir, endpoint_to_go_dir, looks_like_url};
use crate::error::{GritResult, Result};
use crate::git::cmd::remote_exists;
use crate::git::ops::{CloneStatus, clone_repository};

/// A source whose template produced a reachable repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub source: String,
    pub endpoint: Endpoint,
}

/// Main handler for the clone command.
///
/// # Errors
///
/// Returns an error if the repository cannot be resolved to exactly one
/// endpoint or the clone fails.
pub fn run_clone_command(args: &CloneArgs, config: &Config) -> Result<()> {
    let endpoint = resolve_endpoint(args, &config.clone, remote_exists, || {
        let stdin = std::io::stdin();
        let stderr = std::io::stderr();
        (stdin.lock(), stderr.lock())
    })?;
    let dir = target_dir(args, &config.clone, &endpoint)?;

    match clone_repository(&endpoint.actual, &dir)? {
        CloneStatus::Cloned => info!(url = %endpoint.actual, dir = %dir.display(), "cloned"),
        CloneStatus::AlreadyExists => {
            info!(dir = %dir.display(), "repository already present");
        }
    }

    println!("{}", dir.display());
    Ok(())
}

/// Works out which endpoint `args.repository` refers to.
///
/// `probe` reports whether a repository exists at a URL; `prompt` supplies
/// the streams used to ask the user when several sources match.
///
/// # Errors
///
/// Returns an error for a URL combined with `--source`, an unknown source,
/// a template that cannot be expanded, a failed probe, no match, or an
/// invalid answer to the prompt.
pub fn resolve_endpoint<P, F, R, W>(
    args: &CloneArgs,
    clone: &CloneConfig,
    probe: P,
    prompt: F,
) -> Result<Endpoint>
where
    P: Fn(&str) -> GritResult<bool>,
    F: FnOnce() -> (R, W),
    R: BufRead,
    W: Write,
{
    let input = args.repository.trim();
    if input.is_empty() {
        bail!("repository must not be empty");
    }

    if looks_like_url(input) {
        if args.source.is_some() {
            bail!("--source cannot be used with a URL ({input})");
        }
        return Ok(Endpoint::from_url(input)?);
    }

    if let Some(name) = &args.source {
        let endpoint = clone.source(name)?.resolve(input)?;
        debug!(source = %name, url = %endpoint.actual, "resolved through source");
        return Ok(endpoint);
    }

    let mut candidates = probe_sources(input, clone, probe)?;
    if candidates.len() > 1 {
        let (reader, writer) = prompt();
        let index = choose(&candidates, reader, writer)?;
        return Ok(candidates.swap_remove(index).endpoint);
    }

    candidates.pop().map(|c| c.endpoint).ok_or_else(|| {
        anyhow!(
            "could not find '{input}' on any configured source ({})",
            clone.sources.keys().cloned().collect::<Vec<_>>().join(", ")
        )
    })
}

/// Resolves `slug` against every source and keeps the ones where the
/// repository exists. Sources are tried in name order.
///
/// # Errors
///
/// Returns an error if a template cannot be expanded or git cannot run.
pub fn probe_sources<P>(slug: &str, clone: &CloneConfig, probe: P) -> Result<Vec<Candidate>>
where
    P: Fn(&str) -> GritResult<bool>,
{
    let mut candidates = Vec::new();
    for (name, template) in &clone.sources {
        let endpoint = template.resolve(slug)?;
        let found = probe(&endpoint.actual)
            .with_context(|| format!("failed to probe {}", endpoint.actual))?;
        debug!(source = %name, url = %endpoint.actual, found, "probed source");
        if found {
            candidates.push(Candidate {
                source: name.clone(),
                endpoint,
            });
        }
    }
    Ok(candidates)
}

/// Lists `candidates` on `output` and reads a 1-based choice from `input`.
///
/// # Errors
///
/// Returns an error if the streams fail, input ends, or the answer is not
/// one of the listed numbers.
pub fn choose<R: BufRead, W: Write>(
    candidates: &[Candidate],
    mut input: R,
    mut output: W,
) -> Result<usize> {
    writeln!(output, "found on {} sources:", candidates.len())?;
    for (i, candidate) in candidates.iter().enumerate() {
        writeln!(
            output,
            "  {}) {} ({})",
            i + 1,
            candidate.source,
            candidate.endpoint.actual
        )?;
    }
    write!(output, "clone which one? [1-{}] ", candidates.len())?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        bail!("no choice made");
    }

    let answer = answer.trim();
    match answer.parse::<usize>() {
        Ok(n) if (1..=candidates.len()).contains(&n) => Ok(n - 1),
        _ => Err(anyhow!(
            "invalid choice '{answer}', expected a number from 1 to {}",
            candidates.len()
        )),
    }
}

/// Directory the clone goes into.
///
/// # Errors
///
/// Returns an error if the current directory is unknown (relative
/// `--target`) or the Go workspace cannot be located.
pub fn target_dir(args: &CloneArgs, clone: &CloneConfig, endpoint: &Endpoint) -> Result<PathBuf> {
    if let Some(target) = &args.target {
        return std::path::absolute(target)
            .with_context(|| format!("failed to resolve {}", target.display()));
    }
    if args.golang {
        return Ok(endpoint_to_go_dir(&endpoint.url)?);
    }
    Ok(endpoint_to_dir(&clone.root, &endpoint.url))
}
