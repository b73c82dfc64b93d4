// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clone endpoints: URL templates, slugs and clone directories.
//!
//! ```text
//! template  "git@github.com:{{slug}}.git"
//!              |  resolve("jmalloc/grit")
//!              v
//! actual    "git@github.com:jmalloc/grit.git"    (passed to git)
//! url       ssh://git@github.com/jmalloc/grit.git (gix::Url, normalized)
//!              |
//!              +--> slug  "jmalloc/grit"
//!              +--> dir   <root>/github.com/jmalloc/grit
//! ```
//!
//! Supported template actions: `{{slug}}` and `{{env "NAME"}}`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use gix::url::Scheme;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::EndpointError;

const SLUG_SEPARATOR: char = '/';

/// `{{ ... }}` with the inner text captured.
static ACTION: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(.*?)\s*\}\}"));

/// `env "NAME"` inside an action.
static ENV_ACTION: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#"^env\s+"([^"]*)"$"#));

/// Placeholder slug used to inspect a template without a real repository.
const VIRTUAL_SLUG: &str = "__virtual__";

/// Result type for endpoint operations.
pub type EndpointResult<T> = std::result::Result<T, EndpointError>;

/// A git URL with `{{slug}}` and `{{env "NAME"}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointTemplate(String);

/// A resolved clone endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// URL handed to git, as close to the template's form as possible.
    pub actual: String,
    /// Parsed URL; SCP-style addresses are normalized to `ssh://`.
    pub url: gix::Url,
}

impl EndpointTemplate {
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks that the template expands to a parseable URL.
    ///
    /// # Errors
    ///
    /// Returns the error `resolve` would return for any slug.
    pub fn validate(&self) -> EndpointResult<()> {
        self.resolve(VIRTUAL_SLUG).map(drop)
    }

    /// True when `url` could have been produced by this template, judged by
    /// scheme and host.
    #[must_use]
    pub fn is_match(&self, url: &gix::Url) -> bool {
        self.resolve(VIRTUAL_SLUG).is_ok_and(|virtual_ep| {
            virtual_ep.url.scheme == url.scheme && virtual_ep.url.host() == url.host()
        })
    }

    /// Expands the template for `slug`.
    ///
    /// # Errors
    ///
    /// Returns `Template` for unknown or unterminated actions and
    /// `InvalidUrl` when the expansion is not a git URL.
    pub fn resolve(&self, slug: &str) -> EndpointResult<Endpoint> {
        let actual = self.expand(slug, |name| std::env::var(name).ok())?;
        let url = parse_url(&actual)?;
        Ok(Endpoint { actual, url })
    }

    fn expand(&self, slug: &str, env: impl Fn(&str) -> Option<String>) -> EndpointResult<String> {
        let template_error = |message: String| EndpointError::Template {
            template: self.0.clone(),
            message,
        };

        let action = ACTION
            .as_ref()
            .map_err(|e| template_error(format!("failed to compile action pattern: {e}")))?;
        let env_action = ENV_ACTION
            .as_ref()
            .map_err(|e| template_error(format!("failed to compile env pattern: {e}")))?;

        let mut out = String::with_capacity(self.0.len() + slug.len());
        let mut last = 0;
        for captures in action.captures_iter(&self.0) {
            let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            out.push_str(&self.0[last..whole.start()]);
            last = whole.end();

            let inner = inner.as_str();
            if inner == "slug" {
                out.push_str(slug);
            } else if let Some(name) = env_action.captures(inner).and_then(|c| c.get(1)) {
                out.push_str(&env(name.as_str()).unwrap_or_default());
            } else {
                return Err(template_error(format!("unsupported action '{inner}'")));
            }
        }

        let rest = &self.0[last..];
        if rest.contains("{{") {
            return Err(template_error("unterminated action".to_string()));
        }
        out.push_str(rest);
        Ok(out)
    }
}

impl fmt::Display for EndpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EndpointTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl Endpoint {
    /// Builds an endpoint from a URL given verbatim by the user.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` when `url` is not a git URL.
    pub fn from_url(url: &str) -> EndpointResult<Self> {
        Ok(Self {
            actual: url.to_string(),
            url: parse_url(url)?,
        })
    }
}

/// Parses `input` into a normalized git URL.
///
/// SCP-style addresses (`git@host:owner/repo.git`) become `ssh://` URLs with
/// an absolute path.
///
/// # Errors
///
/// Returns `InvalidUrl` on parse failure.
pub fn parse_url(input: &str) -> EndpointResult<gix::Url> {
    let mut url = gix::url::parse(input.into()).map_err(|e| EndpointError::InvalidUrl {
        url: input.to_string(),
        message: e.to_string(),
    })?;

    if url.serialize_alternative_form && url.scheme == Scheme::Ssh {
        url.serialize_alternative_form = false;
        if !url.path.starts_with(b"/") {
            url.path.insert(0, b'/');
        }
    }
    Ok(url)
}

/// True when `input` names a repository by URL or local path rather than by
/// slug.
#[must_use]
pub fn looks_like_url(input: &str) -> bool {
    input.contains("://")
        || is_scp(input)
        || Path::new(input).is_absolute()
        || input.starts_with("./")
        || input.starts_with("../")
}

/// True for SSH URLs written SCP style, such as `git@github.com:jmalloc/grit.git`.
#[must_use]
pub fn is_scp(input: &str) -> bool {
    !input.starts_with("ssh://")
        && gix::url::parse(input.into()).is_ok_and(|url| url.scheme == Scheme::Ssh)
}

/// Renders an `ssh://` URL in SCP style.
///
/// # Errors
///
/// Returns `NotSsh` for any other scheme.
pub fn to_scp(url: &gix::Url) -> EndpointResult<String> {
    if url.scheme != Scheme::Ssh {
        return Err(EndpointError::NotSsh(url.to_bstring().to_string()));
    }

    let host = url.host().unwrap_or_default();
    let path = path_str(url);
    let path = path.trim_start_matches(SLUG_SEPARATOR);
    Ok(match url.user() {
        Some(user) => format!("{user}@{host}:{path}"),
        None => format!("{host}:{path}"),
    })
}

fn path_str(url: &gix::Url) -> String {
    String::from_utf8_lossy(&url.path).into_owned()
}

/// Repository slug of `url`: its path without the leading separator and
/// without the final extension.
#[must_use]
pub fn endpoint_to_slug(url: &gix::Url) -> String {
    let path = path_str(url);
    let trimmed = path.trim_start_matches(SLUG_SEPARATOR);
    strip_extension(trimmed).to_string()
}

fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind(SLUG_SEPARATOR).map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}

fn extension(path: &str) -> &str {
    let stripped = strip_extension(path);
    &path[stripped.len()..]
}

/// Directory for a clone of `url` below `root`: `root/host/slug-parts`.
#[must_use]
pub fn endpoint_to_dir(root: &Path, url: &gix::Url) -> PathBuf {
    let mut dir = root.join(url.host().unwrap_or_default());
    for part in endpoint_to_slug(url)
        .split(SLUG_SEPARATOR)
        .filter(|p| !p.is_empty())
    {
        dir.push(part);
    }
    dir
}

/// Go workspace directory for a clone of `url`: `$GOPATH/src/host/slug`.
///
/// Uses the first `GOPATH` entry, falling back to `~/go`.
///
/// # Errors
///
/// Returns `InvalidUrl` when neither `GOPATH` nor a home directory is known.
pub fn endpoint_to_go_dir(url: &gix::Url) -> EndpointResult<PathBuf> {
    let gopath = std::env::var_os("GOPATH")
        .and_then(|value| std::env::split_paths(&value).find(|p| !p.as_os_str().is_empty()))
        .or_else(|| dirs::home_dir().map(|home| home.join("go")))
        .ok_or_else(|| EndpointError::InvalidUrl {
            url: url.to_bstring().to_string(),
            message: "GOPATH is not set and the home directory is unknown".to_string(),
        })?;
    Ok(endpoint_to_dir(&gopath.join("src"), url))
}

/// Copy of `url` with its slug replaced by `slug`, keeping the extension.
#[must_use]
pub fn replace_slug(url: &gix::Url, slug: &str) -> gix::Url {
    let path = path_str(url);
    let ext = extension(&path);
    let mut replaced = url.clone();
    replaced.path = format!("{SLUG_SEPARATOR}{slug}{ext}").into();
    replaced
}

/// Like [`replace_slug`], but a `slug` with fewer segments than the current
/// one keeps the leading segments of the current slug.
///
/// `merge_slug(github.com/jmalloc/grit, "other")` yields `jmalloc/other`.
#[must_use]
pub fn merge_slug(url: &gix::Url, slug: &str) -> gix::Url {
    let current = endpoint_to_slug(url);
    let atoms: Vec<&str> = current.split(SLUG_SEPARATOR).collect();
    let given = slug.split(SLUG_SEPARATOR).count();

    if atoms.len() > given {
        let prefix = atoms[..atoms.len() - given].join("/");
        replace_slug(url, &format!("{prefix}{SLUG_SEPARATOR}{slug}"))
    } else {
        replace_slug(url, slug)
    }
}
