//! Project gallery data.
//!
//! The `fetch` stage pulls the project list from a JSON endpoint (or a
//! local file, for offline work) and writes it to the temp directory as
//! a manifest the generate stage consumes. A failed fetch is data, not
//! a crash: the manifest records the error state and the generated page
//! renders it, so a flaky portfolio API produces a site with an error
//! panel instead of no site at all.
//!
//! # Fetch cache
//!
//! Successful fetches are cached in `<temp_dir>/.fetch-cache.json`,
//! keyed by a hash of the endpoint URL, so repeated `build` runs during
//! styling work don't hammer the API. A cached manifest is reused while
//! it is younger than `projects.cache_ttl_minutes`; error states are
//! never cached. Pass `--no-cache` to force a fresh fetch.
//!
//! # Filtering
//!
//! Category filtering compiles to CSS. Each category gets a hidden
//! radio input; generated rules hide the cards (and emptied section
//! headers) that don't match the checked filter. Categories are matched
//! by slug, so two spellings that normalize to the same slug share a
//! filter chip.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::config::ProjectsConfig;

/// Name of the projects manifest within the temp directory.
pub const PROJECTS_FILENAME: &str = "projects.json";

/// Name of the fetch cache file within the temp directory.
const CACHE_FILENAME: &str = ".fetch-cache.json";

/// Version of the cache format. Bump to invalidate existing caches.
const CACHE_VERSION: u32 = 1;

/// The synthetic category that matches every project.
pub const ALL_CATEGORY: &str = "all";

#[derive(Error, Debug)]
pub enum ProjectsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid project data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Request(String),
    #[error("endpoint returned HTTP {status}: {message}")]
    Endpoint { status: u16, message: String },
}

/// One project as served by the portfolio API.
///
/// The endpoint uses camelCase field names and a Mongo-style `_id`.
/// `technologies` arrives as a list of strings, though older records
/// hold a single comma-joined string; both forms decode, and entries
/// may still carry embedded commas — run them through
/// [`normalize_technologies`] before rendering. Unknown fields are
/// ignored so API additions don't break existing sites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(deserialize_with = "string_or_list")]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub github_link: Option<String>,
    #[serde(default)]
    pub live_link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub stats: Option<ProjectStats>,
}

/// Accept `technologies` as either a list of strings or one
/// comma-joined string.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::One(joined) => vec![joined],
        StringOrList::Many(list) => list,
    })
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectStats {
    #[serde(default)]
    pub stars: u32,
    #[serde(default)]
    pub forks: u32,
}

/// Outcome of the fetch stage, carried through to rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GalleryState {
    /// Projects were loaded; the gallery renders normally.
    Loaded,
    /// No endpoint is configured. The site builds with a setup hint.
    ConfigError { message: String },
    /// The endpoint was configured but the fetch failed.
    FetchError { message: String },
}

/// The fetch stage artifact: gallery state plus whatever projects were
/// loaded (empty on error).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectsManifest {
    pub state: GalleryState,
    pub projects: Vec<Project>,
}

impl ProjectsManifest {
    pub fn loaded(projects: Vec<Project>) -> Self {
        Self {
            state: GalleryState::Loaded,
            projects,
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self {
            state: GalleryState::ConfigError {
                message: message.into(),
            },
            projects: Vec::new(),
        }
    }

    pub fn fetch_error(message: impl Into<String>) -> Self {
        Self {
            state: GalleryState::FetchError {
                message: message.into(),
            },
            projects: Vec::new(),
        }
    }
}

/// Result of [`gather_projects`].
#[derive(Debug)]
pub struct FetchOutcome {
    pub manifest: ProjectsManifest,
    pub from_cache: bool,
}

/// Run the fetch stage: resolve the configured source, load projects,
/// and fold any failure into the manifest state.
///
/// Only the fetch cache write can fail here; fetch and configuration
/// problems become manifest states so the later stages still run.
pub fn gather_projects(
    config: &ProjectsConfig,
    source_dir: &Path,
    temp_dir: &Path,
    use_cache: bool,
    now_unix: u64,
) -> io::Result<FetchOutcome> {
    if let Some(path) = source_file(config) {
        // A relative source_file is relative to the content root.
        let manifest = match load_source_file(&source_dir.join(path)) {
            Ok(projects) => ProjectsManifest::loaded(projects),
            Err(err) => ProjectsManifest::fetch_error(err.to_string()),
        };
        return Ok(FetchOutcome {
            manifest,
            from_cache: false,
        });
    }

    let Some(url) = api_url(config) else {
        return Ok(FetchOutcome {
            manifest: ProjectsManifest::config_error(
                "projects.api_url is not set in config.toml",
            ),
            from_cache: false,
        });
    };

    if use_cache
        && let Some(manifest) = load_fetch_cache(temp_dir, url, config.cache_ttl_minutes, now_unix)
    {
        return Ok(FetchOutcome {
            manifest,
            from_cache: true,
        });
    }

    match fetch_remote(url) {
        Ok(projects) => {
            let manifest = ProjectsManifest::loaded(projects);
            save_fetch_cache(temp_dir, url, &manifest, now_unix)?;
            Ok(FetchOutcome {
                manifest,
                from_cache: false,
            })
        }
        Err(err) => Ok(FetchOutcome {
            manifest: ProjectsManifest::fetch_error(err.to_string()),
            from_cache: false,
        }),
    }
}

fn source_file(config: &ProjectsConfig) -> Option<&str> {
    config
        .source_file
        .as_deref()
        .filter(|p| !p.trim().is_empty())
}

fn api_url(config: &ProjectsConfig) -> Option<&str> {
    config.api_url.as_deref().filter(|u| !u.trim().is_empty())
}

/// GET the project list from the portfolio API.
pub fn fetch_remote(url: &str) -> Result<Vec<Project>, ProjectsError> {
    let client = reqwest::blocking::Client::new();
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| ProjectsError::Request(format!("GET {url} failed: {e}")))?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|e| ProjectsError::Request(format!("failed to read response from {url}: {e}")))?;

    if !status.is_success() {
        return Err(ProjectsError::Endpoint {
            status: status.as_u16(),
            message: extract_error_message(&body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Pull a human-readable message out of a JSON error body, falling back
/// to a truncated copy of the raw body.
fn extract_error_message(body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = v["error"]["message"].as_str() {
            return msg.to_string();
        }
        if let Some(msg) = v["error"].as_str() {
            return msg.to_string();
        }
        if let Some(msg) = v["message"].as_str() {
            return msg.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

/// Load projects from a local JSON file instead of the API.
pub fn load_source_file(path: &Path) -> Result<Vec<Project>, ProjectsError> {
    let content = std::fs::read_to_string(path).map_err(|source| ProjectsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

// =========================================================================
// Manifest persistence
// =========================================================================

pub fn write_projects_manifest(temp_dir: &Path, manifest: &ProjectsManifest) -> io::Result<()> {
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join(PROJECTS_FILENAME), json)
}

pub fn read_projects_manifest(temp_dir: &Path) -> Result<ProjectsManifest, ProjectsError> {
    let path = temp_dir.join(PROJECTS_FILENAME);
    let content = std::fs::read_to_string(&path).map_err(|source| ProjectsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

// =========================================================================
// Fetch cache
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
struct FetchCache {
    version: u32,
    endpoint_hash: String,
    fetched_unix: u64,
    manifest: ProjectsManifest,
}

/// SHA-256 of the endpoint URL, as a hex string.
fn endpoint_hash(endpoint: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"projects-endpoint\0");
    hasher.update(endpoint.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Load a cached manifest if it matches the endpoint and is still
/// fresh. Missing, corrupt, stale, or mismatched caches all read as a
/// miss. A TTL of zero disables reuse entirely.
fn load_fetch_cache(
    temp_dir: &Path,
    endpoint: &str,
    ttl_minutes: u64,
    now_unix: u64,
) -> Option<ProjectsManifest> {
    let content = std::fs::read_to_string(temp_dir.join(CACHE_FILENAME)).ok()?;
    let cache: FetchCache = serde_json::from_str(&content).ok()?;
    if cache.version != CACHE_VERSION || cache.endpoint_hash != endpoint_hash(endpoint) {
        return None;
    }
    let age_secs = now_unix.saturating_sub(cache.fetched_unix);
    if age_secs >= ttl_minutes.saturating_mul(60) {
        return None;
    }
    if cache.manifest.state != GalleryState::Loaded {
        return None;
    }
    Some(cache.manifest)
}

fn save_fetch_cache(
    temp_dir: &Path,
    endpoint: &str,
    manifest: &ProjectsManifest,
    now_unix: u64,
) -> io::Result<()> {
    let cache = FetchCache {
        version: CACHE_VERSION,
        endpoint_hash: endpoint_hash(endpoint),
        fetched_unix: now_unix,
        manifest: manifest.clone(),
    };
    let json = serde_json::to_string_pretty(&cache)?;
    std::fs::write(temp_dir.join(CACHE_FILENAME), json)
}

/// Current unix time in seconds.
pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

// =========================================================================
// Gallery derivations
// =========================================================================

/// Filter categories: `"all"` first, then each project category in
/// first-seen order.
pub fn categories(projects: &[Project]) -> Vec<String> {
    let mut out = vec![ALL_CATEGORY.to_string()];
    for project in projects {
        if !out.iter().any(|c| c == &project.category) {
            out.push(project.category.clone());
        }
    }
    out
}

/// Projects matching a category. `"all"` matches everything.
pub fn filter<'a>(projects: &'a [Project], category: &str) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| category == ALL_CATEGORY || p.category == category)
        .collect()
}

/// Split into (featured, rest), preserving endpoint order within each.
pub fn partition_featured(projects: &[Project]) -> (Vec<&Project>, Vec<&Project>) {
    projects.iter().partition(|p| p.featured)
}

/// Flatten technology entries into trimmed, non-empty tags. Each entry
/// may itself be comma-joined.
pub fn normalize_technologies(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lowercase a category into a CSS-safe slug. Runs of non-alphanumeric
/// characters collapse to a single dash.
pub fn slugify_category(category: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for ch in category.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "other".to_string()
    } else {
        slug
    }
}

/// The element id shared by a category's radio input and its chip
/// label, and (prefixed per card) the class that marks matching cards.
pub fn filter_id(category: &str) -> String {
    format!("cat-{}", slugify_category(category))
}

/// Compile the category filters to CSS.
///
/// For each category: a rule highlighting its checked chip, a rule
/// hiding cards outside the category, and rules hiding the "Featured
/// Projects" / "More Projects" subsections when the filter would leave
/// them empty. The `all` filter only gets the chip rule.
pub fn filter_css(projects: &[Project]) -> String {
    let (featured, rest) = partition_featured(projects);
    let mut css = String::new();
    for category in categories(projects) {
        let id = filter_id(&category);
        css.push_str(&format!(
            "#{id}:checked ~ .filter-bar .filter-chip[for=\"{id}\"] {{\n    \
             background: var(--color-accent);\n    \
             border-color: var(--color-accent);\n    \
             color: var(--color-background);\n}}\n"
        ));
        if category == ALL_CATEGORY {
            continue;
        }
        css.push_str(&format!(
            "#{id}:checked ~ .featured-projects .project-card:not(.{id}),\n\
             #{id}:checked ~ .more-projects .project-card:not(.{id}) {{\n    \
             display: none;\n}}\n"
        ));
        if !featured.iter().any(|p| p.category == category) {
            css.push_str(&format!(
                "#{id}:checked ~ .featured-projects {{ display: none; }}\n"
            ));
        }
        if !rest.iter().any(|p| p.category == category) {
            css.push_str(&format!(
                "#{id}:checked ~ .more-projects {{ display: none; }}\n"
            ));
        }
    }
    css
}
