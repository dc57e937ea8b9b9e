//! Pull-request changed-file retrieval via the GitHub API
//!
//! Reads the workflow event payload for the repository and the pull
//! request's base/head revisions, then asks the comparison endpoint for the
//! files that differ. This is the only asynchronous step of a run and is
//! strictly sequenced before the core.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{ChangePlanError, Result};

const API_BASE: &str = "https://api.github.com";

/// Repository and revision pair for one pull request
#[derive(Debug, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub repo: String,
    pub base_sha: String,
    pub head_sha: String,
}

#[derive(Deserialize)]
struct EventPayload {
    repository: Option<EventRepository>,
    pull_request: Option<EventPullRequest>,
}

#[derive(Deserialize)]
struct EventRepository {
    full_name: String,
}

#[derive(Deserialize, Default)]
struct EventPullRequest {
    #[serde(default)]
    base: EventRef,
    #[serde(default)]
    head: EventRef,
}

#[derive(Deserialize, Default)]
struct EventRef {
    sha: Option<String>,
}

#[derive(Deserialize)]
struct CompareResponse {
    #[serde(default)]
    files: Vec<CompareFile>,
}

#[derive(Deserialize)]
struct CompareFile {
    filename: String,
}

/// Resolve the API token from the CLI flag or the GITHUB_TOKEN environment
pub fn resolve_token(flag: Option<String>) -> Result<String> {
    flag.or_else(|| env::var("GITHUB_TOKEN").ok())
        .ok_or_else(|| {
            ChangePlanError::retrieval("GitHub token not found (pass --token or set GITHUB_TOKEN)")
        })
}

/// Read the workflow event payload pointed to by GITHUB_EVENT_PATH
pub fn current_event() -> Result<PullRequestEvent> {
    let event_path = env::var("GITHUB_EVENT_PATH")
        .map_err(|_| ChangePlanError::retrieval("GITHUB_EVENT_PATH not set"))?;

    parse_event(Path::new(&event_path))
}

/// Extract repository and base/head revisions from an event payload file
pub fn parse_event(path: &Path) -> Result<PullRequestEvent> {
    let content = fs::read_to_string(path).map_err(|e| {
        ChangePlanError::retrieval(format!(
            "failed to read event payload {}: {}",
            path.display(),
            e
        ))
    })?;

    let payload: EventPayload = serde_json::from_str(&content)
        .map_err(|e| ChangePlanError::retrieval(format!("invalid event payload: {}", e)))?;

    let repo = payload
        .repository
        .map(|r| r.full_name)
        .ok_or_else(|| ChangePlanError::retrieval("event payload has no repository"))?;

    let pr = payload.pull_request.unwrap_or_default();
    let (base_sha, head_sha) = match (pr.base.sha, pr.head.sha) {
        (Some(base), Some(head)) => (base, head),
        _ => {
            return Err(ChangePlanError::retrieval(
                "could not determine base or head revision",
            ));
        }
    };

    Ok(PullRequestEvent {
        repo,
        base_sha,
        head_sha,
    })
}

/// Fetch the list of files that differ between the event's base and head
pub async fn fetch_changed_files(token: &str, event: &PullRequestEvent) -> Result<Vec<String>> {
    let url = format!(
        "{}/repos/{}/compare/{}...{}",
        API_BASE, event.repo, event.base_sha, event.head_sha
    );

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .header("Authorization", format!("token {}", token))
        .header("User-Agent", "changeplan")
        .header("Accept", "application/vnd.github.v3+json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(ChangePlanError::retrieval(format!(
            "comparison request failed: {} - {}",
            status, text
        )));
    }

    let compare: CompareResponse = response.json().await?;

    Ok(compare.files.into_iter().map(|f| f.filename).collect())
}
