//! Jira REST API v2 client.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{Issue, IssueTracker, NewIssue, TrackerError};
use crate::config::TrackerSettings;

/// HTTP connect timeout for tracker calls.
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// HTTP total timeout for tracker calls.
const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Page size for issue searches.
const SEARCH_PAGE_SIZE: u32 = 50;

/// Basic-auth Jira client.
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    api_token: SecretString,
}

/// Project metadata returned by `GET /project/{key}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    issues: Vec<IssueResponse>,
}

#[derive(Deserialize)]
struct IssueResponse {
    key: String,
    #[serde(default)]
    fields: IssueFields,
}

#[derive(Deserialize, Default)]
struct IssueFields {
    #[serde(default)]
    summary: String,
}

#[derive(Deserialize)]
struct CreatedIssue {
    key: String,
}

impl JiraClient {
    /// Build a client from tracker settings.
    pub fn new(settings: &TrackerSettings) -> Result<Self, TrackerError> {
        let base_url = settings.server.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(TrackerError::NotConfigured("JIRA_SERVER is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TrackerError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            username: settings.username.clone(),
            api_token: settings.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/rest/api/2{}", self.base_url, path)
    }

    /// Send with credentials and turn non-2xx answers into errors.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, TrackerError> {
        let response = request
            .basic_auth(&self.username, Some(self.api_token.expose_secret()))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(TrackerError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn search_page(&self, jql: &str, max_results: u32) -> Result<SearchResponse, TrackerError> {
        let url = format!(
            "{}?jql={}&fields=summary&maxResults={}",
            self.url("/search"),
            urlencoding::encode(jql),
            max_results
        );
        debug!("Tracker search: {}", jql);

        Ok(self.send(self.http.get(url)).await?.json().await?)
    }

    /// Total number of issues matching `jql`.
    pub async fn count(&self, jql: &str) -> Result<u64, TrackerError> {
        Ok(self.search_page(jql, 0).await?.total)
    }

    /// Fetch a project by key; fails when it does not exist or is not visible.
    pub async fn project(&self, key: &str) -> Result<Project, TrackerError> {
        let url = self.url(&format!("/project/{}", urlencoding::encode(key)));
        Ok(self.send(self.http.get(url)).await?.json().await?)
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn search(&self, jql: &str) -> Result<Vec<Issue>, TrackerError> {
        let page = self.search_page(jql, SEARCH_PAGE_SIZE).await?;
        Ok(page
            .issues
            .into_iter()
            .map(|issue| Issue {
                key: issue.key,
                summary: issue.fields.summary,
            })
            .collect())
    }

    async fn create(&self, issue: NewIssue) -> Result<Issue, TrackerError> {
        let payload = json!({
            "fields": {
                "project": { "key": issue.project_key },
                "summary": issue.summary,
                "description": issue.description,
                "issuetype": { "name": issue.issue_type.as_str() },
            }
        });

        let created: CreatedIssue = self
            .send(self.http.post(self.url("/issue")).json(&payload))
            .await?
            .json()
            .await?;

        Ok(Issue {
            key: created.key,
            summary: issue.summary,
        })
    }

    async fn comment(&self, key: &str, body: &str) -> Result<(), TrackerError> {
        let url = self.url(&format!("/issue/{}/comment", urlencoding::encode(key)));
        self.send(self.http.post(url).json(&json!({ "body": body })))
            .await?;
        Ok(())
    }

    async fn update_description(&self, key: &str, description: &str) -> Result<(), TrackerError> {
        let url = self.url(&format!("/issue/{}", urlencoding::encode(key)));
        self.send(
            self.http
                .put(url)
                .json(&json!({ "fields": { "description": description } })),
        )
        .await?;
        Ok(())
    }

    async fn link(&self, link_type: &str, inward: &str, outward: &str) -> Result<(), TrackerError> {
        let payload = json!({
            "type": { "name": link_type },
            "inwardIssue": { "key": inward },
            "outwardIssue": { "key": outward },
        });
        self.send(self.http.post(self.url("/issueLink")).json(&payload))
            .await?;
        Ok(())
    }
}
