//! Jira REST API client.
//!
//! Only the two read endpoints needed for an activity report are covered:
//! the authenticated user (`/myself`) and issue search (`/search`).
//!
//! # API Reference
//!
//! See: <https://developer.atlassian.com/cloud/jira/platform/rest/v2/>
//!
//! # Authentication
//!
//! Basic auth with the account's username (email) and an API token.

use serde::{Deserialize, Serialize};

use crate::error::{ActivityError, Result};

/// Path prefix of the v2 REST API.
const API_PATH: &str = "rest/api/2";

/// Client for a Jira Cloud or Server instance.
#[derive(Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    token: String,
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    /// Create a client for the instance at `base_url`.
    ///
    /// Fails with a configuration error when `base_url` is not an absolute URL.
    pub fn new(base_url: &str, username: &str, token: &str) -> Result<Self> {
        reqwest::Url::parse(base_url)
            .map_err(|e| ActivityError::Config(format!("invalid tracker URL '{}': {}", base_url, e)))?;

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an authenticated GET request.
    fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .basic_auth(&self.username, Some(&self.token))
            .header("Accept", "application/json")
    }

    /// Fetch the user the credentials belong to.
    pub async fn get_myself(&self) -> reqwest::Result<JiraUser> {
        let url = format!("{}/{}/myself", self.base_url, API_PATH);

        let response = self.build_request(&url).send().await?.error_for_status()?;
        response.json::<JiraUser>().await
    }

    /// Run a JQL search and return one page of matching raw issues.
    ///
    /// # Arguments
    ///
    /// * `jql` - The filter query, passed through unvalidated
    /// * `options` - Page size, requested fields and expansions
    pub async fn search(
        &self,
        jql: &str,
        options: &SearchOptions,
    ) -> reqwest::Result<JiraSearchResponse> {
        let mut url = format!(
            "{}/{}/search?jql={}&maxResults={}",
            self.base_url,
            API_PATH,
            urlencoding::encode(jql),
            options.max_results
        );

        if !options.fields.is_empty() {
            url.push_str(&format!(
                "&fields={}",
                urlencoding::encode(&options.fields.join(","))
            ));
        }
        if let Some(expand) = &options.expand {
            url.push_str(&format!("&expand={}", urlencoding::encode(expand)));
        }

        let response = self.build_request(&url).send().await?.error_for_status()?;
        response.json::<JiraSearchResponse>().await
    }
}

/// Parameters for [`JiraClient::search`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub max_results: u32,
    pub fields: Vec<String>,
    /// Comma-separated expansions, e.g. `"changelog"`.
    pub expand: Option<String>,
}

// ============================================================================
// Response types
// ============================================================================

/// A user as returned by `/myself` and embedded in comments and histories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraUser {
    #[serde(default, rename = "accountId")]
    pub account_id: String,

    #[serde(default, rename = "displayName")]
    pub display_name: String,

    #[serde(default, rename = "emailAddress")]
    pub email_address: String,
}

/// Response from the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraSearchResponse {
    /// Matches on the server, which may exceed `issues.len()` when the
    /// page was capped by `maxResults`.
    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub issues: Vec<JiraIssue>,
}

/// A raw issue before window filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssue {
    pub key: String,

    #[serde(default)]
    pub fields: JiraIssueFields,

    /// Present only when the search expanded `changelog`.
    #[serde(default)]
    pub changelog: Option<JiraChangelog>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraIssueFields {
    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub status: Option<JiraStatus>,

    #[serde(default)]
    pub comment: Option<JiraCommentPage>,
}

impl JiraIssue {
    /// Status name, empty when the field was not requested.
    pub fn status_name(&self) -> &str {
        self.fields
            .status
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("")
    }

    pub fn comments(&self) -> &[JiraComment] {
        self.fields
            .comment
            .as_ref()
            .map(|c| c.comments.as_slice())
            .unwrap_or(&[])
    }

    pub fn histories(&self) -> &[JiraHistory] {
        self.changelog
            .as_ref()
            .map(|c| c.histories.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraStatus {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraCommentPage {
    #[serde(default)]
    pub comments: Vec<JiraComment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraComment {
    #[serde(default)]
    pub author: JiraUser,

    #[serde(default)]
    pub body: String,

    /// Creation time as `YYYY-MM-DDTHH:MM:SS.mmm±hhmm`.
    #[serde(default)]
    pub created: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraChangelog {
    #[serde(default)]
    pub histories: Vec<JiraHistory>,
}

/// One history entry: a set of field changes made together by one author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraHistory {
    #[serde(default)]
    pub author: JiraUser,

    #[serde(default)]
    pub created: String,

    #[serde(default)]
    pub items: Vec<JiraHistoryItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraHistoryItem {
    #[serde(default)]
    pub field: String,

    #[serde(default, rename = "fromString")]
    pub from_text: Option<String>,

    #[serde(default, rename = "toString")]
    pub to_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        let err = JiraClient::new("://invalid-url", "user", "token").unwrap_err();
        assert!(matches!(err, ActivityError::Config(_)));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = JiraClient::new("https://test.atlassian.net/", "user", "token").unwrap();
        assert_eq!(client.base_url(), "https://test.atlassian.net");
    }

    #[test]
    fn test_debug_hides_token() {
        let client = JiraClient::new("https://test.atlassian.net", "user", "s3cret").unwrap();
        assert!(!format!("{:?}", client).contains("s3cret"));
    }

    #[test]
    fn test_deserialize_issue() {
        let json = r#"{
            "key": "JIRA-123",
            "fields": {
                "summary": "Test Issue",
                "status": {"name": "In Progress"},
                "comment": {"comments": [{
                    "author": {"displayName": "Test User", "accountId": "user123"},
                    "body": "A comment",
                    "created": "2023-01-01T12:00:00.000+0000"
                }]}
            },
            "changelog": {"histories": [{
                "author": {"displayName": "Test User", "accountId": "user123"},
                "created": "2023-01-01T12:00:00.000+0000",
                "items": [{"field": "status", "fromString": "Open", "toString": "In Progress"}]
            }]}
        }"#;

        let issue: JiraIssue = serde_json::from_str(json).unwrap();

        assert_eq!(issue.key, "JIRA-123");
        assert_eq!(issue.status_name(), "In Progress");
        assert_eq!(issue.comments().len(), 1);
        assert_eq!(issue.comments()[0].author.display_name, "Test User");
        assert_eq!(issue.histories()[0].items[0].to_text.as_deref(), Some("In Progress"));
    }

    #[test]
    fn test_deserialize_issue_without_optional_sections() {
        let issue: JiraIssue = serde_json::from_str(r#"{"key": "JIRA-9"}"#).unwrap();

        assert_eq!(issue.status_name(), "");
        assert!(issue.comments().is_empty());
        assert!(issue.histories().is_empty());
    }
}
