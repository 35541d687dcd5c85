use crate::config::Settings;
use crate::error::{Error, Result};
use crate::gitlab::options::{IssueFilters, ListOptions};
use crate::pagination::Page;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

const NEXT_PAGE_HEADER: &str = "x-next-page";
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const USER_AGENT: &str = concat!("gitlab-tables/", env!("CARGO_PKG_VERSION"));

/// Authenticated GitLab REST client. One per handler invocation.
pub struct GitlabClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl GitlabClient {
    /// Builds the client. No request is sent.
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(GitlabClient {
            http,
            base_url: settings.base_url.clone(),
            token: settings.token.clone(),
        })
    }

    pub async fn list_projects(&self, list: ListOptions) -> Result<Page> {
        self.get_page(self.get("/projects").query(&list)).await
    }

    pub async fn get_project(&self, id: i64) -> Result<Value> {
        let response = self.send(self.get(&format!("/projects/{id}"))).await?;
        Ok(response.json::<Value>().await?)
    }

    pub async fn list_issues(&self, filters: &IssueFilters, list: ListOptions) -> Result<Page> {
        self.get_page(self.get("/issues").query(&list).query(filters))
            .await
    }

    pub async fn list_project_issues(
        &self,
        project_id: i64,
        filters: &IssueFilters,
        list: ListOptions,
    ) -> Result<Page> {
        let path = format!("/projects/{project_id}/issues");
        self.get_page(self.get(&path).query(&list).query(filters))
            .await
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .header(TOKEN_HEADER, &self.token)
            .header("Accept", "application/json")
    }

    async fn get_page(&self, request: RequestBuilder) -> Result<Page> {
        let response = self.send(request).await?;
        let next_page = next_page(&response);
        let items = response.json::<Vec<Value>>().await?;
        Ok(Page { items, next_page })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(upstream_error(status.as_u16(), response.text().await));
        }
        Ok(response)
    }
}

/// Builds the error for a non-success response from its body text.
fn upstream_error(status: u16, body: reqwest::Result<String>) -> Error {
    let message = body.unwrap_or_else(|e| {
        warn!(status, error = %e, "failed to read error response body");
        String::new()
    });
    Error::Upstream { status, message }
}

/// Reads `X-Next-Page`. Absent, empty or malformed means no next page.
fn next_page(response: &Response) -> u32 {
    response
        .headers()
        .get(NEXT_PAGE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_keeps_body_verbatim() {
        let err = upstream_error(404, Ok(r#"{"message":"404 Not Found"}"#.to_string()));
        match err {
            Error::Upstream { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, r#"{"message":"404 Not Found"}"#);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn upstream_error_survives_unreadable_body() {
        let read_error = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let err = upstream_error(502, Err(read_error));
        assert!(matches!(err, Error::Upstream { status: 502, ref message } if message.is_empty()));
    }
}
