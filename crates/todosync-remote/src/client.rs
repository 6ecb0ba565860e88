//! HTTP client for the Motion task API

use crate::dto::{ListTasksDto, TaskDto, TaskPayload};
use crate::error::{RemoteError, RemoteResult};
use crate::store::RemoteStore;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;
use todosync_model::{RemoteDraft, RemoteId, RemoteRecord};

/// Default Motion API root
pub const DEFAULT_BASE_URL: &str = "https://api.usemotion.com/v1";

/// Environment variable holding the API credential
pub const API_TOKEN_ENV: &str = "MOTION_API_TOKEN";

/// Environment variable holding the optional workspace id
pub const WORKSPACE_ID_ENV: &str = "MOTION_WORKSPACE_ID";

/// Environment variable overriding the API root
pub const BASE_URL_ENV: &str = "MOTION_BASE_URL";

const API_KEY_HEADER: &str = "x-api-key";

/// Remote client configuration
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// API root, e.g. `https://api.usemotion.com/v1`
    pub base_url: String,
    /// Credential sent as `X-API-Key`
    pub api_key: String,
    /// Workspace to create tasks in and list from
    pub workspace_id: Option<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// Config for the default API root
    #[inline]
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            workspace_id: None,
            timeout_secs: 30,
        }
    }

    /// Set API root
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set workspace
    #[inline]
    #[must_use]
    pub fn with_workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    /// Set request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("workspace_id", &self.workspace_id)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Motion task API client
///
/// Built once from an explicit [`RemoteConfig`] and passed to the engine
/// as a [`RemoteStore`].
#[derive(Debug, Clone)]
pub struct MotionClient {
    client: Client,
    base_url: Url,
    workspace_id: Option<String>,
}

impl MotionClient {
    /// Create client
    ///
    /// # Errors
    /// [`RemoteError::Config`] if the base URL or credential is unusable.
    pub fn new(config: RemoteConfig) -> RemoteResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RemoteError::Config(format!("base url {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::Config(format!(
                "base url {} cannot carry a path",
                config.base_url
            )));
        }

        let mut key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| RemoteError::Config("api key is not a valid header value".into()))?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            workspace_id: config.workspace_id,
        })
    }

    /// `<base>/tasks[/<id>]`
    fn tasks_url(&self, id: Option<&RemoteId>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("tasks");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    async fn fetch_page(&self, cursor: Option<&str>) -> RemoteResult<ListTasksDto> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }
        if let Some(workspace_id) = self.workspace_id.as_deref() {
            query.push(("workspaceId", workspace_id));
        }

        let response = self
            .client
            .get(self.tasks_url(None))
            .query(&query)
            .send()
            .await?;
        decode(check_status(response).await?, "GET /tasks").await
    }
}

#[async_trait]
impl RemoteStore for MotionClient {
    async fn list(&self) -> RemoteResult<Vec<RemoteRecord>> {
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.fetch_page(cursor.as_deref()).await?;
            let meta = page.meta.unwrap_or_default();
            tracing::debug!(
                "Fetched page of {} task(s) (page size {:?})",
                page.tasks.len(),
                meta.page_size
            );
            records.extend(page.tasks.into_iter().map(RemoteRecord::from));

            match meta.next_cursor {
                Some(next) if !next.is_empty() => {
                    if !seen.insert(next.clone()) {
                        return Err(RemoteError::PaginationLoop(next));
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        tracing::debug!("Fetched {} task(s) from remote", records.len());
        Ok(records)
    }

    async fn create(&self, draft: &RemoteDraft) -> RemoteResult<RemoteRecord> {
        let payload = TaskPayload::new(draft, self.workspace_id.as_deref());
        let response = self
            .client
            .post(self.tasks_url(None))
            .json(&payload)
            .send()
            .await?;
        let task: TaskDto = decode(check_status(response).await?, "POST /tasks").await?;
        Ok(task.into())
    }

    async fn update(&self, id: &RemoteId, draft: &RemoteDraft) -> RemoteResult<()> {
        let payload = TaskPayload::new(draft, None);
        let response = self
            .client
            .put(self.tasks_url(Some(id)))
            .json(&payload)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete(&self, id: &RemoteId) -> RemoteResult<()> {
        let response = self.client.delete(self.tasks_url(Some(id))).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Map non-2xx responses to [`RemoteError::Status`]
async fn check_status(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::status(status.as_u16(), body))
}

async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> RemoteResult<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| RemoteError::Decode {
        context: context.to_string(),
        source,
    })
}
