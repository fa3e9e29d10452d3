use async_trait::async_trait;
use std::collections::HashSet;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::{debug, info, warn};

use super::errors::{N8nError, Result};
use super::types::{CreateResponse, WorkflowList, WorkflowRecord};
use crate::config::{Credentials, N8nConfig};
use crate::workflows::WorkflowDefinition;

/// Header carrying the n8n public API key
pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

const WORKFLOWS_PATH: &str = "/api/v1/workflows";

/// Workflow operations against n8n, abstracted so the provisioner can be
/// driven by fakes in tests.
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// List every workflow known to n8n.
    ///
    /// Returns `Ok(None)` when n8n answers with anything other than `200 OK`.
    async fn list_workflows(&self) -> Result<Option<Vec<WorkflowRecord>>>;

    /// Submit a workflow definition, returning the id n8n assigned.
    ///
    /// Returns `Ok(None)` when n8n did not answer `201 Created`.
    async fn create_workflow(&self, definition: &WorkflowDefinition) -> Result<Option<String>>;

    /// Whether a workflow with exactly this name exists.
    ///
    /// A failed listing is reported as "does not exist".
    async fn workflow_exists(&self, name: &str) -> Result<bool> {
        match self.list_workflows().await? {
            Some(workflows) => Ok(workflows.iter().any(|w| w.name == name)),
            None => Ok(false),
        }
    }
}

/// HTTP client for the n8n public REST API
#[derive(Debug, Clone)]
pub struct N8nClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl N8nClient {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder().default_headers(headers).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        debug!(base_url = %base_url, credentials = ?credentials, "Created n8n client");

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn from_config(config: &N8nConfig) -> Result<Self> {
        Self::new(config.base_url(), config.credentials())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn workflows_url(&self) -> String {
        format!("{}{}", self.base_url, WORKFLOWS_PATH)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::ApiKey(key) => request.header(API_KEY_HEADER, key),
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::Anonymous => request,
        }
    }

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Option<WorkflowList>> {
        let mut request = self.http.get(self.workflows_url());
        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor)]);
        }

        let response = self.authorize(request).send().await?;
        let status = response.status();
        // Anything but 200 counts as a failed listing, including other 2xx codes
        if status != StatusCode::OK {
            debug!(status = %status, "Workflow listing did not return 200");
            return Ok(None);
        }

        let body = response.text().await?;
        let page = serde_json::from_str(&body).map_err(|source| N8nError::Decode {
            context: "listing workflows",
            source,
        })?;
        Ok(Some(page))
    }
}

#[async_trait]
impl WorkflowApi for N8nClient {
    async fn list_workflows(&self) -> Result<Option<Vec<WorkflowRecord>>> {
        let mut workflows = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen_cursors = HashSet::new();

        loop {
            let Some(page) = self.fetch_page(cursor.as_deref()).await? else {
                return Ok(None);
            };
            workflows.extend(page.data);

            match page.next_cursor {
                Some(next) if seen_cursors.insert(next.clone()) => cursor = Some(next),
                Some(next) => {
                    warn!(cursor = %next, "Workflow listing cursor repeated, stopping pagination");
                    break;
                }
                None => break,
            }
        }

        debug!(count = workflows.len(), "Listed workflows");
        Ok(Some(workflows))
    }

    async fn create_workflow(&self, definition: &WorkflowDefinition) -> Result<Option<String>> {
        let request = self.http.post(self.workflows_url()).json(definition);
        let response = self.authorize(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::CREATED {
            warn!(workflow = %definition.name, status = %status, "n8n did not create workflow");
            println!("Failed to create workflow: {body}");
            return Ok(None);
        }

        let created: CreateResponse =
            serde_json::from_str(&body).map_err(|source| N8nError::Decode {
                context: "creating a workflow",
                source,
            })?;
        let id = created.into_id();

        info!(workflow = %definition.name, id = %id, "Created workflow");
        Ok(Some(id))
    }
}
