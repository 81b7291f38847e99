//! Workflow service: submit, delete and link workflows.

use http::{Method, StatusCode};
use tracing::{debug, info, warn};

use argonaut_core::{Workflow, WorkflowCreateRequest};

use crate::auth::BearerToken;
use crate::config::{ServiceConfig, check_segment};
use crate::error::ClientResult;
use crate::transport::{HttpResponse, Transport};

/// Outcome of a successful delete.
#[derive(Debug, Clone)]
pub struct DeleteResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

/// Client for the Argo workflow service API.
///
/// Assumes the Argo server (or a proxy in front of it) checks the bearer
/// token on every request.
pub struct WorkflowService {
    config: ServiceConfig,
    token: BearerToken,
    transport: Transport,
}

impl WorkflowService {
    pub fn new(config: ServiceConfig) -> ClientResult<Self> {
        config.validate()?;
        let token = config.bearer_token()?;
        let transport = Transport::new(&config)?;

        debug!(
            domain = %config.domain,
            namespace = %config.namespace,
            scheme = config.scheme(),
            "workflow service configured"
        );

        Ok(Self {
            config,
            token,
            transport,
        })
    }

    /// Namespace used by [`delete`](Self::delete) and
    /// [`workflow_link`](Self::workflow_link).
    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    /// Create `workflow` in `namespace` and return the server's copy.
    pub async fn submit(&self, workflow: &Workflow, namespace: &str) -> ClientResult<Workflow> {
        check_segment(namespace)?;
        let path = format!("/api/v1/workflows/{namespace}");
        let body = serde_json::to_vec(&WorkflowCreateRequest::new(namespace, workflow.clone()))?;

        let response = self.call(Method::POST, &path, Some(body)).await?;
        let created: Workflow = serde_json::from_slice(&response.body)?;

        info!(
            namespace,
            workflow = created.display_name(),
            uid = created.metadata.uid.as_deref().unwrap_or(""),
            "workflow submitted"
        );
        Ok(created)
    }

    /// Delete the named workflow from the service namespace.
    pub async fn delete(&self, name: &str) -> ClientResult<DeleteResponse> {
        check_segment(name)?;
        let path = format!("/api/v1/workflows/{}/{name}", self.config.namespace);

        let response = self.call(Method::DELETE, &path, None).await?;
        let body = if response.body.is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_slice(&response.body)?
        };

        info!(namespace = %self.config.namespace, workflow = name, "workflow deleted");
        Ok(DeleteResponse {
            status: response.status,
            body,
        })
    }

    /// UI link for the named workflow. Only meaningful for the Argo UI.
    pub fn workflow_link(&self, name: &str) -> ClientResult<String> {
        self.config.workflow_link(name)
    }

    async fn call(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> ClientResult<HttpResponse> {
        let response = self
            .transport
            .send(method.clone(), path, self.token.header_value()?, body)
            .await?;

        if !response.status.is_success() {
            warn!(%method, path, status = %response.status, "argo server rejected request");
        }
        response.error_for_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    fn service() -> WorkflowService {
        WorkflowService::new(ServiceConfig::new("argo.example.com", "t").with_namespace("ci")).unwrap()
    }

    #[test]
    fn link_points_at_workflow_tab() {
        assert_eq!(
            service().workflow_link("build-x7k2").unwrap(),
            "https://argo.example.com/workflows/ci/build-x7k2?tab=workflow"
        );
    }

    #[test]
    fn new_requires_token() {
        let config = ServiceConfig::from_toml_str(r#"domain = "argo.example.com""#).unwrap();
        assert!(matches!(WorkflowService::new(config), Err(ClientError::Config(_))));
    }

    #[test]
    fn path_segments_are_checked() {
        assert!(check_segment("build-1").is_ok());
        assert!(check_segment("").is_err());
        assert!(check_segment("a/b").is_err());
        assert!(check_segment("a?b").is_err());
    }

    #[test]
    fn namespace_comes_from_config() {
        assert_eq!(service().namespace(), "ci");
    }
}
