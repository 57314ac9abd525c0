use crate::domain::model::ServerKind;
use crate::utils::diagnostics::Diagnostics;
use crate::utils::error::{ClientError, Result};
use reqwest::{Client, Method, Response};
use std::sync::Arc;
use url::Url;

/// Body sent with a control API request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
}

/// Shared HTTP plumbing for both gateway clients: URL building, failure
/// translation and per-label diagnostics.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base_url: Url,
    server: ServerKind,
    detail_key: &'static str,
    diagnostics: Arc<Diagnostics>,
}

impl Transport {
    pub fn new(
        client: Client,
        server_url: &str,
        server: ServerKind,
        detail_key: &'static str,
        diagnostics: Arc<Diagnostics>,
    ) -> Result<Self> {
        let base_url = Url::parse(server_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::ConfigError {
                message: format!("{} is not usable as a server base URL", server_url),
            });
        }

        Ok(Self {
            client,
            base_url,
            server,
            detail_key,
            diagnostics,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn server(&self) -> ServerKind {
        self.server
    }

    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// Absolute URL for an API path; the base URL's own path is replaced.
    pub fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| ClientError::ConfigError {
                message: format!("{} is not usable as a server base URL", self.base_url),
            })?
            .clear()
            .extend(segments);
        Ok(url)
    }

    pub async fn request(
        &self,
        method: Method,
        segments: &[&str],
        body: RequestBody,
        label: &str,
    ) -> Result<Response> {
        let url = self.url_for(segments)?;
        self.diagnostics.increment(&format!("{label}.request"));
        tracing::debug!("{} {} {} ({})", self.server, method, url, label);

        let builder = self.client.request(method, url);
        let builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(fields) => builder.form(&fields),
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                self.diagnostics.increment(&format!("{label}.client_error"));
                return Err(ClientError::communication(self.server.label(), err));
            }
        };

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let mut error_detail = vec![format!("{} server failure", self.server)];
            if let Some(detail) = self.error_detail(response).await {
                error_detail.push(detail);
            }
            if let Some(reason) = status.canonical_reason() {
                error_detail.push(reason.to_string());
            }
            self.diagnostics.increment(&format!("{label}.response_error"));
            return Err(ClientError::response(error_detail.join(": ")));
        }

        self.diagnostics.increment(&format!("{label}.success"));
        Ok(response)
    }

    pub async fn read_json(&self, response: Response) -> Result<serde_json::Value> {
        let body = self.read_text(response).await?;
        serde_json::from_str(&body).map_err(|err| {
            ClientError::response(format!(
                "{} server returned invalid JSON: {}: {}",
                self.server, err, body
            ))
        })
    }

    pub async fn read_text(&self, response: Response) -> Result<String> {
        response
            .text()
            .await
            .map_err(|err| ClientError::communication(self.server.label(), err))
    }

    /// Error message the server put in the body of a failed response, if any.
    async fn error_detail(&self, response: Response) -> Option<String> {
        let body = response.text().await.ok()?;
        let value: serde_json::Value = serde_json::from_str(&body).ok()?;
        value.get(self.detail_key).map(value_to_string)
    }
}

pub(crate) fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
