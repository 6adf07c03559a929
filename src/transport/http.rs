use super::schema::interpret_response;
use super::scrub::{redact_url, scrub_secret_patterns};
use super::wire::WireFormat;
use super::{ChatRequest, ChatTransport};
use crate::config::{PersonaConfig, TransportConfig};
use crate::error::{ConfigError, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Chat transport over HTTP POST with a JSON body.
pub struct HttpTransport {
    endpoint: Url,
    wire: WireFormat,
    assistant_name: String,
    client: Client,
}

fn build_client(timeout_secs: Option<u64>) -> Client {
    let mut builder = Client::builder()
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60));
    // Without a configured timeout, connect and read waits are left to the OS.
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().unwrap_or_else(|_| Client::new())
}

impl HttpTransport {
    pub fn new(endpoint: Url, wire: WireFormat, assistant_name: impl Into<String>) -> Self {
        Self {
            endpoint,
            wire,
            assistant_name: assistant_name.into(),
            client: build_client(None),
        }
    }

    pub fn from_config(
        config: &TransportConfig,
        persona: &PersonaConfig,
    ) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(config.endpoint.trim()).map_err(|e| {
            ConfigError::Validation(format!(
                "transport.endpoint '{}' is not an absolute URL: {e}",
                scrub_secret_patterns(&config.endpoint)
            ))
        })?;
        Ok(Self {
            endpoint,
            wire: config.wire_format,
            assistant_name: persona.name.clone(),
            client: build_client(config.timeout_secs),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn wire_format(&self) -> WireFormat {
        self.wire
    }
}

fn network_error(err: reqwest::Error) -> TransportError {
    TransportError::Network(err.without_url().to_string())
}

#[async_trait]
impl ChatTransport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, request: &ChatRequest) -> Result<String, TransportError> {
        let body = self.wire.encode(request, &self.assistant_name);
        tracing::debug!(
            endpoint = %redact_url(&self.endpoint),
            wire = %self.wire,
            history = request.history.len(),
            context_chars = request.context.chars().count(),
            "sending chat request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let text = response.text().await.map_err(network_error)?;

        let result = interpret_response(status, content_type.as_deref(), &text);
        match &result {
            Ok(answer) => tracing::debug!(status, answer_chars = answer.len(), "chat reply received"),
            Err(TransportError::MalformedResponse { excerpt, .. }) => tracing::warn!(
                status,
                content_type = content_type.as_deref().unwrap_or("<none>"),
                excerpt = %scrub_secret_patterns(excerpt),
                "chat endpoint returned non-JSON; check the endpoint route"
            ),
            Err(err) => tracing::warn!(status, error = %scrub_secret_patterns(&err.to_string()), "chat request failed"),
        }
        result
    }
}
