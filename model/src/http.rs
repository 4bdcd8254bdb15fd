use crate::config::EmitterConfig;
use crate::emitter::{EmitReceipt, TelemetryEmitter, TelemetryError, TelemetryResult};
use crate::types::Reading;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

/// Posts each snapshot as a JSON array to the configured endpoint.
pub struct HttpEmitter {
    client: reqwest::Client,
    config: EmitterConfig,
}

impl HttpEmitter {
    pub fn new(config: EmitterConfig) -> TelemetryResult<Self> {
        config
            .validate()
            .map_err(|message| TelemetryError::InvalidConfig { message })?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TelemetryError::InvalidConfig {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    pub fn with_default_config() -> TelemetryResult<Self> {
        Self::new(EmitterConfig::default())
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn handle_http_error(err: reqwest::Error) -> TelemetryError {
        if err.is_timeout() {
            TelemetryError::Timeout
        } else if err.is_connect() {
            TelemetryError::Unreachable {
                message: err.to_string(),
            }
        } else {
            TelemetryError::Network(err)
        }
    }
}

#[async_trait]
impl TelemetryEmitter for HttpEmitter {
    async fn emit(&self, snapshot: &[Reading]) -> TelemetryResult<EmitReceipt> {
        debug!(
            endpoint = %self.config.endpoint,
            readings = snapshot.len(),
            "posting snapshot"
        );

        let body = serde_json::to_vec(snapshot)?;

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(Self::handle_http_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TelemetryError::Rejected {
                status: status.as_u16(),
            });
        }

        Ok(EmitReceipt {
            readings: snapshot.len(),
            status: status.as_u16(),
        })
    }

    fn emitter_name(&self) -> &'static str {
        "http"
    }
}
