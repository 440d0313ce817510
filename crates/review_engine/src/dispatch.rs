use std::time::Duration;

use serde_json::{json, Value};

use crate::{ClassifyRequest, DispatchError, DispatchFailureKind, ModelSource};

/// Base URLs of the two producer services. The system and custom paths
/// are hosted separately, so each gets its own base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub system_base: String,
    pub custom_base: String,
}

impl Endpoints {
    /// Both producers behind one host, the common deployment.
    pub fn same(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            system_base: base.clone(),
            custom_base: base,
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::same("http://localhost:5000")
    }
}

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub endpoints: Endpoints,
    pub connect_timeout: Duration,
    /// Overall request budget. Classifying a long issue thread is slow,
    /// so this is generous, but it keeps a hung upstream from pinning
    /// the session in its loading phase forever.
    pub request_timeout: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    /// Runs one classification request and returns the producer's raw
    /// JSON response. Normalization happens elsewhere.
    async fn classify(&self, request: &ClassifyRequest) -> Result<Value, DispatchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestClassifier {
    settings: DispatchSettings,
}

impl ReqwestClassifier {
    pub fn new(settings: DispatchSettings) -> Self {
        Self { settings }
    }

    pub(crate) fn build_client(
        settings: &DispatchSettings,
    ) -> Result<reqwest::Client, DispatchError> {
        reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| DispatchError::new(DispatchFailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Classifier for ReqwestClassifier {
    async fn classify(&self, request: &ClassifyRequest) -> Result<Value, DispatchError> {
        if request.model_ref.trim().is_empty() {
            return Err(DispatchError::new(
                DispatchFailureKind::Validation,
                "model reference is empty",
            ));
        }
        if request.issue_url.trim().is_empty() {
            return Err(DispatchError::new(
                DispatchFailureKind::Validation,
                "issue url is empty",
            ));
        }

        let client = Self::build_client(&self.settings)?;
        let builder = match request.source {
            ModelSource::System => client
                .post(format!(
                    "{}/api/ml/classify",
                    self.settings.endpoints.system_base
                ))
                .bearer_auth(&request.token)
                .json(&json!({
                    "modelName": request.model_ref,
                    "issueUrl": request.issue_url,
                })),
            ModelSource::Custom => client
                .post(format!(
                    "{}/api/ml/predict",
                    self.settings.endpoints.custom_base
                ))
                .json(&json!({
                    "model": request.model_ref,
                    "github_url": request.issue_url,
                    "is_custom_model": true,
                })),
        };

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(upstream_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|err| {
            DispatchError::new(
                DispatchFailureKind::Upstream,
                format!("invalid response body: {err}"),
            )
        })
    }
}

/// Upstream failure message: the service's `error` field verbatim when
/// the body carries one, else the HTTP status line.
pub(crate) fn upstream_error(status: reqwest::StatusCode, body: &str) -> DispatchError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| status.to_string());
    DispatchError::new(DispatchFailureKind::Upstream, message)
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> DispatchError {
    if err.is_timeout() {
        return DispatchError::new(DispatchFailureKind::Timeout, err.to_string());
    }
    DispatchError::new(DispatchFailureKind::Network, err.to_string())
}
