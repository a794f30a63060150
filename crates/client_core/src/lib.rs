use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::SelectionState,
    error::{rejection_message, ErrorBody, SelectionError},
    protocol::{
        meditation_path, GenerateMeditationRequest, MeditationResult, GENERATE_MEDITATION_PATH,
    },
};
use tracing::{info, warn};
use url::Url;

pub mod config;
pub mod error;

pub use error::GenerateError;

/// Anything that can turn a request into a generated meditation.
#[async_trait]
pub trait MeditationService: Send + Sync {
    async fn generate(
        &self,
        request: &GenerateMeditationRequest,
    ) -> Result<MeditationResult, GenerateError>;
}

/// HTTP client for the meditation backend.
pub struct MeditationClient {
    http: Client,
    server_url: Url,
}

impl MeditationClient {
    /// Fails for URLs that cannot anchor a path, such as `localhost:5000`
    /// (parsed as scheme `localhost`).
    pub fn new(server_url: &str) -> Result<Self, url::ParseError> {
        let server_url = Url::parse(server_url)?;
        if server_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithoutBase);
        }
        Ok(Self {
            http: Client::new(),
            server_url,
        })
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    /// Fetches a meditation the backend stored earlier.
    pub async fn get_meditation(&self, id: i64) -> Result<MeditationResult, GenerateError> {
        let endpoint = self
            .server_url
            .join(&meditation_path(id))
            .map_err(GenerateError::transport)?;

        info!(id, "fetching stored meditation");
        let response = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(GenerateError::transport)?;

        match read_meditation(response).await {
            Err(GenerateError::Rejected { status: 404, .. }) => Err(GenerateError::Rejected {
                status: 404,
                message: format!("Meditation {id} not found"),
            }),
            other => other,
        }
    }

    /// Resolves a possibly relative audio reference against the server URL.
    pub fn resolve_audio_url(&self, audio_url: &str) -> String {
        resolve_against(&self.server_url, audio_url)
    }
}

pub fn resolve_against(base: &Url, reference: &str) -> String {
    base.join(reference)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| reference.to_string())
}

#[async_trait]
impl MeditationService for MeditationClient {
    async fn generate(
        &self,
        request: &GenerateMeditationRequest,
    ) -> Result<MeditationResult, GenerateError> {
        let endpoint = self
            .server_url
            .join(GENERATE_MEDITATION_PATH)
            .map_err(GenerateError::transport)?;

        info!(
            emotions = ?request.emotions,
            goals = ?request.goals,
            outcomes = ?request.outcomes,
            "sending meditation request"
        );

        let response = self
            .http
            .post(endpoint)
            .json(request)
            .send()
            .await
            .map_err(GenerateError::transport)?;
        let result = read_meditation(response).await?;
        info!(
            script_chars = result.script.len(),
            audio_url = %result.audio_url,
            "meditation generated"
        );
        Ok(result)
    }
}

/// Splits 2xx from everything else and checks the required fields of a
/// successful body.
async fn read_meditation(response: reqwest::Response) -> Result<MeditationResult, GenerateError> {
    let status = response.status();
    let body = response.bytes().await.map_err(GenerateError::transport)?;

    if !status.is_success() {
        let message = rejection_message(&body);
        let error_type = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.error_type);
        warn!(
            status = status.as_u16(),
            error_type = error_type.as_deref().unwrap_or("unknown"),
            %message,
            "meditation request rejected"
        );
        return Err(GenerateError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let result: MeditationResult = serde_json::from_slice(&body)
        .map_err(|err| GenerateError::transport(format!("invalid meditation response: {err}")))?;
    if let Some(field) = result.missing_required_field() {
        return Err(GenerateError::transport(format!(
            "invalid meditation response: missing {field}"
        )));
    }
    Ok(result)
}

/// Re-validates the selection and issues exactly one request when it is
/// complete. Nothing is sent for an incomplete selection.
pub async fn generate_for_selection(
    service: &dyn MeditationService,
    selection: &SelectionState,
) -> Result<MeditationResult, GenerateError> {
    let validation = selection.validate();
    if !validation.is_valid() {
        return Err(SelectionError::Incomplete {
            missing: validation.missing().to_vec(),
        }
        .into());
    }
    service
        .generate(&GenerateMeditationRequest::from_selection(selection))
        .await
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
