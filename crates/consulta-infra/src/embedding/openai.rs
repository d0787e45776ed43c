//! OpenAI embeddings provider using the `/embeddings` endpoint.
//!
//! Works against any OpenAI-compatible server that exposes the same
//! request/response shape (Azure-style gateways, local proxies).

use consulta_core::retrieval::embedder::Embedder;
use consulta_types::config::EmbeddingConfig;
use consulta_types::error::EmbeddingError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Embedder backed by an OpenAI-compatible embeddings API.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: SecretString, config: &EmbeddingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: normalize_base_url(&config.base_url),
            model: config.model.clone(),
        }
    }

    /// The endpoint requests are posted to.
    pub fn endpoint(&self) -> String {
        embeddings_endpoint(&self.base_url)
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

fn has_version_suffix(base_url: &str) -> bool {
    let Some(last_segment) = base_url.rsplit('/').next() else {
        return false;
    };
    let Some(rest) = last_segment.strip_prefix('v') else {
        return false;
    };
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
}

fn embeddings_endpoint(base_url: &str) -> String {
    let normalized = normalize_base_url(base_url);
    if normalized.ends_with("/embeddings") {
        return normalized;
    }
    if has_version_suffix(&normalized) {
        return format!("{normalized}/embeddings");
    }
    format!("{normalized}/v1/embeddings")
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// Order the returned vectors by their `index` field and check the count.
fn into_vectors(
    response: EmbeddingResponse,
    expected: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let mut data = response.data;
    if data.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: data.len(),
        });
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}

impl Embedder for OpenAiEmbedder {
    #[tracing::instrument(name = "openai_embed", skip_all, fields(model = %self.model, count = texts.len()))]
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbeddingError::Provider(e.to_string()))?
            .error_for_status()
            .map_err(|e| EmbeddingError::Provider(e.to_string()))?
            .json::<EmbeddingResponse>()
            .await
            .map_err(|e| EmbeddingError::Provider(format!("invalid embeddings response: {e}")))?;

        into_vectors(response, texts.len())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
