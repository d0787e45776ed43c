//! OpenAI-compatible answer generator.
//!
//! Uses the `async-openai` crate for the chat completions API. The `(query,
//! context)` pair is rendered into the Spanish answer prompt and sent as a
//! single user message; the reply is trimmed before it is returned.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, CreateChatCompletionRequest,
};
use consulta_core::llm::generator::AnswerGenerator;
use consulta_core::llm::prompt::build_answer_prompt;
use consulta_types::llm::{GenerationSettings, LlmError};
use secrecy::{ExposeSecret, SecretString};

/// Answer generator backed by an OpenAI-compatible chat completions API.
pub struct OpenAiAnswerGenerator {
    client: Client<OpenAIConfig>,
    settings: GenerationSettings,
}

impl OpenAiAnswerGenerator {
    pub fn new(api_key: &SecretString, base_url: &str, settings: GenerationSettings) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(base_url.trim_end_matches('/'));

        Self {
            client: Client::with_config(openai_config),
            settings,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Build the chat completion request for one question.
    fn build_request(&self, query: &str, context: &str) -> CreateChatCompletionRequest {
        let prompt = build_answer_prompt(query, context);
        let messages = vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(prompt),
                name: None,
            },
        )];

        CreateChatCompletionRequest {
            model: self.settings.model.clone(),
            messages,
            max_completion_tokens: Some(self.settings.max_tokens),
            temperature: Some(self.settings.temperature),
            ..Default::default()
        }
    }
}

impl AnswerGenerator for OpenAiAnswerGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    #[tracing::instrument(name = "openai_answer", skip_all, fields(model = %self.settings.model))]
    async fn answer(&self, query: &str, context: &str) -> Result<String, LlmError> {
        let request = self.build_request(query, context);

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion usage"
            );
        }

        Ok(content.trim().to_string())
    }
}

/// Map async-openai errors to our `LlmError` type.
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "invalid_api_key"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                LlmError::RateLimited {
                    retry_after_ms: None,
                }
            } else if code == "context_length_exceeded"
                || api_err.message.contains("maximum context length")
            {
                LlmError::ContextLengthExceeded
            } else if code == "server_error" || error_type == "overloaded_error" {
                LlmError::Overloaded(api_err.message.clone())
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) => LlmError::AuthenticationFailed,
            Some(429) => LlmError::RateLimited {
                retry_after_ms: None,
            },
            Some(503) | Some(529) => LlmError::Overloaded(err.to_string()),
            _ => LlmError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> OpenAiAnswerGenerator {
        OpenAiAnswerGenerator::new(
            &SecretString::from("sk-test".to_string()),
            "https://api.openai.com/v1/",
            GenerationSettings::default(),
        )
    }

    #[test]
    fn test_name_and_settings() {
        let generator = generator();
        assert_eq!(generator.name(), "openai");
        assert_eq!(generator.settings().model, "gpt-4o-mini");
    }

    #[test]
    fn test_build_request() {
        let request = generator().build_request("¿Qué es RAG?", "[Fuente: a.md | Score: 0.1000]\nRAG");
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.max_completion_tokens, Some(500));
        assert_eq!(request.temperature, Some(0.0));
        assert!(request.stream.is_none());

        match &request.messages[0] {
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: ChatCompletionRequestUserMessageContent::Text(text),
                ..
            }) => {
                assert!(text.contains("Contexto relevante:\n[Fuente: a.md"));
                assert!(text.contains("Pregunta del usuario:\n¿Qué es RAG?"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_argument_maps_to_invalid_request() {
        let err = map_openai_error(async_openai::error::OpenAIError::InvalidArgument(
            "model is required".to_string(),
        ));
        assert!(matches!(err, LlmError::InvalidRequest(msg) if msg == "model is required"));
    }
}
