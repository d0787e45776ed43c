//! Answer generator implementations.
//!
//! Provides the OpenAI-compatible [`openai::OpenAiAnswerGenerator`] and the
//! [`create_answer_generator`] factory that builds it from the `[llm]`
//! config section.

pub mod openai;

use secrecy::SecretString;

use consulta_core::llm::box_generator::BoxAnswerGenerator;
use consulta_types::config::LlmConfig;

use self::openai::OpenAiAnswerGenerator;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Read the API key from `OPENAI_API_KEY`. Empty values count as missing.
pub fn resolve_api_key() -> Option<SecretString> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}

/// Create a [`BoxAnswerGenerator`] from the `[llm]` config section.
pub fn create_answer_generator(config: &LlmConfig, api_key: &SecretString) -> BoxAnswerGenerator {
    let generator =
        OpenAiAnswerGenerator::new(api_key, &config.base_url, config.generation_settings());
    tracing::debug!(model = %config.model, base_url = %config.base_url, "answer generator ready");
    BoxAnswerGenerator::new(generator)
}
