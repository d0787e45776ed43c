//! BoxAnswerGenerator -- object-safe dynamic dispatch wrapper for AnswerGenerator.
//!
//! 1. Define an object-safe `AnswerGeneratorDyn` trait with boxed futures
//! 2. Blanket-impl `AnswerGeneratorDyn` for all `T: AnswerGenerator`
//! 3. `BoxAnswerGenerator` wraps `Box<dyn AnswerGeneratorDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use consulta_types::llm::LlmError;

use super::generator::AnswerGenerator;

/// Object-safe version of [`AnswerGenerator`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch.
pub trait AnswerGeneratorDyn: Send + Sync {
    fn name(&self) -> &str;

    fn answer_boxed<'a>(
        &'a self,
        query: &'a str,
        context: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>>;
}

impl<T: AnswerGenerator> AnswerGeneratorDyn for T {
    fn name(&self) -> &str {
        AnswerGenerator::name(self)
    }

    fn answer_boxed<'a>(
        &'a self,
        query: &'a str,
        context: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, LlmError>> + Send + 'a>> {
        Box::pin(self.answer(query, context))
    }
}

/// Type-erased answer generator for runtime provider selection.
///
/// Since `AnswerGenerator` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxAnswerGenerator` provides equivalent methods that delegate
/// to the inner `AnswerGeneratorDyn` trait object.
pub struct BoxAnswerGenerator {
    inner: Box<dyn AnswerGeneratorDyn + Send + Sync>,
}

impl BoxAnswerGenerator {
    /// Wrap a concrete `AnswerGenerator` in a type-erased box.
    pub fn new<T: AnswerGenerator + 'static>(generator: T) -> Self {
        Self {
            inner: Box::new(generator),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Generate a response to `query` grounded in `context`.
    pub async fn answer(&self, query: &str, context: &str) -> Result<String, LlmError> {
        self.inner.answer_boxed(query, context).await
    }
}
