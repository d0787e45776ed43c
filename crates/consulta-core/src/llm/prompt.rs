//! Prompt templates for answer generation.
//!
//! Providers call [`build_answer_prompt`] to turn the `(query, context)`
//! pair of [`super::generator::AnswerGenerator::answer`] into the single
//! instruction sent to the model.

/// Assistant instructions preceding the context block.
const ANSWER_INSTRUCTIONS: &str = "Eres un asistente para un chatbot. \
Tu tarea es responder preguntas del usuario utilizando el contexto proporcionado. \
Además, puedes identificar y describir figuras, imágenes y tablas presentes en los documentos.\n\n\
Instrucciones:\n\
- Mantén un tono formal y conciso.\n\
- Utiliza ejemplos o explicaciones cuando sean útiles.\n\
- Responde únicamente a preguntas legales y apropiadas.\n\n";

/// Build the full answer prompt for a query and its context.
pub fn build_answer_prompt(query: &str, context: &str) -> String {
    format!(
        "{ANSWER_INSTRUCTIONS}Contexto relevante:\n{context}\n\n\
         Pregunta del usuario:\n{query}\n\n\
         Respuesta detallada y profesional:"
    )
}
