use faq_rag::RagError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AnswerPayload {
    pub question: Option<String>,
}

impl AnswerPayload {
    /// The question text, provided it is present and not blank.
    pub fn into_question(self) -> Result<String, RagError> {
        match self.question {
            Some(question) if !question.trim().is_empty() => Ok(question),
            _ => Err(RagError::MissingQuestion),
        }
    }
}
