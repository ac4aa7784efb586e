use crate::error::{RagError, RagResult};
use crate::models::*;
use crate::openai_service::ChatCompletion;
use crate::retriever::Retriever;
use std::sync::Arc;

pub const NO_CONTEXT_ANSWER: &str = "No relevant context found for the given question.";

pub const SYSTEM_PROMPT: &str = r#"Given the following context and a question, generate an answer based on this context only. In the answer try to provide as much text as possible from "Answer" section in the source document context without making much changes. If the answer is not found in the context, kindly state "I don't know." Don't try to make up an answer."#;

/// Answers a question from the single best matching dataset record.
pub struct QueryService {
    retriever: Arc<dyn Retriever>,
    chat: Arc<dyn ChatCompletion>,
    sampling: SamplingParams,
}

impl QueryService {
    pub fn new(retriever: Arc<dyn Retriever>, chat: Arc<dyn ChatCompletion>) -> Self {
        Self {
            retriever,
            chat,
            sampling: SamplingParams::default(),
        }
    }

    pub async fn answer(&self, question: &str) -> RagResult<String> {
        if question.trim().is_empty() {
            return Err(RagError::MissingQuestion);
        }

        let matches = self.retriever.retrieve(question).await?;
        let Some(best) = matches.into_iter().next() else {
            log::info!("No record met the similarity threshold");
            return Ok(NO_CONTEXT_ANSWER.to_string());
        };

        log::debug!("Answering from record {} (score {:.3})", best.record.row, best.score);

        let context = best.record.to_string();
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_user_message(&context, question)),
        ];

        let choices = self.chat.complete(&messages, &self.sampling).await?;

        // The last choice wins when the model returns several.
        choices
            .last()
            .map(|text| text.trim().to_string())
            .ok_or(RagError::NoCompletion)
    }
}

fn build_user_message(context: &str, question: &str) -> String {
    format!("Context: {}\nQuestion: {}", context, question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct StubRetriever {
        result: fn() -> RagResult<Vec<ScoredRecord>>,
    }

    #[async_trait]
    impl Retriever for StubRetriever {
        async fn retrieve(&self, _question: &str) -> RagResult<Vec<ScoredRecord>> {
            (self.result)()
        }
    }

    struct StubChat {
        choices: Vec<String>,
        calls: AtomicUsize,
        last_messages: Mutex<Vec<ChatMessage>>,
    }

    impl StubChat {
        fn new(choices: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                choices: choices.iter().map(|c| c.to_string()).collect(),
                calls: AtomicUsize::new(0),
                last_messages: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ChatCompletion for StubChat {
        async fn complete(&self, messages: &[ChatMessage], sampling: &SamplingParams) -> RagResult<Vec<String>> {
            assert_eq!(*sampling, SamplingParams::default());
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_messages.lock().unwrap() = messages.to_vec();
            Ok(self.choices.clone())
        }
    }

    fn two_matches() -> RagResult<Vec<ScoredRecord>> {
        Ok(vec![
            ScoredRecord {
                record: Record {
                    row: 4,
                    question: "Is there a student discount?".to_string(),
                    answer: "Students get 20% off with a valid ID.".to_string(),
                },
                score: 0.93,
            },
            ScoredRecord {
                record: Record {
                    row: 9,
                    question: "Is there a senior discount?".to_string(),
                    answer: "Seniors get 10% off.".to_string(),
                },
                score: 0.81,
            },
        ])
    }

    fn no_matches() -> RagResult<Vec<ScoredRecord>> {
        Ok(Vec::new())
    }

    fn failing() -> RagResult<Vec<ScoredRecord>> {
        Err(RagError::EmbeddingService("connection refused".to_string()))
    }

    fn service(result: fn() -> RagResult<Vec<ScoredRecord>>, chat: Arc<StubChat>) -> QueryService {
        QueryService::new(Arc::new(StubRetriever { result }), chat)
    }

    #[tokio::test]
    async fn blank_question_is_rejected_before_retrieval() {
        let chat = StubChat::new(&["unused"]);
        let service = service(failing, chat.clone());
        for question in ["", "   \n"] {
            let err = service.answer(question).await.unwrap_err();
            assert!(matches!(err, RagError::MissingQuestion));
        }
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_match_short_circuits_without_chat_call() {
        let chat = StubChat::new(&["unused"]);
        let answer = service(no_matches, chat.clone()).answer("Do you sell gift cards?").await.unwrap();
        assert_eq!(answer, NO_CONTEXT_ANSWER);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn prompts_with_best_record_only() {
        let chat = StubChat::new(&["  Students get 20% off with a valid ID.\n"]);
        let answer = service(two_matches, chat.clone())
            .answer("Do students get a discount?")
            .await
            .unwrap();
        assert_eq!(answer, "Students get 20% off with a valid ID.");
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);

        let messages = chat.last_messages.lock().unwrap().clone();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(SYSTEM_PROMPT));
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(
            messages[1].content,
            "Context: Question: Is there a student discount?\nAnswer: Students get 20% off with a valid ID.\n\
             Question: Do students get a discount?"
        );
        assert!(!messages[1].content.contains("senior"));
    }

    #[tokio::test]
    async fn last_choice_is_returned() {
        let chat = StubChat::new(&["A", "B"]);
        let answer = service(two_matches, chat).answer("Student discount?").await.unwrap();
        assert_eq!(answer, "B");
    }

    #[tokio::test]
    async fn zero_choices_is_an_error() {
        let chat = StubChat::new(&[]);
        let err = service(two_matches, chat).answer("Student discount?").await.unwrap_err();
        assert!(matches!(err, RagError::NoCompletion));
    }

    #[tokio::test]
    async fn retrieval_errors_propagate_unchanged() {
        let chat = StubChat::new(&["unused"]);
        let err = service(failing, chat.clone()).answer("Student discount?").await.unwrap_err();
        assert_eq!(err.to_string(), "embedding service error: connection refused");
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }
}
