//! Advisory Gateway
//!
//! Assembles a prompt from the caller's stored records and forwards it to the
//! chat-completion provider. No retries, no caching.

pub mod influencers;
pub mod prompt;

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::GatewayError;
use crate::llm::{ChatProvider, ChatRequest, EventStream};
use crate::models::{AdviceRequest, Influencer};
use crate::store::{Document, DocumentStore, EXPENSES_COLLECTION, INVESTMENTS_COLLECTION};

use self::influencers::{fallback_influencers, parse_influencers};
use self::prompt::{
    build_advice_prompt, AdviceContext, ADVICE_SYSTEM_PROMPT, INFLUENCER_PROMPT,
    INFLUENCER_SYSTEM_PROMPT,
};

/// Outcome of an influencer lookup; `error` is set only when the model call failed
#[derive(Debug, Clone, PartialEq)]
pub struct InfluencerList {
    pub influencers: Vec<Influencer>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct AdvisoryGateway {
    store: Arc<dyn DocumentStore>,
    provider: Arc<dyn ChatProvider>,
}

impl AdvisoryGateway {
    pub fn new(store: Arc<dyn DocumentStore>, provider: Arc<dyn ChatProvider>) -> Self {
        Self { store, provider }
    }

    /// Answer a financial question, personalised when a user id resolves
    pub async fn advise(&self, request: &AdviceRequest) -> Result<String, GatewayError> {
        let chat_request = self.advice_request(request).await?;
        let response = self.provider.complete(chat_request).await?;

        info!(
            model = self.provider.model(),
            chars = response.text.len(),
            "advice generated"
        );
        Ok(response.text)
    }

    /// Same as [`advise`](Self::advise) but relays the reply as it is generated
    pub async fn advise_stream(&self, request: &AdviceRequest) -> Result<EventStream, GatewayError> {
        let chat_request = self.advice_request(request).await?;
        Ok(self.provider.stream_complete(chat_request).await?)
    }

    /// Ask the model for influencers, falling back to the static list
    ///
    /// Never returns an error: an upstream failure yields an empty list plus
    /// the error message.
    pub async fn list_influencers(&self) -> InfluencerList {
        let request = ChatRequest::with_system(INFLUENCER_SYSTEM_PROMPT, INFLUENCER_PROMPT);

        match self.provider.complete(request).await {
            Ok(response) => {
                let influencers = parse_influencers(&response.text).unwrap_or_else(|| {
                    warn!(raw = %response.text, "model returned invalid influencer JSON, using fallback");
                    fallback_influencers()
                });
                InfluencerList {
                    influencers,
                    error: None,
                }
            }
            Err(e) => InfluencerList {
                influencers: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }

    /// Load the caller's records and render the advice prompt
    async fn advice_request(&self, request: &AdviceRequest) -> Result<ChatRequest, GatewayError> {
        let user_id = request.resolved_user_id();

        let (expenses, investments) = match user_id {
            Some(id) => {
                let key = Value::String(id.to_string());
                let (expenses, investments) = futures::try_join!(
                    self.store.find_by(EXPENSES_COLLECTION, "userId", &key),
                    self.store.find_by(INVESTMENTS_COLLECTION, "userId", &key),
                )?;
                (expenses, investments)
            }
            None => (Vec::<Document>::new(), Vec::<Document>::new()),
        };

        let prompt = build_advice_prompt(&AdviceContext {
            query: request.resolved_query(),
            user_id,
            user_name: request.resolved_user_name(),
            expenses: &expenses,
            investments: &investments,
        });

        Ok(ChatRequest::with_system(ADVICE_SYSTEM_PROMPT, prompt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatResponse, LlmError, StreamEvent};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use serde_json::{json, Map};
    use futures::StreamExt;
    use std::sync::Mutex;

    async fn collect_text(mut stream: EventStream) -> Result<String, LlmError> {
        let mut text = String::new();
        while let Some(event) = stream.next().await {
            if let StreamEvent::TextDelta { text: delta } = event? {
                text.push_str(&delta);
            }
        }
        Ok(text)
    }

    /// Provider that records prompts and replies with a fixed outcome
    struct ScriptedProvider {
        reply: Result<String, String>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedProvider {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last_prompt(&self) -> String {
            let seen = self.seen.lock().unwrap();
            seen.last().unwrap().messages[1].content.clone()
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
            self.seen.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(ChatResponse {
                    text: text.clone(),
                    finish_reason: Some("stop".to_string()),
                    usage: None,
                }),
                Err(message) => Err(LlmError::Authentication(message.clone())),
            }
        }

        async fn stream_complete(&self, request: ChatRequest) -> Result<EventStream, LlmError> {
            let text = self.complete(request).await?.text;
            let events = text
                .split_inclusive(' ')
                .map(|word| {
                    Ok(StreamEvent::TextDelta {
                        text: word.to_string(),
                    })
                })
                .chain(std::iter::once(Ok(StreamEvent::Finished {
                    finish_reason: Some("stop".to_string()),
                    usage: None,
                })))
                .collect::<Vec<_>>();
            Ok(Box::pin(futures::stream::iter(events)))
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_advise_without_user_uses_empty_context() {
        let store = Arc::new(MemoryStore::new());
        store
            .create(EXPENSES_COLLECTION, fields(json!({"userId": "someone", "amount": 1})))
            .await
            .unwrap();
        let provider = ScriptedProvider::replying("Start an emergency fund.");
        let gateway = AdvisoryGateway::new(store, provider.clone());

        let advice = gateway.advise(&AdviceRequest::default()).await.unwrap();

        assert_eq!(advice, "Start an emergency fund.");
        let prompt = provider.last_prompt();
        assert!(prompt.contains("User Query: Hi"));
        assert!(prompt.contains("User Expenses Summary: []"));
        assert!(!prompt.contains("someone"));
    }

    #[tokio::test]
    async fn test_advise_embeds_user_records() {
        let store = Arc::new(MemoryStore::new());
        store
            .create(EXPENSES_COLLECTION, fields(json!({"userId": "u1", "category": "rent"})))
            .await
            .unwrap();
        store
            .create(EXPENSES_COLLECTION, fields(json!({"userId": "u2", "category": "gaming"})))
            .await
            .unwrap();
        store
            .create(INVESTMENTS_COLLECTION, fields(json!({"userId": "u1", "fund": "PPF"})))
            .await
            .unwrap();
        let provider = ScriptedProvider::replying("ok");
        let gateway = AdvisoryGateway::new(store, provider.clone());

        let request: AdviceRequest = serde_json::from_value(json!({
            "user": {"id": "u1"},
            "messages": [{"role": "user", "content": "Review my budget"}]
        }))
        .unwrap();
        gateway.advise(&request).await.unwrap();

        let prompt = provider.last_prompt();
        assert!(prompt.contains("User Query: Review my budget"));
        assert!(prompt.contains("User ID: u1"));
        assert!(prompt.contains("rent"));
        assert!(prompt.contains("PPF"));
        assert!(!prompt.contains("gaming"));

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].messages[0].content, ADVICE_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_advise_propagates_provider_failure() {
        let gateway = AdvisoryGateway::new(
            Arc::new(MemoryStore::new()),
            ScriptedProvider::failing("Invalid API Key"),
        );

        let err = gateway.advise(&AdviceRequest::default()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Llm(_)));
        assert!(err.to_string().contains("Invalid API Key"));
    }

    #[tokio::test]
    async fn test_advise_stream_yields_full_text() {
        let gateway = AdvisoryGateway::new(
            Arc::new(MemoryStore::new()),
            ScriptedProvider::replying("Track every rupee you spend."),
        );

        let stream = gateway.advise_stream(&AdviceRequest::default()).await.unwrap();
        let text = collect_text(stream).await.unwrap();
        assert_eq!(text, "Track every rupee you spend.");
    }

    #[tokio::test]
    async fn test_influencers_valid_json() {
        let raw = r#"[{"name": "Labour Law Advisor", "topic": "Finance", "platform": "YouTube", "link": "https://youtube.com/@LLA"}]"#;
        let gateway =
            AdvisoryGateway::new(Arc::new(MemoryStore::new()), ScriptedProvider::replying(raw));

        let list = gateway.list_influencers().await;
        assert!(list.error.is_none());
        assert_eq!(list.influencers.len(), 1);
        assert_eq!(list.influencers[0].name, "Labour Law Advisor");
    }

    #[tokio::test]
    async fn test_influencers_invalid_json_falls_back() {
        let gateway = AdvisoryGateway::new(
            Arc::new(MemoryStore::new()),
            ScriptedProvider::replying("Sure! Here are six creators you will love..."),
        );

        let list = gateway.list_influencers().await;
        assert!(list.error.is_none());
        assert_eq!(list.influencers, fallback_influencers());
    }

    #[tokio::test]
    async fn test_influencers_upstream_failure_is_soft() {
        let gateway = AdvisoryGateway::new(
            Arc::new(MemoryStore::new()),
            ScriptedProvider::failing("quota"),
        );

        let list = gateway.list_influencers().await;
        assert!(list.influencers.is_empty());
        assert!(list.error.unwrap().contains("quota"));
    }
}
