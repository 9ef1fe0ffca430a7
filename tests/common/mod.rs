#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use testcontainers::{core::WaitFor, GenericImage, RunnableImage};

use gullak::llm::{
    ChatProvider, ChatRequest, ChatResponse, EventStream, LlmError, StreamEvent,
};
use gullak::routes::configure_routes;
use gullak::state::AppState;
use gullak::store::{DocumentStore, MemoryStore};

/// Chat provider that answers every request with a fixed outcome
pub struct ScriptedProvider {
    reply: Result<String, String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// User prompt of the most recent request
    pub fn last_prompt(&self) -> Option<String> {
        let requests = self.requests.lock().unwrap();
        requests
            .last()
            .and_then(|r| r.messages.last())
            .map(|m| m.content.clone())
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
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
        let mut events: Vec<Result<StreamEvent, LlmError>> = text
            .split_inclusive(' ')
            .map(|word| {
                Ok(StreamEvent::TextDelta {
                    text: word.to_string(),
                })
            })
            .collect();
        events.push(Ok(StreamEvent::Finished {
            finish_reason: Some("stop".to_string()),
            usage: None,
        }));
        Ok(Box::pin(futures::stream::iter(events)))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// A running server and the handles behind it
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub provider: Arc<ScriptedProvider>,
    pub http: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Start the full route tree on a free local port, backed by memory
pub async fn spawn_server(provider: Arc<ScriptedProvider>) -> TestServer {
    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn DocumentStore> = store.clone();
    let chat: Arc<dyn ChatProvider> = provider.clone();
    let routes = configure_routes(AppState::new(shared, chat));

    let port = free_port();
    tokio::spawn(warp::serve(routes).run(([127, 0, 0, 1], port)));

    let server = TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        store,
        provider,
        http: reqwest::Client::new(),
    };
    wait_until_ready(&server).await;
    server
}

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

async fn wait_until_ready(server: &TestServer) {
    for _ in 0..100 {
        if server.http.get(server.url("/")).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server at {} never became ready", server.base_url);
}

/// Image carrying the gcloud Firestore emulator
pub const FIRESTORE_EMULATOR_IMAGE: &str = "gcr.io/google.com/cloudsdktool/google-cloud-cli";
pub const FIRESTORE_EMULATOR_TAG: &str = "emulators";

/// Port the emulator listens on inside the container
pub const FIRESTORE_EMULATOR_PORT: u16 = 8080;

/// Create a runnable Firestore emulator container
pub fn create_firestore_emulator() -> RunnableImage<GenericImage> {
    let image = GenericImage::new(FIRESTORE_EMULATOR_IMAGE, FIRESTORE_EMULATOR_TAG)
        .with_exposed_port(FIRESTORE_EMULATOR_PORT)
        .with_wait_for(WaitFor::message_on_stdout("Dev App Server is now running"));
    let args = vec![
        "gcloud".to_string(),
        "emulators".to_string(),
        "firestore".to_string(),
        "start".to_string(),
        format!("--host-port=0.0.0.0:{}", FIRESTORE_EMULATOR_PORT),
    ];

    RunnableImage::from((image, args))
}
