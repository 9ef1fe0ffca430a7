use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use gullak::config::{LogFormat, ServerConfig, StoreBackend};
use gullak::llm::{ChatProvider, GroqClient};
use gullak::routes::configure_routes;
use gullak::state::AppState;
use gullak::store::{DocumentStore, FirestoreClient, MemoryStore};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    let store: Arc<dyn DocumentStore> = match &config.store {
        StoreBackend::Memory => {
            info!("Using in-memory document store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Firestore(firestore) => match FirestoreClient::new(firestore.clone()).await {
            Ok(client) => {
                info!(project_id = %firestore.project_id, "Using Firestore document store");
                Arc::new(client)
            }
            Err(e) => {
                error!("Failed to initialize Firestore: {}", e);
                std::process::exit(1);
            }
        },
    };

    let provider: Arc<dyn ChatProvider> = match GroqClient::new(config.groq.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to initialize Groq client: {}", e);
            std::process::exit(1);
        }
    };

    let routes = configure_routes(AppState::new(store, provider));

    let addr = config.bind_addr();
    info!("Starting server on http://{}:{}", addr.0, addr.1);
    warp::serve(routes).run(addr).await;
}
