// HTTP Server modules
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sse;
pub mod state;

// Expense and advisory gateways
pub mod advisory;
pub mod expenses;

// Document store client library
pub mod store;

// LLM abstraction layer
pub mod llm;
