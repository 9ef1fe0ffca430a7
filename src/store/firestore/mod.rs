//! Google Cloud Firestore backend
//!
//! Talks to the Firestore v1 REST API with `reqwest`. Production requests
//! carry Application Default Credentials tokens; when an emulator host is
//! configured the emulator's fixed token is used instead.

pub mod auth;
pub mod client;
pub mod config;
pub mod types;
pub mod value;

pub use client::FirestoreClient;
pub use config::FirestoreConfig;
