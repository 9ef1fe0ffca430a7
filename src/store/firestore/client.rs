use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::{Map, Value};
use tracing::debug;

use super::{
    auth::Credentials,
    config::FirestoreConfig,
    types::{FirestoreDocument, ListDocumentsResponse, RunQueryRequest, RunQueryResponseItem},
    value::{into_document, to_firestore_fields, to_firestore_value},
};
use crate::store::{
    error::{Error, Result},
    types::Document,
    DocumentStore,
};

/// Firestore REST client
pub struct FirestoreClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Bearer token source
    credentials: Credentials,
    /// Connection settings
    config: FirestoreConfig,
}

impl FirestoreClient {
    /// Create a new Firestore client
    ///
    /// Discovers Application Default Credentials unless the configuration
    /// targets an emulator.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or credential
    /// discovery fails.
    pub async fn new(config: FirestoreConfig) -> Result<Self> {
        config.validate()?;

        let credentials = if config.uses_emulator() {
            Credentials::Emulator
        } else {
            Credentials::application_default().await?
        };

        let http_client = Client::builder()
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            credentials,
            config,
        })
    }

    /// URL of a collection
    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.config.documents_url(), collection)
    }

    /// URL of a single document
    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.config.documents_url(), collection, id)
    }

    /// Start an authorized request
    async fn request(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let token = self.credentials.token().await?;
        Ok(self
            .http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", token)))
    }

    /// Turn a non-success status into an error carrying the body
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authentication(body),
            _ => Error::Http {
                status: status.as_u16(),
                body,
            },
        })
    }

    /// Fetch one page of a collection listing
    async fn list_page(
        &self,
        collection: &str,
        page_token: Option<&str>,
    ) -> Result<ListDocumentsResponse> {
        let mut query = vec![("pageSize", self.config.page_size.to_string())];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let response = self
            .request(Method::GET, &self.collection_url(collection))
            .await?
            .query(&query)
            .send()
            .await?;

        Ok(Self::check_status(response).await?.json().await?)
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn create(&self, collection: &str, fields: Map<String, Value>) -> Result<Document> {
        let body = FirestoreDocument {
            fields: to_firestore_fields(&fields),
            ..Default::default()
        };

        let response = self
            .request(Method::POST, &self.collection_url(collection))
            .await?
            .json(&body)
            .send()
            .await?;

        let created: FirestoreDocument = Self::check_status(response).await?.json().await?;
        let doc = into_document(created)?;
        debug!(collection, id = %doc.id, "created document");
        Ok(doc)
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<Document> {
        let body = FirestoreDocument {
            fields: to_firestore_fields(&fields),
            ..Default::default()
        };

        let response = self
            .request(Method::PATCH, &self.document_url(collection, id))
            .await?
            .json(&body)
            .send()
            .await?;

        let written: FirestoreDocument = Self::check_status(response).await?.json().await?;
        into_document(written)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let response = self
            .request(Method::GET, &self.document_url(collection, id))
            .await?
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let doc: FirestoreDocument = Self::check_status(response).await?.json().await?;
        Ok(Some(into_document(doc)?))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_page(collection, page_token.as_deref()).await?;
            for doc in page.documents {
                documents.push(into_document(doc)?);
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(collection, count = documents.len(), "listed collection");
        Ok(documents)
    }

    async fn find_by(&self, collection: &str, field: &str, value: &Value) -> Result<Vec<Document>> {
        let query = RunQueryRequest::field_equals(collection, field, to_firestore_value(value));
        let url = format!("{}:runQuery", self.config.documents_url());

        let response = self
            .request(Method::POST, &url)
            .await?
            .json(&query)
            .send()
            .await?;

        let items: Vec<RunQueryResponseItem> = Self::check_status(response).await?.json().await?;
        items
            .into_iter()
            .filter_map(|item| item.document)
            .map(into_document)
            .collect()
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, &self.document_url(collection, id))
            .await?
            .send()
            .await?;

        // Firestore answers 200 for absent documents as well
        Self::check_status(response).await?;
        Ok(())
    }
}
