use crate::store::error::{Error, Result};

/// Production Firestore REST endpoint
pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Configuration for the Firestore client
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// GCP project ID
    pub project_id: String,

    /// Database ID (typically "(default)")
    pub database_id: String,

    /// Emulator `host:port`; when set, ADC is skipped
    pub emulator_host: Option<String>,

    /// Maximum documents per page when listing a collection
    pub page_size: u32,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database_id: "(default)".to_string(),
            emulator_host: None,
            page_size: 300,
        }
    }
}

impl FirestoreConfig {
    /// Create a configuration for the given project with default settings
    ///
    /// # Example
    ///
    /// ```
    /// use gullak::store::FirestoreConfig;
    ///
    /// let config = FirestoreConfig::new("my-project");
    /// assert_eq!(config.database_id, "(default)");
    /// ```
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Default::default()
        }
    }

    /// Use a non-default database
    pub fn with_database(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    /// Target a local emulator at `host:port`
    pub fn with_emulator_host(mut self, host: impl Into<String>) -> Self {
        self.emulator_host = Some(host.into());
        self
    }

    /// Set the listing page size
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Check the settings before a client is built
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            return Err(Error::Configuration("project id is empty".to_string()));
        }
        if self.database_id.trim().is_empty() {
            return Err(Error::Configuration("database id is empty".to_string()));
        }
        if self.page_size == 0 {
            return Err(Error::Configuration("page size must be positive".to_string()));
        }
        Ok(())
    }

    /// Whether requests go to an emulator
    pub fn uses_emulator(&self) -> bool {
        self.emulator_host.is_some()
    }

    /// REST base URL, honouring the emulator host
    pub fn base_url(&self) -> String {
        match &self.emulator_host {
            Some(host) => format!("http://{}/v1", host.trim_end_matches('/')),
            None => FIRESTORE_BASE_URL.to_string(),
        }
    }

    /// Root URL under which all documents of the database live
    pub fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.base_url(),
            self.project_id,
            self.database_id
        )
    }
}
