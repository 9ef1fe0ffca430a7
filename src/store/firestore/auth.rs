//! Bearer tokens for Firestore requests

use gcp_auth::AuthenticationManager as GcpAuthManager;

use crate::store::error::{Error, Result};

/// OAuth scope covering Firestore access
const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Token the Firestore emulator accepts for privileged access
const EMULATOR_TOKEN: &str = "owner";

/// Source of bearer tokens for the Firestore REST API
///
/// Production access goes through Application Default Credentials:
/// - `GOOGLE_APPLICATION_CREDENTIALS` environment variable
/// - User credentials from `gcloud auth application-default login`
/// - Metadata server (Compute Engine, Cloud Run, GKE)
///
/// The emulator ignores credentials, so no discovery happens there.
pub enum Credentials {
    Adc(GcpAuthManager),
    Emulator,
}

impl Credentials {
    /// Discover Application Default Credentials
    ///
    /// # Errors
    /// Returns an error if no valid credentials can be found.
    pub async fn application_default() -> Result<Self> {
        let inner = GcpAuthManager::new()
            .await
            .map_err(|e| Error::Authentication(format!("Failed to initialize ADC: {}", e)))?;

        Ok(Credentials::Adc(inner))
    }

    /// Get a bearer token; ADC tokens are cached and refreshed by `gcp_auth`
    pub async fn token(&self) -> Result<String> {
        match self {
            Credentials::Adc(manager) => {
                let token = manager
                    .get_token(&[DATASTORE_SCOPE])
                    .await
                    .map_err(|e| Error::Authentication(format!("Failed to get token: {}", e)))?;
                Ok(token.as_str().to_string())
            }
            Credentials::Emulator => Ok(EMULATOR_TOKEN.to_string()),
        }
    }
}
