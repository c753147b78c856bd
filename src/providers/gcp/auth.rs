//! GCP authentication from a service account key
//!
//! Signs a short-lived JWT (RS256) and exchanges it for an OAuth2 bearer
//! token covering Vertex AI, Firestore, and the Natural Language API.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use base64::Engine;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::{Error, Result};

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Tokens are issued for one hour; refresh after 55 minutes
const TOKEN_LIFETIME: Duration = Duration::from_secs(55 * 60);
/// Treat a cached token as expired this long before it actually is
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Service account credentials plus a shared token cache.
///
/// Cloning is cheap; all clones share one cache so concurrent providers
/// refresh at most once per expiry.
#[derive(Clone)]
pub struct GcpAuth {
    key: Arc<ServiceAccountKey>,
    project_id: String,
    request_timeout: Duration,
    token: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    token_uri: String,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl GcpAuth {
    /// Load and validate a service account JSON key file
    pub async fn from_key_file(
        key_path: impl AsRef<Path>,
        project_id: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let key_path = key_path.as_ref();
        let content = tokio::fs::read_to_string(key_path).await.map_err(|e| {
            Error::Auth(format!(
                "Failed to read service account key {}: {}",
                key_path.display(),
                e
            ))
        })?;
        let key: ServiceAccountKey = serde_json::from_str(&content)
            .map_err(|e| Error::Auth(format!("Invalid service account key format: {}", e)))?;

        Ok(Self {
            key: Arc::new(key),
            project_id: project_id.into(),
            request_timeout,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Get project ID
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Get a valid access token, refreshing through the token endpoint if the
    /// cached one is absent or inside the expiry margin
    pub async fn token(&self) -> Result<String> {
        {
            let cached = self.token.read().await;
            if let Some(ref token) = *cached {
                if token.expires_at > Instant::now() + EXPIRY_MARGIN {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let access_token = self.exchange_jwt().await?;

        let mut cached = self.token.write().await;
        *cached = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at: Instant::now() + TOKEN_LIFETIME,
        });

        Ok(access_token)
    }

    /// Build an HTTP client that sends the bearer token by default and
    /// applies the configured per-request timeout
    pub async fn authorized_client(&self) -> Result<reqwest::Client> {
        let token = self.token().await?;
        let mut headers = reqwest::header::HeaderMap::new();
        let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| Error::Auth(format!("Invalid bearer token header: {}", e)))?;
        headers.insert(reqwest::header::AUTHORIZATION, value);

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| Error::Auth(format!("Failed to build HTTP client: {}", e)))
    }

    async fn exchange_jwt(&self) -> Result<String> {
        let assertion = self.signed_jwt()?;

        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| Error::Auth(format!("Failed to build HTTP client: {}", e)))?;
        let response = client
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &assertion),
            ])
            .send()
            .await
            .map_err(|e| Error::Auth(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "Token exchange failed ({}): {}",
                status, body
            )));
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("Failed to parse token response: {}", e)))?;
        Ok(token.access_token)
    }

    /// Assemble and RS256-sign the service account assertion
    fn signed_jwt(&self) -> Result<String> {
        let issued_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| Error::Auth("System clock is before the Unix epoch".to_string()))?
            .as_secs() as i64;

        let claims = serde_json::json!({
            "iss": self.key.client_email,
            "scope": CLOUD_PLATFORM_SCOPE,
            "aud": self.key.token_uri,
            "iat": issued_at,
            "exp": issued_at + 3600,
        });

        let b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = b64.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = b64.encode(claims.to_string().as_bytes());
        let signing_input = format!("{}.{}", header, payload);

        // Key files escape newlines inside the PEM block
        let pem_text = self.key.private_key.replace("\\n", "\n");
        let pem = pem::parse(&pem_text)
            .map_err(|e| Error::Auth(format!("Failed to parse private key PEM: {}", e)))?;
        let key_pair = ring::signature::RsaKeyPair::from_pkcs8(pem.contents())
            .map_err(|e| Error::Auth(format!("Failed to parse private key: {:?}", e)))?;

        let mut signature = vec![0u8; key_pair.public().modulus_len()];
        key_pair
            .sign(
                &ring::signature::RSA_PKCS1_SHA256,
                &ring::rand::SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|e| Error::Auth(format!("Failed to sign JWT: {:?}", e)))?;

        Ok(format!("{}.{}", signing_input, b64.encode(&signature)))
    }
}
