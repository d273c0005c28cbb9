use std::sync::Arc;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api::endpoints;
use crate::api::types::{ApiResponse, RequestOptions, RestoreRequest};
use crate::error::{DashboardError, Result};
use crate::prefs::{PreferenceStore, SessionCredentials};

/// Where a single logical request stands in the session-recovery protocol.
/// Only `Direct` may move on, so a request is sent at most twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Direct,
    RecoveringThenRetryOnce,
}

/// HTTP client for the dashboard backend. Cookies are kept across calls,
/// and a 401 triggers one session restore from the stored credentials
/// followed by one retry of the original request.
#[derive(Clone)]
pub struct SessionClient {
    client: Client,
    base_url: String,
    prefs: Arc<dyn PreferenceStore>,
}

impl SessionClient {
    pub fn new(base_url: &str, prefs: Arc<dyn PreferenceStore>) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            prefs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn request(&self, path: &str, options: &RequestOptions) -> Result<ApiResponse> {
        let mut attempt = Attempt::Direct;
        loop {
            let response = self.send(path, options).await?;
            match attempt {
                Attempt::Direct if response.is_unauthorized() => {
                    if !self.recover().await {
                        return Ok(response);
                    }
                    debug!(path, "session restored, retrying once");
                    attempt = Attempt::RecoveringThenRetryOnce;
                }
                _ => return Ok(response),
            }
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.request(path, &RequestOptions::get()).await
    }

    /// Restores the backend session on demand. Unlike the automatic path,
    /// failures are reported instead of folded into the original response.
    pub async fn restore_session(&self) -> Result<()> {
        let creds =
            SessionCredentials::load(self.prefs.as_ref()).ok_or(DashboardError::MissingCredentials)?;
        let status = self.post_restore(&creds).await?;
        if (200..300).contains(&status) {
            info!("session restored");
            Ok(())
        } else {
            Err(DashboardError::AuthExpired { status })
        }
    }

    async fn recover(&self) -> bool {
        let Some(creds) = SessionCredentials::load(self.prefs.as_ref()) else {
            debug!("unauthorized and no stored credentials, not restoring");
            return false;
        };
        match self.post_restore(&creds).await {
            Ok(status) if (200..300).contains(&status) => true,
            Ok(status) => {
                warn!(status, "session restore rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "session restore failed");
                false
            }
        }
    }

    async fn post_restore(&self, creds: &SessionCredentials) -> Result<u16> {
        let req = RestoreRequest {
            base_url: &creds.base_url,
            token: &creds.token,
        };
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, endpoints::RESTORE_SESSION))
            .json(&req)
            .send()
            .await?;
        Ok(resp.status().as_u16())
    }

    async fn send(&self, path: &str, options: &RequestOptions) -> Result<ApiResponse> {
        let mut req = self
            .client
            .request(options.method.clone(), format!("{}{}", self.base_url, path));
        for (name, value) in &options.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.json {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let body = match resp.bytes().await {
            Ok(bytes) => serde_json::from_slice(&bytes).ok(),
            Err(e) => {
                debug!(error = %e, "failed to read response body");
                None
            }
        };
        Ok(ApiResponse { status, body })
    }
}
