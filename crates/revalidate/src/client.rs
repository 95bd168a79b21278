//! HTTP client for the frontend revalidation webhook

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use thiserror::Error;
use tracing::{debug, warn};

use crate::signature::{self, SIGNATURE_HEADER};
use crate::{Invalidation, Revalidator};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Invalid signing key")]
    Signing,
    #[error("Revalidation endpoint error: {status} - {message}")]
    Endpoint { status: u16, message: String },
}

/// Posts invalidations to the frontend, signed with a shared secret
#[derive(Clone)]
pub struct HttpRevalidator {
    client: reqwest::Client,
    url: String,
    secret: Option<String>,
}

impl HttpRevalidator {
    pub fn new(url: impl Into<String>, secret: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            secret,
        }
    }

    fn headers(&self, body: &[u8]) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("givebox-revalidate"));

        if let Some(secret) = &self.secret {
            let sig = signature::sign(secret, body).map_err(|_| ClientError::Signing)?;
            let value = HeaderValue::from_str(&sig).map_err(|_| ClientError::Signing)?;
            headers.insert(SIGNATURE_HEADER, value);
        }

        Ok(headers)
    }

    /// Send one invalidation and wait for the response
    pub async fn send(&self, invalidation: &Invalidation) -> Result<(), ClientError> {
        let body = serde_json::to_vec(invalidation)?;
        let headers = self.headers(&body)?;

        let response = self
            .client
            .post(&self.url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Endpoint {
                status: status.as_u16(),
                message,
            });
        }

        debug!(
            "Revalidated {} paths / {} tags",
            invalidation.paths.len(),
            invalidation.tags.len()
        );
        Ok(())
    }
}

impl Revalidator for HttpRevalidator {
    fn invalidate(&self, invalidation: Invalidation) {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.send(&invalidation).await {
                warn!("Revalidation of {:?} failed: {}", invalidation.paths, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_are_signed_when_secret_is_set() {
        let revalidator = HttpRevalidator::new("http://localhost/revalidate", Some("s3cret".into()));
        let body = br#"{"paths":["/items"],"tags":["items"]}"#;

        let headers = revalidator.headers(body).unwrap();
        let sig = headers.get(SIGNATURE_HEADER).unwrap().to_str().unwrap();

        assert!(signature::verify(sig, "s3cret", body));
    }

    #[test]
    fn test_headers_unsigned_without_secret() {
        let revalidator = HttpRevalidator::new("http://localhost/revalidate", None);
        let headers = revalidator.headers(b"{}").unwrap();

        assert!(headers.get(SIGNATURE_HEADER).is_none());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }
}
