use std::io;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Request};
use serde_json::Value;

use super::{CredentialPool, Endpoint, TransportError, UpstreamConfig};

const API_KEY_HEADER: &str = "uspsa-api";
const API_VERSION_HEADER: &str = "uspsa-api-version";
const DEBUG_HEADER: &str = "uspsa-debug";

/// Source of upstream JSON documents.
///
/// Implementations make exactly one attempt per call; retries belong to the
/// fetch pipeline.
#[async_trait(?Send)]
pub trait MemberApi {
    /// Fetch the JSON document at `endpoint`.
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, TransportError>;
}

/// HTTP implementation of [`MemberApi`].
#[derive(Debug)]
pub struct HttpMemberApi {
    client: Client,
    config: UpstreamConfig,
    credentials: CredentialPool,
}

impl HttpMemberApi {
    /// Construct a client for `config`, rotating through `credentials`.
    ///
    /// # Errors
    /// Returns [`TransportError::Client`] if the TLS backend cannot start.
    pub fn new(config: UpstreamConfig, credentials: CredentialPool) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .build()
            .map_err(|source| TransportError::Client { source })?;
        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    /// Configuration the client was built with.
    pub const fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    fn request(&self, endpoint: &Endpoint) -> Result<Request, TransportError> {
        let url = self.config.url_for(endpoint);
        self.client
            .get(&url)
            .headers(self.headers(self.credentials.next_key()))
            .build()
            .map_err(|err| convert_reqwest_error(err, &url))
    }

    fn headers(&self, key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(DEBUG_HEADER),
            HeaderValue::from_static("FALSE"),
        );
        let dynamic = [
            (HeaderName::from_static(API_KEY_HEADER), key),
            (
                HeaderName::from_static(API_VERSION_HEADER),
                self.config.api_version(),
            ),
            (USER_AGENT, self.config.user_agent()),
        ];
        for (name, value) in dynamic {
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    headers.insert(name, value);
                }
                Err(err) => log::warn!("dropping header {name}: {err}"),
            }
        }
        headers
    }
}

#[async_trait(?Send)]
impl MemberApi for HttpMemberApi {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, TransportError> {
        let request = self.request(endpoint)?;
        let url = request.url().to_string();
        let body = self
            .client
            .execute(request)
            .await
            .map_err(|err| convert_reqwest_error(err, &url))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(err, &url))?
            .bytes()
            .await
            .map_err(|err| convert_reqwest_error(err, &url))?;
        serde_json::from_slice(&body).map_err(|source| TransportError::Decode { url, source })
    }
}

fn convert_reqwest_error(error: reqwest::Error, url: &str) -> TransportError {
    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    let kind = if error.is_timeout() {
        io::ErrorKind::TimedOut
    } else {
        io::ErrorKind::Other
    };
    TransportError::Network {
        url: url.to_owned(),
        source: io::Error::new(kind, error),
    }
}
