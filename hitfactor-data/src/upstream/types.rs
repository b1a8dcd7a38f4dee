//! Value objects describing upstream endpoints and client configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default upstream API root.
pub const DEFAULT_BASE_URL: &str = "https://api.uspsa.org/api/app/";
/// Protocol version sent with every request.
pub const DEFAULT_API_VERSION: &str = "1.1.3";
/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = "hitfactor-engine/0.1";

/// Per-member upstream operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Classifier history for a member.
    Classifiers,
    /// Classification status for a member.
    Classification,
}

impl Operation {
    /// Both operations in fetch order.
    pub const ALL: [Self; 2] = [Self::Classifiers, Self::Classification];

    /// Path segment and batch file prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classifiers => "classifiers",
            Self::Classification => "classification",
        }
    }

    /// Parse a path segment.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|operation| operation.as_str() == prefix)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative upstream endpoint path, for example `classifiers/TY123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    /// Endpoint for `operation` on one member.
    #[must_use]
    pub fn member(operation: Operation, member_number: &str) -> Self {
        Self(format!("{}/{member_number}", operation.as_str()))
    }

    /// Official HHF listing.
    #[must_use]
    pub fn official_hhfs() -> Self {
        Self("hhf/10".to_owned())
    }

    /// Classifier catalogue.
    #[must_use]
    pub fn classifier_catalogue() -> Self {
        Self("classifier".to_owned())
    }

    /// Member number addressed by a per-member endpoint.
    #[must_use]
    pub fn member_number(&self) -> Option<&str> {
        let (prefix, number) = self.0.split_once('/')?;
        Operation::from_prefix(prefix).map(|_| number)
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Connection settings for [`super::HttpMemberApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    base_url: String,
    api_version: String,
    user_agent: String,
    timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: sanitise_base_url(DEFAULT_BASE_URL),
            api_version: DEFAULT_API_VERSION.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl UpstreamConfig {
    /// Override the API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = sanitise_base_url(base_url);
        self
    }

    /// Override the protocol version header.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// API root without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Protocol version header value.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// User agent header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL of `endpoint`.
    #[must_use]
    pub fn url_for(&self, endpoint: &Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.as_ref())
    }
}

fn sanitise_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_owned()
}
