//! Client for the federation's per-member API.
//!
//! [`MemberApi`] is the seam between the fetch pipeline and the network. The
//! production implementation, [`HttpMemberApi`], sends the protocol headers the
//! upstream expects and takes one credential from a [`CredentialPool`] per
//! request.
#![forbid(unsafe_code)]

mod client;
mod credentials;
mod error;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use client::{HttpMemberApi, MemberApi};
pub use credentials::CredentialPool;
pub use error::{EmptyCredentialPool, TransportError};
pub use types::{
    DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, Endpoint, Operation,
    UpstreamConfig,
};
