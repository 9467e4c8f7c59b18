//! etcd endpoint parsing.

use thiserror::Error;
use url::Url;

/// The etcd server string could not be parsed as a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid etcd server {endpoint:?}: {source}")]
pub struct EndpointError {
    pub endpoint: String,
    #[source]
    pub source: url::ParseError,
}

/// Parse the `--etcd-server` value into a URL.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, EndpointError> {
    Url::parse(endpoint).map_err(|source| EndpointError {
        endpoint: endpoint.to_string(),
        source,
    })
}
