//! HTTP transport for geolocation requests

use std::time::Duration;

use super::request::LookupRequest;
use super::response::LookupError;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Performs the HTTP GET for a [`LookupRequest`].
///
/// Implementations return the body of a 2xx response, map non-2xx statuses
/// to [`LookupError::HttpStatus`] and anything that prevented a response to
/// [`LookupError::Transport`].
pub trait GeoTransport: Send + Sync {
    fn fetch(&self, request: &LookupRequest) -> Result<String, LookupError>;
}

/// Blocking transport backed by a `ureq` agent
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl GeoTransport for UreqTransport {
    fn fetch(&self, request: &LookupRequest) -> Result<String, LookupError> {
        let mut req = self.agent.get(&request.endpoint);
        for (key, value) in &request.params {
            req = req.query(key, value);
        }

        let mut resp = req.call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => LookupError::HttpStatus(code),
            other => LookupError::Transport(other.to_string()),
        })?;

        resp.body_mut()
            .read_to_string()
            .map_err(|e| LookupError::Transport(e.to_string()))
    }
}
