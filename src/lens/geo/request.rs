//! Outbound request construction

use super::query::ClassifiedQuery;

/// Default geolocation API endpoint (ipify Geo API, country + city product)
pub const DEFAULT_API_BASE: &str = "https://geo.ipify.org/api/v2/country,city";

pub const PARAM_API_KEY: &str = "apiKey";
pub const PARAM_IP_ADDRESS: &str = "ipAddress";
pub const PARAM_DOMAIN: &str = "domain";

/// A geolocation API request: endpoint plus query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub endpoint: String,
    pub params: Vec<(String, String)>,
}

impl LookupRequest {
    /// Value of a query parameter, if set
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Full URL with the API key masked, for logging
    pub fn redacted_url(&self) -> String {
        let query = self
            .params
            .iter()
            .map(|(k, v)| {
                if k == PARAM_API_KEY {
                    format!("{}=***", k)
                } else {
                    format!("{}={}", k, v)
                }
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.endpoint, query)
    }
}

/// Build the request for a classified query.
///
/// `apiKey` is always present. At most one of `ipAddress` and `domain` is
/// set; an absent query sets neither so the API falls back to the caller's
/// address.
pub fn build_request(classified: &ClassifiedQuery, api_base: &str, api_key: &str) -> LookupRequest {
    let mut params = vec![(PARAM_API_KEY.to_string(), api_key.to_string())];

    match classified {
        ClassifiedQuery::Ipv4Literal(ip) => {
            params.push((PARAM_IP_ADDRESS.to_string(), ip.clone()));
        }
        ClassifiedQuery::Domain(domain) => {
            params.push((PARAM_DOMAIN.to_string(), domain.clone()));
        }
        ClassifiedQuery::Absent => {}
    }

    LookupRequest {
        endpoint: api_base.to_string(),
        params,
    }
}
