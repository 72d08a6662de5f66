//! Response mapping
//!
//! Turns a parsed geolocation API payload into the [`ViewModel`] shown to the
//! user. Expected payload shape:
//!
//! ```json
//! {
//!   "ip": "8.8.8.8",
//!   "location": {
//!     "city": "Mountain View", "region": "California", "country": "US",
//!     "timezone": "-07:00", "lat": 37.38605, "lng": -122.08385
//!   },
//!   "isp": "Google LLC"
//! }
//! ```
//!
//! Fields beyond these are ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a lookup failed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The API answered with a non-2xx status
    #[error("API error: {0}")]
    HttpStatus(u16),

    /// The request never produced a response (DNS, connect, TLS, timeout)
    #[error("transport error: {0}")]
    Transport(String),

    /// The body is not JSON
    #[error("response body is not valid JSON")]
    InvalidPayload,

    /// The JSON is missing a required field or has one of the wrong type
    #[error("response is missing or has ill-typed required fields")]
    MalformedResponse,
}

/// Result of a single lookup: a view model or the reason it failed
pub type LookupResult = Result<ViewModel, LookupError>;

/// Normalized geolocation data for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub ip: String,
    pub city: String,
    pub region: String,
    pub country: String,
    /// `"UTC "` followed by the API's timezone offset, e.g. `"UTC -07:00"`
    pub timezone_offset: String,
    pub isp: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl ViewModel {
    /// `"<city>, <region>, <country>"`
    pub fn location(&self) -> String {
        format!("{}, {}, {}", self.city, self.region, self.country)
    }
}

#[derive(Deserialize)]
struct ApiLocation {
    city: String,
    region: String,
    country: String,
    timezone: String,
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct ApiResponse {
    ip: String,
    location: ApiLocation,
    isp: String,
}

/// Map a parsed payload to a view model.
///
/// Any missing field, text field that is not a string, or coordinate that is
/// not a finite number yields [`LookupError::MalformedResponse`].
pub fn map_response(raw: &serde_json::Value) -> LookupResult {
    let resp = ApiResponse::deserialize(raw).map_err(|_| LookupError::MalformedResponse)?;
    let ApiResponse { ip, location, isp } = resp;

    if !location.lat.is_finite() || !location.lng.is_finite() {
        return Err(LookupError::MalformedResponse);
    }

    Ok(ViewModel {
        ip,
        city: location.city,
        region: location.region,
        country: location.country,
        timezone_offset: format!("UTC {}", location.timezone),
        isp,
        latitude: location.lat,
        longitude: location.lng,
    })
}

/// Parse a response body and map it.
///
/// A body that is not JSON is [`LookupError::InvalidPayload`]; JSON without
/// the expected fields is [`LookupError::MalformedResponse`].
pub fn parse_body(body: &str) -> LookupResult {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|_| LookupError::InvalidPayload)?;
    map_response(&value)
}
