//! Geolocation lookup lens
//!
//! Looks up geolocation data for an IPv4 address or a domain name through the
//! ipify Geo API and pushes the result to an info panel and a map.
//!
//! A lookup runs in four steps:
//!
//! 1. classify the raw query ([`query::classify`])
//! 2. build the API request ([`request::build_request`])
//! 3. fetch it through a [`GeoTransport`]
//! 4. map the JSON payload to a [`ViewModel`] ([`response::map_response`])
//!
//! On success the panel shows the view model and the map moves to its
//! coordinates. On any failure the panel shows a fixed error presentation and
//! the map stays where it was.
//!
//! # Example
//!
//! ```rust,ignore
//! use iptracker::lens::geo::{GeoLens, MemoryPanel, PinMap, TrackerView};
//! use std::sync::Mutex;
//!
//! let lens = GeoLens::from_config(&config)?;
//! let view = Mutex::new(TrackerView::new(MemoryPanel::new(), PinMap::new()));
//!
//! // page load: the caller's own address
//! lens.run_lookup(None, &view);
//! // form submission
//! lens.run_lookup(Some("example.com"), &view);
//! ```

pub mod display;
pub mod map;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;

pub use display::{InfoPanel, MemoryPanel, PanelFields};
pub use map::{MapInstance, MapView, PinMap};
pub use query::{
    classify, normalize_submission, query_from_arg, ClassifiedQuery, EMPTY_SUBMISSION_PROMPT,
};
pub use request::{build_request, LookupRequest, DEFAULT_API_BASE};
pub use response::{map_response, LookupError, LookupResult, ViewModel};
pub use transport::{GeoTransport, UreqTransport};

// =============================================================================
// Args
// =============================================================================

/// Arguments for a single geolocation lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct GeoLookupArgs {
    /// IPv4 address or domain to look up (if not provided, uses your own address)
    #[cfg_attr(feature = "cli", clap(value_name = "IP_OR_DOMAIN"))]
    pub query: Option<String>,

    /// Also print an OpenStreetMap link for the pinned location
    #[cfg_attr(feature = "cli", clap(short, long))]
    #[serde(default)]
    pub map: bool,
}

impl GeoLookupArgs {
    pub fn new(query: &str) -> Self {
        Self {
            query: Some(query.to_string()),
            ..Default::default()
        }
    }

    /// Lookup of the caller's own address
    pub fn own_address() -> Self {
        Self::default()
    }

    pub fn with_map(mut self, map: bool) -> Self {
        self.map = map;
        self
    }
}

// =============================================================================
// View
// =============================================================================

/// The panel and map a lookup writes to
pub struct TrackerView<P, M> {
    pub panel: P,
    pub map: M,
}

impl<P: InfoPanel, M: MapView> TrackerView<P, M> {
    pub fn new(panel: P, map: M) -> Self {
        Self { panel, map }
    }

    fn apply(&mut self, result: &LookupResult) {
        match result {
            Ok(vm) => {
                self.panel.show(&PanelFields::from(vm));
                self.map.init_or_recenter(vm.latitude, vm.longitude);
            }
            Err(_) => {
                self.panel.show(&PanelFields::failure());
            }
        }
    }
}

/// What happened to one invocation of [`GeoLens::run_lookup`]
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The result was written to the view
    Displayed(LookupResult),
    /// A newer lookup was started before this one finished; the result was dropped
    Discarded { token: u64 },
}

// =============================================================================
// Lens
// =============================================================================

/// Geolocation lookup lens
///
/// Holds the API endpoint, the API key and the transport. Every call to
/// [`GeoLens::run_lookup`] takes a sequence token when it starts; only the
/// most recently started lookup may write to the view, so a slow response can
/// never overwrite a newer one.
pub struct GeoLens<T = UreqTransport> {
    api_base: String,
    api_key: String,
    transport: T,
    sequence: AtomicU64,
}

impl GeoLens<UreqTransport> {
    /// Create a lens from configuration using the blocking `ureq` transport
    pub fn from_config(config: &TrackerConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;
        let transport = UreqTransport::new(Duration::from_secs(config.timeout_secs));
        Ok(Self::new(&config.api_base_url, api_key, transport))
    }
}

impl<T: GeoTransport> GeoLens<T> {
    pub fn new(api_base: &str, api_key: &str, transport: T) -> Self {
        Self {
            api_base: api_base.to_string(),
            api_key: api_key.to_string(),
            transport,
            sequence: AtomicU64::new(0),
        }
    }

    /// Build the request a raw query would send
    pub fn request_for(&self, raw: Option<&str>) -> LookupRequest {
        build_request(&classify(raw), &self.api_base, &self.api_key)
    }

    /// Classify, fetch and map, without touching any view
    pub fn lookup(&self, raw: Option<&str>) -> LookupResult {
        let classified = classify(raw);
        let request = build_request(&classified, &self.api_base, &self.api_key);
        debug!("requesting {} ({})", request.redacted_url(), classified);

        let body = self.transport.fetch(&request)?;
        let vm = response::parse_body(&body)?;
        info!("resolved {} to {} ({})", classified, vm.ip, vm.location());
        Ok(vm)
    }

    /// Run a lookup and write the outcome to `view`.
    ///
    /// Failures never propagate: the panel gets the failure presentation and
    /// the map is left alone. The result is dropped if another lookup was
    /// started on this lens in the meantime.
    pub fn run_lookup<P: InfoPanel, M: MapView>(
        &self,
        raw: Option<&str>,
        view: &Mutex<TrackerView<P, M>>,
    ) -> LookupOutcome {
        let token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let result = self.lookup(raw);
        if let Err(e) = &result {
            warn!("problem fetching IP data: {}", e);
        }

        let mut view = view.lock().unwrap_or_else(|e| e.into_inner());
        if token != self.latest_token() {
            debug!("discarding stale lookup result (token {})", token);
            return LookupOutcome::Discarded { token };
        }
        view.apply(&result);
        LookupOutcome::Displayed(result)
    }

    /// Token of the most recently started lookup, 0 if none
    pub fn latest_token(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::mpsc::{channel, Receiver, Sender};
    use std::sync::Arc;

    fn body(ip: &str, lat: f64, lng: f64) -> String {
        json!({
            "ip": ip,
            "location": {
                "country": "US", "region": "California", "city": "San Francisco",
                "lat": lat, "lng": lng, "timezone": "-07:00"
            },
            "isp": "Example ISP"
        })
        .to_string()
    }

    /// Returns a fixed response and records every request it sees
    struct StaticTransport {
        response: Result<String, LookupError>,
        seen: Mutex<Vec<LookupRequest>>,
    }

    impl StaticTransport {
        fn new(response: Result<String, LookupError>) -> Self {
            Self {
                response,
                seen: Mutex::new(vec![]),
            }
        }
    }

    impl GeoTransport for StaticTransport {
        fn fetch(&self, request: &LookupRequest) -> Result<String, LookupError> {
            self.seen.lock().unwrap().push(request.clone());
            self.response.clone()
        }
    }

    /// Picks the response by query and blocks "slow.example" until released
    struct GatedTransport {
        gate: Mutex<Receiver<()>>,
        entered: Mutex<Sender<()>>,
    }

    impl GeoTransport for GatedTransport {
        fn fetch(&self, request: &LookupRequest) -> Result<String, LookupError> {
            if request.param("domain") == Some("slow.example") {
                self.entered.lock().unwrap().send(()).unwrap();
                self.gate.lock().unwrap().recv().unwrap();
                Ok(body("10.0.0.1", 1.0, 2.0))
            } else {
                Ok(body("10.0.0.2", 3.0, 4.0))
            }
        }
    }

    fn new_view() -> Mutex<TrackerView<MemoryPanel, PinMap>> {
        Mutex::new(TrackerView::new(MemoryPanel::new(), PinMap::new()))
    }

    #[test]
    fn test_success_updates_panel_and_map() {
        let lens = GeoLens::new(
            DEFAULT_API_BASE,
            "key",
            StaticTransport::new(Ok(body("8.8.8.8", 37.7, -122.4))),
        );
        let view = new_view();

        let outcome = lens.run_lookup(Some("8.8.8.8"), &view);
        assert!(matches!(outcome, LookupOutcome::Displayed(Ok(_))));

        let view = view.lock().unwrap();
        let fields = view.panel.current().unwrap();
        assert_eq!(fields.ip, "8.8.8.8");
        assert_eq!(fields.location, "San Francisco, California, US");
        assert_eq!(fields.timezone, "UTC -07:00");
        assert_eq!(fields.isp, "Example ISP");
        assert_eq!(view.map.instance().unwrap().marker.lat, 37.7);
    }

    #[test]
    fn test_request_shaping() {
        let transport = StaticTransport::new(Ok(body("8.8.8.8", 0.0, 0.0)));
        let lens = GeoLens::new(DEFAULT_API_BASE, "key", transport);

        lens.lookup(Some("8.8.8.8")).unwrap();
        lens.lookup(Some("example.com")).unwrap();
        lens.lookup(None).unwrap();

        let seen = lens.transport.seen.lock().unwrap();
        assert_eq!(seen[0].param("ipAddress"), Some("8.8.8.8"));
        assert_eq!(seen[0].param("domain"), None);
        assert_eq!(seen[1].param("domain"), Some("example.com"));
        assert_eq!(seen[1].param("ipAddress"), None);
        assert_eq!(seen[2].param("ipAddress"), None);
        assert_eq!(seen[2].param("domain"), None);
        assert!(seen.iter().all(|r| r.param("apiKey") == Some("key")));
    }

    #[test]
    fn test_http_error_shows_failure_and_keeps_map() {
        let ok = GeoLens::new(
            DEFAULT_API_BASE,
            "key",
            StaticTransport::new(Ok(body("8.8.8.8", 37.7, -122.4))),
        );
        let failing = GeoLens::new(
            DEFAULT_API_BASE,
            "key",
            StaticTransport::new(Err(LookupError::HttpStatus(429))),
        );
        let view = new_view();

        ok.run_lookup(None, &view);
        let map_before = view.lock().unwrap().map.instance().cloned();

        let outcome = failing.run_lookup(Some("example.com"), &view);
        assert_eq!(
            outcome,
            LookupOutcome::Displayed(Err(LookupError::HttpStatus(429)))
        );

        let view = view.lock().unwrap();
        assert_eq!(view.panel.current(), Some(&PanelFields::failure()));
        assert_eq!(view.map.instance().cloned(), map_before);
    }

    #[test]
    fn test_failure_before_any_success_leaves_no_map() {
        let lens = GeoLens::new(
            DEFAULT_API_BASE,
            "key",
            StaticTransport::new(Ok("not json".to_string())),
        );
        let view = new_view();

        let outcome = lens.run_lookup(None, &view);
        assert_eq!(
            outcome,
            LookupOutcome::Displayed(Err(LookupError::InvalidPayload))
        );

        let view = view.lock().unwrap();
        assert_eq!(view.panel.current(), Some(&PanelFields::failure()));
        assert!(!view.map.exists());
    }

    #[test]
    fn test_malformed_response() {
        let lens = GeoLens::new(
            DEFAULT_API_BASE,
            "key",
            StaticTransport::new(Ok(r#"{"ip": "8.8.8.8"}"#.to_string())),
        );
        assert_eq!(lens.lookup(None), Err(LookupError::MalformedResponse));
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let (release_tx, release_rx) = channel();
        let (entered_tx, entered_rx) = channel();
        let lens = Arc::new(GeoLens::new(
            DEFAULT_API_BASE,
            "key",
            GatedTransport {
                gate: Mutex::new(release_rx),
                entered: Mutex::new(entered_tx),
            },
        ));
        let view = Arc::new(new_view());

        let slow = {
            let lens = Arc::clone(&lens);
            let view = Arc::clone(&view);
            std::thread::spawn(move || lens.run_lookup(Some("slow.example"), &view))
        };
        entered_rx.recv().unwrap();

        let fast = lens.run_lookup(Some("fast.example"), &view);
        assert!(matches!(fast, LookupOutcome::Displayed(Ok(_))));

        release_tx.send(()).unwrap();
        let slow = slow.join().unwrap();
        assert_eq!(slow, LookupOutcome::Discarded { token: 1 });
        assert_eq!(lens.latest_token(), 2);

        let view = view.lock().unwrap();
        assert_eq!(view.panel.current().unwrap().ip, "10.0.0.2");
        assert_eq!(view.panel.updates(), 1);
        assert_eq!(view.map.instance().unwrap().marker.lat, 3.0);
    }

    #[test]
    fn test_from_config_requires_api_key() {
        assert!(GeoLens::from_config(&TrackerConfig::default()).is_err());

        let config = TrackerConfig {
            api_key: "at_key".to_string(),
            ..Default::default()
        };
        let lens = GeoLens::from_config(&config).unwrap();
        let req = lens.request_for(Some("example.com"));
        assert_eq!(req.endpoint, DEFAULT_API_BASE);
        assert_eq!(req.param("apiKey"), Some("at_key"));
    }

    #[test]
    fn test_lookup_args() {
        let args = GeoLookupArgs::new("example.com").with_map(true);
        assert_eq!(args.query.as_deref(), Some("example.com"));
        assert!(args.map);

        let args = GeoLookupArgs::own_address();
        assert!(args.query.is_none());
        assert!(!args.map);
    }
}
