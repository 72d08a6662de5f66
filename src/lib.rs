#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! iptracker - IP address and domain geolocation tracker
//!
//! iptracker looks up where an IPv4 address or a domain name is located using
//! the ipify Geo API, and presents the answer as four text fields (IP address,
//! location, timezone, ISP) plus a pin on a map. It can be used as both a
//! command-line application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `display` | Table formatting of the info panel | `tabled` |
//! | `cli` | CLI binary | All above + `clap`, `tracing-subscriber` |
//!
//! ```toml
//! # Library only
//! iptracker = { version = "0.1", default-features = false }
//!
//! # Default (CLI binary)
//! iptracker = "0.1"
//! ```
//!
//! # Architecture
//!
//! - **[`lens`]**: lookup logic
//!   - `geo`: query classification, request building, response mapping and
//!     the lookup orchestrator with its panel and map collaborators
//!   - `utils`: output formats
//! - **[`config`]**: configuration loading (`~/.iptracker/iptracker.toml` and
//!   `IPTRACKER_*` environment variables)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use iptracker::lens::geo::{GeoLens, LookupOutcome, MemoryPanel, PinMap, TrackerView};
//! use iptracker::TrackerConfig;
//! use std::sync::Mutex;
//!
//! let config = TrackerConfig::new(&None)?;
//! let lens = GeoLens::from_config(&config)?;
//! let view = Mutex::new(TrackerView::new(MemoryPanel::new(), PinMap::new()));
//!
//! if let LookupOutcome::Displayed(Ok(vm)) = lens.run_lookup(Some("8.8.8.8"), &view) {
//!     println!("{} is in {}", vm.ip, vm.location());
//! }
//! ```

pub mod config;
pub mod lens;

// =============================================================================
// Configuration
// =============================================================================

pub use config::TrackerConfig;

// =============================================================================
// Lens Module
// =============================================================================

pub use lens::geo::{
    classify, ClassifiedQuery, GeoLens, GeoLookupArgs, LookupError, LookupOutcome, LookupRequest,
    LookupResult, ViewModel,
};
pub use lens::utils::OutputFormat;
