//! Map collaborator
//!
//! A single map per session with a single marker. The first successful lookup
//! creates the map; later lookups move the view and the existing marker.

use serde::Serialize;

/// Zoom level used for every view
pub const MAP_ZOOM: u8 = 13;

/// OpenStreetMap tile URL template
pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_MAX_ZOOM: u8 = 19;
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url_template: String,
    pub max_zoom: u8,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: OSM_TILE_URL.to_string(),
            max_zoom: OSM_MAX_ZOOM,
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

/// A live map: viewport, tile layer and the one marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapInstance {
    pub center: LatLng,
    pub zoom: u8,
    pub marker: LatLng,
    pub tiles: TileLayer,
    /// How many times the view moved since creation
    pub recenters: u32,
}

impl MapInstance {
    /// Link to the current view on openstreetmap.org
    pub fn osm_link(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map={zoom}/{lat}/{lng}",
            lat = self.marker.lat,
            lng = self.marker.lng,
            zoom = self.zoom,
        )
    }
}

/// Something that can show a location pin
pub trait MapView {
    /// Create the map centered on `(lat, lng)` with one marker, or move the
    /// existing view and marker there
    fn init_or_recenter(&mut self, lat: f64, lng: f64);
}

/// In-memory map state
#[derive(Debug, Clone, Default, Serialize)]
pub struct PinMap {
    instance: Option<MapInstance>,
}

impl PinMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a map has been created yet
    pub fn exists(&self) -> bool {
        self.instance.is_some()
    }

    pub fn instance(&self) -> Option<&MapInstance> {
        self.instance.as_ref()
    }

    pub fn marker_count(&self) -> usize {
        usize::from(self.exists())
    }
}

impl MapView for PinMap {
    fn init_or_recenter(&mut self, lat: f64, lng: f64) {
        let pos = LatLng { lat, lng };
        match self.instance.as_mut() {
            Some(map) => {
                map.center = pos;
                map.zoom = MAP_ZOOM;
                map.marker = pos;
                map.recenters += 1;
            }
            None => {
                self.instance = Some(MapInstance {
                    center: pos,
                    zoom: MAP_ZOOM,
                    marker: pos,
                    tiles: TileLayer::default(),
                    recenters: 0,
                });
            }
        }
    }
}
