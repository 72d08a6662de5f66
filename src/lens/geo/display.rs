//! Info panel collaborator
//!
//! The panel shows four text fields: IP address, location, timezone and ISP.

use serde::{Deserialize, Serialize};

use super::response::ViewModel;

/// The four text fields shown for a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "display", derive(tabled::Tabled))]
pub struct PanelFields {
    #[cfg_attr(feature = "display", tabled(rename = "IP Address"))]
    pub ip: String,
    #[cfg_attr(feature = "display", tabled(rename = "Location"))]
    pub location: String,
    #[cfg_attr(feature = "display", tabled(rename = "Timezone"))]
    pub timezone: String,
    #[cfg_attr(feature = "display", tabled(rename = "ISP"))]
    pub isp: String,
}

impl PanelFields {
    /// Fixed presentation for any failed lookup
    pub fn failure() -> Self {
        Self {
            ip: "Error".to_string(),
            location: "Could not load data".to_string(),
            timezone: "-".to_string(),
            isp: "-".to_string(),
        }
    }
}

impl From<&ViewModel> for PanelFields {
    fn from(vm: &ViewModel) -> Self {
        Self {
            ip: vm.ip.clone(),
            location: vm.location(),
            timezone: vm.timezone_offset.clone(),
            isp: vm.isp.clone(),
        }
    }
}

/// Where lookup results are shown
pub trait InfoPanel {
    /// Overwrite all four fields
    fn show(&mut self, fields: &PanelFields);
}

/// Panel that keeps what it was last told to show
#[derive(Debug, Clone, Default)]
pub struct MemoryPanel {
    current: Option<PanelFields>,
    updates: usize,
}

impl MemoryPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields currently shown, `None` before the first update
    pub fn current(&self) -> Option<&PanelFields> {
        self.current.as_ref()
    }

    /// Number of times the panel was written
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl InfoPanel for MemoryPanel {
    fn show(&mut self, fields: &PanelFields) {
        self.current = Some(fields.clone());
        self.updates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_fields() {
        let f = PanelFields::failure();
        assert_eq!(f.ip, "Error");
        assert_eq!(f.location, "Could not load data");
        assert_eq!(f.timezone, "-");
        assert_eq!(f.isp, "-");
    }

    #[test]
    fn test_fields_from_view_model() {
        let vm = ViewModel {
            ip: "1.1.1.1".to_string(),
            city: "Brisbane".to_string(),
            region: "Queensland".to_string(),
            country: "AU".to_string(),
            timezone_offset: "UTC +10:00".to_string(),
            isp: "Cloudflare, Inc.".to_string(),
            latitude: -27.46794,
            longitude: 153.02809,
        };
        let f = PanelFields::from(&vm);
        assert_eq!(f.ip, "1.1.1.1");
        assert_eq!(f.location, "Brisbane, Queensland, AU");
        assert_eq!(f.timezone, "UTC +10:00");
        assert_eq!(f.isp, "Cloudflare, Inc.");
    }

    #[test]
    fn test_memory_panel_overwrites() {
        let mut panel = MemoryPanel::new();
        assert!(panel.current().is_none());

        panel.show(&PanelFields::failure());
        let ok = PanelFields {
            ip: "8.8.8.8".to_string(),
            location: "a, b, c".to_string(),
            timezone: "UTC -07:00".to_string(),
            isp: "Google LLC".to_string(),
        };
        panel.show(&ok);

        assert_eq!(panel.current(), Some(&ok));
        assert_eq!(panel.updates(), 2);
    }
}
