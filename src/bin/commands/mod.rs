pub mod config;
pub mod lookup;
pub mod session;

use iptracker::lens::geo::{InfoPanel, PanelFields, PinMap};
use iptracker::lens::utils::{render_panel, OutputFormat};
use serde_json::json;

/// Info panel that prints every update to stdout
pub(crate) struct TerminalPanel {
    format: OutputFormat,
}

impl TerminalPanel {
    pub(crate) fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl InfoPanel for TerminalPanel {
    fn show(&mut self, fields: &PanelFields) {
        println!("{}", render_panel(fields, self.format));
    }
}

/// Print where the map pin currently is
pub(crate) fn print_map_link(map: &PinMap, output_format: OutputFormat) {
    let Some(instance) = map.instance() else {
        return;
    };
    let link = instance.osm_link();
    if output_format.is_json() {
        println!("{}", json!({ "map": link }));
    } else {
        println!("Map: {}", link);
    }
}
