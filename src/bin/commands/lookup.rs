use anyhow::{anyhow, Result};
use iptracker::lens::geo::{
    query_from_arg, GeoLens, GeoLookupArgs, LookupOutcome, PinMap, TrackerView,
};
use iptracker::lens::utils::OutputFormat;
use iptracker::TrackerConfig;
use std::sync::Mutex;

use super::{print_map_link, TerminalPanel};

pub fn run(config: &TrackerConfig, args: GeoLookupArgs, output_format: OutputFormat) -> Result<()> {
    let GeoLookupArgs { query, map } = args;

    let query = query_from_arg(query.as_deref())?;

    let lens = GeoLens::from_config(config)?;
    let view = Mutex::new(TrackerView::new(
        TerminalPanel::new(output_format),
        PinMap::new(),
    ));

    match lens.run_lookup(query.as_deref(), &view) {
        LookupOutcome::Displayed(Ok(_)) => {
            if map {
                let view = view.lock().unwrap_or_else(|e| e.into_inner());
                print_map_link(&view.map, output_format);
            }
            Ok(())
        }
        LookupOutcome::Displayed(Err(e)) => {
            Err(anyhow!("unable to get geolocation information: {}", e))
        }
        LookupOutcome::Discarded { .. } => Ok(()),
    }
}
