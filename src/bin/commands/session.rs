use anyhow::Result;
use clap::Args;
use iptracker::lens::geo::{
    normalize_submission, GeoLens, LookupOutcome, PinMap, TrackerView, EMPTY_SUBMISSION_PROMPT,
};
use iptracker::lens::utils::OutputFormat;
use iptracker::TrackerConfig;
use std::io::BufRead;
use std::sync::Mutex;

use super::{print_map_link, TerminalPanel};

/// Arguments for the Session command
#[derive(Args)]
pub struct SessionArgs {
    /// Print an OpenStreetMap link for the pin after each successful lookup
    #[clap(short, long)]
    pub map: bool,
}

pub fn run(config: &TrackerConfig, args: SessionArgs, output_format: OutputFormat) -> Result<()> {
    let SessionArgs { map } = args;

    let lens = GeoLens::from_config(config)?;
    let view = Mutex::new(TrackerView::new(
        TerminalPanel::new(output_format),
        PinMap::new(),
    ));

    // Start with our own address, like a freshly opened page
    lookup(&lens, None, &view, map, output_format);

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        match normalize_submission(&line) {
            Some(query) => lookup(&lens, Some(&query), &view, map, output_format),
            None => eprintln!("{}", EMPTY_SUBMISSION_PROMPT),
        }
    }

    Ok(())
}

fn lookup(
    lens: &GeoLens,
    query: Option<&str>,
    view: &Mutex<TrackerView<TerminalPanel, PinMap>>,
    map: bool,
    output_format: OutputFormat,
) {
    match lens.run_lookup(query, view) {
        LookupOutcome::Displayed(Ok(_)) => {
            if map {
                let view = view.lock().unwrap_or_else(|e| e.into_inner());
                print_map_link(&view.map, output_format);
            }
        }
        LookupOutcome::Displayed(Err(e)) => {
            eprintln!("ERROR: unable to get geolocation information: {}", e);
        }
        LookupOutcome::Discarded { .. } => {}
    }
}
