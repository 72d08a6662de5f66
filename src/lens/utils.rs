//! Output formatting shared by lens commands

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "display")]
use crate::lens::geo::PanelFields;
#[cfg(feature = "display")]
use tabled::settings::Style;
#[cfg(feature = "display")]
use tabled::Table;

/// Unified output format for all lens commands
///
/// Every iptracker command accepts one of these through `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty table with borders (default)
    #[default]
    Table,
    /// Markdown table format
    Markdown,
    /// Compact JSON (single line per object)
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
    /// JSON Lines format (one JSON object per line, for streaming)
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}

impl OutputFormat {
    /// Every format, in the order shown in help text
    pub const ALL: [OutputFormat; 6] = [
        Self::Table,
        Self::Markdown,
        Self::Json,
        Self::JsonPretty,
        Self::JsonLine,
        Self::Psv,
    ];

    /// Name accepted by `--format`
    pub fn name(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::JsonPretty => "json-pretty",
            Self::JsonLine => "json-line",
            Self::Psv => "psv",
        }
    }

    /// Check if this is a JSON variant
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    /// Get a list of all format names for help text
    pub fn all_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.name()).collect()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let alias = match lower.as_str() {
            "md" => Some(Self::Markdown),
            "jsonl" => Some(Self::JsonLine),
            _ => None,
        };
        alias
            .or_else(|| Self::ALL.into_iter().find(|f| f.name() == lower))
            .ok_or_else(|| {
                format!(
                    "Unknown output format '{}'. Valid formats: {}",
                    s,
                    Self::all_names().join(", ")
                )
            })
    }
}

/// Render the info panel fields in the given format
///
/// JSON variants serialize the fields as an object with `ip`, `location`,
/// `timezone` and `isp` keys.
#[cfg(feature = "display")]
pub fn render_panel(fields: &PanelFields, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => Table::new([fields]).with(Style::rounded()).to_string(),
        OutputFormat::Markdown => Table::new([fields]).with(Style::markdown()).to_string(),
        OutputFormat::Json | OutputFormat::JsonLine => {
            serde_json::to_string(fields).unwrap_or_default()
        }
        OutputFormat::JsonPretty => serde_json::to_string_pretty(fields).unwrap_or_default(),
        OutputFormat::Psv => format!(
            "ip|location|timezone|isp\n{}|{}|{}|{}",
            fields.ip, fields.location, fields.timezone, fields.isp
        ),
    }
}
