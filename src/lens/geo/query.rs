//! Query classification
//!
//! Decides whether a user-supplied string is an IPv4 literal or should be
//! forwarded to the geolocation API as a domain name.

use anyhow::{anyhow, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Prompt shown when a submitted query is empty
pub const EMPTY_SUBMISSION_PROMPT: &str = "Please enter an IP address or domain.";

// ASCII digits only; `\d` in `regex` would also match other Unicode digits.
static DOTTED_QUAD: OnceLock<Regex> = OnceLock::new();

fn dotted_quad() -> &'static Regex {
    DOTTED_QUAD.get_or_init(|| {
        Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+$").unwrap_or_else(|e| {
            unreachable!("dotted-quad pattern is a valid regex: {e}")
        })
    })
}

/// A user query after classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ClassifiedQuery {
    /// Four dot-separated runs of digits. Octet ranges are not checked.
    Ipv4Literal(String),
    /// Anything else, including IPv6 literals and malformed addresses
    Domain(String),
    /// No query: the API reports on the caller's own address
    Absent,
}

impl ClassifiedQuery {
    /// The raw query text, if any
    pub fn value(&self) -> Option<&str> {
        match self {
            ClassifiedQuery::Ipv4Literal(s) | ClassifiedQuery::Domain(s) => Some(s),
            ClassifiedQuery::Absent => None,
        }
    }
}

impl fmt::Display for ClassifiedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifiedQuery::Ipv4Literal(s) => write!(f, "ipv4 {}", s),
            ClassifiedQuery::Domain(s) => write!(f, "domain {}", s),
            ClassifiedQuery::Absent => write!(f, "own address"),
        }
    }
}

/// Classify a raw query.
///
/// Blank input is `Absent`. Otherwise the untrimmed input is matched against
/// a dotted-quad pattern; a match is an `Ipv4Literal`, everything else is a
/// `Domain`.
pub fn classify(raw: Option<&str>) -> ClassifiedQuery {
    match raw {
        None => ClassifiedQuery::Absent,
        Some(s) if s.trim().is_empty() => ClassifiedQuery::Absent,
        Some(s) if dotted_quad().is_match(s) => ClassifiedQuery::Ipv4Literal(s.to_string()),
        Some(s) => ClassifiedQuery::Domain(s.to_string()),
    }
}

/// Validate a form-style submission.
///
/// Returns the trimmed value, or `None` when nothing was entered. Callers
/// show [`EMPTY_SUBMISSION_PROMPT`] instead of starting a lookup.
pub fn normalize_submission(input: &str) -> Option<String> {
    let value = input.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Validate an optional query argument.
///
/// Omitting the query looks up the caller's own address. A query that is given
/// but blank is rejected with [`EMPTY_SUBMISSION_PROMPT`], so it never reaches
/// a lookup.
pub fn query_from_arg(arg: Option<&str>) -> Result<Option<String>> {
    match arg {
        None => Ok(None),
        Some(raw) => normalize_submission(raw)
            .map(Some)
            .ok_or_else(|| anyhow!(EMPTY_SUBMISSION_PROMPT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_dotted_quad() {
        assert_eq!(
            classify(Some("8.8.8.8")),
            ClassifiedQuery::Ipv4Literal("8.8.8.8".to_string())
        );
        assert_eq!(
            classify(Some("192.168.0.1")),
            ClassifiedQuery::Ipv4Literal("192.168.0.1".to_string())
        );
    }

    #[test]
    fn test_classify_out_of_range_octets_still_ipv4() {
        assert_eq!(
            classify(Some("999.300.1.0001")),
            ClassifiedQuery::Ipv4Literal("999.300.1.0001".to_string())
        );
    }

    #[test]
    fn test_classify_domain() {
        assert_eq!(
            classify(Some("example.com")),
            ClassifiedQuery::Domain("example.com".to_string())
        );
        assert_eq!(
            classify(Some("sub.example.co.uk")),
            ClassifiedQuery::Domain("sub.example.co.uk".to_string())
        );
    }

    #[test]
    fn test_classify_non_quads_are_domains() {
        for raw in ["1.2.3", "1.2.3.4.5", "1.2.3.a", "2001:4860:4860::8888", "::1"] {
            assert_eq!(
                classify(Some(raw)),
                ClassifiedQuery::Domain(raw.to_string()),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_classify_non_ascii_digits_are_domains() {
        // Arabic-Indic digits
        let raw = "٨.٨.٨.٨";
        assert_eq!(classify(Some(raw)), ClassifiedQuery::Domain(raw.to_string()));
    }

    #[test]
    fn test_classify_surrounding_whitespace_is_not_trimmed() {
        assert_eq!(
            classify(Some(" 8.8.8.8")),
            ClassifiedQuery::Domain(" 8.8.8.8".to_string())
        );
    }

    #[test]
    fn test_classify_absent() {
        assert_eq!(classify(None), ClassifiedQuery::Absent);
        assert_eq!(classify(Some("")), ClassifiedQuery::Absent);
        assert_eq!(classify(Some("   \t\n")), ClassifiedQuery::Absent);
    }

    #[test]
    fn test_classify_is_idempotent() {
        for raw in ["8.8.8.8", "example.com", "", "::1"] {
            assert_eq!(classify(Some(raw)), classify(Some(raw)));
        }
    }

    #[test]
    fn test_value() {
        assert_eq!(classify(Some("1.1.1.1")).value(), Some("1.1.1.1"));
        assert_eq!(classify(Some("bgpkit.com")).value(), Some("bgpkit.com"));
        assert_eq!(classify(None).value(), None);
    }

    #[test]
    fn test_query_from_arg() {
        assert_eq!(query_from_arg(None).unwrap(), None);
        assert_eq!(
            query_from_arg(Some(" 8.8.8.8 ")).unwrap(),
            Some("8.8.8.8".to_string())
        );

        let err = query_from_arg(Some("  ")).unwrap_err();
        assert_eq!(err.to_string(), EMPTY_SUBMISSION_PROMPT);
        assert!(query_from_arg(Some("")).is_err());
    }

    #[test]
    fn test_normalize_submission() {
        assert_eq!(
            normalize_submission("  example.com \n"),
            Some("example.com".to_string())
        );
        assert_eq!(normalize_submission(""), None);
        assert_eq!(normalize_submission("   "), None);
    }
}
