//! Helpers for text handed over by page collaborators

use regex::Regex;
use std::sync::LazyLock;

/// Kind of Polymarket page, derived from the URL path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Homepage,
    Market,
    Portfolio,
    Unknown,
}

impl PageKind {
    pub fn from_path(path: &str) -> Self {
        if path == "/" || path == "/markets" {
            return PageKind::Homepage;
        }
        if path.contains("/event/") || path.contains("/market/") {
            return PageKind::Market;
        }
        if path.contains("/portfolio") || path.contains("/wallet") {
            return PageKind::Portfolio;
        }
        PageKind::Unknown
    }
}

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("valid percent pattern"));
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").expect("valid number pattern"));

/// Read a probability out of displayed price text.
///
/// The first `NN%` reading wins. Without a percent sign the first number
/// is taken as a probability when <= 1 and as a percentage otherwise.
pub fn parse_probability_text(text: &str) -> Option<f64> {
    if let Some(value) = first_capture(&PERCENT_RE, text) {
        return Some(value / 100.0);
    }

    first_capture(&NUMBER_RE, text).map(|value| if value <= 1.0 { value } else { value / 100.0 })
}

fn first_capture(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}
