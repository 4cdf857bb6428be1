// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Input checks shared by the API handlers and the portal client.

use std::sync::LazyLock;

use regex::Regex;

pub const MISSING_CREDENTIALS_MESSAGE: &str = "Please enter both email address and password.";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

static SLUG_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").ok());

/// Whether `email` looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// Whether `slug` is a lowercase, dash-separated page identifier.
pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= 64 && SLUG_RE.as_ref().is_some_and(|re| re.is_match(slug))
}

/// Lowercase and trim an email address for lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

const STATE_ABBREVIATIONS: [(&str, &str); 50] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Two-letter postal code for a full US state name.
///
/// Anything that is not a full state name is returned unchanged.
pub fn abbreviate_state(state: &str) -> String {
    let trimmed = state.trim();
    STATE_ABBREVIATIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        .map(|(_, abbr)| (*abbr).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_format() {
        assert!(is_valid_email("brother@example.edu"));
        assert!(is_valid_email("first.last+rush@mail.example.com"));
        assert!(!is_valid_email("brother@example"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn slug_format() {
        assert!(is_valid_slug("rush-week"));
        assert!(is_valid_slug("history"));
        assert!(!is_valid_slug("Rush Week"));
        assert!(!is_valid_slug("../etc/passwd"));
        assert!(!is_valid_slug("-leading"));
    }

    #[test]
    fn state_names_are_abbreviated() {
        assert_eq!(abbreviate_state("New York"), "NY");
        assert_eq!(abbreviate_state(" texas "), "TX");
        assert_eq!(abbreviate_state("OH"), "OH");
        assert_eq!(abbreviate_state("Ontario"), "Ontario");
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Brother@Example.EDU "), "brother@example.edu");
    }
}
