//! Page session state: cookies, anti-forgery token, theme preference.
//!
//! # Responsibility
//! - Parse cookie headers for the CSRF token the sync layer attaches.
//! - Encode/decode the theme preference cookie.
//! - Sanitize hex color input from the edit modal.
//!
//! # Invariants
//! - Cookie parsing never fails; absent values are `None`.
//! - Only a valid `#RGB`/`#RRGGBB` value is ever submitted as a color.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Cookie holding the anti-forgery token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Cookie holding the serialized theme preference.
pub const THEME_COOKIE: &str = "startdeck_theme";

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([0-9A-F]{3}|[0-9A-F]{6})$").expect("valid hex color regex"));

/// Returns one cookie's value from a `Cookie:` header string.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key == name {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Returns the anti-forgery token captured from the cookie header.
pub fn csrf_token(header: &str) -> Option<String> {
    cookie_value(header, CSRF_COOKIE)
}

/// Normalizes modal color input to a submittable hex value.
///
/// Mirrors the edit form's behavior: uppercase, `#`-prefix, strip everything
/// outside `[#0-9A-F]`, cap at 7 chars. Returns `None` when the result is
/// not a well-formed color, in which case no color is submitted.
pub fn normalize_hex_color(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let upper = trimmed.to_uppercase();
    let mut value: String = upper
        .chars()
        .filter(|c| *c == '#' || c.is_ascii_digit() || ('A'..='F').contains(c))
        .collect();
    if !value.starts_with('#') {
        value.insert(0, '#');
    }
    value.truncate(7);

    if HEX_COLOR_RE.is_match(&value) {
        Some(value)
    } else {
        None
    }
}

/// Error decoding a theme preference cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeCookieError(String);

impl Display for ThemeCookieError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid theme cookie: {}", self.0)
    }
}

impl Error for ThemeCookieError {}

/// Persisted theme selection, stored client-side next to the board state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ThemePreference {
    /// Named palette slots to color values.
    pub colors: BTreeMap<String, String>,
    /// Whether the dark variant is active.
    pub is_dark: bool,
}

impl ThemePreference {
    /// Serializes the preference into a cookie value.
    pub fn to_cookie_value(&self) -> String {
        serde_json::to_string(self).expect("theme preference serializes to JSON")
    }

    /// Decodes a preference from a cookie value.
    pub fn from_cookie_value(value: &str) -> Result<Self, ThemeCookieError> {
        serde_json::from_str(value).map_err(|err| ThemeCookieError(err.to_string()))
    }

    /// Loads the preference from a cookie header, if present and valid.
    pub fn from_cookie_header(header: &str) -> Option<Self> {
        let value = cookie_value(header, THEME_COOKIE)?;
        Self::from_cookie_value(&value).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{cookie_value, csrf_token, normalize_hex_color, ThemePreference};

    #[test]
    fn cookie_value_finds_token_among_pairs() {
        let header = "sessionid=s1; csrftoken=abc123; other=x";
        assert_eq!(cookie_value(header, "csrftoken").as_deref(), Some("abc123"));
        assert_eq!(csrf_token(header).as_deref(), Some("abc123"));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn hex_color_is_uppercased_and_prefixed() {
        assert_eq!(normalize_hex_color("aabbcc").as_deref(), Some("#AABBCC"));
        assert_eq!(normalize_hex_color("#0f0").as_deref(), Some("#0F0"));
    }

    #[test]
    fn hex_color_rejects_garbage_and_empty() {
        assert_eq!(normalize_hex_color(""), None);
        assert_eq!(normalize_hex_color("#12"), None);
        assert_eq!(normalize_hex_color("not a color"), None);
        // Stray characters are stripped before validation, as in the form.
        assert_eq!(normalize_hex_color("#AA-BB-CC").as_deref(), Some("#AABBCC"));
    }

    #[test]
    fn theme_preference_round_trips_through_cookie_value() {
        let mut preference = ThemePreference::default();
        preference.is_dark = true;
        preference
            .colors
            .insert("primary".to_string(), "#336699".to_string());

        let encoded = preference.to_cookie_value();
        let decoded = ThemePreference::from_cookie_value(&encoded).unwrap();
        assert_eq!(decoded, preference);
    }

    #[test]
    fn theme_preference_reads_from_header() {
        let header = format!(
            "csrftoken=t; startdeck_theme={}",
            r#"{"colors":{},"is_dark":false}"#
        );
        let preference = ThemePreference::from_cookie_header(&header).unwrap();
        assert!(!preference.is_dark);
    }
}
