// src/instagram/username.rs
// =============================================================================
// This module turns whatever the user typed into an Instagram username, and
// builds look-alike usernames for the report.
//
// Accepted input:
// - A profile URL: https://www.instagram.com/natgeo/?hl=en
// - A URL without scheme: instagram.com/natgeo
// - A bare handle: natgeo (anything after the first space is ignored)
//
// Rust concepts:
// - Option<T>: "no username" is a normal outcome, not an error
// - OnceLock: Compile each regex once and reuse it
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;

// Matches "instagram.com/<first path segment>", case-insensitively
fn profile_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)instagram\.com/([^/?#]+)").expect("valid regex"))
}

fn non_word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\W+").expect("valid regex"))
}

// Extracts a username from a profile URL or a bare handle
//
// Returns None for empty (or whitespace-only) input.
//
// Examples:
//   "https://www.instagram.com/natgeo/"  -> Some("natgeo")
//   "instagram.com/natgeo?hl=en"         -> Some("natgeo")
//   "  natgeo extra words "              -> Some("natgeo")
//   "   "                                -> None
pub fn extract_username(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(caps) = profile_url_regex().captures(input) {
        return Some(caps[1].trim_end_matches('/').to_string());
    }

    input.split_whitespace().next().map(str::to_string)
}

// Builds five look-alike usernames from a base username
//
// Non-word characters are removed and the base is cut to 20 characters
// before the suffixes are appended. Same input, same output.
pub fn suggest_usernames(username: &str) -> [String; 5] {
    let cleaned = non_word_regex().replace_all(username, "");
    let base: String = cleaned.chars().take(20).collect();

    [
        format!("{base}_official"),
        format!("{base}_real"),
        format!("{base}123"),
        format!("{base}_01"),
        format!("{base}.official"),
    ]
}
