// src/report/text.rs
// =============================================================================
// Turns a profile into labelled rows and the plain-text report body.
//
// The same rows feed the terminal table, the TXT file and the PDF, so all
// three always agree on labels and formatting.
// =============================================================================

use serde::Serialize;

use super::table;
use crate::instagram::{suggest_usernames, ProfileSummary};

pub const REPORT_TITLE: &str = "INSTAGRAM OSINT REPORT";

// Everything that goes into a report: the profile plus the breach status
//
// Serializes flat, so the JSON report has the profile keys followed by
// "BreachStatus".
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    #[serde(flatten)]
    pub profile: ProfileSummary,
    #[serde(rename = "BreachStatus")]
    pub breach_status: String,
}

fn yes_no(flag: bool) -> String {
    if flag { "Yes" } else { "No" }.to_string()
}

// The eight rows of the full profile table
pub fn summary_rows(profile: &ProfileSummary) -> Vec<Vec<String>> {
    vec![
        vec!["Username".into(), profile.username.clone()],
        vec!["Profile ID".into(), profile.profile_id.to_string()],
        vec!["Private?".into(), yes_no(profile.is_private)],
        vec!["Verified?".into(), yes_no(profile.is_verified)],
        vec!["Followers".into(), profile.followers.to_string()],
        vec!["Following".into(), profile.following.to_string()],
        vec!["Total Posts".into(), profile.total_posts.to_string()],
        vec!["Reels (videos)".into(), profile.reels_display()],
    ]
}

// The shorter table shown by "Show last fetched profile summary"
pub fn short_summary_rows(profile: &ProfileSummary) -> Vec<Vec<String>> {
    vec![
        vec!["Username".into(), profile.username.clone()],
        vec!["Private?".into(), yes_no(profile.is_private)],
        vec!["Followers".into(), profile.followers.to_string()],
        vec!["Following".into(), profile.following.to_string()],
        vec!["Posts".into(), profile.total_posts.to_string()],
        vec!["Reels".into(), profile.reels_display()],
    ]
}

pub fn suggestion_line(username: &str) -> String {
    format!(
        "Suggested usernames → {}",
        suggest_usernames(username).join(", ")
    )
}

// Title, boxed table and username suggestions, separated by blank lines
pub fn render_text(data: &ReportData, username: &str) -> String {
    format!(
        "{REPORT_TITLE}\n\n{}\n\n{}",
        table::boxed(&summary_rows(&data.profile)),
        suggestion_line(username)
    )
}
