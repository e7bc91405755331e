// src/report/export.rs
// =============================================================================
// Writes the PDF, TXT and JSON reports for one profile.
//
// Files (all in the reports directory):
//   <username>_report.pdf
//   <username>_report.txt    same text as the PDF body, UTF-8
//   <username>_report.json   ReportData, 4-space indent, non-ASCII kept as is
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::pdf::{write_pdf, PdfAssets};
use super::text::{render_text, ReportData, REPORT_TITLE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub pdf: PathBuf,
    pub txt: PathBuf,
    pub json: PathBuf,
}

impl ReportPaths {
    pub fn new(reports_dir: &Path, username: &str) -> Self {
        Self {
            pdf: reports_dir.join(format!("{username}_report.pdf")),
            txt: reports_dir.join(format!("{username}_report.txt")),
            json: reports_dir.join(format!("{username}_report.json")),
        }
    }
}

pub fn generate_reports(
    data: &ReportData,
    username: &str,
    reports_dir: &Path,
    assets: &PdfAssets,
) -> Result<ReportPaths> {
    fs::create_dir_all(reports_dir)
        .with_context(|| format!("Failed to create '{}'", reports_dir.display()))?;

    let paths = ReportPaths::new(reports_dir, username);
    let text = render_text(data, username);

    write_pdf(&text, REPORT_TITLE, assets, &paths.pdf)
        .with_context(|| format!("Failed to write '{}'", paths.pdf.display()))?;

    fs::write(&paths.txt, &text)
        .with_context(|| format!("Failed to write '{}'", paths.txt.display()))?;

    fs::write(&paths.json, to_json(data)?)
        .with_context(|| format!("Failed to write '{}'", paths.json.display()))?;

    info!(username, pdf = %paths.pdf.display(), "reports written");
    Ok(paths)
}

// serde_json only offers 2-space pretty printing out of the box
fn to_json(data: &ReportData) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    data.serialize(&mut serializer)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::text::tests::sample_data;

    #[test]
    fn test_generate_reports_writes_all_three() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("reports");
        let data = sample_data();

        let paths = generate_reports(&data, "natgeo", &reports, &PdfAssets::default()).unwrap();
        assert_eq!(paths.pdf, reports.join("natgeo_report.pdf"));

        let pdf = fs::read(&paths.pdf).unwrap();
        assert!(pdf.starts_with(b"%PDF"));

        let txt = fs::read_to_string(&paths.txt).unwrap();
        assert!(txt.starts_with("INSTAGRAM OSINT REPORT"));
        assert!(txt.contains("natgeo"));
        assert!(txt.contains("Suggested usernames → natgeo_official"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.json).unwrap()).unwrap();
        assert_eq!(json["username"], "natgeo");
        assert_eq!(json["profile_id"], 787132);
        assert_eq!(json["followers"], 280_000_000u64);
        assert_eq!(json["reels"], serde_json::Value::Null);
        assert_eq!(json["BreachStatus"], "No breach found");
    }

    #[test]
    fn test_json_is_indented_and_keeps_unicode() {
        let json = String::from_utf8(to_json(&sample_data()).unwrap()).unwrap();
        assert!(json.contains("\n    \"username\": \"natgeo\""));
        assert!(json.contains("🌍"));
    }
}
