// src/report/mod.rs
// =============================================================================
// Report rendering and export.
//
// Submodules:
// - table: Box-drawing tables for the terminal and the reports
// - text: Labelled rows and the plain-text report body
// - pdf: PDF writer
// - export: Writes the PDF/TXT/JSON trio
// =============================================================================

mod export;
mod pdf;
pub mod table;
mod text;

pub use export::generate_reports;
pub use pdf::PdfAssets;
pub use text::{short_summary_rows, summary_rows, ReportData};
