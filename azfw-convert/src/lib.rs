//! Command-line front end for converting firewall rule exports into Azure
//! Firewall policy ARM templates.
//!
//! The transformation itself lives in `azfw-core`; this crate adds settings
//! files, conversion summaries and terminal reports.
//!
//! - [`settings`] — optional TOML settings (strict mode, output layout)
//! - [`conversion_summary`] — post-conversion counts
//! - [`report`] — coloured section and skipped-line reports

pub mod conversion_summary;
pub mod report;
pub mod settings;
