use anyhow::{Context, Result};
use azfw_convert::conversion_summary::{summarize, ConversionSummary};
use azfw_convert::report::{render_sections, render_skipped, render_summary};
use azfw_core::{transform_with_options, SectionStats, SkippedLine, TransformOptions};
use serde::Serialize;

use crate::cli::{InspectArgs, OutputFormat};
use crate::files::read_export;

pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let raw = read_export(&args.input)?;
    let options = TransformOptions {
        strict: args.strict,
    };
    let conversion =
        transform_with_options(&raw, &options).context("invalid input format")?;
    let summary = summarize(&conversion);

    match args.format {
        OutputFormat::Text => {
            if !conversion.sections.is_empty() {
                println!("{}", render_sections(&conversion.sections));
            }
            if !conversion.skipped.is_empty() {
                println!();
                println!("{}", render_skipped(&conversion.skipped));
            }
            println!();
            println!("{}", render_summary(summary));
        }
        OutputFormat::Json => {
            let report = InspectReport {
                sections: &conversion.sections,
                skipped: &conversion.skipped,
                summary,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct InspectReport<'a> {
    sections: &'a [SectionStats],
    skipped: &'a [SkippedLine],
    summary: ConversionSummary,
}
