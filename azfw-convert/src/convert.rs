//! `convert` command: rule export in, ARM template out.
//!
//! Settings are layered: defaults, then the `--config` file, then CLI flags.
//! A failed transformation produces no output at all; the error names the
//! offending input line.

use anyhow::{Context, Result};
use azfw_convert::conversion_summary::summarize;
use azfw_convert::report::render_summary;
use azfw_convert::settings::{load_settings, Settings};
use azfw_core::{to_string, transform_with_options, write_file};
use tracing::info;

use crate::cli::ConvertArgs;
use crate::files::{ensure_output_not_input, read_export};

pub fn run_convert(args: ConvertArgs) -> Result<()> {
    let settings = resolve_settings(&args)?;
    if let Some(output) = &args.output {
        ensure_output_not_input(output, &args.input)?;
    }

    let raw = read_export(&args.input)?;
    let conversion = transform_with_options(&raw, &settings.transform_options())
        .context("invalid input format")?;

    if !conversion.skipped.is_empty() {
        eprintln!(
            "warning: skipped {} line(s) with too few fields or an unrecognized action; run `inspect` for details",
            conversion.skipped.len()
        );
    }

    let layout = settings.layout();
    match &args.output {
        Some(path) => {
            write_file(&conversion.template, path, layout)
                .with_context(|| format!("failed to write template {}", path.display()))?;
            info!(path = %path.display(), "wrote template");
        }
        None => println!("{}", to_string(&conversion.template, layout)?),
    }

    if args.summary {
        eprintln!("{}", render_summary(summarize(&conversion)));
    }
    Ok(())
}

fn resolve_settings(args: &ConvertArgs) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };

    if args.strict {
        settings.convert.strict = true;
    }
    if let Some(indent) = args.indent {
        settings.output.indent = indent;
        settings.output.compact = false;
    }
    if args.compact {
        settings.output.compact = true;
    }
    Ok(settings)
}
