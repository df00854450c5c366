use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};

/// Path argument meaning "use stdin".
pub const STDIN_PATH: &str = "-";

pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == STDIN_PATH
}

/// Read a rule export from `path`, or from stdin for `-`.
pub fn read_export(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read rule export from stdin")?;
        return Ok(raw);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Refuse to write the template over the export it was generated from.
///
/// Only paths that both exist can name the same file, so anything else passes
/// here and is left to the read or write that follows.
pub fn ensure_output_not_input(output: &Path, input: &Path) -> Result<()> {
    if is_stdin(input) || !output.exists() || !input.exists() {
        return Ok(());
    }
    let resolved_output = fs::canonicalize(output)
        .with_context(|| format!("failed to resolve output path {}", output.display()))?;
    let resolved_input = fs::canonicalize(input)
        .with_context(|| format!("failed to resolve input path {}", input.display()))?;
    if resolved_output == resolved_input {
        bail!(
            "refusing to overwrite rule export: output {} matches input {}",
            output.display(),
            input.display()
        );
    }
    Ok(())
}
