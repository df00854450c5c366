use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use thiserror::Error;

use crate::model::Template;

/// Indentation used when rendering templates for people to read.
pub const DEFAULT_INDENT: usize = 4;

/// Errors that can occur while rendering a [`Template`].
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize the template.
    #[error("failed to serialize template: {0}")]
    Json(#[from] serde_json::Error),
    /// Serializer produced bytes that are not UTF-8.
    #[error("serialized template is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// Failed to write output file.
    #[error("failed to write template file: {0}")]
    Io(#[from] std::io::Error),
}

/// How the JSON text is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Pretty { indent: usize },
    Compact,
}

impl Default for Layout {
    fn default() -> Self {
        Self::Pretty {
            indent: DEFAULT_INDENT,
        }
    }
}

/// Serialize a [`Template`] into JSON bytes.
pub fn write(template: &Template, layout: Layout) -> Result<Vec<u8>, WriteError> {
    match layout {
        Layout::Compact => Ok(serde_json::to_vec(template)?),
        Layout::Pretty { indent } => {
            let indent = vec![b' '; indent];
            let mut out = Vec::new();
            let mut serializer =
                Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
            template.serialize(&mut serializer)?;
            Ok(out)
        }
    }
}

/// Serialize a [`Template`] into a JSON string.
pub fn to_string(template: &Template, layout: Layout) -> Result<String, WriteError> {
    Ok(String::from_utf8(write(template, layout)?)?)
}

/// Serialize a [`Template`] and write it to `path` with a trailing newline.
pub fn write_file(template: &Template, path: &Path, layout: Layout) -> Result<(), WriteError> {
    let mut bytes = write(template, layout)?;
    bytes.push(b'\n');
    fs::write(path, bytes)?;
    Ok(())
}
