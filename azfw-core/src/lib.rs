//! Tab-delimited firewall rule exports to Azure Firewall policy ARM templates.
//!
//! Each export line describes one rule: section, rule number, action, sources,
//! destinations, service and ports. Rules are grouped by section into rule
//! collection groups, each holding an ALLOW and/or DENY collection, behind a
//! single fixed firewall policy resource.
//!
//! ```ignore
//! use azfw_core::{to_string, transform, Layout};
//!
//! let template = transform(&export)?;
//! println!("{}", to_string(&template, Layout::default())?);
//! ```

pub mod grouping;
pub mod model;
pub mod record;
pub mod transform;
pub mod writer;

pub use grouping::{BucketSide, SectionBucket, SectionMap};
pub use model::{NetworkRule, Resource, RuleCollection, RuleCollectionGroup, Template};
pub use record::{decode_line, decode_lines, Disposition, LineOutcome, SkipReason, MIN_FIELDS};
pub use transform::{
    transform, transform_with_options, Conversion, FormatError, SectionStats, SkippedLine,
    TransformOptions,
};
pub use writer::{to_string, write, write_file, Layout, WriteError, DEFAULT_INDENT};
