//! Rule export to ARM template transformation.
//!
//! ## Pipeline
//!
//! 1. **Line extraction** — split on `\n`, drop blank lines
//! 2. **Field decoding** — see [`crate::record`]
//! 3. **Grouping** — fold rules into per-section allow/deny buckets, first-seen order
//! 4. **Priorities** — collection priority is `1000 +` the number of the *first*
//!    rule appended to that side; group priority is `100 + index * 100`
//! 5. **Assembly** — fixed policy resource followed by one group per section
//!
//! Collection priority deliberately follows entry order rather than the lowest
//! rule number. Existing deployments were generated with this numbering.

use std::num::{IntErrorKind, ParseIntError};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::grouping::{BucketSide, SectionBucket, SectionMap};
use crate::model::{
    CollectionAction, RuleCollection, RuleCollectionGroup, Template, FILTER_COLLECTION_TYPE,
};
use crate::record::{decode_lines, Disposition, LineOutcome, SkipReason};

const COLLECTION_PRIORITY_BASE: i64 = 1000;
const GROUP_PRIORITY_BASE: u64 = 100;
const GROUP_PRIORITY_STEP: u64 = 100;

/// Errors that abort a transformation. No partial template is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The first rule of a populated collection has a non-integer rule number.
    #[error("line {line}: rule number '{value}' is not an integer")]
    InvalidRuleNumber { line: usize, value: String },
    /// `1000 + rule number` does not fit a collection priority.
    #[error("line {line}: rule number '{value}' is out of range for a collection priority")]
    PriorityOutOfRange { line: usize, value: String },
    /// Strict mode only: a line that lenient mode would have skipped.
    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: SkipReason },
}

/// Knobs for [`transform_with_options`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Reject short lines and unrecognized actions instead of skipping them.
    pub strict: bool,
}

/// A line that produced no rule in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    pub line: usize,
    pub reason: SkipReason,
}

/// What one section turned into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionStats {
    pub section: String,
    pub group_priority: u64,
    pub allow_rules: usize,
    pub deny_rules: usize,
    pub allow_priority: Option<i64>,
    pub deny_priority: Option<i64>,
}

impl SectionStats {
    pub fn collections(&self) -> usize {
        usize::from(self.allow_rules > 0) + usize::from(self.deny_rules > 0)
    }
}

/// Template plus the diagnostics gathered while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub template: Template,
    pub sections: Vec<SectionStats>,
    pub skipped: Vec<SkippedLine>,
}

/// Convert a rule export into a template, skipping malformed lines.
pub fn transform(input: &str) -> Result<Template, FormatError> {
    transform_with_options(input, &TransformOptions::default())
        .map(|conversion| conversion.template)
}

/// Convert a rule export, returning the template with section stats and
/// skipped-line diagnostics.
pub fn transform_with_options(
    input: &str,
    options: &TransformOptions,
) -> Result<Conversion, FormatError> {
    let (sections, skipped) = group_lines(input, options)?;
    let (groups, stats) = assemble_groups(sections)?;

    info!(
        sections = stats.len(),
        skipped = skipped.len(),
        "assembled firewall policy template"
    );

    Ok(Conversion {
        template: Template::new(groups),
        sections: stats,
        skipped,
    })
}

/// Stages 1-3: decode every line and fold rules into their section buckets.
pub fn group_lines(
    input: &str,
    options: &TransformOptions,
) -> Result<(SectionMap, Vec<SkippedLine>), FormatError> {
    let mut sections = SectionMap::new();
    let mut skipped = Vec::new();

    for outcome in decode_lines(input) {
        match outcome {
            LineOutcome::Rule(record) => {
                trace!(
                    line = record.line,
                    section = %record.section,
                    rule = %record.rule.name,
                    disposition = ?record.disposition,
                    "decoded rule"
                );
                sections.push(record);
            }
            LineOutcome::UnrecognizedAction {
                line,
                section,
                action,
            } => {
                sections.register(&section);
                let reason = SkipReason::UnrecognizedAction { action };
                skip_line(line, reason, options, &mut skipped)?;
            }
            LineOutcome::TooFewFields { line, found } => {
                let reason = SkipReason::TooFewFields { found };
                skip_line(line, reason, options, &mut skipped)?;
            }
        }
    }

    Ok((sections, skipped))
}

fn skip_line(
    line: usize,
    reason: SkipReason,
    options: &TransformOptions,
    skipped: &mut Vec<SkippedLine>,
) -> Result<(), FormatError> {
    if options.strict {
        return Err(FormatError::MalformedLine { line, reason });
    }
    debug!(line, %reason, "skipping line");
    skipped.push(SkippedLine { line, reason });
    Ok(())
}

/// Stages 4-5: project buckets into rule collection groups.
fn assemble_groups(
    sections: SectionMap,
) -> Result<(Vec<RuleCollectionGroup>, Vec<SectionStats>), FormatError> {
    let mut groups = Vec::with_capacity(sections.len());
    let mut stats = Vec::with_capacity(sections.len());

    for (index, (section, bucket)) in sections.into_iter().enumerate() {
        let group_priority = group_priority(index);
        let SectionBucket { allow, deny } = bucket;
        let allow_rules = allow.len();
        let deny_rules = deny.len();

        let mut collections = Vec::with_capacity(2);
        let allow_priority = push_collection(&mut collections, Disposition::Allow, allow)?;
        let deny_priority = push_collection(&mut collections, Disposition::Deny, deny)?;

        stats.push(SectionStats {
            section: section.clone(),
            group_priority,
            allow_rules,
            deny_rules,
            allow_priority,
            deny_priority,
        });
        groups.push(RuleCollectionGroup::new(&section, group_priority, collections));
    }

    Ok((groups, stats))
}

/// Append a collection for `side` unless it is empty; returns its priority.
fn push_collection(
    collections: &mut Vec<RuleCollection>,
    disposition: Disposition,
    side: BucketSide,
) -> Result<Option<i64>, FormatError> {
    let Some(priority) = collection_priority(&side)? else {
        return Ok(None);
    };
    collections.push(RuleCollection {
        rule_collection_type: FILTER_COLLECTION_TYPE.to_string(),
        name: disposition.label().to_string(),
        priority,
        action: CollectionAction {
            kind: disposition.action_type().to_string(),
        },
        rules: side.into_rules(),
    });
    Ok(Some(priority))
}

/// `1000 +` the lead rule's number, or `None` for an empty side.
pub fn collection_priority(side: &BucketSide) -> Result<Option<i64>, FormatError> {
    let Some(lead) = side.lead() else {
        return Ok(None);
    };
    let out_of_range = || FormatError::PriorityOutOfRange {
        line: lead.line,
        value: lead.rule_number.clone(),
    };
    let number: i64 = lead
        .rule_number
        .trim()
        .parse()
        .map_err(|err: ParseIntError| match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(),
            _ => FormatError::InvalidRuleNumber {
                line: lead.line,
                value: lead.rule_number.clone(),
            },
        })?;
    COLLECTION_PRIORITY_BASE
        .checked_add(number)
        .map(Some)
        .ok_or_else(out_of_range)
}

/// `100` for the first section, `200` for the second, and so on.
pub fn group_priority(index: usize) -> u64 {
    GROUP_PRIORITY_BASE + index as u64 * GROUP_PRIORITY_STEP
}
