//! Line extraction and field decoding for tab-delimited rule exports.
//!
//! Each non-blank input line is decoded on its own into a [`LineOutcome`]. The
//! lenient policies (short lines, unknown actions) are explicit outcomes rather
//! than errors so callers decide whether to skip or reject them.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::model::NetworkRule;

/// Minimum number of tab-separated fields a rule line must carry.
pub const MIN_FIELDS: usize = 17;

const LIST_SEPARATOR: &str = ", ";
const ANY: &str = "ANY";
const WILDCARD: &str = "*";
const ANY_NETWORK: &str = "0.0.0.0/0";

const FIELD_SECTION: usize = 0;
const FIELD_RULE_NUMBER: usize = 1;
const FIELD_ACTION: usize = 2;
const FIELD_SOURCES: usize = 3;
const FIELD_DESTINATIONS: usize = 4;
const FIELD_SERVICE: usize = 6;
const FIELD_PORTS: usize = 7;

/// Which collection of its section a rule lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Allow,
    Deny,
}

impl Disposition {
    /// Classify an action keyword, case-insensitively.
    ///
    /// `accept` allows; `drop` and `reject` deny; anything else is unrecognized.
    pub fn classify(action: &str) -> Option<Self> {
        match action.to_lowercase().as_str() {
            "accept" => Some(Self::Allow),
            "drop" | "reject" => Some(Self::Deny),
            _ => None,
        }
    }

    /// Collection name as it appears in the template.
    pub fn label(self) -> &'static str {
        match self {
            Self::Allow => "ALLOW",
            Self::Deny => "DENY",
        }
    }

    pub fn action_type(self) -> &'static str {
        match self {
            Self::Allow => "Allow",
            Self::Deny => "Deny",
        }
    }
}

/// A fully decoded rule line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    /// 1-based input line number.
    pub line: usize,
    pub section: String,
    /// Field 1 verbatim; parsed as an integer only when priorities are computed.
    pub rule_number: String,
    pub disposition: Disposition,
    pub rule: NetworkRule,
}

/// Why a line contributed no rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    TooFewFields { found: usize },
    UnrecognizedAction { action: String },
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewFields { found } => {
                write!(f, "expected at least {MIN_FIELDS} tab-separated fields, found {found}")
            }
            Self::UnrecognizedAction { action } => write!(f, "unrecognized action '{action}'"),
        }
    }
}

/// Result of decoding one non-blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The line decoded into a rule.
    Rule(RuleRecord),
    /// Enough fields, but the action is not one we map. The section is still
    /// known and keeps its place in the output.
    UnrecognizedAction {
        line: usize,
        section: String,
        action: String,
    },
    /// Too few fields; nothing on the line is trusted.
    TooFewFields { line: usize, found: usize },
}

impl LineOutcome {
    /// The skip reason, if this line produced no rule.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Rule(_) => None,
            Self::UnrecognizedAction { action, .. } => Some(SkipReason::UnrecognizedAction {
                action: action.clone(),
            }),
            Self::TooFewFields { found, .. } => Some(SkipReason::TooFewFields { found: *found }),
        }
    }
}

/// Split `input` into non-blank lines paired with their 1-based line numbers.
pub fn rule_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .split('\n')
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}

/// Decode every non-blank line of `input`, in order.
pub fn decode_lines(input: &str) -> impl Iterator<Item = LineOutcome> + '_ {
    rule_lines(input).map(|(line_no, line)| decode_line(line_no, line))
}

/// Decode a single rule line.
pub fn decode_line(line_no: usize, line: &str) -> LineOutcome {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < MIN_FIELDS {
        return LineOutcome::TooFewFields {
            line: line_no,
            found: fields.len(),
        };
    }

    let section = fields[FIELD_SECTION].to_string();
    let action = fields[FIELD_ACTION];
    let Some(disposition) = Disposition::classify(action) else {
        return LineOutcome::UnrecognizedAction {
            line: line_no,
            section,
            action: action.to_string(),
        };
    };

    let rule_number = fields[FIELD_RULE_NUMBER];
    let (protocols, ports) = decode_service(fields[FIELD_SERVICE], fields[FIELD_PORTS]);
    let rule = NetworkRule::new(
        rule_number,
        protocols,
        split_list(fields[FIELD_SOURCES]),
        decode_destinations(fields[FIELD_DESTINATIONS]),
        ports,
    );

    LineOutcome::Rule(RuleRecord {
        line: line_no,
        section,
        rule_number: rule_number.to_string(),
        disposition,
        rule,
    })
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR).map(str::to_string).collect()
}

/// `0.0.0.0/0` becomes the `*` wildcard; everything else passes through.
fn decode_destinations(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(|addr| {
            if addr == ANY_NETWORK {
                WILDCARD.to_string()
            } else {
                addr.to_string()
            }
        })
        .collect()
}

/// Returns `(protocols, ports)`. An `ANY` service ignores the ports field.
fn decode_service(service: &str, ports: &str) -> (Vec<String>, Vec<String>) {
    let service = service.to_uppercase();
    if service == ANY {
        return (vec![ANY.to_string()], vec![WILDCARD.to_string()]);
    }

    let protocols = service
        .split(LIST_SEPARATOR)
        .map(str::to_uppercase)
        .collect();
    let ports = if ports == ANY {
        vec![WILDCARD.to_string()]
    } else {
        split_list(ports)
    };
    (protocols, ports)
}
