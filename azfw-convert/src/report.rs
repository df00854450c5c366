use colored::Colorize;

use azfw_core::{SectionStats, SkippedLine};

use crate::conversion_summary::{render as render_conversion_summary, ConversionSummary};

/// Render one line per section with its group and collection priorities.
pub fn render_sections(rows: &[SectionStats]) -> String {
    let mut out = Vec::new();
    for row in rows {
        let mut line = format!(
            "{} priority={} allow={} deny={}",
            row.section.bold(),
            row.group_priority,
            row.allow_rules,
            row.deny_rules
        );
        if let Some(priority) = row.allow_priority {
            line.push_str(&format!(" {}", format!("ALLOW@{priority}").green()));
        }
        if let Some(priority) = row.deny_priority {
            line.push_str(&format!(" {}", format!("DENY@{priority}").red()));
        }
        if row.collections() == 0 {
            line.push_str(&format!(" {}", "(no collections)".yellow()));
        }
        out.push(line);
    }
    out.join("\n")
}

/// Render skipped-line diagnostics, one per line.
pub fn render_skipped(skipped: &[SkippedLine]) -> String {
    skipped
        .iter()
        .map(|s| format!("{} line {}: {}", "SKIP".yellow(), s.line, s.reason))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the conversion summary line.
pub fn render_summary(summary: ConversionSummary) -> String {
    render_conversion_summary(summary).cyan().to_string()
}

#[cfg(test)]
mod tests {
    use azfw_core::{SectionStats, SkipReason, SkippedLine};

    use super::{render_sections, render_skipped};

    #[test]
    fn sections_show_priorities_and_empty_groups() {
        colored::control::set_override(false);
        let rows = vec![
            SectionStats {
                section: "Web".to_string(),
                group_priority: 100,
                allow_rules: 2,
                deny_rules: 1,
                allow_priority: Some(1005),
                deny_priority: Some(1003),
            },
            SectionStats {
                section: "Quiet".to_string(),
                group_priority: 200,
                allow_rules: 0,
                deny_rules: 0,
                allow_priority: None,
                deny_priority: None,
            },
        ];

        let text = render_sections(&rows);
        assert_eq!(
            text,
            "Web priority=100 allow=2 deny=1 ALLOW@1005 DENY@1003\nQuiet priority=200 allow=0 deny=0 (no collections)"
        );
    }

    #[test]
    fn skipped_lines_include_reason() {
        colored::control::set_override(false);
        let text = render_skipped(&[SkippedLine {
            line: 7,
            reason: SkipReason::UnrecognizedAction {
                action: "bypass".to_string(),
            },
        }]);
        assert_eq!(text, "SKIP line 7: unrecognized action 'bypass'");
    }
}
