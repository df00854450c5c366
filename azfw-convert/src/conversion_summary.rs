use azfw_core::Conversion;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub sections: usize,
    pub allow_rules: usize,
    pub deny_rules: usize,
    pub collections: usize,
    pub skipped: usize,
}

pub fn summarize(conversion: &Conversion) -> ConversionSummary {
    let sections = &conversion.sections;
    ConversionSummary {
        sections: sections.len(),
        allow_rules: sections.iter().map(|s| s.allow_rules).sum(),
        deny_rules: sections.iter().map(|s| s.deny_rules).sum(),
        collections: sections.iter().map(|s| s.collections()).sum(),
        skipped: conversion.skipped.len(),
    }
}

pub fn render(summary: ConversionSummary) -> String {
    format!(
        "convert_summary sections={} allow_rules={} deny_rules={} collections={} skipped={}",
        summary.sections,
        summary.allow_rules,
        summary.deny_rules,
        summary.collections,
        summary.skipped
    )
}
