use indexmap::IndexMap;

use crate::model::NetworkRule;
use crate::record::{Disposition, RuleRecord};

/// The rule that opened a bucket side. Its number seeds the collection priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRule {
    pub line: usize,
    pub rule_number: String,
}

/// Rules of one disposition within a section, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketSide {
    lead: Option<LeadRule>,
    rules: Vec<NetworkRule>,
}

impl BucketSide {
    fn push(&mut self, line: usize, rule_number: String, rule: NetworkRule) {
        if self.lead.is_none() {
            self.lead = Some(LeadRule { line, rule_number });
        }
        self.rules.push(rule);
    }

    /// First rule appended to this side, not the lowest-numbered one.
    pub fn lead(&self) -> Option<&LeadRule> {
        self.lead.as_ref()
    }

    pub fn rules(&self) -> &[NetworkRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn into_rules(self) -> Vec<NetworkRule> {
        self.rules
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionBucket {
    pub allow: BucketSide,
    pub deny: BucketSide,
}

impl SectionBucket {
    pub fn side(&self, disposition: Disposition) -> &BucketSide {
        match disposition {
            Disposition::Allow => &self.allow,
            Disposition::Deny => &self.deny,
        }
    }

    fn side_mut(&mut self, disposition: Disposition) -> &mut BucketSide {
        match disposition {
            Disposition::Allow => &mut self.allow,
            Disposition::Deny => &mut self.deny,
        }
    }
}

/// Section buckets in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    sections: IndexMap<String, SectionBucket>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `section` has a bucket, creating an empty one on first sight.
    pub fn register(&mut self, section: &str) -> &mut SectionBucket {
        if !self.sections.contains_key(section) {
            self.sections
                .insert(section.to_string(), SectionBucket::default());
        }
        &mut self.sections[section]
    }

    /// Append a decoded rule to its section's allow or deny side.
    pub fn push(&mut self, record: RuleRecord) {
        let RuleRecord {
            line,
            section,
            rule_number,
            disposition,
            rule,
        } = record;
        self.register(&section)
            .side_mut(disposition)
            .push(line, rule_number, rule);
    }

    pub fn get(&self, section: &str) -> Option<&SectionBucket> {
        self.sections.get(section)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SectionBucket)> {
        self.sections
            .iter()
            .map(|(section, bucket)| (section.as_str(), bucket))
    }
}

impl IntoIterator for SectionMap {
    type Item = (String, SectionBucket);
    type IntoIter = indexmap::map::IntoIter<String, SectionBucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::SectionMap;
    use crate::model::NetworkRule;
    use crate::record::{Disposition, RuleRecord};

    fn record(line: usize, section: &str, number: &str, disposition: Disposition) -> RuleRecord {
        RuleRecord {
            line,
            section: section.to_string(),
            rule_number: number.to_string(),
            disposition,
            rule: NetworkRule::new(number, Vec::new(), Vec::new(), Vec::new(), Vec::new()),
        }
    }

    #[test]
    fn sections_iterate_in_first_seen_order() {
        let mut map = SectionMap::new();
        map.push(record(1, "zeta", "1", Disposition::Allow));
        map.push(record(2, "alpha", "2", Disposition::Deny));
        map.push(record(3, "zeta", "3", Disposition::Deny));
        map.register("mid");

        let order: Vec<&str> = map.iter().map(|(section, _)| section).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn lead_rule_is_first_appended_not_lowest() {
        let mut map = SectionMap::new();
        map.push(record(1, "s", "9", Disposition::Allow));
        map.push(record(2, "s", "1", Disposition::Allow));
        map.push(record(3, "s", "4", Disposition::Deny));

        let bucket = map.get("s").expect("bucket");
        let allow_lead = bucket.allow.lead().expect("allow lead");
        assert_eq!(allow_lead.rule_number, "9");
        assert_eq!(allow_lead.line, 1);
        assert_eq!(bucket.side(Disposition::Allow).len(), 2);
        assert_eq!(bucket.deny.lead().map(|l| l.line), Some(3));
    }

    #[test]
    fn registered_section_starts_empty() {
        let mut map = SectionMap::new();
        map.register("quiet");
        let bucket = map.get("quiet").expect("bucket");
        assert!(bucket.allow.is_empty());
        assert!(bucket.deny.is_empty());
        assert!(bucket.allow.lead().is_none());
    }
}
