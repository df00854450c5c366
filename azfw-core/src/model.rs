//! ARM template document types for Azure Firewall policies.
//!
//! Field order in every struct matches the order keys are emitted in, so the
//! serialized template reads the same way the Azure portal exports it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Deployment template schema URL.
pub const SCHEMA: &str =
    "https://schema.management.azure.com/schemas/2019-04-01/deploymentTemplate.json#";
/// Template content version.
pub const CONTENT_VERSION: &str = "1.0.0.0";
/// Name of the single template parameter holding the policy name.
pub const POLICY_NAME_PARAMETER: &str = "firewallPoliciesName";
/// Default value of [`POLICY_NAME_PARAMETER`].
pub const DEFAULT_POLICY_NAME: &str = "AVS-172.21.113.0";
/// API version stamped on every resource.
pub const API_VERSION: &str = "2024-01-01";
/// Azure region stamped on every resource.
pub const LOCATION: &str = "italynorth";
/// Resource type of the firewall policy.
pub const POLICY_TYPE: &str = "Microsoft.Network/firewallPolicies";
/// Resource type of a rule collection group.
pub const GROUP_TYPE: &str = "Microsoft.Network/firewallPolicies/ruleCollectionGroups";
/// Collection type used for both ALLOW and DENY collections.
pub const FILTER_COLLECTION_TYPE: &str = "FirewallPolicyFilterRuleCollection";
/// Rule type of every generated rule.
pub const NETWORK_RULE_TYPE: &str = "NetworkRule";

/// Top-level deployment template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub content_version: String,
    pub parameters: Parameters,
    pub variables: Map<String, Value>,
    pub resources: Vec<Resource>,
}

impl Template {
    /// Build a template around `groups`, with the policy resource first.
    pub fn new(groups: Vec<RuleCollectionGroup>) -> Self {
        let mut resources = Vec::with_capacity(groups.len() + 1);
        resources.push(Resource::Policy(FirewallPolicy::standard()));
        resources.extend(groups.into_iter().map(Resource::Group));

        Self {
            schema: SCHEMA.to_string(),
            content_version: CONTENT_VERSION.to_string(),
            parameters: Parameters::default(),
            variables: Map::new(),
            resources,
        }
    }

    /// Rule collection groups in resource order.
    pub fn groups(&self) -> impl Iterator<Item = &RuleCollectionGroup> {
        self.resources.iter().filter_map(|resource| match resource {
            Resource::Group(group) => Some(group),
            Resource::Policy(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub firewall_policies_name: ParameterDefinition,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            firewall_policies_name: ParameterDefinition {
                default_value: DEFAULT_POLICY_NAME.to_string(),
                kind: "String".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub default_value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One entry of the template `resources` array.
///
/// Untagged: the policy is recognised by its `sku`, a group by `dependsOn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resource {
    Policy(FirewallPolicy),
    Group(RuleCollectionGroup),
}

/// The fixed firewall policy resource every group depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallPolicy {
    #[serde(rename = "type")]
    pub kind: String,
    pub api_version: String,
    pub name: String,
    pub location: String,
    pub properties: PolicyProperties,
}

impl FirewallPolicy {
    /// Standard-tier policy with threat intelligence in alert mode.
    pub fn standard() -> Self {
        Self {
            kind: POLICY_TYPE.to_string(),
            api_version: API_VERSION.to_string(),
            name: policy_name_expression(),
            location: LOCATION.to_string(),
            properties: PolicyProperties {
                sku: Sku {
                    tier: "Standard".to_string(),
                },
                threat_intel_mode: "Alert".to_string(),
                threat_intel_whitelist: ThreatIntelWhitelist::default(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyProperties {
    pub sku: Sku,
    pub threat_intel_mode: String,
    pub threat_intel_whitelist: ThreatIntelWhitelist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sku {
    pub tier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatIntelWhitelist {
    pub fqdns: Vec<String>,
    pub ip_addresses: Vec<String>,
}

/// Deployment resource bundling the collections of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCollectionGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub api_version: String,
    pub name: String,
    pub location: String,
    pub depends_on: Vec<String>,
    pub properties: GroupProperties,
}

impl RuleCollectionGroup {
    /// Build a group for `section`; spaces in the section become underscores.
    pub fn new(section: &str, priority: u64, rule_collections: Vec<RuleCollection>) -> Self {
        Self {
            kind: GROUP_TYPE.to_string(),
            api_version: API_VERSION.to_string(),
            name: group_name_expression(section),
            location: LOCATION.to_string(),
            depends_on: vec![policy_resource_id_expression()],
            properties: GroupProperties {
                priority,
                rule_collections,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupProperties {
    pub priority: u64,
    pub rule_collections: Vec<RuleCollection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleCollection {
    pub rule_collection_type: String,
    pub name: String,
    pub priority: i64,
    pub action: CollectionAction,
    pub rules: Vec<NetworkRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionAction {
    #[serde(rename = "type")]
    pub kind: String,
}

/// A single network rule. IP group and FQDN lists are always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRule {
    pub rule_type: String,
    pub name: String,
    pub ip_protocols: Vec<String>,
    pub source_addresses: Vec<String>,
    pub source_ip_groups: Vec<String>,
    pub destination_addresses: Vec<String>,
    pub destination_ip_groups: Vec<String>,
    pub destination_fqdns: Vec<String>,
    pub destination_ports: Vec<String>,
}

impl NetworkRule {
    /// Build a rule named `Rule-<rule_number>`.
    pub fn new(
        rule_number: &str,
        ip_protocols: Vec<String>,
        source_addresses: Vec<String>,
        destination_addresses: Vec<String>,
        destination_ports: Vec<String>,
    ) -> Self {
        Self {
            rule_type: NETWORK_RULE_TYPE.to_string(),
            name: format!("Rule-{rule_number}"),
            ip_protocols,
            source_addresses,
            source_ip_groups: Vec::new(),
            destination_addresses,
            destination_ip_groups: Vec::new(),
            destination_fqdns: Vec::new(),
            destination_ports,
        }
    }
}

fn policy_name_expression() -> String {
    format!("[parameters('{POLICY_NAME_PARAMETER}')]")
}

fn policy_resource_id_expression() -> String {
    format!("[resourceId('{POLICY_TYPE}', parameters('{POLICY_NAME_PARAMETER}'))]")
}

fn group_name_expression(section: &str) -> String {
    format!(
        "[concat(parameters('{POLICY_NAME_PARAMETER}'), '/{}')]",
        section.replace(' ', "_")
    )
}
