//! DNS alias records pointing custom domains at a distribution.

use std::collections::BTreeSet;

use edge_core::{DistributionIdentity, Expr};
use serde::Serialize;
use tracing::warn;

/// DNS record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordType {
    /// IPv4 alias record.
    A,
}

/// Alias target of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasTarget {
    /// Domain name of the target.
    pub name: Expr,
    /// Hosted zone of the target.
    pub zone_id: Expr,
    /// Whether the record follows the target's health.
    pub evaluate_target_health: bool,
}

/// A DNS alias record for one custom domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecord {
    /// Hosted zone the record lives in.
    pub zone_id: String,
    /// Record name (the custom domain).
    pub name: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Distribution the record aliases.
    pub alias: AliasTarget,
}

impl DnsRecord {
    /// Alias record pointing a domain at a distribution.
    pub fn alias(zone_id: &str, name: &str, distribution: &DistributionIdentity) -> Self {
        Self {
            zone_id: zone_id.to_string(),
            name: name.to_string(),
            record_type: RecordType::A,
            alias: AliasTarget {
                name: distribution.domain_name.clone(),
                zone_id: distribution.hosted_zone_id.clone(),
                evaluate_target_health: false,
            },
        }
    }
}

/// Why DNS records were not generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MissingRoutingPrerequisite {
    /// Aliases were given without a hosted zone.
    NoHostedZone { aliases: usize },
    /// A hosted zone was given without aliases.
    NoAliases { zone_id: String },
}

/// Alias records for a set of domains.
///
/// Records are produced only when both a non-empty hosted zone and at least
/// one alias are given; otherwise the result is empty together with the
/// missing prerequisite (none when neither was given). Duplicate aliases
/// collapse into one record.
pub fn alias_records(
    hosted_zone_id: Option<&str>,
    aliases: &[String],
    distribution: &DistributionIdentity,
) -> (Vec<DnsRecord>, Option<MissingRoutingPrerequisite>) {
    let zone = hosted_zone_id.map(str::trim).filter(|z| !z.is_empty());
    let domains: BTreeSet<&str> = aliases.iter().map(String::as_str).collect();

    match (zone, domains.is_empty()) {
        (Some(zone), false) => {
            let records = domains
                .into_iter()
                .map(|domain| DnsRecord::alias(zone, domain, distribution))
                .collect();
            (records, None)
        }
        (None, false) => {
            warn!(aliases = domains.len(), "aliases given without a hosted zone, skipping DNS records");
            (
                Vec::new(),
                Some(MissingRoutingPrerequisite::NoHostedZone {
                    aliases: domains.len(),
                }),
            )
        }
        (Some(zone), true) => {
            warn!(zone_id = zone, "hosted zone given without aliases, skipping DNS records");
            (
                Vec::new(),
                Some(MissingRoutingPrerequisite::NoAliases {
                    zone_id: zone.to_string(),
                }),
            )
        }
        (None, true) => (Vec::new(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_core::{ResourceAddress, ResourceKind};

    fn identity() -> DistributionIdentity {
        DistributionIdentity::for_address(&ResourceAddress::new(ResourceKind::Distribution, "site"))
    }

    fn aliases(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_one_record_per_alias() {
        let (records, missing) = alias_records(
            Some("Z123"),
            &aliases(&["www.example.com", "example.com"]),
            &identity(),
        );
        assert!(missing.is_none());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "example.com");
        assert_eq!(records[1].name, "www.example.com");

        let record = &records[0];
        assert_eq!(record.zone_id, "Z123");
        assert_eq!(record.record_type, RecordType::A);
        assert_eq!(record.alias.name, identity().domain_name);
        assert_eq!(record.alias.zone_id, identity().hosted_zone_id);
        assert!(!record.alias.evaluate_target_health);
    }

    #[test]
    fn test_no_zone_means_no_records() {
        let (records, missing) =
            alias_records(None, &aliases(&["example.com", "www.example.com"]), &identity());
        assert!(records.is_empty());
        assert_eq!(missing, Some(MissingRoutingPrerequisite::NoHostedZone { aliases: 2 }));

        let (records, _) = alias_records(Some(""), &aliases(&["example.com"]), &identity());
        assert!(records.is_empty());
    }

    #[test]
    fn test_no_aliases_means_no_records() {
        let (records, missing) = alias_records(Some("Z123"), &[], &identity());
        assert!(records.is_empty());
        assert!(matches!(missing, Some(MissingRoutingPrerequisite::NoAliases { .. })));
    }

    #[test]
    fn test_neither_is_silent() {
        let (records, missing) = alias_records(None, &[], &identity());
        assert!(records.is_empty());
        assert!(missing.is_none());
    }

    #[test]
    fn test_duplicate_aliases_collapse() {
        let (records, _) = alias_records(
            Some("Z123"),
            &aliases(&["example.com", "example.com"]),
            &identity(),
        );
        assert_eq!(records.len(), 1);
    }
}
