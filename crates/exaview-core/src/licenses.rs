// ── License views ──
//
// Annotates usage records with the license-type description and metric,
// derives the full part number, and provides the agreement projections and
// the term filter used by every license listing.

use std::sync::Arc;

use tracing::warn;

use exaview_api::models::{ClusterUsageRecord, DatabaseUsageRecord, HostUsageRecord};

use crate::error::CoreError;
use crate::lookup::LicenseTypeLookup;
use crate::model::{
    Agreement, AgreementHost, ClusterUsage, DatabaseUsage, HostUsage, full_part_number,
};
use crate::search::Needle;

// ── Annotation ─────────────────────────────────────────────────────

/// Resolve description and metric, preferring the catalog over whatever
/// the backend already attached.
fn describe(
    lookup: &dyn LicenseTypeLookup,
    license_type_id: &str,
    description: Option<String>,
    metric: Option<String>,
) -> (Option<String>, Option<String>) {
    if let Some(t) = lookup.resolve(license_type_id) {
        return (Some(t.description), Some(t.metric));
    }
    if description.is_none() && metric.is_none() {
        warn!(license_type_id, "license type not found in catalog");
    }
    (description, metric)
}

/// Drop blank entries and annotate the rest.
pub fn annotate_database_usage(
    records: Vec<Option<DatabaseUsageRecord>>,
    lookup: &dyn LicenseTypeLookup,
) -> Vec<DatabaseUsage> {
    records
        .into_iter()
        .flatten()
        .map(|r| {
            let (description, metric) = describe(lookup, &r.license_type_id, None, None);
            DatabaseUsage {
                full_part_number: full_part_number(
                    &r.license_type_id,
                    description.as_deref(),
                    metric.as_deref(),
                ),
                hostname: r.hostname,
                db_name: r.db_name,
                license_type_id: r.license_type_id,
                description,
                metric,
                used_licenses: r.used_licenses,
                cluster_licenses: r.cluster_licenses,
                ignored: r.ignored,
            }
        })
        .collect()
}

pub fn annotate_host_usage(
    records: Vec<HostUsageRecord>,
    lookup: &dyn LicenseTypeLookup,
) -> Vec<HostUsage> {
    records
        .into_iter()
        .map(|r| {
            let (description, metric) =
                describe(lookup, &r.license_type_id, r.description, r.metric);
            HostUsage {
                full_part_number: full_part_number(
                    &r.license_type_id,
                    description.as_deref(),
                    metric.as_deref(),
                ),
                hostname: r.hostname,
                database_names: r.database_names,
                license_type_id: r.license_type_id,
                description,
                metric,
                used_licenses: r.used_licenses,
            }
        })
        .collect()
}

pub fn annotate_cluster_usage(
    records: Vec<ClusterUsageRecord>,
    lookup: &dyn LicenseTypeLookup,
) -> Vec<ClusterUsage> {
    records
        .into_iter()
        .map(|r| {
            let (description, metric) =
                describe(lookup, &r.license_type_id, r.description, r.metric);
            ClusterUsage {
                full_part_number: full_part_number(
                    &r.license_type_id,
                    description.as_deref(),
                    metric.as_deref(),
                ),
                host_count: r.hostnames.len(),
                cluster: r.cluster,
                hostnames: r.hostnames,
                license_type_id: r.license_type_id,
                description,
                metric,
                used_licenses: r.used_licenses,
            }
        })
        .collect()
}

// ── Agreement projections ──────────────────────────────────────────

/// Hosts covered by agreement `id`.
pub fn hosts_associated(
    agreements: &[Arc<Agreement>],
    id: &str,
) -> Result<Vec<AgreementHost>, CoreError> {
    agreements
        .iter()
        .find(|a| a.id == id)
        .map(|a| a.hosts.clone())
        .ok_or_else(|| CoreError::key_not_found(&["agreements", id]))
}

/// Agreement numbers, in agreement order. Agreements without one are skipped.
pub fn agreement_numbers(agreements: &[Arc<Agreement>]) -> Vec<String> {
    agreements
        .iter()
        .filter_map(|a| a.agreement_id.clone())
        .collect()
}

/// CSI numbers, in agreement order.
pub fn csi_numbers(agreements: &[Arc<Agreement>]) -> Vec<String> {
    agreements.iter().filter_map(|a| a.csi.clone()).collect()
}

/// Reference numbers, in agreement order.
pub fn reference_numbers(agreements: &[Arc<Agreement>]) -> Vec<String> {
    agreements
        .iter()
        .filter_map(|a| a.reference_number.clone())
        .collect()
}

// ── Term filter ────────────────────────────────────────────────────

/// A license record that can be matched against a search term.
pub trait Searchable {
    /// The record's text fields, numbers rendered in decimal.
    fn search_fields(&self) -> Vec<Option<String>>;
}

impl Searchable for DatabaseUsage {
    fn search_fields(&self) -> Vec<Option<String>> {
        vec![
            self.hostname.clone(),
            self.db_name.clone(),
            Some(self.license_type_id.clone()),
            self.description.clone(),
            self.metric.clone(),
            Some(self.full_part_number.clone()),
            Some(self.used_licenses.to_string()),
        ]
    }
}

impl Searchable for HostUsage {
    fn search_fields(&self) -> Vec<Option<String>> {
        let mut fields = vec![
            Some(self.hostname.clone()),
            Some(self.license_type_id.clone()),
            self.description.clone(),
            self.metric.clone(),
            Some(self.full_part_number.clone()),
            Some(self.used_licenses.to_string()),
        ];
        fields.extend(self.database_names.iter().cloned().map(Some));
        fields
    }
}

impl Searchable for ClusterUsage {
    fn search_fields(&self) -> Vec<Option<String>> {
        let mut fields = vec![
            Some(self.cluster.clone()),
            Some(self.license_type_id.clone()),
            self.description.clone(),
            self.metric.clone(),
            Some(self.full_part_number.clone()),
            Some(self.used_licenses.to_string()),
            Some(self.host_count.to_string()),
        ];
        fields.extend(self.hostnames.iter().cloned().map(Some));
        fields
    }
}

/// Keep the records with any field containing `term`. An empty term keeps
/// everything.
pub fn filter_records<T: Searchable>(records: &[Arc<T>], term: &str) -> Vec<Arc<T>> {
    if term.is_empty() {
        return records.to_vec();
    }
    let needle = Needle::new(term);
    records
        .iter()
        .filter(|r| {
            r.search_fields()
                .iter()
                .any(|f| needle.matches(f.as_deref()))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LicenseTypeCatalog;
    use crate::model::LicenseType;
    use pretty_assertions::assert_eq;

    fn catalog() -> LicenseTypeCatalog {
        [LicenseType {
            id: "A90611".into(),
            description: "Oracle Database Enterprise Edition".into(),
            metric: "Processor Perpetual".into(),
        }]
        .into_iter()
        .collect()
    }

    fn db_record(db: &str, license_type_id: &str) -> DatabaseUsageRecord {
        DatabaseUsageRecord {
            hostname: Some("db01".into()),
            db_name: Some(db.into()),
            license_type_id: license_type_id.into(),
            used_licenses: 2.0,
            cluster_licenses: None,
            ignored: false,
        }
    }

    #[test]
    fn database_usage_drops_blanks_and_annotates() {
        let usage = annotate_database_usage(
            vec![Some(db_record("ORCL", "A90611")), None, Some(db_record("ERP", "L0000"))],
            &catalog(),
        );

        assert_eq!(usage.len(), 2);
        assert_eq!(
            usage[0].full_part_number,
            "A90611 - Oracle Database Enterprise Edition - Processor Perpetual"
        );
        assert_eq!(usage[1].description, None);
        assert_eq!(usage[1].full_part_number, "L0000");
    }

    #[test]
    fn cluster_usage_counts_hosts() {
        let usage = annotate_cluster_usage(
            vec![ClusterUsageRecord {
                cluster: "c1".into(),
                hostnames: vec!["h1".into(), "h2".into(), "h3".into()],
                license_type_id: "A90611".into(),
                description: None,
                metric: None,
                used_licenses: 6.0,
            }],
            &catalog(),
        );
        assert_eq!(usage[0].host_count, 3);
        assert_eq!(usage[0].host_count, usage[0].hostnames.len());
    }

    #[test]
    fn host_usage_keeps_backend_description_when_catalog_misses() {
        let usage = annotate_host_usage(
            vec![HostUsageRecord {
                hostname: "h1".into(),
                database_names: vec!["ORCL".into()],
                license_type_id: "Z1".into(),
                description: Some("Custom".into()),
                metric: Some("Named User".into()),
                used_licenses: 1.0,
            }],
            &catalog(),
        );
        assert_eq!(usage[0].full_part_number, "Z1 - Custom - Named User");
    }

    fn agreements() -> Vec<Arc<Agreement>> {
        vec![
            Arc::new(Agreement {
                id: "a1".into(),
                agreement_id: Some("AG-1".into()),
                csi: Some("CSI-1".into()),
                reference_number: None,
                license_type_id: None,
                hosts: vec![AgreementHost {
                    hostname: "db01".into(),
                    covered_licenses_count: Some(2.0),
                    total_covered_licenses_count: None,
                }],
            }),
            Arc::new(Agreement {
                id: "a2".into(),
                agreement_id: Some("AG-2".into()),
                csi: None,
                reference_number: Some("REF-2".into()),
                license_type_id: None,
                hosts: Vec::new(),
            }),
        ]
    }

    #[test]
    fn agreement_projections_follow_order() {
        let list = agreements();
        assert_eq!(agreement_numbers(&list), vec!["AG-1", "AG-2"]);
        assert_eq!(csi_numbers(&list), vec!["CSI-1"]);
        assert_eq!(reference_numbers(&list), vec!["REF-2"]);
    }

    #[test]
    fn hosts_associated_requires_known_agreement() {
        let list = agreements();
        assert_eq!(hosts_associated(&list, "a1").map(|h| h.len()).ok(), Some(1));
        assert!(matches!(
            hosts_associated(&list, "nope"),
            Err(CoreError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn filter_matches_any_text_field() {
        let usage: Vec<Arc<DatabaseUsage>> = annotate_database_usage(
            vec![Some(db_record("ORCL", "A90611")), Some(db_record("ERP", "L0000"))],
            &catalog(),
        )
        .into_iter()
        .map(Arc::new)
        .collect();

        assert_eq!(filter_records(&usage, "").len(), 2);
        assert_eq!(filter_records(&usage, "enterprise").len(), 1);
        assert_eq!(filter_records(&usage, "l0000")[0].db_name.as_deref(), Some("ERP"));
        assert!(filter_records(&usage, "nothing-here").is_empty());
    }
}
