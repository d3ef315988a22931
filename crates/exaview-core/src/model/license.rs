// ── License domain types ──

use serde::{Deserialize, Serialize};

/// A license type (Oracle part) from the settings catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseType {
    pub id: String,
    pub description: String,
    pub metric: String,
}

/// A host covered by an agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementHost {
    pub hostname: String,
    pub covered_licenses_count: Option<f64>,
    pub total_covered_licenses_count: Option<f64>,
}

/// An Oracle database license agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agreement {
    pub id: String,
    pub agreement_id: Option<String>,
    pub csi: Option<String>,
    pub reference_number: Option<String>,
    pub license_type_id: Option<String>,
    pub hosts: Vec<AgreementHost>,
}

/// License consumption of one database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseUsage {
    pub hostname: Option<String>,
    pub db_name: Option<String>,
    pub license_type_id: String,
    pub description: Option<String>,
    pub metric: Option<String>,
    pub full_part_number: String,
    pub used_licenses: f64,
    pub cluster_licenses: Option<f64>,
    pub ignored: bool,
}

/// License consumption of one host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostUsage {
    pub hostname: String,
    pub database_names: Vec<String>,
    pub license_type_id: String,
    pub description: Option<String>,
    pub metric: Option<String>,
    pub full_part_number: String,
    pub used_licenses: f64,
}

/// License consumption of one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterUsage {
    pub cluster: String,
    pub hostnames: Vec<String>,
    /// Always `hostnames.len()`.
    pub host_count: usize,
    pub license_type_id: String,
    pub description: Option<String>,
    pub metric: Option<String>,
    pub full_part_number: String,
    pub used_licenses: f64,
}

/// `"{license_type_id} - {description} - {metric}"`, skipping parts that
/// are unknown.
pub fn full_part_number(
    license_type_id: &str,
    description: Option<&str>,
    metric: Option<&str>,
) -> String {
    [Some(license_type_id), description, metric]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_part_number_joins_all_parts() {
        assert_eq!(
            full_part_number("A90611", Some("Enterprise Edition"), Some("Processor Perpetual")),
            "A90611 - Enterprise Edition - Processor Perpetual"
        );
    }

    #[test]
    fn full_part_number_skips_unknown_parts() {
        assert_eq!(full_part_number("A90611", None, Some("")), "A90611");
    }
}
