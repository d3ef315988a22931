//! License command handlers.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use exaview_core::{Agreement, AgreementHost, ClusterUsage, Dashboard, DatabaseUsage, HostUsage};

use crate::cli::{GlobalOpts, LicensesArgs, LicensesCommand, UsageView};
use crate::error::CliError;
use crate::output::{self, count, or_dash};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct AgreementRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Agreement")]
    agreement: String,
    #[tabled(rename = "CSI")]
    csi: String,
    #[tabled(rename = "Reference")]
    reference: String,
    #[tabled(rename = "License type")]
    license_type: String,
    #[tabled(rename = "Hosts")]
    hosts: usize,
}

impl From<&Arc<Agreement>> for AgreementRow {
    fn from(a: &Arc<Agreement>) -> Self {
        Self {
            id: a.id.clone(),
            agreement: or_dash(a.agreement_id.as_deref()),
            csi: or_dash(a.csi.as_deref()),
            reference: or_dash(a.reference_number.as_deref()),
            license_type: or_dash(a.license_type_id.as_deref()),
            hosts: a.hosts.len(),
        }
    }
}

#[derive(Tabled)]
struct ValueRow {
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct AgreementHostRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Covered")]
    covered: String,
    #[tabled(rename = "Total covered")]
    total: String,
}

impl From<&AgreementHost> for AgreementHostRow {
    fn from(h: &AgreementHost) -> Self {
        Self {
            hostname: h.hostname.clone(),
            covered: h.covered_licenses_count.map_or_else(|| "-".into(), count),
            total: h
                .total_covered_licenses_count
                .map_or_else(|| "-".into(), count),
        }
    }
}

#[derive(Tabled)]
struct DatabaseUsageRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Database")]
    database: String,
    #[tabled(rename = "Part number")]
    part: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Ignored")]
    ignored: String,
}

impl From<&Arc<DatabaseUsage>> for DatabaseUsageRow {
    fn from(u: &Arc<DatabaseUsage>) -> Self {
        Self {
            hostname: or_dash(u.hostname.as_deref()),
            database: or_dash(u.db_name.as_deref()),
            part: u.full_part_number.clone(),
            used: count(u.used_licenses),
            cluster: u.cluster_licenses.map_or_else(|| "-".into(), count),
            ignored: if u.ignored { "yes".into() } else { String::new() },
        }
    }
}

#[derive(Tabled)]
struct HostUsageRow {
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "Databases")]
    databases: String,
    #[tabled(rename = "Part number")]
    part: String,
    #[tabled(rename = "Used")]
    used: String,
}

impl From<&Arc<HostUsage>> for HostUsageRow {
    fn from(u: &Arc<HostUsage>) -> Self {
        Self {
            hostname: u.hostname.clone(),
            databases: util::join_or_dash(&u.database_names),
            part: u.full_part_number.clone(),
            used: count(u.used_licenses),
        }
    }
}

#[derive(Tabled)]
struct ClusterUsageRow {
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Hosts")]
    host_count: usize,
    #[tabled(rename = "Hostnames")]
    hostnames: String,
    #[tabled(rename = "Part number")]
    part: String,
    #[tabled(rename = "Used")]
    used: String,
}

impl From<&Arc<ClusterUsage>> for ClusterUsageRow {
    fn from(u: &Arc<ClusterUsage>) -> Self {
        Self {
            cluster: u.cluster.clone(),
            host_count: u.host_count,
            hostnames: util::join_or_dash(&u.hostnames),
            part: u.full_part_number.clone(),
            used: count(u.used_licenses),
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn render_values<T>(global: &GlobalOpts, values: &[T]) -> Result<String, CliError>
where
    T: Serialize + ToString,
{
    output::render_list(
        &global.output,
        values,
        |v| ValueRow {
            value: v.to_string(),
        },
        |v| v.to_string(),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: LicensesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command {
        LicensesCommand::Agreements {
            numbers,
            csi,
            references,
        } => {
            dashboard.fetch_agreements(true).await?;
            if numbers {
                render_values(global, &dashboard.agreement_numbers())?
            } else if csi {
                render_values(global, &dashboard.csi_numbers())?
            } else if references {
                render_values(global, &dashboard.reference_numbers())?
            } else {
                let agreements = dashboard.agreements();
                output::render_list(
                    &global.output,
                    agreements.as_slice(),
                    |a| AgreementRow::from(a),
                    |a| a.id.clone(),
                )?
            }
        }

        LicensesCommand::Hosts { agreement_id } => {
            dashboard.fetch_agreements(false).await?;
            let hosts = dashboard
                .hosts_associated(&agreement_id)
                .map_err(|_| CliError::NotFound {
                    resource_type: "agreement".into(),
                    identifier: agreement_id.clone(),
                    list_command: "licenses agreements".into(),
                })?;
            output::render_list(
                &global.output,
                &hosts,
                |h| AgreementHostRow::from(h),
                |h| h.hostname.clone(),
            )?
        }

        LicensesCommand::Used { by, search } => {
            let term = search.as_deref().unwrap_or("");
            match by {
                UsageView::Database => {
                    dashboard.fetch_database_usage().await?;
                    output::render_list(
                        &global.output,
                        &dashboard.database_usage(term),
                        |u| DatabaseUsageRow::from(u),
                        |u| u.db_name.clone().unwrap_or_default(),
                    )?
                }
                UsageView::Host => {
                    dashboard.fetch_host_usage().await?;
                    output::render_list(
                        &global.output,
                        &dashboard.host_usage(term),
                        |u| HostUsageRow::from(u),
                        |u| u.hostname.clone(),
                    )?
                }
                UsageView::Cluster => {
                    dashboard.fetch_cluster_usage().await?;
                    output::render_list(
                        &global.output,
                        &dashboard.cluster_usage(term),
                        |u| ClusterUsageRow::from(u),
                        |u| u.cluster.clone(),
                    )?
                }
            }
        }
    };

    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_row_formats_optional_cells() {
        let usage = Arc::new(DatabaseUsage {
            hostname: Some("db01".into()),
            db_name: None,
            license_type_id: "A90611".into(),
            description: None,
            metric: None,
            full_part_number: "A90611".into(),
            used_licenses: 2.0,
            cluster_licenses: None,
            ignored: true,
        });
        let row = DatabaseUsageRow::from(&usage);
        assert_eq!(row.database, "-");
        assert_eq!(row.used, "2");
        assert_eq!(row.cluster, "-");
        assert_eq!(row.ignored, "yes");
    }

    #[test]
    fn cluster_row_joins_hostnames() {
        let usage = Arc::new(ClusterUsage {
            cluster: "c-erp".into(),
            hostnames: vec!["kvm01".into(), "kvm02".into()],
            host_count: 2,
            license_type_id: "A90611".into(),
            description: None,
            metric: None,
            full_part_number: "A90611".into(),
            used_licenses: 4.5,
        });
        let row = ClusterUsageRow::from(&usage);
        assert_eq!(row.hostnames, "kvm01, kvm02");
        assert_eq!(row.used, "4.5");
    }
}
