// License endpoints
//
// Agreements, the three license-usage aggregates, and the license-type
// catalog used to annotate usage records.

use serde_json::Value;
use tracing::debug;

use crate::client::{BackendClient, ListQuery};
use crate::error::Error;
use crate::models::{
    AgreementRecord, ClusterUsageRecord, DatabaseUsageRecord, HostUsageRecord, LicenseTypeRecord,
    UsedLicensesEnvelope, UsedLicensesPerClusterEnvelope,
};

const USAGE_PREFIX: &str = "hosts/technologies/all/databases";

impl BackendClient {
    /// List Oracle database agreements.
    ///
    /// `GET agreements/oracle/database`
    pub async fn list_agreements(&self) -> Result<Vec<AgreementRecord>, Error> {
        let url = self.endpoint("agreements/oracle/database")?;
        debug!("listing agreements");
        self.get(url, None).await
    }

    /// License usage per database.
    ///
    /// `GET hosts/technologies/all/databases/licenses-used`. The backend
    /// may emit `null` or `""` entries in the array; they come back as
    /// `None` so positions are preserved.
    pub async fn list_database_usage(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<Option<DatabaseUsageRecord>>, Error> {
        let url = self.endpoint(&format!("{USAGE_PREFIX}/licenses-used"))?;
        debug!("listing license usage per database");
        let envelope: UsedLicensesEnvelope<Value> = self.get(url, Some(query)).await?;

        envelope
            .used_licenses
            .into_iter()
            .map(|entry| match entry {
                Value::Null => Ok(None),
                Value::String(ref s) if s.is_empty() => Ok(None),
                other => serde_json::from_value(other.clone()).map(Some).map_err(|e| {
                    Error::Deserialization {
                        message: format!("invalid database usage entry: {e}"),
                        body: other.to_string(),
                    }
                }),
            })
            .collect()
    }

    /// License usage per host.
    ///
    /// `GET hosts/technologies/all/databases/licenses-used-per-host`
    pub async fn list_host_usage(&self, query: &ListQuery) -> Result<Vec<HostUsageRecord>, Error> {
        let url = self.endpoint(&format!("{USAGE_PREFIX}/licenses-used-per-host"))?;
        debug!("listing license usage per host");
        let envelope: UsedLicensesEnvelope<HostUsageRecord> = self.get(url, Some(query)).await?;
        Ok(envelope.used_licenses)
    }

    /// License usage per cluster.
    ///
    /// `GET hosts/technologies/all/databases/licenses-used-per-cluster`
    pub async fn list_cluster_usage(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<ClusterUsageRecord>, Error> {
        let url = self.endpoint(&format!("{USAGE_PREFIX}/licenses-used-per-cluster"))?;
        debug!("listing license usage per cluster");
        let envelope: UsedLicensesPerClusterEnvelope = self.get(url, Some(query)).await?;
        Ok(envelope.used_licenses_per_cluster)
    }

    /// The license-type catalog.
    ///
    /// `GET settings/oracle/database/license-types`
    pub async fn list_license_types(&self) -> Result<Vec<LicenseTypeRecord>, Error> {
        let url = self.endpoint("settings/oracle/database/license-types")?;
        debug!("listing license types");
        self.get(url, None).await
    }
}
