// Exadata endpoints
//
// Rack listing (filter-scoped) and the three cluster/RDMA writes. Writes
// return nothing useful; callers patch their local copy after success.

use tracing::debug;

use crate::client::{BackendClient, ListQuery};
use crate::error::Error;
use crate::models::{ClusterNamesUpdate, RackRecord, RdmaRecord, VmClusterNameUpdate};

/// Path of the rack listing endpoint.
pub const RACKS_PATH: &str = "exadata";

impl BackendClient {
    /// List racks from one rack endpoint.
    ///
    /// `GET {endpoint}?older-than=&environment=&location=`
    pub async fn list_racks_from(
        &self,
        endpoint: &str,
        query: &ListQuery,
    ) -> Result<Vec<RackRecord>, Error> {
        let url = self.endpoint(endpoint)?;
        debug!(endpoint, "listing racks");
        self.get(url, Some(query)).await
    }

    /// List racks from the default endpoint.
    pub async fn list_racks(&self, query: &ListQuery) -> Result<Vec<RackRecord>, Error> {
        self.list_racks_from(RACKS_PATH, query).await
    }

    /// Replace the cluster names associated with a component.
    ///
    /// `POST exadata/{rack_id}/components/{host_id}` with `{"clusterNames": [...]}`
    pub async fn update_cluster_names(
        &self,
        rack_id: &str,
        host_id: &str,
        cluster_names: &[String],
    ) -> Result<(), Error> {
        let url = self.segments(&[RACKS_PATH, rack_id, "components", host_id])?;
        debug!(rack_id, host_id, ?cluster_names, "updating component cluster names");
        self.post(url, &ClusterNamesUpdate { cluster_names }).await
    }

    /// Set the cluster name of one VM.
    ///
    /// `POST exadata/{rack_id}/components/{host_id}/vms/{vm_name}` with `{"clusterName": "..."}`
    pub async fn update_vm_cluster_name(
        &self,
        rack_id: &str,
        host_id: &str,
        vm_name: &str,
        cluster_name: &str,
    ) -> Result<(), Error> {
        let url = self.segments(&[RACKS_PATH, rack_id, "components", host_id, "vms", vm_name])?;
        debug!(rack_id, host_id, vm_name, cluster_name, "updating VM cluster name");
        self.post(url, &VmClusterNameUpdate { cluster_name }).await
    }

    /// Create or replace the RDMA descriptor of a rack.
    ///
    /// `POST exadata/{rack_id}/rdma` with `{"swVersion", "switchName", "model"}`
    pub async fn update_rdma(&self, rack_id: &str, rdma: &RdmaRecord) -> Result<(), Error> {
        let url = self.segments(&[RACKS_PATH, rack_id, "rdma"])?;
        debug!(rack_id, switch = %rdma.switch_name, "updating RDMA descriptor");
        self.post(url, rdma).await
    }
}
