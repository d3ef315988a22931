// ── Keyed mutation helpers ──
//
// Locate a rack (and optionally a component and VM) by identifier path and
// replace only the targeted field. A path that does not resolve is a
// `KeyNotFound` error and publishes nothing.

use super::DataStore;
use crate::error::CoreError;
use crate::model::Rdma;

impl DataStore {
    /// Replace the cluster names of component `host_id` in rack `rack_id`.
    pub fn set_cluster_names(
        &self,
        rack_id: &str,
        host_id: &str,
        cluster_names: Vec<String>,
    ) -> Result<(), CoreError> {
        self.racks.patch(rack_id, |rack| {
            let component = rack
                .components
                .iter_mut()
                .find(|c| c.host_id == host_id)
                .ok_or_else(|| CoreError::key_not_found(&[rack_id, host_id]))?;
            component.cluster_names = cluster_names;
            Ok(())
        })
    }

    /// Set the cluster name of VM `vm_name` on component `host_id`.
    pub fn set_vm_cluster_name(
        &self,
        rack_id: &str,
        host_id: &str,
        vm_name: &str,
        cluster_name: &str,
    ) -> Result<(), CoreError> {
        self.racks.patch(rack_id, |rack| {
            let vm = rack
                .components
                .iter_mut()
                .find(|c| c.host_id == host_id)
                .and_then(|c| c.vms.iter_mut().find(|vm| vm.name == vm_name))
                .ok_or_else(|| CoreError::key_not_found(&[rack_id, host_id, vm_name]))?;
            vm.cluster_name = Some(cluster_name.to_owned());
            Ok(())
        })
    }

    /// Replace a rack's RDMA descriptor as a whole.
    pub fn set_rdma(&self, rack_id: &str, rdma: Rdma) -> Result<(), CoreError> {
        self.racks.patch(rack_id, |rack| {
            rack.rdma = Some(rdma);
            Ok(())
        })
    }
}
