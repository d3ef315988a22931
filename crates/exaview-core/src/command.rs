// ── Command API ──
//
// All write operations flow through a unified `Command` enum. Each command
// is one backend request followed, on success, by a keyed patch of the
// local store.

use std::sync::Arc;

use crate::model::{Rack, Rdma};

/// All write operations against the inventory backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the cluster names associated with a component.
    UpdateClusterNames {
        rack_id: String,
        host_id: String,
        cluster_names: Vec<String>,
    },
    /// Set the cluster name of one VM.
    UpdateVmClusterName {
        rack_id: String,
        host_id: String,
        vm_name: String,
        cluster_name: String,
    },
    /// Create or replace a rack's RDMA descriptor.
    UpdateRdma { rack_id: String, rdma: Rdma },
}

impl Command {
    /// The rack this command writes to.
    pub fn rack_id(&self) -> &str {
        match self {
            Self::UpdateClusterNames { rack_id, .. }
            | Self::UpdateVmClusterName { rack_id, .. }
            | Self::UpdateRdma { rack_id, .. } => rack_id,
        }
    }
}

/// Result of a successfully executed command.
#[derive(Debug, Clone)]
pub enum CommandResult {
    /// The rack as stored after the patch.
    Rack(Arc<Rack>),
}
