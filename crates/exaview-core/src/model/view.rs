// ── Derived rack views ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::rack::{Component, Progress, Rdma};

/// Machine type inferred from a rack's components.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
pub enum MachineType {
    #[strum(serialize = "OVM")]
    #[serde(rename = "OVM")]
    Ovm,
    #[strum(serialize = "KVM")]
    #[serde(rename = "KVM")]
    Kvm,
    #[strum(serialize = "BARE METAL")]
    #[serde(rename = "BARE METAL")]
    BareMetal,
}

/// Flat display shape of a rack: counters copied through, components
/// partitioned by host type (source order preserved).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RackView {
    pub rack_id: String,
    pub hostname: String,
    pub update_at: Option<DateTime<Utc>>,
    pub machine_type: MachineType,
    pub progress: Progress,
    pub rdma: Option<Rdma>,
    pub kvm_hosts: Vec<Component>,
    pub dom0_hosts: Vec<Component>,
    pub bare_metal_hosts: Vec<Component>,
    pub storage_cells: Vec<Component>,
    pub ib_switches: Vec<Component>,
}

impl RackView {
    /// Total number of categorized components.
    pub fn component_count(&self) -> usize {
        self.kvm_hosts.len()
            + self.dom0_hosts.len()
            + self.bare_metal_hosts.len()
            + self.storage_cells.len()
            + self.ib_switches.len()
    }
}
