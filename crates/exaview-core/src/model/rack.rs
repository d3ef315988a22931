// ── Rack domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Component kind, normalized from the backend's `hostType` tag.
///
/// Unrecognized tags become [`HostType::Unknown`]; such components belong
/// to no category and are never searched.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[non_exhaustive]
pub enum HostType {
    #[strum(serialize = "KVM_HOST")]
    #[serde(rename = "KVM_HOST")]
    KvmHost,
    #[strum(serialize = "DOM0")]
    #[serde(rename = "DOM0")]
    Dom0,
    #[strum(serialize = "BARE_METAL")]
    #[serde(rename = "BARE_METAL")]
    BareMetal,
    #[strum(serialize = "STORAGE_CELL")]
    #[serde(rename = "STORAGE_CELL")]
    StorageCell,
    #[strum(serialize = "IB_SWITCH")]
    #[serde(rename = "IB_SWITCH")]
    IbSwitch,
    #[strum(serialize = "UNKNOWN")]
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

/// Aggregate capacity counters of a rack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub total_cpu: Option<i64>,
    pub used_cpu: Option<i64>,
    pub free_cpu: Option<i64>,
    pub total_memory: Option<f64>,
    pub used_memory: Option<f64>,
    pub free_memory: Option<f64>,
    pub total_size: Option<f64>,
    pub used_size: Option<f64>,
    pub free_space: Option<f64>,
}

/// RDMA switch descriptor. Always replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rdma {
    pub sw_version: String,
    pub switch_name: String,
    pub model: String,
}

/// A virtual machine on a KVM or DOM0 host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualMachine {
    pub name: String,
    /// KVM only.
    pub ram_current: Option<i64>,
    /// KVM only.
    pub cpu_current: Option<i64>,
    /// DOM0 only.
    pub ram_online: Option<i64>,
    /// DOM0 only.
    pub cpu_online: Option<i64>,
    pub cluster_name: Option<String>,
}

/// A cell disk of a storage cell.
///
/// `size` and `free_space` are kept as text: the backend sends them either
/// as numbers or pre-formatted (`"1.2T"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellDisk {
    pub disk_type: Option<String>,
    pub cell_disk: Option<String>,
    pub cell: Option<String>,
    pub status: Option<String>,
    pub size: Option<String>,
    pub free_space: Option<String>,
    pub error_count: Option<i64>,
}

/// A host-like element of a rack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub host_type: HostType,
    pub host_id: String,
    pub hostname: String,
    pub model: Option<String>,
    pub image_version: Option<String>,
    pub kernel: Option<String>,
    /// Switch software version (IB switches).
    pub sw_version: Option<String>,
    pub total_cpu: Option<i64>,
    pub used_cpu: Option<i64>,
    pub free_cpu: Option<i64>,
    pub cpu_enabled: Option<i64>,
    pub memory: Option<i64>,
    pub used_ram: Option<i64>,
    pub free_ram: Option<i64>,
    pub cluster_names: Vec<String>,
    /// KVM and DOM0 hosts only.
    pub vms: Vec<VirtualMachine>,
    /// Storage cells only.
    pub cell_disks: Vec<CellDisk>,
}

impl Component {
    /// Find a VM by name.
    pub fn vm(&self, name: &str) -> Option<&VirtualMachine> {
        self.vms.iter().find(|vm| vm.name == name)
    }
}

/// One Exadata rack as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rack {
    pub rack_id: String,
    /// Display name.
    pub hostname: String,
    pub update_at: Option<DateTime<Utc>>,
    pub progress: Progress,
    pub rdma: Option<Rdma>,
    pub components: Vec<Component>,
}

impl Rack {
    /// Components of one kind, in source order.
    pub fn components_of(&self, host_type: HostType) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(move |c| c.host_type == host_type)
    }

    /// Find a component by host ID.
    pub fn component(&self, host_id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.host_id == host_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_type_round_trips_backend_tags() {
        for tag in ["KVM_HOST", "DOM0", "BARE_METAL", "STORAGE_CELL", "IB_SWITCH"] {
            let parsed: HostType = tag.parse().unwrap_or(HostType::Unknown);
            assert_eq!(parsed.to_string(), tag);
        }
    }

    #[test]
    fn unrecognized_tag_fails_to_parse() {
        assert!("VIRTUAL_SWITCH".parse::<HostType>().is_err());
    }
}
