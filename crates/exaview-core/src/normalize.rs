// ── Record normalizer ──
//
// Turns stored racks into flat `RackView`s: components partitioned by host
// type and the rack classified by machine type.

use crate::model::{Component, HostType, MachineType, Rack, RackView};

/// Infer a rack's machine type.
///
/// Strict priority: any DOM0 component makes it `OVM`, otherwise any KVM
/// host makes it `KVM`, otherwise it is `BARE METAL`.
pub fn classify(rack: &Rack) -> MachineType {
    let has = |kind: HostType| rack.components.iter().any(|c| c.host_type == kind);

    if has(HostType::Dom0) {
        MachineType::Ovm
    } else if has(HostType::KvmHost) {
        MachineType::Kvm
    } else {
        MachineType::BareMetal
    }
}

/// Build the display view of one rack.
pub fn normalize(rack: &Rack) -> RackView {
    let of = |kind: HostType| -> Vec<Component> { rack.components_of(kind).cloned().collect() };

    RackView {
        rack_id: rack.rack_id.clone(),
        hostname: rack.hostname.clone(),
        update_at: rack.update_at,
        machine_type: classify(rack),
        progress: rack.progress.clone(),
        rdma: rack.rdma.clone(),
        kvm_hosts: of(HostType::KvmHost),
        dom0_hosts: of(HostType::Dom0),
        bare_metal_hosts: of(HostType::BareMetal),
        storage_cells: of(HostType::StorageCell),
        ib_switches: of(HostType::IbSwitch),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{CellDisk, Component, HostType, Progress, Rack, VirtualMachine};

    pub(crate) fn component(host_type: HostType, host_id: &str, hostname: &str) -> Component {
        Component {
            host_type,
            host_id: host_id.into(),
            hostname: hostname.into(),
            model: None,
            image_version: None,
            kernel: None,
            sw_version: None,
            total_cpu: None,
            used_cpu: None,
            free_cpu: None,
            cpu_enabled: None,
            memory: None,
            used_ram: None,
            free_ram: None,
            cluster_names: Vec::new(),
            vms: Vec::new(),
            cell_disks: Vec::new(),
        }
    }

    pub(crate) fn vm(name: &str) -> VirtualMachine {
        VirtualMachine {
            name: name.into(),
            ..VirtualMachine::default()
        }
    }

    pub(crate) fn cell_disk(cell_disk: &str, status: &str) -> CellDisk {
        CellDisk {
            cell_disk: Some(cell_disk.into()),
            status: Some(status.into()),
            ..CellDisk::default()
        }
    }

    pub(crate) fn rack(rack_id: &str, hostname: &str, components: Vec<Component>) -> Rack {
        Rack {
            rack_id: rack_id.into(),
            hostname: hostname.into(),
            update_at: None,
            progress: Progress::default(),
            rdma: None,
            components,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{component, rack};
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dom0_wins_over_kvm() {
        let r = rack(
            "R1",
            "exa01",
            vec![
                component(HostType::KvmHost, "K1", "kvm01"),
                component(HostType::Dom0, "D1", "dom01"),
            ],
        );
        assert_eq!(classify(&r), MachineType::Ovm);
    }

    #[test]
    fn kvm_without_dom0_is_kvm() {
        let r = rack(
            "R1",
            "exa01",
            vec![
                component(HostType::StorageCell, "S1", "cel01"),
                component(HostType::KvmHost, "K1", "kvm01"),
            ],
        );
        assert_eq!(classify(&r), MachineType::Kvm);
    }

    #[test]
    fn anything_else_is_bare_metal() {
        let empty = rack("R1", "exa01", Vec::new());
        assert_eq!(classify(&empty), MachineType::BareMetal);

        let bare = rack(
            "R2",
            "exa02",
            vec![component(HostType::BareMetal, "B1", "bm01")],
        );
        assert_eq!(classify(&bare), MachineType::BareMetal);
    }

    #[test]
    fn partitions_components_in_source_order() {
        let r = rack(
            "R1",
            "exa01",
            vec![
                component(HostType::KvmHost, "K2", "kvm02"),
                component(HostType::IbSwitch, "I1", "ib01"),
                component(HostType::KvmHost, "K1", "kvm01"),
                component(HostType::Unknown, "X1", "mystery"),
            ],
        );

        let view = normalize(&r);
        let kvm: Vec<&str> = view.kvm_hosts.iter().map(|c| c.hostname.as_str()).collect();
        assert_eq!(kvm, vec!["kvm02", "kvm01"]);
        assert_eq!(view.ib_switches.len(), 1);
        assert!(view.dom0_hosts.is_empty());
        assert_eq!(view.component_count(), 3);
        assert_eq!(view.machine_type, MachineType::Kvm);
    }
}
