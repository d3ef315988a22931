// ── API-to-domain type conversions ──
//
// Bridges raw `exaview_api` records into canonical `exaview_core::model`
// types. Each `From` impl normalizes field names, parses strings into
// strong types, and fills defaults for missing optional data. License
// usage records need a license-type lookup and are converted in
// `crate::licenses` instead.

use chrono::{DateTime, NaiveDateTime, Utc};

use exaview_api::ListQuery;
use exaview_api::models::{
    AgreementHostRecord, AgreementRecord, CellDiskRecord, ComponentRecord, LicenseTypeRecord,
    RackRecord, RdmaRecord, VmRecord,
};

use crate::model::{
    ActiveFilters, Agreement, AgreementHost, CellDisk, Component, HostType, LicenseType,
    Progress, Rack, Rdma, VirtualMachine,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse the backend's update timestamp.
///
/// Accepts RFC 3339 and the zone-less `YYYY-MM-DDTHH:MM:SS[.f]` form
/// (interpreted as UTC); anything else is dropped.
fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Build the query parameters for a list fetch.
///
/// The global snapshot date wins over the caller's `older_than`.
pub fn list_query(filters: &ActiveFilters, older_than: Option<DateTime<Utc>>) -> ListQuery {
    ListQuery {
        older_than: filters.date.or(older_than),
        environment: filters.environment.clone(),
        location: filters.location.clone(),
    }
}

// ── Exadata ────────────────────────────────────────────────────────

impl From<RdmaRecord> for Rdma {
    fn from(r: RdmaRecord) -> Self {
        Self {
            sw_version: r.sw_version,
            switch_name: r.switch_name,
            model: r.model,
        }
    }
}

impl From<&Rdma> for RdmaRecord {
    fn from(r: &Rdma) -> Self {
        Self {
            sw_version: r.sw_version.clone(),
            switch_name: r.switch_name.clone(),
            model: r.model.clone(),
        }
    }
}

impl From<VmRecord> for VirtualMachine {
    fn from(vm: VmRecord) -> Self {
        Self {
            name: vm.name,
            ram_current: vm.ram_current,
            cpu_current: vm.cpu_current,
            ram_online: vm.ram_online,
            cpu_online: vm.cpu_online,
            cluster_name: vm.cluster_name,
        }
    }
}

impl From<CellDiskRecord> for CellDisk {
    fn from(cell: CellDiskRecord) -> Self {
        Self {
            disk_type: cell.disk_type,
            cell_disk: cell.cell_disk,
            cell: cell.cell,
            status: cell.status,
            size: cell.size.map(|q| q.to_string()),
            free_space: cell.free_space.map(|q| q.to_string()),
            error_count: cell.error_count,
        }
    }
}

impl From<ComponentRecord> for Component {
    fn from(c: ComponentRecord) -> Self {
        Self {
            host_type: c.host_type.parse().unwrap_or(HostType::Unknown),
            host_id: c.host_id,
            hostname: c.hostname.unwrap_or_default(),
            model: c.model,
            image_version: c.image_version,
            kernel: c.kernel,
            sw_version: c.sw_version,
            total_cpu: c.total_cpu,
            used_cpu: c.used_cpu,
            free_cpu: c.free_cpu,
            cpu_enabled: c.cpu_enabled,
            memory: c.memory,
            used_ram: c.used_ram,
            free_ram: c.free_ram,
            cluster_names: c.cluster_names.unwrap_or_default(),
            vms: c
                .vms
                .unwrap_or_default()
                .into_iter()
                .map(VirtualMachine::from)
                .collect(),
            cell_disks: c
                .storage_cells
                .unwrap_or_default()
                .into_iter()
                .map(CellDisk::from)
                .collect(),
        }
    }
}

impl From<RackRecord> for Rack {
    fn from(r: RackRecord) -> Self {
        Self {
            update_at: parse_datetime(r.update_at.as_deref()),
            rack_id: r.rack_id,
            hostname: r.hostname.unwrap_or_default(),
            progress: Progress {
                total_cpu: r.total_cpu,
                used_cpu: r.used_cpu,
                free_cpu: r.free_cpu,
                total_memory: r.total_memory,
                used_memory: r.used_memory,
                free_memory: r.free_memory,
                total_size: r.total_size,
                used_size: r.used_size,
                free_space: r.free_space,
            },
            rdma: r.rdma.map(Rdma::from),
            components: r.components.into_iter().map(Component::from).collect(),
        }
    }
}

// ── Licenses ───────────────────────────────────────────────────────

impl From<AgreementHostRecord> for AgreementHost {
    fn from(h: AgreementHostRecord) -> Self {
        Self {
            hostname: h.hostname,
            covered_licenses_count: h.covered_licenses_count,
            total_covered_licenses_count: h.total_covered_licenses_count,
        }
    }
}

impl From<AgreementRecord> for Agreement {
    fn from(a: AgreementRecord) -> Self {
        Self {
            id: a.id,
            agreement_id: a.agreement_id,
            csi: a.csi,
            reference_number: a.reference_number,
            license_type_id: a.license_type_id,
            hosts: a.hosts.into_iter().map(AgreementHost::from).collect(),
        }
    }
}

impl From<LicenseTypeRecord> for LicenseType {
    fn from(t: LicenseTypeRecord) -> Self {
        Self {
            id: t.id,
            description: t.description,
            metric: t.metric,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn parses_rfc3339_and_naive_timestamps() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 2, 10, 30, 0).unwrap();
        assert_eq!(parse_datetime(Some("2024-05-02T10:30:00Z")), Some(expected));
        assert_eq!(parse_datetime(Some("2024-05-02T10:30:00")), Some(expected));
        assert_eq!(parse_datetime(Some("yesterday")), None);
        assert_eq!(parse_datetime(None), None);
    }

    #[test]
    fn rack_conversion_keeps_component_order_and_nested_items() {
        let record: RackRecord = serde_json::from_value(json!({
            "rackID": "R1",
            "hostname": "exa01",
            "totalCPU": 96,
            "components": [
                { "hostType": "STORAGE_CELL", "hostID": "S1", "hostname": "cel01",
                  "storageCells": [{ "cellDisk": "CD_00", "size": 1024, "freeSpace": "1.2T" }] },
                { "hostType": "KVM_HOST", "hostID": "K1", "hostname": "kvm01",
                  "vms": [{ "name": "vm01" }] },
                { "hostType": "NEW_THING", "hostID": "X1" }
            ]
        }))
        .unwrap();

        let rack = Rack::from(record);
        assert_eq!(rack.progress.total_cpu, Some(96));
        assert_eq!(rack.components[0].host_type, HostType::StorageCell);
        assert_eq!(rack.components[0].cell_disks[0].size.as_deref(), Some("1024"));
        assert_eq!(rack.components[0].cell_disks[0].free_space.as_deref(), Some("1.2T"));
        assert_eq!(rack.components[1].vms[0].name, "vm01");
        assert_eq!(rack.components[2].host_type, HostType::Unknown);
        assert!(rack.components[2].hostname.is_empty());
    }

    #[test]
    fn global_date_overrides_call_site_older_than() {
        let global = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let local = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let filters = ActiveFilters {
            date: Some(global),
            environment: Some("PROD".into()),
            location: None,
        };

        let query = list_query(&filters, Some(local));
        assert_eq!(query.older_than, Some(global));
        assert_eq!(query.environment.as_deref(), Some("PROD"));

        let query = list_query(&ActiveFilters::default(), Some(local));
        assert_eq!(query.older_than, Some(local));
    }
}
