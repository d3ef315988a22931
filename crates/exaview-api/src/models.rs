// Backend response and request types
//
// Wire models for the inventory backend's JSON API. Field names on the wire
// are camelCase with upper-cased acronyms (`rackID`, `totalCPU`), so most
// fields carry an explicit rename. Fields use `#[serde(default)]` liberally
// because the backend omits empty values rather than sending `null`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Shared scalar ────────────────────────────────────────────────────

/// A size-like value the backend sends either as a number or as a
/// pre-formatted string (e.g. `1.2T`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

// ── Exadata ──────────────────────────────────────────────────────────

/// One rack from `GET exadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RackRecord {
    #[serde(rename = "rackID")]
    pub rack_id: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "updateAt")]
    pub update_at: Option<String>,
    #[serde(default, rename = "totalCPU")]
    pub total_cpu: Option<i64>,
    #[serde(default, rename = "usedCPU")]
    pub used_cpu: Option<i64>,
    #[serde(default, rename = "freeCPU")]
    pub free_cpu: Option<i64>,
    #[serde(default, rename = "totalMemory")]
    pub total_memory: Option<f64>,
    #[serde(default, rename = "usedMemory")]
    pub used_memory: Option<f64>,
    #[serde(default, rename = "freeMemory")]
    pub free_memory: Option<f64>,
    #[serde(default, rename = "totalSize")]
    pub total_size: Option<f64>,
    #[serde(default, rename = "usedSize")]
    pub used_size: Option<f64>,
    #[serde(default, rename = "freeSpace")]
    pub free_space: Option<f64>,
    #[serde(default)]
    pub rdma: Option<RdmaRecord>,
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
}

/// RDMA descriptor attached to a rack. Also the body of `POST exadata/{rack}/rdma`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdmaRecord {
    #[serde(default, rename = "swVersion")]
    pub sw_version: String,
    #[serde(default, rename = "switchName")]
    pub switch_name: String,
    #[serde(default)]
    pub model: String,
}

/// A host-like element of a rack, tagged by `hostType`.
///
/// The backend sends one flat shape for every host type; fields that do
/// not apply to a type are simply absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    #[serde(rename = "hostType")]
    pub host_type: String,
    #[serde(rename = "hostID")]
    pub host_id: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, rename = "imageVersion")]
    pub image_version: Option<String>,
    #[serde(default)]
    pub kernel: Option<String>,
    #[serde(default, rename = "swVersion")]
    pub sw_version: Option<String>,
    #[serde(default, rename = "totalCPU")]
    pub total_cpu: Option<i64>,
    #[serde(default, rename = "usedCPU")]
    pub used_cpu: Option<i64>,
    #[serde(default, rename = "freeCPU")]
    pub free_cpu: Option<i64>,
    #[serde(default, rename = "cpuEnabled")]
    pub cpu_enabled: Option<i64>,
    #[serde(default)]
    pub memory: Option<i64>,
    #[serde(default, rename = "usedRAM")]
    pub used_ram: Option<i64>,
    #[serde(default, rename = "freeRAM")]
    pub free_ram: Option<i64>,
    #[serde(default, rename = "clusterNames")]
    pub cluster_names: Option<Vec<String>>,
    #[serde(default)]
    pub vms: Option<Vec<VmRecord>>,
    #[serde(default, rename = "storageCells")]
    pub storage_cells: Option<Vec<CellDiskRecord>>,
}

/// A virtual machine hosted on a KVM or DOM0 component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmRecord {
    pub name: String,
    #[serde(default, rename = "ramCurrent")]
    pub ram_current: Option<i64>,
    #[serde(default, rename = "cpuCurrent")]
    pub cpu_current: Option<i64>,
    #[serde(default, rename = "ramOnline")]
    pub ram_online: Option<i64>,
    #[serde(default, rename = "cpuOnline")]
    pub cpu_online: Option<i64>,
    #[serde(default, rename = "clusterName")]
    pub cluster_name: Option<String>,
}

/// A cell disk of a storage-cell component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellDiskRecord {
    #[serde(default, rename = "type")]
    pub disk_type: Option<String>,
    #[serde(default, rename = "cellDisk")]
    pub cell_disk: Option<String>,
    #[serde(default)]
    pub cell: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub size: Option<Quantity>,
    #[serde(default, rename = "freeSpace")]
    pub free_space: Option<Quantity>,
    #[serde(default, rename = "errorCount")]
    pub error_count: Option<i64>,
}

/// Body of `POST exadata/{rack}/components/{host}`.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterNamesUpdate<'a> {
    #[serde(rename = "clusterNames")]
    pub cluster_names: &'a [String],
}

/// Body of `POST exadata/{rack}/components/{host}/vms/{vm}`.
#[derive(Debug, Clone, Serialize)]
pub struct VmClusterNameUpdate<'a> {
    #[serde(rename = "clusterName")]
    pub cluster_name: &'a str,
}

// ── Licenses ─────────────────────────────────────────────────────────

/// An Oracle database license agreement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgreementRecord {
    pub id: String,
    #[serde(default, rename = "agreementID")]
    pub agreement_id: Option<String>,
    #[serde(default)]
    pub csi: Option<String>,
    #[serde(default, rename = "referenceNumber")]
    pub reference_number: Option<String>,
    #[serde(default, rename = "licenseTypeID")]
    pub license_type_id: Option<String>,
    #[serde(default)]
    pub hosts: Vec<AgreementHostRecord>,
}

/// A host covered by an agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementHostRecord {
    pub hostname: String,
    #[serde(default, rename = "coveredLicensesCount")]
    pub covered_licenses_count: Option<f64>,
    #[serde(default, rename = "totalCoveredLicensesCount")]
    pub total_covered_licenses_count: Option<f64>,
}

/// Envelope of the per-database and per-host usage endpoints.
#[derive(Debug, Deserialize)]
pub struct UsedLicensesEnvelope<T> {
    #[serde(default = "Vec::new", rename = "usedLicenses")]
    pub used_licenses: Vec<T>,
}

/// Envelope of the per-cluster usage endpoint.
#[derive(Debug, Deserialize)]
pub struct UsedLicensesPerClusterEnvelope {
    #[serde(default, rename = "usedLicensesPerCluster")]
    pub used_licenses_per_cluster: Vec<ClusterUsageRecord>,
}

/// License consumption of one database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseUsageRecord {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "dbName")]
    pub db_name: Option<String>,
    #[serde(rename = "licenseTypeID")]
    pub license_type_id: String,
    #[serde(default, rename = "usedLicenses")]
    pub used_licenses: f64,
    #[serde(default, rename = "clusterLicenses")]
    pub cluster_licenses: Option<f64>,
    #[serde(default)]
    pub ignored: bool,
}

/// License consumption of one host, summed across its databases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostUsageRecord {
    pub hostname: String,
    #[serde(default, rename = "databaseNames")]
    pub database_names: Vec<String>,
    #[serde(rename = "licenseTypeID")]
    pub license_type_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default, rename = "usedLicenses")]
    pub used_licenses: f64,
}

/// License consumption of one cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterUsageRecord {
    pub cluster: String,
    #[serde(default)]
    pub hostnames: Vec<String>,
    #[serde(rename = "licenseTypeID")]
    pub license_type_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default, rename = "usedLicenses")]
    pub used_licenses: f64,
}

/// A license type (Oracle part) from the settings catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseTypeRecord {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metric: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rack_decodes_with_missing_optionals() {
        let rack: RackRecord = serde_json::from_value(json!({
            "rackID": "R1",
            "hostname": "exa01",
            "components": [{ "hostType": "DOM0", "hostID": "H1" }]
        }))
        .unwrap();

        assert_eq!(rack.rack_id, "R1");
        assert!(rack.rdma.is_none());
        assert_eq!(rack.components[0].host_type, "DOM0");
        assert!(rack.components[0].vms.is_none());
    }

    #[test]
    fn quantity_accepts_numbers_and_text() {
        let cell: CellDiskRecord = serde_json::from_value(json!({
            "size": 512,
            "freeSpace": "1.2T"
        }))
        .unwrap();

        assert_eq!(cell.size, Some(Quantity::Int(512)));
        assert_eq!(cell.free_space.unwrap().to_string(), "1.2T");
    }

    #[test]
    fn rdma_serializes_with_wire_names() {
        let body = serde_json::to_value(RdmaRecord {
            sw_version: "2.14".into(),
            switch_name: "ibsw01".into(),
            model: "QM8700".into(),
        })
        .unwrap();

        assert_eq!(
            body,
            json!({ "swVersion": "2.14", "switchName": "ibsw01", "model": "QM8700" })
        );
    }
}
