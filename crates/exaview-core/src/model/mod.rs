// ── Domain model ──
//
// Canonical inventory and license types. Wire records from `exaview_api`
// are converted into these in `crate::convert`; consumers depend only on
// this module.

pub mod filters;
pub mod license;
pub mod rack;
pub mod view;

pub use filters::ActiveFilters;
pub use license::{
    Agreement, AgreementHost, ClusterUsage, DatabaseUsage, HostUsage, LicenseType,
    full_part_number,
};
pub use rack::{CellDisk, Component, HostType, Progress, Rack, Rdma, VirtualMachine};
pub use view::{MachineType, RackView};
