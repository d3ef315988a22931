// exaview-core: Reactive inventory store between exaview-api and consumers (CLI).

pub mod command;
pub mod config;
pub mod convert;
pub mod dashboard;
pub mod error;
pub mod licenses;
pub mod loading;
pub mod lookup;
pub mod model;
pub mod normalize;
pub mod search;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{AuthCredentials, DashboardConfig, TlsVerification};
pub use dashboard::Dashboard;
pub use error::CoreError;
pub use loading::{LoadingGuard, LoadingIndicator, LoadingState, NoopIndicator};
pub use lookup::{LicenseTypeCatalog, LicenseTypeLookup};
pub use normalize::{classify, normalize};
pub use search::{Category, OpenRows, SearchOutcome, search};
pub use store::DataStore;
pub use stream::EntityStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Inventory
    CellDisk, Component, HostType, Progress, Rack, Rdma, VirtualMachine,
    // Derived views
    MachineType, RackView,
    // Licenses
    Agreement, AgreementHost, ClusterUsage, DatabaseUsage, HostUsage, LicenseType,
    // Filters
    ActiveFilters,
};
