// ── Dashboard ──
//
// The entry point for consumers. Owns the backend client, the store, the
// global filter context and the license-type catalog. Fetches replace
// store collections wholesale; writes hit the backend first and patch the
// store only after the backend confirmed them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use exaview_api::transport::{TlsMode, TransportConfig};
use exaview_api::{BackendClient, ListQuery};

use crate::command::{Command, CommandResult};
use crate::config::{AuthCredentials, DashboardConfig, TlsVerification};
use crate::convert::list_query;
use crate::error::CoreError;
use crate::licenses;
use crate::loading::{LoadingGuard, LoadingIndicator, NoopIndicator};
use crate::lookup::LicenseTypeCatalog;
use crate::model::{
    ActiveFilters, Agreement, AgreementHost, ClusterUsage, DatabaseUsage, HostUsage, LicenseType,
    Rack, Rdma,
};
use crate::search::{SearchOutcome, search};
use crate::store::DataStore;
use crate::stream::EntityStream;

/// Rack endpoints fetched in parallel and concatenated on every refresh.
const RACK_ENDPOINTS: &[&str] = &[exaview_api::exadata::RACKS_PATH];

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<DashboardInner>`.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    client: BackendClient,
    store: Arc<DataStore>,
    filters: watch::Sender<ActiveFilters>,
    catalog: LicenseTypeCatalog,
    indicator: Arc<dyn LoadingIndicator>,
}

impl Dashboard {
    /// Create a dashboard with no loading indicator.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        Self::with_indicator(config, Arc::new(NoopIndicator))
    }

    /// Create a dashboard that brackets fetches with `indicator`.
    pub fn with_indicator(
        config: DashboardConfig,
        indicator: Arc<dyn LoadingIndicator>,
    ) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let client = BackendClient::new(config.url.clone(), &transport)?;
        let (filters, _) = watch::channel(config.filters.clone());

        Ok(Self {
            inner: Arc::new(DashboardInner {
                config,
                client,
                store: Arc::new(DataStore::new()),
                filters,
                catalog: LicenseTypeCatalog::new(),
                indicator,
            }),
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Filter context ───────────────────────────────────────────

    /// The current global filter context.
    pub fn filters(&self) -> ActiveFilters {
        self.inner.filters.borrow().clone()
    }

    /// Replace the global filter context. Takes effect on the next fetch.
    pub fn set_filters(&self, filters: ActiveFilters) {
        self.inner.filters.send_replace(filters);
    }

    /// Subscribe to filter changes.
    pub fn subscribe_filters(&self) -> watch::Receiver<ActiveFilters> {
        self.inner.filters.subscribe()
    }

    fn query(&self, older_than: Option<DateTime<Utc>>) -> ListQuery {
        list_query(&self.inner.filters.borrow(), older_than)
    }

    fn loading(&self, show: bool) -> LoadingGuard {
        if show {
            LoadingGuard::begin(Arc::clone(&self.inner.indicator))
        } else {
            LoadingGuard::quiet()
        }
    }

    // ── Exadata ──────────────────────────────────────────────────

    /// Fetch all racks and replace the stored collection.
    ///
    /// Every rack endpoint is requested in parallel; any failure rejects
    /// the whole fetch and leaves the store untouched. The global snapshot
    /// date, when set, overrides `older_than`.
    pub async fn fetch_racks(&self, older_than: Option<DateTime<Utc>>) -> Result<usize, CoreError> {
        let _loading = self.loading(true);
        let query = self.query(older_than);
        let client = &self.inner.client;

        let responses = try_join_all(
            RACK_ENDPOINTS
                .iter()
                .map(|endpoint| client.list_racks_from(endpoint, &query)),
        )
        .await?;

        let racks: Vec<Rack> = responses
            .into_iter()
            .flatten()
            .map(Rack::from)
            .collect();
        let count = racks.len();

        self.inner.store.apply_racks(racks);
        info!(racks = count, "rack refresh complete");
        Ok(count)
    }

    /// Normalize the stored racks and filter them by `term`.
    pub fn search_racks(&self, term: &str) -> SearchOutcome {
        let snapshot = self.inner.store.racks_snapshot();
        search(snapshot.iter().map(|r| &**r), term)
    }

    /// The stored rack with `rack_id`.
    pub fn rack(&self, rack_id: &str) -> Result<Arc<Rack>, CoreError> {
        self.inner
            .store
            .rack_by_id(rack_id)
            .ok_or_else(|| CoreError::key_not_found(&[rack_id]))
    }

    pub fn racks(&self) -> EntityStream<Rack> {
        self.inner.store.subscribe_racks()
    }

    /// Replace the cluster names of a component.
    pub async fn update_cluster_names(
        &self,
        rack_id: &str,
        host_id: &str,
        cluster_names: Vec<String>,
    ) -> Result<(), CoreError> {
        self.inner
            .client
            .update_cluster_names(rack_id, host_id, &cluster_names)
            .await?;
        self.inner
            .store
            .set_cluster_names(rack_id, host_id, cluster_names)
    }

    /// Set the cluster name of one VM.
    pub async fn update_vm_cluster_name(
        &self,
        rack_id: &str,
        host_id: &str,
        vm_name: &str,
        cluster_name: &str,
    ) -> Result<(), CoreError> {
        self.inner
            .client
            .update_vm_cluster_name(rack_id, host_id, vm_name, cluster_name)
            .await?;
        self.inner
            .store
            .set_vm_cluster_name(rack_id, host_id, vm_name, cluster_name)
    }

    /// Create or replace a rack's RDMA descriptor.
    pub async fn update_rdma(&self, rack_id: &str, rdma: Rdma) -> Result<(), CoreError> {
        self.inner
            .client
            .update_rdma(rack_id, &(&rdma).into())
            .await?;
        self.inner.store.set_rdma(rack_id, rdma)
    }

    /// Execute a write command and return the patched rack.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        debug!(?cmd, "executing command");
        let rack_id = cmd.rack_id().to_owned();

        match cmd {
            Command::UpdateClusterNames {
                rack_id,
                host_id,
                cluster_names,
            } => {
                self.update_cluster_names(&rack_id, &host_id, cluster_names)
                    .await?;
            }
            Command::UpdateVmClusterName {
                rack_id,
                host_id,
                vm_name,
                cluster_name,
            } => {
                self.update_vm_cluster_name(&rack_id, &host_id, &vm_name, &cluster_name)
                    .await?;
            }
            Command::UpdateRdma { rack_id, rdma } => {
                self.update_rdma(&rack_id, rdma).await?;
            }
        }

        self.rack(&rack_id).map(CommandResult::Rack)
    }

    // ── Licenses ─────────────────────────────────────────────────

    /// Fetch agreements, optionally without toggling the loading indicator.
    pub async fn fetch_agreements(&self, show_loading: bool) -> Result<usize, CoreError> {
        let _loading = self.loading(show_loading);
        let agreements: Vec<Agreement> = self
            .inner
            .client
            .list_agreements()
            .await?
            .into_iter()
            .map(Agreement::from)
            .collect();
        let count = agreements.len();
        self.inner.store.apply_agreements(agreements);
        debug!(agreements = count, "agreements refreshed");
        Ok(count)
    }

    pub fn agreements(&self) -> Arc<Vec<Arc<Agreement>>> {
        self.inner.store.agreements_snapshot()
    }

    /// Hosts covered by agreement `id`.
    pub fn hosts_associated(&self, id: &str) -> Result<Vec<AgreementHost>, CoreError> {
        licenses::hosts_associated(&self.agreements(), id)
    }

    pub fn agreement_numbers(&self) -> Vec<String> {
        licenses::agreement_numbers(&self.agreements())
    }

    pub fn csi_numbers(&self) -> Vec<String> {
        licenses::csi_numbers(&self.agreements())
    }

    pub fn reference_numbers(&self) -> Vec<String> {
        licenses::reference_numbers(&self.agreements())
    }

    /// Fetch the license-type catalog and replace the local copy.
    pub async fn fetch_license_types(&self) -> Result<usize, CoreError> {
        let types = self.inner.client.list_license_types().await?;
        self.inner
            .catalog
            .replace(types.into_iter().map(LicenseType::from));
        Ok(self.inner.catalog.len())
    }

    /// Load the catalog once. A catalog failure is logged, not fatal:
    /// usage records then keep whatever description the backend sent.
    async fn ensure_license_types(&self) {
        if !self.inner.catalog.is_empty() {
            return;
        }
        if let Err(e) = self.fetch_license_types().await {
            warn!(error = %e, "license-type catalog unavailable");
        }
    }

    pub async fn fetch_database_usage(&self) -> Result<usize, CoreError> {
        let _loading = self.loading(true);
        self.ensure_license_types().await;
        let records = self
            .inner
            .client
            .list_database_usage(&self.query(None))
            .await?;
        let usage = licenses::annotate_database_usage(records, &self.inner.catalog);
        let count = usage.len();
        self.inner.store.apply_database_usage(usage);
        Ok(count)
    }

    pub async fn fetch_host_usage(&self) -> Result<usize, CoreError> {
        let _loading = self.loading(true);
        self.ensure_license_types().await;
        let records = self.inner.client.list_host_usage(&self.query(None)).await?;
        let usage = licenses::annotate_host_usage(records, &self.inner.catalog);
        let count = usage.len();
        self.inner.store.apply_host_usage(usage);
        Ok(count)
    }

    pub async fn fetch_cluster_usage(&self) -> Result<usize, CoreError> {
        let _loading = self.loading(true);
        self.ensure_license_types().await;
        let records = self
            .inner
            .client
            .list_cluster_usage(&self.query(None))
            .await?;
        let usage = licenses::annotate_cluster_usage(records, &self.inner.catalog);
        let count = usage.len();
        self.inner.store.apply_cluster_usage(usage);
        Ok(count)
    }

    /// Stored per-database usage matching `term`.
    pub fn database_usage(&self, term: &str) -> Vec<Arc<DatabaseUsage>> {
        licenses::filter_records(&self.inner.store.database_usage_snapshot(), term)
    }

    /// Stored per-host usage matching `term`.
    pub fn host_usage(&self, term: &str) -> Vec<Arc<HostUsage>> {
        licenses::filter_records(&self.inner.store.host_usage_snapshot(), term)
    }

    /// Stored per-cluster usage matching `term`.
    pub fn cluster_usage(&self, term: &str) -> Vec<Arc<ClusterUsage>> {
        licenses::filter_records(&self.inner.store.cluster_usage_snapshot(), term)
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Build a [`TransportConfig`] from the dashboard configuration.
fn build_transport(config: &DashboardConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
        bearer_token: match &config.auth {
            AuthCredentials::None => None,
            AuthCredentials::BearerToken(token) => Some(token.clone()),
        },
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
