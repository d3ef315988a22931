// ── Central reactive data store ──
//
// Owned, single-writer storage for every inventory and license collection.
// Readers take cheap `Arc` snapshots or subscribe via `watch` channels.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::model::{Agreement, ClusterUsage, DatabaseUsage, HostUsage, Rack};
use crate::stream::EntityStream;

fn rack_key(rack: &Rack) -> &str {
    &rack.rack_id
}

fn agreement_key(agreement: &Agreement) -> &str {
    &agreement.id
}

/// Central reactive store for racks, agreements and license usage.
///
/// Collections are replaced wholesale on each fetch; individual racks are
/// patched only through the keyed mutation helpers after a confirmed
/// backend write.
pub struct DataStore {
    pub(crate) racks: EntityCollection<Rack>,
    pub(crate) agreements: EntityCollection<Agreement>,
    pub(crate) database_usage: EntityCollection<DatabaseUsage>,
    pub(crate) host_usage: EntityCollection<HostUsage>,
    pub(crate) cluster_usage: EntityCollection<ClusterUsage>,
    pub(crate) last_rack_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (last_rack_refresh, _) = watch::channel(None);

        Self {
            racks: EntityCollection::keyed(rack_key),
            agreements: EntityCollection::keyed(agreement_key),
            database_usage: EntityCollection::new(),
            host_usage: EntityCollection::new(),
            cluster_usage: EntityCollection::new(),
            last_rack_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn racks_snapshot(&self) -> Arc<Vec<Arc<Rack>>> {
        self.racks.snapshot()
    }

    pub fn agreements_snapshot(&self) -> Arc<Vec<Arc<Agreement>>> {
        self.agreements.snapshot()
    }

    pub fn database_usage_snapshot(&self) -> Arc<Vec<Arc<DatabaseUsage>>> {
        self.database_usage.snapshot()
    }

    pub fn host_usage_snapshot(&self) -> Arc<Vec<Arc<HostUsage>>> {
        self.host_usage.snapshot()
    }

    pub fn cluster_usage_snapshot(&self) -> Arc<Vec<Arc<ClusterUsage>>> {
        self.cluster_usage.snapshot()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn rack_by_id(&self, rack_id: &str) -> Option<Arc<Rack>> {
        self.racks.get(rack_id)
    }

    pub fn agreement_by_id(&self, id: &str) -> Option<Arc<Agreement>> {
        self.agreements.get(id)
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn rack_count(&self) -> usize {
        self.racks.len()
    }

    pub fn agreement_count(&self) -> usize {
        self.agreements.len()
    }

    /// Mutation counter of the rack collection.
    pub fn racks_version(&self) -> u64 {
        self.racks.version()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_racks(&self) -> EntityStream<Rack> {
        EntityStream::new(self.racks.subscribe())
    }

    pub fn subscribe_agreements(&self) -> EntityStream<Agreement> {
        EntityStream::new(self.agreements.subscribe())
    }

    pub fn subscribe_database_usage(&self) -> EntityStream<DatabaseUsage> {
        EntityStream::new(self.database_usage.subscribe())
    }

    pub fn subscribe_host_usage(&self) -> EntityStream<HostUsage> {
        EntityStream::new(self.host_usage.subscribe())
    }

    pub fn subscribe_cluster_usage(&self) -> EntityStream<ClusterUsage> {
        EntityStream::new(self.cluster_usage.subscribe())
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_rack_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_rack_refresh.borrow()
    }

    /// How long ago racks were last refreshed, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_rack_refresh().map(|t| Utc::now() - t)
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
