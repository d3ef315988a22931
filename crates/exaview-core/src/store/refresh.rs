// ── Bulk refresh application ──
//
// Each fetch replaces its collection wholesale. The caller has already
// converted and validated the whole response, so a failed fetch never
// reaches this point and the store stays as it was.

use chrono::Utc;

use super::DataStore;
use crate::model::{Agreement, ClusterUsage, DatabaseUsage, HostUsage, Rack};

impl DataStore {
    /// Replace all racks and stamp the refresh time.
    pub fn apply_racks(&self, racks: Vec<Rack>) {
        self.racks.replace(racks);
        self.last_rack_refresh.send_replace(Some(Utc::now()));
    }

    pub fn apply_agreements(&self, agreements: Vec<Agreement>) {
        self.agreements.replace(agreements);
    }

    pub fn apply_database_usage(&self, usage: Vec<DatabaseUsage>) {
        self.database_usage.replace(usage);
    }

    pub fn apply_host_usage(&self, usage: Vec<HostUsage>) {
        self.host_usage.replace(usage);
    }

    pub fn apply_cluster_usage(&self, usage: Vec<ClusterUsage>) {
        self.cluster_usage.replace(usage);
    }
}
