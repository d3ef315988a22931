use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Global filter context applied to every list fetch.
///
/// Sent as the `older-than`, `environment` and `location` query
/// parameters; `None` values are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFilters {
    /// Snapshot date. Takes precedence over a per-call `older_than`.
    pub date: Option<DateTime<Utc>>,
    pub environment: Option<String>,
    pub location: Option<String>,
}

impl ActiveFilters {
    /// `true` if no filter is set.
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.environment.is_none() && self.location.is_none()
    }
}
