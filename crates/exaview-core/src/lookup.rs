// ── License-type lookup ──

use dashmap::DashMap;

use crate::model::LicenseType;

/// Resolves a license-type ID to its description and metric.
pub trait LicenseTypeLookup: Send + Sync {
    fn resolve(&self, license_type_id: &str) -> Option<LicenseType>;
}

/// In-memory license-type catalog, filled from the settings endpoint.
#[derive(Debug, Default)]
pub struct LicenseTypeCatalog {
    by_id: DashMap<String, LicenseType>,
}

impl LicenseTypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog contents.
    pub fn replace(&self, types: impl IntoIterator<Item = LicenseType>) {
        self.by_id.clear();
        for t in types {
            self.by_id.insert(t.id.clone(), t);
        }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl FromIterator<LicenseType> for LicenseTypeCatalog {
    fn from_iter<I: IntoIterator<Item = LicenseType>>(iter: I) -> Self {
        let catalog = Self::new();
        catalog.replace(iter);
        catalog
    }
}

impl LicenseTypeLookup for LicenseTypeCatalog {
    fn resolve(&self, license_type_id: &str) -> Option<LicenseType> {
        self.by_id.get(license_type_id).map(|r| r.value().clone())
    }
}
