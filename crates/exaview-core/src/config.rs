// ── Runtime backend configuration ──
//
// These types describe *how* to reach the inventory backend. They carry
// credential data and connection tuning, but never touch disk. The CLI
// constructs a `DashboardConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::model::ActiveFilters;

/// How to authenticate with the backend.
#[derive(Debug, Clone, Default)]
pub enum AuthCredentials {
    /// No `Authorization` header.
    #[default]
    None,
    /// `Authorization: Bearer <token>` on every request.
    BearerToken(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed lab backends).
    DangerAcceptInvalid,
}

/// Configuration for one backend.
///
/// Built by the CLI, passed to [`Dashboard`](crate::Dashboard); core never
/// reads config files.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// API root, e.g. `https://ercole.example.com/api/`.
    pub url: Url,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    /// Per-request timeout. Bounds a hung request; there is no cancellation.
    pub timeout: Duration,
    /// Initial global filter context.
    pub filters: ActiveFilters,
}

impl DashboardConfig {
    /// A config with defaults for everything except the URL.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            auth: AuthCredentials::None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            filters: ActiveFilters::default(),
        }
    }
}
