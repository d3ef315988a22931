//! Shared configuration for exaview.
//!
//! TOML profiles, bearer-token resolution (env + keyring + plaintext),
//! and translation to `exaview_core::DashboardConfig`. The CLI adds
//! `GlobalOpts`-aware overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use exaview_core::{ActiveFilters, AuthCredentials, DashboardConfig, TlsVerification};

/// Keyring service name; entries are keyed `{profile}/token`.
pub const KEYRING_SERVICE: &str = "exaview";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named backend profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// API root (e.g., "https://ercole.example.com/api/").
    pub backend: String,

    /// Bearer token (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable name containing the bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// Default environment filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// Default location filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Override timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Profile {
    /// Profile filters as the dashboard's initial filter context.
    pub fn filters(&self) -> ActiveFilters {
        ActiveFilters {
            date: None,
            environment: self.environment.clone(),
            location: self.location.clone(),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "ercole", "exaview").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("exaview");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// Environment variables are prefixed `EXAVIEW_`; nested keys use `__`
/// (`EXAVIEW_DEFAULTS__TIMEOUT=60`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("EXAVIEW_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/token"),
    )?)
}

fn keyring_lookup(profile_name: &str) -> Option<String> {
    keyring_entry(profile_name).ok()?.get_password().ok()
}

/// Store a bearer token for `profile_name` in the system keyring.
pub fn store_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token.expose_secret())?;
    Ok(())
}

/// Resolve the bearer token: `token_env` variable, then system keyring,
/// then plaintext `token`. `None` means the profile is unauthenticated.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    resolve_token_with(
        profile,
        profile_name,
        |name| std::env::var(name).ok(),
        keyring_lookup,
    )
}

fn resolve_token_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
    keyring: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    // 1. Profile's token_env -> env var lookup
    if let Some(val) = profile.token_env.as_deref().and_then(&env) {
        return Some(SecretString::from(val));
    }

    // 2. System keyring
    if let Some(secret) = keyring(profile_name) {
        return Some(SecretString::from(secret));
    }

    // 3. Plaintext in config
    profile.token.clone().map(SecretString::from)
}

/// Resolve `AuthCredentials` for a profile.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> AuthCredentials {
    resolve_token(profile, profile_name).map_or(AuthCredentials::None, AuthCredentials::BearerToken)
}

// ── Profile translation ─────────────────────────────────────────────

/// Parse a profile's backend URL.
pub fn backend_url(raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "backend".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// TLS verification for a profile, falling back to `defaults.insecure`.
pub fn profile_tls(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build a `DashboardConfig` from a profile, with no CLI overrides.
pub fn profile_to_dashboard_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    Ok(DashboardConfig {
        url: backend_url(&profile.backend)?,
        auth: resolve_auth(profile, profile_name),
        tls: profile_tls(profile, defaults),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        filters: profile.filters(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn prod() -> Profile {
        Profile {
            backend: "https://ercole.example.com/api/".into(),
            token: Some("plain".into()),
            token_env: Some("PROD_TOKEN".into()),
            environment: Some("PROD".into()),
            ..Profile::default()
        }
    }

    fn reveal(token: Option<SecretString>) -> Option<String> {
        token.map(|t| t.expose_secret().to_owned())
    }

    #[test]
    fn token_chain_prefers_env_then_keyring_then_plaintext() {
        let profile = prod();
        let env = |name: &str| (name == "PROD_TOKEN").then(|| "from-env".to_owned());
        let keyring = |name: &str| (name == "prod").then(|| "from-keyring".to_owned());
        let none = |_: &str| None;

        assert_eq!(
            reveal(resolve_token_with(&profile, "prod", env, keyring)).as_deref(),
            Some("from-env")
        );
        assert_eq!(
            reveal(resolve_token_with(&profile, "prod", none, keyring)).as_deref(),
            Some("from-keyring")
        );
        assert_eq!(
            reveal(resolve_token_with(&profile, "prod", none, none)).as_deref(),
            Some("plain")
        );
    }

    #[test]
    fn profile_without_token_is_unauthenticated() {
        let profile = Profile {
            backend: "https://ercole.local/api".into(),
            ..Profile::default()
        };
        assert!(resolve_token_with(&profile, "lab", |_| None, |_| None).is_none());
    }

    #[test]
    fn tls_follows_profile_then_defaults() {
        let mut profile = prod();
        let mut defaults = Defaults::default();
        assert_eq!(profile_tls(&profile, &defaults), TlsVerification::SystemDefaults);

        profile.ca_cert = Some("/etc/ssl/ercole.pem".into());
        assert_eq!(
            profile_tls(&profile, &defaults),
            TlsVerification::CustomCa("/etc/ssl/ercole.pem".into())
        );

        defaults.insecure = true;
        assert_eq!(
            profile_tls(&profile, &defaults),
            TlsVerification::DangerAcceptInvalid
        );

        profile.insecure = Some(false);
        assert!(matches!(
            profile_tls(&profile, &defaults),
            TlsVerification::CustomCa(_)
        ));
    }

    #[test]
    fn invalid_backend_is_a_validation_error() {
        let err = backend_url("not a url").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "backend"));
    }

    #[test]
    fn save_then_load_preserves_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config {
            default_profile: Some("prod".into()),
            ..Config::default()
        };
        cfg.defaults.timeout = 45;
        cfg.profiles.insert("prod".into(), prod());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.default_profile.as_deref(), Some("prod"));
        assert_eq!(loaded.defaults.timeout, 45);
        let profile = &loaded.profiles["prod"];
        assert_eq!(profile.backend, "https://ercole.example.com/api/");
        assert_eq!(profile.filters().environment.as_deref(), Some("PROD"));
        assert!(profile.location.is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.defaults.output, "table");
        assert!(loaded.profiles.is_empty());
    }
}
