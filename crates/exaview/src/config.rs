//! CLI configuration: thin wrapper around `exaview_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--backend, --token, --insecure, filters).

use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use exaview_core::{ActiveFilters, AuthCredentials, DashboardConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use exaview_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config, store_token,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `DashboardConfig` from the config file, profile and CLI overrides.
///
/// Without a matching profile, `--backend` alone is enough.
pub fn build_dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut config = if let Some(profile) = cfg.profiles.get(&profile_name) {
        exaview_config::profile_to_dashboard_config(profile, &profile_name, &cfg.defaults)?
    } else {
        let url_str = global.backend.as_deref().ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
        let mut config = DashboardConfig::new(exaview_config::backend_url(url_str)?);
        config.timeout = Duration::from_secs(cfg.defaults.timeout);
        if cfg.defaults.insecure {
            config.tls = TlsVerification::DangerAcceptInvalid;
        }
        config
    };

    apply_overrides(&mut config, global)?;
    Ok(config)
}

/// Apply global flags on top of a profile-derived config.
fn apply_overrides(config: &mut DashboardConfig, global: &GlobalOpts) -> Result<(), CliError> {
    if let Some(ref backend) = global.backend {
        config.url = exaview_config::backend_url(backend)?;
    }
    if let Some(ref token) = global.token {
        config.auth = AuthCredentials::BearerToken(SecretString::from(token.clone()));
    }
    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    config.filters = merge_filters(&config.filters, global)?;
    Ok(())
}

fn merge_filters(base: &ActiveFilters, global: &GlobalOpts) -> Result<ActiveFilters, CliError> {
    let date = global
        .older_than
        .as_deref()
        .map(parse_instant)
        .transpose()?
        .or(base.date);

    Ok(ActiveFilters {
        date,
        environment: global.environment.clone().or_else(|| base.environment.clone()),
        location: global.location.clone().or_else(|| base.location.clone()),
    })
}

/// Parse `--older-than`: RFC 3339, or a bare date meaning midnight UTC.
fn parse_instant(raw: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CliError::Validation {
            field: "older-than".into(),
            reason: format!("expected RFC 3339 or YYYY-MM-DD, got '{raw}'"),
        })
}
