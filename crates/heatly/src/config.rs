//! Bridges `heatly-config` profiles and global CLI flags into a
//! `PlatformConfig`.
//!
//! Precedence: command-line flag, then `HEATLY_*` env var (via clap), then
//! the selected profile, then config defaults.

use std::time::Duration;

use secrecy::SecretString;

use heatly_config::{Config, Defaults, Profile};
use heatly_core::{PlatformConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the session config for platform-bound commands.
pub fn build_platform_config(
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<PlatformConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(cfg),
        });
    }

    // No profile -- build from flags / env vars alone.
    let url_str = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: heatly_config::config_path().display().to_string(),
    })?;
    let url = heatly_config::parse_url(url_str)?;

    let token = global
        .token
        .clone()
        .map(SecretString::from)
        .ok_or(CliError::NoCredentials {
            profile: profile_name,
        })?;

    Ok(PlatformConfig {
        tls: if global.insecure {
            TlsVerification::DangerAcceptInvalid
        } else {
            TlsVerification::SystemDefaults
        },
        timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
        lookup_concurrency: cfg.defaults.lookup_concurrency,
        ..PlatformConfig::new(url, token)
    })
}

/// Apply CLI flag overrides on top of a profile.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<PlatformConfig, CliError> {
    let mut effective = profile.clone();
    if let Some(ref url) = global.url {
        effective.url.clone_from(url);
    }
    if global.insecure {
        effective.insecure = Some(true);
    }
    if let Some(secs) = global.timeout {
        effective.timeout = Some(secs);
    }

    // A token flag skips the profile's credential chain.
    if let Some(ref token) = global.token {
        let url = heatly_config::parse_url(&effective.url)?;
        return Ok(PlatformConfig {
            tls: heatly_config::profile_tls(&effective),
            timeout: Duration::from_secs(effective.timeout.unwrap_or(defaults.timeout)),
            lookup_concurrency: defaults.lookup_concurrency,
            ..PlatformConfig::new(url, SecretString::from(token.clone()))
        });
    }

    Ok(heatly_config::profile_to_platform_config(
        &effective,
        profile_name,
        defaults,
    )?)
}

pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}
