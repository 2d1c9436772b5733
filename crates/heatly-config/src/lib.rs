//! Configuration for heatly.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `heatly_core::PlatformConfig`. The CLI adds flag-aware
//! wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use heatly_core::config::DEFAULT_LOOKUP_CONCURRENCY;
use heatly_core::{PlatformConfig, TlsVerification};

/// Keyring service name; the user is `<profile>/token`.
pub const KEYRING_SERVICE: &str = "heatly";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named platform profiles.
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

impl Config {
    /// Profile named `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
            .to_owned();
        let profile = self
            .profiles
            .get(&name)
            .ok_or_else(|| ConfigError::Validation {
                field: "profile".into(),
                reason: format!("no profile named '{name}'"),
            })?;
        Ok((name, profile))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Serial-number lookups in flight during batch provisioning.
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            lookup_concurrency: default_lookup_concurrency(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_lookup_concurrency() -> usize {
    DEFAULT_LOOKUP_CONCURRENCY
}

/// A named platform profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Platform base URL (e.g., "http://10.0.0.5:2288").
    pub url: String,

    /// Environment variable name containing the bearer token.
    pub token_env: Option<String>,

    /// Bearer token (plaintext -- prefer keyring or env var).
    pub token: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "heatly", "heatly").map_or_else(
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
    p.push("heatly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
///
/// Environment keys use `__` for nesting, e.g.
/// `HEATLY_DEFAULTS__LOOKUP_CONCURRENCY=2`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("HEATLY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// The file alone, without environment overrides, for read-modify-write
/// edits. A missing file yields the defaults; a broken one is an error.
pub fn load_stored_config() -> Result<Config, ConfigError> {
    load_stored_config_from(&config_path())
}

pub fn load_stored_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path));
    Ok(figment.extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution (without CLI flags) ────────────────────────────

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/token")
}

/// Resolve the bearer token from the credential chain (no CLI flag step).
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's token in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    entry.set_password(token)?;
    Ok(())
}

// ── Translation to core config ──────────────────────────────────────

/// TLS strategy for a profile: `insecure` wins, then `ca_cert`, then the
/// system store.
pub fn profile_tls(profile: &Profile) -> TlsVerification {
    if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

pub fn parse_url(raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Build a `PlatformConfig` from a profile -- no CLI flag overrides.
pub fn profile_to_platform_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<PlatformConfig, ConfigError> {
    let url = parse_url(&profile.url)?;
    let token = resolve_token(profile, profile_name)?;

    Ok(PlatformConfig {
        tls: profile_tls(profile),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        lookup_concurrency: defaults.lookup_concurrency,
        ..PlatformConfig::new(url, token)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "plant"

[defaults]
output = "json"
lookup_concurrency = 2

[profiles.plant]
url = "http://10.0.0.5:2288"
token = "plain-token"
timeout = 12

[profiles.lab]
url = "https://lab.example:8443"
ca_cert = "/etc/heatly/lab-ca.pem"
"#;

    fn write_sample() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.lookup_concurrency, DEFAULT_LOOKUP_CONCURRENCY);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn file_values_override_defaults() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.defaults.lookup_concurrency, 2);

        let (name, profile) = cfg.profile(None).unwrap();
        assert_eq!(name, "plant");
        assert_eq!(profile.url, "http://10.0.0.5:2288");
    }

    #[test]
    fn unknown_profile_is_a_validation_error() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();
        assert!(matches!(
            cfg.profile(Some("nope")),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                url: "http://10.0.0.5:2288".into(),
                token_env: Some("PLANT_TOKEN".into()),
                ..Profile::default()
            },
        );
        save_config_to(&path, &cfg).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.profiles, cfg.profiles);
    }

    #[test]
    fn broken_file_is_an_error_not_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[profiles.plant\nurl = ").unwrap();

        assert!(matches!(
            load_stored_config_from(&path),
            Err(ConfigError::Figment(_))
        ));
        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn stored_config_keeps_every_profile() {
        let (_dir, path) = write_sample();
        let cfg = load_stored_config_from(&path).unwrap();
        let mut names: Vec<_> = cfg.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, ["lab", "plant"]);
    }

    #[test]
    fn tls_prefers_insecure_then_ca() {
        let mut profile = Profile {
            ca_cert: Some("/tmp/ca.pem".into()),
            ..Profile::default()
        };
        assert_eq!(
            profile_tls(&profile),
            TlsVerification::CustomCa("/tmp/ca.pem".into())
        );

        profile.insecure = Some(true);
        assert_eq!(profile_tls(&profile), TlsVerification::DangerAcceptInvalid);

        assert_eq!(
            profile_tls(&Profile::default()),
            TlsVerification::SystemDefaults
        );
    }

    #[test]
    fn plaintext_token_builds_platform_config() {
        let (_dir, path) = write_sample();
        let cfg = load_config_from(&path).unwrap();
        let (name, profile) = cfg.profile(Some("plant")).unwrap();

        let platform = profile_to_platform_config(profile, &name, &cfg.defaults).unwrap();
        assert_eq!(platform.url.as_str(), "http://10.0.0.5:2288/");
        assert_eq!(platform.timeout, Duration::from_secs(12));
        assert_eq!(platform.lookup_concurrency, 2);
        assert_eq!(platform.token.expose_secret(), "plain-token");
    }

    #[test]
    fn bad_url_is_rejected() {
        assert!(matches!(
            parse_url("not a url"),
            Err(ConfigError::Validation { .. })
        ));
    }
}
