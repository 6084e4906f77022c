use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "login_probe.toml";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@p-ai.com";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Project base URL, always with a trailing slash so endpoint joins keep its path.
    pub supabase_url: Url,
    pub anon_key: String,
    pub admin_email: String,
    pub data_dir: PathBuf,
}

impl AuthConfig {
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

/// Values supplied on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub supabase_url: Option<String>,
    pub anon_key: Option<String>,
    pub admin_email: Option<String>,
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    supabase_url: Option<String>,
    anon_key: Option<String>,
    admin_email: Option<String>,
    data_dir: Option<PathBuf>,
}

pub fn load_config(overrides: ConfigOverrides) -> Result<AuthConfig, ConfigError> {
    let file = match &overrides.config_path {
        Some(path) => read_file_config(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_file_config(default_path)?
            } else {
                FileConfig::default()
            }
        }
    };
    resolve(file, |name| std::env::var(name).ok(), overrides)
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn first_env(env: &impl Fn(&str) -> Option<String>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env(name))
        .find(|value| !value.trim().is_empty())
}

fn resolve(
    file: FileConfig,
    env: impl Fn(&str) -> Option<String>,
    overrides: ConfigOverrides,
) -> Result<AuthConfig, ConfigError> {
    let raw_url = overrides
        .supabase_url
        .or_else(|| first_env(&env, &["SUPABASE_URL", "VITE_SUPABASE_URL"]))
        .or(file.supabase_url)
        .ok_or(ConfigError::Missing("supabase_url"))?;
    let anon_key = overrides
        .anon_key
        .or_else(|| first_env(&env, &["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"]))
        .or(file.anon_key)
        .ok_or(ConfigError::Missing("anon_key"))?;
    let admin_email = overrides
        .admin_email
        .or_else(|| first_env(&env, &["LOGIN_PROBE_ADMIN_EMAIL"]))
        .or(file.admin_email)
        .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string());
    let data_dir = match overrides
        .data_dir
        .or_else(|| first_env(&env, &["LOGIN_PROBE_DATA_DIR"]).map(PathBuf::from))
        .or(file.data_dir)
    {
        Some(dir) => dir,
        None => dirs::data_local_dir()
            .ok_or(ConfigError::NoDataDir)?
            .join("login_probe"),
    };

    Ok(AuthConfig {
        supabase_url: normalize_base_url(&raw_url)?,
        anon_key,
        admin_email,
        data_dir,
    })
}

pub fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
        url: trimmed.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
