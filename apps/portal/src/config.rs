use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use client_core::{GatewayConfig, MutationPolicy};
use serde::Deserialize;
use tracing::warn;
use url::Url;

const DEFAULT_CONFIG_FILE: &str = "portal.toml";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub endpoint_url: Option<String>,
    pub mutation_policy: MutationPolicy,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint_url: Option<String>,
    mutation_policy: Option<MutationPolicy>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the TOML file, then environment variables.
///
/// An explicitly requested config file must exist; the default
/// `portal.toml` in the working directory is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if required || path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.endpoint_url {
        settings.endpoint_url = Some(v);
    }
    if let Some(v) = file_cfg.mutation_policy {
        settings.mutation_policy = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("PORTAL_ENDPOINT_URL") {
        settings.endpoint_url = Some(v);
    }
    if let Some(v) = lookup("APP__ENDPOINT_URL") {
        settings.endpoint_url = Some(v);
    }

    if let Some(v) = lookup("APP__MUTATION_POLICY") {
        match parse_mutation_policy(&v) {
            Some(policy) => settings.mutation_policy = policy,
            None => warn!(value = %v, "ignoring unknown APP__MUTATION_POLICY"),
        }
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = Some(parsed),
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__REQUEST_TIMEOUT_SECS"),
        }
    }
}

fn parse_mutation_policy(raw: &str) -> Option<MutationPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "lenient" => Some(MutationPolicy::Lenient),
        "strict" | "require_success_status" => Some(MutationPolicy::RequireSuccessStatus),
        _ => None,
    }
}

/// Builds the gateway configuration; `endpoint_override` comes from the
/// `--endpoint` flag and wins over every other source.
pub fn gateway_config(
    settings: &Settings,
    endpoint_override: Option<&str>,
) -> anyhow::Result<GatewayConfig> {
    let raw = endpoint_override
        .map(str::to_string)
        .or_else(|| settings.endpoint_url.clone())
        .context("no registrant endpoint configured; pass --endpoint or set PORTAL_ENDPOINT_URL")?;
    let endpoint = parse_endpoint(&raw)?;

    Ok(GatewayConfig {
        endpoint,
        mutation_policy: settings.mutation_policy,
        request_timeout: settings.request_timeout_secs.map(Duration::from_secs),
    })
}

fn parse_endpoint(raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw.trim())
        .with_context(|| format!("endpoint '{raw}' is not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("endpoint '{raw}' must use http or https");
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
